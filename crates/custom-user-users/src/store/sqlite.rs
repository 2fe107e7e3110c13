//! SQLite-backed user storage
//!
//! Records live in a `users` table. Statements are built with sea-query and
//! executed through a sqlx `SqlitePool`; timestamps are stored as RFC 3339
//! text and the permission lists as JSON arrays.
//!
//! ## Database Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS "users" (
//!     "id" varchar(36) NOT NULL PRIMARY KEY,
//!     "email" varchar(60) NOT NULL UNIQUE,
//!     "username" varchar(20) NOT NULL UNIQUE,
//!     "first_name" varchar(30) NOT NULL,
//!     "last_name" varchar(30) NOT NULL,
//!     "password" varchar(128) NOT NULL,
//!     "last_login" text,
//!     "is_active" boolean NOT NULL DEFAULT TRUE,
//!     "is_staff" boolean NOT NULL DEFAULT FALSE,
//!     "is_superuser" boolean NOT NULL DEFAULT FALSE,
//!     "user_permissions" text NOT NULL,
//!     "groups" text NOT NULL,
//!     "date_joined" text NOT NULL
//! );
//! ```

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use custom_user_exception::{Error, Result};
use sea_query::{
	Alias, ColumnDef, Expr, ExprTrait, Func, Order, Query, SelectStatement, SqliteQueryBuilder,
	Table,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

use super::UserStore;
use crate::models::{EMAIL_MAX_LENGTH, NAME_MAX_LENGTH, USERNAME_MAX_LENGTH};
use crate::{Permissions, User};

const TABLE: &str = "users";

const COLUMNS: [&str; 13] = [
	"id",
	"email",
	"username",
	"first_name",
	"last_name",
	"password",
	"last_login",
	"is_active",
	"is_staff",
	"is_superuser",
	"user_permissions",
	"groups",
	"date_joined",
];

/// SQLite user store
///
/// # Examples
///
/// ```rust,no_run
/// use custom_user_users::{SqliteUserStore, UserStore};
///
/// # async fn example() {
/// let store = SqliteUserStore::connect("sqlite::memory:", 1).await.unwrap();
/// store.create_schema().await.unwrap();
///
/// assert_eq!(store.count().await.unwrap(), 0);
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(example());
/// ```
#[derive(Clone)]
pub struct SqliteUserStore {
	pool: SqlitePool,
}

impl SqliteUserStore {
	/// Opens a pool to `database_url`, creating the database file if needed.
	///
	/// In-memory databases should use a single connection.
	pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
		let options = SqliteConnectOptions::from_str(database_url)
			.map_err(|e| Error::Configuration(format!("Invalid database URL: {}", e)))?
			.create_if_missing(true);

		let pool = SqlitePoolOptions::new()
			.max_connections(max_connections)
			.connect_with(options)
			.await
			.map_err(|e| Error::Database(format!("Database connection error: {}", e)))?;

		debug!(database_url, max_connections, "connected user store");
		Ok(Self { pool })
	}

	/// Wraps an existing pool
	pub fn from_pool(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Creates the `users` table if it doesn't exist
	pub async fn create_schema(&self) -> Result<()> {
		let sql = {
			let stmt = Table::create()
				.table(Alias::new(TABLE))
				.if_not_exists()
				.col(
					ColumnDef::new(Alias::new("id"))
						.string_len(36)
						.not_null()
						.primary_key(),
				)
				.col(
					ColumnDef::new(Alias::new("email"))
						.string_len(EMAIL_MAX_LENGTH as u32)
						.not_null()
						.unique_key(),
				)
				.col(
					ColumnDef::new(Alias::new("username"))
						.string_len(USERNAME_MAX_LENGTH as u32)
						.not_null()
						.unique_key(),
				)
				.col(
					ColumnDef::new(Alias::new("first_name"))
						.string_len(NAME_MAX_LENGTH as u32)
						.not_null(),
				)
				.col(
					ColumnDef::new(Alias::new("last_name"))
						.string_len(NAME_MAX_LENGTH as u32)
						.not_null(),
				)
				.col(
					ColumnDef::new(Alias::new("password"))
						.string_len(128)
						.not_null(),
				)
				.col(ColumnDef::new(Alias::new("last_login")).text())
				.col(
					ColumnDef::new(Alias::new("is_active"))
						.boolean()
						.not_null()
						.default(true),
				)
				.col(
					ColumnDef::new(Alias::new("is_staff"))
						.boolean()
						.not_null()
						.default(false),
				)
				.col(
					ColumnDef::new(Alias::new("is_superuser"))
						.boolean()
						.not_null()
						.default(false),
				)
				.col(
					ColumnDef::new(Alias::new("user_permissions"))
						.text()
						.not_null(),
				)
				.col(ColumnDef::new(Alias::new("groups")).text().not_null())
				.col(
					ColumnDef::new(Alias::new("date_joined"))
						.text()
						.not_null(),
				)
				.to_owned();
			stmt.to_string(SqliteQueryBuilder)
		};

		sqlx::query(&sql)
			.execute(&self.pool)
			.await
			.map_err(|e| Error::Database(format!("Failed to create table: {}", e)))?;

		debug!(table = TABLE, "ensured user schema");
		Ok(())
	}

	fn select_all() -> SelectStatement {
		Query::select()
			.columns(COLUMNS.iter().map(|c| Alias::new(*c)))
			.from(Alias::new(TABLE))
			.to_owned()
	}

	async fn fetch_one_where(&self, column: &str, value: String) -> Result<Option<User>> {
		let sql = Self::select_all()
			.and_where(Expr::col(Alias::new(column)).eq(value))
			.to_string(SqliteQueryBuilder);

		let row = sqlx::query(&sql)
			.fetch_optional(&self.pool)
			.await
			.map_err(map_sqlx_error)?;

		row.as_ref().map(user_from_row).transpose()
	}
}

#[async_trait]
impl UserStore for SqliteUserStore {
	async fn insert(&self, user: User) -> Result<User> {
		let sql = {
			let stmt = Query::insert()
				.into_table(Alias::new(TABLE))
				.columns(COLUMNS.iter().map(|c| Alias::new(*c)))
				.values(
					[
						Expr::val(user.id.to_string()),
						Expr::val(user.email.clone()),
						Expr::val(user.username.clone()),
						Expr::val(user.first_name.clone()),
						Expr::val(user.last_name.clone()),
						Expr::val(user.password.clone()),
						Expr::val(user.last_login.map(format_timestamp)),
						Expr::val(user.is_active),
						Expr::val(user.is_staff),
						Expr::val(user.permissions.is_superuser),
						Expr::val(encode_list(&user.permissions.user_permissions)?),
						Expr::val(encode_list(&user.permissions.groups)?),
						Expr::val(format_timestamp(user.date_joined)),
					]
					.into_iter()
					.collect::<Vec<Expr>>(),
				)
				.map_err(|e| Error::Database(format!("Failed to build insert: {}", e)))?
				.to_owned();
			stmt.to_string(SqliteQueryBuilder)
		};

		sqlx::query(&sql)
			.execute(&self.pool)
			.await
			.map_err(map_sqlx_error)?;

		Ok(user)
	}

	async fn update(&self, user: &User) -> Result<()> {
		let sql = {
			let stmt = Query::update()
				.table(Alias::new(TABLE))
				.value(Alias::new("email"), Expr::val(user.email.clone()))
				.value(Alias::new("username"), Expr::val(user.username.clone()))
				.value(Alias::new("first_name"), Expr::val(user.first_name.clone()))
				.value(Alias::new("last_name"), Expr::val(user.last_name.clone()))
				.value(Alias::new("password"), Expr::val(user.password.clone()))
				.value(
					Alias::new("last_login"),
					Expr::val(user.last_login.map(format_timestamp)),
				)
				.value(Alias::new("is_active"), Expr::val(user.is_active))
				.value(Alias::new("is_staff"), Expr::val(user.is_staff))
				.value(
					Alias::new("is_superuser"),
					Expr::val(user.permissions.is_superuser),
				)
				.value(
					Alias::new("user_permissions"),
					Expr::val(encode_list(&user.permissions.user_permissions)?),
				)
				.value(
					Alias::new("groups"),
					Expr::val(encode_list(&user.permissions.groups)?),
				)
				.and_where(Expr::col(Alias::new("id")).eq(user.id.to_string()))
				.to_owned();
			stmt.to_string(SqliteQueryBuilder)
		};

		let result = sqlx::query(&sql)
			.execute(&self.pool)
			.await
			.map_err(map_sqlx_error)?;

		if result.rows_affected() == 0 {
			return Err(Error::NotFound(format!("user {}", user.id)));
		}
		Ok(())
	}

	async fn get(&self, id: Uuid) -> Result<Option<User>> {
		self.fetch_one_where("id", id.to_string()).await
	}

	async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
		self.fetch_one_where("email", email.to_string()).await
	}

	async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
		self.fetch_one_where("username", username.to_string())
			.await
	}

	async fn delete(&self, id: Uuid) -> Result<bool> {
		let sql = {
			let stmt = Query::delete()
				.from_table(Alias::new(TABLE))
				.and_where(Expr::col(Alias::new("id")).eq(id.to_string()))
				.to_owned();
			stmt.to_string(SqliteQueryBuilder)
		};

		let result = sqlx::query(&sql)
			.execute(&self.pool)
			.await
			.map_err(map_sqlx_error)?;

		Ok(result.rows_affected() > 0)
	}

	async fn count(&self) -> Result<usize> {
		let sql = Query::select()
			.expr(Func::count(Expr::col(Alias::new("id"))))
			.from(Alias::new(TABLE))
			.to_string(SqliteQueryBuilder);

		let count: i64 = sqlx::query_scalar(&sql)
			.fetch_one(&self.pool)
			.await
			.map_err(map_sqlx_error)?;

		Ok(count as usize)
	}

	async fn list(&self) -> Result<Vec<User>> {
		let sql = Self::select_all()
			.order_by(Alias::new("date_joined"), Order::Asc)
			.to_string(SqliteQueryBuilder);

		let rows = sqlx::query(&sql)
			.fetch_all(&self.pool)
			.await
			.map_err(map_sqlx_error)?;

		rows.iter().map(user_from_row).collect()
	}
}

/// Maps sqlx failures onto the shared error type.
///
/// SQLite reports unique violations as `UNIQUE constraint failed: users.email`;
/// the column after the last dot becomes the error's field.
fn map_sqlx_error(err: sqlx::Error) -> Error {
	if let sqlx::Error::Database(db_err) = &err
		&& db_err.is_unique_violation()
	{
		let field = db_err
			.message()
			.rsplit('.')
			.next()
			.unwrap_or_default()
			.trim()
			.to_string();
		return Error::UniqueViolation { field };
	}
	Error::Database(err.to_string())
}

fn encode_list(values: &[String]) -> Result<String> {
	serde_json::to_string(values).map_err(|e| Error::Database(format!("Serialization error: {}", e)))
}

fn decode_list(column: &str, raw: &str) -> Result<Vec<String>> {
	serde_json::from_str(raw).map_err(|e| Error::Database(format!("Invalid {}: {}", column, e)))
}

/// Fixed-width UTC form, so that text order matches time order.
fn format_timestamp(time: DateTime<Utc>) -> String {
	time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(raw)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| Error::Database(format!("Invalid {}: {}", column, e)))
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
	let id: String = row.try_get("id").map_err(map_sqlx_error)?;
	let last_login: Option<String> = row.try_get("last_login").map_err(map_sqlx_error)?;
	let user_permissions: String = row.try_get("user_permissions").map_err(map_sqlx_error)?;
	let groups: String = row.try_get("groups").map_err(map_sqlx_error)?;
	let date_joined: String = row.try_get("date_joined").map_err(map_sqlx_error)?;

	Ok(User {
		id: Uuid::parse_str(&id).map_err(|e| Error::Database(format!("Invalid id: {}", e)))?,
		email: row.try_get("email").map_err(map_sqlx_error)?,
		username: row.try_get("username").map_err(map_sqlx_error)?,
		first_name: row.try_get("first_name").map_err(map_sqlx_error)?,
		last_name: row.try_get("last_name").map_err(map_sqlx_error)?,
		password: row.try_get("password").map_err(map_sqlx_error)?,
		last_login: last_login
			.as_deref()
			.map(|raw| parse_timestamp("last_login", raw))
			.transpose()?,
		is_active: row.try_get("is_active").map_err(map_sqlx_error)?,
		is_staff: row.try_get("is_staff").map_err(map_sqlx_error)?,
		permissions: Permissions {
			is_superuser: row.try_get("is_superuser").map_err(map_sqlx_error)?,
			user_permissions: decode_list("user_permissions", &user_permissions)?,
			groups: decode_list("groups", &groups)?,
		},
		date_joined: parse_timestamp("date_joined", &date_joined)?,
	})
}
