//! Backing stores for user records.
//!
//! A store owns uniqueness of `email` and `username`; the manager never
//! checks it itself and only relays [`Error::UniqueViolation`](custom_user_exception::Error::UniqueViolation).

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::InMemoryUserStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteUserStore;

use async_trait::async_trait;
use custom_user_exception::Result;
use uuid::Uuid;

use crate::User;

/// Persistence for user records.
///
/// All operations touch at most one record. `update` never changes the
/// stored `date_joined`.
#[async_trait]
pub trait UserStore: Send + Sync {
	/// Writes a new record and returns it as stored.
	async fn insert(&self, user: User) -> Result<User>;

	/// Overwrites an existing record.
	///
	/// Fails with `NotFound` when no record has the user's id.
	async fn update(&self, user: &User) -> Result<()>;

	async fn get(&self, id: Uuid) -> Result<Option<User>>;

	/// Exact, case-sensitive match on the stored (normalized) email.
	async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

	async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

	/// Deletes a record, returning whether one existed.
	async fn delete(&self, id: Uuid) -> Result<bool>;

	async fn count(&self) -> Result<usize>;

	/// All records, oldest first.
	async fn list(&self) -> Result<Vec<User>>;
}
