use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use custom_user_auth::{
	Argon2Hasher, BaseUser, BaseUserManager, PasswordHasher, check_password, make_password,
	normalize_email,
};
use custom_user_exception::{Error, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::store::UserStore;
use crate::{NewUser, User};

/// Hashed once per unknown-email login attempt so that both outcomes cost a
/// hash computation.
const TIMING_DUMMY_PASSWORD: &str = "custom-user-timing-dummy";

/// UserManager - creates, looks up and authenticates [`User`] records
///
/// The manager validates and normalizes input, hashes passwords with its
/// [`PasswordHasher`] and delegates persistence to a [`UserStore`].
///
/// # Examples
///
/// ```
/// use custom_user_users::{BaseUserManager, InMemoryUserStore, NewUser, UserManager};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let manager = UserManager::new(Arc::new(InMemoryUserStore::new()));
///
/// let admin = manager
///     .create_superuser(
///         NewUser::new("Root@Example.COM", "root", "Grace", "Hopper"),
///         "cobol-1959",
///     )
///     .await
///     .unwrap();
///
/// assert_eq!(admin.email, "Root@example.com");
/// assert!(admin.is_staff);
/// assert_eq!(admin.to_string(), "Grace Hopper <Root@example.com>");
///
/// let logged_in = manager
///     .authenticate("Root@EXAMPLE.com", "cobol-1959")
///     .await
///     .unwrap();
/// assert!(logged_in.unwrap().last_login.is_some());
/// # });
/// ```
#[derive(Clone)]
pub struct UserManager {
	store: Arc<dyn UserStore>,
	hasher: Arc<dyn PasswordHasher>,
}

impl UserManager {
	/// Creates a manager hashing with Argon2id
	pub fn new(store: Arc<dyn UserStore>) -> Self {
		Self::with_hasher(store, Arc::new(Argon2Hasher::new()))
	}

	/// Creates a manager hashing with `hasher`.
	///
	/// Records created this way must be verified through
	/// [`UserManager::check_password`] or [`UserManager::authenticate`].
	pub fn with_hasher(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
		Self { store, hasher }
	}

	pub fn store(&self) -> &Arc<dyn UserStore> {
		&self.store
	}

	/// Persists field changes of an existing record.
	///
	/// The email is normalized in place first. Email and username must stay
	/// non-empty and every value must fit its column; otherwise the store is
	/// not touched. `date_joined` is never written.
	pub async fn save(&self, user: &mut User) -> Result<()> {
		user.email = normalize_email(&user.email);

		let fields = NewUser::new(
			user.email.as_str(),
			user.username.as_str(),
			user.first_name.as_str(),
			user.last_name.as_str(),
		);
		fields.require_login_fields()?;
		fields.check_lengths()?;

		self.store.update(user).await?;
		debug!(user_id = %user.id, "saved user");
		Ok(())
	}

	pub async fn get(&self, id: Uuid) -> Result<Option<User>> {
		debug!(user_id = %id, "looking up user by id");
		self.store.get(id).await
	}

	pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
		debug!(username, "looking up user by username");
		self.store.get_by_username(username).await
	}

	/// Deletes a record, returning whether it existed.
	///
	/// Prefer clearing `is_active` for accounts that may have history.
	pub async fn delete(&self, id: Uuid) -> Result<bool> {
		let deleted = self.store.delete(id).await?;
		if deleted {
			info!(user_id = %id, "deleted user");
		}
		Ok(deleted)
	}

	pub async fn count(&self) -> Result<usize> {
		self.store.count().await
	}

	/// Verifies an email and password pair.
	///
	/// Returns `None` for an unknown email, an inactive account or a wrong
	/// password. On success `last_login` is stamped to the microsecond and
	/// saved.
	pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
		let Some(mut user) = self.get_by_natural_key(email).await? else {
			// Unknown users still pay for one hash.
			let _ = self.hasher.hash(TIMING_DUMMY_PASSWORD);
			warn!(email, "authentication failed: unknown user");
			return Ok(None);
		};

		let verified = if user.has_usable_password() {
			match self.check_password(&user, password) {
				Ok(verified) => verified,
				Err(e) => {
					warn!(user_id = %user.id, error = %e, "stored password hash is unreadable");
					false
				}
			}
		} else {
			// Unusable passwords cost one hash too.
			let _ = self.hasher.hash(TIMING_DUMMY_PASSWORD);
			false
		};
		if !verified {
			warn!(user_id = %user.id, "authentication failed: wrong password");
			return Ok(None);
		}
		if !user.is_active {
			warn!(user_id = %user.id, "authentication failed: inactive user");
			return Ok(None);
		}

		user.set_last_login(Utc::now().trunc_subsecs(6));
		self.store.update(&user).await?;
		info!(user_id = %user.id, "user logged in");
		Ok(Some(user))
	}

	/// Verifies `raw_password` against the user's stored hash with this
	/// manager's hasher.
	///
	/// Prefer this over [`BaseUser::check_password`] on the record, which
	/// always uses the model's default hasher.
	pub fn check_password(&self, user: &User, raw_password: &str) -> Result<bool> {
		check_password(self.hasher.as_ref(), raw_password, user.password_hash())
	}

	/// Replaces the password of the user with `id` and saves it.
	pub async fn set_password(&self, id: Uuid, raw_password: &str) -> Result<User> {
		let mut user = self
			.store
			.get(id)
			.await?
			.ok_or_else(|| Error::NotFound(format!("user {}", id)))?;

		user.set_password_hash(make_password(self.hasher.as_ref(), Some(raw_password))?);
		self.store.update(&user).await?;

		info!(user_id = %user.id, "changed password");
		Ok(user)
	}
}

#[async_trait]
impl BaseUserManager<User> for UserManager {
	type NewUser = NewUser;

	async fn create_user(&self, new_user: NewUser, password: Option<&str>) -> Result<User> {
		new_user.require_fields()?;

		let new_user = NewUser {
			email: normalize_email(&new_user.email),
			..new_user
		};
		new_user.check_lengths()?;

		let mut user = User::new(new_user);
		user.set_password_hash(make_password(self.hasher.as_ref(), password)?);

		let user = self.store.insert(user).await?;
		info!(user_id = %user.id, email = %user.email, "created user");
		Ok(user)
	}

	async fn create_superuser(&self, new_user: NewUser, password: &str) -> Result<User> {
		let mut user = self.create_user(new_user, Some(password)).await?;

		user.is_staff = true;
		user.permissions.is_superuser = true;
		self.store.update(&user).await?;

		info!(user_id = %user.id, "promoted user to superuser");
		Ok(user)
	}

	async fn get_by_natural_key(&self, email: &str) -> Result<Option<User>> {
		let email = normalize_email(email);
		debug!(email = %email, "looking up user by email");
		self.store.get_by_email(&email).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::InMemoryUserStore;
	use rstest::*;

	#[fixture]
	fn manager() -> UserManager {
		UserManager::new(Arc::new(InMemoryUserStore::new()))
	}

	fn grace() -> NewUser {
		NewUser::new("grace@navy.MIL", "grace", "Grace", "Hopper")
	}

	#[rstest]
	#[tokio::test]
	async fn test_create_user_defaults(manager: UserManager) {
		let user = manager.create_user(grace(), Some("cobol")).await.unwrap();

		assert_eq!(user.email, "grace@navy.mil");
		assert!(user.is_active);
		assert!(!user.is_staff);
		assert!(!user.permissions.is_superuser);
		assert!(user.has_usable_password());
		assert!(user.check_password("cobol").unwrap());
		assert_eq!(manager.count().await.unwrap(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_create_user_without_password(manager: UserManager) {
		let user = manager.create_user(grace(), None).await.unwrap();

		assert!(!user.has_usable_password());
		assert!(manager.authenticate("grace@navy.mil", "").await.unwrap().is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_validation_happens_before_any_write(manager: UserManager) {
		let mut invalid = grace();
		invalid.last_name = String::new();

		let error = manager.create_user(invalid, Some("pw")).await.unwrap_err();

		assert_eq!(error.to_string(), "User must have a last name!");
		assert_eq!(manager.count().await.unwrap(), 0);
	}

	#[rstest]
	#[tokio::test]
	async fn test_create_superuser_sets_flags(manager: UserManager) {
		let admin = manager.create_superuser(grace(), "cobol").await.unwrap();

		let stored = manager.get(admin.id).await.unwrap().unwrap();
		assert!(stored.is_staff);
		assert!(stored.permissions.is_superuser);
		assert!(stored.is_active);
	}

	#[rstest]
	#[tokio::test]
	async fn test_authenticate_inactive_user(manager: UserManager) {
		let mut user = manager.create_user(grace(), Some("cobol")).await.unwrap();
		user.is_active = false;
		manager.save(&mut user).await.unwrap();

		assert!(manager.authenticate("grace@navy.mil", "cobol").await.unwrap().is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_set_password_unknown_id(manager: UserManager) {
		let result = manager.set_password(Uuid::new_v4(), "new").await;

		assert!(matches!(result, Err(Error::NotFound(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_save_rejects_overlong_values(manager: UserManager) {
		let mut user = manager.create_user(grace(), None).await.unwrap();
		user.username = "u".repeat(21);

		let error = manager.save(&mut user).await.unwrap_err();

		assert_eq!(error.field(), Some("username"));
		let stored = manager.get(user.id).await.unwrap().unwrap();
		assert_eq!(stored.username, "grace");
	}
}
