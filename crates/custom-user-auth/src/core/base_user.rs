use chrono::{DateTime, Utc};
use custom_user_exception::Result;

use super::hasher::{self, PasswordHasher};

/// BaseUser trait - the password and identity half of a user model
///
/// A user model implements the accessors; password handling, the
/// authenticated/anonymous flags and the field metadata read by the
/// account-creation flows come for free.
///
/// # Examples
///
/// ```
/// use custom_user_auth::{Argon2Hasher, BaseUser};
/// use chrono::{DateTime, Utc};
///
/// struct Member {
///     email: String,
///     password: Option<String>,
///     last_login: Option<DateTime<Utc>>,
///     is_active: bool,
/// }
///
/// impl BaseUser for Member {
///     type Hasher = Argon2Hasher;
///
///     fn get_username_field() -> &'static str { "email" }
///     fn get_username(&self) -> &str { &self.email }
///     fn password_hash(&self) -> Option<&str> { self.password.as_deref() }
///     fn set_password_hash(&mut self, hash: String) { self.password = Some(hash); }
///     fn last_login(&self) -> Option<DateTime<Utc>> { self.last_login }
///     fn set_last_login(&mut self, time: DateTime<Utc>) { self.last_login = Some(time); }
///     fn is_active(&self) -> bool { self.is_active }
/// }
///
/// let mut member = Member {
///     email: "ada@example.com".to_string(),
///     password: None,
///     last_login: None,
///     is_active: true,
/// };
///
/// member.set_password("analytical-engine").unwrap();
/// assert!(member.check_password("analytical-engine").unwrap());
/// assert!(!member.check_password("difference-engine").unwrap());
///
/// member.set_unusable_password();
/// assert!(!member.has_usable_password());
/// ```
pub trait BaseUser: Send + Sync {
	/// Hasher used by the provided password methods.
	type Hasher: PasswordHasher + Default;

	/// Name of the field used as the login identifier.
	fn get_username_field() -> &'static str
	where
		Self: Sized;

	/// Name of the field holding the email address.
	fn get_email_field_name() -> &'static str
	where
		Self: Sized,
	{
		"email"
	}

	/// Fields prompted for when creating an account, besides the username
	/// field and the password.
	fn get_required_fields() -> &'static [&'static str]
	where
		Self: Sized,
	{
		&[]
	}

	/// Value of the login identifier.
	fn get_username(&self) -> &str;

	fn password_hash(&self) -> Option<&str>;

	fn set_password_hash(&mut self, hash: String);

	fn last_login(&self) -> Option<DateTime<Utc>>;

	fn set_last_login(&mut self, time: DateTime<Utc>);

	/// Whether the account may authenticate at all.
	fn is_active(&self) -> bool;

	/// Always true for a stored user.
	fn is_authenticated(&self) -> bool {
		true
	}

	/// Always false for a stored user.
	fn is_anonymous(&self) -> bool {
		false
	}

	/// Hashes `password` with `Self::Hasher` and stores the result.
	///
	/// A manager configured with another hasher must hash and verify
	/// through its own methods instead.
	fn set_password(&mut self, password: &str) -> Result<()> {
		let hash = hasher::make_password(&Self::Hasher::default(), Some(password))?;
		self.set_password_hash(hash);
		Ok(())
	}

	/// Marks the password as one that never verifies.
	fn set_unusable_password(&mut self) {
		self.set_password_hash(hasher::make_unusable_password());
	}

	fn has_usable_password(&self) -> bool {
		hasher::is_password_usable(self.password_hash())
	}

	/// Checks `password` against the stored hash with `Self::Hasher`.
	fn check_password(&self, password: &str) -> Result<bool> {
		hasher::check_password(&Self::Hasher::default(), password, self.password_hash())
	}
}
