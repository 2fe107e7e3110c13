use async_trait::async_trait;
use custom_user_exception::Result;

use crate::BaseUser;

/// BaseUserManager trait - the factory side of a user model
///
/// A manager validates the inputs of a new account, hashes its password,
/// persists it and hands it back. It is an explicit service object: callers
/// that create users receive one instead of reaching for a process-wide
/// default.
#[async_trait]
pub trait BaseUserManager<U: BaseUser>: Send + Sync {
	/// Field values of an account that does not exist yet.
	type NewUser: Send + 'static;

	/// Creates and saves a regular user.
	///
	/// A missing password leaves the account with an unusable password.
	async fn create_user(&self, new_user: Self::NewUser, password: Option<&str>) -> Result<U>;

	/// Creates and saves a user marked as staff and superuser.
	async fn create_superuser(&self, new_user: Self::NewUser, password: &str) -> Result<U>;

	/// Looks a user up by the value of its username field.
	async fn get_by_natural_key(&self, username: &str) -> Result<Option<U>>;

	/// Normalizes an email address by lowercasing its domain part.
	fn normalize_email(email: &str) -> String
	where
		Self: Sized,
	{
		normalize_email(email)
	}
}

/// Lowercases the domain part of an email address.
///
/// The local part is kept as typed since some mail servers treat it
/// case-sensitively. Surrounding whitespace is trimmed. A value without `@`
/// is returned unchanged.
///
/// # Examples
///
/// ```
/// use custom_user_auth::normalize_email;
///
/// assert_eq!(normalize_email("Ada.Lovelace@EXAMPLE.COM"), "Ada.Lovelace@example.com");
/// assert_eq!(normalize_email(" bob@Example.org "), "bob@example.org");
/// assert_eq!(normalize_email("not-an-email"), "not-an-email");
/// ```
pub fn normalize_email(email: &str) -> String {
	match email.trim().rsplit_once('@') {
		Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
		None => email.to_string(),
	}
}
