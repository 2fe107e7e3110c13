//! The user model and the values needed to create one.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use custom_user_auth::{AllowAll, Argon2Hasher, Authorization, BaseUser, PermissionsMixin};
use custom_user_exception::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Field used as the login identifier.
pub const USERNAME_FIELD: &str = "email";

/// Field holding the email address.
pub const EMAIL_FIELD: &str = "email";

/// Fields prompted for when creating an account, besides the login
/// identifier and the password.
pub const REQUIRED_FIELDS: &[&str] = &["username", "first_name", "last_name"];

pub const EMAIL_MAX_LENGTH: usize = 60;
pub const USERNAME_MAX_LENGTH: usize = 20;
pub const NAME_MAX_LENGTH: usize = 30;

/// Permission data of a user: the superuser flag, direct permissions and
/// group memberships.
///
/// Owned by the user record but kept apart from it so that authorization
/// policies only ever see this capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
	/// Grants every permission under model-level policies.
	pub is_superuser: bool,
	/// Permissions in `app_label.codename` form.
	pub user_permissions: Vec<String>,
	pub groups: Vec<String>,
}

impl PermissionsMixin for Permissions {
	fn is_superuser(&self) -> bool {
		self.is_superuser
	}

	fn user_permissions(&self) -> &[String] {
		&self.user_permissions
	}

	fn groups(&self) -> &[String] {
		&self.groups
	}
}

/// An authenticated principal that logs in with its email address.
///
/// Records are created through [`UserManager`](crate::UserManager), changed
/// by assigning fields and calling [`UserManager::save`](crate::UserManager::save),
/// and soft-disabled by clearing `is_active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: Uuid,
	pub email: String,
	pub username: String,
	pub first_name: String,
	pub last_name: String,
	#[serde(skip_serializing, default)]
	pub(crate) password: String,
	pub last_login: Option<DateTime<Utc>>,
	/// Unset this instead of deleting accounts.
	pub is_active: bool,
	/// Whether the user can log into the administrative console.
	pub is_staff: bool,
	pub permissions: Permissions,
	pub(crate) date_joined: DateTime<Utc>,
}

impl User {
	/// Builds a fresh, not yet persisted record with the model defaults.
	///
	/// The password starts out empty, which is not a usable encoding.
	/// `date_joined` is kept to whole microseconds, the precision stores
	/// persist.
	pub(crate) fn new(new_user: NewUser) -> Self {
		Self {
			id: Uuid::new_v4(),
			email: new_user.email,
			username: new_user.username,
			first_name: new_user.first_name,
			last_name: new_user.last_name,
			password: String::new(),
			last_login: None,
			is_active: true,
			is_staff: false,
			permissions: Permissions::default(),
			date_joined: Utc::now().trunc_subsecs(6),
		}
	}

	/// Moment the record was created.
	pub fn date_joined(&self) -> DateTime<Utc> {
		self.date_joined
	}

	/// Returns the first name and the last name separated by a space.
	pub fn get_full_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name)
	}

	pub fn get_short_name(&self) -> &str {
		&self.first_name
	}

	/// Does the user have a specific permission?
	///
	/// Always yes: this is a stand-in until a real policy is wired in. Use
	/// [`has_perm_with`](Self::has_perm_with) to ask an actual policy.
	pub fn has_perm(&self, perm: &str, obj: Option<&str>) -> bool {
		self.has_perm_with(&AllowAll, perm, obj)
	}

	/// Does the user have permissions to view the app `app_label`?
	///
	/// Always yes, see [`has_perm`](Self::has_perm).
	pub fn has_module_perms(&self, app_label: &str) -> bool {
		self.has_module_perms_with(&AllowAll, app_label)
	}

	/// Asks `policy` whether the user holds `perm`.
	pub fn has_perm_with<A>(&self, policy: &A, perm: &str, obj: Option<&str>) -> bool
	where
		A: Authorization<Self>,
	{
		policy.has_perm(self, perm, obj)
	}

	/// Asks `policy` whether the user holds any permission on `app_label`.
	pub fn has_module_perms_with<A>(&self, policy: &A, app_label: &str) -> bool
	where
		A: Authorization<Self>,
	{
		policy.has_module_perms(self, app_label)
	}
}

impl fmt::Display for User {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} <{}>", self.get_full_name(), self.email)
	}
}

impl BaseUser for User {
	type Hasher = Argon2Hasher;

	fn get_username_field() -> &'static str {
		USERNAME_FIELD
	}

	fn get_email_field_name() -> &'static str {
		EMAIL_FIELD
	}

	fn get_required_fields() -> &'static [&'static str] {
		REQUIRED_FIELDS
	}

	fn get_username(&self) -> &str {
		&self.email
	}

	fn password_hash(&self) -> Option<&str> {
		Some(&self.password)
	}

	fn set_password_hash(&mut self, hash: String) {
		self.password = hash;
	}

	fn last_login(&self) -> Option<DateTime<Utc>> {
		self.last_login
	}

	fn set_last_login(&mut self, time: DateTime<Utc>) {
		self.last_login = Some(time);
	}

	fn is_active(&self) -> bool {
		self.is_active
	}
}

impl PermissionsMixin for User {
	fn is_superuser(&self) -> bool {
		self.permissions.is_superuser()
	}

	fn user_permissions(&self) -> &[String] {
		self.permissions.user_permissions()
	}

	fn groups(&self) -> &[String] {
		self.permissions.groups()
	}

	fn get_group_permissions(&self) -> std::collections::HashSet<String> {
		self.permissions.get_group_permissions()
	}
}

/// Field values of an account that does not exist yet.
///
/// # Examples
///
/// ```
/// use custom_user_users::NewUser;
///
/// let new_user = NewUser::new("ada@example.com", "ada", "Ada", "Lovelace");
/// assert!(new_user.validate().is_ok());
///
/// let nameless = NewUser::new("ada@example.com", "ada", "", "Lovelace");
/// assert_eq!(
///     nameless.validate().unwrap_err().to_string(),
///     "User must have a first name!"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
	pub email: String,
	pub username: String,
	pub first_name: String,
	pub last_name: String,
}

impl NewUser {
	pub fn new(
		email: impl Into<String>,
		username: impl Into<String>,
		first_name: impl Into<String>,
		last_name: impl Into<String>,
	) -> Self {
		Self {
			email: email.into(),
			username: username.into(),
			first_name: first_name.into(),
			last_name: last_name.into(),
		}
	}

	/// Checks presence, then length, of every field.
	///
	/// Fields are checked in the order email, username, first name, last
	/// name, and the first failure is returned.
	pub fn validate(&self) -> Result<()> {
		self.require_fields()?;
		self.check_lengths()
	}

	fn presence_checks(&self) -> [(&'static str, &String, &'static str); 4] {
		[
			("email", &self.email, "User must have an email address!"),
			("username", &self.username, "User must have an username!"),
			("first_name", &self.first_name, "User must have a first name!"),
			("last_name", &self.last_name, "User must have a last name!"),
		]
	}

	pub(crate) fn require_fields(&self) -> Result<()> {
		require(self.presence_checks())
	}

	/// Presence of the login identifier and the username only.
	pub(crate) fn require_login_fields(&self) -> Result<()> {
		require(self.presence_checks().into_iter().take(2))
	}

	pub(crate) fn check_lengths(&self) -> Result<()> {
		let limits = [
			("email", &self.email, EMAIL_MAX_LENGTH),
			("username", &self.username, USERNAME_MAX_LENGTH),
			("first_name", &self.first_name, NAME_MAX_LENGTH),
			("last_name", &self.last_name, NAME_MAX_LENGTH),
		];
		for (field, value, max_length) in limits {
			if value.chars().count() > max_length {
				return Err(Error::FieldTooLong { field, max_length });
			}
		}
		Ok(())
	}
}

fn require<'a>(
	checks: impl IntoIterator<Item = (&'static str, &'a String, &'static str)>,
) -> Result<()> {
	for (field, value, message) in checks {
		if value.is_empty() {
			return Err(Error::MissingField { field, message });
		}
	}
	Ok(())
}
