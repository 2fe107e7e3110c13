use super::{BaseUser, PermissionsMixin};

/// Authorization policy
///
/// Answers "does this principal hold permission X (optionally on an
/// object)?" and "does it hold any permission on application M?".
/// Policies are plain values so a deployment can swap one for another
/// without touching the user model.
pub trait Authorization<U: ?Sized>: Send + Sync {
	/// Checks a single permission, optionally scoped to the object with the
	/// given key.
	fn has_perm(&self, user: &U, perm: &str, obj: Option<&str>) -> bool;

	/// Checks several permissions at once.
	fn has_perms(&self, user: &U, perms: &[&str], obj: Option<&str>) -> bool {
		perms.iter().all(|perm| self.has_perm(user, perm, obj))
	}

	/// Checks whether any permission is held on the application `app_label`.
	fn has_module_perms(&self, user: &U, app_label: &str) -> bool;
}

/// Grants everything to everyone
///
/// This is the stand-in policy behind `has_perm` / `has_module_perms` on
/// the user model: no actual authorization happens. Deployments that need
/// real checks should use [`ModelPermissions`] or their own policy.
///
/// # Examples
///
/// ```
/// use custom_user_auth::{AllowAll, Authorization};
///
/// struct Anyone;
///
/// assert!(AllowAll.has_perm(&Anyone, "", None));
/// assert!(AllowAll.has_perm(&Anyone, "blog.delete_post", Some("42")));
/// assert!(AllowAll.has_module_perms(&Anyone, "billing"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl<U: ?Sized> Authorization<U> for AllowAll {
	fn has_perm(&self, _user: &U, _perm: &str, _obj: Option<&str>) -> bool {
		true
	}

	fn has_module_perms(&self, _user: &U, _app_label: &str) -> bool {
		true
	}
}

/// Model-level permission policy
///
/// - inactive principals hold nothing
/// - active superusers hold everything, object-scoped or not
/// - otherwise a permission is held when it is among the principal's
///   permissions; object-scoped checks are not resolved at model level
///   and answer no
/// - module permissions are held when any permission starts with
///   `"<app_label>."`
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelPermissions;

impl<U> Authorization<U> for ModelPermissions
where
	U: BaseUser + PermissionsMixin,
{
	fn has_perm(&self, user: &U, perm: &str, obj: Option<&str>) -> bool {
		if !user.is_active() {
			return false;
		}
		if user.is_superuser() {
			return true;
		}
		if obj.is_some() {
			return false;
		}
		user.get_all_permissions().contains(perm)
	}

	fn has_module_perms(&self, user: &U, app_label: &str) -> bool {
		if !user.is_active() {
			return false;
		}
		if user.is_superuser() {
			return true;
		}
		let prefix = format!("{}.", app_label);
		user.get_all_permissions()
			.iter()
			.any(|p| p.starts_with(&prefix))
	}
}

#[cfg(all(test, feature = "argon2-hasher"))]
mod tests {
	use super::*;
	use crate::Argon2Hasher;
	use chrono::{DateTime, Utc};
	use rstest::*;

	struct Principal {
		is_active: bool,
		is_superuser: bool,
		user_permissions: Vec<String>,
		groups: Vec<String>,
	}

	impl BaseUser for Principal {
		type Hasher = Argon2Hasher;

		fn get_username_field() -> &'static str {
			"email"
		}

		fn get_username(&self) -> &str {
			"principal@example.com"
		}

		fn password_hash(&self) -> Option<&str> {
			None
		}

		fn set_password_hash(&mut self, _hash: String) {}

		fn last_login(&self) -> Option<DateTime<Utc>> {
			None
		}

		fn set_last_login(&mut self, _time: DateTime<Utc>) {}

		fn is_active(&self) -> bool {
			self.is_active
		}
	}

	impl PermissionsMixin for Principal {
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

	fn principal(is_active: bool, is_superuser: bool) -> Principal {
		Principal {
			is_active,
			is_superuser,
			user_permissions: vec!["blog.add_post".to_string()],
			groups: vec![],
		}
	}

	#[rstest]
	#[case(true, false, "blog.add_post", None, true)]
	#[case(true, false, "blog.delete_post", None, false)]
	#[case(true, false, "blog.add_post", Some("7"), false)]
	#[case(true, true, "blog.delete_post", None, true)]
	#[case(true, true, "blog.delete_post", Some("7"), true)]
	#[case(false, true, "blog.add_post", None, false)]
	#[case(false, false, "blog.add_post", None, false)]
	fn test_model_permissions_has_perm(
		#[case] is_active: bool,
		#[case] is_superuser: bool,
		#[case] perm: &str,
		#[case] obj: Option<&str>,
		#[case] expected: bool,
	) {
		let user = principal(is_active, is_superuser);

		assert_eq!(ModelPermissions.has_perm(&user, perm, obj), expected);
	}

	#[rstest]
	#[case(true, false, "blog", true)]
	#[case(true, false, "bl", false)]
	#[case(true, false, "shop", false)]
	#[case(true, true, "shop", true)]
	#[case(false, true, "blog", false)]
	fn test_model_permissions_has_module_perms(
		#[case] is_active: bool,
		#[case] is_superuser: bool,
		#[case] app_label: &str,
		#[case] expected: bool,
	) {
		let user = principal(is_active, is_superuser);

		assert_eq!(ModelPermissions.has_module_perms(&user, app_label), expected);
	}

	#[rstest]
	fn test_has_perms_requires_every_permission() {
		let user = principal(true, false);

		assert!(ModelPermissions.has_perms(&user, &["blog.add_post"], None));
		assert!(!ModelPermissions.has_perms(&user, &["blog.add_post", "blog.delete_post"], None));
		assert!(ModelPermissions.has_perms(&user, &[], None));
	}

	#[rstest]
	#[case("")]
	#[case("blog.add_post")]
	#[case("anything at all")]
	fn test_allow_all_ignores_input(#[case] perm: &str) {
		let inactive = principal(false, false);

		assert!(AllowAll.has_perm(&inactive, perm, None));
		assert!(AllowAll.has_perm(&inactive, perm, Some("1")));
		assert!(AllowAll.has_module_perms(&inactive, perm));
	}
}
