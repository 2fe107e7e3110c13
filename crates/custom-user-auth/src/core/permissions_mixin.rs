use std::collections::HashSet;

/// PermissionsMixin trait - the permission capability of a principal
///
/// Exposes the superuser flag, the directly assigned permissions and the
/// group memberships. It answers no authorization question by itself; that
/// is the job of an [`Authorization`](super::Authorization) policy, so the
/// data and the decision stay separately owned.
///
/// Permissions are strings in the format `"app_label.codename"`
/// (e.g. `"blog.add_post"`).
///
/// # Examples
///
/// ```
/// use custom_user_auth::PermissionsMixin;
///
/// struct Grants {
///     is_superuser: bool,
///     user_permissions: Vec<String>,
///     groups: Vec<String>,
/// }
///
/// impl PermissionsMixin for Grants {
///     fn is_superuser(&self) -> bool { self.is_superuser }
///     fn user_permissions(&self) -> &[String] { &self.user_permissions }
///     fn groups(&self) -> &[String] { &self.groups }
/// }
///
/// let grants = Grants {
///     is_superuser: false,
///     user_permissions: vec!["blog.add_post".to_string()],
///     groups: vec!["editors".to_string()],
/// };
///
/// assert!(grants.get_all_permissions().contains("blog.add_post"));
/// assert!(grants.get_group_permissions().is_empty());
/// ```
pub trait PermissionsMixin: Send + Sync {
	/// Returns whether this principal is a superuser
	fn is_superuser(&self) -> bool;

	/// Returns the permissions directly assigned to this principal
	fn user_permissions(&self) -> &[String];

	/// Returns the groups this principal belongs to
	fn groups(&self) -> &[String];

	/// Returns all permissions directly assigned to this principal
	fn get_user_permissions(&self) -> HashSet<String> {
		self.user_permissions().iter().cloned().collect()
	}

	/// Returns the permissions inherited from groups
	///
	/// Group permission resolution is owned by the surrounding framework;
	/// the default resolves nothing.
	fn get_group_permissions(&self) -> HashSet<String> {
		HashSet::new()
	}

	/// Returns user permissions plus group permissions
	fn get_all_permissions(&self) -> HashSet<String> {
		let mut perms = self.get_user_permissions();
		perms.extend(self.get_group_permissions());
		perms
	}
}
