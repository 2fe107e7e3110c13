//! User Permission Tests
//!
//! The always-allow checks on [`User`] next to the model-level policy that
//! reads the user's permission data.

use std::sync::Arc;

use custom_user::{
	AllowAll, Authorization, BaseUserManager, InMemoryUserStore, ModelPermissions, NewUser, User,
	UserManager,
};
use rstest::*;

// =============================================================================
// Fixtures
// =============================================================================

#[fixture]
fn manager() -> UserManager {
	UserManager::new(Arc::new(InMemoryUserStore::new()))
}

async fn member(manager: &UserManager) -> User {
	let mut user = manager
		.create_user(
			NewUser::new("dorothy@vaughan.dev", "dvaughan", "Dorothy", "Vaughan"),
			None,
		)
		.await
		.unwrap();
	user.permissions.user_permissions = vec!["computing.run_fortran".to_string()];
	manager.save(&mut user).await.unwrap();
	user
}

// =============================================================================
// Decision Table - ModelPermissions
// =============================================================================

#[rstest]
#[case(true, false, "computing.run_fortran", None, true)]
#[case(true, false, "computing.fire_staff", None, false)]
#[case(true, false, "computing.run_fortran", Some("job-7"), false)]
#[case(true, true, "computing.fire_staff", None, true)]
#[case(true, true, "computing.fire_staff", Some("job-7"), true)]
#[case(false, true, "computing.run_fortran", None, false)]
#[case(false, false, "computing.run_fortran", None, false)]
#[tokio::test]
async fn test_model_permissions(
	manager: UserManager,
	#[case] is_active: bool,
	#[case] is_superuser: bool,
	#[case] perm: &str,
	#[case] obj: Option<&str>,
	#[case] expected: bool,
) {
	let mut user = member(&manager).await;
	user.is_active = is_active;
	user.permissions.is_superuser = is_superuser;

	assert_eq!(user.has_perm_with(&ModelPermissions, perm, obj), expected);
	assert!(user.has_perm(perm, obj));
}

#[rstest]
#[tokio::test]
async fn test_module_permissions(manager: UserManager) {
	let user = member(&manager).await;

	assert!(user.has_module_perms_with(&ModelPermissions, "computing"));
	assert!(!user.has_module_perms_with(&ModelPermissions, "comp"));
	assert!(!user.has_module_perms_with(&ModelPermissions, "admin"));
	assert!(user.has_module_perms("admin"));
}

#[rstest]
#[tokio::test]
async fn test_policies_as_trait_objects(manager: UserManager) {
	let user = member(&manager).await;
	let policies: [&dyn Authorization<User>; 2] = [&AllowAll, &ModelPermissions];

	let results: Vec<bool> = policies
		.iter()
		.map(|policy| policy.has_perms(&user, &["computing.run_fortran", "computing.audit"], None))
		.collect();

	assert_eq!(results, [true, false]);
}

// =============================================================================
// Display
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_display_follows_field_changes(manager: UserManager) {
	let mut user = member(&manager).await;

	user.first_name = "Dot".to_string();

	assert_eq!(user.get_full_name(), "Dot Vaughan");
	assert_eq!(format!("{}", user), "Dot Vaughan <dorothy@vaughan.dev>");
}
