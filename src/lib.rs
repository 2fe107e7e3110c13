//! # Custom User
//!
//! A user model that logs in with its email address instead of a username,
//! in the shape of a Django custom user.
//!
//! Accounts carry a username, a first and a last name, the `is_active`,
//! `is_staff` and `is_superuser` flags, a join date and an Argon2 password
//! hash. They are created through [`UserManager`], which validates the
//! required fields in order, normalizes the email domain and hashes the
//! password (or marks it unusable when none is given).
//!
//! ## Crates
//!
//! - [`exception`]: the shared [`Error`] type
//! - [`auth`]: password hashing, base user traits and authorization policies
//! - [`users`]: [`User`], [`UserManager`] and the stores
//! - [`conf`]: settings and logging setup (feature `conf`)
//!
//! ## Quick Start
//!
//! ```
//! use custom_user::{BaseUserManager, InMemoryUserStore, NewUser, UserManager};
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let manager = UserManager::new(Arc::new(InMemoryUserStore::new()));
//!
//! let user = manager
//!     .create_user(
//!         NewUser::new("katherine@NASA.gov", "kjohnson", "Katherine", "Johnson"),
//!         Some("trajectory"),
//!     )
//!     .await
//!     .unwrap();
//!
//! assert_eq!(user.to_string(), "Katherine Johnson <katherine@nasa.gov>");
//! assert!(user.has_perm("flight.compute", None));
//! # });
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `sqlite` | enabled | [`SqliteUserStore`] |
//! | `conf` | enabled | [`conf::Settings`] and logging initialisation |

pub use custom_user_auth as auth;
#[cfg(feature = "conf")]
pub use custom_user_conf as conf;
pub use custom_user_exception as exception;
pub use custom_user_users as users;

pub use custom_user_auth::{
	AllowAll, Argon2Hasher, Authorization, BaseUser, BaseUserManager, ModelPermissions,
	PasswordHasher, PermissionsMixin, normalize_email,
};
pub use custom_user_exception::{Error, Result};
#[cfg(feature = "sqlite")]
pub use custom_user_users::SqliteUserStore;
pub use custom_user_users::{
	InMemoryUserStore, NewUser, Permissions, REQUIRED_FIELDS, USERNAME_FIELD, User, UserManager,
	UserStore,
};
