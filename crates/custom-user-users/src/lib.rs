//! # Custom User Users
//!
//! A user model that logs in with its email address, the manager that
//! creates it, and the stores that persist it.
//!
//! ## Overview
//!
//! - [`User`]: the account record, with display helpers and permission checks
//! - [`NewUser`]: the required fields of an account to be created
//! - [`UserManager`]: the factory ([`BaseUserManager`]) plus lookups,
//!   authentication and password changes
//! - [`UserStore`]: persistence, with [`InMemoryUserStore`] and, behind the
//!   `sqlite` feature, [`SqliteUserStore`]
//!
//! ## Quick Start
//!
//! ```
//! use custom_user_users::{BaseUserManager, InMemoryUserStore, NewUser, UserManager};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let manager = UserManager::new(Arc::new(InMemoryUserStore::new()));
//!
//! let error = manager
//!     .create_user(NewUser::new("", "ada", "Ada", "Lovelace"), None)
//!     .await
//!     .unwrap_err();
//! assert_eq!(error.to_string(), "User must have an email address!");
//! # });
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `sqlite` | enabled | [`SqliteUserStore`] via sqlx and sea-query |

pub mod manager;
pub mod models;
pub mod store;

pub use custom_user_auth::{BaseUser, BaseUserManager, PermissionsMixin};
pub use manager::UserManager;
pub use models::{
	EMAIL_FIELD, EMAIL_MAX_LENGTH, NAME_MAX_LENGTH, NewUser, Permissions, REQUIRED_FIELDS,
	USERNAME_FIELD, USERNAME_MAX_LENGTH, User,
};
pub use store::InMemoryUserStore;
#[cfg(feature = "sqlite")]
pub use store::SqliteUserStore;
pub use store::UserStore;
