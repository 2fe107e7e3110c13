//! # Custom User Auth
//!
//! Authentication building blocks for the custom user model.
//!
//! ## Architecture
//!
//! - [`core`]: password hashing, the [`BaseUser`] and [`PermissionsMixin`]
//!   traits, and the [`Authorization`] policies
//! - [`base_user_manager`]: the [`BaseUserManager`] factory trait and email
//!   normalization
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `argon2-hasher` | enabled | Argon2id password hashing |

pub mod base_user_manager;
pub mod core;

pub use base_user_manager::{BaseUserManager, normalize_email};
#[cfg(feature = "argon2-hasher")]
pub use core::Argon2Hasher;
pub use core::{
	AllowAll, Authorization, BaseUser, ModelPermissions, PasswordHasher, PermissionsMixin,
	UNUSABLE_PASSWORD_PREFIX, check_password, is_password_usable, make_password,
	make_unusable_password,
};
