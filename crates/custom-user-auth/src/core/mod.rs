//! Core authentication traits, password hashing and authorization policies.

pub mod authorization;
pub mod base_user;
pub mod hasher;
pub mod permissions_mixin;

pub use authorization::{AllowAll, Authorization, ModelPermissions};
pub use base_user::BaseUser;
#[cfg(feature = "argon2-hasher")]
pub use hasher::Argon2Hasher;
pub use hasher::{
	PasswordHasher, UNUSABLE_PASSWORD_PREFIX, UNUSABLE_PASSWORD_SUFFIX_LENGTH, check_password,
	is_password_usable, make_password, make_unusable_password,
};
pub use permissions_mixin::PermissionsMixin;
