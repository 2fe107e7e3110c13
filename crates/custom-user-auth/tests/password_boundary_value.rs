//! Password Boundary Value Tests
//!
//! Boundary values for the password helpers used by the user factory:
//! empty and very long passwords, non-ASCII input, and the unusable
//! password marker.

use custom_user_auth::{
	Argon2Hasher, PasswordHasher, UNUSABLE_PASSWORD_PREFIX, check_password, is_password_usable,
	make_password,
};
use rstest::*;

// =============================================================================
// Fixtures
// =============================================================================

#[fixture]
fn argon2_hasher() -> Argon2Hasher {
	Argon2Hasher::default()
}

// =============================================================================
// Boundary Value Tests - Password Length
// =============================================================================

#[rstest]
#[case("", "empty password")]
#[case("a", "single character")]
#[case("ab", "two characters")]
fn test_short_passwords_hash_and_verify(
	argon2_hasher: Argon2Hasher,
	#[case] password: &str,
	#[case] desc: &str,
) {
	let encoded = make_password(&argon2_hasher, Some(password)).unwrap();

	assert!(
		is_password_usable(Some(&encoded)),
		"Hash should be usable for {}",
		desc
	);
	assert!(
		check_password(&argon2_hasher, password, Some(&encoded)).unwrap(),
		"Password should verify for {}",
		desc
	);
}

#[rstest]
#[case(64)]
#[case(128)]
#[case(1024)]
fn test_long_passwords(argon2_hasher: Argon2Hasher, #[case] len: usize) {
	let password = "x".repeat(len);
	let encoded = argon2_hasher.hash(&password).unwrap();

	assert!(argon2_hasher.verify(&password, &encoded).unwrap());
	assert!(!argon2_hasher.verify(&"x".repeat(len - 1), &encoded).unwrap());
}

// =============================================================================
// Equivalence Partitioning - Character Classes
// =============================================================================

#[rstest]
#[case("pässwörd")]
#[case("パスワード")]
#[case("emoji 🔐 key")]
#[case("tab\tand\nnewline")]
fn test_non_ascii_passwords(argon2_hasher: Argon2Hasher, #[case] password: &str) {
	let encoded = argon2_hasher.hash(password).unwrap();

	assert!(argon2_hasher.verify(password, &encoded).unwrap());
}

// =============================================================================
// Unusable Passwords
// =============================================================================

#[rstest]
fn test_missing_password_never_verifies(argon2_hasher: Argon2Hasher) {
	let encoded = make_password(&argon2_hasher, None).unwrap();

	assert!(encoded.starts_with(UNUSABLE_PASSWORD_PREFIX));
	for attempt in ["", "!", encoded.as_str(), &encoded[1..]] {
		assert!(!check_password(&argon2_hasher, attempt, Some(&encoded)).unwrap());
	}
}

#[rstest]
fn test_unusable_passwords_are_unique(argon2_hasher: Argon2Hasher) {
	let first = make_password(&argon2_hasher, None).unwrap();
	let second = make_password(&argon2_hasher, None).unwrap();

	assert_ne!(first, second);
}
