use custom_user_exception::{Error, Result};
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Prefix marking a stored password that can never be verified.
pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

/// Number of random characters appended to [`UNUSABLE_PASSWORD_PREFIX`].
pub const UNUSABLE_PASSWORD_SUFFIX_LENGTH: usize = 40;

/// Password hasher trait
///
/// Implement this trait to plug a custom one-way hashing algorithm into the
/// user factory.
///
/// # Examples
///
/// ```
/// use custom_user_auth::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new();
/// let hash = hasher.hash("my_secure_password").unwrap();
///
/// assert!(hasher.verify("my_secure_password", &hash).unwrap());
/// assert!(!hasher.verify("wrong_password", &hash).unwrap());
/// ```
pub trait PasswordHasher: Send + Sync {
	/// Hashes a plaintext password into an encoded string.
	fn hash(&self, password: &str) -> Result<String>;

	/// Verifies a plaintext password against an encoded hash.
	///
	/// Returns `Ok(false)` on mismatch and an error only when the hash
	/// itself cannot be parsed.
	fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Argon2id password hasher
///
/// Produces PHC strings (`$argon2id$v=19$...`) with a fresh random salt for
/// every call.
#[cfg(feature = "argon2-hasher")]
#[derive(Debug, Clone, Copy)]
pub struct Argon2Hasher;

#[cfg(feature = "argon2-hasher")]
impl Argon2Hasher {
	/// Creates a new Argon2 password hasher
	pub fn new() -> Self {
		Self
	}
}

#[cfg(feature = "argon2-hasher")]
impl Default for Argon2Hasher {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(feature = "argon2-hasher")]
impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> Result<String> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHasher as _, SaltString, rand_core::OsRng},
		};

		let salt = SaltString::generate(&mut OsRng);

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| Error::PasswordHash(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHash, PasswordVerifier},
		};

		let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::PasswordHash(e.to_string()))?;

		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed_hash)
			.is_ok())
	}
}

/// Builds an unusable password: the prefix followed by random alphanumerics.
pub fn make_unusable_password() -> String {
	let suffix: String = rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(UNUSABLE_PASSWORD_SUFFIX_LENGTH)
		.map(char::from)
		.collect();
	format!("{}{}", UNUSABLE_PASSWORD_PREFIX, suffix)
}

/// Encodes a password for storage.
///
/// `None` yields an unusable password that no plaintext will ever match.
pub fn make_password<H>(hasher: &H, password: Option<&str>) -> Result<String>
where
	H: PasswordHasher + ?Sized,
{
	match password {
		Some(raw) => hasher.hash(raw),
		None => Ok(make_unusable_password()),
	}
}

/// Whether an encoded password can ever be verified.
pub fn is_password_usable(encoded: Option<&str>) -> bool {
	match encoded {
		Some(encoded) => !encoded.is_empty() && !encoded.starts_with(UNUSABLE_PASSWORD_PREFIX),
		None => false,
	}
}

/// Checks a plaintext password against an encoded one.
///
/// Unusable or missing encodings never match and never reach the hasher.
pub fn check_password<H>(hasher: &H, password: &str, encoded: Option<&str>) -> Result<bool>
where
	H: PasswordHasher + ?Sized,
{
	match encoded {
		Some(encoded) if is_password_usable(Some(encoded)) => hasher.verify(password, encoded),
		_ => Ok(false),
	}
}

#[cfg(all(test, feature = "argon2-hasher"))]
mod tests {
	use super::*;
	use rstest::*;

	#[fixture]
	fn hasher() -> Argon2Hasher {
		Argon2Hasher::new()
	}

	#[rstest]
	fn test_hash_is_phc_string(hasher: Argon2Hasher) {
		let hash = hasher.hash("correct horse").unwrap();

		assert!(hash.starts_with("$argon2id$"));
		assert!(hasher.verify("correct horse", &hash).unwrap());
	}

	#[rstest]
	fn test_same_password_gets_distinct_salts(hasher: Argon2Hasher) {
		let first = hasher.hash("password").unwrap();
		let second = hasher.hash("password").unwrap();

		assert_ne!(first, second);
	}

	#[rstest]
	fn test_verify_rejects_malformed_hash(hasher: Argon2Hasher) {
		let result = hasher.verify("password", "not-a-phc-string");

		assert!(matches!(result, Err(Error::PasswordHash(_))));
	}

	#[rstest]
	fn test_unusable_password_shape() {
		let encoded = make_unusable_password();

		assert!(encoded.starts_with(UNUSABLE_PASSWORD_PREFIX));
		assert_eq!(encoded.len(), 1 + UNUSABLE_PASSWORD_SUFFIX_LENGTH);
		assert!(!is_password_usable(Some(&encoded)));
	}

	#[rstest]
	fn test_make_password_without_raw_is_unusable(hasher: Argon2Hasher) {
		let encoded = make_password(&hasher, None).unwrap();

		assert!(!is_password_usable(Some(&encoded)));
		assert!(!check_password(&hasher, "", Some(&encoded)).unwrap());
		assert!(!check_password(&hasher, &encoded, Some(&encoded)).unwrap());
	}

	#[rstest]
	#[case(None, false)]
	#[case(Some(""), false)]
	#[case(Some("!abc"), false)]
	#[case(Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"), true)]
	fn test_is_password_usable(#[case] encoded: Option<&str>, #[case] expected: bool) {
		assert_eq!(is_password_usable(encoded), expected);
	}

	#[rstest]
	fn test_check_password_through_trait_object(hasher: Argon2Hasher) {
		let dyn_hasher: &dyn PasswordHasher = &hasher;
		let encoded = make_password(dyn_hasher, Some("s3cret")).unwrap();

		assert!(check_password(dyn_hasher, "s3cret", Some(&encoded)).unwrap());
		assert!(!check_password(dyn_hasher, "S3cret", Some(&encoded)).unwrap());
	}
}
