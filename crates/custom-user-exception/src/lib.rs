//! # Custom User Exception
//!
//! Error types shared by every crate of the custom user model.
//!
//! Creation either fully succeeds or fails before anything is written, so
//! every variant here describes a failure that left the backing store
//! untouched, except [`Error::UniqueViolation`] and [`Error::Database`],
//! which are reported by the store itself when it refuses a write.

use thiserror::Error;

/// Errors raised by the user factory, the stores and the password hasher.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// A required field was empty when the factory was called.
	#[error("{message}")]
	MissingField {
		/// Name of the offending field.
		field: &'static str,
		/// User-facing message for that field.
		message: &'static str,
	},

	/// A field exceeds the width of its column.
	#[error("Ensure {field} has at most {max_length} characters")]
	FieldTooLong {
		/// Name of the offending field.
		field: &'static str,
		/// Maximum number of characters accepted.
		max_length: usize,
	},

	/// The backing store refused a duplicate value for a unique column.
	#[error("A user with that {field} already exists")]
	UniqueViolation {
		/// Column holding the duplicate value.
		field: String,
	},

	/// A lookup that had to find a record found nothing.
	#[error("Not found: {0}")]
	NotFound(String),

	/// The password hasher failed.
	#[error("Password hashing error: {0}")]
	PasswordHash(String),

	/// Any other backing-store failure.
	#[error("Database error: {0}")]
	Database(String),

	/// Invalid configuration.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

impl Error {
	/// Returns the field this error is about, when there is one.
	pub fn field(&self) -> Option<&str> {
		match self {
			Error::MissingField { field, .. } | Error::FieldTooLong { field, .. } => Some(*field),
			Error::UniqueViolation { field } => Some(field.as_str()),
			_ => None,
		}
	}

	/// Whether the error came from input validation rather than from a collaborator.
	pub fn is_validation(&self) -> bool {
		matches!(
			self,
			Error::MissingField { .. } | Error::FieldTooLong { .. }
		)
	}
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_missing_field_displays_its_message() {
		let error = Error::MissingField {
			field: "email",
			message: "User must have an email address!",
		};
		assert_eq!(error.to_string(), "User must have an email address!");
		assert_eq!(error.field(), Some("email"));
		assert!(error.is_validation());
	}

	#[rstest]
	fn test_field_too_long_message() {
		let error = Error::FieldTooLong {
			field: "username",
			max_length: 20,
		};
		assert_eq!(
			error.to_string(),
			"Ensure username has at most 20 characters"
		);
		assert!(error.is_validation());
	}

	#[rstest]
	fn test_unique_violation_is_not_validation() {
		let error = Error::UniqueViolation {
			field: "email".to_string(),
		};
		assert_eq!(error.to_string(), "A user with that email already exists");
		assert_eq!(error.field(), Some("email"));
		assert!(!error.is_validation());
	}

	#[rstest]
	#[case(Error::NotFound("user".to_string()), "Not found: user")]
	#[case(Error::PasswordHash("bad salt".to_string()), "Password hashing error: bad salt")]
	#[case(Error::Database("locked".to_string()), "Database error: locked")]
	#[case(Error::Configuration("bad url".to_string()), "Configuration error: bad url")]
	fn test_other_variants_display(#[case] error: Error, #[case] expected: &str) {
		assert_eq!(error.to_string(), expected);
		assert_eq!(error.field(), None);
	}
}
