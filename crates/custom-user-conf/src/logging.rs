//! Console logging for the command-line tools.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::settings::{LoggingSettings, SettingsError};

/// Builds the filter: `RUST_LOG` when it is set, otherwise `logging.level`.
pub fn build_filter(
	settings: &LoggingSettings,
	rust_log: Option<&str>,
) -> Result<EnvFilter, SettingsError> {
	let (key, directive) = match rust_log {
		Some(directive) if !directive.trim().is_empty() => ("RUST_LOG", directive),
		_ => ("logging.level", settings.level.as_str()),
	};

	EnvFilter::try_new(directive).map_err(|e| SettingsError::InvalidValue {
		key: key.to_string(),
		message: e.to_string(),
	})
}

/// Installs the global subscriber.
///
/// Does nothing if a subscriber is already installed.
pub fn init(settings: &LoggingSettings) -> Result<(), SettingsError> {
	let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
	let filter = build_filter(settings, rust_log.as_deref())?;

	let _ = tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_ansi(settings.ansi)
				.with_target(false),
		)
		.try_init();
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("info", None, "info")]
	#[case("info", Some("debug"), "debug")]
	#[case("info", Some("  "), "info")]
	#[case("custom_user_users=trace", None, "custom_user_users=trace")]
	fn test_filter_source(
		#[case] level: &str,
		#[case] rust_log: Option<&str>,
		#[case] expected: &str,
	) {
		let settings = LoggingSettings {
			level: level.to_string(),
			ansi: false,
		};

		let filter = build_filter(&settings, rust_log).unwrap();

		assert_eq!(filter.to_string(), expected);
	}

	#[rstest]
	fn test_invalid_level_is_rejected() {
		let settings = LoggingSettings {
			level: "custom_user=notalevel".to_string(),
			ansi: false,
		};

		let error = build_filter(&settings, None).unwrap_err();

		assert!(matches!(error, SettingsError::InvalidValue { ref key, .. } if key == "logging.level"));
	}
}
