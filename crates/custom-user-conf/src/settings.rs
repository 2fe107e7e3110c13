//! Settings file, `.env` and environment overrides.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, variables from
//! `.env`, the process environment. `.env` never overwrites a variable that is
//! already set.

use std::ffi::OsString;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "CUSTOM_USER_";

pub const DATABASE_URL_VAR: &str = "CUSTOM_USER_DATABASE_URL";
pub const DATABASE_MAX_CONNECTIONS_VAR: &str = "CUSTOM_USER_DATABASE_MAX_CONNECTIONS";
pub const LOG_LEVEL_VAR: &str = "CUSTOM_USER_LOG_LEVEL";

pub const DEFAULT_DATABASE_URL: &str = "sqlite://users.db?mode=rwc";

/// Errors raised while loading settings
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },
}

/// Top-level settings of the user tools
///
/// # Examples
///
/// ```
/// use custom_user_conf::Settings;
///
/// let settings = Settings::from_toml_str(
///     r#"
///     [database]
///     url = "sqlite::memory:"
///
///     [logging]
///     level = "debug"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(settings.database.url, "sqlite::memory:");
/// assert_eq!(settings.database.max_connections, 5);
/// assert_eq!(settings.logging.level, "debug");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
	pub database: DatabaseSettings,
	pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSettings {
	/// sqlx connection URL
	pub url: String,
	pub max_connections: u32,
}

impl Default for DatabaseSettings {
	fn default() -> Self {
		Self {
			url: DEFAULT_DATABASE_URL.to_string(),
			max_connections: 5,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
	/// `EnvFilter` directive, e.g. `info` or `custom_user_users=debug`
	pub level: String,
	/// Colour the console output
	pub ansi: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			ansi: true,
		}
	}
}

impl Settings {
	pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(contents)?;
		settings.validate()?;
		Ok(settings)
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let contents = std::fs::read_to_string(path)?;
		debug!(path = %path.display(), "read settings file");
		Self::from_toml_str(&contents)
	}

	/// Loads settings the way the command-line tools do.
	///
	/// Reads `.env` from the working directory if present, then the TOML file
	/// at `path` (defaults when `None`), then applies `CUSTOM_USER_*`
	/// variables from the environment.
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		dotenv::dotenv().ok();

		let mut settings = match path {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};
		settings.apply_env_overrides(unicode_vars(std::env::vars_os()))?;
		Ok(settings)
	}

	/// Applies `CUSTOM_USER_*` overrides from `vars`.
	///
	/// Variables outside the prefix are ignored; unknown ones inside it are
	/// ignored as well.
	pub fn apply_env_overrides<I, K, V>(&mut self, vars: I) -> Result<(), SettingsError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		for (key, value) in vars {
			let key = key.as_ref();
			if !key.starts_with(ENV_PREFIX) {
				continue;
			}
			match key {
				DATABASE_URL_VAR => self.database.url = value.into(),
				DATABASE_MAX_CONNECTIONS_VAR => {
					let value = value.into();
					self.database.max_connections =
						value.trim().parse().map_err(|_| SettingsError::InvalidValue {
							key: key.to_string(),
							message: format!("expected a positive integer, got {:?}", value),
						})?;
				}
				LOG_LEVEL_VAR => self.logging.level = value.into(),
				_ => continue,
			}
			debug!(variable = key, "applied environment override");
		}
		self.validate()
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.database.url.trim().is_empty() {
			return Err(SettingsError::InvalidValue {
				key: "database.url".to_string(),
				message: "must not be empty".to_string(),
			});
		}
		if self.database.max_connections == 0 {
			return Err(SettingsError::InvalidValue {
				key: "database.max_connections".to_string(),
				message: "must be at least 1".to_string(),
			});
		}
		Ok(())
	}
}

/// Keeps the variables whose name and value are valid Unicode.
fn unicode_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
	I: IntoIterator<Item = (OsString, OsString)>,
{
	vars.into_iter()
		.filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}
