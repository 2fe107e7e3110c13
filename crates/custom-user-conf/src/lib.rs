//! # Custom User Conf
//!
//! Settings for the user administration tools and the logging setup that
//! goes with them.
//!
//! Settings come from a TOML file, `.env` and `CUSTOM_USER_*` environment
//! variables:
//!
//! ```toml
//! [database]
//! url = "sqlite://users.db?mode=rwc"
//! max_connections = 5
//!
//! [logging]
//! level = "info"
//! ansi = true
//! ```

pub mod logging;
pub mod settings;

pub use settings::{
	DATABASE_MAX_CONNECTIONS_VAR, DATABASE_URL_VAR, DatabaseSettings, LOG_LEVEL_VAR,
	LoggingSettings, Settings, SettingsError,
};
