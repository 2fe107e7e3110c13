//! Custom User Admin CLI
//!
//! Account management for the email-login user model.
//!
//! ## Usage
//!
//! ```bash
//! custom-user-admin migrate
//! custom-user-admin createsuperuser
//! custom-user-admin createsuperuser --noinput --email root@example.com \
//!     --username root --first-name Root --last-name User
//! custom-user-admin changepassword root@example.com
//! custom-user-admin --settings /etc/custom-user.toml migrate
//! ```

mod commands;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;
use custom_user_conf::{Settings, logging};
use custom_user_users::{SqliteUserStore, UserManager};

use commands::{CommandResult, CreateSuperuserArgs};

#[derive(Parser)]
#[command(name = "custom-user-admin")]
#[command(about = "User account administration utility", long_about = None)]
#[command(version)]
struct Cli {
	/// TOML settings file
	#[arg(long, global = true, value_name = "PATH")]
	settings: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Create the user table
	Migrate,

	/// Create a user with staff and superuser status
	Createsuperuser(CreateSuperuserArgs),

	/// Change the password of a user
	Changepassword {
		/// Email address of the user
		#[arg(value_name = "EMAIL")]
		email: String,
	},
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();

	if let Err(e) = run(cli).await {
		eprintln!("{}", style(format!("Error: {}", e)).red().bold());
		process::exit(1);
	}
}

async fn run(cli: Cli) -> CommandResult<()> {
	let settings = Settings::load(cli.settings.as_deref())?;
	logging::init(&settings.logging)?;

	let store = Arc::new(
		SqliteUserStore::connect(&settings.database.url, settings.database.max_connections)
			.await?,
	);
	let manager = UserManager::new(store.clone());

	match cli.command {
		Commands::Migrate => commands::migrate(&store).await,
		Commands::Createsuperuser(args) => commands::createsuperuser(&manager, args).await,
		Commands::Changepassword { email } => commands::changepassword(&manager, &email).await,
	}
}
