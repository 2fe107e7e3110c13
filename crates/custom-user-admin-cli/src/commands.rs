//! The `migrate`, `createsuperuser` and `changepassword` commands.

use clap::Args;
use console::style;
use custom_user_conf::SettingsError;
use custom_user_users::{
	BaseUserManager, EMAIL_MAX_LENGTH, NAME_MAX_LENGTH, NewUser, SqliteUserStore,
	USERNAME_MAX_LENGTH, User, UserManager,
};
use dialoguer::{Confirm, Input, Password};
use thiserror::Error;
use tracing::info;

/// Environment variable read by `createsuperuser --noinput`.
pub const SUPERUSER_PASSWORD_VAR: &str = "CUSTOM_USER_SUPERUSER_PASSWORD";

#[derive(Debug, Error)]
pub enum CommandError {
	#[error(transparent)]
	Settings(#[from] SettingsError),

	#[error(transparent)]
	User(#[from] custom_user_exception::Error),

	#[error("Prompt failed: {0}")]
	Prompt(#[from] dialoguer::Error),

	#[error("{0}")]
	Usage(String),
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Args, Debug, Default)]
pub struct CreateSuperuserArgs {
	/// Email address, also used to log in
	#[arg(long, value_name = "EMAIL")]
	pub email: Option<String>,

	#[arg(long, value_name = "USERNAME")]
	pub username: Option<String>,

	#[arg(long, value_name = "FIRST_NAME")]
	pub first_name: Option<String>,

	#[arg(long, value_name = "LAST_NAME")]
	pub last_name: Option<String>,

	/// Do not prompt; the password is read from CUSTOM_USER_SUPERUSER_PASSWORD
	#[arg(long)]
	pub noinput: bool,
}

pub async fn migrate(store: &SqliteUserStore) -> CommandResult<()> {
	store.create_schema().await?;
	println!("{}", style("✓ User table is up to date").green().bold());
	Ok(())
}

pub async fn createsuperuser(
	manager: &UserManager,
	args: CreateSuperuserArgs,
) -> CommandResult<()> {
	let (new_user, password) = if args.noinput {
		noinput_superuser(args, std::env::var(SUPERUSER_PASSWORD_VAR).ok())?
	} else {
		match prompt_superuser(args)? {
			Some(values) => values,
			None => {
				println!("{}", style("Superuser creation cancelled").yellow());
				return Ok(());
			}
		}
	};

	let user = manager.create_superuser(new_user, &password).await?;
	info!(user_id = %user.id, "superuser created from the command line");

	println!("{}", style("✓ Superuser created successfully!").green().bold());
	println!("  {}", style(&user).yellow());
	Ok(())
}

pub async fn changepassword(manager: &UserManager, email: &str) -> CommandResult<()> {
	let user = find_user(manager, email).await?;

	println!("Changing password for user '{}'", style(&user.email).yellow());
	let password = Password::new()
		.with_prompt("Password")
		.with_confirmation("Password (again)", "Error: Passwords do not match")
		.interact()?;

	let user = manager.set_password(user.id, &password).await?;
	println!(
		"{}",
		style(format!("✓ Password changed successfully for user '{}'", user.email))
			.green()
			.bold()
	);
	Ok(())
}

async fn find_user(manager: &UserManager, email: &str) -> CommandResult<User> {
	manager
		.get_by_natural_key(email)
		.await?
		.ok_or_else(|| CommandError::Usage(format!("User '{}' does not exist", email)))
}

/// Values for a non-interactive run.
///
/// Missing flags become empty fields and are reported by the manager's
/// validation, in field order.
fn noinput_superuser(
	args: CreateSuperuserArgs,
	password: Option<String>,
) -> CommandResult<(NewUser, String)> {
	let password = password.filter(|p| !p.is_empty()).ok_or_else(|| {
		CommandError::Usage(format!(
			"{} must be set when using --noinput",
			SUPERUSER_PASSWORD_VAR
		))
	})?;

	let new_user = NewUser::new(
		args.email.unwrap_or_default(),
		args.username.unwrap_or_default(),
		args.first_name.unwrap_or_default(),
		args.last_name.unwrap_or_default(),
	);
	Ok((new_user, password))
}

fn prompt_superuser(args: CreateSuperuserArgs) -> CommandResult<Option<(NewUser, String)>> {
	println!("{}", style("Creating superuser account").cyan().bold());
	println!();

	let email = prompt_field(
		"Email address",
		args.email,
		EMAIL_MAX_LENGTH,
		"User must have an email address!",
	)?;
	let username = prompt_field(
		"Username",
		args.username,
		USERNAME_MAX_LENGTH,
		"User must have an username!",
	)?;
	let first_name = prompt_field(
		"First name",
		args.first_name,
		NAME_MAX_LENGTH,
		"User must have a first name!",
	)?;
	let last_name = prompt_field(
		"Last name",
		args.last_name,
		NAME_MAX_LENGTH,
		"User must have a last name!",
	)?;

	let password = Password::new()
		.with_prompt("Password")
		.with_confirmation("Password (again)", "Error: Passwords do not match")
		.validate_with(|input: &String| -> Result<(), &str> {
			if input.is_empty() {
				Err("Password must not be blank")
			} else {
				Ok(())
			}
		})
		.interact()?;

	println!();
	let confirmed = Confirm::new()
		.with_prompt("Create superuser?")
		.default(true)
		.interact()?;
	if !confirmed {
		return Ok(None);
	}

	let new_user = NewUser::new(email, username, first_name, last_name);
	Ok(Some((new_user, password)))
}

fn prompt_field(
	prompt: &str,
	given: Option<String>,
	max_length: usize,
	missing_message: &'static str,
) -> CommandResult<String> {
	if let Some(value) = given {
		check_field(&value, max_length, missing_message).map_err(CommandError::Usage)?;
		return Ok(value);
	}

	let value = Input::<String>::new()
		.with_prompt(prompt)
		.allow_empty(true)
		.validate_with(|input: &String| check_field(input, max_length, missing_message))
		.interact_text()?;
	Ok(value)
}

fn check_field(value: &str, max_length: usize, missing_message: &str) -> Result<(), String> {
	if value.is_empty() {
		return Err(missing_message.to_string());
	}
	if value.chars().count() > max_length {
		return Err(format!("Ensure this value has at most {} characters", max_length));
	}
	Ok(())
}
