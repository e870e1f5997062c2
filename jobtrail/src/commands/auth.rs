//! Session commands: the mock OAuth flow and account management.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use jobtrail_core::auth::parse_callback;
use jobtrail_core::Database;

#[derive(Args)]
pub struct LoginArgs {
    /// The callback query string a provider redirect would carry,
    /// e.g. "token=abc123&provider=google" or "error=access_denied"
    #[arg(long)]
    callback: String,
}

#[derive(Subcommand)]
pub enum AccountCommand {
    /// Update the profile's display fields
    Update {
        #[arg(long)]
        name: Option<String>,
        /// Avatar reference (data URL or external URL)
        #[arg(long)]
        picture: Option<String>,
    },
    /// Turn the two-factor flag on or off
    TwoFactor {
        /// "on" or "off"
        state: String,
    },
    /// Delete the current account and every record it owns
    Delete {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn login(db: &Database, args: LoginArgs) -> Result<()> {
    let callback = parse_callback(&args.callback)?;
    let user = db.sign_in(&callback.token, callback.provider.as_deref())?;
    println!("Signed in as {} <{}>", user.name, user.email);
    if let Some(provider) = &user.provider {
        println!("Provider: {}", provider);
    }
    Ok(())
}

pub fn logout(db: &Database) -> Result<()> {
    db.sign_out()?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami(db: &Database) -> Result<()> {
    let user = db.current_user()?;
    let token = db.session_token()?;

    println!("name:    {}", user.name);
    println!("email:   {}", user.email);
    println!("id:      {}", user.id);
    match token {
        Some(_) => println!("session: signed in"),
        None => println!("session: signed out (demo profile)"),
    }
    Ok(())
}

pub fn account(db: &Database, command: AccountCommand) -> Result<()> {
    match command {
        AccountCommand::Update { name, picture } => {
            if name.is_none() && picture.is_none() {
                bail!("nothing to update; pass --name and/or --picture");
            }
            let user = db.update_profile(name.as_deref(), picture.as_deref())?;
            println!("Updated profile: {} <{}>", user.name, user.email);
        }
        AccountCommand::TwoFactor { state } => {
            let enabled = match state.as_str() {
                "on" => true,
                "off" => false,
                other => bail!("expected 'on' or 'off', got '{}'", other),
            };
            let user = db.set_two_factor(enabled)?;
            println!(
                "Two-factor auth {}",
                if user.two_factor_enabled { "enabled" } else { "disabled" }
            );
        }
        AccountCommand::Delete { yes } => {
            if !yes {
                bail!("refusing to delete the account without --yes");
            }
            let user = db.current_user()?;
            db.delete_account(&user.id)?;
            println!("Deleted account {} and all of its records.", user.id);
        }
    }
    Ok(())
}
