//! `formflow config` — application-wide settings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use formflow_core::{
    prefs::{scope, FilePrefs, KEY_STORAGE_DIR, KEY_STORE_PASSWORDS},
    PreferenceStore,
};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set the shared storage directory all generated commands operate on.
    SetStorageDir { dir: PathBuf },

    /// Consent (or revoke consent) to persisting endpoint passwords.
    SetStorePasswords { value: bool },

    /// Print the current application settings.
    Show,
}

pub fn run(command: ConfigCommand) -> Result<()> {
    let mut app = FilePrefs::open(scope::APP).context("cannot open application preferences")?;

    match command {
        ConfigCommand::SetStorageDir { dir } => {
            app.put(KEY_STORAGE_DIR, &dir.to_string_lossy())
                .context("cannot save storage directory")?;
            println!("{} storage directory set to {}", "✓".green(), dir.display());
        }
        ConfigCommand::SetStorePasswords { value } => {
            app.put(KEY_STORE_PASSWORDS, if value { "true" } else { "false" })
                .context("cannot save consent flag")?;
            let note = if value {
                "passwords will be persisted with source configurations"
            } else {
                "passwords will be dropped when persisting source configurations"
            };
            println!("{} {note}", "✓".green());
        }
        ConfigCommand::Show => {
            match app.get(KEY_STORAGE_DIR) {
                Some(dir) => println!("storage directory: {dir}"),
                None => println!("storage directory: (unset)"),
            }
            println!("store passwords:   {}", app.get_flag(KEY_STORE_PASSWORDS));
        }
    }
    Ok(())
}
