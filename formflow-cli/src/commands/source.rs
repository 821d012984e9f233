//! `formflow source` — configure the pull and push endpoints.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;

use formflow_source::{
    AggregateSource, CentralSource, CollectDirSource, Credentials, SourceProvider,
};

use super::open_controller;

#[derive(Subcommand, Debug)]
pub enum SourceCommand {
    /// Configure the source submissions are pulled from.
    SetPull {
        #[command(subcommand)]
        kind: SourceKind,
    },

    /// Configure the source processed results are pushed to.
    SetPush {
        #[command(subcommand)]
        kind: SourceKind,
    },

    /// Print the currently configured sources.
    Show,
}

#[derive(Subcommand, Debug)]
pub enum SourceKind {
    /// An Aggregate-style server.
    Aggregate {
        #[arg(long)]
        url: String,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },

    /// A Central-style server (forms live under a numbered project).
    Central {
        #[arg(long)]
        url: String,
        #[arg(long = "project-id")]
        project_id: u32,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },

    /// A local collection-client directory (pull only).
    CollectDir { directory: PathBuf },
}

impl SourceKind {
    fn into_provider(self) -> Result<Box<dyn SourceProvider>> {
        Ok(match self {
            SourceKind::Aggregate {
                url,
                username,
                password,
            } => Box::new(AggregateSource::new(url, credentials(username, password)?)),
            SourceKind::Central {
                url,
                project_id,
                username,
                password,
            } => Box::new(CentralSource::new(
                url,
                project_id,
                credentials(username, password)?,
            )),
            SourceKind::CollectDir { directory } => Box::new(CollectDirSource::new(directory)),
        })
    }
}

fn credentials(username: Option<String>, password: Option<String>) -> Result<Option<Credentials>> {
    match (username, password) {
        (Some(username), Some(password)) => Ok(Some(Credentials { username, password })),
        (None, None) => Ok(None),
        _ => bail!("--username and --password must be given together"),
    }
}

pub fn run(command: SourceCommand) -> Result<()> {
    match command {
        SourceCommand::SetPull { kind } => {
            let provider = kind.into_provider()?;
            let description = provider.description();
            let mut controller = open_controller()?;
            controller
                .set_pull_source(provider)
                .context("failed to configure pull source")?;
            println!(
                "{} pull source set: {description} ({} forms)",
                "✓".green(),
                controller.forms().len()
            );
        }
        SourceCommand::SetPush { kind } => {
            let provider = kind.into_provider()?;
            let description = provider.description();
            let mut controller = open_controller()?;
            controller
                .set_push_source(provider)
                .context("failed to configure push source")?;
            println!(
                "{} push source set: {description} ({} forms)",
                "✓".green(),
                controller.forms().len()
            );
        }
        SourceCommand::Show => {
            let controller = open_controller()?;
            match controller.pull_source() {
                Some(source) => println!("pull: {}", source.description()),
                None => println!("pull: (unset)"),
            }
            match controller.push_source() {
                Some(source) => println!("push: {}", source.description()),
                None => println!("push: (unset)"),
            }
        }
    }
    Ok(())
}
