//! `formflow forms` — list, select, and refresh the known forms.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use formflow_core::FormId;

use super::{open_cache, open_controller};

#[derive(Subcommand, Debug)]
pub enum FormsCommand {
    /// List known forms and their selection flags.
    List,

    /// Flag forms for inclusion in the next generated script.
    Select {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Clear selection flags.
    Deselect {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Re-read the storage tree and merge newly discovered forms.
    Refresh,
}

#[derive(Tabled)]
struct FormRow {
    #[tabled(rename = "sel")]
    selected: &'static str,
    #[tabled(rename = "form id")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
}

pub fn run(command: FormsCommand) -> Result<()> {
    match command {
        FormsCommand::List => {
            let controller = open_controller()?;
            if controller.forms().is_empty() {
                println!("No forms known. Configure a source or set a storage directory.");
                return Ok(());
            }
            let rows: Vec<FormRow> = controller
                .forms()
                .iter()
                .map(|(form, selected)| FormRow {
                    selected: if selected { "✓" } else { "" },
                    id: form.id.to_string(),
                    name: form.name.clone(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
        FormsCommand::Select { ids } => {
            let mut controller = open_controller()?;
            let ids: Vec<FormId> = ids.into_iter().map(FormId::from).collect();
            let unknown = controller
                .select_forms(&ids)
                .context("failed to persist selection")?;
            report_toggle("selected", ids.len() - unknown.len(), &unknown);
        }
        FormsCommand::Deselect { ids } => {
            let mut controller = open_controller()?;
            let ids: Vec<FormId> = ids.into_iter().map(FormId::from).collect();
            let unknown = controller
                .deselect_forms(&ids)
                .context("failed to persist selection")?;
            report_toggle("deselected", ids.len() - unknown.len(), &unknown);
        }
        FormsCommand::Refresh => {
            let mut controller = open_controller()?;
            let cache = open_cache()?;
            controller
                .handle_cache_update(cache.as_ref())
                .context("failed to refresh forms from storage")?;
            println!(
                "{} refreshed; {} forms known",
                "✓".green(),
                controller.forms().len()
            );
        }
    }
    Ok(())
}

fn report_toggle(verb: &str, changed: usize, unknown: &[FormId]) {
    println!("{} {changed} form(s) {verb}", "✓".green());
    for id in unknown {
        eprintln!("{} unknown form id '{id}'", "!".yellow());
    }
}
