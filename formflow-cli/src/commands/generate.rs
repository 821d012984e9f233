//! `formflow generate` — compose and write the automation script.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use formflow_compose::AutomationConfig;

use super::open_controller;

/// Arguments for `formflow generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory the script is written into. Required; there is no default.
    #[arg(long = "script-dir")]
    pub script_dir: PathBuf,

    /// Where export commands place their CSV output (default: /tmp).
    #[arg(long = "export-dir")]
    pub export_dir: Option<PathBuf>,

    /// Command prefix for every generated line
    /// (default: "java -jar briefcase.jar").
    #[arg(long)]
    pub runtime: Option<String>,
}

impl GenerateArgs {
    pub fn run(self) -> Result<()> {
        let controller = open_controller()?;

        let config = AutomationConfig {
            script_dir: self.script_dir,
            export_dir: self.export_dir,
            runtime_invocation: self.runtime,
        };
        let path = controller
            .generate(&config)
            .context("script generation failed")?;
        let selected = controller.forms().selected_forms().len();

        println!(
            "{} wrote {} ({selected} form(s) exported)",
            "✓".green(),
            path.display()
        );
        Ok(())
    }
}
