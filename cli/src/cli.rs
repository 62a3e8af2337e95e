//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::Parser;

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::commands::provision::ProvisionArgs;
use crate::infra::logging;

/// Provision an OpenVPN or VLESS server, locally or over SSH
#[derive(Parser, Debug)]
#[command(name = "movpn", version)]
pub struct Cli {
    /// Echo the output of every step
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (a set `NO_COLOR` does the same)
    #[arg(long)]
    pub no_color: bool,

    /// Never prompt; use flag values and defaults
    #[arg(short = 'y', long)]
    pub yes: bool,

    #[command(flatten)]
    pub provision: ProvisionArgs,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if provisioning fails.
    pub async fn run(self) -> Result<()> {
        logging::init(self.verbose);
        let app = AppContext::new(&AppFlags {
            no_color: self.no_color,
            quiet: self.quiet,
            verbose: self.verbose,
            yes: self.yes,
        });
        commands::provision::run(&app, &self.provision).await
    }
}
