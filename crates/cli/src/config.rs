//! Command-line options.

use crate::commands::Command;
use anyhow::Context;
use clap::Parser;
use corelib::NetworkSettings;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect ledger network connection profiles.
#[derive(Debug, Parser)]
#[command(name = "fabconnect", version, long_about = None)]
pub struct CliConfig {
    /// Network configuration file (`${VAR}` placeholders are expanded)
    #[arg(short, long, env = "FABCONNECT_CONFIG")]
    pub config: String,

    /// Entity-matcher override file
    #[arg(short, long, env = "FABCONNECT_MATCHERS")]
    pub matchers: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(&self) -> anyhow::Result<()> {
        init_tracing(self.verbose);

        let settings = NetworkSettings::from_files(&self.config, self.matchers.as_deref())
            .with_context(|| format!("failed to load network configuration {}", self.config))?;
        debug!(command = ?self.command, "running command");
        let result = self.command.execute(&settings)?;
        print!("{}", result);
        Ok(())
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
