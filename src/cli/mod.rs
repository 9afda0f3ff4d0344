pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::tier::TierPolicy;

#[derive(Parser)]
#[command(name = "tiergate")]
#[command(about = "tiergate CLI - Evaluate the subscription tier policy offline")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "POLICY_TIER_CONFIG_PATH", help = "YAML tier table to use instead of the built-in defaults")]
    pub policy: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Inspect tier entitlements")]
    Tier {
        #[command(subcommand)]
        cmd: commands::tier::TierCommands,
    },

    #[command(about = "Check symbol, timeframe and chart access for a tier")]
    Check {
        #[command(subcommand)]
        cmd: commands::check::CheckCommands,
    },

    #[command(about = "Check alert and watchlist quotas for a tier")]
    Quota {
        #[command(subcommand)]
        cmd: commands::quota::QuotaCommands,
    },

    #[command(about = "Issue and inspect session tokens")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let policy = TierPolicy::load(cli.policy.as_deref())?;

    match cli.command {
        Commands::Tier { cmd } => commands::tier::handle(cmd, &policy, output_format).await,
        Commands::Check { cmd } => commands::check::handle(cmd, &policy, output_format).await,
        Commands::Quota { cmd } => commands::quota::handle(cmd, &policy, output_format).await,
        Commands::Token { cmd } => commands::token::handle(cmd, output_format).await,
    }
}
