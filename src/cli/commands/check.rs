use clap::Subcommand;

use crate::cli::utils::output_decision;
use crate::cli::OutputFormat;
use crate::tier::{validation, Tier, TierPolicy};

#[derive(Subcommand)]
pub enum CheckCommands {
    #[command(about = "Can the tier chart this symbol?")]
    Symbol {
        #[arg(help = "Tier name (FREE, PRO)")]
        tier: String,
        #[arg(help = "Symbol, e.g. XAUUSD (case-sensitive)")]
        symbol: String,
    },

    #[command(about = "Can the tier use this timeframe?")]
    Timeframe {
        #[arg(help = "Tier name (FREE, PRO)")]
        tier: Tier,
        #[arg(help = "Timeframe code, e.g. H1")]
        timeframe: String,
    },

    #[command(about = "Can the tier open this symbol/timeframe chart?")]
    Chart {
        #[arg(help = "Tier name (FREE, PRO)")]
        tier: Tier,
        symbol: String,
        timeframe: String,
    },
}

pub async fn handle(cmd: CheckCommands, policy: &TierPolicy, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        CheckCommands::Symbol { tier, symbol } => {
            let decision = validation::validate_tier_access_str(policy, &tier, &symbol)?;
            output_decision(&output_format, &symbol, &decision)
        }
        CheckCommands::Timeframe { tier, timeframe } => {
            let decision = validation::validate_timeframe_access(policy, tier, &timeframe);
            output_decision(&output_format, &timeframe, &decision)
        }
        CheckCommands::Chart { tier, symbol, timeframe } => {
            let decision = validation::validate_chart_access(policy, tier, &symbol, &timeframe);
            output_decision(&output_format, &format!("{}/{}", symbol, timeframe), &decision)
        }
    }
}
