use clap::Subcommand;

use crate::cli::utils::{output_decision, output_json};
use crate::cli::OutputFormat;
use crate::tier::{quota, Tier, TierPolicy};
use crate::types::ResourceKind;

#[derive(Subcommand)]
pub enum QuotaCommands {
    #[command(about = "Can the tier create another alert?")]
    Alerts {
        tier: Tier,
        #[arg(help = "Alerts the user already has")]
        current: u32,
    },

    #[command(about = "Can the tier add another watchlist item?")]
    Watchlist {
        tier: Tier,
        #[arg(help = "Watchlist items the user already has")]
        current: u32,
    },

    #[command(about = "Show remaining quota for a resource")]
    Limits {
        tier: Tier,
        #[arg(help = "alerts or watchlist")]
        resource: ResourceKind,
        current: u32,
    },
}

pub async fn handle(cmd: QuotaCommands, policy: &TierPolicy, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        QuotaCommands::Alerts { tier, current } => {
            let decision = quota::can_create_alert(policy, tier, current);
            output_decision(&output_format, "new alert", &decision)
        }
        QuotaCommands::Watchlist { tier, current } => {
            let decision = quota::can_add_watchlist_item(policy, tier, current);
            output_decision(&output_format, "new watchlist item", &decision)
        }
        QuotaCommands::Limits { tier, resource, current } => {
            let check = quota::check_tier_limits(policy, tier, resource, current);
            match output_format {
                OutputFormat::Json => output_json(&check),
                OutputFormat::Text => {
                    println!(
                        "{} {}: {}/{} used, {} remaining{}",
                        tier,
                        resource,
                        current.min(check.limit),
                        check.limit,
                        check.remaining,
                        if check.can_create { "" } else { " (limit reached)" },
                    );
                    Ok(())
                }
            }
        }
    }
}
