use clap::Subcommand;

use crate::cli::utils::output_json;
use crate::cli::OutputFormat;
use crate::tier::helpers::{self, summarize, TierSummary};
use crate::tier::{Allowed, Tier, TierPolicy};

#[derive(Subcommand)]
pub enum TierCommands {
    #[command(about = "List every tier with its limits")]
    List,

    #[command(about = "Show one tier in detail")]
    Show {
        #[arg(help = "Tier name (FREE, PRO)")]
        tier: Tier,
    },
}

pub async fn handle(cmd: TierCommands, policy: &TierPolicy, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TierCommands::List => {
            let summaries: Vec<TierSummary> = policy.iter().map(|(tier, _)| summarize(policy, tier)).collect();
            match output_format {
                OutputFormat::Json => output_json(&summaries),
                OutputFormat::Text => {
                    println!(
                        "{:<6} {:<8} {:>8} {:>8} {:>11} {:>7} {:>10} {:>10}",
                        "TIER", "NAME", "PRICE", "SYMBOLS", "TIMEFRAMES", "ALERTS", "WATCHLIST", "RATE/H"
                    );
                    for s in &summaries {
                        println!(
                            "{:<6} {:<8} {:>8} {:>8} {:>11} {:>7} {:>10} {:>10}",
                            s.tier.as_str(),
                            s.config.display_name,
                            format!("${}", s.config.price_usd),
                            describe_set(&s.config.allowed_symbols, s.accessible_symbols.len()),
                            describe_set(&s.config.allowed_timeframes, s.accessible_timeframes.len()),
                            s.config.max_alerts,
                            s.config.max_watchlist_items,
                            s.config.rate_limit,
                        );
                    }
                    Ok(())
                }
            }
        }
        TierCommands::Show { tier } => {
            let summary = summarize(policy, tier);
            match output_format {
                OutputFormat::Json => output_json(&summary),
                OutputFormat::Text => {
                    print_summary(&summary);
                    Ok(())
                }
            }
        }
    }
}

fn describe_set(allowed: &Allowed, listed: usize) -> String {
    if allowed.is_all() {
        "all".to_string()
    } else {
        listed.to_string()
    }
}

fn print_summary(s: &TierSummary) {
    let cfg = &s.config;
    println!("{} ({}) - ${}/month", cfg.display_name, s.tier, cfg.price_usd);
    println!("  Symbols:    {}", s.accessible_symbols.join(", "));

    let timeframes: Vec<String> = s
        .accessible_timeframes
        .iter()
        .map(|tf| match helpers::timeframe_label(tf) {
            Some(label) => format!("{} ({})", tf, label),
            None => tf.clone(),
        })
        .collect();
    println!("  Timeframes: {}", timeframes.join(", "));

    match s.chart_combinations {
        Some(n) => println!("  Charts:     {} symbol/timeframe combinations", n),
        None => println!("  Charts:     unlimited"),
    }
    println!("  Alerts:     {}", cfg.max_alerts);
    println!("  Watchlist:  {}", cfg.max_watchlist_items);
    println!("  Rate limit: {} requests/hour", cfg.rate_limit);
    println!(
        "  Features:   advanced charts {}, export {}, API {}, priority support {}",
        yes_no(cfg.features.advanced_charts),
        yes_no(cfg.features.export_data),
        yes_no(cfg.features.api_access),
        yes_no(cfg.features.priority_support),
    );

    if let Some(up) = &s.next_upgrade {
        println!(
            "  Upgrade to {}: +{} symbols, +{} timeframes, +{} alerts, +{} watchlist items for ${}/month",
            up.target_tier,
            up.additional_symbols,
            up.additional_timeframes,
            up.additional_alerts,
            up.additional_watchlist_items,
            up.price_per_month,
        );
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
