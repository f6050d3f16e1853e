#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Snowfall campaigns headlessly.

mod config;
mod headless;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result as AnyResult};
use clap::Parser;
use log::info;
use snowfall_platform::{run_campaign, Campaign};
use snowfall_system_session::SessionSettings;

use crate::{config::FileConfig, headless::HeadlessPlatform, script::InputScript};

#[derive(Parser, Debug)]
#[command(name = "snowfall")]
#[command(about = "Plays Snowfall levels headlessly from scripted input")]
struct CliArgs {
    /// Level files played in order.
    #[arg(long = "level", value_name = "PATH", required = true)]
    levels: Vec<PathBuf>,

    /// TOML file overriding tuning constants and level tokens.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for collectible placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Stops after this many ticks across all sessions.
    #[arg(long, default_value_t = 54_000)]
    max_ticks: u64,

    /// Held keys per tick, for example "R*30 DL*5 A".
    #[arg(long, default_value = "")]
    script: String,
}

/// Entry point for the Snowfall command-line interface.
fn main() -> AnyResult<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let inputs = InputScript::parse(&args.script).context("invalid --script")?;

    let mut tuning = config.tuning;
    if let Some(seed) = args.seed {
        tuning.seed = seed;
    }
    let campaign = Campaign {
        levels: args
            .levels
            .iter()
            .map(|path| path.display().to_string())
            .collect(),
        settings: SessionSettings {
            tokens: config.tokens,
            ..SessionSettings::new(tuning)
        },
        tick_budget: Some(args.max_ticks),
    };

    let mut platform = HeadlessPlatform::new(inputs);
    let outcome = run_campaign(&mut platform, &campaign)?;
    info!(
        "{} frames drawn, {} scripted ticks unused",
        platform.frames(),
        platform.unused_inputs()
    );
    println!("{outcome:?} at {}", platform.clock());
    Ok(())
}
