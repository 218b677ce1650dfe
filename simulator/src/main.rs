use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use generator::composer::AlertComposer;
use generator::history::{HistoryFilter, DISPATCH_HISTORY};
use generator::template::{CHANNELS, TARGET_AREAS};
use log::{info, warn};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use views::model::{AdminView, CitizenView, NgoView};
use workflow::config::{ConfigOverrides, SimulationConfig};
use workflow::runner::Runner;

mod generator;
mod views;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Relief dashboard simulation driver")]
struct Args {
    /// Run a fixed number of ticks on simulated time and print a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a simulation config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Offline tick count
    #[arg(long)]
    ticks: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    tick_ms: Option<u64>,
    #[arg(long)]
    connectivity_ms: Option<u64>,
    /// Live run length in seconds; 0 runs until Ctrl+C
    #[arg(long)]
    duration_secs: Option<u64>,
    /// Emit the offline summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Compose a simulated broadcast from a template id and print the receipt
    #[arg(long)]
    compose: Option<String>,
    /// Target area for the composed broadcast (repeatable)
    #[arg(long = "area")]
    areas: Vec<String>,
    /// Toggle a channel on the composed broadcast (repeatable)
    #[arg(long = "channel")]
    channels: Vec<String>,
    /// Schedule the composed broadcast instead of sending it now
    #[arg(long)]
    schedule: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            seed: self.seed,
            tick_ms: self.tick_ms,
            connectivity_ms: self.connectivity_ms,
            ticks: self.ticks,
            duration_secs: self.duration_secs,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let overrides = args.overrides();
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?.with_overrides(&overrides),
        None => SimulationConfig::from_args(&overrides),
    };
    config
        .engine
        .validate()
        .context("validating engine settings")?;

    if let Some(template) = &args.compose {
        let mut composer = AlertComposer::new();
        composer.select_template(template)?;
        for area in &args.areas {
            if !TARGET_AREAS.contains(&area.as_str()) {
                bail!("unknown area {} (expected one of {:?})", area, TARGET_AREAS);
            }
            composer.toggle_area(area);
        }
        for channel in &args.channels {
            if !CHANNELS.contains(&channel.as_str()) {
                warn!("channel {} is not a standard broadcast channel", channel);
            }
            composer.toggle_channel(channel);
        }
        composer.schedule(args.schedule.clone());
        let receipt = composer.send(Utc::now())?;
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        let related = HistoryFilter {
            search: receipt.kind.clone(),
            ..Default::default()
        };
        for record in related.apply(&DISPATCH_HISTORY) {
            println!(
                "previous {} ({}): {}% acknowledged",
                record.kind,
                record.timestamp,
                record.acknowledgment_rate()
            );
        }
        return Ok(());
    }

    let runner = Runner::new(config.clone());

    if args.offline {
        let result = runner.execute(Utc::now())?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            let dismissed: HashSet<_> = result.dismissed.iter().cloned().collect();
            let acknowledged: HashSet<_> = result.acknowledged.iter().cloned().collect();
            let admin = AdminView::project(&result.snapshot, &dismissed);
            let ngo = NgoView::project(&result.snapshot);
            let citizen = CitizenView::project(&result.snapshot, &acknowledged);
            println!(
                "Offline run -> ticks {}, alerts {}, occupancy drifts {}, distribution drifts {}",
                result.ticks,
                result.snapshot.alerts.len(),
                result.metrics.occupancy_drifts,
                result.metrics.distribution_drifts
            );
            println!("admin:   {}", admin.summary());
            println!("ngo:     {}", ngo.summary());
            println!("citizen: {}", citizen.summary());
        }
        return Ok(());
    }

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for live simulation")?;
    let duration_secs = config.duration_secs;
    let metrics = runtime.block_on(runner.run_live(async move {
        if duration_secs == 0 {
            info!("live simulation running (Ctrl+C to stop)...");
            if let Err(err) = signal::ctrl_c().await {
                warn!("awaiting Ctrl+C failed: {}", err);
            }
        } else {
            info!("live simulation running for {}s (Ctrl+C to stop early)...", duration_secs);
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(duration_secs)) => {}
                _ = signal::ctrl_c() => {}
            }
        }
    }))?;

    println!(
        "Live run -> ticks {}, alerts generated {}, connectivity checks {}",
        metrics.ticks, metrics.alerts_generated, metrics.connectivity_checks
    );
    Ok(())
}
