// brs: command line host for the chart compiler and play session.

mod play;
mod summary;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bms_model::CompiledChart;
use bms_rule::PlayConfig;
use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "brs", about = "Compile BMS charts and replay play sessions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a chart and print it as JSON.
    Compile {
        chart: PathBuf,

        /// Print a metadata and density summary instead of the full timeline.
        #[arg(long)]
        stats: bool,
    },
    /// Replay an input log against a chart and print the result as JSON.
    Play {
        chart: PathBuf,

        /// Play config JSON file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Input log: JSON array of `{ "time_ms", "lane" }` entries.
        #[arg(long)]
        inputs: Option<PathBuf>,

        /// Judge every note automatically. Overrides the config file.
        #[arg(long)]
        autoplay: bool,

        /// Include the full event log in the output.
        #[arg(long)]
        events: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let output = run(cli.command)?;
    println!("{output}");
    Ok(())
}

fn run(command: Command) -> Result<String> {
    match command {
        Command::Compile { chart, stats } => {
            let chart = load_chart(&chart)?;
            let json = if stats {
                serde_json::to_string_pretty(&summary::ChartSummary::from(&chart))?
            } else {
                serde_json::to_string_pretty(&chart)?
            };
            Ok(json)
        }
        Command::Play {
            chart,
            config,
            inputs,
            autoplay,
            events,
        } => {
            let chart = load_chart(&chart)?;
            let mut config = match config {
                Some(path) => load_config(&path)?,
                None => PlayConfig::default(),
            };
            config.autoplay |= autoplay;
            let inputs = match inputs {
                Some(path) => play::load_inputs(&path)?,
                None => Vec::new(),
            };
            let mut report = play::replay(chart, &config, inputs)?;
            if !events {
                report.events.clear();
            }
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

fn load_chart(path: &Path) -> Result<CompiledChart> {
    let bytes = fs::read(path).with_context(|| format!("reading chart {}", path.display()))?;
    let text = bms_model::decode_bytes(&bytes);
    let chart = bms_model::compile(&text)
        .with_context(|| format!("compiling chart {}", path.display()))?;
    info!(
        "Loaded {}: {} notes, {:.0} ms",
        path.display(),
        chart.note_count,
        chart.song_duration_ms
    );
    Ok(chart)
}

fn load_config(path: &Path) -> Result<PlayConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: PlayConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}
