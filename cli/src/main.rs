use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use labtrend_core::ChartConfig;
use labtrend_store::{Dashboard, DescriptionCache, DisabledDescriptions, InMemoryStore};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "labtrend-cli",
    about = "Flag out-of-range blood-test parameters and build chart bundles from a JSON dataset."
)]
struct Args {
    /// Path to the `{ parameter: [measurement] }` JSON file.
    #[arg(short, long)]
    input: PathBuf,

    /// TOML file with chart settings and predefined descriptions.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parameters to chart; repeat for an overlay.
    #[arg(short, long = "parameter")]
    parameters: Vec<String>,

    /// Print the description of each charted parameter.
    #[arg(long)]
    describe: bool,
}

#[derive(Deserialize, Default)]
struct CliConfig {
    #[serde(default)]
    chart: ChartConfig,
    #[serde(default)]
    descriptions: BTreeMap<String, String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Could not read file {:?}", args.input))?;

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read config {path:?}"))?;
            toml::from_str(&text).context("Invalid TOML config")?
        }
        None => CliConfig::default(),
    };
    tracing::debug!(
        predefined = config.descriptions.len(),
        threshold = config.chart.begin_at_zero_below,
        "config loaded"
    );

    let store = InMemoryStore::from_json_str(&data)?;
    let mut dashboard = Dashboard::open(store)?;
    let snapshot = dashboard.snapshot();

    println!(
        "Generated at: {}\nParameters: {}\nOut of range: {}",
        snapshot.generated_at,
        snapshot.parameters.len(),
        snapshot.out_of_range().count()
    );
    for summary in &snapshot.parameters {
        println!(
            "  {:<30} {} {} ({})",
            summary.selector_label, summary.latest_value, summary.unit, summary.latest_date
        );
    }

    if args.parameters.is_empty() {
        return Ok(());
    }

    dashboard.select(args.parameters.clone())?;
    if let Some(bundle) = dashboard.chart(&config.chart) {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
    }

    if args.describe {
        let mut descriptions =
            DescriptionCache::with_predefined(DisabledDescriptions, config.descriptions);
        for parameter in dashboard.selected() {
            println!("\n{parameter}: {}", descriptions.describe_or_error(parameter));
        }
    }

    Ok(())
}
