// Narrative zoning command-line entry point
//
// Usage:
//   cargo run --features cli --bin narrative_zoning -- aus0001 transects_extended.geojson
//   cargo run --features cli --bin narrative_zoning -- aus0002 transects.csv --min-zone-length 5
//   cargo run --features cli --bin narrative_zoning -- --show-default-zones

use anyhow::{Context, Result};
use clap::Parser;
use narrative_zoning::{analyze_site, feed, ZoneDefinitions, ZoningConfig, ZoningEngine};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "narrative_zoning", version, about = "Generate narrative zones for shoreline transects")]
struct Cli {
    /// Site ID to analyze (e.g. aus0001)
    site_id: Option<String>,

    /// Transects file: GeoJSON FeatureCollection, CSV or Parquet
    transects_file: Option<PathBuf>,

    /// Minimum number of transects to form a zone [default: NARRATIVE_MIN_ZONE_LENGTH or 3]
    #[arg(long)]
    min_zone_length: Option<usize>,

    /// Custom zone definitions JSON file
    #[arg(long)]
    zone_definitions: Option<PathBuf>,

    /// Output JSON file (default: stdout)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print default zone definitions and exit
    #[arg(long)]
    show_default_zones: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "narrative_zoning=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.show_default_zones {
        println!("{}", serde_json::to_string_pretty(&ZoneDefinitions::default())?);
        return Ok(());
    }

    let (Some(site_id), Some(transects_file)) = (cli.site_id.as_deref(), cli.transects_file.as_deref()) else {
        anyhow::bail!("site_id and transects_file are required unless using --show-default-zones");
    };

    let mut config = ZoningConfig::from_env();
    if let Some(min_zone_length) = cli.min_zone_length {
        config = config.with_min_zone_length(min_zone_length);
    }
    if let Some(path) = &cli.zone_definitions {
        config = config.with_definitions_file(path)?;
    }

    let transects = feed::load_site_transects(transects_file, site_id)?;
    tracing::info!(site_id, transects = transects.len(), "Loaded transects");

    let engine = ZoningEngine::new(config);
    let report = analyze_site(&engine, site_id, &transects)
        .with_context(|| format!("Narrative zoning failed for site '{}'", site_id))?;

    let output = if cli.pretty {
        report.to_json_pretty()?
    } else {
        report.to_json()?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, output)
                .with_context(|| format!("Failed to write output: {:?}", path))?;
            tracing::info!(path = %path.display(), zones = report.zone_count, "Results written");
        }
        None => println!("{}", output),
    }

    Ok(())
}
