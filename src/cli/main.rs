//! Command-line boundary lookup and coverage report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use batas::config::{BoundaryConfig, Config};
use batas::coverage::{analyze, CoverageReport, SurveyFetcher, SurveySource};
use batas::extract;
use batas::models::Tier;
use batas::pip::{BoundaryIndex, BoundarySources, PipService, Resolution};

#[derive(Parser, Debug)]
#[command(name = "batas")]
#[command(about = "Administrative boundary lookup and survey coverage")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the default boundary files (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the SLS, Lingkungan and Kelurahan containing a map link's coordinate
    Locate {
        /// Map link containing @lat,lon or q=lat,lon
        text: String,
    },
    /// Report which units of a tier appear in the survey spreadsheet
    Coverage {
        /// Survey CSV URL or path (overrides config)
        #[arg(long)]
        survey: Option<String>,

        /// Survey name column (overrides config)
        #[arg(long)]
        column: Option<String>,

        /// Tier to report on
        #[arg(long, default_value = "sls")]
        tier: Tier,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = &args.data_dir {
        config.boundaries = BoundaryConfig::in_dir(dir);
    }

    match args.command {
        Command::Locate { text } => run_locate(&config, &text),
        Command::Coverage {
            survey,
            column,
            tier,
            json,
        } => {
            if let Some(survey) = survey {
                config.survey.source = Some(survey);
            }
            if column.is_some() {
                config.survey.column = column;
            }
            run_coverage(&config, tier, json).await
        }
    }
}

fn run_locate(config: &Config, text: &str) -> Result<()> {
    let Some(point) = extract(text) else {
        println!("could not extract coordinates (expected @lat,lon or q=lat,lon)");
        return Ok(());
    };

    println!("latitude:  {}", point.lat);
    println!("longitude: {}", point.lon);

    let index = BoundaryIndex::load(&config.boundaries.sources());
    let service = PipService::new(index.into());
    print_resolution(service.index(), &service.lookup(&point));
    Ok(())
}

fn print_resolution(index: &BoundaryIndex, resolution: &Resolution) {
    for tier in Tier::all() {
        let line = match resolution.get(*tier) {
            Some(found) => found
                .name
                .clone()
                .unwrap_or_else(|| "(name not available)".to_string()),
            None if !index.has_tier(*tier) => "(boundaries unavailable)".to_string(),
            None => "not found".to_string(),
        };
        println!("{:<11} {}", format!("{}:", tier.label()), line);
    }
}

async fn run_coverage(config: &Config, tier: Tier, json: bool) -> Result<()> {
    let source = config
        .survey
        .source
        .as_deref()
        .map(SurveySource::from)
        .context("No survey source: pass --survey or set [survey] source in the config")?;

    // Only the requested tier is needed
    let path = config
        .boundaries
        .path(tier)
        .with_context(|| format!("No boundary file configured for {}", tier.label()))?;
    let index = BoundaryIndex::load(&BoundarySources::new().with(tier, path.clone()));

    let fetcher = SurveyFetcher::new(config.survey.column.clone())?;
    let table = fetcher
        .fetch(&source)
        .await
        .with_context(|| format!("Survey data unavailable from {}", source))?;
    info!("{} survey rows", table.len());

    let report = analyze(&index, tier, &table);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &CoverageReport) {
    println!(
        "{}: {}/{} covered ({:.1}%), {} remaining",
        report.tier.label(),
        report.covered,
        report.total,
        report.ratio * 100.0,
        report.uncovered
    );
    println!("survey column '{}', {} rows", report.survey_column, report.survey_rows);

    if report.uncovered > 0 {
        println!();
        println!("Not yet surveyed:");
        for unit in report.uncovered_units() {
            println!("  {}", unit.name.as_deref().unwrap_or("(unnamed)"));
        }
    }

    if !report.orphans.is_empty() {
        println!();
        println!("Survey names matching no boundary:");
        for name in &report.orphans {
            println!("  {}", name);
        }
    }
}
