//! Concrete GWP Pipeline - Main Entry Point

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use concrete_gwp::{init_logging, Pipeline, PipelineOutput, Settings};
use gwp_report::{export_csv, export_json};
use material_source::JsonFileSource;
use record_normalizer::{is_valid_postal_code, Validator};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "concrete-gwp")]
#[command(about = "Compare GWP values of concretes near a US postal code", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize and outlier-filter a captured material search
    Run {
        /// JSON array of raw material records
        #[arg(short, long)]
        input: PathBuf,

        /// 5-digit postal code the search is centred on
        #[arg(short, long)]
        postal_code: String,

        /// Miles from the postal code
        #[arg(long)]
        miles: Option<u32>,

        /// Lower strength bound (psi)
        #[arg(long)]
        strength_min: Option<u32>,

        /// Upper strength bound (psi)
        #[arg(long)]
        strength_max: Option<u32>,

        /// Search lightweight concrete
        #[arg(long)]
        lightweight: bool,

        /// Maximum number of concretes
        #[arg(long)]
        max_records: Option<usize>,

        /// Return all matches, ignoring the maximum
        #[arg(long)]
        return_all: bool,

        /// Settings file (TOML, YAML, or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the cleaned table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Check that a postal code is five digits
    CheckPostal {
        /// Postal code to check
        code: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Run {
            input,
            postal_code,
            miles,
            strength_min,
            strength_max,
            lightweight,
            max_records,
            return_all,
            config,
            csv,
            json,
        } => {
            let settings = Settings::load(config.as_deref()).context("loading settings")?;
            let postal = Validator::default().validate_postal_code(&postal_code)?;

            let mut query = settings.query.to_query(postal);
            query.plant_distance_mi = miles.unwrap_or(query.plant_distance_mi);
            query.strength_min_psi = strength_min.unwrap_or(query.strength_min_psi);
            query.strength_max_psi = strength_max.unwrap_or(query.strength_max_psi);
            query.max_records = max_records.unwrap_or(query.max_records);
            query.lightweight = lightweight;
            query.return_all = return_all;

            info!("=== Concrete GWP Pipeline v{} ===", env!("CARGO_PKG_VERSION"));
            let pipeline = Pipeline::new(&settings)?;
            let source = JsonFileSource::new(&input);
            let output = pipeline.run(&source, &query)?;

            print_summary(&output);

            if let Some(path) = csv {
                let file = File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                let rows = export_csv(&output.records, BufWriter::new(file))?;
                info!("Wrote {} rows to {}", rows, path.display());
            }

            if let Some(path) = json {
                let file = File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                export_json(&output.report, BufWriter::new(file))?;
                info!("Wrote report to {}", path.display());
            }
        }

        Commands::CheckPostal { code } => {
            println!("{}", check_postal(&code)?);
        }
    }

    Ok(())
}

fn check_postal(code: &str) -> Result<String> {
    if !is_valid_postal_code(code) {
        bail!("Invalid postal code {:?}. Please enter a 5-digit code with integers only.", code);
    }
    Ok(format!("{} is a valid postal code", code))
}

fn print_summary(output: &PipelineOutput) {
    let report = &output.report;
    println!("{}", report.caption());
    if report.skipped_count > 0 {
        println!("{} materials skipped during normalization", report.skipped_count);
    }
    if report.removed_total() > 0 {
        println!("{} outliers removed", report.removed_total());
    }

    println!();
    println!(
        "{:>10} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "psi", "n", "min", "q1", "median", "q3", "max"
    );
    for b in &report.boxes {
        println!(
            "{:>10} {:>6} {:>9.1} {:>9.1} {:>9.1} {:>9.1} {:>9.1}",
            b.strength_psi, b.count, b.min, b.q1, b.median, b.q3, b.max
        );
    }

    println!();
    println!("Material Count by Plant");
    for p in &report.plants {
        println!("{:>6}  {}", p.count, p.plant);
    }
}
