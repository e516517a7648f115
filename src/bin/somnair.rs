//! Somnair CLI - command-line interface for the flight-effect sleep analysis
//!
//! Commands:
//! - analyze: run the full pipeline over both CSV exports
//! - sleep: aggregate the sleep export into a daily table
//! - flights: classify the activity export into a flight table

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use somnair::aggregator::SleepAggregator;
use somnair::classifier::FlightClassifier;
use somnair::loader::{read_activity_table, read_sleep_table};
use somnair::stats::{describe, histogram, HistogramBin};
use somnair::types::{ActivityRecord, AnalysisReport, SleepEpisodeRecord, SummaryStats};
use somnair::{AnalysisConfig, AnalysisError, Analyzer, PRODUCER_NAME, SOMNAIR_VERSION};

/// Histogram range for sleep hours (1-hour bins)
const SLEEP_HISTOGRAM_UPPER: f64 = 20.0;

/// Histogram range for flight-duration hours (1-hour bins)
const FLIGHT_HISTOGRAM_UPPER: f64 = 15.0;

/// Somnair - flight-effect sleep analysis for wearable device data
#[derive(Parser)]
#[command(name = "somnair")]
#[command(version = SOMNAIR_VERSION)]
#[command(about = "Analyze airline travel's effect on sleep duration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis over both CSV exports
    Analyze {
        /// Sleep CSV path (columns start_time_iso, actual_minutes; use - for stdin)
        #[arg(short, long)]
        sleep: PathBuf,

        /// Activity CSV path (columns Start, Duration, Distance, Activity)
        #[arg(short, long)]
        activity: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Aggregate the sleep export into a daily table
    Sleep {
        /// Sleep CSV path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Decimal places for rounding
        #[arg(long, default_value = "2")]
        decimals: u32,
    },

    /// Classify the activity export into a flight table
    Flights {
        /// Activity CSV path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
}

/// Pipeline thresholds, all optional overrides of the published defaults
#[derive(clap::Args)]
struct ThresholdArgs {
    /// Decimal places for rounding
    #[arg(long, default_value = "2")]
    decimals: u32,

    /// Lower bound of the flight speed corridor (mph, exclusive)
    #[arg(long, default_value = "100")]
    min_speed: f64,

    /// Upper bound of the flight speed corridor (mph, exclusive)
    #[arg(long, default_value = "700")]
    max_speed: f64,

    /// Minimum flight duration (hours, exclusive)
    #[arg(long, default_value = "0.5")]
    min_duration: f64,

    /// Days in the after-flight window, counting the flight day
    #[arg(long, default_value = "3")]
    window_days: u32,
}

impl ThresholdArgs {
    fn to_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            decimals: self.decimals,
            min_flight_speed_mph: self.min_speed,
            max_flight_speed_mph: self.max_speed,
            min_flight_duration_hours: self.min_duration,
            affected_window_days: self.window_days,
            ..AnalysisConfig::default()
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable tables and statistics
    Text,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SomnairCliError> {
    match cli.command {
        Commands::Analyze {
            sleep,
            activity,
            format,
            thresholds,
        } => cmd_analyze(&sleep, &activity, format, &thresholds.to_config()),

        Commands::Sleep {
            input,
            format,
            decimals,
        } => cmd_sleep(&input, format, decimals),

        Commands::Flights {
            input,
            format,
            thresholds,
        } => cmd_flights(&input, format, &thresholds.to_config()),
    }
}

fn cmd_analyze(
    sleep_path: &Path,
    activity_path: &Path,
    format: OutputFormat,
    config: &AnalysisConfig,
) -> Result<(), SomnairCliError> {
    let sleep = load_sleep(sleep_path)?;
    let activities = load_activities(activity_path)?;

    let report = Analyzer::with_config(config.clone()).analyze(&sleep, &activities)?;

    match format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn cmd_sleep(input: &Path, format: OutputFormat, decimals: u32) -> Result<(), SomnairCliError> {
    let sleep = load_sleep(input)?;
    let config = AnalysisConfig::default();
    let daily = SleepAggregator::aggregate(&sleep, config.date_prefix_len, decimals);

    let hours: Vec<f64> = daily.iter().map(|d| d.actual_hours).collect();
    let stats = describe(&hours, "daily sleep", decimals)?;

    match format {
        OutputFormat::Text => {
            println!("day         hours");
            for record in &daily {
                println!("{}  {}", record.day, record.actual_hours);
            }
            println!();
            print_stats(&stats);
            println!();
            print_histogram("hours slept", &histogram(&hours, 1.0, SLEEP_HISTOGRAM_UPPER));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&daily)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&daily)?),
    }

    Ok(())
}

fn cmd_flights(
    input: &Path,
    format: OutputFormat,
    config: &AnalysisConfig,
) -> Result<(), SomnairCliError> {
    let activities = load_activities(input)?;
    let flights = FlightClassifier::classify(&activities, config);

    let hours: Vec<f64> = flights.iter().map(|f| f.duration_hours).collect();
    let stats = describe(&hours, "flight duration", config.decimals)?;

    match format {
        OutputFormat::Text => {
            println!("participant took {} flights", flights.len());
            println!();
            println!("day         hours");
            for flight in &flights {
                println!("{}  {}", flight.day, flight.duration_hours);
            }
            println!();
            print_stats(&stats);
            println!();
            print_histogram(
                "flight duration (hours)",
                &histogram(&hours, 1.0, FLIGHT_HISTOGRAM_UPPER),
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&flights)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&flights)?),
    }

    Ok(())
}

// Input helpers

fn load_sleep(path: &Path) -> Result<Vec<SleepEpisodeRecord>, SomnairCliError> {
    Ok(read_sleep_table(open_input(path)?.as_bytes())?)
}

fn load_activities(path: &Path) -> Result<Vec<ActivityRecord>, SomnairCliError> {
    Ok(read_activity_table(open_input(path)?.as_bytes())?)
}

fn open_input(path: &Path) -> Result<String, SomnairCliError> {
    if path.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            eprintln!("reading CSV from terminal stdin; pipe a file or end input with Ctrl-D");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

// Rendering helpers

fn print_report(report: &AnalysisReport) {
    println!("somnair {} (run {})", report.provenance.version, report.provenance.run_id);
    println!();
    print_stats(&report.sleep_stats);
    println!();
    println!("participant took {} flights", report.flight_count);
    print_stats(&report.flight_stats);
    println!();

    let comparison = &report.comparison;
    println!(
        "flight-affected nights: {}, baseline nights: {}",
        comparison.flight_sleeps.len(),
        comparison.baseline_sleeps.len()
    );
    println!(
        "t = {:.4}, p = {:.4} (df = {})",
        comparison.t_test.statistic, comparison.t_test.p_value, comparison.t_test.df
    );
    println!(
        "Cohen's d = {} ({})",
        comparison.effect.effect_size, comparison.effect.magnitude
    );
}

fn print_stats(stats: &SummaryStats) {
    println!("mean {} = {} hours", stats.label, stats.mean);
    println!("median {} = {} hours", stats.label, stats.median);
    match stats.std_dev {
        Some(std_dev) => println!("standard deviation {} = {} hours", stats.label, std_dev),
        None => println!("standard deviation {} = n/a", stats.label),
    }
    println!("minimum {} = {} hours", stats.label, stats.min);
    println!("maximum {} = {} hours", stats.label, stats.max);
}

fn print_histogram(xlabel: &str, bins: &[HistogramBin]) {
    println!("{xlabel}:");
    for bin in bins {
        println!(
            "{:>4.0}-{:<4.0} {}",
            bin.lower,
            bin.upper,
            "#".repeat(bin.count)
        );
    }
}

// Error types

#[derive(Debug)]
enum SomnairCliError {
    Io(io::Error),
    Analysis(AnalysisError),
    Json(serde_json::Error),
}

impl From<io::Error> for SomnairCliError {
    fn from(e: io::Error) -> Self {
        SomnairCliError::Io(e)
    }
}

impl From<AnalysisError> for SomnairCliError {
    fn from(e: AnalysisError) -> Self {
        SomnairCliError::Analysis(e)
    }
}

impl From<serde_json::Error> for SomnairCliError {
    fn from(e: serde_json::Error) -> Self {
        SomnairCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    producer: &'static str,
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<SomnairCliError> for CliError {
    fn from(e: SomnairCliError) -> Self {
        match e {
            SomnairCliError::Io(e) => CliError {
                producer: PRODUCER_NAME,
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            SomnairCliError::Analysis(e) => {
                let hint = match &e {
                    AnalysisError::MissingColumn(_) => {
                        Some("Run with --help to see the expected CSV columns".to_string())
                    }
                    AnalysisError::InsufficientSample { .. } => Some(
                        "Both comparison groups need at least 2 nights of sleep data".to_string(),
                    ),
                    _ => None,
                };
                CliError {
                    producer: PRODUCER_NAME,
                    code: "ANALYSIS_ERROR".to_string(),
                    message: e.to_string(),
                    hint,
                }
            }
            SomnairCliError::Json(e) => CliError {
                producer: PRODUCER_NAME,
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
        }
    }
}
