//! Globle Solver CLI
//!
//! Suggests the next country to guess from distance/direction feedback.
//!
//! Usage:
//!   globle-solver --dataset data/countries.geojson
//!   globle-solver --dataset data/countries.geojson --current france --feedback "320km N" --json

use anyhow::{Context, Result};
use clap::Parser;
use globle_solver::{
    feedback::parse_feedback, loader, report, vocabulary, CountryDataset, Dataset, DisplayResult,
    GameSession, GuessQuery, GuessResult, LoaderConfig,
};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "globle-solver",
    about = "Suggest the next country to guess from distance and direction feedback"
)]
struct Args {
    /// Path to the countries GeoJSON file
    #[arg(short, long, default_value = "data/countries.geojson")]
    dataset: PathBuf,

    /// Current guess (one-shot mode, requires --feedback)
    #[arg(short, long, requires = "feedback")]
    current: Option<String>,

    /// Feedback for the current guess, e.g. "320km N" or "<10km SE"
    #[arg(short, long, requires = "current")]
    feedback: Option<String>,

    /// Print the one-shot result as a JSON report
    #[arg(long)]
    json: bool,

    /// Also write the one-shot candidates as GeoJSON
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn one_shot(dataset: &Dataset, args: &Args, current: &str, feedback: &str) -> Result<()> {
    let current = current.trim().to_lowercase();
    let feedback = parse_feedback(feedback)?;
    let query = GuessQuery::new(current, feedback.distance, feedback.direction);
    let result = globle_solver::select_next(&query, dataset)?;

    if let Some(path) = &args.geojson {
        info!("Writing GeoJSON to {:?}", path);
        let fc = report::to_geojson(&result, dataset)?;
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &fc)?;
    }

    if args.json {
        let report = report::SelectionReport::new(query, result);
        let stdout = io::stdout();
        serde_json::to_writer_pretty(stdout.lock(), &report)?;
        println!();
    } else {
        print_result(&result, &query.current_country, query.target_direction);
    }
    Ok(())
}

fn print_result(result: &GuessResult, current: &str, direction: globle_solver::Direction) {
    let display = DisplayResult::from_result(result, current, direction);
    match result {
        GuessResult::Candidates(_) => {
            println!("\n{}", display.message);
            for name in &display.names {
                println!("- {}", name);
            }
        }
        _ => println!("\n{}", display.message),
    }
}

fn prompt(text: &str) -> io::Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn play(dataset: &Dataset) -> Result<()> {
    let mut session = GameSession::new(dataset);

    loop {
        let Some(line) = prompt("\nEnter your first guess country: ")? else {
            return Ok(());
        };
        match session.start(&line) {
            Ok(_) => break,
            Err(_) => println!("Country not found. Please check the spelling and try again."),
        }
    }

    loop {
        println!("\nEnter distance and direction (e.g., '320km N' or '<10km SE')");
        let Some(line) = prompt("Your input: ")? else {
            return Ok(());
        };
        let feedback = match parse_feedback(&line) {
            Ok(fb) => fb,
            Err(e) => {
                println!("Error: {}", e);
                continue;
            }
        };

        let current = session.current().unwrap_or_default().to_string();
        match session.submit(feedback) {
            Ok(result) => print_result(&result, &current, feedback.direction),
            Err(e) => println!("Error: {}", e),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let dataset = loader::load_dataset(&args.dataset, &LoaderConfig::default(), vocabulary::normalize)
        .with_context(|| format!("loading {}", args.dataset.display()))?;
    info!("{} countries available", dataset.len());

    match (&args.current, &args.feedback) {
        (Some(current), Some(feedback)) => one_shot(&dataset, &args, current, feedback),
        _ => play(&dataset),
    }
}
