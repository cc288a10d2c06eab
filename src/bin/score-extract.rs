//! `score-extract`: inspect MusicXML scores from the command line

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use score_extractor::{
    extract_score_file, find_sidecar_musicxml, first_measures, format_quarter_length,
    group_by_measure, ExtractSettings, ExtractedScore, MusicEvent,
};

/// Measures listed by `events` when no range is given
const DEFAULT_FIRST_MEASURES: u32 = 4;

#[derive(Parser)]
#[command(name = "score-extract")]
#[command(about = "Extract metadata and note/chord events from MusicXML scores")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Largest accepted input in bytes (overrides the settings file)
    #[arg(long, global = true)]
    max_file_bytes: Option<u64>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show title, composer, measure count and parts
    Info {
        path: PathBuf,
    },

    /// List events grouped by measure
    Events {
        path: PathBuf,

        /// First measure of the range
        #[arg(long, conflicts_with = "first")]
        from: Option<u32>,

        /// Last measure of the range
        #[arg(long, conflicts_with = "first")]
        to: Option<u32>,

        /// Only the first N measures
        #[arg(long, default_value_t = DEFAULT_FIRST_MEASURES)]
        first: u32,
    },

    /// Print the extracted score as JSON
    Json {
        path: PathBuf,

        /// Include the raw XML text
        #[arg(long)]
        raw: bool,
    },

    /// Print the score's XML text
    Raw {
        path: PathBuf,
    },

    /// Find the MusicXML file next to a PDF
    Sidecar {
        pdf: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let settings = load_settings(cli.config.as_deref(), cli.max_file_bytes)?;

    match cli.command {
        Commands::Info { path } => {
            let score = extract_score_file(&path, &settings)?;
            print_info(&score);
        }
        Commands::Events {
            path,
            from,
            to,
            first,
        } => {
            let score = extract_score_file(&path, &settings)?;
            let grouped = match (from, to) {
                (None, None) => first_measures(&score.events, first),
                (from, to) => {
                    let range = from.unwrap_or(1)..=to.unwrap_or(u32::MAX);
                    group_by_measure(&score.events, range)
                }
            };
            for (measure, events) in grouped {
                print_measure(measure, &events);
            }
        }
        Commands::Json { path, raw } => {
            let mut score = extract_score_file(&path, &settings)?;
            if !raw {
                score.raw_xml.clear();
            }
            println!("{}", serde_json::to_string_pretty(&score)?);
        }
        Commands::Raw { path } => {
            let score = extract_score_file(&path, &settings)?;
            print!("{}", score.raw_xml);
        }
        Commands::Sidecar { pdf } => match find_sidecar_musicxml(&pdf) {
            Some(path) => println!("{}", path.display()),
            None => return Err(format!("no MusicXML file found for {}", pdf.display()).into()),
        },
    }

    Ok(())
}

fn load_settings(
    config: Option<&Path>,
    max_file_bytes: Option<u64>,
) -> Result<ExtractSettings, Box<dyn Error>> {
    let mut settings = match config {
        Some(path) => ExtractSettings::from_json_file(path)?,
        None => ExtractSettings::default(),
    };
    if let Some(limit) = max_file_bytes {
        settings.max_file_bytes = limit;
    }
    Ok(settings)
}

fn print_info(score: &ExtractedScore) {
    let mut lines = Vec::new();
    for node in score.metadata.property_tree() {
        node.render_lines(0, &mut lines);
    }
    for line in lines {
        println!("{}", line);
    }
}

fn print_measure(measure: u32, events: &[&MusicEvent]) {
    println!("\nMeasure {}", measure);
    for event in events {
        println!(
            "  {:>2}. {:<20} | {:<10} | duration: {} | offset: {}",
            event.instrument_number,
            event.instrument_name,
            event.pitch_label(),
            format_quarter_length(event.duration),
            format_quarter_length(event.offset),
        );
    }
}
