use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sportfest::output;
use sportfest::scoring::{self, ClassFailure, ScoringConfig};
use sportfest::snapshot::{self, Id, Snapshot};

const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_SNAPSHOT: i32 = 2;
const EXIT_VALIDATION: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List classes with their games, completion and crown holders (default)
    Classes,
    /// Show the ranking table of one class
    Ranking {
        /// Class label, e.g. "2a"
        class: String,
    },
    /// Show the live standings of one group
    Standings {
        /// Group id as used in the snapshot
        group: String,
    },
    /// Show which games each group has finished
    Matrix,
    /// Write all class rankings and the completion matrix to a JSON file
    Export {
        /// Output file
        out: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(name = "sportfest")]
#[command(about = "School festival scoring: ranks, points and class crowns", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/sportfest/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Snapshot file (.json or .yaml); overrides `snapshot` from the config
    #[arg(short, long, global = true)]
    snapshot: Option<String>,

    /// Print tab-separated values instead of a table
    #[arg(long, global = true)]
    tsv: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Initialize the tracing subscriber for logging
///
/// RUST_LOG wins when set; otherwise `--verbose` selects debug and the
/// default is warn.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Classes);
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match sportfest::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring_config = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = scoring::validate_scoring(&scoring_config) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let Some(snapshot_path) = cli.snapshot.map(PathBuf::from).or(config.snapshot) else {
        eprintln!("No snapshot given.");
        eprintln!("Pass --snapshot <file> or add it to ~/.config/sportfest/config.yaml:");
        eprintln!("  snapshot: /path/to/snapshot.json");
        std::process::exit(EXIT_CONFIG);
    };

    // The whole snapshot is read before any ranking starts
    let raw = match snapshot::load_snapshot(&snapshot_path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Snapshot error: {:#}", e);
            std::process::exit(EXIT_SNAPSHOT);
        }
    };
    let snapshot = match raw.validate() {
        Ok(s) => s,
        Err(errors) => {
            eprintln!("Snapshot validation errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_VALIDATION);
        }
    };
    info!(
        games = snapshot.games.len(),
        children = snapshot.children.len(),
        results = snapshot.results.len(),
        "Snapshot ready"
    );

    let code = match run(command, &snapshot, &scoring_config, cli.tsv) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if e.downcast_ref::<sportfest::ValidationError>().is_some() {
                EXIT_VALIDATION
            } else {
                EXIT_ERROR
            }
        }
    };

    debug!("Done in {:?}", start_time.elapsed());
    std::process::exit(code);
}

/// Report classes that could not be ranked. Returns the exit code for the run.
fn report_failures(failures: &[ClassFailure]) -> i32 {
    if failures.is_empty() {
        return EXIT_SUCCESS;
    }
    eprintln!("Classes with validation errors:");
    for failure in failures {
        eprintln!("  - {}: {}", failure.class_label, failure.error);
    }
    EXIT_VALIDATION
}

fn run(
    command: Commands,
    snapshot: &Snapshot,
    scoring_config: &ScoringConfig,
    tsv: bool,
) -> anyhow::Result<i32> {
    let use_colors = output::should_use_colors();

    match command {
        Commands::Classes => {
            let rankings = scoring::rank_all_classes(snapshot, scoring_config);
            if tsv {
                println!("{}", output::format_class_tsv(&rankings.classes));
            } else {
                println!("{}", output::format_class_overview(&rankings.classes, use_colors));
            }
            return Ok(report_failures(&rankings.failures));
        }
        Commands::Ranking { class } => {
            let ranking = scoring::rank_class(snapshot, class.trim(), scoring_config)?;
            if tsv {
                println!("{}", output::format_class_tsv(std::slice::from_ref(&ranking)));
            } else {
                println!("{}", output::format_class_table(&ranking, use_colors));
                if ranking.mode.is_approximation() {
                    eprintln!("Totals are raw value sums ({}), not rank points.", ranking.mode);
                }
            }
        }
        Commands::Standings { group } => {
            let standings =
                scoring::compose_standings(snapshot, &Id::from(group.as_str()), scoring_config)?;
            if tsv {
                println!("{}", output::format_standings_tsv(&standings));
            } else {
                println!("{}", output::format_standings(&standings, use_colors));
            }
        }
        Commands::Matrix => {
            let matrix = scoring::completion_matrix(snapshot);
            println!("{}", output::format_matrix(&matrix, use_colors));
        }
        Commands::Export { out } => {
            let rankings = scoring::rank_all_classes(snapshot, scoring_config);
            let matrix = scoring::completion_matrix(snapshot);
            let document = output::ExportDocument {
                generated_at: chrono::Utc::now(),
                classes: &rankings.classes,
                failures: &rankings.failures,
                matrix: &matrix,
            };
            output::write_export(&out, &document)?;
            println!("Wrote {} classes to {}", rankings.classes.len(), out.display());
            return Ok(report_failures(&rankings.failures));
        }
    }

    Ok(EXIT_SUCCESS)
}
