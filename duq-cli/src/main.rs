//! duq - Data units quiz in the terminal
//!
//! Asks unit conversion, file size and storage capacity questions, checks
//! the answers, and keeps a persistent score with level badges.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use duq_common::config::{resolve_data_folder, SiteConfig};
use duq_common::engines::Difficulty;
use duq_common::storage::{FileStore, KeyValueStore, MemoryStore};
use duq_common::ScoreManager;
use tracing::{info, warn};
use tracing_subscriber::util::SubscriberInitExt;

mod app;
mod logging;

use app::{Mode, QuestionSource};

/// Command-line arguments for duq
#[derive(Parser, Debug)]
#[command(name = "duq")]
#[command(about = "Practice data unit conversions, file sizes and storage capacity")]
#[command(version)]
struct Args {
    /// Question type to practise
    #[arg(short, long, value_enum, default_value = "mixed")]
    mode: Mode,

    /// Allow conversions up to three units apart
    #[arg(short, long)]
    advanced: bool,

    /// Seed for reproducible questions
    #[arg(long)]
    seed: Option<u64>,

    /// Site config file (falls back to DUQ_CONFIG, then the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder for saved scores (falls back to DUQ_DATA_FOLDER, then the site config)
    #[arg(long)]
    data_folder: Option<PathBuf>,

    /// Keep scores in memory only
    #[arg(long)]
    in_memory: bool,

    /// Stop after this many questions
    #[arg(short, long)]
    questions: Option<u32>,

    /// Print score statistics and exit
    #[arg(long)]
    stats: bool,

    /// Clear saved scores before starting
    #[arg(long)]
    reset: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over the configured level
    let rust_log = std::env::var("RUST_LOG").ok();
    let (subscriber, log_level) = logging::subscriber(rust_log.as_deref(), io::stderr);
    subscriber.init();

    let config = logging::load_config(args.config.as_deref(), &log_level)?;

    info!(
        "Starting duq v{} for site '{}'",
        env!("CARGO_PKG_VERSION"),
        config.site_key
    );

    let store = open_store(&args, &config);
    let mut scores = ScoreManager::from_config(&config, store);

    let stdout = io::stdout();
    let mut output = stdout.lock();

    if args.reset {
        scores.reset();
        info!("Scores reset");
    }

    if args.stats {
        return app::print_stats(&mut output, &scores);
    }

    let difficulty = if args.advanced {
        Difficulty::Advanced
    } else {
        Difficulty::Basic
    };
    let mut source = match args.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            QuestionSource::seeded(args.mode, difficulty, seed)
        }
        None => QuestionSource::new(args.mode, difficulty),
    };

    app::print_header(&mut output, &config)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    app::run_quiz(&mut input, &mut output, &mut source, &mut scores, args.questions)?;
    app::print_stats(&mut output, &scores)?;

    Ok(())
}

/// File store in the resolved data folder, or memory when that is unusable
fn open_store(args: &Args, config: &SiteConfig) -> Box<dyn KeyValueStore> {
    if args.in_memory {
        info!("Scores kept in memory only");
        return Box::new(MemoryStore::new());
    }

    let folder = resolve_data_folder(args.data_folder.as_deref(), config);
    match FileStore::open(&folder) {
        Ok(store) => {
            info!("Score folder: {}", folder.display());
            Box::new(store)
        }
        Err(e) => {
            warn!(
                "Cannot use score folder {} ({}), scores kept in memory only",
                folder.display(),
                e
            );
            Box::new(MemoryStore::new())
        }
    }
}
