use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tutor_engine::export::json::{export_progress_to_path, import_progress};
use tutor_engine::placement::{DimensionScores, TopicChoice, evaluate_turn, next_topic};
use tutor_engine::store::{ReviewStats, due_items, record_review};
use tutor_engine::*;

#[derive(Parser)]
#[command(name = "tutor")]
#[command(about = "Spaced-repetition scheduling and CEFR placement scoring", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML config file
    #[arg(long, env = "TUTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Progress JSON file (overrides the config)
    #[arg(long, env = "TUTOR_DATA")]
    data: Option<PathBuf>,

    /// Log level (overrides the config)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Record a review of one item and print the new schedule
    Review {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        item: String,
        /// Recall grade 0-5
        #[arg(short, long, allow_negative_numbers = true)]
        quality: i64,
        /// CEFR level of the item, e.g. B1
        #[arg(long)]
        level: Option<CefrLevel>,
    },
    /// List items due for review
    Due {
        #[arg(short, long)]
        user: String,
    },
    /// Show review totals and accuracy
    Stats {
        #[arg(short, long)]
        user: String,
    },
    /// Validate an evaluation payload and print its weighted score and level
    Level {
        /// JSON object with the five dimension scores
        #[arg(short, long)]
        scores: String,
    },
    /// Pick the next unused topic from the configured catalog
    Topic {
        /// Topics already used
        #[arg(short, long, value_delimiter = ',')]
        used: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = TutorConfig::load_or_default(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tutor_engine={}", config.log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("tutor v{} starting", env!("CARGO_PKG_VERSION"));

    let now = chrono::Utc::now();
    match cli.command {
        Command::Review {
            user,
            item,
            quality,
            level,
        } => {
            let store = load_store(&config)?;
            let progress = record_review(&store, &ReviewKey::new(user, item), level, quality, now)?;
            export_progress_to_path(&store.snapshot()?, &config.data_path)?;
            info!(key = %progress.key, "progress saved");
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        Command::Due { user } => {
            let store = load_store(&config)?;
            let due = due_items(&store, &user, now)?;
            println!("{} items due for {}", due.len(), user);
            for p in &due {
                println!(
                    "  - {} (interval {}d, due {})",
                    p.key.item_id,
                    p.state.interval,
                    p.state.due_at.to_rfc3339()
                );
            }
        }
        Command::Stats { user } => {
            let store = load_store(&config)?;
            let stats = ReviewStats::collect(&store, &user, now)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            match stats.accuracy_percentage() {
                Some(pct) => println!("accuracy: {}%", pct),
                None => println!("accuracy: no reviews yet"),
            }
        }
        Command::Level { scores } => {
            let payload: serde_json::Value = serde_json::from_str(&scores)?;
            let evaluation = DimensionScores::validate(&payload).into_result()?;
            let (weighted, level) = evaluate_turn(&evaluation.scores);
            println!("weighted score: {}", weighted);
            println!("level: {} - {}", level, level.description());
            println!("{}", level.next_step());
        }
        Command::Topic { used } => match next_topic(&used, config.topics.as_slice()) {
            TopicChoice::Catalog(topic) => println!("{}", topic),
            TopicChoice::GenerateNovel => println!("(catalog exhausted: create a new topic)"),
        },
    }
    Ok(())
}

/// Store seeded from the progress file, empty when the file does not exist yet.
fn load_store(config: &TutorConfig) -> Result<InMemoryReviewStore> {
    if !config.data_path.exists() {
        debug!(path = %config.data_path.display(), "no progress file yet");
        return Ok(InMemoryReviewStore::new());
    }
    let progress = import_progress(&config.data_path)?;
    Ok(InMemoryReviewStore::from_progress(progress))
}
