//! CLI for tweet sentiment analysis
//!
//! Usage:
//! ```bash
//! cargo run -- init-config
//! cargo run -- train --data data/tweets.csv
//! cargo run -- score --text "I love this!"
//! cargo run -- classify --text "I love this!"
//! cargo run -- interactive
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use tweet_sentiment::{
    config::Config, experiment::Experiment, interactive::SentimentSession,
    persistence::ArtifactStore, LexiconScorer,
};

#[derive(Parser)]
#[command(name = "tweet_sentiment")]
#[command(version = "0.1.0")]
#[command(about = "Lexicon scoring vs. TF-IDF logistic regression on tweets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Log level; overrides the config file
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the lexicon, train the classifier and save artifacts
    Train {
        /// Labeled CSV (overrides data.path)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Artifact directory (overrides artifacts.model_dir)
        #[arg(short, long)]
        model_dir: Option<PathBuf>,
    },

    /// Evaluate the lexicon scorer on the labeled CSV
    Lexicon {
        /// Labeled CSV (overrides data.path)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Write per-row predictions to this CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Lexicon-score one text
    Score {
        #[arg(short, long)]
        text: String,
    },

    /// Classify one text with the trained model
    Classify {
        #[arg(short, long)]
        text: String,

        /// Artifact directory (overrides artifacts.model_dir)
        #[arg(short, long)]
        model_dir: Option<PathBuf>,
    },

    /// Read texts from stdin and answer score / classify requests
    Interactive,

    /// Write a default configuration file
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        Config::load(&cli.config)
            .with_context(|| format!("Failed to load config: {}", cli.config.display()))?
    } else {
        Config::default()
    };

    let level_name = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let log_level = match level_name {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Train { data, model_dir } => {
            if let Some(data) = data {
                config.data.path = data;
            }
            if let Some(dir) = model_dir {
                config.artifacts.model_dir = dir;
            }
            run_train(&config)?;
        }
        Commands::Lexicon { data, output } => {
            if let Some(data) = data {
                config.data.path = data;
            }
            run_lexicon(&config, output)?;
        }
        Commands::Score { text } => {
            run_score(&config, &text)?;
        }
        Commands::Classify { text, model_dir } => {
            if let Some(dir) = model_dir {
                config.artifacts.model_dir = dir;
            }
            run_classify(&config, &text)?;
        }
        Commands::Interactive => {
            let session = SentimentSession::load(&config)?;
            session.run(io::stdin().lock(), io::stdout().lock())?;
        }
        Commands::InitConfig { force } => {
            if cli.config.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    cli.config.display()
                );
            }
            Config::create_default(&cli.config)
                .with_context(|| format!("Failed to write {}", cli.config.display()))?;
            println!("Wrote default configuration to {}", cli.config.display());
        }
    }

    Ok(())
}

fn run_train(config: &Config) -> Result<()> {
    info!("Training on {}", config.data.path.display());

    let report = Experiment::run(config)
        .with_context(|| format!("Training failed on {}", config.data.path.display()))?;

    println!("\n{}\n", report);
    println!(
        "Artifacts saved to {}",
        config.artifacts.model_dir.display()
    );
    Ok(())
}

fn run_lexicon(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let evaluation = Experiment::lexicon(config, output.as_deref())
        .with_context(|| format!("Lexicon evaluation failed on {}", config.data.path.display()))?;

    println!(
        "\nLexicon scorer on {} ({} of {} rows kept)\n",
        config.data.path.display(),
        evaluation.load.kept,
        evaluation.load.total_rows
    );
    println!("{}", evaluation.report);
    println!("{}", evaluation.summary);
    Ok(())
}

fn run_score(config: &Config, text: &str) -> Result<()> {
    let scorer = LexiconScorer::from_config(&config.lexicon)?;
    let result = scorer.score(text);

    println!("Text:     {}", result.text);
    println!("Label:    {}", result.polarity);
    println!("Compound: {:+.4}", result.compound);
    println!(
        "Shares:   pos {:.3} / neu {:.3} / neg {:.3}",
        result.positive, result.neutral, result.negative
    );

    if !result.key_words.is_empty() {
        println!("\nKey words:");
        for word in &result.key_words {
            println!("  • {} ({:+.2})", word.word, word.score);
        }
    }
    Ok(())
}

fn run_classify(config: &Config, text: &str) -> Result<()> {
    let store = ArtifactStore::new(&config.artifacts.model_dir);
    let classifier = store
        .load_classifier()
        .context("Run `train` first to produce a model")?;

    let probability = classifier.predict_proba(text)?;
    let label = classifier.predict(text)?;

    println!("Text:       {}", text);
    println!("Label:      {}", label);
    println!("P(positive): {:.4}", probability);
    Ok(())
}
