//! impute - batch author name disambiguation
//!
//! Reads tab-separated mention lists, resolves them into author clusters,
//! and writes assignment and evaluation reports.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use impute_core::{
    best_match_f_score, estimate, read_mentions, read_mentions_from_path, write_assignments,
    write_merges_needed, write_splits_needed, ImputeConfig, Partition, Pipeline,
};
use impute_names::{parse, NameFrequencyModel};

#[derive(Parser)]
#[command(
    name = "impute",
    about = "Author name disambiguation over bibliographic mention lists",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a mention corpus into author clusters
    Resolve {
        /// Tab-separated input: paperId, comma-separated name list,
        /// optional truth author id
        #[arg(long)]
        input: PathBuf,
        /// Assignment output path
        #[arg(long)]
        output: PathBuf,
        /// Precomputed name frequency model (JSON); trained from the input
        /// corpus when absent
        #[arg(long)]
        model: Option<PathBuf>,
        /// Threshold and likelihood configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write merge/split reports next to the output and log the
        /// best-case F-score
        #[arg(long)]
        truth: bool,
    },
    /// Train a name frequency model and write it as JSON
    TrainModel {
        /// Either tab-separated mentions or one raw name per line
        #[arg(long)]
        input: PathBuf,
        /// Model output path (JSON)
        #[arg(long)]
        output: PathBuf,
    },
    /// Estimate coauthor likelihood tables from a truth-labeled corpus
    Estimate {
        /// Tab-separated input with truth author ids
        #[arg(long)]
        input: PathBuf,
        /// Seed for non-match pair sampling
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Resolve {
            input,
            output,
            model,
            config,
            truth,
        } => resolve(&input, &output, model.as_deref(), config.as_deref(), truth),
        Command::TrainModel { input, output } => train_model(&input, &output),
        Command::Estimate { input, seed } => estimate_tables(&input, seed),
    }
}

fn resolve(
    input: &Path,
    output: &Path,
    model_path: Option<&Path>,
    config_path: Option<&Path>,
    truth: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let (mentions, stats) = read_mentions_from_path(input)?;
    tracing::info!(
        "Loaded {} mentions on {} papers ({} skipped, {} with truth ids)",
        stats.mentions,
        stats.papers,
        stats.skipped,
        stats.with_truth
    );

    let model = match model_path {
        Some(path) => {
            let model = NameFrequencyModel::from_json_reader(BufReader::new(File::open(path)?))?;
            tracing::info!(
                "Loaded model of {} names from {}",
                model.names_seen(),
                path.display()
            );
            model
        }
        None => {
            let model = NameFrequencyModel::train(mentions.iter().map(|m| &m.name));
            tracing::info!(
                "Trained model from the input corpus: {} names",
                model.names_seen()
            );
            model
        }
    };

    let mut partition = Partition::from_mentions(mentions);
    let mut pipeline = Pipeline::new(&config, &model);
    pipeline.run(&mut partition);

    write_assignments(&partition, BufWriter::new(File::create(output)?))?;
    tracing::info!("Wrote assignments to {}", output.display());

    if truth {
        let merges_path = companion_path(output, "nm");
        write_merges_needed(&partition, BufWriter::new(File::create(&merges_path)?))?;
        let splits_path = companion_path(output, "ns");
        write_splits_needed(&partition, BufWriter::new(File::create(&splits_path)?))?;
        tracing::info!(
            "Wrote evaluation reports to {} and {}",
            merges_path.display(),
            splits_path.display()
        );
        match best_match_f_score(&partition) {
            Some(score) => tracing::info!("Best-case F-score: {:.4}", score),
            None => tracing::warn!("No truth ids in the corpus; F-score unavailable"),
        }
    }
    Ok(())
}

fn train_model(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(input)?;
    let model = if text.contains('\t') {
        let (mentions, stats) = read_mentions(text.as_bytes())?;
        tracing::info!("Training from {} corpus mentions", stats.mentions);
        NameFrequencyModel::train(mentions.iter().map(|m| &m.name))
    } else {
        let mut model = NameFrequencyModel::default();
        let mut skipped = 0usize;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse(line) {
                Ok(name) => model.add_name(&name),
                Err(err) => {
                    tracing::warn!("Skipping name: {}", err);
                    skipped += 1;
                }
            }
        }
        tracing::info!("Trained from a raw name list ({} names skipped)", skipped);
        model
    };

    model.to_json_writer(BufWriter::new(File::create(output)?))?;
    tracing::info!(
        "Wrote model of {} names to {}",
        model.names_seen(),
        output.display()
    );
    Ok(())
}

fn estimate_tables(input: &Path, seed: u64) -> Result<(), Box<dyn std::error::Error>> {
    let (mentions, stats) = read_mentions_from_path(input)?;
    tracing::info!(
        "Estimating from {} mentions ({} with truth ids)",
        stats.mentions,
        stats.with_truth
    );

    let estimated = estimate(&mentions, seed)?;
    tracing::info!(
        "{} authors, {:.2} papers per author",
        estimated.authors,
        estimated.papers_per_author
    );
    print!("{}", estimated.to_toml_fragment());
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ImputeConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let config = ImputeConfig::from_toml(&text)?;
            tracing::info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(ImputeConfig::default()),
    }
}

fn companion_path(output: &Path, extension: &str) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
