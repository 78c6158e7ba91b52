use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use vocab_loader::db;
use vocab_loader::frequency::FrequencyTable;
use vocab_loader::lexicon::import_lexicon;
use vocab_loader::report;
use vocab_loader::settings::{ImportPolicy, LexiconSettings};
use vocab_loader::wordnet::WordNet;

#[derive(Parser)]
#[command(name = "lexicon_importer", about = "Load WordNet lexical entries with frequency ranks")]
struct Cli {
    /// TOML settings file; VOCAB_* environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the configured re-import policy
    #[arg(short, long, value_enum)]
    policy: Option<ImportPolicy>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = LexiconSettings::load(cli.config.as_deref())?;
    if let Some(policy) = cli.policy {
        settings.policy = policy;
    }
    info!(settings_loaded = ?settings, msg = "Starting lexicon importer");

    println!("WordNet Lexicon Import");
    println!("======================\n");

    let conn = db::connect(&settings.database_path)?;
    println!("Database: {:?}", settings.database_path);
    db::create_tables(&conn)?;

    let wordnet = WordNet::load(&settings.wordnet_dir)?;
    let table = FrequencyTable::load(&settings.frequency_table)?;
    println!(
        "Loaded {} lemmas, {} frequency rows (policy: {:?})\n",
        wordnet.lemma_count(),
        table.len(),
        settings.policy
    );

    let pb = ProgressBar::new(wordnet.lemma_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("=>-"),
    );
    let summary = import_lexicon(&conn, &wordnet, &table, settings.policy, &pb)?;

    report::write_lexicon_dump(&settings.dump_path, &summary.senses)?;

    println!("\nInserted: {}", summary.inserted);
    println!("Updated:  {}", summary.updated);
    println!("Ambiguous frequency ranks: {}", summary.ambiguous_ranks);
    println!("Dump: {:?}", settings.dump_path);
    println!("\nDone in {:.1}s.", t0.elapsed().as_secs_f64());
    Ok(())
}
