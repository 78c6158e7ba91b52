use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use vocab_loader::book::ingest_book;
use vocab_loader::db;
use vocab_loader::settings::BookSettings;
use vocab_loader::wordnet::WordNet;

#[derive(Parser)]
#[command(name = "book_parser", about = "Extract an EPUB's vocabulary into a book record")]
struct Cli {
    /// TOML settings file; VOCAB_* environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,
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
    let settings = BookSettings::load(cli.config.as_deref())?;
    info!(settings_loaded = ?settings, msg = "Starting book parser");

    println!("Book Parser: {}", settings.title);
    println!("============\n");

    let conn = db::connect(&settings.database_path)?;
    println!("Database: {:?}", settings.database_path);
    db::create_tables(&conn)?;

    let wordnet = WordNet::load(&settings.wordnet_dir)?;
    println!("WordNet: {} lemmas\n", wordnet.lemma_count());

    let summary = ingest_book(&settings, &wordnet, &conn)?;

    println!("\nBook #{} \"{}\"", summary.book_id, summary.title);
    println!("  pages (estimated): {}", summary.pages);
    println!("  difficulty:        {}", summary.difficulty);
    println!("  unique words:      {}", summary.unique_words);
    println!("  matched / total:   {} / {}", summary.matched_words, summary.total_words);
    println!("  unknown words:     {} -> {:?}", summary.unknown_words, settings.unknown_words_path());
    println!("\nDone in {:.1}s.", t0.elapsed().as_secs_f64());
    Ok(())
}
