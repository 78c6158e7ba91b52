//! EPUB -> book record pipeline.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use std::io::{Read, Seek};
use tracing::info;

use crate::db;
use crate::difficulty::{difficulty_tier, estimated_pages};
use crate::epub::Epub;
use crate::models::BookRecord;
use crate::nlp::TextAnalyzer;
use crate::report;
use crate::settings::BookSettings;
use crate::text::sample;
use crate::vocab::{build_vocabulary, Vocabulary};
use crate::wordnet::WordNet;

#[derive(Debug, Clone)]
pub struct BookSummary {
    pub book_id: i64,
    pub title: String,
    pub pages: u32,
    pub difficulty: u8,
    pub unique_words: usize,
    pub total_words: usize,
    pub matched_words: usize,
    pub unknown_words: usize,
}

pub fn ingest_book(settings: &BookSettings, wordnet: &WordNet, conn: &Connection) -> Result<BookSummary> {
    let path = settings.epub_path();
    let epub = Epub::open(&path)?;
    ingest_epub(settings, epub, wordnet, conn)
}

/// Extract, analyze, aggregate, then store exactly one book record.
pub fn ingest_epub<R: Read + Seek>(
    settings: &BookSettings,
    mut epub: Epub<R>,
    wordnet: &WordNet,
    conn: &Connection,
) -> Result<BookSummary> {
    let author = epub.author()?.to_string();
    let publication_date = epub.publication_date()?;
    let isbn = epub.isbn();

    println!(
        "{} content documents, extracting {}..={}",
        epub.documents().len(),
        settings.start_page,
        settings.end_page
    );
    let text = epub.extract_text(settings.start_page, settings.end_page)?;
    report::write_text(&settings.text_path(), &text)?;
    info!(chars = text.len(), preview = %sample(&text, 80), "text extracted");
    println!("EPUB content extracted to {:?}", settings.text_path());

    println!("Word matching commencing");
    let analyses = TextAnalyzer::new(wordnet).analyze(&text);
    let vocabulary = build_vocabulary(conn, &analyses).context("Failed to match vocabulary")?;

    println!("Book record creation commencing");
    let record = book_record(settings, author, publication_date, isbn, &vocabulary);
    let book_id = db::insert_book(conn, &record)?;
    report::write_unknown_words(&settings.unknown_words_path(), &vocabulary.unmatched)?;

    let summary = BookSummary {
        book_id,
        title: record.title,
        pages: record.pages,
        difficulty: record.difficulty,
        unique_words: vocabulary.unique_words(),
        total_words: vocabulary.total_words,
        matched_words: vocabulary.matched_words,
        unknown_words: vocabulary.unmatched.len(),
    };
    info!(?summary, "book stored");
    Ok(summary)
}

fn book_record(
    settings: &BookSettings,
    author: String,
    publication_date: chrono::NaiveDate,
    isbn: Option<String>,
    vocabulary: &Vocabulary,
) -> BookRecord {
    BookRecord {
        title: settings.title.clone(),
        author,
        cover_image: settings.cover_image.clone(),
        pages: estimated_pages(vocabulary.total_words),
        publication_date,
        difficulty: difficulty_tier(settings.lexile_score),
        genres: settings.genres.clone(),
        unique_words: vocabulary.unique_words(),
        total_words: vocabulary.matched_words,
        vocab_list: vocabulary.entries.clone(),
        isbn,
        affiliate_link: settings.affiliate_link.clone(),
        average_rating: 0.0,
        reviews: Vec::new(),
        activity: Vec::new(),
        created_at: Utc::now(),
    }
}
