//! Shared pieces of the two vocabulary loaders.
//!
//!   * `book_parser`      EPUB -> text -> lemmas -> one book record
//!   * `lexicon_importer` WordNet + frequency table -> lexical entry records
//!
//! Both binaries talk to the same SQLite document store (see `db`).

pub mod book;
pub mod db;
pub mod difficulty;
pub mod epub;
pub mod frequency;
pub mod lexicon;
pub mod models;
pub mod nlp;
pub mod report;
pub mod settings;
pub mod text;
pub mod vocab;
pub mod wordnet;
