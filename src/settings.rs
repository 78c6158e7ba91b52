//! Run settings. A TOML file provides the base values and `VOCAB_`-prefixed
//! environment variables override them.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "VOCAB";
const DEFAULT_DATABASE: &str = "data/vocabler.sqlite";
const DEFAULT_WORDNET: &str = "data/wordnet";
const DEFAULT_OUTPUT: &str = "generated-texts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImportPolicy {
    /// Insert a new record per lemma on every run.
    Append,
    /// Replace the first record with the same lemma, insert otherwise.
    #[default]
    Upsert,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookSettings {
    pub title: String,
    #[serde(default)]
    epub_path: Option<PathBuf>,
    pub start_page: usize,
    pub end_page: usize,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cover_image: String,
    pub lexile_score: i32,
    #[serde(default)]
    pub affiliate_link: Option<String>,
    #[serde(default = "default_database")]
    pub database_path: PathBuf,
    #[serde(default = "default_wordnet")]
    pub wordnet_dir: PathBuf,
    #[serde(default = "default_output")]
    pub output_dir: PathBuf,
}

impl BookSettings {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let settings = builder(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("genres"),
            )
            .build()?
            .try_deserialize()
            .context("Invalid book settings")?;
        Ok(settings)
    }

    /// `books/<title>.epub` unless set explicitly.
    pub fn epub_path(&self) -> PathBuf {
        self.epub_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("books").join(format!("{}.epub", self.title)))
    }

    pub fn text_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.txt", self.title))
    }

    pub fn unknown_words_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_unknown_words.txt", self.title))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexiconSettings {
    #[serde(default = "default_database")]
    pub database_path: PathBuf,
    #[serde(default = "default_wordnet")]
    pub wordnet_dir: PathBuf,
    pub frequency_table: PathBuf,
    #[serde(default = "default_dump")]
    pub dump_path: PathBuf,
    #[serde(default)]
    pub policy: ImportPolicy,
}

impl LexiconSettings {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let settings = builder(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
            .context("Invalid lexicon settings")?;
        Ok(settings)
    }
}

fn builder(file: Option<&Path>) -> config::ConfigBuilder<config::builder::DefaultState> {
    let mut builder = Config::builder();
    if let Some(path) = file {
        builder = builder.add_source(File::from(path).required(true));
    }
    builder
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE)
}

fn default_wordnet() -> PathBuf {
    PathBuf::from(DEFAULT_WORDNET)
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_dump() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT).join("wn_list.txt")
}
