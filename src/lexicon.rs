use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rusqlite::Connection;
use tracing::{info, warn};

use crate::db::{self, Upserted};
use crate::frequency::{FrequencyTable, RankLookup};
use crate::models::{LexicalEntry, Pos};
use crate::settings::ImportPolicy;
use crate::wordnet::WordNet;

/// Records written per transaction.
const CHUNK_SIZE: usize = 1000;

/// One synset as it appears in the lexicon dump.
#[derive(Debug, Clone, PartialEq)]
pub struct Sense {
    pub pos: Pos,
    pub definition: String,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LemmaSenses {
    pub lemma: String,
    pub senses: Vec<Sense>,
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    /// Groups whose (lemma, pos) matched several frequency rows.
    pub ambiguous_ranks: usize,
    pub senses: Vec<LemmaSenses>,
}

impl ImportSummary {
    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Group a lemma's synsets by their own part of speech. Each group's rank is
/// looked up once, by exact (lemma, pos) match.
pub fn build_entry(wordnet: &WordNet, table: &FrequencyTable, lemma: &str) -> (LexicalEntry, LemmaSenses, usize) {
    let mut entry = LexicalEntry::new(lemma);
    let mut senses = Vec::new();
    let mut ambiguous = 0;

    for synset in wordnet.synsets(lemma) {
        let fresh = entry.group(synset.pos).is_none();
        let group = entry.group_mut(synset.pos);
        if fresh {
            let lookup = table.rank(lemma, &synset.pos.code().to_string());
            if let RankLookup::Ambiguous(rows) = lookup {
                warn!(lemma, pos = %synset.pos, rows, "several frequency rows, rank left at -1");
                ambiguous += 1;
            }
            group.freq_rank = lookup.value();
        }
        group.definitions.push(synset.definition.clone());
        group.examples.extend(synset.examples.iter().cloned());
        senses.push(Sense {
            pos: synset.pos,
            definition: synset.definition.clone(),
            examples: synset.examples.clone(),
        });
    }

    let senses = LemmaSenses {
        lemma: lemma.to_string(),
        senses,
    };
    (entry, senses, ambiguous)
}

/// Walk every WordNet lemma and write one lexical entry each.
pub fn import_lexicon(
    conn: &Connection,
    wordnet: &WordNet,
    table: &FrequencyTable,
    policy: ImportPolicy,
    progress: &ProgressBar,
) -> Result<ImportSummary> {
    let lemmas = wordnet.lemma_names();
    progress.set_length(lemmas.len() as u64);
    info!(lemmas = lemmas.len(), ?policy, "starting lexicon import");

    let mut summary = ImportSummary::default();
    for chunk in lemmas.chunks(CHUNK_SIZE) {
        conn.execute("BEGIN TRANSACTION", [])?;
        for lemma in chunk {
            let (entry, senses, ambiguous) = build_entry(wordnet, table, lemma);
            write_entry(conn, &entry, policy, &mut summary)
                .with_context(|| format!("Failed to store lexical entry {:?}", lemma))?;
            summary.ambiguous_ranks += ambiguous;
            summary.senses.push(senses);
            progress.inc(1);
        }
        conn.execute("COMMIT", [])?;
    }
    progress.finish();

    info!(
        inserted = summary.inserted,
        updated = summary.updated,
        ambiguous_ranks = summary.ambiguous_ranks,
        "lexicon import finished"
    );
    Ok(summary)
}

fn write_entry(conn: &Connection, entry: &LexicalEntry, policy: ImportPolicy, summary: &mut ImportSummary) -> Result<()> {
    match policy {
        ImportPolicy::Append => {
            db::insert_lexical_entry(conn, entry)?;
            summary.inserted += 1;
        }
        ImportPolicy::Upsert => match db::upsert_lexical_entry(conn, entry)? {
            Upserted::Inserted(_) => summary.inserted += 1,
            Upserted::Updated(_) => summary.updated += 1,
        },
    }
    Ok(())
}
