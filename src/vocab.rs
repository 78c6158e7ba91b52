use anyhow::Result;
use rusqlite::Connection;
use std::collections::{BTreeSet, HashMap};

use crate::db;
use crate::models::{Pos, VocabEntry};
use crate::nlp::Analysis;

/// Resolves a lemma to the id of its lexical entry.
pub trait EntryLookup {
    fn find_entry_id(&self, lemma: &str) -> Result<Option<i64>>;
}

impl EntryLookup for Connection {
    fn find_entry_id(&self, lemma: &str) -> Result<Option<i64>> {
        db::find_lexical_entry_id(self, lemma)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    /// Sorted by frequency, highest first; ties keep first-seen order.
    pub entries: Vec<VocabEntry>,
    pub unmatched: BTreeSet<String>,
    /// Every token that survived tokenization, tagged or not.
    pub total_words: usize,
    /// Occurrences of lemmas that matched a lexical entry.
    pub matched_words: usize,
}

impl Vocabulary {
    pub fn unique_words(&self) -> usize {
        self.entries.len()
    }
}

/// Per-book lemma counter. Each distinct lemma costs one store lookup.
pub struct VocabularyBuilder<'a, L: EntryLookup + ?Sized> {
    lookup: &'a L,
    entries: Vec<VocabEntry>,
    by_lemma: HashMap<String, usize>,
    unmatched: BTreeSet<String>,
    total_words: usize,
    matched_words: usize,
}

impl<'a, L: EntryLookup + ?Sized> VocabularyBuilder<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        VocabularyBuilder {
            lookup,
            entries: Vec::new(),
            by_lemma: HashMap::new(),
            unmatched: BTreeSet::new(),
            total_words: 0,
            matched_words: 0,
        }
    }

    pub fn add(&mut self, analysis: &Analysis) -> Result<()> {
        self.total_words += 1;
        match analysis {
            Analysis::Lemma { lemma, pos } => self.add_lemma(lemma, *pos),
            Analysis::Untagged(_) => Ok(()),
        }
    }

    fn add_lemma(&mut self, lemma: &str, pos: Pos) -> Result<()> {
        if let Some(&i) = self.by_lemma.get(lemma) {
            self.entries[i].freq += 1;
            self.matched_words += 1;
            return Ok(());
        }
        if self.unmatched.contains(lemma) {
            return Ok(());
        }
        match self.lookup.find_entry_id(lemma)? {
            Some(id) => {
                self.by_lemma.insert(lemma.to_string(), self.entries.len());
                self.entries.push(VocabEntry {
                    lexical_entry_id: id,
                    lemma: lemma.to_string(),
                    pos,
                    freq: 1,
                });
                self.matched_words += 1;
            }
            None => {
                self.unmatched.insert(lemma.to_string());
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Vocabulary {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.freq.cmp(&a.freq));
        Vocabulary {
            entries,
            unmatched: self.unmatched,
            total_words: self.total_words,
            matched_words: self.matched_words,
        }
    }
}

pub fn build_vocabulary<L: EntryLookup + ?Sized>(lookup: &L, analyses: &[Analysis]) -> Result<Vocabulary> {
    let mut builder = VocabularyBuilder::new(lookup);
    for a in analyses {
        builder.add(a)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct CountingLookup {
        known: HashMap<&'static str, i64>,
        calls: RefCell<Vec<String>>,
    }

    impl CountingLookup {
        fn new(known: &[(&'static str, i64)]) -> Self {
            CountingLookup {
                known: known.iter().copied().collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl EntryLookup for CountingLookup {
        fn find_entry_id(&self, lemma: &str) -> Result<Option<i64>> {
            self.calls.borrow_mut().push(lemma.to_string());
            Ok(self.known.get(lemma).copied())
        }
    }

    fn noun(l: &str) -> Analysis {
        Analysis::Lemma {
            lemma: l.to_string(),
            pos: Pos::Noun,
        }
    }

    #[test]
    fn counts_and_sorts_by_frequency() {
        let lookup = CountingLookup::new(&[("a1", 1), ("b2", 2), ("c3", 3)]);
        // frequencies: a1=3, b2=1, c3=2
        let input = [noun("a1"), noun("b2"), noun("c3"), noun("a1"), noun("c3"), noun("a1")];
        let v = build_vocabulary(&lookup, &input).unwrap();
        let order: Vec<(&str, u32)> = v.entries.iter().map(|e| (e.lemma.as_str(), e.freq)).collect();
        assert_eq!(order, vec![("a1", 3), ("c3", 2), ("b2", 1)]);
        assert_eq!(v.unique_words(), 3);
        assert_eq!(v.matched_words, 6);
        assert_eq!(v.total_words, 6);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let lookup = CountingLookup::new(&[("x", 1), ("y", 2), ("z", 3)]);
        let input = [noun("y"), noun("x"), noun("z"), noun("z")];
        let v = build_vocabulary(&lookup, &input).unwrap();
        let order: Vec<&str> = v.entries.iter().map(|e| e.lemma.as_str()).collect();
        assert_eq!(order, vec!["z", "y", "x"]);
    }

    #[test]
    fn each_lemma_is_looked_up_once() {
        let lookup = CountingLookup::new(&[("cat", 9)]);
        let input = [noun("cat"), noun("zorblax"), noun("cat"), noun("zorblax"), noun("zorblax")];
        let v = build_vocabulary(&lookup, &input).unwrap();
        assert_eq!(*lookup.calls.borrow(), vec!["cat", "zorblax"]);
        assert_eq!(v.unmatched.len(), 1);
        assert!(v.unmatched.contains("zorblax"));
        assert_eq!(v.entries[0].lexical_entry_id, 9);
        assert_eq!(v.matched_words, 2);
        assert_eq!(v.total_words, 5);
    }

    #[test]
    fn untagged_tokens_count_but_never_match() {
        let lookup = CountingLookup::new(&[("the", 1)]);
        let input = [Analysis::Untagged("the".into()), noun("the")];
        let v = build_vocabulary(&lookup, &input).unwrap();
        assert_eq!(v.total_words, 2);
        assert_eq!(v.entries[0].freq, 1);
    }

    #[test]
    fn first_pos_seen_is_kept() {
        let lookup = CountingLookup::new(&[("run", 4)]);
        let input = [
            Analysis::Lemma { lemma: "run".into(), pos: Pos::Verb },
            noun("run"),
        ];
        let v = build_vocabulary(&lookup, &input).unwrap();
        assert_eq!(v.entries.len(), 1);
        assert_eq!(v.entries[0].pos, Pos::Verb);
        assert_eq!(v.entries[0].freq, 2);
    }

    #[test]
    fn works_against_the_store() {
        let conn = Connection::open_in_memory().unwrap();
        db::create_tables(&conn).unwrap();
        let id = db::insert_lexical_entry(&conn, &crate::models::LexicalEntry::new("cat")).unwrap();
        let v = build_vocabulary(&conn, &[noun("cat"), noun("dog")]).unwrap();
        assert_eq!(v.entries[0].lexical_entry_id, id);
        assert!(v.unmatched.contains("dog"));
    }
}
