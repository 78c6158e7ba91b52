//! Reader for the WordNet 3.x database files (`index.*`, `data.*`, `*.exc`).
//!
//! Everything is loaded into memory up front: the lemma index, the gloss of
//! every synset, and the morphological exception lists. Data lines are keyed
//! by the offset written at the start of the line, so the files are never
//! seeked into.

mod morphy;

use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::Pos;

#[derive(Debug, Error)]
pub enum WordNetError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{file}:{line}: {reason}")]
    Malformed {
        file: String,
        line: usize,
        reason: String,
    },
}

/// File stem for each pos that has its own set of files.
const FILE_POS: [(Pos, &str); 4] = [
    (Pos::Noun, "noun"),
    (Pos::Verb, "verb"),
    (Pos::Adjective, "adj"),
    (Pos::Adverb, "adv"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Synset {
    pub offset: u64,
    /// Synset type from the data line; adjectives may come back as satellites.
    pub pos: Pos,
    pub definition: String,
    pub examples: Vec<String>,
}

#[derive(Debug, Default)]
pub struct WordNet {
    /// lemma -> index pos -> synset offsets, in sense order.
    index: HashMap<String, HashMap<Pos, Vec<u64>>>,
    /// (file pos, offset) -> synset.
    synsets: HashMap<(Pos, u64), Synset>,
    /// index pos -> inflected form -> base forms.
    exceptions: HashMap<Pos, HashMap<String, Vec<String>>>,
}

impl WordNet {
    /// Load a WordNet `dict/` directory. Exception lists are optional.
    pub fn load(dir: &Path) -> Result<Self, WordNetError> {
        let mut wn = WordNet::default();
        for (pos, stem) in FILE_POS {
            let index_path = dir.join(format!("index.{}", stem));
            for (line_no, line) in read_lines(&index_path)? {
                let (lemma, offsets) = parse_index_line(&line).map_err(|reason| {
                    malformed(&index_path, line_no, reason)
                })?;
                wn.index.entry(lemma).or_default().insert(pos, offsets);
            }

            let data_path = dir.join(format!("data.{}", stem));
            for (line_no, line) in read_lines(&data_path)? {
                let synset = parse_data_line(&line)
                    .map_err(|reason| malformed(&data_path, line_no, reason))?;
                wn.synsets.insert((pos, synset.offset), synset);
            }

            let exc_path = dir.join(format!("{}.exc", stem));
            if exc_path.exists() {
                let table = wn.exceptions.entry(pos).or_default();
                for (_, line) in read_lines(&exc_path)? {
                    let mut parts = line.split_whitespace();
                    if let Some(inflected) = parts.next() {
                        table.insert(inflected.to_string(), parts.map(str::to_string).collect());
                    }
                }
            } else {
                debug!(path = ?exc_path, "no exception list");
            }
        }
        info!(
            lemmas = wn.index.len(),
            synsets = wn.synsets.len(),
            "WordNet loaded from {:?}",
            dir
        );
        Ok(wn)
    }

    /// Every lemma in the database, sorted and unique.
    pub fn lemma_names(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self.index.keys().map(String::as_str).collect();
        names.into_iter().collect()
    }

    pub fn lemma_count(&self) -> usize {
        self.index.len()
    }

    /// Whether `lemma` is listed under `pos` (satellites use the adjective index).
    pub fn has_lemma(&self, lemma: &str, pos: Pos) -> bool {
        self.index
            .get(lemma)
            .is_some_and(|by_pos| by_pos.contains_key(&pos.index_pos()))
    }

    fn offsets(&self, lemma: &str, pos: Pos) -> &[u64] {
        self.index
            .get(lemma)
            .and_then(|by_pos| by_pos.get(&pos.index_pos()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Synsets for a word in noun, verb, adjective, adverb order. The word
    /// is first reduced through morphy, so inflected forms resolve too.
    pub fn synsets(&self, word: &str) -> Vec<&Synset> {
        let word = word.trim().to_lowercase().replace(' ', "_");
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for pos in Pos::LOOKUP_ORDER {
            for form in self.morphy(&word, pos) {
                for &offset in self.offsets(&form, pos) {
                    if !seen.insert((pos, offset)) {
                        continue;
                    }
                    if let Some(synset) = self.synsets.get(&(pos, offset)) {
                        out.push(synset);
                    }
                }
            }
        }
        out
    }

    /// Lemmas written with underscores, split into their component words.
    pub fn multiword_expressions(&self) -> Vec<Vec<String>> {
        self.lemma_names()
            .into_iter()
            .filter(|l| is_multiword(l))
            .map(|l| l.split('_').map(str::to_string).collect())
            .collect()
    }
}

fn is_multiword(lemma: &str) -> bool {
    matches!(lemma.find('_'), Some(i) if i > 0 && i + 1 < lemma.len())
}

fn malformed(path: &Path, line: usize, reason: String) -> WordNetError {
    WordNetError::Malformed {
        file: path.display().to_string(),
        line,
        reason,
    }
}

/// Non-empty lines with their 1-based numbers; license header lines (which
/// start with a space) are skipped.
fn read_lines(path: &Path) -> Result<Vec<(usize, String)>, WordNetError> {
    let io_err = |source| WordNetError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let mut out = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() || line.starts_with(' ') {
            continue;
        }
        out.push((i + 1, line));
    }
    Ok(out)
}

/// `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt offset...`
fn parse_index_line(line: &str) -> Result<(String, Vec<u64>), String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 6 {
        return Err(format!("too few fields in index line ({})", fields.len()));
    }
    let lemma = fields[0].to_string();
    let synset_cnt: usize = fields[2]
        .parse()
        .map_err(|_| format!("bad synset count {:?}", fields[2]))?;
    let p_cnt: usize = fields[3]
        .parse()
        .map_err(|_| format!("bad pointer count {:?}", fields[3]))?;
    let first_offset = 4 + p_cnt + 2;
    let offsets = fields
        .get(first_offset..first_offset + synset_cnt)
        .ok_or_else(|| format!("expected {} offsets for {:?}", synset_cnt, lemma))?
        .iter()
        .map(|o| o.parse::<u64>().map_err(|_| format!("bad offset {:?}", o)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((lemma, offsets))
}

/// `offset lex_filenum ss_type w_cnt word lex_id ... | gloss`
fn parse_data_line(line: &str) -> Result<Synset, String> {
    let (columns, gloss) = line
        .split_once('|')
        .ok_or_else(|| "data line without gloss".to_string())?;
    let fields: Vec<&str> = columns.split_whitespace().collect();
    if fields.len() < 3 {
        return Err("too few fields in data line".to_string());
    }
    let offset = fields[0]
        .parse::<u64>()
        .map_err(|_| format!("bad offset {:?}", fields[0]))?;
    let pos = fields[2]
        .chars()
        .next()
        .and_then(Pos::from_code)
        .ok_or_else(|| format!("bad synset type {:?}", fields[2]))?;
    let (definition, examples) = split_gloss(gloss);
    Ok(Synset {
        offset,
        pos,
        definition,
        examples,
    })
}

/// Quoted segments of a gloss are examples; the rest is the definition.
fn split_gloss(gloss: &str) -> (String, Vec<String>) {
    static QUOTED_RE: OnceLock<Regex> = OnceLock::new();
    let re = QUOTED_RE.get_or_init(|| Regex::new(r#""([^"]*)""#).unwrap());
    let examples = re
        .captures_iter(gloss)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();
    let definition = re
        .replace_all(gloss, "")
        .trim()
        .trim_matches(|c| c == ';' || c == ' ')
        .to_string();
    (definition, examples)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn fixture() -> WordNet {
        WordNet::load(Path::new("tests/fixtures/wordnet")).unwrap()
    }

    #[test]
    fn parses_index_line_with_pointers() {
        let (lemma, offsets) =
            parse_index_line("cat n 2 3 @ ~ + 2 1 02121620 02985606  ").unwrap();
        assert_eq!(lemma, "cat");
        assert_eq!(offsets, vec![2121620, 2985606]);
        assert!(parse_index_line("cat n 3 0 3 0 02121620").is_err());
    }

    #[test]
    fn parses_data_line_gloss() {
        let s = parse_data_line(
            "00381097 00 s 01 red 0 000 | having any of numerous bright colors; \"a red apple\"; \"red roses\"  ",
        )
        .unwrap();
        assert_eq!(s.offset, 381097);
        assert_eq!(s.pos, Pos::Satellite);
        assert_eq!(s.definition, "having any of numerous bright colors");
        assert_eq!(s.examples, vec!["a red apple", "red roses"]);
    }

    #[test]
    fn loads_fixture_dictionary() {
        let wn = fixture();
        let names = wn.lemma_names();
        assert!(names.contains(&"cat"));
        assert!(names.contains(&"ice_cream"));
        assert!(names.windows(2).all(|w| w[0] < w[1]));
        assert!(wn.has_lemma("cat", Pos::Verb));
        assert!(wn.has_lemma("red", Pos::Satellite));
        assert!(!wn.has_lemma("cat", Pos::Adverb));
    }

    #[test]
    fn synsets_follow_lookup_order_and_resolve_inflections() {
        let wn = fixture();
        let pos: Vec<Pos> = wn.synsets("cat").iter().map(|s| s.pos).collect();
        assert_eq!(pos, vec![Pos::Noun, Pos::Noun, Pos::Verb]);

        let plural: Vec<u64> = wn.synsets("cats").iter().map(|s| s.offset).collect();
        let base: Vec<u64> = wn.synsets("cat").iter().map(|s| s.offset).collect();
        assert_eq!(plural, base);
        assert!(wn.synsets("zorblax").is_empty());
    }

    #[test]
    fn multiword_expressions_split_on_underscore() {
        let wn = fixture();
        let mwes = wn.multiword_expressions();
        assert!(mwes.contains(&vec!["ice".to_string(), "cream".to_string()]));
        assert!(mwes.iter().all(|m| m.len() >= 2));
    }
}
