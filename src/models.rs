use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// WordNet part-of-speech class. Serialized as the one-letter WordNet code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pos {
    #[serde(rename = "n")]
    Noun,
    #[serde(rename = "v")]
    Verb,
    #[serde(rename = "a")]
    Adjective,
    #[serde(rename = "s")]
    Satellite,
    #[serde(rename = "r")]
    Adverb,
}

impl Pos {
    /// Order in which WordNet resolves a lemma without a part of speech.
    pub const LOOKUP_ORDER: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adjective, Pos::Adverb];

    pub fn code(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adjective => 'a',
            Pos::Satellite => 's',
            Pos::Adverb => 'r',
        }
    }

    pub fn from_code(code: char) -> Option<Pos> {
        match code {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' => Some(Pos::Adjective),
            's' => Some(Pos::Satellite),
            'r' => Some(Pos::Adverb),
            _ => None,
        }
    }

    /// Map a Penn Treebank tag to a WordNet class by its first letter.
    /// `S` maps to satellite adjectives; every other letter is unknown.
    pub fn from_penn(tag: &str) -> Option<Pos> {
        match tag.chars().next()?.to_ascii_uppercase() {
            'J' => Some(Pos::Adjective),
            'S' => Some(Pos::Satellite),
            'N' => Some(Pos::Noun),
            'V' => Some(Pos::Verb),
            'R' => Some(Pos::Adverb),
            _ => None,
        }
    }

    /// Satellites share the adjective index and morphology.
    pub fn index_pos(self) -> Pos {
        match self {
            Pos::Satellite => Pos::Adjective,
            other => other,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Definitions, examples and frequency rank for one part of speech of a lemma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosGroup {
    pub definitions: Vec<String>,
    pub examples: Vec<String>,
    pub freq_rank: i64,
}

impl Default for PosGroup {
    fn default() -> Self {
        PosGroup {
            definitions: Vec::new(),
            examples: Vec::new(),
            freq_rank: -1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexicalEntry {
    pub lemma: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<PosGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<PosGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<PosGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<PosGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<PosGroup>,
}

impl LexicalEntry {
    pub fn new(lemma: &str) -> Self {
        LexicalEntry {
            lemma: lemma.to_string(),
            ..Default::default()
        }
    }

    pub fn group(&self, pos: Pos) -> Option<&PosGroup> {
        match pos {
            Pos::Noun => self.n.as_ref(),
            Pos::Verb => self.v.as_ref(),
            Pos::Adjective => self.a.as_ref(),
            Pos::Satellite => self.s.as_ref(),
            Pos::Adverb => self.r.as_ref(),
        }
    }

    /// Group for `pos`, created empty (rank -1) on first access.
    pub fn group_mut(&mut self, pos: Pos) -> &mut PosGroup {
        let slot = match pos {
            Pos::Noun => &mut self.n,
            Pos::Verb => &mut self.v,
            Pos::Adjective => &mut self.a,
            Pos::Satellite => &mut self.s,
            Pos::Adverb => &mut self.r,
        };
        slot.get_or_insert_with(PosGroup::default)
    }

    pub fn groups(&self) -> impl Iterator<Item = (Pos, &PosGroup)> {
        [Pos::Noun, Pos::Verb, Pos::Adjective, Pos::Satellite, Pos::Adverb]
            .into_iter()
            .filter_map(move |pos| self.group(pos).map(|g| (pos, g)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    pub lexical_entry_id: i64,
    pub lemma: String,
    pub pos: Pos,
    pub freq: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub cover_image: String,
    pub pages: u32,
    pub publication_date: NaiveDate,
    pub difficulty: u8,
    pub genres: Vec<String>,
    pub unique_words: usize,
    /// Occurrences of tokens that matched a lexical entry.
    pub total_words: usize,
    pub vocab_list: Vec<VocabEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_link: Option<String>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub reviews: Vec<String>,
    #[serde(default)]
    pub activity: Vec<String>,
    pub created_at: DateTime<Utc>,
}
