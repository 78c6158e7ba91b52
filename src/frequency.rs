//! Lemma frequency ranks, keyed by (lemma, part-of-speech code).

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankLookup {
    Ranked(i64),
    Unranked,
    /// Several rows share the key; no rank is chosen.
    Ambiguous(usize),
}

impl RankLookup {
    /// Stored value: the rank, or -1.
    pub fn value(self) -> i64 {
        match self {
            RankLookup::Ranked(r) => r,
            RankLookup::Unranked | RankLookup::Ambiguous(_) => -1,
        }
    }
}

#[derive(Debug, Default)]
pub struct FrequencyTable {
    ranks: HashMap<(String, String), Vec<i64>>,
    rows: usize,
}

impl FrequencyTable {
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let rows = match ext.as_str() {
            "csv" => read_delimited(path, b',')?,
            "tsv" | "txt" => read_delimited(path, b'\t')?,
            _ => read_workbook(path)?,
        };
        let table = FrequencyTable::from_rows(rows)
            .with_context(|| format!("Bad frequency table {:?}", path))?;
        info!(rows = table.rows, keys = table.ranks.len(), "frequency table loaded from {:?}", path);
        Ok(table)
    }

    /// First row is the header; it must name `lemma`, `PoS` and `rank`.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self> {
        let mut iter = rows.into_iter();
        let Some(header) = iter.next() else {
            return Ok(FrequencyTable::default());
        };
        let column = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .with_context(|| format!("missing column {:?}", name))
        };
        let (lemma_col, pos_col, rank_col) = (column("lemma")?, column("pos")?, column("rank")?);

        let mut table = FrequencyTable::default();
        for (i, row) in iter.enumerate() {
            let cell = |c: usize| row.get(c).map(|s| s.trim()).unwrap_or("");
            let rank = match parse_rank(cell(rank_col)) {
                Some(r) => r,
                None => {
                    debug!(row = i + 2, value = cell(rank_col), "skipping row without numeric rank");
                    continue;
                }
            };
            table.insert(cell(lemma_col), cell(pos_col), rank);
        }
        Ok(table)
    }

    pub fn insert(&mut self, lemma: &str, pos: &str, rank: i64) {
        self.ranks
            .entry((lemma.to_string(), pos.to_string()))
            .or_default()
            .push(rank);
        self.rows += 1;
    }

    /// Exact (lemma, pos) match.
    pub fn rank(&self, lemma: &str, pos: &str) -> RankLookup {
        match self.ranks.get(&(lemma.to_string(), pos.to_string())).map(Vec::as_slice) {
            None | Some([]) => RankLookup::Unranked,
            Some([r]) => RankLookup::Ranked(*r),
            Some(many) => RankLookup::Ambiguous(many.len()),
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Integer ranks, thousands separators allowed ("1,200").
fn parse_rank(raw: &str) -> Option<i64> {
    let raw = raw.replace(',', "");
    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Bad record in {:?}", path))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn read_workbook(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path).with_context(|| format!("Failed to open {:?}", path))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => bail!("{:?} has no worksheets", path),
    };
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn exact_match_only() {
        let t = FrequencyTable::from_rows(vec![
            row(&["rank", "lemma", "PoS", "freq"]),
            row(&["5", "see", "v", "1000"]),
            row(&["700", "cat", "n", "40"]),
        ])
        .unwrap();
        assert_eq!(t.rank("see", "v"), RankLookup::Ranked(5));
        assert_eq!(t.rank("see", "n"), RankLookup::Unranked);
        assert_eq!(t.rank("Cat", "n"), RankLookup::Unranked);
        assert_eq!(t.rank("see", "n").value(), -1);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn duplicate_rows_are_ambiguous() {
        let mut t = FrequencyTable::default();
        t.insert("light", "n", 300);
        t.insert("light", "n", 900);
        assert_eq!(t.rank("light", "n"), RankLookup::Ambiguous(2));
        assert_eq!(t.rank("light", "n").value(), -1);
    }

    #[test]
    fn header_is_required() {
        assert!(FrequencyTable::from_rows(vec![row(&["word", "rank"])]).is_err());
        assert!(FrequencyTable::from_rows(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn non_numeric_ranks_are_skipped() {
        let t = FrequencyTable::from_rows(vec![
            row(&["lemma", "PoS", "rank"]),
            row(&["cat", "n", "n/a"]),
            row(&["dog", "n", "12.0"]),
        ])
        .unwrap();
        assert_eq!(t.rank("cat", "n"), RankLookup::Unranked);
        assert_eq!(t.rank("dog", "n"), RankLookup::Ranked(12));
    }

    #[test]
    fn loads_csv_fixture() {
        let t = FrequencyTable::load(Path::new("tests/fixtures/lemmas.csv")).unwrap();
        assert_eq!(t.rank("cat", "n"), RankLookup::Ranked(1200));
        assert_eq!(t.rank("see", "v"), RankLookup::Ambiguous(2));
        assert_eq!(t.rank("dog", "n"), RankLookup::Unranked);
    }

    #[test]
    fn quoted_fields_keep_their_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quoted.csv");
        std::fs::write(
            &path,
            "rank,lemma,PoS,freq\n\"1,200\",cat,n,20100\n\"85\",dog,n,\"20,100\"\n",
        )
        .unwrap();
        let t = FrequencyTable::load(&path).unwrap();
        assert_eq!(t.rank("cat", "n"), RankLookup::Ranked(1200));
        assert_eq!(t.rank("dog", "n"), RankLookup::Ranked(85));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn tab_separated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lemmas.tsv");
        std::fs::write(&path, "lemma\tPoS\trank\nbook\tn\t850\n\nred\ts\t900\n").unwrap();
        let t = FrequencyTable::load(&path).unwrap();
        assert_eq!(t.rank("book", "n"), RankLookup::Ranked(850));
        assert_eq!(t.rank("red", "s"), RankLookup::Ranked(900));
    }

    #[test]
    fn loads_xlsx_fixture() {
        let t = FrequencyTable::load(Path::new("tests/fixtures/lemmas.xlsx")).unwrap();
        // header is "Rank", "Lemma", "PoS"
        assert_eq!(t.rank("cat", "n"), RankLookup::Ranked(1200));
        assert_eq!(t.rank("dog", "n"), RankLookup::Ranked(12));
        assert_eq!(t.rank("run", "n"), RankLookup::Ranked(85));
        assert_eq!(t.rank("king", "n"), RankLookup::Unranked);
        assert_eq!(t.rank("see", "v"), RankLookup::Ambiguous(2));
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn numeric_cells_render_as_integers() {
        assert_eq!(cell_text(&Data::Float(1200.0)), "1200");
        assert_eq!(cell_text(&Data::Int(85)), "85");
        assert_eq!(cell_text(&Data::Float(3.5)), "3.5");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
