//! Plain-text side outputs.

use anyhow::{Context, Result};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::lexicon::{LemmaSenses, Sense};

fn create(path: &Path) -> Result<BufWriter<fs::File>> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let file = fs::File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    Ok(BufWriter::new(file))
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    let mut out = create(path)?;
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// One lemma per line, in sorted order.
pub fn write_unknown_words(path: &Path, words: &BTreeSet<String>) -> Result<()> {
    let mut out = create(path)?;
    for word in words {
        writeln!(out, "{}", word)?;
    }
    out.flush()?;
    Ok(())
}

pub fn format_sense(sense: &Sense) -> String {
    if sense.examples.is_empty() {
        format!("({}) {}", sense.pos, sense.definition)
    } else {
        format!("({}) {} [{}]", sense.pos, sense.definition, sense.examples.iter().join("; "))
    }
}

/// `lemma: (pos) definition [examples] | ...`
pub fn format_dump_line(entry: &LemmaSenses) -> String {
    format!("{}: {}", entry.lemma, entry.senses.iter().map(format_sense).join(" | "))
}

pub fn write_lexicon_dump(path: &Path, entries: &[LemmaSenses]) -> Result<()> {
    let mut out = create(path)?;
    for entry in entries {
        writeln!(out, "{}", format_dump_line(entry))?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pos;

    #[test]
    fn dump_line_format() {
        let entry = LemmaSenses {
            lemma: "cat".into(),
            senses: vec![
                Sense {
                    pos: Pos::Noun,
                    definition: "feline mammal".into(),
                    examples: vec!["domestic cats".into(), "wildcats".into()],
                },
                Sense {
                    pos: Pos::Verb,
                    definition: "eject the contents of the stomach".into(),
                    examples: vec![],
                },
            ],
        };
        assert_eq!(
            format_dump_line(&entry),
            "cat: (n) feline mammal [domestic cats; wildcats] | (v) eject the contents of the stomach"
        );
    }

    #[test]
    fn unknown_words_are_sorted_one_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out_unknown_words.txt");
        let words: BTreeSet<String> = ["zorblax", "flibber", "mumble"].iter().map(|w| w.to_string()).collect();
        write_unknown_words(&path, &words).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "flibber\nmumble\nzorblax\n");
    }
}
