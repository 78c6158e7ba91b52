use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::models::{BookRecord, LexicalEntry};

const SCHEMA_JSON: &str = include_str!("../schema.json");

#[derive(Deserialize)]
struct Schema {
    tables: HashMap<String, Vec<String>>,
    indexes: Vec<(String, String, String)>,
}

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn create_tables(conn: &Connection) -> Result<()> {
    let schema: Schema = serde_json::from_str(SCHEMA_JSON)?;
    for (name, cols) in &schema.tables {
        let sql = format!("CREATE TABLE IF NOT EXISTS {} ({})", name, cols.join(", "));
        conn.execute(&sql, [])?;
    }
    for (idx, table, cols) in &schema.indexes {
        let sql = format!("CREATE INDEX IF NOT EXISTS {} ON {} ({})", idx, table, cols);
        conn.execute(&sql, [])?;
    }
    Ok(())
}

/// Find-one on `lexical_entries` by lemma; the oldest record wins when
/// repeated imports left duplicates.
pub fn find_lexical_entry_id(conn: &Connection, lemma: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM lexical_entries WHERE lemma = ?1 ORDER BY id LIMIT 1",
            params![lemma],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn find_lexical_entry(conn: &Connection, lemma: &str) -> Result<Option<(i64, LexicalEntry)>> {
    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT id, doc FROM lexical_entries WHERE lemma = ?1 ORDER BY id LIMIT 1",
            params![lemma],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    match row {
        Some((id, doc)) => {
            let entry = serde_json::from_str(&doc)
                .with_context(|| format!("Corrupt lexical entry document #{}", id))?;
            Ok(Some((id, entry)))
        }
        None => Ok(None),
    }
}

pub fn insert_lexical_entry(conn: &Connection, entry: &LexicalEntry) -> Result<i64> {
    let doc = serde_json::to_string(entry)?;
    conn.execute(
        "INSERT INTO lexical_entries (lemma, doc) VALUES (?1, ?2)",
        params![entry.lemma, doc],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_lexical_entry(conn: &Connection, id: i64, entry: &LexicalEntry) -> Result<()> {
    let doc = serde_json::to_string(entry)?;
    conn.execute(
        "UPDATE lexical_entries SET lemma = ?1, doc = ?2 WHERE id = ?3",
        params![entry.lemma, doc, id],
    )?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Inserted(i64),
    Updated(i64),
}

impl Upserted {
    pub fn id(self) -> i64 {
        match self {
            Upserted::Inserted(id) | Upserted::Updated(id) => id,
        }
    }
}

/// Replace the document of the first record with this lemma, or insert one.
pub fn upsert_lexical_entry(conn: &Connection, entry: &LexicalEntry) -> Result<Upserted> {
    match find_lexical_entry_id(conn, &entry.lemma)? {
        Some(id) => {
            update_lexical_entry(conn, id, entry)?;
            Ok(Upserted::Updated(id))
        }
        None => Ok(Upserted::Inserted(insert_lexical_entry(conn, entry)?)),
    }
}

pub fn count_lexical_entries(conn: &Connection) -> Result<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM lexical_entries", [], |r| r.get(0))?;
    Ok(n as usize)
}

pub fn insert_book(conn: &Connection, book: &BookRecord) -> Result<i64> {
    let doc = serde_json::to_string(book)?;
    conn.execute(
        "INSERT INTO books (title, doc, created_at) VALUES (?1, ?2, ?3)",
        params![book.title, doc, book.created_at.to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_book(conn: &Connection, title: &str) -> Result<Option<(i64, BookRecord)>> {
    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT id, doc FROM books WHERE title = ?1 ORDER BY id LIMIT 1",
            params![title],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    match row {
        Some((id, doc)) => {
            let book = serde_json::from_str(&doc)
                .with_context(|| format!("Corrupt book document #{}", id))?;
            Ok(Some((id, book)))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pos;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_then_find_lexical_entry() {
        let conn = memory_db();
        let mut entry = LexicalEntry::new("cat");
        entry.group_mut(Pos::Noun).definitions.push("feline mammal".into());
        let id = insert_lexical_entry(&conn, &entry).unwrap();

        assert_eq!(find_lexical_entry_id(&conn, "cat").unwrap(), Some(id));
        assert_eq!(find_lexical_entry_id(&conn, "dog").unwrap(), None);
        let (found_id, found) = find_lexical_entry(&conn, "cat").unwrap().unwrap();
        assert_eq!(found_id, id);
        assert_eq!(found, entry);
    }

    #[test]
    fn plain_insert_duplicates_but_upsert_replaces() {
        let conn = memory_db();
        let first = insert_lexical_entry(&conn, &LexicalEntry::new("cat")).unwrap();
        insert_lexical_entry(&conn, &LexicalEntry::new("cat")).unwrap();
        assert_eq!(count_lexical_entries(&conn).unwrap(), 2);

        let mut updated = LexicalEntry::new("cat");
        updated.group_mut(Pos::Verb).freq_rank = 12;
        let outcome = upsert_lexical_entry(&conn, &updated).unwrap();
        assert_eq!(outcome, Upserted::Updated(first));
        assert_eq!(count_lexical_entries(&conn).unwrap(), 2);
        let (_, stored) = find_lexical_entry(&conn, "cat").unwrap().unwrap();
        assert_eq!(stored.group(Pos::Verb).unwrap().freq_rank, 12);

        let dog = upsert_lexical_entry(&conn, &LexicalEntry::new("dog")).unwrap();
        assert!(matches!(dog, Upserted::Inserted(_)));
        assert_eq!(find_lexical_entry_id(&conn, "dog").unwrap(), Some(dog.id()));
        assert_eq!(count_lexical_entries(&conn).unwrap(), 3);
    }
}
