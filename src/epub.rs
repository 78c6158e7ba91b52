//! Minimal EPUB reader: container -> OPF -> metadata + XHTML documents.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use quick_xml::events::{BytesStart, Event};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};
use zip::ZipArchive;

use crate::text::clean_content;

const CONTAINER_PATH: &str = "META-INF/container.xml";
const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

#[derive(Debug, Error)]
pub enum EpubError {
    #[error("container.xml names no rootfile")]
    NoRootfile,
    #[error("missing <dc:{0}> in package metadata")]
    MissingMetadata(&'static str),
    #[error("document index {index} out of range ({count} documents)")]
    NoSuchDocument { index: usize, count: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpubMetadata {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub date: Option<String>,
    pub identifiers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
    pub properties: Option<String>,
}

impl ManifestItem {
    /// Content documents; the EPUB 3 navigation document is excluded.
    fn is_document(&self) -> bool {
        self.media_type == XHTML_MEDIA_TYPE
            && !self
                .properties
                .as_deref()
                .is_some_and(|p| p.split_whitespace().any(|p| p == "nav"))
    }
}

pub struct Epub<R: Read + Seek> {
    archive: ZipArchive<R>,
    opf_dir: String,
    pub metadata: EpubMetadata,
    documents: Vec<ManifestItem>,
}

impl Epub<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        Epub::from_reader(file).with_context(|| format!("Failed to read EPUB {:?}", path))
    }
}

impl<R: Read + Seek> Epub<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let container = read_entry_string(&mut archive, CONTAINER_PATH)?;
        let opf_path = parse_container(&container)?;
        let opf = read_entry_string(&mut archive, &opf_path)?;
        let (metadata, manifest) = parse_opf(&opf).with_context(|| format!("Bad package file {}", opf_path))?;

        let opf_dir = match opf_path.rfind('/') {
            Some(i) => opf_path[..i].to_string(),
            None => String::new(),
        };
        let documents: Vec<ManifestItem> = manifest.into_iter().filter(ManifestItem::is_document).collect();
        info!(
            documents = documents.len(),
            title = metadata.title.as_deref().unwrap_or("?"),
            "EPUB opened"
        );
        Ok(Epub {
            archive,
            opf_dir,
            metadata,
            documents,
        })
    }

    pub fn documents(&self) -> &[ManifestItem] {
        &self.documents
    }

    /// Raw XHTML of the `index`th content document, in manifest order.
    pub fn read_document(&mut self, index: usize) -> Result<String> {
        let item = self.documents.get(index).ok_or(EpubError::NoSuchDocument {
            index,
            count: self.documents.len(),
        })?;
        let path = resolve_href(&self.opf_dir, &item.href);
        read_entry_string(&mut self.archive, &path)
    }

    /// Cleaned text of documents `start..=end`, concatenated. A range past
    /// the last document is clamped.
    pub fn extract_text(&mut self, start: usize, end: usize) -> Result<String> {
        let count = self.documents.len();
        if end >= count {
            warn!(start, end, count, "page range runs past the last document; clamping");
        }
        let last = end.min(count.saturating_sub(1));
        let mut text = String::new();
        if count == 0 || start > last {
            return Ok(text);
        }
        for index in start..=last {
            let html = self.read_document(index)?;
            text.push_str(&clean_content(&html));
        }
        Ok(text)
    }

    pub fn author(&self) -> Result<&str> {
        self.metadata
            .creator
            .as_deref()
            .ok_or_else(|| EpubError::MissingMetadata("creator").into())
    }

    pub fn publication_date(&self) -> Result<NaiveDate> {
        let raw = self
            .metadata
            .date
            .as_deref()
            .ok_or(EpubError::MissingMetadata("date"))?;
        parse_publication_date(raw)
    }

    pub fn isbn(&self) -> Option<String> {
        self.metadata.identifiers.iter().find_map(|id| isbn_from_identifier(id))
    }
}

fn read_entry_string<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut entry = archive
        .by_name(name)
        .with_context(|| format!("EPUB has no entry {:?}", name))?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8", name))
}

/// Join an OPF-relative href onto the OPF directory, resolving `..`.
fn resolve_href(base: &str, href: &str) -> String {
    let href = href.split('#').next().unwrap_or(href);
    let mut parts: Vec<&str> = base.split('/').filter(|p| !p.is_empty()).collect();
    for seg in href.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

fn attr(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for a in e.attributes() {
        let a = a?;
        if a.key.local_name().as_ref() == name {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Full path of the package document from `META-INF/container.xml`.
fn parse_container(xml: &str) -> Result<String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"rootfile" => {
                if let Some(path) = attr(&e, b"full-path")? {
                    return Ok(path);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    Err(EpubError::NoRootfile.into())
}

#[derive(Clone, Copy)]
enum DcField {
    Title,
    Creator,
    Date,
    Identifier,
}

fn parse_opf(xml: &str) -> Result<(EpubMetadata, Vec<ManifestItem>)> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut metadata = EpubMetadata::default();
    let mut manifest = Vec::new();
    let mut in_metadata = false;
    let mut field: Option<DcField> = None;
    let mut value = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"metadata" => in_metadata = true,
                b"title" if in_metadata => field = Some(DcField::Title),
                b"creator" if in_metadata => field = Some(DcField::Creator),
                b"date" if in_metadata => field = Some(DcField::Date),
                b"identifier" if in_metadata => field = Some(DcField::Identifier),
                b"item" => manifest.extend(manifest_item(&e)?),
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"item" => {
                manifest.extend(manifest_item(&e)?);
            }
            Ok(Event::Text(t)) if field.is_some() => value.push_str(&t.unescape()?),
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"metadata" {
                    in_metadata = false;
                }
                if let Some(f) = field.take() {
                    let v = value.trim().to_string();
                    value.clear();
                    if !v.is_empty() {
                        match f {
                            DcField::Title => {
                                metadata.title.get_or_insert(v);
                            }
                            DcField::Creator => {
                                metadata.creator.get_or_insert(v);
                            }
                            DcField::Date => {
                                metadata.date.get_or_insert(v);
                            }
                            DcField::Identifier => metadata.identifiers.push(v),
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    Ok((metadata, manifest))
}

fn manifest_item(e: &BytesStart) -> Result<Option<ManifestItem>> {
    let (Some(id), Some(href)) = (attr(e, b"id")?, attr(e, b"href")?) else {
        return Ok(None);
    };
    Ok(Some(ManifestItem {
        id,
        href,
        media_type: attr(e, b"media-type")?.unwrap_or_default(),
        properties: attr(e, b"properties")?,
    }))
}

/// `YYYY-MM-DD`, or a full RFC 3339 timestamp.
pub fn parse_publication_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .with_context(|| format!("Unrecognised publication date {:?}", raw))
}

fn isbn_from_identifier(id: &str) -> Option<String> {
    let lower = id.trim().to_lowercase();
    let body = lower
        .strip_prefix("urn:isbn:")
        .or_else(|| lower.strip_prefix("isbn:"))
        .unwrap_or(&lower);
    let digits: String = body.chars().filter(|c| *c != '-' && *c != ' ').collect();
    let valid = matches!(digits.len(), 10 | 13)
        && digits
            .chars()
            .enumerate()
            .all(|(i, c)| c.is_ascii_digit() || (i == 9 && digits.len() == 10 && c == 'x'));
    valid.then(|| digits.to_uppercase())
}
