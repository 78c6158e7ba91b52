use regex::Regex;
use std::sync::OnceLock;

/// Strip markup from one XHTML document. Tags and character entities become
/// a space, whitespace runs collapse to one space and non-breaking spaces
/// are dropped.
pub fn clean_content(html: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    static ENTITY_RE: OnceLock<Regex> = OnceLock::new();
    static WS_RE: OnceLock<Regex> = OnceLock::new();
    let tag_re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());
    let entity_re = ENTITY_RE.get_or_init(|| Regex::new(r"&#?[A-Za-z0-9]+;").unwrap());
    let ws_re = WS_RE.get_or_init(|| Regex::new(r"\s+").unwrap());

    let text = tag_re.replace_all(html, " ");
    let text = entity_re.replace_all(&text, " ");
    let text = ws_re.replace_all(&text, " ");
    text.replace('\u{a0}', "")
}

/// Keep at most `max_chars` characters, for log previews.
pub fn sample(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
