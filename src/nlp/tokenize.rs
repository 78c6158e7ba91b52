use regex::Regex;
use std::sync::OnceLock;

/// Words that end in a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "st", "jr", "sr", "prof", "rev", "hon", "capt", "col", "gen", "lt",
    "sgt", "mt", "vs", "etc", "no", "vol", "ch", "fig", "co", "inc", "ltd",
];

const CLOSERS: &[char] = &['"', '\'', '’', '”', ')', ']'];

/// Treebank clitics split off the end of a word. `n't` goes first so
/// "don't" becomes "do" + "n't".
const CLITICS: &[&str] = &["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

/// Split running text into sentences on `.`, `!` and `?`.
///
/// A terminator only ends a sentence when whitespace follows it and the next
/// word does not start in lowercase. A period after a known abbreviation or a
/// single-letter initial never ends one.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if !matches!(c, '.' | '!' | '?') {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < chars.len() && (matches!(chars[j].1, '.' | '!' | '?') || CLOSERS.contains(&chars[j].1)) {
            j += 1;
        }
        let end = chars.get(j).map(|&(p, _)| p).unwrap_or(text.len());
        let at_boundary = chars.get(j).map_or(true, |&(_, ch)| ch.is_whitespace());

        if at_boundary
            && next_word_starts_sentence(&chars[j..])
            && !(c == '.' && ends_with_abbreviation(&text[start..pos]))
        {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
        i = j;
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

fn next_word_starts_sentence(rest: &[(usize, char)]) -> bool {
    rest.iter()
        .map(|&(_, c)| c)
        .find(|c| !c.is_whitespace())
        .map_or(true, |c| !c.is_lowercase())
}

fn ends_with_abbreviation(before: &str) -> bool {
    let word = before.rsplit(char::is_whitespace).next().unwrap_or("");
    let word = word
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    let single_letter = word.chars().count() == 1 && word.chars().all(char::is_alphabetic);
    single_letter || ABBREVIATIONS.contains(&word.as_str())
}

/// Replace every period that is not followed by whitespace (a period at the
/// very end included) with a space, so "U.S.A" or "end.Next" do not fuse
/// into one word.
pub fn detach_periods(sentence: &str) -> String {
    let mut out = String::with_capacity(sentence.len());
    let mut chars = sentence.chars().peekable();
    while let Some(c) = chars.next() {
        let followed_by_space = chars.peek().is_some_and(|n| n.is_whitespace());
        if c == '.' && !followed_by_space {
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}

/// Treebank-style word tokenization: words keep inner hyphens and
/// apostrophes, punctuation is split off one mark at a time (runs of dots
/// or dashes stay together), and clitics are split from their host.
pub fn word_tokenize(sentence: &str) -> Vec<String> {
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    let re = WORD_RE.get_or_init(|| {
        Regex::new(r"[\p{L}\p{N}_]+(?:['’\-][\p{L}\p{N}_]+)*|\.{2,}|-{2,}|[^\s\p{L}\p{N}_]").unwrap()
    });

    let mut tokens = Vec::new();
    for m in re.find_iter(sentence) {
        let word = m.as_str().replace('’', "'");
        match split_clitic(&word) {
            Some((host, clitic)) => {
                tokens.push(host.to_string());
                tokens.push(clitic.to_string());
            }
            None => tokens.push(word),
        }
    }
    tokens
}

fn split_clitic(word: &str) -> Option<(&str, &str)> {
    let lower_len = word.len();
    CLITICS.iter().find_map(|clitic| {
        if lower_len > clitic.len() && word.to_lowercase().ends_with(clitic) {
            let cut = lower_len - clitic.len();
            word.is_char_boundary(cut).then(|| (&word[..cut], &word[cut..]))
        } else {
            None
        }
    })
}
