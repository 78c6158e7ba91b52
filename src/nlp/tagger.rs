use std::collections::HashMap;
use std::sync::OnceLock;

/// Assigns one Penn Treebank tag per token.
pub trait PosTagger {
    fn tag(&self, tokens: &[String]) -> Vec<String>;
}

/// Closed-class words and clitics with a fixed tag.
const LEXICON: &[(&str, &[&str])] = &[
    (
        "DT",
        &[
            "the", "a", "an", "this", "that", "these", "those", "every", "each", "some", "any",
            "no", "all", "another", "both", "either", "neither",
        ],
    ),
    (
        "IN",
        &[
            "of", "in", "on", "at", "by", "for", "with", "from", "about", "into", "over", "after",
            "under", "between", "through", "during", "before", "without", "against", "among",
            "upon", "within", "since", "until", "toward", "towards", "across", "behind",
            "beyond", "beside", "near", "off", "like", "than", "because", "though", "although",
            "whether", "if", "while", "as", "unless", "whilst",
        ],
    ),
    ("CC", &["and", "or", "but", "nor", "yet"]),
    (
        "PRP",
        &[
            "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "myself",
            "yourself", "himself", "herself", "itself", "ourselves", "themselves", "thee",
            "thou",
        ],
    ),
    ("PRP$", &["my", "your", "his", "her", "its", "our", "their", "thy"]),
    ("WDT", &["which", "whatever", "whichever"]),
    ("WP", &["who", "whom", "what", "whoever"]),
    ("WP$", &["whose"]),
    ("WRB", &["when", "where", "why", "how", "whence", "whereupon"]),
    ("MD", &["can", "could", "may", "might", "must", "shall", "should", "will", "would", "'ll", "'d"]),
    ("TO", &["to"]),
    ("EX", &["there"]),
    ("UH", &["oh", "ah", "alas", "hey", "yes"]),
    ("POS", &["'s"]),
    ("VB", &["be", "do", "have"]),
    ("VBZ", &["is", "has", "does"]),
    ("VBP", &["am", "are", "'re", "'ve", "'m"]),
    (
        "VBD",
        &[
            "was", "were", "had", "did", "said", "ate", "went", "came", "took", "gave", "knew",
            "thought", "told", "felt", "began", "ran", "sat", "stood", "heard", "spoke", "wrote",
            "brought", "used",
        ],
    ),
    ("VBN", &["been", "done"]),
    // -ed words that are not past forms
    (
        "NN",
        &[
            "bed", "bread", "seed", "weed", "reed", "shed", "sled", "creed", "greed", "steed",
            "speed", "deed", "breed", "tweed",
        ],
    ),
    (
        "JJ",
        &["red", "sacred", "naked", "wicked", "rugged", "ragged", "crooked", "beloved", "kindred"],
    ),
    ("CD", &["hundred"]),
    ("VBG", &["being", "having", "doing"]),
    (
        "RB",
        &[
            "not", "n't", "never", "very", "too", "also", "just", "only", "then", "now", "here",
            "so", "quite", "rather", "always", "often", "again", "ever", "soon", "still",
            "already", "almost", "perhaps", "once", "away", "back", "even",
        ],
    ),
];

const ADJ_SUFFIXES: &[&str] = &["ous", "ful", "able", "ible", "ive", "less", "ic", "al", "ish"];
const NOUN_SUFFIXES: &[&str] = &["ness", "ment", "tion", "sion", "ity", "ism", "ist", "ship", "hood"];

fn lexicon() -> &'static HashMap<&'static str, &'static str> {
    static LEX: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    LEX.get_or_init(|| {
        LEXICON
            .iter()
            .flat_map(|(tag, words)| words.iter().map(move |w| (*w, *tag)))
            .collect()
    })
}

/// Lexicon, context and suffix rules over lowercase tokens. Unknown open
/// class words default to `NN`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleTagger;

impl PosTagger for RuleTagger {
    fn tag(&self, tokens: &[String]) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let prev = tags.last().map(String::as_str);
            tags.push(tag_token(token, prev).to_string());
        }
        tags
    }
}

fn tag_token(token: &str, prev: Option<&str>) -> &'static str {
    if let Some(tag) = lexicon().get(token) {
        return *tag;
    }
    if token.chars().any(|c| c.is_ascii_digit())
        && token.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
    {
        return "CD";
    }
    if !token.chars().any(char::is_alphanumeric) {
        return match token {
            "." | "!" | "?" => ".",
            "," => ",",
            "$" => "$",
            "#" => "#",
            _ => ":",
        };
    }

    match prev {
        Some("TO") | Some("MD") if !token.ends_with("ly") => return "VB",
        Some("DT") | Some("PRP$") | Some("POS") | Some("CD") => {
            return if has_suffix(token, ADJ_SUFFIXES) || is_past_form(token) {
                "JJ"
            } else if is_plural(token) {
                "NNS"
            } else {
                "NN"
            };
        }
        Some("NN") | Some("NNS") | Some("PRP") | Some("WP") | Some("EX") => {
            if is_plural(token) {
                return "VBZ";
            }
            if is_past_form(token) {
                return "VBD";
            }
        }
        _ => {}
    }

    if token.ends_with("ly") {
        "RB"
    } else if token.ends_with("ing") {
        "VBG"
    } else if is_past_form(token) {
        "VBD"
    } else if token.ends_with("est") && token.len() > 4 {
        "JJS"
    } else if has_suffix(token, ADJ_SUFFIXES) {
        "JJ"
    } else if has_suffix(token, NOUN_SUFFIXES) {
        "NN"
    } else if is_plural(token) {
        "NNS"
    } else {
        "NN"
    }
}

fn has_suffix(token: &str, suffixes: &[&str]) -> bool {
    suffixes
        .iter()
        .any(|s| token.len() > s.len() + 1 && token.ends_with(s))
}

/// `-ed` on a stem of at least three letters.
fn is_past_form(token: &str) -> bool {
    token.len() >= 5 && token.ends_with("ed")
}

fn is_plural(token: &str) -> bool {
    token.len() > 3
        && token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("is")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(sentence: &str) -> Vec<String> {
        let tokens: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
        RuleTagger.tag(&tokens)
    }

    #[test]
    fn determiner_noun_verb_pattern() {
        assert_eq!(tag("the cat sees the cats"), vec!["DT", "NN", "VBZ", "DT", "NNS"]);
    }

    #[test]
    fn modal_and_infinitive_take_base_verb() {
        assert_eq!(tag("she wants to run"), vec!["PRP", "VBZ", "TO", "VB"]);
        assert_eq!(tag("we will book"), vec!["PRP", "MD", "VB"]);
    }

    #[test]
    fn suffix_rules() {
        assert_eq!(tag("quickly"), vec!["RB"]);
        assert_eq!(tag("running"), vec!["VBG"]);
        assert_eq!(tag("the dangerous road"), vec!["DT", "JJ", "NN"]);
        assert_eq!(tag("happiness"), vec!["NN"]);
    }

    #[test]
    fn short_and_listed_ed_words_are_not_verbs() {
        assert_eq!(tag("the king sees red books"), vec!["DT", "NN", "VBZ", "JJ", "NNS"]);
        assert_eq!(tag("bed"), vec!["NN"]);
        assert_eq!(tag("she baked bread"), vec!["PRP", "VBD", "NN"]);
        assert_eq!(tag("a hundred horses"), vec!["DT", "CD", "NNS"]);
        assert_eq!(tag("the man walked"), vec!["DT", "NN", "VBD"]);
    }

    #[test]
    fn punctuation_and_numbers_are_not_open_class() {
        let tags = tag("42 , ... '' 3.5");
        assert_eq!(tags, vec!["CD", ",", ":", ":", "CD"]);
        assert!(tags.iter().all(|t| crate::models::Pos::from_penn(t).is_none()));
    }
}
