//! Text -> (lemma, part of speech) pipeline.

mod mwe;
mod tagger;
mod tokenize;

pub use mwe::MweTokenizer;
pub use tagger::{PosTagger, RuleTagger};
pub use tokenize::{detach_periods, split_sentences, word_tokenize};

use tracing::{debug, trace};

use crate::models::Pos;
use crate::wordnet::WordNet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    /// Token tagged with a WordNet part of speech, reduced to its lemma.
    Lemma { lemma: String, pos: Pos },
    /// Token whose tag has no WordNet class. Counted, never matched.
    Untagged(String),
}

pub struct TextAnalyzer<'a, T: PosTagger = RuleTagger> {
    wordnet: &'a WordNet,
    mwe: MweTokenizer,
    tagger: T,
}

impl<'a> TextAnalyzer<'a, RuleTagger> {
    pub fn new(wordnet: &'a WordNet) -> Self {
        TextAnalyzer::with_tagger(wordnet, RuleTagger)
    }
}

impl<'a, T: PosTagger> TextAnalyzer<'a, T> {
    /// Multi-word rules come from every WordNet lemma containing `_`.
    pub fn with_tagger(wordnet: &'a WordNet, tagger: T) -> Self {
        let mwe = MweTokenizer::new(wordnet.multiword_expressions());
        debug!(rules = mwe.len(), "multi-word expression rules loaded");
        TextAnalyzer {
            wordnet,
            mwe,
            tagger,
        }
    }

    pub fn analyze(&self, text: &str) -> Vec<Analysis> {
        let mut out = Vec::new();
        for sentence in split_sentences(text) {
            let sentence = detach_periods(sentence).to_lowercase();
            let tokens: Vec<String> = self
                .mwe
                .tokenize(word_tokenize(&sentence))
                .into_iter()
                .filter(|t| t.chars().count() > 1)
                .collect();
            let tags = self.tagger.tag(&tokens);

            for (token, tag) in tokens.into_iter().zip(tags) {
                trace!(word = %token, tag = %tag);
                match Pos::from_penn(&tag) {
                    Some(pos) => out.push(Analysis::Lemma {
                        lemma: self.wordnet.lemmatize(&token, pos),
                        pos,
                    }),
                    None => out.push(Analysis::Untagged(token)),
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordnet::tests::fixture;

    fn lemma(l: &str, pos: Pos) -> Analysis {
        Analysis::Lemma {
            lemma: l.to_string(),
            pos,
        }
    }

    #[test]
    fn cat_sentence_lemmatizes_plural() {
        let wn = fixture();
        let analyzer = TextAnalyzer::new(&wn);
        assert_eq!(
            analyzer.analyze("The cat sees the cats."),
            vec![
                Analysis::Untagged("the".into()),
                lemma("cat", Pos::Noun),
                lemma("see", Pos::Verb),
                Analysis::Untagged("the".into()),
                lemma("cat", Pos::Noun),
            ]
        );
    }

    #[test]
    fn multiword_expressions_and_short_tokens() {
        let wn = fixture();
        let analyzer = TextAnalyzer::new(&wn);
        let out = analyzer.analyze("I ate ice cream, a lot.");
        // "i", "a" and "," are single characters and vanish.
        assert_eq!(
            out,
            vec![
                lemma("eat", Pos::Verb),
                lemma("ice_cream", Pos::Noun),
                lemma("lot", Pos::Noun),
            ]
        );
    }

    #[test]
    fn colour_adjective_keeps_adjective_pos() {
        let wn = fixture();
        let analyzer = TextAnalyzer::new(&wn);
        assert_eq!(
            analyzer.analyze("The king sees red books."),
            vec![
                Analysis::Untagged("the".into()),
                lemma("king", Pos::Noun),
                lemma("see", Pos::Verb),
                lemma("red", Pos::Adjective),
                lemma("book", Pos::Noun),
            ]
        );
    }

    struct AllNouns;

    impl PosTagger for AllNouns {
        fn tag(&self, tokens: &[String]) -> Vec<String> {
            tokens.iter().map(|_| "NN".to_string()).collect()
        }
    }

    #[test]
    fn tagger_is_pluggable() {
        let wn = fixture();
        let analyzer = TextAnalyzer::with_tagger(&wn, AllNouns);
        assert_eq!(
            analyzer.analyze("Boxes and mice."),
            vec![lemma("box", Pos::Noun), lemma("and", Pos::Noun), lemma("mouse", Pos::Noun)]
        );
    }
}
