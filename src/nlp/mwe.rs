use std::collections::HashMap;

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<String, TrieNode>,
    leaf: bool,
}

/// Merges runs of tokens that form a known multi-word expression into one
/// token joined with `_`. Matching is greedy and prefers the longest rule.
#[derive(Debug, Default)]
pub struct MweTokenizer {
    root: TrieNode,
    rules: usize,
}

impl MweTokenizer {
    pub fn new<I, R>(rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[String]>,
    {
        let mut tokenizer = MweTokenizer::default();
        for rule in rules {
            tokenizer.add(rule.as_ref());
        }
        tokenizer
    }

    pub fn add(&mut self, words: &[String]) {
        if words.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for w in words {
            node = node.children.entry(w.clone()).or_default();
        }
        if !node.leaf {
            node.leaf = true;
            self.rules += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules == 0
    }

    pub fn tokenize(&self, tokens: Vec<String>) -> Vec<String> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let mut node = &self.root;
            let mut j = i;
            let mut last_match = None;
            while let Some(next) = tokens.get(j).and_then(|t| node.children.get(t)) {
                node = next;
                j += 1;
                if node.leaf {
                    last_match = Some(j);
                }
            }
            match last_match {
                Some(end) => {
                    out.push(tokens[i..end].join("_"));
                    i = end;
                }
                None => {
                    out.push(tokens[i].clone());
                    i += 1;
                }
            }
        }
        out
    }
}
