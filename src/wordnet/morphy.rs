use std::collections::HashSet;

use super::WordNet;
use crate::models::Pos;

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

const ADJ_RULES: &[(&str, &str)] = &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")];

fn rules(pos: Pos) -> &'static [(&'static str, &'static str)] {
    match pos.index_pos() {
        Pos::Noun => NOUN_RULES,
        Pos::Verb => VERB_RULES,
        Pos::Adjective => ADJ_RULES,
        _ => &[],
    }
}

fn apply_rules(forms: &[String], pos: Pos) -> Vec<String> {
    let mut out = Vec::new();
    for form in forms {
        for (old, new) in rules(pos) {
            if let Some(stem) = form.strip_suffix(old) {
                out.push(format!("{}{}", stem, new));
            }
        }
    }
    out
}

impl WordNet {
    fn known_forms(&self, forms: &[String], pos: Pos) -> Vec<String> {
        let mut seen = HashSet::new();
        forms
            .iter()
            .filter(|f| self.has_lemma(f, pos) && seen.insert(f.as_str()))
            .cloned()
            .collect()
    }

    /// Base forms of `form` under `pos` that exist in the index.
    ///
    /// An exception list hit wins outright. Otherwise the detachment rules
    /// are applied repeatedly until some generation of candidates contains
    /// a known lemma.
    pub fn morphy(&self, form: &str, pos: Pos) -> Vec<String> {
        if let Some(bases) = self
            .exceptions
            .get(&pos.index_pos())
            .and_then(|table| table.get(form))
        {
            let mut candidates = vec![form.to_string()];
            candidates.extend(bases.iter().cloned());
            return self.known_forms(&candidates, pos);
        }

        let mut forms = apply_rules(&[form.to_string()], pos);
        let mut first = vec![form.to_string()];
        first.extend(forms.iter().cloned());
        let found = self.known_forms(&first, pos);
        if !found.is_empty() {
            return found;
        }

        let mut tried: HashSet<String> = first.into_iter().collect();
        while !forms.is_empty() {
            forms = apply_rules(&forms, pos)
                .into_iter()
                .filter(|f| tried.insert(f.clone()))
                .collect();
            let found = self.known_forms(&forms, pos);
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    /// Shortest morphy candidate, or the word itself when there is none.
    pub fn lemmatize(&self, word: &str, pos: Pos) -> String {
        self.morphy(word, pos)
            .into_iter()
            .fold(None::<String>, |best, cand| match best {
                Some(b) if b.chars().count() <= cand.chars().count() => Some(b),
                _ => Some(cand),
            })
            .unwrap_or_else(|| word.to_string())
    }
}
