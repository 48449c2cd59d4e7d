use std::collections::HashMap;

/// Splits a product name into normalized tokens: runs of non-alphanumeric
/// characters delimit, tokens are case-folded, empties are dropped.
pub fn tokenize(name: &str) -> impl Iterator<Item = String> + '_ {
    name.split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// Token-to-index mapping scoped to a single recommendation request.
///
/// Indexes are assigned in first-seen order across the names the vocabulary
/// was built from, so every vector drawn from the same vocabulary shares
/// dimensions.
#[derive(Debug, Default)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn build<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut index = HashMap::new();
        for name in names {
            for token in tokenize(name) {
                let next = index.len();
                index.entry(token).or_insert(next);
            }
        }
        Self { index }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Term-frequency vector for `name`, sized to the vocabulary. Tokens
    /// the vocabulary has never seen are ignored.
    pub fn term_frequencies(&self, name: &str) -> Vec<f64> {
        let mut counts = vec![0.0; self.index.len()];
        for token in tokenize(name) {
            if let Some(&slot) = self.index.get(&token) {
                counts[slot] += 1.0;
            }
        }
        counts
    }
}
