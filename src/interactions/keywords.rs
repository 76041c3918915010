use std::collections::HashSet;

use crate::models::{fold_case, MedicationEntry};

/// Case-folded identifying keywords (names and mapped ingredients) of the
/// user's registered medications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    keywords: HashSet<String>,
}

impl KeywordIndex {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Scan order for matching: longest keyword first, ties broken
    /// lexicographically. A longer keyword is the more specific mention.
    pub fn ordered(&self) -> Vec<&str> {
        let mut ordered: Vec<&str> = self.keywords.iter().map(String::as_str).collect();
        ordered.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        ordered
    }

    fn insert(&mut self, keyword: &str) {
        let folded = fold_case(keyword.trim());
        if !folded.is_empty() {
            self.keywords.insert(folded);
        }
    }
}

/// Build the keyword index for a medication list.
pub fn build_index(entries: &[MedicationEntry]) -> KeywordIndex {
    let mut index = KeywordIndex::default();
    for entry in entries {
        index.insert(&entry.name);
        if entry.has_known_ingredient() {
            index.insert(&entry.ingredient);
        }
    }
    index
}
