use std::ops::Range;

use super::keywords::KeywordIndex;
use crate::ingredients::IngredientMap;
use crate::models::{capitalize, DrugRecord, Warning};

const EMPHASIS_OPEN: &str = "<b>";
const EMPHASIS_CLOSE: &str = "</b>";

/// Scan each record's interaction text for a registered keyword.
///
/// At most one warning per record, in record order. Keywords are tried in
/// [`KeywordIndex::ordered`] order and the first hit wins.
pub fn match_interactions(
    records: &[DrugRecord],
    index: &KeywordIndex,
    ingredients: &IngredientMap,
) -> Vec<Warning> {
    if index.is_empty() {
        return Vec::new();
    }
    let keywords = index.ordered();
    tracing::debug!(keywords = index.len(), records = records.len(), "Scanning interaction text");

    records
        .iter()
        .filter(|record| record.has_interaction_text())
        .filter_map(|record| {
            let text = FoldedText::new(&record.interaction_text);
            let keyword = keywords.iter().find(|k| text.contains(k))?;
            tracing::debug!(drug = %record.name, keyword, "Interaction keyword matched");
            Some(Warning {
                searched_drug: record.name.clone(),
                conflict_drug: conflict_label(keyword, ingredients),
                info: text.highlight(keyword),
            })
        })
        .collect()
}

/// Display label for a matched keyword.
pub fn conflict_label(keyword: &str, ingredients: &IngredientMap) -> String {
    if ingredients.is_ingredient(keyword) {
        format!("registered drug (ingredient: {})", keyword.to_uppercase())
    } else {
        capitalize(keyword)
    }
}

/// Text paired with its lower-cased form and a byte map back to the
/// original, so a match found in the folded text can be marked in the
/// original with its case intact.
struct FoldedText<'a> {
    original: &'a str,
    folded: String,
    /// `origin[i]` = byte offset in `original` of the char that produced
    /// folded byte `i`.
    origin: Vec<usize>,
}

impl<'a> FoldedText<'a> {
    fn new(original: &'a str) -> Self {
        let mut folded = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len());
        for (offset, ch) in original.char_indices() {
            // Per-char folding, as in `fold_case`, so keywords line up.
            folded.extend(ch.to_lowercase());
            origin.resize(folded.len(), offset);
        }
        Self {
            original,
            folded,
            origin,
        }
    }

    fn contains(&self, keyword: &str) -> bool {
        self.folded.contains(keyword)
    }

    /// Original-text byte range of the first occurrence of `keyword`.
    /// `None` if the folded match does not line up with whole original chars.
    fn locate(&self, keyword: &str) -> Option<Range<usize>> {
        let start = self.folded.find(keyword)?;
        let end = start + keyword.len();

        if start > 0 && self.origin[start - 1] == self.origin[start] {
            return None;
        }
        let orig_start = self.origin[start];
        let orig_end = match self.origin.get(end) {
            Some(&next) if next == self.origin[end - 1] => return None,
            Some(&next) => next,
            None => self.original.len(),
        };
        (orig_start < orig_end).then_some(orig_start..orig_end)
    }

    /// Wrap the first occurrence of `keyword` in emphasis tags. Falls back
    /// to the unmarked text if it cannot be located.
    fn highlight(&self, keyword: &str) -> String {
        let Some(range) = self.locate(keyword) else {
            tracing::warn!(keyword, "Could not locate matched keyword; leaving text unmarked");
            return self.original.to_string();
        };
        let text = self.original;
        format!(
            "{}{EMPHASIS_OPEN}{}{EMPHASIS_CLOSE}{}",
            &text[..range.start],
            &text[range.clone()],
            &text[range.end..]
        )
    }
}
