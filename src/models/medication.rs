use serde::{Deserialize, Serialize};

/// Sentinel ingredient for a medication the ingredient map does not know.
pub const INGREDIENT_UNKNOWN: &str = "ingredient unknown";

/// One medication the user already takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationEntry {
    /// Canonical capitalization: first character upper-case, rest lower-case.
    pub name: String,
    /// Mapped active ingredient, or [`INGREDIENT_UNKNOWN`].
    pub ingredient: String,
}

impl MedicationEntry {
    pub fn new(name: impl Into<String>, ingredient: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ingredient: ingredient.into(),
        }
    }

    pub fn has_known_ingredient(&self) -> bool {
        self.ingredient != INGREDIENT_UNKNOWN
    }

    /// Case-folded name, the identity used for dedup and removal.
    pub fn folded_name(&self) -> String {
        fold_case(&self.name)
    }
}

/// Lower-case `s` one character at a time.
///
/// Unlike `str::to_lowercase` this ignores word position, so a final
/// `Σ` folds to `σ` like any other. Every comparison of names, keywords and
/// interaction text goes through this so both sides fold identically.
pub fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
