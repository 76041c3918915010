use serde::{Deserialize, Serialize};

/// Sentinel for a formulary field that was absent, null-like, or empty.
pub const NO_INFORMATION: &str = "no information";

/// One resolved formulary entry, normalized for display and matching.
///
/// Every text field is trimmed and free of `<p>` tags; missing values carry
/// [`NO_INFORMATION`] instead of being empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugRecord {
    pub name: String,
    pub item_id: Option<String>,
    pub effect: String,
    pub dosage: String,
    pub precaution: String,
    pub interaction_text: String,
    pub ingredient: String,
    pub manufacturer: String,
    pub side_effects: String,
    pub storage: String,
}

impl DrugRecord {
    /// Whether the interaction field carries anything worth scanning.
    pub fn has_interaction_text(&self) -> bool {
        self.interaction_text.trim().to_lowercase() != NO_INFORMATION
    }
}
