use serde::{Deserialize, Serialize};

/// A detected interaction between a searched drug and a registered medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Name of the searched record whose interaction text mentions the conflict.
    pub searched_drug: String,
    /// Display label for the registered medication or ingredient that matched.
    pub conflict_drug: String,
    /// Interaction text with the matched span wrapped in `<b>…</b>`.
    pub info: String,
}
