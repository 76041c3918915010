//! Cross-reference of a searched drug's interaction text against the
//! user's registered medications.

pub mod keywords;
pub mod matcher;

pub use keywords::*;
pub use matcher::*;

use serde::Serialize;

use crate::formulary::{FormularyResolver, SearchStage};
use crate::ingredients::IngredientMap;
use crate::models::{DrugRecord, MedicationEntry, Warning};

/// Result of one search: the resolved records and any warnings they raise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOutcome {
    pub query: String,
    /// Stage that produced the records; `None` when nothing was found.
    pub stage: Option<SearchStage>,
    pub records: Vec<DrugRecord>,
    pub warnings: Vec<Warning>,
}

impl LookupOutcome {
    pub fn found(&self) -> bool {
        !self.records.is_empty()
    }
}

/// Check resolved records against a medication list.
pub fn check_interactions(
    records: &[DrugRecord],
    medications: &[MedicationEntry],
    ingredients: &IngredientMap,
) -> Vec<Warning> {
    if medications.is_empty() {
        return Vec::new();
    }
    let index = build_index(medications);
    match_interactions(records, &index, ingredients)
}

/// Resolve `query` and cross-check the records against `medications`.
pub fn lookup(
    resolver: &FormularyResolver,
    query: &str,
    medications: &[MedicationEntry],
    ingredients: &IngredientMap,
) -> LookupOutcome {
    let resolution = resolver.resolve(query);
    let stage = resolution.stage();
    let records = resolution.into_records();
    let warnings = check_interactions(&records, medications, ingredients);

    if !warnings.is_empty() {
        tracing::info!(query, count = warnings.len(), "Interaction warnings raised");
    }

    LookupOutcome {
        query: query.to_string(),
        stage,
        records,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormularyConfig;
    use crate::formulary::MockFormularyClient;
    use serde_json::json;

    fn resolver(mock: MockFormularyClient) -> FormularyResolver {
        FormularyResolver::new(Box::new(mock), FormularyConfig::new(Some("key".into())))
    }

    #[test]
    fn end_to_end_ingredient_warning() {
        let mock = MockFormularyClient::new().with_items(
            SearchStage::ItemName,
            vec![json!({
                "itemName": "Aspirin",
                "intrcQesitm": "<p>Do not take with acetaminophen</p>",
            })],
        );
        let medications = vec![MedicationEntry::new("Tylenol", "Acetaminophen")];

        let outcome = lookup(&resolver(mock), "Aspirin", &medications, IngredientMap::builtin());

        assert!(outcome.found());
        assert_eq!(outcome.stage, Some(SearchStage::ItemName));
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(
            outcome.warnings[0].conflict_drug,
            "registered drug (ingredient: ACETAMINOPHEN)"
        );
        assert_eq!(outcome.warnings[0].searched_drug, "Aspirin");
    }

    #[test]
    fn not_found_has_no_records_or_warnings() {
        let medications = vec![MedicationEntry::new("Tylenol", "Acetaminophen")];
        let outcome = lookup(
            &resolver(MockFormularyClient::new()),
            "Nothing",
            &medications,
            IngredientMap::builtin(),
        );
        assert!(!outcome.found());
        assert!(outcome.stage.is_none());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn no_medications_no_warnings() {
        let mock = MockFormularyClient::new().with_items(
            SearchStage::ItemName,
            vec![json!({"itemName": "Aspirin", "intrcQesitm": "Avoid with tylenol"})],
        );
        let outcome = lookup(&resolver(mock), "Aspirin", &[], IngredientMap::builtin());
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.warnings.is_empty());
    }
}
