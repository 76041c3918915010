//! The user's registered medication list, held in their session under
//! [`MY_DRUGS_KEY`].
//!
//! Entries are unique by case-folded name. Names are stored capitalized and
//! paired with the ingredient the ingredient map gives them at insertion.

use crate::ingredients::IngredientMap;
use crate::models::{capitalize, fold_case, MedicationEntry, INGREDIENT_UNKNOWN};
use crate::session::{SessionError, SessionStore};

/// Session key holding the medication list.
pub const MY_DRUGS_KEY: &str = "my_drugs";

/// Current medication list. Missing or unreadable values read as empty.
pub fn list_medications(store: &dyn SessionStore) -> Vec<MedicationEntry> {
    let Some(value) = store.get(MY_DRUGS_KEY) else {
        return Vec::new();
    };
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Stored medication list unreadable; treating as empty");
        Vec::new()
    })
}

fn store_medications(
    store: &mut dyn SessionStore,
    entries: &[MedicationEntry],
) -> Result<(), SessionError> {
    store.set(MY_DRUGS_KEY, serde_json::to_value(entries)?);
    Ok(())
}

/// Build the entry a raw user input would be stored as.
/// `None` for blank input.
pub fn new_entry(raw_name: &str, ingredients: &IngredientMap) -> Option<MedicationEntry> {
    let trimmed = raw_name.trim();
    if trimmed.is_empty() {
        return None;
    }
    let name = capitalize(trimmed);
    let ingredient = ingredients
        .resolve(&name)
        .unwrap_or(INGREDIENT_UNKNOWN)
        .to_string();
    Some(MedicationEntry { name, ingredient })
}

/// Register a medication. Returns `true` if the list changed; blank input
/// and names already present (case-insensitively) leave it untouched.
pub fn add_medication(
    store: &mut dyn SessionStore,
    raw_name: &str,
    ingredients: &IngredientMap,
) -> Result<bool, SessionError> {
    let Some(entry) = new_entry(raw_name, ingredients) else {
        return Ok(false);
    };

    let mut entries = list_medications(store);
    let folded = entry.folded_name();
    if entries.iter().any(|e| e.folded_name() == folded) {
        tracing::debug!(name = %entry.name, "Medication already registered");
        return Ok(false);
    }

    tracing::info!(name = %entry.name, ingredient = %entry.ingredient, "Medication registered");
    entries.push(entry);
    store_medications(store, &entries)?;
    Ok(true)
}

/// Remove every entry whose name matches `name` case-insensitively.
/// Returns `true` if anything was removed.
pub fn remove_medication(store: &mut dyn SessionStore, name: &str) -> Result<bool, SessionError> {
    if store.get(MY_DRUGS_KEY).is_none() {
        return Ok(false);
    }
    let folded = fold_case(name.trim());
    let entries = list_medications(store);
    let before = entries.len();

    let kept: Vec<MedicationEntry> = entries
        .into_iter()
        .filter(|e| e.folded_name() != folded)
        .collect();

    store_medications(store, &kept)?;
    Ok(kept.len() != before)
}

/// Forget the whole list.
pub fn clear_medications(store: &mut dyn SessionStore) {
    store.delete(MY_DRUGS_KEY);
}
