//! Static trade/generic name → active ingredient table.
//!
//! Consulted when a medication is registered (to record its ingredient) and
//! when a warning is labelled (to tell an ingredient match from a name match).
//! Lookups are case-insensitive.

use std::sync::LazyLock;

use crate::models::fold_case;

/// One `name → ingredient` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientAlias {
    pub name: &'static str,
    pub ingredient: &'static str,
}

const fn alias(name: &'static str, ingredient: &'static str) -> IngredientAlias {
    IngredientAlias { name, ingredient }
}

/// Built-in table: Korean product names as the formulary service spells
/// them, followed by their English equivalents.
const BUILTIN_ALIASES: &[IngredientAlias] = &[
    alias("타이레놀", "아세트아미노펜"),
    alias("게보린", "이소프로필안티피린"),
    alias("판콜에이", "아세트아미노펜"),
    alias("아스피린", "아세틸살리실산"),
    alias("이지엔6", "이부프로펜"),
    alias("부루펜", "이부프로펜"),
    alias("아세트아미노펜", "아세트아미노펜"),
    alias("이부프로펜", "이부프로펜"),
    alias("나프록센", "나프록센"),
    alias("Tylenol", "Acetaminophen"),
    alias("Geworin", "Isopropylantipyrine"),
    alias("Pancol A", "Acetaminophen"),
    alias("Aspirin", "Acetylsalicylic acid"),
    alias("Easy-N6", "Ibuprofen"),
    alias("Brufen", "Ibuprofen"),
    alias("Acetaminophen", "Acetaminophen"),
    alias("Ibuprofen", "Ibuprofen"),
    alias("Naproxen", "Naproxen"),
];

static BUILTIN: LazyLock<IngredientMap> =
    LazyLock::new(|| IngredientMap::new(BUILTIN_ALIASES.to_vec()));

/// Immutable ingredient lookup table.
#[derive(Debug, Clone)]
pub struct IngredientMap {
    aliases: Vec<IngredientAlias>,
    /// Case-folded ingredient values, for label decisions.
    folded_ingredients: Vec<String>,
}

impl IngredientMap {
    pub fn new(aliases: Vec<IngredientAlias>) -> Self {
        let mut folded_ingredients: Vec<String> =
            aliases.iter().map(|a| fold_case(a.ingredient)).collect();
        folded_ingredients.sort();
        folded_ingredients.dedup();
        Self {
            aliases,
            folded_ingredients,
        }
    }

    /// The table shipped with the application.
    pub fn builtin() -> &'static IngredientMap {
        &BUILTIN
    }

    /// Look up the active ingredient for a trade or generic name.
    pub fn resolve(&self, name: &str) -> Option<&'static str> {
        let folded = fold_case(name.trim());
        self.aliases
            .iter()
            .find(|a| fold_case(a.name) == folded)
            .map(|a| a.ingredient)
    }

    /// Whether `keyword` equals (case-insensitively) any ingredient value.
    pub fn is_ingredient(&self, keyword: &str) -> bool {
        self.folded_ingredients
            .binary_search(&fold_case(keyword))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_brand_to_ingredient() {
        let map = IngredientMap::builtin();
        assert_eq!(map.resolve("Tylenol"), Some("Acetaminophen"));
        assert_eq!(map.resolve("타이레놀"), Some("아세트아미노펜"));
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let map = IngredientMap::builtin();
        assert_eq!(map.resolve("tylenol"), Some("Acetaminophen"));
        assert_eq!(map.resolve("PANCOL A"), Some("Acetaminophen"));
        assert_eq!(map.resolve("Pancol a"), Some("Acetaminophen"));
    }

    #[test]
    fn resolve_unknown_name() {
        assert_eq!(IngredientMap::builtin().resolve("Vitamin C"), None);
    }

    #[test]
    fn ingredient_values_recognised() {
        let map = IngredientMap::builtin();
        assert!(map.is_ingredient("acetaminophen"));
        assert!(map.is_ingredient("IBUPROFEN"));
        assert!(map.is_ingredient("이부프로펜"));
        assert!(!map.is_ingredient("tylenol"));
    }

    #[test]
    fn custom_table() {
        let map = IngredientMap::new(vec![alias("Coumadin", "Warfarin")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.resolve("coumadin"), Some("Warfarin"));
        assert!(map.is_ingredient("warfarin"));
    }
}
