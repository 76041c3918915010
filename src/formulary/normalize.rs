use serde_json::Value;

use super::types::{value_text, RawDrugItem};
use crate::models::{DrugRecord, NO_INFORMATION};

/// Raw values the service uses to mean "nothing here".
const NULL_LIKE: &[&str] = &["none", "null", ""];

/// Convert one raw formulary item into a clean [`DrugRecord`].
///
/// `fallback_name` (the searched term) stands in when the item has no name.
/// Never fails: anything unusable becomes [`NO_INFORMATION`].
pub fn normalize(raw: &RawDrugItem, fallback_name: &str) -> DrugRecord {
    let name = raw
        .item_name
        .as_ref()
        .and_then(value_text)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| fallback_name.to_string());

    DrugRecord {
        name,
        item_id: raw.item_seq.as_ref().and_then(value_text),
        effect: clean_field(raw.efcy_qesitm.as_ref()),
        dosage: clean_field(raw.use_method_qesitm.as_ref()),
        precaution: clean_field(raw.atpn_warn_qesitm.as_ref()),
        interaction_text: clean_field(raw.intrc_qesitm.as_ref()),
        ingredient: clean_field(raw.main_item_ingr.as_ref()),
        manufacturer: clean_field(raw.entp_name.as_ref()),
        side_effects: clean_field(raw.se_qesitm.as_ref()),
        storage: clean_field(raw.deposit_method_qesitm.as_ref()),
    }
}

/// Sanitize one field, substituting the sentinel for null-like values.
pub fn clean_field(value: Option<&Value>) -> String {
    let Some(text) = value.and_then(value_text) else {
        return NO_INFORMATION.to_string();
    };
    if NULL_LIKE.contains(&text.to_lowercase().as_str()) {
        return NO_INFORMATION.to_string();
    }
    let cleaned = strip_paragraph_tags(&text);
    if cleaned.is_empty() {
        NO_INFORMATION.to_string()
    } else {
        cleaned
    }
}

/// Remove `<p>`/`</p>` tags and surrounding whitespace.
pub fn strip_paragraph_tags(text: &str) -> String {
    text.replace("<p>", "").replace("</p>", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> RawDrugItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn null_like_values_become_sentinel() {
        for raw in [Value::Null, json!("null"), json!("None"), json!(""), json!("NULL")] {
            assert_eq!(clean_field(Some(&raw)), NO_INFORMATION, "raw value {raw}");
        }
        assert_eq!(clean_field(None), NO_INFORMATION);
    }

    #[test]
    fn strips_paragraph_tags() {
        assert_eq!(clean_field(Some(&json!("<p>abc</p>"))), "abc");
        assert_eq!(
            clean_field(Some(&json!("<p>first</p>\n<p>second</p>  "))),
            "first\nsecond"
        );
    }

    #[test]
    fn whitespace_or_empty_tags_become_sentinel() {
        assert_eq!(clean_field(Some(&json!("   "))), NO_INFORMATION);
        assert_eq!(clean_field(Some(&json!("<p></p>"))), NO_INFORMATION);
    }

    #[test]
    fn numeric_values_use_text_form() {
        assert_eq!(clean_field(Some(&json!(500))), "500");
    }

    #[test]
    fn normalize_full_item() {
        let raw = item(json!({
            "itemName": "아스피린장용정100밀리그램",
            "itemSeq": "200003092",
            "efcyQesitm": "<p>이 약은 혈전 생성 억제에 사용합니다.</p>",
            "useMethodQesitm": "<p>1일 1회 복용합니다.</p>",
            "atpnWarnQesitm": null,
            "intrcQesitm": "<p>와파린과 함께 복용하지 마십시오.</p>",
            "mainItemIngr": "아세틸살리실산",
            "entpName": "바이엘코리아(주)",
        }));
        let record = normalize(&raw, "아스피린");
        assert_eq!(record.name, "아스피린장용정100밀리그램");
        assert_eq!(record.item_id.as_deref(), Some("200003092"));
        assert_eq!(record.effect, "이 약은 혈전 생성 억제에 사용합니다.");
        assert_eq!(record.dosage, "1일 1회 복용합니다.");
        assert_eq!(record.precaution, NO_INFORMATION);
        assert_eq!(record.interaction_text, "와파린과 함께 복용하지 마십시오.");
        assert_eq!(record.ingredient, "아세틸살리실산");
        assert_eq!(record.manufacturer, "바이엘코리아(주)");
        assert_eq!(record.side_effects, NO_INFORMATION);
        assert_eq!(record.storage, NO_INFORMATION);
    }

    #[test]
    fn missing_name_falls_back_to_search_term() {
        let record = normalize(&item(json!({})), "Aspirin");
        assert_eq!(record.name, "Aspirin");
        assert!(record.item_id.is_none());
        assert_eq!(record.interaction_text, NO_INFORMATION);
    }

    #[test]
    fn null_or_blank_name_falls_back() {
        let record = normalize(&item(json!({"itemName": null})), "Aspirin");
        assert_eq!(record.name, "Aspirin");
        let record = normalize(&item(json!({"itemName": "  "})), "Aspirin");
        assert_eq!(record.name, "Aspirin");
    }

    #[test]
    fn numeric_item_seq_rendered_as_text() {
        let record = normalize(&item(json!({"itemSeq": 197400207})), "x");
        assert_eq!(record.item_id.as_deref(), Some("197400207"));
    }
}
