use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FormularyError;

/// Result codes the service uses for a successful lookup.
pub const ACCEPTED_RESULT_CODES: &[&str] = &["00", "0"];

/// Which formulary field a lookup filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStage {
    /// Trade/product name (`itemName`).
    ItemName,
    /// Active ingredient name (`ingrName`).
    IngredientName,
}

impl SearchStage {
    /// Resolution order: trade name first, ingredient second.
    pub const ORDER: [SearchStage; 2] = [SearchStage::ItemName, SearchStage::IngredientName];

    /// Query parameter carrying the search term for this stage.
    pub fn param_name(&self) -> &'static str {
        match self {
            Self::ItemName => "itemName",
            Self::IngredientName => "ingrName",
        }
    }
}

impl std::fmt::Display for SearchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemName => write!(f, "item name"),
            Self::IngredientName => write!(f, "ingredient name"),
        }
    }
}

/// One lookup against the formulary service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormularyQuery<'a> {
    pub stage: SearchStage,
    pub term: &'a str,
    pub service_key: &'a str,
    pub rows: u32,
}

impl FormularyQuery<'_> {
    /// Query string pairs. Percent-encoding is left to the transport.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("serviceKey", self.service_key.to_string()),
            (self.stage.param_name(), self.term.to_string()),
            ("type", "json".to_string()),
            ("numOfRows", self.rows.to_string()),
        ]
    }
}

/// Formulary transport abstraction (allows mocking).
///
/// Returns the raw response body of a successful (2xx) exchange.
pub trait FormularyTransport {
    fn fetch(&self, query: &FormularyQuery<'_>) -> Result<String, FormularyError>;
}

/// One raw item as returned by the service. Values stay loosely typed:
/// the service mixes strings, numbers and nulls.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDrugItem {
    pub item_name: Option<Value>,
    pub item_seq: Option<Value>,
    pub efcy_qesitm: Option<Value>,
    pub use_method_qesitm: Option<Value>,
    pub atpn_warn_qesitm: Option<Value>,
    pub intrc_qesitm: Option<Value>,
    pub main_item_ingr: Option<Value>,
    pub entp_name: Option<Value>,
    pub se_qesitm: Option<Value>,
    pub deposit_method_qesitm: Option<Value>,
}

/// Response envelope: `{header:{resultCode}, body:{items:[...]}}`.
#[derive(Debug, Default, Deserialize)]
pub struct FormularyEnvelope {
    #[serde(default)]
    pub header: Option<EnvelopeHeader>,
    #[serde(default)]
    pub body: Option<EnvelopeBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnvelopeHeader {
    #[serde(rename = "resultCode", default)]
    pub result_code: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnvelopeBody {
    #[serde(default)]
    pub items: Option<Vec<RawDrugItem>>,
}

impl FormularyEnvelope {
    pub fn parse(body: &str) -> Result<Self, FormularyError> {
        serde_json::from_str(body).map_err(|e| {
            let preview: String = body.chars().take(100).collect();
            FormularyError::MalformedResponse(format!("{e} (body starts: {preview:?})"))
        })
    }

    pub fn is_success(&self) -> bool {
        let code = self
            .header
            .as_ref()
            .and_then(|h| h.result_code.as_ref())
            .and_then(value_text);
        matches!(code, Some(c) if ACCEPTED_RESULT_CODES.contains(&c.as_str()))
    }

    /// Items of a successful response; empty for any other outcome.
    pub fn into_items(self) -> Vec<RawDrugItem> {
        if !self.is_success() {
            return Vec::new();
        }
        self.body.and_then(|b| b.items).unwrap_or_default()
    }
}

/// Textual form of a scalar JSON value. `None` for null.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stage_order_is_item_then_ingredient() {
        assert_eq!(SearchStage::ORDER[0], SearchStage::ItemName);
        assert_eq!(SearchStage::ORDER[1], SearchStage::IngredientName);
        assert_eq!(SearchStage::ItemName.param_name(), "itemName");
        assert_eq!(SearchStage::IngredientName.param_name(), "ingrName");
    }

    #[test]
    fn query_params_carry_cap_and_format() {
        let query = FormularyQuery {
            stage: SearchStage::IngredientName,
            term: "아세트아미노펜",
            service_key: "key",
            rows: 3,
        };
        let params = query.params();
        assert!(params.contains(&("serviceKey", "key".to_string())));
        assert!(params.contains(&("ingrName", "아세트아미노펜".to_string())));
        assert!(params.contains(&("type", "json".to_string())));
        assert!(params.contains(&("numOfRows", "3".to_string())));
    }

    #[test]
    fn envelope_accepts_both_success_codes() {
        for code in ["00", "0"] {
            let body = json!({"header": {"resultCode": code}, "body": {"items": [{}]}});
            let env = FormularyEnvelope::parse(&body.to_string()).unwrap();
            assert!(env.is_success());
            assert_eq!(env.into_items().len(), 1);
        }
    }

    #[test]
    fn envelope_rejects_error_code() {
        let body = json!({"header": {"resultCode": "30"}, "body": {"items": [{}]}});
        let env = FormularyEnvelope::parse(&body.to_string()).unwrap();
        assert!(env.into_items().is_empty());
    }

    #[test]
    fn envelope_missing_parts_is_empty() {
        for body in [
            json!({}),
            json!({"header": {"resultCode": "00"}}),
            json!({"header": {"resultCode": "00"}, "body": {}}),
            json!({"header": {"resultCode": "00"}, "body": {"items": null}}),
            json!({"header": null, "body": {"items": [{}]}}),
        ] {
            let env = FormularyEnvelope::parse(&body.to_string()).unwrap();
            assert!(env.into_items().is_empty(), "expected no items for {body}");
        }
    }

    #[test]
    fn unparsable_body_is_malformed() {
        let err = FormularyEnvelope::parse("<OpenAPI_ServiceResponse>").unwrap_err();
        assert!(matches!(err, FormularyError::MalformedResponse(_)));
    }

    #[test]
    fn raw_item_reads_camel_case_fields() {
        let item: RawDrugItem = serde_json::from_value(json!({
            "itemName": "타이레놀정500밀리그람",
            "itemSeq": 202005623,
            "intrcQesitm": null,
        }))
        .unwrap();
        assert_eq!(item.item_name, Some(json!("타이레놀정500밀리그람")));
        assert_eq!(item.item_seq, Some(json!(202005623)));
        assert!(item.intrc_qesitm.is_none());
        assert!(item.efcy_qesitm.is_none());
    }

    #[test]
    fn value_text_renders_scalars() {
        assert_eq!(value_text(&json!("abc")), Some("abc".into()));
        assert_eq!(value_text(&json!(42)), Some("42".into()));
        assert_eq!(value_text(&Value::Null), None);
    }
}
