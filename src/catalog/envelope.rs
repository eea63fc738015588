//! Response envelope unpacking
//!
//! Backends answer `{"respuesta": ..., "resultados": [...]}`. At least one
//! variant (a Lambda behind API Gateway) wraps that in `{"body": "<json>"}`,
//! with the payload encoded a second time as a string.

use super::model::CatalogItem;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

/// Markdown images with an empty target, e.g. `![imagen]()`
static EMPTY_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\(\s*\)").expect("valid regex"));

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("response body is not valid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

/// Unpacked answer + results of any catalog endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    pub answer: String,
    pub items: Vec<CatalogItem>,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.answer.is_empty() && self.items.is_empty()
    }
}

/// Unwrap a (possibly double-encoded) envelope and extract answer + records
pub fn unpack_envelope(value: Value) -> Result<SearchResponse, EnvelopeError> {
    let payload = match value {
        Value::Object(mut obj) => match obj.remove("body") {
            Some(Value::String(body)) => serde_json::from_str(&body)?,
            Some(Value::Object(inner)) => Value::Object(inner),
            Some(other) => {
                // not an envelope, keep the field where it was
                obj.insert("body".to_string(), other);
                Value::Object(obj)
            }
            None => Value::Object(obj),
        },
        other => other,
    };

    Ok(extract(&payload))
}

fn extract(payload: &Value) -> SearchResponse {
    match payload {
        Value::Array(items) => SearchResponse {
            answer: String::new(),
            items: items.iter().filter_map(CatalogItem::from_json).collect(),
        },
        Value::Object(obj) => {
            let answer = ["respuesta", "mensaje", "message"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_str))
                .map(clean_answer)
                .unwrap_or_default();

            let items = obj
                .get("resultados")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(CatalogItem::from_json).collect())
                .unwrap_or_default();

            SearchResponse { answer, items }
        }
        Value::String(s) => SearchResponse {
            answer: clean_answer(s),
            items: Vec::new(),
        },
        _ => SearchResponse::default(),
    }
}

/// Drop image markdown without a target and surrounding whitespace
pub fn clean_answer(answer: &str) -> String {
    EMPTY_IMAGE.replace_all(answer, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "respuesta": "Tienes 2 sets de Star Wars",
            "resultados": [
                {"set_number": 75192, "name": "Millennium Falcon"},
                {"set_number": 75313, "name": "AT-AT"}
            ]
        })
    }

    #[test]
    fn test_plain_envelope() {
        let response = unpack_envelope(sample()).unwrap();
        assert_eq!(response.answer, "Tienes 2 sets de Star Wars");
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[1].set_number, Some(75313));
    }

    #[test]
    fn test_string_encoded_matches_pre_parsed() {
        let encoded = json!({ "statusCode": 200, "body": sample().to_string() });
        let nested = json!({ "statusCode": 200, "body": sample() });

        let from_string = unpack_envelope(encoded).unwrap();
        let from_object = unpack_envelope(nested).unwrap();
        let direct = unpack_envelope(sample()).unwrap();

        assert_eq!(from_string, from_object);
        assert_eq!(from_string, direct);
    }

    #[test]
    fn test_invalid_body_string() {
        let result = unpack_envelope(json!({ "body": "{not json" }));
        assert!(matches!(result, Err(EnvelopeError::InvalidBody(_))));
    }

    #[test]
    fn test_missing_fields_default() {
        let response = unpack_envelope(json!({})).unwrap();
        assert!(response.is_empty());
    }

    #[test]
    fn test_non_object_results_are_skipped() {
        let response = unpack_envelope(json!({
            "resultados": [{"set_number": 1}, "garbage", 42, null]
        }))
        .unwrap();
        assert_eq!(response.items.len(), 1);
    }

    #[test]
    fn test_bare_array() {
        let response = unpack_envelope(json!([{"set_number": 10294}])).unwrap();
        assert_eq!(response.answer, "");
        assert_eq!(response.items[0].set_number, Some(10294));
    }

    #[test]
    fn test_admin_message_fallback() {
        let response = unpack_envelope(json!({ "mensaje": "Set 75192 eliminado" })).unwrap();
        assert_eq!(response.answer, "Set 75192 eliminado");
    }

    #[test]
    fn test_clean_answer_strips_empty_images() {
        assert_eq!(
            clean_answer("Aquí está ![foto]() tu set ![otra]( )"),
            "Aquí está  tu set"
        );
        assert_eq!(
            clean_answer("![ok](https://x/y.png) y ![vacía]()"),
            "![ok](https://x/y.png) y"
        );
    }
}
