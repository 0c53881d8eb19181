//! Value - Closed decoding of untyped JSON values
//!
//! Wire properties and relations carry arbitrary JSON. Each value is decoded once
//! into [`PropertyValue`] and the mappers dispatch on the variant tag.

use serde_json::{Map, Value as Json};

use crate::error::{MappingError, MappingResult};

/// Runtime shape of a single wire value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Number(f64),
    String(String),
    Bool(bool),
    List(Vec<Json>),
    Object(Map<String, Json>),
}

impl PropertyValue {
    /// Decode a JSON value into its shape
    ///
    /// A number with no `f64` form decodes as `Null` rather than a made-up value.
    pub fn from_json(value: Json) -> Self {
        match value {
            Json::Null => PropertyValue::Null,
            Json::Bool(b) => PropertyValue::Bool(b),
            Json::Number(n) => n.as_f64().map_or(PropertyValue::Null, PropertyValue::Number),
            Json::String(s) => PropertyValue::String(s),
            Json::Array(items) => PropertyValue::List(items),
            Json::Object(map) => PropertyValue::Object(map),
        }
    }

    /// Name of the shape, as used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Number(_) => "number",
            PropertyValue::String(_) => "string",
            PropertyValue::Bool(_) => "boolean",
            PropertyValue::List(_) => "array",
            PropertyValue::Object(_) => "object",
        }
    }

    /// Compact JSON text of this value
    pub fn to_json_string(&self) -> String {
        self.clone().into_json().to_string()
    }

    /// Convert back to JSON
    ///
    /// Non-finite numbers have no JSON form and become `null`.
    pub fn into_json(self) -> Json {
        match self {
            PropertyValue::Null => Json::Null,
            PropertyValue::Number(n) => serde_json::Number::from_f64(n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            PropertyValue::String(s) => Json::String(s),
            PropertyValue::Bool(b) => Json::Bool(b),
            PropertyValue::List(items) => Json::Array(items),
            PropertyValue::Object(map) => Json::Object(map),
        }
    }
}

/// Decode JSON text holding any value
pub(crate) fn decode_json(field: &str, text: &str) -> MappingResult<Json> {
    serde_json::from_str(text).map_err(|e| MappingError::invalid_json(field, e))
}

/// Decode JSON text that must hold an object
pub(crate) fn decode_object(field: &str, text: &str) -> MappingResult<Map<String, Json>> {
    serde_json::from_str(text).map_err(|e| MappingError::invalid_json(field, e))
}

impl From<Json> for PropertyValue {
    fn from(value: Json) -> Self {
        Self::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_every_shape() {
        assert_eq!(PropertyValue::from_json(json!(null)), PropertyValue::Null);
        assert_eq!(PropertyValue::from_json(json!(3)), PropertyValue::Number(3.0));
        assert_eq!(
            PropertyValue::from_json(json!(2.5)),
            PropertyValue::Number(2.5)
        );
        assert_eq!(
            PropertyValue::from_json(json!("prod")),
            PropertyValue::String("prod".to_string())
        );
        assert_eq!(
            PropertyValue::from_json(json!(true)),
            PropertyValue::Bool(true)
        );
        assert_eq!(
            PropertyValue::from_json(json!(["a", 1])),
            PropertyValue::List(vec![json!("a"), json!(1)])
        );
        assert_eq!(PropertyValue::from_json(json!({"k": 1})).kind(), "object");
    }

    #[test]
    fn object_reencodes_compactly() {
        let value = PropertyValue::from_json(json!({ "k": 1, "nested": { "a": [true] } }));
        assert_eq!(value.to_json_string(), r#"{"k":1,"nested":{"a":[true]}}"#);
    }

    #[test]
    fn extreme_integers_keep_their_magnitude() {
        assert_eq!(
            PropertyValue::from_json(json!(u64::MAX)),
            PropertyValue::Number(u64::MAX as f64)
        );
        assert_eq!(
            PropertyValue::from_json(json!(i64::MIN)),
            PropertyValue::Number(i64::MIN as f64)
        );
        assert_ne!(
            PropertyValue::from_json(json!(u64::MAX)),
            PropertyValue::Number(0.0)
        );
    }

    #[test]
    fn object_text_must_hold_an_object() {
        assert_eq!(decode_object("meta", r#"{"k":1}"#).unwrap()["k"], json!(1));
        for text in ["5", "\"x\"", "[1]", "null", "{"] {
            let err = decode_object("meta", text).unwrap_err();
            assert!(matches!(err, MappingError::InvalidJson { ref field, .. } if field == "meta"));
        }
    }

    #[test]
    fn non_finite_number_has_no_json_form() {
        assert_eq!(PropertyValue::Number(f64::NAN).into_json(), Json::Null);
    }
}
