//! Priority-ordered field resolution.
//!
//! The inference API names the same concept differently per task:
//! classification rows carry `prediction`/`confidence`, sentiment rows carry
//! `sentiment`/`score`. A [`FieldResolver`] lists the accepted names in
//! priority order so the contract is visible in one place.

use serde_json::Value;

/// An ordered list of field names that mean the same thing.
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver {
    names: &'static [&'static str],
}

/// Predicted label: `prediction`, then `sentiment`.
pub const LABEL_FIELDS: FieldResolver = FieldResolver::new(&["prediction", "sentiment"]);

/// Confidence in `[0, 1]`: `confidence`, then `score`.
pub const CONFIDENCE_FIELDS: FieldResolver = FieldResolver::new(&["confidence", "score"]);

impl FieldResolver {
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    /// First listed field present with a string value.
    pub fn str<'a>(&self, obj: &'a Value) -> Option<&'a str> {
        self.names
            .iter()
            .find_map(|name| obj.get(*name).and_then(Value::as_str))
    }

    /// First listed field present with a numeric value.
    pub fn f64(&self, obj: &Value) -> Option<f64> {
        self.names
            .iter()
            .find_map(|name| obj.get(*name).and_then(Value::as_f64))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn first_name_wins() {
        let row = json!({"prediction": "positive", "sentiment": "negative"});
        assert_eq!(LABEL_FIELDS.str(&row), Some("positive"));
    }

    #[test]
    fn falls_through_to_second_name() {
        let row = json!({"sentiment": "neutral", "score": 0.8});
        assert_eq!(LABEL_FIELDS.str(&row), Some("neutral"));
        assert_eq!(CONFIDENCE_FIELDS.f64(&row), Some(0.8));
    }

    #[test]
    fn wrong_type_is_skipped() {
        let row = json!({"confidence": "high", "score": 0.5});
        assert_eq!(CONFIDENCE_FIELDS.f64(&row), Some(0.5));
    }

    #[test]
    fn nothing_present() {
        let row = json!({"id": 1});
        assert_eq!(LABEL_FIELDS.str(&row), None);
        assert_eq!(CONFIDENCE_FIELDS.f64(&row), None);
    }
}
