//! Untyped scalar input as it arrives from forms, extraction payloads or CSV

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A single raw field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(value: Vec<String>) -> Self {
        RawValue::List(value)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(value: Vec<&str>) -> Self {
        RawValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Named raw fields, keyed by input field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawInput {
    fields: BTreeMap<String, RawValue>,
}

/// JSON `null` reads as an absent field, so it surfaces as a missing-field
/// error rather than a parse failure of the whole document
impl<'de> Deserialize<'de> for RawInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = BTreeMap::<String, Option<RawValue>>::deserialize(deserializer)?;
        Ok(Self {
            fields: fields
                .into_iter()
                .filter_map(|(field, value)| value.map(|v| (field, v)))
                .collect(),
        })
    }
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: &str, value: impl Into<RawValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<RawValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field names present, in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Overlay every field of `other` onto this input
    pub fn merge(mut self, other: RawInput) -> Self {
        self.fields.extend(other.fields);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_json() {
        let raw: RawInput = serde_json::from_str(
            r#"{"baseline_gdp": "$18,200", "duration_months": 60, "sectors": ["Treasury"]}"#,
        )
        .unwrap();

        assert_eq!(raw.get("baseline_gdp"), Some(&RawValue::Text("$18,200".to_string())));
        assert_eq!(raw.get("duration_months"), Some(&RawValue::Number(60.0)));
        assert_eq!(
            raw.get("sectors"),
            Some(&RawValue::List(vec!["Treasury".to_string()]))
        );
    }

    #[test]
    fn test_null_reads_as_absent() {
        let raw: RawInput =
            serde_json::from_str(r#"{"spending_commitment": null, "revenue_impact": -1.5}"#).unwrap();

        assert!(!raw.contains("spending_commitment"));
        assert_eq!(raw.keys().collect::<Vec<_>>(), vec!["revenue_impact"]);
    }

    #[test]
    fn test_merge_overrides() {
        let base = RawInput::new().with("revenue_impact", -1.5).with("duration_months", 60u32);
        let merged = base.merge(RawInput::new().with("revenue_impact", 2.0));

        assert_eq!(merged.get("revenue_impact"), Some(&RawValue::Number(2.0)));
        assert!(merged.contains("duration_months"));
    }
}
