//! Interface to the document extraction service
//!
//! The service itself (document parsing, language-model prompting) lives
//! outside this crate. What lives here is the contract for its output and a
//! parser for the JSON payload it returns.

use crate::error::{EngineError, EngineResult};
use crate::inputs::normalizer::{self, fields};
use crate::inputs::{BaselineMacro, PolicyShock, RawInput, RawValue};
use serde::{Deserialize, Serialize};

/// Shock (and optionally baseline figures) pulled out of a policy document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPolicy {
    pub shock: PolicyShock,
    pub baseline: Option<BaselineMacro>,
}

/// Turns an uploaded document into simulation parameters
pub trait Extractor {
    fn extract(&self, document: &str) -> EngineResult<ExtractedPolicy>;
}

/// Parses the extraction service's JSON payload:
/// `{"spending_commitment": .., "revenue_impact": .., "duration_months": ..,
///   "primary_sectors": [..]}` plus optional baseline figures.
/// A payload carrying an `error` string is surfaced verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExtractor;

impl Extractor for JsonExtractor {
    fn extract(&self, document: &str) -> EngineResult<ExtractedPolicy> {
        let raw: RawInput = serde_json::from_str(document)
            .map_err(|e| EngineError::UpstreamExtraction(format!("unreadable payload: {}", e)))?;

        if let Some(RawValue::Text(message)) = raw.get("error") {
            return Err(EngineError::UpstreamExtraction(message.clone()));
        }

        let shock = normalizer::normalize_shock(&raw)?;
        let baseline = extracted_baseline(&raw)?;

        Ok(ExtractedPolicy { shock, baseline })
    }
}

/// Baseline is optional as a whole; a partial set of figures is an error
fn extracted_baseline(raw: &RawInput) -> EngineResult<Option<BaselineMacro>> {
    let present = [fields::BASELINE_DEBT, fields::BASELINE_GDP, fields::CURRENT_DEFICIT]
        .iter()
        .any(|f| raw.contains(f));

    if present {
        normalizer::normalize_baseline(raw).map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_service_payload() {
        let payload = r#"{
            "spending_commitment": 4.2,
            "revenue_impact": -1.5,
            "duration_months": 60,
            "primary_sectors": ["Social Welfare", "Treasury", "Retail and Consumer Goods"]
        }"#;

        let extracted = JsonExtractor.extract(payload).unwrap();
        assert_eq!(extracted.shock.spending_commitment, 4.2);
        assert_eq!(extracted.shock.duration_months, 60);
        assert_eq!(extracted.shock.sectors.len(), 3);
        assert_eq!(extracted.baseline, None);
    }

    #[test]
    fn test_extract_with_baseline() {
        let payload = r#"{
            "spending_commitment": "1.0", "revenue_impact": "0", "duration_months": 12,
            "baseline_debt": "$1,000", "baseline_gdp": "2,000", "current_deficit": "3%"
        }"#;

        let baseline = JsonExtractor.extract(payload).unwrap().baseline.unwrap();
        assert_eq!(baseline.baseline_debt, 1000.0);
        assert_eq!(baseline.current_deficit, 3.0);
    }

    #[test]
    fn test_partial_baseline_rejected() {
        let payload = r#"{"spending_commitment": 1.0, "revenue_impact": 0, "duration_months": 12,
                          "baseline_gdp": 2000}"#;
        assert_eq!(
            JsonExtractor.extract(payload).unwrap_err(),
            EngineError::missing(fields::BASELINE_DEBT)
        );
    }

    #[test]
    fn test_unreadable_payload_is_upstream_failure() {
        let err = JsonExtractor.extract("I could not read this PDF").unwrap_err();
        assert!(matches!(err, EngineError::UpstreamExtraction(_)));
    }

    #[test]
    fn test_error_payload_surfaced_verbatim() {
        let err = JsonExtractor
            .extract(r#"{"error": "document has no fiscal section"}"#)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::UpstreamExtraction("document has no fiscal section".to_string())
        );
    }

    #[test]
    fn test_null_field_reported_as_missing() {
        let payload = r#"{"spending_commitment": null, "revenue_impact": -1.5,
                          "duration_months": 60, "primary_sectors": null}"#;
        assert_eq!(
            JsonExtractor.extract(payload).unwrap_err(),
            EngineError::missing(fields::SPENDING_COMMITMENT)
        );
    }

    #[test]
    fn test_misspelled_field_rejected() {
        let payload = r#"{"spending_commitment": 4.2, "revenue_impact": -1.5,
                          "duration_months": 60, "sector": ["Health", "Treasury"]}"#;
        assert_eq!(
            JsonExtractor.extract(payload).unwrap_err(),
            EngineError::validation("sector", "unknown field")
        );
    }

    #[test]
    fn test_no_default_guessing() {
        let err = JsonExtractor.extract(r#"{"revenue_impact": -1.5}"#).unwrap_err();
        assert_eq!(err, EngineError::missing(fields::SPENDING_COMMITMENT));
    }
}
