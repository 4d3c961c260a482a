//! Validation and coercion of raw scalars into typed simulation inputs
//!
//! Raw values may carry presentation formatting ("$18,200", "-1.5%", "4.2B").
//! Formatting is stripped before parsing; anything that still fails to parse,
//! or parses to an out-of-range value, is rejected with the field name.

use super::data::{BaselineMacro, PolicyShock, SimulationInput, MAX_DURATION_MONTHS};
use super::raw::{RawInput, RawValue};
use crate::error::{EngineError, EngineResult};
use log::warn;

/// Canonical input field names
pub mod fields {
    pub const BASELINE_DEBT: &str = "baseline_debt";
    pub const BASELINE_GDP: &str = "baseline_gdp";
    pub const CURRENT_DEFICIT: &str = "current_deficit";
    pub const SPENDING_COMMITMENT: &str = "spending_commitment";
    pub const REVENUE_IMPACT: &str = "revenue_impact";
    pub const DURATION_MONTHS: &str = "duration_months";
    pub const SECTORS: &str = "sectors";

    /// Name the extraction service uses for the sector list
    pub const PRIMARY_SECTORS: &str = "primary_sectors";

    /// Every field name raw input may carry
    pub const ALL: [&str; 8] = [
        BASELINE_DEBT,
        BASELINE_GDP,
        CURRENT_DEFICIT,
        SPENDING_COMMITMENT,
        REVENUE_IMPACT,
        DURATION_MONTHS,
        SECTORS,
        PRIMARY_SECTORS,
    ];
}

/// Percent inputs outside this magnitude are treated as malformed
const MAX_PERCENT_MAGNITUDE: f64 = 100.0;

/// Parse and validate a complete baseline + shock pair
pub fn normalize(raw: &RawInput) -> EngineResult<SimulationInput> {
    let baseline = normalize_baseline(raw)?;
    let shock = normalize_shock(raw)?;
    Ok(SimulationInput::new(baseline, shock))
}

/// Parse and validate the macro baseline fields
pub fn normalize_baseline(raw: &RawInput) -> EngineResult<BaselineMacro> {
    reject_unknown_fields(raw)?;

    let baseline_debt = required_number(raw, fields::BASELINE_DEBT)?;
    if baseline_debt <= 0.0 {
        return Err(reject(fields::BASELINE_DEBT, "must be greater than zero"));
    }

    let baseline_gdp = required_number(raw, fields::BASELINE_GDP)?;
    if baseline_gdp == 0.0 {
        warn!("rejecting input: {} is zero", fields::BASELINE_GDP);
        return Err(EngineError::DivisionDegeneracy {
            field: fields::BASELINE_GDP.to_string(),
        });
    }
    if baseline_gdp < 0.0 {
        return Err(reject(fields::BASELINE_GDP, "must be greater than zero"));
    }

    let current_deficit = required_number(raw, fields::CURRENT_DEFICIT)?;
    check_percent(fields::CURRENT_DEFICIT, current_deficit)?;

    Ok(BaselineMacro {
        baseline_debt,
        baseline_gdp,
        current_deficit,
    })
}

/// Parse and validate the policy shock fields
pub fn normalize_shock(raw: &RawInput) -> EngineResult<PolicyShock> {
    reject_unknown_fields(raw)?;

    let spending_commitment = required_number(raw, fields::SPENDING_COMMITMENT)?;
    if spending_commitment < 0.0 {
        return Err(reject(fields::SPENDING_COMMITMENT, "must not be negative"));
    }

    let revenue_impact = required_number(raw, fields::REVENUE_IMPACT)?;
    check_percent(fields::REVENUE_IMPACT, revenue_impact)?;

    let duration_months = required_duration(raw)?;
    let sectors = sectors(raw)?;

    Ok(PolicyShock {
        spending_commitment,
        revenue_impact,
        duration_months,
        sectors,
    })
}

/// Check an already-typed input against the same rules the raw path enforces.
///
/// A zero `duration_months` is allowed here: it describes a shock that never
/// activates, which the projection treats as the no-policy baseline.
pub fn validate(input: &SimulationInput) -> EngineResult<()> {
    let baseline = &input.baseline;
    let shock = &input.shock;

    finite(fields::BASELINE_DEBT, baseline.baseline_debt)?;
    finite(fields::BASELINE_GDP, baseline.baseline_gdp)?;
    finite(fields::CURRENT_DEFICIT, baseline.current_deficit)?;
    finite(fields::SPENDING_COMMITMENT, shock.spending_commitment)?;
    finite(fields::REVENUE_IMPACT, shock.revenue_impact)?;

    if baseline.baseline_debt <= 0.0 {
        return Err(reject(fields::BASELINE_DEBT, "must be greater than zero"));
    }
    if baseline.baseline_gdp == 0.0 {
        return Err(EngineError::DivisionDegeneracy {
            field: fields::BASELINE_GDP.to_string(),
        });
    }
    if baseline.baseline_gdp < 0.0 {
        return Err(reject(fields::BASELINE_GDP, "must be greater than zero"));
    }
    check_percent(fields::CURRENT_DEFICIT, baseline.current_deficit)?;

    if shock.spending_commitment < 0.0 {
        return Err(reject(fields::SPENDING_COMMITMENT, "must not be negative"));
    }
    check_percent(fields::REVENUE_IMPACT, shock.revenue_impact)?;
    if shock.duration_months > MAX_DURATION_MONTHS {
        return Err(reject(
            fields::DURATION_MONTHS,
            format!("must be at most {} months", MAX_DURATION_MONTHS),
        ));
    }

    Ok(())
}

/// Validate a typed input and clean its sector labels the way raw input is
/// cleaned. Every pipeline run goes through this, so a typed input and its
/// edited copies are held to one contract.
pub fn sanitize(input: &SimulationInput) -> EngineResult<SimulationInput> {
    validate(input)?;

    let mut clean = input.clone();
    clean.shock.sectors = clean_labels(input.shock.sectors.iter().map(String::as_str));
    Ok(clean)
}

/// Remove grouping separators, currency symbols, percent signs and a trailing
/// billions suffix. Accounting-style parentheses become a leading minus.
pub fn strip_formatting(text: &str) -> String {
    let mut cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | '\'' | '$' | '€' | '£' | '¥' | '%') && !c.is_whitespace())
        .collect();

    for suffix in ["bn", "BN", "Bn", "b", "B"] {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.to_string();
            break;
        }
    }

    if cleaned.starts_with('(') && cleaned.ends_with(')') && cleaned.len() > 2 {
        cleaned = format!("-{}", &cleaned[1..cleaned.len() - 1]);
    }

    cleaned
}

/// Parse one formatted numeric field
pub fn parse_amount(field: &str, text: &str) -> EngineResult<f64> {
    let cleaned = strip_formatting(text);
    if cleaned.is_empty() {
        return Err(reject(field, format!("`{}` contains no number", text)));
    }

    let value: f64 = cleaned
        .parse()
        .map_err(|_| reject(field, format!("`{}` is not a number", text)))?;
    finite(field, value)
}

fn required_number(raw: &RawInput, field: &str) -> EngineResult<f64> {
    match raw.get(field) {
        None => Err(EngineError::missing(field)),
        Some(RawValue::Number(value)) => finite(field, *value),
        Some(RawValue::Text(text)) => parse_amount(field, text),
        Some(RawValue::List(_)) => Err(reject(field, "expected a number, found a list")),
    }
}

fn required_duration(raw: &RawInput) -> EngineResult<u32> {
    let field = fields::DURATION_MONTHS;
    let months = required_number(raw, field)?;

    if months.fract() != 0.0 {
        return Err(reject(field, "must be a whole number of months"));
    }
    if months < 1.0 || months > MAX_DURATION_MONTHS as f64 {
        return Err(reject(
            field,
            format!("must be between 1 and {} months", MAX_DURATION_MONTHS),
        ));
    }

    Ok(months as u32)
}

/// Sector list; an absent list is documented as empty
fn sectors(raw: &RawInput) -> EngineResult<Vec<String>> {
    let value = raw
        .get(fields::SECTORS)
        .or_else(|| raw.get(fields::PRIMARY_SECTORS));

    match value {
        None => Ok(Vec::new()),
        Some(RawValue::List(items)) => Ok(clean_labels(items.iter().map(String::as_str))),
        Some(RawValue::Text(text)) => Ok(clean_labels(text.split([',', ';']))),
        Some(RawValue::Number(_)) => Err(reject(fields::SECTORS, "expected a list of labels")),
    }
}

/// Trimmed labels with blanks dropped, order kept
fn clean_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    labels
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn reject_unknown_fields(raw: &RawInput) -> EngineResult<()> {
    match raw.keys().find(|key| !fields::ALL.contains(key)) {
        Some(key) => Err(reject(key, "unknown field")),
        None => Ok(()),
    }
}

fn check_percent(field: &str, value: f64) -> EngineResult<()> {
    if value.abs() > MAX_PERCENT_MAGNITUDE {
        return Err(reject(
            field,
            format!("{} is outside +/-{}%", value, MAX_PERCENT_MAGNITUDE),
        ));
    }
    Ok(())
}

fn finite(field: &str, value: f64) -> EngineResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(reject(field, "must be a finite number"))
    }
}

fn reject(field: &str, reason: impl Into<String>) -> EngineError {
    let err = EngineError::validation(field, reason);
    warn!("rejecting input: {}", err);
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input() -> RawInput {
        RawInput::new()
            .with(fields::BASELINE_DEBT, "$24,500")
            .with(fields::BASELINE_GDP, "18,200.0")
            .with(fields::CURRENT_DEFICIT, "5.4%")
            .with(fields::SPENDING_COMMITMENT, "$4.2B")
            .with(fields::REVENUE_IMPACT, "-1.5%")
            .with(fields::DURATION_MONTHS, 60u32)
            .with(fields::SECTORS, vec!["Social Welfare", "Treasury"])
    }

    #[test]
    fn test_strip_formatting() {
        assert_eq!(strip_formatting("$24,500"), "24500");
        assert_eq!(strip_formatting(" -1.5 % "), "-1.5");
        assert_eq!(strip_formatting("$4.2B"), "4.2");
        assert_eq!(strip_formatting("€1 250bn"), "1250");
        assert_eq!(strip_formatting("(3.0)"), "-3.0");
    }

    #[test]
    fn test_normalize_formatted_input() {
        let input = normalize(&full_input()).unwrap();

        assert_eq!(input.baseline.baseline_debt, 24_500.0);
        assert_eq!(input.baseline.baseline_gdp, 18_200.0);
        assert_eq!(input.baseline.current_deficit, 5.4);
        assert_eq!(input.shock.spending_commitment, 4.2);
        assert_eq!(input.shock.revenue_impact, -1.5);
        assert_eq!(input.shock.duration_months, 60);
        assert_eq!(input.shock.sectors, vec!["Social Welfare", "Treasury"]);
    }

    #[test]
    fn test_zero_gdp_is_division_degeneracy() {
        let raw = full_input().with(fields::BASELINE_GDP, "0");
        assert_eq!(
            normalize(&raw).unwrap_err(),
            EngineError::DivisionDegeneracy {
                field: fields::BASELINE_GDP.to_string()
            }
        );
    }

    #[test]
    fn test_negative_gdp_rejected() {
        let err = normalize(&full_input().with(fields::BASELINE_GDP, -5.0)).unwrap_err();
        assert_eq!(err.field(), Some(fields::BASELINE_GDP));
        assert!(matches!(err, EngineError::Validation { .. }));
    }

    #[test]
    fn test_missing_field() {
        let mut raw = RawInput::new()
            .with(fields::BASELINE_DEBT, 24_500.0)
            .with(fields::BASELINE_GDP, 18_200.0);
        assert_eq!(
            normalize_baseline(&raw).unwrap_err(),
            EngineError::missing(fields::CURRENT_DEFICIT)
        );

        raw.set(fields::CURRENT_DEFICIT, 5.4);
        assert!(normalize_baseline(&raw).is_ok());
        assert_eq!(
            normalize_shock(&raw).unwrap_err(),
            EngineError::missing(fields::SPENDING_COMMITMENT)
        );
    }

    #[test]
    fn test_unparseable_number_names_field() {
        let err = normalize(&full_input().with(fields::REVENUE_IMPACT, "a lot")).unwrap_err();
        assert_eq!(err.field(), Some(fields::REVENUE_IMPACT));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = normalize(&full_input().with(fields::BASELINE_DEBT, "inf")).unwrap_err();
        assert_eq!(err.field(), Some(fields::BASELINE_DEBT));
    }

    #[test]
    fn test_duration_rules() {
        for bad in ["0", "36.5", "601", "-12"] {
            let err = normalize(&full_input().with(fields::DURATION_MONTHS, bad)).unwrap_err();
            assert_eq!(err.field(), Some(fields::DURATION_MONTHS), "input {}", bad);
        }

        let ok = normalize(&full_input().with(fields::DURATION_MONTHS, "36")).unwrap();
        assert_eq!(ok.shock.duration_months, 36);
    }

    #[test]
    fn test_negative_spending_rejected() {
        let err = normalize(&full_input().with(fields::SPENDING_COMMITMENT, -1.0)).unwrap_err();
        assert_eq!(err.field(), Some(fields::SPENDING_COMMITMENT));
    }

    #[test]
    fn test_revenue_sign_preserved() {
        let up = normalize(&full_input().with(fields::REVENUE_IMPACT, "+2.0%")).unwrap();
        assert_eq!(up.shock.revenue_impact, 2.0);

        let down = normalize(&full_input().with(fields::REVENUE_IMPACT, "(2.0)")).unwrap();
        assert_eq!(down.shock.revenue_impact, -2.0);
    }

    #[test]
    fn test_sectors_from_text_and_alias() {
        let mut raw = full_input();
        raw = raw.with(fields::SECTORS, "Treasury; Retail , ");
        assert_eq!(normalize_shock(&raw).unwrap().sectors, vec!["Treasury", "Retail"]);

        let alias = RawInput::new()
            .with(fields::SPENDING_COMMITMENT, 1.0)
            .with(fields::REVENUE_IMPACT, 0.0)
            .with(fields::DURATION_MONTHS, 12u32)
            .with(fields::PRIMARY_SECTORS, vec!["Health"]);
        assert_eq!(normalize_shock(&alias).unwrap().sectors, vec!["Health"]);
    }

    #[test]
    fn test_validate_typed_input() {
        let mut input = normalize(&full_input()).unwrap();
        assert!(validate(&input).is_ok());

        input.shock.duration_months = 0;
        assert!(validate(&input).is_ok());

        input.baseline.baseline_gdp = 0.0;
        assert!(matches!(
            validate(&input),
            Err(EngineError::DivisionDegeneracy { .. })
        ));

        input.baseline.baseline_gdp = f64::NAN;
        assert_eq!(validate(&input).unwrap_err().field(), Some(fields::BASELINE_GDP));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let raw = full_input().with("sector", vec!["Health", "Treasury"]);
        let err = normalize(&raw).unwrap_err();
        assert_eq!(err, EngineError::validation("sector", "unknown field"));
    }

    #[test]
    fn test_sanitize_cleans_typed_sectors() {
        let mut input = normalize(&full_input()).unwrap();
        input.shock.sectors = vec![" Health ".to_string(), " ".to_string(), String::new()];

        let clean = sanitize(&input).unwrap();
        assert_eq!(clean.shock.sectors, vec!["Health"]);
        assert!(!clean.shock.is_multi_sector());

        input.shock.spending_commitment = -1.0;
        assert_eq!(sanitize(&input).unwrap_err().field(), Some(fields::SPENDING_COMMITMENT));
    }

    #[test]
    fn test_absent_sectors_default_empty() {
        let raw = RawInput::new()
            .with(fields::SPENDING_COMMITMENT, 1.0)
            .with(fields::REVENUE_IMPACT, 0.0)
            .with(fields::DURATION_MONTHS, 12u32);
        assert!(normalize_shock(&raw).unwrap().sectors.is_empty());
    }
}
