use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ReconError;
use crate::model::CanonicalField;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Knobs for one reconciliation run.
///
/// Every key is optional in TOML; omitted keys keep the built-in defaults, so
/// a file only needs to carry what it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    /// Field recognition table. Order is the resolution priority.
    pub fields: Vec<FieldRule>,
    /// Grouping key candidates, most preferred first.
    pub key_preference: Vec<CanonicalField>,
    /// Amount column candidates, most preferred first.
    pub amount_preference: Vec<CanonicalField>,
    /// Per-key differences up to this many currency units are treated as equal.
    pub tolerance: i64,
    /// VAT rate used for the payable projection.
    pub vat_rate: f64,
    /// Markers stripped from the start/end of textual amounts.
    pub currency_markers: Vec<String>,
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// One canonical field and the header substrings that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldRule {
    pub field: CanonicalField,
    pub candidates: Vec<String>,
}

impl FieldRule {
    pub fn new(field: CanonicalField, candidates: &[&str]) -> Self {
        Self {
            field,
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        }
    }
}

pub const DEFAULT_TOLERANCE: i64 = 1;
pub const DEFAULT_VAT_RATE: f64 = 0.10;
pub const DEFAULT_CURRENCY_MARKERS: [&str; 2] = ["원", "₩"];

/// Header vocabulary used by ecount ledgers and hometax invoice lists.
pub fn default_field_rules() -> Vec<FieldRule> {
    use CanonicalField::*;
    vec![
        FieldRule::new(Date, &["일자", "날짜", "작성일자", "전송일자", "발급일자", "거래일자"]),
        FieldRule::new(Partner, &["거래처", "거래처명", "공급받는자", "공급자", "상호"]),
        FieldRule::new(BusinessId, &["사업자번호", "사업자등록번호", "등록번호"]),
        FieldRule::new(SupplyAmount, &["공급가액", "공급가", "공급가합계", "금액"]),
        FieldRule::new(TaxAmount, &["세액", "부가세", "세액합계", "VAT"]),
        FieldRule::new(TotalAmount, &["합계", "합계금액", "총액"]),
        FieldRule::new(ItemDescription, &["품목", "품명", "품목명", "적요"]),
        FieldRule::new(DocumentNumber, &["전표번호", "승인번호", "문서번호"]),
    ]
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            fields: default_field_rules(),
            key_preference: vec![CanonicalField::BusinessId, CanonicalField::Partner],
            amount_preference: vec![CanonicalField::SupplyAmount, CanonicalField::TotalAmount],
            tolerance: DEFAULT_TOLERANCE,
            vat_rate: DEFAULT_VAT_RATE,
            currency_markers: DEFAULT_CURRENCY_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let mut seen = HashSet::new();
        for rule in &self.fields {
            if !seen.insert(rule.field) {
                return Err(ReconError::ConfigValidation(format!(
                    "field '{}' is listed more than once",
                    rule.field
                )));
            }
            if rule.candidates.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "field '{}' has no candidates",
                    rule.field
                )));
            }
            if rule.candidates.iter().any(|c| c.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "field '{}' has a blank candidate",
                    rule.field
                )));
            }
        }

        check_preference("key_preference", &self.key_preference, &seen)?;
        check_preference("amount_preference", &self.amount_preference, &seen)?;

        if self.tolerance < 0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance must be >= 0, got {}",
                self.tolerance
            )));
        }

        if !(0.0..=1.0).contains(&self.vat_rate) {
            return Err(ReconError::ConfigValidation(format!(
                "vat_rate must be between 0 and 1, got {}",
                self.vat_rate
            )));
        }

        Ok(())
    }

    /// Candidate substrings for `field`, empty if the table doesn't know it.
    pub fn candidates(&self, field: CanonicalField) -> &[String] {
        self.fields
            .iter()
            .find(|r| r.field == field)
            .map(|r| r.candidates.as_slice())
            .unwrap_or(&[])
    }
}

fn check_preference(
    name: &str,
    preference: &[CanonicalField],
    known: &HashSet<CanonicalField>,
) -> Result<(), ReconError> {
    if preference.is_empty() {
        return Err(ReconError::ConfigValidation(format!("{name} must not be empty")));
    }
    if let Some(missing) = preference.iter().find(|f| !known.contains(f)) {
        return Err(ReconError::UnknownField(format!(
            "{name}: '{missing}' has no entry in fields"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
