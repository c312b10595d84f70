//! Validation utilities for the Field Trial Analytics Platform
//!
//! Record-shape checks applied at the ingestion boundary, plus cultivar
//! name cleanup for data arriving from the legacy trial database.

use rust_decimal::Decimal;

use crate::models::TrialRecord;

// ============================================================================
// Record Validations
// ============================================================================

/// Validate a record's identifying fields before it enters a session.
pub fn validate_record(record: &TrialRecord) -> Result<(), &'static str> {
    if record.site_id.trim().is_empty() {
        return Err("Site identifier is required");
    }
    if record.cultivar.trim().is_empty() {
        return Err("Cultivar name is required");
    }
    if let Some(moisture) = record.secondary_metrics.moisture_percent {
        validate_moisture_percent(moisture)?;
    }
    if let Some(population) = record.secondary_metrics.final_population {
        if population < Decimal::ZERO {
            return Err("Final population cannot be negative");
        }
    }
    Ok(())
}

/// Validate grain moisture at harvest is a percentage.
pub fn validate_moisture_percent(moisture: Decimal) -> Result<(), &'static str> {
    if moisture < Decimal::ZERO || moisture > Decimal::from(100) {
        return Err("Moisture must be between 0 and 100%");
    }
    Ok(())
}

// ============================================================================
// Cultivar Name Cleanup
// ============================================================================

/// Known mis-encoded cultivar names from the legacy trial database and
/// their corrected forms.
pub const CULTIVAR_NAME_FIXES: &[(&str, &str)] = &[
    ("B\u{FFFD}NUS IPRO", "BÔNUS IPRO"),
    ("DOM\u{FFFD}NIO IPRO", "DOMÍNIO IPRO"),
    ("F\u{FFFD}RIA CE", "FÚRIA CE"),
    ("V\u{FFFD}NUS CE", "VÊNUS CE"),
    ("GH 2383 IPRO", "GH 2483 IPRO"),
];

/// Normalize a cultivar name: trim, collapse internal whitespace,
/// uppercase, and repair known encoding casualties.
pub fn normalize_cultivar_name(name: &str) -> String {
    let collapsed = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    for (broken, fixed) in CULTIVAR_NAME_FIXES {
        if collapsed == *broken {
            return (*fixed).to_string();
        }
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SecondaryMetrics;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // ========================================================================
    // Record Validation Tests
    // ========================================================================

    #[test]
    fn valid_record_passes() {
        let record = TrialRecord::new("FARM1_CITYX", "NEO 760 CE", Some(dec("61.3")));
        assert!(validate_record(&record).is_ok());
    }

    #[test]
    fn blank_site_id_rejected() {
        let record = TrialRecord::new("  ", "NEO 760 CE", Some(dec("61.3")));
        assert!(validate_record(&record).is_err());
    }

    #[test]
    fn blank_cultivar_rejected() {
        let record = TrialRecord::new("FARM1_CITYX", "", Some(dec("61.3")));
        assert!(validate_record(&record).is_err());
    }

    #[test]
    fn out_of_range_moisture_rejected() {
        let mut record = TrialRecord::new("FARM1_CITYX", "NEO 760 CE", Some(dec("61.3")));
        record.secondary_metrics = SecondaryMetrics {
            final_population: None,
            moisture_percent: Some(dec("101.0")),
        };
        assert!(validate_record(&record).is_err());
    }

    #[test]
    fn negative_population_rejected() {
        let mut record = TrialRecord::new("FARM1_CITYX", "NEO 760 CE", Some(dec("61.3")));
        record.secondary_metrics = SecondaryMetrics {
            final_population: Some(dec("-1")),
            moisture_percent: None,
        };
        assert!(validate_record(&record).is_err());
    }

    #[test]
    fn missing_yield_is_not_a_validation_error() {
        // Records without a usable yield are excluded from comparisons,
        // never rejected at ingestion.
        let record = TrialRecord::new("FARM1_CITYX", "NEO 760 CE", None);
        assert!(validate_record(&record).is_ok());
        assert!(!record.has_usable_yield());
    }

    // ========================================================================
    // Cultivar Name Cleanup Tests
    // ========================================================================

    #[test]
    fn normalize_uppercases_and_collapses() {
        assert_eq!(normalize_cultivar_name("  neo  760   ce "), "NEO 760 CE");
    }

    #[test]
    fn normalize_repairs_known_encodings() {
        assert_eq!(
            normalize_cultivar_name("B\u{FFFD}NUS IPRO"),
            "BÔNUS IPRO"
        );
        assert_eq!(normalize_cultivar_name("GH 2383 IPRO"), "GH 2483 IPRO");
    }

    #[test]
    fn normalize_leaves_clean_names_alone() {
        assert_eq!(normalize_cultivar_name("LAT 1330 CE"), "LAT 1330 CE");
    }
}
