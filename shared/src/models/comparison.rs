//! Pairwise comparison engine
//!
//! For every evaluation site, each cultivar is compared against every
//! other cultivar grown at that site. The yield difference is classified
//! Win/Draw/Loss under a tolerance band; a site with N usable cultivars
//! contributes exactly N*(N-1) directed comparisons.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::trial::TrialRecord;
use crate::types::RoundingPolicy;

/// Draw band for classifying a yield difference, in sc/ha.
///
/// The default band treats differences within [-1, 1] as draws. The
/// competitor pages use a zero-width band instead, where any nonzero
/// difference is a win or a loss.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ToleranceBand {
    pub lo: Decimal,
    pub hi: Decimal,
}

impl ToleranceBand {
    pub fn new(lo: Decimal, hi: Decimal) -> AnalysisResult<Self> {
        if lo > hi {
            return Err(AnalysisError::InvalidToleranceBand { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Zero-width band: draws only on an exact tie.
    pub fn strict() -> Self {
        Self {
            lo: Decimal::ZERO,
            hi: Decimal::ZERO,
        }
    }

    /// Classify a head-minus-check difference against the band.
    pub fn classify(&self, difference: Decimal) -> Outcome {
        if difference > self.hi {
            Outcome::Win
        } else if difference < self.lo {
            Outcome::Loss
        } else {
            Outcome::Draw
        }
    }
}

impl Default for ToleranceBand {
    fn default() -> Self {
        Self {
            lo: Decimal::NEGATIVE_ONE,
            hi: Decimal::ONE,
        }
    }
}

/// Outcome of one head-vs-check comparison
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "Win"),
            Outcome::Draw => write!(f, "Draw"),
            Outcome::Loss => write!(f, "Loss"),
        }
    }
}

/// One ordered pairwise outcome at a single site.
///
/// Populations and moistures are echoed from the trial records for
/// display; they take no part in classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    pub site_id: String,
    pub head_cultivar: String,
    pub check_cultivar: String,
    pub head_value: Decimal,
    pub check_value: Decimal,
    pub difference: Decimal,
    pub outcome: Outcome,
    pub head_population: Option<Decimal>,
    pub head_moisture: Option<Decimal>,
    pub check_population: Option<Decimal>,
    pub check_moisture: Option<Decimal>,
}

/// A record that survived yield screening, keyed for pairing.
struct UsablePlot<'a> {
    cultivar: &'a str,
    value: Decimal,
    population: Option<Decimal>,
    moisture: Option<Decimal>,
}

/// Build the exhaustive directed comparison set for a record snapshot.
///
/// Records without a usable yield (absent or non-positive) are dropped
/// before pairing and can appear as neither head nor check. A cultivar
/// with two usable records at one site is a pipeline defect and is
/// rejected rather than silently resolved.
///
/// The outcome is decided on the exact difference; rounding applies only
/// to the stored display values.
pub fn build_comparisons(
    records: &[TrialRecord],
    band: ToleranceBand,
    rounding: RoundingPolicy,
) -> AnalysisResult<Vec<Comparison>> {
    let mut sites: BTreeMap<&str, Vec<UsablePlot>> = BTreeMap::new();

    for record in records {
        if !record.has_usable_yield() {
            continue;
        }
        let Some(value) = record.yield_metric else {
            continue;
        };
        let group = sites.entry(record.site_id.as_str()).or_default();
        if group.iter().any(|p| p.cultivar == record.cultivar) {
            return Err(AnalysisError::DuplicateCultivar {
                site: record.site_id.clone(),
                cultivar: record.cultivar.clone(),
            });
        }
        group.push(UsablePlot {
            cultivar: &record.cultivar,
            value,
            population: record.secondary_metrics.final_population,
            moisture: record.secondary_metrics.moisture_percent,
        });
    }

    let mut comparisons = Vec::new();
    for (site_id, group) in &sites {
        for head in group {
            for check in group {
                if head.cultivar == check.cultivar {
                    continue;
                }
                let difference = head.value - check.value;
                comparisons.push(Comparison {
                    site_id: (*site_id).to_string(),
                    head_cultivar: head.cultivar.to_string(),
                    check_cultivar: check.cultivar.to_string(),
                    head_value: rounding.round(head.value),
                    check_value: rounding.round(check.value),
                    difference: rounding.round(difference),
                    outcome: band.classify(difference),
                    head_population: head.population.map(|p| RoundingPolicy::WHOLE.round(p)),
                    head_moisture: head.moisture.map(|m| rounding.round(m)),
                    check_population: check.population.map(|p| RoundingPolicy::WHOLE.round(p)),
                    check_moisture: check.moisture.map(|m| rounding.round(m)),
                });
            }
        }
    }

    Ok(comparisons)
}
