//! Trial record models
//!
//! One record per cultivar plot, already joined and aggregated by the
//! upstream pipeline. The engine treats the record set as a read-only
//! snapshot for the duration of a session.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One evaluation observation: a cultivar grown at a site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrialRecord {
    /// Opaque site identifier, composed upstream from farm and city refs.
    pub site_id: String,
    /// Name of the genetic material under test.
    pub cultivar: String,
    /// Moisture-corrected yield in sc/ha. Absent or non-positive values
    /// exclude the record from every comparison.
    pub yield_metric: Option<Decimal>,
    /// Auxiliary attributes echoed into comparison rows for display only.
    #[serde(default)]
    pub secondary_metrics: SecondaryMetrics,
}

/// Display-only metrics carried alongside the yield.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SecondaryMetrics {
    /// Final stand population (plants/ha).
    pub final_population: Option<Decimal>,
    /// Grain moisture at harvest (%).
    pub moisture_percent: Option<Decimal>,
}

impl TrialRecord {
    pub fn new(site_id: impl Into<String>, cultivar: impl Into<String>, yield_metric: Option<Decimal>) -> Self {
        Self {
            site_id: site_id.into(),
            cultivar: cultivar.into(),
            yield_metric,
            secondary_metrics: SecondaryMetrics::default(),
        }
    }

    /// Whether this record can participate in comparisons.
    pub fn has_usable_yield(&self) -> bool {
        matches!(self.yield_metric, Some(v) if v > Decimal::ZERO)
    }
}
