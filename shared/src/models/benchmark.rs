//! Site benchmark metrics
//!
//! Per-site mean yield and top-N mean (average of the N best plots at the
//! site), against the overall mean of the whole snapshot. Used by the
//! performance pages to position a cultivar against local references.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::trial::TrialRecord;
use crate::types::RoundingPolicy;

/// Benchmark figures for one site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteBenchmark {
    pub site_id: String,
    /// Plots with a usable yield at this site.
    pub plot_count: u32,
    pub site_mean: Decimal,
    /// Mean of the best `top_n` plots (fewer if the site has fewer).
    pub top_mean: Decimal,
}

/// Benchmark report over a record snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkReport {
    pub top_n: u32,
    /// Mean across every usable plot; absent for an empty snapshot.
    pub overall_mean: Option<Decimal>,
    pub sites: Vec<SiteBenchmark>,
}

/// Compute per-site means and top-N means over a record snapshot.
///
/// Invalid yields are screened out exactly as the comparison builder
/// screens them; `top_n` of zero is a caller error.
pub fn site_benchmarks(
    records: &[TrialRecord],
    top_n: u32,
    rounding: RoundingPolicy,
) -> AnalysisResult<BenchmarkReport> {
    if top_n == 0 {
        return Err(AnalysisError::InvalidTopN);
    }

    let mut sites: BTreeMap<&str, Vec<Decimal>> = BTreeMap::new();
    let mut all_values = Vec::new();
    for record in records {
        if !record.has_usable_yield() {
            continue;
        }
        let Some(value) = record.yield_metric else {
            continue;
        };
        sites.entry(record.site_id.as_str()).or_default().push(value);
        all_values.push(value);
    }

    let site_reports = sites
        .into_iter()
        .map(|(site_id, mut values)| {
            values.sort_by(|a, b| b.cmp(a));
            let site_mean = mean_of(&values);
            let top_mean = mean_of(&values[..values.len().min(top_n as usize)]);
            SiteBenchmark {
                site_id: site_id.to_string(),
                plot_count: values.len() as u32,
                site_mean: rounding.round(site_mean),
                top_mean: rounding.round(top_mean),
            }
        })
        .collect();

    let overall_mean = if all_values.is_empty() {
        None
    } else {
        Some(rounding.round(mean_of(&all_values)))
    };

    Ok(BenchmarkReport {
        top_n,
        overall_mean,
        sites: site_reports,
    })
}

// Callers guarantee a non-empty slice.
fn mean_of(values: &[Decimal]) -> Decimal {
    let total: Decimal = values.iter().copied().sum();
    total / Decimal::from(values.len() as u64)
}
