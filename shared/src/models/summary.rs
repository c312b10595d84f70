//! Aggregation of comparison outcomes across sites
//!
//! Rolls the directed comparison set up into win/draw/loss counts, win
//! percentages, and mean performance deltas for a focal cultivar against
//! one reference cultivar or a set of them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::comparison::{Comparison, Outcome};
use crate::types::RoundingPolicy;

/// Rollup of every shared-site comparison between one head and one check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairSummary {
    pub head: String,
    pub check: String,
    pub win_count: u32,
    pub draw_count: u32,
    pub loss_count: u32,
    /// Total comparisons, which is also the number of shared sites.
    pub comparison_count: u32,
    /// Share of wins in percent; zero when there are no comparisons.
    pub win_percentage: Decimal,
    pub mean_difference_on_wins: Option<Decimal>,
    pub mean_difference_on_losses: Option<Decimal>,
    pub max_difference: Option<Decimal>,
    pub min_difference: Option<Decimal>,
    pub head_mean: Option<Decimal>,
    pub check_mean: Option<Decimal>,
}

impl PairSummary {
    /// The "no shared sites" summary.
    fn empty(head: &str, check: &str) -> Self {
        Self {
            head: head.to_string(),
            check: check.to_string(),
            win_count: 0,
            draw_count: 0,
            loss_count: 0,
            comparison_count: 0,
            win_percentage: Decimal::ZERO,
            mean_difference_on_wins: None,
            mean_difference_on_losses: None,
            max_difference: None,
            min_difference: None,
            head_mean: None,
            check_mean: None,
        }
    }
}

/// One row of a head-vs-many-checks summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupSummary {
    #[serde(flatten)]
    pub pair: PairSummary,
    /// Distance of the win percentage from parity (50%). Positive favors
    /// the head; callers use it to color and rank rows.
    pub parity_delta: Decimal,
}

/// Summarize every comparison of `head` against `check`.
///
/// An empty filter result is a valid all-zero summary, not an error;
/// only `head == check` is rejected.
pub fn summarize_pair(
    comparisons: &[Comparison],
    head: &str,
    check: &str,
    rounding: RoundingPolicy,
) -> AnalysisResult<PairSummary> {
    if head == check {
        return Err(AnalysisError::SelfComparison {
            cultivar: head.to_string(),
        });
    }

    let mut win_diffs = Vec::new();
    let mut loss_diffs = Vec::new();
    let mut draw_count = 0u32;
    let mut head_values = Vec::new();
    let mut check_values = Vec::new();
    let mut all_diffs = Vec::new();

    for comparison in comparisons
        .iter()
        .filter(|c| c.head_cultivar == head && c.check_cultivar == check)
    {
        match comparison.outcome {
            Outcome::Win => win_diffs.push(comparison.difference),
            Outcome::Draw => draw_count += 1,
            Outcome::Loss => loss_diffs.push(comparison.difference),
        }
        head_values.push(comparison.head_value);
        check_values.push(comparison.check_value);
        all_diffs.push(comparison.difference);
    }

    if all_diffs.is_empty() {
        return Ok(PairSummary::empty(head, check));
    }

    let win_count = win_diffs.len() as u32;
    let loss_count = loss_diffs.len() as u32;
    let comparison_count = win_count + draw_count + loss_count;
    let win_percentage = rounding.round(
        Decimal::from(win_count * 100) / Decimal::from(comparison_count),
    );

    Ok(PairSummary {
        head: head.to_string(),
        check: check.to_string(),
        win_count,
        draw_count,
        loss_count,
        comparison_count,
        win_percentage,
        mean_difference_on_wins: mean(&win_diffs).map(|m| rounding.round(m)),
        mean_difference_on_losses: mean(&loss_diffs).map(|m| rounding.round(m)),
        max_difference: all_diffs.iter().max().copied(),
        min_difference: all_diffs.iter().min().copied(),
        head_mean: mean(&head_values).map(|m| rounding.round(m)),
        check_mean: mean(&check_values).map(|m| rounding.round(m)),
    })
}

/// Summarize `head` against each cultivar in `checks`, in supplied order.
///
/// Rejects a `checks` set containing the head itself; absence of data for
/// any individual check still yields that check's all-zero row.
pub fn summarize_group(
    comparisons: &[Comparison],
    head: &str,
    checks: &[String],
    rounding: RoundingPolicy,
) -> AnalysisResult<Vec<GroupSummary>> {
    if let Some(selfish) = checks.iter().find(|c| c.as_str() == head) {
        return Err(AnalysisError::SelfComparison {
            cultivar: selfish.clone(),
        });
    }

    let parity = Decimal::from(50);
    checks
        .iter()
        .map(|check| {
            let pair = summarize_pair(comparisons, head, check, rounding)?;
            let parity_delta = rounding.round(pair.win_percentage - parity);
            Ok(GroupSummary { pair, parity_delta })
        })
        .collect()
}

/// Mean yield of the head across every comparison against the given
/// checks, for the group view header.
pub fn head_mean_across(
    comparisons: &[Comparison],
    head: &str,
    checks: &[String],
    rounding: RoundingPolicy,
) -> Option<Decimal> {
    let values: Vec<Decimal> = comparisons
        .iter()
        .filter(|c| c.head_cultivar == head && checks.iter().any(|k| k == &c.check_cultivar))
        .map(|c| c.head_value)
        .collect();
    mean(&values).map(|m| rounding.round(m))
}

fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let total: Decimal = values.iter().copied().sum();
    Some(total / Decimal::from(values.len() as u64))
}
