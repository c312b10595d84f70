//! Site benchmark tests for the Field Trial Analytics Platform
//!
//! Covers per-site mean, top-N mean, and the overall mean, including
//! yield screening and the top-N parameter contract.

use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{site_benchmarks, AnalysisError, RoundingPolicy, TrialRecord};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn record(site: &str, cultivar: &str, yield_metric: &str) -> TrialRecord {
    TrialRecord::new(site, cultivar, Some(dec(yield_metric)))
}

// ============================================================================
// Site Means and Top-N Means
// ============================================================================

mod site_means {
    use super::*;

    fn sample_records() -> Vec<TrialRecord> {
        vec![
            record("FARM1_CITYX", "A", "60.0"),
            record("FARM1_CITYX", "B", "55.0"),
            record("FARM1_CITYX", "C", "58.4"),
            record("FARM2_CITYY", "A", "48.0"),
            record("FARM2_CITYY", "B", "52.0"),
        ]
    }

    #[test]
    fn top_mean_averages_the_best_plots() {
        let report = site_benchmarks(&sample_records(), 2, RoundingPolicy::default()).unwrap();

        assert_eq!(report.top_n, 2);
        assert_eq!(report.sites.len(), 2);

        let farm1 = &report.sites[0];
        assert_eq!(farm1.site_id, "FARM1_CITYX");
        assert_eq!(farm1.plot_count, 3);
        // (60.0 + 55.0 + 58.4) / 3
        assert_eq!(farm1.site_mean, dec("57.8"));
        // (60.0 + 58.4) / 2
        assert_eq!(farm1.top_mean, dec("59.2"));

        let farm2 = &report.sites[1];
        assert_eq!(farm2.site_mean, dec("50.0"));
        assert_eq!(farm2.top_mean, dec("50.0"));
    }

    #[test]
    fn top_n_beyond_plot_count_uses_every_plot() {
        let report = site_benchmarks(&sample_records(), 10, RoundingPolicy::default()).unwrap();
        for site in &report.sites {
            assert_eq!(site.top_mean, site.site_mean);
        }
    }

    #[test]
    fn overall_mean_spans_every_usable_plot() {
        let report = site_benchmarks(&sample_records(), 2, RoundingPolicy::default()).unwrap();
        // (60.0 + 55.0 + 58.4 + 48.0 + 52.0) / 5 = 54.68 -> 54.7
        assert_eq!(report.overall_mean, Some(dec("54.7")));
    }
}

// ============================================================================
// Yield Screening
// ============================================================================

mod yield_screening {
    use super::*;

    #[test]
    fn invalid_yields_are_excluded() {
        let records = vec![
            record("FARM1_CITYX", "A", "60.0"),
            record("FARM1_CITYX", "B", "0.0"),
            TrialRecord::new("FARM1_CITYX", "C", None),
            record("FARM1_CITYX", "D", "-5.0"),
        ];
        let report = site_benchmarks(&records, 3, RoundingPolicy::default()).unwrap();

        assert_eq!(report.sites.len(), 1);
        assert_eq!(report.sites[0].plot_count, 1);
        assert_eq!(report.sites[0].site_mean, dec("60.0"));
        assert_eq!(report.overall_mean, Some(dec("60.0")));
    }

    #[test]
    fn empty_snapshot_has_no_overall_mean() {
        let report = site_benchmarks(&[], 5, RoundingPolicy::default()).unwrap();
        assert!(report.sites.is_empty());
        assert_eq!(report.overall_mean, None);
    }

    #[test]
    fn site_with_no_usable_plots_is_omitted() {
        let records = vec![
            record("FARM1_CITYX", "A", "60.0"),
            TrialRecord::new("FARM2_CITYY", "A", None),
        ];
        let report = site_benchmarks(&records, 5, RoundingPolicy::default()).unwrap();
        assert_eq!(report.sites.len(), 1);
        assert_eq!(report.sites[0].site_id, "FARM1_CITYX");
    }
}

// ============================================================================
// Top-N Parameter Contract
// ============================================================================

mod top_n_contract {
    use super::*;

    #[test]
    fn zero_top_n_is_rejected() {
        let records = vec![record("FARM1_CITYX", "A", "60.0")];
        let err = site_benchmarks(&records, 0, RoundingPolicy::default()).unwrap_err();
        assert_eq!(err, AnalysisError::InvalidTopN);
    }

    #[test]
    fn top_one_picks_the_best_plot() {
        let records = vec![
            record("FARM1_CITYX", "A", "60.0"),
            record("FARM1_CITYX", "B", "55.0"),
        ];
        let report = site_benchmarks(&records, 1, RoundingPolicy::default()).unwrap();
        assert_eq!(report.sites[0].top_mean, dec("60.0"));
    }
}
