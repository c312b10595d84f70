//! Typed errors for the head-to-head analysis engine
//!
//! Data-shape problems (missing yields, empty filter results) are never
//! errors; only contract violations by the caller surface here.

use rust_decimal::Decimal;
use thiserror::Error;

/// Contract violations reported by the analysis engine
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    /// A cultivar has more than one usable record at one site. The join
    /// pipeline is required to deduplicate to one plot per cultivar per
    /// site before handing records to the engine.
    #[error("cultivar '{cultivar}' appears more than once at site '{site}'")]
    DuplicateCultivar { site: String, cultivar: String },

    /// A summary was requested with the same cultivar as head and check.
    /// Rejected so a vacuous all-zero summary cannot be mistaken for a
    /// real "no shared sites" result.
    #[error("cultivar '{cultivar}' cannot be compared against itself")]
    SelfComparison { cultivar: String },

    #[error("invalid tolerance band: lower bound {lo} exceeds upper bound {hi}")]
    InvalidToleranceBand { lo: Decimal, hi: Decimal },

    #[error("top_n must be at least 1")]
    InvalidTopN,
}

/// Result type alias for engine operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
