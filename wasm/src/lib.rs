//! WebAssembly module for the Field Trial Analytics Platform
//!
//! Provides client-side computation for:
//! - Win/Draw/Loss classification of yield differences
//! - Win percentage and parity delta for summary cards
//! - Tolerance band validation
//! - Cultivar name cleanup

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Classify a head-minus-check yield difference against a tolerance band
#[wasm_bindgen]
pub fn classify_yield_difference(difference: f64, lo: f64, hi: f64) -> Result<String, JsValue> {
    let band = parse_band(lo, hi)?;
    let difference = Decimal::try_from(difference)
        .map_err(|e| JsValue::from_str(&format!("Invalid difference: {}", e)))?;
    Ok(format!("{}", band.classify(difference)))
}

/// Validate a tolerance band before a comparison run is requested
#[wasm_bindgen]
pub fn is_valid_tolerance_band(lo: f64, hi: f64) -> bool {
    parse_band(lo, hi).is_ok()
}

/// Win percentage for a summary card
#[wasm_bindgen]
pub fn win_percentage(win_count: u32, comparison_count: u32) -> f64 {
    if comparison_count == 0 {
        return 0.0;
    }
    (win_count as f64 / comparison_count as f64) * 100.0
}

/// Distance of a win percentage from parity (50%); positive favors the head
#[wasm_bindgen]
pub fn parity_delta(win_percentage: f64) -> f64 {
    win_percentage - 50.0
}

/// Normalize a cultivar name the same way the backend does at ingestion
#[wasm_bindgen]
pub fn clean_cultivar_name(name: &str) -> String {
    shared::normalize_cultivar_name(name)
}

fn parse_band(lo: f64, hi: f64) -> Result<ToleranceBand, JsValue> {
    let lo = Decimal::try_from(lo)
        .map_err(|e| JsValue::from_str(&format!("Invalid lower bound: {}", e)))?;
    let hi = Decimal::try_from(hi)
        .map_err(|e| JsValue::from_str(&format!("Invalid upper bound: {}", e)))?;
    ToleranceBand::new(lo, hi).map_err(|e| JsValue::from_str(&e.to_string()))
}
