//! Shared types and analysis engine for the Field Trial Analytics Platform
//!
//! This crate contains the head-to-head comparison engine and the types
//! shared between the backend, frontend (via WASM), and other components
//! of the system.

pub mod error;
pub mod models;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
