//! Business logic services for the Field Trial Analytics Platform

pub mod benchmark;
pub mod head_to_head;
pub mod session;

pub use benchmark::BenchmarkService;
pub use head_to_head::HeadToHeadService;
pub use session::SessionStore;
