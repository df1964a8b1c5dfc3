//! Observability
//!
//! Structured JSON logging for the crate's decision points (resolution
//! outcomes, chosen join modes, placement plans). Read-only with respect to
//! execution: nothing here affects what a resolver or planner returns.

mod logger;

pub use logger::{Logger, Severity};
