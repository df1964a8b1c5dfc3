//! Descendant join planning
//!
//! The filter expression surface shared with the store boundary, and the
//! planner that turns a resolver's answer into an executable document filter
//! in either pushdown or materialized mode.

mod errors;
mod filter;
mod planner;

pub use errors::{JoinError, JoinResult};
pub use filter::{Filter, Query};
pub use planner::{JoinConfig, JoinMode, JoinPlan, JoinPlanner};
