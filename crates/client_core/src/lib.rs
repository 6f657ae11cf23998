//! Client core of the fuzzy fitness dashboard.
//!
//! The input wizard lives in [`session`], the concurrent four-domain fetch in [`dashboard`],
//! and the pure visual encoders in [`encoding`] and [`labels`]. [`views`] turns dashboard state
//! into read-only card models for a front end to draw.

pub mod dashboard;
pub mod encoding;
pub mod error;
pub mod inference;
pub mod labels;
pub mod results;
pub mod session;
pub mod store;
pub mod views;

pub use dashboard::{BatchId, BatchOutcome, DashboardEvent, DashboardOrchestrator, DashboardState};
pub use error::{BatchError, DomainFailure, InferenceError, SessionError};
pub use inference::{HttpInferenceClient, InferenceClient};
pub use results::{DashboardSummary, DomainResult, DomainResults};
pub use session::{FormSession, LoadOutcome, SessionPhase, INPUTS_STORAGE_KEY};
pub use store::{KeyValueStore, MemoryStore};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
