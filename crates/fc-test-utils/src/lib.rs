//! # Feedback Collector Test Utilities
//!
//! - Server test harness (`TestFeedbackServer` for E2E tests)
//! - Token builders for tokens the server would never issue
//! - Fixed test IDs and secrets
//! - Token assertions (`TokenAssertions` trait)

pub mod assertions;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

pub use assertions::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;
