//! Request refactoring tests
//!
//! Tests for:
//! - Offering actions at the cursor
//! - Generated documents and their placement
//! - Cancellation and UI affinity during invocation

pub mod tests_code_action;
pub mod tests_refactoring;
