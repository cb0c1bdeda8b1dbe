//! Common test infrastructure
//!
//! Shared schedules and store helpers for the integration tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{sample_schedules, IVE_COMEBACK_DATE};
//!
//! #[test]
//! fn test_sample() {
//!     let schedules = sample_schedules();
//!     assert!(schedules.iter().any(|s| s.date_key == IVE_COMEBACK_DATE));
//! }
//! ```

mod constants;
mod fixtures;

#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{memory_store, sample_schedules, sqlite_store, TestStore};
