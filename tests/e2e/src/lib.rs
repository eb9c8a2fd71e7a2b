//! End-to-end test support for Linetrack
//!
//! - [`harness`]: a floor with real hub, router and stock file, and
//!   in-memory clients attached to it
//! - [`mocks`]: data factory for submissions and spreadsheet uploads

pub mod mocks;

pub use harness::{TestClient, TestFloor};
pub use mocks::TestDataFactory;
