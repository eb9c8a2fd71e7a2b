//! Mock data for end-to-end tests

mod fixtures;

pub use fixtures::TestDataFactory;
