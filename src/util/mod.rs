//! Helpers shared by tests

pub mod testing;
