//! Integration test modules

mod persistence_tests;
mod scenario_tests;
