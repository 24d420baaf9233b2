pub mod catalog;
pub mod notation;
pub mod reports;
pub mod scenario;
pub mod simulation;
pub mod tester;

pub use catalog::{find_catalog_scenario, list_scenarios};
pub use tester::*;
