//! Domain layer: product records, list-view state, and engine policy constants

pub mod constants;
pub mod list_state;
pub mod product;

pub use list_state::{filter_products, EngineState, ListState};
pub use product::{Platform, Product};
