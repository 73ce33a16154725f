//! Shared types and domain logic for Daybook
//!
//! This crate holds the task urgency scorer and the weather alert classifier
//! along with the models they work on. It performs no I/O, so the backend,
//! the browser (via WASM), and tests all run exactly the same rules.

pub mod alerts;
pub mod models;
pub mod types;
pub mod urgency;
pub mod validation;
pub mod weather_codes;

pub use alerts::*;
pub use models::*;
pub use types::*;
pub use urgency::*;
pub use validation::*;
pub use weather_codes::*;
