//! Domain models for Daybook

mod task;
mod weather;

pub use task::*;
pub use weather::*;
