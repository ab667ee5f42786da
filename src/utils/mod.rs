//! Utility modules

pub mod clock;
pub mod coerce;
pub mod memory_storage;
pub mod validation;

pub use clock::*;
pub use memory_storage::*;
pub use validation::*;
