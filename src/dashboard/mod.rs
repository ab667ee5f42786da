//! Dashboard services built on the storage traits

pub mod core;

pub use core::*;
