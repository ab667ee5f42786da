//! Local cache with TTL and the per-user activity stores built on it

pub mod activity;
pub mod local;

pub use activity::*;
pub use local::*;
