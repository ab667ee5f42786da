//! Dynamic, schema-validated attributes for leads and units

pub mod schema;
pub mod value;

pub use schema::*;
pub use value::*;
