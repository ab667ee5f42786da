//! Reconciliation of bookings against collected payments

pub mod bookings;

pub use bookings::*;
