//! # Estate CRM Core
//!
//! Backend-independent logic for a role-scoped real-estate CRM: booking and
//! payment reconciliation, client-side pagination, schema-validated dynamic
//! fields, and a typed local cache for per-user activity.
//!
//! ## Features
//!
//! - **Reconciliation**: Paid/remaining amounts per booking, revenue buckets and totals
//! - **Pagination**: Clamped page state for lists already fetched from the backend
//! - **Session context**: Explicit current user and role instead of global state
//! - **Dynamic fields**: Typed TEXT/NUMBER/SELECT/CHECKBOX/DATE attributes checked against a schema
//! - **Local cache**: Key/value cache with TTL backing liked units and download history
//! - **Storage abstraction**: Backend-agnostic design with trait-based storage
//!
//! ## Quick Start
//!
//! ```rust
//! use estate_crm_core::{compute_admin_bookings_metrics, Booking, BookingStatus, Payment, PaymentStatus};
//! use bigdecimal::BigDecimal;
//!
//! let bookings = vec![Booking::new("b1", BookingStatus::Booked)
//!     .with_total_price(BigDecimal::from(1000000))];
//! let payments = vec![Payment::new("p1")
//!     .for_booking("b1")
//!     .with_amount(BigDecimal::from(1000000))
//!     .with_status(PaymentStatus::Received)];
//!
//! let metrics = compute_admin_bookings_metrics(&bookings, &payments);
//! assert_eq!(metrics.completed_bookings.len(), 1);
//! assert_eq!(metrics.remaining_amount("b1"), BigDecimal::from(0));
//! ```

pub mod cache;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod fields;
pub mod pagination;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use cache::*;
pub use config::*;
pub use context::*;
pub use dashboard::*;
pub use fields::*;
pub use pagination::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
