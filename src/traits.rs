//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::*;

/// Source of bookings and payments
///
/// In the CRM this is backed by the REST API; the crate only needs the
/// lists. Implementations return data already limited to one tenant when the
/// backend scopes by tenant.
#[async_trait]
pub trait BookingStorage: Send + Sync {
    /// Save or replace a booking
    async fn save_booking(&mut self, booking: &Booking) -> CrmResult<()>;

    /// Get a booking by ID
    async fn get_booking(&self, booking_id: &str) -> CrmResult<Option<Booking>>;

    /// List all bookings
    async fn list_bookings(&self) -> CrmResult<Vec<Booking>>;

    /// Save or replace a payment
    async fn save_payment(&mut self, payment: &Payment) -> CrmResult<()>;

    /// List all payments
    async fn list_payments(&self) -> CrmResult<Vec<Payment>>;
}

/// A stored cache value and its expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: Value,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Key/value store behind the local cache, in the shape of browser local storage
pub trait CacheStorage: Send + Sync {
    fn get_entry(&self, key: &str) -> CrmResult<Option<CacheEntry>>;

    fn set_entry(&self, key: &str, entry: CacheEntry) -> CrmResult<()>;

    /// Remove an entry, returning whether it existed
    fn remove_entry(&self, key: &str) -> CrmResult<bool>;

    fn keys(&self) -> CrmResult<Vec<String>>;
}

/// Time source for cache expiry
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
