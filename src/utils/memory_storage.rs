//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory storage for bookings, payments and cache entries
///
/// Lists keep insertion order, like the arrays the backend returns.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    bookings: Arc<RwLock<Vec<Booking>>>,
    payments: Arc<RwLock<Vec<Payment>>>,
    cache: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

fn poisoned<T>(_: PoisonError<T>) -> CrmError {
    CrmError::Storage("memory storage lock poisoned".to_string())
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-filled with bookings and payments
    pub fn with_data(bookings: Vec<Booking>, payments: Vec<Payment>) -> Self {
        Self {
            bookings: Arc::new(RwLock::new(bookings)),
            payments: Arc::new(RwLock::new(payments)),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl BookingStorage for MemoryStorage {
    async fn save_booking(&mut self, booking: &Booking) -> CrmResult<()> {
        let mut bookings = self.bookings.write().map_err(poisoned)?;
        match bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(existing) => *existing = booking.clone(),
            None => bookings.push(booking.clone()),
        }
        Ok(())
    }

    async fn get_booking(&self, booking_id: &str) -> CrmResult<Option<Booking>> {
        Ok(self
            .bookings
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|b| b.id == booking_id)
            .cloned())
    }

    async fn list_bookings(&self) -> CrmResult<Vec<Booking>> {
        Ok(self.bookings.read().map_err(poisoned)?.clone())
    }

    async fn save_payment(&mut self, payment: &Payment) -> CrmResult<()> {
        let mut payments = self.payments.write().map_err(poisoned)?;
        match payments.iter_mut().find(|p| p.id == payment.id) {
            Some(existing) => *existing = payment.clone(),
            None => payments.push(payment.clone()),
        }
        Ok(())
    }

    async fn list_payments(&self) -> CrmResult<Vec<Payment>> {
        Ok(self.payments.read().map_err(poisoned)?.clone())
    }
}

impl CacheStorage for MemoryStorage {
    fn get_entry(&self, key: &str) -> CrmResult<Option<CacheEntry>> {
        Ok(self.cache.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set_entry(&self, key: &str, entry: CacheEntry) -> CrmResult<()> {
        self.cache
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), entry);
        Ok(())
    }

    fn remove_entry(&self, key: &str) -> CrmResult<bool> {
        Ok(self.cache.write().map_err(poisoned)?.remove(key).is_some())
    }

    fn keys(&self) -> CrmResult<Vec<String>> {
        Ok(self.cache.read().map_err(poisoned)?.keys().cloned().collect())
    }
}
