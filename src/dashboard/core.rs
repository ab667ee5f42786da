//! Role-scoped bookings dashboard that coordinates storage, scoping and reconciliation

use bigdecimal::BigDecimal;
use serde::Serialize;
use tracing::debug;

use crate::config::CrmConfig;
use crate::context::SessionContext;
use crate::pagination::{page_of, Page, Pagination};
use crate::reconciliation::{compute_admin_bookings_metrics, AdminBookingsMetrics};
use crate::traits::*;
use crate::types::*;

/// Paid and outstanding figures for one booking
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingBalance {
    pub booking: Booking,
    pub paid_amount: BigDecimal,
    pub remaining_amount: BigDecimal,
}

/// Bookings dashboard over a storage backend
pub struct BookingsDashboard<S: BookingStorage> {
    storage: S,
    config: CrmConfig,
}

impl<S: BookingStorage> BookingsDashboard<S> {
    /// Create a dashboard with default configuration
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, CrmConfig::default())
    }

    pub fn with_config(storage: S, config: CrmConfig) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &CrmConfig {
        &self.config
    }

    /// Record a booking
    pub async fn record_booking(&mut self, booking: Booking) -> CrmResult<()> {
        if booking.id.trim().is_empty() {
            return Err(CrmError::Validation(
                "Booking ID cannot be empty".to_string(),
            ));
        }
        self.storage.save_booking(&booking).await
    }

    /// Record a payment
    pub async fn record_payment(&mut self, payment: Payment) -> CrmResult<()> {
        if payment.id.trim().is_empty() {
            return Err(CrmError::Validation(
                "Payment ID cannot be empty".to_string(),
            ));
        }
        self.storage.save_payment(&payment).await
    }

    async fn scoped_data(&self, ctx: &SessionContext) -> CrmResult<(Vec<Booking>, Vec<Payment>)> {
        let bookings = ctx.scope_bookings(self.storage.list_bookings().await?);
        let payments = ctx.scope_payments(&bookings, self.storage.list_payments().await?);
        debug!(
            user_id = %ctx.user_id,
            role = ?ctx.role,
            bookings = bookings.len(),
            payments = payments.len(),
            "loaded scoped booking data"
        );
        Ok((bookings, payments))
    }

    /// Reconciliation metrics for the bookings visible to this session
    pub async fn metrics(&self, ctx: &SessionContext) -> CrmResult<AdminBookingsMetrics> {
        let (bookings, payments) = self.scoped_data(ctx).await?;
        Ok(compute_admin_bookings_metrics(&bookings, &payments))
    }

    /// One page of payment-pending bookings, using the configured page size
    pub async fn pending_bookings_page(
        &self,
        ctx: &SessionContext,
        page: usize,
    ) -> CrmResult<Page<Booking>> {
        let metrics = self.metrics(ctx).await?;
        let mut pagination =
            Pagination::from_config(metrics.pending_count(), &self.config.pagination);
        pagination.go_to_page(page);
        Ok(page_of(metrics.payment_pending_bookings, pagination))
    }

    /// Paid and remaining amounts for a single visible booking
    pub async fn booking_balance(
        &self,
        ctx: &SessionContext,
        booking_id: &str,
    ) -> CrmResult<BookingBalance> {
        let booking = self
            .storage
            .get_booking(booking_id)
            .await?
            .filter(|booking| ctx.can_view_booking(booking))
            .ok_or_else(|| CrmError::NotFound(format!("booking {}", booking_id)))?;

        let bookings = std::slice::from_ref(&booking);
        let payments = ctx.scope_payments(bookings, self.storage.list_payments().await?);
        let metrics = compute_admin_bookings_metrics(bookings, &payments);
        Ok(BookingBalance {
            paid_amount: metrics.paid_amount(booking_id),
            remaining_amount: metrics.remaining_amount(booking_id),
            booking,
        })
    }
}
