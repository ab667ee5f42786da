//! Booking/payment reconciliation for admin dashboards

use bigdecimal::BigDecimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::types::*;
use crate::utils::coerce::non_negative;

/// Paid/remaining figures and revenue buckets derived from bookings and payments
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBookingsMetrics {
    /// Bookings that are still live and carry an outstanding balance
    pub payment_pending_bookings: Vec<Booking>,
    /// Booked units that are fully paid
    pub completed_bookings: Vec<Booking>,
    /// Cancelled or refunded bookings
    pub cancelled_bookings: Vec<Booking>,
    /// Resolved paid amount per booking id
    pub paid_amount_by_booking_id: HashMap<String, BigDecimal>,
    /// Outstanding amount per booking id
    pub remaining_amount_by_booking_id: HashMap<String, BigDecimal>,
    /// Money collected on bookings that are not cancelled
    pub total_revenue: BigDecimal,
    /// Money still due on payment-pending bookings
    pub pending_revenue: BigDecimal,
}

impl AdminBookingsMetrics {
    /// Paid amount for a booking, 0 when unknown
    pub fn paid_amount(&self, booking_id: &str) -> BigDecimal {
        self.paid_amount_by_booking_id
            .get(booking_id)
            .cloned()
            .unwrap_or_else(|| BigDecimal::from(0))
    }

    /// Remaining amount for a booking, 0 when unknown
    pub fn remaining_amount(&self, booking_id: &str) -> BigDecimal {
        self.remaining_amount_by_booking_id
            .get(booking_id)
            .cloned()
            .unwrap_or_else(|| BigDecimal::from(0))
    }

    pub fn pending_count(&self) -> usize {
        self.payment_pending_bookings.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed_bookings.len()
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled_bookings.len()
    }

    /// Share of expected money already collected, `None` when nothing is expected
    pub fn collection_rate(&self) -> Option<BigDecimal> {
        let expected = &self.total_revenue + &self.pending_revenue;
        if expected == BigDecimal::from(0) {
            None
        } else {
            Some(&self.total_revenue / expected)
        }
    }
}

/// Derive per-booking paid/remaining amounts and revenue buckets.
///
/// Received payments add to a booking's paid amount and refunded payments
/// subtract from it; every other status only registers the booking. The
/// accumulated amount is floored at 0, and a booking with nothing
/// recorded falls back to its token amount. Inputs are never modified.
pub fn compute_admin_bookings_metrics(
    bookings: &[Booking],
    payments: &[Payment],
) -> AdminBookingsMetrics {
    let zero = BigDecimal::from(0);
    let mut paid_amount_by_booking_id: HashMap<String, BigDecimal> = HashMap::new();

    for payment in payments {
        if !payment.is_attributable() {
            trace!(payment_id = %payment.id, "ignoring payment not tied to a booking");
            continue;
        }
        let Some(booking_id) = payment.booking_key() else {
            trace!(payment_id = %payment.id, "skipping booking payment without booking id");
            continue;
        };

        let paid = paid_amount_by_booking_id
            .entry(booking_id.to_string())
            .or_insert_with(|| BigDecimal::from(0));
        match payment.status {
            Some(PaymentStatus::Received) => *paid += payment.amount_or_zero(),
            Some(PaymentStatus::Refunded) => *paid -= payment.amount_or_zero(),
            _ => {}
        }
    }

    // Payments for bookings outside the list keep their entry, floored at 0
    for paid in paid_amount_by_booking_id.values_mut() {
        if *paid < zero {
            *paid = zero.clone();
        }
    }

    let mut remaining_amount_by_booking_id = HashMap::with_capacity(bookings.len());
    for booking in bookings {
        let base_paid = paid_amount_by_booking_id
            .get(&booking.id)
            .cloned()
            .map(non_negative)
            .unwrap_or_else(|| zero.clone());
        let token_amount = booking.token_amount_or_zero();
        let paid = if base_paid == zero && token_amount > zero {
            token_amount
        } else {
            base_paid
        };

        let remaining = non_negative(booking.total_price_or_zero() - &paid);
        paid_amount_by_booking_id.insert(booking.id.clone(), paid);
        remaining_amount_by_booking_id.insert(booking.id.clone(), remaining);
    }

    let mut payment_pending_bookings = Vec::new();
    let mut completed_bookings = Vec::new();
    let mut cancelled_bookings = Vec::new();
    let mut total_revenue = BigDecimal::from(0);
    let mut pending_revenue = BigDecimal::from(0);

    for booking in bookings {
        if booking.status.is_cancelled() {
            cancelled_bookings.push(booking.clone());
            continue;
        }

        let paid = paid_amount_by_booking_id
            .get(&booking.id)
            .cloned()
            .unwrap_or_else(|| zero.clone());
        let remaining = remaining_amount_by_booking_id
            .get(&booking.id)
            .cloned()
            .unwrap_or_else(|| zero.clone());

        total_revenue += non_negative(paid);

        if remaining > zero {
            pending_revenue += &remaining;
            payment_pending_bookings.push(booking.clone());
        } else if booking.status == BookingStatus::Booked {
            completed_bookings.push(booking.clone());
        }
    }

    debug!(
        bookings = bookings.len(),
        payments = payments.len(),
        pending = payment_pending_bookings.len(),
        completed = completed_bookings.len(),
        cancelled = cancelled_bookings.len(),
        %total_revenue,
        %pending_revenue,
        "computed admin bookings metrics"
    );

    AdminBookingsMetrics {
        payment_pending_bookings,
        completed_bookings,
        cancelled_bookings,
        paid_amount_by_booking_id,
        remaining_amount_by_booking_id,
        total_revenue,
        pending_revenue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn received(id: &str, booking_id: &str, amount: i64) -> Payment {
        Payment::new(id)
            .for_booking(booking_id)
            .with_amount(BigDecimal::from(amount))
            .with_status(PaymentStatus::Received)
    }

    #[test]
    fn test_fully_paid_booking_is_completed() {
        let bookings = vec![
            Booking::new("b1", BookingStatus::Booked).with_total_price(BigDecimal::from(1000000))
        ];
        let payments = vec![received("p1", "b1", 1000000)];

        let metrics = compute_admin_bookings_metrics(&bookings, &payments);

        assert_eq!(metrics.paid_amount("b1"), BigDecimal::from(1000000));
        assert_eq!(metrics.remaining_amount("b1"), BigDecimal::from(0));
        assert_eq!(metrics.completed_bookings, bookings);
        assert!(metrics.payment_pending_bookings.is_empty());
        assert_eq!(metrics.total_revenue, BigDecimal::from(1000000));
        assert_eq!(metrics.pending_revenue, BigDecimal::from(0));
    }

    #[test]
    fn test_token_amount_fallback() {
        let bookings = vec![Booking::new("b2", BookingStatus::HoldConfirmed)
            .with_total_price(BigDecimal::from(500000))
            .with_token_amount(BigDecimal::from(50000))];

        let metrics = compute_admin_bookings_metrics(&bookings, &[]);

        assert_eq!(metrics.paid_amount("b2"), BigDecimal::from(50000));
        assert_eq!(metrics.remaining_amount("b2"), BigDecimal::from(450000));
        assert_eq!(metrics.pending_count(), 1);
        assert_eq!(metrics.pending_revenue, BigDecimal::from(450000));
        assert_eq!(metrics.total_revenue, BigDecimal::from(50000));
    }

    #[test]
    fn test_token_amount_ignored_once_money_is_recorded() {
        let bookings = vec![
            Booking::new("b1", BookingStatus::HoldConfirmed)
                .with_total_price(BigDecimal::from(500000))
                .with_token_amount(BigDecimal::from(50000)),
            Booking::new("b2", BookingStatus::Confirmed)
                .with_total_price(BigDecimal::from(1000))
                .with_token_amount(BigDecimal::from(100)),
        ];
        let payments = vec![
            // the token itself arrived as a payment: counted once, not twice
            received("p1", "b1", 50000).with_type(PaymentType::Token),
            // a partial payment below the token amount still wins
            received("p2", "b2", 20),
        ];

        let metrics = compute_admin_bookings_metrics(&bookings, &payments);

        assert_eq!(metrics.paid_amount("b1"), BigDecimal::from(50000));
        assert_eq!(metrics.remaining_amount("b1"), BigDecimal::from(450000));
        assert_eq!(metrics.paid_amount("b2"), BigDecimal::from(20));
        assert_eq!(metrics.remaining_amount("b2"), BigDecimal::from(980));
        assert_eq!(metrics.total_revenue, BigDecimal::from(50020));
    }

    #[test]
    fn test_cancelled_booking_excluded_from_revenue() {
        let bookings = vec![
            Booking::new("b3", BookingStatus::Cancelled).with_total_price(BigDecimal::from(300000))
        ];
        let payments = vec![received("p1", "b3", 100000)];

        let metrics = compute_admin_bookings_metrics(&bookings, &payments);

        assert_eq!(metrics.cancelled_count(), 1);
        assert!(metrics.payment_pending_bookings.is_empty());
        assert!(metrics.completed_bookings.is_empty());
        assert_eq!(metrics.total_revenue, BigDecimal::from(0));
        assert_eq!(metrics.pending_revenue, BigDecimal::from(0));
        // figures are still resolved for cancelled bookings
        assert_eq!(metrics.paid_amount("b3"), BigDecimal::from(100000));
        assert_eq!(metrics.remaining_amount("b3"), BigDecimal::from(200000));
    }

    #[test]
    fn test_refund_reduces_paid_amount() {
        let bookings = vec![
            Booking::new("b4", BookingStatus::Booked).with_total_price(BigDecimal::from(200000))
        ];
        let payments = vec![
            received("p1", "b4", 200000),
            Payment::new("p2")
                .for_booking("b4")
                .with_amount(BigDecimal::from(50000))
                .with_status(PaymentStatus::Refunded),
        ];

        let metrics = compute_admin_bookings_metrics(&bookings, &payments);

        assert_eq!(metrics.paid_amount("b4"), BigDecimal::from(150000));
        assert_eq!(metrics.remaining_amount("b4"), BigDecimal::from(50000));
        assert_eq!(metrics.pending_count(), 1);
        assert!(metrics.completed_bookings.is_empty());
    }

    #[test]
    fn test_over_refund_floors_at_zero_then_uses_token() {
        let bookings = vec![Booking::new("b5", BookingStatus::Confirmed)
            .with_total_price(BigDecimal::from(1000))
            .with_token_amount(BigDecimal::from(100))];
        let payments = vec![
            received("p1", "b5", 200),
            Payment::new("p2")
                .for_booking("b5")
                .with_amount(BigDecimal::from(500))
                .with_status(PaymentStatus::Refunded),
        ];

        let metrics = compute_admin_bookings_metrics(&bookings, &payments);

        assert_eq!(metrics.paid_amount("b5"), BigDecimal::from(100));
        assert_eq!(metrics.remaining_amount("b5"), BigDecimal::from(900));
    }

    #[test]
    fn test_pending_and_overdue_payments_do_not_count() {
        let bookings = vec![
            Booking::new("b6", BookingStatus::Booked).with_total_price(BigDecimal::from(1000))
        ];
        let payments = vec![
            Payment::new("p1")
                .for_booking("b6")
                .with_amount(BigDecimal::from(400))
                .with_status(PaymentStatus::Pending),
            Payment::new("p2")
                .for_booking("b6")
                .with_amount(BigDecimal::from(600))
                .with_status(PaymentStatus::Overdue),
        ];

        let metrics = compute_admin_bookings_metrics(&bookings, &payments);

        assert_eq!(metrics.paid_amount("b6"), BigDecimal::from(0));
        assert_eq!(metrics.remaining_amount("b6"), BigDecimal::from(1000));
    }

    #[test]
    fn test_unattributed_payments_ignored() {
        let bookings = vec![
            Booking::new("b7", BookingStatus::Booked).with_total_price(BigDecimal::from(1000))
        ];
        let payments = vec![
            // booking-related by type but no id to attach to
            Payment::new("p1")
                .with_type(PaymentType::Installment)
                .with_amount(BigDecimal::from(1000))
                .with_status(PaymentStatus::Received),
            // blank booking id and unrelated type
            Payment::new("p2")
                .for_booking("  ")
                .with_type(PaymentType::Other)
                .with_amount(BigDecimal::from(1000))
                .with_status(PaymentStatus::Received),
        ];

        let metrics = compute_admin_bookings_metrics(&bookings, &payments);

        assert_eq!(metrics.paid_amount_by_booking_id.len(), 1);
        assert_eq!(metrics.paid_amount("b7"), BigDecimal::from(0));
        assert_eq!(metrics.pending_count(), 1);
    }

    #[test]
    fn test_booked_with_balance_is_pending_not_completed() {
        let bookings = vec![
            Booking::new("b8", BookingStatus::Booked).with_total_price(BigDecimal::from(1000)),
            Booking::new("b9", BookingStatus::Confirmed).with_total_price(BigDecimal::from(0)),
        ];

        let metrics = compute_admin_bookings_metrics(&bookings, &[]);

        assert_eq!(metrics.pending_count(), 1);
        assert_eq!(metrics.payment_pending_bookings[0].id, "b8");
        // fully settled but not BOOKED: in no bucket
        assert!(metrics.completed_bookings.is_empty());
        assert!(metrics.cancelled_bookings.is_empty());
    }

    #[test]
    fn test_malformed_amounts_coerce_to_zero() {
        let bookings: Vec<Booking> = serde_json::from_value(json!([
            {"id": "b10", "status": "BOOKED", "totalPrice": "not a number", "tokenAmount": null}
        ]))
        .unwrap();
        let payments: Vec<Payment> = serde_json::from_value(json!([
            {"id": "p1", "bookingId": "b10", "amount": "oops", "status": "Received"}
        ]))
        .unwrap();

        let metrics = compute_admin_bookings_metrics(&bookings, &payments);

        assert_eq!(metrics.paid_amount("b10"), BigDecimal::from(0));
        assert_eq!(metrics.remaining_amount("b10"), BigDecimal::from(0));
        assert_eq!(metrics.completed_count(), 1);
    }

    #[test]
    fn test_orphan_payment_entries_are_non_negative() {
        let payments = vec![Payment::new("p1")
            .for_booking("ghost")
            .with_amount(BigDecimal::from(10))
            .with_status(PaymentStatus::Refunded)];

        let metrics = compute_admin_bookings_metrics(&[], &payments);

        assert_eq!(metrics.paid_amount("ghost"), BigDecimal::from(0));
        assert!(metrics.remaining_amount_by_booking_id.is_empty());
    }

    #[test]
    fn test_collection_rate() {
        let bookings = vec![
            Booking::new("b1", BookingStatus::Booked).with_total_price(BigDecimal::from(400))
        ];
        let payments = vec![received("p1", "b1", 100)];

        let metrics = compute_admin_bookings_metrics(&bookings, &payments);
        assert_eq!(
            metrics.collection_rate(),
            Some(BigDecimal::from(1) / BigDecimal::from(4))
        );

        let empty = compute_admin_bookings_metrics(&[], &[]);
        assert_eq!(empty.collection_rate(), None);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let bookings = vec![
            Booking::new("b1", BookingStatus::Booked).with_total_price(BigDecimal::from(900)),
            Booking::new("b2", BookingStatus::Refunded).with_total_price(BigDecimal::from(500)),
        ];
        let payments = vec![received("p1", "b1", 300), received("p2", "b2", 500)];

        let first = compute_admin_bookings_metrics(&bookings, &payments);
        let second = compute_admin_bookings_metrics(&bookings, &payments);

        assert_eq!(first, second);
    }
}
