//! Validation utilities
//!
//! Reconciliation never rejects input; callers that want business rules
//! enforced run these checks before handing data over.

use bigdecimal::BigDecimal;

use crate::types::*;

/// Validate that an amount is not negative
pub fn validate_non_negative_amount(name: &str, amount: &BigDecimal) -> CrmResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(CrmError::Validation(format!("{} cannot be negative", name)))
    } else {
        Ok(())
    }
}

/// Validate that a record ID is usable as a map key
pub fn validate_record_id(kind: &str, id: &str) -> CrmResult<()> {
    if id.trim().is_empty() {
        return Err(CrmError::Validation(format!("{} ID cannot be empty", kind)));
    }

    if id.len() > 64 {
        return Err(CrmError::Validation(format!(
            "{} ID cannot exceed 64 characters",
            kind
        )));
    }

    Ok(())
}

/// Validate a booking's identity and amounts
pub fn validate_booking(booking: &Booking) -> CrmResult<()> {
    validate_record_id("Booking", &booking.id)?;

    if let Some(total_price) = &booking.total_price {
        validate_non_negative_amount("Total price", total_price)?;
    }

    if let Some(token_amount) = &booking.token_amount {
        validate_non_negative_amount("Token amount", token_amount)?;

        if let Some(total_price) = &booking.total_price {
            if token_amount > total_price {
                return Err(CrmError::Validation(format!(
                    "Token amount {} exceeds total price {} for booking '{}'",
                    token_amount, total_price, booking.id
                )));
            }
        }
    }

    Ok(())
}

/// Validate a payment's identity, amount and attribution
pub fn validate_payment(payment: &Payment) -> CrmResult<()> {
    validate_record_id("Payment", &payment.id)?;

    if let Some(amount) = &payment.amount {
        validate_non_negative_amount("Payment amount", amount)?;
    }

    let booking_related = payment
        .payment_type
        .as_ref()
        .is_some_and(PaymentType::is_booking_related);
    if booking_related && payment.booking_key().is_none() {
        return Err(CrmError::Validation(format!(
            "Payment '{}' is a booking payment without a booking ID",
            payment.id
        )));
    }

    Ok(())
}

/// Validate a batch, reporting the first problem found
pub fn validate_snapshot(bookings: &[Booking], payments: &[Payment]) -> CrmResult<()> {
    let mut seen = std::collections::HashSet::new();
    for booking in bookings {
        validate_booking(booking)?;
        if !seen.insert(booking.id.as_str()) {
            return Err(CrmError::Validation(format!(
                "Booking '{}' appears more than once",
                booking.id
            )));
        }
    }

    for payment in payments {
        validate_payment(payment)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_snapshot() {
        let bookings = vec![Booking::new("b1", BookingStatus::Booked)
            .with_total_price(BigDecimal::from(1000))
            .with_token_amount(BigDecimal::from(100))];
        let payments = vec![Payment::new("p1")
            .for_booking("b1")
            .with_type(PaymentType::Token)
            .with_amount(BigDecimal::from(100))];

        assert!(validate_snapshot(&bookings, &payments).is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let booking =
            Booking::new("b1", BookingStatus::Booked).with_total_price(BigDecimal::from(-1));
        assert!(matches!(
            validate_booking(&booking),
            Err(CrmError::Validation(_))
        ));
    }

    #[test]
    fn test_token_above_price_rejected() {
        let booking = Booking::new("b1", BookingStatus::HoldConfirmed)
            .with_total_price(BigDecimal::from(100))
            .with_token_amount(BigDecimal::from(500));
        assert!(validate_booking(&booking).is_err());
    }

    #[test]
    fn test_booking_payment_needs_booking_id() {
        let payment = Payment::new("p1").with_type(PaymentType::Installment);
        assert!(validate_payment(&payment).is_err());

        let unrelated = Payment::new("p2").with_type(PaymentType::Other);
        assert!(validate_payment(&unrelated).is_ok());
    }

    #[test]
    fn test_duplicate_bookings_rejected() {
        let bookings = vec![
            Booking::new("b1", BookingStatus::Booked),
            Booking::new("b1", BookingStatus::Cancelled),
        ];
        assert!(validate_snapshot(&bookings, &[]).is_err());
    }
}
