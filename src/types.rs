//! Core types shared by the CRM modules

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::fields::FieldError;
use crate::utils::coerce::{
    lenient_amount, lenient_variant, lenient_variant_or_default, or_zero,
};

/// Lifecycle state of a booking as reported by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Customer asked to hold the unit
    HoldRequested,
    /// Hold accepted by the sales team
    HoldConfirmed,
    /// Booking confirmed, agreement pending
    Confirmed,
    /// Unit booked
    Booked,
    /// Booking cancelled
    Cancelled,
    /// Booking cancelled and money returned
    Refunded,
    /// Any status this crate does not know about
    #[default]
    #[serde(other)]
    Other,
}

impl BookingStatus {
    /// Cancelled and refunded bookings no longer count towards revenue
    pub fn is_cancelled(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Refunded)
    }
}

/// Settlement state of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Received,
    Overdue,
    Refunded,
    #[serde(other)]
    Other,
}

/// What a payment was collected for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    Booking,
    Token,
    Installment,
    #[serde(other)]
    Other,
}

impl PaymentType {
    /// Booking, token and installment payments belong to a booking
    pub fn is_booking_related(&self) -> bool {
        matches!(
            self,
            PaymentType::Booking | PaymentType::Token | PaymentType::Installment
        )
    }
}

/// A unit booking fetched from the backend
///
/// Monetary fields are decoded leniently: numbers and numeric strings are
/// kept, anything else is treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique identifier for the booking
    pub id: String,
    /// Current lifecycle state; missing, null or unknown values read as `Other`
    #[serde(default, deserialize_with = "lenient_variant_or_default")]
    pub status: BookingStatus,
    /// Agreed price of the unit
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_price: Option<BigDecimal>,
    /// Token amount collected when the hold was placed
    #[serde(default, deserialize_with = "lenient_amount")]
    pub token_amount: Option<BigDecimal>,
    /// Booked unit
    #[serde(default)]
    pub unit_id: Option<String>,
    /// Customer who owns the booking
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Agent handling the booking
    #[serde(default)]
    pub agent_id: Option<String>,
    /// Tenant (builder organisation) the booking belongs to
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl Booking {
    /// Create a booking with no amounts or ownership attached
    pub fn new(id: impl Into<String>, status: BookingStatus) -> Self {
        Self {
            id: id.into(),
            status,
            total_price: None,
            token_amount: None,
            unit_id: None,
            customer_id: None,
            agent_id: None,
            tenant_id: None,
        }
    }

    pub fn with_total_price(mut self, total_price: BigDecimal) -> Self {
        self.total_price = Some(total_price);
        self
    }

    pub fn with_token_amount(mut self, token_amount: BigDecimal) -> Self {
        self.token_amount = Some(token_amount);
        self
    }

    pub fn with_unit(mut self, unit_id: impl Into<String>) -> Self {
        self.unit_id = Some(unit_id.into());
        self
    }

    pub fn with_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Total price, 0 when missing
    pub fn total_price_or_zero(&self) -> BigDecimal {
        or_zero(self.total_price.as_ref())
    }

    /// Token amount, 0 when missing
    pub fn token_amount_or_zero(&self) -> BigDecimal {
        or_zero(self.token_amount.as_ref())
    }
}

/// A payment record fetched from the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Unique identifier for the payment
    pub id: String,
    /// Booking this payment was collected against
    #[serde(default)]
    pub booking_id: Option<String>,
    /// Amount collected
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<BigDecimal>,
    /// Settlement state
    #[serde(default, deserialize_with = "lenient_variant")]
    pub status: Option<PaymentStatus>,
    /// Purpose of the payment
    #[serde(default, deserialize_with = "lenient_variant")]
    pub payment_type: Option<PaymentType>,
}

impl Payment {
    /// Create a payment with no booking, amount or status
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            booking_id: None,
            amount: None,
            status: None,
            payment_type: None,
        }
    }

    pub fn for_booking(mut self, booking_id: impl Into<String>) -> Self {
        self.booking_id = Some(booking_id.into());
        self
    }

    pub fn with_amount(mut self, amount: BigDecimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_type(mut self, payment_type: PaymentType) -> Self {
        self.payment_type = Some(payment_type);
        self
    }

    /// Amount, 0 when missing
    pub fn amount_or_zero(&self) -> BigDecimal {
        or_zero(self.amount.as_ref())
    }

    /// Non-empty booking id, if any
    pub fn booking_key(&self) -> Option<&str> {
        self.booking_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Whether this payment belongs to a booking at all
    pub fn is_attributable(&self) -> bool {
        self.booking_key().is_some()
            || self
                .payment_type
                .as_ref()
                .is_some_and(PaymentType::is_booking_related)
    }
}

/// Errors that can occur in the CRM core
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Result type for CRM operations
pub type CrmResult<T> = Result<T, CrmError>;
