//! Explicit session context for role-scoped views

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::*;

/// Dashboard roles, from widest to narrowest visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Manager,
    Agent,
    Customer,
}

impl Role {
    /// Back-office roles; admins and managers are limited to their tenant,
    /// super admins see everything
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin | Role::Manager)
    }
}

/// The signed-in user, passed explicitly to anything that needs it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub user_id: String,
    pub role: Role,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, role: Role) -> CrmResult<Self> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(CrmError::Validation(
                "Session user ID cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            user_id,
            role,
            tenant_id: None,
        })
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Whether this session may see the given booking
    pub fn can_view_booking(&self, booking: &Booking) -> bool {
        match self.role {
            Role::SuperAdmin => true,
            role if role.is_staff() => match (&self.tenant_id, &booking.tenant_id) {
                (Some(ours), Some(theirs)) => ours == theirs,
                _ => true,
            },
            Role::Agent => booking.agent_id.as_deref() == Some(self.user_id.as_str()),
            Role::Customer => booking.customer_id.as_deref() == Some(self.user_id.as_str()),
            _ => false,
        }
    }

    /// Keep only bookings visible to this session
    pub fn scope_bookings(&self, bookings: Vec<Booking>) -> Vec<Booking> {
        bookings
            .into_iter()
            .filter(|booking| self.can_view_booking(booking))
            .collect()
    }

    /// Keep only payments that belong to one of the visible bookings
    pub fn scope_payments(&self, bookings: &[Booking], payments: Vec<Payment>) -> Vec<Payment> {
        if self.role == Role::SuperAdmin {
            return payments;
        }

        let visible: HashSet<&str> = bookings.iter().map(|b| b.id.as_str()).collect();
        payments
            .into_iter()
            .filter(|payment| {
                payment
                    .booking_key()
                    .is_some_and(|booking_id| visible.contains(booking_id))
            })
            .collect()
    }
}
