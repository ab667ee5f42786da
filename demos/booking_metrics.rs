//! Booking reconciliation dashboard example

use bigdecimal::BigDecimal;
use estate_crm_core::utils::MemoryStorage;
use estate_crm_core::{
    Booking, BookingStatus, BookingsDashboard, Payment, PaymentStatus, PaymentType, Role,
    SessionContext,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏢 Estate CRM Core - Booking Metrics Example\n");

    let mut dashboard = BookingsDashboard::new(MemoryStorage::new());

    // 1. Bookings as the sales team sees them
    println!("📋 Recording bookings...");
    let bookings = vec![
        Booking::new("BK-101", BookingStatus::Booked)
            .with_unit("Tower A / 1204")
            .with_agent("agent-priya")
            .with_total_price(BigDecimal::from(8500000)),
        Booking::new("BK-102", BookingStatus::HoldConfirmed)
            .with_unit("Tower B / 0701")
            .with_agent("agent-priya")
            .with_total_price(BigDecimal::from(6200000))
            .with_token_amount(BigDecimal::from(100000)),
        Booking::new("BK-103", BookingStatus::Cancelled)
            .with_unit("Tower A / 0302")
            .with_agent("agent-rahul")
            .with_total_price(BigDecimal::from(5400000)),
    ];
    for booking in bookings {
        println!("  ✓ {} ({:?})", booking.id, booking.status);
        dashboard.record_booking(booking).await?;
    }
    println!();

    // 2. Payments collected so far
    println!("💰 Recording payments...");
    let payments = vec![
        Payment::new("PAY-1")
            .for_booking("BK-101")
            .with_type(PaymentType::Booking)
            .with_amount(BigDecimal::from(850000))
            .with_status(PaymentStatus::Received),
        Payment::new("PAY-2")
            .for_booking("BK-101")
            .with_type(PaymentType::Installment)
            .with_amount(BigDecimal::from(7650000))
            .with_status(PaymentStatus::Received),
        Payment::new("PAY-3")
            .for_booking("BK-103")
            .with_type(PaymentType::Token)
            .with_amount(BigDecimal::from(100000))
            .with_status(PaymentStatus::Refunded),
    ];
    for payment in payments {
        println!("  ✓ {} ({:?})", payment.id, payment.status);
        dashboard.record_payment(payment).await?;
    }
    println!();

    // 3. Admin view
    let admin = SessionContext::new("admin-1", Role::Admin)?;
    let metrics = dashboard.metrics(&admin).await?;

    println!("📊 Admin dashboard:");
    println!("  Completed:       {}", metrics.completed_count());
    println!("  Payment pending: {}", metrics.pending_count());
    println!("  Cancelled:       {}", metrics.cancelled_count());
    println!("  Total revenue:   ₹{}", metrics.total_revenue);
    println!("  Pending revenue: ₹{}", metrics.pending_revenue);
    println!();

    // 4. Agent view only covers their own bookings
    let agent = SessionContext::new("agent-priya", Role::Agent)?;
    let page = dashboard.pending_bookings_page(&agent, 1).await?;

    println!("🧑‍💼 Pending bookings for agent-priya:");
    for booking in &page.items {
        let balance = dashboard.booking_balance(&agent, &booking.id).await?;
        println!(
            "  {} paid ₹{} / remaining ₹{}",
            booking.id, balance.paid_amount, balance.remaining_amount
        );
    }
    println!(
        "  Page {} of {}",
        page.pagination.current_page(),
        page.pagination.total_pages()
    );

    Ok(())
}
