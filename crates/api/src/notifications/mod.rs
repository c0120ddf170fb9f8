//! Confirmation notification dispatch.
//!
//! Delivery runs after the transaction that commits the status change, off
//! the critical path: a failure to notify is logged and never rolls back or
//! blocks the transition. The [`Notifier`] trait is the seam where the
//! platform's transactional email service plugs in; the default
//! implementation writes to the log.

use std::sync::Arc;

use async_trait::async_trait;
use kerbside_db::models::booking::Booking;

/// Delivery failure, surfaced only to the dispatch task's log line.
#[derive(Debug, thiserror::Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Sink for booking lifecycle notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a booking-confirmation notice to the renter.
    async fn booking_confirmed(&self, booking: &Booking) -> Result<(), NotifyError>;
}

/// Default sink: writes the notification to the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn booking_confirmed(&self, booking: &Booking) -> Result<(), NotifyError> {
        tracing::info!(
            booking_id = booking.id,
            user_id = booking.user_id,
            vehicle_id = booking.vehicle_id,
            "Booking confirmation notification delivered"
        );
        Ok(())
    }
}

/// Fire-and-forget confirmation dispatch.
///
/// Spawned so the HTTP response never waits on delivery; errors are logged
/// and dropped. No retries -- those belong to the delivery service behind
/// the [`Notifier`] seam.
pub fn dispatch_confirmation(notifier: Arc<dyn Notifier>, booking: Booking) {
    tokio::spawn(async move {
        if let Err(err) = notifier.booking_confirmed(&booking).await {
            tracing::warn!(
                booking_id = booking.id,
                error = %err,
                "Failed to deliver booking confirmation"
            );
        }
    });
}
