use ndiaga_core::gateway::BookingBackend;
use ndiaga_shared::{InvoiceId, ReservationId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// How a polling run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Paid,
    Cancelled,
}

/// Polls the backend until a Lightning invoice settles.
///
/// The owning page holds the cancel sender; flipping it (or dropping it on
/// navigation) stops the loop between ticks, so no verification call is ever
/// issued after settlement or cancellation. Transient verification errors do
/// not end the run; the next tick retries.
pub struct LightningPoller {
    backend: Arc<dyn BookingBackend>,
    interval: Duration,
}

impl LightningPoller {
    pub fn new(backend: Arc<dyn BookingBackend>, interval: Duration) -> Self {
        Self { backend, interval }
    }

    pub async fn wait_for_settlement(
        &self,
        invoice_id: &InvoiceId,
        reservation_id: &ReservationId,
        mut cancel: watch::Receiver<bool>,
    ) -> PollOutcome {
        if *cancel.borrow() {
            return PollOutcome::Cancelled;
        }

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!(
                            "Lightning poll cancelled for reservation {}",
                            reservation_id
                        );
                        return PollOutcome::Cancelled;
                    }
                }
                _ = tokio::time::sleep(self.interval) => {
                    match self.backend.verify_invoice(invoice_id, reservation_id).await {
                        Ok(verification) if verification.paid => {
                            tracing::info!(
                                "Lightning invoice {} settled for reservation {}",
                                invoice_id,
                                reservation_id
                            );
                            return PollOutcome::Paid;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!("Lightning payment verification failed, will retry: {}", e);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBookingBackend;
    use std::sync::atomic::Ordering;

    #[tokio::test(start_paused = true)]
    async fn test_poll_stops_once_paid() {
        let backend = Arc::new(MockBookingBackend::new().invoice_paid_after_polls(2));
        let poller = LightningPoller::new(backend.clone(), Duration::from_secs(5));
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let outcome = poller
            .wait_for_settlement(
                &InvoiceId::from("inv-1"),
                &ReservationId::from("R1"),
                cancel_rx,
            )
            .await;

        assert_eq!(outcome, PollOutcome::Paid);
        assert_eq!(backend.verify_invoice_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_further_verification() {
        let backend = Arc::new(MockBookingBackend::new().invoice_paid_after_polls(usize::MAX));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let task = tokio::spawn({
            let poller = LightningPoller::new(backend.clone(), Duration::from_secs(5));
            async move {
                poller
                    .wait_for_settlement(
                        &InvoiceId::from("inv-1"),
                        &ReservationId::from("R1"),
                        cancel_rx,
                    )
                    .await
            }
        });

        tokio::time::sleep(Duration::from_secs(12)).await;
        let calls_before_cancel = backend.verify_invoice_calls.load(Ordering::SeqCst);
        assert_eq!(calls_before_cancel, 2);

        cancel_tx.send(true).unwrap();
        assert_eq!(task.await.unwrap(), PollOutcome::Cancelled);
        assert_eq!(
            backend.verify_invoice_calls.load(Ordering::SeqCst),
            calls_before_cancel
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_verify_error_keeps_polling() {
        let backend = Arc::new(
            MockBookingBackend::new()
                .invoice_paid_after_polls(3)
                .verify_invoice_error_on_poll(1),
        );
        let poller = LightningPoller::new(backend.clone(), Duration::from_secs(5));
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let outcome = poller
            .wait_for_settlement(
                &InvoiceId::from("inv-1"),
                &ReservationId::from("R1"),
                cancel_rx,
            )
            .await;

        assert_eq!(outcome, PollOutcome::Paid);
        assert_eq!(backend.verify_invoice_calls.load(Ordering::SeqCst), 3);
    }
}
