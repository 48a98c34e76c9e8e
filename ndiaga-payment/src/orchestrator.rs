use crate::attempt::{AttemptError, AttemptState, PaymentAttempt};
use crate::poller::{LightningPoller, PollOutcome};
use ndiaga_booking::SharedDraftStore;
use ndiaga_core::gateway::{BookingBackend, LightningInvoice, TicketRecord};
use ndiaga_core::payment::{CheckoutRequest, CheckoutWidget, PaymentMethod, WidgetOutcome};
use ndiaga_core::ClientError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("A payment attempt is already in progress")]
    AttemptInFlight,

    #[error("Booking draft incomplete: {0}")]
    DraftIncomplete(&'static str),

    #[error("Payment cancelled before settlement")]
    Cancelled,

    #[error(transparent)]
    Api(#[from] ClientError),

    #[error(transparent)]
    Attempt(#[from] AttemptError),
}

/// What the payment page submits when the user hits pay.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    /// Bearer credential of the signed-in client, if any. The server applies
    /// its discount when present.
    pub bearer: Option<String>,
    /// Phone to charge for mobile money / Wave; defaults to the passenger's.
    pub payer_phone: Option<String>,
}

/// Turns a finalized booking draft into a paid reservation and an issued
/// ticket, across the three payment rails.
///
/// Sole writer of the transient `PaymentAttempt`; writes `reservation_id`
/// and `ticket_id` back into the draft only through the store's setters.
pub struct PaymentOrchestrator {
    backend: Arc<dyn BookingBackend>,
    widget: Arc<dyn CheckoutWidget>,
    drafts: SharedDraftStore,
    attempt: Mutex<PaymentAttempt>,
    poll_interval: Duration,
    invoice_tx: watch::Sender<Option<LightningInvoice>>,
}

impl PaymentOrchestrator {
    pub fn new(
        backend: Arc<dyn BookingBackend>,
        widget: Arc<dyn CheckoutWidget>,
        drafts: SharedDraftStore,
        poll_interval: Duration,
    ) -> Self {
        let (invoice_tx, _rx) = watch::channel(None);
        Self {
            backend,
            widget,
            drafts,
            attempt: Mutex::new(PaymentAttempt::new()),
            poll_interval,
            invoice_tx,
        }
    }

    /// Current attempt state, for the page to disable the pay control while
    /// anything is in flight.
    pub fn attempt_state(&self) -> AttemptState {
        self.with_attempt(|a| a.state())
    }

    /// The latest Lightning invoice, for the page to render as a QR code
    /// while the poller runs.
    pub fn subscribe_invoice(&self) -> watch::Receiver<Option<LightningInvoice>> {
        self.invoice_tx.subscribe()
    }

    /// Run one payment attempt end to end.
    ///
    /// Sequencing within the attempt is strict: reservation creation, then
    /// rail dispatch, then server-side verification, then ticket generation.
    /// On any failure the draft is left intact so the user can retry without
    /// re-entering passenger details; only the attempt is marked failed.
    ///
    /// `cancel` stops a Lightning poll when the page navigates away.
    pub async fn pay(
        &self,
        request: PaymentRequest,
        cancel: watch::Receiver<bool>,
    ) -> Result<TicketRecord, PaymentError> {
        self.with_attempt(|a| a.begin(request.method))
            .map_err(|e| match e {
                AttemptError::InFlight => PaymentError::AttemptInFlight,
                other => PaymentError::Attempt(other),
            })?;

        match self.run_attempt(&request, cancel).await {
            Ok(ticket) => Ok(ticket),
            Err(e) => {
                self.with_attempt(|a| a.fail());
                tracing::error!("Payment attempt failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run_attempt(
        &self,
        request: &PaymentRequest,
        cancel: watch::Receiver<bool>,
    ) -> Result<TicketRecord, PaymentError> {
        // The flow guard should have redirected before we can be invoked
        // with a hollow draft; this is the last line of defense.
        let draft = self.drafts.snapshot();
        let schedule = draft
            .schedule
            .ok_or(PaymentError::DraftIncomplete("no trip selected"))?;
        let passenger = draft
            .passenger
            .ok_or(PaymentError::DraftIncomplete("no passenger details"))?;
        if !draft.total_amount.is_positive() {
            return Err(PaymentError::DraftIncomplete("no total amount"));
        }

        // Retrying after a failure re-runs this call; the server may issue a
        // fresh reservation id, which simply overwrites the previous one.
        let reservation = self
            .backend
            .create_reservation(&schedule.schedule_id, &passenger, request.bearer.as_deref())
            .await?;
        self.drafts.set_reservation_id(reservation.id.clone());
        self.with_attempt(|a| a.reservation_created(reservation.id.clone()))?;

        if request.method.uses_widget() {
            let info = self.backend.checkout_info(&reservation.id).await?;
            // The provider enforces no completion timeout; dropping this
            // future on navigation is the only bound.
            let outcome = self
                .widget
                .open(CheckoutRequest {
                    info,
                    payer_phone: request
                        .payer_phone
                        .clone()
                        .unwrap_or_else(|| passenger.phone.clone()),
                    payer_name: passenger.full_name.clone(),
                    reservation_id: reservation.id.clone(),
                })
                .await;
            let transaction_id = match outcome {
                WidgetOutcome::Completed { transaction_id } => transaction_id,
                WidgetOutcome::Failed { message } => {
                    return Err(ClientError::Provider(message).into());
                }
            };
            // Widget-reported success is never trusted on its own.
            self.with_attempt(|a| a.verifying())?;
            let verification = self
                .backend
                .verify_widget_payment(&transaction_id, &reservation.id)
                .await?;
            if !verification.paid {
                return Err(
                    ClientError::Provider("Payment not confirmed by the server".to_string())
                        .into(),
                );
            }
        } else {
            let invoice = self.backend.create_invoice(&reservation.id).await?;
            self.invoice_tx.send_replace(Some(invoice.clone()));
            self.with_attempt(|a| a.verifying())?;
            let poller = LightningPoller::new(self.backend.clone(), self.poll_interval);
            match poller
                .wait_for_settlement(&invoice.invoice_id, &reservation.id, cancel)
                .await
            {
                PollOutcome::Paid => {}
                PollOutcome::Cancelled => return Err(PaymentError::Cancelled),
            }
        }

        self.with_attempt(|a| a.succeeded())?;
        let ticket = self.backend.generate_ticket(&reservation.id).await?;
        self.drafts.set_ticket_id(ticket.id.clone());
        Ok(ticket)
    }

    fn with_attempt<T>(&self, f: impl FnOnce(&mut PaymentAttempt) -> T) -> T {
        // Transitions never panic under the lock.
        let mut attempt = self.attempt.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBookingBackend;
    use chrono::Utc;
    use ndiaga_core::payment::MockCheckoutWidget;
    use ndiaga_shared::{Money, PassengerInfo, ScheduleId, ScheduleSelection, TicketId};
    use std::sync::atomic::Ordering;

    fn populated_drafts() -> SharedDraftStore {
        let drafts = SharedDraftStore::new();
        drafts.select_trip(ScheduleSelection {
            schedule_id: ScheduleId::from("sched-1"),
            origin: "Dakar".to_string(),
            destination: "Bamako".to_string(),
            departure_time: Utc::now(),
            price: Money::new(15000),
            agency_name: "Trans-Sahel Express".to_string(),
            duration_minutes: 480,
        });
        drafts
            .set_passenger_info(PassengerInfo {
                full_name: "Jean Dupont".to_string(),
                phone: "+221700000000".to_string(),
                email: None,
                id_number: "SN-123456".to_string(),
                emergency_name: None,
                emergency_phone: None,
            })
            .unwrap();
        drafts.set_total_amount(Money::new(15000)).unwrap();
        drafts
    }

    fn request(method: PaymentMethod) -> PaymentRequest {
        PaymentRequest {
            method,
            bearer: None,
            payer_phone: None,
        }
    }

    #[tokio::test]
    async fn test_widget_payment_issues_ticket() {
        let backend = Arc::new(MockBookingBackend::new());
        let widget = Arc::new(MockCheckoutWidget::completing_with("txn-42"));
        let drafts = populated_drafts();
        let orchestrator = PaymentOrchestrator::new(
            backend.clone(),
            widget,
            drafts.clone(),
            Duration::from_secs(5),
        );
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let ticket = orchestrator
            .pay(request(PaymentMethod::MobileMoney), cancel_rx)
            .await
            .unwrap();

        assert_eq!(ticket.id, TicketId::from("T1"));
        assert_eq!(backend.verify_widget_calls.load(Ordering::SeqCst), 1);
        assert_eq!(orchestrator.attempt_state(), AttemptState::Succeeded);

        let draft = drafts.snapshot();
        assert_eq!(draft.reservation_id.unwrap().as_str(), "R1");
        assert_eq!(draft.ticket_id.unwrap().as_str(), "T1");
    }

    #[tokio::test]
    async fn test_widget_failure_keeps_draft_for_retry() {
        let backend = Arc::new(MockBookingBackend::new());
        let widget = Arc::new(MockCheckoutWidget::failing_with("user closed the widget"));
        let drafts = populated_drafts();
        let orchestrator =
            PaymentOrchestrator::new(backend, widget, drafts.clone(), Duration::from_secs(5));
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let result = orchestrator.pay(request(PaymentMethod::Wave), cancel_rx).await;

        assert!(matches!(
            result,
            Err(PaymentError::Api(ClientError::Provider(_)))
        ));
        assert_eq!(orchestrator.attempt_state(), AttemptState::Failed);

        let draft = drafts.snapshot();
        assert!(draft.schedule.is_some());
        assert!(draft.passenger.is_some());
        assert!(draft.ticket_id.is_none());
    }

    #[tokio::test]
    async fn test_unverified_widget_success_is_not_trusted() {
        let backend = Arc::new(MockBookingBackend::new().widget_verification_unpaid());
        let widget = Arc::new(MockCheckoutWidget::completing_with("txn-42"));
        let drafts = populated_drafts();
        let orchestrator = PaymentOrchestrator::new(
            backend.clone(),
            widget,
            drafts.clone(),
            Duration::from_secs(5),
        );
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let result = orchestrator
            .pay(request(PaymentMethod::MobileMoney), cancel_rx)
            .await;

        assert!(matches!(
            result,
            Err(PaymentError::Api(ClientError::Provider(_)))
        ));
        assert_eq!(backend.generate_ticket_calls.load(Ordering::SeqCst), 0);
        assert!(drafts.snapshot().ticket_id.is_none());
    }

    #[tokio::test]
    async fn test_empty_draft_refused() {
        let backend = Arc::new(MockBookingBackend::new());
        let widget = Arc::new(MockCheckoutWidget::completing_with("txn-42"));
        let orchestrator = PaymentOrchestrator::new(
            backend,
            widget,
            SharedDraftStore::new(),
            Duration::from_secs(5),
        );
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let result = orchestrator
            .pay(request(PaymentMethod::MobileMoney), cancel_rx)
            .await;
        assert!(matches!(result, Err(PaymentError::DraftIncomplete(_))));
    }
}
