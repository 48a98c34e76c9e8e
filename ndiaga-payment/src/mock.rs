use async_trait::async_trait;
use ndiaga_core::gateway::{
    BookingBackend, CheckoutInfo, LightningInvoice, PaymentVerification, Reservation, TicketRecord,
};
use ndiaga_core::{ClientError, ClientResult};
use ndiaga_shared::{
    InvoiceId, Money, PassengerInfo, ReservationId, ScheduleId, TicketId, TransactionId,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scriptable backend stand-in for orchestrator and poller tests.
///
/// Defaults to the happy path: reservation "R1" (discounted when a bearer
/// credential is attached), widget payments verify as paid, the Lightning
/// invoice settles on the second poll, ticket "T1".
pub struct MockBookingBackend {
    reservation_rejection: Option<String>,
    widget_verification_paid: bool,
    invoice_paid_after: usize,
    verify_invoice_error_on: Option<usize>,
    pub create_reservation_calls: AtomicUsize,
    pub verify_widget_calls: AtomicUsize,
    pub verify_invoice_calls: AtomicUsize,
    pub generate_ticket_calls: AtomicUsize,
}

impl Default for MockBookingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBookingBackend {
    pub fn new() -> Self {
        Self {
            reservation_rejection: None,
            widget_verification_paid: true,
            invoice_paid_after: 2,
            verify_invoice_error_on: None,
            create_reservation_calls: AtomicUsize::new(0),
            verify_widget_calls: AtomicUsize::new(0),
            verify_invoice_calls: AtomicUsize::new(0),
            generate_ticket_calls: AtomicUsize::new(0),
        }
    }

    /// Reject reservation creation with the given server message.
    pub fn reservation_rejected(mut self, message: &str) -> Self {
        self.reservation_rejection = Some(message.to_string());
        self
    }

    /// Report widget payments as unpaid on server-side verification.
    pub fn widget_verification_unpaid(mut self) -> Self {
        self.widget_verification_paid = false;
        self
    }

    /// Settle the Lightning invoice on the n-th verification call.
    pub fn invoice_paid_after_polls(mut self, polls: usize) -> Self {
        self.invoice_paid_after = polls;
        self
    }

    /// Fail the n-th invoice verification with a network error (transient).
    pub fn verify_invoice_error_on_poll(mut self, poll: usize) -> Self {
        self.verify_invoice_error_on = Some(poll);
        self
    }
}

#[async_trait]
impl BookingBackend for MockBookingBackend {
    async fn create_reservation(
        &self,
        _schedule_id: &ScheduleId,
        _passenger: &PassengerInfo,
        bearer: Option<&str>,
    ) -> ClientResult<Reservation> {
        self.create_reservation_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.reservation_rejection {
            return Err(ClientError::Server {
                status: 409,
                message: message.clone(),
            });
        }
        let base = Money::new(15000);
        Ok(Reservation {
            id: ReservationId::from("R1"),
            total_amount: if bearer.is_some() {
                base.with_client_discount()
            } else {
                base
            },
            status: "pending".to_string(),
        })
    }

    async fn checkout_info(&self, _reservation_id: &ReservationId) -> ClientResult<CheckoutInfo> {
        Ok(CheckoutInfo {
            public_key: "pk_test".to_string(),
            amount: Money::new(15000),
            sandbox: true,
            reason: "Bus ticket".to_string(),
        })
    }

    async fn verify_widget_payment(
        &self,
        _transaction_id: &TransactionId,
        _reservation_id: &ReservationId,
    ) -> ClientResult<PaymentVerification> {
        self.verify_widget_calls.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentVerification {
            paid: self.widget_verification_paid,
        })
    }

    async fn create_invoice(
        &self,
        _reservation_id: &ReservationId,
    ) -> ClientResult<LightningInvoice> {
        Ok(LightningInvoice {
            invoice_id: InvoiceId::from("inv-1"),
            payment_request: "lnbc150u1p...".to_string(),
            qr_code: None,
            checkout_link: None,
        })
    }

    async fn verify_invoice(
        &self,
        _invoice_id: &InvoiceId,
        _reservation_id: &ReservationId,
    ) -> ClientResult<PaymentVerification> {
        let call = self.verify_invoice_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.verify_invoice_error_on == Some(call) {
            return Err(ClientError::Network("connection reset".to_string()));
        }
        Ok(PaymentVerification {
            paid: call >= self.invoice_paid_after,
        })
    }

    async fn generate_ticket(&self, reservation_id: &ReservationId) -> ClientResult<TicketRecord> {
        self.generate_ticket_calls.fetch_add(1, Ordering::SeqCst);
        Ok(TicketRecord {
            id: TicketId::from("T1"),
            reservation_id: reservation_id.clone(),
        })
    }
}
