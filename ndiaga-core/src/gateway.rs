use crate::ClientResult;
use async_trait::async_trait;
use ndiaga_shared::{InvoiceId, Money, PassengerInfo, ReservationId, ScheduleId, TicketId, TransactionId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Backend DTOs
// ============================================================================

/// A pending reservation created by the backend. The total already reflects
/// any server-side discount for authenticated clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub total_amount: Money,
    pub status: String,
}

/// Launch parameters for the mobile-money/Wave checkout widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutInfo {
    pub public_key: String,
    pub amount: Money,
    pub sandbox: bool,
    pub reason: String,
}

/// A Lightning invoice to display as QR code and poll for settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightningInvoice {
    pub invoice_id: InvoiceId,
    pub payment_request: String,
    pub qr_code: Option<String>,
    pub checkout_link: Option<String>,
}

/// Server verdict on whether a payment has settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub paid: bool,
}

/// An issued ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: TicketId,
    pub reservation_id: ReservationId,
}

// ============================================================================
// Gateway trait
// ============================================================================

/// The REST backend calls the payment orchestrator depends on.
///
/// Implemented over HTTP by ndiaga-gateway and by in-memory mocks in tests.
/// The bearer credential is optional on reservation creation: the server
/// applies the client discount when a valid one is attached.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn create_reservation(
        &self,
        schedule_id: &ScheduleId,
        passenger: &PassengerInfo,
        bearer: Option<&str>,
    ) -> ClientResult<Reservation>;

    async fn checkout_info(&self, reservation_id: &ReservationId) -> ClientResult<CheckoutInfo>;

    async fn verify_widget_payment(
        &self,
        transaction_id: &TransactionId,
        reservation_id: &ReservationId,
    ) -> ClientResult<PaymentVerification>;

    async fn create_invoice(
        &self,
        reservation_id: &ReservationId,
    ) -> ClientResult<LightningInvoice>;

    async fn verify_invoice(
        &self,
        invoice_id: &InvoiceId,
        reservation_id: &ReservationId,
    ) -> ClientResult<PaymentVerification>;

    async fn generate_ticket(&self, reservation_id: &ReservationId) -> ClientResult<TicketRecord>;
}
