use async_trait::async_trait;
use ndiaga_core::gateway::{
    BookingBackend, CheckoutInfo, LightningInvoice, PaymentVerification, Reservation, TicketRecord,
};
use ndiaga_core::{ClientError, ClientResult};
use ndiaga_shared::{InvoiceId, PassengerInfo, ReservationId, ScheduleId, TransactionId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Typed client for the booking backend.
///
/// Pure request/response boundary: attaches the bearer credential when one
/// is supplied, translates non-2xx responses into `ClientError::Server`, and
/// performs no retries (the chat assistant has its own client with its own
/// policy).
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> ClientResult<T> {
        let mut request = self.http.get(self.url(path));
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> ClientResult<T> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    pub(crate) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> ClientResult<T> {
        let mut request = self.http.put(self.url(path)).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    /// POST for endpoints whose success response carries no body worth
    /// reading; non-2xx still goes through the usual error translation.
    pub(crate) async fn post_no_content<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> ClientResult<()> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &body));
        }
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &body));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Network(format!("Unreadable response body: {}", e)))
    }
}

/// Translate a non-2xx body: the backend's JSON `detail` field when present,
/// raw text next, a generic status-derived message last.
pub(crate) fn error_from_body(status: u16, body: &str) -> ClientError {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return ClientError::Server {
                status,
                message: detail.to_string(),
            };
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        ClientError::from_status(status)
    } else {
        ClientError::Server {
            status,
            message: trimmed.to_string(),
        }
    }
}

// ============================================================================
// Payment/reservation calls consumed by the orchestrator
// ============================================================================

#[derive(Serialize)]
struct CreateReservationBody<'a> {
    schedule_id: &'a str,
    passenger_info: &'a PassengerInfo,
}

#[derive(Serialize)]
struct ReservationRef<'a> {
    reservation_id: &'a str,
}

#[derive(Serialize)]
struct WidgetVerifyBody<'a> {
    transaction_id: &'a str,
    reservation_id: &'a str,
}

#[derive(Serialize)]
struct InvoiceVerifyBody<'a> {
    payment_hash: &'a str,
    reservation_id: &'a str,
}

#[async_trait]
impl BookingBackend for ApiClient {
    async fn create_reservation(
        &self,
        schedule_id: &ScheduleId,
        passenger: &PassengerInfo,
        bearer: Option<&str>,
    ) -> ClientResult<Reservation> {
        self.post_json(
            "/reservations",
            &CreateReservationBody {
                schedule_id: schedule_id.as_str(),
                passenger_info: passenger,
            },
            bearer,
        )
        .await
    }

    async fn checkout_info(&self, reservation_id: &ReservationId) -> ClientResult<CheckoutInfo> {
        self.post_json(
            "/payments/kkiapay/create",
            &ReservationRef {
                reservation_id: reservation_id.as_str(),
            },
            None,
        )
        .await
    }

    async fn verify_widget_payment(
        &self,
        transaction_id: &TransactionId,
        reservation_id: &ReservationId,
    ) -> ClientResult<PaymentVerification> {
        self.post_json(
            "/payments/kkiapay/verify",
            &WidgetVerifyBody {
                transaction_id: transaction_id.as_str(),
                reservation_id: reservation_id.as_str(),
            },
            None,
        )
        .await
    }

    async fn create_invoice(
        &self,
        reservation_id: &ReservationId,
    ) -> ClientResult<LightningInvoice> {
        self.post_json(
            "/payments/lightning/create-invoice",
            &ReservationRef {
                reservation_id: reservation_id.as_str(),
            },
            None,
        )
        .await
    }

    async fn verify_invoice(
        &self,
        invoice_id: &InvoiceId,
        reservation_id: &ReservationId,
    ) -> ClientResult<PaymentVerification> {
        self.post_json(
            "/payments/lightning/verify",
            &InvoiceVerifyBody {
                payment_hash: invoice_id.as_str(),
                reservation_id: reservation_id.as_str(),
            },
            None,
        )
        .await
    }

    async fn generate_ticket(&self, reservation_id: &ReservationId) -> ClientResult<TicketRecord> {
        self.post_json(
            "/tickets/generate",
            &ReservationRef {
                reservation_id: reservation_id.as_str(),
            },
            None,
        )
        .await
    }
}
