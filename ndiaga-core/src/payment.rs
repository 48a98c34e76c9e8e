use crate::gateway::CheckoutInfo;
use async_trait::async_trait;
use ndiaga_shared::{ReservationId, TransactionId};
use serde::{Deserialize, Serialize};

/// The three payment rails the platform supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    MobileMoney,
    Wave,
    LightningBtc,
}

impl PaymentMethod {
    /// Mobile money and Wave both settle through the hosted checkout widget;
    /// Lightning settles through invoice polling.
    pub fn uses_widget(&self) -> bool {
        matches!(self, PaymentMethod::MobileMoney | PaymentMethod::Wave)
    }
}

/// What the orchestrator hands to the checkout widget.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub info: CheckoutInfo,
    pub payer_phone: String,
    pub payer_name: String,
    pub reservation_id: ReservationId,
}

/// Terminal widget outcomes. Provider cancel and provider error are collapsed
/// into `Failed`; the user-facing handling is identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetOutcome {
    Completed { transaction_id: TransactionId },
    Failed { message: String },
}

/// The third-party mobile-money/Wave checkout widget.
///
/// External collaborator, not reimplemented here. `open` resolves when the
/// widget fires one of its callbacks; the provider enforces no timeout, so
/// the call may pend until the owning page goes away.
#[async_trait]
pub trait CheckoutWidget: Send + Sync {
    async fn open(&self, request: CheckoutRequest) -> WidgetOutcome;
}

/// Widget stand-in that reports a fixed outcome.
pub struct MockCheckoutWidget {
    outcome: WidgetOutcome,
}

impl MockCheckoutWidget {
    pub fn completing_with(transaction_id: &str) -> Self {
        Self {
            outcome: WidgetOutcome::Completed {
                transaction_id: TransactionId::from(transaction_id),
            },
        }
    }

    pub fn failing_with(message: &str) -> Self {
        Self {
            outcome: WidgetOutcome::Failed {
                message: message.to_string(),
            },
        }
    }
}

#[async_trait]
impl CheckoutWidget for MockCheckoutWidget {
    async fn open(&self, request: CheckoutRequest) -> WidgetOutcome {
        tracing::info!(
            "Mock checkout widget opened for reservation {} ({})",
            request.reservation_id,
            request.info.amount
        );
        self.outcome.clone()
    }
}
