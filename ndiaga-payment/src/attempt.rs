use ndiaga_core::payment::PaymentMethod;
use ndiaga_shared::ReservationId;

/// Per-attempt payment lifecycle.
///
/// `Succeeded` is terminal and triggers ticket generation; `Failed` allows a
/// fresh attempt against the same draft. Provider cancel and provider error
/// both land in `Failed`; there is no separate cancelled state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    CreatingReservation,
    /// Control handed to the checkout widget (mobile money / Wave).
    Dispatched(PaymentMethod),
    /// Lightning invoice issued, settlement not yet polled.
    AwaitingInvoice,
    Verifying,
    Succeeded,
    Failed,
}

impl AttemptState {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            AttemptState::CreatingReservation
                | AttemptState::Dispatched(_)
                | AttemptState::AwaitingInvoice
                | AttemptState::Verifying
        )
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AttemptError {
    #[error("A payment attempt is already in flight")]
    InFlight,

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

/// One payment attempt for the current draft. Transient: never persisted.
///
/// Only one attempt may be in flight at a time; `begin` refuses to start a
/// second one, which is what keeps a double-clicked pay button from creating
/// concurrent attempts.
#[derive(Debug)]
pub struct PaymentAttempt {
    state: AttemptState,
    method: Option<PaymentMethod>,
    reservation_id: Option<ReservationId>,
}

impl Default for PaymentAttempt {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentAttempt {
    pub fn new() -> Self {
        Self {
            state: AttemptState::Idle,
            method: None,
            reservation_id: None,
        }
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    pub fn reservation_id(&self) -> Option<&ReservationId> {
        self.reservation_id.as_ref()
    }

    /// Start a new attempt. Legal from `Idle`, `Failed` (retry) and
    /// `Succeeded` (next booking); refused while any attempt is in flight.
    pub fn begin(&mut self, method: PaymentMethod) -> Result<(), AttemptError> {
        if self.state.is_in_flight() {
            return Err(AttemptError::InFlight);
        }
        self.state = AttemptState::CreatingReservation;
        self.method = Some(method);
        self.reservation_id = None;
        tracing::info!("Payment attempt started ({:?})", method);
        Ok(())
    }

    /// The backend issued a pending reservation; move to the rail-specific
    /// dispatch state.
    pub fn reservation_created(&mut self, id: ReservationId) -> Result<(), AttemptError> {
        if self.state != AttemptState::CreatingReservation {
            return Err(self.invalid("Dispatched"));
        }
        let method = self.method.ok_or_else(|| self.invalid("Dispatched"))?;
        self.reservation_id = Some(id);
        self.state = if method.uses_widget() {
            AttemptState::Dispatched(method)
        } else {
            AttemptState::AwaitingInvoice
        };
        Ok(())
    }

    /// Provider interaction finished (widget callback fired / invoice shown);
    /// server-side verification is next.
    pub fn verifying(&mut self) -> Result<(), AttemptError> {
        match self.state {
            AttemptState::Dispatched(_) | AttemptState::AwaitingInvoice => {
                self.state = AttemptState::Verifying;
                Ok(())
            }
            _ => Err(self.invalid("Verifying")),
        }
    }

    /// Server confirmed settlement. Terminal.
    pub fn succeeded(&mut self) -> Result<(), AttemptError> {
        if self.state != AttemptState::Verifying {
            return Err(self.invalid("Succeeded"));
        }
        self.state = AttemptState::Succeeded;
        tracing::info!("Payment attempt succeeded");
        Ok(())
    }

    /// Any failure funnels here; a new attempt may begin afterwards.
    pub fn fail(&mut self) {
        tracing::warn!("Payment attempt failed (was {:?})", self.state);
        self.state = AttemptState::Failed;
    }

    fn invalid(&self, to: &str) -> AttemptError {
        AttemptError::InvalidTransition {
            from: format!("{:?}", self.state),
            to: to.to_string(),
        }
    }
}
