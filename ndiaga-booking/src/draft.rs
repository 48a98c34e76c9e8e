use ndiaga_shared::{Money, PassengerInfo, ReservationId, ScheduleSelection, TicketId};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// The in-progress reservation. Lives for exactly one booking attempt; reset
/// to the all-empty state once the attempt confirms or is abandoned.
///
/// `reservation_id` is only populated after a successful reservation-creation
/// call, `ticket_id` only after verified payment and ticket generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingDraft {
    pub schedule: Option<ScheduleSelection>,
    pub passenger: Option<PassengerInfo>,
    pub total_amount: Money,
    pub reservation_id: Option<ReservationId>,
    pub ticket_id: Option<TicketId>,
}

impl BookingDraft {
    pub fn is_empty(&self) -> bool {
        self == &BookingDraft::default()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("No trip selected: passenger details require a schedule first")]
    NoScheduleSelected,

    #[error("Total amount must be positive, got {0}")]
    InvalidAmount(i64),
}

/// Sole owner of the booking draft. Pages and the payment orchestrator go
/// through the named setters; nothing else writes the draft.
#[derive(Debug, Default)]
pub struct DraftStore {
    draft: BookingDraft,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Replace the selected trip. Other fields are left alone; a fresh search
    /// supersedes the snapshot rather than mutating it.
    pub fn select_trip(&mut self, schedule: ScheduleSelection) {
        self.draft.schedule = Some(schedule);
    }

    /// Record validated passenger details. Requires a selected trip; the flow
    /// guard keeps pages from calling this out of order.
    pub fn set_passenger_info(&mut self, info: PassengerInfo) -> Result<(), DraftError> {
        if self.draft.schedule.is_none() {
            return Err(DraftError::NoScheduleSelected);
        }
        self.draft.passenger = Some(info);
        Ok(())
    }

    pub fn set_total_amount(&mut self, amount: Money) -> Result<(), DraftError> {
        if !amount.is_positive() {
            return Err(DraftError::InvalidAmount(amount.francs()));
        }
        self.draft.total_amount = amount;
        Ok(())
    }

    /// Overwrites any previous id: a retried payment attempt may be issued a
    /// fresh reservation by the server.
    pub fn set_reservation_id(&mut self, id: ReservationId) {
        self.draft.reservation_id = Some(id);
    }

    pub fn set_ticket_id(&mut self, id: TicketId) {
        self.draft.ticket_id = Some(id);
    }

    /// Clear every field back to its empty default. Called once per completed
    /// or abandoned booking; calling it again is a no-op.
    pub fn reset(&mut self) {
        if !self.draft.is_empty() {
            tracing::info!("Booking draft reset");
        }
        self.draft = BookingDraft::default();
    }
}

/// Cloneable handle over the draft store for cross-page sharing.
///
/// Every mutation publishes a fresh snapshot on a watch channel so page
/// guards can react to late-arriving state without re-polling.
#[derive(Debug, Clone)]
pub struct SharedDraftStore {
    inner: Arc<Mutex<DraftStore>>,
    tx: Arc<watch::Sender<BookingDraft>>,
}

impl Default for SharedDraftStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedDraftStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BookingDraft::default());
        Self {
            inner: Arc::new(Mutex::new(DraftStore::new())),
            tx: Arc::new(tx),
        }
    }

    pub fn snapshot(&self) -> BookingDraft {
        self.lock().draft().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BookingDraft> {
        self.tx.subscribe()
    }

    pub fn select_trip(&self, schedule: ScheduleSelection) {
        self.lock().select_trip(schedule);
        self.publish();
    }

    pub fn set_passenger_info(&self, info: PassengerInfo) -> Result<(), DraftError> {
        self.lock().set_passenger_info(info)?;
        self.publish();
        Ok(())
    }

    pub fn set_total_amount(&self, amount: Money) -> Result<(), DraftError> {
        self.lock().set_total_amount(amount)?;
        self.publish();
        Ok(())
    }

    pub fn set_reservation_id(&self, id: ReservationId) {
        self.lock().set_reservation_id(id);
        self.publish();
    }

    pub fn set_ticket_id(&self, id: TicketId) {
        self.lock().set_ticket_id(id);
        self.publish();
    }

    pub fn reset(&self) {
        self.lock().reset();
        self.publish();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DraftStore> {
        // Setters never panic while holding the lock, so poisoning cannot
        // happen in practice; recover with the inner state if it ever does.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        self.tx.send_replace(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ndiaga_shared::ScheduleId;

    fn sample_schedule() -> ScheduleSelection {
        ScheduleSelection {
            schedule_id: ScheduleId::from("sched-1"),
            origin: "Dakar".to_string(),
            destination: "Bamako".to_string(),
            departure_time: Utc::now(),
            price: Money::new(15000),
            agency_name: "Trans-Sahel Express".to_string(),
            duration_minutes: 480,
        }
    }

    fn sample_passenger() -> PassengerInfo {
        PassengerInfo {
            full_name: "Jean Dupont".to_string(),
            phone: "+221700000000".to_string(),
            email: None,
            id_number: "SN-123456".to_string(),
            emergency_name: None,
            emergency_phone: None,
        }
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let mut store = DraftStore::new();
        store.select_trip(sample_schedule());
        store.set_passenger_info(sample_passenger()).unwrap();
        store.set_total_amount(Money::new(15000)).unwrap();
        store.set_reservation_id(ReservationId::from("R1"));
        store.set_ticket_id(TicketId::from("T1"));

        store.reset();
        assert!(store.draft().is_empty());

        // A new selection must not resurrect previous passenger/ticket data.
        store.select_trip(sample_schedule());
        assert!(store.draft().passenger.is_none());
        assert!(store.draft().reservation_id.is_none());
        assert!(store.draft().ticket_id.is_none());
        assert_eq!(store.draft().total_amount, Money::ZERO);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut store = DraftStore::new();
        store.select_trip(sample_schedule());
        store.reset();
        store.reset();
        assert!(store.draft().is_empty());
    }

    #[test]
    fn test_passenger_requires_schedule() {
        let mut store = DraftStore::new();
        assert_eq!(
            store.set_passenger_info(sample_passenger()),
            Err(DraftError::NoScheduleSelected)
        );
        store.select_trip(sample_schedule());
        assert!(store.set_passenger_info(sample_passenger()).is_ok());
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let mut store = DraftStore::new();
        assert_eq!(
            store.set_total_amount(Money::ZERO),
            Err(DraftError::InvalidAmount(0))
        );
        assert_eq!(
            store.set_total_amount(Money::new(-100)),
            Err(DraftError::InvalidAmount(-100))
        );
        assert_eq!(store.draft().total_amount, Money::ZERO);
        assert!(store.set_total_amount(Money::new(1)).is_ok());
    }

    #[test]
    fn test_reservation_id_overwrite_supports_retry() {
        let mut store = DraftStore::new();
        store.select_trip(sample_schedule());
        store.set_reservation_id(ReservationId::from("R1"));
        store.set_reservation_id(ReservationId::from("R2"));
        assert_eq!(
            store.draft().reservation_id,
            Some(ReservationId::from("R2"))
        );
    }

    #[tokio::test]
    async fn test_shared_store_publishes_snapshots() {
        let store = SharedDraftStore::new();
        let mut rx = store.subscribe();

        store.select_trip(sample_schedule());
        rx.changed().await.unwrap();
        assert!(rx.borrow().schedule.is_some());

        store.reset();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_empty());
    }
}
