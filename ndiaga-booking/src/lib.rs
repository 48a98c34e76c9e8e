pub mod draft;
pub mod flow;
pub mod passenger;

pub use draft::{BookingDraft, DraftError, DraftStore, SharedDraftStore};
pub use flow::{AbandonGuard, BookingPage, GuardOutcome};
pub use passenger::{FormError, PassengerForm};
