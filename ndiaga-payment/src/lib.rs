pub mod attempt;
pub mod mock;
pub mod orchestrator;
pub mod poller;

pub use attempt::{AttemptError, AttemptState, PaymentAttempt};
pub use mock::MockBookingBackend;
pub use orchestrator::{PaymentError, PaymentOrchestrator, PaymentRequest};
pub use poller::{LightningPoller, PollOutcome};
