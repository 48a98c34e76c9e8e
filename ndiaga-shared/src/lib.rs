pub mod ids;
pub mod money;
pub mod trip;

pub use ids::{InvoiceId, ReservationId, ScheduleId, TicketId, TransactionId};
pub use money::Money;
pub use trip::{PassengerInfo, ScheduleSelection};
