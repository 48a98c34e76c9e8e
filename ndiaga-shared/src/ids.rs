use serde::{Deserialize, Serialize};

/// Server-issued identifiers are opaque strings; the client never derives
/// meaning from their contents.
macro_rules! opaque_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(
    /// Identifies a published trip schedule.
    ScheduleId
);
opaque_id!(
    /// Identifies a pending or confirmed reservation.
    ReservationId
);
opaque_id!(
    /// Identifies an issued ticket.
    TicketId
);
opaque_id!(
    /// Provider-side transaction id reported by the checkout widget.
    TransactionId
);
opaque_id!(
    /// Lightning invoice id used for payment verification polling.
    InvoiceId
);
