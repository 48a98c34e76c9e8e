use crate::ids::ScheduleId;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable snapshot of the trip the traveller picked from search results.
///
/// A new search selection supersedes the old snapshot; it is never mutated
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSelection {
    pub schedule_id: ScheduleId,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub price: Money,
    pub agency_name: String,
    pub duration_minutes: u32,
}

/// Passenger details collected at the passenger-details step.
///
/// Built through `PassengerForm::validate` in ndiaga-booking; pages only
/// read it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerInfo {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    /// National id or passport number, required by agencies at boarding.
    pub id_number: String,
    pub emergency_name: Option<String>,
    pub emergency_phone: Option<String>,
}
