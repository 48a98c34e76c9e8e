use crate::client::ApiClient;
use chrono::{DateTime, Utc};
use ndiaga_core::ClientResult;
use ndiaga_shared::{Money, ReservationId, ScheduleId};
use serde::Deserialize;

/// One entry of the signed-in client's reservation list.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationSummary {
    pub id: ReservationId,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub total_amount: Money,
    pub status: String,
}

/// Full schedule record as the agency published it.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDetails {
    pub id: ScheduleId,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub price: Money,
    pub duration_minutes: u32,
    pub seats: u32,
    pub available_seats: u32,
}

impl ApiClient {
    /// The signed-in client's bookings, newest first.
    pub async fn my_reservations(&self, bearer: &str) -> ClientResult<Vec<ReservationSummary>> {
        self.get_json("/reservations/my-reservations", Some(bearer))
            .await
    }

    pub async fn schedule_details(
        &self,
        schedule_id: &ScheduleId,
        bearer: &str,
    ) -> ClientResult<ScheduleDetails> {
        let path = format!("/schedules/{}", schedule_id);
        self.get_json(&path, Some(bearer)).await
    }
}
