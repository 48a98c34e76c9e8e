//! Back-office calls for agency operators: authentication, dashboard
//! figures, and route/schedule publishing.

use crate::client::ApiClient;
use crate::reservations::ScheduleDetails;
use chrono::{DateTime, NaiveDate, Utc};
use ndiaga_core::ClientResult;
use ndiaga_shared::Money;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct AgencyLoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgencyProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// One dashboard tile (active trips, passengers, revenue, tickets sold).
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardStat {
    pub label: String,
    pub value: String,
    pub change: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentBooking {
    pub id: String,
    pub passenger: String,
    pub route: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgencyRoute {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub duration_minutes: u32,
}

#[derive(Serialize)]
struct CreateRouteBody<'a> {
    origin: &'a str,
    destination: &'a str,
    duration: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSchedule {
    pub route_id: String,
    pub departure_time: DateTime<Utc>,
    pub price: Money,
    pub seats: u32,
}

impl ApiClient {
    pub async fn agency_login(&self, email: &str, password: &str) -> ClientResult<String> {
        let token: TokenResponse = self
            .post_json("/agencies/login", &AgencyLoginBody { email, password }, None)
            .await?;
        Ok(token.access_token)
    }

    pub async fn agency_profile(&self, bearer: &str) -> ClientResult<AgencyProfile> {
        self.get_json("/agencies/me", Some(bearer)).await
    }

    pub async fn agency_stats(&self, bearer: &str) -> ClientResult<Vec<DashboardStat>> {
        self.get_json("/agencies/stats", Some(bearer)).await
    }

    pub async fn recent_bookings(&self, bearer: &str) -> ClientResult<Vec<RecentBooking>> {
        self.get_json("/reservations/agency/recent", Some(bearer))
            .await
    }

    pub async fn agency_schedules(&self, bearer: &str) -> ClientResult<Vec<ScheduleDetails>> {
        self.get_json("/schedules/agency_schedules", Some(bearer))
            .await
    }

    /// The agency's route catalogue. Listing failures degrade to an empty
    /// list; the route manager shows its empty state instead of an error.
    pub async fn agency_routes(&self, bearer: &str) -> Vec<AgencyRoute> {
        match self.get_json("/routes/", Some(bearer)).await {
            Ok(routes) => routes,
            Err(e) => {
                tracing::warn!("Failed to fetch agency routes: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn create_route(
        &self,
        bearer: &str,
        origin: &str,
        destination: &str,
        duration_minutes: u32,
    ) -> ClientResult<AgencyRoute> {
        self.post_json(
            "/routes",
            &CreateRouteBody {
                origin,
                destination,
                duration: duration_minutes,
            },
            Some(bearer),
        )
        .await
    }

    pub async fn create_schedule(
        &self,
        bearer: &str,
        schedule: &NewSchedule,
    ) -> ClientResult<ScheduleDetails> {
        self.post_json("/schedules", schedule, Some(bearer)).await
    }
}
