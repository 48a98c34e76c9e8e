use crate::client::ApiClient;
use chrono::{DateTime, NaiveDate, Utc};
use ndiaga_shared::{Money, ScheduleId, ScheduleSelection};
use serde::Deserialize;

/// A frequently-travelled route for the landing page.
#[derive(Debug, Clone, Deserialize)]
pub struct PopularRoute {
    pub origin: String,
    pub destination: String,
    pub min_price: Money,
}

/// Search filters; unset fields are omitted from the query string.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
}

impl SearchFilters {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(origin) = &self.origin {
            params.push(("origin", origin.clone()));
        }
        if let Some(destination) = &self.destination {
            params.push(("destination", destination.clone()));
        }
        if let Some(date) = &self.date {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(min) = &self.min_price {
            params.push(("min_price", min.francs().to_string()));
        }
        if let Some(max) = &self.max_price {
            params.push(("max_price", max.francs().to_string()));
        }
        params
    }
}

/// One search hit, carrying everything the trip-details page shows.
#[derive(Debug, Clone, Deserialize)]
pub struct TripResult {
    pub schedule_id: ScheduleId,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub price: Money,
    pub agency_name: String,
    pub duration_minutes: u32,
    pub available_seats: u32,
}

impl TripResult {
    /// Snapshot for the booking draft once the traveller picks this trip.
    pub fn into_selection(self) -> ScheduleSelection {
        ScheduleSelection {
            schedule_id: self.schedule_id,
            origin: self.origin,
            destination: self.destination,
            departure_time: self.departure_time,
            price: self.price,
            agency_name: self.agency_name,
            duration_minutes: self.duration_minutes,
        }
    }
}

impl ApiClient {
    /// Landing-page route list. Read-only decoration: any failure degrades
    /// to an empty list rather than blocking the page.
    pub async fn popular_routes(&self, limit: u32) -> Vec<PopularRoute> {
        let path = format!("/routes/popular?limit={}", limit);
        match self.get_json::<Vec<PopularRoute>>(&path, None).await {
            Ok(routes) => routes,
            Err(e) => {
                tracing::warn!("Failed to fetch popular routes: {}", e);
                Vec::new()
            }
        }
    }

    /// Trip search. Degrades to an empty result set on failure, same as
    /// `popular_routes`.
    pub async fn search_trips(&self, filters: &SearchFilters) -> Vec<TripResult> {
        let query = filters
            .to_query()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let path = if query.is_empty() {
            "/search".to_string()
        } else {
            format!("/search?{}", query)
        };
        match self.get_json::<Vec<TripResult>>(&path, None).await {
            Ok(trips) => trips,
            Err(e) => {
                tracing::warn!("Trip search failed: {}", e);
                Vec::new()
            }
        }
    }
}
