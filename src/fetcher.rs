//! Request, parse and window-filter pipeline.
//!
//! The airport endpoint returns every flight it currently knows for one
//! direction; narrowing to the requested window, ordering and truncation all
//! happen client side in [`select`].

use chrono::{DateTime, Duration, Utc};
use reqwest::blocking::Client;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::{FlightError, Result};
use crate::flight::{Direction, FlightQuery, FlightRecord};

pub const ENDPOINT: &str = "https://www.melbourneairport.com.au/api/data/search";
const INDEX_NAME: &str = "melair_flights";
const HITS_PER_PAGE: u32 = 1000;

/// Where raw response bodies come from.
pub trait FlightSource {
    fn fetch_raw(&self, direction: Direction) -> Result<String>;
}

pub struct HttpSource {
    client: Client,
    endpoint: String,
}

impl HttpSource {
    pub fn new() -> Result<HttpSource> {
        HttpSource::with_endpoint(ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<HttpSource> {
        Ok(HttpSource {
            client: Client::builder().build()?,
            endpoint: endpoint.into(),
        })
    }

    fn query_params(direction: Direction) -> Vec<(&'static str, String)> {
        vec![
            ("queries[0][indexName]", String::from(INDEX_NAME)),
            ("queries[0][params][facets][3]", String::from("status")),
            (
                "queries[0][params][filters]",
                format!("flightDirection:{}", direction.as_api_str()),
            ),
            ("queries[0][params][hitsPerPage]", HITS_PER_PAGE.to_string()),
        ]
    }
}

impl FlightSource for HttpSource {
    fn fetch_raw(&self, direction: Direction) -> Result<String> {
        let request = self
            .client
            .get(self.endpoint.as_str())
            .query(&HttpSource::query_params(direction))
            .build()?;
        debug!(url = %request.url(), "requesting flights");

        let body = self
            .client
            .execute(request)?
            .error_for_status()?
            .text()?;
        debug!(bytes = body.len(), "received response");

        Ok(body)
    }
}

/// Decodes a search response body into records for `direction`.
///
/// Hits tagged with the other direction are dropped; any hit that fails to
/// map fails the whole response.
pub fn parse_response(body: &str, direction: Direction) -> Result<Vec<FlightRecord>> {
    let response: JsonValue =
        serde_json::from_str(body).map_err(|e| FlightError::parse("<body>", e.to_string()))?;

    let results = response
        .get("results")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| FlightError::parse("results", "missing or not an array"))?;
    let hits = results
        .first()
        .ok_or_else(|| FlightError::parse("results[0]", "missing"))?
        .get("hits")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| FlightError::parse("results[0].hits", "missing or not an array"))?;

    let mut records = Vec::with_capacity(hits.len());
    for (index, hit) in hits.iter().enumerate() {
        let record = FlightRecord::from_json(hit, &format!("results[0].hits[{}]", index))?;

        match record.direction {
            Some(tagged) if tagged != direction => {
                warn!(flight = %record.flight_number, "dropping hit tagged {:?}", tagged);
            }
            _ => records.push(record),
        }
    }

    Ok(records)
}

/// Keeps records scheduled inside `[now - past, now + future]`, earliest first,
/// at most `query.limit()` of them.
pub fn select(
    mut records: Vec<FlightRecord>,
    query: &FlightQuery,
    now: DateTime<Utc>,
) -> Vec<FlightRecord> {
    let start = now - Duration::minutes(i64::from(query.minutes_past()));
    let end = now + Duration::minutes(i64::from(query.minutes_future()));

    records.retain(|record| record.scheduled_time >= start && record.scheduled_time <= end);
    records.sort_by_key(|record| record.scheduled_time);
    records.truncate(query.limit());
    records
}

pub struct FlightFetcher<S> {
    source: S,
}

impl FlightFetcher<HttpSource> {
    pub fn http() -> Result<FlightFetcher<HttpSource>> {
        Ok(FlightFetcher::new(HttpSource::new()?))
    }
}

impl<S: FlightSource> FlightFetcher<S> {
    pub fn new(source: S) -> FlightFetcher<S> {
        FlightFetcher { source }
    }

    /// Validates the arguments, then fetches. Nothing is requested on bad input.
    pub fn fetch_flights(
        &self,
        direction: Direction,
        minutes_past: u32,
        minutes_future: u32,
        limit: usize,
    ) -> Result<Vec<FlightRecord>> {
        let query = FlightQuery::new(direction, minutes_past, minutes_future, limit)?;
        self.fetch(&query)
    }

    pub fn fetch(&self, query: &FlightQuery) -> Result<Vec<FlightRecord>> {
        self.fetch_at(query, Utc::now())
    }

    pub fn fetch_at(&self, query: &FlightQuery, now: DateTime<Utc>) -> Result<Vec<FlightRecord>> {
        let body = self.source.fetch_raw(query.direction())?;
        let records = parse_response(&body, query.direction())?;
        let total = records.len();
        let selected = select(records, query, now);
        debug!(total, selected = selected.len(), "filtered flights to window");

        Ok(selected)
    }
}

/// Fetches flights for one direction from the live airport endpoint.
pub fn fetch_flights(
    direction: Direction,
    minutes_past: u32,
    minutes_future: u32,
    limit: usize,
) -> Result<Vec<FlightRecord>> {
    let query = FlightQuery::new(direction, minutes_past, minutes_future, limit)?;
    FlightFetcher::http()?.fetch(&query)
}
