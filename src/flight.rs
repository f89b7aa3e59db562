use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value as JsonValue;

use crate::error::{FlightError, Result};

pub const DEFAULT_MINUTES_PAST: u32 = 30;
pub const DEFAULT_MINUTES_FUTURE: u32 = 180;
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Departure,
    Arrival,
}

impl Direction {
    /// Value of the `flightDirection` facet on the airport API.
    pub fn as_api_str(self) -> &'static str {
        match self {
            Direction::Departure => "DEPARTURE",
            Direction::Arrival => "ARRIVAL",
        }
    }

    /// Column heading for the other end of the route.
    pub fn counterpart_label(self) -> &'static str {
        match self {
            Direction::Departure => "Destination",
            Direction::Arrival => "Origin",
        }
    }
}

impl FromStr for Direction {
    type Err = FlightError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "departure" | "departures" => Ok(Direction::Departure),
            "arrival" | "arrivals" => Ok(Direction::Arrival),
            other => Err(FlightError::invalid(format!(
                "unknown direction `{}` (expected arrival or departure)",
                other
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}S", self.as_api_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteType {
    Domestic,
    International,
}

impl RouteType {
    fn from_api_str(s: &str) -> Option<RouteType> {
        match s {
            "DOMESTIC" => Some(RouteType::Domestic),
            "INTERNATIONAL" => Some(RouteType::International),
            _ => None,
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteType::Domestic => f.write_str("Domestic"),
            RouteType::International => f.write_str("International"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightQuery {
    direction: Direction,
    minutes_past: u32,
    minutes_future: u32,
    limit: usize,
}

impl FlightQuery {
    pub fn new(
        direction: Direction,
        minutes_past: u32,
        minutes_future: u32,
        limit: usize,
    ) -> Result<FlightQuery> {
        if limit == 0 {
            return Err(FlightError::invalid("limit must be at least 1"));
        }

        Ok(FlightQuery {
            direction,
            minutes_past,
            minutes_future,
            limit,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn minutes_past(&self) -> u32 {
        self.minutes_past
    }

    pub fn minutes_future(&self) -> u32 {
        self.minutes_future
    }

    /// Always at least 1.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightRecord {
    pub flight_number: String,
    pub scheduled_time: DateTime<Utc>,
    pub estimated_time: Option<DateTime<Utc>>,
    pub status: String,
    pub origin_or_destination: String,
    pub airport_code: Option<String>,
    pub airline_code: Option<String>,
    pub airline_name: Option<String>,
    pub airline_logo_src: Option<String>,
    pub terminal: Option<String>,
    pub gate: Option<String>,
    pub route_type: Option<RouteType>,
    pub direction: Option<Direction>,
    pub last_updated_time: Option<DateTime<Utc>>,
}

impl FlightRecord {
    /// Maps one `hits` element onto a record. `path` prefixes field names in errors.
    pub fn from_json(value: &JsonValue, path: &str) -> Result<FlightRecord> {
        if !value.is_object() {
            return Err(FlightError::parse(path, "expected an object"));
        }

        let origin_or_destination = first_string(value, "airportNames", path)?
            .ok_or_else(|| FlightError::parse(field_path(path, "airportNames"), "missing field"))?;

        Ok(FlightRecord {
            flight_number: required_string(value, "flightNumber", path)?,
            scheduled_time: required_timestamp(value, "scheduledTimeStamp", path)?,
            estimated_time: optional_timestamp(value, "estimatedTimeStamp", path)?,
            status: required_string(value, "status", path)?,
            origin_or_destination,
            airport_code: first_string(value, "airportCodes", path)?,
            airline_code: optional_string(value, "airlineCode"),
            airline_name: optional_string(value, "airlineName"),
            airline_logo_src: value
                .get("airlineLogo")
                .and_then(|logo| optional_string(logo, "src")),
            terminal: optional_string(value, "terminal"),
            gate: optional_string(value, "gate"),
            route_type: optional_string(value, "routeType")
                .and_then(|s| RouteType::from_api_str(&s)),
            direction: optional_string(value, "flightDirection")
                .and_then(|s| s.parse::<Direction>().ok()),
            last_updated_time: optional_timestamp(value, "lastUpdatedTimeStamp", path)?,
        })
    }
}

fn field_path(path: &str, field_name: &str) -> String {
    if path.is_empty() {
        String::from(field_name)
    } else {
        format!("{}.{}", path, field_name)
    }
}

fn present<'a>(value: &'a JsonValue, field_name: &str) -> Option<&'a JsonValue> {
    value.get(field_name).filter(|field| !field.is_null())
}

fn required_string(value: &JsonValue, field_name: &str, path: &str) -> Result<String> {
    let field = present(value, field_name)
        .ok_or_else(|| FlightError::parse(field_path(path, field_name), "missing field"))?;

    field
        .as_str()
        .map(String::from)
        .ok_or_else(|| FlightError::parse(field_path(path, field_name), "expected a string"))
}

// Gates and terminals sometimes come through as bare numbers.
fn optional_string(value: &JsonValue, field_name: &str) -> Option<String> {
    match present(value, field_name)? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_string(value: &JsonValue, field_name: &str, path: &str) -> Result<Option<String>> {
    let field = match present(value, field_name) {
        Some(field) => field,
        None => return Ok(None),
    };

    let items = field
        .as_array()
        .ok_or_else(|| FlightError::parse(field_path(path, field_name), "expected an array"))?;

    match items.first() {
        None => Ok(None),
        Some(first) => first.as_str().map(|s| Some(String::from(s))).ok_or_else(|| {
            FlightError::parse(format!("{}[0]", field_path(path, field_name)), "expected a string")
        }),
    }
}

fn parse_timestamp(field: &JsonValue, field_name: &str, path: &str) -> Result<DateTime<Utc>> {
    let millis = match field {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| {
        FlightError::parse(field_path(path, field_name), "expected epoch milliseconds")
    })?;

    Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        FlightError::parse(
            field_path(path, field_name),
            format!("timestamp {} out of range", millis),
        )
    })
}

fn required_timestamp(value: &JsonValue, field_name: &str, path: &str) -> Result<DateTime<Utc>> {
    let field = present(value, field_name)
        .ok_or_else(|| FlightError::parse(field_path(path, field_name), "missing field"))?;
    parse_timestamp(field, field_name, path)
}

fn optional_timestamp(
    value: &JsonValue,
    field_name: &str,
    path: &str,
) -> Result<Option<DateTime<Utc>>> {
    match present(value, field_name) {
        Some(field) => parse_timestamp(field, field_name, path).map(Some),
        None => Ok(None),
    }
}
