//! Departures and arrivals board for Melbourne Airport, backed by the
//! unofficial search API the airport's own website uses.
//!
//! The endpoint is undocumented and may change shape without notice.

#[macro_use]
extern crate prettytable;

pub mod error;
pub mod fetcher;
pub mod flight;
pub mod table;

pub use error::{FlightError, Result};
pub use fetcher::{fetch_flights, FlightFetcher, FlightSource, HttpSource};
pub use flight::{Direction, FlightQuery, FlightRecord, RouteType};
