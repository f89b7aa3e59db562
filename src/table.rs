use chrono::{DateTime, Local, Utc};
use prettytable::Table;

use crate::flight::{Direction, FlightRecord};

fn format_time(time: Option<&DateTime<Utc>>) -> String {
    time.map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_default()
}

pub fn build_table(direction: Direction, flights: &[FlightRecord]) -> Table {
    let mut table = Table::new();
    table.add_row(row![
        b->"Airline",
        b->"Flight",
        b->direction.counterpart_label(),
        b->"Scheduled",
        b->"Estimated",
        b->"Terminal",
        b->"Gate",
        b->"Status",
        b->"Route"
    ]);

    for flight in flights {
        let airline = flight
            .airline_name
            .as_deref()
            .or_else(|| flight.airline_code.as_deref())
            .unwrap_or("");
        let scheduled = format_time(Some(&flight.scheduled_time));
        let estimated = format_time(flight.estimated_time.as_ref());
        let terminal = flight.terminal.as_deref().unwrap_or("");
        let gate = flight.gate.as_deref().unwrap_or("");
        let route = flight
            .route_type
            .map(|route| route.to_string())
            .unwrap_or_default();

        table.add_row(row![
            airline,
            flight.flight_number,
            flight.origin_or_destination,
            scheduled,
            estimated,
            terminal,
            gate,
            flight.status,
            route
        ]);
    }

    table
}

/// Title plus table, or a placeholder line when nothing matched.
pub fn render(direction: Direction, flights: &[FlightRecord]) -> String {
    let title = format!("=== {} ===", direction);
    if flights.is_empty() {
        return format!("{}\nNo flights in the requested window.\n", title);
    }

    format!("{}\n{}", title, build_table(direction, flights))
}

pub fn print_table(direction: Direction, flights: &[FlightRecord]) {
    println!("=== {} ===", direction);
    if flights.is_empty() {
        println!("No flights in the requested window.");
        return;
    }

    build_table(direction, flights).printstd();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::RouteType;
    use chrono::TimeZone;

    fn record(number: &str, airline_name: Option<&str>) -> FlightRecord {
        FlightRecord {
            flight_number: String::from(number),
            scheduled_time: Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap(),
            estimated_time: None,
            status: String::from("Boarding"),
            origin_or_destination: String::from("Auckland"),
            airport_code: Some(String::from("AKL")),
            airline_code: Some(String::from("NZ")),
            airline_name: airline_name.map(String::from),
            airline_logo_src: None,
            terminal: Some(String::from("T2")),
            gate: None,
            route_type: Some(RouteType::International),
            direction: Some(Direction::Departure),
            last_updated_time: None,
        }
    }

    #[test]
    fn one_row_per_flight_plus_header() {
        let flights = vec![record("NZ124", Some("Air New Zealand")), record("NZ126", None)];
        let table = build_table(Direction::Departure, &flights);

        assert_eq!(table.len(), 3);
        let text = table.to_string();
        assert!(text.contains("Destination"));
        assert!(text.contains("Air New Zealand"));
        assert!(text.contains("NZ126"));
        assert!(text.contains("International"));
    }

    #[test]
    fn arrivals_label_origin() {
        let text = render(Direction::Arrival, &[record("NZ123", None)]);

        assert!(text.starts_with("=== ARRIVALS ==="));
        assert!(text.contains("Origin"));
        assert!(!text.contains("Destination"));
    }

    #[test]
    fn prints_a_populated_table() {
        let flights = vec![record("NZ124", Some("Air New Zealand")), record("NZ126", None)];

        print_table(Direction::Departure, &flights);
        let text = render(Direction::Departure, &flights);
        assert!(text.contains("NZ124") && text.contains("Auckland"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let text = render(Direction::Departure, &[]);
        assert_eq!(text, "=== DEPARTURES ===\nNo flights in the requested window.\n");
    }
}
