use std::process;

use clap::{App, Arg, ArgMatches};
use tracing_subscriber::EnvFilter;

use flightboard::flight::{DEFAULT_LIMIT, DEFAULT_MINUTES_FUTURE, DEFAULT_MINUTES_PAST};
use flightboard::{table, Direction, FlightError, FlightFetcher, FlightQuery, Result};

fn build_app() -> App<'static, 'static> {
    App::new("flightboard")
        .version("0.1.0")
        .about("Fetches departures or arrivals from Melbourne Airport")
        .arg(Arg::with_name("direction")
            .short("d")
            .long("direction")
            .required(true)
            .takes_value(true)
            .help("arrival or departure"))
        .arg(Arg::with_name("past")
            .short("p")
            .long("past")
            .takes_value(true)
            .allow_hyphen_values(true)
            .help("How many minutes into the past to include"))
        .arg(Arg::with_name("future")
            .short("f")
            .long("future")
            .takes_value(true)
            .allow_hyphen_values(true)
            .help("How many minutes into the future to include"))
        .arg(Arg::with_name("number")
            .short("n")
            .long("number")
            .takes_value(true)
            .allow_hyphen_values(true)
            .help("The number of flights to show"))
}

fn parse_number<T: std::str::FromStr>(matches: &ArgMatches, name: &str, default: T) -> Result<T> {
    match matches.value_of(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            FlightError::invalid(format!("--{} expects a non-negative integer, got `{}`", name, raw))
        }),
    }
}

fn get_query(matches: &ArgMatches) -> Result<FlightQuery> {
    let direction = matches.value_of("direction").unwrap_or_default().parse::<Direction>()?;
    let past = parse_number(matches, "past", DEFAULT_MINUTES_PAST)?;
    let future = parse_number(matches, "future", DEFAULT_MINUTES_FUTURE)?;
    let number = parse_number(matches, "number", DEFAULT_LIMIT)?;

    FlightQuery::new(direction, past, future, number)
}

fn run(matches: &ArgMatches) -> Result<()> {
    let query = get_query(matches)?;
    let flights = FlightFetcher::http()?.fetch(&query)?;

    table::print_table(query.direction(), &flights);
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = build_app().get_matches();
    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_from(args: &[&str]) -> Result<FlightQuery> {
        let matches = build_app().get_matches_from(args.iter().copied());
        get_query(&matches)
    }

    #[test]
    fn defaults_apply() {
        let query = query_from(&["flightboard", "-d", "arrival"]).unwrap();

        assert_eq!(query.direction(), Direction::Arrival);
        assert_eq!(query.minutes_past(), DEFAULT_MINUTES_PAST);
        assert_eq!(query.minutes_future(), DEFAULT_MINUTES_FUTURE);
        assert_eq!(query.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn explicit_values_are_used() {
        let query = query_from(&["flightboard", "--direction", "DEPARTURES", "-p", "5", "-f", "60", "-n", "3"])
            .unwrap();

        assert_eq!(query.direction(), Direction::Departure);
        assert_eq!((query.minutes_past(), query.minutes_future(), query.limit()), (5, 60, 3));
    }

    #[test]
    fn bad_input_is_invalid_argument() {
        for args in &[
            vec!["flightboard", "-d", "north"],
            vec!["flightboard", "-d", "arrival", "-p", "-10"],
            vec!["flightboard", "-d", "arrival", "-f", "soon"],
            vec!["flightboard", "-d", "arrival", "-n", "0"],
        ] {
            assert!(matches!(query_from(args), Err(FlightError::InvalidArgument(_))), "{:?}", args);
        }
    }
}
