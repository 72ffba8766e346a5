#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

pub const MOVIES_HEADER: &str = "id, name, licensing_model";
pub const COMMANDS_HEADER: &str = "command, customer, movie, name, email, at";

/// Movie id of the two-day rental in [`promotion_catalog`].
pub const TWO_DAYS_MOVIE: u64 = 1;
/// Life-long movies in [`promotion_catalog`]; buying all of them costs 104.00.
pub const LIFE_LONG_MOVIES: std::ops::RangeInclusive<u64> = 10..=22;

pub fn csv_file(header: &str, rows: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "{header}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

pub fn promotion_catalog() -> NamedTempFile {
    let mut rows = vec![format!("{TWO_DAYS_MOVIE}, Test Movie, TwoDays")];
    rows.extend(LIFE_LONG_MOVIES.map(|id| format!("{id}, Classic {id}, LifeLong")));
    csv_file(MOVIES_HEADER, &rows)
}

pub fn register(customer: u64, name: &str, email: &str) -> String {
    format!("register, {customer}, , {name}, {email},")
}

pub fn purchase(customer: u64, movie: u64, at: &str) -> String {
    format!("purchase, {customer}, {movie}, , , {at}")
}

pub fn promote(customer: u64, at: &str) -> String {
    format!("promote, {customer}, , , , {at}")
}

/// Purchase rows that make `customer` eligible for promotion at `at`.
pub fn qualifying_purchases(customer: u64, at: &str) -> Vec<String> {
    LIFE_LONG_MOVIES.map(|movie| purchase(customer, movie, at)).collect()
}
