//! Terminal table of search results.

use std::cmp::Ordering;

use clap::ValueEnum;
use prettytable::{format, Cell, Row, Table};

use crate::models::Connection;

const STOP_WIDTH: usize = 20;

/// Column the printed table is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    /// Departure date and time
    Departure,
    /// Price, cheapest first
    Price,
}

/// One piece of a natural sort key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Chunk {
    Number(u64),
    Text(String),
}

/// Splits `s` into digit runs and text so that "a2" sorts before "a10"
pub fn natural_key(s: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for c in s.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != in_digits {
            chunks.push(to_chunk(&current, in_digits));
            current.clear();
        }
        in_digits = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(to_chunk(&current, in_digits));
    }
    chunks
}

fn to_chunk(run: &str, digits: bool) -> Chunk {
    match run.parse() {
        Ok(number) if digits => Chunk::Number(number),
        _ => Chunk::Text(run.to_string()),
    }
}

/// Compares two strings in natural order
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Orders connections in place. The sort is stable, so ties keep page order
pub fn sort_connections(connections: &mut [Connection], key: SortKey) {
    match key {
        SortKey::Departure => connections.sort_by(|a, b| {
            natural_cmp(&a.departure_date, &b.departure_date)
                .then_with(|| natural_cmp(&a.departure_time, &b.departure_time))
        }),
        SortKey::Price => connections.sort_by(|a, b| natural_cmp(&a.price, &b.price)),
    }
}

fn truncate(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

/// Builds the results table: Departure, Price, From, Arrival, To, Company
pub fn render(connections: &[Connection]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(
        ["Departure", "Price", "From", "Arrival", "To", "Company"]
            .iter()
            .map(|title| Cell::new(title).style_spec("b"))
            .collect(),
    ));

    for connection in connections {
        table.add_row(Row::new(vec![
            Cell::new(&connection.departure_time),
            Cell::new(&connection.price).style_spec("r"),
            Cell::new(&truncate(&connection.departure_stop, STOP_WIDTH)),
            Cell::new(&connection.arrival_time),
            Cell::new(&truncate(&connection.arrival_stop, STOP_WIDTH)),
            Cell::new(&connection.company),
        ]));
    }
    table
}
