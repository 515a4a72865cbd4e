use std::collections::HashMap;

use scraper::{ElementRef, Html};

use crate::error::ExtractError;
use crate::models::Connection;
use crate::scrapers::schema::{own_text, resolve, Field, FieldPath, CONNECTION_FIELDS};

/// Suffix appended to every normalized price
pub const CURRENCY_SUFFIX: &str = "€";

/// Turns displayed price text like `"12,5 €"` into `"12.50 €"`
///
/// Only the first whitespace-separated token is read, and the decimal comma is
/// swapped for a period before parsing
pub fn normalize_price(text: &str) -> Result<String, ExtractError> {
    let token = text.split_whitespace().next().unwrap_or("");
    let decimal = token.replace(',', ".");
    let value: f64 = decimal.parse().map_err(|source| ExtractError::InvalidPrice {
        text: text.to_string(),
        source,
    })?;
    if !value.is_finite() {
        return Err(ExtractError::NonFinitePrice {
            text: text.to_string(),
        });
    }
    Ok(format!("{value:.2} {CURRENCY_SUFFIX}"))
}

/// Extracts a connection from the outer HTML of one `div.search-result`
pub fn parse_fragment(fragment_html: &str) -> Result<Connection, ExtractError> {
    parse_fragment_with(fragment_html, CONNECTION_FIELDS)
}

/// Like [`parse_fragment`] with a custom field layout
pub fn parse_fragment_with(
    fragment_html: &str,
    fields: &[FieldPath],
) -> Result<Connection, ExtractError> {
    let fragment = Html::parse_fragment(fragment_html);
    let root = fragment
        .root_element()
        .children()
        .find_map(ElementRef::wrap)
        .ok_or(ExtractError::NoRoot)?;

    let mut values = HashMap::with_capacity(fields.len());
    for entry in fields {
        let element = resolve(root, entry.path)?.ok_or(ExtractError::MissingNode {
            field: entry.field,
            path: entry.path,
        })?;
        let text = own_text(element);
        if text.is_empty() {
            return Err(ExtractError::EmptyText {
                field: entry.field,
                path: entry.path,
            });
        }
        values.insert(entry.field, text);
    }

    let mut take = |field: Field| {
        values.remove(&field).ok_or(ExtractError::MissingNode {
            field,
            path: "",
        })
    };

    Ok(Connection {
        departure_date: take(Field::DepartureDate)?,
        departure_time: take(Field::DepartureTime)?,
        departure_stop: take(Field::DepartureStop)?,
        trip_duration: take(Field::TripDuration)?,
        number_of_stops: take(Field::NumberOfStops)?,
        arrival_date: take(Field::ArrivalDate)?,
        arrival_time: take(Field::ArrivalTime)?,
        arrival_stop: take(Field::ArrivalStop)?,
        price: normalize_price(&take(Field::Price)?)?,
        company: take(Field::Company)?,
    })
}
