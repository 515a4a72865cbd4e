//! Where each connection field lives inside a result fragment.
//!
//! Every field is addressed by a structural path relative to the
//! `div.search-result` element, written as `/`-separated steps:
//!
//! - `div[2]` selects the second `div` child of each context element,
//! - `div` selects every `div` child,
//!
//! and the first element reached (in document order) holds the field's text.
//! When the site's markup drifts, [`CONNECTION_FIELDS`] is the only place to edit.

use std::fmt;

use scraper::ElementRef;

use crate::error::ExtractError;

/// A field of [`Connection`](crate::models::Connection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DepartureDate,
    DepartureTime,
    DepartureStop,
    TripDuration,
    NumberOfStops,
    ArrivalDate,
    ArrivalTime,
    ArrivalStop,
    Price,
    Company,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DepartureDate => "departure_date",
            Self::DepartureTime => "departure_time",
            Self::DepartureStop => "departure_stop",
            Self::TripDuration => "trip_duration",
            Self::NumberOfStops => "number_of_stops",
            Self::ArrivalDate => "arrival_date",
            Self::ArrivalTime => "arrival_time",
            Self::ArrivalStop => "arrival_stop",
            Self::Price => "price",
            Self::Company => "company",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field together with its path from the fragment root
#[derive(Debug, Clone, Copy)]
pub struct FieldPath {
    pub field: Field,
    pub path: &'static str,
}

const fn at(field: Field, path: &'static str) -> FieldPath {
    FieldPath { field, path }
}

/// Layout of a busliniensuche.de search result
pub const CONNECTION_FIELDS: &[FieldPath] = &[
    at(Field::DepartureDate, "div[1]/div/div[1]/div[1]/div[1]/span[1]"),
    at(Field::DepartureTime, "div[1]/div/div[1]/div[1]/div[1]/span[3]"),
    at(Field::DepartureStop, "div[1]/div/div[1]/div[1]/div[2]/span"),
    at(Field::TripDuration, "div[1]/div/div[1]/div[2]/div[1]"),
    at(Field::NumberOfStops, "div[1]/div/div[1]/div[2]/div[2]"),
    at(Field::ArrivalDate, "div[1]/div/div[1]/div[3]/div[1]/span[1]"),
    at(Field::ArrivalTime, "div[1]/div/div[1]/div[3]/div[1]/span[3]"),
    at(Field::ArrivalStop, "div[1]/div/div[1]/div[3]/div[2]/span"),
    at(Field::Price, "div[1]/div/div[2]/div[2]/div[1]/span[2]/strong"),
    at(Field::Company, "div[1]/div/div[2]/div[1]/div[1]/div[1]/span[2]"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step<'a> {
    tag: &'a str,
    // 1-based position among same-tag siblings
    position: Option<usize>,
}

fn parse_step(step: &str) -> Result<Step<'_>, ExtractError> {
    let invalid = || ExtractError::InvalidPath {
        step: step.to_string(),
    };

    let (tag, position) = match step.split_once('[') {
        None => (step, None),
        Some((tag, rest)) => {
            let index = rest.strip_suffix(']').ok_or_else(invalid)?;
            let position: usize = index.parse().map_err(|_| invalid())?;
            if position == 0 {
                return Err(invalid());
            }
            (tag, Some(position))
        }
    };

    if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    Ok(Step { tag, position })
}

fn children_matching<'a>(element: ElementRef<'a>, step: &Step<'_>) -> Vec<ElementRef<'a>> {
    let same_tag = element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name().eq_ignore_ascii_case(step.tag));

    match step.position {
        Some(position) => same_tag.skip(position - 1).take(1).collect(),
        None => same_tag.collect(),
    }
}

/// Follows `path` from `root` and returns the first element it reaches
pub fn resolve<'a>(root: ElementRef<'a>, path: &str) -> Result<Option<ElementRef<'a>>, ExtractError> {
    let mut current = vec![root];
    for raw in path.split('/') {
        let step = parse_step(raw)?;
        // Context elements are siblings, so concatenating their children keeps document order.
        current = current
            .into_iter()
            .flat_map(|element| children_matching(element, &step))
            .collect();
        if current.is_empty() {
            return Ok(None);
        }
    }
    Ok(current.into_iter().next())
}

/// Text inside `element` before its first child node that isn't text, trimmed
pub fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .map_while(|node| node.value().as_text().map(|text| &**text))
        .collect::<String>()
        .trim()
        .to_string()
}
