use serde::{Deserialize, Serialize};

/// One bus trip offer as displayed on the search results page
///
/// All fields are display strings taken verbatim from the page, except
/// `price`, which is normalized to two decimals with a currency suffix
/// (e.g. `"12.50 €"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub departure_date: String,
    pub departure_time: String,
    pub departure_stop: String,
    pub trip_duration: String,
    pub number_of_stops: String,
    pub arrival_date: String,
    pub arrival_time: String,
    pub arrival_stop: String,
    pub price: String,
    pub company: String,
}
