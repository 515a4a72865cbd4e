use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const ISO_DATE: &str = "%Y-%m-%d";

/// Parameters of a single connection search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Departure stop as typed into the form
    pub origin: String,
    /// Arrival stop as typed into the form
    pub destination: String,
    /// Travel date, `YYYY-MM-DD`
    pub date: String,
}

impl SearchQuery {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            date: date.into(),
        }
    }

    /// Rejects queries the site can't answer, relative to `today`
    ///
    /// Dates are ISO-8601, so comparing the strings orders them by day
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.origin.trim().is_empty() {
            return Err(Error::invalid_input("origin is empty"));
        }
        if self.destination.trim().is_empty() {
            return Err(Error::invalid_input("destination is empty"));
        }
        if NaiveDate::parse_from_str(&self.date, ISO_DATE).is_err() {
            return Err(Error::invalid_input(format!(
                "'{}' is not a YYYY-MM-DD date",
                self.date
            )));
        }

        let today = today.format(ISO_DATE).to_string();
        if self.date.as_str() < today.as_str() {
            return Err(Error::invalid_input(format!(
                "can't search for bus connections in the past ({} < {})",
                self.date, today
            )));
        }
        Ok(())
    }
}
