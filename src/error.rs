//! Error types for the connection search.
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`Error::InvalidInput`] | the query is rejected before any browser work |
//! | [`Error::Timeout`] | results never became ready within the deadline |
//! | [`Error::Parsing`] | a result fragment did not match the expected markup |
//! | [`Error::Session`] | the browser could not be launched or driven |

use std::num::ParseFloatError;
use std::path::PathBuf;
use std::result::Result as StdResult;
use std::time::Duration;

use thiserror::Error;

use crate::scrapers::schema::Field;

/// Result type alias using crate [`enum@Error`]
pub type Result<T> = StdResult<T, Error>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    /// The caller's query was rejected. No session was opened
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Why the query was rejected
        message: String,
    },

    /// Results did not finish loading before the deadline
    #[error("Request timed out after {waited:?}{}", describe_snapshot(.snapshot))]
    Timeout {
        /// How long the detector waited
        waited: Duration,
        /// Screenshot of the page at the moment of the timeout, if it could be written
        snapshot: Option<PathBuf>,
    },

    /// A result fragment could not be turned into a connection
    #[error("Can't parse result #{index}{}", describe_artifacts(.artifacts))]
    Parsing {
        /// Position of the offending fragment in DOM order
        index: usize,
        /// Files written for post-hoc debugging
        artifacts: Vec<PathBuf>,
        /// What was wrong with the fragment
        #[source]
        source: ExtractError,
    },

    /// The browser session failed
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl Error {
    /// Creates an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

fn describe_snapshot(snapshot: &Option<PathBuf>) -> String {
    match snapshot {
        Some(path) => format!(". See {} for a screenshot", path.display()),
        None => String::new(),
    }
}

fn describe_artifacts(artifacts: &[PathBuf]) -> String {
    if artifacts.is_empty() {
        return String::new();
    }
    let paths: Vec<String> = artifacts.iter().map(|p| p.display().to_string()).collect();
    format!(". See {} for details", paths.join(", "))
}

/// Failure of a single browser interaction
#[derive(Error, Debug)]
#[error("Browser failed to {action}: {message}")]
pub struct SessionError {
    /// What the session was asked to do
    pub action: String,
    /// Underlying error text
    pub message: String,
}

impl SessionError {
    pub fn new(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            message: message.into(),
        }
    }
}

/// Why a single result fragment could not be extracted
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The fragment HTML contained no element
    #[error("fragment has no root element")]
    NoRoot,

    /// A structural path matched no element
    #[error("no element for {field} at '{path}'")]
    MissingNode { field: Field, path: &'static str },

    /// The element exists but carries no text
    #[error("element for {field} at '{path}' has no text")]
    EmptyText { field: Field, path: &'static str },

    /// The price text is not a number
    #[error("price '{text}' is not a number")]
    InvalidPrice {
        text: String,
        #[source]
        source: ParseFloatError,
    },

    /// The price text parsed to NaN or infinity
    #[error("price '{text}' is not a finite number")]
    NonFinitePrice { text: String },

    /// A path step could not be understood
    #[error("malformed path step '{step}'")]
    InvalidPath { step: String },
}
