//! Bus connection search for busliniensuche.de.
//!
//! The results page is rendered by JavaScript, so searches drive a headless
//! browser through the search form, wait for the results to load and parse
//! each result into a [`Connection`].
//!
//! ```no_run
//! let connections = fernbus::find_connections("Berlin", "Hamburg", "2026-10-17", 60)?;
//! for connection in &connections {
//!     println!("{} {} {}", connection.departure_time, connection.price, connection.company);
//! }
//! # Ok::<(), fernbus::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;
pub mod table;

pub use config::{ArtifactPaths, PipelineConfig};
pub use error::{Error, ExtractError, Result, SessionError};
pub use models::Connection;
pub use scrapers::{find_connections, ConnectionFinder, InspectAction, ParseFault};
