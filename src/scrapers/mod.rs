pub mod browser;
pub mod busliniensuche;
pub mod diagnostics;
pub mod extract;
pub mod ready;
pub mod schema;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use browser::{HeadlessChromeLauncher, HeadlessChromeSession};
pub use busliniensuche::{find_connections, ConnectionFinder, InspectAction, Inspector, ParseFault};
pub use traits::{BrowserSession, SessionLauncher};
pub use types::SearchQuery;
