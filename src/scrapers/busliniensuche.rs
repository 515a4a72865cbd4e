use std::fmt;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::{Error, ExtractError, Result};
use crate::models::Connection;
use crate::scrapers::browser::HeadlessChromeLauncher;
use crate::scrapers::diagnostics::{capture_page, capture_snapshot};
use crate::scrapers::extract::parse_fragment;
use crate::scrapers::ready::{results_are_ready, wait_until_ready, RESULT_SELECTOR};
use crate::scrapers::traits::{BrowserSession, SessionLauncher};
use crate::scrapers::types::SearchQuery;

pub const FROM_FIELD: &str = "#From";
pub const TO_FIELD: &str = "#To";
pub const DATE_FIELD: &str = "#When";
pub const SEARCH_BUTTON: &str = ".btn-warning";

/// A fragment that failed to parse, handed to the inspector in debug mode
#[derive(Debug)]
pub struct ParseFault<'a> {
    /// Position of the fragment in DOM order
    pub index: usize,
    /// Outer HTML of the fragment
    pub fragment_html: &'a str,
    pub error: &'a ExtractError,
}

/// What to do with a fragment after inspecting it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectAction {
    /// Drop the fragment and keep parsing the rest
    Skip,
    /// Fail the search with [`Error::Parsing`]
    Abort,
}

/// Callback consulted for malformed fragments when `debug` is enabled
pub type Inspector = Box<dyn Fn(&ParseFault<'_>) -> InspectAction + Send + Sync>;

// Closes the session on every way out of `find_connections`.
struct SessionGuard<S: BrowserSession> {
    session: S,
}

impl<S: BrowserSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if let Err(err) = self.session.close() {
            warn!("Could not close browser session: {}", err);
        }
    }
}

/// Searches busliniensuche.de by driving a browser through the search form
pub struct ConnectionFinder<L: SessionLauncher> {
    launcher: L,
    config: PipelineConfig,
    inspector: Option<Inspector>,
}

impl ConnectionFinder<HeadlessChromeLauncher> {
    /// Finder backed by headless Chrome with the default configuration
    pub fn headless() -> Self {
        Self::new(HeadlessChromeLauncher, PipelineConfig::default())
    }
}

impl<L: SessionLauncher> ConnectionFinder<L> {
    pub fn new(launcher: L, config: PipelineConfig) -> Self {
        Self {
            launcher,
            config,
            inspector: None,
        }
    }

    /// Installs the callback used for malformed fragments in debug mode
    pub fn with_inspector<F>(mut self, inspector: F) -> Self
    where
        F: Fn(&ParseFault<'_>) -> InspectAction + Send + Sync + 'static,
    {
        self.inspector = Some(Box::new(inspector));
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Finds bus connections from `origin` to `destination` on `date` (`YYYY-MM-DD`)
    ///
    /// Waits at most `timeout` for the results to load. Connections come back in
    /// page order. A single malformed result fails the whole search
    pub fn find_connections(
        &self,
        origin: &str,
        destination: &str,
        date: &str,
        timeout: Duration,
    ) -> Result<Vec<Connection>> {
        let query = SearchQuery::new(origin, destination, date);
        self.search(&query, Local::now().date_naive(), timeout)
    }

    /// Runs `query`, judging its date against `today`
    pub fn search(
        &self,
        query: &SearchQuery,
        today: NaiveDate,
        timeout: Duration,
    ) -> Result<Vec<Connection>> {
        query.validate(today)?;
        info!(
            "Trying to find buses from {} to {} on {}",
            query.origin, query.destination, query.date
        );

        let guard = SessionGuard {
            session: self
                .launcher
                .launch(&self.config.search_url, self.config.load_images)?,
        };
        let session = &guard.session;

        submit_search(session, query)?;

        let waited = wait_until_ready(
            || results_are_ready(session),
            self.config.poll_interval,
            timeout,
        );
        if let Err(timed_out) = waited {
            debug!(
                "Request timed out after {} polls. Capturing a screenshot.",
                timed_out.polls
            );
            let snapshot = capture_snapshot(session, &self.config.artifacts);
            return Err(Error::Timeout {
                waited: timed_out.waited,
                snapshot,
            });
        }

        let fragments = session.select_outer_html(RESULT_SELECTOR)?;
        debug!("Found {} search results", fragments.len());

        let connections = self.parse_all(session, &fragments)?;
        info!("Parsed {} connections", connections.len());
        Ok(connections)
    }

    fn parse_all<S: BrowserSession>(&self, session: &S, fragments: &[String]) -> Result<Vec<Connection>> {
        let mut connections = Vec::with_capacity(fragments.len());

        for (index, fragment_html) in fragments.iter().enumerate() {
            let error = match parse_fragment(fragment_html) {
                Ok(connection) => {
                    connections.push(connection);
                    continue;
                }
                Err(error) => error,
            };

            warn!("Can't parse result #{}: {}", index, error);
            let artifacts = capture_page(session, &self.config.artifacts);

            let action = match (&self.inspector, self.config.debug) {
                (Some(inspect), true) => inspect(&ParseFault {
                    index,
                    fragment_html,
                    error: &error,
                }),
                _ => InspectAction::Abort,
            };

            match action {
                InspectAction::Skip => debug!("Skipping result #{}", index),
                InspectAction::Abort => {
                    return Err(Error::Parsing {
                        index,
                        artifacts,
                        source: error,
                    })
                }
            }
        }
        Ok(connections)
    }
}

fn submit_search<S: BrowserSession>(session: &S, query: &SearchQuery) -> Result<()> {
    session.set_value(FROM_FIELD, &query.origin)?;
    session.set_value(TO_FIELD, &query.destination)?;
    session.set_value(DATE_FIELD, &query.date)?;
    session.click(SEARCH_BUTTON)?;
    debug!("search form submitted");
    Ok(())
}

impl<L: SessionLauncher + fmt::Debug> fmt::Debug for ConnectionFinder<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionFinder")
            .field("launcher", &self.launcher)
            .field("config", &self.config)
            .field("inspector", &self.inspector.is_some())
            .finish()
    }
}

/// Finds connections with headless Chrome and the default configuration
///
/// `timeout_secs` bounds the wait for the results page
pub fn find_connections(
    origin: &str,
    destination: &str,
    date: &str,
    timeout_secs: u64,
) -> Result<Vec<Connection>> {
    ConnectionFinder::headless().find_connections(
        origin,
        destination,
        date,
        Duration::from_secs(timeout_secs),
    )
}
