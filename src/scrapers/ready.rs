//! Waiting for asynchronously rendered results.
//!
//! The results page fills in `div.search-result` containers via script and
//! shows a loading placeholder until the search finishes. The detector polls
//! a readiness predicate at a fixed interval until it holds or a deadline
//! passes. There is no backoff: the interval is constant for the whole wait,
//! which suits bounded page-load latencies but does not adapt to load spikes.

use std::thread;
use std::time::{Duration, Instant};

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::scrapers::schema::own_text;
use crate::scrapers::traits::BrowserSession;

/// CSS selector of one search result
pub const RESULT_SELECTOR: &str = "div.search-result";

/// Text shown inside the first result container while results are loading
pub const LOADING_MESSAGE: &str = "Lade Busverbindungen";

/// The predicate never held before the deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTimeout {
    /// Time spent waiting
    pub waited: Duration,
    /// Number of times the predicate was evaluated
    pub polls: u32,
}

/// Polls `is_ready` every `poll_interval` until it returns true or `timeout` elapses
pub fn wait_until_ready<F>(
    mut is_ready: F,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<(), WaitTimeout>
where
    F: FnMut() -> bool,
{
    let start = Instant::now();
    // Timeouts too large to represent as an instant never expire.
    let deadline = start.checked_add(timeout);
    let mut polls = 0;

    loop {
        polls += 1;
        if is_ready() {
            debug!("results ready after {:?} ({} polls)", start.elapsed(), polls);
            return Ok(());
        }

        let now = Instant::now();
        let pause = match deadline {
            Some(deadline) if now >= deadline => {
                return Err(WaitTimeout {
                    waited: now - start,
                    polls,
                });
            }
            Some(deadline) => poll_interval.min(deadline - now),
            None => poll_interval,
        };
        thread::sleep(pause);
    }
}

/// True once the first result container exists and no longer shows the loading placeholder
///
/// A container that can't be located yet means "not ready", never an error
pub fn results_are_ready<S: BrowserSession>(session: &S) -> bool {
    let fragments = match session.select_outer_html(RESULT_SELECTOR) {
        Ok(fragments) => fragments,
        Err(err) => {
            debug!("Can't get results text yet: {}", err);
            return false;
        }
    };

    match fragments.first() {
        Some(first) => !is_loading(first),
        None => {
            debug!("No result container yet");
            false
        }
    }
}

// Only the container's leading text carries the placeholder.
fn is_loading(fragment_html: &str) -> bool {
    let fragment = Html::parse_fragment(fragment_html);
    fragment
        .root_element()
        .children()
        .find_map(ElementRef::wrap)
        .map(|container| own_text(container).contains(LOADING_MESSAGE))
        .unwrap_or(false)
}
