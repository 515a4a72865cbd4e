//! Scripted browser session for tests.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::SessionError;
use crate::scrapers::ready::{LOADING_MESSAGE, RESULT_SELECTOR};
use crate::scrapers::traits::{BrowserSession, SessionLauncher, SessionResult};

pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// What the fake results page shows after the form is submitted
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    results: Vec<String>,
    loading_polls: usize,
    never_ready: bool,
    fail_launch: bool,
}

impl MockPage {
    pub fn with_results(results: Vec<String>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    /// Shows the loading placeholder for the first `polls` result lookups
    pub fn loading_for(mut self, polls: usize) -> Self {
        self.loading_polls = polls;
        self
    }

    pub fn never_ready(mut self) -> Self {
        self.never_ready = true;
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }
}

/// Everything the pipeline did to the fake browser
#[derive(Debug, Clone, Default)]
pub struct MockState {
    pub launches: usize,
    pub launched_urls: Vec<String>,
    pub load_images: Vec<bool>,
    pub values: Vec<(String, String)>,
    pub clicks: Vec<String>,
    pub result_polls: usize,
    pub screenshots: usize,
    pub html_dumps: usize,
    pub closes: usize,
}

#[derive(Debug, Clone)]
pub struct MockLauncher {
    page: Arc<MockPage>,
    state: Arc<Mutex<MockState>>,
}

impl MockLauncher {
    pub fn new(page: MockPage) -> Self {
        Self {
            page: Arc::new(page),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    pub fn state(&self) -> MockState {
        self.state.lock().unwrap().clone()
    }
}

impl SessionLauncher for MockLauncher {
    type Session = MockSession;

    fn launch(&self, url: &str, load_images: bool) -> SessionResult<MockSession> {
        let mut state = self.state.lock().unwrap();
        state.launches += 1;
        state.launched_urls.push(url.to_string());
        state.load_images.push(load_images);
        if self.page.fail_launch {
            return Err(SessionError::new("launch Chrome", "no browser installed"));
        }
        Ok(MockSession {
            page: Arc::clone(&self.page),
            state: Arc::clone(&self.state),
        })
    }
}

pub struct MockSession {
    page: Arc<MockPage>,
    state: Arc<Mutex<MockState>>,
}

impl MockSession {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn submitted(&self) -> bool {
        !self.state().clicks.is_empty()
    }
}

impl BrowserSession for MockSession {
    fn select_outer_html(&self, selector: &str) -> SessionResult<Vec<String>> {
        if selector != RESULT_SELECTOR || !self.submitted() {
            return Err(SessionError::new(
                format!("find '{selector}'"),
                "no element found",
            ));
        }

        let mut state = self.state();
        state.result_polls += 1;
        if self.page.never_ready || state.result_polls <= self.page.loading_polls {
            return Ok(vec![format!(
                r#"<div class="search-result">{LOADING_MESSAGE} ...<p class="spinner"></p></div>"#
            )]);
        }
        Ok(self.page.results.clone())
    }

    fn set_value(&self, selector: &str, value: &str) -> SessionResult<()> {
        self.state()
            .values
            .push((selector.to_string(), value.to_string()));
        Ok(())
    }

    fn click(&self, selector: &str) -> SessionResult<()> {
        self.state().clicks.push(selector.to_string());
        Ok(())
    }

    fn document_html(&self) -> SessionResult<String> {
        self.state().html_dumps += 1;
        Ok(format!(
            "<html><body>{}</body></html>",
            self.page.results.join("\n")
        ))
    }

    fn screenshot_png(&self) -> SessionResult<Vec<u8>> {
        self.state().screenshots += 1;
        Ok(PNG_MAGIC.to_vec())
    }

    fn close(&mut self) -> SessionResult<()> {
        self.state().closes += 1;
        Ok(())
    }
}

/// Result markup shaped like busliniensuche.de
pub mod fixture {
    #[derive(Debug, Clone)]
    pub struct Offer {
        pub departure_date: &'static str,
        pub departure_time: &'static str,
        pub departure_stop: &'static str,
        pub trip_duration: &'static str,
        pub number_of_stops: &'static str,
        pub arrival_date: &'static str,
        pub arrival_time: &'static str,
        pub arrival_stop: &'static str,
        pub price: &'static str,
        pub company: &'static str,
    }

    impl Default for Offer {
        fn default() -> Self {
            Self {
                departure_date: "Sa, 17.10.",
                departure_time: "08:00",
                departure_stop: "Berlin ZOB",
                trip_duration: "3h 30m",
                number_of_stops: "Direkt",
                arrival_date: "Sa, 17.10.",
                arrival_time: "11:30",
                arrival_stop: "Hamburg ZOB",
                price: "19,99 €",
                company: "FlixBus",
            }
        }
    }

    fn render(offer: &Offer, with_price: bool) -> String {
        let price = if with_price {
            format!("<span><strong>{}</strong></span>", offer.price)
        } else {
            "<span>ausverkauft</span>".to_string()
        };
        format!(
            r#"<div class="search-result">
  <div>
    <div class="row">
      <div class="connection">
        <div class="departure">
          <div><span>{}</span><span>|</span><span>{}</span></div>
          <div><span>{}</span></div>
        </div>
        <div class="duration">
          <div>{}</div>
          <div>{}</div>
        </div>
        <div class="arrival">
          <div><span>{}</span><span>|</span><span>{}</span></div>
          <div><span>{}</span></div>
        </div>
      </div>
      <div class="offer">
        <div>
          <div><div><span>Anbieter</span><span>{}</span></div></div>
        </div>
        <div>
          <div><span>ab</span>{}</div>
        </div>
      </div>
    </div>
  </div>
</div>"#,
            offer.departure_date,
            offer.departure_time,
            offer.departure_stop,
            offer.trip_duration,
            offer.number_of_stops,
            offer.arrival_date,
            offer.arrival_time,
            offer.arrival_stop,
            offer.company,
            price,
        )
    }

    pub fn fragment(offer: &Offer) -> String {
        render(offer, true)
    }

    /// The same offer with the `<strong>` price node missing
    pub fn without_price(offer: &Offer) -> String {
        render(offer, false)
    }

    pub fn berlin_hamburg() -> String {
        fragment(&Offer::default())
    }
}
