use std::ffi::OsStr;
use std::sync::Arc;

use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::json;
use tracing::{debug, info};

use crate::error::SessionError;
use crate::scrapers::traits::{BrowserSession, SessionLauncher, SessionResult};

const NO_IMAGES_FLAG: &str = "--blink-settings=imagesEnabled=false";

// Form frameworks only pick up values that arrive with input/change events.
const SET_VALUE_JS: &str = r#"
function (value) {
    this.value = value;
    this.dispatchEvent(new Event('input', { bubbles: true }));
    this.dispatchEvent(new Event('change', { bubbles: true }));
}
"#;

fn browser_err(action: impl Into<String>) -> impl FnOnce(anyhow::Error) -> SessionError {
    let action = action.into();
    move |err| SessionError::new(action, format!("{err:#}"))
}

/// Launches headless Chrome for each search
#[derive(Debug, Clone, Default)]
pub struct HeadlessChromeLauncher;

impl SessionLauncher for HeadlessChromeLauncher {
    type Session = HeadlessChromeSession;

    fn launch(&self, url: &str, load_images: bool) -> SessionResult<HeadlessChromeSession> {
        info!("Launching headless Chrome...");

        let mut args = Vec::new();
        if !load_images {
            args.push(OsStr::new(NO_IMAGES_FLAG));
        }

        let options = LaunchOptions::default_builder()
            .headless(true)
            .args(args)
            .build()
            .map_err(|err| SessionError::new("build launch options", err.to_string()))?;

        let browser = Browser::new(options).map_err(browser_err("launch Chrome"))?;
        let tab = browser.new_tab().map_err(browser_err("open a tab"))?;

        tab.navigate_to(url)
            .map_err(browser_err(format!("navigate to {url}")))?;
        tab.wait_until_navigated()
            .map_err(browser_err(format!("load {url}")))?;

        debug!("browser session created on {}", url);
        Ok(HeadlessChromeSession {
            _browser: browser,
            tab,
            closed: false,
        })
    }
}

/// A single Chrome tab. The browser process ends when this is dropped
pub struct HeadlessChromeSession {
    _browser: Browser,
    tab: Arc<Tab>,
    closed: bool,
}

impl BrowserSession for HeadlessChromeSession {
    fn select_outer_html(&self, selector: &str) -> SessionResult<Vec<String>> {
        let elements = self
            .tab
            .find_elements(selector)
            .map_err(browser_err(format!("find '{selector}'")))?;

        elements
            .iter()
            .map(|element| {
                element
                    .get_content()
                    .map_err(browser_err(format!("read '{selector}'")))
            })
            .collect()
    }

    fn set_value(&self, selector: &str, value: &str) -> SessionResult<()> {
        let element = self
            .tab
            .find_element(selector)
            .map_err(browser_err(format!("find '{selector}'")))?;
        element
            .call_js_fn(SET_VALUE_JS, vec![json!(value)], false)
            .map_err(browser_err(format!("fill '{selector}'")))?;
        Ok(())
    }

    fn click(&self, selector: &str) -> SessionResult<()> {
        let element = self
            .tab
            .find_element(selector)
            .map_err(browser_err(format!("find '{selector}'")))?;
        element
            .click()
            .map_err(browser_err(format!("click '{selector}'")))?;
        Ok(())
    }

    fn document_html(&self) -> SessionResult<String> {
        let result = self
            .tab
            .evaluate("document.documentElement.outerHTML", false)
            .map_err(browser_err("serialize the document"))?;

        match result.value.as_ref().and_then(|value| value.as_str()) {
            Some(html) => Ok(html.to_string()),
            None => Err(SessionError::new(
                "serialize the document",
                "outerHTML did not evaluate to a string",
            )),
        }
    }

    fn screenshot_png(&self) -> SessionResult<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(browser_err("capture a screenshot"))
    }

    fn close(&mut self) -> SessionResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.tab
            .close(true)
            .map_err(browser_err("close the tab"))?;
        debug!("browser session closed");
        Ok(())
    }
}
