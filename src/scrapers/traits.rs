use crate::error::SessionError;

/// Result of a single browser interaction
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// A scriptable browser tab the search pipeline drives
///
/// Implementations must run JavaScript, since the results page is rendered
/// client-side. Any headless browser offering these operations will do
pub trait BrowserSession {
    /// Outer HTML of every element matching a CSS selector, in document order
    fn select_outer_html(&self, selector: &str) -> SessionResult<Vec<String>>;

    /// Sets the value of the form field matching `selector`
    fn set_value(&self, selector: &str, value: &str) -> SessionResult<()>;

    /// Clicks the element matching `selector`
    fn click(&self, selector: &str) -> SessionResult<()>;

    /// Serializes the current document
    fn document_html(&self) -> SessionResult<String>;

    /// Renders the current view as PNG
    fn screenshot_png(&self) -> SessionResult<Vec<u8>>;

    /// Releases the underlying browser
    fn close(&mut self) -> SessionResult<()>;
}

/// Opens browser sessions on a given page
pub trait SessionLauncher {
    type Session: BrowserSession;

    /// Launches a browser and navigates it to `url`
    fn launch(&self, url: &str, load_images: bool) -> SessionResult<Self::Session>;
}
