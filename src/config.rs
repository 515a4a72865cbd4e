use std::path::PathBuf;
use std::time::Duration;

/// Search page that hosts the form and renders the results
pub const SEARCH_PAGE: &str = "https://www.busliniensuche.de/";

/// Interval between two readiness checks
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Where diagnostic artifacts are written when a search fails
///
/// Both files are overwritten on every failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Rendered view of the page
    pub screenshot: PathBuf,
    /// Serialized DOM of the whole document
    pub html_dump: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            screenshot: PathBuf::from("error.png"),
            html_dump: PathBuf::from("error.htm"),
        }
    }
}

impl ArtifactPaths {
    /// Places both artifacts inside `dir`, keeping the default file names
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            screenshot: dir.join("error.png"),
            html_dump: dir.join("error.htm"),
        }
    }
}

/// Settings for the connection search pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Page the browser session is opened on
    pub search_url: String,
    /// Fixed interval between readiness checks
    pub poll_interval: Duration,
    /// Load images when rendering (useful for screenshots)
    pub load_images: bool,
    /// Hand malformed fragments to the inspector instead of failing
    pub debug: bool,
    pub artifacts: ArtifactPaths,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_url: SEARCH_PAGE.to_string(),
            poll_interval: POLL_INTERVAL,
            load_images: false,
            debug: false,
            artifacts: ArtifactPaths::default(),
        }
    }
}
