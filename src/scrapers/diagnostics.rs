//! Page snapshots written when a search fails.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::ArtifactPaths;
use crate::scrapers::traits::BrowserSession;

/// Writes a screenshot of the current view. Returns the path on success
///
/// Failures are logged and swallowed so they never mask the error being diagnosed
pub fn capture_snapshot<S: BrowserSession>(session: &S, paths: &ArtifactPaths) -> Option<PathBuf> {
    let png = match session.screenshot_png() {
        Ok(png) => png,
        Err(err) => {
            warn!("Could not capture screenshot: {}", err);
            return None;
        }
    };
    write_artifact(&paths.screenshot, &png)
}

/// Writes the screenshot and a dump of the full document
pub fn capture_page<S: BrowserSession>(session: &S, paths: &ArtifactPaths) -> Vec<PathBuf> {
    let mut written: Vec<PathBuf> = capture_snapshot(session, paths).into_iter().collect();

    match session.document_html() {
        Ok(html) => written.extend(write_artifact(&paths.html_dump, html.as_bytes())),
        Err(err) => warn!("Could not serialize page: {}", err),
    }
    written
}

fn write_artifact(path: &Path, contents: &[u8]) -> Option<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!("Could not create {}: {}", parent.display(), err);
            return None;
        }
    }
    match fs::write(path, contents) {
        Ok(()) => {
            debug!("Saved {} ({} bytes)", path.display(), contents.len());
            Some(path.to_path_buf())
        }
        Err(err) => {
            warn!("Could not write {}: {}", path.display(), err);
            None
        }
    }
}
