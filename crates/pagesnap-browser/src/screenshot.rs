//! Screenshot capture using Chrome DevTools Protocol

use crate::browser::BrowserSession;
use crate::error::{Result, SnapError};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use std::path::Path;
use tracing::{debug, info};

/// Screenshot capture options
#[derive(Debug, Clone)]
pub struct ScreenshotOptions {
    /// Capture the full scrollable page instead of just the viewport
    pub full_page: bool,
}

impl Default for ScreenshotOptions {
    fn default() -> Self {
        Self { full_page: true }
    }
}

impl ScreenshotOptions {
    /// Create options for full-page screenshot
    pub fn full_page() -> Self {
        Self { full_page: true }
    }

    /// Create options for viewport-only screenshot
    pub fn viewport() -> Self {
        Self { full_page: false }
    }
}

/// Capture a PNG screenshot of the current page state
///
/// # Arguments
/// * `session` - Active browser session
/// * `options` - Screenshot capture options
///
/// # Returns
/// Raw PNG bytes
pub async fn capture_screenshot(
    session: &BrowserSession,
    options: ScreenshotOptions,
) -> Result<Vec<u8>> {
    debug!("Capturing screenshot (full_page: {})", options.full_page);

    let screenshot_data = session
        .tab()
        .capture_screenshot(
            CaptureScreenshotFormatOption::Png,
            None,
            None,
            options.full_page,
        )
        .map_err(|e| SnapError::Browser(format!("CDP capture failed: {}", e)))?;

    Ok(screenshot_data)
}

/// Capture a PNG screenshot and write it to a file
///
/// Overwrites the file silently if it already exists. A missing parent
/// directory is created first.
///
/// # Arguments
/// * `session` - Active browser session
/// * `path` - Output file path
/// * `options` - Screenshot capture options
///
/// # Returns
/// Number of bytes written
///
/// # Example
/// ```no_run
/// use pagesnap_browser::{BrowserSession, ScreenshotOptions};
/// use pagesnap_browser::screenshot::capture_to_file;
/// use std::path::Path;
///
/// #[tokio::main]
/// async fn main() {
///     let session = BrowserSession::launch().await.unwrap();
///     session.navigate("http://localhost:5173").await.unwrap();
///
///     let bytes = capture_to_file(
///         &session,
///         Path::new("screenshot.png"),
///         ScreenshotOptions::full_page(),
///     )
///     .await
///     .unwrap();
///
///     println!("Screenshot saved ({} bytes)", bytes);
/// }
/// ```
pub async fn capture_to_file(
    session: &BrowserSession,
    path: &Path,
    options: ScreenshotOptions,
) -> Result<u64> {
    let screenshot_data = capture_screenshot(session, options).await?;

    ensure_parent_dir(path)?;
    std::fs::write(path, &screenshot_data)?;

    info!(
        "Screenshot stored: {} ({} bytes)",
        path.display(),
        screenshot_data.len()
    );

    Ok(screenshot_data.len() as u64)
}

/// Create the parent directory of `path` when it does not exist yet
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_options_default() {
        let options = ScreenshotOptions::default();
        assert!(options.full_page);
    }

    #[test]
    fn test_screenshot_options_viewport() {
        let options = ScreenshotOptions::viewport();
        assert!(!options.full_page);
    }

    #[test]
    fn test_ensure_parent_dir_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("captures").join("screenshot.png");
        assert!(!nested.parent().unwrap().exists());

        ensure_parent_dir(&nested).unwrap();
        assert!(nested.parent().unwrap().exists());
    }

    #[test]
    fn test_ensure_parent_dir_accepts_bare_filename() {
        ensure_parent_dir(Path::new("screenshot.png")).unwrap();
    }

    #[test]
    fn test_ensure_parent_dir_accepts_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screenshot.png");
        ensure_parent_dir(&path).unwrap();
        assert!(dir.path().exists());
    }
}
