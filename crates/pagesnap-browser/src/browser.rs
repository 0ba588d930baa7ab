//! Browser lifecycle management using Chrome DevTools Protocol

use crate::error::{Result, SnapError};
use crate::network::{attach_network_watcher, InflightTracker};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How often the idle wait loop re-checks the tracker
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation and network-idle timeout in seconds
    pub timeout_seconds: u64,
    /// Continuous quiet interval required before the network counts as idle
    pub idle_quiet_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 720,
            timeout_seconds: 30,
            idle_quiet_ms: 500,
        }
    }
}

/// Active browser session with Chrome DevTools Protocol
///
/// Owns exactly one browser process and one tab. Dropping the session kills
/// the browser process, so teardown happens on every exit path, including
/// early returns from failed steps.
pub struct BrowserSession {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Single active tab
    tab: Arc<Tab>,
    /// In-flight request bookkeeping fed by CDP network events
    tracker: Arc<InflightTracker>,
    /// Configuration
    config: BrowserConfig,
}

impl BrowserSession {
    /// Launch a new headless browser with default configuration
    ///
    /// # Example
    /// ```no_run
    /// use pagesnap_browser::BrowserSession;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let session = BrowserSession::launch().await.unwrap();
    ///     session.navigate("http://localhost:5173").await.unwrap();
    /// }
    /// ```
    pub async fn launch() -> Result<Self> {
        Self::launch_with_config(BrowserConfig::default()).await
    }

    /// Launch browser with custom configuration
    pub async fn launch_with_config(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            config.headless, config.window_width, config.window_height
        );

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .build()
            .map_err(|e| SnapError::Launch(format!("Invalid launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| SnapError::Launch(format!("Browser failed to start: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| SnapError::Launch(format!("Failed to open tab: {}", e)))?;

        let tracker = attach_network_watcher(&tab)?;

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            tab,
            tracker,
            config,
        })
    }

    /// Navigate the tab to a URL and wait for the load to complete
    ///
    /// Connection-level failures and navigation timeouts surface as
    /// [`SnapError::Navigation`], as does a document response with an HTTP
    /// status of 400 or above.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| SnapError::Navigation(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| SnapError::Navigation(format!("Navigation timeout for {}: {}", url, e)))?;

        if let Some(status) = self.document_status().await? {
            if status >= 400 {
                return Err(SnapError::Navigation(format!(
                    "{} returned HTTP status {}",
                    url, status
                )));
            }
        }

        info!("Successfully navigated to {}", url);
        Ok(())
    }

    /// Block until no network requests have been in flight for the configured
    /// quiet window
    ///
    /// Returns [`SnapError::IdleTimeout`] if the page never settles within the
    /// session's timeout.
    pub async fn wait_for_network_idle(&self) -> Result<()> {
        let quiet = Duration::from_millis(self.config.idle_quiet_ms);
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let deadline = Instant::now() + timeout;

        debug!(
            "Waiting for network idle (quiet window: {:?}, timeout: {:?})",
            quiet, timeout
        );

        loop {
            if self.tracker.is_idle_for(quiet) {
                debug!("Network is idle");
                return Ok(());
            }
            if Instant::now() >= deadline {
                debug!(
                    "Network idle timeout with {} requests in flight",
                    self.tracker.inflight_count()
                );
                return Err(SnapError::IdleTimeout {
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(IDLE_POLL_INTERVAL).await;
        }
    }

    /// Execute JavaScript in the page context
    ///
    /// # Returns
    /// JSON result from JavaScript execution
    pub async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value> {
        debug!("Evaluating JavaScript: {}", script);

        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| SnapError::Browser(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// HTTP status of the document response, when the engine exposes it
    ///
    /// `responseStatus` on the navigation timing entry is absent on older
    /// Chromium builds; `None` means the status could not be determined.
    async fn document_status(&self) -> Result<Option<u16>> {
        let script = "(() => { \
            const entry = performance.getEntriesByType('navigation')[0]; \
            return entry && entry.responseStatus ? entry.responseStatus : null; \
        })()";

        let value = self.evaluate_script(script).await?;
        Ok(value.as_u64().map(|status| status as u16))
    }

    /// Get reference to the active tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Close the browser session
    pub async fn close(self) -> Result<()> {
        info!("Closing browser session");
        // Browser will be dropped and cleaned up automatically
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!("BrowserSession dropped, browser will be cleaned up");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.window_height, 720);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.idle_quiet_ms, 500);
    }

    #[test]
    fn test_custom_config() {
        let config = BrowserConfig {
            headless: false,
            window_width: 1920,
            window_height: 1080,
            timeout_seconds: 60,
            idle_quiet_ms: 250,
        };

        assert!(!config.headless);
        assert_eq!(config.window_width, 1920);
        assert_eq!(config.timeout_seconds, 60);
        assert_eq!(config.idle_quiet_ms, 250);
    }
}
