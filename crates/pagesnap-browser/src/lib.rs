//! Browser automation for the pagesnap screenshot smoke test
//!
//! This crate drives a headless Chrome/Chromium browser over the Chrome
//! DevTools Protocol (CDP) to render a page and capture it as a PNG.
//!
//! # Features
//!
//! - **Browser Management**: Launch and tear down one headless browser with
//!   one tab, with teardown guaranteed on failure paths
//! - **Network-Idle Detection**: CDP network-event tracking with a
//!   configurable quiet window and a distinguishable timeout error
//! - **Screenshot Capture**: Full-page or viewport PNG capture to memory or
//!   straight to a file
//!
//! # Example
//!
//! ```no_run
//! use pagesnap_browser::{BrowserSession, ScreenshotOptions};
//! use pagesnap_browser::screenshot::capture_to_file;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Launch browser
//!     let session = BrowserSession::launch().await?;
//!
//!     // Navigate and wait for the page to settle
//!     session.navigate("http://localhost:5173").await?;
//!     session.wait_for_network_idle().await?;
//!
//!     // Capture screenshot
//!     let bytes = capture_to_file(
//!         &session,
//!         Path::new("screenshot.png"),
//!         ScreenshotOptions::full_page(),
//!     )
//!     .await?;
//!     println!("captured {} bytes", bytes);
//!
//!     // Clean up
//!     session.close().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Requirements
//!
//! - Chrome or Chromium browser installed
//! - For headless operation, no additional setup required
//!
//! # Architecture
//!
//! The crate is organized into modules:
//!
//! - [`browser`]: Browser lifecycle and session management
//! - [`network`]: In-flight request tracking behind network-idle waits
//! - [`screenshot`]: Screenshot capture to memory or file
//! - [`error`]: Error types for browser operations

pub mod browser;
pub mod error;
pub mod network;
pub mod screenshot;

// Re-export commonly used types
pub use browser::{BrowserConfig, BrowserSession};
pub use error::{Result, SnapError};
pub use network::InflightTracker;
pub use screenshot::{capture_screenshot, capture_to_file, ScreenshotOptions};
