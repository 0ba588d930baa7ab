//! pagesnap CLI - headless browser screenshot smoke test
//!
//! Usage:
//!   pagesnap                    Capture http://localhost:5173 to screenshot.png
//!   pagesnap --url <URL>        Capture a different target
//!   pagesnap --output <FILE>    Write the PNG somewhere else
//!
//! Prints exactly `Screenshot taken` to stdout on success and exits non-zero
//! on any failure; diagnostics go to stderr.

use anyhow::Result;
use clap::Parser;
use pagesnap_browser::screenshot::capture_to_file;
use pagesnap_browser::{BrowserConfig, BrowserSession, ScreenshotOptions};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "pagesnap")]
#[command(author, version, about = "Headless browser screenshot smoke test")]
struct Cli {
    /// URL to capture
    #[arg(long, default_value = "http://localhost:5173")]
    url: String,

    /// Output file path
    #[arg(short, long, default_value = "screenshot.png")]
    output: PathBuf,

    /// Navigation and network-idle timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Quiet interval in milliseconds before the network counts as idle
    #[arg(long, default_value = "500")]
    quiet_window: u64,

    /// Capture only the visible viewport instead of the full page
    #[arg(long)]
    viewport_only: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for the success line
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let config = BrowserConfig {
        timeout_seconds: cli.timeout,
        idle_quiet_ms: cli.quiet_window,
        ..BrowserConfig::default()
    };

    let session = BrowserSession::launch_with_config(config).await?;

    // The browser must come down whether or not the capture succeeded
    match capture(&session, &cli).await {
        Ok(()) => {
            session.close().await?;
            println!("Screenshot taken");
            Ok(())
        }
        Err(e) => {
            let _ = session.close().await;
            Err(e)
        }
    }
}

async fn capture(session: &BrowserSession, cli: &Cli) -> Result<()> {
    session.navigate(&cli.url).await?;
    session.wait_for_network_idle().await?;

    let options = if cli.viewport_only {
        ScreenshotOptions::viewport()
    } else {
        ScreenshotOptions::full_page()
    };

    let bytes = capture_to_file(session, &cli.output, options).await?;
    info!("Captured {} ({} bytes)", cli.output.display(), bytes);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_uses_original_constants() {
        let cli = Cli::try_parse_from(["pagesnap"]).unwrap();
        assert_eq!(cli.url, "http://localhost:5173");
        assert_eq!(cli.output, PathBuf::from("screenshot.png"));
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.quiet_window, 500);
        assert!(!cli.viewport_only);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "pagesnap",
            "--url",
            "http://localhost:8080",
            "--output",
            "out/page.png",
            "--timeout",
            "5",
            "--quiet-window",
            "250",
            "--viewport-only",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(cli.url, "http://localhost:8080");
        assert_eq!(cli.output, PathBuf::from("out/page.png"));
        assert_eq!(cli.timeout, 5);
        assert_eq!(cli.quiet_window, 250);
        assert!(cli.viewport_only);
        assert!(cli.verbose);
    }

    #[test]
    fn test_rejects_unknown_arguments() {
        assert!(Cli::try_parse_from(["pagesnap", "--frame-rate", "60"]).is_err());
    }
}
