//! Network-idle tracking over Chrome DevTools Protocol events
//!
//! The idle heuristic matches the usual "networkidle" definition: the page is
//! idle once no requests have been in flight for a continuous quiet window.

use crate::error::{Result, SnapError};
use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::protocol::cdp::Network;
use headless_chrome::Tab;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::trace;

/// Bookkeeping for requests currently in flight.
///
/// Updated from the CDP event listener thread; read from the wait loop.
pub struct InflightTracker {
    inner: Mutex<TrackerState>,
}

struct TrackerState {
    inflight: HashSet<String>,
    last_activity: Instant,
}

impl InflightTracker {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TrackerState {
                inflight: HashSet::new(),
                last_activity: Instant::now(),
            }),
        }
    }

    /// Record that a request went out
    pub fn request_started(&self, request_id: &str) {
        let mut state = self.inner.lock().unwrap();
        state.inflight.insert(request_id.to_string());
        state.last_activity = Instant::now();
        trace!("request started: {} ({} in flight)", request_id, state.inflight.len());
    }

    /// Record that a request finished, failed, or was served from cache
    pub fn request_settled(&self, request_id: &str) {
        let mut state = self.inner.lock().unwrap();
        state.inflight.remove(request_id);
        state.last_activity = Instant::now();
        trace!("request settled: {} ({} in flight)", request_id, state.inflight.len());
    }

    /// Number of requests currently in flight
    pub fn inflight_count(&self) -> usize {
        self.inner.lock().unwrap().inflight.len()
    }

    /// True once no requests are in flight and none have started or settled
    /// within the quiet window
    pub fn is_idle_for(&self, quiet: Duration) -> bool {
        let state = self.inner.lock().unwrap();
        state.inflight.is_empty() && state.last_activity.elapsed() >= quiet
    }
}

impl Default for InflightTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Enable CDP network events on the tab and subscribe a tracker to them.
///
/// The returned tracker stays subscribed for the lifetime of the tab.
pub(crate) fn attach_network_watcher(tab: &Arc<Tab>) -> Result<Arc<InflightTracker>> {
    tab.call_method(Network::Enable {
        max_total_buffer_size: None,
        max_resource_buffer_size: None,
        max_post_data_size: None,
        enable_durable_messages: None,
        report_direct_socket_traffic: None,
    })
    .map_err(|e| SnapError::Browser(format!("Failed to enable network events: {}", e)))?;

    let tracker = Arc::new(InflightTracker::new());
    let listener = Arc::clone(&tracker);

    tab.add_event_listener(Arc::new(move |event: &Event| match event {
        Event::NetworkRequestWillBeSent(e) => listener.request_started(&e.params.request_id),
        Event::NetworkLoadingFinished(e) => listener.request_settled(&e.params.request_id),
        Event::NetworkLoadingFailed(e) => listener.request_settled(&e.params.request_id),
        Event::NetworkRequestServedFromCache(e) => listener.request_settled(&e.params.request_id),
        _ => {}
    }))
    .map_err(|e| SnapError::Browser(format!("Failed to register network listener: {}", e)))?;

    Ok(tracker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_has_nothing_in_flight() {
        let tracker = InflightTracker::new();
        assert_eq!(tracker.inflight_count(), 0);
    }

    #[test]
    fn test_started_request_blocks_idle() {
        let tracker = InflightTracker::new();
        tracker.request_started("req-1");
        assert_eq!(tracker.inflight_count(), 1);
        assert!(!tracker.is_idle_for(Duration::ZERO));
    }

    #[test]
    fn test_settling_all_requests_allows_idle() {
        let tracker = InflightTracker::new();
        tracker.request_started("req-1");
        tracker.request_started("req-2");
        tracker.request_settled("req-1");
        assert!(!tracker.is_idle_for(Duration::ZERO));
        tracker.request_settled("req-2");
        assert_eq!(tracker.inflight_count(), 0);
        assert!(tracker.is_idle_for(Duration::ZERO));
    }

    #[test]
    fn test_settling_unknown_request_is_harmless() {
        let tracker = InflightTracker::new();
        tracker.request_settled("never-seen");
        assert_eq!(tracker.inflight_count(), 0);
    }

    #[test]
    fn test_quiet_window_must_elapse() {
        let tracker = InflightTracker::new();
        tracker.request_started("req-1");
        tracker.request_settled("req-1");
        // Activity just happened, so a non-zero quiet window is not yet met
        assert!(!tracker.is_idle_for(Duration::from_secs(60)));
        std::thread::sleep(Duration::from_millis(20));
        assert!(tracker.is_idle_for(Duration::from_millis(10)));
    }
}
