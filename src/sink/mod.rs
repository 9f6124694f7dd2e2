//! The abstract output surface the controller writes to.
//!
//! The embedding UI owns the real output slots (DOM nodes, widgets, whatever);
//! the controller only knows region + message + severity. This keeps the
//! controller headless-testable.

use std::sync::Mutex;

use tracing::{error, info};

/// Named output slot. Each region is written by one logical producer group;
/// the two health regions belong to the monitor, the rest to user operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Shorten,
    Lookup,
    Redirect,
    /// Transient confirmations (clipboard copy)
    Notice,
    ApiHealth,
    StoreHealth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Error,
}

pub trait PresentationSink: Send + Sync {
    fn render(&self, region: Region, message: &str, severity: Severity);

    /// Clear the input field feeding this region. Only invoked after a
    /// successful operation; sinks without inputs can ignore it.
    fn clear_input(&self, _region: Region) {}
}

/// Sink that logs through `tracing`. Useful for headless embedding and
/// for watching the controller during development.
#[derive(Debug, Default)]
pub struct TracingSink;

impl PresentationSink for TracingSink {
    fn render(&self, region: Region, message: &str, severity: Severity) {
        match severity {
            Severity::Error => error!(?region, "{message}"),
            _ => info!(?region, ?severity, "{message}"),
        }
    }
}

/// One recorded `render` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub region: Region,
    pub message: String,
    pub severity: Severity,
}

/// Sink that records every call in order. The tests assert against it, and
/// embedders can use it to snapshot controller output.
#[derive(Debug, Default)]
pub struct RecordingSink {
    renders: Mutex<Vec<Rendered>>,
    cleared: Mutex<Vec<Region>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn renders(&self) -> Vec<Rendered> {
        self.renders.lock().unwrap().clone()
    }

    /// The most recent message rendered into `region`, if any.
    pub fn last_in(&self, region: Region) -> Option<Rendered> {
        self.renders
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.region == region)
            .cloned()
    }

    pub fn cleared_inputs(&self) -> Vec<Region> {
        self.cleared.lock().unwrap().clone()
    }
}

impl PresentationSink for RecordingSink {
    fn render(&self, region: Region, message: &str, severity: Severity) {
        self.renders.lock().unwrap().push(Rendered {
            region,
            message: message.to_string(),
            severity,
        });
    }

    fn clear_input(&self, region: Region) {
        self.cleared.lock().unwrap().push(region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order_and_last_wins() {
        let sink = RecordingSink::new();
        sink.render(Region::Shorten, "working", Severity::Info);
        sink.render(Region::Lookup, "found", Severity::Success);
        sink.render(Region::Shorten, "done", Severity::Success);

        assert_eq!(sink.renders().len(), 3);
        let last = sink.last_in(Region::Shorten).unwrap();
        assert_eq!(last.message, "done");
        assert_eq!(last.severity, Severity::Success);
    }

    #[test]
    fn clear_input_is_tracked_per_region() {
        let sink = RecordingSink::new();
        sink.clear_input(Region::Shorten);
        assert_eq!(sink.cleared_inputs(), vec![Region::Shorten]);
    }
}
