use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

pub const RINGTONE_SILENT: &str = "None";
pub const RINGTONE_UNKNOWN: &str = "Unknown ringtone";

/// Looks up the display name of the current ringtone. May be slow.
pub trait RingtoneResolver: Send + Sync {
    /// `None` when no ringtone is set (silent). `Some("")` when the
    /// ringtone exists but has no title.
    fn ringtone_title(&self) -> Option<String>;
}

impl std::fmt::Debug for dyn RingtoneResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RingtoneResolver")
    }
}

/// A resolver that always reports the same title.
#[derive(Debug, Clone)]
pub struct FixedRingtone(pub Option<String>);

impl RingtoneResolver for FixedRingtone {
    fn ringtone_title(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Result of a lookup, addressed to the preference it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingtoneSummary {
    pub key: &'static str,
    pub summary: String,
}

pub fn summary_for(title: Option<String>) -> String {
    match title {
        None => RINGTONE_SILENT.to_string(),
        Some(t) if t.trim().is_empty() => RINGTONE_UNKNOWN.to_string(),
        Some(t) => t,
    }
}

/// Resolve the ringtone name on a background thread and send one summary back.
/// If the receiver is gone the result is dropped.
pub fn spawn_lookup(
    resolver: Arc<dyn RingtoneResolver>,
    key: &'static str,
    tx: mpsc::Sender<RingtoneSummary>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let summary = summary_for(resolver.ringtone_title());
        debug!(key, %summary, "ringtone lookup finished");
        let _ = tx.send(RingtoneSummary { key, summary });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn summaries() {
        assert_eq!(summary_for(None), RINGTONE_SILENT);
        assert_eq!(summary_for(Some("  ".into())), RINGTONE_UNKNOWN);
        assert_eq!(summary_for(Some("Pixel Ring".into())), "Pixel Ring");
    }

    #[test]
    fn lookup_reports_once() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_lookup(
            Arc::new(FixedRingtone(Some("Chime".into()))),
            "ringtone",
            tx,
        );
        let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(msg, RingtoneSummary { key: "ringtone", summary: "Chime".into() });
        handle.join().unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn lookup_tolerates_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let handle = spawn_lookup(Arc::new(FixedRingtone(None)), "ringtone", tx);
        assert!(handle.join().is_ok());
    }
}
