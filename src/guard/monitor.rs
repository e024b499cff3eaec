//! The blocking monitor loop.

use tokio::sync::mpsc;

use super::orchestrator::HandleOutcome;
use crate::traits::{GuardEventHandler, WatchControl};
use crate::watcher::ChangeEvent;

/// Messages delivered to the monitor loop.
#[derive(Debug, Clone)]
pub enum GuardMessage {
    /// A normalized filesystem change
    Fs(ChangeEvent),
    /// Cooperative stop request (Ctrl+C)
    Shutdown,
}

/// Counters for one monitoring session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MonitorStats {
    pub events: u64,
    pub ignored: u64,
    pub challenges: u64,
    pub restores: u64,
    pub failures: u64,
}

impl MonitorStats {
    fn record(&mut self, outcome: &HandleOutcome) {
        self.events += 1;
        if outcome.was_challenged() {
            self.challenges += 1;
        }
        match outcome {
            HandleOutcome::Ignored(_) => self.ignored += 1,
            HandleOutcome::Restored { .. } => self.restores += 1,
            HandleOutcome::RestoreFailed { .. } => self.failures += 1,
            _ => {}
        }
    }
}

/// Process messages until `Shutdown` arrives or every sender is gone.
///
/// Events are handled strictly one at a time in arrival order. On exit the
/// subscription is released.
///
/// Must not be called from within an async runtime.
pub fn run<H>(
    message_rx: &mut mpsc::UnboundedReceiver<GuardMessage>,
    handler: &mut H,
    watch: &mut dyn WatchControl,
) -> MonitorStats
where
    H: GuardEventHandler + ?Sized,
{
    let mut stats = MonitorStats::default();
    tracing::info!("Monitoring started");

    while let Some(message) = message_rx.blocking_recv() {
        match message {
            GuardMessage::Fs(event) => {
                let outcome = handler.handle(&event, watch);
                tracing::debug!("{} -> {:?}", event.description(), outcome);
                stats.record(&outcome);
            }
            GuardMessage::Shutdown => {
                tracing::info!("Shutdown requested");
                break;
            }
        }
    }

    watch.suspend();
    tracing::info!(
        "Monitoring stopped: {} events, {} challenges, {} restores, {} failed",
        stats.events,
        stats.challenges,
        stats.restores,
        stats.failures
    );
    stats
}
