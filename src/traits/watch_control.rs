//! Watch suspension seam used around restores.

use crate::error::GuardResult;

/// Control over the filesystem subscription feeding the orchestrator.
///
/// The orchestrator suspends the subscription before writing a restore and
/// resumes it afterwards, so the restore's own writes are never reported as
/// a new tamper event.
pub trait WatchControl {
    /// Stop delivering notifications. Returns once no further events from
    /// the current subscription can reach the orchestrator.
    fn suspend(&mut self);

    /// Re-establish the subscription for every watched path.
    fn resume(&mut self) -> GuardResult<()>;
}
