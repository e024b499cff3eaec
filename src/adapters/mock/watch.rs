//! Recording watch control for testing.

use crate::error::GuardResult;
use crate::traits::WatchControl;

/// [`WatchControl`] that only counts calls and tracks whether it is active.
#[derive(Debug, Clone)]
pub struct RecordingWatchControl {
    suspended: u32,
    resumed: u32,
    active: bool,
}

impl RecordingWatchControl {
    pub fn new() -> Self {
        Self {
            suspended: 0,
            resumed: 0,
            active: true,
        }
    }

    pub fn suspend_count(&self) -> u32 {
        self.suspended
    }

    pub fn resume_count(&self) -> u32 {
        self.resumed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for RecordingWatchControl {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchControl for RecordingWatchControl {
    fn suspend(&mut self) {
        self.suspended += 1;
        self.active = false;
    }

    fn resume(&mut self) -> GuardResult<()> {
        self.resumed += 1;
        self.active = true;
        Ok(())
    }
}
