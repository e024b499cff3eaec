//! User-visible restore notices.
//!
//! Every restore is announced on stderr. On macOS a Notification Center
//! banner is sent as well, from a background thread so delivery never blocks
//! the event pipeline.

use std::path::Path;

use crate::traits::RestoreNotifier;

const TITLE: &str = "fileguard";

/// [`RestoreNotifier`] for interactive sessions.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    native: bool,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self { native: true }
    }

    /// Only print to stderr; skip native banners.
    pub fn terminal_only() -> Self {
        Self { native: false }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RestoreNotifier for DesktopNotifier {
    fn notify_restoration(&self, path: &Path) {
        let body = restoration_message(path);
        tracing::info!("{}", body);
        eprintln!("[{}] {}", TITLE, body);

        if self.native && cfg!(target_os = "macos") {
            std::thread::spawn(move || send_notification(TITLE, &body));
        }
    }
}

fn restoration_message(path: &Path) -> String {
    format!("{} was restored from its snapshot", path.display())
}

#[cfg(target_os = "macos")]
fn send_notification(title: &str, body: &str) {
    match notify_rust::Notification::new()
        .summary(title)
        .body(body)
        .show()
    {
        Ok(_) => tracing::debug!("OS notification sent"),
        Err(e) => tracing::warn!("Failed to send OS notification: {}", e),
    }
}

#[cfg(not(target_os = "macos"))]
fn send_notification(_title: &str, _body: &str) {
    // stderr notice only
}
