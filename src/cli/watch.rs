//! `fileguard watch`: the monitoring session.
//!
//! Order matters: the secret is verified first (a failure aborts with a
//! non-zero exit), then every path is snapshotted, and only then does the
//! watcher start.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::refresh::backup_store;
use crate::backup::BackupStore;
use crate::config::{ConfigLayout, GuardConfig};
use crate::credential::{bootstrap, CredentialStore, Secret};
use crate::error::{GuardResult, SystemError};
use crate::gate::AuthGate;
use crate::guard::{run, GuardMessage, GuardOrchestrator, MonitorStats};
use crate::traits::{Authenticator, RestoreNotifier};
use crate::watcher::EventWatcher;

/// Everything a monitoring session needs before the watcher starts.
pub struct Session {
    pub config: GuardConfig,
    pub store: BackupStore,
    pub secret: Secret,
}

/// Verify the secret, load the configuration and snapshot every path.
pub fn prepare_session(
    layout: &ConfigLayout,
    authenticator: Arc<dyn Authenticator>,
) -> GuardResult<Session> {
    layout.ensure_dirs()?;
    let secret = bootstrap(&CredentialStore::new(layout.password_file()), authenticator)?;

    let config = GuardConfig::load(layout.clone())?;
    if config.watched.is_empty() {
        tracing::warn!("No paths are watched; add some with `fileguard paths add <path>`");
    }

    let mut store = backup_store(layout);
    let report = store.snapshot_all(&config.watched)?;
    if !report.is_clean() {
        tracing::warn!(
            "{} path(s) could not be snapshotted and may not be restorable",
            report.skipped.len() + report.failed.len()
        );
    }

    Ok(Session {
        config,
        store,
        secret,
    })
}

/// Run a monitoring session until Ctrl+C.
pub fn handle_watch_command(
    layout: &ConfigLayout,
    authenticator: Arc<dyn Authenticator>,
    notifier: Arc<dyn RestoreNotifier>,
) -> GuardResult<MonitorStats> {
    let Session {
        config,
        store,
        secret,
    } = prepare_session(layout, authenticator.clone())?;

    let (message_tx, mut message_rx) = mpsc::unbounded_channel();

    let shutdown_tx = message_tx.clone();
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(GuardMessage::Shutdown);
    })
    .map_err(|e| SystemError::IoError {
        operation: "install Ctrl+C handler".to_string(),
        path: None,
        message: e.to_string(),
    })?;

    let mut watcher = EventWatcher::new(config.watched.clone(), message_tx);
    watcher.start()?;

    let gate = AuthGate::new(authenticator, secret);
    let mut orchestrator = GuardOrchestrator::new(config, store, gate, notifier);

    println!("fileguard is watching. Press Ctrl+C to stop.");
    Ok(run(&mut message_rx, &mut orchestrator, &mut watcher))
}
