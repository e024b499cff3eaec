//! The guard state machine.
//!
//! One event is resolved completely (classification, authentication and any
//! restore) before the next one is looked at. The authentication challenge
//! is the only place this can block for long.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use super::state::GuardState;
use crate::backup::{is_staging_path, BackupStore, RestoreOutcome, RestoreTarget, SkipReason};
use crate::classifier::ChangeClassifier;
use crate::config::{GuardConfig, WatchedPath};
use crate::gate::AuthGate;
use crate::traits::{GuardEventHandler, RestoreNotifier, WatchControl};
use crate::watcher::{is_excluded, ChangeEvent};

/// Why an event was dropped without a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Editor swap or temp file
    Excluded,
    /// Not covered by any watched path
    Unwatched,
    /// Inside the configuration directory or a restore staging sibling
    Internal,
    /// A directory entry changed; its children report their own changes
    Directory,
    /// Written by a restore
    SelfOriginated,
    /// Already covered by a challenge that resolved after it was observed
    Settled,
    /// The live file could not be read for classification
    Unreadable,
}

/// How one event was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    Ignored(IgnoreReason),
    BelowThreshold,
    /// The challenge was granted; the change stays.
    Accepted { path: PathBuf },
    Restored { path: PathBuf },
    RestoreSkipped { path: PathBuf, reason: SkipReason },
    /// The restore hit an I/O error. Watching continues.
    RestoreFailed { path: PathBuf },
}

impl HandleOutcome {
    /// True if resolving the event involved an authentication challenge.
    pub fn was_challenged(&self) -> bool {
        !matches!(
            self,
            HandleOutcome::Ignored(_) | HandleOutcome::BelowThreshold
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Restoration {
    /// The live path is gone; write it back only where it is absent.
    Recreate,
    /// The live file is present but changed; overwrite it.
    Replace,
}

/// Drives events through classification, authentication and restore.
pub struct GuardOrchestrator {
    config: GuardConfig,
    store: BackupStore,
    classifier: ChangeClassifier,
    gate: AuthGate,
    notifier: Arc<dyn RestoreNotifier>,
    state: GuardState,
    /// Restored path -> instant its restore finished.
    restored: HashMap<PathBuf, Instant>,
    /// Challenged path -> instant its challenge resolved.
    settled: HashMap<PathBuf, Instant>,
}

impl GuardOrchestrator {
    pub fn new(
        config: GuardConfig,
        store: BackupStore,
        gate: AuthGate,
        notifier: Arc<dyn RestoreNotifier>,
    ) -> Self {
        let classifier = ChangeClassifier::new(config.policy.clone());
        Self {
            config,
            store,
            classifier,
            gate,
            notifier,
            state: GuardState::Watching,
            restored: HashMap::new(),
            settled: HashMap::new(),
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn store(&self) -> &BackupStore {
        &self.store
    }

    fn set_state(&mut self, next: GuardState) {
        if self.state != next {
            tracing::debug!("Guard state {} -> {}", self.state, next);
            self.state = next;
        }
    }

    /// Common checks for every event. Returns the owning watched path.
    fn screen(&self, event: &ChangeEvent) -> Result<WatchedPath, IgnoreReason> {
        let path = event.path();
        if is_excluded(path) {
            return Err(IgnoreReason::Excluded);
        }
        if path.starts_with(self.config.layout.root())
            || path.starts_with(self.store.root())
            || is_staging_path(path)
        {
            return Err(IgnoreReason::Internal);
        }
        if observed_before(&self.restored, event) {
            return Err(IgnoreReason::SelfOriginated);
        }
        if observed_before(&self.settled, event) {
            return Err(IgnoreReason::Settled);
        }
        self.config
            .owner_of(path)
            .cloned()
            .ok_or(IgnoreReason::Unwatched)
    }

    /// Forget watermarks older than `observed_at`. Events arrive in order,
    /// so nothing still queued can fall under them.
    fn prune(&mut self, observed_at: Instant) {
        self.restored.retain(|_, at| *at >= observed_at);
        self.settled.retain(|_, at| *at >= observed_at);
    }

    fn ignore(&self, event: &ChangeEvent, reason: IgnoreReason) -> HandleOutcome {
        tracing::debug!("Ignoring {} ({:?})", event.description(), reason);
        HandleOutcome::Ignored(reason)
    }

    fn classify(
        &mut self,
        path: &Path,
        owner: WatchedPath,
        watch: &mut dyn WatchControl,
    ) -> HandleOutcome {
        self.set_state(GuardState::Classifying);
        let snapshot = self.store.resolve(&owner, path).map(|t| t.snapshot);

        let assessment = match self.classifier.assess(path, snapshot.as_deref()) {
            Ok(assessment) => assessment,
            Err(err) => {
                tracing::warn!("Cannot classify {}: {}", path.display(), err);
                self.set_state(GuardState::Watching);
                return HandleOutcome::Ignored(IgnoreReason::Unreadable);
            }
        };

        if !assessment.is_significant() {
            self.set_state(GuardState::Watching);
            return HandleOutcome::BelowThreshold;
        }

        tracing::warn!(
            "Significant change to {} ({:?})",
            path.display(),
            assessment.measurement
        );
        self.challenge(path, owner, Restoration::Replace, watch)
    }

    fn challenge(
        &mut self,
        path: &Path,
        owner: WatchedPath,
        restoration: Restoration,
        watch: &mut dyn WatchControl,
    ) -> HandleOutcome {
        self.set_state(GuardState::Authenticating);
        let session = self.gate.challenge();
        let resolved_at = Instant::now();

        let subject = match restoration {
            Restoration::Recreate => topmost_missing(&owner, path),
            Restoration::Replace => path.to_path_buf(),
        };

        if session.is_granted() {
            tracing::info!("Change to {} accepted", subject.display());
            self.settled.insert(subject.clone(), resolved_at);
            self.set_state(GuardState::Watching);
            return HandleOutcome::Accepted { path: subject };
        }

        tracing::warn!(
            "Authentication denied ({:?}), restoring {}",
            session.deny_reason(),
            subject.display()
        );
        self.settled.insert(subject.clone(), resolved_at);

        let Some(target) = self.store.resolve(&owner, &subject) else {
            tracing::warn!("No snapshot registered for {}", owner.location().display());
            self.set_state(GuardState::Watching);
            return HandleOutcome::RestoreSkipped {
                path: subject,
                reason: SkipReason::SnapshotMissing,
            };
        };

        self.set_state(GuardState::Restoring);
        self.restore(&target, restoration, watch)
    }

    /// Write the snapshot back with the subscription suspended, then resume.
    fn restore(
        &mut self,
        target: &RestoreTarget,
        restoration: Restoration,
        watch: &mut dyn WatchControl,
    ) -> HandleOutcome {
        self.set_state(GuardState::Suspended);
        watch.suspend();

        let result = match restoration {
            Restoration::Recreate => self.store.restore(target),
            Restoration::Replace => self.store.replace(target),
        };
        self.restored.insert(target.live.clone(), Instant::now());

        let path = target.live.clone();
        let outcome = match result {
            Ok(RestoreOutcome::Restored { .. }) => {
                self.notifier.notify_restoration(&path);
                HandleOutcome::Restored { path }
            }
            Ok(RestoreOutcome::Skipped(reason)) => {
                tracing::warn!("Restore of {} skipped: {:?}", path.display(), reason);
                HandleOutcome::RestoreSkipped { path, reason }
            }
            Err(err) => {
                tracing::error!(
                    "[{}] Restore of {} failed: {}",
                    err.error_code(),
                    path.display(),
                    err
                );
                HandleOutcome::RestoreFailed { path }
            }
        };

        if let Err(err) = watch.resume() {
            tracing::error!("Failed to resume watching: {}", err);
        }
        self.set_state(GuardState::Watching);
        outcome
    }
}

impl GuardEventHandler for GuardOrchestrator {
    /// Deletions are always challenged; no classification happens. A path
    /// that exists again by now is classified as a modification instead.
    fn on_deleted(&mut self, event: &ChangeEvent, watch: &mut dyn WatchControl) -> HandleOutcome {
        self.prune(event.observed_at);
        let owner = match self.screen(event) {
            Ok(owner) => owner,
            Err(reason) => return self.ignore(event, reason),
        };
        let path = event.path();

        if path.symlink_metadata().is_ok() {
            if path.is_dir() {
                return self.ignore(event, IgnoreReason::Directory);
            }
            tracing::debug!("{} reappeared, classifying instead", path.display());
            return self.classify(path, owner, watch);
        }

        tracing::warn!("Deletion detected: {}", path.display());
        self.challenge(path, owner, Restoration::Recreate, watch)
    }

    fn on_modified(&mut self, event: &ChangeEvent, watch: &mut dyn WatchControl) -> HandleOutcome {
        self.prune(event.observed_at);
        let owner = match self.screen(event) {
            Ok(owner) => owner,
            Err(reason) => return self.ignore(event, reason),
        };
        let path = event.path();

        if path.symlink_metadata().is_err() {
            tracing::warn!("Deletion detected: {}", path.display());
            return self.challenge(path, owner, Restoration::Recreate, watch);
        }
        if path.is_dir() {
            return self.ignore(event, IgnoreReason::Directory);
        }
        self.classify(path, owner, watch)
    }
}

/// True if `event` is at or under a recorded path and was observed no later
/// than the recorded instant.
fn observed_before(marks: &HashMap<PathBuf, Instant>, event: &ChangeEvent) -> bool {
    marks
        .iter()
        .any(|(path, at)| event.path.starts_with(path) && event.observed_at <= *at)
}

/// Climb from `path` to the highest missing ancestor still inside `owner`.
fn topmost_missing(owner: &WatchedPath, path: &Path) -> PathBuf {
    let mut subject = path.to_path_buf();
    while subject != owner.location() {
        match subject.parent() {
            Some(parent)
                if parent.starts_with(owner.location()) && parent.symlink_metadata().is_err() =>
            {
                subject = parent.to_path_buf();
            }
            _ => break,
        }
    }
    subject
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{RecordingNotifier, RecordingWatchControl, ScriptedAuthenticator};
    use crate::config::{ConfigLayout, PathKind, ThresholdPolicy};
    use crate::credential::Secret;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        file: PathBuf,
        dir: PathBuf,
        notifier: RecordingNotifier,
        watch: RecordingWatchControl,
        auth: Arc<ScriptedAuthenticator>,
        guard: GuardOrchestrator,
    }

    fn fixture(script: ScriptedAuthenticator) -> Fixture {
        let temp = TempDir::new().unwrap();
        let layout = ConfigLayout::new(temp.path().join("cfg"));
        layout.ensure_dirs().unwrap();

        let file = temp.path().join("notes.txt");
        fs::write(&file, "hello").unwrap();
        let dir = temp.path().join("site");
        fs::create_dir_all(dir.join("css")).unwrap();
        fs::write(dir.join("index.html"), "<html></html>").unwrap();
        fs::write(dir.join("css").join("main.css"), "body {}").unwrap();

        let watched = vec![
            WatchedPath::new(&file, PathKind::File),
            WatchedPath::new(&dir, PathKind::Directory),
        ];
        let policy = ThresholdPolicy::default().with_threshold(".txt", 5);
        let mut store = BackupStore::new(layout.backup_root()).with_exclude(layout.root());
        store.snapshot_all(&watched).unwrap();

        let config = GuardConfig {
            layout,
            watched,
            policy,
        };
        let auth = Arc::new(script);
        let gate = AuthGate::new(auth.clone(), Secret::Plain("12345".to_string()));
        let notifier = RecordingNotifier::new();
        let guard = GuardOrchestrator::new(config, store, gate, Arc::new(notifier.clone()));

        Fixture {
            temp,
            file,
            dir,
            notifier,
            watch: RecordingWatchControl::new(),
            auth,
            guard,
        }
    }

    fn wrong_three_times() -> ScriptedAuthenticator {
        ScriptedAuthenticator::new()
            .then_credential("a")
            .then_credential("b")
            .then_credential("c")
    }

    #[test]
    fn test_small_edit_below_threshold() {
        let mut f = fixture(ScriptedAuthenticator::new());
        fs::write(&f.file, "hella").unwrap();

        let outcome = f.guard.handle(&ChangeEvent::modified(&f.file), &mut f.watch);
        assert_eq!(outcome, HandleOutcome::BelowThreshold);
        assert_eq!(f.auth.prompt_count(), 0);
        assert_eq!(f.guard.state(), GuardState::Watching);
    }

    #[test]
    fn test_significant_edit_denied_restores() {
        let mut f = fixture(wrong_three_times());
        fs::write(&f.file, "a totally new string").unwrap();

        let outcome = f.guard.handle(&ChangeEvent::modified(&f.file), &mut f.watch);
        assert_eq!(
            outcome,
            HandleOutcome::Restored {
                path: f.file.clone()
            }
        );
        assert_eq!(fs::read_to_string(&f.file).unwrap(), "hello");
        assert_eq!(f.auth.prompt_count(), 3);
        assert_eq!(f.notifier.paths(), vec![f.file.clone()]);
        assert_eq!(f.watch.suspend_count(), 1);
        assert_eq!(f.watch.resume_count(), 1);
        assert!(f.watch.is_active());
    }

    #[test]
    fn test_granted_change_is_kept() {
        let mut f = fixture(ScriptedAuthenticator::new().then_credential("12345"));
        fs::write(&f.file, "a totally new string").unwrap();

        let outcome = f.guard.handle(&ChangeEvent::modified(&f.file), &mut f.watch);
        assert!(matches!(outcome, HandleOutcome::Accepted { .. }));
        assert_eq!(
            fs::read_to_string(&f.file).unwrap(),
            "a totally new string"
        );
        let snapshot = f.guard.store().entry_for(&f.file).unwrap().snapshot();
        assert_eq!(fs::read_to_string(snapshot).unwrap(), "hello");
        assert_eq!(f.watch.suspend_count(), 0);
    }

    #[test]
    fn test_events_queued_during_challenge_are_settled() {
        let mut f = fixture(ScriptedAuthenticator::new().then_credential("12345"));
        fs::write(&f.file, "a totally new string").unwrap();
        let first = ChangeEvent::modified(&f.file);
        let burst = ChangeEvent::modified(&f.file);

        assert!(f.guard.handle(&first, &mut f.watch).was_challenged());
        assert_eq!(
            f.guard.handle(&burst, &mut f.watch),
            HandleOutcome::Ignored(IgnoreReason::Settled)
        );
        assert_eq!(f.auth.prompt_count(), 1);
    }

    #[test]
    fn test_deleted_file_restored_on_cancel() {
        let mut f = fixture(ScriptedAuthenticator::new().then_cancel());
        fs::remove_file(&f.file).unwrap();

        let outcome = f.guard.handle(&ChangeEvent::deleted(&f.file), &mut f.watch);
        assert!(matches!(outcome, HandleOutcome::Restored { .. }));
        assert_eq!(fs::read_to_string(&f.file).unwrap(), "hello");
    }

    #[test]
    fn test_excluded_deletion_ignored() {
        let mut f = fixture(ScriptedAuthenticator::new());
        let swap = f.dir.join(".index.html.swp");

        let outcome = f.guard.handle(&ChangeEvent::deleted(&swap), &mut f.watch);
        assert_eq!(outcome, HandleOutcome::Ignored(IgnoreReason::Excluded));
        assert_eq!(f.auth.prompt_count(), 0);
    }

    #[test]
    fn test_deleted_directory_restored_once() {
        let mut f = fixture(wrong_three_times());
        let events = vec![
            ChangeEvent::deleted(f.dir.join("css").join("main.css")),
            ChangeEvent::deleted(f.dir.join("css")),
            ChangeEvent::deleted(f.dir.join("index.html")),
            ChangeEvent::deleted(&f.dir),
        ];
        fs::remove_dir_all(&f.dir).unwrap();

        let outcomes: Vec<_> = events
            .iter()
            .map(|e| f.guard.handle(e, &mut f.watch))
            .collect();

        assert_eq!(
            outcomes[0],
            HandleOutcome::Restored {
                path: f.dir.clone()
            }
        );
        for outcome in &outcomes[1..] {
            assert_eq!(*outcome, HandleOutcome::Ignored(IgnoreReason::SelfOriginated));
        }
        assert_eq!(
            fs::read_to_string(f.dir.join("css").join("main.css")).unwrap(),
            "body {}"
        );
        assert_eq!(f.notifier.count(), 1);
        assert_eq!(f.auth.prompt_count(), 3);
    }

    #[test]
    fn test_restore_writes_not_reclassified() {
        let mut f = fixture(wrong_three_times());
        fs::write(&f.file, "a totally new string").unwrap();
        f.guard.handle(&ChangeEvent::modified(&f.file), &mut f.watch);

        // Late notification about the restore's own write.
        let echo = ChangeEvent::modified(&f.file)
            .observed(Instant::now() - std::time::Duration::from_secs(1));
        assert_eq!(
            f.guard.handle(&echo, &mut f.watch),
            HandleOutcome::Ignored(IgnoreReason::SelfOriginated)
        );

        // A fresh event against restored content is below any threshold.
        assert_eq!(
            f.guard.handle(&ChangeEvent::modified(&f.file), &mut f.watch),
            HandleOutcome::BelowThreshold
        );
        assert_eq!(f.notifier.count(), 1);
    }

    #[test]
    fn test_watermarks_dropped_once_events_pass_them() {
        let mut f = fixture(wrong_three_times().then_credential("12345"));
        fs::write(&f.file, "a totally new string").unwrap();
        f.guard.handle(&ChangeEvent::modified(&f.file), &mut f.watch);
        assert_eq!(f.guard.restored.len(), 1);
        assert_eq!(f.guard.settled.len(), 1);

        let page = f.dir.join("index.html");
        fs::remove_file(&page).unwrap();
        let outcome = f.guard.handle(&ChangeEvent::deleted(&page), &mut f.watch);
        assert_eq!(outcome, HandleOutcome::Accepted { path: page.clone() });

        assert!(f.guard.restored.is_empty());
        assert_eq!(f.guard.settled.len(), 1);
        assert!(f.guard.settled.contains_key(&page));
    }

    #[test]
    fn test_failed_restore_resumes_watching() {
        let mut f = fixture(wrong_three_times().then_cancel());
        // A directory where the restore wants to stage its copy.
        let blocker = f.temp.path().join(".notes.txt.fileguard-restore");
        assert!(is_staging_path(&blocker));
        fs::create_dir_all(blocker.join("occupied")).unwrap();
        fs::write(&f.file, "a totally new string").unwrap();

        let outcome = f.guard.handle(&ChangeEvent::modified(&f.file), &mut f.watch);
        assert_eq!(
            outcome,
            HandleOutcome::RestoreFailed {
                path: f.file.clone()
            }
        );
        assert_eq!(f.watch.suspend_count(), 1);
        assert_eq!(f.watch.resume_count(), 1);
        assert!(f.watch.is_active());
        assert_eq!(f.notifier.count(), 0);
        assert_eq!(f.guard.state(), GuardState::Watching);

        let page = f.dir.join("index.html");
        fs::remove_file(&page).unwrap();
        let outcome = f.guard.handle(&ChangeEvent::deleted(&page), &mut f.watch);
        assert_eq!(outcome, HandleOutcome::Restored { path: page.clone() });
        assert_eq!(fs::read_to_string(&page).unwrap(), "<html></html>");
        assert_eq!(f.watch.resume_count(), 2);
        assert_eq!(f.notifier.paths(), vec![page]);
    }

    #[test]
    fn test_config_and_unwatched_paths_ignored() {
        let mut f = fixture(ScriptedAuthenticator::new());
        let internal = f.temp.path().join("cfg").join("list.txt");
        assert_eq!(
            f.guard.handle(&ChangeEvent::deleted(internal), &mut f.watch),
            HandleOutcome::Ignored(IgnoreReason::Internal)
        );
        let stranger = f.temp.path().join("other.txt");
        assert_eq!(
            f.guard.handle(&ChangeEvent::deleted(stranger), &mut f.watch),
            HandleOutcome::Ignored(IgnoreReason::Unwatched)
        );
    }

    #[test]
    fn test_reappeared_path_is_classified() {
        let mut f = fixture(ScriptedAuthenticator::new());
        let outcome = f.guard.handle(&ChangeEvent::deleted(&f.file), &mut f.watch);
        assert_eq!(outcome, HandleOutcome::BelowThreshold);
        assert_eq!(f.auth.prompt_count(), 0);
    }

    #[test]
    fn test_new_file_without_baseline_is_not_challenged() {
        let mut f = fixture(ScriptedAuthenticator::new());
        let fresh = f.dir.join("new.txt");
        fs::write(&fresh, "brand new content here").unwrap();
        assert_eq!(
            f.guard.handle(&ChangeEvent::modified(&fresh), &mut f.watch),
            HandleOutcome::BelowThreshold
        );
    }

    #[test]
    fn test_directory_modification_ignored() {
        let mut f = fixture(ScriptedAuthenticator::new());
        let css = f.dir.join("css");
        assert_eq!(
            f.guard.handle(&ChangeEvent::modified(css), &mut f.watch),
            HandleOutcome::Ignored(IgnoreReason::Directory)
        );
    }

    #[test]
    fn test_topmost_missing_stays_inside_owner() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("a")).unwrap();
        let owner = WatchedPath::new(&root, PathKind::Directory);

        let missing = root.join("a").join("b").join("c.txt");
        assert_eq!(topmost_missing(&owner, &missing), root.join("a").join("b"));

        fs::remove_dir_all(&root).unwrap();
        assert_eq!(topmost_missing(&owner, &missing), root);
    }
}
