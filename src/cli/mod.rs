//! CLI module for fileguard.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Path list and threshold editing
//! - Snapshot refresh and password rotation
//! - The monitoring session itself
//!
//! # Usage
//!
//! ```ignore
//! use fileguard::cli::{parse_args, run_cli_command};
//!
//! let args = parse_args(std::env::args())?;
//! run_cli_command(&args)?;
//! ```

pub mod args;
pub mod password;
pub mod paths;
pub mod refresh;
pub mod thresholds;
pub mod version;
pub mod watch;

pub use args::{parse_args, CliArgs, CliCommand};
pub use version::{handle_help_command, handle_version_command, USAGE, VERSION};

use std::path::Path;
use std::sync::Arc;

use crate::adapters::{DesktopNotifier, TerminalAuthenticator};
use crate::config::ConfigLayout;
use crate::credential::{bootstrap, CredentialStore};
use crate::error::{GuardResult, IoResultExt};
use crate::traits::{Authenticator, RestoreNotifier};

/// Resolve the configuration directory: `--config-dir` wins, then the
/// environment. Relative directories are made absolute.
pub fn resolve_layout(config_dir: Option<&Path>) -> GuardResult<ConfigLayout> {
    match config_dir {
        Some(dir) if dir.is_absolute() => Ok(ConfigLayout::new(dir)),
        Some(dir) => {
            let cwd = std::env::current_dir().with_path(dir, "resolve config dir")?;
            Ok(ConfigLayout::new(cwd.join(dir)))
        }
        None => ConfigLayout::from_env(),
    }
}

/// Run `args` with the terminal prompt and desktop notifier.
pub fn run_cli_command(args: &CliArgs) -> GuardResult<()> {
    run_cli_command_with(
        args,
        Arc::new(TerminalAuthenticator::new()),
        Arc::new(DesktopNotifier::new()),
    )
}

/// Run `args` with the given collaborators.
///
/// Commands that change what is protected verify the secret first.
pub fn run_cli_command_with(
    args: &CliArgs,
    authenticator: Arc<dyn Authenticator>,
    notifier: Arc<dyn RestoreNotifier>,
) -> GuardResult<()> {
    match &args.command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            handle_help_command();
            return Ok(());
        }
        _ => {}
    }

    let layout = resolve_layout(args.config_dir.as_deref())?;
    tracing::debug!("Using configuration directory {}", layout.root().display());

    if args.command.requires_auth() {
        layout.ensure_dirs()?;
        bootstrap(
            &CredentialStore::new(layout.password_file()),
            authenticator.clone(),
        )?;
    }

    match &args.command {
        CliCommand::Watch => {
            watch::handle_watch_command(&layout, authenticator, notifier)?;
            Ok(())
        }
        CliCommand::Refresh => refresh::handle_refresh_command(&layout),
        CliCommand::PathsList => paths::handle_paths_list(&layout),
        CliCommand::PathsAdd(path) => paths::handle_paths_add(&layout, path),
        CliCommand::PathsRemove(path) => paths::handle_paths_remove(&layout, path),
        CliCommand::ThresholdsList => thresholds::handle_thresholds_list(&layout),
        CliCommand::ThresholdsSet {
            extension,
            threshold,
        } => thresholds::set_threshold(&layout, extension, *threshold).map(|_| ()),
        CliCommand::ThresholdsRemove { extension } => {
            thresholds::remove_threshold(&layout, extension).map(|_| ())
        }
        CliCommand::SetPassword => password::handle_set_password_command(&layout, authenticator),
        CliCommand::Version | CliCommand::Help => Ok(()),
    }
}
