//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`Authenticator`] - Credential prompt behind the authentication challenge
//! - [`GuardEventHandler`] - Consumer of normalized filesystem changes
//! - [`RestoreNotifier`] - User-visible notice after a restore
//! - [`WatchControl`] - Suspend/resume of the filesystem subscription

pub mod authenticator;
pub mod handler;
pub mod notifier;
pub mod watch_control;

pub use authenticator::{Authenticator, PromptResponse};
pub use handler::GuardEventHandler;
pub use notifier::RestoreNotifier;
pub use watch_control::WatchControl;
