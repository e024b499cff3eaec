//! fileguard - file integrity guard
//!
//! Watches a set of files and directories, challenges significant changes
//! with a shared secret and restores denied changes from snapshots.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod backup;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod credential;
pub mod error;
pub mod gate;
pub mod guard;
pub mod traits;
pub mod watcher;
