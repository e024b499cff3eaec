//! CLI commands against a scratch configuration directory.

mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serial_test::serial;
use tempfile::TempDir;

use common::write_file;
use fileguard::adapters::mock::{RecordingNotifier, ScriptedAuthenticator};
use fileguard::cli::paths::describe_watched_paths;
use fileguard::cli::{parse_args, resolve_layout, run_cli_command_with, CliArgs};
use fileguard::config::{ConfigLayout, PathKind, HOME_ENV};
use fileguard::credential::CredentialStore;

fn cli(config_dir: &Path, words: &[&str]) -> CliArgs {
    let mut args = vec![
        "fileguard".to_string(),
        "--config-dir".to_string(),
        config_dir.display().to_string(),
    ];
    args.extend(words.iter().map(|w| w.to_string()));
    parse_args(args.into_iter()).unwrap()
}

fn run(args: &CliArgs, auth: ScriptedAuthenticator) -> fileguard::error::GuardResult<()> {
    run_cli_command_with(args, Arc::new(auth), Arc::new(RecordingNotifier::new()))
}

#[test]
fn first_mutating_command_creates_the_secret() {
    let temp = TempDir::new().unwrap();
    let cfg = temp.path().join("cfg");
    let file = temp.path().join("a.txt");
    write_file(&file, b"alpha");

    let add = cli(&cfg, &["paths", "add", &file.display().to_string()]);
    run(&add, ScriptedAuthenticator::new().then_credential("s3cret")).unwrap();

    let secret = CredentialStore::new(cfg.join("password.txt")).require().unwrap();
    assert!(secret.verify("s3cret"));
    assert!(!secret.is_plaintext());

    let layout = ConfigLayout::new(&cfg);
    let listed = describe_watched_paths(&layout).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].1, Some(PathKind::File));
}

#[test]
fn refresh_snapshots_every_listed_path() {
    let temp = TempDir::new().unwrap();
    let cfg = temp.path().join("cfg");
    let dir = temp.path().join("docs");
    write_file(&dir.join("one.md"), b"1");
    write_file(&dir.join("deep/two.md"), b"2");

    run(
        &cli(&cfg, &["paths", "add", &dir.display().to_string()]),
        ScriptedAuthenticator::new().then_credential("pw"),
    )
    .unwrap();
    run(
        &cli(&cfg, &["refresh"]),
        ScriptedAuthenticator::new().then_credential("pw"),
    )
    .unwrap();

    let snapshot = cfg.join("backup").join("docs");
    assert_eq!(fs::read_to_string(snapshot.join("deep/two.md")).unwrap(), "2");
}

#[test]
fn wrong_secret_blocks_refresh() {
    let temp = TempDir::new().unwrap();
    let cfg = temp.path().join("cfg");
    fs::create_dir_all(&cfg).unwrap();
    CredentialStore::new(cfg.join("password.txt"))
        .set_secret("pw")
        .unwrap();

    let result = run(
        &cli(&cfg, &["refresh"]),
        ScriptedAuthenticator::new()
            .then_credential("x")
            .then_credential("y")
            .then_credential("z"),
    );
    let err = result.unwrap_err();
    assert!(err.category().is_fatal_at_startup());
    assert!(!cfg.join("backup").join("anything").exists());
}

#[test]
fn set_password_rotates_secret() {
    let temp = TempDir::new().unwrap();
    let cfg = temp.path().join("cfg");
    fs::create_dir_all(&cfg).unwrap();
    fs::write(cfg.join("password.txt"), "12345").unwrap();

    run(
        &cli(&cfg, &["set-password"]),
        ScriptedAuthenticator::new()
            .then_credential("12345")
            .then_credential("new-one")
            .then_credential("new-one"),
    )
    .unwrap();

    let secret = CredentialStore::new(cfg.join("password.txt")).require().unwrap();
    assert!(secret.verify("new-one"));
    assert!(!secret.verify("12345"));
}

#[test]
#[serial]
fn config_dir_falls_back_to_environment() {
    let temp = TempDir::new().unwrap();
    std::env::set_var(HOME_ENV, temp.path());
    let layout = resolve_layout(None).unwrap();
    std::env::remove_var(HOME_ENV);
    assert_eq!(layout.root(), temp.path());
}
