//! Command-line argument parsing for fileguard.
//!
//! This module turns `std::env::args()` into a [`CliArgs`] value. Unknown
//! commands and missing operands are usage errors.

use std::path::PathBuf;

use crate::config::{normalize_extension, parse_threshold};
use crate::error::{GuardError, GuardResult};

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Snapshot everything, then monitor until Ctrl+C (default)
    Watch,
    /// Re-snapshot every watched path without monitoring
    Refresh,
    /// Print the watched-path list
    PathsList,
    /// Append a path to the watched-path list
    PathsAdd(PathBuf),
    /// Drop a path from the watched-path list
    PathsRemove(PathBuf),
    /// Print the threshold policy
    ThresholdsList,
    /// Set the threshold for one extension
    ThresholdsSet { extension: String, threshold: u64 },
    /// Remove the override for one extension
    ThresholdsRemove { extension: String },
    /// Verify the current secret, then store a new one
    SetPassword,
}

impl CliCommand {
    /// True for commands that change what is protected and therefore
    /// require the secret first.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            CliCommand::Refresh
                | CliCommand::PathsAdd(_)
                | CliCommand::PathsRemove(_)
                | CliCommand::ThresholdsSet { .. }
                | CliCommand::ThresholdsRemove { .. }
        )
    }
}

/// Global options plus the command.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// `--config-dir` override
    pub config_dir: Option<PathBuf>,
    pub command: CliCommand,
}

/// Parse command-line arguments (program name first).
///
/// # Examples
///
/// ```
/// use fileguard::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["fileguard".to_string(), "refresh".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap().command, CliCommand::Refresh);
/// ```
pub fn parse_args<I>(args: I) -> GuardResult<CliArgs>
where
    I: Iterator<Item = String>,
{
    let mut config_dir = None;
    let mut words = Vec::new();

    // Skip the program name
    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(plain(CliCommand::Version)),
            "--help" | "-h" => return Ok(plain(CliCommand::Help)),
            "--config-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| GuardError::usage("--config-dir needs a directory"))?;
                config_dir = Some(PathBuf::from(dir));
            }
            flag if flag.starts_with("--config-dir=") => {
                config_dir = Some(PathBuf::from(&flag["--config-dir=".len()..]));
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(GuardError::usage(format!("unknown option '{}'", flag)));
            }
            _ => words.push(arg),
        }
    }

    let command = parse_command(&words)?;
    Ok(CliArgs {
        config_dir,
        command,
    })
}

fn plain(command: CliCommand) -> CliArgs {
    CliArgs {
        config_dir: None,
        command,
    }
}

fn parse_command(words: &[String]) -> GuardResult<CliCommand> {
    let words: Vec<&str> = words.iter().map(String::as_str).collect();
    let command = match words.as_slice() {
        [] | ["watch"] => CliCommand::Watch,
        ["refresh"] => CliCommand::Refresh,
        ["help"] => CliCommand::Help,
        ["set-password"] => CliCommand::SetPassword,
        ["paths"] | ["paths", "list"] => CliCommand::PathsList,
        ["paths", "add", path] => CliCommand::PathsAdd(PathBuf::from(path)),
        ["paths", "remove", path] => CliCommand::PathsRemove(PathBuf::from(path)),
        ["thresholds"] | ["thresholds", "list"] => CliCommand::ThresholdsList,
        ["thresholds", "set", ext, value] => CliCommand::ThresholdsSet {
            extension: normalize_extension(ext),
            threshold: parse_threshold(value)?,
        },
        ["thresholds", "remove", ext] => CliCommand::ThresholdsRemove {
            extension: normalize_extension(ext),
        },
        ["paths", ..] => {
            return Err(GuardError::usage(
                "expected 'paths list', 'paths add <path>' or 'paths remove <path>'",
            ))
        }
        ["thresholds", ..] => {
            return Err(GuardError::usage(
                "expected 'thresholds list', 'thresholds set <ext> <n>' or 'thresholds remove <ext>'",
            ))
        }
        [other, ..] => {
            return Err(GuardError::usage(format!("unknown command '{}'", other)));
        }
    };
    Ok(command)
}
