//! Version and usage output for the fileguard CLI.

/// The current version of fileguard, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Usage text printed by `--help`.
pub const USAGE: &str = "\
Usage: fileguard [--config-dir DIR] [COMMAND]

Commands:
  watch                       Snapshot every watched path, then monitor (default)
  refresh                     Re-snapshot every watched path and exit
  paths list                  Show the watched paths
  paths add <path>            Watch a file or directory
  paths remove <path>         Stop watching a path
  thresholds list             Show the change thresholds
  thresholds set <ext> <n>    Set the threshold for an extension
  thresholds remove <ext>     Drop the threshold override for an extension
  set-password                Change the secret

Options:
  --config-dir DIR            Use DIR instead of $FILEGUARD_HOME or ~/.fileguard
  -V, --version               Print version
  -h, --help                  Print this help

Logging is controlled with FILEGUARD_LOG (e.g. FILEGUARD_LOG=debug).";

/// Handle the --version command.
///
/// Prints the version string and exits successfully.
pub fn handle_version_command() -> ! {
    println!("fileguard {}", VERSION);
    std::process::exit(0)
}

/// Handle the --help command.
pub fn handle_help_command() {
    println!("{}", USAGE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_format() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_usage_lists_every_command() {
        for word in ["watch", "refresh", "paths add", "thresholds set", "set-password"] {
            assert!(USAGE.contains(word), "usage is missing {}", word);
        }
    }
}
