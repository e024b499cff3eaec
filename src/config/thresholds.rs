//! Threshold policy: how large a change must be before it is challenged.
//!
//! The policy maps a lowercase extension (with leading dot, `""` for files
//! without one) to a non-negative threshold. Extensions listed as binary are
//! compared by size delta, everything else by textual edit distance.
//!
//! The policy is a value: editing returns a new policy, the monitor keeps
//! the one it was started with.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GuardResult, IoResultExt};

/// Threshold used when no extension-specific entry exists.
pub const DEFAULT_THRESHOLD: u64 = 10_000;

/// Extensions compared by size delta unless configured otherwise.
pub const DEFAULT_BINARY_EXTENSIONS: &[&str] = &[".bin", ".exe", ".dll"];

/// How a file's content is compared against its snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentClass {
    /// Edit distance between the decoded contents.
    Text,
    /// Absolute difference in byte size.
    Binary,
}

/// Immutable threshold configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdPolicy {
    #[serde(default = "default_threshold")]
    default: u64,
    #[serde(default = "default_binary_extensions")]
    binary_extensions: BTreeSet<String>,
    #[serde(default)]
    thresholds: BTreeMap<String, u64>,
}

fn default_threshold() -> u64 {
    DEFAULT_THRESHOLD
}

fn default_binary_extensions() -> BTreeSet<String> {
    DEFAULT_BINARY_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

/// Accepted on-disk shapes of `thresholds.json`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PolicyFile {
    Structured(ThresholdPolicy),
    /// Flat `{".txt": 10000}` map written by older versions.
    Legacy(BTreeMap<String, u64>),
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            default: DEFAULT_THRESHOLD,
            binary_extensions: default_binary_extensions(),
            thresholds: BTreeMap::new(),
        }
    }
}

/// Normalize an extension key: trimmed, lowercase, leading dot.
/// The empty string stays empty and stands for "no extension".
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.is_empty() || ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Lowercase extension of `path` with a leading dot, or `""`.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

impl ThresholdPolicy {
    /// Load the policy from `file`. A missing file yields the defaults.
    pub fn load(file: &Path) -> GuardResult<Self> {
        if !file.exists() {
            tracing::info!("No threshold policy at {}, using defaults", file.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(file).with_path(file, "read threshold policy")?;
        Self::parse(&content).map_err(|message| {
            ConfigError::InvalidThresholds {
                path: file.to_path_buf(),
                message,
            }
            .into()
        })
    }

    /// Parse either the structured or the legacy flat form.
    pub fn parse(content: &str) -> Result<Self, String> {
        let parsed: PolicyFile = serde_json::from_str(content).map_err(|e| e.to_string())?;
        let mut policy = match parsed {
            PolicyFile::Structured(policy) => policy,
            PolicyFile::Legacy(thresholds) => Self {
                thresholds,
                ..Self::default()
            },
        };
        policy.thresholds = policy
            .thresholds
            .into_iter()
            .map(|(ext, value)| (normalize_extension(&ext), value))
            .collect();
        policy.binary_extensions = policy
            .binary_extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .collect();
        Ok(policy)
    }

    /// Write the policy in the structured form.
    pub fn save(&self, file: &Path) -> GuardResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::from)?;
        fs::write(file, json).with_path(file, "write threshold policy")
    }

    /// Threshold for `path`: the entry for its extension, else the default.
    pub fn threshold_for(&self, path: &Path) -> u64 {
        self.thresholds
            .get(&extension_of(path))
            .copied()
            .unwrap_or(self.default)
    }

    /// Comparison mode for `path`.
    pub fn content_class(&self, path: &Path) -> ContentClass {
        if self.binary_extensions.contains(&extension_of(path)) {
            ContentClass::Binary
        } else {
            ContentClass::Text
        }
    }

    pub fn default_threshold(&self) -> u64 {
        self.default
    }

    /// Per-extension entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u64)> {
        self.thresholds.iter().map(|(ext, value)| (ext.as_str(), *value))
    }

    pub fn binary_extensions(&self) -> impl Iterator<Item = &str> {
        self.binary_extensions.iter().map(String::as_str)
    }

    /// New policy with `ext` set to `threshold`.
    pub fn with_threshold(&self, ext: &str, threshold: u64) -> Self {
        let mut next = self.clone();
        next.thresholds.insert(normalize_extension(ext), threshold);
        next
    }

    /// New policy without an entry for `ext`.
    pub fn without_threshold(&self, ext: &str) -> Self {
        let mut next = self.clone();
        next.thresholds.remove(&normalize_extension(ext));
        next
    }

    /// New policy with a different default threshold.
    pub fn with_default(&self, threshold: u64) -> Self {
        Self {
            default: threshold,
            ..self.clone()
        }
    }

    /// New policy that also treats `ext` as binary.
    pub fn with_binary_extension(&self, ext: &str) -> Self {
        let mut next = self.clone();
        next.binary_extensions.insert(normalize_extension(ext));
        next
    }
}

/// Parse a threshold given on the command line.
pub fn parse_threshold(value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidThresholdValue {
            value: value.to_string(),
        })
}
