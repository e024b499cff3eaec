//! Decides whether a modification is large enough to be challenged.

use std::fs;
use std::path::Path;

use super::edit_distance::{edit_distance, edit_distance_within};
use crate::config::{ContentClass, ThresholdPolicy};
use crate::error::{GuardResult, IoResultExt};

/// Outcome of classifying one modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Below threshold, or nothing to compare against.
    None,
    /// Meets or exceeds the threshold; requires authentication.
    Significant,
}

/// What was measured, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    /// Text comparison. `distance` is `None` when the search stopped early
    /// because the distance already reached the threshold.
    EditDistance {
        distance: Option<usize>,
        threshold: u64,
    },
    SizeDelta {
        delta: u64,
        threshold: u64,
    },
    /// No snapshot exists yet.
    NoBaseline,
}

/// Classification result with the measurement it was based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub severity: Severity,
    pub measurement: Measurement,
}

impl Assessment {
    pub fn is_significant(&self) -> bool {
        self.severity == Severity::Significant
    }
}

/// Compares a live file against its snapshot under a [`ThresholdPolicy`].
///
/// A difference of zero is never significant, so a threshold of 0 means
/// "any difference at all".
#[derive(Debug, Clone)]
pub struct ChangeClassifier {
    policy: ThresholdPolicy,
}

impl ChangeClassifier {
    pub fn new(policy: ThresholdPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    /// Severity of the change at `live` relative to `snapshot`.
    pub fn severity(&self, live: &Path, snapshot: Option<&Path>) -> GuardResult<Severity> {
        self.assess(live, snapshot).map(|a| a.severity)
    }

    /// Classify and report what was measured.
    pub fn assess(&self, live: &Path, snapshot: Option<&Path>) -> GuardResult<Assessment> {
        let snapshot = match snapshot {
            Some(path) if path.is_file() => path,
            _ => {
                return Ok(Assessment {
                    severity: Severity::None,
                    measurement: Measurement::NoBaseline,
                })
            }
        };

        let threshold = self.policy.threshold_for(live);
        let assessment = match self.policy.content_class(live) {
            ContentClass::Text => {
                let before = read_text(snapshot)?;
                let after = read_text(live)?;
                let distance = text_distance(&before, &after, threshold);
                let significant = match distance {
                    Some(d) => d > 0 && d as u64 >= threshold,
                    None => true,
                };
                Assessment {
                    severity: severity_from(significant),
                    measurement: Measurement::EditDistance {
                        distance,
                        threshold,
                    },
                }
            }
            ContentClass::Binary => {
                let before = fs::metadata(snapshot).with_path(snapshot, "stat snapshot")?.len();
                let after = fs::metadata(live).with_path(live, "stat file")?.len();
                let delta = before.abs_diff(after);
                let significant = if threshold == 0 {
                    delta > 0 || bytes_differ(snapshot, live)?
                } else {
                    delta >= threshold
                };
                Assessment {
                    severity: severity_from(significant),
                    measurement: Measurement::SizeDelta { delta, threshold },
                }
            }
        };

        tracing::debug!(
            "Classified {}: {:?} ({:?})",
            live.display(),
            assessment.severity,
            assessment.measurement
        );
        Ok(assessment)
    }
}

fn severity_from(significant: bool) -> Severity {
    if significant {
        Severity::Significant
    } else {
        Severity::None
    }
}

/// Read a file as text, replacing undecodable bytes.
fn read_text(path: &Path) -> GuardResult<Vec<char>> {
    let bytes = fs::read(path).with_path(path, "read file")?;
    Ok(String::from_utf8_lossy(&bytes).chars().collect())
}

/// Byte comparison for same-size binaries under a zero threshold.
fn bytes_differ(a: &Path, b: &Path) -> GuardResult<bool> {
    let left = fs::read(a).with_path(a, "read snapshot")?;
    let right = fs::read(b).with_path(b, "read file")?;
    Ok(left != right)
}

/// Edit distance between the two texts, or `None` once it is known to be
/// at least `threshold`.
fn text_distance(before: &[char], after: &[char], threshold: u64) -> Option<usize> {
    if threshold == 0 {
        return Some(edit_distance(before, after));
    }
    let limit = usize::try_from(threshold - 1).unwrap_or(usize::MAX);
    edit_distance_within(before, after, limit)
}
