//! Change-severity classification.
//!
//! Text files are compared by the length of the shortest insert/delete edit
//! script between snapshot and live content; binary files by the absolute
//! difference in size. Which extensions count as binary is configuration.

mod edit_distance;
mod severity;

pub use edit_distance::{edit_distance, edit_distance_within};
pub use severity::{Assessment, ChangeClassifier, Measurement, Severity};
