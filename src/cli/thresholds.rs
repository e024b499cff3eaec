//! `fileguard thresholds`: edit the threshold policy.

use crate::config::{ConfigLayout, ThresholdPolicy};
use crate::error::GuardResult;

/// Set the threshold for `extension` and save. Returns the new policy.
pub fn set_threshold(
    layout: &ConfigLayout,
    extension: &str,
    threshold: u64,
) -> GuardResult<ThresholdPolicy> {
    let file = layout.thresholds_file();
    let policy = ThresholdPolicy::load(&file)?.with_threshold(extension, threshold);
    policy.save(&file)?;
    tracing::info!("Threshold for '{}' set to {}", extension, threshold);
    Ok(policy)
}

/// Drop the override for `extension` and save. Returns the new policy.
pub fn remove_threshold(layout: &ConfigLayout, extension: &str) -> GuardResult<ThresholdPolicy> {
    let file = layout.thresholds_file();
    let policy = ThresholdPolicy::load(&file)?.without_threshold(extension);
    policy.save(&file)?;
    Ok(policy)
}

pub fn handle_thresholds_list(layout: &ConfigLayout) -> GuardResult<()> {
    let policy = ThresholdPolicy::load(&layout.thresholds_file())?;
    println!("default       {}", policy.default_threshold());
    let binary: Vec<&str> = policy.binary_extensions().collect();
    println!("binary        {}", binary.join(" "));
    for (ext, threshold) in policy.entries() {
        let ext = if ext.is_empty() { "(none)" } else { ext };
        println!("{:<14}{}", ext, threshold);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_set_then_remove_persists() {
        let temp = TempDir::new().unwrap();
        let layout = ConfigLayout::new(temp.path());

        set_threshold(&layout, ".txt", 5).unwrap();
        let loaded = ThresholdPolicy::load(&layout.thresholds_file()).unwrap();
        assert_eq!(loaded.threshold_for(Path::new("a.txt")), 5);

        remove_threshold(&layout, ".txt").unwrap();
        let loaded = ThresholdPolicy::load(&layout.thresholds_file()).unwrap();
        assert_eq!(
            loaded.threshold_for(Path::new("a.txt")),
            loaded.default_threshold()
        );
    }
}
