//! `fileguard paths`: edit the watched-path list.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{read_path_list, write_path_list, ConfigLayout, PathKind};
use crate::error::{GuardResult, IoResultExt};

/// Add `path` (made absolute) to the list. Returns `false` if it was
/// already listed.
pub fn add_watched_path(layout: &ConfigLayout, path: &Path) -> GuardResult<bool> {
    let path = fs::canonicalize(path).with_path(path, "resolve watched path")?;
    let list = layout.list_file();
    let mut paths = read_path_list(&list)?;
    if paths.contains(&path) {
        return Ok(false);
    }
    paths.push(path.clone());
    write_path_list(&list, &paths)?;
    tracing::info!("Now watching {}", path.display());
    Ok(true)
}

/// Remove `path` from the list. Matches the path as given or its absolute
/// form. Returns `false` if it was not listed.
pub fn remove_watched_path(layout: &ConfigLayout, path: &Path) -> GuardResult<bool> {
    let resolved = fs::canonicalize(path).ok();
    let list = layout.list_file();
    let mut paths = read_path_list(&list)?;
    let before = paths.len();
    paths.retain(|p| p != path && Some(p) != resolved.as_ref());
    if paths.len() == before {
        return Ok(false);
    }
    write_path_list(&list, &paths)?;
    tracing::info!("Stopped watching {}", path.display());
    Ok(true)
}

/// Listed paths with their current kind (`None` if missing).
pub fn describe_watched_paths(layout: &ConfigLayout) -> GuardResult<Vec<(PathBuf, Option<PathKind>)>> {
    Ok(read_path_list(&layout.list_file())?
        .into_iter()
        .map(|p| {
            let kind = PathKind::of(&p);
            (p, kind)
        })
        .collect())
}

pub fn handle_paths_list(layout: &ConfigLayout) -> GuardResult<()> {
    let paths = describe_watched_paths(layout)?;
    if paths.is_empty() {
        println!("No watched paths. Add one with `fileguard paths add <path>`.");
    }
    for (path, kind) in paths {
        let label = match kind {
            Some(PathKind::File) => "file",
            Some(PathKind::Directory) => "dir",
            None => "missing",
        };
        println!("{:<8}{}", label, path.display());
    }
    Ok(())
}

pub fn handle_paths_add(layout: &ConfigLayout, path: &Path) -> GuardResult<()> {
    if !add_watched_path(layout, path)? {
        println!("{} is already watched", path.display());
    }
    Ok(())
}

pub fn handle_paths_remove(layout: &ConfigLayout, path: &Path) -> GuardResult<()> {
    if !remove_watched_path(layout, path)? {
        println!("{} is not watched", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuardError;
    use tempfile::TempDir;

    #[test]
    fn test_add_and_remove() {
        let temp = TempDir::new().unwrap();
        let layout = ConfigLayout::new(temp.path().join("cfg"));
        layout.ensure_dirs().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        assert!(add_watched_path(&layout, &file).unwrap());
        assert!(!add_watched_path(&layout, &file).unwrap());

        let listed = describe_watched_paths(&layout).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].1, Some(PathKind::File));

        assert!(remove_watched_path(&layout, &file).unwrap());
        assert!(!remove_watched_path(&layout, &file).unwrap());
        assert!(describe_watched_paths(&layout).unwrap().is_empty());
    }

    #[test]
    fn test_add_missing_path_fails() {
        let temp = TempDir::new().unwrap();
        let layout = ConfigLayout::new(temp.path());
        let err = add_watched_path(&layout, &temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, GuardError::System(_)));
    }

    #[test]
    fn test_remove_missing_path_by_name() {
        let temp = TempDir::new().unwrap();
        let layout = ConfigLayout::new(temp.path());
        let gone = PathBuf::from("/no/such/place");
        write_path_list(&layout.list_file(), &[gone.clone()]).unwrap();
        assert!(remove_watched_path(&layout, &gone).unwrap());
    }
}
