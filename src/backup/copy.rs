//! Recursive copy and removal helpers used by snapshots and restores.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{classify_io_error, GuardError, GuardResult, IoResultExt, SystemError};

/// Recursively copy the directory `src` into `dst`.
///
/// `dst` is created if missing. Entries under `exclude` (typically the
/// backup root when a watched directory contains it) are skipped. Symbolic
/// links are recreated as links on Unix rather than followed.
pub fn copy_tree(src: &Path, dst: &Path, exclude: Option<&Path>) -> GuardResult<u64> {
    if !src.is_dir() {
        return Err(SystemError::DirectoryNotFound {
            path: src.to_path_buf(),
        }
        .into());
    }
    fs::create_dir_all(dst).with_path(dst, "create dir")?;
    let mut copied = 0u64;

    let walker = WalkDir::new(src)
        .follow_links(false)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| exclude.is_none_or(|ex| !entry.path().starts_with(ex)));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            let io_err = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop"));
            GuardError::System(classify_io_error(io_err, Some(path), "walk dir"))
        })?;

        let relative = match entry.path().strip_prefix(src) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).with_path(&target, "create dir")?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            copied += 1;
        } else {
            fs::copy(entry.path(), &target).with_path(&target, "copy file")?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> GuardResult<()> {
    let link = fs::read_link(src).with_path(src, "read link")?;
    std::os::unix::fs::symlink(link, dst).with_path(dst, "create link")
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> GuardResult<()> {
    tracing::warn!("Copying symlink target of {} as a regular file", src.display());
    fs::copy(src, dst).map(|_| ()).with_path(dst, "copy file")
}

/// Remove whatever exists at `path`. Missing paths are not an error.
pub fn remove_path(path: &Path) -> GuardResult<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).with_path(path, "stat"),
    };
    if meta.is_dir() {
        fs::remove_dir_all(path).with_path(path, "remove dir")
    } else {
        fs::remove_file(path).with_path(path, "remove file")
    }
}
