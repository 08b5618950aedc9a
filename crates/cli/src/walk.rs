//! Breadth-first directory traversal yielding the files to scan.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Visits every regular file under `path` (or `path` itself when it is a
/// file), skipping symlinks and whatever `excludes` rejects.
///
/// Directory entries are visited in name order so two walks of the same
/// tree produce the same sequence.
pub fn visit<F, C>(path: &Path, excludes: &F, callback: &mut C) -> anyhow::Result<()>
where
    F: Fn(&Path) -> bool,
    C: FnMut(&Path) -> anyhow::Result<()>,
{
    let mut pending: VecDeque<PathBuf> = VecDeque::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    pending.push_back(path.to_path_buf());

    while let Some(current) = pending.pop_front() {
        if !visited.insert(current.clone()) {
            continue;
        }
        if excludes(&current) {
            debug!(path = %current.display(), "Path excluded");
            continue;
        }
        let metadata = match fs::symlink_metadata(&current) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                debug!(path = %current.display(), "Permission denied");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            debug!(path = %current.display(), "Symlink skipped");
            continue;
        }
        if file_type.is_file() {
            debug!(path = %current.display(), "File discovered");
            callback(&current)?;
        } else if file_type.is_dir() {
            debug!(path = %current.display(), "Entering directory");
            let entries = match fs::read_dir(&current) {
                Ok(e) => e,
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                    debug!(path = %current.display(), "Permission denied");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let mut children = Vec::new();
            for entry in entries {
                match entry {
                    Ok(e) => children.push(e.path()),
                    Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                        debug!(path = %current.display(), "Permission denied");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            children.sort();
            pending.extend(children);
        }
    }

    Ok(())
}

/// PHP files under `root` that survive the exclusion patterns, in walk
/// order.
pub fn collect_php_files<F>(root: &Path, excludes: &F) -> anyhow::Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let mut files = Vec::new();
    visit(root, excludes, &mut |p| {
        if parsers::detect_type(p).is_some() {
            files.push(p.to_path_buf());
        }
        Ok(())
    })?;
    Ok(files)
}
