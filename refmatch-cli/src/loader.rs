//! Local stand-in for the reference object store: walks a directory and
//! turns every file into a `ReferenceImage` keyed by its relative path.

use refmatch::ReferenceImage;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Loads every non-hidden file under `root`, sorted by key.
///
/// Keys are the `/`-joined path relative to `root`, so the first directory
/// level becomes the category.
pub fn load_reference_dir(root: &Path) -> io::Result<Vec<ReferenceImage>> {
    let mut files = Vec::new();
    collect_files(root, &mut files)?;
    files.sort();

    let mut images = Vec::with_capacity(files.len());
    for path in files {
        let Some(key) = relative_key(root, &path) else {
            continue;
        };
        let bytes = fs::read(&path)?;
        images.push(ReferenceImage::from_key(key, bytes));
    }
    Ok(images)
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if is_hidden(&path) {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&path, out)?;
        } else if file_type.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}
