use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::ScanOptions;
use super::errors::ScanError;

/// Visit every regular file reachable from `roots`.
///
/// Explicit file roots are visited directly. Directory roots are walked only
/// when `options.recursive` is set; entries are visited in name order and
/// symlinks found while walking are skipped. A root whose metadata cannot be
/// read, and a subdirectory that cannot be listed, are logged and skipped; a
/// directory root that cannot be listed is an error. Returns how many were
/// skipped.
pub fn visit_inputs(
    roots: &[PathBuf],
    options: &ScanOptions,
    visitor: &mut impl FnMut(&Path) -> Result<(), ScanError>,
) -> Result<usize, ScanError> {
    let mut skipped = 0usize;
    for root in roots {
        let meta = match fs::metadata(root) {
            Ok(meta) => meta,
            Err(err) => {
                warn!(path = %root.display(), error = %err, "Failed to read input");
                skipped += 1;
                continue;
            }
        };
        if meta.is_file() {
            visitor(root)?;
        } else if meta.is_dir() {
            if options.recursive {
                skipped += visit_dir(root, visitor)?;
            } else {
                warn!(path = %root.display(), "Is a directory");
                skipped += 1;
            }
        } else {
            warn!(path = %root.display(), "Not a regular file");
            skipped += 1;
        }
    }
    Ok(skipped)
}

pub(super) fn visit_dir(
    root: &Path,
    visitor: &mut impl FnMut(&Path) -> Result<(), ScanError>,
) -> Result<usize, ScanError> {
    let mut skipped = 0usize;
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) if dir != root => {
                warn!(
                    dir = %dir.display(),
                    error = %source,
                    "Failed to read directory during scan"
                );
                skipped += 1;
                continue;
            }
            Err(source) => {
                return Err(ScanError::Io {
                    path: dir.clone(),
                    source,
                });
            }
        };
        let mut files = Vec::new();
        let mut subdirs = Vec::new();
        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(
                        dir = %dir.display(),
                        error = %err,
                        "Failed to read directory entry during scan"
                    );
                    continue;
                }
            };

            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "Failed to read file type during scan"
                    );
                    continue;
                }
            };
            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_dir() {
                subdirs.push(path);
            } else if file_type.is_file() {
                files.push(path);
            }
        }
        files.sort();
        for path in &files {
            visitor(path)?;
        }
        subdirs.sort();
        stack.extend(subdirs.into_iter().rev());
    }
    Ok(skipped)
}
