use crate::config::FileFilter;
use crate::error::{AggregateError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A regular file found below the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as reached from the source argument.
    pub path: PathBuf,
    /// Path relative to the source root; used in markers and for ordering.
    pub relative: PathBuf,
}

/// Recursively collects the regular files under `source_dir`, sorted by
/// relative path.
///
/// Symlinks to files count as files, symlinked directories are not entered.
/// `exclude` names a file that must never be collected (the output file when
/// it lives inside the source tree). A directory or entry that cannot be read
/// aborts the walk.
pub fn discover_files(
    source_dir: &Path,
    filter: &FileFilter,
    exclude: Option<&Path>,
) -> Result<Vec<SourceFile>> {
    let excluded = exclude.and_then(|path| path.canonicalize().ok());

    let walker = WalkDir::new(source_dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            // Never prune the root itself
            entry.depth() == 0 || !filter.is_ignored(relative_to(source_dir, entry.path()))
        });

    let mut files = Vec::new();

    for entry in walker {
        let entry = entry.map_err(|source| AggregateError::Walk {
            path: source.path().unwrap_or(source_dir).to_path_buf(),
            source,
        })?;

        let path = entry.path();
        if entry.file_type().is_dir() || !path.is_file() {
            continue;
        }

        if !filter.accepts_extension(path) {
            continue;
        }

        if let Some(excluded) = &excluded {
            let same = path.file_name() == excluded.file_name()
                && path.canonicalize().map(|c| c == *excluded).unwrap_or(false);
            if same {
                debug!("Not aggregating the output file itself: {}", path.display());
                continue;
            }
        }

        files.push(SourceFile {
            path: path.to_path_buf(),
            relative: relative_to(source_dir, path).to_path_buf(),
        });
    }

    // Plain byte order of the relative path, not component order
    files.sort_by(|a, b| a.relative.as_os_str().cmp(b.relative.as_os_str()));
    Ok(files)
}

fn relative_to<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
