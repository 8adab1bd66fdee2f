use crate::error::{AggregateError, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Which discovered files make it into the output.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    pub extensions: Vec<String>,
    pub ignore: Vec<Pattern>,
}

impl FileFilter {
    pub fn new(extensions: &[String], ignore_patterns: &[String]) -> Result<Self> {
        let extensions = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();

        let ignore = ignore_patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| AggregateError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { extensions, ignore })
    }

    /// Checks an entry below the source root against the ignore patterns,
    /// by file name and by relative path.
    pub fn is_ignored(&self, relative: &Path) -> bool {
        if self.ignore.is_empty() {
            return false;
        }

        let name = relative.file_name().unwrap_or_default().to_string_lossy();
        let relative = relative.to_string_lossy();

        self.ignore
            .iter()
            .any(|pattern| pattern.matches(&name) || pattern.matches(&relative))
    }

    pub fn accepts_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }

        let ext = path.extension().unwrap_or_default().to_string_lossy();
        self.extensions.iter().any(|e| ext == e.as_str())
    }
}

/// Validated inputs of one aggregation run.
#[derive(Debug, Clone)]
pub struct AggregateConfig {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub output_name: PathBuf,
    pub filter: FileFilter,
}

impl AggregateConfig {
    /// Checks path syntax only; nothing on disk is touched yet.
    pub fn new(
        source_dir: impl Into<PathBuf>,
        destination_dir: impl Into<PathBuf>,
        output_name: impl Into<PathBuf>,
    ) -> Result<Self> {
        let source_dir = source_dir.into();
        let destination_dir = destination_dir.into();
        let output_name = output_name.into();

        check_path_syntax("source", &source_dir)?;
        check_path_syntax("destination", &destination_dir)?;
        check_path_syntax("output file", &output_name)?;

        if output_name.file_name().is_none() {
            return Err(AggregateError::InvalidPath {
                name: "output file",
                value: output_name.display().to_string(),
                reason: "does not name a file",
            });
        }

        Ok(Self {
            source_dir,
            destination_dir,
            output_name,
            filter: FileFilter::default(),
        })
    }

    pub fn with_filter(mut self, filter: FileFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn output_path(&self) -> PathBuf {
        self.destination_dir.join(&self.output_name)
    }

    pub fn validate_source(&self) -> Result<()> {
        if !self.source_dir.is_dir() {
            return Err(AggregateError::SourceNotDirectory(self.source_dir.clone()));
        }
        Ok(())
    }

    /// Creates the destination directory (and parents) when it is missing.
    pub fn prepare_destination(&self) -> Result<()> {
        let dest = &self.destination_dir;

        if !dest.exists() {
            fs::create_dir_all(dest).map_err(|source| AggregateError::CreateDestination {
                path: dest.clone(),
                source,
            })?;
            info!("Created destination directory: {}", absolute(dest).display());
        } else if !dest.is_dir() {
            return Err(AggregateError::DestinationNotDirectory(dest.clone()));
        }

        Ok(())
    }
}

fn check_path_syntax(name: &'static str, path: &Path) -> Result<()> {
    let raw = path.as_os_str();

    let reason = if raw.is_empty() {
        "path is empty"
    } else if raw.as_encoded_bytes().contains(&0) {
        "path contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(AggregateError::InvalidPath {
        name,
        value: path.display().to_string(),
        reason,
    })
}

/// Best-effort absolute form of `path`, for log lines.
pub(crate) fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
