use crate::config::{absolute, AggregateConfig};
use crate::error::{AggregateError, Result};
use crate::walk::{discover_files, SourceFile};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Line that opens a file's section.
pub fn begin_marker(relative: &Path) -> String {
    format!("/* === Begin file: {} === */", relative.display())
}

/// Line that closes a file's section.
pub fn end_marker(relative: &Path) -> String {
    format!("/* === End file: {} === */", relative.display())
}

/// Comment written in place of content that could not be read.
pub fn read_error_placeholder(path: &Path, err: &io::Error) -> String {
    format!("/* !!! Error reading file: {} ({}) !!! */", path.display(), err)
}

/// What happened to one file's content.
#[derive(Debug)]
pub enum SectionOutcome {
    Copied { lines: usize },
    /// Reading stopped early; the placeholder was written in its place.
    ReadFailed(io::Error),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AggregateReport {
    pub files_written: usize,
    pub files_failed: usize,
}

impl AggregateReport {
    pub fn total_processed(&self) -> usize {
        self.files_written + self.files_failed
    }
}

enum CopyError {
    Read(io::Error),
    Write(io::Error),
}

fn copy_lines<W: Write>(out: &mut W, path: &Path) -> std::result::Result<usize, CopyError> {
    let file = File::open(path).map_err(CopyError::Read)?;
    let mut reader = BufReader::new(file);
    let mut chunk = Vec::new();
    let mut copied = 0;

    loop {
        chunk.clear();
        if reader.read_until(b'\n', &mut chunk).map_err(CopyError::Read)? == 0 {
            break;
        }

        for line in split_lines(&chunk) {
            let line = std::str::from_utf8(line)
                .map_err(|err| CopyError::Read(io::Error::new(io::ErrorKind::InvalidData, err)))?;
            writeln!(out, "{}", line).map_err(CopyError::Write)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Splits a chunk ending at `\n` (or EOF) into lines terminated by `\n`,
/// `\r\n` or a lone `\r`.
fn split_lines(chunk: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = chunk.strip_suffix(b"\n").unwrap_or(chunk);
    let body = body.strip_suffix(b"\r").unwrap_or(body);
    body.split(|&b| b == b'\r')
}

/// Writes the begin marker, the file's lines and the end marker.
///
/// A read failure is logged and turned into an inline placeholder; only
/// failures writing to `out` are returned as errors.
pub fn write_file_section<W: Write>(out: &mut W, file: &SourceFile) -> io::Result<SectionOutcome> {
    writeln!(out, "{}", begin_marker(&file.relative))?;
    writeln!(out)?;

    let outcome = match copy_lines(out, &file.path) {
        Ok(lines) => SectionOutcome::Copied { lines },
        Err(CopyError::Write(err)) => return Err(err),
        Err(CopyError::Read(err)) => {
            warn!("Failed to read file {}: {}", file.path.display(), err);
            writeln!(out)?;
            writeln!(out, "{}", read_error_placeholder(&file.path, &err))?;
            SectionOutcome::ReadFailed(err)
        }
    };

    writeln!(out)?;
    writeln!(out, "{}", end_marker(&file.relative))?;
    writeln!(out)?;

    Ok(outcome)
}

/// Writes one section per file, in the order given.
pub fn aggregate_files<W: Write>(out: &mut W, files: &[SourceFile]) -> io::Result<AggregateReport> {
    let mut report = AggregateReport::default();

    for file in files {
        info!("Adding file: {}", file.relative.display());

        match write_file_section(out, file)? {
            SectionOutcome::Copied { .. } => report.files_written += 1,
            SectionOutcome::ReadFailed(_) => report.files_failed += 1,
        }
    }

    Ok(report)
}

/// Validates the configured paths, then writes the aggregated output file.
///
/// The output file is truncated if it already exists. Nothing is created on
/// disk when the source directory is invalid.
pub fn run_aggregation(config: &AggregateConfig) -> Result<AggregateReport> {
    config.validate_source()?;
    config.prepare_destination()?;

    let output_path = config.output_path();

    let output = File::create(&output_path).map_err(|source| AggregateError::OpenOutput {
        path: output_path.clone(),
        source,
    })?;

    info!("Source directory: {}", absolute(&config.source_dir).display());
    info!("Output file:      {}", absolute(&output_path).display());

    let files = discover_files(&config.source_dir, &config.filter, Some(&output_path))?;
    info!("Processing {} files...", files.len());

    let mut writer = BufWriter::new(output);
    let report = aggregate_files(&mut writer, &files)
        .and_then(|report| writer.flush().map(|_| report))
        .map_err(|source| AggregateError::Write {
            path: output_path.clone(),
            source,
        })?;

    info!(
        written = report.files_written,
        failed = report.files_failed,
        "Aggregation complete. Output written to: {}",
        absolute(&output_path).display()
    );

    Ok(report)
}
