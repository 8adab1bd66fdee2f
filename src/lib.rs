pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod walk;

// Re-export commonly used types
pub use aggregate::{
    aggregate_files, begin_marker, end_marker, read_error_placeholder, run_aggregation,
    write_file_section, AggregateReport, SectionOutcome,
};
pub use config::{AggregateConfig, FileFilter};
pub use error::{AggregateError, Result};
pub use walk::{discover_files, SourceFile};
