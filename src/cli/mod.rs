//! CLI support for pql-lang
//!
//! Provides programmatic access to the `pql` command so other tools can
//! embed it without shelling out.

mod compile;
mod docs;

pub use compile::{CompileOptions, CompileOutcome, execute_compile, load_schema};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::{io, path::PathBuf};

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Compilation error (including syntax errors)
    #[error("{0}")]
    Compile(#[from] crate::CompileError),

    /// Schema file is not a valid field schema
    #[error("Invalid schema {path}: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the fragment failed
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No expression provided
    #[error("No expression provided. Pass it as an argument or pipe it to stdin.")]
    NoInput,

    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'pql docs' to see available categories.")]
    UnknownCategory(String),
}

impl CliError {
    /// Full report for stderr: message, offset marker and suggestions.
    pub fn report(&self, source: Option<&str>) -> String {
        let mut report = self.to_string();

        if let CliError::Compile(e) = self {
            if let Some(source) = source {
                let marker: String = source
                    .chars()
                    .take(e.offset())
                    .map(|c| if c == '\t' { '\t' } else { ' ' })
                    .collect();
                report.push_str(&format!("\n  {}\n  {}^", source, marker));
            }
            if let Some(options) = e.options().filter(|o| !o.is_empty()) {
                report.push_str(&format!("\nOptions: {}", options.join(", ")));
            }
        }
        report
    }
}
