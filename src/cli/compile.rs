//! Compile PQL expressions from the command line

use std::{
    fs,
    path::{Path, PathBuf},
};

use super::CliError;
use crate::{FieldSchema, FieldSets, ProjectionCompiler, parser};

/// Options for the compile command
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// The PQL expression to compile
    pub expression: String,
    /// Field paths holding arrays
    pub array_fields: Vec<String>,
    /// Field paths holding sub-documents
    pub complex_fields: Vec<String>,
    /// JSON field schema; enables schema-aware compilation
    pub schema: Option<PathBuf>,
    /// Only validate syntax, don't compile
    pub syntax_only: bool,
}

/// Result of a compile operation
#[derive(Debug)]
pub enum CompileOutcome {
    /// Syntax validation passed
    SyntaxValid,
    /// Compiled fragment
    Fragment(serde_json::Value),
}

/// Load a `{"path": "type"}` schema file.
pub fn load_schema(path: &Path) -> Result<FieldSchema, CliError> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| CliError::Schema {
        path: path.to_path_buf(),
        source,
    })
}

/// Execute a pql compile operation
pub fn execute_compile(options: &CompileOptions) -> Result<CompileOutcome, CliError> {
    if options.syntax_only {
        parser::parse(&options.expression).map_err(crate::CompileError::from)?;
        return Ok(CompileOutcome::SyntaxValid);
    }

    let compiler = match &options.schema {
        Some(path) => ProjectionCompiler::schema_aware(load_schema(path)?),
        None => ProjectionCompiler::schema_free(),
    };
    let fields = FieldSets::new(&options.array_fields, &options.complex_fields);

    let fragment = compiler.compile(&options.expression, &fields)?;
    Ok(CompileOutcome::Fragment(fragment))
}
