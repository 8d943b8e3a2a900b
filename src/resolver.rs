use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{
    ast::{Expr, ExprKind, Literal},
    error::{CompileError, CompileResult},
    field_type::FieldType,
};

/// Declared field paths and their types, for schema-aware compilation.
///
/// Deserializes from a JSON object of `path -> type tag`:
///
/// ```
/// use pql_lang::FieldSchema;
///
/// let schema: FieldSchema =
///     serde_json::from_str(r#"{"hostname": "string", "adapters": "list<dict>"}"#).unwrap();
/// assert!(schema.contains("adapters"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    fields: BTreeMap<String, FieldType>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, path: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(path.into(), field_type);
        self
    }

    pub fn get(&self, path: &str) -> Option<&FieldType> {
        self.fields.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    /// All declared paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, FieldType)> for FieldSchema {
    fn from_iter<I: IntoIterator<Item = (S, FieldType)>>(iter: I) -> Self {
        FieldSchema {
            fields: iter.into_iter().map(|(path, t)| (path.into(), t)).collect(),
        }
    }
}

/// Resolves the left operand of a comparison to a field path and a type.
#[derive(Debug, Clone)]
pub enum Resolver {
    /// Every field exists and is `Generic`.
    SchemaFree,
    /// Fields must be declared; their declared type is used.
    SchemaAware(FieldSchema),
}

impl Resolver {
    /// Field path named by `node` and the type that translates its conditions.
    pub fn resolve(&self, node: &Expr) -> CompileResult<(String, FieldType)> {
        let field = field_path(node)?;
        let field_type = match self {
            Resolver::SchemaFree => FieldType::Generic,
            Resolver::SchemaAware(schema) => match schema.get(&field) {
                Some(field_type) => field_type.clone(),
                None => {
                    return Err(CompileError::FieldNotFound {
                        suggestions: schema.paths().map(str::to_string).collect(),
                        field,
                        offset: node.offset,
                    });
                }
            },
        };
        Ok((field, field_type))
    }
}

/// Dotted field path of a field reference.
///
/// `hostname` -> `"hostname"`, `os.type` -> `"os.type"`. A string literal
/// names a path directly, for segments that are not identifiers.
pub fn field_path(node: &Expr) -> CompileResult<String> {
    match &node.kind {
        ExprKind::Identifier(name) => Ok(name.clone()),
        ExprKind::Attribute { base, name } => Ok(format!("{}.{}", field_path(base)?, name)),
        ExprKind::Literal(Literal::String(path)) => Ok(path.clone()),
        _ => Err(CompileError::unsupported(
            format!("{} as field reference", node.describe()),
            node.offset,
        )),
    }
}
