//! Projection-mode compiler entry point.
//!
//! Turns an expression tree into a condition that is valid inside an
//! aggregation expression (for example the `cond` of a `$filter` stage or a
//! computed `$project` field).
//!
//! # Examples
//!
//! ```
//! use pql_lang::{FieldSets, compile_projection};
//! use serde_json::json;
//!
//! let fields = FieldSets::default();
//! let fragment = compile_projection("hostname == 'db01'", &fields).unwrap();
//! assert_eq!(fragment, json!({ "$eq": ["$hostname", "db01"] }));
//! ```

use serde_json::{Value, json};

use crate::{
    ast::{CompareOp, Expr, ExprKind},
    context::{FieldSets, TranslationContext},
    elevation::elevate,
    error::{CompileError, CompileResult},
    functions::{self, Call, TOP_LEVEL_FUNCTIONS},
    parser,
    resolver::{FieldSchema, Resolver},
};

/// Keys that make a fragment composite for the purpose of `not`.
const COMPOSITE_KEYS: &[&str] = &["$and", "$or", "$nor", "$not", "$text"];

/// Compiles filter expressions in projection mode.
///
/// The resolver is fixed at construction. The compiler holds no other state,
/// so one instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct ProjectionCompiler {
    resolver: Resolver,
}

impl ProjectionCompiler {
    /// Compiler that accepts any field and treats every field as `Generic`.
    pub fn schema_free() -> Self {
        ProjectionCompiler {
            resolver: Resolver::SchemaFree,
        }
    }

    /// Compiler that only accepts declared fields and uses their types.
    pub fn schema_aware(schema: FieldSchema) -> Self {
        ProjectionCompiler {
            resolver: Resolver::SchemaAware(schema),
        }
    }

    /// Parse `source` and compile it.
    #[tracing::instrument(level = "debug", skip(self, fields))]
    pub fn compile(&self, source: &str, fields: &FieldSets) -> CompileResult<Value> {
        let expr = parser::parse(source)?;
        self.translate(&expr, TranslationContext::new(fields))
    }

    /// Compile an already parsed expression.
    pub fn translate(&self, node: &Expr, ctx: TranslationContext<'_>) -> CompileResult<Value> {
        match &node.kind {
            ExprKind::Call {
                target,
                args,
                keywords,
            } => self.translate_call(&Call::new(target, args, keywords, node.offset)),
            ExprKind::BoolOp { op, operands } => {
                let translated = operands
                    .iter()
                    .map(|operand| self.translate(operand, ctx))
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(json!({ op.backend_key(): translated }))
            }
            ExprKind::Not(operand) => self.translate_not(operand, ctx),
            ExprKind::Compare { left, comparisons } => match comparisons.as_slice() {
                [(op, right)] => self.translate_compare(left, *op, right, ctx),
                [_, (_, second), ..] => Err(CompileError::InvalidComparatorCount {
                    count: comparisons.len(),
                    offset: second.offset,
                }),
                [] => Err(CompileError::InvalidComparatorCount {
                    count: 0,
                    offset: node.offset,
                }),
            },
            ExprKind::Literal(_)
            | ExprKind::Identifier(_)
            | ExprKind::Attribute { .. }
            | ExprKind::List(_)
            | ExprKind::Dict(_) => Err(CompileError::unsupported(
                format!("{} as a condition", node.describe()),
                node.offset,
            )),
        }
    }

    fn translate_call(&self, call: &Call<'_>) -> CompileResult<Value> {
        match call.target {
            "search" => functions::translate_search(call),
            target => Err(CompileError::unsupported_with_options(
                format!("method call {}()", target),
                call.offset,
                TOP_LEVEL_FUNCTIONS.iter().copied(),
            )),
        }
    }

    /// `not` over a single `{key: value}` condition.
    fn translate_not(&self, operand: &Expr, ctx: TranslationContext<'_>) -> CompileResult<Value> {
        let translated = self.translate(operand, ctx)?;

        match translated {
            Value::Object(map) if map.len() == 1 => {
                let composite = map.keys().any(|key| COMPOSITE_KEYS.contains(&key.as_str()));
                if composite {
                    return Err(CompileError::unsupported_with_options(
                        "not over a composite condition",
                        operand.offset,
                        ["not <field> == <value>"],
                    ));
                }
                Ok(json!({ "$not": Value::Object(map) }))
            }
            _ => Err(CompileError::unsupported(
                "not over a condition that is not a single field comparison",
                operand.offset,
            )),
        }
    }

    fn translate_compare(
        &self,
        left: &Expr,
        op: CompareOp,
        right: &Expr,
        ctx: TranslationContext<'_>,
    ) -> CompileResult<Value> {
        let (field, field_type) = self.resolver.resolve(left)?;
        tracing::trace!(%field, %field_type, %op, "translating comparison");

        let inner = ctx.with_compared_field(&field);
        match field_type.translate_operator(op, right, inner) {
            Ok(condition) => Ok(elevate(&field, condition, ctx.fields())),
            Err(CompileError::OperatorMismatch { .. }) => {
                tracing::debug!(%field, "right-hand side is a field, comparing field to field");
                self.translate_field_comparison(&field, op, right)
            }
            Err(e) => Err(e),
        }
    }

    /// `left <op> right` where both sides are fields:
    /// `{"$eq": ["$<left>", "$<right>"]}`.
    ///
    /// Runs outside the translation context, so both references are
    /// root-scoped and the result is never elevated.
    fn translate_field_comparison(&self, left: &str, op: CompareOp, right: &Expr) -> CompileResult<Value> {
        let (right_field, right_type) = self.resolver.resolve(right)?;
        let symbol = right_type.operator_symbol(op).ok_or_else(|| {
            CompileError::unsupported(format!("operator '{}' between fields", op), right.offset)
        })?;

        Ok(json!({ symbol: [format!("${}", left), format!("${}", right_field)] }))
    }
}

impl Default for ProjectionCompiler {
    fn default() -> Self {
        Self::schema_free()
    }
}

/// Compile `source` in projection mode without a schema.
pub fn compile_projection(source: &str, fields: &FieldSets) -> CompileResult<Value> {
    ProjectionCompiler::schema_free().compile(source, fields)
}

/// Compile `source` in projection mode, validating fields against `schema`.
pub fn compile_projection_with_schema(
    source: &str,
    schema: &FieldSchema,
    fields: &FieldSets,
) -> CompileResult<Value> {
    ProjectionCompiler::schema_aware(schema.clone()).compile(source, fields)
}
