//! Field-type dispatch.
//!
//! Each [`FieldType`] decides which right-hand sides it accepts for a
//! comparison and how they render as backend conditions:
//!
//! - scalar literals render as `{"$eq": [<field-ref>, <literal>]}`
//! - list literals render as `{"$eq": [<field-ref>, [<items>]]}`
//! - dict literals decompose into `{"$and": [{<key>: <value>}, ...]}`
//! - calls go to the type's own function translators
//!
//! `Generic` is the union of every capability and is what schema-free
//! compilation uses for all fields.

use std::{fmt, str::FromStr};

use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    ast::{CompareOp, Expr, ExprKind, Literal},
    context::TranslationContext,
    error::{CompileError, CompileResult},
    functions::{self, Call, Function},
};

/// Declared type of a field.
///
/// Parsed from the tags `generic`, `string`, `int`, `bool`, `list`, `dict`,
/// `list<T>` and `dict<T>`. A bare `list`/`dict` has `generic` elements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum FieldType {
    Generic,
    String,
    Int,
    Bool,
    /// Array field; the box holds the element type
    List(Box<FieldType>),
    /// Embedded document; the box holds the value type
    Dict(Box<FieldType>),
}

static GENERIC: FieldType = FieldType::Generic;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field type '{0}' (expected generic, string, int, bool, list, dict, list<T> or dict<T>)")]
pub struct FieldTypeParseError(pub String);

impl FromStr for FieldType {
    type Err = FieldTypeParseError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim();
        let nested = |inner: &str| -> Result<Box<FieldType>, FieldTypeParseError> {
            inner
                .parse::<FieldType>()
                .map(Box::new)
                .map_err(|_| FieldTypeParseError(tag.to_string()))
        };

        match tag {
            "generic" => Ok(FieldType::Generic),
            "string" => Ok(FieldType::String),
            "int" => Ok(FieldType::Int),
            "bool" => Ok(FieldType::Bool),
            "list" => Ok(FieldType::List(Box::new(FieldType::Generic))),
            "dict" => Ok(FieldType::Dict(Box::new(FieldType::Generic))),
            _ => {
                if let Some(inner) = tag.strip_prefix("list<").and_then(|s| s.strip_suffix('>')) {
                    Ok(FieldType::List(nested(inner)?))
                } else if let Some(inner) = tag.strip_prefix("dict<").and_then(|s| s.strip_suffix('>')) {
                    Ok(FieldType::Dict(nested(inner)?))
                } else {
                    Err(FieldTypeParseError(tag.to_string()))
                }
            }
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = FieldTypeParseError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Generic => f.write_str("generic"),
            FieldType::String => f.write_str("string"),
            FieldType::Int => f.write_str("int"),
            FieldType::Bool => f.write_str("bool"),
            FieldType::List(inner) => write!(f, "list<{}>", inner),
            FieldType::Dict(inner) => write!(f, "dict<{}>", inner),
        }
    }
}

/// Shape of a right-hand literal, used to pick the accepting capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiteralKind {
    String,
    Integer,
    Float,
    Boolean,
    Null,
    List,
    Dict,
}

impl LiteralKind {
    fn of(expr: &Expr) -> Option<Self> {
        match &expr.kind {
            ExprKind::Literal(Literal::String(_)) => Some(LiteralKind::String),
            ExprKind::Literal(Literal::Integer(_)) => Some(LiteralKind::Integer),
            ExprKind::Literal(Literal::Float(_)) => Some(LiteralKind::Float),
            ExprKind::Literal(Literal::Boolean(_)) => Some(LiteralKind::Boolean),
            ExprKind::Literal(Literal::Null) => Some(LiteralKind::Null),
            ExprKind::List(_) => Some(LiteralKind::List),
            ExprKind::Dict(_) => Some(LiteralKind::Dict),
            _ => None,
        }
    }
}

/// One slice of what a field type can translate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capability {
    Int,
    Bool,
    String,
    List,
    Dict,
}

/// Order in which `Generic` tries its capabilities.
const GENERIC_PRECEDENCE: [Capability; 5] = [
    Capability::Int,
    Capability::Bool,
    Capability::String,
    Capability::List,
    Capability::Dict,
];

impl Capability {
    fn accepts(self, kind: LiteralKind) -> bool {
        use LiteralKind as K;
        match self {
            Capability::Int => matches!(kind, K::Integer | K::Float | K::Null),
            Capability::Bool => matches!(kind, K::Boolean | K::Null),
            Capability::String => matches!(kind, K::String | K::Null),
            Capability::List => matches!(kind, K::List | K::Null),
            Capability::Dict => matches!(kind, K::Dict | K::Null),
        }
    }

    fn literal_names(self) -> &'static [&'static str] {
        match self {
            Capability::Int => &["integer", "float", "null"],
            Capability::Bool => &["bool", "null"],
            Capability::String => &["string", "null"],
            Capability::List => &["list", "null"],
            Capability::Dict => &["dict", "null"],
        }
    }
}

/// Comparison operator to backend operator symbol.
///
/// Only equality is translated today; adding a pair here is enough to make
/// another comparator available to every field type.
const OPERATORS: &[(CompareOp, &str)] = &[(CompareOp::Eq, "$eq")];

impl FieldType {
    fn capabilities(&self) -> &'static [Capability] {
        match self {
            FieldType::Generic => &GENERIC_PRECEDENCE,
            FieldType::String => &[Capability::String],
            FieldType::Int => &[Capability::Int],
            FieldType::Bool => &[Capability::Bool],
            FieldType::List(_) => &[Capability::List],
            FieldType::Dict(_) => &[Capability::Dict],
        }
    }

    /// Type used for list items and dict values.
    fn nested(&self) -> &FieldType {
        match self {
            FieldType::List(inner) | FieldType::Dict(inner) => inner,
            _ => &GENERIC,
        }
    }

    /// The handler that takes a literal of `kind`: this type when one of its
    /// own capabilities accepts it, otherwise a list's element type.
    fn handler_for(&self, kind: LiteralKind) -> Option<(&FieldType, Capability)> {
        if let Some(capability) = self.capabilities().iter().find(|c| c.accepts(kind)) {
            return Some((self, *capability));
        }
        match self {
            FieldType::List(inner) => inner.handler_for(kind),
            _ => None,
        }
    }

    fn accepted_literals(&self) -> Vec<String> {
        let mut names: Vec<String> = vec![];
        let mut current = Some(self);
        while let Some(field_type) = current {
            for capability in field_type.capabilities() {
                for name in capability.literal_names() {
                    if !names.iter().any(|n| n == name) {
                        names.push(name.to_string());
                    }
                }
            }
            current = match field_type {
                FieldType::List(inner) => Some(inner),
                _ => None,
            };
        }
        names
    }

    /// Function translators this type owns.
    pub fn functions(&self) -> Vec<Function> {
        match self {
            FieldType::Generic | FieldType::String => vec![Function::Exists, Function::RegexMatch],
            FieldType::Int | FieldType::Bool | FieldType::Dict(_) => vec![Function::Exists],
            FieldType::List(inner) => {
                let mut functions = vec![Function::Exists];
                functions.extend(inner.functions().into_iter().filter(|f| *f != Function::Exists));
                functions
            }
        }
    }

    pub fn operator_symbol(&self, op: CompareOp) -> Option<&'static str> {
        OPERATORS
            .iter()
            .find(|(candidate, _)| *candidate == op)
            .map(|(_, symbol)| *symbol)
    }

    /// Translate `right` as the right-hand side of `<compared field> <op> right`.
    pub fn translate_operator(
        &self,
        op: CompareOp,
        right: &Expr,
        ctx: TranslationContext<'_>,
    ) -> CompileResult<Value> {
        let symbol = self.operator_symbol(op).ok_or_else(|| {
            CompileError::unsupported_with_options(
                format!("operator '{}' for {} field", op, self),
                right.offset,
                OPERATORS.iter().map(|(op, _)| op.symbol()),
            )
        })?;
        self.translate(right, symbol, ctx)
    }

    /// Translate a right-hand side node under operator `symbol`.
    ///
    /// Field references fail with [`CompileError::OperatorMismatch`] so the
    /// caller can switch to field-to-field comparison.
    pub fn translate(&self, node: &Expr, symbol: &str, ctx: TranslationContext<'_>) -> CompileResult<Value> {
        match &node.kind {
            ExprKind::Identifier(_) | ExprKind::Attribute { .. } => {
                Err(CompileError::OperatorMismatch { offset: node.offset })
            }
            ExprKind::Call {
                target,
                args,
                keywords,
            } => {
                let call = Call::new(target, args, keywords, node.offset);
                let function = self
                    .functions()
                    .into_iter()
                    .find(|f| f.name() == target.as_str())
                    .ok_or_else(|| {
                        CompileError::unsupported_with_options(
                            format!("function '{}' for {} field", target, self),
                            node.offset,
                            self.functions().iter().map(|f| f.name()),
                        )
                    })?;
                functions::translate(function, &call, ctx)
            }
            ExprKind::Literal(_) | ExprKind::List(_) | ExprKind::Dict(_) => {
                self.translate_literal(node, symbol, ctx)
            }
            ExprKind::Not(_) | ExprKind::BoolOp { .. } | ExprKind::Compare { .. } => {
                Err(CompileError::unsupported_with_options(
                    format!("{} on the right-hand side of a comparison", node.describe()),
                    node.offset,
                    self.accepted_literals(),
                ))
            }
        }
    }

    /// Like [`translate`](Self::translate), for nodes nested inside a literal
    /// or a call. A field reference there is not a field-to-field comparison.
    pub(crate) fn translate_nested(
        &self,
        node: &Expr,
        symbol: &str,
        ctx: TranslationContext<'_>,
    ) -> CompileResult<Value> {
        self.translate(node, symbol, ctx).map_err(|e| match e {
            CompileError::OperatorMismatch { offset } => CompileError::unsupported(
                format!("{} inside a literal or call argument", node.describe()),
                offset,
            ),
            other => other,
        })
    }

    fn translate_literal(&self, node: &Expr, symbol: &str, ctx: TranslationContext<'_>) -> CompileResult<Value> {
        let rejected = || {
            CompileError::unsupported_with_options(
                format!("{} for {} field", node.describe(), self),
                node.offset,
                self.accepted_literals(),
            )
        };
        let kind = LiteralKind::of(node).ok_or_else(rejected)?;
        let (handler, capability) = self.handler_for(kind).ok_or_else(rejected)?;

        match (&node.kind, capability) {
            (ExprKind::List(items), Capability::List) => {
                let element = handler.nested();
                let raw = ctx.without_compared_field();
                let values = items
                    .iter()
                    .map(|item| match item.kind {
                        ExprKind::Literal(_) | ExprKind::List(_) | ExprKind::Dict(_) => {
                            element.translate_literal(item, symbol, raw)
                        }
                        _ => Err(CompileError::unsupported(
                            format!("{} inside a list literal", item.describe()),
                            item.offset,
                        )),
                    })
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(condition(symbol, ctx, Value::Array(values)))
            }
            (ExprKind::Dict(pairs), Capability::Dict) => {
                let value_type = handler.nested();
                let clauses = pairs
                    .iter()
                    .map(|(key, value)| {
                        let key = match &key.kind {
                            ExprKind::Literal(Literal::String(s)) => s.clone(),
                            _ => {
                                return Err(CompileError::unsupported_with_options(
                                    format!("{} as dict key", key.describe()),
                                    key.offset,
                                    ["string"],
                                ));
                            }
                        };
                        // Same compared field for every key; the path is not extended.
                        let value = value_type.translate_nested(value, symbol, ctx)?;
                        Ok(json!({ key: value }))
                    })
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(json!({ "$and": clauses }))
            }
            (ExprKind::Literal(literal), _) => Ok(condition(symbol, ctx, literal_value(literal))),
            _ => Err(rejected()),
        }
    }
}

/// `{symbol: [<field-ref>, value]}` when a field is being compared, the raw
/// value otherwise.
fn condition(symbol: &str, ctx: TranslationContext<'_>, value: Value) -> Value {
    match ctx.compared_field() {
        Some(field) => json!({ symbol: [ctx.field_ref(field), value] }),
        None => value,
    }
}

pub(crate) fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::String(s) => Value::String(s.clone()),
        Literal::Integer(n) => json!(n),
        Literal::Float(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Literal::Boolean(b) => Value::Bool(*b),
        Literal::Null => Value::Null,
    }
}
