//! Function call translators.
//!
//! `exists` and `regexMatch` appear on the right of a comparison and act on
//! the compared field. `search` is a top-level call that runs a full-text
//! search over the whole document.

use serde_json::{Map, Value, json};

use crate::{
    ast::{Expr, ExprKind, Literal},
    context::TranslationContext,
    error::{CompileError, CompileResult},
    field_type::FieldType,
    lexer::Position,
};

/// Calls allowed at the top level of an expression.
pub const TOP_LEVEL_FUNCTIONS: &[&str] = &["search"];

/// Functions owned by field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Exists,
    RegexMatch,
}

impl Function {
    pub fn name(self) -> &'static str {
        match self {
            Function::Exists => "exists",
            Function::RegexMatch => "regexMatch",
        }
    }
}

/// Borrowed view of a call node.
#[derive(Debug, Clone, Copy)]
pub struct Call<'e> {
    pub target: &'e str,
    pub args: &'e [Expr],
    pub keywords: &'e [(String, Expr)],
    pub offset: Position,
}

impl<'e> Call<'e> {
    pub fn new(target: &'e str, args: &'e [Expr], keywords: &'e [(String, Expr)], offset: Position) -> Self {
        Call {
            target,
            args,
            keywords,
            offset,
        }
    }

    /// Argument by position, or by keyword `name`.
    pub fn arg(&self, index: usize, name: &str) -> Option<&'e Expr> {
        self.args.get(index).or_else(|| {
            self.keywords
                .iter()
                .find(|(keyword, _)| keyword == name)
                .map(|(_, value)| value)
        })
    }

    pub fn required_arg(&self, index: usize, name: &str) -> CompileResult<&'e Expr> {
        self.arg(index, name).ok_or_else(|| {
            CompileError::unsupported(
                format!("call to {}() without its '{}' argument", self.target, name),
                self.offset,
            )
        })
    }

    /// Reject extra positional arguments, unknown keywords, and parameters
    /// passed both ways.
    pub fn check_signature(&self, params: &[&str]) -> CompileResult<()> {
        let signature = || format!("{}({})", self.target, params.join(", "));

        if self.args.len() > params.len() {
            return Err(CompileError::unsupported_with_options(
                format!("call to {}() with {} positional arguments", self.target, self.args.len()),
                self.args[params.len()].offset,
                [signature()],
            ));
        }
        for (keyword, value) in self.keywords {
            match params.iter().position(|p| *p == keyword.as_str()) {
                Some(index) if index >= self.args.len() => {}
                Some(_) => {
                    return Err(CompileError::unsupported(
                        format!("argument '{}' passed twice to {}()", keyword, self.target),
                        value.offset,
                    ));
                }
                None => {
                    return Err(CompileError::unsupported_with_options(
                        format!("keyword argument '{}' for {}()", keyword, self.target),
                        value.offset,
                        params.iter().copied(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Translate a function owned by a field type.
pub fn translate(function: Function, call: &Call<'_>, ctx: TranslationContext<'_>) -> CompileResult<Value> {
    match function {
        Function::Exists => translate_exists(call, ctx),
        Function::RegexMatch => translate_regex_match(call, ctx),
    }
}

/// `exists(bool)`, rooted at the compared field: `{"F": {"$exists": true}}`.
fn translate_exists(call: &Call<'_>, ctx: TranslationContext<'_>) -> CompileResult<Value> {
    call.check_signature(&["value"])?;
    let arg = call.required_arg(0, "value")?;

    let value = FieldType::Bool.translate_nested(arg, "$eq", ctx.without_compared_field())?;
    if !value.is_boolean() {
        return Err(CompileError::unsupported_with_options(
            format!("{} as exists() argument", arg.describe()),
            arg.offset,
            ["true", "false"],
        ));
    }

    let exists = json!({ "$exists": value });
    Ok(match ctx.compared_field() {
        Some(field) => json!({ field: exists }),
        None => exists,
    })
}

/// `regexMatch(pattern[, options])` with a string type guard in front.
fn translate_regex_match(call: &Call<'_>, ctx: TranslationContext<'_>) -> CompileResult<Value> {
    call.check_signature(&["pattern", "options"])?;
    let field = ctx.compared_field().ok_or_else(|| {
        CompileError::unsupported("regexMatch() outside a comparison", call.offset)
    })?;
    let field_ref = ctx.field_ref(field);
    let raw = ctx.without_compared_field();

    let mut regex_match = Map::new();
    regex_match.insert("input".to_string(), Value::String(field_ref.clone()));
    regex_match.insert(
        "regex".to_string(),
        Value::String(string_arg(call.required_arg(0, "pattern")?, raw)?),
    );
    // Flags are passed through; the backend validates them.
    if let Some(options) = call.arg(1, "options") {
        regex_match.insert("options".to_string(), Value::String(string_arg(options, raw)?));
    }

    Ok(json!({
        "$and": [
            { "$eq": ["string", { "$type": field_ref }] },
            { "$regexMatch": regex_match }
        ]
    }))
}

fn string_arg(arg: &Expr, ctx: TranslationContext<'_>) -> CompileResult<String> {
    match FieldType::String.translate_nested(arg, "$eq", ctx)? {
        Value::String(s) => Ok(s),
        _ => Err(CompileError::unsupported_with_options(
            format!("{} where a string is required", arg.describe()),
            arg.offset,
            ["string"],
        )),
    }
}

/// Top-level `search("text")`: a case-insensitive phrase search.
///
/// Exactly one positional string literal is accepted.
pub fn translate_search(call: &Call<'_>) -> CompileResult<Value> {
    let text = match (call.args, call.keywords) {
        (
            [Expr {
                kind: ExprKind::Literal(Literal::String(text)),
                ..
            }],
            [],
        ) => text,
        _ => {
            return Err(CompileError::unsupported_with_options(
                "search() call shape",
                call.offset,
                ["search(\"<text>\")"],
            ));
        }
    };

    Ok(json!({
        "$text": {
            "$search": format!("\"{}\"", text),
            "$caseSensitive": false
        }
    }))
}
