//! # PQL - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for PQL filter
//! expressions, a small Python-flavoured condition language that is compiled
//! into aggregation pipeline query fragments.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, field paths, calls, logic)
//! - **[operators]** - Comparison and boolean operators
//!
//! ## Quick Start
//!
//! ```text
//! os.type == "Linux" and adapters == {"name": "eth0"}
//! ```
//!
//! ## Core Concepts
//!
//! ### Field Paths
//!
//! The left side of a comparison names a field. Dots address embedded
//! documents, so `os.type` resolves to the field path `"os.type"`.
//!
//! ### Right-Hand Sides
//!
//! The right side is a literal, a list or dict literal, a function call such
//! as `exists(true)` or `regexMatch("^a")`, or another field path.
//!
//! ### Logic
//!
//! `and`, `or` and `not` combine comparisons. A run of the same combinator
//! (`a and b and c`) is a single node; parentheses keep nesting.
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Expr, ExprKind, Literal};
pub use operators::{BoolOp, CompareOp};
pub use tokens::Token;
