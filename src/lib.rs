pub mod ast;
pub mod cli;
pub mod compiler;
pub mod context;
pub mod elevation;
pub mod error;
pub mod field_type;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod resolver;

pub use ast::{BoolOp, CompareOp, Expr, ExprKind, Literal, Token};
pub use compiler::{ProjectionCompiler, compile_projection, compile_projection_with_schema};
pub use context::{FieldSets, TranslationContext};
pub use error::{CompileError, CompileResult};
pub use field_type::FieldType;
pub use lexer::{LexError, Lexer, Position};
pub use parser::{ParseError, Parser};
pub use resolver::{FieldSchema, Resolver};
