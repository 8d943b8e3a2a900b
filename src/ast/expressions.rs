use crate::ast::{BoolOp, CompareOp};

/// Abstract Syntax Tree node representing a parsed expression.
///
/// Every node remembers the character offset in the source text where it
/// starts, so compile errors can point back at the offending construct.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// What kind of node this is
    pub kind: ExprKind,
    /// Character offset of the first token of this node
    pub offset: usize,
}

impl Expr {
    pub fn new(kind: ExprKind, offset: usize) -> Self {
        Expr { kind, offset }
    }

    /// Human-readable name of the node kind, used in error messages.
    pub fn describe(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal(lit) => lit.kind_name(),
            ExprKind::Identifier(_) => "identifier",
            ExprKind::Attribute { .. } => "attribute path",
            ExprKind::List(_) => "list literal",
            ExprKind::Dict(_) => "dict literal",
            ExprKind::Call { .. } => "function call",
            ExprKind::Not(_) => "not expression",
            ExprKind::BoolOp { .. } => "boolean expression",
            ExprKind::Compare { .. } => "comparison",
        }
    }
}

/// Scalar literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// String literal
    ///
    /// # Example
    /// ```text
    /// "Linux"
    /// ```
    String(String),

    /// Literal integer
    Integer(i64),

    /// Literal floating point number
    Float(f64),

    /// Boolean literal
    Boolean(bool),

    /// Null literal (`null` or `None`)
    Null,
}

impl Literal {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "string literal",
            Literal::Integer(_) => "integer literal",
            Literal::Float(_) => "float literal",
            Literal::Boolean(_) => "boolean literal",
            Literal::Null => "null literal",
        }
    }
}

/// The closed set of expression node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Scalar literal
    Literal(Literal),

    /// Bare name
    ///
    /// # Example
    /// ```text
    /// hostname
    /// ```
    Identifier(String),

    /// Dotted access into an embedded document
    ///
    /// # Example
    /// ```text
    /// adapters.mac
    /// ```
    Attribute { base: Box<Expr>, name: String },

    /// List literal
    ///
    /// # Example
    /// ```text
    /// ["ssh", "http"]
    /// ```
    List(Vec<Expr>),

    /// Dict literal
    ///
    /// # Example
    /// ```text
    /// {"name": "eth0", "up": true}
    /// ```
    Dict(Vec<(Expr, Expr)>),

    /// Function call with positional and keyword arguments
    ///
    /// # Examples
    /// ```text
    /// exists(true)
    /// regexMatch("^eth", options="i")
    /// ```
    Call {
        target: String,
        args: Vec<Expr>,
        keywords: Vec<(String, Expr)>,
    },

    /// Logical negation
    Not(Box<Expr>),

    /// `and` / `or` over two or more operands
    BoolOp { op: BoolOp, operands: Vec<Expr> },

    /// Comparison, possibly chained (`a == b == c`)
    ///
    /// Chains are kept as parsed so the compiler can reject them with the
    /// position of the second comparator.
    Compare {
        left: Box<Expr>,
        comparisons: Vec<(CompareOp, Expr)>,
    },
}
