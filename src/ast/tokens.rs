#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Floating-point number
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 0.5
    /// ```
    Float(f64),

    /// Integer
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 314
    /// ```
    Integer(i64),

    /// String literal enclosed in single or double quotes
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'item #1'
    /// ```
    String(String),

    /// Boolean values (`true`/`True`, `false`/`False`)
    Boolean(bool),

    /// Null value (`null`/`None`)
    Null,

    // Identifiers
    /// Field name or function name
    ///
    /// Must start with letter or underscore, followed by letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// hostname
    /// adapters
    /// regexMatch
    /// ```
    Identifier(String),

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    /// Keyword argument assignment inside a call
    ///
    /// # Examples
    /// ```text
    /// regexMatch("^eth", options="i")
    /// ```
    Assign,

    /// Unary minus, only valid in front of a number
    Minus,

    // Logical
    /// Logical AND (word, not symbol)
    ///
    /// # Examples
    /// ```text
    /// os.type == "Linux" and hostname == "db01"
    /// ```
    And,

    /// Logical OR (word, not symbol)
    Or,

    /// Logical NOT (word, not symbol)
    ///
    /// # Examples
    /// ```text
    /// not hostname == "db01"
    /// ```
    Not,

    // Delimiters
    /// Left bracket for list literals
    LBracket,

    /// Right bracket
    RBracket,

    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Left brace for dict literals
    LBrace,

    /// Right brace
    RBrace,

    /// Dot for nested field access
    Dot,

    /// Comma for separating arguments or list elements
    Comma,

    /// Colon for dict literal key-value pairs
    Colon,

    /// End of input
    Eof,
}
