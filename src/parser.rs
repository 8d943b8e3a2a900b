use crate::{
    ast::{BoolOp, CompareOp, Expr, ExprKind, Literal, Token},
    lexer::{LexError, Lexer, Position},
};
use std::mem;

/// Errors raised while turning source text into an expression tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Expected {expected}, got {found} at offset {offset}")]
    UnexpectedToken {
        expected: String,
        found: String,
        offset: Position,
    },

    #[error("Positional argument follows keyword argument at offset {offset}")]
    PositionalAfterKeyword { offset: Position },
}

impl ParseError {
    pub fn offset(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.offset(),
            ParseError::UnexpectedToken { offset, .. }
            | ParseError::PositionalAfterKeyword { offset } => *offset,
        }
    }
}

/// Recursive-descent parser for PQL filter expressions.
///
/// Precedence, loosest first: `or`, `and`, `not`, comparison, primary.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_offset: Position,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let current_offset = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_offset,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.current_offset = self.lexer.token_start();
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: format!("{:?}", self.current_token),
            offset: self.current_offset,
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(&format!("{:?}", expected)));
        }
        self.advance()
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Identifier(name) => {
                self.advance()?;
                Ok(name)
            }
            token => {
                self.current_token = token;
                Err(self.unexpected("identifier"))
            }
        }
    }

    /// Parse primary expressions: literals, names, dotted paths, calls,
    /// list/dict literals and parenthesized groups.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let offset = self.current_offset;

        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::String(s) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::String(s)), offset))
            }
            Token::Integer(n) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Integer(n)), offset))
            }
            Token::Float(n) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Float(n)), offset))
            }
            Token::Boolean(b) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Boolean(b)), offset))
            }
            Token::Null => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Null), offset))
            }

            // Negative numbers only; there is no arithmetic
            Token::Minus => {
                self.advance()?;
                let literal = match self.current_token {
                    Token::Integer(n) => Literal::Integer(-n),
                    Token::Float(n) => Literal::Float(-n),
                    _ => return Err(self.unexpected("number after '-'")),
                };
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(literal), offset))
            }

            Token::Identifier(name) => {
                self.advance()?;
                if self.check(&Token::LParen) {
                    self.advance()?;
                    return self.parse_call(name, offset);
                }
                self.parse_attribute_chain(Expr::new(ExprKind::Identifier(name), offset))
            }

            Token::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::LBracket => {
                self.advance()?;
                self.parse_list_literal(offset)
            }
            Token::LBrace => {
                self.advance()?;
                self.parse_dict_literal(offset)
            }

            token => {
                self.current_token = token;
                Err(self.unexpected("expression"))
            }
        }
    }

    fn parse_attribute_chain(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        let offset = expr.offset;
        while self.check(&Token::Dot) {
            self.advance()?;
            let name = self.expect_identifier()?;
            expr = Expr::new(
                ExprKind::Attribute {
                    base: Box::new(expr),
                    name,
                },
                offset,
            );
        }
        Ok(expr)
    }

    fn parse_call(&mut self, target: String, offset: Position) -> Result<Expr, ParseError> {
        let mut args = vec![];
        let mut keywords = vec![];

        while !self.check(&Token::RParen) {
            let arg_offset = self.current_offset;
            let arg = self.parse_expression()?;

            if self.check(&Token::Assign) {
                let name = match arg.kind {
                    ExprKind::Identifier(name) => name,
                    _ => return Err(self.unexpected("',' or ')'")),
                };
                self.advance()?;
                keywords.push((name, self.parse_expression()?));
            } else if !keywords.is_empty() {
                return Err(ParseError::PositionalAfterKeyword { offset: arg_offset });
            } else {
                args.push(arg);
            }

            if !self.check(&Token::RParen) {
                self.expect(Token::Comma)?;
            }
        }

        self.expect(Token::RParen)?;
        Ok(Expr::new(
            ExprKind::Call {
                target,
                args,
                keywords,
            },
            offset,
        ))
    }

    fn parse_list_literal(&mut self, offset: Position) -> Result<Expr, ParseError> {
        let mut elements = vec![];

        while !self.check(&Token::RBracket) {
            elements.push(self.parse_expression()?);

            if !self.check(&Token::RBracket) {
                self.expect(Token::Comma)?;
            }
        }

        self.expect(Token::RBracket)?;
        Ok(Expr::new(ExprKind::List(elements), offset))
    }

    fn parse_dict_literal(&mut self, offset: Position) -> Result<Expr, ParseError> {
        let mut pairs = vec![];

        while !self.check(&Token::RBrace) {
            let key = self.parse_expression()?;
            self.expect(Token::Colon)?;
            let value = self.parse_expression()?;
            pairs.push((key, value));

            if !self.check(&Token::RBrace) {
                self.expect(Token::Comma)?;
            }
        }

        self.expect(Token::RBrace)?;
        Ok(Expr::new(ExprKind::Dict(pairs), offset))
    }

    fn compare_op(&self) -> Option<CompareOp> {
        match self.current_token {
            Token::EqEq => Some(CompareOp::Eq),
            Token::NotEq => Some(CompareOp::NotEq),
            Token::Lt => Some(CompareOp::Lt),
            Token::LtEq => Some(CompareOp::LtEq),
            Token::Gt => Some(CompareOp::Gt),
            Token::GtEq => Some(CompareOp::GtEq),
            _ => None,
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_primary()?;
        let offset = left.offset;

        let mut comparisons = vec![];
        while let Some(op) = self.compare_op() {
            self.advance()?;
            comparisons.push((op, self.parse_primary()?));
        }

        if comparisons.is_empty() {
            return Ok(left);
        }
        Ok(Expr::new(
            ExprKind::Compare {
                left: Box::new(left),
                comparisons,
            },
            offset,
        ))
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.check(&Token::Not) {
            let offset = self.current_offset;
            self.advance()?;
            let operand = self.parse_not()?;
            return Ok(Expr::new(ExprKind::Not(Box::new(operand)), offset));
        }
        self.parse_comparison()
    }

    /// Parse a run of one boolean combinator into a single n-ary node.
    fn parse_bool_run(
        &mut self,
        op: BoolOp,
        token: Token,
        operand: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let first = operand(self)?;
        if !self.check(&token) {
            return Ok(first);
        }

        let offset = first.offset;
        let mut operands = vec![first];
        while self.check(&token) {
            self.advance()?;
            operands.push(operand(self)?);
        }
        Ok(Expr::new(ExprKind::BoolOp { op, operands }, offset))
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        self.parse_bool_run(BoolOp::And, Token::And, Self::parse_not)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        self.parse_bool_run(BoolOp::Or, Token::Or, Self::parse_and)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    /// Parse a complete expression, requiring all input to be consumed.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(Token::Eof)?;
        Ok(expr)
    }
}

/// Parse source text into an expression tree.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(source))?.parse()
}
