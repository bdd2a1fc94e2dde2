// RSQL parser - converts tokens to the filter node tree
//
// or         = and { ( "," | "or" ) and }
// and        = constraint { ( ";" | "and" ) constraint }
// constraint = "(" or ")" | comparison
// comparison = selector operator ( argument | "(" argument { "," argument } ")" )

use super::ast::{LogicalKind, Node};
use super::lexer::Lexer;
use super::token::Token;
use crate::expression::{ExpressionError, ExpressionResult};

pub struct Parser {
    tokens: Vec<(Token, usize)>,
    position: usize,
}

impl Parser {
    pub fn new(input: &str) -> ExpressionResult<Self> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize()?;
        Ok(Parser {
            tokens,
            position: 0,
        })
    }

    /// Parse the whole input as one filter
    pub fn parse(&mut self) -> ExpressionResult<Node> {
        let node = self.parse_or()?;
        if !self.match_token(&Token::Eof) {
            return Err(self.error(format!("unexpected '{}'", self.current_token())));
        }
        Ok(node)
    }

    fn parse_or(&mut self) -> ExpressionResult<Node> {
        let first = self.parse_and()?;
        self.parse_logical(first, LogicalKind::Or)
    }

    fn parse_and(&mut self) -> ExpressionResult<Node> {
        let first = self.parse_constraint()?;
        self.parse_logical(first, LogicalKind::And)
    }

    /// Collect siblings joined by `kind`; a single operand is returned as is
    fn parse_logical(&mut self, first: Node, kind: LogicalKind) -> ExpressionResult<Node> {
        let mut children = vec![first];
        loop {
            let joined = match kind {
                LogicalKind::And => self.current_token().is_and(),
                LogicalKind::Or => self.current_token().is_or(),
            };
            if !joined {
                break;
            }
            self.advance();
            let child = match kind {
                LogicalKind::And => self.parse_constraint()?,
                LogicalKind::Or => self.parse_and()?,
            };
            children.push(child);
        }

        if children.len() == 1 {
            Ok(children.remove(0))
        } else {
            Ok(Node::Logical { kind, children })
        }
    }

    fn parse_constraint(&mut self) -> ExpressionResult<Node> {
        if self.match_token(&Token::LeftParen) {
            self.advance();
            let node = self.parse_or()?;
            self.expect_token(Token::RightParen)?;
            Ok(node)
        } else {
            self.parse_comparison()
        }
    }

    fn parse_comparison(&mut self) -> ExpressionResult<Node> {
        let selector = match self.current_token() {
            Token::Word(word) => word,
            other => return Err(self.error(format!("expected selector, found '{}'", other))),
        };
        self.advance();

        let operator = match self.current_token() {
            Token::Operator(op) => op,
            other => return Err(self.error(format!("expected operator, found '{}'", other))),
        };
        self.advance();

        let arguments = if self.match_token(&Token::LeftParen) {
            self.advance();
            let mut arguments = vec![self.parse_argument()?];
            while self.match_token(&Token::Comma) {
                self.advance();
                arguments.push(self.parse_argument()?);
            }
            self.expect_token(Token::RightParen)?;
            arguments
        } else {
            vec![self.parse_argument()?]
        };

        Ok(Node::Comparison {
            selector,
            operator,
            arguments,
        })
    }

    fn parse_argument(&mut self) -> ExpressionResult<String> {
        match self.current_token() {
            Token::Word(value) | Token::Quoted(value) => {
                self.advance();
                Ok(value)
            }
            other => Err(self.error(format!("expected argument, found '{}'", other))),
        }
    }

    /// Get current token
    fn current_token(&self) -> Token {
        self.tokens
            .get(self.position)
            .map(|(token, _)| token.clone())
            .unwrap_or(Token::Eof)
    }

    fn current_position(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(0, |(_, position)| *position)
    }

    /// Advance to next token
    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Check if current token matches
    fn match_token(&self, token: &Token) -> bool {
        self.current_token() == *token
    }

    /// Expect a specific token
    fn expect_token(&mut self, token: Token) -> ExpressionResult<()> {
        if self.current_token() == token {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!(
                "expected '{}', found '{}'",
                token,
                self.current_token()
            )))
        }
    }

    fn error(&self, message: String) -> ExpressionError {
        ExpressionError::Syntax {
            position: self.current_position(),
            message,
        }
    }
}
