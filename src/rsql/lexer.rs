// RSQL lexer - tokenizes filter strings

use super::token::Token;
use crate::expression::{ExpressionError, ExpressionResult};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let input: Vec<char> = input.chars().collect();
        let current_char = input.first().copied();
        Lexer {
            input,
            position: 0,
            current_char,
        }
    }

    /// Get the next token and the position it starts at
    pub fn next_token(&mut self) -> ExpressionResult<(Token, usize)> {
        self.skip_whitespace();

        let start = self.position;
        let Some(ch) = self.current_char else {
            return Ok((Token::Eof, start));
        };

        let token = match ch {
            '(' => {
                self.advance();
                Token::LeftParen
            }
            ')' => {
                self.advance();
                Token::RightParen
            }
            ';' => {
                self.advance();
                Token::Semicolon
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            '=' => self.read_fiql_operator()?,
            '<' | '>' => {
                self.advance();
                let mut op = ch.to_string();
                if self.current_char == Some('=') {
                    self.advance();
                    op.push('=');
                }
                Token::Operator(op)
            }
            '!' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::Operator("!=".to_string())
                } else {
                    return Err(self.error(start, "expected '=' after '!'"));
                }
            }
            '\'' | '"' => self.read_quoted(ch)?,
            c if !Token::is_reserved(c) => self.read_word(),
            c => return Err(self.error(start, format!("unexpected character '{}'", c))),
        };

        Ok((token, start))
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn error(&self, position: usize, message: impl Into<String>) -> ExpressionError {
        ExpressionError::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Read `==` or `=letters=`
    fn read_fiql_operator(&mut self) -> ExpressionResult<Token> {
        let start = self.position;
        let mut op = String::from("=");
        self.advance();

        while let Some(ch) = self.current_char {
            if ch.is_ascii_alphabetic() {
                op.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if self.current_char == Some('=') {
            self.advance();
            op.push('=');
            Ok(Token::Operator(op))
        } else {
            Err(self.error(start, format!("unterminated operator '{}'", op)))
        }
    }

    /// Read an unquoted word
    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while let Some(ch) = self.current_char {
            if Token::is_reserved(ch) {
                break;
            }
            word.push(ch);
            self.advance();
        }

        Token::Word(word)
    }

    /// Read a quoted argument; a backslash escapes the next character
    fn read_quoted(&mut self, quote: char) -> ExpressionResult<Token> {
        let start = self.position;
        self.advance(); // Skip opening quote
        let mut string = String::new();

        loop {
            match self.current_char {
                Some(ch) if ch == quote => {
                    self.advance(); // Skip closing quote
                    return Ok(Token::Quoted(string));
                }
                Some('\\') => {
                    self.advance();
                    match self.current_char {
                        Some(escaped) => {
                            string.push(escaped);
                            self.advance();
                        }
                        None => break,
                    }
                }
                Some(ch) => {
                    string.push(ch);
                    self.advance();
                }
                None => break,
            }
        }

        Err(self.error(start, "unterminated quoted string"))
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> ExpressionResult<Vec<(Token, usize)>> {
        let mut tokens = Vec::new();

        loop {
            let (token, position) = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push((token, position));
            if done {
                break;
            }
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_basic_comparison() {
        assert_eq!(
            tokens("name==Car1"),
            vec![
                Token::Word("name".to_string()),
                Token::Operator("==".to_string()),
                Token::Word("Car1".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            tokens("a=in=b != < <= > >="),
            vec![
                Token::Word("a".to_string()),
                Token::Operator("=in=".to_string()),
                Token::Word("b".to_string()),
                Token::Operator("!=".to_string()),
                Token::Operator("<".to_string()),
                Token::Operator("<=".to_string()),
                Token::Operator(">".to_string()),
                Token::Operator(">=".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_arguments() {
        assert_eq!(
            tokens(r#"'it\'s' "say \"hi\"" ''"#),
            vec![
                Token::Quoted("it's".to_string()),
                Token::Quoted("say \"hi\"".to_string()),
                Token::Quoted(String::new()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_list_and_logical_tokens() {
        assert_eq!(
            tokens("id=in=(3, 6);x==1,y==2"),
            vec![
                Token::Word("id".to_string()),
                Token::Operator("=in=".to_string()),
                Token::LeftParen,
                Token::Word("3".to_string()),
                Token::Comma,
                Token::Word("6".to_string()),
                Token::RightParen,
                Token::Semicolon,
                Token::Word("x".to_string()),
                Token::Operator("==".to_string()),
                Token::Word("1".to_string()),
                Token::Comma,
                Token::Word("y".to_string()),
                Token::Operator("==".to_string()),
                Token::Word("2".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_selectors_keep_dots_and_indexes() {
        assert_eq!(
            tokens("engine.screws[0].name=like=Scr%"),
            vec![
                Token::Word("engine.screws[0].name".to_string()),
                Token::Operator("=like=".to_string()),
                Token::Word("Scr%".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_positions() -> ExpressionResult<()> {
        let tokens = Lexer::new("a == 'b'").tokenize()?;
        let positions: Vec<usize> = tokens.iter().map(|(_, p)| *p).collect();
        assert_eq!(positions, vec![0, 2, 5, 8]);
        Ok(())
    }

    #[test]
    fn test_errors() {
        for input in ["name=in", "a!b", "'open", "name~=x", "a=i n="] {
            let err = Lexer::new(input).tokenize().unwrap_err();
            assert!(
                matches!(err, ExpressionError::Syntax { .. }),
                "{} should fail",
                input
            );
        }
    }
}
