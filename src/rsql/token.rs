// RSQL tokens for lexical analysis

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Unquoted run of unreserved characters: selectors, bare arguments and
    /// the `and` / `or` keywords
    Word(String),
    /// Single- or double-quoted argument, escapes already removed
    Quoted(String),
    /// Comparison operator such as `==`, `=in=` or `<=`
    Operator(String),

    LeftParen,
    RightParen,
    Semicolon,
    Comma,

    Eof,
}

impl Token {
    /// Whether the token joins two constraints with AND
    pub fn is_and(&self) -> bool {
        matches!(self, Token::Semicolon) || matches!(self, Token::Word(w) if w == "and")
    }

    /// Whether the token joins two constraints with OR
    pub fn is_or(&self) -> bool {
        matches!(self, Token::Comma) || matches!(self, Token::Word(w) if w == "or")
    }

    /// Characters that end an unquoted word
    pub fn is_reserved(ch: char) -> bool {
        matches!(
            ch,
            '"' | '\'' | '(' | ')' | ';' | ',' | '=' | '<' | '>' | '!' | '~'
        ) || ch.is_whitespace()
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Word(w) => write!(f, "{}", w),
            Token::Quoted(s) => write!(f, "'{}'", s),
            Token::Operator(op) => write!(f, "{}", op),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_keywords() {
        assert!(Token::Semicolon.is_and());
        assert!(Token::Word("and".to_string()).is_and());
        assert!(!Token::Word("AND".to_string()).is_and());
        assert!(Token::Comma.is_or());
        assert!(Token::Word("or".to_string()).is_or());
        assert!(!Token::Word("name".to_string()).is_or());
    }

    #[test]
    fn test_reserved_characters() {
        for ch in ['(', ')', ';', ',', '=', '<', '>', '!', '\'', '"', ' '] {
            assert!(Token::is_reserved(ch), "{:?}", ch);
        }
        for ch in ['a', '.', '[', '%', '-', '*'] {
            assert!(!Token::is_reserved(ch), "{:?}", ch);
        }
    }
}
