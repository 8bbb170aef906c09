//! Lexer (tokenizer) for the expression dialect
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Comments are skipped. Statement-level JavaScript (assignment, arrows,
//! templates, conditionals) is rejected here with the offending span, since
//! nothing downstream could represent it.

use super::ast::Span;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries the [`Span`] it was read from so that syntax errors
/// and tree nodes can point back into the original text.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Number(f64, Span),
    Str(String, Span),

    // Identifiers
    Ident(String, Span),

    // Keyword operators
    Typeof(Span),
    Void(Span),

    // Arithmetic
    Plus(Span),    // +
    Minus(Span),   // -
    Star(Span),    // *
    Slash(Span),   // /
    Percent(Span), // %

    // Equality and comparison
    EqEq(Span),     // ==
    EqEqEq(Span),   // ===
    NotEq(Span),    // !=
    NotEqEq(Span),  // !==
    Lt(Span),       // <
    Le(Span),       // <=
    Gt(Span),       // >
    Ge(Span),       // >=

    // Logical
    AndAnd(Span), // &&
    OrOr(Span),   // ||
    Bang(Span),   // !

    // Bitwise
    Amp(Span),    // &
    Pipe(Span),   // |
    Caret(Span),  // ^
    Tilde(Span),  // ~
    LtLt(Span),   // <<
    GtGt(Span),   // >>
    GtGtGt(Span), // >>>

    // Punctuation
    Dot(Span),       // .
    Comma(Span),     // ,
    Colon(Span),     // :
    Semicolon(Span), // ;
    LParen(Span),    // (
    RParen(Span),    // )
    LBracket(Span),  // [
    RBracket(Span),  // ]
    LBrace(Span),    // {
    RBrace(Span),    // }

    // End of input
    Eof(Span),
}

impl Token {
    /// Returns the span this token was read from.
    pub fn span(&self) -> Span {
        match self {
            Token::Number(_, span) | Token::Str(_, span) | Token::Ident(_, span) => *span,
            Token::Typeof(span)
            | Token::Void(span)
            | Token::Plus(span)
            | Token::Minus(span)
            | Token::Star(span)
            | Token::Slash(span)
            | Token::Percent(span)
            | Token::EqEq(span)
            | Token::EqEqEq(span)
            | Token::NotEq(span)
            | Token::NotEqEq(span)
            | Token::Lt(span)
            | Token::Le(span)
            | Token::Gt(span)
            | Token::Ge(span)
            | Token::AndAnd(span)
            | Token::OrOr(span)
            | Token::Bang(span)
            | Token::Amp(span)
            | Token::Pipe(span)
            | Token::Caret(span)
            | Token::Tilde(span)
            | Token::LtLt(span)
            | Token::GtGt(span)
            | Token::GtGtGt(span)
            | Token::Dot(span)
            | Token::Comma(span)
            | Token::Colon(span)
            | Token::Semicolon(span)
            | Token::LParen(span)
            | Token::RParen(span)
            | Token::LBracket(span)
            | Token::RBracket(span)
            | Token::LBrace(span)
            | Token::RBrace(span)
            | Token::Eof(span) => *span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n, _) => write!(f, "number {}", n),
            Token::Str(s, _) => write!(f, "string {:?}", s),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Typeof(_) => write!(f, "'typeof'"),
            Token::Void(_) => write!(f, "'void'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::Percent(_) => write!(f, "'%'"),
            Token::EqEq(_) => write!(f, "'=='"),
            Token::EqEqEq(_) => write!(f, "'==='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::NotEqEq(_) => write!(f, "'!=='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::AndAnd(_) => write!(f, "'&&'"),
            Token::OrOr(_) => write!(f, "'||'"),
            Token::Bang(_) => write!(f, "'!'"),
            Token::Amp(_) => write!(f, "'&'"),
            Token::Pipe(_) => write!(f, "'|'"),
            Token::Caret(_) => write!(f, "'^'"),
            Token::Tilde(_) => write!(f, "'~'"),
            Token::LtLt(_) => write!(f, "'<<'"),
            Token::GtGt(_) => write!(f, "'>>'"),
            Token::GtGtGt(_) => write!(f, "'>>>'"),
            Token::Dot(_) => write!(f, "'.'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Colon(_) => write!(f, "':'"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::Eof(_) => write!(f, "end of input"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

/// Lexer over a borrowed source string; positions are byte offsets
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source string.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(Span::new(self.position, self.position)));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input".to_string(),
            span: Span::new(start, start),
        })?;

        let token = match ch {
            '"' | '\'' => return self.string_literal(ch, start),
            '0'..='9' => return self.number_literal(start),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                return self.number_literal(start)
            }
            c if is_ident_start(c) => return Ok(self.identifier_or_keyword(start)),

            '+' => {
                if self.peek() == Some('+') {
                    return Err(self.unsupported("increment '++'", start, 2));
                }
                if self.peek() == Some('=') {
                    return Err(self.unsupported("compound assignment '+='", start, 2));
                }
                Token::Plus(self.span_from(start))
            }
            '-' => {
                if self.peek() == Some('-') {
                    return Err(self.unsupported("decrement '--'", start, 2));
                }
                if self.peek() == Some('=') {
                    return Err(self.unsupported("compound assignment '-='", start, 2));
                }
                Token::Minus(self.span_from(start))
            }
            '*' => Token::Star(self.span_from(start)),
            '/' => Token::Slash(self.span_from(start)),
            '%' => Token::Percent(self.span_from(start)),
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        Token::EqEqEq(self.span_from(start))
                    } else {
                        Token::EqEq(self.span_from(start))
                    }
                } else if self.peek() == Some('>') {
                    return Err(self.unsupported("arrow function '=>'", start, 2));
                } else {
                    return Err(self.unsupported("assignment '='", start, 1));
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        Token::NotEqEq(self.span_from(start))
                    } else {
                        Token::NotEq(self.span_from(start))
                    }
                } else {
                    Token::Bang(self.span_from(start))
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::Le(self.span_from(start))
                } else if self.peek() == Some('<') {
                    self.advance();
                    Token::LtLt(self.span_from(start))
                } else {
                    Token::Lt(self.span_from(start))
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::Ge(self.span_from(start))
                } else if self.peek() == Some('>') {
                    self.advance();
                    if self.peek() == Some('>') {
                        self.advance();
                        Token::GtGtGt(self.span_from(start))
                    } else {
                        Token::GtGt(self.span_from(start))
                    }
                } else {
                    Token::Gt(self.span_from(start))
                }
            }
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    Token::AndAnd(self.span_from(start))
                } else {
                    Token::Amp(self.span_from(start))
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    Token::OrOr(self.span_from(start))
                } else {
                    Token::Pipe(self.span_from(start))
                }
            }
            '^' => Token::Caret(self.span_from(start)),
            '~' => Token::Tilde(self.span_from(start)),
            '.' => Token::Dot(self.span_from(start)),
            ',' => Token::Comma(self.span_from(start)),
            ':' => Token::Colon(self.span_from(start)),
            ';' => Token::Semicolon(self.span_from(start)),
            '(' => Token::LParen(self.span_from(start)),
            ')' => Token::RParen(self.span_from(start)),
            '[' => Token::LBracket(self.span_from(start)),
            ']' => Token::RBracket(self.span_from(start)),
            '{' => Token::LBrace(self.span_from(start)),
            '}' => Token::RBrace(self.span_from(start)),
            '?' => return Err(self.unsupported("conditional '?'", start, 1)),
            '`' => return Err(self.unsupported("template literal", start, 1)),

            _ => {
                return Err(LexError {
                    message: format!("Unexpected character: '{}'", ch),
                    span: self.span_from(start),
                })
            }
        };

        Ok(token)
    }

    /// Parse string literal; `quote` has already been consumed
    fn string_literal(&mut self, quote: char, start: usize) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == quote {
                self.advance(); // consume closing quote
                return Ok(Token::Str(string, self.span_from(start)));
            }

            if ch == '\n' {
                break;
            }

            if ch == '\\' {
                let escape_start = self.position;
                self.advance();
                let escaped = self.advance().ok_or_else(|| LexError {
                    message: "Unexpected end of input in string literal".to_string(),
                    span: self.span_from(start),
                })?;

                match escaped {
                    'n' => string.push('\n'),
                    't' => string.push('\t'),
                    'r' => string.push('\r'),
                    'b' => string.push('\u{8}'),
                    'f' => string.push('\u{c}'),
                    'v' => string.push('\u{b}'),
                    '0' => string.push('\0'),
                    '\n' => {} // line continuation
                    'x' => string.push(self.hex_escape(2, escape_start)?),
                    'u' => string.push(self.hex_escape(4, escape_start)?),
                    // Any other escaped character stands for itself
                    other => string.push(other),
                }
            } else {
                string.push(ch);
                self.advance();
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            span: self.span_from(start),
        })
    }

    /// Read exactly `digits` hex digits of a `\x` or `\u` escape
    fn hex_escape(&mut self, digits: usize, escape_start: usize) -> Result<char, LexError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| LexError {
                    message: "Invalid hexadecimal escape sequence".to_string(),
                    span: self.span_from(escape_start),
                })?;
            self.advance();
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| LexError {
            message: format!("Escape \\u{:04x} is not a scalar value", code),
            span: self.span_from(escape_start),
        })
    }

    /// Parse numeric literal; the first character has already been consumed
    fn number_literal(&mut self, start: usize) -> Result<Token, LexError> {
        let first = &self.input[start..self.position];

        if first == "0" && matches!(self.peek(), Some('x') | Some('X')) {
            self.advance();
            let digits_start = self.position;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            let digits = &self.input[digits_start..self.position];
            let value = u64::from_str_radix(digits, 16).map_err(|_| LexError {
                message: format!("Invalid hexadecimal literal: {}", self.slice_from(start)),
                span: self.span_from(start),
            })?;
            return Ok(Token::Number(value as f64, self.span_from(start)));
        }

        let mut seen_dot = first == ".";
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(is_ident_start) {
            return Err(LexError {
                message: "Identifier starts immediately after numeric literal".to_string(),
                span: Span::new(start, self.position + 1),
            });
        }

        let text = self.slice_from(start);
        let value = text.parse::<f64>().map_err(|_| LexError {
            message: format!("Invalid numeric literal: {}", text),
            span: self.span_from(start),
        })?;

        Ok(Token::Number(value, self.span_from(start)))
    }

    /// Parse identifier or keyword operator
    fn identifier_or_keyword(&mut self, start: usize) -> Token {
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }

        let span = self.span_from(start);
        match self.slice_from(start) {
            "typeof" => Token::Typeof(span),
            "void" => Token::Void(span),
            ident => Token::Ident(ident.to_string(), span),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.position;
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            span: self.span_from(start),
        })
    }

    fn unsupported(&self, what: &str, start: usize, len: usize) -> LexError {
        LexError {
            message: format!("Unsupported construct: {}", what),
            span: Span::new(start, start + len),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.position)
    }

    fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.position]
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsfuck_tokens() {
        let mut lexer = Lexer::new("+!![]");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Plus(_)));
        assert!(matches!(tokens[1], Token::Bang(_)));
        assert!(matches!(tokens[2], Token::Bang(_)));
        assert!(matches!(tokens[3], Token::LBracket(_)));
        assert!(matches!(tokens[4], Token::RBracket(_)));
        assert!(matches!(tokens[5], Token::Eof(_)));
    }

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("== === != !== >>> >> << && ||");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::EqEq(_)));
        assert!(matches!(tokens[1], Token::EqEqEq(_)));
        assert!(matches!(tokens[2], Token::NotEq(_)));
        assert!(matches!(tokens[3], Token::NotEqEq(_)));
        assert!(matches!(tokens[4], Token::GtGtGt(_)));
        assert!(matches!(tokens[5], Token::GtGt(_)));
        assert!(matches!(tokens[6], Token::LtLt(_)));
        assert!(matches!(tokens[7], Token::AndAnd(_)));
        assert!(matches!(tokens[8], Token::OrOr(_)));
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let mut lexer = Lexer::new("  \"é\" + flat");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0].span(), Span::new(2, 6));
        assert_eq!(tokens[1].span(), Span::new(7, 8));
        assert_eq!(tokens[2].span(), Span::new(9, 13));
    }

    #[test]
    fn test_string_escapes() {
        let mut lexer = Lexer::new(r#"'a\'b' "\x41B\n""#);
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(&tokens[0], Token::Str(s, _) if s == "a'b"));
        assert!(matches!(&tokens[1], Token::Str(s, _) if s == "AB\n"));
    }

    #[test]
    fn test_numbers() {
        let mut lexer = Lexer::new("1 0x1f 2.5 .5 1e3");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Number(n, _) if n == 1.0));
        assert!(matches!(tokens[1], Token::Number(n, _) if n == 31.0));
        assert!(matches!(tokens[2], Token::Number(n, _) if n == 2.5));
        assert!(matches!(tokens[3], Token::Number(n, _) if n == 0.5));
        assert!(matches!(tokens[4], Token::Number(n, _) if n == 1000.0));
    }

    #[test]
    fn test_comments_skipped() {
        let mut lexer = Lexer::new("[] // trailing\n/* block */ +[]");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::LBracket(_)));
        assert!(matches!(tokens[1], Token::RBracket(_)));
        assert!(matches!(tokens[2], Token::Plus(_)));
        assert!(matches!(tokens[3], Token::LBracket(_)));
    }

    #[test]
    fn test_unsupported_construct_reports_span() {
        let mut lexer = Lexer::new("a = 1");
        let err = lexer.tokenize().unwrap_err();

        assert!(err.message.contains("assignment"));
        assert_eq!(err.span, Span::new(2, 3));
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("'abc");
        let err = lexer.tokenize().unwrap_err();

        assert_eq!(err.message, "Unterminated string literal");
        assert_eq!(err.span, Span::new(0, 4));
    }
}
