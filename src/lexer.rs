use std::fmt;

use crate::diagnostics::{Diagnostic, ErrorKind, SourceSpan};

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn from_char(ch: char) -> Option<Self> {
        let op = match ch {
            '+' => Operator::Add,
            '-' => Operator::Sub,
            '*' => Operator::Mul,
            '/' => Operator::Div,
            _ => return None,
        };
        Some(op)
    }

    pub const fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// Binding strength; higher binds tighter.
    pub const fn priority(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Operator(Operator),
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: SourceSpan,
}

impl Token {
    /// Builds a number token from its digits, spanning `start..start + digits.len()`.
    pub fn number(digits: impl Into<String>, start: usize) -> Self {
        let lexeme = digits.into();
        let span = SourceSpan::new(start, start + lexeme.len());
        Self {
            kind: TokenKind::Number,
            lexeme,
            span,
        }
    }

    pub fn operator(op: Operator, start: usize) -> Self {
        Self {
            kind: TokenKind::Operator(op),
            lexeme: op.symbol().to_string(),
            span: SourceSpan::new(start, start + 1),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexeme)
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, Diagnostic> {
    Lexer::new(source).tokenize()
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current: usize,
    peeked: Option<(usize, char)>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices(),
            current: 0,
            peeked: None,
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = match self.peeked.take() {
            Some(pair) => Some(pair),
            None => self.chars.next(),
        };
        if let Some((idx, ch)) = next {
            self.current = idx + ch.len_utf8();
        }
        next
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }
        self.peeked
    }

    fn collect_while<F>(&mut self, start: usize, mut predicate: F) -> &'a str
    where
        F: FnMut(char) -> bool,
    {
        while let Some((_, ch)) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.bump();
        }
        &self.source[start..self.current]
    }

    fn number_literal(&mut self, start: usize) -> Token {
        let digits = self.collect_while(start, |ch| ch.is_ascii_digit());
        Token::number(digits, start)
    }

    fn simple_token(&mut self, start: usize, kind: TokenKind) -> Token {
        let end = self.current;
        Token {
            kind,
            lexeme: self.source[start..end].to_string(),
            span: SourceSpan { start, end },
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();
        while let Some((start, ch)) = self.bump() {
            let token = match ch {
                '0'..='9' => self.number_literal(start),
                '(' => self.simple_token(start, TokenKind::LParen),
                ')' => self.simple_token(start, TokenKind::RParen),
                other => match Operator::from_char(other) {
                    Some(op) => self.simple_token(start, TokenKind::Operator(op)),
                    None => return Err(unexpected_character(other, start, self.current)),
                },
            };
            tokens.push(token);
        }
        Ok(tokens)
    }
}

fn unexpected_character(ch: char, start: usize, end: usize) -> Diagnostic {
    let diagnostic = Diagnostic::new(
        ErrorKind::MalformedInput,
        format!("unexpected character {ch:?}"),
    )
    .with_span(SourceSpan::new(start, end));
    if ch.is_whitespace() {
        diagnostic.with_note("whitespace is not allowed inside an expression")
    } else {
        diagnostic.with_note("expressions may only contain digits, `+ - * /` and parentheses")
    }
}
