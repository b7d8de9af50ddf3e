//! Infix-to-postfix conversion (shunting-yard).

use std::fmt;

use tracing::debug;

use crate::{
    diagnostics::{Diagnostic, ErrorKind, SourceSpan},
    lexer::{Operator, Token, TokenKind},
};

/// Token sequence in Reverse Polish order: numbers and operators only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Postfix(pub Vec<Token>);

impl Postfix {
    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, token) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// Operator stack entry. Only operators and open parentheses are ever pushed.
enum Pending<'t> {
    Operator(&'t Token, Operator),
    LParen(&'t Token),
}

impl Pending<'_> {
    // `(` sits below every operator so the `>=` test never pops it.
    fn priority(&self) -> u8 {
        match self {
            Pending::Operator(_, op) => op.priority(),
            Pending::LParen(_) => 0,
        }
    }
}

pub fn to_postfix(tokens: &[Token]) -> Result<Postfix, Diagnostic> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending<'_>> = Vec::new();
    let mut expect_operand = true;

    for token in tokens {
        match token.kind {
            TokenKind::Number => {
                if !expect_operand {
                    return Err(malformed(token, "expected an operator before this number"));
                }
                output.push(token.clone());
                expect_operand = false;
            }
            TokenKind::LParen => {
                if !expect_operand {
                    return Err(malformed(token, "expected an operator before `(`"));
                }
                stack.push(Pending::LParen(token));
            }
            TokenKind::RParen => {
                if expect_operand {
                    return Err(malformed(token, "expected an operand before `)`"));
                }
                loop {
                    match stack.pop() {
                        Some(Pending::Operator(pending, _)) => output.push(pending.clone()),
                        Some(Pending::LParen(_)) => break,
                        None => {
                            return Err(Diagnostic::new(
                                ErrorKind::UnbalancedParentheses,
                                "`)` has no matching `(`",
                            )
                            .with_span(token.span));
                        }
                    }
                }
            }
            TokenKind::Operator(op) => {
                if expect_operand {
                    return Err(malformed(
                        token,
                        format!("expected an operand before `{}`", op.symbol()),
                    )
                    .with_note("unary operators are not supported"));
                }
                while let Some(top) = stack.last() {
                    if top.priority() < op.priority() {
                        break;
                    }
                    if let Some(Pending::Operator(pending, _)) = stack.pop() {
                        output.push(pending.clone());
                    }
                }
                stack.push(Pending::Operator(token, op));
                expect_operand = true;
            }
        }
    }

    if expect_operand {
        let diagnostic = match tokens.last() {
            Some(last) => Diagnostic::new(
                ErrorKind::MalformedExpression,
                format!("expected an operand after `{}`", last.lexeme),
            )
            .with_span(SourceSpan::point(last.span.end)),
            None => Diagnostic::new(ErrorKind::MalformedExpression, "empty expression"),
        };
        return Err(diagnostic);
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Operator(token, _) => output.push(token.clone()),
            Pending::LParen(open) => {
                return Err(Diagnostic::new(
                    ErrorKind::UnbalancedParentheses,
                    "`(` is never closed",
                )
                .with_span(open.span));
            }
        }
    }

    let postfix = Postfix(output);
    debug!(%postfix, "converted to postfix");
    Ok(postfix)
}

fn malformed(token: &Token, message: impl Into<String>) -> Diagnostic {
    Diagnostic::new(ErrorKind::MalformedExpression, message).with_span(token.span)
}
