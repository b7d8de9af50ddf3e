use std::fmt;

use tracing::trace;

use crate::{
    diagnostics::{Diagnostic, ErrorKind},
    lexer::{Operator, Token, TokenKind},
    postfix::Postfix,
};

/// One applied operation, recorded when step tracing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub ordinal: usize,
    pub left: i64,
    pub operator: Operator,
    pub right: i64,
    pub result: i64,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) {} {} {} = {}",
            self.ordinal, self.left, self.operator, self.right, self.result
        )
    }
}

/// Evaluates a postfix sequence with a value stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    record_steps: bool,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_steps(mut self, record_steps: bool) -> Self {
        self.record_steps = record_steps;
        self
    }

    pub fn run(&self, postfix: &Postfix) -> Result<(i64, Vec<Step>), Diagnostic> {
        let mut values: Vec<i64> = Vec::with_capacity(postfix.len());
        let mut steps = Vec::new();
        let mut applied = 0;

        for token in postfix.tokens() {
            match token.kind {
                TokenKind::Number => values.push(parse_number(token)?),
                TokenKind::Operator(op) => {
                    let right = pop_operand(&mut values, token)?;
                    let left = pop_operand(&mut values, token)?;
                    let result = apply(op, left, right, token)?;
                    applied += 1;
                    trace!(step = applied, left, op = %op, right, result, "applied operator");
                    if self.record_steps {
                        steps.push(Step {
                            ordinal: applied,
                            left,
                            operator: op,
                            right,
                            result,
                        });
                    }
                    values.push(result);
                }
                TokenKind::LParen | TokenKind::RParen => {
                    return Err(Diagnostic::new(
                        ErrorKind::MalformedExpression,
                        "parenthesis in postfix sequence",
                    )
                    .with_span(token.span));
                }
            }
        }

        match values.as_slice() {
            [value] => Ok((*value, steps)),
            other => Err(Diagnostic::new(
                ErrorKind::MalformedExpression,
                format!("postfix sequence left {} values on the stack", other.len()),
            )
            .with_note("a well-formed postfix sequence ends with exactly one value")),
        }
    }
}

pub fn evaluate(postfix: &Postfix) -> Result<i64, Diagnostic> {
    Evaluator::new().run(postfix).map(|(value, _)| value)
}

fn parse_number(token: &Token) -> Result<i64, Diagnostic> {
    token.lexeme.parse::<i64>().map_err(|_| {
        Diagnostic::new(
            ErrorKind::Overflow,
            format!("number {} does not fit in a 64-bit integer", token.lexeme),
        )
        .with_span(token.span)
    })
}

fn pop_operand(values: &mut Vec<i64>, token: &Token) -> Result<i64, Diagnostic> {
    values.pop().ok_or_else(|| {
        Diagnostic::new(
            ErrorKind::MalformedExpression,
            format!("missing operand for `{}`", token.lexeme),
        )
        .with_span(token.span)
    })
}

fn apply(op: Operator, left: i64, right: i64, token: &Token) -> Result<i64, Diagnostic> {
    if op == Operator::Div && right == 0 {
        return Err(Diagnostic::new(ErrorKind::DivisionByZero, "division by zero")
            .with_span(token.span)
            .with_note(format!("while evaluating {left} / 0")));
    }
    let result = match op {
        Operator::Add => left.checked_add(right),
        Operator::Sub => left.checked_sub(right),
        Operator::Mul => left.checked_mul(right),
        Operator::Div => left.checked_div(right),
    };
    result.ok_or_else(|| {
        Diagnostic::new(
            ErrorKind::Overflow,
            format!("{left} {op} {right} overflows a 64-bit integer"),
        )
        .with_span(token.span)
    })
}
