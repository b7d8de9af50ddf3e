use tracing::{debug, debug_span};

use crate::{
    diagnostics::Diagnostic,
    evaluator::{Evaluator, Step},
    lexer,
    postfix::{self, Postfix},
};

/// Options controlling a [`Calculator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CalcOptions {
    pub record_steps: bool,
}

/// Outcome of a successful evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub value: i64,
    pub postfix: Postfix,
    /// Empty unless step recording was requested.
    pub steps: Vec<Step>,
}

/// Runs the tokenize, convert, evaluate pipeline.
///
/// A `Calculator` holds only options; every call builds its own buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator {
    options: CalcOptions,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CalcOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CalcOptions {
        self.options
    }

    pub fn evaluate(&self, expression: &str) -> Result<Evaluation, Diagnostic> {
        let _span = debug_span!("evaluate", expression).entered();
        let tokens = lexer::tokenize(expression)?;
        debug!(count = tokens.len(), "tokenized");
        let postfix = postfix::to_postfix(&tokens)?;
        let (value, steps) = Evaluator::new()
            .with_steps(self.options.record_steps)
            .run(&postfix)?;
        debug!(value, "evaluated");
        Ok(Evaluation {
            value,
            postfix,
            steps,
        })
    }
}

/// Evaluates `expression` and returns its integer value.
pub fn compute(expression: &str) -> Result<i64, Diagnostic> {
    Calculator::new()
        .evaluate(expression)
        .map(|evaluation| evaluation.value)
}

/// Like [`compute`], also returning the postfix form and every applied step.
pub fn compute_with_steps(expression: &str) -> Result<Evaluation, Diagnostic> {
    Calculator::with_options(CalcOptions { record_steps: true }).evaluate(expression)
}
