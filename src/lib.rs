//! Integer arithmetic expression evaluator.
//! Expressions are tokenized, converted to postfix with the shunting-yard
//! algorithm and evaluated on a value stack.

pub mod diagnostics;
pub mod evaluator;
pub mod lexer;
pub mod postfix;
pub mod repl;
pub mod runtime;

pub use diagnostics::{Diagnostic, ErrorKind, SourceSpan, TallyError};
pub use repl::Repl;
pub use runtime::{compute, compute_with_steps, CalcOptions, Calculator, Evaluation};
