use rustyline::{error::ReadlineError, DefaultEditor};

use crate::{
    diagnostics::{Result, TallyError},
    runtime::{CalcOptions, Calculator},
};

pub const DEFAULT_PROMPT: &str = "> ";

/// What the REPL should do with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Quit,
    Skip,
    Output(String),
    Error(String),
}

pub struct Repl {
    calculator: Calculator,
    prompt: String,
}

impl Repl {
    pub fn new() -> Self {
        Self::with_options(CalcOptions::default())
    }

    pub fn with_options(options: CalcOptions) -> Self {
        Self {
            calculator: Calculator::with_options(options),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn handle_line(&mut self, line: &str) -> LineOutcome {
        let trimmed = line.trim();
        match trimmed {
            "" => LineOutcome::Skip,
            "quit" | ":quit" | ":exit" => LineOutcome::Quit,
            ":steps" => {
                let record_steps = !self.calculator.options().record_steps;
                self.calculator = Calculator::with_options(CalcOptions { record_steps });
                let state = if record_steps { "on" } else { "off" };
                LineOutcome::Output(format!("steps {state}"))
            }
            expression => match self.calculator.evaluate(expression) {
                Ok(evaluation) => {
                    let mut lines: Vec<String> =
                        evaluation.steps.iter().map(ToString::to_string).collect();
                    lines.push(evaluation.value.to_string());
                    LineOutcome::Output(lines.join("\n"))
                }
                Err(diag) => LineOutcome::Error(diag.render(expression)),
            },
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new().map_err(readline_error)?;
        loop {
            match editor.readline(&self.prompt) {
                Ok(line) => {
                    let outcome = self.handle_line(&line);
                    if outcome != LineOutcome::Skip {
                        editor.add_history_entry(line.trim()).ok();
                    }
                    match outcome {
                        LineOutcome::Quit => break,
                        LineOutcome::Skip => {}
                        LineOutcome::Output(text) => println!("{text}"),
                        LineOutcome::Error(text) => eprintln!("{text}"),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(readline_error(err)),
            }
        }
        Ok(())
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

fn readline_error(err: ReadlineError) -> TallyError {
    TallyError::from(std::io::Error::new(std::io::ErrorKind::Other, err))
}
