use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tally::{
    diagnostics::Diagnostic, lexer, postfix, repl::DEFAULT_PROMPT, CalcOptions, Calculator,
    Evaluation, Repl, TallyError,
};

#[derive(Parser)]
#[command(author, version, about = "Integer arithmetic expression evaluator")]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a single expression
    Eval {
        expression: String,
        /// Print every applied operation before the result
        #[arg(long)]
        steps: bool,
    },
    /// Print the Reverse Polish form of an expression
    Postfix { expression: String },
    /// Evaluate each non-empty line of a file
    Run {
        file: PathBuf,
        #[arg(long)]
        steps: bool,
    },
    /// Start an interactive session
    Repl {
        #[arg(long)]
        steps: bool,
        #[arg(long, default_value = DEFAULT_PROMPT)]
        prompt: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    let command = args.command.unwrap_or(Command::Repl {
        steps: false,
        prompt: DEFAULT_PROMPT.to_string(),
    });
    match execute(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(kind = ?err.kind(), "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(command: Command) -> Result<(), TallyError> {
    match command {
        Command::Eval { expression, steps } => {
            let evaluation = calculator(steps).evaluate(&expression)?;
            print_evaluation(&evaluation);
        }
        Command::Postfix { expression } => {
            let tokens = lexer::tokenize(&expression)?;
            println!("{}", postfix::to_postfix(&tokens)?);
        }
        Command::Run { file, steps } => run_file(file, steps)?,
        Command::Repl { steps, prompt } => {
            let mut repl = Repl::with_options(CalcOptions {
                record_steps: steps,
            })
            .with_prompt(prompt);
            repl.run()?;
        }
    }
    Ok(())
}

fn run_file(path: PathBuf, steps: bool) -> Result<(), TallyError> {
    let source = fs::read_to_string(&path)?;
    let calculator = calculator(steps);
    let mut evaluated = 0;
    for (idx, line) in source.lines().enumerate() {
        let expression = line.trim();
        if expression.is_empty() || expression.starts_with('#') {
            continue;
        }
        debug!(line = idx + 1, expression, "evaluating line");
        let evaluation = calculator
            .evaluate(expression)
            .map_err(|diag| at_line(diag, &path, idx + 1))?;
        print_evaluation(&evaluation);
        evaluated += 1;
    }
    info!(evaluated, file = %path.display(), "finished");
    Ok(())
}

fn calculator(steps: bool) -> Calculator {
    Calculator::with_options(CalcOptions {
        record_steps: steps,
    })
}

fn print_evaluation(evaluation: &Evaluation) {
    for step in &evaluation.steps {
        println!("{step}");
    }
    println!("{}", evaluation.value);
}

fn at_line(diag: Diagnostic, path: &Path, line: usize) -> Diagnostic {
    diag.with_note(format!("at {}:{line}", path.display()))
}
