//! Line-oriented front ends
//!
//! [`run`] is the interactive prompt: it prints the source, then asks
//! `Steps: ` until the sequence is exhausted. [`run_batch`] prints every
//! rendering without asking. Both write to any [`Write`] so they can be
//! driven from tests.
//!
//! The TUI's command line accepts the same [`Command`]s.

use crate::interpreter::{define_binding, HostEvaluator};
use crate::runtime::{display, Environment};
use crate::stepper::{Session, StepError};
use std::io::{self, BufRead, Write};

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Advance(usize),
    Restart,
    Set { name: String, source: String },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("usage: set NAME EXPR")]
    SetUsage,
}

impl Command {
    /// Parse a line; anything that is not a command or a count means one step
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word {
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "restart" => Ok(Command::Restart),
            "set" => {
                let (name, source) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::SetUsage)?;
                Ok(Command::Set {
                    name: name.to_string(),
                    source: source.trim().to_string(),
                })
            }
            // Leading digits count, like parseInt
            _ => {
                let digits: String = line.chars().take_while(|c| c.is_ascii_digit()).collect();
                Ok(Command::Advance(digits.parse().unwrap_or(1)))
            }
        }
    }
}

/// Errors that end a batch run
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Step(#[from] StepError),
}

/// Interactive prompt over `input`, writing renderings to `output`
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    evaluator: &mut dyn HostEvaluator,
    env: &mut Environment,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    writeln!(output, "\n{}\n", session.tree().source())?;

    let mut line = String::new();
    while !session.is_finished() {
        write!(output, "Steps: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{}", err)?;
                continue;
            }
        };
        log::debug!("command {:?}", command);

        match command {
            Command::Quit => break,
            Command::Restart => {
                session.restart();
                writeln!(output, "\n{}\n", session.tree().source())?;
            }
            Command::Set { name, source } => {
                match define_binding(evaluator, env, &name, &source).and_then(|v| display(&v)) {
                    Ok(shown) => writeln!(output, "{} = {}", name, shown)?,
                    Err(err) => writeln!(output, "{}", err)?,
                }
            }
            Command::Advance(count) => match session.advance(count, evaluator, env) {
                Ok(text) => writeln!(output, "\n{}\n", text)?,
                Err(StepError::Finished) => break,
                Err(err) => writeln!(output, "{}", err)?,
            },
        }
    }

    Ok(())
}

/// Print every remaining rendering, one per line; returns how many
pub fn run_batch<W: Write>(
    session: &mut Session,
    evaluator: &mut dyn HostEvaluator,
    env: &mut Environment,
    mut output: W,
) -> Result<usize, BatchError> {
    let mut rendered = 0;
    loop {
        match session.advance(1, evaluator, env) {
            Ok(text) => {
                writeln!(output, "{}", text)?;
                rendered += 1;
            }
            Err(StepError::Finished) => return Ok(rendered),
            Err(err) => return Err(err.into()),
        }
    }
}
