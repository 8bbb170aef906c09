// peel: step-by-step partial evaluator for JSFuck-style JavaScript

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use anyhow::{bail, Context};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use peel::interpreter::{define_binding, Interpreter};
use peel::parser::{parse, Delimiter, Strategy};
use peel::repl;
use peel::runtime::Environment;
use peel::stepper::Session;
use peel::ui::App;

/// Evaluate obfuscated JavaScript one layer at a time
#[derive(Parser, Debug)]
#[command(name = "peel", version, about)]
struct Cli {
    /// Program to peel
    file: PathBuf,

    /// Line prompt instead of the TUI
    #[arg(long, conflicts_with = "batch")]
    plain: bool,

    /// Print every step and exit
    #[arg(long)]
    batch: bool,

    /// Parsing strategy
    #[arg(long, env = "PEEL_STRATEGY", default_value_t = Strategy::Grammar)]
    strategy: Strategy,

    /// Shorthand for `--strategy brackets`
    #[arg(long)]
    brackets: bool,

    /// Grouping delimiter for the bracket strategy
    #[arg(long, default_value_t = Delimiter::Paren)]
    delimiter: Delimiter,

    /// Bind NAME to the value of EXPR before the first step
    #[arg(long = "define", value_name = "NAME=EXPR", value_parser = parse_define)]
    defines: Vec<(String, String)>,
}

impl Cli {
    fn strategy(&self) -> Strategy {
        match self.strategy {
            Strategy::Brackets(_) => Strategy::Brackets(self.delimiter),
            Strategy::Grammar if self.brackets => Strategy::Brackets(self.delimiter),
            Strategy::Grammar => Strategy::Grammar,
        }
    }
}

fn parse_define(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, expr)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), expr.to_string()))
        }
        _ => Err(format!("expected NAME=EXPR, got '{}'", arg)),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("cannot read '{}'", cli.file.display()))?;

    let strategy = cli.strategy();
    log::info!("parsing {} with the {} strategy", cli.file.display(), strategy);
    let tree = match parse(&source, strategy) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("{}", err.excerpt(&source));
            process::exit(1);
        }
    };
    log::debug!("tree has {} nodes", tree.len());

    let mut interpreter = Interpreter::new();
    let mut env = Environment::with_globals();
    for (name, expr) in &cli.defines {
        if let Err(err) = define_binding(&mut interpreter, &mut env, name, expr) {
            bail!("--define {}={}: {}", name, expr, err);
        }
    }

    let mut session = Session::new(Rc::new(tree));

    if cli.batch {
        let steps = repl::run_batch(&mut session, &mut interpreter, &mut env, io::stdout().lock())?;
        log::info!("rendered {} steps", steps);
        return Ok(());
    }

    if cli.plain {
        repl::run(
            &mut session,
            &mut interpreter,
            &mut env,
            io::stdin().lock(),
            io::stdout().lock(),
        )?;
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, interpreter, env);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("terminal UI failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_define() {
        assert_eq!(
            parse_define("f=![]+[]"),
            Ok(("f".to_string(), "![]+[]".to_string()))
        );
        assert_eq!(
            parse_define("eq==1"),
            Ok(("eq".to_string(), "=1".to_string()))
        );
        assert!(parse_define("=1").is_err());
        assert!(parse_define("nothing").is_err());
    }

    #[test]
    fn test_brackets_flag_selects_strategy() {
        let cli = Cli::parse_from(["peel", "x.js", "--brackets", "--delimiter", "["]);
        assert_eq!(cli.strategy(), Strategy::Brackets(Delimiter::Bracket));

        let cli = Cli::parse_from(["peel", "x.js"]);
        assert_eq!(cli.strategy(), Strategy::Grammar);
    }
}
