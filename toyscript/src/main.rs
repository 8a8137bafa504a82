//! The toyscript CLI: a sample language built on `langkit` (grounded in
//! `toyscript/toyscript.go`'s `main`, which reads a script path and
//! calls `engine.Execute` on the opened file).

mod booleans;
mod evaluator;
mod functions;
mod language_spec;
mod operators;

use std::fs::File;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use log::info;

use langkit::{Engine, Lexer, Parser as LangParser};

use evaluator::ToyscriptEvaluator;
use functions::to_display_string;
use language_spec::build_registry;

#[derive(ClapParser)]
#[command(name = "toyscript", about = "Run a toyscript program")]
struct Cli {
    /// Path to the .toy script to run
    script: String,

    /// Print the parsed token tree before evaluating
    #[arg(long)]
    print_tree: bool,

    /// Raise log verbosity
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let registry = build_registry();

    let file = match File::open(&cli.script) {
        Ok(file) => file,
        Err(err) => {
            println!("toyscript: cannot open {}: {err}", cli.script);
            return ExitCode::FAILURE;
        }
    };

    if cli.print_tree {
        let print_file = match File::open(&cli.script) {
            Ok(file) => file,
            Err(err) => {
                println!("toyscript: cannot open {}: {err}", cli.script);
                return ExitCode::FAILURE;
            }
        };
        let mut lexer = Lexer::new(print_file, &registry);
        let mut parser = LangParser::new(&mut lexer);
        match parser.statements() {
            Ok(statements) => {
                for statement in &statements {
                    print!("{statement}");
                }
            }
            Err(err) => {
                println!("toyscript: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    info!("executing {}", cli.script);
    let mut engine = Engine::new(&registry, ToyscriptEvaluator::new());
    match engine.execute(file) {
        Ok(value) => {
            println!("{}", to_display_string(&value));
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("toyscript: {}: {} at {}:{}", err.kind(), err.message(), err.line(), err.col());
            ExitCode::FAILURE
        }
    }
}
