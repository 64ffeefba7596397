mod commands;
mod config;
mod watcher;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, suggest, CheckArgs, SuggestArgs};

/// Schemapad CLI - live JSON + JSON Schema checking and suggestions
#[derive(Parser, Debug)]
#[command(name = "schemapad")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate an instance document against a schema document
    Check(CheckArgs),

    /// List completion candidates at a cursor position
    Suggest(SuggestArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let cwd = std::env::current_dir()
        .expect("Cannot get current directory")
        .display()
        .to_string();

    let result = match cli.command {
        Command::Check(args) => check(args, &cwd),
        Command::Suggest(args) => suggest(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
