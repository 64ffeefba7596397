use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use schemapad_common::Position;
use schemapad_editor::{CompletionList, DocumentRole, TypedSession};
use schemapad_engine::JsonEngine;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Instance document to query
    pub instance: PathBuf,

    /// Schema document driving the suggestions
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Cursor as a byte offset into the instance text
    #[arg(long, conflicts_with = "at")]
    pub offset: Option<usize>,

    /// Cursor as 1-based line:column editor coordinates
    #[arg(long)]
    pub at: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn suggest(args: SuggestArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let schema_text = read(&args.schema)?;
    let instance_text = read(&args.instance)?;

    let session = TypedSession::new(JsonEngine::new(), &schema_text, &instance_text)?;

    let offset = match (&args.offset, &args.at) {
        (Some(offset), _) => *offset,
        (None, Some(at)) => {
            let position = parse_position(at)?;
            session
                .instance()
                .line_index()
                .offset_at(&instance_text, position)
        }
        (None, None) => return Err(anyhow!("Pass a cursor with --offset or --at line:column")),
    };

    let list = session.completions_at(
        DocumentRole::Instance,
        offset,
        &config.completion_options(),
    );

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    match list {
        None => println!("{} no suggestions at offset {}", "∅".dimmed(), offset),
        Some(list) => print_list(&list),
    }
    Ok(())
}

fn print_list(list: &CompletionList) {
    println!(
        "{} {} suggestion(s) at {}",
        "→".cyan(),
        list.items.len(),
        if list.pointer.is_empty() {
            "document root"
        } else {
            &list.pointer
        }
    );
    for item in &list.items {
        println!("  {}  {}", item.label.bold(), item.detail.dimmed());
    }
}

/// Parse `line:column`, both 1-based
fn parse_position(at: &str) -> Result<Position> {
    let (line, column) = at
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected line:column, got '{at}'"))?;
    Ok(Position::new(
        line.trim().parse().context("Bad line number")?,
        column.trim().parse().context("Bad column number")?,
    ))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}
