use crate::config::{Config, FailOn};
use crate::watcher::FileWatcher;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use schemapad_common::{Marker, Severity};
use schemapad_editor::{MarkerDecoration, SessionUpdate, TypedSession};
use schemapad_engine::{report, JsonEngine};
use schemapad_live::LiveSession;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Instance document to validate
    pub instance: PathBuf,

    /// Schema document to validate it against
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Keep the session open and re-check on every file change
    #[arg(short, long)]
    pub watch: bool,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    if args.watch {
        return watch(&args, &config);
    }

    let update = check_once(&args.schema, &args.instance, &args.format)?;
    if exceeds_threshold(&update, config.fail_on) {
        std::process::exit(1);
    }
    Ok(())
}

/// One-shot validation of both documents; prints and returns the projection
pub fn check_once(schema_path: &Path, instance_path: &Path, format: &str) -> Result<SessionUpdate> {
    let schema_text = read(schema_path)?;
    let instance_text = read(instance_path)?;

    let session = TypedSession::new(JsonEngine::new(), &schema_text, &instance_text)?;
    let update = session.project();

    print_update(&update, schema_path, &schema_text, instance_path, &instance_text, format)?;
    Ok(update)
}

fn watch(args: &CheckArgs, config: &Config) -> Result<()> {
    let schema_text = read(&args.schema)?;
    let instance_text = read(&args.instance)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let live = LiveSession::spawn(
            JsonEngine::new(),
            &schema_text,
            &instance_text,
            config.completion_options(),
        )?;

        print_snapshot(&live.snapshot(), args)?;
        println!("{} watching for changes...", "→".cyan());

        let watcher = FileWatcher::new(&[args.schema.as_path(), args.instance.as_path()])?;
        while watcher.next_event().is_some() {
            watcher.settle();

            // Editors fire events for siblings too; re-reading both files is
            // cheaper than filtering paths across editor save strategies
            if let Ok(text) = fs::read_to_string(&args.schema) {
                live.edit_schema(text).await?;
            }
            if let Ok(text) = fs::read_to_string(&args.instance) {
                live.edit_instance(text).await?;
            }

            print_snapshot(&live.settled().await?, args)?;
        }
        Ok::<(), anyhow::Error>(())
    })
}

fn print_snapshot(snapshot: &schemapad_live::DecorationSnapshot, args: &CheckArgs) -> Result<()> {
    let update = SessionUpdate {
        schema_markers: snapshot.schema_markers.clone(),
        instance_markers: snapshot.instance_markers.clone(),
        stale: snapshot.stale,
    };
    let schema_text = read(&args.schema)?;
    let instance_text = read(&args.instance)?;
    print_update(&update, &args.schema, &schema_text, &args.instance, &instance_text, &args.format)
}

fn print_update(
    update: &SessionUpdate,
    schema_path: &Path,
    schema_text: &str,
    instance_path: &Path,
    instance_text: &str,
    format: &str,
) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(update)?);
        return Ok(());
    }

    print_markers(schema_path, schema_text, &update.schema_markers);
    print_markers(instance_path, instance_text, &update.instance_markers);

    let errors = count(update, Severity::Error);
    let warnings = count(update, Severity::Warning);
    if errors == 0 && warnings == 0 {
        println!("{} No issues found", "✓".green());
    } else {
        if errors > 0 {
            println!("{} {}", "Errors:".red(), errors);
        }
        if warnings > 0 {
            println!("{} {}", "Warnings:".yellow(), warnings);
        }
    }
    if update.stale {
        println!("{} results are stale: the last engine call failed", "!".yellow());
    }
    Ok(())
}

fn print_markers(path: &Path, text: &str, decorations: &[MarkerDecoration]) {
    if decorations.is_empty() {
        return;
    }
    let markers: Vec<Marker> = decorations
        .iter()
        .map(|d| Marker {
            severity: d.severity,
            pointer: d.source.clone(),
            message: d.message.clone(),
            span: d.span,
        })
        .collect();
    print!(
        "{}",
        report::format_markers(text, &path.display().to_string(), &markers)
    );
}

fn count(update: &SessionUpdate, severity: Severity) -> usize {
    update
        .schema_markers
        .iter()
        .chain(update.instance_markers.iter())
        .filter(|d| d.severity == severity)
        .count()
}

fn exceeds_threshold(update: &SessionUpdate, fail_on: FailOn) -> bool {
    match fail_on {
        FailOn::Error => count(update, Severity::Error) > 0,
        FailOn::Warning => {
            count(update, Severity::Error) > 0 || count(update, Severity::Warning) > 0
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}
