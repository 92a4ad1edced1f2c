use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use jsrefactor::config::{load_or_default, Config, CONFIG_FILE};
use jsrefactor::{
    Editor, FileChange, FileEditor, Outcome, Position, Prompter, ScriptedPrompter, Selection,
    TerminalPrompter,
};
use jsrefactor::{CodeReference, Registry};
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Markers that identify the root of a JavaScript workspace.
const WORKSPACE_MARKERS: &[&str] = &[CONFIG_FILE, "package.json", "tsconfig.json", ".git"];

#[derive(Parser)]
#[command(name = "jsrefactor")]
#[command(about = "Cursor-driven refactorings for JavaScript and TypeScript", long_about = None)]
#[command(version)]
struct Cli {
    /// Log what the engine does (same as RUST_LOG=jsrefactor=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Target {
    /// File to refactor
    file: PathBuf,

    /// Cursor position, 1-based LINE:COLUMN
    #[arg(short, long, conflicts_with = "range")]
    cursor: Option<String>,

    /// Selected range, 1-based LINE:COLUMN-LINE:COLUMN
    #[arg(short, long)]
    range: Option<String>,

    /// Path to workspace root (auto-detected if not specified)
    #[arg(short, long)]
    workspace: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a refactoring at a position
    Apply {
        /// Refactoring id, see `jsrefactor list`
        refactoring: String,

        #[command(flatten)]
        target: Target,

        /// Dry run - show what would be changed without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Answer to a choice prompt, 1-based
        #[arg(long)]
        choice: Option<usize>,

        /// Answer to a text prompt
        #[arg(long)]
        input: Option<String>,
    },

    /// List the refactorings enabled in a workspace
    List {
        /// Path to workspace root (defaults to the current directory)
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },

    /// List references to the symbol at a position
    References {
        #[command(flatten)]
        target: Target,

        /// Print the references as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Apply {
            refactoring,
            target,
            dry_run,
            diff,
            json,
            choice,
            input,
        } => {
            let prompter = scripted_answers(choice, input);
            cmd_apply(&refactoring, target, dry_run, diff, json, prompter)
        }
        Commands::List { workspace } => cmd_list(workspace),
        Commands::References { target, json } => cmd_references(target, json),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("jsrefactor=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Prompt answers given on the command line, if any.
fn scripted_answers(choice: Option<usize>, input: Option<String>) -> Option<ScriptedPrompter> {
    if choice.is_none() && input.is_none() {
        return None;
    }
    let mut prompter = ScriptedPrompter::new();
    if let Some(choice) = choice {
        prompter = match choice.checked_sub(1) {
            Some(index) => prompter.answer_choice(index),
            None => prompter.dismiss_choice(),
        };
    }
    if let Some(input) = input {
        prompter = prompter.answer_input(input);
    }
    Some(prompter)
}

fn parse_position(input: &str) -> Result<Position> {
    Position::parse_one_based(input)
        .with_context(|| format!("invalid position '{input}', expected LINE:COLUMN from 1:1"))
}

fn parse_selection(cursor: Option<&str>, range: Option<&str>) -> Result<Selection> {
    match (cursor, range) {
        (Some(cursor), _) => Ok(Selection::cursor_at_position(parse_position(cursor)?)),
        (None, Some(range)) => {
            let (start, end) = range
                .split_once('-')
                .with_context(|| format!("invalid range '{range}', expected L:C-L:C"))?;
            Ok(Selection::from_positions(
                parse_position(start)?,
                parse_position(end)?,
            ))
        }
        (None, None) => bail!("either --cursor or --range is required"),
    }
}

/// Resolve the workspace root.
///
/// Priority: explicit flag, `JSREFACTOR_WORKSPACE`, closest ancestor of the
/// file holding a workspace marker, then the file's directory.
fn resolve_workspace(cli_workspace: Option<PathBuf>, file: &Path) -> Result<PathBuf> {
    if let Some(path) = cli_workspace {
        return path
            .canonicalize()
            .with_context(|| format!("workspace not found: {}", path.display()));
    }

    if let Ok(env_path) = env::var("JSREFACTOR_WORKSPACE") {
        let path = PathBuf::from(&env_path);
        if path.exists() {
            return Ok(path.canonicalize()?);
        }
        eprintln!(
            "{}",
            format!("Warning: JSREFACTOR_WORKSPACE is set but path doesn't exist: {env_path}")
                .yellow()
        );
    }

    let directory = file
        .parent()
        .context("file has no parent directory")?
        .to_path_buf();
    let detected = directory
        .ancestors()
        .find(|dir| WORKSPACE_MARKERS.iter().any(|m| dir.join(m).exists()))
        .map(Path::to_path_buf);
    Ok(detected.unwrap_or(directory))
}

struct Session {
    editor: FileEditor,
    config: Config,
}

fn open(target: &Target, dry_run: bool, prompter: Box<dyn Prompter>) -> Result<Session> {
    let file = target
        .file
        .canonicalize()
        .with_context(|| format!("file not found: {}", target.file.display()))?;
    let workspace = resolve_workspace(target.workspace.clone(), &file)?;
    let config = load_or_default(&workspace)?;
    let selection = parse_selection(target.cursor.as_deref(), target.range.as_deref())?;

    let editor = FileEditor::open(&file, &workspace, selection)
        .with_context(|| format!("cannot open {}", file.display()))?
        .with_dry_run(dry_run)
        .with_ignored_folders(config.workspace.ignored_folders.clone())
        .with_prompter(prompter);
    Ok(Session { editor, config })
}

#[derive(Serialize)]
struct ApplyReport<'a> {
    refactoring: &'a str,
    outcome: &'static str,
    message: Option<&'a str>,
    cursor: String,
    dry_run: bool,
    changes: &'a [FileChange],
}

fn cmd_apply(
    id: &str,
    target: Target,
    dry_run: bool,
    show_diff: bool,
    json: bool,
    prompter: Option<ScriptedPrompter>,
) -> Result<()> {
    let prompter: Box<dyn Prompter> = match prompter {
        Some(prompter) => Box::new(prompter),
        None => Box::new(TerminalPrompter),
    };
    let Session { mut editor, config } = open(&target, dry_run, prompter)?;
    let registry = Registry::from_config(&config);

    let outcome = registry.execute(id, &mut editor)?;
    let changes = editor.changes();

    if json {
        let (label, message) = match &outcome {
            Outcome::Applied => ("applied", None),
            Outcome::Reported(reason) => ("reported", Some(reason.as_str())),
            Outcome::Cancelled => ("cancelled", None),
        };
        let report = ApplyReport {
            refactoring: id,
            outcome: label,
            message,
            cursor: editor.selection().start.to_one_based(),
            dry_run,
            changes: &changes,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &outcome {
            Outcome::Applied if changes.is_empty() => {
                println!("{}", "Nothing to change".dimmed());
            }
            Outcome::Applied => {
                for change in &changes {
                    let verb = if dry_run { "Would modify" } else { "Modified" };
                    println!("{} {}", verb.green(), change.path.display());
                    if show_diff || dry_run {
                        print_diff(&change.path, &change.before, &change.after);
                    }
                }
                println!(
                    "{} {}",
                    "Cursor:".dimmed(),
                    editor.selection().start.to_one_based()
                );
            }
            Outcome::Reported(reason) => eprintln!("{} {reason}", "✗".red()),
            Outcome::Cancelled => eprintln!("{}", "Cancelled".yellow()),
        }
    }

    if matches!(outcome, Outcome::Reported(_)) {
        std::process::exit(1);
    }
    Ok(())
}

fn print_diff(file: &Path, original: &str, modified: &str) {
    println!("{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
        if change.missing_newline() {
            println!();
        }
    }
}

fn cmd_list(workspace: Option<PathBuf>) -> Result<()> {
    let root = match workspace {
        Some(path) => path,
        None => env::current_dir()?,
    };
    let config = load_or_default(&root)?;
    let registry = Registry::from_config(&config);

    for refactoring in registry.iter() {
        println!("{:<40} {}", refactoring.id.bold(), refactoring.title);
    }
    Ok(())
}

fn cmd_references(target: Target, json: bool) -> Result<()> {
    let Session { editor, .. } = open(&target, true, Box::new(TerminalPrompter))?;
    let references = editor.get_selection_references(editor.selection())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&references)?);
        return Ok(());
    }
    if references.is_empty() {
        println!("{}", "No symbol at this position".yellow());
        return Ok(());
    }
    for CodeReference { file, selection, .. } in &references {
        let relative = file.strip_prefix(editor.workspace_root()).unwrap_or(file);
        println!(
            "{}:{}",
            relative.display(),
            selection.start.to_one_based().cyan()
        );
    }
    Ok(())
}
