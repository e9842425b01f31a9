//! todomenubar: the todo list and toolbar shortcuts from the command line.
//!
//! Each invocation loads `todos.json`, applies one command and saves.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use todomenubar_lib::core::settings::save_settings;
use todomenubar_lib::plugins::shortcuts::launcher::{lookup_bundle_id, reveal_dir};
use todomenubar_lib::plugins::shortcuts::types::{find_shortcut, SHORTCUTS};
use todomenubar_lib::plugins::shortcuts::{open_shortcut, resolve_shortcut};
use todomenubar_lib::plugins::todo::types::{Mutation, SaveStatus, TodoRecord};
use todomenubar_lib::plugins::todo::TodoStore;
use todomenubar_lib::AppState;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "todomenubar")]
#[command(about = "A small todo list with shortcut buttons", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the todo list
    List {
        /// Show the archive instead
        #[arg(long)]
        archive: bool,
    },

    /// Add a todo at the top of the list
    Add {
        /// Todo text
        #[arg(required = true)]
        title: Vec<String>,
    },

    /// Mark a todo done, or not done
    Toggle {
        /// Position (1-based) or id prefix
        todo: String,
    },

    /// Change a todo's text
    Edit {
        /// Position (1-based) or id prefix
        todo: String,

        /// New text
        #[arg(required = true)]
        title: Vec<String>,
    },

    /// Set or clear a due date
    Due {
        /// Position (1-based) or id prefix
        todo: String,

        /// RFC 3339, "YYYY-MM-DD HH:MM", "YYYY-MM-DD", or "none"
        when: String,
    },

    /// Delete todos
    Rm {
        /// Positions (1-based) or id prefixes
        #[arg(required = true)]
        todos: Vec<String>,
    },

    /// Move todos to a new position
    Mv {
        /// Positions (1-based) or id prefixes
        #[arg(required = true)]
        todos: Vec<String>,

        /// Position (1-based) the todos are moved in front of; past the end appends
        #[arg(long)]
        to: usize,
    },

    /// Delete every todo
    Clear,

    /// Move completed todos to archive.json
    Archive,

    /// Toolbar shortcuts
    Shortcuts {
        #[command(subcommand)]
        command: Option<ShortcutCommands>,
    },

    /// Print the data directory
    DataDir {
        /// Open it in the file manager
        #[arg(long)]
        open: bool,
    },
}

#[derive(Subcommand)]
enum ShortcutCommands {
    /// List shortcuts and their values
    List,

    /// Open a shortcut
    Open {
        /// Button name or preference key
        name: String,
    },

    /// Override a shortcut's URL or bundle identifier
    Set {
        /// Button name or preference key
        name: String,
        value: String,
    },

    /// Restore a shortcut's default
    Reset {
        /// Button name or preference key
        name: String,
    },

    /// Look up an application's bundle identifier (macOS)
    Lookup {
        /// Application name, e.g. "Microsoft Outlook"
        app: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut app = AppState::init(false);

    match cli.command {
        Commands::List { archive } => {
            let records = if archive {
                app.store.archived()
            } else {
                app.store.records().to_vec()
            };
            print_records(&records);
        }
        Commands::Add { title } => {
            let result = app.store.add(&title.join(" "));
            if !result.changed {
                bail!("Todo text cannot be empty");
            }
            report(&result);
        }
        Commands::Toggle { todo } => {
            let id = resolve_todo(&app.store, &todo)?;
            report(&app.store.toggle_completion(id));
        }
        Commands::Edit { todo, title } => {
            let id = resolve_todo(&app.store, &todo)?;
            report(&app.store.update_title(id, &title.join(" ")));
        }
        Commands::Due { todo, when } => {
            let id = resolve_todo(&app.store, &todo)?;
            let due = parse_due(&when)?;
            report(&app.store.set_due(id, due));
        }
        Commands::Rm { todos } => {
            let indices = resolve_positions(&app.store, &todos)?;
            report(&app.store.remove_at(&indices));
        }
        Commands::Mv { todos, to } => {
            let indices = resolve_positions(&app.store, &todos)?;
            report(&app.store.reorder(&indices, to.saturating_sub(1)));
        }
        Commands::Clear => {
            report(&app.store.delete_all());
        }
        Commands::Archive => {
            let outcome = app.store.archive_completed();
            match &outcome.save {
                SaveStatus::Failed(reason) if outcome.archived == 0 => {
                    bail!("Archiving failed, nothing was moved: {}", reason)
                }
                save => {
                    println!("Archived {} todo(s)", outcome.archived);
                    warn_if_failed(save);
                }
            }
        }
        Commands::Shortcuts { command } => {
            run_shortcuts(&mut app, command.unwrap_or(ShortcutCommands::List))?;
        }
        Commands::DataDir { open } => {
            let dir = app.settings.data_dir();
            println!("{}", dir.display());
            if open {
                reveal_dir(&dir).context("Failed to open data directory")?;
            }
        }
    }

    Ok(())
}

fn run_shortcuts(app: &mut AppState, command: ShortcutCommands) -> Result<()> {
    match command {
        ShortcutCommands::List => {
            for shortcut in SHORTCUTS {
                let value = app.settings.preference(shortcut.key).unwrap_or_default();
                let marker = if app.settings.shortcuts.contains_key(shortcut.key) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {:<10} {:<12} {}",
                    marker,
                    shortcut.name.bold(),
                    shortcut.tooltip.dimmed(),
                    value
                );
            }
        }
        ShortcutCommands::Open { name } => {
            let target = open_shortcut(&app.settings, &name)?;
            println!("Opened {:?}", target);
        }
        ShortcutCommands::Set { name, value } => {
            app.settings.set_preference(&name, &value)?;
            save_settings(&app.settings)?;
            let target = resolve_shortcut(&app.settings, &name)?;
            println!("{} -> {:?}", name, target);
        }
        ShortcutCommands::Reset { name } => {
            let shortcut =
                find_shortcut(&name).with_context(|| format!("Unknown shortcut: {}", name))?;
            if app.settings.reset_preference(&name)? {
                save_settings(&app.settings)?;
            }
            println!("{} -> {}", shortcut.name, shortcut.default_value);
        }
        ShortcutCommands::Lookup { app: app_name } => {
            println!("{}", lookup_bundle_id(&app_name)?);
        }
    }
    Ok(())
}

fn print_records(records: &[TodoRecord]) {
    if records.is_empty() {
        println!("{}", "Nothing to do".dimmed());
        return;
    }

    for (index, record) in records.iter().enumerate() {
        let id = record.id.to_string();
        let short_id = &id[..8];
        let due = record
            .due
            .map(|d| format!("  (due {})", d.with_timezone(&Local).format("%a %b %-d, %Y %H:%M")))
            .unwrap_or_default();

        if record.is_completed {
            println!(
                "{:>3}. {} {} {}{}",
                index + 1,
                "✓".green(),
                short_id.dimmed(),
                record.title.strikethrough(),
                due.dimmed()
            );
        } else {
            println!(
                "{:>3}. ○ {} {}{}",
                index + 1,
                short_id.dimmed(),
                record.title,
                due
            );
        }
    }
}

fn report(result: &Mutation) {
    if !result.changed {
        println!("{}", "Nothing changed".dimmed());
        return;
    }
    warn_if_failed(&result.save);
}

fn warn_if_failed(save: &SaveStatus) {
    if let SaveStatus::Failed(reason) = save {
        eprintln!("{} changes were not saved: {}", "warning:".yellow(), reason);
    }
}

/// A 1-based position or a unique id prefix.
fn resolve_todo(store: &TodoStore, reference: &str) -> Result<Uuid> {
    let index = store.resolve(reference)?;
    Ok(store.records()[index].id)
}

fn resolve_positions(store: &TodoStore, references: &[String]) -> Result<Vec<usize>> {
    references
        .iter()
        .map(|r| store.resolve(r).map_err(anyhow::Error::from))
        .collect()
}

fn parse_due(when: &str) -> Result<Option<DateTime<Utc>>> {
    let when = when.trim();
    if when.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(when) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    let naive = match NaiveDateTime::parse_from_str(when, "%Y-%m-%d %H:%M") {
        Ok(naive) => Some(naive),
        Err(_) => NaiveDate::parse_from_str(when, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0)),
    };

    let naive = naive.with_context(|| format!("Unrecognized date: {}", when))?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("{} does not exist in the local time zone", when))?;
    Ok(Some(local.with_timezone(&Utc)))
}
