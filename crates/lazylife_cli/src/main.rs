mod cli;
mod output;

use std::io::BufRead;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use lazylife_core::db::open_db;
use lazylife_core::{
    group_tasks, init_logging_from_config, level_progress, progress_summary, type_breakdown,
    AchievementService, CoreConfig, Debouncer, NewTask, NoteService, SqliteSlotStore,
    SystemClock, TaskPatch, TaskService, TaskType,
};
use log::info;
use uuid::Uuid;

use cli::{Cli, Command, NoteCommand, TaskCommand, TaskEditArgs};

fn resolve_config(cli: &Cli) -> Result<CoreConfig> {
    let mut config = CoreConfig::from_env().context("invalid LAZYLIFE_* environment")?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.trim().to_ascii_lowercase();
    }
    if config.data_dir.as_os_str().is_empty() {
        bail!("no data directory; set HOME, LAZYLIFE_DATA_DIR or --data-dir");
    }
    if config.data_dir.is_relative() {
        let cwd = std::env::current_dir().context("failed to resolve current directory")?;
        config.data_dir = cwd.join(&config.data_dir);
    }
    Ok(config)
}

fn parse_kind(raw: &str) -> Result<TaskType> {
    TaskType::parse(raw).with_context(|| {
        let names: Vec<&str> = TaskType::ALL.iter().map(|kind| kind.as_str()).collect();
        format!("unknown task type '{raw}' (expected {})", names.join(", "))
    })
}

/// Accepts RFC 3339 or a bare `YYYY-MM-DD`, read as UTC midnight.
fn parse_due(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid due date '{raw}' (expected YYYY-MM-DD)"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|at| at.and_utc())
        .with_context(|| format!("invalid due date '{raw}'"))
}

/// Resolves a full id or a unique prefix of the hyphen-less form.
fn resolve_id(ids: impl IntoIterator<Item = Uuid>, raw: &str, what: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(raw) {
        return Ok(id);
    }
    let needle = raw.trim().to_ascii_lowercase().replace('-', "");
    if needle.is_empty() {
        bail!("{what} id must not be empty");
    }
    let matches: Vec<Uuid> = ids
        .into_iter()
        .filter(|id| id.simple().to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("no {what} matches id '{raw}'"),
        _ => bail!("id prefix '{raw}' is ambiguous ({} {what}s match)", matches.len()),
    }
}

fn edit_patch(fields: TaskEditArgs) -> Result<TaskPatch> {
    let due_date = if fields.clear_due {
        Some(None)
    } else {
        fields.due.as_deref().map(parse_due).transpose()?.map(Some)
    };
    let patch = TaskPatch {
        title: fields.title,
        content: fields.content,
        due_date,
        kind: fields.kind.as_deref().map(parse_kind).transpose()?,
    };
    if patch.is_empty() {
        bail!("nothing to edit (pass --title, --content, --due, --clear-due or --type)");
    }
    Ok(patch)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: file logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        lazylife_core::core_version()
    );

    let db_path = config.db_path();
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    let store = SqliteSlotStore::try_new(&conn).context("database is not usable")?;
    let clock = SystemClock;

    match cli.command {
        Command::Task(command) => run_task(command, store, clock, &config),
        Command::Note(command) => run_note(command, store, clock, &config),

        Command::Progress { json } => {
            let tasks = TaskService::load_with_retention(store, clock, config.retention_ms());
            let now = Utc::now();
            let summary = progress_summary(tasks.tasks(), now);
            let breakdown = type_breakdown(tasks.tasks());
            if json {
                let value = serde_json::json!({
                    "total": summary.total,
                    "completed": summary.completed,
                    "pending": summary.pending,
                    "percentComplete": summary.percent_complete,
                    "overdue": summary.overdue.iter().map(|t| t.id).collect::<Vec<_>>(),
                    "upcoming": summary.upcoming.iter().map(|t| t.id).collect::<Vec<_>>(),
                    "byType": breakdown.iter().map(|count| serde_json::json!({
                        "type": count.kind,
                        "completed": count.completed,
                        "total": count.total,
                    })).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", output::format_progress(&summary, &breakdown, now));
            }
            Ok(())
        }

        Command::Level => {
            let tasks = TaskService::load_with_retention(store, clock, config.retention_ms());
            let completed = tasks.stats().total_completed_count;
            print!(
                "{}",
                output::format_level(&level_progress(completed), completed)
            );
            Ok(())
        }

        Command::Achievements { earned } => {
            let achievements = AchievementService::load(store);
            print!(
                "{}",
                output::format_achievements(
                    achievements.catalog(),
                    |id| achievements.is_earned(id),
                    earned,
                )
            );
            eprintln!(
                "{}/{} earned",
                achievements.earned().len(),
                achievements.catalog().len()
            );
            Ok(())
        }
    }
}

fn run_task(
    command: TaskCommand,
    store: SqliteSlotStore<'_>,
    clock: SystemClock,
    config: &CoreConfig,
) -> Result<()> {
    let mut tasks = TaskService::load_with_retention(store, clock, config.retention_ms());
    let mut achievements = AchievementService::load(store);
    achievements.prime(tasks.tasks());
    let now = Utc::now();

    match command {
        TaskCommand::Add {
            title,
            due,
            kind,
            parent,
        } => {
            let mut input = NewTask::new(title).kind(parse_kind(&kind)?);
            if let Some(due) = due {
                input = input.due(parse_due(&due)?);
            }
            if let Some(parent) = parent {
                let parent_id = resolve_id(tasks.tasks().iter().map(|t| t.id), &parent, "task")?;
                input = input.under(parent_id);
            }
            let task = tasks.add(input)?;
            println!("{}", task.id);
            eprintln!("Added task '{}'", task.title);
        }

        TaskCommand::List { open, json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(tasks.tasks())?);
            } else {
                let grouped = group_tasks(tasks.tasks());
                print!(
                    "{}",
                    output::format_task_list(tasks.tasks(), &grouped, open, now)
                );
            }
        }

        TaskCommand::Show { id, json } => {
            let id = resolve_id(tasks.tasks().iter().map(|t| t.id), &id, "task")?;
            let task = tasks
                .get(id)
                .with_context(|| format!("task not found: {id}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(task)?);
            } else {
                let mut subtasks: Vec<_> = tasks.subtasks(id).collect();
                subtasks.sort_by_key(|sub| sub.created_at);
                print!("{}", output::format_task_detail(task, &subtasks, now));
            }
        }

        TaskCommand::Edit { id, fields } => {
            let id = resolve_id(tasks.tasks().iter().map(|t| t.id), &id, "task")?;
            tasks.update(id, edit_patch(fields)?)?;
            eprintln!("Updated task {id}");
        }

        TaskCommand::Toggle { id } => {
            let id = resolve_id(tasks.tasks().iter().map(|t| t.id), &id, "task")?;
            let outcome = tasks.toggle_completion(id)?;
            let state = if outcome.completed { "done" } else { "open" };
            eprintln!("Marked task {id} as {state}");
            let related = outcome.changed.len().saturating_sub(1);
            if related > 0 {
                eprintln!("{related} related task(s) updated");
            }
        }

        TaskCommand::Rm { id } => {
            let id = resolve_id(tasks.tasks().iter().map(|t| t.id), &id, "task")?;
            let removed = tasks.delete(id)?;
            eprintln!("Removed {} task(s)", removed.len());
        }
    }

    let unlocked = achievements.observe(tasks.tasks(), tasks.stats());
    eprint!("{}", output::format_unlocks(&unlocked));
    Ok(())
}

fn run_note(
    command: NoteCommand,
    store: SqliteSlotStore<'_>,
    clock: SystemClock,
    config: &CoreConfig,
) -> Result<()> {
    let mut notes = NoteService::load(store, clock);

    match command {
        NoteCommand::Add { title, content } => {
            let note = notes.add();
            if title.is_some() || content.is_some() {
                notes.update(
                    note.id,
                    title.unwrap_or(note.title.clone()),
                    content.unwrap_or_default(),
                )?;
            }
            println!("{}", note.id);
            eprintln!("Added note");
        }

        NoteCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(notes.notes())?);
            } else {
                print!("{}", output::format_note_list(notes.notes()));
            }
        }

        NoteCommand::Show { id, json } => {
            let id = resolve_id(notes.notes().iter().map(|n| n.id), &id, "note")?;
            let note = notes
                .get(id)
                .with_context(|| format!("note not found: {id}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(note)?);
            } else {
                print!("{}", output::format_note_detail(note));
            }
        }

        NoteCommand::Edit { id, title, content } => {
            let id = resolve_id(notes.notes().iter().map(|n| n.id), &id, "note")?;
            let current = notes
                .get(id)
                .with_context(|| format!("note not found: {id}"))?;
            let title = title.unwrap_or_else(|| current.title.clone());
            let content = content.unwrap_or_else(|| current.content.clone());
            if notes.apply_edit(id, &title, &content)? {
                eprintln!("Updated note {id}");
            } else {
                eprintln!("No changes");
            }
        }

        NoteCommand::Write { id } => {
            let id = resolve_id(notes.notes().iter().map(|n| n.id), &id, "note")?;
            let mut autosave = Debouncer::new(config.autosave_delay_ms);
            let mut read_error = None;
            let drafts = std::io::stdin()
                .lock()
                .lines()
                .map_while(|line| match line {
                    Ok(line) => Some(line),
                    Err(err) => {
                        read_error = Some(err);
                        None
                    }
                })
                .scan(None::<String>, |buffer, line| {
                    let next = match buffer.take() {
                        Some(prev) => format!("{prev}\n{line}"),
                        None => line,
                    };
                    *buffer = Some(next.clone());
                    Some(next)
                });
            let writes = notes.stream_content(id, drafts, &mut autosave)?;
            if let Some(err) = read_error {
                return Err(err).context("failed to read note content from stdin");
            }
            eprintln!("Wrote note {id} ({writes} save(s))");
        }

        NoteCommand::Rm { id } => {
            let id = resolve_id(notes.notes().iter().map(|n| n.id), &id, "note")?;
            notes.delete(id)?;
            eprintln!("Removed note {id}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_due, parse_kind, resolve_id};
    use lazylife_core::TaskType;
    use uuid::Uuid;

    #[test]
    fn due_accepts_date_and_rfc3339() {
        let date = parse_due("2024-03-01").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        let full = parse_due("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(full.to_rfc3339(), "2024-03-01T08:00:00+00:00");
        assert!(parse_due("next week").is_err());
    }

    #[test]
    fn kind_is_case_insensitive() {
        assert_eq!(parse_kind("Work").unwrap(), TaskType::Work);
        assert!(parse_kind("gym").unwrap_err().to_string().contains("club"));
    }

    #[test]
    fn id_prefix_must_be_unique() {
        let a = Uuid::parse_str("aaaa1111-0000-0000-0000-000000000000").unwrap();
        let b = Uuid::parse_str("aaaa2222-0000-0000-0000-000000000000").unwrap();
        assert_eq!(resolve_id([a, b], "aaaa1", "task").unwrap(), a);
        assert!(resolve_id([a, b], "aaaa", "task").is_err());
        assert!(resolve_id([a, b], "ffff", "task").is_err());
        assert_eq!(resolve_id(Vec::new(), &b.to_string(), "task").unwrap(), b);
    }
}
