use chrono::{DateTime, Local, Utc};
use lazylife_core::{
    subtask_progress, Achievement, GroupedTasks, LevelProgress, Note, ProgressSummary, Task,
    TaskGroup, TypeCount,
};

fn short_id(id: &uuid::Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

fn checkbox(task: &Task) -> &'static str {
    if task.completed {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn format_epoch_ms(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

fn format_due(due: &DateTime<Utc>) -> String {
    due.format("%Y-%m-%d").to_string()
}

fn task_line(task: &Task, now: DateTime<Utc>) -> String {
    let due = task
        .due_date
        .as_ref()
        .map(|due| {
            let overdue = if task.is_overdue(now) { " overdue" } else { "" };
            format!("  (due {}{overdue})", format_due(due))
        })
        .unwrap_or_default();
    format!(
        "{} {} {} [{}]{}",
        checkbox(task),
        short_id(&task.id),
        task.title,
        task.kind,
        due
    )
}

fn push_group(out: &mut String, tasks: &[Task], group: &TaskGroup<'_>, now: DateTime<Utc>) {
    let progress = subtask_progress(tasks, group.parent.id)
        .map(|p| format!("  {}/{}", p.completed, p.total))
        .unwrap_or_default();
    out.push_str(&format!("{}{}\n", task_line(group.parent, now), progress));
    for sub in &group.subtasks {
        out.push_str(&format!("    {}\n", task_line(sub, now)));
    }
}

pub fn format_task_list(
    tasks: &[Task],
    grouped: &GroupedTasks<'_>,
    open_only: bool,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    for group in &grouped.open {
        push_group(&mut out, tasks, group, now);
    }
    if !open_only && !grouped.completed.is_empty() {
        if !grouped.open.is_empty() {
            out.push('\n');
        }
        out.push_str("Completed:\n");
        for group in &grouped.completed {
            push_group(&mut out, tasks, group, now);
        }
    }
    for orphan in &grouped.orphans {
        out.push_str(&format!("{}  (missing parent)\n", task_line(orphan, now)));
    }
    out
}

pub fn format_task_detail(task: &Task, subtasks: &[&Task], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(&format!("Id:        {}\n", task.id));
    out.push_str(&format!("Title:     {}\n", task.title));
    out.push_str(&format!(
        "Status:    {}\n",
        if task.completed { "done" } else { "open" }
    ));
    out.push_str(&format!("Type:      {}\n", task.kind));
    if let Some(parent_id) = task.parent_id {
        out.push_str(&format!("Parent:    {parent_id}\n"));
    }
    if let Some(due) = &task.due_date {
        let overdue = if task.is_overdue(now) { " (overdue)" } else { "" };
        out.push_str(&format!("Due:       {}{overdue}\n", format_due(due)));
    }
    out.push_str(&format!("Created:   {}\n", format_epoch_ms(task.created_at)));
    out.push_str(&format!("Updated:   {}\n", format_epoch_ms(task.updated_at)));
    if let Some(completed_at) = task.completed_at {
        out.push_str(&format!("Completed: {}\n", format_epoch_ms(completed_at)));
    }
    if !task.content.is_empty() {
        out.push_str(&format!("\n{}\n", task.content));
    }
    if !subtasks.is_empty() {
        out.push_str("\nSub-tasks:\n");
        for sub in subtasks {
            out.push_str(&format!("  {}\n", task_line(sub, now)));
        }
    }
    out
}

pub fn format_note_list(notes: &[Note]) -> String {
    let mut out = String::new();
    for note in notes {
        out.push_str(&format!(
            "{} {}  ({})\n",
            short_id(&note.id),
            note.title,
            format_epoch_ms(note.updated_at)
        ));
    }
    out
}

pub fn format_note_detail(note: &Note) -> String {
    let mut out = String::new();
    out.push_str(&format!("Id:      {}\n", note.id));
    out.push_str(&format!("Title:   {}\n", note.title));
    out.push_str(&format!("Created: {}\n", format_epoch_ms(note.created_at)));
    out.push_str(&format!("Updated: {}\n", format_epoch_ms(note.updated_at)));
    if !note.content.is_empty() {
        out.push_str(&format!("\n{}\n", note.content));
    }
    out
}

pub fn format_progress(
    summary: &ProgressSummary<'_>,
    breakdown: &[TypeCount],
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Completed {}/{} ({:.0}%), {} pending\n",
        summary.completed, summary.total, summary.percent_complete, summary.pending
    ));

    let used: Vec<&TypeCount> = breakdown.iter().filter(|count| count.total > 0).collect();
    if !used.is_empty() {
        out.push_str("\nBy type:\n");
        for count in used {
            out.push_str(&format!(
                "  {:<9} {}/{}\n",
                count.kind.as_str(),
                count.completed,
                count.total
            ));
        }
    }
    if !summary.overdue.is_empty() {
        out.push_str("\nOverdue:\n");
        for task in &summary.overdue {
            out.push_str(&format!("  {}\n", task_line(task, now)));
        }
    }
    if !summary.upcoming.is_empty() {
        out.push_str("\nUpcoming:\n");
        for task in &summary.upcoming {
            out.push_str(&format!("  {}\n", task_line(task, now)));
        }
    }
    out
}

pub fn format_level(progress: &LevelProgress, completed: u64) -> String {
    let mut out = format!("{} ({completed} completed)\n", progress.current.name);
    match progress.next {
        Some(next) => out.push_str(&format!(
            "{:.0}% to {}, {} more to go\n",
            progress.percent_to_next, next.name, progress.remaining
        )),
        None => out.push_str("Top level reached\n"),
    }
    out
}

pub fn format_achievements(
    catalog: &[Achievement],
    is_earned: impl Fn(&str) -> bool,
    earned_only: bool,
) -> String {
    let mut out = String::new();
    for achievement in catalog {
        let earned = is_earned(achievement.id);
        if earned_only && !earned {
            continue;
        }
        out.push_str(&format!(
            "{} {:<14} {}\n",
            if earned { "[x]" } else { "[ ]" },
            achievement.name,
            achievement.description
        ));
    }
    out
}

pub fn format_unlocks(unlocked: &[&Achievement]) -> String {
    unlocked
        .iter()
        .map(|achievement| {
            format!(
                "Achievement unlocked: {} ({})\n",
                achievement.name, achievement.description
            )
        })
        .collect()
}
