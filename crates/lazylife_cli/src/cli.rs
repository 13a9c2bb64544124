use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lazylife", version, about = "Offline task and note manager")]
pub struct Cli {
    /// Data directory holding the database and logs [default: ~/.lazylife]
    #[arg(long, env = "LAZYLIFE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LAZYLIFE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Manage notes
    #[command(subcommand)]
    Note(NoteCommand),

    /// Show completion progress, overdue and upcoming tasks
    Progress {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current level and distance to the next one
    Level,

    /// List achievements and which ones are earned
    Achievements {
        /// Only list earned achievements
        #[arg(long)]
        earned: bool,
    },
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(short, long)]
        due: Option<String>,
        /// Category (personal, home, work, couple, study, club)
        #[arg(short = 't', long = "type", default_value = "personal")]
        kind: String,
        /// Parent task id (or unique id prefix)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// List tasks grouped under their parents
    List {
        /// Hide completed tasks
        #[arg(long)]
        open: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show task details
    Show {
        /// Task id (or unique id prefix)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a task
    Edit {
        /// Task id (or unique id prefix)
        id: String,
        #[command(flatten)]
        fields: TaskEditArgs,
    },

    /// Toggle completion; parents carry their sub-tasks along
    Toggle {
        /// Task id (or unique id prefix)
        id: String,
    },

    /// Remove a task and, for parents, all of its sub-tasks
    Rm {
        /// Task id (or unique id prefix)
        id: String,
    },
}

#[derive(Args)]
pub struct TaskEditArgs {
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New content
    #[arg(short, long)]
    pub content: Option<String>,
    /// New due date (YYYY-MM-DD or RFC 3339)
    #[arg(short, long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
    /// New category
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,
}

#[derive(Subcommand)]
pub enum NoteCommand {
    /// Add a note
    Add {
        /// Note title [default: "New Note"]
        #[arg(long)]
        title: Option<String>,
        /// Note content
        #[arg(short, long)]
        content: Option<String>,
    },

    /// List notes, most recently edited first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a note
    Show {
        /// Note id (or unique id prefix)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a note
    Edit {
        /// Note id (or unique id prefix)
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New content
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Replace a note's content from stdin, autosaving while input streams in
    Write {
        /// Note id (or unique id prefix)
        id: String,
    },

    /// Remove a note
    Rm {
        /// Note id (or unique id prefix)
        id: String,
    },
}
