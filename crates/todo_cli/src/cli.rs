use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// File-backed todo tracker.
/// Storage defaults to ~/.todo/todo.sqlite3 or the path given via --db.
#[derive(Parser)]
#[command(name = "todo", version, about = "Track todos with priorities, categories and due dates")]
pub struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, global = true, env = "TODO_DB")]
    pub db: Option<PathBuf>,

    /// Keep todos in memory only; nothing is written to disk. Overrides --db.
    #[arg(long, global = true)]
    pub memory: bool,

    /// Log level: trace | debug | info | warn | error.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Directory for rolling log files. Defaults to `logs/` next to the database.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new todo.
    Add {
        /// What needs doing.
        text: String,
        /// Priority: low | medium | high.
        #[arg(long, short, default_value = "medium")]
        priority: String,
        /// Free-text category. Empty means "uncategorized".
        #[arg(long, short, default_value = "")]
        category: String,
        /// Due date: YYYY-MM-DD, RFC 3339, "today", "tomorrow", "in 3d", "in 2w".
        #[arg(long, short)]
        due: Option<String>,
    },

    /// Flip a todo between open and completed.
    Toggle {
        /// Todo id or unique id prefix.
        id: String,
    },

    /// Delete a todo.
    Delete {
        /// Todo id or unique id prefix.
        id: String,
    },

    /// Change fields on a todo.
    Update {
        /// Todo id or unique id prefix.
        id: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
    },

    /// Remove every completed todo.
    ClearCompleted,

    /// List todos.
    List {
        /// Only show this category (exact match).
        #[arg(long, short)]
        category: Option<String>,
    },

    /// List open todos that are past their due date.
    Overdue,

    /// Show completion rate and categories.
    Stats,
}
