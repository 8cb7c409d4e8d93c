//! Command handlers: turn parsed arguments into store calls and render results.

use chrono::{DateTime, Utc};
use todo_core::{StateStorage, Todo, TodoDraft, TodoPatch, TodoStore};

use crate::cli::Commands;
use crate::input::{normalize_category, normalize_text, parse_due, parse_priority, resolve_id};

const SHORT_ID_LEN: usize = 8;

pub fn run_command<S: StateStorage>(
    store: &mut TodoStore<S>,
    command: Commands,
) -> Result<(), String> {
    let now = Utc::now();
    match command {
        Commands::Add {
            text,
            priority,
            category,
            due,
        } => {
            let text = normalize_text(&text).ok_or("todo text cannot be empty")?;
            let mut draft = TodoDraft::new(text, parse_priority(&priority)?, normalize_category(&category));
            if let Some(due) = due {
                draft = draft.with_due_date(parse_due(&due, now)?);
            }
            let id = store.add_todo(draft);
            println!("Added {}", short_id(&id.to_string()));
        }

        Commands::Toggle { id } => {
            let id = resolve_id(&id, store.todos())?;
            if !store.toggle_todo(id) {
                return Err(format!("no todo with id {id}"));
            }
            if let Some(todo) = store.get(id) {
                let state = if todo.completed { "completed" } else { "reopened" };
                println!("{state} {}", short_id(&id.to_string()));
            }
        }

        Commands::Delete { id } => {
            let id = resolve_id(&id, store.todos())?;
            if !store.delete_todo(id) {
                return Err(format!("no todo with id {id}"));
            }
            println!("Deleted {}", short_id(&id.to_string()));
        }

        Commands::Update {
            id,
            text,
            priority,
            category,
            due,
            clear_due,
        } => {
            let id = resolve_id(&id, store.todos())?;
            let patch = TodoPatch {
                text: text
                    .map(|raw| normalize_text(&raw).ok_or("todo text cannot be empty"))
                    .transpose()?,
                completed: None,
                due_date: if clear_due {
                    Some(None)
                } else {
                    due.map(|raw| parse_due(&raw, now).map(Some)).transpose()?
                },
                priority: priority.as_deref().map(parse_priority).transpose()?,
                category: category.as_deref().map(normalize_category),
            };
            if patch.is_empty() {
                return Err("nothing to update; pass at least one field".to_string());
            }
            if !store.update_todo(id, &patch) {
                return Err(format!("no todo with id {id}"));
            }
            println!("Updated {}", short_id(&id.to_string()));
        }

        Commands::ClearCompleted => {
            let removed = store.clear_completed();
            println!("Removed {removed} completed todo(s)");
        }

        Commands::List { category } => {
            let todos: Vec<&Todo> = match category.as_deref() {
                Some(category) => store.todos_by_category(category),
                None => store.todos().iter().collect(),
            };
            print_table(&todos, now);
        }

        Commands::Overdue => print_table(&store.overdue_todos_at(now), now),

        Commands::Stats => {
            let open = store.todos().iter().filter(|todo| !todo.completed).count();
            println!("Todos:       {}", store.len());
            println!("Open:        {open}");
            println!("Overdue:     {}", store.overdue_todos_at(now).len());
            println!("Completion:  {}%", store.completion_rate());
            let categories = store.categories();
            if !categories.is_empty() {
                println!("Categories:  {}", categories.join(", "));
            }
        }
    }
    Ok(())
}

/// Prints todos in a fixed-width table; overdue rows are flagged with `!`.
pub fn print_table(todos: &[&Todo], now: DateTime<Utc>) {
    if todos.is_empty() {
        println!("No todos.");
        return;
    }
    println!(
        "{:<9} {:<4} {:<7} {:<11} {:<16} {}",
        "ID", "Done", "Pri", "Due", "Category", "Text"
    );
    for todo in todos {
        let done = if todo.completed { "[x]" } else { "[ ]" };
        let due = match todo.due_date {
            Some(due) if todo.is_overdue_at(now) => format!("{}!", due.format("%Y-%m-%d")),
            Some(due) => due.format("%Y-%m-%d").to_string(),
            None => "-".to_string(),
        };
        println!(
            "{:<9} {:<4} {:<7} {:<11} {:<16} {}",
            short_id(&todo.id.to_string()),
            done,
            todo.priority,
            due,
            truncate(&todo.category, 16),
            todo.text
        );
    }
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Truncate to `width` characters, ending with an ellipsis when cut.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
