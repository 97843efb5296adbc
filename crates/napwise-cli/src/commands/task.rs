//! Task management commands for CLI.

use std::io::Read;

use clap::Subcommand;
use napwise_core::task::split_brain_dump;

use super::{CmdResult, Context};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task title
        title: String,
    },
    /// Add one task per line of text (stdin when omitted)
    Dump {
        text: Option<String>,
    },
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task done
    Done {
        /// Task ID or unique prefix
        id: String,
    },
    /// Mark a task not done
    Undo {
        id: String,
    },
    /// Change a task's title
    Rename {
        id: String,
        title: String,
    },
    /// Delete a task
    Delete {
        id: String,
    },
    /// Delete all completed tasks
    ClearDone,
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn list(ctx: &Context, all: bool, json: bool) -> CmdResult {
    let config = ctx.config()?;
    let tasks: Vec<_> = ctx
        .store(&config)?
        .tasks()?
        .into_iter()
        .filter(|t| all || !t.done)
        .collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else if tasks.is_empty() {
        println!("No tasks");
    } else {
        for t in &tasks {
            let mark = if t.done { "x" } else { " " };
            println!("[{mark}] {}  {}", short_id(&t.id), t.title);
        }
    }
    Ok(())
}

pub fn run(action: TaskAction, ctx: &Context) -> CmdResult {
    let store = || ctx.store_for_write().map(|(_, store)| store);

    match action {
        TaskAction::List { all, json } => return list(ctx, all, json),
        TaskAction::Add { title } => {
            let task = store()?.add_task(&title)?;
            println!("Task added: {}", task.id);
        }
        TaskAction::Dump { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let tasks = store()?.add_tasks(split_brain_dump(&text))?;
            println!("{} task(s) added", tasks.len());
        }
        TaskAction::Done { id } => {
            let task = store()?.set_task_done(&id, true)?;
            println!("Done: {}", task.title);
        }
        TaskAction::Undo { id } => {
            let task = store()?.set_task_done(&id, false)?;
            println!("Reopened: {}", task.title);
        }
        TaskAction::Rename { id, title } => {
            let task = store()?.rename_task(&id, &title)?;
            println!("Renamed: {}", task.title);
        }
        TaskAction::Delete { id } => {
            let task = store()?.delete_task(&id)?;
            println!("Task deleted: {}", task.id);
        }
        TaskAction::ClearDone => {
            let removed = store()?.clear_completed()?;
            println!("{removed} completed task(s) removed");
        }
    }
    Ok(())
}
