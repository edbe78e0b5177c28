//! Line commands accepted by the interactive shell.

use dayfocus_core::{EngineSnapshot, TaskId};
use uuid::Uuid;

pub const HELP: &str = "\
commands:
  start            start or resume the countdown
  pause            pause the countdown
  reset            refill the current session
  skip             move to the next session without counting this one
  add <text>       add a task
  toggle <n|id>    check or uncheck task n (1-based) or by id
  tasks            list tasks
  stats            show counters
  status           show the timer
  help             show this message
  quit             leave the shell";

/// How the user referred to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRef {
    Position(usize),
    Id(TaskId),
}

impl TaskRef {
    /// Resolve against the current task list.
    pub fn resolve(self, snapshot: &EngineSnapshot) -> Option<TaskId> {
        match self {
            TaskRef::Id(id) => Some(id),
            TaskRef::Position(n) => n
                .checked_sub(1)
                .and_then(|i| snapshot.tasks.get(i))
                .map(|t| t.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Start,
    Pause,
    Reset,
    Skip,
    /// Text is passed through untouched; blank text is the engine's call.
    Add(String),
    Toggle(TaskRef),
    Tasks,
    Stats,
    Status,
    Help,
    Quit,
}

/// Parse one line of input. Blank lines yield `Ok(None)`.
pub fn parse_input(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "start" | "s" => Input::Start,
        "pause" | "p" => Input::Pause,
        "reset" => Input::Reset,
        "skip" => Input::Skip,
        "add" | "a" => Input::Add(rest.to_string()),
        "toggle" | "t" => Input::Toggle(parse_task_ref(rest)?),
        "tasks" | "ls" => Input::Tasks,
        "stats" => Input::Stats,
        "status" => Input::Status,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(input))
}

fn parse_task_ref(arg: &str) -> Result<TaskRef, String> {
    if arg.is_empty() {
        return Err("toggle needs a task number or id".into());
    }
    if let Ok(n) = arg.parse::<usize>() {
        return Ok(TaskRef::Position(n));
    }
    Uuid::parse_str(arg)
        .map(TaskRef::Id)
        .map_err(|_| format!("'{arg}' is not a task number or id"))
}
