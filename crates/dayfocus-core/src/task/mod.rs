//! Daily task checklist.
//!
//! Tasks are created from user input, keep their id for their whole life,
//! and are never removed or reordered. The only mutation after creation is
//! flipping the `completed` flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque task identifier.
pub type TaskId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, never empty.
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Set when the task is checked off, cleared when it is unchecked.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// Result of flipping a task's completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    /// The new value of `completed`.
    pub completed: bool,
}

impl Toggle {
    /// True for the false -> true direction.
    pub fn is_completion(&self) -> bool {
        self.completed
    }
}

/// Ordered task collection. Insertion order is display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task. Returns `None` when `text` is blank.
    pub fn add(&mut self, text: &str) -> Option<&Task> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.tasks.push(Task::new(text.to_string()));
        self.tasks.last()
    }

    /// Flip `completed` on the task with `id`. Returns `None` for unknown ids.
    pub fn toggle(&mut self, id: TaskId) -> Option<Toggle> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        task.completed_at = task.completed.then(Utc::now);
        Some(Toggle {
            completed: task.completed,
        })
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.len() - self.pending_count()
    }
}
