//! Daily counters.
//!
//! Counters only ever go up. They are bumped as side effects of session
//! completion and of checking off a task; nothing outside the engine can
//! change them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub focus_sessions_completed: u32,
    /// Cumulative: unchecking a task does not take it back.
    pub tasks_completed: u32,
    /// Placeholder. No operation updates it yet.
    pub day_streak: u32,
}

impl Stats {
    pub(crate) fn record_focus_session(&mut self) {
        self.focus_sessions_completed = self.focus_sessions_completed.saturating_add(1);
    }

    pub(crate) fn record_task_completion(&mut self) {
        self.tasks_completed = self.tasks_completed.saturating_add(1);
    }
}
