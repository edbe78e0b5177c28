use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskId;

/// Every state change in the engine produces an Event.
/// The shell renders them; the driver broadcasts them to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session_index: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        session_index: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// One second counted off. Not timestamped; emitted once per tick.
    TimerTicked {
        session_index: u32,
        remaining_secs: u64,
    },
    SessionCompleted {
        session_index: u32,
        /// Session the timer moved on to, `None` after the final session.
        next_session: Option<u32>,
        focus_sessions_completed: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        session_index: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerSkipped {
        from_session: u32,
        /// `None` when skipping on the final session (pause only).
        to_session: Option<u32>,
        at: DateTime<Utc>,
    },
    TaskAdded {
        id: TaskId,
        text: String,
        at: DateTime<Utc>,
    },
    TaskToggled {
        id: TaskId,
        completed: bool,
        tasks_completed: u32,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::TimerTicked {
            session_index: 2,
            remaining_secs: 65,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TimerTicked");
        assert_eq!(json["session_index"], 2);
        assert_eq!(json["remaining_secs"], 65);
    }

    #[test]
    fn skipped_on_final_session_has_null_target() {
        let event = Event::TimerSkipped {
            from_session: 4,
            to_session: None,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json["to_session"].is_null());
    }
}
