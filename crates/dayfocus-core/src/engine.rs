//! Session engine: the single owner of timer, task list and stats.
//!
//! Every command is total. A command whose precondition does not hold
//! (starting a running timer, adding blank text, toggling an unknown id)
//! changes nothing and returns `None`; a command that changed state returns
//! the [`Event`] describing the change.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::stats::Stats;
use crate::task::{Task, TaskId, TaskList};
use crate::timer::{format_clock, SessionPlan, TickOutcome, TimerEngine, TimerPhase};

/// Read-only view of the engine handed to the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub phase: TimerPhase,
    pub running: bool,
    pub remaining_secs: u64,
    pub formatted_time: String,
    pub session_index: u32,
    pub total_sessions: u32,
    pub session_duration_secs: u64,
    /// 0.0 .. 1.0 within the current session.
    pub session_progress: f64,
    pub tasks: Vec<Task>,
    pub stats: Stats,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionEngine {
    timer: TimerEngine,
    tasks: TaskList,
    stats: Stats,
}

impl SessionEngine {
    pub fn new(plan: SessionPlan) -> Self {
        Self {
            timer: TimerEngine::new(plan),
            tasks: TaskList::new(),
            stats: Stats::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn remaining_secs(&self) -> u64 {
        self.timer.remaining_secs()
    }

    pub fn formatted_time(&self) -> String {
        format_clock(self.timer.remaining_secs())
    }

    pub fn running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn phase(&self) -> TimerPhase {
        self.timer.phase()
    }

    pub fn session_index(&self) -> u32 {
        self.timer.session().index()
    }

    pub fn total_sessions(&self) -> u32 {
        self.timer.session().total()
    }

    pub fn session_progress(&self) -> f64 {
        self.timer.progress()
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.as_slice()
    }

    pub fn task_list(&self) -> &TaskList {
        &self.tasks
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let session = self.timer.session();
        EngineSnapshot {
            phase: self.timer.phase(),
            running: self.timer.is_running(),
            remaining_secs: self.timer.remaining_secs(),
            formatted_time: self.formatted_time(),
            session_index: session.index(),
            total_sessions: session.total(),
            session_duration_secs: session.duration_secs(),
            session_progress: self.timer.progress(),
            tasks: self.tasks.as_slice().to_vec(),
            stats: self.stats,
        }
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if !self.timer.start() {
            tracing::debug!(phase = ?self.timer.phase(), "start ignored");
            return None;
        }
        Some(Event::TimerStarted {
            session_index: self.session_index(),
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.timer.pause() {
            tracing::debug!("pause ignored: timer not running");
            return None;
        }
        Some(Event::TimerPaused {
            session_index: self.session_index(),
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Count off one second. Call once per elapsed second while running.
    pub fn tick(&mut self) -> Option<Event> {
        match self.timer.tick() {
            TickOutcome::Idle => None,
            TickOutcome::Counted { remaining_secs } => Some(Event::TimerTicked {
                session_index: self.session_index(),
                remaining_secs,
            }),
            TickOutcome::Completed {
                session_index,
                next_session,
            } => {
                self.stats.record_focus_session();
                tracing::info!(
                    session_index,
                    ?next_session,
                    completed = self.stats.focus_sessions_completed,
                    "focus session completed"
                );
                Some(Event::SessionCompleted {
                    session_index,
                    next_session,
                    focus_sessions_completed: self.stats.focus_sessions_completed,
                    at: Utc::now(),
                })
            }
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.timer.reset();
        Some(Event::TimerReset {
            session_index: self.session_index(),
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        })
    }

    pub fn skip(&mut self) -> Option<Event> {
        let from_session = self.session_index();
        let to_session = self.timer.skip();
        Some(Event::TimerSkipped {
            from_session,
            to_session,
            at: Utc::now(),
        })
    }

    // ── Task commands ────────────────────────────────────────────────

    pub fn add_task(&mut self, text: &str) -> Option<Event> {
        let Some(task) = self.tasks.add(text) else {
            tracing::debug!("add_task ignored: blank text");
            return None;
        };
        Some(Event::TaskAdded {
            id: task.id,
            text: task.text.clone(),
            at: task.created_at,
        })
    }

    pub fn toggle_task(&mut self, id: TaskId) -> Option<Event> {
        let Some(toggle) = self.tasks.toggle(id) else {
            tracing::debug!(%id, "toggle_task ignored: unknown id");
            return None;
        };
        if toggle.is_completion() {
            self.stats.record_task_completion();
        }
        Some(Event::TaskToggled {
            id,
            completed: toggle.completed,
            tasks_completed: self.stats.tasks_completed,
            at: Utc::now(),
        })
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(SessionPlan::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn run_ticks(engine: &mut SessionEngine, n: u64) {
        for _ in 0..n {
            engine.tick();
        }
    }

    #[test]
    fn fresh_engine_snapshot() {
        let engine = SessionEngine::default();
        let snap = engine.snapshot();
        assert_eq!(snap.phase, TimerPhase::Paused);
        assert!(!snap.running);
        assert_eq!(snap.remaining_secs, 1500);
        assert_eq!(snap.formatted_time, "25:00");
        assert_eq!(snap.session_index, 1);
        assert_eq!(snap.total_sessions, 4);
        assert!(snap.tasks.is_empty());
        assert_eq!(snap.stats, Stats::default());
    }

    #[test]
    fn full_session_advances_and_counts() {
        let mut engine = SessionEngine::default();
        engine.start();
        run_ticks(&mut engine, 1500);

        assert_eq!(engine.stats().focus_sessions_completed, 1);
        assert_eq!(engine.session_index(), 2);
        assert_eq!(engine.remaining_secs(), 1500);
        assert!(!engine.running());
    }

    #[test]
    fn final_session_stays_at_zero() {
        let mut engine = SessionEngine::default();
        for _ in 0..3 {
            engine.skip();
        }
        assert_eq!(engine.session_index(), 4);

        engine.start();
        run_ticks(&mut engine, 1500);
        assert_eq!(engine.remaining_secs(), 0);
        assert!(!engine.running());
        assert_eq!(engine.session_index(), 4);
        assert_eq!(engine.stats().focus_sessions_completed, 1);
        assert_eq!(engine.formatted_time(), "0:00");
        assert!(engine.start().is_none());
    }

    #[test]
    fn completion_event_reports_next_session() {
        let mut engine = SessionEngine::new(SessionPlan::new(1, 2).unwrap());
        engine.start();
        match engine.tick() {
            Some(Event::SessionCompleted {
                session_index,
                next_session,
                focus_sessions_completed,
                ..
            }) => {
                assert_eq!(session_index, 1);
                assert_eq!(next_session, Some(2));
                assert_eq!(focus_sessions_completed, 1);
            }
            other => panic!("Expected SessionCompleted, got {other:?}"),
        }
    }

    #[test]
    fn skip_does_not_count_session() {
        let mut engine = SessionEngine::default();
        engine.start();
        run_ticks(&mut engine, 700);
        engine.skip();
        assert_eq!(engine.session_index(), 2);
        assert_eq!(engine.remaining_secs(), 1500);
        assert!(!engine.running());
        assert_eq!(engine.stats().focus_sessions_completed, 0);
    }

    #[test]
    fn reset_restores_current_session() {
        let mut engine = SessionEngine::default();
        engine.skip();
        engine.start();
        run_ticks(&mut engine, 42);
        engine.reset();
        assert_eq!(engine.session_index(), 2);
        assert_eq!(engine.remaining_secs(), 1500);
        assert!(!engine.running());
    }

    #[test]
    fn invalid_commands_return_none() {
        let mut engine = SessionEngine::default();
        assert!(engine.pause().is_none());
        assert!(engine.tick().is_none());
        assert!(engine.add_task("  ").is_none());
        assert!(engine.toggle_task(Uuid::new_v4()).is_none());

        engine.start();
        assert!(engine.start().is_none());
    }

    #[test]
    fn task_toggle_counts_one_way() {
        let mut engine = SessionEngine::default();
        let id = match engine.add_task("buy milk") {
            Some(Event::TaskAdded { id, text, .. }) => {
                assert_eq!(text, "buy milk");
                id
            }
            other => panic!("Expected TaskAdded, got {other:?}"),
        };

        engine.toggle_task(id);
        assert_eq!(engine.stats().tasks_completed, 1);
        engine.toggle_task(id);
        assert_eq!(engine.stats().tasks_completed, 1);
        assert!(!engine.tasks()[0].completed);
        engine.toggle_task(id);
        assert_eq!(engine.stats().tasks_completed, 2);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut engine = SessionEngine::default();
        engine.add_task("write report");
        let json = serde_json::to_value(engine.snapshot()).unwrap();
        assert_eq!(json["phase"], "paused");
        assert_eq!(json["formatted_time"], "25:00");
        assert_eq!(json["tasks"][0]["text"], "write report");
        assert_eq!(json["stats"]["day_streak"], 0);
    }
}
