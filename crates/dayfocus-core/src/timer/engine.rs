//! Countdown state machine.
//!
//! The timer engine does not own a clock or a thread. Each call to `tick()`
//! accounts for exactly one elapsed second; the caller (see
//! [`crate::driver`]) decides when ticks happen.
//!
//! ## State Transitions
//!
//! ```text
//! Paused --start--> Running --pause--> Paused
//! Running --tick to 0--> (Completed) --> Paused on next session
//!                                    \-> Finished on the final session
//! any --reset/skip--> Paused
//! ```

use serde::{Deserialize, Serialize};

use super::session::{Session, SessionPlan};

/// Observable phase of the countdown.
///
/// `Completed` is never observable: it resolves inside `tick()` into either
/// `Paused` on the next session or `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Paused,
    Running,
    /// Final session counted down to zero. Only `reset()` leaves this phase.
    Finished,
}

/// What a single `tick()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running; nothing changed.
    Idle,
    /// One second was counted off.
    Counted { remaining_secs: u64 },
    /// The countdown hit zero.
    Completed {
        session_index: u32,
        /// Index of the session the timer advanced to, `None` on the final one.
        next_session: Option<u32>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerEngine {
    session: Session,
    remaining_secs: u64,
    running: bool,
}

impl TimerEngine {
    /// Create a paused timer at the first session of `plan`.
    pub fn new(plan: SessionPlan) -> Self {
        let session = plan.first_session();
        Self {
            session,
            remaining_secs: session.duration_secs(),
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else if self.remaining_secs == 0 {
            TimerPhase::Finished
        } else {
            TimerPhase::Paused
        }
    }

    /// 0.0 .. 1.0 progress within the current session.
    pub fn progress(&self) -> f64 {
        let total = self.session.duration_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `true` if the timer transitioned to running.
    pub fn start(&mut self) -> bool {
        if self.running || self.remaining_secs == 0 {
            return false;
        }
        self.running = true;
        true
    }

    /// Returns `true` if the timer was running.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return TickOutcome::Counted {
                remaining_secs: self.remaining_secs,
            };
        }

        let session_index = self.session.index();
        self.running = false;
        let next_session = self.advance();
        TickOutcome::Completed {
            session_index,
            next_session,
        }
    }

    /// Pause and refill the current session.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_secs = self.session.duration_secs();
    }

    /// Pause and move to the next session without counting the current one.
    ///
    /// Returns the new session index, or `None` on the final session.
    pub fn skip(&mut self) -> Option<u32> {
        self.running = false;
        self.advance()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self) -> Option<u32> {
        let next = self.session.next()?;
        self.session = next;
        self.remaining_secs = next.duration_secs();
        Some(next.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_plan(total: u32) -> SessionPlan {
        SessionPlan::new(3, total).unwrap()
    }

    #[test]
    fn start_pause_start() {
        let mut timer = TimerEngine::new(SessionPlan::default());
        assert_eq!(timer.phase(), TimerPhase::Paused);

        assert!(timer.start());
        assert_eq!(timer.phase(), TimerPhase::Running);
        assert!(!timer.start());

        assert!(timer.pause());
        assert_eq!(timer.phase(), TimerPhase::Paused);
        assert!(!timer.pause());
    }

    #[test]
    fn tick_is_idle_while_paused() {
        let mut timer = TimerEngine::new(SessionPlan::default());
        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining_secs(), 1500);
    }

    #[test]
    fn completion_advances_and_pauses() {
        let mut timer = TimerEngine::new(short_plan(2));
        timer.start();
        assert_eq!(timer.tick(), TickOutcome::Counted { remaining_secs: 2 });
        assert_eq!(timer.tick(), TickOutcome::Counted { remaining_secs: 1 });
        assert_eq!(
            timer.tick(),
            TickOutcome::Completed {
                session_index: 1,
                next_session: Some(2),
            }
        );
        assert_eq!(timer.session().index(), 2);
        assert_eq!(timer.remaining_secs(), 3);
        assert!(!timer.is_running());
    }

    #[test]
    fn final_completion_finishes() {
        let mut timer = TimerEngine::new(short_plan(1));
        timer.start();
        timer.tick();
        timer.tick();
        assert_eq!(
            timer.tick(),
            TickOutcome::Completed {
                session_index: 1,
                next_session: None,
            }
        );
        assert_eq!(timer.phase(), TimerPhase::Finished);
        assert_eq!(timer.remaining_secs(), 0);
        assert!(!timer.start());
    }

    #[test]
    fn reset_refills_current_session_only() {
        let mut timer = TimerEngine::new(short_plan(3));
        timer.skip();
        timer.start();
        timer.tick();
        timer.reset();
        assert_eq!(timer.session().index(), 2);
        assert_eq!(timer.remaining_secs(), 3);
        assert_eq!(timer.phase(), TimerPhase::Paused);
    }

    #[test]
    fn reset_leaves_finished_phase() {
        let mut timer = TimerEngine::new(short_plan(1));
        timer.start();
        for _ in 0..3 {
            timer.tick();
        }
        timer.reset();
        assert_eq!(timer.phase(), TimerPhase::Paused);
        assert!(timer.start());
    }

    #[test]
    fn skip_on_final_session_only_pauses() {
        let mut timer = TimerEngine::new(short_plan(1));
        timer.start();
        timer.tick();
        assert_eq!(timer.skip(), None);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs(), 2);
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut timer = TimerEngine::new(SessionPlan::new(4, 1).unwrap());
        assert_eq!(timer.progress(), 0.0);
        timer.start();
        timer.tick();
        assert!((timer.progress() - 0.25).abs() < f64::EPSILON);
    }
}
