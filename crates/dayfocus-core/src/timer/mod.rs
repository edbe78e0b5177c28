mod clock;
mod engine;
mod session;

pub use clock::format_clock;
pub use engine::{TickOutcome, TimerEngine, TimerPhase};
pub use session::{Session, SessionPlan, DEFAULT_SESSION_SECS, DEFAULT_TOTAL_SESSIONS};
