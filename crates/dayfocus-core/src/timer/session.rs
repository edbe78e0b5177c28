use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default focus session length: 25 minutes.
pub const DEFAULT_SESSION_SECS: u64 = 1500;
/// Default number of focus sessions in a day's plan.
pub const DEFAULT_TOTAL_SESSIONS: u32 = 4;

/// Shape of a day's focus sessions: how long each one lasts and how many
/// there are.
///
/// Deserialization goes through [`SessionPlan::new`], so a decoded plan is
/// always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSessionPlan")]
pub struct SessionPlan {
    duration_secs: u64,
    total: u32,
}

impl SessionPlan {
    /// Build a plan, rejecting zero-length sessions and empty plans.
    pub fn new(duration_secs: u64, total: u32) -> Result<Self, ValidationError> {
        if duration_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "session.duration_secs".into(),
                message: "must be greater than zero".into(),
            });
        }
        if total == 0 {
            return Err(ValidationError::InvalidValue {
                field: "session.total".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(Self {
            duration_secs,
            total,
        })
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// The first session of the plan.
    pub fn first_session(&self) -> Session {
        Session {
            index: 1,
            total: self.total,
            duration_secs: self.duration_secs,
        }
    }
}

#[derive(Deserialize)]
struct RawSessionPlan {
    duration_secs: u64,
    total: u32,
}

impl TryFrom<RawSessionPlan> for SessionPlan {
    type Error = ValidationError;

    fn try_from(raw: RawSessionPlan) -> Result<Self, Self::Error> {
        Self::new(raw.duration_secs, raw.total)
    }
}

impl Default for SessionPlan {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_SESSION_SECS,
            total: DEFAULT_TOTAL_SESSIONS,
        }
    }
}

/// One countdown interval within the plan.
///
/// `index` is 1-based and always within `1..=total`. Only a valid
/// [`SessionPlan`] can create one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Session {
    index: u32,
    total: u32,
    duration_secs: u64,
}

impl Session {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn is_final(&self) -> bool {
        self.index >= self.total
    }

    /// The session that follows this one, or `None` at the end of the plan.
    pub fn next(&self) -> Option<Session> {
        if self.is_final() {
            return None;
        }
        Some(Session {
            index: self.index + 1,
            ..*self
        })
    }
}
