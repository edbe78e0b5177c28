//! # dayfocus Core Library
//!
//! Focus timer and daily checklist engine. The CLI shell in `dayfocus-cli`
//! is a thin layer over this crate: it renders snapshots and events and
//! forwards user commands.
//!
//! ## Architecture
//!
//! - **Session Engine**: owns the countdown, the task list and the daily
//!   counters. Purely synchronous; `tick()` counts off one second.
//! - **Driver**: a tokio task that owns one engine, serializes commands and
//!   ticks, and keeps a periodic ticker alive exactly while the timer runs.
//! - **Storage**: TOML configuration only. Engine state lives in memory.
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Timer, tasks and stats
//! - [`EngineDriver`] / [`EngineHandle`]: Async command loop
//! - [`Config`]: Application configuration management

pub mod driver;
pub mod engine;
pub mod error;
pub mod events;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use driver::{DriverConfig, EngineDriver, EngineHandle};
pub use engine::{EngineSnapshot, SessionEngine};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use stats::Stats;
pub use storage::Config;
pub use task::{Task, TaskId, TaskList};
pub use timer::{format_clock, Session, SessionPlan, TimerPhase};
