//! Async driver for [`SessionEngine`].
//!
//! One tokio task owns the engine. Commands from any number of
//! [`EngineHandle`]s and ticks from the [`Ticker`] are funnelled into that
//! task and applied one at a time, so there is never concurrent mutation.
//!
//! The ticker exists exactly while the engine is running. After every
//! command and every tick the driver reconciles the two: a running engine
//! without a ticker gets a fresh one, a stopped engine loses its ticker.
//! Each ticker carries a generation number and ticks from a replaced
//! generation are dropped, so a pause followed quickly by a start never
//! double-counts a second.

mod ticker;

pub use ticker::Ticker;

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};

use crate::engine::{EngineSnapshot, SessionEngine};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::task::TaskId;

const COMMAND_BUFFER: usize = 32;
const TICK_BUFFER: usize = 4;

/// Driver settings. Built through [`DriverConfig::new`] so a zero tick
/// interval never reaches the ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    tick_interval: Duration,
    event_capacity: usize,
}

impl DriverConfig {
    pub fn new(tick_interval: Duration, event_capacity: usize) -> Result<Self, ValidationError> {
        if tick_interval.is_zero() {
            return Err(ValidationError::InvalidValue {
                field: "ticker.interval_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        if event_capacity == 0 {
            return Err(ValidationError::InvalidValue {
                field: "ticker.event_capacity".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(Self {
            tick_interval,
            event_capacity,
        })
    }

    /// Wall-clock time per tick. One tick counts off one second.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Events buffered per subscriber before slow receivers start lagging.
    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            event_capacity: 256,
        }
    }
}

type Reply<T> = oneshot::Sender<T>;

enum Command {
    Start(Reply<Option<Event>>),
    Pause(Reply<Option<Event>>),
    Reset(Reply<Option<Event>>),
    Skip(Reply<Option<Event>>),
    AddTask { text: String, reply: Reply<Option<Event>> },
    ToggleTask { id: TaskId, reply: Reply<Option<Event>> },
    Snapshot(Reply<EngineSnapshot>),
    Shutdown(Reply<EngineSnapshot>),
}

/// Cloneable front door to a running driver.
#[derive(Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<Event>,
}

impl EngineHandle {
    /// Receive every event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub async fn start(&self) -> Result<Option<Event>> {
        self.request(Command::Start).await
    }

    pub async fn pause(&self) -> Result<Option<Event>> {
        self.request(Command::Pause).await
    }

    pub async fn reset(&self) -> Result<Option<Event>> {
        self.request(Command::Reset).await
    }

    pub async fn skip(&self) -> Result<Option<Event>> {
        self.request(Command::Skip).await
    }

    pub async fn add_task(&self, text: impl Into<String>) -> Result<Option<Event>> {
        let text = text.into();
        self.request(|reply| Command::AddTask { text, reply }).await
    }

    pub async fn toggle_task(&self, id: TaskId) -> Result<Option<Event>> {
        self.request(|reply| Command::ToggleTask { id, reply }).await
    }

    pub async fn snapshot(&self) -> Result<EngineSnapshot> {
        self.request(Command::Snapshot).await
    }

    /// Stop the driver loop and return the final state. Every handle fails
    /// with `DriverClosed` afterwards.
    pub async fn shutdown(&self) -> Result<EngineSnapshot> {
        self.request(Command::Shutdown).await
    }

    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands.send(command(tx)).await?;
        Ok(rx.await?)
    }
}

pub struct EngineDriver {
    engine: SessionEngine,
    config: DriverConfig,
    commands: mpsc::Receiver<Command>,
    events: broadcast::Sender<Event>,
    ticks_tx: mpsc::Sender<u64>,
    ticks_rx: mpsc::Receiver<u64>,
    ticker: Option<Ticker>,
    generation: u64,
}

impl EngineDriver {
    /// Move `engine` onto a new task of the current runtime.
    pub fn spawn(engine: SessionEngine, config: DriverConfig) -> EngineHandle {
        let (driver, handle) = Self::new(engine, config);
        tokio::spawn(driver.run());
        handle
    }

    fn new(engine: SessionEngine, config: DriverConfig) -> (Self, EngineHandle) {
        let (commands_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (events, _) = broadcast::channel(config.event_capacity);
        let (ticks_tx, ticks_rx) = mpsc::channel(TICK_BUFFER);

        let driver = Self {
            engine,
            config,
            commands,
            events: events.clone(),
            ticks_tx,
            ticks_rx,
            ticker: None,
            generation: 0,
        };
        let handle = EngineHandle {
            commands: commands_tx,
            events,
        };
        (driver, handle)
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                Some(generation) = self.ticks_rx.recv() => self.on_tick(generation),

                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    if self.on_command(command).is_break() {
                        break;
                    }
                }
            }
        }
        self.ticker = None;
        tracing::debug!("engine driver stopped");
    }

    fn on_tick(&mut self, generation: u64) {
        let current = self.ticker.as_ref().map(Ticker::generation);
        if current != Some(generation) {
            tracing::trace!(generation, ?current, "dropping stale tick");
            return;
        }
        let event = self.engine.tick();
        self.publish(event);
        self.reconcile_ticker();
    }

    fn on_command(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Start(reply) => {
                let event = self.engine.start();
                self.finish(event, reply);
            }
            Command::Pause(reply) => {
                let event = self.engine.pause();
                self.finish(event, reply);
            }
            Command::Reset(reply) => {
                let event = self.engine.reset();
                self.finish(event, reply);
            }
            Command::Skip(reply) => {
                let event = self.engine.skip();
                self.finish(event, reply);
            }
            Command::AddTask { text, reply } => {
                let event = self.engine.add_task(&text);
                self.finish(event, reply);
            }
            Command::ToggleTask { id, reply } => {
                let event = self.engine.toggle_task(id);
                self.finish(event, reply);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.engine.snapshot());
            }
            Command::Shutdown(reply) => {
                // Close first so no handle can queue work behind the shutdown.
                self.commands.close();
                self.ticker = None;
                let _ = reply.send(self.engine.snapshot());
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn finish(&mut self, event: Option<Event>, reply: Reply<Option<Event>>) {
        self.publish(event.clone());
        self.reconcile_ticker();
        // The caller may have given up waiting; the command still applied.
        let _ = reply.send(event);
    }

    fn publish(&self, event: Option<Event>) {
        if let Some(event) = event {
            // No subscribers is not an error.
            let _ = self.events.send(event);
        }
    }

    fn reconcile_ticker(&mut self) {
        match (self.engine.running(), self.ticker.is_some()) {
            (true, false) => {
                self.generation += 1;
                self.ticker = Some(Ticker::spawn(
                    self.config.tick_interval(),
                    self.generation,
                    self.ticks_tx.clone(),
                ));
            }
            (false, true) => self.ticker = None,
            _ => {}
        }
    }
}
