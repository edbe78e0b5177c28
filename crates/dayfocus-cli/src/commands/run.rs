use clap::Args;
use dayfocus_core::{Config, EngineDriver, EngineHandle, Event, SessionEngine};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::render::{Frame, Renderer, Terminal};
use crate::shell::{self, Input};

#[derive(Args)]
pub struct RunArgs {
    /// Print events and snapshots as JSON lines
    #[arg(long)]
    pub json: bool,
    /// Session length in seconds (overrides session.duration_secs)
    #[arg(long)]
    pub duration: Option<u64>,
    /// Number of sessions (overrides session.total)
    #[arg(long)]
    pub sessions: Option<u32>,
    /// Milliseconds per countdown second (overrides ticker.interval_ms)
    #[arg(long)]
    pub tick_ms: Option<u64>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if let Some(duration) = args.duration {
        config.session.duration_secs = duration;
    }
    if let Some(sessions) = args.sessions {
        config.session.total = sessions;
    }
    if let Some(tick_ms) = args.tick_ms {
        config.ticker.interval_ms = tick_ms;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(shell_loop(&config, args.json))
}

struct Shell {
    handle: EngineHandle,
    renderer: Renderer,
    terminal: Terminal,
    echo_tasks: bool,
}

async fn shell_loop(config: &Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let plan = config.session_plan()?;
    let handle = EngineDriver::spawn(SessionEngine::new(plan), config.driver_config()?);
    let mut events = handle.subscribe();

    let mut shell = Shell {
        handle,
        renderer: Renderer::new(json, &config.shell, plan.total()),
        terminal: Terminal::default(),
        echo_tasks: config.shell.echo_tasks && !json,
    };
    if !json {
        shell.terminal.write(Frame::Line("type 'help' for commands".into()))?;
    }
    shell.show(Input::Status).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match shell::parse_input(&line) {
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(input)) => shell.dispatch(input).await?,
                    Ok(None) => {}
                    Err(message) => shell.terminal.write(Frame::Line(message))?,
                }
            }
            event = events.recv() => match event {
                Ok(event) => shell.on_event(&event).await?,
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "shell fell behind the event stream");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    // Render whatever the last commands produced before stdin closed.
    loop {
        match events.try_recv() {
            Ok(event) => shell.on_event(&event).await?,
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }

    let last = shell.handle.shutdown().await?;
    let frame = shell.renderer.stats(&last)?;
    shell.terminal.write(frame)?;
    Ok(())
}

impl Shell {
    async fn dispatch(&mut self, input: Input) -> Result<(), Box<dyn std::error::Error>> {
        let handle = &self.handle;
        let (event, no_op) = match input {
            Input::Start => (handle.start().await?, "nothing to start"),
            Input::Pause => (handle.pause().await?, "timer is not running"),
            Input::Reset => {
                handle.reset().await?;
                return Ok(());
            }
            Input::Skip => {
                handle.skip().await?;
                return Ok(());
            }
            Input::Add(text) => (handle.add_task(text).await?, "task text is empty"),
            Input::Toggle(task) => {
                let snapshot = handle.snapshot().await?;
                let Some(id) = task.resolve(&snapshot) else {
                    return Ok(self.terminal.write(Frame::Line("no such task".into()))?);
                };
                (handle.toggle_task(id).await?, "no such task")
            }
            Input::Help => {
                return Ok(self.terminal.write(Frame::Line(shell::HELP.into()))?);
            }
            query => return self.show(query).await,
        };
        // Events are rendered from the broadcast stream; only no-ops need a word here.
        if event.is_none() {
            self.terminal.write(Frame::Line(no_op.into()))?;
        }
        Ok(())
    }

    async fn show(&mut self, query: Input) -> Result<(), Box<dyn std::error::Error>> {
        let snapshot = self.handle.snapshot().await?;
        let frame = match query {
            Input::Tasks => self.renderer.tasks(&snapshot)?,
            Input::Stats => self.renderer.stats(&snapshot)?,
            _ => self.renderer.status(&snapshot)?,
        };
        self.terminal.write(frame)?;
        Ok(())
    }

    async fn on_event(&mut self, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(frame) = self.renderer.event(event)? {
            self.terminal.write(frame)?;
        }
        let is_task_event = matches!(
            event,
            Event::TaskAdded { .. } | Event::TaskToggled { .. }
        );
        if is_task_event && self.echo_tasks {
            self.show(Input::Tasks).await?;
        }
        Ok(())
    }
}
