//! Turning engine events and snapshots into terminal output.

use std::io::{self, Write};

use dayfocus_core::storage::ShellConfig;
use dayfocus_core::{format_clock, EngineSnapshot, Event, TimerPhase};

/// One unit of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Overwrites the previous status frame in place.
    Status(String),
    Line(String),
}

pub struct Renderer {
    json: bool,
    render_ticks: bool,
    total_sessions: u32,
}

impl Renderer {
    pub fn new(json: bool, shell: &ShellConfig, total_sessions: u32) -> Self {
        Self {
            json,
            render_ticks: shell.render_ticks,
            total_sessions,
        }
    }

    pub fn event(&self, event: &Event) -> serde_json::Result<Option<Frame>> {
        if self.json {
            return serde_json::to_string(event).map(|s| Some(Frame::Line(s)));
        }
        let n = self.total_sessions;
        let frame = match event {
            Event::TimerStarted {
                session_index,
                remaining_secs,
                ..
            } => Frame::Line(format!(
                "> session {session_index}/{n} running, {} left",
                format_clock(*remaining_secs)
            )),
            Event::TimerPaused { remaining_secs, .. } => {
                Frame::Line(format!("|| paused at {}", format_clock(*remaining_secs)))
            }
            Event::TimerTicked {
                session_index,
                remaining_secs,
            } => {
                if !self.render_ticks {
                    return Ok(None);
                }
                Frame::Status(format!(
                    "{}  session {session_index}/{n}",
                    format_clock(*remaining_secs)
                ))
            }
            Event::SessionCompleted {
                session_index,
                next_session: Some(next),
                focus_sessions_completed,
                ..
            } => Frame::Line(format!(
                "* session {session_index} complete ({focus_sessions_completed} today). \
                 session {next}/{n} ready, type 'start'"
            )),
            Event::SessionCompleted {
                session_index,
                next_session: None,
                focus_sessions_completed,
                ..
            } => Frame::Line(format!(
                "* session {session_index} complete ({focus_sessions_completed} today). \
                 all sessions done"
            )),
            Event::TimerReset {
                session_index,
                remaining_secs,
                ..
            } => Frame::Line(format!(
                "session {session_index} reset to {}",
                format_clock(*remaining_secs)
            )),
            Event::TimerSkipped {
                to_session: Some(to),
                ..
            } => Frame::Line(format!("skipped to session {to}/{n}")),
            Event::TimerSkipped {
                to_session: None, ..
            } => Frame::Line("already on the final session; paused".into()),
            Event::TaskAdded { text, .. } => Frame::Line(format!("+ {text}")),
            Event::TaskToggled {
                completed: true,
                tasks_completed,
                ..
            } => Frame::Line(format!("task checked off ({tasks_completed} today)")),
            Event::TaskToggled {
                completed: false, ..
            } => Frame::Line("task unchecked".into()),
        };
        Ok(Some(frame))
    }

    pub fn status(&self, snap: &EngineSnapshot) -> serde_json::Result<Frame> {
        if self.json {
            return serde_json::to_string(snap).map(Frame::Line);
        }
        let phase = match snap.phase {
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Finished => "finished",
        };
        Ok(Frame::Line(format!(
            "{}  session {}/{}  {phase}  ({:.0}% done)",
            snap.formatted_time,
            snap.session_index,
            snap.total_sessions,
            snap.session_progress * 100.0
        )))
    }

    pub fn tasks(&self, snap: &EngineSnapshot) -> serde_json::Result<Frame> {
        if self.json {
            return serde_json::to_string(&snap.tasks).map(Frame::Line);
        }
        if snap.tasks.is_empty() {
            return Ok(Frame::Line("no tasks yet (add <text>)".into()));
        }
        let lines: Vec<String> = snap
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mark = if t.completed { 'x' } else { ' ' };
                format!("{:>2}. [{mark}] {}", i + 1, t.text)
            })
            .collect();
        Ok(Frame::Line(lines.join("\n")))
    }

    pub fn stats(&self, snap: &EngineSnapshot) -> serde_json::Result<Frame> {
        if self.json {
            return serde_json::to_string(&snap.stats).map(Frame::Line);
        }
        let s = &snap.stats;
        Ok(Frame::Line(format!(
            "focus sessions: {}  tasks done: {}  day streak: {}",
            s.focus_sessions_completed, s.tasks_completed, s.day_streak
        )))
    }
}

/// Writes frames to stdout, keeping at most one status line open.
#[derive(Default)]
pub struct Terminal {
    status_open: bool,
}

impl Terminal {
    pub fn write(&mut self, frame: Frame) -> io::Result<()> {
        let mut out = io::stdout().lock();
        match frame {
            Frame::Status(text) => {
                write!(out, "\r\x1b[2K{text}")?;
                self.status_open = true;
            }
            Frame::Line(text) => {
                if std::mem::take(&mut self.status_open) {
                    write!(out, "\r\x1b[2K")?;
                }
                writeln!(out, "{text}")?;
            }
        }
        out.flush()
    }
}
