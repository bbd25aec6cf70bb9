//! Backend traits and the crossterm implementation.
//!
//! The engine consumes a terminal through two seams:
//! - [`EventSource`]: a blocking "read next native event", moved onto the
//!   input thread
//! - [`Backend`]: init/close lifecycle, current size, and a single
//!   per-frame commit of the whole cell buffer

use crate::buffer::diff::{render_diff, render_full, DiffState};
use crate::buffer::Buffer;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Outcome of one read from an [`EventSource`].
#[derive(Debug)]
pub enum SourceRead {
    /// A native event arrived.
    Event(event::Event),
    /// Nothing arrived within the timeout.
    Timeout,
    /// The source is gone for good; the reader should exit.
    Closed,
}

/// A blocking source of native terminal events.
pub trait EventSource {
    /// Block for at most `timeout` waiting for the next native event.
    fn read(&mut self, timeout: Duration) -> io::Result<SourceRead>;
}

/// A terminal the engine can draw on.
pub trait Backend {
    /// The event source handed to the input thread.
    type Events: EventSource + Send + 'static;

    /// Prepare the terminal (raw mode, alternate screen, ...).
    fn init(&mut self) -> io::Result<()>;

    /// Restore the terminal. Must be safe to call when not initialized.
    fn close(&mut self) -> io::Result<()>;

    /// Current terminal size in `(columns, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Create the event source for this terminal.
    fn events(&mut self) -> io::Result<Self::Events>;

    /// Commit a complete frame to the terminal.
    fn paint(&mut self, buffer: &Buffer) -> io::Result<()>;
}

/// Configuration for [`CrosstermBackend`].
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
    /// Whether to enable mouse capture.
    pub enable_mouse: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            enable_mouse: false,
        }
    }
}

/// Terminal backend built on crossterm.
///
/// Frames are diffed against the last committed buffer and written to
/// stdout (or any writer) with a single `write_all` + `flush`. A failed
/// write drops the committed frame, so the next paint is a full redraw.
pub struct CrosstermBackend<W: Write = Stdout> {
    config: TerminalConfig,
    /// Whether raw mode etc. are currently enabled.
    active: bool,
    /// Last committed frame (`None` forces a full redraw).
    current: Option<Buffer>,
    diff_state: DiffState,
    /// Pre-allocated output buffer.
    output: Vec<u8>,
    out: W,
}

impl CrosstermBackend {
    /// Create a backend with default configuration.
    pub fn new() -> Self {
        Self::with_config(TerminalConfig::default())
    }

    /// Create a backend with custom configuration.
    pub fn with_config(config: TerminalConfig) -> Self {
        Self::with_writer(config, io::stdout())
    }
}

impl<W: Write> CrosstermBackend<W> {
    /// Create a backend that writes frames to `out` instead of stdout.
    pub fn with_writer(config: TerminalConfig, out: W) -> Self {
        Self {
            config,
            active: false,
            current: None,
            diff_state: DiffState::new(),
            output: Vec::with_capacity(65536),
            out,
        }
    }

    fn write_output(&mut self) -> io::Result<()> {
        self.out.write_all(&self.output)?;
        self.out.flush()
    }
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Backend for CrosstermBackend<W> {
    type Events = CrosstermEvents;

    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;

        if self.config.alternate_screen {
            execute!(self.out, EnterAlternateScreen)?;
        }
        if self.config.enable_mouse {
            execute!(self.out, EnableMouseCapture)?;
        }
        execute!(self.out, cursor::Hide)?;
        self.current = None;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        execute!(self.out, cursor::Show)?;
        if self.config.enable_mouse {
            execute!(self.out, DisableMouseCapture)?;
        }
        if self.config.alternate_screen {
            execute!(self.out, LeaveAlternateScreen)?;
        }
        terminal::disable_raw_mode()
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn events(&mut self) -> io::Result<CrosstermEvents> {
        Ok(CrosstermEvents)
    }

    fn paint(&mut self, buffer: &Buffer) -> io::Result<()> {
        self.output.clear();

        match &self.current {
            Some(current) if current.size() == buffer.size() => {
                render_diff(current, buffer, &mut self.output, &mut self.diff_state);
            }
            _ => {
                render_full(buffer, &mut self.output);
                self.diff_state.reset();
            }
        }

        // Flush to terminal in a single write
        if !self.output.is_empty() {
            if let Err(err) = self.write_output() {
                // The terminal state is unknown now
                self.current = None;
                self.diff_state.reset();
                return Err(err);
            }
        }

        match &mut self.current {
            Some(current) => current.clone_from(buffer),
            None => self.current = Some(buffer.clone()),
        }
        Ok(())
    }
}

impl<W: Write> Drop for CrosstermBackend<W> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Event source reading crossterm's global event queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn read(&mut self, timeout: Duration) -> io::Result<SourceRead> {
        let ready = match event::poll(timeout) {
            Ok(ready) => ready,
            Err(err) if is_closed(&err) => return Ok(SourceRead::Closed),
            Err(err) => return Err(err),
        };
        if !ready {
            return Ok(SourceRead::Timeout);
        }
        match event::read() {
            Ok(event) => Ok(SourceRead::Event(event)),
            Err(err) if is_closed(&err) => Ok(SourceRead::Closed),
            Err(err) => Err(err),
        }
    }
}

/// Errors that mean the terminal is gone rather than glitching.
fn is_closed(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::UnexpectedEof | io::ErrorKind::NotConnected
    )
}
