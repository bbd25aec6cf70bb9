//! Game: the frame loop that ties input, scene and backend together.
//!
//! The Game owns the backend and the [`Screen`]. `start` brings the
//! terminal up, spawns the [`InputActor`] and then runs frames until the
//! end key arrives or a [`StopHandle`] fires:
//!
//! ```text
//! try_recv ─▶ end key? ─▶ resize? ─▶ tick ─▶ delta ─▶ draw (one paint)
//!    ▲                                                     │
//!    └──────────────── idle when no event ◀────────────────┘
//! ```
//!
//! There is no frame rate cap; the loop runs as fast as it can and
//! consults [`IdleStrategy`] only on iterations that consumed no event.

use super::event::{Event, EventKind, KeyChord};
use super::input::InputActor;
use crate::buffer::{Cell, Color};
use crate::error::{Error, Result};
use crate::scene::{Drawable, EntityId, Level, Screen};
use crate::terminal::{Backend, CrosstermBackend};
use crossbeam_channel::{bounded, unbounded, Receiver, TryRecvError};
use log::{debug, info, trace, warn};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// What the loop does on an iteration that consumed no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdleStrategy {
    /// Keep going immediately (busy loop).
    #[default]
    Spin,
    /// Yield the thread to the scheduler.
    Yield,
    /// Sleep for a fixed duration.
    Sleep(Duration),
}

impl IdleStrategy {
    fn idle(self) {
        match self {
            Self::Spin => std::hint::spin_loop(),
            Self::Yield => thread::yield_now(),
            Self::Sleep(duration) => thread::sleep(duration),
        }
    }
}

/// Configuration for the [`Game`].
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Key that ends the game. Never delivered to entities.
    pub end_key: KeyChord,
    /// Input poll timeout.
    pub input_poll_timeout: Duration,
    /// Capacity of the input channel (`None` = unbounded).
    pub channel_capacity: Option<usize>,
    /// Behavior of iterations without input.
    pub idle: IdleStrategy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            end_key: KeyChord::CTRL_C,
            input_poll_timeout: Duration::from_millis(10),
            channel_capacity: None,
            idle: IdleStrategy::Spin,
        }
    }
}

/// Lifecycle of a [`Game`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Created, not started.
    Idle,
    /// Inside `start`.
    Running,
    /// `start` has returned.
    Stopped,
}

/// Thread-safe handle that asks a running game to stop.
///
/// The loop checks it after every frame, so the game stops after finishing
/// the frame in progress.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request a stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether a stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A terminal game.
pub struct Game<B: Backend = CrosstermBackend> {
    config: GameConfig,
    backend: B,
    screen: Screen,
    state: GameState,
    stop: StopHandle,
}

impl Game<CrosstermBackend> {
    /// Create a game on the real terminal with default configuration.
    pub fn new() -> Self {
        Self::with_backend(CrosstermBackend::new(), GameConfig::default())
    }
}

impl Default for Game<CrosstermBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> Game<B> {
    /// Create a game on any backend.
    pub fn with_backend(backend: B, config: GameConfig) -> Self {
        Self {
            config,
            backend,
            screen: Screen::new(),
            state: GameState::Idle,
            stop: StopHandle::default(),
        }
    }

    /// The configuration.
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The screen.
    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The screen, mutably.
    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Replace the screen.
    pub fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    /// The backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Handle for stopping the game from another thread or from entity code.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Change the key that ends the game.
    pub fn set_end_key(&mut self, end_key: KeyChord) {
        self.config.end_key = end_key;
    }

    /// Build an empty level with a solid background color.
    pub fn create_level(&self, background: Color) -> Level {
        Level::new(Cell::background(background))
    }

    /// Make `level` the active level.
    pub fn set_level(&mut self, level: Level) {
        self.screen.set_level(level);
    }

    /// Add a screen-level entity.
    pub fn add_entity(&mut self, entity: Box<dyn Drawable>) -> EntityId {
        self.screen.add_entity(entity)
    }

    /// Run the game until the end key or a stop request.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyStarted`] unless the game is idle
    /// - [`Error::TerminalNotAvailable`] if the backend has no terminal
    /// - [`Error::Io`] if bringing the terminal up, or restoring it, fails
    pub fn start(&mut self) -> Result<()> {
        if self.state != GameState::Idle {
            return Err(Error::AlreadyStarted);
        }

        if let Err(err) = self.backend.init() {
            warn!("terminal init failed: {err}");
            // Undo whatever part of init succeeded
            let _ = self.backend.close();
            return Err(match err.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::Unsupported => Error::TerminalNotAvailable,
                _ => Error::Io(err),
            });
        }

        let result = self.run();
        self.state = GameState::Stopped;
        let closed = self.backend.close();
        info!("game stopped after {} frames", self.screen.frame_count());

        result?;
        closed?;
        Ok(())
    }

    fn run(&mut self) -> io::Result<()> {
        let (width, height) = self.backend.size()?;
        self.screen.resize(width, height);

        let source = self.backend.events()?;
        let (tx, rx) = match self.config.channel_capacity {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };
        let input = InputActor::spawn(source, tx, self.config.input_poll_timeout)?;

        self.state = GameState::Running;
        info!("game started at {width}x{height}");
        self.frame_loop(&rx);

        // Unblocks a producer stuck on a full channel
        drop(rx);
        input.stop();
        Ok(())
    }

    fn frame_loop(&mut self, rx: &Receiver<Event>) {
        let mut last = Instant::now();
        let mut pending: Option<Event> = None;
        // One error event per run of failed paints, so input keeps flowing
        let mut paint_failing = false;
        let mut disconnected = false;

        loop {
            let event = pending.take().or_else(|| Self::poll(rx, &mut disconnected));
            let consumed = event.is_some();
            let mut stopping = false;

            if let Some(event) = event {
                trace!("frame {}: {:?}", self.screen.frame_count(), event.kind);
                if self.config.end_key.matches(&event) {
                    debug!("end key received");
                    stopping = true;
                } else {
                    if event.kind == EventKind::Resize {
                        if let Some((width, height)) = event.size {
                            self.screen.resize(width, height);
                        }
                    }
                    self.screen.tick(&event);
                }
            }

            let now = Instant::now();
            self.screen.set_time_delta(now.duration_since(last));
            last = now;

            match self.screen.draw(&mut self.backend) {
                Ok(()) => paint_failing = false,
                Err(err) if paint_failing => trace!("paint still failing: {err}"),
                Err(err) => {
                    warn!("paint failed: {err}");
                    pending = Some(Event::error(&err));
                    paint_failing = true;
                }
            }

            if stopping || self.stop.is_stopped() {
                break;
            }
            if !consumed {
                self.config.idle.idle();
            }
        }
    }

    fn poll(rx: &Receiver<Event>, disconnected: &mut bool) -> Option<Event> {
        match rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !*disconnected {
                    warn!("input thread exited, no further input");
                    *disconnected = true;
                }
                None
            }
        }
    }
}
