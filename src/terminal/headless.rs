//! Headless backend: an in-memory terminal for tests and simulations.
//!
//! [`HeadlessBackend`] records committed frames instead of writing escape
//! sequences, and [`HeadlessInput`] scripts the native events the input
//! thread will read.

use super::backend::{Backend, EventSource, SourceRead};
use crate::buffer::Buffer;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use crossterm::event::{Event as NativeEvent, KeyCode, KeyEvent, KeyModifiers};
use std::io;
use std::time::Duration;

enum Scripted {
    Event(NativeEvent),
    Error(io::Error),
    Close,
}

/// Handle for feeding native input to a [`HeadlessBackend`].
///
/// Cloneable and `Send`, so tests can script input from any thread.
#[derive(Clone)]
pub struct HeadlessInput {
    tx: Sender<Scripted>,
}

impl HeadlessInput {
    /// Queue a native event.
    pub fn push(&self, event: NativeEvent) {
        let _ = self.tx.send(Scripted::Event(event));
    }

    /// Queue a key press.
    pub fn push_key(&self, code: KeyCode, modifiers: KeyModifiers) {
        self.push(NativeEvent::Key(KeyEvent::new(code, modifiers)));
    }

    /// Queue a resize.
    pub fn push_resize(&self, width: u16, height: u16) {
        self.push(NativeEvent::Resize(width, height));
    }

    /// Queue a failed read.
    pub fn push_error(&self, err: io::Error) {
        let _ = self.tx.send(Scripted::Error(err));
    }

    /// Close the event source; the input thread exits when it reads this.
    pub fn close(&self) {
        let _ = self.tx.send(Scripted::Close);
    }
}

/// Event source of a [`HeadlessBackend`].
pub struct HeadlessEvents {
    rx: Receiver<Scripted>,
    closed: bool,
}

impl EventSource for HeadlessEvents {
    fn read(&mut self, timeout: Duration) -> io::Result<SourceRead> {
        if self.closed {
            return Ok(SourceRead::Closed);
        }
        match self.rx.recv_timeout(timeout) {
            Ok(Scripted::Event(event)) => Ok(SourceRead::Event(event)),
            Ok(Scripted::Error(err)) => Err(err),
            Ok(Scripted::Close) | Err(RecvTimeoutError::Disconnected) => {
                self.closed = true;
                Ok(SourceRead::Closed)
            }
            Err(RecvTimeoutError::Timeout) => Ok(SourceRead::Timeout),
        }
    }
}

/// An in-memory backend.
pub struct HeadlessBackend {
    width: u16,
    height: u16,
    fail_init: bool,
    failing_paints: usize,
    tx: Sender<Scripted>,
    rx: Receiver<Scripted>,
    last_frame: Option<Buffer>,
    painted_sizes: Vec<(u16, u16)>,
    paint_count: u64,
    init_count: u32,
    close_count: u32,
}

impl HeadlessBackend {
    /// Create a headless terminal of the given size.
    pub fn new(width: u16, height: u16) -> Self {
        let (tx, rx) = unbounded();
        Self {
            width,
            height,
            fail_init: false,
            failing_paints: 0,
            tx,
            rx,
            last_frame: None,
            painted_sizes: Vec::new(),
            paint_count: 0,
            init_count: 0,
            close_count: 0,
        }
    }

    /// Make `init` fail, simulating a missing terminal.
    #[must_use]
    pub const fn with_failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Make the next `count` paints fail.
    pub fn fail_next_paints(&mut self, count: usize) {
        self.failing_paints = count;
    }

    /// Get a handle for scripting input.
    pub fn input(&self) -> HeadlessInput {
        HeadlessInput {
            tx: self.tx.clone(),
        }
    }

    /// The most recently committed frame.
    pub const fn last_frame(&self) -> Option<&Buffer> {
        self.last_frame.as_ref()
    }

    /// Distinct frame sizes committed, in order.
    pub fn painted_sizes(&self) -> &[(u16, u16)] {
        &self.painted_sizes
    }

    /// Number of successful paints.
    pub const fn paint_count(&self) -> u64 {
        self.paint_count
    }

    /// Number of `init` calls.
    pub const fn init_count(&self) -> u32 {
        self.init_count
    }

    /// Number of `close` calls.
    pub const fn close_count(&self) -> u32 {
        self.close_count
    }
}

impl Backend for HeadlessBackend {
    type Events = HeadlessEvents;

    fn init(&mut self) -> io::Result<()> {
        self.init_count += 1;
        if self.fail_init {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no terminal attached"));
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.close_count += 1;
        Ok(())
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn events(&mut self) -> io::Result<HeadlessEvents> {
        Ok(HeadlessEvents {
            rx: self.rx.clone(),
            closed: false,
        })
    }

    fn paint(&mut self, buffer: &Buffer) -> io::Result<()> {
        if self.failing_paints > 0 {
            self.failing_paints -= 1;
            return Err(io::Error::other("paint failed"));
        }

        if self.painted_sizes.last() != Some(&buffer.size()) {
            self.painted_sizes.push(buffer.size());
        }
        match &mut self.last_frame {
            Some(frame) => frame.clone_from(buffer),
            None => self.last_frame = Some(buffer.clone()),
        }
        self.paint_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Cell;

    #[test]
    fn test_headless_records_frames() {
        let mut backend = HeadlessBackend::new(4, 2);
        let mut buffer = Buffer::new(4, 2);
        buffer.set(1, 1, Cell::new('#'));

        backend.paint(&buffer).expect("paint");
        backend.paint(&buffer).expect("paint");

        assert_eq!(backend.paint_count(), 2);
        assert_eq!(backend.painted_sizes(), &[(4, 2)]);
        assert_eq!(backend.last_frame().map(|b| b.row_text(1)), Some(" #  ".to_string()));
    }

    #[test]
    fn test_headless_failing_init() {
        let mut backend = HeadlessBackend::new(4, 2).with_failing_init();
        assert!(backend.init().is_err());
        assert_eq!(backend.init_count(), 1);
    }

    #[test]
    fn test_headless_failing_paints() {
        let mut backend = HeadlessBackend::new(4, 2);
        backend.fail_next_paints(1);
        let buffer = Buffer::new(4, 2);
        assert!(backend.paint(&buffer).is_err());
        assert!(backend.paint(&buffer).is_ok());
        assert_eq!(backend.paint_count(), 1);
    }

    #[test]
    fn test_headless_events_script() {
        let mut backend = HeadlessBackend::new(4, 2);
        let input = backend.input();
        let mut events = backend.events().expect("events");
        let timeout = Duration::from_millis(10);

        assert!(matches!(events.read(timeout), Ok(SourceRead::Timeout)));

        input.push_resize(9, 9);
        input.push_error(io::Error::other("boom"));
        input.close();

        assert!(matches!(
            events.read(timeout),
            Ok(SourceRead::Event(NativeEvent::Resize(9, 9)))
        ));
        assert!(events.read(timeout).is_err());
        assert!(matches!(events.read(timeout), Ok(SourceRead::Closed)));
        assert!(matches!(events.read(timeout), Ok(SourceRead::Closed)));
    }
}
