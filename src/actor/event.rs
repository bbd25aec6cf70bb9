//! Event abstraction: backend-independent input events.
//!
//! Every native occurrence read from the terminal (a key, a resize, a mouse
//! action, a focus change, a paste, or a failed read) is converted into one
//! [`Event`] by [`convert_event`]. The conversion is pure and total: it never
//! fails, and an error in the native read is carried in [`Event::error`].

use bitflags::bitflags;
use crossterm::event as native;
use std::io;

/// The kind of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventKind {
    /// A key was pressed (or repeated/released, see [`Event::key_state`]).
    Key,
    /// The terminal was resized, see [`Event::size`].
    Resize,
    /// A mouse action, see [`Event::mouse`].
    Mouse,
    /// Reading from the backend failed, see [`Event::error`].
    Error,
    /// An interruption requested by application code.
    Interrupt,
    /// A backend event with no dedicated kind, see [`Event::raw`].
    Raw,
    /// No event.
    #[default]
    None,
}

/// Named (non-printable) keys.
///
/// Printable input is not a `Key`: it arrives in [`Event::ch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Function key (F1-F12 and beyond).
    F(u8),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Tab key.
    Tab,
    /// Backtab (Shift+Tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
    /// Null (Ctrl+Space on some terminals).
    Null,
    /// Caps Lock.
    CapsLock,
    /// Scroll Lock.
    ScrollLock,
    /// Num Lock.
    NumLock,
    /// Print Screen.
    PrintScreen,
    /// Pause.
    Pause,
    /// Menu.
    Menu,
    /// Keypad "begin" (5 on a keypad with Num Lock off).
    KeypadBegin,
    /// A media key.
    Media(MediaKey),
    /// A modifier key pressed on its own.
    Modifier(ModifierKey),
}

/// Media keys. Only reported by terminals with enhanced keyboard reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKey {
    /// Play.
    Play,
    /// Pause.
    Pause,
    /// Play/pause toggle.
    PlayPause,
    /// Reverse.
    Reverse,
    /// Stop.
    Stop,
    /// Fast forward.
    FastForward,
    /// Rewind.
    Rewind,
    /// Next track.
    TrackNext,
    /// Previous track.
    TrackPrevious,
    /// Record.
    Record,
    /// Volume down.
    LowerVolume,
    /// Volume up.
    RaiseVolume,
    /// Mute.
    MuteVolume,
}

/// Individual modifier keys, by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKey {
    /// Left Shift.
    LeftShift,
    /// Left Control.
    LeftControl,
    /// Left Alt.
    LeftAlt,
    /// Left Super.
    LeftSuper,
    /// Left Hyper.
    LeftHyper,
    /// Left Meta.
    LeftMeta,
    /// Right Shift.
    RightShift,
    /// Right Control.
    RightControl,
    /// Right Alt.
    RightAlt,
    /// Right Super.
    RightSuper,
    /// Right Hyper.
    RightHyper,
    /// Right Meta.
    RightMeta,
    /// AltGr on most layouts.
    IsoLevel3Shift,
    /// ISO level 5 shift.
    IsoLevel5Shift,
}

bitflags! {
    /// Keyboard modifiers held during a key or mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        /// Shift key held.
        const SHIFT = 0b0000_0001;
        /// Control key held.
        const CONTROL = 0b0000_0010;
        /// Alt/Option key held.
        const ALT = 0b0000_0100;
        /// Super/Command/Windows key held.
        const SUPER = 0b0000_1000;
        /// Hyper key held.
        const HYPER = 0b0001_0000;
        /// Meta key held.
        const META = 0b0010_0000;
    }
}

/// Whether a key event is a press, an auto-repeat, or a release.
///
/// Most terminals only report presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Key went down.
    Press,
    /// Key is held and auto-repeating.
    Repeat,
    /// Key went up.
    Release,
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
}

/// What the mouse did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// Button pressed.
    Down(MouseButton),
    /// Button released.
    Up(MouseButton),
    /// Moved with a button held.
    Drag(MouseButton),
    /// Moved with no button held.
    Moved,
    /// Wheel up.
    ScrollUp,
    /// Wheel down.
    ScrollDown,
    /// Wheel left.
    ScrollLeft,
    /// Wheel right.
    ScrollRight,
}

/// Mouse event details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
    /// What happened.
    pub action: MouseAction,
}

/// Backend events that have no dedicated [`EventKind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawEvent {
    /// The terminal gained focus.
    FocusGained,
    /// The terminal lost focus.
    FocusLost,
    /// Bracketed paste.
    Paste(String),
}

/// A failed backend read, carried as data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EventError {
    /// Kind of the underlying IO error.
    pub kind: io::ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl From<&io::Error> for EventError {
    fn from(err: &io::Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// An input occurrence, delivered to entities by `tick`.
///
/// Fields not relevant to the [`kind`](Self::kind) are empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Event {
    /// What kind of event this is.
    pub kind: EventKind,
    /// The named key pressed, if any.
    pub key: Option<Key>,
    /// The character of the key, if any.
    pub ch: Option<char>,
    /// Keyboard modifiers.
    pub modifiers: KeyModifiers,
    /// Press/repeat/release for key events.
    pub key_state: Option<KeyState>,
    /// New terminal size for resize events.
    pub size: Option<(u16, u16)>,
    /// Mouse details for mouse events.
    pub mouse: Option<MouseEvent>,
    /// Payload for raw events.
    pub raw: Option<RawEvent>,
    /// The error for error events.
    pub error: Option<EventError>,
}

impl Event {
    /// The empty event.
    pub fn none() -> Self {
        Self::default()
    }

    /// An interrupt event.
    pub fn interrupt() -> Self {
        Self {
            kind: EventKind::Interrupt,
            ..Self::default()
        }
    }

    /// A key press of a named key.
    pub fn key(key: Key, modifiers: KeyModifiers) -> Self {
        Self {
            kind: EventKind::Key,
            key: Some(key),
            modifiers,
            key_state: Some(KeyState::Press),
            ..Self::default()
        }
    }

    /// A key press of a printable character.
    pub fn char(ch: char, modifiers: KeyModifiers) -> Self {
        Self {
            kind: EventKind::Key,
            ch: Some(ch),
            modifiers,
            key_state: Some(KeyState::Press),
            ..Self::default()
        }
    }

    /// A resize to `width` x `height`.
    pub fn resize(width: u16, height: u16) -> Self {
        Self {
            kind: EventKind::Resize,
            size: Some((width, height)),
            ..Self::default()
        }
    }

    /// An error event wrapping a failed read or paint.
    pub fn error(err: &io::Error) -> Self {
        Self {
            kind: EventKind::Error,
            error: Some(EventError::from(err)),
            ..Self::default()
        }
    }

    /// Check whether this is a key event.
    #[inline]
    pub fn is_key(&self) -> bool {
        self.kind == EventKind::Key
    }
}

/// A key press to match against, such as the terminating key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    /// Named key, or `None` for a character key.
    pub key: Option<Key>,
    /// Character, or `None` for a named key.
    pub ch: Option<char>,
    /// Required modifiers (matched exactly).
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    /// Ctrl+C.
    pub const CTRL_C: Self = Self::ctrl('c');

    /// A named key with no modifiers.
    pub const fn key(key: Key) -> Self {
        Self {
            key: Some(key),
            ch: None,
            modifiers: KeyModifiers::empty(),
        }
    }

    /// A character with no modifiers.
    pub const fn char(ch: char) -> Self {
        Self {
            key: None,
            ch: Some(ch),
            modifiers: KeyModifiers::empty(),
        }
    }

    /// A character with Control held.
    pub const fn ctrl(ch: char) -> Self {
        Self {
            key: None,
            ch: Some(ch),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// Check whether `event` is a press (or repeat) of this chord.
    pub fn matches(&self, event: &Event) -> bool {
        event.kind == EventKind::Key
            && event.key_state != Some(KeyState::Release)
            && event.key == self.key
            && event.ch == self.ch
            && event.modifiers == self.modifiers
    }
}

impl Default for KeyChord {
    fn default() -> Self {
        Self::CTRL_C
    }
}

/// Convert the result of a native read into an [`Event`].
pub fn convert_event(native: io::Result<native::Event>) -> Event {
    match native {
        Ok(event) => Event::from(event),
        Err(err) => Event::error(&err),
    }
}

impl From<native::Event> for Event {
    fn from(event: native::Event) -> Self {
        match event {
            native::Event::Key(key_event) => {
                let (key, ch) = convert_key_code(key_event.code);
                Self {
                    kind: EventKind::Key,
                    key,
                    ch,
                    modifiers: convert_modifiers(key_event.modifiers),
                    key_state: Some(convert_key_state(key_event.kind)),
                    ..Self::default()
                }
            }

            native::Event::Mouse(mouse_event) => Self {
                kind: EventKind::Mouse,
                modifiers: convert_modifiers(mouse_event.modifiers),
                mouse: Some(MouseEvent {
                    x: mouse_event.column,
                    y: mouse_event.row,
                    action: convert_mouse_action(mouse_event.kind),
                }),
                ..Self::default()
            },

            native::Event::Resize(width, height) => Self::resize(width, height),

            native::Event::FocusGained => Self::raw(RawEvent::FocusGained),

            native::Event::FocusLost => Self::raw(RawEvent::FocusLost),

            native::Event::Paste(text) => Self::raw(RawEvent::Paste(text)),
        }
    }
}

impl Event {
    fn raw(raw: RawEvent) -> Self {
        Self {
            kind: EventKind::Raw,
            raw: Some(raw),
            ..Self::default()
        }
    }
}

/// Split a native key code into a named key or a character.
const fn convert_key_code(code: native::KeyCode) -> (Option<Key>, Option<char>) {
    let key = match code {
        native::KeyCode::Char(c) => return (None, Some(c)),
        native::KeyCode::F(n) => Key::F(n),
        native::KeyCode::Backspace => Key::Backspace,
        native::KeyCode::Enter => Key::Enter,
        native::KeyCode::Left => Key::ArrowLeft,
        native::KeyCode::Right => Key::ArrowRight,
        native::KeyCode::Up => Key::ArrowUp,
        native::KeyCode::Down => Key::ArrowDown,
        native::KeyCode::Home => Key::Home,
        native::KeyCode::End => Key::End,
        native::KeyCode::PageUp => Key::PageUp,
        native::KeyCode::PageDown => Key::PageDown,
        native::KeyCode::Tab => Key::Tab,
        native::KeyCode::BackTab => Key::BackTab,
        native::KeyCode::Delete => Key::Delete,
        native::KeyCode::Insert => Key::Insert,
        native::KeyCode::Esc => Key::Esc,
        native::KeyCode::Null => Key::Null,
        native::KeyCode::CapsLock => Key::CapsLock,
        native::KeyCode::ScrollLock => Key::ScrollLock,
        native::KeyCode::NumLock => Key::NumLock,
        native::KeyCode::PrintScreen => Key::PrintScreen,
        native::KeyCode::Pause => Key::Pause,
        native::KeyCode::Menu => Key::Menu,
        native::KeyCode::KeypadBegin => Key::KeypadBegin,
        native::KeyCode::Media(media) => Key::Media(convert_media_key(media)),
        native::KeyCode::Modifier(modifier) => Key::Modifier(convert_modifier_key(modifier)),
    };
    (Some(key), None)
}

const fn convert_media_key(code: native::MediaKeyCode) -> MediaKey {
    match code {
        native::MediaKeyCode::Play => MediaKey::Play,
        native::MediaKeyCode::Pause => MediaKey::Pause,
        native::MediaKeyCode::PlayPause => MediaKey::PlayPause,
        native::MediaKeyCode::Reverse => MediaKey::Reverse,
        native::MediaKeyCode::Stop => MediaKey::Stop,
        native::MediaKeyCode::FastForward => MediaKey::FastForward,
        native::MediaKeyCode::Rewind => MediaKey::Rewind,
        native::MediaKeyCode::TrackNext => MediaKey::TrackNext,
        native::MediaKeyCode::TrackPrevious => MediaKey::TrackPrevious,
        native::MediaKeyCode::Record => MediaKey::Record,
        native::MediaKeyCode::LowerVolume => MediaKey::LowerVolume,
        native::MediaKeyCode::RaiseVolume => MediaKey::RaiseVolume,
        native::MediaKeyCode::MuteVolume => MediaKey::MuteVolume,
    }
}

const fn convert_modifier_key(code: native::ModifierKeyCode) -> ModifierKey {
    match code {
        native::ModifierKeyCode::LeftShift => ModifierKey::LeftShift,
        native::ModifierKeyCode::LeftControl => ModifierKey::LeftControl,
        native::ModifierKeyCode::LeftAlt => ModifierKey::LeftAlt,
        native::ModifierKeyCode::LeftSuper => ModifierKey::LeftSuper,
        native::ModifierKeyCode::LeftHyper => ModifierKey::LeftHyper,
        native::ModifierKeyCode::LeftMeta => ModifierKey::LeftMeta,
        native::ModifierKeyCode::RightShift => ModifierKey::RightShift,
        native::ModifierKeyCode::RightControl => ModifierKey::RightControl,
        native::ModifierKeyCode::RightAlt => ModifierKey::RightAlt,
        native::ModifierKeyCode::RightSuper => ModifierKey::RightSuper,
        native::ModifierKeyCode::RightHyper => ModifierKey::RightHyper,
        native::ModifierKeyCode::RightMeta => ModifierKey::RightMeta,
        native::ModifierKeyCode::IsoLevel3Shift => ModifierKey::IsoLevel3Shift,
        native::ModifierKeyCode::IsoLevel5Shift => ModifierKey::IsoLevel5Shift,
    }
}

fn convert_modifiers(mods: native::KeyModifiers) -> KeyModifiers {
    const PAIRS: [(native::KeyModifiers, KeyModifiers); 6] = [
        (native::KeyModifiers::SHIFT, KeyModifiers::SHIFT),
        (native::KeyModifiers::CONTROL, KeyModifiers::CONTROL),
        (native::KeyModifiers::ALT, KeyModifiers::ALT),
        (native::KeyModifiers::SUPER, KeyModifiers::SUPER),
        (native::KeyModifiers::HYPER, KeyModifiers::HYPER),
        (native::KeyModifiers::META, KeyModifiers::META),
    ];
    PAIRS
        .iter()
        .filter(|(theirs, _)| mods.contains(*theirs))
        .fold(KeyModifiers::empty(), |acc, (_, ours)| acc | *ours)
}

const fn convert_key_state(kind: native::KeyEventKind) -> KeyState {
    match kind {
        native::KeyEventKind::Press => KeyState::Press,
        native::KeyEventKind::Repeat => KeyState::Repeat,
        native::KeyEventKind::Release => KeyState::Release,
    }
}

const fn convert_mouse_button(button: native::MouseButton) -> MouseButton {
    match button {
        native::MouseButton::Left => MouseButton::Left,
        native::MouseButton::Right => MouseButton::Right,
        native::MouseButton::Middle => MouseButton::Middle,
    }
}

const fn convert_mouse_action(kind: native::MouseEventKind) -> MouseAction {
    match kind {
        native::MouseEventKind::Down(b) => MouseAction::Down(convert_mouse_button(b)),
        native::MouseEventKind::Up(b) => MouseAction::Up(convert_mouse_button(b)),
        native::MouseEventKind::Drag(b) => MouseAction::Drag(convert_mouse_button(b)),
        native::MouseEventKind::Moved => MouseAction::Moved,
        native::MouseEventKind::ScrollUp => MouseAction::ScrollUp,
        native::MouseEventKind::ScrollDown => MouseAction::ScrollDown,
        native::MouseEventKind::ScrollLeft => MouseAction::ScrollLeft,
        native::MouseEventKind::ScrollRight => MouseAction::ScrollRight,
    }
}
