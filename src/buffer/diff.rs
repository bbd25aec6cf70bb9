//! Diffing Engine: Generate minimal ANSI sequences from buffer changes.
//!
//! The terminal backend commits each frame through this module:
//! 1. Compare the last committed buffer with the new one
//! 2. Generate ANSI escape sequences for changed cells only
//! 3. Skip cursor movements for adjacent cells
//! 4. Track color state to avoid redundant SGR sequences
//!
//! All output is accumulated in a single buffer and flushed with one syscall.

use super::{Attr, Buffer, Cell, Color, Modifiers};
use std::io::Write;

/// State tracker for the diffing algorithm.
///
/// This tracks the "current" terminal state (cursor position, colors, modifiers)
/// to minimize the number of escape sequences we need to emit.
#[derive(Debug, Clone)]
pub struct DiffState {
    cursor_x: u16,
    cursor_y: u16,
    fg: Option<Color>,
    bg: Option<Color>,
    modifiers: Option<Modifiers>,
}

impl Default for DiffState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffState {
    /// Create a new diff state with the cursor at home and unknown colors.
    pub const fn new() -> Self {
        Self {
            cursor_x: 0,
            cursor_y: 0,
            fg: None,
            bg: None,
            modifiers: None,
        }
    }

    /// Reset the state (e.g., after a full screen clear).
    pub const fn reset(&mut self) {
        self.fg = None;
        self.bg = None;
        self.modifiers = None;
        // Force cursor move on next write
        self.cursor_x = u16::MAX;
        self.cursor_y = u16::MAX;
    }
}

/// Result of a diff operation.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Number of cells that were different.
    pub cells_changed: usize,
    /// Number of cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Number of color change sequences emitted.
    pub color_changes: usize,
}

/// Render the difference between two equally sized buffers.
///
/// Only cells that differ between `current` and `next` are written.
pub fn render_diff(
    current: &Buffer,
    next: &Buffer,
    output: &mut Vec<u8>,
    state: &mut DiffState,
) -> DiffResult {
    debug_assert_eq!(current.size(), next.size());

    let mut result = DiffResult::default();
    let width = next.width();

    for (idx, (old, new)) in current.cells().iter().zip(next.cells()).enumerate() {
        if old == new {
            continue;
        }

        let x = u16::try_from(idx % width as usize).unwrap_or(u16::MAX);
        let y = u16::try_from(idx / width as usize).unwrap_or(u16::MAX);
        result.cells_changed += 1;

        if state.cursor_y != y || state.cursor_x != x {
            emit_cursor_move(output, x, y);
            state.cursor_x = x;
            state.cursor_y = y;
            result.cursor_moves += 1;
        }

        result.color_changes += emit_style(output, new, state);
        emit_char(output, new.ch);

        state.cursor_x = state.cursor_x.saturating_add(u16::from(new.display_width().max(1)));
    }

    result
}

/// Generate a full redraw sequence (no diffing).
///
/// This is used for the first frame and after a resize, when the terminal
/// contents are unknown.
pub fn render_full(buffer: &Buffer, output: &mut Vec<u8>) {
    let mut state = DiffState::new();
    state.reset();

    // Hide cursor during redraw
    output.extend_from_slice(b"\x1b[?25l");
    output.extend_from_slice(b"\x1b[0m\x1b[2J");

    for (y, row) in buffer.rows().enumerate() {
        emit_cursor_move(output, 0, u16::try_from(y).unwrap_or(u16::MAX));
        let mut skip = 0u8;
        for cell in row {
            // Column covered by the right half of a wide character
            if skip > 0 {
                skip -= 1;
                continue;
            }
            emit_style(output, cell, &mut state);
            emit_char(output, cell.ch);
            skip = cell.display_width().saturating_sub(1);
        }
    }

    output.extend_from_slice(b"\x1b[0m");
}

/// Emit SGR changes needed to draw `cell`, returning how many color
/// sequences were written.
fn emit_style(output: &mut Vec<u8>, cell: &Cell, state: &mut DiffState) -> usize {
    let mut color_changes = 0;
    let next_mods = cell.modifiers();

    // Removing a modifier needs a full reset, which also clears colors.
    let current_mods = state.modifiers.unwrap_or(Modifiers::empty());
    if !current_mods.difference(next_mods).is_empty() {
        output.extend_from_slice(b"\x1b[0m");
        state.fg = None;
        state.bg = None;
        state.modifiers = None;
    }

    if state.fg != Some(cell.fg.color) {
        emit_color(output, cell.fg, true);
        state.fg = Some(cell.fg.color);
        color_changes += 1;
    }

    if state.bg != Some(cell.bg.color) {
        emit_color(output, cell.bg, false);
        state.bg = Some(cell.bg.color);
        color_changes += 1;
    }

    if state.modifiers != Some(next_mods) {
        let added = next_mods.difference(state.modifiers.unwrap_or(Modifiers::empty()));
        emit_modifier_set(output, added);
        state.modifiers = Some(next_mods);
    }

    color_changes
}

/// Emit a cursor move sequence.
///
/// Uses the most compact representation:
/// - `\x1b[H` for home (1,1)
/// - `\x1b[{row}H` for column 1
/// - `\x1b[{row};{col}H` otherwise
#[inline]
fn emit_cursor_move(output: &mut Vec<u8>, x: u16, y: u16) {
    // ANSI uses 1-indexed positions
    let row = u32::from(y) + 1;
    let col = u32::from(x) + 1;

    if row == 1 && col == 1 {
        output.extend_from_slice(b"\x1b[H");
    } else if col == 1 {
        let _ = write!(output, "\x1b[{row}H");
    } else {
        let _ = write!(output, "\x1b[{row};{col}H");
    }
}

/// Emit a foreground or background color sequence.
fn emit_color(output: &mut Vec<u8>, attr: Attr, foreground: bool) {
    let base: u8 = if foreground { 30 } else { 40 };
    match attr.color {
        Color::Default => {
            let _ = write!(output, "\x1b[{}m", base + 9);
        }
        Color::Rgb(rgb) => {
            let _ = write!(output, "\x1b[{};2;{};{};{}m", base + 8, rgb.r, rgb.g, rgb.b);
        }
        named => {
            let index = named.ansi_index().unwrap_or(9);
            let _ = write!(output, "\x1b[{}m", base + index);
        }
    }
}

/// Emit SGR sequences for a set of modifiers.
fn emit_modifier_set(output: &mut Vec<u8>, modifiers: Modifiers) {
    const CODES: [(Modifiers, &[u8]); 8] = [
        (Modifiers::BOLD, b"\x1b[1m"),
        (Modifiers::DIM, b"\x1b[2m"),
        (Modifiers::ITALIC, b"\x1b[3m"),
        (Modifiers::UNDERLINE, b"\x1b[4m"),
        (Modifiers::BLINK, b"\x1b[5m"),
        (Modifiers::REVERSED, b"\x1b[7m"),
        (Modifiers::HIDDEN, b"\x1b[8m"),
        (Modifiers::STRIKETHROUGH, b"\x1b[9m"),
    ];
    for (flag, code) in CODES {
        if modifiers.contains(flag) {
            output.extend_from_slice(code);
        }
    }
}

#[inline]
fn emit_char(output: &mut Vec<u8>, ch: char) {
    let ch = if ch == '\0' || ch.is_control() { ' ' } else { ch };
    let mut bytes = [0u8; 4];
    output.extend_from_slice(ch.encode_utf8(&mut bytes).as_bytes());
}
