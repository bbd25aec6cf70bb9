//! Text: a single line of styled text.

use crate::actor::Event;
use crate::buffer::{Attr, Cell};
use crate::scene::{Drawable, Physical, Screen};
use std::any::Any;
use unicode_width::UnicodeWidthChar;

/// A line of text at a fixed position.
///
/// Wide characters take two columns. By default the text follows the
/// camera like any level entity; [`fixed`](Self::fixed) pins it to screen
/// coordinates instead (for HUDs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    x: i32,
    y: i32,
    text: String,
    fg: Attr,
    bg: Attr,
    /// Render with screen coordinates.
    fixed: bool,
}

impl Text {
    /// Create a text entity.
    pub fn new(x: i32, y: i32, text: impl Into<String>, fg: impl Into<Attr>, bg: impl Into<Attr>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            fg: fg.into(),
            bg: bg.into(),
            fixed: false,
        }
    }

    /// Ignore the camera offset when drawing (builder pattern).
    #[must_use]
    pub const fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Get the text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Move the text.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Set foreground and background attributes.
    pub fn set_style(&mut self, fg: impl Into<Attr>, bg: impl Into<Attr>) {
        self.fg = fg.into();
        self.bg = bg.into();
    }

    /// Width in columns.
    pub fn width(&self) -> i32 {
        let columns: usize = self.text.chars().map(|c| c.width().unwrap_or(0)).sum();
        i32::try_from(columns).unwrap_or(i32::MAX)
    }
}

impl Drawable for Text {
    fn tick(&mut self, _event: &Event) {}

    fn draw(&mut self, screen: &mut Screen) {
        let mut x = self.x;
        for ch in self.text.chars() {
            let width = ch.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            let cell = Cell {
                fg: self.fg,
                bg: self.bg,
                ch,
            };
            if self.fixed {
                screen.render_cell_absolute(x, self.y, &cell);
            } else {
                screen.render_cell(x, self.y, &cell);
            }
            x += i32::try_from(width).unwrap_or(1);
        }
    }

    fn as_physical(&self) -> Option<&dyn Physical> {
        Some(self)
    }
}

impl Physical for Text {
    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn size(&self) -> (i32, i32) {
        (self.width(), 1)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;
    use crate::scene::Level;

    #[test]
    fn test_text_draw() {
        let mut screen = Screen::with_size(8, 2);
        let mut text = Text::new(1, 1, "hi!", Color::Green, Color::Default);

        text.draw(&mut screen);

        assert_eq!(screen.buffer().row_text(1), " hi!    ");
        assert_eq!(screen.buffer().get(1, 1).map(|c| c.fg.color), Some(Color::Green));
    }

    #[test]
    fn test_text_wide_chars() {
        let mut screen = Screen::with_size(6, 1);
        let mut text = Text::new(0, 0, "日本x", Color::Default, Color::Default);

        text.draw(&mut screen);

        assert_eq!(text.width(), 5);
        assert_eq!(screen.buffer().get(0, 0).map(|c| c.ch), Some('日'));
        assert_eq!(screen.buffer().get(2, 0).map(|c| c.ch), Some('本'));
        assert_eq!(screen.buffer().get(4, 0).map(|c| c.ch), Some('x'));
    }

    #[test]
    fn test_text_fixed_ignores_camera() {
        let mut screen = Screen::with_size(6, 1);
        let mut level = Level::default();
        level.set_offset(3, 0);
        screen.set_level(level);

        let mut fixed = Text::new(0, 0, "a", Color::Default, Color::Default).fixed();
        let mut moving = Text::new(0, 0, "b", Color::Default, Color::Default);
        fixed.draw(&mut screen);
        moving.draw(&mut screen);

        assert_eq!(screen.buffer().row_text(0), "a  b  ");
    }

    #[test]
    fn test_text_physical() {
        let mut text = Text::new(2, 4, "score", Color::White, Color::Black);
        assert_eq!(text.size(), (5, 1));
        text.set_text("10");
        text.set_position(0, 0);
        assert_eq!(text.text(), "10");
        assert_eq!(text.bounds().width, 2);
    }
}
