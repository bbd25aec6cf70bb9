//! Rectangle: a solid block of color.
//!
//! Drawn as spaces with the background set, so it only shows where the
//! terminal renders background colors. Physical, so it takes part in
//! collisions (walls, goals, players...).

use crate::actor::Event;
use crate::buffer::{Cell, Color};
use crate::layout::Rect;
use crate::scene::{Drawable, Physical, Screen};
use std::any::Any;

/// A filled rectangle in level coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rectangle {
    /// Area covered.
    bounds: Rect,
    /// Fill color.
    color: Color,
}

impl Rectangle {
    /// Create a rectangle at `(x, y)` of `width` x `height`.
    pub const fn new(x: i32, y: i32, width: i32, height: i32, color: Color) -> Self {
        Self {
            bounds: Rect::new(x, y, width, height),
            color,
        }
    }

    /// Get the fill color.
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Set the fill color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Move the rectangle.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.bounds.x = x;
        self.bounds.y = y;
    }

    /// Resize the rectangle.
    pub fn set_size(&mut self, width: i32, height: i32) {
        self.bounds.width = width;
        self.bounds.height = height;
    }
}

impl Drawable for Rectangle {
    fn tick(&mut self, _event: &Event) {}

    fn draw(&mut self, screen: &mut Screen) {
        let cell = Cell::new(' ').with_bg(self.color);
        for y in self.bounds.y..self.bounds.bottom() {
            for x in self.bounds.x..self.bounds.right() {
                screen.render_cell(x, y, &cell);
            }
        }
    }

    fn as_physical(&self) -> Option<&dyn Physical> {
        Some(self)
    }
}

impl Physical for Rectangle {
    fn position(&self) -> (i32, i32) {
        (self.bounds.x, self.bounds.y)
    }

    fn size(&self) -> (i32, i32) {
        (self.bounds.width, self.bounds.height)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_draw() {
        let mut screen = Screen::with_size(4, 3);
        let mut rect = Rectangle::new(1, 1, 2, 5, Color::Red);

        rect.draw(&mut screen);

        assert_eq!(screen.buffer().get(1, 1).map(|c| c.bg.color), Some(Color::Red));
        assert_eq!(screen.buffer().get(2, 2).map(|c| c.bg.color), Some(Color::Red));
        assert_eq!(screen.buffer().get(0, 0).map(|c| c.bg.color), Some(Color::Default));
        assert_eq!(screen.buffer().get(3, 1).map(|c| c.bg.color), Some(Color::Default));
    }

    #[test]
    fn test_rectangle_physical() {
        let mut rect = Rectangle::new(2, 3, 4, 5, Color::White);
        assert_eq!(rect.position(), (2, 3));
        assert_eq!(rect.size(), (4, 5));

        rect.set_position(-1, 0);
        rect.set_size(1, 1);
        assert_eq!(rect.bounds(), Rect::new(-1, 0, 1, 1));
        assert!(rect.as_physical().is_some());
    }

    #[test]
    fn test_rectangle_downcast() {
        let rect = Rectangle::new(0, 0, 1, 1, Color::Blue);
        let physical: &dyn Physical = &rect;
        let color = physical
            .as_any()
            .and_then(|any| any.downcast_ref::<Rectangle>())
            .map(Rectangle::color);
        assert_eq!(color, Some(Color::Blue));
    }
}
