//! Buffer: A grid of cells representing the terminal screen.
//!
//! The buffer uses contiguous memory allocation for cache efficiency.
//! Cells are stored in row-major order.

use super::cell::Cell;

/// A grid of cells representing the terminal screen.
///
/// Access is in row-major order: `index = y * width + x`. Writes outside
/// the grid are ignored, so entities may freely draw partially off-screen.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// All cells are initialized to empty (space with default colors).
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "Buffer dimensions must be non-zero");
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![Cell::EMPTY; size],
            width,
            height,
        }
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the buffer is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert signed (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x < self.width as usize && y < self.height as usize {
            Some(y * (self.width as usize) + x)
        } else {
            None
        }
    }

    /// Get a reference to a cell at (x, y).
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set a cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Merge a cell on top of the cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn merge(&mut self, x: i32, y: i32, cell: &Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx].merge(cell);
            true
        } else {
            false
        }
    }

    /// Fill the whole buffer with a cell.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Clear the entire buffer (fill with empty cells).
    pub fn clear(&mut self) {
        self.fill(Cell::EMPTY);
    }

    /// Resize the buffer. All cells are reset to empty.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn resize(&mut self, width: u16, height: u16) {
        assert!(width > 0 && height > 0, "Buffer dimensions must be non-zero");
        if width == self.width && height == self.height {
            return;
        }
        self.cells = vec![Cell::EMPTY; (width as usize) * (height as usize)];
        self.width = width;
        self.height = height;
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Collect the characters of one row into a string (handy in tests).
    pub fn row_text(&self, y: u16) -> String {
        self.rows()
            .nth(y as usize)
            .map(|row| row.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;

    #[test]
    fn test_buffer_new() {
        let buffer = Buffer::new(80, 24);
        assert_eq!(buffer.size(), (80, 24));
        assert_eq!(buffer.len(), 80 * 24);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_buffer_zero_width() {
        Buffer::new(0, 24);
    }

    #[test]
    fn test_buffer_get_set() {
        let mut buffer = Buffer::new(80, 24);
        assert!(buffer.set(5, 10, Cell::new('X')));
        assert_eq!(buffer.get(5, 10).map(|c| c.ch), Some('X'));
    }

    #[test]
    fn test_buffer_bounds() {
        let mut buffer = Buffer::new(80, 24);
        assert!(buffer.get(79, 23).is_some());
        assert!(buffer.get(80, 23).is_none());
        assert!(buffer.get(79, 24).is_none());
        assert!(buffer.get(-1, 0).is_none());
        assert!(!buffer.set(0, -3, Cell::new('X')));
    }

    #[test]
    fn test_buffer_index() {
        let buffer = Buffer::new(80, 24);
        assert_eq!(buffer.index_of(5, 10), Some(10 * 80 + 5));
        assert_eq!(buffer.index_of(-5, 10), None);
    }

    #[test]
    fn test_buffer_merge() {
        let mut buffer = Buffer::new(4, 1);
        buffer.fill(Cell::new('.').with_bg(Color::Blue));
        assert!(buffer.merge(1, 0, &Cell::new('@')));
        let cell = buffer.get(1, 0).copied().unwrap_or_default();
        assert_eq!(cell.ch, '@');
        assert_eq!(cell.bg.color, Color::Blue);
        assert!(!buffer.merge(4, 0, &Cell::new('@')));
    }

    #[test]
    fn test_buffer_clear() {
        let mut buffer = Buffer::new(80, 24);
        buffer.set(5, 5, Cell::new('X'));
        buffer.clear();
        assert_eq!(buffer.get(5, 5), Some(&Cell::EMPTY));
    }

    #[test]
    fn test_buffer_resize() {
        let mut buffer = Buffer::new(80, 24);
        buffer.resize(100, 40);
        assert_eq!(buffer.size(), (100, 40));
        assert_eq!(buffer.len(), 4000);
        assert!(buffer.get(99, 39).is_some());
        assert!(buffer.get(100, 39).is_none());
    }

    #[test]
    fn test_buffer_row_text() {
        let mut buffer = Buffer::new(3, 2);
        buffer.set(0, 1, Cell::new('a'));
        buffer.set(2, 1, Cell::new('c'));
        assert_eq!(buffer.row_text(1), "a c");
        assert_eq!(buffer.row_text(5), "");
    }
}
