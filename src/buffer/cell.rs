//! Cell: The atomic unit of terminal display.
//!
//! A cell is a character plus a foreground and a background attribute.
//! Attributes pair a [`Color`] with style [`Modifiers`].
//!
//! Cells compose by merging: when an entity renders a cell on top of the
//! buffer, a `'\0'` character or a [`Attr::DEFAULT`] attribute leaves the
//! value already in the buffer untouched. This lets a text label keep the
//! level background behind it.

use bitflags::bitflags;

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// A terminal color.
///
/// `Default` means "whatever the terminal uses", and is also the
/// transparent value when cells are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Terminal default color.
    #[default]
    Default,
    /// ANSI black.
    Black,
    /// ANSI red.
    Red,
    /// ANSI green.
    Green,
    /// ANSI yellow.
    Yellow,
    /// ANSI blue.
    Blue,
    /// ANSI magenta.
    Magenta,
    /// ANSI cyan.
    Cyan,
    /// ANSI white.
    White,
    /// 24-bit color.
    Rgb(Rgb),
}

impl Color {
    /// Index of a named ANSI color (0-7), `None` for default and RGB.
    pub const fn ansi_index(self) -> Option<u8> {
        match self {
            Self::Black => Some(0),
            Self::Red => Some(1),
            Self::Green => Some(2),
            Self::Yellow => Some(3),
            Self::Blue => Some(4),
            Self::Magenta => Some(5),
            Self::Cyan => Some(6),
            Self::White => Some(7),
            Self::Default | Self::Rgb(_) => None,
        }
    }
}

impl From<Rgb> for Color {
    #[inline]
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use termstage::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::UNDERLINE;
    /// assert!(style.contains(Modifiers::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Blinking text
        const BLINK = 0b0001_0000;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0010_0000;
        /// Hidden/invisible text
        const HIDDEN = 0b0100_0000;
        /// Strikethrough text
        const STRIKETHROUGH = 0b1000_0000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// A cell attribute: a color combined with style modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attr {
    /// The color.
    pub color: Color,
    /// Style modifiers applied with this attribute.
    pub modifiers: Modifiers,
}

impl Attr {
    /// Default color, no modifiers. Transparent when merging.
    pub const DEFAULT: Self = Self::new(Color::Default);

    /// Create an attribute with the given color and no modifiers.
    #[inline]
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            modifiers: Modifiers::empty(),
        }
    }

    /// Add modifiers (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = self.modifiers.union(modifiers);
        self
    }

    /// Check whether this is the transparent default attribute.
    #[inline]
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl From<Color> for Attr {
    #[inline]
    fn from(color: Color) -> Self {
        Self::new(color)
    }
}

/// A single terminal cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Foreground attribute.
    pub fg: Attr,
    /// Background attribute.
    pub bg: Attr,
    /// The character to draw. `'\0'` is transparent when merging.
    pub ch: char,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// An empty cell (space character with default colors).
    pub const EMPTY: Self = Self {
        fg: Attr::DEFAULT,
        bg: Attr::DEFAULT,
        ch: ' ',
    };

    /// A fully transparent cell: merging it changes nothing.
    pub const TRANSPARENT: Self = Self {
        fg: Attr::DEFAULT,
        bg: Attr::DEFAULT,
        ch: '\0',
    };

    /// Create a cell with the given character and default attributes.
    #[inline]
    pub const fn new(ch: char) -> Self {
        Self {
            fg: Attr::DEFAULT,
            bg: Attr::DEFAULT,
            ch,
        }
    }

    /// Create a transparent-character cell with only a background color.
    #[inline]
    pub const fn background(color: Color) -> Self {
        Self {
            fg: Attr::DEFAULT,
            bg: Attr::new(color),
            ch: '\0',
        }
    }

    /// Set the foreground attribute (builder pattern).
    #[inline]
    #[must_use]
    pub fn with_fg(mut self, fg: impl Into<Attr>) -> Self {
        self.fg = fg.into();
        self
    }

    /// Set the background attribute (builder pattern).
    #[inline]
    #[must_use]
    pub fn with_bg(mut self, bg: impl Into<Attr>) -> Self {
        self.bg = bg.into();
        self
    }

    /// The modifiers to render this cell with (foreground and background
    /// modifiers combined).
    #[inline]
    pub const fn modifiers(&self) -> Modifiers {
        self.fg.modifiers.union(self.bg.modifiers)
    }

    /// Display width in columns (0 for control characters, 2 for wide CJK).
    #[inline]
    pub fn display_width(&self) -> u8 {
        u8::try_from(unicode_width::UnicodeWidthChar::width(self.ch).unwrap_or(0)).unwrap_or(1)
    }

    /// Merge `other` on top of this cell.
    ///
    /// Non-transparent fields of `other` overwrite the fields of `self`.
    #[inline]
    pub fn merge(&mut self, other: &Self) {
        if other.ch != '\0' {
            self.ch = other.ch;
        }
        if !other.fg.is_default() {
            self.fg = other.fg;
        }
        if !other.bg.is_default() {
            self.bg = other.bg;
        }
    }

    /// Reset the cell to empty (space with default colors).
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("ch", &self.ch)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_tuple() {
        let rgb: Rgb = (255, 128, 0).into();
        assert_eq!(rgb.r, 255);
        assert_eq!(rgb.g, 128);
        assert_eq!(rgb.b, 0);
    }

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_u32(0xFF8000), Rgb::new(255, 128, 0));
    }

    #[test]
    fn test_color_ansi_index() {
        assert_eq!(Color::Black.ansi_index(), Some(0));
        assert_eq!(Color::White.ansi_index(), Some(7));
        assert_eq!(Color::Default.ansi_index(), None);
        assert_eq!(Color::Rgb(Rgb::WHITE).ansi_index(), None);
    }

    #[test]
    fn test_attr_with_modifiers() {
        let attr = Attr::new(Color::Red).with(Modifiers::BOLD).with(Modifiers::UNDERLINE);
        assert_eq!(attr.color, Color::Red);
        assert!(attr.modifiers.contains(Modifiers::BOLD | Modifiers::UNDERLINE));
        assert!(!attr.is_default());
        assert!(Attr::DEFAULT.is_default());
    }

    #[test]
    fn test_cell_builder_pattern() {
        let cell = Cell::new('X')
            .with_fg(Attr::new(Color::Red).with(Modifiers::BOLD))
            .with_bg(Color::Blue);

        assert_eq!(cell.ch, 'X');
        assert_eq!(cell.fg.color, Color::Red);
        assert_eq!(cell.bg.color, Color::Blue);
        assert!(cell.modifiers().contains(Modifiers::BOLD));
    }

    #[test]
    fn test_cell_merge_keeps_transparent_fields() {
        let mut base = Cell::new('.').with_fg(Color::White).with_bg(Color::Blue);
        base.merge(&Cell::new('@').with_fg(Color::Red));

        assert_eq!(base.ch, '@');
        assert_eq!(base.fg.color, Color::Red);
        assert_eq!(base.bg.color, Color::Blue);

        let before = base;
        base.merge(&Cell::TRANSPARENT);
        assert_eq!(base, before);
    }

    #[test]
    fn test_cell_merge_background_only() {
        let mut base = Cell::new('a');
        base.merge(&Cell::background(Color::Green));
        assert_eq!(base.ch, 'a');
        assert_eq!(base.bg.color, Color::Green);
    }

    #[test]
    fn test_cell_display_width() {
        assert_eq!(Cell::new('A').display_width(), 1);
        assert_eq!(Cell::new('日').display_width(), 2);
    }

    #[test]
    fn test_cell_reset() {
        let mut cell = Cell::new('X').with_fg(Color::Red);
        cell.reset();
        assert_eq!(cell, Cell::EMPTY);
    }
}
