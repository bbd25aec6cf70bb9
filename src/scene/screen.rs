//! The screen: the cell canvas plus the scene drawn on it.

use super::commands::{Command, Commands};
use super::entity::{Drawable, EntityId};
use super::level::Level;
use super::list::EntityList;
use crate::actor::Event;
use crate::buffer::{Buffer, Cell};
use crate::terminal::Backend;
use log::{debug, warn};
use std::io;
use std::time::Duration;

/// The drawing surface and everything on it.
///
/// A `Screen` owns the cell [`Buffer`], the active [`Level`] (if any) and
/// a list of screen-level entities that are drawn on top of the level
/// without the camera offset. Entities render through
/// [`render_cell`](Self::render_cell) during their `draw`.
pub struct Screen {
    buffer: Buffer,
    level: Option<Level>,
    entities: EntityList,
    /// Level handed to `set_level` during a draw pass.
    pending_level: Option<Level>,
    in_pass: bool,
    /// Screen-level entities are drawing; no camera offset.
    screen_pass: bool,
    commands: Commands,
    /// Seconds since the previous frame.
    delta: f64,
    frame_count: u64,
}

impl Screen {
    /// Create a 1x1 screen. The game resizes it to the terminal on start.
    pub fn new() -> Self {
        Self::with_size(1, 1)
    }

    /// Create a screen of the given size. Zero dimensions become 1.
    pub fn with_size(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width.max(1), height.max(1)),
            level: None,
            entities: EntityList::default(),
            pending_level: None,
            in_pass: false,
            screen_pass: false,
            commands: Commands::default(),
            delta: 0.0,
            frame_count: 0,
        }
    }

    /// Size in `(columns, rows)`.
    pub const fn size(&self) -> (u16, u16) {
        self.buffer.size()
    }

    /// The cell buffer as of the last render.
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Resize the canvas. Zero dimensions are clamped to 1.
    pub fn resize(&mut self, width: u16, height: u16) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) != self.size() {
            debug!("screen resized to {width}x{height}");
        }
        self.buffer.resize(width, height);
    }

    /// The active level.
    pub const fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    /// The active level, mutably.
    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.level.as_mut()
    }

    /// Replace the active level.
    ///
    /// Called from inside a draw pass, the swap happens when the pass ends.
    pub fn set_level(&mut self, level: Level) {
        if self.in_pass {
            self.pending_level = Some(level);
        } else {
            self.install_level(level);
        }
    }

    /// Add a screen-level entity, drawn after the level without the
    /// camera offset.
    pub fn add_entity(&mut self, entity: Box<dyn Drawable>) -> EntityId {
        self.entities.add(entity)
    }

    /// Remove a screen-level entity.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Box<dyn Drawable>> {
        self.entities.remove(id)
    }

    /// Number of screen-level entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// The active level's camera offset, `(0, 0)` without a level.
    pub fn offset(&self) -> (i32, i32) {
        self.level.as_ref().map_or((0, 0), Level::offset)
    }

    /// Move the active level's camera. Takes effect for every cell
    /// rendered afterwards, including later entities in the same pass.
    pub fn set_offset(&mut self, x: i32, y: i32) {
        match self.level.as_mut() {
            Some(level) => level.set_offset(x, y),
            None => debug!("set_offset({x}, {y}) ignored: no active level"),
        }
    }

    /// Seconds elapsed between the previous frame and this one.
    pub const fn time_delta(&self) -> f64 {
        self.delta
    }

    /// Record the time elapsed since the previous frame.
    pub fn set_time_delta(&mut self, delta: Duration) {
        self.delta = delta.as_secs_f64();
    }

    /// Frames per second derived from the last time delta.
    pub fn fps(&self) -> f64 {
        if self.delta > 0.0 {
            1.0 / self.delta
        } else {
            0.0
        }
    }

    /// Number of frames drawn.
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Handle for queuing scene changes from code that has no access to
    /// the screen, such as `collide`.
    pub fn commands(&self) -> Commands {
        self.commands.clone()
    }

    /// Merge a cell at level coordinates `(x, y)`, shifted by the camera
    /// offset. Cells that land off screen are dropped.
    ///
    /// While screen-level entities draw, coordinates are screen coordinates
    /// and no offset is applied.
    pub fn render_cell(&mut self, x: i32, y: i32, cell: &Cell) {
        let (dx, dy) = if self.screen_pass { (0, 0) } else { self.offset() };
        self.buffer
            .merge(x.saturating_add(dx), y.saturating_add(dy), cell);
    }

    /// Merge a cell at screen coordinates, ignoring the camera offset.
    pub fn render_cell_absolute(&mut self, x: i32, y: i32, cell: &Cell) {
        self.buffer.merge(x, y, cell);
    }

    /// Tick the level (entities then collisions), then the screen-level
    /// entities.
    pub fn tick(&mut self, event: &Event) {
        if let Some(level) = self.level.as_mut() {
            level.tick(event);
        }
        self.entities.tick(event);
    }

    /// Build the next frame in the buffer.
    ///
    /// Clears the canvas, paints the level background, draws level entities
    /// and then screen-level entities in insertion order. Level swaps and
    /// queued [`Commands`] are applied afterwards.
    pub fn render(&mut self) {
        self.buffer.clear();
        if let Some(level) = &self.level {
            let mut base = Cell::EMPTY;
            base.merge(level.background());
            self.buffer.fill(base);
        }

        self.in_pass = true;

        if let Some(mut slots) = self.level.as_mut().map(Level::detach) {
            for slot in &mut slots {
                slot.entity.draw(self);
            }
            if let Some(level) = self.level.as_mut() {
                level.reattach(slots);
            }
        }

        self.screen_pass = true;
        let mut slots = self.entities.detach();
        for slot in &mut slots {
            slot.entity.draw(self);
        }
        self.entities.reattach(slots);
        self.screen_pass = false;

        self.in_pass = false;

        if let Some(level) = self.pending_level.take() {
            self.install_level(level);
        }
        self.apply_commands();
    }

    /// Render the frame and commit it to `backend` with a single paint.
    pub fn draw<B: Backend>(&mut self, backend: &mut B) -> io::Result<()> {
        self.render();
        self.frame_count += 1;
        backend.paint(&self.buffer)
    }

    fn install_level(&mut self, level: Level) {
        debug!("level replaced ({} entities)", level.len());
        self.level = Some(level);
    }

    fn apply_commands(&mut self) {
        while let Some(command) = self.commands.pop() {
            match command {
                Command::SetLevel(level) => self.install_level(*level),
                Command::AddEntity(entity) => {
                    self.entities.add(entity);
                }
                Command::AddLevelEntity(entity) => match self.level.as_mut() {
                    Some(level) => {
                        level.add_entity(entity);
                    }
                    None => warn!("dropping level entity: no active level"),
                },
                Command::SetOffset(x, y) => self.set_offset(x, y),
            }
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("size", &self.size())
            .field("level", &self.level)
            .field("entities", &self.entities.len())
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;
    use crate::terminal::HeadlessBackend;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Draws one character at a level position.
    struct Dot {
        at: (i32, i32),
        ch: char,
    }

    impl Drawable for Dot {
        fn tick(&mut self, _event: &Event) {}
        fn draw(&mut self, screen: &mut Screen) {
            screen.render_cell(self.at.0, self.at.1, &Cell::new(self.ch));
        }
    }

    /// Centers the camera on itself while drawing.
    struct Camera {
        at: (i32, i32),
    }

    impl Drawable for Camera {
        fn tick(&mut self, _event: &Event) {}
        fn draw(&mut self, screen: &mut Screen) {
            let (w, h) = screen.size();
            screen.set_offset(i32::from(w) / 2 - self.at.0, i32::from(h) / 2 - self.at.1);
            screen.render_cell(self.at.0, self.at.1, &Cell::new('@'));
        }
    }

    /// Moves right on every tick and draws where it is.
    struct Walker {
        x: i32,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Drawable for Walker {
        fn tick(&mut self, _event: &Event) {
            self.x += 1;
            self.log.borrow_mut().push(format!("tick {}", self.x));
        }
        fn draw(&mut self, screen: &mut Screen) {
            self.log.borrow_mut().push(format!("draw {}", self.x));
            screen.render_cell(self.x, 0, &Cell::new('w'));
        }
    }

    /// Swaps the level from inside its own draw.
    struct Swapper;

    impl Drawable for Swapper {
        fn tick(&mut self, _event: &Event) {}
        fn draw(&mut self, screen: &mut Screen) {
            screen.set_level(Level::with_color(Color::Red));
            screen.render_cell(0, 0, &Cell::new('s'));
        }
    }

    /// Adds a screen entity while drawing.
    struct Spawner {
        spawned: bool,
    }

    impl Drawable for Spawner {
        fn tick(&mut self, _event: &Event) {}
        fn draw(&mut self, screen: &mut Screen) {
            if !self.spawned {
                self.spawned = true;
                screen.add_entity(Box::new(Dot { at: (1, 0), ch: 'n' }));
            }
        }
    }

    #[test]
    fn test_new_screen() {
        let screen = Screen::new();
        assert_eq!(screen.size(), (1, 1));
        assert_eq!(screen.frame_count(), 0);
        assert!(screen.level().is_none());
        assert_eq!(screen.offset(), (0, 0));
    }

    #[test]
    fn test_resize_clamps_zero() {
        let mut screen = Screen::with_size(10, 10);
        screen.resize(0, 5);
        assert_eq!(screen.size(), (1, 5));
        screen.resize(100, 40);
        assert_eq!(screen.size(), (100, 40));
        assert_eq!(screen.buffer().len(), 4000);
    }

    #[test]
    fn test_background_fill() {
        let mut screen = Screen::with_size(3, 2);
        screen.set_level(Level::with_color(Color::Blue));
        screen.render();
        assert!(screen.buffer().cells().iter().all(|c| c.bg.color == Color::Blue && c.ch == ' '));
    }

    #[test]
    fn test_later_entities_draw_on_top() {
        let mut screen = Screen::with_size(4, 1);
        let mut level = Level::default();
        level.add_entity(Box::new(Dot { at: (0, 0), ch: 'a' }));
        level.add_entity(Box::new(Dot { at: (0, 0), ch: 'b' }));
        screen.set_level(level);
        screen.add_entity(Box::new(Dot { at: (1, 0), ch: 'c' }));

        screen.render();

        assert_eq!(screen.buffer().row_text(0), "bc  ");
    }

    #[test]
    fn test_camera_offset_applies_to_later_entities() {
        let mut screen = Screen::with_size(80, 24);
        let mut level = Level::default();
        level.add_entity(Box::new(Camera { at: (10, 5) }));
        level.add_entity(Box::new(Dot { at: (0, 0), ch: 'x' }));
        screen.set_level(level);

        screen.render();

        assert_eq!(screen.offset(), (30, 7));
        assert_eq!(screen.buffer().get(40, 12).map(|c| c.ch), Some('@'));
        assert_eq!(screen.buffer().get(30, 7).map(|c| c.ch), Some('x'));
        assert_eq!(screen.buffer().get(0, 0).map(|c| c.ch), Some(' '));
    }

    #[test]
    fn test_screen_entities_use_screen_coordinates() {
        let mut screen = Screen::with_size(5, 1);
        let mut level = Level::default();
        level.set_offset(3, 0);
        level.add_entity(Box::new(Dot { at: (0, 0), ch: 'l' }));
        screen.set_level(level);
        screen.add_entity(Box::new(Dot { at: (0, 0), ch: 's' }));

        screen.render();

        assert_eq!(screen.buffer().row_text(0), "s  l ");
    }

    #[test]
    fn test_render_cell_absolute_ignores_offset() {
        let mut screen = Screen::with_size(5, 1);
        let mut level = Level::default();
        level.set_offset(2, 0);
        screen.set_level(level);
        screen.render_cell(0, 0, &Cell::new('o'));
        screen.render_cell_absolute(0, 0, &Cell::new('a'));
        assert_eq!(screen.buffer().row_text(0), "a o  ");
    }

    #[test]
    fn test_out_of_bounds_cells_dropped() {
        let mut screen = Screen::with_size(2, 2);
        screen.render_cell(-1, 0, &Cell::new('x'));
        screen.render_cell(2, 0, &Cell::new('x'));
        screen.render_cell(0, 5, &Cell::new('x'));
        assert!(screen.buffer().cells().iter().all(|c| c.ch == ' '));
    }

    #[test]
    fn test_tick_then_draw_sees_tick() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut screen = Screen::with_size(5, 1);
        let mut level = Level::default();
        level.add_entity(Box::new(Walker { x: 0, log: log.clone() }));
        screen.set_level(level);
        let mut backend = HeadlessBackend::new(5, 1);

        screen.tick(&Event::none());
        screen.draw(&mut backend).expect("draw");

        assert_eq!(*log.borrow(), vec!["tick 1", "draw 1"]);
        assert_eq!(backend.last_frame().map(|b| b.row_text(0)), Some(" w   ".to_string()));
        assert_eq!(backend.paint_count(), 1);
        assert_eq!(screen.frame_count(), 1);
    }

    #[test]
    fn test_set_level_during_draw_is_deferred() {
        let mut screen = Screen::with_size(2, 1);
        let mut level = Level::with_color(Color::Green);
        level.add_entity(Box::new(Swapper));
        screen.set_level(level);

        screen.render();

        // The frame was drawn entirely against the old level
        assert_eq!(screen.buffer().get(1, 0).map(|c| c.bg.color), Some(Color::Green));
        assert_eq!(screen.buffer().get(0, 0).map(|c| c.ch), Some('s'));
        // The new level is active afterwards
        let active = screen.level().map(|l| l.background().bg.color);
        assert_eq!(active, Some(Color::Red));
        assert!(screen.level().is_some_and(Level::is_empty));
    }

    #[test]
    fn test_entities_added_during_draw_follow_existing() {
        let mut screen = Screen::with_size(3, 1);
        screen.add_entity(Box::new(Spawner { spawned: false }));
        screen.add_entity(Box::new(Dot { at: (0, 0), ch: 'd' }));

        screen.render();
        assert_eq!(screen.entity_count(), 3);
        assert_eq!(screen.buffer().row_text(0), "d  ");

        screen.render();
        assert_eq!(screen.buffer().row_text(0), "dn ");
    }

    #[test]
    fn test_commands_apply_after_render() {
        let mut screen = Screen::with_size(3, 1);
        screen.set_level(Level::default());
        let commands = screen.commands();
        commands.set_offset(1, 0);
        commands.add_level_entity(Box::new(Dot { at: (0, 0), ch: 'q' }));

        screen.render();
        assert_eq!(screen.buffer().row_text(0), "   ");
        assert_eq!(screen.offset(), (1, 0));

        screen.render();
        assert_eq!(screen.buffer().row_text(0), " q ");
        assert!(commands.is_empty());
    }

    #[test]
    fn test_fps_from_delta() {
        let mut screen = Screen::new();
        assert!(screen.fps().abs() < f64::EPSILON);
        screen.set_time_delta(Duration::from_millis(20));
        assert!((screen.fps() - 50.0).abs() < 1e-9);
        assert!((screen.time_delta() - 0.02).abs() < 1e-12);
    }
}
