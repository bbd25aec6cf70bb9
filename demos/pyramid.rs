//! Pyramid: explore randomly generated mazes.
//!
//! Move the red block with the arrow keys. White blocks are walls, the blue
//! block leads to a new, slightly bigger maze. Ctrl+C quits.
//!
//! Run with: `cargo run --example pyramid`

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};
use termstage::{
    Color, Commands, Drawable, DynamicPhysical, Event, Game, Key, Level, Physical, Rectangle, Screen, Text,
};

// ---------------------------------------------------------------------------
// Maze generation
// ---------------------------------------------------------------------------

/// Simple LCG, Numerical Recipes constants.
struct Lcg {
    state: u32,
}

impl Lcg {
    fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(1, |d| d.subsec_nanos());
        Self::new(nanos)
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Random value in `[0, max)`.
    fn below(&mut self, max: usize) -> usize {
        self.next_u32() as usize % max.max(1)
    }

    /// Random coordinate in `[0, max)`.
    fn coordinate(&mut self, max: i32) -> i32 {
        let max = usize::try_from(max).unwrap_or(1);
        i32::try_from(self.below(max)).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Wall,
    Path,
    Start,
    Goal,
}

/// A wall next to a carved cell, remembered with the cell it was found from.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    at: (i32, i32),
    from: (i32, i32),
}

impl Frontier {
    /// The cell on the far side of the wall.
    const fn opposite(&self) -> (i32, i32) {
        (2 * self.at.0 - self.from.0, 2 * self.at.1 - self.from.1)
    }
}

struct Maze {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Maze {
    fn filled(width: i32, height: i32) -> Self {
        let len = usize::try_from(width * height).unwrap_or(0);
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; len],
        }
    }

    fn index(&self, (x, y): (i32, i32)) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        usize::try_from(y * self.width + x).ok()
    }

    fn get(&self, at: (i32, i32)) -> Option<Tile> {
        self.index(at).map(|i| self.tiles[i])
    }

    fn set(&mut self, at: (i32, i32), tile: Tile) {
        if let Some(i) = self.index(at) {
            self.tiles[i] = tile;
        }
    }

    fn walls_around(&self, (x, y): (i32, i32)) -> Vec<Frontier> {
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .map(|(dx, dy)| (x + dx, y + dy))
            .filter(|&at| self.get(at) == Some(Tile::Wall))
            .map(|at| Frontier { at, from: (x, y) })
            .collect()
    }

    /// Randomized Prim's algorithm, surrounded by a one-cell wall border.
    fn generate(width: i32, height: i32, rng: &mut Lcg) -> Self {
        let mut maze = Self::filled(width, height);
        let start = (rng.coordinate(width), rng.coordinate(height));
        maze.set(start, Tile::Start);

        let mut last = None;
        let mut frontier = maze.walls_around(start);
        while !frontier.is_empty() {
            let wall = frontier.swap_remove(rng.below(frontier.len()));
            let opposite = wall.opposite();
            if maze.get(opposite) == Some(Tile::Wall) {
                maze.set(wall.at, Tile::Path);
                maze.set(opposite, Tile::Path);
                frontier.extend(maze.walls_around(opposite));
                last = Some(opposite);
            }
        }
        if let Some(goal) = last {
            maze.set(goal, Tile::Goal);
        }

        let mut bordered = Self::filled(width + 2, height + 2);
        for y in 0..height {
            for x in 0..width {
                if let Some(tile) = maze.get((x, y)) {
                    bordered.set((x + 1, y + 1), tile);
                }
            }
        }
        bordered
    }

    fn tiles(&self) -> impl Iterator<Item = ((i32, i32), Tile)> + '_ {
        self.tiles.iter().enumerate().map(|(i, &tile)| {
            let i = i32::try_from(i).unwrap_or(0);
            ((i % self.width, i / self.width), tile)
        })
    }
}

// ---------------------------------------------------------------------------
// Game entities
// ---------------------------------------------------------------------------

/// Progress shared by the player and the scoreboard.
struct World {
    rng: Lcg,
    width: i32,
    height: i32,
    score: u32,
    commands: Commands,
}

type SharedWorld = Rc<RefCell<World>>;

/// The player.
struct Block {
    rect: Rectangle,
    prev: (i32, i32),
    world: SharedWorld,
    finished: bool,
}

impl Drawable for Block {
    fn tick(&mut self, event: &Event) {
        if !event.is_key() {
            return;
        }
        let (x, y) = self.rect.position();
        self.prev = (x, y);
        match event.key {
            Some(Key::ArrowRight) => self.rect.set_position(x + 1, y),
            Some(Key::ArrowLeft) => self.rect.set_position(x - 1, y),
            Some(Key::ArrowUp) => self.rect.set_position(x, y - 1),
            Some(Key::ArrowDown) => self.rect.set_position(x, y + 1),
            _ => {}
        }
    }

    fn draw(&mut self, screen: &mut Screen) {
        // Keep the player in the middle of the screen
        let (w, h) = screen.size();
        let (x, y) = self.rect.position();
        screen.set_offset(i32::from(w) / 2 - x, i32::from(h) / 2 - y);
        self.rect.draw(screen);
    }

    fn as_physical(&self) -> Option<&dyn Physical> {
        Some(self)
    }

    fn as_dynamic_physical(&mut self) -> Option<&mut dyn DynamicPhysical> {
        Some(self)
    }
}

impl Physical for Block {
    fn position(&self) -> (i32, i32) {
        self.rect.position()
    }

    fn size(&self) -> (i32, i32) {
        self.rect.size()
    }
}

impl DynamicPhysical for Block {
    fn collide(&mut self, other: &dyn Physical) {
        let Some(rect) = other.as_any().and_then(|any| any.downcast_ref::<Rectangle>()) else {
            return;
        };
        match rect.color() {
            Color::White => self.rect.set_position(self.prev.0, self.prev.1),
            Color::Blue if !self.finished => {
                self.finished = true;
                {
                    let mut world = self.world.borrow_mut();
                    world.width += 1;
                    world.height += 1;
                    world.score += 1;
                }
                let level = build_level(&self.world);
                self.world.borrow().commands.set_level(level);
            }
            _ => {}
        }
    }
}

/// "Levels explored" counter, pinned to the top-left corner.
struct Scoreboard {
    text: Text,
    world: SharedWorld,
}

impl Drawable for Scoreboard {
    fn tick(&mut self, _event: &Event) {}

    fn draw(&mut self, screen: &mut Screen) {
        let score = self.world.borrow().score;
        self.text.set_text(format!("Levels explored: {score}"));
        self.text.draw(screen);
    }
}

fn build_level(world: &SharedWorld) -> Level {
    let maze = {
        let mut world = world.borrow_mut();
        let (width, height) = (world.width, world.height);
        Maze::generate(width, height, &mut world.rng)
    };

    let mut level = Level::default();
    for ((x, y), tile) in maze.tiles() {
        match tile {
            Tile::Wall => {
                level.add_entity(Box::new(Rectangle::new(x, y, 1, 1, Color::White)));
            }
            Tile::Goal => {
                level.add_entity(Box::new(Rectangle::new(x, y, 1, 1, Color::Blue)));
            }
            Tile::Start => {
                level.add_entity(Box::new(Block {
                    rect: Rectangle::new(x, y, 1, 1, Color::Red),
                    prev: (x, y),
                    world: world.clone(),
                    finished: false,
                }));
            }
            Tile::Path => {}
        }
    }
    level
}

fn main() -> termstage::Result<()> {
    let mut game = Game::new();

    let world = Rc::new(RefCell::new(World {
        rng: Lcg::from_clock(),
        width: 6,
        height: 2,
        score: 0,
        commands: game.screen().commands(),
    }));

    game.add_entity(Box::new(Text::new(0, 0, "Pyramid!", Color::Blue, Color::Black)));
    game.add_entity(Box::new(Scoreboard {
        text: Text::new(0, 1, "", Color::Blue, Color::Black),
        world: world.clone(),
    }));
    game.set_level(build_level(&world));

    game.start()
}
