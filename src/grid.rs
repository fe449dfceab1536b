use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A position on the grid. `x` grows east, `y` grows south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The adjacent position one step in `direction` (may be out of bounds)
    pub fn step(&self, direction: Direction) -> Position {
        match direction {
            Direction::North => Position::new(self.x, self.y - 1),
            Direction::East => Position::new(self.x + 1, self.y),
            Direction::South => Position::new(self.x, self.y + 1),
            Direction::West => Position::new(self.x - 1, self.y),
        }
    }

    /// Manhattan distance
    pub fn manhattan(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn is_origin(&self) -> bool {
        *self == Position::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Parses `x,y`
impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected x,y but got '{}'", s))?;
        let x = x.trim().parse::<i32>().map_err(|e| format!("bad x in '{}': {}", s, e))?;
        let y = y.trim().parse::<i32>().map_err(|e| format!("bad y in '{}': {}", s, e))?;
        Ok(Position::new(x, y))
    }
}

/// Facing direction. Clockwise order is north, east, south, west.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Neighbor scan order used by inference, heuristics and search
    pub const ALL: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];

    pub fn turn_right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    pub fn turn_left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "north" => Ok(Direction::North),
            "east" => Ok(Direction::East),
            "south" => Ok(Direction::South),
            "west" => Ok(Direction::West),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Belief about whether a cell can be entered.
///
/// Inference only ever produces `Unknown` and `Safe`; `Unsafe` is accepted
/// from loaded snapshots and treated as a known hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Safety {
    #[default]
    Unknown,
    Safe,
    Unsafe,
}

/// One square of the cave: ground truth plus the agent's beliefs about it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub has_wumpus: bool,
    pub has_pit: bool,
    pub has_gold: bool,
    pub visited: bool,
    pub safe: Safety,
    pub possible_wumpus: bool,
    pub possible_pit: bool,
}

impl Cell {
    pub fn is_hazard(&self) -> bool {
        self.has_wumpus || self.has_pit
    }

    /// Record that this cell cannot hold a hazard
    pub fn mark_safe(&mut self) {
        self.safe = Safety::Safe;
        self.possible_wumpus = false;
        self.possible_pit = false;
    }
}

/// Largest side length a grid is built with
pub const MAX_GRID_SIZE: i32 = 64;

/// Square grid of cells stored row-major, addressed by `x + y * size`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub size: i32,
    pub cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell empty and unexplored. `size` is clamped to `0..=MAX_GRID_SIZE`.
    pub fn new(size: i32) -> Self {
        let size = size.clamp(0, MAX_GRID_SIZE);
        let side = size as usize;
        Grid {
            size,
            cells: vec![Cell::default(); side * side],
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.size && pos.y >= 0 && pos.y < self.size
    }

    /// Convert a position to its cell index
    pub fn get_id(&self, pos: Position) -> usize {
        (pos.x + pos.y * self.size) as usize
    }

    /// Convert a cell index back to its position
    pub fn get_coords(&self, id: usize) -> Position {
        let id = id as i32;
        Position::new(id % self.size, id / self.size)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells.get(self.get_id(pos))
    }

    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        let id = self.get_id(pos);
        self.cells.get_mut(id)
    }

    /// All positions in row-major order (y, then x)
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |id| self.get_coords(id))
    }

    /// In-bounds orthogonal neighbors, in north/east/south/west order
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = (Direction, Position)> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |dir| (dir, pos.step(dir)))
            .filter(move |(_, next)| self.in_bounds(*next))
    }

    pub fn count(&self, pred: impl Fn(&Cell) -> bool) -> usize {
        self.cells.iter().filter(|c| pred(c)).count()
    }
}
