use std::fmt;

use serde::Serialize;

/// Stone color. White moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Single-character notation used by the board dump.
    pub fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
        })
    }
}

/// A board coordinate. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// Occupancy of a single cell. An empty cell carries no color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Color),
}

impl Cell {
    pub fn is_placed(self) -> bool {
        matches!(self, Cell::Occupied(_))
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(color) => Some(color),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '_',
            Cell::Occupied(color) => color.symbol(),
        }
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "color", rename_all = "lowercase")]
pub enum Outcome {
    Winner(Color),
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(color) => write!(f, "{color} win"),
            Outcome::Draw => f.write_str("draw"),
        }
    }
}

/// Turn controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Phase {
    AwaitingMove(Color),
    Finished(Outcome),
}

impl Phase {
    pub fn active_color(self) -> Option<Color> {
        match self {
            Phase::AwaitingMove(color) => Some(color),
            Phase::Finished(_) => None,
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(self, Phase::Finished(_))
    }
}

/// Public game state handed to hosts for display and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// Eight rows of `_`, `W`, `B`.
    pub rows: Vec<String>,
    pub white_count: u8,
    pub black_count: u8,
    pub phase: Phase,
    pub legal_moves: Vec<Position>,
}

/// Everything that happened during one accepted commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub color: Color,
    pub position: Position,
    /// Flipped positions, in direction order, each run ordered outward.
    pub flipped: Vec<Position>,
    /// Colors whose turn was skipped for lack of legal moves.
    pub passed: Vec<Color>,
    pub phase: Phase,
}
