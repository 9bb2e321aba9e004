use thiserror::Error;

use crate::types::{Cell, Color, Outcome, Position};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
/// Compass directions as `(dx, dy)`, scanned in this order.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Stones flipped in one direction by a placement, ordered outward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipRun {
    pub direction: (i32, i32),
    pub cells: Vec<Position>,
}

/// Full effect of one successful placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub color: Color,
    pub origin: Position,
    pub runs: Vec<FlipRun>,
}

impl Capture {
    pub fn flipped(&self) -> impl Iterator<Item = Position> + '_ {
        self.runs.iter().flat_map(|run| run.cells.iter().copied())
    }

    pub fn flip_count(&self) -> usize {
        self.runs.iter().map(|run| run.cells.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBoardError {
    #[error("expected 8 rows, got {0}")]
    RowCount(usize),
    #[error("row {row} has {len} cells, expected 8")]
    RowLength { row: usize, len: usize },
    #[error("unexpected character {ch:?} at ({x}, {y})")]
    InvalidCell { x: usize, y: usize, ch: char },
}

/// Reversi board: 64 cells plus per-color stone counters.
///
/// The counters are only written by [`Board::place_capturing`], so they
/// always agree with the cell contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; NUM_SQUARES],
    white_count: u8,
    black_count: u8,
}

impl Board {
    /// Creates the opening position:
    /// black at (3,3) and (4,4), white at (4,3) and (3,4).
    pub fn new() -> Self {
        let mut cells = [Cell::Empty; NUM_SQUARES];
        cells[idx(3, 3)] = Cell::Occupied(Color::Black);
        cells[idx(4, 4)] = Cell::Occupied(Color::Black);
        cells[idx(4, 3)] = Cell::Occupied(Color::White);
        cells[idx(3, 4)] = Cell::Occupied(Color::White);
        Self {
            cells,
            white_count: 2,
            black_count: 2,
        }
    }

    /// Parses eight rows of `_`, `W`, `B` (the [`Board::dump`] notation).
    /// Surrounding whitespace and blank lines are ignored.
    pub fn from_rows(text: &str) -> Result<Self, ParseBoardError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE {
            return Err(ParseBoardError::RowCount(rows.len()));
        }

        let mut cells = [Cell::Empty; NUM_SQUARES];
        let (mut white_count, mut black_count) = (0u8, 0u8);
        for (y, row) in rows.iter().enumerate() {
            let len = row.chars().count();
            if len != BOARD_SIZE {
                return Err(ParseBoardError::RowLength { row: y, len });
            }
            for (x, ch) in row.chars().enumerate() {
                cells[idx(x, y)] = match ch {
                    '_' => Cell::Empty,
                    'W' => {
                        white_count += 1;
                        Cell::Occupied(Color::White)
                    }
                    'B' => {
                        black_count += 1;
                        Cell::Occupied(Color::Black)
                    }
                    _ => return Err(ParseBoardError::InvalidCell { x, y, ch }),
                };
            }
        }

        Ok(Self {
            cells,
            white_count,
            black_count,
        })
    }

    /// Returns the cell at `(x, y)`, or `None` when out of range.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        in_bounds(x, y).then(|| self.cells[idx(x as usize, y as usize)])
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[Cell; NUM_SQUARES] {
        &self.cells
    }

    /// Places a stone and flips captured runs.
    /// Returns false (and changes nothing) when out of range or occupied.
    pub fn place(&mut self, x: i32, y: i32, color: Color) -> bool {
        self.place_capturing(x, y, color).is_some()
    }

    /// Same as [`Board::place`], but reports every flipped stone.
    ///
    /// Placement does not itself require a capture; callers that enforce
    /// legality check [`Board::legal_moves`] first.
    pub fn place_capturing(&mut self, x: i32, y: i32, color: Color) -> Option<Capture> {
        match self.cell_at(x, y) {
            Some(Cell::Empty) => {}
            _ => return None,
        }

        let runs = self.flip_runs(x, y, color);
        self.cells[idx(x as usize, y as usize)] = Cell::Occupied(color);
        *self.counter_mut(color) += 1;

        for run in &runs {
            for pos in &run.cells {
                self.cells[idx(pos.x as usize, pos.y as usize)] = Cell::Occupied(color);
            }
            let flips = run.cells.len() as u8;
            *self.counter_mut(color) += flips;
            *self.counter_mut(color.opponent()) -= flips;
        }

        Some(Capture {
            color,
            origin: Position::new(x as u8, y as u8),
            runs,
        })
    }

    /// Non-empty flip runs `color` would capture by playing at `(x, y)`.
    /// Does not check whether `(x, y)` itself is empty. Out-of-range
    /// coordinates yield no runs.
    pub fn flip_runs(&self, x: i32, y: i32, color: Color) -> Vec<FlipRun> {
        if !in_bounds(x, y) {
            return Vec::new();
        }
        DIRECTIONS
            .iter()
            .filter_map(|&(dx, dy)| {
                let len = self.flip_run_length(x, y, dx, dy, color);
                (len > 0).then(|| FlipRun {
                    direction: (dx, dy),
                    cells: (1..=len as i32)
                        .map(|mag| Position::new((x + dx * mag) as u8, (y + dy * mag) as u8))
                        .collect(),
                })
            })
            .collect()
    }

    /// Unplaced cells where `color` captures at least one stone, row-major.
    pub fn legal_moves(&self, color: Color) -> Vec<Position> {
        let mut moves = Vec::new();
        for y in 0..BOARD_SIZE as i32 {
            for x in 0..BOARD_SIZE as i32 {
                if self.is_legal(x, y, color) {
                    moves.push(Position::new(x as u8, y as u8));
                }
            }
        }
        moves
    }

    pub fn is_legal(&self, x: i32, y: i32, color: Color) -> bool {
        self.cell_at(x, y) == Some(Cell::Empty)
            && DIRECTIONS
                .iter()
                .any(|&(dx, dy)| self.flip_run_length(x, y, dx, dy, color) > 0)
    }

    /// Returns `(white_count, black_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.white_count, self.black_count)
    }

    pub fn placed_count(&self) -> u8 {
        self.white_count + self.black_count
    }

    pub fn empty_count(&self) -> u8 {
        NUM_SQUARES as u8 - self.placed_count()
    }

    /// True once every cell holds a stone.
    pub fn is_finished(&self) -> bool {
        self.placed_count() as usize >= NUM_SQUARES
    }

    pub fn winner(&self) -> Outcome {
        match self.white_count.cmp(&self.black_count) {
            std::cmp::Ordering::Greater => Outcome::Winner(Color::White),
            std::cmp::Ordering::Less => Outcome::Winner(Color::Black),
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    pub fn scoreboard_text(&self) -> String {
        format!("white {} black {}", self.white_count, self.black_count)
    }

    /// Eight rows of `_` (empty), `W` (white), `B` (black).
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(BOARD_SIZE)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    /// Scoreboard line followed by the eight board rows.
    pub fn dump(&self) -> String {
        let mut out = self.scoreboard_text();
        for row in self.rows() {
            out.push('\n');
            out.push_str(&row);
        }
        out
    }

    /// Length of the run of opposite stones starting next to `(x, y)` in
    /// direction `(dx, dy)` and closed by a `color` stone; 0 if not closed.
    fn flip_run_length(&self, x: i32, y: i32, dx: i32, dy: i32, color: Color) -> usize {
        let opponent = Cell::Occupied(color.opponent());
        if self.cell_at(x + dx, y + dy) != Some(opponent) {
            return 0;
        }

        let mut mag = 2;
        loop {
            match self.cell_at(x + dx * mag, y + dy * mag) {
                Some(Cell::Occupied(c)) if c == color => return (mag - 1) as usize,
                Some(Cell::Occupied(_)) => mag += 1,
                Some(Cell::Empty) | None => return 0,
            }
        }
    }

    fn counter_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::White => &mut self.white_count,
            Color::Black => &mut self.black_count,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn idx(x: usize, y: usize) -> usize {
    y * BOARD_SIZE + x
}

fn in_bounds(x: i32, y: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&x) && (0..BOARD_SIZE as i32).contains(&y)
}

/// Checks, for both colors and every empty cell, that the cell is listed
/// as legal exactly when placing there on a copy flips something.
#[cfg(test)]
pub(crate) fn assert_legality_matches_capture(board: &Board) {
    for color in [Color::White, Color::Black] {
        let legal = board.legal_moves(color);
        for y in 0..BOARD_SIZE as i32 {
            for x in 0..BOARD_SIZE as i32 {
                if board.cell_at(x, y) != Some(Cell::Empty) {
                    continue;
                }
                let mut scratch = *board;
                let flips = scratch
                    .place_capturing(x, y, color)
                    .map_or(0, |capture| capture.flip_count());
                let pos = Position::new(x as u8, y as u8);
                assert_eq!(
                    legal.contains(&pos),
                    flips > 0,
                    "{color} at {pos:?}\n{}",
                    board.dump()
                );
            }
        }
    }
}
