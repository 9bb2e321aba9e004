use crate::board::{BOARD_SIZE, Board, Capture};
use crate::types::{Color, GameSnapshot, MoveReport, Outcome, Phase, Position};

/// Why a commit request was dropped. Ignored commits never change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Finished,
    OutOfRange,
    NotLegal,
}

/// An accepted move and the turn advance that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub capture: Capture,
    /// Colors skipped for lack of legal moves, in order.
    pub passed: Vec<Color>,
    pub phase: Phase,
}

impl Placement {
    pub fn report(&self) -> MoveReport {
        MoveReport {
            color: self.capture.color,
            position: self.capture.origin,
            flipped: self.capture.flipped().collect(),
            passed: self.passed.clone(),
            phase: self.phase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Placed(Placement),
    Ignored(IgnoreReason),
}

/// Turn controller: owns the board, the active color and the cached
/// legal destinations for that color.
///
/// The legal set is recomputed on every board or turn change, so it never
/// goes stale.
#[derive(Debug, Clone)]
pub struct TurnController {
    board: Board,
    phase: Phase,
    legal_moves: Vec<Position>,
}

impl TurnController {
    /// New game from the opening position, white to move.
    pub fn new() -> Self {
        Self::with_board(Board::new(), Color::White)
    }

    /// Starts from an arbitrary position. If `first` cannot move, the turn
    /// advances exactly as it would after a move.
    pub fn with_board(board: Board, first: Color) -> Self {
        // start on the opponent and advance once
        let mut controller = Self {
            board,
            phase: Phase::AwaitingMove(first.opponent()),
            legal_moves: Vec::new(),
        };
        controller.advance(first.opponent());
        controller
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_color(&self) -> Option<Color> {
        self.phase.active_color()
    }

    /// Legal destinations for the active color; empty once finished.
    pub fn legal_moves(&self) -> &[Position] {
        &self.legal_moves
    }

    pub fn is_legal(&self, x: i32, y: i32) -> bool {
        self.legal_moves
            .iter()
            .any(|p| p.x as i32 == x && p.y as i32 == y)
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Finished(outcome) => Some(outcome),
            Phase::AwaitingMove(_) => None,
        }
    }

    /// Plays the active color at `(x, y)` if it is a legal destination,
    /// then advances the turn, skipping colors without legal moves.
    pub fn commit(&mut self, x: i32, y: i32) -> CommitOutcome {
        let Phase::AwaitingMove(color) = self.phase else {
            return CommitOutcome::Ignored(IgnoreReason::Finished);
        };
        if !(0..BOARD_SIZE as i32).contains(&x) || !(0..BOARD_SIZE as i32).contains(&y) {
            return CommitOutcome::Ignored(IgnoreReason::OutOfRange);
        }
        if !self.is_legal(x, y) {
            return CommitOutcome::Ignored(IgnoreReason::NotLegal);
        }

        let Some(capture) = self.board.place_capturing(x, y, color) else {
            debug_assert!(false, "cached legal move ({x}, {y}) was rejected by the board");
            return CommitOutcome::Ignored(IgnoreReason::NotLegal);
        };
        debug_assert!(capture.flip_count() > 0);

        let passed = self.advance(color);
        CommitOutcome::Placed(Placement {
            capture,
            passed,
            phase: self.phase,
        })
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let (white_count, black_count) = self.board.count();
        GameSnapshot {
            rows: self.board.rows(),
            white_count,
            black_count,
            phase: self.phase,
            legal_moves: self.legal_moves.clone(),
        }
    }

    /// Board dump followed by the phase line, or the end-of-game summary.
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = vec![self.board.dump()];
        match self.phase {
            Phase::AwaitingMove(color) => lines.push(format!("{color} phase")),
            Phase::Finished(outcome) => {
                lines.push("Game finished".to_string());
                lines.push(format!("{outcome} ({})", self.board.scoreboard_text()));
            }
        }
        lines
    }

    /// Hands the turn on after `mover` played. Returns the colors that had
    /// to pass. The game ends on a full board or when neither color can
    /// move.
    fn advance(&mut self, mover: Color) -> Vec<Color> {
        let mut passed = Vec::new();
        if !self.board.is_finished() {
            for candidate in [mover.opponent(), mover] {
                let legal = self.board.legal_moves(candidate);
                if !legal.is_empty() {
                    self.phase = Phase::AwaitingMove(candidate);
                    self.legal_moves = legal;
                    return passed;
                }
                passed.push(candidate);
            }
        }

        self.phase = Phase::Finished(self.board.winner());
        self.legal_moves.clear();
        passed
    }
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new()
    }
}
