//! Staged flip reveal.
//!
//! A capture is split into waves by distance from the placed stone. A
//! [`FlipSequence`] hands out one wave per due tick, and [`DisplayBoard`]
//! keeps what the renderer should show while the sequence is running.

use std::collections::VecDeque;

use crate::board::{BOARD_SIZE, Board, Capture, NUM_SQUARES};
use crate::buffer;
use crate::types::{Cell, Color, Position};

/// Flip timestamp for cells that have never flipped.
pub const NEVER_FLIPPED: f32 = f32::NEG_INFINITY;

/// Flipped stones at the same distance from the placed stone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureWave {
    pub distance: usize,
    pub cells: Vec<Position>,
}

/// Groups a capture into waves, nearest first. Within a wave, cells keep
/// the direction order of the capture.
pub fn capture_waves(capture: &Capture) -> Vec<CaptureWave> {
    let longest = capture
        .runs
        .iter()
        .map(|run| run.cells.len())
        .max()
        .unwrap_or(0);

    (1..=longest)
        .map(|distance| CaptureWave {
            distance,
            cells: capture
                .runs
                .iter()
                .filter_map(|run| run.cells.get(distance - 1).copied())
                .collect(),
        })
        .collect()
}

/// Multi-tick reveal of one capture. Each wave is followed by
/// `frames_per_wave` idle ticks before the next one is due.
#[derive(Debug, Clone)]
pub struct FlipSequence {
    color: Color,
    waves: VecDeque<CaptureWave>,
    frames_per_wave: u32,
    wait: u32,
}

impl FlipSequence {
    pub fn new(capture: &Capture, frames_per_wave: u32) -> Self {
        Self {
            color: capture.color,
            waves: capture_waves(capture).into(),
            frames_per_wave,
            wait: 0,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Advances one frame; returns the wave to reveal now, if any.
    pub fn tick(&mut self) -> Option<CaptureWave> {
        if self.wait > 0 {
            self.wait -= 1;
            return None;
        }
        let wave = self.waves.pop_front()?;
        self.wait = self.frames_per_wave;
        Some(wave)
    }

    /// True once every wave is out and its trailing wait has elapsed.
    pub fn is_complete(&self) -> bool {
        self.waves.is_empty() && self.wait == 0
    }

    pub fn remaining_waves(&self) -> usize {
        self.waves.len()
    }
}

/// What the renderer sees: cell states plus the start time of each cell's
/// most recent flip.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBoard {
    cells: [Cell; NUM_SQUARES],
    flip_started: [f32; NUM_SQUARES],
}

impl DisplayBoard {
    pub fn from_board(board: &Board) -> Self {
        Self {
            cells: *board.cells(),
            flip_started: [NEVER_FLIPPED; NUM_SQUARES],
        }
    }

    /// Displayed cell, or `None` when `pos` is off the board.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        index(pos).map(|i| self.cells[i])
    }

    pub fn flip_started(&self, pos: Position) -> Option<f32> {
        index(pos).map(|i| self.flip_started[i])
    }

    /// Shows a newly placed stone. Its captured stones keep their old
    /// color until revealed.
    pub fn show_placement(&mut self, capture: &Capture) {
        if let Some(i) = index(capture.origin) {
            self.cells[i] = Cell::Occupied(capture.color);
        }
    }

    /// Off-board positions are skipped.
    pub fn reveal(&mut self, color: Color, cells: &[Position], now: f32) {
        for i in cells.iter().filter_map(|&pos| index(pos)) {
            self.cells[i] = Cell::Occupied(color);
            self.flip_started[i] = now;
        }
    }

    /// Serializes with flip timestamps at byte offset 4 of every slot.
    pub fn to_buffer(&self) -> Vec<u8> {
        buffer::encode_cells(&self.cells, Some(&self.flip_started))
    }
}

fn index(pos: Position) -> Option<usize> {
    let (x, y) = (pos.x as usize, pos.y as usize);
    (x < BOARD_SIZE && y < BOARD_SIZE).then(|| y * BOARD_SIZE + x)
}
