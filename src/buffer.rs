//! Board state buffer for the renderer's uniform block.
//!
//! Layout (std140, one 16-byte slot per cell, row-major):
//! - bytes 0..4: little-endian `u32` flags, `0x80` = placed, `0x01` = white
//! - bytes 4..8: little-endian `f32` flip start time (animated display only)
//! - bytes 8..16: padding

use thiserror::Error;

use crate::board::{Board, NUM_SQUARES};
use crate::types::{Cell, Color};

pub const CELL_STRIDE: usize = 16;
pub const BUFFER_LEN: usize = NUM_SQUARES * CELL_STRIDE;
pub const FLAG_PLACED: u32 = 0x80;
pub const FLAG_WHITE: u32 = 0x01;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("state buffer must be 1024 bytes, got {0}")]
    Length(usize),
    #[error("cell {index} has invalid flags {flags:#04x}")]
    InvalidFlags { index: usize, flags: u32 },
}

pub fn encode_flags(cell: Cell) -> u32 {
    match cell {
        Cell::Empty => 0,
        Cell::Occupied(Color::White) => FLAG_PLACED | FLAG_WHITE,
        Cell::Occupied(Color::Black) => FLAG_PLACED,
    }
}

/// Inverse of [`encode_flags`]. A color bit without the placed bit, or any
/// unknown bit, is rejected.
pub fn decode_flags(flags: u32) -> Option<Cell> {
    match flags {
        0 => Some(Cell::Empty),
        f if f == FLAG_PLACED | FLAG_WHITE => Some(Cell::Occupied(Color::White)),
        f if f == FLAG_PLACED => Some(Cell::Occupied(Color::Black)),
        _ => None,
    }
}

/// Plain board export; the timestamp field stays zero.
pub fn encode_board(board: &Board) -> Vec<u8> {
    encode_cells(board.cells(), None)
}

pub fn encode_cells(
    cells: &[Cell; NUM_SQUARES],
    flip_started: Option<&[f32; NUM_SQUARES]>,
) -> Vec<u8> {
    let mut out = vec![0u8; BUFFER_LEN];
    for (i, (slot, cell)) in out.chunks_exact_mut(CELL_STRIDE).zip(cells).enumerate() {
        slot[0..4].copy_from_slice(&encode_flags(*cell).to_le_bytes());
        if let Some(times) = flip_started {
            slot[4..8].copy_from_slice(&times[i].to_le_bytes());
        }
    }
    out
}

pub fn decode_cells(data: &[u8]) -> Result<[Cell; NUM_SQUARES], BufferError> {
    if data.len() != BUFFER_LEN {
        return Err(BufferError::Length(data.len()));
    }

    let mut cells = [Cell::Empty; NUM_SQUARES];
    for (index, slot) in data.chunks_exact(CELL_STRIDE).enumerate() {
        let flags = read_u32_le(slot, 0);
        cells[index] = decode_flags(flags).ok_or(BufferError::InvalidFlags { index, flags })?;
    }
    Ok(cells)
}

/// Reads the flip timestamp of cell `index` from an animated buffer.
pub fn flip_started_at(data: &[u8], index: usize) -> Option<f32> {
    let start = index.checked_mul(CELL_STRIDE)? + 4;
    let bytes = data.get(start..start + 4)?;
    let mut chunk = [0u8; 4];
    chunk.copy_from_slice(bytes);
    Some(f32::from_le_bytes(chunk))
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    let mut chunk = [0u8; 4];
    chunk.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(chunk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_board_layout_matches_uniform_block() {
        let buf = encode_board(&Board::new());

        assert_eq!(buf.len(), 1024);
        // (3,3) black, (4,3) white, (0,0) empty
        assert_eq!(&buf[(3 * 8 + 3) * 16..][..4], &[0x80u8, 0, 0, 0]);
        assert_eq!(&buf[(3 * 8 + 4) * 16..][..4], &[0x81u8, 0, 0, 0]);
        assert_eq!(&buf[0..16], &[0u8; 16]);
        assert!(buf[(3 * 8 + 3) * 16 + 4..(3 * 8 + 4) * 16].iter().all(|&b| b == 0));
    }

    #[test]
    fn decode_restores_cells() {
        let board = Board::new();
        let cells = decode_cells(&encode_board(&board)).unwrap();

        assert_eq!(&cells, board.cells());
    }

    #[test]
    fn animated_buffer_carries_timestamps() {
        let board = Board::new();
        let mut times = [0.0f32; NUM_SQUARES];
        times[27] = 2.25;

        let buf = encode_cells(board.cells(), Some(&times));

        assert_eq!(flip_started_at(&buf, 27), Some(2.25));
        assert_eq!(flip_started_at(&buf, 28), Some(0.0));
        assert_eq!(flip_started_at(&buf, 64), None);
        assert_eq!(&buf[27 * 16 + 4..27 * 16 + 8], &2.25f32.to_le_bytes());
    }

    #[test]
    fn malformed_buffers_are_rejected() {
        assert_eq!(decode_cells(&[0u8; 16]), Err(BufferError::Length(16)));

        let mut buf = encode_board(&Board::new());
        buf[5 * 16] = FLAG_WHITE as u8;
        assert_eq!(
            decode_cells(&buf),
            Err(BufferError::InvalidFlags { index: 5, flags: 0x01 })
        );
    }
}
