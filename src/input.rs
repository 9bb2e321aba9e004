use crate::board::BOARD_SIZE;

/// Reports value changes between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeTrigger<T> {
    value: T,
}

impl<T: Copy + PartialEq> EdgeTrigger<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn current(&self) -> T {
        self.value
    }

    /// Stores `value` and returns whether it differs from the previous one.
    pub fn update(&mut self, value: T) -> bool {
        let changed = self.value != value;
        self.value = value;
        changed
    }
}

impl EdgeTrigger<bool> {
    /// True only on a not-pressed to pressed transition.
    pub fn rising(&mut self, pressed: bool) -> bool {
        self.update(pressed) && self.value
    }
}

/// Maps playfield pixels to board cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    margin: f32,
    board_size: f32,
    cell_size: f32,
}

impl BoardLayout {
    /// The grid takes `grid_fraction` of `render_size`; the rest is split
    /// evenly into margins. Inputs are validated by [`crate::config`].
    pub(crate) fn new(render_size: f32, grid_fraction: f32) -> Self {
        let margin = render_size * (1.0 - grid_fraction) * 0.5;
        let board_size = render_size - margin * 2.0;
        Self {
            margin,
            board_size,
            cell_size: board_size / BOARD_SIZE as f32,
        }
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell under the pointer, or `None` when outside the grid.
    pub fn cell_at_pixel(&self, px: f32, py: f32) -> Option<(i32, i32)> {
        let (bx, by) = (px - self.margin, py - self.margin);
        if !(0.0..self.board_size).contains(&bx) || !(0.0..self.board_size).contains(&by) {
            return None;
        }
        let x = ((bx / self.cell_size) as i32).min(BOARD_SIZE as i32 - 1);
        let y = ((by / self.cell_size) as i32).min(BOARD_SIZE as i32 - 1);
        Some((x, y))
    }

    /// Pixel center of a cell.
    pub fn cell_center(&self, x: i32, y: i32) -> (f32, f32) {
        (
            self.margin + (x as f32 + 0.5) * self.cell_size,
            self.margin + (y as f32 + 0.5) * self.cell_size,
        )
    }
}
