use crate::error::{Error, Result};
use crate::palette::{Color, Pen};

/// Bytes per cell in the encoded grid texture.
pub const BYTES_PER_CELL: usize = 4;

/// Alpha channel written for every encoded cell.
pub const OPAQUE: u8 = 255;

/// Columns per tab stop used by `Grid::print_text`.
pub const TAB_WIDTH: i64 = 4;

// ── Cell ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// Atlas glyph index (code page 437 layout for the stock fonts).
    pub glyph: u8,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    /// Glyph 0, black on black.
    pub const EMPTY: Cell = Cell { glyph: 0, fg: Color::Black, bg: Color::Black };

    pub fn new(glyph: u8, fg: Color, bg: Color) -> Self {
        Self { glyph, fg, bg }
    }

    pub fn with_pen(glyph: u8, pen: Pen) -> Self {
        Self { glyph, fg: pen.fg, bg: pen.bg }
    }
}

// ── Grid ────────────────────────────────────────────────────────────────────

/// Fixed-size, row-major array of cells.
///
/// Dimensions are set once at construction; the grid is never resized.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate a `width × height` grid of empty cells.
    ///
    /// Allocation failure is reported instead of aborting so it can take the
    /// regular fatal-error path.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(Error::Allocation { width, height })?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| Error::Allocation { width, height })?;
        cells.resize(len, Cell::EMPTY);
        Ok(Self { width, height, cells })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn cells(&self) -> &[Cell] { &self.cells }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Write one cell.
    ///
    /// # Panics
    /// Panics when `(x, y)` lies outside the grid; callers validate first.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) outside {}x{} grid", self.width, self.height);
        self.cells[y * self.width + x] = cell;
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn clear(&mut self) {
        self.fill(Cell::EMPTY);
    }

    /// Write `text` starting at column `x`, row `y`, one byte per column.
    ///
    /// `\n` returns to column `x` on the next row, `\r` returns to column `x`,
    /// `\t` jumps to the next multiple of [`TAB_WIDTH`] and `\b` steps back one
    /// column but never left of `x`.  Every other byte is drawn as a glyph.
    /// Glyphs that land outside the grid are dropped one by one; once the
    /// row runs past the bottom edge the rest of the text is ignored.
    pub fn print_text(&mut self, x: i64, y: i64, text: impl AsRef<[u8]>, pen: Pen) {
        let mut col = x;
        let mut row = y;
        for &byte in text.as_ref() {
            if row >= self.height as i64 {
                break;
            }
            match byte {
                b'\n' => {
                    col = x;
                    row += 1;
                }
                b'\r' => col = x,
                b'\t' => col = (col.div_euclid(TAB_WIDTH) + 1) * TAB_WIDTH,
                0x08 => col = (col - 1).max(x),
                glyph => {
                    if self.in_bounds(col, row) {
                        self.set(col as usize, row as usize, Cell::with_pen(glyph, pen));
                    }
                    col += 1;
                }
            }
        }
    }

    /// Encode the grid as an RGBA8 image with one texel per cell:
    /// `(glyph, fg, bg, 255)`, row-major.  The grid shader depends on
    /// exactly this layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.cells.len() * BYTES_PER_CELL);
        self.encode_into(&mut out);
        out
    }

    /// Same as [`Grid::encode`], reusing `out`'s allocation.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.cells.len() * BYTES_PER_CELL);
        for cell in &self.cells {
            out.extend_from_slice(&[cell.glyph, cell.fg.index(), cell.bg.index(), OPAQUE]);
        }
    }
}
