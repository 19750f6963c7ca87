//! The board: a square grid of tri-state cells.

use gridduel_protocol::Symbol;

/// One cell of the board.
///
/// A tagged enum rather than an optional string: a cell is empty or holds
/// exactly one of the two symbols, and no other value is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Marked(Symbol),
}

impl Cell {
    /// Returns the symbol in this cell, if any.
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Self::Empty => None,
            Self::Marked(s) => Some(s),
        }
    }
}

/// The allowed range of board sizes, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLimits {
    pub min: usize,
    pub max: usize,
}

impl BoardLimits {
    /// Returns `true` if `size` is an acceptable board size.
    pub fn contains(&self, size: usize) -> bool {
        (self.min..=self.max).contains(&size)
    }
}

impl Default for BoardLimits {
    fn default() -> Self {
        Self { min: 3, max: 10 }
    }
}

/// A `size` × `size` grid, allocated once when the board size is fixed.
///
/// Row-major storage; `(row, col)` indexing throughout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Allocates an empty board. The caller validates `size` against
    /// [`BoardLimits`] first.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// The side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if `(row, col)` lies on the board.
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    /// The cell at `(row, col)`, or `None` when out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if self.in_bounds(row, col) {
            Some(self.cells[row * self.size + col])
        } else {
            None
        }
    }

    /// Marks `(row, col)` with `symbol`. The caller has already checked
    /// bounds and emptiness.
    pub(crate) fn mark(&mut self, row: usize, col: usize, symbol: Symbol) {
        self.cells[row * self.size + col] = Cell::Marked(symbol);
    }

    /// Returns `true` once every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }
}
