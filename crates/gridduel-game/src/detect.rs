//! Line-completion win detection.
//!
//! A line wins only when all `size` cells along it hold the same symbol.
//! There is no sub-length win on larger boards: a 10×10 game needs ten in
//! a row. O(size²) per call, run once per accepted move.

use gridduel_protocol::Symbol;

use crate::Board;

/// Returns the winning symbol, if any line is complete.
///
/// Scans every row, every column, the main diagonal, and the anti-diagonal,
/// in that order, and reports the first completed line's symbol. Under
/// move-by-move evaluation at most one symbol can be completing a line, so
/// the scan order only affects which line is reported, never the outcome.
pub fn winner(board: &Board) -> Option<Symbol> {
    let n = board.size();

    for row in 0..n {
        if let Some(symbol) = line_owner(board, (row, 0), (0, 1)) {
            return Some(symbol);
        }
    }
    for col in 0..n {
        if let Some(symbol) = line_owner(board, (0, col), (1, 0)) {
            return Some(symbol);
        }
    }
    if let Some(symbol) = line_owner(board, (0, 0), (1, 1)) {
        return Some(symbol);
    }
    line_owner(board, (0, n - 1), (1, -1))
}

/// Walks `size` cells from `start` along `step` and returns the shared
/// symbol iff every cell on the line holds the same mark.
fn line_owner(
    board: &Board,
    start: (usize, usize),
    step: (isize, isize),
) -> Option<Symbol> {
    let first = board.cell(start.0, start.1)?.symbol()?;

    for i in 1..board.size() as isize {
        let row = start.0 as isize + i * step.0;
        let col = start.1 as isize + i * step.1;
        match board.cell(row as usize, col as usize) {
            Some(cell) if cell.symbol() == Some(first) => {}
            _ => return None,
        }
    }
    Some(first)
}
