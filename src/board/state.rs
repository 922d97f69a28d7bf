//! Board state.
//!
//! Holds the occupancy of every cell of the cube, applies and reverts moves,
//! and answers availability and win queries. Alternation between players is
//! the caller's responsibility; the board only enforces that a move lands on
//! an empty, in-bounds cell and that an undo targets an occupied one.

use std::cmp::Ordering;
use std::sync::Arc;

use super::coord::{Coord, Player};
use super::lines::{Line, LineCatalog};

/// Largest supported cube edge.
pub const MAX_BOARD_SIZE: usize = 16;

/// Default cube edge for the reference game.
pub const DEFAULT_BOARD_SIZE: usize = 4;

/// Contract violations reported by the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board size {0} is outside 2..={max}", max = MAX_BOARD_SIZE)]
    InvalidSize(usize),

    #[error("coordinate ({coord}) is outside a board of size {size}")]
    InvalidCoordinate { coord: Coord, size: usize },

    #[error("cell ({0}) is already occupied")]
    CellOccupied(Coord),

    #[error("cannot undo ({0}): cell is empty")]
    IllegalUndo(Coord),
}

/// An `n x n x n` cube of cells, each empty or owned by one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Player>>,
    catalog: Arc<LineCatalog>,
    opener: Player,
}

impl Board {
    /// Creates an empty board and its line catalog.
    pub fn new(size: usize) -> Result<Board, BoardError> {
        if !(2..=MAX_BOARD_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize(size));
        }
        Ok(Board {
            size,
            cells: vec![None; size * size * size],
            catalog: Arc::new(LineCatalog::generate(size)),
            opener: Player::O,
        })
    }

    /// Edge length of the cube.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells (`n³`).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The winning lines of this board.
    pub fn catalog(&self) -> &LineCatalog {
        &self.catalog
    }

    /// Raw cell contents in scan order.
    pub fn cells(&self) -> &[Option<Player>] {
        &self.cells
    }

    /// Returns the owner of a cell, or `None` for an empty or out-of-bounds one.
    pub fn cell(&self, coord: Coord) -> Option<Player> {
        if !coord.in_bounds(self.size) {
            return None;
        }
        self.cells[coord.index(self.size)]
    }

    fn checked_index(&self, coord: Coord) -> Result<usize, BoardError> {
        if coord.in_bounds(self.size) {
            Ok(coord.index(self.size))
        } else {
            Err(BoardError::InvalidCoordinate {
                coord,
                size: self.size,
            })
        }
    }

    /// Claims an empty cell for `player`.
    pub fn apply_move(&mut self, coord: Coord, player: Player) -> Result<(), BoardError> {
        let idx = self.checked_index(coord)?;
        if self.cells[idx].is_some() {
            return Err(BoardError::CellOccupied(coord));
        }
        self.cells[idx] = Some(player);
        Ok(())
    }

    /// Empties a cell previously claimed with [`Board::apply_move`].
    pub fn undo_move(&mut self, coord: Coord) -> Result<(), BoardError> {
        let idx = self.checked_index(coord)?;
        if self.cells[idx].is_none() {
            return Err(BoardError::IllegalUndo(coord));
        }
        self.cells[idx] = None;
        Ok(())
    }

    /// Applies a move and returns a guard that reverts it when dropped.
    ///
    /// The guard dereferences to the board, so a recursive search can keep
    /// working through it; whichever way the caller leaves the scope, the
    /// cell is emptied again.
    pub fn play(&mut self, coord: Coord, player: Player) -> Result<MoveGuard<'_>, BoardError> {
        self.apply_move(coord, player)?;
        let index = coord.index(self.size);
        Ok(MoveGuard { board: self, index })
    }

    /// Lazily yields empty cells in z, then y, then x ascending order.
    pub fn available_moves(&self) -> AvailableMoves<'_> {
        AvailableMoves {
            board: self,
            next: 0,
        }
    }

    /// Flat index of the first empty cell at or after `from`.
    #[inline]
    pub fn next_available(&self, from: usize) -> Option<usize> {
        self.cells
            .get(from..)?
            .iter()
            .position(|c| c.is_none())
            .map(|offset| from + offset)
    }

    /// Number of empty cells.
    pub fn available_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.len() - self.available_count()
    }

    /// Number of cells owned by `player`.
    pub fn stone_count(&self, player: Player) -> usize {
        self.cells.iter().filter(|c| **c == Some(player)).count()
    }

    /// True when no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// The side that placed the first stone. `O` unless a loaded position
    /// shows otherwise.
    pub fn opener(&self) -> Player {
        self.opener
    }

    /// The side whose turn it is, inferred from stone counts.
    ///
    /// The side with fewer stones moves; on equal counts the opener moves.
    pub fn side_to_move(&self) -> Player {
        let o = self.stone_count(Player::O);
        let x = self.stone_count(Player::X);
        match o.cmp(&x) {
            Ordering::Less => Player::O,
            Ordering::Greater => Player::X,
            Ordering::Equal => self.opener,
        }
    }

    /// Returns the first cataloged line fully owned by `player`, if any.
    pub fn check_winner(&self, player: Player) -> Option<&Line> {
        let target = Some(player);
        self.catalog
            .iter_indices()
            .position(|line| line.iter().all(|&i| self.cells[i] == target))
            .map(|i| self.catalog.line(i))
    }

    /// Returns whichever player owns a complete line, checking `O` first.
    pub fn winner(&self) -> Option<(Player, &Line)> {
        if let Some(line) = self.check_winner(Player::O) {
            return Some((Player::O, line));
        }
        self.check_winner(Player::X).map(|line| (Player::X, line))
    }

    /// Overwrites a cell without contract checks. Used by position parsing.
    pub(crate) fn set_cell(&mut self, index: usize, value: Option<Player>) {
        self.cells[index] = value;
    }

    /// Records who opened. Used by position parsing.
    pub(crate) fn set_opener(&mut self, player: Player) {
        self.opener = player;
    }
}

/// Iterator over empty cells, restartable by calling
/// [`Board::available_moves`] again.
#[derive(Debug, Clone)]
pub struct AvailableMoves<'a> {
    board: &'a Board,
    next: usize,
}

impl Iterator for AvailableMoves<'_> {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        let idx = self.board.next_available(self.next)?;
        self.next = idx + 1;
        Some(Coord::from_index(idx, self.board.size))
    }
}

/// A move held on the board for the lifetime of the guard.
///
/// Created by [`Board::play`]. Dropping the guard empties the cell it claimed.
#[derive(Debug)]
pub struct MoveGuard<'a> {
    board: &'a mut Board,
    index: usize,
}

impl MoveGuard<'_> {
    /// The coordinate this guard holds.
    pub fn coord(&self) -> Coord {
        Coord::from_index(self.index, self.board.size)
    }
}

impl std::ops::Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl std::ops::DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        debug_assert!(self.board.cells[self.index].is_some());
        self.board.cells[self.index] = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: usize, y: usize, z: usize) -> Coord {
        Coord::new(x, y, z)
    }

    #[test]
    fn new_board_is_empty() {
        let board = Board::new(4).unwrap();
        assert_eq!(board.cell_count(), 64);
        assert!(board.cells().iter().all(|c| c.is_none()));
        assert_eq!(board.available_count(), 64);
        assert_eq!(board.catalog().len(), 76);
    }

    #[test]
    fn rejects_invalid_sizes() {
        assert_eq!(Board::new(0).unwrap_err(), BoardError::InvalidSize(0));
        assert_eq!(Board::new(1).unwrap_err(), BoardError::InvalidSize(1));
        assert_eq!(
            Board::new(MAX_BOARD_SIZE + 1).unwrap_err(),
            BoardError::InvalidSize(MAX_BOARD_SIZE + 1)
        );
        assert!(Board::new(2).is_ok());
    }

    #[test]
    fn apply_then_undo_restores_board() {
        let mut board = Board::new(4).unwrap();
        board.apply_move(c(1, 2, 3), Player::X).unwrap();
        let before = board.clone();
        board.apply_move(c(0, 0, 0), Player::O).unwrap();
        assert_eq!(board.cell(c(0, 0, 0)), Some(Player::O));
        board.undo_move(c(0, 0, 0)).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn apply_rejects_occupied_and_out_of_range() {
        let mut board = Board::new(3).unwrap();
        board.apply_move(c(1, 1, 1), Player::O).unwrap();
        assert_eq!(
            board.apply_move(c(1, 1, 1), Player::X),
            Err(BoardError::CellOccupied(c(1, 1, 1)))
        );
        assert_eq!(
            board.apply_move(c(3, 0, 0), Player::X),
            Err(BoardError::InvalidCoordinate {
                coord: c(3, 0, 0),
                size: 3
            })
        );
        assert_eq!(board.cell(c(1, 1, 1)), Some(Player::O));
    }

    #[test]
    fn undo_of_empty_cell_is_illegal() {
        let mut board = Board::new(3).unwrap();
        assert_eq!(board.undo_move(c(0, 1, 2)), Err(BoardError::IllegalUndo(c(0, 1, 2))));
        assert!(matches!(
            board.undo_move(c(0, 5, 0)),
            Err(BoardError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn available_moves_scan_order() {
        let mut board = Board::new(2).unwrap();
        board.apply_move(c(0, 0, 0), Player::O).unwrap();
        board.apply_move(c(0, 1, 0), Player::X).unwrap();
        let moves: Vec<Coord> = board.available_moves().collect();
        assert_eq!(
            moves,
            vec![c(1, 0, 0), c(1, 1, 0), c(0, 0, 1), c(1, 0, 1), c(0, 1, 1), c(1, 1, 1)]
        );
        // Restartable: a fresh iterator yields the same sequence.
        assert_eq!(board.available_moves().collect::<Vec<_>>(), moves);
    }

    #[test]
    fn available_plus_occupied_is_total() {
        let mut board = Board::new(4).unwrap();
        let moves = [c(0, 0, 0), c(3, 3, 3), c(1, 2, 0), c(2, 2, 2)];
        for (i, m) in moves.iter().enumerate() {
            let p = if i % 2 == 0 { Player::O } else { Player::X };
            board.apply_move(*m, p).unwrap();
            assert_eq!(board.available_moves().count() + board.occupied_count(), 64);
        }
        for m in moves.iter().rev() {
            board.undo_move(*m).unwrap();
            assert_eq!(board.available_moves().count() + board.occupied_count(), 64);
        }
    }

    #[test]
    fn empty_board_has_no_winner() {
        let board = Board::new(4).unwrap();
        assert!(board.check_winner(Player::O).is_none());
        assert!(board.check_winner(Player::X).is_none());
        assert!(board.winner().is_none());
    }

    #[test]
    fn check_winner_returns_the_completed_line() {
        let mut board = Board::new(4).unwrap();
        for i in 0..4 {
            board.apply_move(c(i, 3 - i, 2), Player::X).unwrap();
        }
        let line = board.check_winner(Player::X).expect("x should have won");
        let cells: Vec<Coord> = (0..4).map(|i| c(i, 3 - i, 2)).collect();
        assert_eq!(line.cells(), cells.as_slice());
        assert!(board.check_winner(Player::O).is_none());
        assert_eq!(board.winner().map(|(p, _)| p), Some(Player::X));
    }

    #[test]
    fn mixed_line_is_not_a_win() {
        let mut board = Board::new(3).unwrap();
        board.apply_move(c(0, 0, 0), Player::O).unwrap();
        board.apply_move(c(1, 0, 0), Player::O).unwrap();
        board.apply_move(c(2, 0, 0), Player::X).unwrap();
        assert!(board.winner().is_none());
    }

    #[test]
    fn guard_reverts_on_drop() {
        let mut board = Board::new(3).unwrap();
        let before = board.clone();
        {
            let mut guard = board.play(c(1, 1, 1), Player::O).unwrap();
            assert_eq!(guard.coord(), c(1, 1, 1));
            assert_eq!(guard.cell(c(1, 1, 1)), Some(Player::O));
            let inner = guard.play(c(0, 0, 0), Player::X).unwrap();
            assert_eq!(inner.occupied_count(), 2);
        }
        assert_eq!(board, before);
    }

    #[test]
    fn guard_reverts_on_early_error_return() {
        fn nested(board: &mut Board) -> Result<(), BoardError> {
            let mut guard = board.play(Coord::new(0, 0, 0), Player::O)?;
            guard.play(Coord::new(0, 0, 0), Player::X)?;
            Ok(())
        }

        let mut board = Board::new(3).unwrap();
        let before = board.clone();
        assert_eq!(nested(&mut board), Err(BoardError::CellOccupied(c(0, 0, 0))));
        assert_eq!(board, before);
    }

    #[test]
    fn side_to_move_follows_stone_counts() {
        let mut board = Board::new(3).unwrap();
        assert_eq!(board.side_to_move(), Player::O);
        board.apply_move(c(0, 0, 0), Player::O).unwrap();
        assert_eq!(board.side_to_move(), Player::X);
        board.apply_move(c(1, 0, 0), Player::X).unwrap();
        assert_eq!(board.side_to_move(), Player::O);
    }

    #[test]
    fn tie_goes_to_the_opener() {
        let mut board = Board::new(3).unwrap();
        board.set_opener(Player::X);
        board.apply_move(c(0, 0, 0), Player::X).unwrap();
        assert_eq!(board.side_to_move(), Player::O);
        board.apply_move(c(1, 0, 0), Player::O).unwrap();
        assert_eq!(board.side_to_move(), Player::X);
        assert_eq!(board.opener(), Player::X);
    }

    #[test]
    fn clones_share_the_catalog() {
        let board = Board::new(4).unwrap();
        let copy = board.clone();
        assert!(Arc::ptr_eq(&board.catalog, &copy.catalog));
    }
}
