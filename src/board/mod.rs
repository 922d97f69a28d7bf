//! Board representation.
//!
//! Contains coordinates and players, the winning-line catalog, and the
//! mutable cube of cells that the search plays on.

pub mod coord;
pub mod lines;
pub mod state;

pub use coord::{Coord, Player, ALL_PLAYERS};
pub use lines::{center_cells, expected_line_count, Line, LineCatalog};
pub use state::{AvailableMoves, Board, BoardError, MoveGuard, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE};
