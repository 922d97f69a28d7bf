//! Move search.
//!
//! Depth-limited minimax with alpha-beta pruning over the board's empty
//! cells, plus an unpruned reference search used to validate it.

pub mod alphabeta;
pub mod minimax;

pub use alphabeta::{best_move, SearchError, SearchResult, Searcher, INF};
pub use minimax::full_minimax;
