//! Position evaluation.
//!
//! Scores a non-terminal board from one player's perspective using line
//! potential, optionally layered with positional and mobility terms.

pub(crate) mod heuristic;
pub mod positional;

pub use heuristic::{
    evaluate, evaluate_all, EvalConfig, LayeredConfig, Strategy, MAX_HEURISTIC, WIN_SCORE,
};
pub use positional::{CellRole, PositionalTable};
