//! Qubic engine library.
//!
//! Exposes the board representation, line catalog, evaluator, search, and
//! protocol modules for use by integration tests and the binary entry points.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod protocol;
pub mod search;
pub mod selfplay;
