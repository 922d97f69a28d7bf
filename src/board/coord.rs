//! Cell coordinates and player identities.
//!
//! A coordinate is an `(x, y, z)` triple on an `n x n x n` cube. Cells are
//! stored in z-major, then y, then x order, so the flat index of a coordinate
//! is also its position in the board's scan order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two sides.
///
/// `O` (identifier 0) is the side the engine maximizes for in the primary
/// move-selection flow and opens the game; `X` (identifier 1) is its opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    O,
    X,
}

/// Both players in identifier order.
pub const ALL_PLAYERS: [Player; 2] = [Player::O, Player::X];

impl Player {
    /// Returns the binary identifier (0 or 1).
    pub const fn index(self) -> usize {
        match self {
            Player::O => 0,
            Player::X => 1,
        }
    }

    /// Looks up a player by binary identifier.
    pub fn from_index(index: usize) -> Option<Player> {
        match index {
            0 => Some(Player::O),
            1 => Some(Player::X),
            _ => None,
        }
    }

    /// Returns the other side.
    pub const fn opponent(self) -> Player {
        match self {
            Player::O => Player::X,
            Player::X => Player::O,
        }
    }

    /// Returns the lowercase character used in position notation.
    pub const fn symbol(self) -> char {
        match self {
            Player::O => 'o',
            Player::X => 'x',
        }
    }

    /// Parses a player from its position-notation character.
    pub fn from_symbol(c: char) -> Option<Player> {
        match c {
            'o' | 'O' => Some(Player::O),
            'x' | 'X' => Some(Player::X),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A cell position on the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Coord { x, y, z }
    }

    /// Returns true if every component lies in `[0, n)`.
    #[inline]
    pub const fn in_bounds(self, n: usize) -> bool {
        self.x < n && self.y < n && self.z < n
    }

    /// Flat index in scan order. Caller guarantees `in_bounds(n)`.
    #[inline]
    pub const fn index(self, n: usize) -> usize {
        (self.z * n + self.y) * n + self.x
    }

    /// Inverse of [`Coord::index`].
    #[inline]
    pub const fn from_index(index: usize, n: usize) -> Self {
        Coord {
            x: index % n,
            y: (index / n) % n,
            z: index / (n * n),
        }
    }

    /// Number of components sitting on the cube's outer boundary (0 or n-1).
    pub fn extreme_components(self, n: usize) -> usize {
        [self.x, self.y, self.z]
            .iter()
            .filter(|&&c| c == 0 || c == n - 1)
            .count()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}
