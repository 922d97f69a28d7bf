//! Positional weights.
//!
//! Classifies each cell by its geometric role and maps roles to a fixed
//! bonus. Corners and center cells sit on the most winning lines, so the
//! default tables favor them.

use serde::{Deserialize, Serialize};

use crate::board::Coord;

/// Geometric role of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellRole {
    /// All three coordinates on the boundary.
    Corner,
    /// Two coordinates on the boundary.
    Edge,
    /// One of the cube's center cells.
    Center,
    /// Anything else: face cells and non-central interior cells.
    Plain,
}

impl CellRole {
    /// Classifies `coord` on an `n`-cube with the given center cells.
    ///
    /// A 2-cube is all corners; the center check only runs for cells that are
    /// not already corners or edges.
    pub fn of(coord: Coord, n: usize, centers: &[Coord]) -> CellRole {
        match coord.extreme_components(n) {
            3 => CellRole::Corner,
            2 => CellRole::Edge,
            _ if centers.contains(&coord) => CellRole::Center,
            _ => CellRole::Plain,
        }
    }
}

/// Per-role bonus awarded to the owner of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalTable {
    pub corner: i64,
    pub edge: i64,
    pub center: i64,
    pub plain: i64,
}

impl PositionalTable {
    /// Default weights for an `n`-cube.
    ///
    /// On the 3-cube the single center lies on 13 lines against 7 for a
    /// corner; on the 4-cube corners and the eight center cells tie at 7.
    pub fn for_size(n: usize) -> PositionalTable {
        match n {
            2 => PositionalTable {
                corner: 1,
                edge: 0,
                center: 0,
                plain: 0,
            },
            3 => PositionalTable {
                corner: 3,
                edge: 1,
                center: 5,
                plain: 0,
            },
            4 => PositionalTable {
                corner: 3,
                edge: 1,
                center: 3,
                plain: 0,
            },
            _ => PositionalTable {
                corner: 2,
                edge: 1,
                center: 2,
                plain: 0,
            },
        }
    }

    pub fn bonus(&self, role: CellRole) -> i64 {
        match role {
            CellRole::Corner => self.corner,
            CellRole::Edge => self.edge,
            CellRole::Center => self.center,
            CellRole::Plain => self.plain,
        }
    }

    /// True if no weight is negative.
    pub fn is_valid(&self) -> bool {
        [self.corner, self.edge, self.center, self.plain]
            .iter()
            .all(|w| *w >= 0)
    }
}
