//! Winning-line catalog.
//!
//! Enumerates every straight line of length `n` through the cube: rows along
//! each axis, diagonals of every axis-aligned layer, and the four space
//! diagonals. The catalog is a pure function of `n`, built once per board and
//! shared between clones.
//!
//! Design: each line is stored twice, as coordinates for callers that
//! highlight a win and as flat cell indices for the win check and the
//! evaluator, which run at every search node and must not allocate.

use std::collections::HashSet;

use super::coord::Coord;

/// A straight run of `n` cells with a constant, non-zero step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    cells: Vec<Coord>,
    step: [i8; 3],
}

impl Line {
    /// The cells of the line, in generation order.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    /// The per-axis step between consecutive cells, each in `{-1, 0, 1}`.
    pub fn step(&self) -> [i8; 3] {
        self.step
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Validates a candidate sequence and builds a line from it.
    ///
    /// Returns `None` unless the sequence has exactly `n` cells and every
    /// consecutive pair differs by the same non-zero step.
    fn from_candidate(cells: Vec<Coord>, n: usize) -> Option<Line> {
        if cells.len() != n || n < 2 {
            return None;
        }
        let delta = |a: Coord, b: Coord| {
            [
                b.x as isize - a.x as isize,
                b.y as isize - a.y as isize,
                b.z as isize - a.z as isize,
            ]
        };
        let step = delta(cells[0], cells[1]);
        if step == [0, 0, 0] || step.iter().any(|d| d.abs() > 1) {
            return None;
        }
        if cells.windows(2).any(|w| delta(w[0], w[1]) != step) {
            return None;
        }
        Some(Line {
            cells,
            step: [step[0] as i8, step[1] as i8, step[2] as i8],
        })
    }
}

/// Number of lines on an `n`-cube: `3n² + 6n + 4`.
pub const fn expected_line_count(n: usize) -> usize {
    3 * n * n + 6 * n + 4
}

/// Cells nearest the cube's geometric center: one cell for odd `n`, the
/// central 2x2x2 block for even `n`.
pub fn center_cells(n: usize) -> Vec<Coord> {
    let mid = n / 2;
    let axis: Vec<usize> = if n % 2 == 0 {
        vec![mid - 1, mid]
    } else {
        vec![mid]
    };
    let mut cells = Vec::with_capacity(axis.len().pow(3));
    for &x in &axis {
        for &y in &axis {
            for &z in &axis {
                cells.push(Coord::new(x, y, z));
            }
        }
    }
    cells
}

/// Immutable set of all winning lines for one board size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCatalog {
    size: usize,
    lines: Vec<Line>,
    /// `lines.len() * size` flat cell indices, line by line.
    flat: Vec<usize>,
    centers: Vec<Coord>,
}

impl LineCatalog {
    /// Generates the catalog for an `n`-cube. Callers reject `n < 2` first.
    pub fn generate(n: usize) -> LineCatalog {
        let mut seen: HashSet<Vec<Coord>> = HashSet::new();
        let mut lines = Vec::with_capacity(expected_line_count(n));

        for candidate in candidate_lines(n) {
            if seen.contains(&candidate) {
                continue;
            }
            if let Some(line) = Line::from_candidate(candidate.clone(), n) {
                seen.insert(candidate);
                lines.push(line);
            }
        }

        let flat = lines
            .iter()
            .flat_map(|l| l.cells.iter().map(|c| c.index(n)))
            .collect();

        LineCatalog {
            size: n,
            lines,
            flat,
            centers: center_cells(n),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, i: usize) -> &Line {
        &self.lines[i]
    }

    /// Flat cell indices of line `i`.
    #[inline]
    pub fn indices(&self, i: usize) -> &[usize] {
        &self.flat[i * self.size..(i + 1) * self.size]
    }

    /// Iterates the flat cell indices of every line, in catalog order.
    #[inline]
    pub fn iter_indices(&self) -> std::slice::ChunksExact<'_, usize> {
        self.flat.chunks_exact(self.size)
    }

    /// The cube's center cells.
    pub fn centers(&self) -> &[Coord] {
        &self.centers
    }
}

/// Raw candidates from the three line families, before validation.
fn candidate_lines(n: usize) -> Vec<Vec<Coord>> {
    let last = n - 1;
    let mut raw: Vec<Vec<Coord>> = Vec::with_capacity(expected_line_count(n));

    // Axis-aligned rows.
    for z in 0..n {
        for y in 0..n {
            raw.push((0..n).map(|x| Coord::new(x, y, z)).collect());
        }
        for x in 0..n {
            raw.push((0..n).map(|y| Coord::new(x, y, z)).collect());
        }
    }
    for x in 0..n {
        for y in 0..n {
            raw.push((0..n).map(|z| Coord::new(x, y, z)).collect());
        }
    }

    // Diagonals of each axis-aligned layer.
    for z in 0..n {
        raw.push((0..n).map(|i| Coord::new(i, i, z)).collect());
        raw.push((0..n).map(|i| Coord::new(i, last - i, z)).collect());
    }
    for x in 0..n {
        raw.push((0..n).map(|i| Coord::new(x, i, i)).collect());
        raw.push((0..n).map(|i| Coord::new(x, i, last - i)).collect());
    }
    for y in 0..n {
        raw.push((0..n).map(|i| Coord::new(i, y, i)).collect());
        raw.push((0..n).map(|i| Coord::new(i, y, last - i)).collect());
    }

    // Space diagonals.
    raw.push((0..n).map(|i| Coord::new(i, i, i)).collect());
    raw.push((0..n).map(|i| Coord::new(i, i, last - i)).collect());
    raw.push((0..n).map(|i| Coord::new(i, last - i, i)).collect());
    raw.push((0..n).map(|i| Coord::new(last - i, i, i)).collect());

    raw
}
