use std::fmt;

use rand::{seq::index, Rng};

use crate::checkpoint::{Layer, Shape};

/// A `(row, col)` position inside a weight matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major conversion from a flat index.
    pub fn from_flat(idx: usize, cols: usize) -> Self {
        Self::new(idx / cols, idx % cols)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}][{}]", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    /// Uniformly at random, without replacement.
    Random,
    /// The first weights in row-major order.
    Sequential,
}

/// Picks up to `count` distinct coordinates of a `shape` matrix.
///
/// Asking for more coordinates than the matrix holds yields all of them.
pub fn choose_coords<R: Rng + ?Sized>(
    layer: Layer,
    shape: Shape,
    count: usize,
    mode: SamplingMode,
    rng: &mut R,
) -> Vec<Coord> {
    let (rows, cols) = shape;
    let total = rows * cols;

    let count = if count > total {
        log::warn!("{layer} has only {total} weights, tracking all of them instead of {count}");
        total
    } else {
        count
    };

    let flat: Vec<usize> = match mode {
        SamplingMode::Random => index::sample(rng, total, count).into_vec(),
        SamplingMode::Sequential => (0..count).collect(),
    };

    flat.into_iter()
        .map(|idx| Coord::from_flat(idx, cols))
        .collect()
}
