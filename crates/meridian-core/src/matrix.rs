use serde::{Deserialize, Serialize};

/// A dense, row-major square matrix of reals.
///
/// Used for both the pod dependency matrix and the node latency matrix. Out-of-range
/// access returns `0.0` rather than panicking, since callers routinely probe indices that
/// may not exist yet (e.g. while the matrix is still being built row by row).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Matrix {
    size: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a new `size x size` matrix, zero-initialized.
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    /// Number of rows (== number of columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Read `m[i][j]`. Returns `0.0` if either index is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i >= self.size || j >= self.size {
            return 0.0;
        }
        self.data[i * self.size + j]
    }

    /// Write `m[i][j] = value`. Silently ignored if either index is out of range.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        if i >= self.size || j >= self.size {
            return;
        }
        self.data[i * self.size + j] = value;
    }

    /// Deep-copy a rectangular source into a fresh matrix.
    ///
    /// `src` must be square; ragged or non-square input is truncated to the largest square
    /// prefix rather than panicking, matching the primitive's never-abort contract.
    pub fn build_from(src: &[Vec<f64>]) -> Self {
        let size = src.len();
        let mut m = Self::zeros(size);
        for (i, row) in src.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if j >= size {
                    break;
                }
                m.set(i, j, value);
            }
        }
        m
    }

    /// Sum of every entry in row `i`.
    pub fn row_sum(&self, i: usize) -> f64 {
        if i >= self.size {
            return 0.0;
        }
        (0..self.size).map(|j| self.get(i, j)).sum()
    }

    /// Largest entry in the matrix, or `0.0` for an empty matrix.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Sum of the strict upper triangle (`i < j`).
    pub fn upper_triangle_sum(&self) -> f64 {
        let mut total = 0.0;
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                total += self.get(i, j);
            }
        }
        total
    }

    /// `true` if `m[i][j] == m[j][i]` for all `i, j` and the diagonal is zero.
    pub fn is_symmetric_zero_diagonal(&self) -> bool {
        for i in 0..self.size {
            if self.get(i, i) != 0.0 {
                return false;
            }
            for j in (i + 1)..self.size {
                if self.get(i, j) != self.get(j, i) {
                    return false;
                }
            }
        }
        true
    }
}
