//! A small dense row-major matrix type used to assemble blending matrices.

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub(crate) fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub(crate) fn from_rows(rows: &[&[f64]]) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        let mut m = Matrix::zeros(nrows, ncols);
        for (r, row) in rows.iter().enumerate() {
            debug_assert_eq!(row.len(), ncols, "ragged matrix literal");
            for (c, &v) in row.iter().enumerate() {
                m.set(r, c, v);
            }
        }
        m
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) fn cols(&self) -> usize {
        self.cols
    }

    pub(crate) fn get(&self, r: usize, c: usize) -> f64 {
        self.data[r * self.cols + c]
    }

    pub(crate) fn set(&mut self, r: usize, c: usize, v: f64) {
        self.data[r * self.cols + c] = v;
    }

    pub(crate) fn add_to(&mut self, r: usize, c: usize, v: f64) {
        self.data[r * self.cols + c] += v;
    }

    /// `self ⊗ other`, the standard Kronecker product: result has shape
    /// `(self.rows*other.rows) x (self.cols*other.cols)`.
    pub(crate) fn kron(&self, other: &Matrix) -> Matrix {
        let rows = self.rows * other.rows;
        let cols = self.cols * other.cols;
        let mut out = Matrix::zeros(rows, cols);
        for r1 in 0..self.rows {
            for c1 in 0..self.cols {
                let a = self.get(r1, c1);
                if a == 0.0 {
                    continue;
                }
                for r2 in 0..other.rows {
                    for c2 in 0..other.cols {
                        let b = other.get(r2, c2);
                        if b == 0.0 {
                            continue;
                        }
                        out.set(r1 * other.rows + r2, c1 * other.cols + c2, a * b);
                    }
                }
            }
        }
        out
    }

    /// Builds a matrix from a permutation of this matrix's rows:
    /// `out[i, :] = self[order[i], :]`.
    pub(crate) fn permute_rows(&self, order: &[usize]) -> Matrix {
        let mut out = Matrix::zeros(order.len(), self.cols);
        for (i, &src) in order.iter().enumerate() {
            for c in 0..self.cols {
                out.set(i, c, self.get(src, c));
            }
        }
        out
    }

    /// Builds a matrix from a permutation of this matrix's columns:
    /// `out[:, j] = self[:, order[j]]`.
    pub(crate) fn permute_cols(&self, order: &[usize]) -> Matrix {
        let mut out = Matrix::zeros(self.rows, order.len());
        for (j, &src) in order.iter().enumerate() {
            for r in 0..self.rows {
                out.set(r, j, self.get(r, src));
            }
        }
        out
    }

    pub(crate) fn identity(n: usize) -> Matrix {
        let mut m = Matrix::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// One-past-last-non-zero row index for each column (0 if the column is
    /// entirely zero), per §3/§4.3 step 6.
    pub(crate) fn column_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.cols];
        for c in 0..self.cols {
            for r in (0..self.rows).rev() {
                if self.get(r, c) != 0.0 {
                    sizes[c] = r + 1;
                    break;
                }
            }
        }
        sizes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn kron_matches_hand_computation() {
        let a = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = Matrix::identity(2);
        let k = a.kron(&b);
        assert_eq!((k.rows(), k.cols()), (4, 4));
        assert_eq!(k.get(0, 0), 1.0);
        assert_eq!(k.get(0, 1), 0.0);
        assert_eq!(k.get(1, 1), 1.0);
        assert_eq!(k.get(2, 2), 3.0);
    }

    #[test]
    fn column_sizes_ignore_trailing_zero_rows() {
        let m = Matrix::from_rows(&[&[1.0, 0.0], &[0.0, 0.0], &[0.0, 0.0]]);
        assert_eq!(m.column_sizes(), vec![1, 0]);
    }
}
