//! Projects a basis onto a lower-dimensional inherited parametric space
//! through an affine coordinate map (SPEC_FULL §4.4).

mod monomial_path;
mod polygon_path;

use std::fmt;

use num_traits::Float;

use crate::core::basis::Basis;
use crate::core::matrix::Matrix;
use crate::core::standard::{self, StdKind};

/// An affine map from an inherited parametric space of dimension `D'` into
/// the original basis's space of dimension `D`: `xi_k = offset[k] +
/// sum_j coeffs[k][j] * xi'_j`.
#[derive(Clone, Debug)]
pub struct AffineMap {
    offset: Vec<f64>,
    coeffs: Vec<Vec<f64>>,
}

impl AffineMap {
    /// Builds an affine map from its constant offset (length `D`) and its
    /// linear coefficients (`D` rows of length `D'`, row `k` giving how
    /// inherited coordinates combine to produce original coordinate `k`).
    #[must_use]
    pub fn new(offset: Vec<f64>, coeffs: Vec<Vec<f64>>) -> Self {
        AffineMap { offset, coeffs }
    }

    /// The identity map onto the first `d_prime` original coordinates,
    /// used when a caller passes no explicit transformation.
    #[must_use]
    pub fn identity(dim: usize, d_prime: usize) -> Self {
        let offset = vec![0.0; dim];
        let coeffs = (0..dim)
            .map(|k| {
                (0..d_prime)
                    .map(|j| if j == k { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect();
        AffineMap { offset, coeffs }
    }

    fn dim(&self) -> usize {
        self.offset.len()
    }

    pub(crate) fn offset_at(&self, k: usize) -> f64 {
        self.offset[k]
    }

    pub(crate) fn coeffs_row(&self, k: usize) -> &[f64] {
        &self.coeffs[k]
    }

    pub(crate) fn coeffs_at(&self, k: usize, j: usize) -> f64 {
        self.coeffs[k][j]
    }
}

/// Failures reported while building an inherited evaluator, per SPEC_FULL §7.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProjectionError {
    /// The affine map is not one-to-one on the coordinates of a
    /// polygon-coupled basis, or proposes a polygon-member reordering.
    Invalid { reason: String },
    /// The requested transformation falls outside the implemented family,
    /// e.g. a polygon radial coordinate inherited without its
    /// circumferential partner.
    Unsupported { reason: String },
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionError::Invalid { reason } => write!(f, "invalid projection: {reason}"),
            ProjectionError::Unsupported { reason } => {
                write!(f, "unsupported projection: {reason}")
            }
        }
    }
}

impl std::error::Error for ProjectionError {}

/// The `(std_kind', std_args', B_combined)` triple produced by [`inherit`]:
/// an evaluator for the basis restricted to the inherited coordinates.
#[derive(Debug)]
pub struct InheritedEvaluator {
    m: usize,
    s_inh: usize,
    blend: Matrix,
    colsz: Vec<usize>,
    std_kind: StdKind,
    std_args: Vec<i64>,
}

impl InheritedEvaluator {
    pub(crate) fn new(m: usize, blend: Matrix, std_kind: StdKind, std_args: Vec<i64>) -> Self {
        let s_inh = blend.cols();
        let colsz = blend.column_sizes();
        InheritedEvaluator { m, s_inh, blend, colsz, std_kind, std_args }
    }

    /// `M`, the number of (unchanged) basis functions.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.m
    }

    /// `S'`, the number of inherited standard-basis terms.
    #[must_use]
    pub fn standard_term_count(&self) -> usize {
        self.s_inh
    }

    /// Which standard evaluator family the inherited terms use.
    #[must_use]
    pub fn std_kind(&self) -> StdKind {
        self.std_kind
    }

    /// The encoded inherited argument vector.
    #[must_use]
    pub fn std_args(&self) -> &[i64] {
        &self.std_args
    }

    /// Returns the length-`S'` blended vector `q = B_combined^T p`.
    #[must_use]
    pub fn blend(&self, p: &[f64]) -> Vec<f64> {
        let mut q = vec![0.0_f64; self.s_inh];
        for (j, slot) in q.iter_mut().enumerate() {
            let rows = self.colsz[j];
            let mut acc = 0.0_f64;
            for (i, &pi) in p.iter().enumerate().take(rows) {
                acc += self.blend.get(i, j) * pi;
            }
            *slot = acc;
        }
        q
    }

    /// Evaluates the `S'` inherited standard terms at `xi_prime`.
    pub fn eval_standard<T: Float>(&self, xi_prime: &[T], out: &mut [T]) {
        standard::eval_standard(&self.std_args, xi_prime, out);
    }

    /// The field value `p^T B_combined phi'(xi')` at inherited coordinate
    /// `xi_prime`.
    #[must_use]
    pub fn eval(&self, p: &[f64], xi_prime: &[f64]) -> f64 {
        let mut phi = vec![0.0_f64; self.s_inh];
        self.eval_standard(xi_prime, &mut phi);
        let q = self.blend(p);
        q.iter().zip(&phi).map(|(a, b)| a * b).sum()
    }
}

/// Projects `basis` onto an inherited space of dimension `d_prime` through
/// `map`, or onto the first `d_prime` original coordinates unchanged when
/// `map` is `None` (the null-transformation convention of SPEC_FULL §4.4).
///
/// # Errors
///
/// Returns [`ProjectionError`] when the map is not one-to-one on a
/// polygon-coupled basis's coordinates, reorders a polygon pair, or
/// requests a polygon-radial-without-circumferential projection.
pub fn inherit(
    basis: &Basis,
    map: Option<&AffineMap>,
    d_prime: usize,
) -> Result<InheritedEvaluator, ProjectionError> {
    let dim = basis.descriptor().dimension();
    let owned;
    let effective = match map {
        Some(m) => m,
        None => {
            owned = AffineMap::identity(dim, d_prime);
            &owned
        }
    };
    debug_assert_eq!(effective.dim(), dim);

    if basis.std_kind() == StdKind::Polygon {
        polygon_path::inherit(basis, effective, d_prime)
    } else {
        monomial_path::inherit(basis, effective, d_prime)
    }
}
