//! The built artifact: blending matrix plus node/derivative/evaluator
//! metadata for one descriptor (SPEC_FULL §3, §4.3, §6).

use std::ops::Range;

use num_traits::Float;

use crate::core::builder::{self, BuildError};
use crate::core::descriptor::Descriptor;
use crate::core::matrix::Matrix;
use crate::core::standard::{self, StdKind};

/// A built basis: descriptor plus the blending matrix and the metadata
/// needed to evaluate it. Immutable after construction; cheaply shared via
/// `Arc` by the registry.
#[derive(Debug)]
pub struct Basis {
    descriptor: Descriptor,
    m: usize,
    s: usize,
    blend: Matrix,
    colsz: Vec<usize>,
    node: Vec<usize>,
    deriv: Vec<u32>,
    std_kind: StdKind,
    std_args: Vec<i64>,
}

impl Basis {
    pub(crate) fn build(descriptor: Descriptor) -> Result<Self, BuildError> {
        let data = builder::build(&descriptor)?;
        Ok(Basis {
            descriptor,
            m: data.m,
            s: data.s,
            blend: data.blend,
            colsz: data.colsz,
            node: data.node,
            deriv: data.deriv,
            std_kind: data.std_kind,
            std_args: data.std_args,
        })
    }

    /// The descriptor this basis was built from.
    #[must_use]
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// `M`, the number of basis functions (element parameters).
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.m
    }

    /// `S`, the number of standard-basis terms.
    #[must_use]
    pub fn standard_term_count(&self) -> usize {
        self.s
    }

    /// Which standard evaluator family this basis uses.
    #[must_use]
    pub fn std_kind(&self) -> StdKind {
        self.std_kind
    }

    /// The encoded argument vector consumed by the standard evaluator.
    #[must_use]
    pub fn std_args(&self) -> &[i64] {
        &self.std_args
    }

    /// The local node index of basis function `m`.
    #[must_use]
    pub fn parameter_node(&self, m: usize) -> usize {
        self.node[m]
    }

    /// The derivative bitmask of basis function `m`: bit `k` set means a
    /// derivative with respect to parametric coordinate `k`.
    #[must_use]
    pub fn parameter_derivative(&self, m: usize) -> u32 {
        self.deriv[m]
    }

    /// The contiguous range of parameter indices belonging to `node_index`,
    /// per the original `get_basis_node_function_number_limit` query.
    #[must_use]
    pub fn functions_for_node(&self, node_index: usize) -> Range<usize> {
        let start = self.node.partition_point(|&n| n < node_index);
        let end = self.node.partition_point(|&n| n <= node_index);
        start..end
    }

    /// Number of basis functions attached to `node_index`.
    #[must_use]
    pub fn parameter_count_for_node(&self, node_index: usize) -> usize {
        self.functions_for_node(node_index).len()
    }

    /// Returns the length-`S` blended vector `q = Bᵀ p`, truncating each
    /// column's dot product at `colsz[j]`. Accumulates in `f64` regardless
    /// of the matrix's own storage precision, per §4.3's accumulation
    /// policy.
    #[must_use]
    pub fn blend(&self, p: &[f64]) -> Vec<f64> {
        let mut q = vec![0.0_f64; self.s];
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

    /// Evaluates the `S` standard terms at parametric coordinate `xi`.
    pub fn eval_standard<T: Float>(&self, xi: &[T], out: &mut [T]) {
        standard::eval_standard(&self.std_args, xi, out);
    }

    /// The field value `pᵀ · B · φ(ξ)` at parametric coordinate `xi`.
    #[must_use]
    pub fn eval(&self, p: &[f64], xi: &[f64]) -> f64 {
        let mut phi = vec![0.0_f64; self.s];
        self.eval_standard(xi, &mut phi);
        let q = self.blend(p);
        q.iter().zip(&phi).map(|(a, b)| a * b).sum()
    }

    pub(crate) fn blend_matrix(&self) -> &Matrix {
        &self.blend
    }

    pub(crate) fn column_sizes(&self) -> &[usize] {
        &self.colsz
    }
}

#[cfg(feature = "parallel")]
impl Basis {
    /// Batch form of [`Basis::blend`] for many element-parameter vectors.
    #[must_use]
    pub fn blend_many(&self, ps: &[Vec<f64>]) -> Vec<Vec<f64>> {
        use rayon::prelude::*;
        ps.par_iter().map(|p| self.blend(p)).collect()
    }

    /// Batch form of [`Basis::eval_standard`] for many parametric
    /// coordinates, useful when evaluating at every quadrature point of an
    /// element.
    #[must_use]
    pub fn eval_standard_many(&self, xis: &[Vec<f64>]) -> Vec<Vec<f64>> {
        use rayon::prelude::*;
        xis.par_iter()
            .map(|xi| {
                let mut out = vec![0.0_f64; self.s];
                self.eval_standard(xi, &mut out);
                out
            })
            .collect()
    }
}
