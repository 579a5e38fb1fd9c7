//! Given a validated descriptor, builds the blending matrix, column
//! compaction metadata, and node/derivative tables of a [`Basis`]
//! (SPEC_FULL §4.3). `Basis` wraps [`build`]'s output; see `core::basis`.
//!
//! [`Basis`]: crate::core::basis::Basis

mod labels;
mod polygon_table;
mod tables;

use std::fmt;

use crate::core::descriptor::{Coupling, Descriptor, DescriptorError, RuleKind};
use crate::core::matrix::Matrix;
use crate::core::standard::{encode_polygon_first, encode_polygon_second, StdKind};

use labels::Label;

/// Failures reported by the builder, per SPEC_FULL §7.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildError {
    /// The descriptor itself failed validation; builds always validate
    /// first. In practice `Descriptor`'s constructors already reject
    /// invalid descriptors, so this variant is rarely observed — it exists
    /// so the error surface matches §7 exactly.
    Descriptor(DescriptorError),
    /// A coupling this crate's builder does not (yet) construct, e.g. a
    /// polygon pair whose two coordinates are not adjacent.
    UnsupportedCoupling { reason: String },
    /// Unable to allocate the blending matrix or argument vector. Modeled so
    /// the error surface matches the full failure taxonomy this crate's
    /// builder is specified against; in practice Rust's global allocator
    /// aborts the process on allocation failure rather than returning an
    /// error here, so this variant is unreachable in safe code.
    Allocation,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Descriptor(e) => write!(f, "basis build failed: {e}"),
            BuildError::UnsupportedCoupling { reason } => {
                write!(f, "basis build failed: unsupported coupling: {reason}")
            }
            BuildError::Allocation => write!(f, "basis build failed: allocation failure"),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<DescriptorError> for BuildError {
    fn from(e: DescriptorError) -> Self {
        BuildError::Descriptor(e)
    }
}

/// The output of [`build`]: everything a [`crate::core::basis::Basis`]
/// needs beyond the descriptor itself.
pub(crate) struct BasisData {
    pub(crate) m: usize,
    pub(crate) s: usize,
    pub(crate) blend: Matrix,
    pub(crate) colsz: Vec<usize>,
    pub(crate) node: Vec<usize>,
    pub(crate) deriv: Vec<u32>,
    pub(crate) std_kind: StdKind,
    pub(crate) std_args: Vec<i64>,
}

struct Factor {
    coord_start: usize,
    coord_len: usize,
    table: tables::RuleTable,
}

/// Walks the descriptor's coordinates left to right, consuming a simplex or
/// (adjacent) polygon group atomically at its lowest-indexed member.
fn gather_factors(descriptor: &Descriptor) -> Result<Vec<Factor>, BuildError> {
    let dim = descriptor.dimension();
    let mut factors = Vec::with_capacity(dim);
    let mut k = 0;
    while k < dim {
        match descriptor.coupling_at(k) {
            Coupling::Simplex { coords } => {
                let first = coords.iter().copied().min().unwrap_or(k);
                if first != k {
                    k += 1;
                    continue;
                }
                let order = usize::from(descriptor.rule_at(k) == RuleKind::QuadraticSimplex) + 1;
                factors.push(Factor {
                    coord_start: k,
                    coord_len: coords.len(),
                    table: tables::simplex_table(coords.len(), order),
                });
                k += coords.len();
            }
            Coupling::Polygon {
                circumferential,
                radial,
                vertices,
            } => {
                if circumferential != k {
                    k += 1;
                    continue;
                }
                if radial != k + 1 {
                    return Err(BuildError::UnsupportedCoupling {
                        reason: "polygon coordinates must be adjacent".to_owned(),
                    });
                }
                factors.push(Factor {
                    coord_start: k,
                    coord_len: 2,
                    table: polygon_table::polygon_table(vertices),
                });
                k += 2;
            }
            Coupling::None => {
                let table = match descriptor.rule_at(k) {
                    RuleKind::Constant => tables::constant_table(),
                    RuleKind::LinearLagrange => tables::lagrange(1),
                    RuleKind::QuadraticLagrange => tables::lagrange(2),
                    RuleKind::CubicLagrange => tables::lagrange(3),
                    RuleKind::CubicHermite => tables::cubic_hermite(),
                    RuleKind::LagrangeHermite => tables::lagrange_hermite(),
                    RuleKind::HermiteLagrange => tables::hermite_lagrange(),
                    // Unreachable for a validated descriptor: these kinds
                    // always carry a coupling. Fall back to the identity
                    // 1-function rule rather than panicking.
                    RuleKind::LinearSimplex | RuleKind::QuadraticSimplex | RuleKind::Polygon => {
                        tables::constant_table()
                    }
                };
                factors.push(Factor {
                    coord_start: k,
                    coord_len: 1,
                    table,
                });
                k += 1;
            }
        }
    }
    Ok(factors)
}

fn coordinate_monomial_order(descriptor: &Descriptor, k: usize) -> usize {
    match descriptor.coupling_at(k) {
        Coupling::Simplex { .. } => {
            usize::from(descriptor.rule_at(k) == RuleKind::QuadraticSimplex) + 1
        }
        _ => descriptor.rule_at(k).monomial_order().unwrap_or(0),
    }
}

fn build_std_args(descriptor: &Descriptor) -> Vec<i64> {
    let dim = descriptor.dimension();
    let mut args = Vec::with_capacity(dim + 1);
    args.push(dim as i64);
    for k in 0..dim {
        match descriptor.coupling_at(k) {
            Coupling::Polygon {
                circumferential,
                radial,
                ..
            } if k == circumferential => {
                args.push(encode_polygon_first(
                    radial - circumferential,
                    polygon_table::RADIAL_ORDER,
                    dim,
                ));
            }
            Coupling::Polygon { vertices, .. } => {
                args.push(encode_polygon_second(vertices));
            }
            _ => args.push(coordinate_monomial_order(descriptor, k) as i64),
        }
    }
    args
}

/// Builds a [`BasisData`] from a validated descriptor, per the algorithm of
/// SPEC_FULL §4.3.
pub(crate) fn build(descriptor: &Descriptor) -> Result<BasisData, BuildError> {
    let factors = gather_factors(descriptor)?;

    let mut blend = Matrix::from_rows(&[&[1.0]]);
    let mut labels: Vec<Label> = vec![Label::empty()];
    let mut deriv_bits: Vec<u32> = vec![0];

    for factor in &factors {
        let grown = factor.table.matrix.kron(&blend);
        let prev_rows = blend.rows();
        let mut new_labels = Vec::with_capacity(grown.rows());
        let mut new_deriv_bits = Vec::with_capacity(grown.rows());

        for a in 0..factor.table.matrix.rows() {
            for b in 0..prev_rows {
                new_labels.push(labels[b].extended(factor.table.node[a], factor.table.deriv[a]));
                let mut bits = deriv_bits[b];
                if factor.table.deriv[a] {
                    bits |= 1u32 << factor.coord_start;
                }
                new_deriv_bits.push(bits);
            }
        }

        blend = grown;
        labels = new_labels;
        deriv_bits = new_deriv_bits;
    }

    let mut order: Vec<usize> = (0..blend.rows()).collect();
    order.sort_by(|&i, &j| labels[i].cmp(&labels[j]));

    let sorted_blend = blend.permute_rows(&order);
    let sorted_deriv: Vec<u32> = order.iter().map(|&i| deriv_bits[i]).collect();
    let sorted_labels: Vec<&Label> = order.iter().map(|&i| &labels[i]).collect();

    let node = labels::assign_node_indices(&sorted_labels);
    let m = node.len();
    let colsz = sorted_blend.column_sizes();

    let std_kind = if descriptor.polygon_group().is_some() {
        StdKind::Polygon
    } else {
        StdKind::Monomial
    };
    let std_args = build_std_args(descriptor);
    debug_assert_eq!(crate::core::standard::term_count(&std_args), sorted_blend.cols());

    Ok(BasisData {
        m,
        s: sorted_blend.cols(),
        blend: sorted_blend,
        colsz,
        node,
        deriv: sorted_deriv,
        std_kind,
        std_args,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn linear_lagrange_matches_seed_scenario() {
        let d: Descriptor = "l.Lagrange".parse().unwrap();
        let data = build(&d).unwrap();
        assert_eq!(data.m, 2);
        assert_eq!(data.s, 2);
        assert_eq!(data.node, vec![0, 1]);
        assert_eq!(data.deriv, vec![0, 0]);
        assert_eq!(data.blend.get(0, 0), 1.0);
        assert_eq!(data.blend.get(0, 1), -1.0);
        assert_eq!(data.blend.get(1, 1), 1.0);
    }

    #[test]
    fn cubic_hermite_has_four_derivative_tagged_rows() {
        let d: Descriptor = "c.Hermite".parse().unwrap();
        let data = build(&d).unwrap();
        assert_eq!(data.m, 4);
        assert_eq!(data.node, vec![0, 0, 1, 1]);
        assert_eq!(data.deriv, vec![0, 1, 0, 1]);
    }

    #[test]
    fn bilinear_lagrange_has_four_nodes_and_terms() {
        let d: Descriptor = "l.Lagrange*l.Lagrange".parse().unwrap();
        let data = build(&d).unwrap();
        assert_eq!(data.m, 4);
        assert_eq!(data.s, 4);
        assert_eq!(data.node, vec![0, 1, 2, 3]);
    }

    #[test]
    fn linear_simplex_2d_has_three_nodes() {
        let d: Descriptor = "l.simplex(2)*l.simplex".parse().unwrap();
        let data = build(&d).unwrap();
        assert_eq!(data.m, 3);
        assert_eq!(data.s, 4);
    }

    #[test]
    fn polygon_pentagon_has_six_nodes() {
        let d: Descriptor = "polygon(5;2)*polygon".parse().unwrap();
        let data = build(&d).unwrap();
        assert_eq!(data.m, 6);
        assert_eq!(data.s, 20);
        assert_eq!(data.std_kind, StdKind::Polygon);
    }
}
