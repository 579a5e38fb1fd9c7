//! Monomial-path expansion (SPEC_FULL §4.4): used whenever the original
//! basis carries no polygon coupling. Each original coordinate's monomial
//! factor is substituted with its affine expansion in the inherited
//! coordinates and the results are multiplied out, truncated to each
//! inherited coordinate's own order.

use crate::core::basis::Basis;
use crate::core::inherit::{AffineMap, InheritedEvaluator, ProjectionError};
use crate::core::matrix::Matrix;
use crate::core::poly::Ring;
use crate::core::standard::{classify, CoordRole, StdKind};

pub(crate) fn inherit(
    basis: &Basis,
    map: &AffineMap,
    d_prime: usize,
) -> Result<InheritedEvaluator, ProjectionError> {
    let dim = basis.descriptor().dimension();
    let std_args = basis.std_args();

    let orders: Vec<usize> = (0..dim)
        .map(|k| match classify(std_args, k) {
            CoordRole::Monomial { order } => order,
            // Unreachable: the caller only takes this path for non-polygon
            // bases, so every coordinate classifies as a monomial.
            CoordRole::PolygonFirst { .. } | CoordRole::PolygonSecond { .. } => 0,
        })
        .collect();

    let mut inh_orders = vec![0usize; d_prime];
    for (k, order) in orders.iter().enumerate() {
        for (j, inh_order) in inh_orders.iter_mut().enumerate() {
            if map.coeffs_at(k, j) != 0.0 {
                *inh_order = (*inh_order).max(*order);
            }
        }
    }

    let ring = Ring::new(inh_orders.clone());
    let s_inh = ring.len();

    let mut pow_polys: Vec<Vec<Vec<f64>>> = Vec::with_capacity(dim);
    for (k, &order) in orders.iter().enumerate() {
        let linear = ring.affine_linear(map.offset_at(k), map.coeffs_row(k));
        let mut powers = Vec::with_capacity(order + 1);
        powers.push(ring.constant(1.0));
        for p in 1..=order {
            let next = ring.mul(&powers[p - 1], &linear);
            powers.push(next);
        }
        pow_polys.push(powers);
    }

    let s = basis.standard_term_count();
    let mut e_rows: Vec<Vec<f64>> = Vec::with_capacity(s);
    for pos in 0..s {
        let mut rem = pos;
        let mut row = ring.constant(1.0);
        for (k, &order) in orders.iter().enumerate() {
            let width = order + 1;
            let idx = rem % width;
            rem /= width;
            row = ring.mul(&row, &pow_polys[k][idx]);
        }
        e_rows.push(row);
    }

    let blend_matrix = basis.blend_matrix();
    let m = blend_matrix.rows();
    let mut comb = Matrix::zeros(m, s_inh);
    for row in 0..m {
        for (pos, erow) in e_rows.iter().enumerate() {
            let bval = blend_matrix.get(row, pos);
            if bval == 0.0 {
                continue;
            }
            for (col, &ev) in erow.iter().enumerate() {
                if ev != 0.0 {
                    comb.add_to(row, col, bval * ev);
                }
            }
        }
    }

    let mut std_args_inh = Vec::with_capacity(d_prime + 1);
    std_args_inh.push(d_prime as i64);
    for &order in &inh_orders {
        std_args_inh.push(order as i64);
    }

    Ok(InheritedEvaluator::new(m, comb, StdKind::Monomial, std_args_inh))
}
