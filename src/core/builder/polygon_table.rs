//! On-the-fly polygon blending matrix construction (SPEC_FULL §4.3 step 2).
//!
//! The polygon rule always uses a fixed radial order of 1 (a linear ramp
//! from centre to rim): this keeps the node count at `V + 1` (one centre,
//! `V` rim nodes) matching the `(V+1) x 4V` shape named explicitly in
//! SPEC_FULL §4.3. The standard evaluator (`core::standard::polygon`)
//! supports a general radial order for fidelity to the encoding in §4.2,
//! but the builder only ever requests order 1; see DESIGN.md.

use crate::core::builder::tables::RuleTable;
use crate::core::matrix::Matrix;

/// Fixed radial order used by every polygon rule this crate builds.
pub(crate) const RADIAL_ORDER: usize = 1;

/// Builds the `(V+1) x 4V` polygon blending matrix: row 0 is the centre
/// node, rows `1..=V` are the rim nodes in circumferential order.
///
/// Layout of the `4V`-wide standard-term axis matches
/// `core::standard::polygon::joint_block`: for wedge `j`, radial power `p`
/// and circumferential side `s`, column index is `j*4 + p*2 + s`.
pub(crate) fn polygon_table(vertices: u32) -> RuleTable {
    let v = vertices as usize;
    let width = v * 2 * (RADIAL_ORDER + 1);
    let mut matrix = Matrix::zeros(v + 1, width);

    let col = |j: usize, p: usize, s: usize| j * 2 * (RADIAL_ORDER + 1) + p * 2 + s;

    // Centre node: (1 - r), independent of the circumferential position.
    for j in 0..v {
        matrix.add_to(0, col(j, 0, 0), 1.0);
        matrix.add_to(0, col(j, 1, 0), -1.0);
    }

    // Rim node `vertex` (row `vertex + 1`): shared hat function between the
    // wedge starting at `vertex` and the wedge ending at `vertex`.
    for vertex in 0..v {
        let row = vertex + 1;
        matrix.add_to(row, col(vertex, 1, 0), 1.0);
        matrix.add_to(row, col(vertex, 1, 1), -1.0);
        let prev = (vertex + v - 1) % v;
        matrix.add_to(row, col(prev, 1, 1), 1.0);
    }

    let mut node = vec![0usize; v + 1];
    for (i, slot) in node.iter_mut().enumerate() {
        *slot = i;
    }

    RuleTable {
        matrix,
        deriv: vec![false; v + 1],
        node,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::core::standard::test_support::polygon_joint;

    fn blend(table: &RuleTable, row: usize, phi: &[f64]) -> f64 {
        (0..table.matrix.cols()).map(|c| table.matrix.get(row, c) * phi[c]).sum()
    }

    #[test]
    fn partition_of_unity_holds_for_pentagon() {
        let table = polygon_table(5);
        assert_eq!((table.matrix.rows(), table.matrix.cols()), (6, 20));

        for &(circ, radial) in &[(0.05_f64, 0.0), (0.45, 0.3), (0.99, 1.0), (0.5, 1.0)] {
            let phi = polygon_joint(5, RADIAL_ORDER, circ, radial);
            let sum: f64 = (0..table.matrix.rows()).map(|r| blend(&table, r, &phi)).sum();
            assert!((sum - 1.0).abs() < 1e-9, "sum at ({circ},{radial}) = {sum}");
        }
    }

    #[test]
    fn centre_value_is_one_at_radius_zero() {
        let table = polygon_table(5);
        let phi = polygon_joint(5, RADIAL_ORDER, 0.37, 0.0);
        assert!((blend(&table, 0, &phi) - 1.0).abs() < 1e-9);
        for r in 1..table.matrix.rows() {
            assert!(blend(&table, r, &phi).abs() < 1e-9);
        }
    }
}
