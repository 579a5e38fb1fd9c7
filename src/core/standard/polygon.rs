//! Polygon evaluator: a piecewise circumferential factor times a radial
//! monomial factor, combined into one joint standard-term block per wedge
//! (SPEC_FULL §4.2).

use num_traits::{Float, ToPrimitive};

/// The `vertices * 2 * (radial_order + 1)` joint block for a polygon pair.
/// Only the active wedge (selected by `floor(vertices * frac(xi_circ))`)
/// contributes non-zero entries; all other wedges evaluate to zero, which
/// is what makes the builder's per-wedge blending rows compose correctly.
pub(super) fn joint_block<T: Float>(
    vertices: u32,
    radial_order: usize,
    xi_circ: T,
    xi_radial: T,
) -> Vec<T> {
    let v = vertices as usize;
    let block_per_wedge = 2 * (radial_order + 1);
    let width = v * block_per_wedge;
    let mut out = vec![T::zero(); width];
    if v == 0 {
        return out;
    }

    let frac = xi_circ - xi_circ.floor();
    let vf = T::from(v).unwrap_or_else(T::zero);
    let scaled = vf * frac;
    let raw_j = scaled.floor().to_usize().unwrap_or(v);
    // The last boundary (xi_circ wrapping exactly to 1) collapses back to
    // wedge 0, per SPEC_FULL §4.2/§9.
    let (j, t) = if raw_j >= v {
        (0, T::zero())
    } else {
        (raw_j, scaled - T::from(raw_j).unwrap_or_else(T::zero))
    };

    let mut r_pow = T::one();
    for p in 0..=radial_order {
        let base = j * block_per_wedge + p * 2;
        out[base] = r_pow;
        out[base + 1] = r_pow * t;
        r_pow = r_pow * xi_radial;
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn only_active_wedge_is_non_zero() {
        let block = joint_block(5u32, 1, 0.45_f64, 0.5);
        // wedge 2 of 5 spans [0.4, 0.6); 0.45 -> t = 0.25
        let expected_base = 2 * 4;
        for (i, &value) in block.iter().enumerate() {
            if i < expected_base || i >= expected_base + 4 {
                assert_eq!(value, 0.0, "wedge outside the active one must be zero");
            }
        }
        assert_eq!(block[expected_base], 1.0);
        assert_eq!(block[expected_base + 1], 0.25);
        assert_eq!(block[expected_base + 2], 0.5);
        assert_eq!(block[expected_base + 3], 0.125);
    }

    #[test]
    fn boundary_wraps_to_wedge_zero() {
        let block = joint_block(4u32, 1, 1.0_f64, 1.0);
        assert_eq!(block[0], 1.0);
        assert_eq!(block[1], 0.0);
    }
}
