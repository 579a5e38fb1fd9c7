//! Standard basis evaluators: pure functions of `(args, coordinate) -> values`.
//!
//! `args` is the encoded argument vector described in SPEC_FULL §4.2/§4.3
//! invariant 6: `args[0]` is the parametric dimension, and each remaining
//! entry is either a non-negative monomial order or one half of a
//! negative-encoded polygon pair. [`classify`] is the only place that reads
//! the sign/parity of an entry; every other component asks it for a
//! [`CoordRole`] instead of branching on the encoding itself.

mod monomial;
mod polygon;

use num_traits::Float;

/// Which standard evaluator family a basis uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StdKind {
    Monomial,
    Polygon,
}

/// The role a coordinate plays in the standard-term argument encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CoordRole {
    Monomial { order: usize },
    PolygonFirst { delta: usize, radial_order: usize },
    PolygonSecond { vertices: u32 },
}

/// Decodes the role of coordinate `k` from the standard-term argument
/// vector. `args[0]` is the dimension; `args[k+1]` is the entry for
/// coordinate `k`.
pub(crate) fn classify(args: &[i64], k: usize) -> CoordRole {
    let a = args[k + 1];
    if a >= 0 {
        return CoordRole::Monomial { order: a as usize };
    }
    if a % 2 != 0 {
        let dim = args[0];
        let combined = (-a - 1) / 2;
        CoordRole::PolygonFirst {
            delta: (combined % dim) as usize,
            radial_order: (combined / dim) as usize,
        }
    } else {
        CoordRole::PolygonSecond {
            vertices: (-a / 2) as u32,
        }
    }
}

/// Encodes the circumferential ("first") half of a polygon pair.
pub(crate) fn encode_polygon_first(delta: usize, radial_order: usize, dim: usize) -> i64 {
    let combined = delta as i64 + radial_order as i64 * dim as i64;
    -(1 + 2 * combined)
}

/// Encodes the radial ("second") half of a polygon pair.
pub(crate) fn encode_polygon_second(vertices: u32) -> i64 {
    -2 * i64::from(vertices)
}

/// Total number of standard terms `S` implied by an argument vector.
pub(crate) fn term_count(args: &[i64]) -> usize {
    let dim = args[0] as usize;
    let mut s = 1usize;
    for k in 0..dim {
        match classify(args, k) {
            CoordRole::Monomial { order } => s *= order + 1,
            CoordRole::PolygonFirst { delta, radial_order } => {
                let vertices = match classify(args, k + delta) {
                    CoordRole::PolygonSecond { vertices } => vertices,
                    _ => 0,
                };
                s *= vertices as usize * 2 * (radial_order + 1);
            }
            CoordRole::PolygonSecond { .. } => {}
        }
    }
    s
}

/// Evaluates the `S` standard terms at parametric coordinate `coord`,
/// writing into `out` (which must have length `term_count(args)`). Pure and
/// infallible: the basis that owns `args` was validated at build time.
pub(crate) fn eval_standard<T: Float>(args: &[i64], coord: &[T], out: &mut [T]) {
    let dim = args[0] as usize;

    // Each block is a standard-term factor in coordinate order; a polygon
    // pair contributes one joint block spanning both its coordinates.
    let mut blocks: Vec<Vec<T>> = Vec::with_capacity(dim);
    let mut k = 0;
    while k < dim {
        match classify(args, k) {
            CoordRole::Monomial { order } => {
                blocks.push(monomial::powers(order, coord[k]));
                k += 1;
            }
            CoordRole::PolygonFirst { delta, radial_order } => {
                let rad_k = k + delta;
                let vertices = match classify(args, rad_k) {
                    CoordRole::PolygonSecond { vertices } => vertices,
                    _ => 0,
                };
                blocks.push(polygon::joint_block(vertices, radial_order, coord[k], coord[rad_k]));
                k += 1;
            }
            CoordRole::PolygonSecond { .. } => {
                k += 1;
            }
        }
    }

    let s: usize = blocks.iter().map(Vec::len).product();
    debug_assert_eq!(out.len(), s);

    for (pos, slot) in out.iter_mut().enumerate() {
        let mut rem = pos;
        let mut value = T::one();
        for block in &blocks {
            let width = block.len();
            let idx = rem % width;
            rem /= width;
            value = value * block[idx];
        }
        *slot = value;
    }
}

/// Exposes the polygon joint-block evaluator to other modules' tests
/// without making the internal encoding public.
#[cfg(test)]
pub(crate) mod test_support {
    pub(crate) fn polygon_joint(vertices: u32, radial_order: usize, circ: f64, radial: f64) -> Vec<f64> {
        super::polygon::joint_block(vertices, radial_order, circ, radial)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn monomial_roundtrip_classify() {
        let args = [2i64, 3, 2];
        assert_eq!(classify(&args, 0), CoordRole::Monomial { order: 3 });
        assert_eq!(classify(&args, 1), CoordRole::Monomial { order: 2 });
        assert_eq!(term_count(&args), 4 * 3);
    }

    #[test]
    fn polygon_encoding_roundtrips_through_classify() {
        let dim = 2usize;
        let first = encode_polygon_first(1, 1, dim);
        let second = encode_polygon_second(5);
        let args = [dim as i64, first, second];
        match classify(&args, 0) {
            CoordRole::PolygonFirst { delta, radial_order } => {
                assert_eq!(delta, 1);
                assert_eq!(radial_order, 1);
            }
            other => panic!("unexpected role {other:?}"),
        }
        match classify(&args, 1) {
            CoordRole::PolygonSecond { vertices } => assert_eq!(vertices, 5),
            other => panic!("unexpected role {other:?}"),
        }
        assert_eq!(term_count(&args), 5 * 2 * 2);
    }

    #[test]
    fn eval_standard_matches_monomial_formula() {
        let args = [2i64, 1, 1];
        let coord = [0.25_f64, 0.75];
        let mut out = vec![0.0; term_count(&args)];
        eval_standard(&args, &coord, &mut out);
        // coordinate 1 varies fastest: [1, xi1, xi2, xi1*xi2]
        assert_eq!(out, vec![1.0, 0.25, 0.75, 0.1875]);
    }
}
