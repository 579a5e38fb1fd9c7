//! Polygon-path projection (SPEC_FULL §4.4): used whenever the original
//! basis is polygon-coupled. Restricted to transformations that are
//! one-to-one on coordinates: every original coordinate either passes
//! through unchanged to a single inherited coordinate (in its original
//! relative order) or is projected out to a fixed value. The polygon pair
//! itself is only supported when both members pass through together —
//! projecting out just one of the pair has no worked scenario to ground an
//! implementation against and is reported as unsupported rather than
//! guessed.

use crate::core::basis::Basis;
use crate::core::inherit::{AffineMap, InheritedEvaluator, ProjectionError};
use crate::core::matrix::Matrix;
use crate::core::standard::{classify, encode_polygon_first, encode_polygon_second, CoordRole, StdKind};

enum Retain {
    To(usize),
    Fixed(f64),
}

fn classify_retention(
    map: &AffineMap,
    dim: usize,
    d_prime: usize,
) -> Result<Vec<Retain>, ProjectionError> {
    let mut retain = Vec::with_capacity(dim);
    for k in 0..dim {
        let nonzero: Vec<usize> = (0..d_prime).filter(|&j| map.coeffs_at(k, j) != 0.0).collect();
        match nonzero.as_slice() {
            [] => retain.push(Retain::Fixed(map.offset_at(k))),
            [j] if map.coeffs_at(k, *j) == 1.0 && map.offset_at(k) == 0.0 => {
                retain.push(Retain::To(*j));
            }
            _ => {
                return Err(ProjectionError::Invalid {
                    reason: "polygon-coupled basis requires an axis-aligned retain-or-fix coordinate map"
                        .to_owned(),
                })
            }
        }
    }
    Ok(retain)
}

fn check_no_reordering(retain: &[Retain], d_prime: usize) -> Result<(), ProjectionError> {
    let mut source: Vec<Option<usize>> = vec![None; d_prime];
    for (k, r) in retain.iter().enumerate() {
        if let Retain::To(j) = r {
            if source[*j].is_some() {
                return Err(ProjectionError::Invalid {
                    reason: "two original coordinates map to the same inherited coordinate".to_owned(),
                });
            }
            source[*j] = Some(k);
        }
    }
    if source.iter().any(Option::is_none) {
        return Err(ProjectionError::Invalid {
            reason: "every inherited coordinate must have a source original coordinate".to_owned(),
        });
    }
    let sources: Vec<usize> = source.into_iter().flatten().collect();
    if !sources.windows(2).all(|w| w[0] < w[1]) {
        return Err(ProjectionError::Invalid {
            reason: "polygon member reordering is not supported".to_owned(),
        });
    }
    Ok(())
}

enum Block {
    Monomial { coord: usize, order: usize },
    Polygon { circ: usize, rad: usize, vertices: u32, radial_order: usize },
}

fn blocks(std_args: &[i64], dim: usize) -> Vec<Block> {
    let mut out = Vec::new();
    let mut k = 0;
    while k < dim {
        match classify(std_args, k) {
            CoordRole::Monomial { order } => {
                out.push(Block::Monomial { coord: k, order });
                k += 1;
            }
            CoordRole::PolygonFirst { delta, radial_order } => {
                let rad = k + delta;
                let vertices = match classify(std_args, rad) {
                    CoordRole::PolygonSecond { vertices } => vertices,
                    _ => 0,
                };
                out.push(Block::Polygon { circ: k, rad, vertices, radial_order });
                k += 1;
            }
            CoordRole::PolygonSecond { .. } => k += 1,
        }
    }
    out
}

pub(crate) fn inherit(
    basis: &Basis,
    map: &AffineMap,
    d_prime: usize,
) -> Result<InheritedEvaluator, ProjectionError> {
    let dim = basis.descriptor().dimension();
    let retain = classify_retention(map, dim, d_prime)?;
    check_no_reordering(&retain, d_prime)?;

    if let Some((circ, rad, _)) = basis.descriptor().polygon_group() {
        match (&retain[circ], &retain[rad]) {
            (Retain::To(jc), Retain::To(jr)) => {
                if *jr != jc + 1 {
                    return Err(ProjectionError::Invalid {
                        reason: "polygon members would be reordered".to_owned(),
                    });
                }
            }
            (Retain::To(_), Retain::Fixed(_)) => {
                return Err(ProjectionError::Unsupported {
                    reason: "projecting out the radial polygon coordinate while keeping the \
                             circumferential one is not supported"
                        .to_owned(),
                });
            }
            (Retain::Fixed(_), _) => {
                return Err(ProjectionError::Unsupported {
                    reason: "projecting out the circumferential polygon coordinate is not supported"
                        .to_owned(),
                });
            }
        }
    }

    let std_args = basis.std_args();
    let original_blocks = blocks(std_args, dim);

    let mut std_args_inh = vec![0i64; d_prime + 1];
    std_args_inh[0] = d_prime as i64;
    for block in &original_blocks {
        match *block {
            Block::Monomial { coord, order } => {
                if let Retain::To(j) = retain[coord] {
                    std_args_inh[j + 1] = order as i64;
                }
            }
            Block::Polygon { circ, rad, vertices, radial_order } => {
                if let (Retain::To(jc), Retain::To(jr)) = (&retain[circ], &retain[rad]) {
                    std_args_inh[jc + 1] = encode_polygon_first(jr - jc, radial_order, d_prime);
                    std_args_inh[jr + 1] = encode_polygon_second(vertices);
                }
            }
        }
    }

    let blend_matrix = basis.blend_matrix();
    let m = blend_matrix.rows();
    let s_inh = crate::core::standard::term_count(&std_args_inh);
    let mut comb = Matrix::zeros(m, s_inh);

    for row in 0..m {
        for col in 0..basis.standard_term_count() {
            let bval = blend_matrix.get(row, col);
            if bval == 0.0 {
                continue;
            }
            let (inh_col, factor) = relocate(col, &original_blocks, &retain);
            comb.add_to(row, inh_col, bval * factor);
        }
    }

    Ok(InheritedEvaluator::new(m, comb, StdKind::Polygon, std_args_inh))
}

/// Decomposes original standard-term position `pos` into its per-block
/// sub-index. Retained blocks keep their sub-index and relocate into the
/// inherited mixed-radix axis (blocks are visited in original-coordinate
/// order, which — reordering having been rejected already — matches
/// increasing inherited-coordinate order); projected-out monomial blocks
/// contribute a scalar multiplier (the fixed value raised to that block's
/// power) and vanish from the inherited axis.
fn relocate(pos: usize, blocks: &[Block], retain: &[Retain]) -> (usize, f64) {
    let mut rem = pos;
    let mut factor = 1.0_f64;
    let mut inh_indices: Vec<(usize, usize)> = Vec::new();

    for block in blocks {
        match *block {
            Block::Monomial { coord, order } => {
                let width = order + 1;
                let idx = rem % width;
                rem /= width;
                match retain[coord] {
                    Retain::To(_) => inh_indices.push((width, idx)),
                    Retain::Fixed(b) => factor *= b.powi(idx as i32),
                }
            }
            Block::Polygon { circ, rad: _, vertices, radial_order } => {
                let width = vertices as usize * 2 * (radial_order + 1);
                let idx = rem % width;
                rem /= width;
                if matches!(retain[circ], Retain::To(_)) {
                    inh_indices.push((width, idx));
                }
            }
        }
    }

    let mut flat = 0usize;
    let mut stride = 1usize;
    for (width, idx) in inh_indices {
        flat += idx * stride;
        stride *= width;
    }
    (flat, factor)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::core::descriptor::Descriptor;
    use crate::core::inherit::inherit as top_inherit;

    #[test]
    fn both_polygon_members_retained_is_identity() {
        let d: Descriptor = "polygon(5;2)*polygon".parse().unwrap();
        let basis = Basis::build(d).unwrap();
        let inherited = top_inherit(&basis, None, 2).unwrap();
        assert_eq!(inherited.standard_term_count(), basis.standard_term_count());
    }

    #[test]
    fn projecting_out_radial_is_unsupported() {
        let d: Descriptor = "polygon(5;2)*polygon".parse().unwrap();
        let basis = Basis::build(d).unwrap();
        let map = AffineMap::new(vec![0.0, 0.3], vec![vec![1.0], vec![0.0]]);
        let err = top_inherit(&basis, Some(&map), 1).unwrap_err();
        assert!(matches!(err, ProjectionError::Unsupported { .. }));
    }
}
