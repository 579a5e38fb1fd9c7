//! Canonical, comparable representation of a basis descriptor.

mod format;
mod parse;

use std::fmt;
use std::str::FromStr;

/// The one-dimensional rule attached to a parametric coordinate.
///
/// Variants are ordered to match the tag numbering used for canonical
/// comparison (`RuleKind as i64` is the tag stored on the diagonal of the
/// descriptor's relation table).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum RuleKind {
    Constant = 0,
    LinearLagrange = 1,
    QuadraticLagrange = 2,
    CubicLagrange = 3,
    CubicHermite = 4,
    LagrangeHermite = 5,
    HermiteLagrange = 6,
    LinearSimplex = 7,
    QuadraticSimplex = 8,
    Polygon = 9,
}

impl RuleKind {
    pub(crate) fn tag(self) -> i64 {
        self as i64
    }

    /// Number of element parameters ("nodes × functions per node") this rule
    /// contributes when not part of a simplex or polygon coupling.
    pub(crate) fn plain_function_count(self) -> Option<usize> {
        match self {
            RuleKind::Constant => Some(1),
            RuleKind::LinearLagrange => Some(2),
            RuleKind::QuadraticLagrange => Some(3),
            RuleKind::CubicLagrange => Some(4),
            RuleKind::CubicHermite => Some(4),
            RuleKind::LagrangeHermite => Some(3),
            RuleKind::HermiteLagrange => Some(3),
            RuleKind::LinearSimplex | RuleKind::QuadraticSimplex | RuleKind::Polygon => None,
        }
    }

    /// Standard monomial order contributed by this rule on its own
    /// coordinate (one less than the number of standard terms).
    pub(crate) fn monomial_order(self) -> Option<usize> {
        match self {
            RuleKind::Constant => Some(0),
            RuleKind::LinearLagrange => Some(1),
            RuleKind::QuadraticLagrange => Some(2),
            RuleKind::CubicLagrange => Some(3),
            RuleKind::CubicHermite => Some(3),
            RuleKind::LagrangeHermite => Some(2),
            RuleKind::HermiteLagrange => Some(2),
            RuleKind::LinearSimplex | RuleKind::QuadraticSimplex | RuleKind::Polygon => None,
        }
    }

    fn is_linearish(self) -> bool {
        matches!(
            self,
            RuleKind::Constant | RuleKind::LinearLagrange | RuleKind::LinearSimplex
        )
    }
}

/// A coupling between two or more coordinates that is not a plain
/// tensor-product factor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Coupling {
    /// No coupling: the coordinate is an independent tensor-product factor.
    None,
    /// A simplex group: `coords` holds the 0-based coordinate indices,
    /// sorted and contiguous.
    Simplex { coords: Vec<usize> },
    /// A polygon pair: `circumferential` is the 0-based index of the
    /// circumferential coordinate, `radial` the 0-based index of its
    /// partner, `vertices` the vertex count (>=3).
    Polygon {
        circumferential: usize,
        radial: usize,
        vertices: u32,
    },
}

/// Canonical descriptor of a basis: a parametric dimension plus, per
/// coordinate, a 1-D rule and an optional non-tensor-product coupling.
///
/// Descriptors are totally ordered by the lexicographic comparison of their
/// flattened upper-triangular relation table (dimension first), per the
/// canonical ordering used by the basis registry.
#[derive(Clone, Debug)]
pub struct Descriptor {
    dim: usize,
    diag: Vec<RuleKind>,
    simplex: Option<(Vec<usize>, RuleKind)>,
    polygon: Option<(usize, usize, u32)>,
}

/// Errors describing why a textual or structural descriptor is invalid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DescriptorError {
    /// An unrecognised 1-D rule token appeared at the given coordinate.
    InvalidTag { coordinate: usize, token: String },
    /// A simplex or polygon coupling was malformed: non-contiguous members,
    /// disagreeing inner kinds, a missing partner, too few polygon
    /// vertices, or a coordinate claimed by more than one coupling.
    InvalidCoupling { reason: String },
    /// The descriptor text could not be parsed at all.
    Parse { message: String },
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::InvalidTag { coordinate, token } => write!(
                f,
                "unrecognised basis rule token {token:?} at coordinate {coordinate}"
            ),
            DescriptorError::InvalidCoupling { reason } => {
                write!(f, "invalid coordinate coupling: {reason}")
            }
            DescriptorError::Parse { message } => {
                write!(f, "could not parse basis descriptor: {message}")
            }
        }
    }
}

impl std::error::Error for DescriptorError {}

impl Descriptor {
    /// Builds a descriptor from its diagonal rule kinds and couplings,
    /// validating it before returning.
    pub(crate) fn new(
        diag: Vec<RuleKind>,
        simplex: Option<(Vec<usize>, RuleKind)>,
        polygon: Option<(usize, usize, u32)>,
    ) -> Result<Self, DescriptorError> {
        let dim = diag.len();
        let d = Descriptor {
            dim,
            diag,
            simplex,
            polygon,
        };
        d.validate()?;
        Ok(d)
    }

    /// Parametric dimension `D`.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// The 1-D rule at coordinate `k` (0-based).
    #[must_use]
    pub fn rule_at(&self, k: usize) -> RuleKind {
        self.diag[k]
    }

    /// The coupling, if any, that coordinate `k` (0-based) participates in.
    #[must_use]
    pub fn coupling_at(&self, k: usize) -> Coupling {
        if let Some((coords, _)) = &self.simplex {
            if coords.contains(&k) {
                return Coupling::Simplex {
                    coords: coords.clone(),
                };
            }
        }
        if let Some((circ, rad, v)) = self.polygon {
            if k == circ || k == rad {
                return Coupling::Polygon {
                    circumferential: circ,
                    radial: rad,
                    vertices: v,
                };
            }
        }
        Coupling::None
    }

    pub(crate) fn simplex_group(&self) -> Option<&(Vec<usize>, RuleKind)> {
        self.simplex.as_ref()
    }

    pub(crate) fn polygon_group(&self) -> Option<(usize, usize, u32)> {
        self.polygon
    }

    /// True if any coordinate uses a rule more complex than constant, linear
    /// Lagrange, or linear simplex — i.e. the basis is not piecewise-linear.
    #[must_use]
    pub fn is_non_linear(&self) -> bool {
        self.diag.iter().any(|k| !k.is_linearish())
    }

    /// Validates the structural invariants of §3: recognised tags, a
    /// contiguous simplex group with agreeing inner kinds, a polygon pair
    /// between exactly two coordinates with `vertices >= 3`, and no
    /// coordinate claimed by both couplings.
    fn validate(&self) -> Result<(), DescriptorError> {
        if self.dim == 0 {
            return Err(DescriptorError::InvalidCoupling {
                reason: "dimension must be at least 1".to_owned(),
            });
        }

        if let Some((coords, kind)) = &self.simplex {
            if coords.len() < 2 {
                return Err(DescriptorError::InvalidCoupling {
                    reason: "a simplex group must couple at least two coordinates".to_owned(),
                });
            }
            let mut sorted = coords.clone();
            sorted.sort_unstable();
            let contiguous = sorted
                .windows(2)
                .all(|w| w[1] == w[0] + 1);
            if !contiguous {
                return Err(DescriptorError::InvalidCoupling {
                    reason: "simplex members must be contiguous coordinates".to_owned(),
                });
            }
            if !matches!(kind, RuleKind::LinearSimplex | RuleKind::QuadraticSimplex) {
                return Err(DescriptorError::InvalidCoupling {
                    reason: "simplex group kind must be linear or quadratic simplex".to_owned(),
                });
            }
            for &c in &sorted {
                if self.diag[c] != *kind {
                    return Err(DescriptorError::InvalidCoupling {
                        reason: "simplex group members disagree on inner kind".to_owned(),
                    });
                }
            }
        }

        if let Some((circ, rad, vertices)) = self.polygon {
            if circ == rad {
                return Err(DescriptorError::InvalidCoupling {
                    reason: "polygon pair must be two distinct coordinates".to_owned(),
                });
            }
            if vertices < 3 {
                return Err(DescriptorError::InvalidCoupling {
                    reason: "polygon vertex count must be at least 3".to_owned(),
                });
            }
            if self.diag[circ] != RuleKind::Polygon || self.diag[rad] != RuleKind::Polygon {
                return Err(DescriptorError::InvalidCoupling {
                    reason: "both polygon members must use the polygon rule".to_owned(),
                });
            }
        }

        if let (Some((coords, _)), Some((circ, rad, _))) = (&self.simplex, self.polygon) {
            if coords.contains(&circ) || coords.contains(&rad) {
                return Err(DescriptorError::InvalidCoupling {
                    reason: "a coordinate cannot belong to both a simplex and a polygon coupling"
                        .to_owned(),
                });
            }
        }

        Ok(())
    }

    /// The canonical flattened upper-triangular tag vector used for
    /// ordering: dimension, then the diagonal and off-diagonal tags of the
    /// `D x D` relation table, row-major, upper triangle only.
    fn canonical_key(&self) -> Vec<i64> {
        let mut key = Vec::with_capacity(1 + self.dim * (self.dim + 1) / 2);
        key.push(self.dim as i64);
        for r in 0..self.dim {
            for c in r..self.dim {
                if r == c {
                    key.push(self.diag[r].tag());
                } else {
                    key.push(self.off_diagonal_tag(r, c));
                }
            }
        }
        key
    }

    fn off_diagonal_tag(&self, r: usize, c: usize) -> i64 {
        if let Some((coords, _)) = &self.simplex {
            if coords.contains(&r) && coords.contains(&c) {
                return 1;
            }
        }
        if let Some((circ, rad, vertices)) = self.polygon {
            if (r, c) == (circ.min(rad), circ.max(rad)) {
                return i64::from(vertices);
            }
        }
        0
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_key() == other.canonical_key()
    }
}

impl Eq for Descriptor {}

impl std::hash::Hash for Descriptor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical_key().hash(state);
    }
}

impl PartialOrd for Descriptor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Descriptor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.canonical_key().cmp(&other.canonical_key())
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format::format(self))
    }
}

impl FromStr for Descriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse(s)
    }
}

/// Parses a textual descriptor, per the grammar of SPEC_FULL §4.1/§6.
pub fn parse(text: &str) -> Result<Descriptor, DescriptorError> {
    parse::parse(text)
}

/// Formats a descriptor back into its canonical textual spelling.
#[must_use]
pub fn format(descriptor: &Descriptor) -> String {
    format::format(descriptor)
}

/// Lexicographic comparison on `(dimension, flattened upper triangle)`.
#[must_use]
pub fn compare(a: &Descriptor, b: &Descriptor) -> std::cmp::Ordering {
    a.cmp(b)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn linear_lagrange_1d_is_valid() {
        let d: Descriptor = "l.Lagrange".parse().unwrap();
        assert_eq!(d.dimension(), 1);
        assert_eq!(d.rule_at(0), RuleKind::LinearLagrange);
        assert!(!d.is_non_linear());
    }

    #[test]
    fn cubic_hermite_is_non_linear() {
        let d: Descriptor = "c.Hermite".parse().unwrap();
        assert!(d.is_non_linear());
    }

    #[test]
    fn equal_descriptors_compare_equal() {
        let a: Descriptor = "l.Lagrange*l.Lagrange".parse().unwrap();
        let b: Descriptor = "l.Lagrange*l.Lagrange".parse().unwrap();
        assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
        assert_eq!(a, b);
    }

    #[test]
    fn differing_dimension_orders_by_dimension_first() {
        let a: Descriptor = "l.Lagrange".parse().unwrap();
        let b: Descriptor = "l.Lagrange*l.Lagrange".parse().unwrap();
        assert_eq!(a.cmp(&b), std::cmp::Ordering::Less);
    }

    #[test]
    fn polygon_pair_rejects_equal_coordinates() {
        let diag = vec![RuleKind::Polygon, RuleKind::Polygon];
        let err = Descriptor::new(diag, None, Some((0, 0, 5))).unwrap_err();
        assert!(matches!(err, DescriptorError::InvalidCoupling { .. }));
    }
}
