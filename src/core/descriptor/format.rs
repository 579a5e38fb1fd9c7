use super::{Descriptor, RuleKind};

fn plain_token(kind: RuleKind) -> &'static str {
    match kind {
        RuleKind::Constant => "constant",
        RuleKind::LinearLagrange => "l.Lagrange",
        RuleKind::QuadraticLagrange => "q.Lagrange",
        RuleKind::CubicLagrange => "c.Lagrange",
        RuleKind::CubicHermite => "c.Hermite",
        RuleKind::LagrangeHermite => "LagrangeHermite",
        RuleKind::HermiteLagrange => "HermiteLagrange",
        RuleKind::LinearSimplex => "l.simplex",
        RuleKind::QuadraticSimplex => "q.simplex",
        RuleKind::Polygon => "polygon",
    }
}

fn simplex_prefix(kind: RuleKind) -> &'static str {
    match kind {
        RuleKind::QuadraticSimplex => "q",
        _ => "l",
    }
}

/// Emits the canonical textual spelling of a descriptor; the inverse of
/// [`super::parse`].
pub(super) fn format(descriptor: &Descriptor) -> String {
    let dim = descriptor.dimension();
    let simplex = descriptor.simplex_group();
    let polygon = descriptor.polygon_group();

    let mut factors = Vec::with_capacity(dim);
    for k in 0..dim {
        if let Some((circ, rad, vertices)) = polygon {
            if k == circ {
                factors.push(format!("polygon({vertices};{})", rad + 1));
                continue;
            }
            if k == rad {
                factors.push("polygon".to_owned());
                continue;
            }
        }
        if let Some((coords, kind)) = simplex {
            if coords.contains(&k) {
                let first = coords.iter().copied().min().unwrap_or(k);
                if k == first {
                    let others: Vec<String> = coords
                        .iter()
                        .filter(|&&c| c != first)
                        .map(|c| (c + 1).to_string())
                        .collect();
                    factors.push(format!("{}.simplex({})", simplex_prefix(*kind), others.join(";")));
                } else {
                    factors.push(format!("{}.simplex", simplex_prefix(*kind)));
                }
                continue;
            }
        }
        factors.push(plain_token(descriptor.rule_at(k)).to_owned());
    }
    factors.join("*")
}
