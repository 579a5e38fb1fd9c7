use super::{Descriptor, DescriptorError, RuleKind};

struct Factor<'a> {
    base: &'a str,
    args: Option<Vec<&'a str>>,
}

fn split_factor(raw: &str) -> Result<Factor<'_>, DescriptorError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DescriptorError::Parse {
            message: "empty factor".to_owned(),
        });
    }
    match raw.find('(') {
        None => Ok(Factor {
            base: raw,
            args: None,
        }),
        Some(open) => {
            if !raw.ends_with(')') {
                return Err(DescriptorError::Parse {
                    message: format!("unterminated argument list in {raw:?}"),
                });
            }
            let base = raw[..open].trim();
            let inner = &raw[open + 1..raw.len() - 1];
            let args = inner.split(';').map(str::trim).collect();
            Ok(Factor { base, args: Some(args) })
        }
    }
}

fn parse_index(token: &str, dim_hint: &str) -> Result<usize, DescriptorError> {
    let one_based: usize = token.parse().map_err(|_| DescriptorError::Parse {
        message: format!("expected a 1-based coordinate index, found {token:?} in {dim_hint}"),
    })?;
    if one_based == 0 {
        return Err(DescriptorError::InvalidCoupling {
            reason: "coordinate indices are 1-based and must be >= 1".to_owned(),
        });
    }
    Ok(one_based - 1)
}

/// Parses the `*`-separated descriptor grammar of SPEC_FULL §4.1/§6.
pub(super) fn parse(text: &str) -> Result<Descriptor, DescriptorError> {
    if text.trim().is_empty() {
        return Err(DescriptorError::Parse {
            message: "descriptor text is empty".to_owned(),
        });
    }

    let raw_factors: Vec<&str> = text.split('*').collect();
    let dim = raw_factors.len();

    let mut diag = Vec::with_capacity(dim);
    let mut simplex: Option<(Vec<usize>, RuleKind)> = None;
    let mut polygon: Option<(usize, usize, u32)> = None;

    for (i, raw) in raw_factors.iter().enumerate() {
        let factor = split_factor(raw)?;
        let kind = match factor.base {
            "constant" => RuleKind::Constant,
            "l.Lagrange" => RuleKind::LinearLagrange,
            "q.Lagrange" => RuleKind::QuadraticLagrange,
            "c.Lagrange" => RuleKind::CubicLagrange,
            "c.Hermite" => RuleKind::CubicHermite,
            "LagrangeHermite" => RuleKind::LagrangeHermite,
            "HermiteLagrange" => RuleKind::HermiteLagrange,
            "l.simplex" => RuleKind::LinearSimplex,
            "q.simplex" => RuleKind::QuadraticSimplex,
            "polygon" => RuleKind::Polygon,
            other => {
                return Err(DescriptorError::InvalidTag {
                    coordinate: i,
                    token: other.to_owned(),
                });
            }
        };
        diag.push(kind);

        match (factor.base, &factor.args) {
            ("l.simplex" | "q.simplex", Some(args)) => {
                if simplex.is_some() {
                    return Err(DescriptorError::InvalidCoupling {
                        reason: "at most one simplex coupling is supported".to_owned(),
                    });
                }
                let mut coords = vec![i];
                for a in args {
                    coords.push(parse_index(a, raw)?);
                }
                simplex = Some((coords, kind));
            }
            ("polygon", Some(args)) => {
                if polygon.is_some() {
                    return Err(DescriptorError::InvalidCoupling {
                        reason: "at most one polygon coupling is supported".to_owned(),
                    });
                }
                if args.len() != 2 {
                    return Err(DescriptorError::InvalidCoupling {
                        reason: "polygon requires a vertex count and a partner index: polygon(V;cN)"
                            .to_owned(),
                    });
                }
                let vertices: u32 = args[0].parse().map_err(|_| DescriptorError::InvalidCoupling {
                    reason: format!("invalid polygon vertex count {:?}", args[0]),
                })?;
                let radial = parse_index(args[1], raw)?;
                polygon = Some((i, radial, vertices));
            }
            (_, Some(_)) => {
                return Err(DescriptorError::InvalidCoupling {
                    reason: format!("{} does not take an argument list", factor.base),
                });
            }
            (_, None) => {}
        }
    }

    for idx in [
        simplex.as_ref().map(|(coords, _)| coords.clone()).unwrap_or_default(),
    ]
    .into_iter()
    .flatten()
    {
        if idx >= dim {
            return Err(DescriptorError::InvalidCoupling {
                reason: format!("coordinate index {} out of range for dimension {dim}", idx + 1),
            });
        }
    }
    if let Some((circ, rad, _)) = polygon {
        if circ >= dim || rad >= dim {
            return Err(DescriptorError::InvalidCoupling {
                reason: "polygon partner index out of range".to_owned(),
            });
        }
    }

    Descriptor::new(diag, simplex, polygon)
}
