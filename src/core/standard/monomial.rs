//! Dense multivariate monomial evaluator (SPEC_FULL §4.2).

use num_traits::Float;

/// `[1, xi, xi^2, ..., xi^order]`, the per-coordinate monomial factor.
pub(super) fn powers<T: Float>(order: usize, xi: T) -> Vec<T> {
    let mut out = Vec::with_capacity(order + 1);
    let mut p = T::one();
    out.push(p);
    for _ in 0..order {
        p = p * xi;
        out.push(p);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn powers_are_increasing_monomials() {
        let p = powers(3, 2.0_f64);
        assert_eq!(p, vec![1.0, 2.0, 4.0, 8.0]);
    }

    #[test]
    fn order_zero_is_constant_one() {
        let p = powers(0, 5.0_f64);
        assert_eq!(p, vec![1.0]);
    }
}
