//! End-to-end scenarios exercised against the public crate API; the literal
//! expected values mirror the worked examples this crate's basis algebra is
//! specified against.

#![allow(clippy::unwrap_used, clippy::panic, reason = "integration tests assert against literal expected values")]

use fe_basis_core::{AffineMap, Descriptor, Registry};

#[test]
fn linear_lagrange_in_1d() {
    let registry = Registry::new();
    let d: Descriptor = "l.Lagrange".parse().unwrap();
    let basis = registry.fetch_or_build(&d).unwrap();

    assert_eq!(basis.parameter_count(), 2);
    assert_eq!(basis.standard_term_count(), 2);
    assert_eq!(basis.parameter_node(0), 0);
    assert_eq!(basis.parameter_node(1), 1);
    assert_eq!(basis.parameter_derivative(0), 0);
    assert_eq!(basis.parameter_derivative(1), 0);

    let p = [3.0_f64, 7.0];
    assert!((basis.eval(&p, &[0.0]) - 3.0).abs() < 1e-12);
    assert!((basis.eval(&p, &[1.0]) - 7.0).abs() < 1e-12);
}

#[test]
fn cubic_hermite_in_1d() {
    let registry = Registry::new();
    let d: Descriptor = "c.Hermite".parse().unwrap();
    let basis = registry.fetch_or_build(&d).unwrap();

    assert_eq!(basis.parameter_count(), 4);
    assert_eq!(basis.standard_term_count(), 4);
    assert_eq!(
        (0..4).map(|m| basis.parameter_node(m)).collect::<Vec<_>>(),
        vec![0, 0, 1, 1]
    );
    assert_eq!(
        (0..4).map(|m| basis.parameter_derivative(m)).collect::<Vec<_>>(),
        vec![0, 1, 0, 1]
    );

    let expected = [0.5_f64, 0.125, 0.5, -0.125];
    for m in 0..4 {
        let mut p = vec![0.0_f64; 4];
        p[m] = 1.0;
        assert!((basis.eval(&p, &[0.5]) - expected[m]).abs() < 1e-12, "m={m}");
    }
}

#[test]
fn bilinear_lagrange_in_2d() {
    let registry = Registry::new();
    let d: Descriptor = "l.Lagrange*l.Lagrange".parse().unwrap();
    let basis = registry.fetch_or_build(&d).unwrap();

    assert_eq!(basis.parameter_count(), 4);
    assert_eq!(basis.standard_term_count(), 4);

    let xi = [0.25_f64, 0.75];
    let expected = [0.1875_f64, 0.0625, 0.5625, 0.1875];
    let mut sum = 0.0_f64;
    for m in 0..4 {
        let mut p = vec![0.0_f64; 4];
        p[m] = 1.0;
        let value = basis.eval(&p, &xi);
        assert!((value - expected[m]).abs() < 1e-12, "m={m}");
        sum += value;
    }
    assert!((sum - 1.0).abs() < 1e-12, "partition of unity");
}

#[test]
fn linear_simplex_in_2d() {
    let registry = Registry::new();
    let d: Descriptor = "l.simplex(2)*l.simplex".parse().unwrap();
    let basis = registry.fetch_or_build(&d).unwrap();

    assert_eq!(basis.parameter_count(), 3);

    let xi = [1.0_f64 / 3.0, 1.0 / 3.0];
    for m in 0..3 {
        let mut p = vec![0.0_f64; 3];
        p[m] = 1.0;
        let value = basis.eval(&p, &xi);
        assert!((value - 1.0 / 3.0).abs() < 1e-12, "m={m}");
    }
}

#[test]
fn polygon_pentagon_in_2d() {
    let registry = Registry::new();
    let d: Descriptor = "polygon(5;2)*polygon".parse().unwrap();
    let basis = registry.fetch_or_build(&d).unwrap();

    assert_eq!(basis.parameter_count(), 6);
    assert_eq!(basis.standard_term_count(), 20);

    let expected_centre = [1.0_f64, 0.0, 0.0, 0.0, 0.0, 0.0];
    for &circ in &[0.0_f64, 0.2, 0.5, 0.9] {
        for m in 0..6 {
            let mut p = vec![0.0_f64; 6];
            p[m] = 1.0;
            let value = basis.eval(&p, &[circ, 0.0]);
            assert!(
                (value - expected_centre[m]).abs() < 1e-9,
                "m={m} circ={circ} value={value}"
            );
        }
    }
}

#[test]
fn projection_of_bilinear_lagrange_onto_second_coordinate_zero() {
    let registry = Registry::new();
    let d: Descriptor = "l.Lagrange*l.Lagrange".parse().unwrap();
    let basis = registry.fetch_or_build(&d).unwrap();

    let map = AffineMap::new(vec![0.0, 0.0], vec![vec![1.0], vec![0.0]]);
    let inherited = fe_basis_core::inherit(&basis, Some(&map), 1).unwrap();

    let p = [3.0_f64, 7.0, 11.0, 13.0];
    for &xi1 in &[0.0_f64, 0.2, 0.5, 0.9, 1.0] {
        let got = inherited.eval(&p, &[xi1]);
        let expected = (1.0 - xi1) * p[0] + xi1 * p[1];
        assert!((got - expected).abs() < 1e-9, "xi1={xi1} got={got} expected={expected}");
    }
}
