#![forbid(unsafe_code)]
#![allow(
    clippy::float_cmp,
    reason = "equality checks throughout this crate compare against exact sentinel values (0.0 padding, 1.0 scale) produced by exact construction, not against accumulated results"
)]
//! Finite-element basis construction, blending, and inheritance engine.
//!
//! This crate builds and caches the numeric machinery behind a finite-element
//! basis: given a symbolic [`Descriptor`] naming the one-dimensional rule (and
//! any simplex or polygon coupling) on each parametric coordinate, it produces
//! a [`Basis`] — a blending matrix mapping nodal element parameters onto
//! coefficients of a standard monomial or polygon evaluator, plus the
//! metadata needed to evaluate, blend, and project that basis.
//!
//! # Example
//!
//! ```
//! use fe_basis_core::{Descriptor, Registry};
//!
//! let registry = Registry::new();
//! let descriptor: Descriptor = "l.Lagrange".parse().unwrap();
//! let basis = registry.fetch_or_build(&descriptor).unwrap();
//! assert_eq!(basis.parameter_count(), 2);
//! ```

mod core;

pub use crate::core::basis::Basis;
pub use crate::core::builder::BuildError;
pub use crate::core::descriptor::{compare, format, parse, Coupling, Descriptor, DescriptorError, RuleKind};
pub use crate::core::inherit::{inherit, AffineMap, InheritedEvaluator, ProjectionError};
pub use crate::core::registry::Registry;
pub use crate::core::standard::StdKind;
