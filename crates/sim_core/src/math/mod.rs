//! Numerical primitives shared by the simulation layers.
//!
//! This module groups:
//! - `normal`: standard normal CDF, PDF, and inverse CDF
//! - `special`: log-gamma, regularised incomplete beta, Student-t tails
//! - `linalg`: symmetric eigendecomposition (cyclic Jacobi)

pub mod linalg;
pub mod normal;
pub mod special;
