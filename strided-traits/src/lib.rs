//! Shared element traits for the strided kernel workspace.
//!
//! This crate holds the trait bounds used by `strided-view`,
//! `strided-kernel` and `strided-dispatch`:
//!
//! - [`ScalarBase`]: arithmetic bounds for BLAS-style kernels (`axpy`, `dot`, ...)
//! - [`Arith`]: elementwise arithmetic with storage semantics (integers wrap,
//!   clamped bytes saturate, floats follow IEEE 754)
//! - [`ElementOp`] / [`ElementOpApply`]: type-level element operations
//!   ([`Identity`], [`Conj`]) applied on read
//!
//! External crates can depend on `strided-traits` to implement these traits
//! for their own element types without orphan rule violations.

pub mod arith;
pub mod element_op;
pub mod scalar;

pub use arith::Arith;
pub use element_op::{Conj, ElementOp, ElementOpApply, Identity};
pub use scalar::ScalarBase;
