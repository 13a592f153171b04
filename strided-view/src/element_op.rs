//! Element-wise operations applied on read.
//!
//! Re-exported from [`strided_traits`]. See that crate for full documentation.

pub use strided_traits::element_op::{Conj, ElementOp, ElementOpApply, Identity};
