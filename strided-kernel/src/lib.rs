//! Element-wise apply loops and BLAS level-1 kernels over strided views.
//!
//! # Core Types
//!
//! Views come from `strided-view` and are re-exported here:
//! [`StridedView`] (read-only) and [`StridedViewMut`] (output).
//!
//! # Apply loops
//!
//! - [`nullary_into`], [`map_into`], [`zip_map2_into`] .. [`zip_map5_into`]
//! - in place: [`map_inplace`], [`zip_map2_inplace`], [`map_within`]
//! - masked: [`mask_map_into`], [`mask_zip_map2_into`], [`mask_map_inplace`]
//! - accessor-based: [`map_by_into`], [`zip_map2_by_into`]
//!
//! # BLAS level 1
//!
//! [`copy_into`], [`swap`], [`scal`], [`axpy`], [`dot`], [`dotc`], [`sum`],
//! [`asum`], [`nrm2`], [`iamax`], [`rot`].
//!
//! # Raw slices
//!
//! [`convention`] exposes the same loops over `(n, buffer, stride[, offset])`
//! arguments.
//!
//! # Example
//!
//! ```rust
//! use strided_kernel::{zip_map2_into, StridedView, StridedViewMut};
//!
//! let a = [1.0, 2.0, 3.0];
//! let b = [10.0, 20.0, 30.0];
//! let mut out = [0.0; 3];
//! zip_map2_into(
//!     &mut StridedViewMut::from_slice(&mut out),
//!     &StridedView::from_slice(&a),
//!     &StridedView::from_slice(&b).reversed(),
//!     |x, y| x + y,
//! )
//! .unwrap();
//! assert_eq!(out, [31.0, 22.0, 13.0]);
//! ```

mod kernel;
mod map_by;
mod map_view;
mod masked;
mod ops_view;

pub mod convention;
pub mod simd;

pub use map_by::{map_by_into, zip_map2_by_into, ByIndex};
pub use map_view::{
    map_inplace, map_into, map_within, nullary_into, zip_map2_inplace, zip_map2_into,
    zip_map3_into, zip_map4_into, zip_map5_into,
};
pub use masked::{mask_map_inplace, mask_map_into, mask_zip_map2_into};
pub use ops_view::{asum, axpy, copy_into, dot, dotc, iamax, nrm2, rot, scal, sum, swap};
pub use simd::MaybeSimdOps;

pub use strided_view::{Result, StridedError, StridedView, StridedViewMut};
