//! Kernels for one-dimensional strided buffers with runtime dtype dispatch.
//!
//! This crate re-exports the workspace crates under one name:
//!
//! - [`view`]: [`StridedView`] / [`StridedViewMut`], the `(len, stride, offset)`
//!   index iterator and offset helpers
//! - [`kernel`]: n-ary apply loops (nullary to quinary, masked, accessor-based)
//!   and BLAS level-1 kernels, plus the raw-slice [`convention`] API
//! - [`dispatch`]: [`DType`], promotion, dispatch tables and the
//!   native/portable backends behind [`apply`]
//!
//! # Typed Example
//!
//! ```rust
//! use strided_base::{zip_map4_into, StridedView, StridedViewMut};
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let v = StridedView::from_slice(&x);
//! let mut out = [0.0; 5];
//! zip_map4_into(
//!     &mut StridedViewMut::from_slice(&mut out),
//!     &v, &v, &v, &v,
//!     |a, b, c, d| a + b + c + d,
//! )
//! .unwrap();
//! assert_eq!(out, [4.0, 8.0, 12.0, 16.0, 20.0]);
//! ```
//!
//! # Dispatch Example
//!
//! ```rust
//! use strided_base::{apply, DType, Op, TypedBuffer};
//!
//! let x = TypedBuffer::from_vec(vec![1u8, 2, 3, 4]);
//! let y = TypedBuffer::from_vec(vec![-1i8, -1, -1, -1]);
//! let mut out = TypedBuffer::zeros(DType::Int16, 4);
//! apply(Op::Add, &[x.view(4, -1, 3).unwrap(), y.as_view()], &mut out.as_view_mut()).unwrap();
//! assert_eq!(out.as_slice::<i16>().unwrap(), &[3, 2, 1, 0]);
//! ```

pub use strided_dispatch as dispatch;
pub use strided_kernel as kernel;
pub use strided_traits as traits;
pub use strided_view as view;

pub use strided_kernel::convention;

// ============================================================================
// Views
// ============================================================================
pub use strided_view::{
    max_view_index, min_view_index, required_len, stride_to_offset, StridedError, StridedIndices,
    StridedView, StridedViewMut,
};

// ============================================================================
// Apply loops and BLAS level 1
// ============================================================================
pub use strided_kernel::{
    asum, axpy, copy_into, dot, dotc, iamax, map_by_into, map_inplace, map_into, map_within,
    mask_map_inplace, mask_map_into, mask_zip_map2_into, nrm2, nullary_into, rot, scal, sum,
    swap, zip_map2_by_into, zip_map2_inplace, zip_map2_into, zip_map3_into, zip_map4_into,
    zip_map5_into, ByIndex,
};

// ============================================================================
// Element traits
// ============================================================================
pub use strided_traits::{Arith, ScalarBase};

// ============================================================================
// Dtype dispatch
// ============================================================================
pub use strided_dispatch::{
    apply, apply_by, apply_masked, apply_with, evaluate, output_dtype, promote, promote_all, DType,
    DispatchError, DispatchTable, KernelBackend, Op, PortableBackend, Position, PreferredBackend,
    Signature, TypedBuffer, TypedView, TypedViewMut, Value,
};
