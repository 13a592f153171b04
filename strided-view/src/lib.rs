//! One-dimensional strided views over borrowed buffers.
//!
//! A strided view is the tuple `(storage, len, stride, offset)`: logical
//! element `i` lives at storage index `offset + i * stride`. Strides may be
//! positive, negative (reverse traversal) or zero (broadcast of a single
//! element).
//!
//! # Core Types
//!
//! - [`StridedView`] / [`StridedViewMut`]: bounds-checked views over `&[T]` / `&mut [T]`
//! - [`StridedIndices`]: incremental index iterator, never materializes an index array
//! - [`ElementOp`] implementations ([`Identity`], [`Conj`]) re-exported from `strided-traits`
//!
//! # Offset helpers
//!
//! - [`stride_to_offset`]: starting offset for the offset-free calling convention
//! - [`min_view_index`], [`max_view_index`], [`required_len`]: storage extent of a view
//!
//! # Example
//!
//! ```rust
//! use strided_view::StridedView;
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0];
//! // Every other element, walked backwards from the last one.
//! let v = StridedView::new(&data, 3, -2, 4).unwrap();
//! assert_eq!(v.to_vec(), vec![5.0, 3.0, 1.0]);
//! ```

mod element_op;
pub mod index;
pub mod view;

// ============================================================================
// Element operations
// ============================================================================
pub use element_op::{Conj, ElementOp, ElementOpApply, Identity};

// ============================================================================
// View types and index arithmetic
// ============================================================================
pub use index::{max_view_index, min_view_index, required_len, stride_to_offset, StridedIndices};
pub use view::{StridedView, StridedViewMut};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur when building or combining strided views.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StridedError {
    /// The buffer is too short for the requested length/stride/offset.
    #[error("insufficient buffer length: view requires {required} elements, buffer has {actual}")]
    InsufficientLength { required: usize, actual: usize },

    /// The view would touch a storage index below zero.
    #[error("negative storage index {index} (len={len}, stride={stride}, offset={offset})")]
    NegativeIndex {
        index: isize,
        len: usize,
        stride: isize,
        offset: usize,
    },

    /// Logical lengths of views combined in one operation differ.
    #[error("length mismatch: {0} vs {1}")]
    LengthMismatch(usize, usize),

    /// Logical index outside `[0, len)`.
    #[error("index {index} out of bounds for view of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Integer overflow while computing a storage index.
    #[error("offset overflow while computing storage index")]
    OffsetOverflow,
}

/// Result type for strided view operations.
pub type Result<T> = std::result::Result<T, StridedError>;
