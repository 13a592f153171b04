//! Runtime dtype dispatch for strided kernels.
//!
//! Arrays whose element type is known only at runtime are carried as
//! [`TypedBuffer`] / [`TypedView`] / [`TypedViewMut`]. An [`Op`] is resolved
//! through a [`DispatchTable`] keyed by the input [`DType`]s to a kernel and
//! a promoted output dtype, then executed by a [`KernelBackend`]: the native
//! routine for homogeneous contiguous numeric operands, the portable strided
//! loop otherwise.
//!
//! # Example
//!
//! ```rust
//! use strided_dispatch::{apply, DType, Op, TypedBuffer};
//!
//! let a = TypedBuffer::from_vec(vec![1i32, 2, 3]);
//! let b = TypedBuffer::from_vec(vec![0.5f64, 0.5, 0.5]);
//! let mut out = TypedBuffer::zeros(DType::Float64, 3);
//! apply(Op::Add, &[a.as_view(), b.as_view()], &mut out.as_view_mut()).unwrap();
//! assert_eq!(out.as_slice::<f64>().unwrap(), &[1.5, 2.5, 3.5]);
//! ```
//!
//! # Configuration
//!
//! - feature `native` (default): compile the native routine and prefer it.
//! - `STRIDED_NATIVE=0`: disable the native routine at runtime.
//! - `STRIDED_TRACE=1`: log serialized operand metadata at `trace` level.

pub mod backend;
pub mod buffer;
pub mod dispatcher;
pub mod dtype;
pub mod element;
pub mod meta;
#[cfg(feature = "native")]
pub mod native;
pub mod op;
pub mod promote;
pub mod signature;
mod staging;
pub mod table;
pub mod value;

pub use backend::{KernelBackend, PortableBackend, PreferredBackend};
#[cfg(feature = "native")]
pub use backend::NativeBackend;
pub use buffer::{TypedBuffer, TypedView, TypedViewMut};
pub use dispatcher::{apply, apply_by, apply_masked, apply_with, evaluate, output_dtype, table};
pub use dtype::DType;
pub use element::{cast, Element, Uint8c};
pub use meta::{MetaError, NdarrayMeta, Order};
pub use op::Op;
pub use promote::{promote, promote_all};
pub use signature::Signature;
pub use staging::CAST_BLOCK;
pub use table::{cast_into, kernel_for, DispatchTable, Entry, KernelFn, Position};
pub use value::Value;

/// Errors from dtype resolution and kernel dispatch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("{op}: no kernel for input dtypes ({})", dtype_list(.dtypes))]
    UnsupportedDtypes { op: Op, dtypes: Vec<DType> },

    #[error("{op}: expected {expected} inputs, found {found}")]
    ArityMismatch { op: Op, expected: usize, found: usize },

    #[error("output dtype is {found} but the kernel writes {expected}")]
    OutputDtypeMismatch { expected: DType, found: DType },

    #[error("unknown dtype '{0}'")]
    UnknownDType(String),

    #[error("invalid signature '{0}'")]
    InvalidSignature(String),

    #[error("{op} has no {variant} form")]
    UnsupportedVariant { op: Op, variant: &'static str },

    #[error("{backend} backend cannot run {op} on these operands")]
    BackendUnsupported { backend: &'static str, op: Op },

    #[error("native routine returned status {0}")]
    NativeStatus(i32),

    #[error(transparent)]
    Meta(#[from] MetaError),

    #[error(transparent)]
    Strided(#[from] strided_view::StridedError),
}

fn dtype_list(dtypes: &[DType]) -> String {
    dtypes
        .iter()
        .map(|d| d.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias for `Result<T, DispatchError>`.
pub type Result<T> = std::result::Result<T, DispatchError>;
