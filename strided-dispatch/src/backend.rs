//! Kernel backends.
//!
//! [`PortableBackend`] runs the table kernel over any strided operands.
//! [`NativeBackend`] (feature `native`) serializes operand metadata and calls
//! [`strided_native_apply`](crate::native::strided_native_apply) for
//! homogeneous unit-stride numeric operands. [`PreferredBackend`] is the one
//! the dispatcher tries first.

use std::sync::OnceLock;

use crate::buffer::{TypedView, TypedViewMut};
use crate::table::Entry;
use crate::{Op, Result};

/// An execution strategy for one resolved kernel call.
///
/// Callers have already checked arity, lengths and dtypes against the table
/// entry; `supports` only decides whether this backend can take the call.
pub trait KernelBackend {
    const NAME: &'static str;

    fn supports(op: Op, inputs: &[TypedView<'_>], out: &TypedViewMut<'_>) -> bool;

    fn execute(
        op: Op,
        entry: &Entry,
        inputs: &[TypedView<'_>],
        out: &mut TypedViewMut<'_>,
    ) -> Result<()>;
}

/// Strided loops in Rust; accepts every call.
pub struct PortableBackend;

impl KernelBackend for PortableBackend {
    const NAME: &'static str = "portable";

    fn supports(_op: Op, _inputs: &[TypedView<'_>], _out: &TypedViewMut<'_>) -> bool {
        true
    }

    fn execute(
        op: Op,
        entry: &Entry,
        inputs: &[TypedView<'_>],
        out: &mut TypedViewMut<'_>,
    ) -> Result<()> {
        (entry.kernel)(op, inputs, out)
    }
}

/// The C-ABI routine in [`crate::native`].
#[cfg(feature = "native")]
pub struct NativeBackend;

#[cfg(feature = "native")]
impl KernelBackend for NativeBackend {
    const NAME: &'static str = "native";

    fn supports(_op: Op, inputs: &[TypedView<'_>], out: &TypedViewMut<'_>) -> bool {
        let dtype = out.dtype();
        native_enabled()
            && crate::native::is_native_dtype(dtype)
            && out.is_contiguous()
            && inputs
                .iter()
                .all(|v| v.dtype() == dtype && v.is_contiguous())
    }

    fn execute(
        op: Op,
        _entry: &Entry,
        inputs: &[TypedView<'_>],
        out: &mut TypedViewMut<'_>,
    ) -> Result<()> {
        use crate::meta::{encode_operands, NdarrayMeta};

        let mut metas: Vec<NdarrayMeta> = inputs.iter().map(NdarrayMeta::of_view).collect();
        metas.push(NdarrayMeta::of_view_mut(out));
        if trace_enabled() {
            log::trace!("native {op}: {metas:?}");
        }
        let blob = encode_operands(&metas);

        // Inputs are only read through these pointers.
        let mut buffers: Vec<*mut u8> = inputs
            .iter()
            .map(|v| v.buffer_ptr().cast_mut())
            .collect();
        buffers.push(out.buffer_ptr_mut());

        // SAFETY: every view was bounds-checked on construction, so each
        // buffer holds the elements its metadata addresses; the output is a
        // unique borrow and cannot overlap an input.
        let status = unsafe {
            crate::native::strided_native_apply(
                op.code(),
                blob.as_ptr(),
                blob.len(),
                buffers.as_ptr(),
                buffers.len(),
            )
        };
        if status == crate::native::STATUS_OK {
            Ok(())
        } else {
            Err(crate::DispatchError::NativeStatus(status))
        }
    }
}

/// Backend the dispatcher tries before falling back to [`PortableBackend`].
#[cfg(feature = "native")]
pub type PreferredBackend = NativeBackend;

#[cfg(not(feature = "native"))]
pub type PreferredBackend = PortableBackend;

/// `false` when `STRIDED_NATIVE=0`. Read once per process.
pub fn native_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        let enabled = std::env::var("STRIDED_NATIVE").map_or(true, |v| v.trim() != "0");
        if !enabled {
            log::debug!("STRIDED_NATIVE=0: native kernels disabled");
        }
        enabled
    })
}

/// `true` when `STRIDED_TRACE=1`. Read once per process.
pub fn trace_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var("STRIDED_TRACE").is_ok_and(|v| v.trim() == "1"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TypedBuffer;
    use crate::table::kernel_for;
    use crate::DType;

    #[test]
    fn test_portable_takes_everything() {
        let x = TypedBuffer::from_vec(vec![1i8, -2, 3, -4]);
        let mut y = TypedBuffer::zeros(DType::Int8, 2);
        let xs = x.view(2, -2, 3).unwrap();
        let mut out = y.as_view_mut();
        assert!(PortableBackend::supports(Op::Abs, &[xs], &out));
        let entry = Entry {
            output: DType::Int8,
            kernel: kernel_for(DType::Int8),
        };
        PortableBackend::execute(Op::Abs, &entry, &[xs], &mut out).unwrap();
        assert_eq!(y.as_slice::<i8>().unwrap(), &[4, 2]);
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_native_capability_predicate() {
        let a = TypedBuffer::from_vec(vec![1.0f64, 2.0, 3.0, 4.0]);
        let b = TypedBuffer::from_vec(vec![1.0f32, 2.0]);
        let mut y = TypedBuffer::zeros(DType::Float64, 2);
        let out = y.as_view_mut();

        let contiguous = a.view(2, 1, 2).unwrap();
        let strided = a.view(2, 2, 0).unwrap();
        assert_eq!(
            NativeBackend::supports(Op::Neg, &[contiguous], &out),
            native_enabled()
        );
        assert!(!NativeBackend::supports(Op::Neg, &[strided], &out));
        assert!(!NativeBackend::supports(Op::Neg, &[b.as_view()], &out));

        let g = TypedBuffer::zeros(DType::Generic, 2);
        let mut gy = TypedBuffer::zeros(DType::Generic, 2);
        assert!(!NativeBackend::supports(Op::Neg, &[g.as_view()], &gy.as_view_mut()));
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_native_execute_with_offset() {
        let a = TypedBuffer::from_vec(vec![9i32, 1, 2, 3]);
        let mut y = TypedBuffer::zeros(DType::Int32, 3);
        let entry = Entry {
            output: DType::Int32,
            kernel: kernel_for(DType::Int32),
        };
        NativeBackend::execute(
            Op::Neg,
            &entry,
            &[a.view(3, 1, 1).unwrap()],
            &mut y.as_view_mut(),
        )
        .unwrap();
        assert_eq!(y.as_slice::<i32>().unwrap(), &[-1, -2, -3]);
    }
}
