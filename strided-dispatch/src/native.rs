//! Native elementwise routine behind a C ABI.
//!
//! The routine receives the op code, a metadata blob (see [`crate::meta`])
//! describing the inputs followed by the output, and one raw buffer pointer
//! per operand. It handles only homogeneous, unit-stride, one-dimensional
//! operands of a fixed-width numeric dtype and reports anything else through
//! its status code without touching the output.

use std::os::raw::c_int;

use crate::meta::{decode_all, NdarrayMeta};
use crate::{DType, Op};

pub const STATUS_OK: c_int = 0;
/// Metadata could not be decoded.
pub const STATUS_BAD_METADATA: c_int = 1;
/// Unknown op code or a dtype this routine does not implement.
pub const STATUS_UNSUPPORTED: c_int = 2;
/// Operand count, rank, length or stride the routine cannot handle.
pub const STATUS_BAD_LAYOUT: c_int = 3;
/// A null buffer or metadata pointer.
pub const STATUS_NULL_POINTER: c_int = 4;

/// Dtypes with a compiled native loop.
pub const NATIVE_DTYPES: [DType; 8] = [
    DType::Float64,
    DType::Float32,
    DType::Int32,
    DType::Int16,
    DType::Int8,
    DType::Uint32,
    DType::Uint16,
    DType::Uint8,
];

pub fn is_native_dtype(dtype: DType) -> bool {
    NATIVE_DTYPES.contains(&dtype)
}

/// Apply `op` to the operands described by `meta`.
///
/// Returns [`STATUS_OK`] after writing every output element, or another
/// `STATUS_*` code before writing any.
///
/// # Safety
///
/// `meta` must point to `meta_len` readable bytes. `buffers` must point to
/// `n_buffers` pointers, each the start of an allocation that holds every
/// element its metadata addresses. The last buffer is written and must not
/// overlap any other.
#[no_mangle]
pub unsafe extern "C" fn strided_native_apply(
    op: u32,
    meta: *const u8,
    meta_len: usize,
    buffers: *const *mut u8,
    n_buffers: usize,
) -> c_int {
    if meta.is_null() || buffers.is_null() {
        return STATUS_NULL_POINTER;
    }
    let Some(op) = Op::from_code(op) else {
        return STATUS_UNSUPPORTED;
    };
    let Ok(metas) = decode_all(std::slice::from_raw_parts(meta, meta_len)) else {
        return STATUS_BAD_METADATA;
    };
    let buffers = std::slice::from_raw_parts(buffers, n_buffers);
    if buffers.iter().any(|p| p.is_null()) {
        return STATUS_NULL_POINTER;
    }

    let (len, dtype) = match check_layout(op, &metas, n_buffers) {
        Ok(found) => found,
        Err(status) => return status,
    };
    let offsets: Vec<usize> = metas.iter().map(|m| m.offset).collect();

    match dtype {
        DType::Float64 => run::<f64>(op, buffers, &offsets, len),
        DType::Float32 => run::<f32>(op, buffers, &offsets, len),
        DType::Int32 => run::<i32>(op, buffers, &offsets, len),
        DType::Int16 => run::<i16>(op, buffers, &offsets, len),
        DType::Int8 => run::<i8>(op, buffers, &offsets, len),
        DType::Uint32 => run::<u32>(op, buffers, &offsets, len),
        DType::Uint16 => run::<u16>(op, buffers, &offsets, len),
        DType::Uint8 => run::<u8>(op, buffers, &offsets, len),
        _ => STATUS_UNSUPPORTED,
    }
}

/// Common length and dtype of a valid operand list.
fn check_layout(op: Op, metas: &[NdarrayMeta], n_buffers: usize) -> Result<(usize, DType), c_int> {
    if metas.len() != op.arity() + 1 || n_buffers != metas.len() {
        return Err(STATUS_BAD_LAYOUT);
    }
    let dtype = metas[metas.len() - 1].dtype;
    if !is_native_dtype(dtype) {
        return Err(STATUS_UNSUPPORTED);
    }
    let len = metas[metas.len() - 1].len();
    for m in metas {
        if m.dtype != dtype {
            return Err(STATUS_UNSUPPORTED);
        }
        if m.ndims() != 1 || m.len() != len || !m.is_contiguous() {
            return Err(STATUS_BAD_LAYOUT);
        }
    }
    Ok((len, dtype))
}

unsafe fn input<'a, T>(ptr: *mut u8, offset: usize, len: usize) -> &'a [T] {
    std::slice::from_raw_parts(ptr.cast::<T>().cast_const().add(offset), len)
}

unsafe fn run<T>(op: Op, buffers: &[*mut u8], offsets: &[usize], len: usize) -> c_int
where
    T: strided_traits::Arith,
{
    let n = buffers.len() - 1;
    let out = std::slice::from_raw_parts_mut(buffers[n].cast::<T>().add(offsets[n]), len);
    let x = |k: usize| input::<T>(buffers[k], offsets[k], len);

    match op.arity() {
        1 => {
            let Some(f) = op.unary::<T>() else {
                return STATUS_UNSUPPORTED;
            };
            let a = x(0);
            strided_kernel::simd::dispatch(|| {
                for (o, &a) in out.iter_mut().zip(a) {
                    *o = f(a);
                }
            });
        }
        2 => {
            let Some(f) = op.binary::<T>() else {
                return STATUS_UNSUPPORTED;
            };
            let (a, b) = (x(0), x(1));
            strided_kernel::simd::dispatch(|| {
                for ((o, &a), &b) in out.iter_mut().zip(a).zip(b) {
                    *o = f(a, b);
                }
            });
        }
        3 => {
            let Some(f) = op.ternary::<T>() else {
                return STATUS_UNSUPPORTED;
            };
            let (a, b, c) = (x(0), x(1), x(2));
            strided_kernel::simd::dispatch(|| {
                for (((o, &a), &b), &c) in out.iter_mut().zip(a).zip(b).zip(c) {
                    *o = f(a, b, c);
                }
            });
        }
        4 => {
            let Some(f) = op.quaternary::<T>() else {
                return STATUS_UNSUPPORTED;
            };
            let (a, b, c, d) = (x(0), x(1), x(2), x(3));
            strided_kernel::simd::dispatch(|| {
                for ((((o, &a), &b), &c), &d) in out.iter_mut().zip(a).zip(b).zip(c).zip(d) {
                    *o = f(a, b, c, d);
                }
            });
        }
        _ => return STATUS_UNSUPPORTED,
    }
    STATUS_OK
}
