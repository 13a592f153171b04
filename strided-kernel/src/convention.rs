//! Raw-slice calling conventions.
//!
//! Each kernel comes in two forms:
//!
//! - the main form, `f(n, x, sx, .., y, sy, ..)`, where each operand starts
//!   at [`stride_to_offset`]: the first element for positive strides, the
//!   last one for negative strides;
//! - the `*_ndarray` form, `f(n, x, sx, ox, .., y, sy, oy, ..)`, with an
//!   explicit starting offset per operand.
//!
//! Every operand is validated against its buffer before anything is
//! written. On success the output buffer is handed back.
//!
//! ```rust
//! use strided_kernel::convention::unary;
//!
//! let x = [1.0, 2.0, 3.0];
//! let mut y = [0.0; 3];
//! // y = reverse(x) * 10
//! unary(3, &x, -1, &mut y, 1, |v| v * 10.0).unwrap();
//! assert_eq!(y, [30.0, 20.0, 10.0]);
//! ```

#![allow(clippy::too_many_arguments)]

use crate::map_by::{map_by_into, ByIndex};
use crate::map_view::{
    map_into, nullary_into, zip_map2_into, zip_map3_into, zip_map4_into, zip_map5_into,
};
use crate::masked::mask_map_into;
use crate::ops_view::copy_into;
use strided_view::{stride_to_offset, Result, StridedView, StridedViewMut};

#[inline]
fn view<T>(n: usize, data: &[T], stride: isize, offset: usize) -> Result<StridedView<'_, T>> {
    StridedView::new(data, n, stride, offset)
}

// ============================================================================
// nullary
// ============================================================================

/// `y[i] = f()` for `n` elements.
pub fn nullary<D: Copy>(n: usize, y: &mut [D], sy: isize, f: impl FnMut() -> D) -> Result<&mut [D]> {
    nullary_ndarray(n, y, sy, stride_to_offset(n, sy), f)
}

pub fn nullary_ndarray<D: Copy>(
    n: usize,
    y: &mut [D],
    sy: isize,
    oy: usize,
    f: impl FnMut() -> D,
) -> Result<&mut [D]> {
    let mut out = StridedViewMut::new(y, n, sy, oy)?;
    nullary_into(&mut out, f)?;
    Ok(out.into_data())
}

// ============================================================================
// unary
// ============================================================================

/// `y[i] = f(x[i])` for `n` elements.
pub fn unary<'y, A: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    y: &'y mut [D],
    sy: isize,
    f: impl Fn(A) -> D,
) -> Result<&'y mut [D]> {
    unary_ndarray(n, x, sx, stride_to_offset(n, sx), y, sy, stride_to_offset(n, sy), f)
}

pub fn unary_ndarray<'y, A: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    ox: usize,
    y: &'y mut [D],
    sy: isize,
    oy: usize,
    f: impl Fn(A) -> D,
) -> Result<&'y mut [D]> {
    let x = view(n, x, sx, ox)?;
    let mut out = StridedViewMut::new(y, n, sy, oy)?;
    map_into(&mut out, &x, f)?;
    Ok(out.into_data())
}

// ============================================================================
// binary
// ============================================================================

/// `z[i] = f(x[i], y[i])` for `n` elements.
pub fn binary<'z, A: Copy, B: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    y: &[B],
    sy: isize,
    z: &'z mut [D],
    sz: isize,
    f: impl Fn(A, B) -> D,
) -> Result<&'z mut [D]> {
    binary_ndarray(
        n,
        x,
        sx,
        stride_to_offset(n, sx),
        y,
        sy,
        stride_to_offset(n, sy),
        z,
        sz,
        stride_to_offset(n, sz),
        f,
    )
}

pub fn binary_ndarray<'z, A: Copy, B: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    ox: usize,
    y: &[B],
    sy: isize,
    oy: usize,
    z: &'z mut [D],
    sz: isize,
    oz: usize,
    f: impl Fn(A, B) -> D,
) -> Result<&'z mut [D]> {
    let (x, y) = (view(n, x, sx, ox)?, view(n, y, sy, oy)?);
    let mut out = StridedViewMut::new(z, n, sz, oz)?;
    zip_map2_into(&mut out, &x, &y, f)?;
    Ok(out.into_data())
}

// ============================================================================
// ternary
// ============================================================================

/// `w[i] = f(x[i], y[i], z[i])` for `n` elements.
pub fn ternary<'w, A: Copy, B: Copy, C: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    y: &[B],
    sy: isize,
    z: &[C],
    sz: isize,
    w: &'w mut [D],
    sw: isize,
    f: impl Fn(A, B, C) -> D,
) -> Result<&'w mut [D]> {
    ternary_ndarray(
        n,
        x,
        sx,
        stride_to_offset(n, sx),
        y,
        sy,
        stride_to_offset(n, sy),
        z,
        sz,
        stride_to_offset(n, sz),
        w,
        sw,
        stride_to_offset(n, sw),
        f,
    )
}

pub fn ternary_ndarray<'w, A: Copy, B: Copy, C: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    ox: usize,
    y: &[B],
    sy: isize,
    oy: usize,
    z: &[C],
    sz: isize,
    oz: usize,
    w: &'w mut [D],
    sw: isize,
    ow: usize,
    f: impl Fn(A, B, C) -> D,
) -> Result<&'w mut [D]> {
    let (x, y, z) = (view(n, x, sx, ox)?, view(n, y, sy, oy)?, view(n, z, sz, oz)?);
    let mut out = StridedViewMut::new(w, n, sw, ow)?;
    zip_map3_into(&mut out, &x, &y, &z, f)?;
    Ok(out.into_data())
}

// ============================================================================
// quaternary
// ============================================================================

/// `v[i] = f(x[i], y[i], z[i], w[i])` for `n` elements.
pub fn quaternary<'v, A: Copy, B: Copy, C: Copy, E: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    y: &[B],
    sy: isize,
    z: &[C],
    sz: isize,
    w: &[E],
    sw: isize,
    v: &'v mut [D],
    sv: isize,
    f: impl Fn(A, B, C, E) -> D,
) -> Result<&'v mut [D]> {
    quaternary_ndarray(
        n,
        x,
        sx,
        stride_to_offset(n, sx),
        y,
        sy,
        stride_to_offset(n, sy),
        z,
        sz,
        stride_to_offset(n, sz),
        w,
        sw,
        stride_to_offset(n, sw),
        v,
        sv,
        stride_to_offset(n, sv),
        f,
    )
}

pub fn quaternary_ndarray<'v, A: Copy, B: Copy, C: Copy, E: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    ox: usize,
    y: &[B],
    sy: isize,
    oy: usize,
    z: &[C],
    sz: isize,
    oz: usize,
    w: &[E],
    sw: isize,
    ow: usize,
    v: &'v mut [D],
    sv: isize,
    ov: usize,
    f: impl Fn(A, B, C, E) -> D,
) -> Result<&'v mut [D]> {
    let (x, y) = (view(n, x, sx, ox)?, view(n, y, sy, oy)?);
    let (z, w) = (view(n, z, sz, oz)?, view(n, w, sw, ow)?);
    let mut out = StridedViewMut::new(v, n, sv, ov)?;
    zip_map4_into(&mut out, &x, &y, &z, &w, f)?;
    Ok(out.into_data())
}

// ============================================================================
// quinary
// ============================================================================

/// `v[i] = f(x[i], y[i], z[i], w[i], u[i])` for `n` elements.
pub fn quinary<'v, A: Copy, B: Copy, C: Copy, E: Copy, G: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    y: &[B],
    sy: isize,
    z: &[C],
    sz: isize,
    w: &[E],
    sw: isize,
    u: &[G],
    su: isize,
    v: &'v mut [D],
    sv: isize,
    f: impl Fn(A, B, C, E, G) -> D,
) -> Result<&'v mut [D]> {
    quinary_ndarray(
        n,
        x,
        sx,
        stride_to_offset(n, sx),
        y,
        sy,
        stride_to_offset(n, sy),
        z,
        sz,
        stride_to_offset(n, sz),
        w,
        sw,
        stride_to_offset(n, sw),
        u,
        su,
        stride_to_offset(n, su),
        v,
        sv,
        stride_to_offset(n, sv),
        f,
    )
}

pub fn quinary_ndarray<'v, A: Copy, B: Copy, C: Copy, E: Copy, G: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    ox: usize,
    y: &[B],
    sy: isize,
    oy: usize,
    z: &[C],
    sz: isize,
    oz: usize,
    w: &[E],
    sw: isize,
    ow: usize,
    u: &[G],
    su: isize,
    ou: usize,
    v: &'v mut [D],
    sv: isize,
    ov: usize,
    f: impl Fn(A, B, C, E, G) -> D,
) -> Result<&'v mut [D]> {
    let (x, y) = (view(n, x, sx, ox)?, view(n, y, sy, oy)?);
    let (z, w, u) = (view(n, z, sz, oz)?, view(n, w, sw, ow)?, view(n, u, su, ou)?);
    let mut out = StridedViewMut::new(v, n, sv, ov)?;
    zip_map5_into(&mut out, &x, &y, &z, &w, &u, f)?;
    Ok(out.into_data())
}

// ============================================================================
// masked and accessor variants
// ============================================================================

/// `y[i] = f(x[i])` where `mask[i] == 0`; other positions keep their value.
pub fn mskunary<'y, A: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    mask: &[u8],
    sm: isize,
    y: &'y mut [D],
    sy: isize,
    f: impl Fn(A) -> D,
) -> Result<&'y mut [D]> {
    mskunary_ndarray(
        n,
        x,
        sx,
        stride_to_offset(n, sx),
        mask,
        sm,
        stride_to_offset(n, sm),
        y,
        sy,
        stride_to_offset(n, sy),
        f,
    )
}

pub fn mskunary_ndarray<'y, A: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    ox: usize,
    mask: &[u8],
    sm: isize,
    om: usize,
    y: &'y mut [D],
    sy: isize,
    oy: usize,
    f: impl Fn(A) -> D,
) -> Result<&'y mut [D]> {
    let (x, mask) = (view(n, x, sx, ox)?, view(n, mask, sm, om)?);
    let mut out = StridedViewMut::new(y, n, sy, oy)?;
    mask_map_into(&mut out, &x, &mask, f)?;
    Ok(out.into_data())
}

/// `y[i] = f(v)` with `v = accessor(x[i], ..)`; `None` skips the position.
pub fn unary_by<'y, A: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    y: &'y mut [D],
    sy: isize,
    f: impl Fn(A) -> D,
    accessor: impl FnMut(A, ByIndex<1>) -> Option<A>,
) -> Result<&'y mut [D]> {
    unary_by_ndarray(
        n,
        x,
        sx,
        stride_to_offset(n, sx),
        y,
        sy,
        stride_to_offset(n, sy),
        f,
        accessor,
    )
}

pub fn unary_by_ndarray<'y, A: Copy, D: Copy>(
    n: usize,
    x: &[A],
    sx: isize,
    ox: usize,
    y: &'y mut [D],
    sy: isize,
    oy: usize,
    f: impl Fn(A) -> D,
    accessor: impl FnMut(A, ByIndex<1>) -> Option<A>,
) -> Result<&'y mut [D]> {
    let x = view(n, x, sx, ox)?;
    let mut out = StridedViewMut::new(y, n, sy, oy)?;
    map_by_into(&mut out, &x, f, accessor)?;
    Ok(out.into_data())
}

// ============================================================================
// copy
// ============================================================================

/// `y[i] = x[i]` for `n` elements.
pub fn copy<'y, T: Copy>(n: usize, x: &[T], sx: isize, y: &'y mut [T], sy: isize) -> Result<&'y mut [T]> {
    copy_ndarray(n, x, sx, stride_to_offset(n, sx), y, sy, stride_to_offset(n, sy))
}

pub fn copy_ndarray<'y, T: Copy>(
    n: usize,
    x: &[T],
    sx: isize,
    ox: usize,
    y: &'y mut [T],
    sy: isize,
    oy: usize,
) -> Result<&'y mut [T]> {
    let x = view(n, x, sx, ox)?;
    let mut out = StridedViewMut::new(y, n, sy, oy)?;
    copy_into(&mut out, &x)?;
    Ok(out.into_data())
}
