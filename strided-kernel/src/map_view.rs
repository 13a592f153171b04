//! Element-wise apply loops over one-dimensional strided views.
//!
//! For arities zero through five these compute
//! `y[i] = f(x1[i], ..., xk[i])` for `i in 0..len`, where every operand is
//! read at `offset + i * stride` in its own buffer. Inputs and the output
//! may have different element types; the closure does any conversion.
//!
//! All lengths must agree. A zero-length output leaves the buffer
//! untouched.

use crate::kernel::{ensure_lens, Dst, Src};
use crate::simd;
use strided_view::{required_len, Result, StridedError, StridedView, StridedViewMut};

/// Nullary loop: `dest[i] = f()`.
///
/// `f` is called once per element in logical order, so it may carry state
/// (a counter, a random generator).
pub fn nullary_into<D: Copy>(dest: &mut StridedViewMut<D>, mut f: impl FnMut() -> D) -> Result<()> {
    let len = dest.len();
    if let Some(out) = dest.as_contiguous_slice_mut() {
        simd::dispatch_if_large(len, || out.iter_mut().for_each(|d| *d = f()));
        return Ok(());
    }
    let mut y = Dst::of(dest);
    for _ in 0..len {
        unsafe { y.put(f()) };
    }
    Ok(())
}

/// Unary loop: `dest[i] = f(src[i])`.
pub fn map_into<D: Copy, A: Copy>(
    dest: &mut StridedViewMut<D>,
    src: &StridedView<A>,
    f: impl Fn(A) -> D,
) -> Result<()> {
    ensure_lens(dest.len(), &[src.len()])?;
    let len = dest.len();

    if let Some(xs) = src.as_contiguous_slice() {
        if let Some(out) = dest.as_contiguous_slice_mut() {
            simd::dispatch_if_large(len, || {
                for (d, &x) in out.iter_mut().zip(xs) {
                    *d = f(x);
                }
            });
            return Ok(());
        }
    }

    let mut y = Dst::of(dest);
    let mut x = Src::of(src);
    for _ in 0..len {
        unsafe { y.put(f(x.next())) };
    }
    Ok(())
}

/// Binary loop: `dest[i] = f(a[i], b[i])`.
pub fn zip_map2_into<D: Copy, A: Copy, B: Copy>(
    dest: &mut StridedViewMut<D>,
    a: &StridedView<A>,
    b: &StridedView<B>,
    f: impl Fn(A, B) -> D,
) -> Result<()> {
    ensure_lens(dest.len(), &[a.len(), b.len()])?;
    let len = dest.len();

    if let (Some(xa), Some(xb)) = (a.as_contiguous_slice(), b.as_contiguous_slice()) {
        if let Some(out) = dest.as_contiguous_slice_mut() {
            simd::dispatch_if_large(len, || {
                for i in 0..len {
                    out[i] = f(xa[i], xb[i]);
                }
            });
            return Ok(());
        }
    }

    let mut y = Dst::of(dest);
    let (mut pa, mut pb) = (Src::of(a), Src::of(b));
    for _ in 0..len {
        unsafe { y.put(f(pa.next(), pb.next())) };
    }
    Ok(())
}

/// Ternary loop: `dest[i] = f(a[i], b[i], c[i])`.
pub fn zip_map3_into<D: Copy, A: Copy, B: Copy, C: Copy>(
    dest: &mut StridedViewMut<D>,
    a: &StridedView<A>,
    b: &StridedView<B>,
    c: &StridedView<C>,
    f: impl Fn(A, B, C) -> D,
) -> Result<()> {
    ensure_lens(dest.len(), &[a.len(), b.len(), c.len()])?;
    let len = dest.len();

    if let (Some(xa), Some(xb), Some(xc)) = (
        a.as_contiguous_slice(),
        b.as_contiguous_slice(),
        c.as_contiguous_slice(),
    ) {
        if let Some(out) = dest.as_contiguous_slice_mut() {
            simd::dispatch_if_large(len, || {
                for i in 0..len {
                    out[i] = f(xa[i], xb[i], xc[i]);
                }
            });
            return Ok(());
        }
    }

    let mut y = Dst::of(dest);
    let (mut pa, mut pb, mut pc) = (Src::of(a), Src::of(b), Src::of(c));
    for _ in 0..len {
        unsafe { y.put(f(pa.next(), pb.next(), pc.next())) };
    }
    Ok(())
}

/// Quaternary loop: `dest[i] = f(a[i], b[i], c[i], e[i])`.
pub fn zip_map4_into<D: Copy, A: Copy, B: Copy, C: Copy, E: Copy>(
    dest: &mut StridedViewMut<D>,
    a: &StridedView<A>,
    b: &StridedView<B>,
    c: &StridedView<C>,
    e: &StridedView<E>,
    f: impl Fn(A, B, C, E) -> D,
) -> Result<()> {
    ensure_lens(dest.len(), &[a.len(), b.len(), c.len(), e.len()])?;
    let len = dest.len();

    if let (Some(xa), Some(xb), Some(xc), Some(xe)) = (
        a.as_contiguous_slice(),
        b.as_contiguous_slice(),
        c.as_contiguous_slice(),
        e.as_contiguous_slice(),
    ) {
        if let Some(out) = dest.as_contiguous_slice_mut() {
            simd::dispatch_if_large(len, || {
                for i in 0..len {
                    out[i] = f(xa[i], xb[i], xc[i], xe[i]);
                }
            });
            return Ok(());
        }
    }

    let mut y = Dst::of(dest);
    let (mut pa, mut pb, mut pc, mut pe) = (Src::of(a), Src::of(b), Src::of(c), Src::of(e));
    for _ in 0..len {
        unsafe { y.put(f(pa.next(), pb.next(), pc.next(), pe.next())) };
    }
    Ok(())
}

/// Quinary loop: `dest[i] = f(a[i], b[i], c[i], e[i], g[i])`.
#[allow(clippy::too_many_arguments)]
pub fn zip_map5_into<D: Copy, A: Copy, B: Copy, C: Copy, E: Copy, G: Copy>(
    dest: &mut StridedViewMut<D>,
    a: &StridedView<A>,
    b: &StridedView<B>,
    c: &StridedView<C>,
    e: &StridedView<E>,
    g: &StridedView<G>,
    f: impl Fn(A, B, C, E, G) -> D,
) -> Result<()> {
    ensure_lens(dest.len(), &[a.len(), b.len(), c.len(), e.len(), g.len()])?;
    let len = dest.len();

    if let (Some(xa), Some(xb), Some(xc), Some(xe), Some(xg)) = (
        a.as_contiguous_slice(),
        b.as_contiguous_slice(),
        c.as_contiguous_slice(),
        e.as_contiguous_slice(),
        g.as_contiguous_slice(),
    ) {
        if let Some(out) = dest.as_contiguous_slice_mut() {
            simd::dispatch_if_large(len, || {
                for i in 0..len {
                    out[i] = f(xa[i], xb[i], xc[i], xe[i], xg[i]);
                }
            });
            return Ok(());
        }
    }

    let mut y = Dst::of(dest);
    let (mut pa, mut pb, mut pc) = (Src::of(a), Src::of(b), Src::of(c));
    let (mut pe, mut pg) = (Src::of(e), Src::of(g));
    for _ in 0..len {
        unsafe { y.put(f(pa.next(), pb.next(), pc.next(), pe.next(), pg.next())) };
    }
    Ok(())
}

/// In-place unary loop: `dest[i] = f(dest[i])`.
pub fn map_inplace<T: Copy>(dest: &mut StridedViewMut<T>, f: impl Fn(T) -> T) -> Result<()> {
    let len = dest.len();
    if let Some(out) = dest.as_contiguous_slice_mut() {
        simd::dispatch_if_large(len, || out.iter_mut().for_each(|d| *d = f(*d)));
        return Ok(());
    }
    let mut y = Dst::of(dest);
    for _ in 0..len {
        unsafe { y.put(f(y.current())) };
    }
    Ok(())
}

/// In-place binary loop: `dest[i] = f(dest[i], src[i])`.
pub fn zip_map2_inplace<T: Copy, A: Copy>(
    dest: &mut StridedViewMut<T>,
    src: &StridedView<A>,
    f: impl Fn(T, A) -> T,
) -> Result<()> {
    ensure_lens(dest.len(), &[src.len()])?;
    let len = dest.len();
    if let Some(xs) = src.as_contiguous_slice() {
        if let Some(out) = dest.as_contiguous_slice_mut() {
            simd::dispatch_if_large(len, || {
                for (d, &x) in out.iter_mut().zip(xs) {
                    *d = f(*d, x);
                }
            });
            return Ok(());
        }
    }
    let mut y = Dst::of(dest);
    let mut x = Src::of(src);
    for _ in 0..len {
        unsafe { y.put(f(y.current(), x.next())) };
    }
    Ok(())
}

/// Unary loop where input and output live in the same buffer.
///
/// Reads `data[ox + i * sx]` and writes `data[oy + i * sy]`, strictly in
/// logical order: a write at step `i` is visible to every read at step
/// `j > i` that hits the same storage index.
#[allow(clippy::too_many_arguments)]
pub fn map_within<T: Copy>(
    data: &mut [T],
    len: usize,
    sx: isize,
    ox: usize,
    sy: isize,
    oy: usize,
    f: impl Fn(T) -> T,
) -> Result<()> {
    for (stride, offset) in [(sx, ox), (sy, oy)] {
        let required = required_len(len, stride, offset)?;
        if required > data.len() {
            return Err(StridedError::InsufficientLength {
                required,
                actual: data.len(),
            });
        }
    }
    let (mut ix, mut iy) = (ox as isize, oy as isize);
    for _ in 0..len {
        data[iy as usize] = f(data[ix as usize]);
        // Past the last element the indices are never read.
        ix = ix.wrapping_add(sx);
        iy = iy.wrapping_add(sy);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_with_counter() {
        let mut buf = [0i32; 7];
        let mut out = StridedViewMut::new(&mut buf, 3, 3, 0).unwrap();
        let mut n = 0;
        nullary_into(&mut out, || {
            n += 1;
            n
        })
        .unwrap();
        assert_eq!(buf, [1, 0, 0, 2, 0, 0, 3]);
    }

    #[test]
    fn test_map_into_converts_types() {
        let x = [1u8, 2, 3];
        let mut buf = [0.0f64; 3];
        map_into(
            &mut StridedViewMut::from_slice(&mut buf),
            &StridedView::from_slice(&x),
            |v| v as f64 * 0.5,
        )
        .unwrap();
        assert_eq!(buf, [0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_zip_map2_length_mismatch() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0, 2.0];
        let mut buf = [0.0; 3];
        let err = zip_map2_into(
            &mut StridedViewMut::from_slice(&mut buf),
            &StridedView::from_slice(&a),
            &StridedView::from_slice(&b),
            |x, y| x + y,
        )
        .unwrap_err();
        assert_eq!(err, StridedError::LengthMismatch(3, 2));
        assert_eq!(buf, [0.0; 3]);
    }

    #[test]
    fn test_zip_map3_strided_output() {
        let a = [1, 2, 3];
        let b = [10, 20, 30];
        let c = [100, 200, 300];
        let mut buf = [0; 6];
        let mut out = StridedViewMut::new(&mut buf, 3, -2, 4).unwrap();
        zip_map3_into(
            &mut out,
            &StridedView::from_slice(&a),
            &StridedView::from_slice(&b),
            &StridedView::from_slice(&c),
            |x, y, z| x + y + z,
        )
        .unwrap();
        assert_eq!(buf, [333, 0, 222, 0, 111, 0]);
    }

    #[test]
    fn test_zip_map5_mixed_layouts() {
        let a = [1.0f32, 2.0];
        let b = [3.0f32];
        let c = [0.0f32, 5.0, 0.0, 6.0];
        let d = [7.0f32, 8.0];
        let e = [9.0f32, 10.0];
        let mut buf = [0.0f32; 2];
        zip_map5_into(
            &mut StridedViewMut::from_slice(&mut buf),
            &StridedView::from_slice(&a),
            &StridedView::new(&b, 2, 0, 0).unwrap(),
            &StridedView::new(&c, 2, 2, 1).unwrap(),
            &StridedView::from_slice(&d).reversed(),
            &StridedView::from_slice(&e),
            |a, b, c, d, e| a + b + c + d + e,
        )
        .unwrap();
        assert_eq!(buf, [1.0 + 3.0 + 5.0 + 8.0 + 9.0, 2.0 + 3.0 + 6.0 + 7.0 + 10.0]);
    }

    #[test]
    fn test_map_inplace_strided() {
        let mut buf = [1, 2, 3, 4, 5, 6];
        let mut v = StridedViewMut::new(&mut buf, 3, 2, 1).unwrap();
        map_inplace(&mut v, |x| -x).unwrap();
        assert_eq!(buf, [1, -2, 3, -4, 5, -6]);
    }

    #[test]
    fn test_zip_map_inplace_accumulates() {
        let mut buf = [1.0, 1.0, 1.0];
        let x = [1.0, 2.0, 3.0];
        zip_map2_inplace(
            &mut StridedViewMut::from_slice(&mut buf),
            &StridedView::from_slice(&x).reversed(),
            |y, x| y + 2.0 * x,
        )
        .unwrap();
        assert_eq!(buf, [7.0, 5.0, 3.0]);
    }

    #[test]
    fn test_map_within_observes_earlier_writes() {
        // y[i] = x[i] + 1 with y one step ahead of x: each write feeds the next read.
        let mut data = [1, 0, 0, 0];
        map_within(&mut data, 3, 1, 0, 1, 1, |v| v + 1).unwrap();
        assert_eq!(data, [1, 2, 3, 4]);
    }

    #[test]
    fn test_map_within_validates_both_views() {
        let mut data = [0u8; 3];
        let err = map_within(&mut data, 3, 1, 0, 1, 1, |v| v).unwrap_err();
        assert_eq!(
            err,
            StridedError::InsufficientLength {
                required: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_map_within_single_element_huge_stride() {
        let mut data = [0i32; 6];
        map_within(&mut data, 1, isize::MAX, 5, 1, 0, |v| v + 1).unwrap();
        assert_eq!(data, [1, 0, 0, 0, 0, 0]);

        let mut data = [4i32, 0];
        map_within(&mut data, 1, isize::MIN, 0, isize::MAX, 1, |v| v * 2).unwrap();
        assert_eq!(data, [4, 8]);
    }

    #[test]
    fn test_zero_length_leaves_output() {
        let x: [f64; 0] = [];
        let mut buf = [42.0; 2];
        let mut out = StridedViewMut::new(&mut buf, 0, 1, 0).unwrap();
        map_into(&mut out, &StridedView::from_slice(&x), |v| v).unwrap();
        assert_eq!(buf, [42.0; 2]);
    }
}
