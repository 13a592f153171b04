//! Apply loops gated by a mask.
//!
//! A mask is a `u8` view of the same length as the output. A zero mask value
//! means the position is computed; any non-zero value means it is skipped
//! and the output element keeps its previous contents.

use crate::kernel::{ensure_lens, Dst, Src};
use strided_view::{Result, StridedView, StridedViewMut};

/// `dest[i] = f(src[i])` wherever `mask[i] == 0`.
pub fn mask_map_into<D: Copy, A: Copy>(
    dest: &mut StridedViewMut<D>,
    src: &StridedView<A>,
    mask: &StridedView<u8>,
    f: impl Fn(A) -> D,
) -> Result<()> {
    ensure_lens(dest.len(), &[src.len(), mask.len()])?;
    let len = dest.len();
    let mut y = Dst::of(dest);
    let (mut x, mut m) = (Src::of(src), Src::of(mask));
    for _ in 0..len {
        unsafe {
            let v = x.next();
            if m.next() == 0 {
                y.put(f(v));
            } else {
                y.skip();
            }
        }
    }
    Ok(())
}

/// `dest[i] = f(a[i], b[i])` wherever `mask[i] == 0`.
pub fn mask_zip_map2_into<D: Copy, A: Copy, B: Copy>(
    dest: &mut StridedViewMut<D>,
    a: &StridedView<A>,
    b: &StridedView<B>,
    mask: &StridedView<u8>,
    f: impl Fn(A, B) -> D,
) -> Result<()> {
    ensure_lens(dest.len(), &[a.len(), b.len(), mask.len()])?;
    let len = dest.len();
    let mut y = Dst::of(dest);
    let (mut pa, mut pb, mut m) = (Src::of(a), Src::of(b), Src::of(mask));
    for _ in 0..len {
        unsafe {
            let (va, vb) = (pa.next(), pb.next());
            if m.next() == 0 {
                y.put(f(va, vb));
            } else {
                y.skip();
            }
        }
    }
    Ok(())
}

/// `dest[i] = f(dest[i])` wherever `mask[i] == 0`.
pub fn mask_map_inplace<T: Copy>(
    dest: &mut StridedViewMut<T>,
    mask: &StridedView<u8>,
    f: impl Fn(T) -> T,
) -> Result<()> {
    ensure_lens(dest.len(), &[mask.len()])?;
    let len = dest.len();
    let mut y = Dst::of(dest);
    let mut m = Src::of(mask);
    for _ in 0..len {
        unsafe {
            if m.next() == 0 {
                y.put(f(y.current()));
            } else {
                y.skip();
            }
        }
    }
    Ok(())
}
