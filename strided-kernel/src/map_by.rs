//! Apply loops with a per-element accessor callback.
//!
//! Before each element is computed the accessor receives the input values
//! and their positions. It returns the (possibly replaced) values to feed
//! into the kernel, or `None` to leave that output element untouched.

use crate::kernel::{ensure_lens, Dst, Src};
use strided_view::{Result, StridedView, StridedViewMut};

/// Position handed to an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByIndex<const N: usize> {
    /// Logical iteration index.
    pub i: usize,
    /// Storage index read from each input buffer.
    pub inputs: [usize; N],
    /// Storage index written in the output buffer.
    pub output: usize,
}

/// `dest[i] = f(v)` where `v = accessor(src[i], ..)`, skipping `None`.
pub fn map_by_into<D: Copy, A: Copy>(
    dest: &mut StridedViewMut<D>,
    src: &StridedView<A>,
    f: impl Fn(A) -> D,
    mut accessor: impl FnMut(A, ByIndex<1>) -> Option<A>,
) -> Result<()> {
    ensure_lens(dest.len(), &[src.len()])?;
    let positions = src.indices().zip(dest.indices()).enumerate();
    let mut y = Dst::of(dest);
    let mut x = Src::of(src);
    for (i, (ix, iy)) in positions {
        let at = ByIndex {
            i,
            inputs: [ix as usize],
            output: iy as usize,
        };
        match accessor(unsafe { x.next() }, at) {
            Some(v) => unsafe { y.put(f(v)) },
            None => y.skip(),
        }
    }
    Ok(())
}

/// `dest[i] = f(va, vb)` where `(va, vb) = accessor(a[i], b[i], ..)`, skipping `None`.
pub fn zip_map2_by_into<D: Copy, A: Copy, B: Copy>(
    dest: &mut StridedViewMut<D>,
    a: &StridedView<A>,
    b: &StridedView<B>,
    f: impl Fn(A, B) -> D,
    mut accessor: impl FnMut(A, B, ByIndex<2>) -> Option<(A, B)>,
) -> Result<()> {
    ensure_lens(dest.len(), &[a.len(), b.len()])?;
    let positions = a.indices().zip(b.indices()).zip(dest.indices()).enumerate();
    let mut y = Dst::of(dest);
    let (mut pa, mut pb) = (Src::of(a), Src::of(b));
    for (i, ((ia, ib), iy)) in positions {
        let at = ByIndex {
            i,
            inputs: [ia as usize, ib as usize],
            output: iy as usize,
        };
        let (va, vb) = unsafe { (pa.next(), pb.next()) };
        match accessor(va, vb, at) {
            Some((va, vb)) => unsafe { y.put(f(va, vb)) },
            None => y.skip(),
        }
    }
    Ok(())
}
