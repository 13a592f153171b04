//! Staging of runtime-typed inputs as views of one element type.
//!
//! An input whose dtype already is `T` is read in place. Any other input is
//! converted block by block into a scratch buffer of [`CAST_BLOCK`]
//! elements, so a mixed-dtype call allocates a fixed amount per input no
//! matter how long the arrays are.

use strided_view::{StridedError, StridedView, StridedViewMut};

use crate::buffer::TypedView;
use crate::element::Element;
use crate::Result;

/// Elements converted per block for inputs whose dtype differs from `T`.
pub const CAST_BLOCK: usize = 1024;

/// An input read as `T`.
enum Staged<'a, T> {
    Borrowed(StridedView<'a, T>),
    Cast { src: TypedView<'a>, scratch: Vec<T> },
}

impl<'a, T: Element> Staged<'a, T> {
    fn of(view: &TypedView<'a>) -> Self {
        match view.downcast::<T>() {
            Some(v) => Staged::Borrowed(v),
            None => Staged::Cast {
                src: *view,
                scratch: Vec::with_capacity(CAST_BLOCK.min(view.len())),
            },
        }
    }

    fn is_borrowed(&self) -> bool {
        matches!(self, Staged::Borrowed(_))
    }

    /// Logical elements `start..start + len` as a `T` view.
    fn block(&mut self, start: usize, len: usize) -> Result<StridedView<'_, T>> {
        match self {
            Staged::Borrowed(v) => Ok(v.subview(start, len)?),
            Staged::Cast { src, scratch } => {
                scratch.clear();
                src.subview(start, len)?.cast_extend(scratch);
                Ok(StridedView::from_slice(scratch))
            }
        }
    }
}

/// Run `body` over matching blocks of `inputs` (read as `T`) and `dest`.
///
/// `body` receives the logical index of the block's first element. When no
/// input needs conversion there is a single block covering everything, so
/// contiguous operands keep their fast path. Lengths are checked before
/// `body` first runs.
pub(crate) fn for_each_block<T: Element>(
    inputs: &[TypedView<'_>],
    dest: &mut StridedViewMut<'_, T>,
    mut body: impl FnMut(usize, &[StridedView<'_, T>], &mut StridedViewMut<'_, T>) -> Result<()>,
) -> Result<()> {
    let len = dest.len();
    if let Some(v) = inputs.iter().find(|v| v.len() != len) {
        return Err(StridedError::LengthMismatch(len, v.len()).into());
    }
    let mut staged: Vec<Staged<'_, T>> = inputs.iter().map(Staged::of).collect();
    let block = if staged.iter().all(Staged::is_borrowed) {
        len
    } else {
        CAST_BLOCK
    };

    let mut start = 0;
    while start < len {
        let n = block.min(len - start);
        let views = staged
            .iter_mut()
            .map(|s| s.block(start, n))
            .collect::<Result<Vec<_>>>()?;
        body(start, &views, &mut dest.subview_mut(start, n)?)?;
        start += n;
    }
    Ok(())
}
