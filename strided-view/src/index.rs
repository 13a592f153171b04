//! Index arithmetic for one-dimensional strided views.

use std::iter::FusedIterator;

use crate::{Result, StridedError};

/// Starting storage offset for a view given only `(len, stride)`.
///
/// With a negative stride the traversal starts at the far end of the
/// buffer: `(1 - len) * stride`. Otherwise it starts at zero.
#[inline]
pub fn stride_to_offset(len: usize, stride: isize) -> usize {
    if stride < 0 && len > 0 {
        (len - 1).saturating_mul(stride.unsigned_abs())
    } else {
        0
    }
}

/// Span covered by `len` steps of `stride`, i.e. `(len - 1) * stride`.
#[inline]
fn span(len: usize, stride: isize) -> Result<isize> {
    if len <= 1 {
        return Ok(0);
    }
    let steps = isize::try_from(len - 1).map_err(|_| StridedError::OffsetOverflow)?;
    steps.checked_mul(stride).ok_or(StridedError::OffsetOverflow)
}

/// Lowest storage index touched by the view.
pub fn min_view_index(len: usize, stride: isize, offset: usize) -> Result<isize> {
    let offset = isize::try_from(offset).map_err(|_| StridedError::OffsetOverflow)?;
    let span = span(len, stride)?;
    if span < 0 {
        offset.checked_add(span).ok_or(StridedError::OffsetOverflow)
    } else {
        Ok(offset)
    }
}

/// Highest storage index touched by the view.
pub fn max_view_index(len: usize, stride: isize, offset: usize) -> Result<isize> {
    let offset = isize::try_from(offset).map_err(|_| StridedError::OffsetOverflow)?;
    let span = span(len, stride)?;
    if span > 0 {
        offset.checked_add(span).ok_or(StridedError::OffsetOverflow)
    } else {
        Ok(offset)
    }
}

/// Minimum storage length a buffer needs to back the view.
///
/// An empty view needs no storage. A view reaching below index zero is
/// rejected with [`StridedError::NegativeIndex`].
pub fn required_len(len: usize, stride: isize, offset: usize) -> Result<usize> {
    if len == 0 {
        return Ok(0);
    }
    let lo = min_view_index(len, stride, offset)?;
    if lo < 0 {
        return Err(StridedError::NegativeIndex {
            index: lo,
            len,
            stride,
            offset,
        });
    }
    let hi = max_view_index(len, stride, offset)?;
    (hi as usize)
        .checked_add(1)
        .ok_or(StridedError::OffsetOverflow)
}

/// Iterator over the storage indices `offset + i * stride` for `i in 0..len`.
///
/// Indices are computed incrementally, so arbitrarily large `len` costs no
/// memory. The iterator is double-ended: walking it backwards yields the
/// same indices in reverse order.
#[derive(Debug, Clone)]
pub struct StridedIndices {
    front: isize,
    back: isize,
    stride: isize,
    remaining: usize,
}

impl StridedIndices {
    /// Indices for a view of `len` elements.
    ///
    /// Arithmetic wraps instead of panicking; callers that need a guarantee
    /// that all indices are valid for a buffer should build a
    /// [`StridedView`](crate::StridedView) instead.
    pub fn new(len: usize, stride: isize, offset: isize) -> Self {
        let back = offset.wrapping_add((len.saturating_sub(1) as isize).wrapping_mul(stride));
        Self {
            front: offset,
            back,
            stride,
            remaining: len,
        }
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }
}

impl Iterator for StridedIndices {
    type Item = isize;

    #[inline]
    fn next(&mut self) -> Option<isize> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.front;
        self.front = self.front.wrapping_add(self.stride);
        self.remaining -= 1;
        Some(idx)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<isize> {
        if n >= self.remaining {
            self.front = self.back.wrapping_add(self.stride);
            self.remaining = 0;
            return None;
        }
        self.front = self
            .front
            .wrapping_add((n as isize).wrapping_mul(self.stride));
        self.remaining -= n;
        self.next()
    }
}

impl DoubleEndedIterator for StridedIndices {
    #[inline]
    fn next_back(&mut self) -> Option<isize> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.back;
        self.back = self.back.wrapping_sub(self.stride);
        self.remaining -= 1;
        Some(idx)
    }
}

impl ExactSizeIterator for StridedIndices {}

impl FusedIterator for StridedIndices {}
