//! Bounds-checked one-dimensional strided views.
//!
//! - [`StridedView`]: immutable view over `&[T]`
//! - [`StridedViewMut`]: mutable view over `&mut [T]`
//!
//! Construction validates that every index `offset + i * stride`,
//! `i in 0..len`, lies inside the borrowed buffer. Kernels rely on that
//! invariant and walk raw pointers without re-checking.

use crate::index::{required_len, stride_to_offset, StridedIndices};
use crate::{Result, StridedError};

// ============================================================================
// Validation helpers
// ============================================================================

/// Validate that all accessed indices stay within `[0, buf_len)`.
fn validate_bounds(buf_len: usize, len: usize, stride: isize, offset: usize) -> Result<()> {
    let required = required_len(len, stride, offset)?;
    if required > buf_len {
        return Err(StridedError::InsufficientLength {
            required,
            actual: buf_len,
        });
    }
    Ok(())
}

/// Storage index of the last logical element (`offset` for empty views).
#[inline]
fn last_index(len: usize, stride: isize, offset: usize) -> usize {
    if len == 0 {
        return offset;
    }
    (offset as isize + (len as isize - 1) * stride) as usize
}

/// Storage offset of logical element `start` of a sub-range `start..end`.
fn subrange_offset(len: usize, stride: isize, offset: usize, start: usize, end: usize) -> Result<usize> {
    if start > end || end > len {
        return Err(StridedError::IndexOutOfBounds { index: end.max(start), len });
    }
    if start == end {
        return Ok(offset);
    }
    Ok((offset as isize + start as isize * stride) as usize)
}

/// Negated stride. `isize::MIN` only validates with `len <= 1`, where the
/// stride is never stepped, so wrapping is harmless.
#[inline]
fn reversed_stride(stride: isize) -> isize {
    stride.wrapping_neg()
}

// ============================================================================
// StridedView
// ============================================================================

/// Immutable strided view: `len` logical elements at `offset + i * stride`.
pub struct StridedView<'a, T> {
    data: &'a [T],
    len: usize,
    stride: isize,
    offset: usize,
}

impl<T> Clone for StridedView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StridedView<'_, T> {}

impl<T: std::fmt::Debug> std::fmt::Debug for StridedView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedView")
            .field("len", &self.len)
            .field("stride", &self.stride)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> StridedView<'a, T> {
    /// Create a view with an explicit starting offset ("ndarray" convention).
    pub fn new(data: &'a [T], len: usize, stride: isize, offset: usize) -> Result<Self> {
        validate_bounds(data.len(), len, stride, offset)?;
        Ok(Self {
            data,
            len,
            stride,
            offset,
        })
    }

    /// Create a view whose offset is derived from the stride.
    ///
    /// A negative stride starts at the far end of the buffer, so
    /// `with_stride(x, n, -1)` walks the first `n` elements backwards.
    pub fn with_stride(data: &'a [T], len: usize, stride: isize) -> Result<Self> {
        Self::new(data, len, stride, stride_to_offset(len, stride))
    }

    /// View the whole slice with unit stride.
    pub fn from_slice(data: &'a [T]) -> Self {
        Self {
            data,
            len: data.len(),
            stride: 1,
            offset: 0,
        }
    }

    /// Create a view without bounds checking.
    ///
    /// # Safety
    /// Every index `offset + i * stride` for `i in 0..len` must be in bounds.
    pub unsafe fn new_unchecked(data: &'a [T], len: usize, stride: isize, offset: usize) -> Self {
        Self {
            data,
            len,
            stride,
            offset,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The whole underlying buffer, not only the viewed elements.
    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Raw pointer to logical element 0.
    #[inline]
    pub fn ptr(&self) -> *const T {
        self.data.as_ptr().wrapping_add(self.offset)
    }

    /// Unit stride (or at most one element).
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.stride == 1 || self.len <= 1
    }

    /// The viewed elements as a slice when the view is contiguous.
    pub fn as_contiguous_slice(&self) -> Option<&'a [T]> {
        if self.len == 0 {
            return Some(&[]);
        }
        if self.is_contiguous() {
            Some(&self.data[self.offset..self.offset + self.len])
        } else {
            None
        }
    }

    /// Storage indices visited by the view, in logical order.
    #[inline]
    pub fn indices(&self) -> StridedIndices {
        StridedIndices::new(self.len, self.stride, self.offset as isize)
    }

    /// Element at logical position `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&'a T> {
        if i >= self.len {
            return None;
        }
        let idx = (self.offset as isize + i as isize * self.stride) as usize;
        self.data.get(idx)
    }

    /// Iterate over the viewed elements in logical order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'a T> + ExactSizeIterator + 'a {
        let data = self.data;
        self.indices().map(move |idx| &data[idx as usize])
    }

    /// Logical elements `start..start + len` over the same buffer.
    pub fn subview(&self, start: usize, len: usize) -> Result<Self> {
        let end = start.checked_add(len).ok_or(StridedError::OffsetOverflow)?;
        let offset = subrange_offset(self.len, self.stride, self.offset, start, end)?;
        Ok(Self {
            data: self.data,
            len,
            stride: self.stride,
            offset,
        })
    }

    /// The same elements in reverse logical order (stride negated).
    pub fn reversed(&self) -> Self {
        Self {
            data: self.data,
            len: self.len,
            stride: reversed_stride(self.stride),
            offset: last_index(self.len, self.stride, self.offset),
        }
    }

    /// Copy the viewed elements into a new vector.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

// ============================================================================
// StridedViewMut
// ============================================================================

/// Mutable strided view: `len` logical elements at `offset + i * stride`.
pub struct StridedViewMut<'a, T> {
    data: &'a mut [T],
    len: usize,
    stride: isize,
    offset: usize,
}

impl<T: std::fmt::Debug> std::fmt::Debug for StridedViewMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedViewMut")
            .field("len", &self.len)
            .field("stride", &self.stride)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> StridedViewMut<'a, T> {
    /// Create a mutable view with an explicit starting offset.
    pub fn new(data: &'a mut [T], len: usize, stride: isize, offset: usize) -> Result<Self> {
        validate_bounds(data.len(), len, stride, offset)?;
        Ok(Self {
            data,
            len,
            stride,
            offset,
        })
    }

    /// Create a mutable view whose offset is derived from the stride.
    pub fn with_stride(data: &'a mut [T], len: usize, stride: isize) -> Result<Self> {
        let offset = stride_to_offset(len, stride);
        Self::new(data, len, stride, offset)
    }

    /// View the whole slice with unit stride.
    pub fn from_slice(data: &'a mut [T]) -> Self {
        let len = data.len();
        Self {
            data,
            len,
            stride: 1,
            offset: 0,
        }
    }

    /// Create a mutable view without bounds checking.
    ///
    /// # Safety
    /// Every index `offset + i * stride` for `i in 0..len` must be in bounds.
    pub unsafe fn new_unchecked(
        data: &'a mut [T],
        len: usize,
        stride: isize,
        offset: usize,
    ) -> Self {
        Self {
            data,
            len,
            stride,
            offset,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &*self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Give back the whole underlying buffer.
    #[inline]
    pub fn into_data(self) -> &'a mut [T] {
        self.data
    }

    /// Raw const pointer to logical element 0.
    #[inline]
    pub fn ptr(&self) -> *const T {
        self.data.as_ptr().wrapping_add(self.offset)
    }

    /// Raw mutable pointer to logical element 0.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr().wrapping_add(self.offset)
    }

    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.stride == 1 || self.len <= 1
    }

    /// The viewed elements as a mutable slice when the view is contiguous.
    pub fn as_contiguous_slice_mut(&mut self) -> Option<&mut [T]> {
        if self.len == 0 {
            return Some(&mut []);
        }
        if self.is_contiguous() {
            Some(&mut self.data[self.offset..self.offset + self.len])
        } else {
            None
        }
    }

    #[inline]
    pub fn indices(&self) -> StridedIndices {
        StridedIndices::new(self.len, self.stride, self.offset as isize)
    }

    /// Immutable view of the same elements.
    pub fn as_view(&self) -> StridedView<'_, T> {
        StridedView {
            data: &*self.data,
            len: self.len,
            stride: self.stride,
            offset: self.offset,
        }
    }

    /// Shorter-lived mutable view of the same elements.
    pub fn reborrow(&mut self) -> StridedViewMut<'_, T> {
        StridedViewMut {
            data: &mut *self.data,
            len: self.len,
            stride: self.stride,
            offset: self.offset,
        }
    }

    /// Mutable view of logical elements `start..start + len`.
    pub fn subview_mut(&mut self, start: usize, len: usize) -> Result<StridedViewMut<'_, T>> {
        let end = start.checked_add(len).ok_or(StridedError::OffsetOverflow)?;
        let offset = subrange_offset(self.len, self.stride, self.offset, start, end)?;
        Ok(StridedViewMut {
            data: &mut *self.data,
            len,
            stride: self.stride,
            offset,
        })
    }

    /// The same elements in reverse logical order (stride negated).
    pub fn reversed(self) -> Self {
        let offset = last_index(self.len, self.stride, self.offset);
        Self {
            data: self.data,
            len: self.len,
            stride: reversed_stride(self.stride),
            offset,
        }
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&T> {
        if i >= self.len {
            return None;
        }
        let idx = (self.offset as isize + i as isize * self.stride) as usize;
        self.data.get(idx)
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        if i >= self.len {
            return None;
        }
        let idx = (self.offset as isize + i as isize * self.stride) as usize;
        self.data.get_mut(idx)
    }

    /// Store `value` at logical position `i`.
    pub fn set(&mut self, i: usize, value: T) -> Result<()> {
        let len = self.len;
        match self.get_mut(i) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StridedError::IndexOutOfBounds { index: i, len }),
        }
    }

    /// Copy the viewed elements into a new vector.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_view().to_vec()
    }
}
