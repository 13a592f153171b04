//! Shared plumbing for the apply loops: length checks and pointer cursors.
//!
//! Every kernel in this crate follows the same shape: validate that all
//! operands have the same logical length, try a contiguous slice fast path,
//! and otherwise walk each operand with a [`Src`]/[`Dst`] cursor that steps
//! by the operand's stride.

use strided_view::{Result, StridedError, StridedView, StridedViewMut};

// ============================================================================
// Length validation
// ============================================================================

#[inline]
pub(crate) fn ensure_same_len(a: usize, b: usize) -> Result<()> {
    if a != b {
        return Err(StridedError::LengthMismatch(a, b));
    }
    Ok(())
}

/// Checks every input length against the output length.
#[inline]
pub(crate) fn ensure_lens(out: usize, inputs: &[usize]) -> Result<()> {
    inputs.iter().try_for_each(|&n| ensure_same_len(out, n))
}

// ============================================================================
// Cursors
//
// A cursor holds a pointer to the current element and the stride in
// elements. Advancing uses `wrapping_offset`: after the last element the
// pointer may leave the allocation (or go below it for negative strides),
// but it is never dereferenced again.
// ============================================================================

/// Read cursor over a validated [`StridedView`].
pub(crate) struct Src<T> {
    ptr: *const T,
    stride: isize,
}

impl<T: Copy> Src<T> {
    #[inline(always)]
    pub(crate) fn of(view: &StridedView<'_, T>) -> Self {
        Self {
            ptr: view.ptr(),
            stride: view.stride(),
        }
    }

    /// Reads the current element and steps to the next one.
    ///
    /// # Safety
    /// Must be called at most `view.len()` times for the view this cursor
    /// was built from.
    #[inline(always)]
    pub(crate) unsafe fn next(&mut self) -> T {
        let v = *self.ptr;
        self.ptr = self.ptr.wrapping_offset(self.stride);
        v
    }
}

/// Write cursor over a validated [`StridedViewMut`].
pub(crate) struct Dst<T> {
    ptr: *mut T,
    stride: isize,
}

impl<T: Copy> Dst<T> {
    #[inline(always)]
    pub(crate) fn of(view: &mut StridedViewMut<'_, T>) -> Self {
        Self {
            stride: view.stride(),
            ptr: view.as_mut_ptr(),
        }
    }

    /// Current element, without advancing.
    ///
    /// # Safety
    /// Same contract as [`Src::next`].
    #[inline(always)]
    pub(crate) unsafe fn current(&self) -> T {
        *self.ptr
    }

    /// Writes the current element and steps to the next one.
    ///
    /// # Safety
    /// Same contract as [`Src::next`].
    #[inline(always)]
    pub(crate) unsafe fn put(&mut self, v: T) {
        *self.ptr = v;
        self.skip();
    }

    /// Steps to the next element without writing.
    #[inline(always)]
    pub(crate) fn skip(&mut self) {
        self.ptr = self.ptr.wrapping_offset(self.stride);
    }
}
