//! Runtime-typed buffers and views.
//!
//! [`TypedBuffer`] owns a `Vec<T>` for one of the dtypes; [`TypedView`] and
//! [`TypedViewMut`] wrap a strided view of one. Kernels recover the
//! concrete element type through [`Element`].

use num_complex::{Complex32, Complex64};
use strided_view::{StridedView, StridedViewMut};

use crate::element::{Element, Uint8c};
use crate::{DType, Result, Value};

/// Run `$body` with `$v` bound to the payload of whichever variant `$value` is.
macro_rules! each_variant {
    ($value:expr, $enum:ident, $v:ident => $body:expr) => {
        match $value {
            $enum::Bool($v) => $body,
            $enum::Int8($v) => $body,
            $enum::Uint8($v) => $body,
            $enum::Uint8c($v) => $body,
            $enum::Int16($v) => $body,
            $enum::Uint16($v) => $body,
            $enum::Int32($v) => $body,
            $enum::Uint32($v) => $body,
            $enum::Float32($v) => $body,
            $enum::Float64($v) => $body,
            $enum::Complex64($v) => $body,
            $enum::Complex128($v) => $body,
            $enum::Generic($v) => $body,
        }
    };
}

pub(crate) use each_variant;

/// Run `$body` with the type alias `$t` bound to the element type of `$dtype`.
macro_rules! with_element {
    ($dtype:expr, $t:ident => $body:expr) => {
        match $dtype {
            $crate::DType::Bool => {
                type $t = bool;
                $body
            }
            $crate::DType::Int8 => {
                type $t = i8;
                $body
            }
            $crate::DType::Uint8 => {
                type $t = u8;
                $body
            }
            $crate::DType::Uint8c => {
                type $t = $crate::element::Uint8c;
                $body
            }
            $crate::DType::Int16 => {
                type $t = i16;
                $body
            }
            $crate::DType::Uint16 => {
                type $t = u16;
                $body
            }
            $crate::DType::Int32 => {
                type $t = i32;
                $body
            }
            $crate::DType::Uint32 => {
                type $t = u32;
                $body
            }
            $crate::DType::Float32 => {
                type $t = f32;
                $body
            }
            $crate::DType::Float64 => {
                type $t = f64;
                $body
            }
            $crate::DType::Complex64 => {
                type $t = num_complex::Complex32;
                $body
            }
            $crate::DType::Complex128 => {
                type $t = num_complex::Complex64;
                $body
            }
            $crate::DType::Generic => {
                type $t = $crate::Value;
                $body
            }
        }
    };
}
pub(crate) use with_element;

/// An owned buffer of one dtype.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedBuffer {
    Bool(Vec<bool>),
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Uint8c(Vec<Uint8c>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Complex64(Vec<Complex32>),
    Complex128(Vec<Complex64>),
    Generic(Vec<Value>),
}

impl TypedBuffer {
    /// `len` default-valued (zero) elements of `dtype`.
    pub fn zeros(dtype: DType, len: usize) -> Self {
        with_element!(dtype, T => T::wrap_vec(vec![T::default(); len]))
    }

    pub fn from_vec<T: Element>(data: Vec<T>) -> Self {
        T::wrap_vec(data)
    }

    pub fn dtype(&self) -> DType {
        each_variant!(self, TypedBuffer, v => element_dtype(v.as_slice()))
    }

    pub fn len(&self) -> usize {
        each_variant!(self, TypedBuffer, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(self)
    }

    pub fn as_mut_slice<T: Element>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(self)
    }

    /// Strided view with an explicit offset.
    pub fn view(&self, len: usize, stride: isize, offset: usize) -> Result<TypedView<'_>> {
        Ok(each_variant!(self, TypedBuffer, v => Element::wrap_view(StridedView::new(v, len, stride, offset)?)))
    }

    /// Strided output view with an explicit offset.
    pub fn view_mut(&mut self, len: usize, stride: isize, offset: usize) -> Result<TypedViewMut<'_>> {
        Ok(each_variant!(self, TypedBuffer, v => Element::wrap_view_mut(StridedViewMut::new(v, len, stride, offset)?)))
    }

    /// Contiguous view of the whole buffer.
    pub fn as_view(&self) -> TypedView<'_> {
        each_variant!(self, TypedBuffer, v => Element::wrap_view(StridedView::from_slice(v)))
    }

    pub fn as_view_mut(&mut self) -> TypedViewMut<'_> {
        each_variant!(self, TypedBuffer, v => Element::wrap_view_mut(StridedViewMut::from_slice(v)))
    }

    /// Element `i` as a [`Value`].
    pub fn get(&self, i: usize) -> Option<Value> {
        each_variant!(self, TypedBuffer, v => v.get(i).map(|&x| x.to_value()))
    }

    /// Convert every element to `dtype`.
    pub fn cast(&self, dtype: DType) -> TypedBuffer {
        with_element!(dtype, T => T::wrap_vec(self.as_view().cast_to::<T>()))
    }
}

#[inline]
fn element_dtype<T: Element>(_: &[T]) -> DType {
    T::DTYPE
}

/// A read-only strided view of one dtype.
#[derive(Debug, Clone, Copy)]
pub enum TypedView<'a> {
    Bool(StridedView<'a, bool>),
    Int8(StridedView<'a, i8>),
    Uint8(StridedView<'a, u8>),
    Uint8c(StridedView<'a, Uint8c>),
    Int16(StridedView<'a, i16>),
    Uint16(StridedView<'a, u16>),
    Int32(StridedView<'a, i32>),
    Uint32(StridedView<'a, u32>),
    Float32(StridedView<'a, f32>),
    Float64(StridedView<'a, f64>),
    Complex64(StridedView<'a, Complex32>),
    Complex128(StridedView<'a, Complex64>),
    Generic(StridedView<'a, Value>),
}

impl<'a> TypedView<'a> {
    pub fn dtype(&self) -> DType {
        each_variant!(self, TypedView, v => element_dtype(v.data()))
    }

    pub fn len(&self) -> usize {
        each_variant!(self, TypedView, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stride(&self) -> isize {
        each_variant!(self, TypedView, v => v.stride())
    }

    pub fn offset(&self) -> usize {
        each_variant!(self, TypedView, v => v.offset())
    }

    pub fn is_contiguous(&self) -> bool {
        each_variant!(self, TypedView, v => v.is_contiguous())
    }

    /// Start of the underlying buffer (not of logical element 0).
    pub fn buffer_ptr(&self) -> *const u8 {
        each_variant!(self, TypedView, v => v.data().as_ptr().cast::<u8>())
    }

    /// The view as concrete `T`, if the dtype matches.
    pub fn downcast<T: Element>(&self) -> Option<StridedView<'a, T>> {
        T::unwrap_view(self)
    }

    /// Logical elements `start..start + len` of the same buffer.
    pub fn subview(&self, start: usize, len: usize) -> Result<TypedView<'a>> {
        each_variant!(self, TypedView, v => Ok(Element::wrap_view(v.subview(start, len)?)))
    }

    /// Append the viewed elements, converted to `T`, to `out`.
    pub fn cast_extend<T: Element>(&self, out: &mut Vec<T>) {
        if let Some(v) = T::unwrap_view(self) {
            out.extend(v.iter().copied());
            return;
        }
        each_variant!(self, TypedView, v => out.extend(v.iter().map(|&x| T::from_value(x.to_value()))))
    }

    /// The viewed elements converted to `T`, in logical order.
    pub fn cast_to<T: Element>(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        self.cast_extend(&mut out);
        out
    }

    pub fn to_values(&self) -> Vec<Value> {
        self.cast_to::<Value>()
    }
}

/// A mutable strided view of one dtype.
#[derive(Debug)]
pub enum TypedViewMut<'a> {
    Bool(StridedViewMut<'a, bool>),
    Int8(StridedViewMut<'a, i8>),
    Uint8(StridedViewMut<'a, u8>),
    Uint8c(StridedViewMut<'a, Uint8c>),
    Int16(StridedViewMut<'a, i16>),
    Uint16(StridedViewMut<'a, u16>),
    Int32(StridedViewMut<'a, i32>),
    Uint32(StridedViewMut<'a, u32>),
    Float32(StridedViewMut<'a, f32>),
    Float64(StridedViewMut<'a, f64>),
    Complex64(StridedViewMut<'a, Complex32>),
    Complex128(StridedViewMut<'a, Complex64>),
    Generic(StridedViewMut<'a, Value>),
}

impl<'a> TypedViewMut<'a> {
    pub fn dtype(&self) -> DType {
        each_variant!(self, TypedViewMut, v => element_dtype(v.data()))
    }

    pub fn len(&self) -> usize {
        each_variant!(self, TypedViewMut, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stride(&self) -> isize {
        each_variant!(self, TypedViewMut, v => v.stride())
    }

    pub fn offset(&self) -> usize {
        each_variant!(self, TypedViewMut, v => v.offset())
    }

    pub fn is_contiguous(&self) -> bool {
        each_variant!(self, TypedViewMut, v => v.is_contiguous())
    }

    pub fn buffer_ptr_mut(&mut self) -> *mut u8 {
        each_variant!(self, TypedViewMut, v => v.data_mut().as_mut_ptr().cast::<u8>())
    }

    pub fn as_view(&self) -> TypedView<'_> {
        each_variant!(self, TypedViewMut, v => Element::wrap_view(v.as_view()))
    }

    pub fn downcast_mut<T: Element>(&mut self) -> Option<&mut StridedViewMut<'a, T>> {
        T::unwrap_view_mut(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_per_dtype() {
        for d in DType::ALL {
            let b = TypedBuffer::zeros(d, 3);
            assert_eq!(b.dtype(), d);
            assert_eq!(b.len(), 3);
        }
    }

    #[test]
    fn test_views_carry_dtype_and_layout() {
        let buf = TypedBuffer::from_vec(vec![1i16, 2, 3, 4]);
        let v = buf.view(2, -2, 3).unwrap();
        assert_eq!(v.dtype(), DType::Int16);
        assert_eq!((v.len(), v.stride(), v.offset()), (2, -2, 3));
        assert_eq!(v.cast_to::<f64>(), vec![4.0, 2.0]);
        assert!(v.downcast::<i32>().is_none());
        assert_eq!(v.downcast::<i16>().unwrap().to_vec(), vec![4, 2]);
    }

    #[test]
    fn test_view_bounds_are_checked() {
        let buf = TypedBuffer::zeros(DType::Float32, 4);
        assert!(buf.view(3, 2, 0).is_err());
    }

    #[test]
    fn test_cast_buffer() {
        let buf = TypedBuffer::from_vec(vec![-1.5f64, 300.0, 0.5]);
        let clamped = buf.cast(DType::Uint8c);
        assert_eq!(
            clamped.as_slice::<Uint8c>().unwrap(),
            &[Uint8c(0), Uint8c(255), Uint8c(0)]
        );
        let ints = buf.cast(DType::Int32);
        assert_eq!(ints.as_slice::<i32>().unwrap(), &[-1, 300, 0]);
        assert_eq!(buf.get(1), Some(Value::Float(300.0)));
    }

    #[test]
    fn test_view_mut_roundtrip() {
        let mut buf = TypedBuffer::zeros(DType::Uint16, 3);
        {
            let mut out = buf.as_view_mut();
            assert_eq!(out.as_view().dtype(), DType::Uint16);
            out.downcast_mut::<u16>().unwrap().set(1, 7).unwrap();
        }
        assert_eq!(buf.as_slice::<u16>().unwrap(), &[0, 7, 0]);
    }
}
