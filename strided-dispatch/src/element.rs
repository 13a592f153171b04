//! Concrete element types behind each dtype.

use num_complex::{Complex, Complex32, Complex64};
use strided_traits::Arith;
use strided_view::{StridedView, StridedViewMut};

use crate::buffer::{TypedBuffer, TypedView, TypedViewMut};
use crate::{DType, Value};

/// Unsigned byte with clamping semantics (`uint8c`).
///
/// Arithmetic saturates at `0` and `255`. Converting a float rounds half to
/// even after clamping; NaN becomes `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Uint8c(pub u8);

impl Uint8c {
    pub fn from_f64(x: f64) -> Self {
        if x.is_nan() {
            return Uint8c(0);
        }
        Uint8c(x.clamp(0.0, 255.0).round_ties_even() as u8)
    }

    pub fn from_i64(x: i64) -> Self {
        Uint8c(x.clamp(0, 255) as u8)
    }
}

impl Arith for Uint8c {
    #[inline(always)]
    fn elem_add(self, rhs: Self) -> Self {
        Uint8c(self.0.saturating_add(rhs.0))
    }
    #[inline(always)]
    fn elem_sub(self, rhs: Self) -> Self {
        Uint8c(self.0.saturating_sub(rhs.0))
    }
    #[inline(always)]
    fn elem_mul(self, rhs: Self) -> Self {
        Uint8c(self.0.saturating_mul(rhs.0))
    }
    #[inline(always)]
    fn elem_neg(self) -> Self {
        Uint8c(0)
    }
    #[inline(always)]
    fn elem_abs(self) -> Self {
        self
    }
}

/// A Rust type that is the storage type of one [`DType`].
///
/// Besides the value conversions this trait carries the plumbing that moves
/// a concrete buffer or view in and out of the runtime-typed enums.
pub trait Element: Arith + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    const DTYPE: DType;

    fn to_value(self) -> Value;

    /// Conversion from any value. Integers wrap, `uint8c` clamps, floats
    /// truncate toward zero when stored into an integer type.
    fn from_value(v: Value) -> Self;

    fn wrap_vec(data: Vec<Self>) -> TypedBuffer;
    fn slice(buf: &TypedBuffer) -> Option<&[Self]>;
    fn slice_mut(buf: &mut TypedBuffer) -> Option<&mut [Self]>;
    fn wrap_view(view: StridedView<'_, Self>) -> TypedView<'_>;
    fn unwrap_view<'a>(view: &TypedView<'a>) -> Option<StridedView<'a, Self>>;
    fn wrap_view_mut(view: StridedViewMut<'_, Self>) -> TypedViewMut<'_>;
    fn unwrap_view_mut<'b, 'a>(
        view: &'b mut TypedViewMut<'a>,
    ) -> Option<&'b mut StridedViewMut<'a, Self>>;
}

macro_rules! plumbing {
    ($variant:ident) => {
        const DTYPE: DType = DType::$variant;

        fn wrap_vec(data: Vec<Self>) -> TypedBuffer {
            TypedBuffer::$variant(data)
        }
        fn slice(buf: &TypedBuffer) -> Option<&[Self]> {
            match buf {
                TypedBuffer::$variant(v) => Some(v.as_slice()),
                _ => None,
            }
        }
        fn slice_mut(buf: &mut TypedBuffer) -> Option<&mut [Self]> {
            match buf {
                TypedBuffer::$variant(v) => Some(v.as_mut_slice()),
                _ => None,
            }
        }
        fn wrap_view(view: StridedView<'_, Self>) -> TypedView<'_> {
            TypedView::$variant(view)
        }
        fn unwrap_view<'a>(view: &TypedView<'a>) -> Option<StridedView<'a, Self>> {
            match view {
                TypedView::$variant(v) => Some(*v),
                _ => None,
            }
        }
        fn wrap_view_mut(view: StridedViewMut<'_, Self>) -> TypedViewMut<'_> {
            TypedViewMut::$variant(view)
        }
        fn unwrap_view_mut<'b, 'a>(
            view: &'b mut TypedViewMut<'a>,
        ) -> Option<&'b mut StridedViewMut<'a, Self>> {
            match view {
                TypedViewMut::$variant(v) => Some(v),
                _ => None,
            }
        }
    };
}

impl Element for bool {
    plumbing!(Bool);

    fn to_value(self) -> Value {
        Value::Bool(self)
    }
    fn from_value(v: Value) -> Self {
        v.is_truthy()
    }
}

macro_rules! impl_int_element {
    ($($t:ty => $variant:ident),*) => {
        $(impl Element for $t {
            plumbing!($variant);

            fn to_value(self) -> Value {
                Value::Int(self as i64)
            }
            fn from_value(v: Value) -> Self {
                v.as_i64() as $t
            }
        })*
    };
}

impl_int_element!(
    i8 => Int8,
    u8 => Uint8,
    i16 => Int16,
    u16 => Uint16,
    i32 => Int32,
    u32 => Uint32
);

impl Element for Uint8c {
    plumbing!(Uint8c);

    fn to_value(self) -> Value {
        Value::Int(self.0 as i64)
    }
    fn from_value(v: Value) -> Self {
        match v {
            Value::Float(x) => Uint8c::from_f64(x),
            Value::Complex(c) => Uint8c::from_f64(c.re),
            other => Uint8c::from_i64(other.as_i64()),
        }
    }
}

impl Element for f32 {
    plumbing!(Float32);

    fn to_value(self) -> Value {
        Value::Float(self as f64)
    }
    fn from_value(v: Value) -> Self {
        v.as_f64() as f32
    }
}

impl Element for f64 {
    plumbing!(Float64);

    fn to_value(self) -> Value {
        Value::Float(self)
    }
    fn from_value(v: Value) -> Self {
        v.as_f64()
    }
}

impl Element for Complex32 {
    plumbing!(Complex64);

    fn to_value(self) -> Value {
        Value::Complex(Complex64::new(self.re as f64, self.im as f64))
    }
    fn from_value(v: Value) -> Self {
        let c = v.as_complex();
        Complex::new(c.re as f32, c.im as f32)
    }
}

impl Element for Complex64 {
    plumbing!(Complex128);

    fn to_value(self) -> Value {
        Value::Complex(self)
    }
    fn from_value(v: Value) -> Self {
        v.as_complex()
    }
}

impl Element for Value {
    plumbing!(Generic);

    fn to_value(self) -> Value {
        self
    }
    fn from_value(v: Value) -> Self {
        v
    }
}

/// Convert one element between storage types through [`Value`].
#[inline]
pub fn cast<S: Element, T: Element>(x: S) -> T {
    T::from_value(x.to_value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint8c_saturates() {
        assert_eq!(Uint8c(250).elem_add(Uint8c(10)), Uint8c(255));
        assert_eq!(Uint8c(3).elem_sub(Uint8c(10)), Uint8c(0));
        assert_eq!(Uint8c(16).elem_mul(Uint8c(16)), Uint8c(255));
        assert_eq!(Uint8c(9).elem_neg(), Uint8c(0));
    }

    #[test]
    fn test_uint8c_rounding() {
        assert_eq!(Uint8c::from_f64(2.5), Uint8c(2));
        assert_eq!(Uint8c::from_f64(3.5), Uint8c(4));
        assert_eq!(Uint8c::from_f64(f64::NAN), Uint8c(0));
        assert_eq!(Uint8c::from_f64(1e9), Uint8c(255));
        assert_eq!(Uint8c::from_i64(-4), Uint8c(0));
    }

    #[test]
    fn test_integer_casts_wrap() {
        assert_eq!(cast::<i32, i8>(200), -56);
        assert_eq!(cast::<i16, u8>(-1), 255);
        assert_eq!(cast::<f64, i16>(-7.9), -7);
        assert_eq!(cast::<u8, Uint8c>(200), Uint8c(200));
        assert!(cast::<f32, bool>(0.5));
    }

    #[test]
    fn test_widening_casts_are_exact() {
        assert_eq!(cast::<i32, f64>(i32::MIN), i32::MIN as f64);
        assert_eq!(cast::<u32, f64>(u32::MAX), u32::MAX as f64);
        assert_eq!(cast::<f32, Complex32>(1.5), Complex32::new(1.5, 0.0));
        assert_eq!(
            cast::<Complex32, Complex64>(Complex32::new(0.25, -2.0)),
            Complex64::new(0.25, -2.0)
        );
        assert_eq!(cast::<i8, Value>(-3), Value::Int(-3));
    }

    #[test]
    fn test_dtype_constants() {
        assert_eq!(<Uint8c as Element>::DTYPE, DType::Uint8c);
        assert_eq!(<Complex32 as Element>::DTYPE, DType::Complex64);
        assert_eq!(<Value as Element>::DTYPE, DType::Generic);
    }
}
