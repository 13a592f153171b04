//! Elementwise arithmetic with typed-storage semantics.
//!
//! Kernels that run over typed buffers must not panic on integer overflow,
//! so integer types use wrapping arithmetic (the same modular behavior as a
//! store into a fixed-width typed array). Floating-point and complex types
//! follow IEEE 754 and propagate NaN.
//!
//! Method names are prefixed with `elem_` so they never collide with the
//! `std::ops` traits when both are in scope.

use num_complex::Complex;

/// Elementwise arithmetic used by the dispatchable kernels.
pub trait Arith: Copy {
    fn elem_add(self, rhs: Self) -> Self;
    fn elem_sub(self, rhs: Self) -> Self;
    fn elem_mul(self, rhs: Self) -> Self;
    fn elem_neg(self) -> Self;
    fn elem_abs(self) -> Self;
}

macro_rules! impl_arith_float {
    ($($t:ty),*) => {
        $(impl Arith for $t {
            #[inline(always)]
            fn elem_add(self, rhs: Self) -> Self {
                self + rhs
            }
            #[inline(always)]
            fn elem_sub(self, rhs: Self) -> Self {
                self - rhs
            }
            #[inline(always)]
            fn elem_mul(self, rhs: Self) -> Self {
                self * rhs
            }
            #[inline(always)]
            fn elem_neg(self) -> Self {
                -self
            }
            #[inline(always)]
            fn elem_abs(self) -> Self {
                self.abs()
            }
        })*
    };
}

macro_rules! impl_arith_signed {
    ($($t:ty),*) => {
        $(impl Arith for $t {
            #[inline(always)]
            fn elem_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }
            #[inline(always)]
            fn elem_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }
            #[inline(always)]
            fn elem_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }
            #[inline(always)]
            fn elem_neg(self) -> Self {
                self.wrapping_neg()
            }
            #[inline(always)]
            fn elem_abs(self) -> Self {
                self.wrapping_abs()
            }
        })*
    };
}

macro_rules! impl_arith_unsigned {
    ($($t:ty),*) => {
        $(impl Arith for $t {
            #[inline(always)]
            fn elem_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }
            #[inline(always)]
            fn elem_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }
            #[inline(always)]
            fn elem_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }
            #[inline(always)]
            fn elem_neg(self) -> Self {
                self.wrapping_neg()
            }
            #[inline(always)]
            fn elem_abs(self) -> Self {
                self
            }
        })*
    };
}

impl_arith_float!(f32, f64);
impl_arith_signed!(i8, i16, i32, i64);
impl_arith_unsigned!(u8, u16, u32, u64);

// Boolean ring-like semantics: `+` is or, `-` is xor, `*` is and.
impl Arith for bool {
    #[inline(always)]
    fn elem_add(self, rhs: Self) -> Self {
        self | rhs
    }
    #[inline(always)]
    fn elem_sub(self, rhs: Self) -> Self {
        self ^ rhs
    }
    #[inline(always)]
    fn elem_mul(self, rhs: Self) -> Self {
        self & rhs
    }
    #[inline(always)]
    fn elem_neg(self) -> Self {
        self
    }
    #[inline(always)]
    fn elem_abs(self) -> Self {
        self
    }
}

impl<T> Arith for Complex<T>
where
    T: num_traits::Float,
{
    #[inline(always)]
    fn elem_add(self, rhs: Self) -> Self {
        self + rhs
    }
    #[inline(always)]
    fn elem_sub(self, rhs: Self) -> Self {
        self - rhs
    }
    #[inline(always)]
    fn elem_mul(self, rhs: Self) -> Self {
        self * rhs
    }
    #[inline(always)]
    fn elem_neg(self) -> Self {
        -self
    }
    /// Modulus, stored in the real part.
    #[inline(always)]
    fn elem_abs(self) -> Self {
        Complex::new(self.norm(), T::zero())
    }
}
