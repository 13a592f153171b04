//! Boxed element type backing the `generic` dtype.

use std::fmt;

use num_complex::Complex64;
use strided_traits::Arith;

/// A dynamically typed scalar.
///
/// Arithmetic between two values of different kinds runs in the wider kind
/// (`Bool < Int < Float < Complex`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex(Complex64),
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

impl Value {
    fn rank(self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) => 1,
            Value::Float(_) => 2,
            Value::Complex(_) => 3,
        }
    }

    pub fn is_truthy(self) -> bool {
        match self {
            Value::Bool(b) => b,
            Value::Int(i) => i != 0,
            Value::Float(f) => f != 0.0 && !f.is_nan(),
            Value::Complex(c) => c.re != 0.0 || c.im != 0.0,
        }
    }

    /// Integer view of the value; floats truncate toward zero and saturate.
    pub fn as_i64(self) -> i64 {
        match self {
            Value::Bool(b) => b as i64,
            Value::Int(i) => i,
            Value::Float(f) => f as i64,
            Value::Complex(c) => c.re as i64,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Value::Bool(b) => b as u8 as f64,
            Value::Int(i) => i as f64,
            Value::Float(f) => f,
            Value::Complex(c) => c.re,
        }
    }

    pub fn as_complex(self) -> Complex64 {
        match self {
            Value::Complex(c) => c,
            other => Complex64::new(other.as_f64(), 0.0),
        }
    }

    #[inline]
    fn combine(
        self,
        rhs: Self,
        on_bool: fn(bool, bool) -> bool,
        on_int: fn(i64, i64) -> i64,
        on_float: fn(f64, f64) -> f64,
        on_complex: fn(Complex64, Complex64) -> Complex64,
    ) -> Self {
        match self.rank().max(rhs.rank()) {
            0 => Value::Bool(on_bool(self.is_truthy(), rhs.is_truthy())),
            1 => Value::Int(on_int(self.as_i64(), rhs.as_i64())),
            2 => Value::Float(on_float(self.as_f64(), rhs.as_f64())),
            _ => Value::Complex(on_complex(self.as_complex(), rhs.as_complex())),
        }
    }
}

impl Arith for Value {
    fn elem_add(self, rhs: Self) -> Self {
        self.combine(rhs, bool::elem_add, i64::elem_add, f64::elem_add, Complex64::elem_add)
    }

    fn elem_sub(self, rhs: Self) -> Self {
        self.combine(rhs, bool::elem_sub, i64::elem_sub, f64::elem_sub, Complex64::elem_sub)
    }

    fn elem_mul(self, rhs: Self) -> Self {
        self.combine(rhs, bool::elem_mul, i64::elem_mul, f64::elem_mul, Complex64::elem_mul)
    }

    fn elem_neg(self) -> Self {
        match self {
            Value::Bool(b) => Value::Bool(b),
            Value::Int(i) => Value::Int(i.wrapping_neg()),
            Value::Float(f) => Value::Float(-f),
            Value::Complex(c) => Value::Complex(-c),
        }
    }

    /// The modulus of a complex value is returned as a float.
    fn elem_abs(self) -> Self {
        match self {
            Value::Bool(b) => Value::Bool(b),
            Value::Int(i) => Value::Int(i.wrapping_abs()),
            Value::Float(f) => Value::Float(f.abs()),
            Value::Complex(c) => Value::Float(c.norm()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Complex(c) => write!(f, "{c}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_kinds_widen() {
        assert_eq!(Value::Int(2).elem_add(Value::Float(0.5)), Value::Float(2.5));
        assert_eq!(Value::Bool(true).elem_add(Value::Int(2)), Value::Int(3));
        assert_eq!(
            Value::Float(1.0).elem_mul(Value::Complex(Complex64::new(0.0, 2.0))),
            Value::Complex(Complex64::new(0.0, 2.0))
        );
        assert_eq!(Value::Bool(true).elem_add(Value::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn test_int_wraps() {
        assert_eq!(Value::Int(i64::MAX).elem_add(Value::Int(1)), Value::Int(i64::MIN));
    }

    #[test]
    fn test_abs_and_neg() {
        assert_eq!(Value::Int(-3).elem_abs(), Value::Int(3));
        assert_eq!(
            Value::Complex(Complex64::new(3.0, 4.0)).elem_abs(),
            Value::Float(5.0)
        );
        assert_eq!(Value::Float(2.0).elem_neg(), Value::Float(-2.0));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::Float(-2.7).as_i64(), -2);
        assert_eq!(Value::Float(f64::NAN).as_i64(), 0);
        assert!(!Value::Float(f64::NAN).is_truthy());
        assert_eq!(Value::Bool(true).as_f64(), 1.0);
        assert_eq!(Value::Int(4).as_complex(), Complex64::new(4.0, 0.0));
        assert_eq!(Value::default().to_string(), "0");
    }
}
