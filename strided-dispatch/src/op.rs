//! Built-in dispatchable operations.
//!
//! Both backends obtain the per-element function for an op from here, so
//! they evaluate exactly the same expression in the same order.

use std::fmt;

use strided_traits::Arith;

/// A built-in elementwise operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `y = x` (also the copy kernel).
    Identity,
    Abs,
    Neg,
    Add,
    Sub,
    Mul,
    /// `y = a * b + c`, rounded after the multiply.
    MulAdd,
    /// `y = ((a + b) + c) + d`.
    Add4,
}

impl Op {
    pub const ALL: [Op; 8] = [
        Op::Identity,
        Op::Abs,
        Op::Neg,
        Op::Add,
        Op::Sub,
        Op::Mul,
        Op::MulAdd,
        Op::Add4,
    ];

    /// Number of inputs.
    pub fn arity(self) -> usize {
        match self {
            Op::Identity | Op::Abs | Op::Neg => 1,
            Op::Add | Op::Sub | Op::Mul => 2,
            Op::MulAdd => 3,
            Op::Add4 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Op::Identity => "identity",
            Op::Abs => "abs",
            Op::Neg => "neg",
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::MulAdd => "muladd",
            Op::Add4 => "add4",
        }
    }

    /// Code passed to the native routine.
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn unary<T: Arith>(self) -> Option<fn(T) -> T> {
        match self {
            Op::Identity => Some(|x| x),
            Op::Abs => Some(T::elem_abs),
            Op::Neg => Some(T::elem_neg),
            _ => None,
        }
    }

    pub fn binary<T: Arith>(self) -> Option<fn(T, T) -> T> {
        match self {
            Op::Add => Some(T::elem_add),
            Op::Sub => Some(T::elem_sub),
            Op::Mul => Some(T::elem_mul),
            _ => None,
        }
    }

    pub fn ternary<T: Arith>(self) -> Option<fn(T, T, T) -> T> {
        match self {
            Op::MulAdd => Some(|a: T, b: T, c: T| a.elem_mul(b).elem_add(c)),
            _ => None,
        }
    }

    pub fn quaternary<T: Arith>(self) -> Option<fn(T, T, T, T) -> T> {
        match self {
            Op::Add4 => Some(|a: T, b: T, c: T, d: T| a.elem_add(b).elem_add(c).elem_add(d)),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_op_has_exactly_one_kernel_shape() {
        for op in Op::ALL {
            let shapes = [
                op.unary::<f64>().is_some(),
                op.binary::<f64>().is_some(),
                op.ternary::<f64>().is_some(),
                op.quaternary::<f64>().is_some(),
            ];
            assert_eq!(shapes.iter().filter(|&&s| s).count(), 1, "{op}");
            assert!(shapes[op.arity() - 1], "{op}");
            assert_eq!(Op::from_code(op.code()), Some(op));
        }
    }

    #[test]
    fn test_kernels_compute() {
        assert_eq!(Op::Abs.unary::<i8>().unwrap()(-5), 5);
        assert_eq!(Op::Sub.binary::<u8>().unwrap()(1, 2), 255);
        assert_eq!(Op::MulAdd.ternary::<f32>().unwrap()(2.0, 3.0, 1.0), 7.0);
        assert_eq!(Op::Add4.quaternary::<i32>().unwrap()(1, 2, 3, 4), 10);
    }
}
