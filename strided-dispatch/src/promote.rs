//! Type promotion.
//!
//! `promote(a, b)` picks the dtype a binary kernel computes and stores in.
//! It is commutative, idempotent and defined for every pair:
//!
//! | case                          | result                                   |
//! |-------------------------------|------------------------------------------|
//! | either is `generic`           | `generic`                                |
//! | `bool` with `x`               | `x`                                      |
//! | `uint8c` with another dtype   | treated as `uint8`                       |
//! | complex with anything         | `complex128` if either is `complex128` or the other is `float64`/32-bit int, else `complex64` |
//! | float with anything           | `float64` if either is `float64` or a 32-bit int meets `float32`, else `float32` |
//! | integers, same signedness     | the wider                                |
//! | integers, mixed signedness    | smallest signed type wider than the unsigned one (`uint32` gives `float64`), or the signed one if already wider |

use crate::DType;

/// Promoted dtype of two operands.
pub fn promote(a: DType, b: DType) -> DType {
    use DType::*;

    if a == b {
        return a;
    }
    if a == Generic || b == Generic {
        return Generic;
    }
    if a == Bool {
        return b;
    }
    if b == Bool {
        return a;
    }

    let a = if a == Uint8c { Uint8 } else { a };
    let b = if b == Uint8c { Uint8 } else { b };
    if a == b {
        return a;
    }

    if a.is_complex() || b.is_complex() {
        if a == Complex128 || b == Complex128 {
            return Complex128;
        }
        let other = if a == Complex64 { b } else { a };
        return if needs_double(other) { Complex128 } else { Complex64 };
    }

    if a.is_float() || b.is_float() {
        if a == Float64 || b == Float64 {
            return Float64;
        }
        let other = if a == Float32 { b } else { a };
        return if needs_double(other) { Float64 } else { Float32 };
    }

    promote_integers(a, b)
}

/// Promoted dtype of several operands, folded left to right.
///
/// Pairwise promotion is not associative across signedness, so the result
/// can depend on operand order: `[int8, uint16, float32]` folds through
/// `int32` to `float64`, while `[int8, float32, uint16]` stays `float32`.
/// Tables built from per-position lists inherit this order.
///
/// `None` when `dtypes` is empty.
pub fn promote_all(dtypes: &[DType]) -> Option<DType> {
    let (&first, rest) = dtypes.split_first()?;
    Some(rest.iter().fold(first, |acc, &d| promote(acc, d)))
}

/// Whether a single-precision partner must widen to double precision to
/// represent every value of `d` exactly.
fn needs_double(d: DType) -> bool {
    matches!(d, DType::Float64 | DType::Int32 | DType::Uint32)
}

fn promote_integers(a: DType, b: DType) -> DType {
    use DType::*;

    let (Some(bits_a), Some(bits_b)) = (a.int_bits(), b.int_bits()) else {
        return Generic;
    };
    if a.is_signed_integer() == b.is_signed_integer() {
        return if bits_a >= bits_b { a } else { b };
    }
    let (unsigned, signed, bits_u, bits_s) = if a.is_unsigned_integer() {
        (a, b, bits_a, bits_b)
    } else {
        (b, a, bits_b, bits_a)
    };
    if bits_s > bits_u {
        return signed;
    }
    match unsigned {
        Uint8 => Int16,
        Uint16 => Int32,
        _ => Float64,
    }
}
