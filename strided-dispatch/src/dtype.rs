//! Data-type tags.

use std::fmt;
use std::str::FromStr;

use crate::DispatchError;

/// Element data type of a typed buffer or view.
///
/// The discriminant is the dtype's ordinal. It is stable: dispatch keys
/// and the native metadata blob are built from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DType {
    Bool = 0,
    Int8 = 1,
    Uint8 = 2,
    /// Unsigned byte that clamps instead of wrapping.
    Uint8c = 3,
    Int16 = 4,
    Uint16 = 5,
    Int32 = 6,
    Uint32 = 7,
    Float32 = 8,
    Float64 = 9,
    Complex64 = 10,
    Complex128 = 11,
    /// Boxed dynamic value, see [`Value`](crate::Value).
    Generic = 12,
}

impl DType {
    /// Number of dtypes; the radix of dispatch keys.
    pub const COUNT: usize = 13;

    /// Every dtype, in ordinal order.
    pub const ALL: [DType; DType::COUNT] = [
        DType::Bool,
        DType::Int8,
        DType::Uint8,
        DType::Uint8c,
        DType::Int16,
        DType::Uint16,
        DType::Int32,
        DType::Uint32,
        DType::Float32,
        DType::Float64,
        DType::Complex64,
        DType::Complex128,
        DType::Generic,
    ];

    /// Every dtype except `bool`.
    pub const NUMERIC: [DType; 12] = [
        DType::Int8,
        DType::Uint8,
        DType::Uint8c,
        DType::Int16,
        DType::Uint16,
        DType::Int32,
        DType::Uint32,
        DType::Float32,
        DType::Float64,
        DType::Complex64,
        DType::Complex128,
        DType::Generic,
    ];

    /// Real numeric dtypes (no `bool`, no complex).
    pub const REAL: [DType; 10] = [
        DType::Int8,
        DType::Uint8,
        DType::Uint8c,
        DType::Int16,
        DType::Uint16,
        DType::Int32,
        DType::Uint32,
        DType::Float32,
        DType::Float64,
        DType::Generic,
    ];

    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    /// Integer enumeration constant written into native metadata.
    #[inline]
    pub fn enum_code(self) -> i64 {
        self as i64
    }

    pub fn from_enum_code(code: i64) -> Option<Self> {
        usize::try_from(code).ok().and_then(Self::from_ordinal)
    }

    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Uint8 => "uint8",
            DType::Uint8c => "uint8c",
            DType::Int16 => "int16",
            DType::Uint16 => "uint16",
            DType::Int32 => "int32",
            DType::Uint32 => "uint32",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Complex64 => "complex64",
            DType::Complex128 => "complex128",
            DType::Generic => "generic",
        }
    }

    /// One-character code, as used in compact signatures like `"dd_d"`.
    pub fn char_code(self) -> char {
        match self {
            DType::Bool => 'x',
            DType::Int8 => 'b',
            DType::Uint8 => 'B',
            DType::Uint8c => 'a',
            DType::Int16 => 'h',
            DType::Uint16 => 'H',
            DType::Int32 => 'i',
            DType::Uint32 => 'I',
            DType::Float32 => 'f',
            DType::Float64 => 'd',
            DType::Complex64 => 'c',
            DType::Complex128 => 'z',
            DType::Generic => 'o',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.char_code() == c)
    }

    /// Bytes per element in a typed buffer. `None` for `generic`.
    pub fn byte_size(self) -> Option<usize> {
        match self {
            DType::Bool | DType::Int8 | DType::Uint8 | DType::Uint8c => Some(1),
            DType::Int16 | DType::Uint16 => Some(2),
            DType::Int32 | DType::Uint32 | DType::Float32 => Some(4),
            DType::Float64 | DType::Complex64 => Some(8),
            DType::Complex128 => Some(16),
            DType::Generic => None,
        }
    }

    pub fn is_complex(self) -> bool {
        matches!(self, DType::Complex64 | DType::Complex128)
    }

    pub fn is_float(self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }

    pub fn is_integer(self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    pub fn is_signed_integer(self) -> bool {
        matches!(self, DType::Int8 | DType::Int16 | DType::Int32)
    }

    pub fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            DType::Uint8 | DType::Uint8c | DType::Uint16 | DType::Uint32
        )
    }

    /// Bit width of an integer dtype.
    pub(crate) fn int_bits(self) -> Option<u32> {
        match self {
            DType::Int8 | DType::Uint8 | DType::Uint8c => Some(8),
            DType::Int16 | DType::Uint16 => Some(16),
            DType::Int32 | DType::Uint32 => Some(32),
            _ => None,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| DispatchError::UnknownDType(s.to_string()))
    }
}
