//! Operand metadata passed to the native routine.
//!
//! Each operand is serialized as native-endian `i64` words:
//!
//! ```text
//! marker | dtype | ndims | order | shape[ndims] | strides[ndims] | offset
//! ```
//!
//! `marker` is [`BYTE_ORDER_MARKER`]; a reader on a machine with the other
//! byte order sees it reversed and rejects the blob. Strides and offset are
//! in elements. Several operands are concatenated back to back.

use crate::buffer::{TypedView, TypedViewMut};
use crate::DType;

pub const BYTE_ORDER_MARKER: i64 = 0x0102_0304_0506_0708;

const WORD: usize = std::mem::size_of::<i64>();

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MetaError {
    #[error("metadata truncated at word {0}")]
    Truncated(usize),

    #[error("byte-order marker mismatch: found {0:#018x}")]
    ByteOrder(i64),

    #[error("unknown dtype code {0}")]
    UnknownDType(i64),

    #[error("unknown memory order {0}")]
    UnknownOrder(i64),

    #[error("negative {what} ({value})")]
    Negative { what: &'static str, value: i64 },

    #[error("metadata length {0} is not a multiple of 8 bytes")]
    Misaligned(usize),
}

/// Memory order of a multi-dimensional operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i64)]
pub enum Order {
    RowMajor = 1,
    ColumnMajor = 2,
}

impl Order {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Order::RowMajor),
            2 => Some(Order::ColumnMajor),
            _ => None,
        }
    }
}

/// Layout of one operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdarrayMeta {
    pub dtype: DType,
    pub shape: Vec<usize>,
    pub strides: Vec<isize>,
    pub offset: usize,
    pub order: Order,
}

impl NdarrayMeta {
    /// A one-dimensional operand.
    pub fn vector(dtype: DType, len: usize, stride: isize, offset: usize) -> Self {
        Self {
            dtype,
            shape: vec![len],
            strides: vec![stride],
            offset,
            order: Order::RowMajor,
        }
    }

    pub fn of_view(view: &TypedView<'_>) -> Self {
        Self::vector(view.dtype(), view.len(), view.stride(), view.offset())
    }

    pub fn of_view_mut(view: &TypedViewMut<'_>) -> Self {
        Self::vector(view.dtype(), view.len(), view.stride(), view.offset())
    }

    pub fn ndims(&self) -> usize {
        self.shape.len()
    }

    /// Number of logical elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every element is addressed with unit steps in `order`.
    pub fn is_contiguous(&self) -> bool {
        let mut dims: Vec<(usize, isize)> = self
            .shape
            .iter()
            .copied()
            .zip(self.strides.iter().copied())
            .collect();
        if self.order == Order::RowMajor {
            dims.reverse();
        }
        dims.iter()
            .try_fold(1isize, |expected, &(n, s)| {
                if n > 1 && s != expected {
                    return None;
                }
                isize::try_from(n).ok().and_then(|n| expected.checked_mul(n.max(1)))
            })
            .is_some()
    }

    fn encode_words(&self, words: &mut Vec<i64>) {
        words.push(BYTE_ORDER_MARKER);
        words.push(self.dtype.enum_code());
        words.push(self.ndims() as i64);
        words.push(self.order as i64);
        words.extend(self.shape.iter().map(|&n| n as i64));
        words.extend(self.strides.iter().map(|&s| s as i64));
        words.push(self.offset as i64);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        encode_operands(std::slice::from_ref(self))
    }

    /// Decode exactly one operand.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MetaError> {
        let words = words_of(bytes)?;
        let mut pos = 0;
        let meta = decode_one(&words, &mut pos)?;
        if pos != words.len() {
            return Err(MetaError::Truncated(pos));
        }
        Ok(meta)
    }
}

/// Serialize several operands into one blob.
pub fn encode_operands(metas: &[NdarrayMeta]) -> Vec<u8> {
    let mut words = Vec::new();
    for m in metas {
        m.encode_words(&mut words);
    }
    bytemuck::cast_slice::<i64, u8>(&words).to_vec()
}

/// Decode every operand in a blob produced by [`encode_operands`].
pub fn decode_all(bytes: &[u8]) -> Result<Vec<NdarrayMeta>, MetaError> {
    let words = words_of(bytes)?;
    let mut pos = 0;
    let mut metas = Vec::new();
    while pos < words.len() {
        metas.push(decode_one(&words, &mut pos)?);
    }
    Ok(metas)
}

fn words_of(bytes: &[u8]) -> Result<Vec<i64>, MetaError> {
    if bytes.len() % WORD != 0 {
        return Err(MetaError::Misaligned(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(WORD)
        .map(bytemuck::pod_read_unaligned::<i64>)
        .collect())
}

fn decode_one(words: &[i64], pos: &mut usize) -> Result<NdarrayMeta, MetaError> {
    let mut next = || {
        let w = words.get(*pos).copied().ok_or(MetaError::Truncated(*pos))?;
        *pos += 1;
        Ok::<i64, MetaError>(w)
    };

    let marker = next()?;
    if marker != BYTE_ORDER_MARKER {
        return Err(MetaError::ByteOrder(marker));
    }
    let code = next()?;
    let dtype = DType::from_enum_code(code).ok_or(MetaError::UnknownDType(code))?;
    let ndims = non_negative("ndims", next()?)?;
    let order_code = next()?;
    let order = Order::from_code(order_code).ok_or(MetaError::UnknownOrder(order_code))?;

    let mut shape = Vec::with_capacity(ndims.min(words.len()));
    for _ in 0..ndims {
        shape.push(non_negative("extent", next()?)?);
    }
    let mut strides = Vec::with_capacity(ndims.min(words.len()));
    for _ in 0..ndims {
        strides.push(next()? as isize);
    }
    let offset = non_negative("offset", next()?)?;

    Ok(NdarrayMeta {
        dtype,
        shape,
        strides,
        offset,
        order,
    })
}

fn non_negative(what: &'static str, value: i64) -> Result<usize, MetaError> {
    usize::try_from(value).map_err(|_| MetaError::Negative { what, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_exact() {
        let metas = vec![
            NdarrayMeta::vector(DType::Float64, 5, 1, 0),
            NdarrayMeta::vector(DType::Uint8c, 3, -2, 4),
            NdarrayMeta {
                dtype: DType::Complex64,
                shape: vec![2, 3],
                strides: vec![1, 2],
                offset: 7,
                order: Order::ColumnMajor,
            },
        ];
        let bytes = encode_operands(&metas);
        assert_eq!(bytes.len(), (7 + 7 + 9) * WORD);
        assert_eq!(decode_all(&bytes).unwrap(), metas);
        assert_eq!(NdarrayMeta::from_bytes(&metas[1].to_bytes()).unwrap(), metas[1]);
    }

    #[test]
    fn test_decode_unaligned_source() {
        let bytes = NdarrayMeta::vector(DType::Int16, 4, 1, 2).to_bytes();
        let mut shifted = vec![0u8];
        shifted.extend_from_slice(&bytes);
        assert_eq!(
            NdarrayMeta::from_bytes(&shifted[1..]).unwrap(),
            NdarrayMeta::vector(DType::Int16, 4, 1, 2)
        );
    }

    #[test]
    fn test_rejects_malformed() {
        let bytes = NdarrayMeta::vector(DType::Float32, 4, 1, 0).to_bytes();
        assert_eq!(
            decode_all(&bytes[..bytes.len() - 1]),
            Err(MetaError::Misaligned(bytes.len() - 1))
        );
        assert_eq!(
            decode_all(&bytes[..bytes.len() - WORD]),
            Err(MetaError::Truncated(6))
        );

        let mut swapped = bytes.clone();
        swapped[..WORD].reverse();
        assert!(matches!(decode_all(&swapped), Err(MetaError::ByteOrder(_))));

        let mut words = words_of(&bytes).unwrap();
        words[1] = 99;
        assert_eq!(
            decode_all(bytemuck::cast_slice(&words)),
            Err(MetaError::UnknownDType(99))
        );
        words[1] = DType::Float32.enum_code();
        words[3] = 0;
        assert_eq!(decode_all(bytemuck::cast_slice(&words)), Err(MetaError::UnknownOrder(0)));
        words[3] = 1;
        words[6] = -1;
        assert!(matches!(
            decode_all(bytemuck::cast_slice(&words)),
            Err(MetaError::Negative { what: "offset", value: -1 })
        ));
    }

    #[test]
    fn test_contiguity() {
        assert!(NdarrayMeta::vector(DType::Float64, 8, 1, 3).is_contiguous());
        assert!(!NdarrayMeta::vector(DType::Float64, 8, -1, 7).is_contiguous());
        assert!(NdarrayMeta::vector(DType::Float64, 1, 5, 0).is_contiguous());
        let m = NdarrayMeta {
            dtype: DType::Int32,
            shape: vec![2, 3],
            strides: vec![3, 1],
            offset: 0,
            order: Order::RowMajor,
        };
        assert!(m.is_contiguous());
        assert_eq!(m.len(), 6);
    }
}
