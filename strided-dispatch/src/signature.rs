//! Kernel signatures: ordered input dtypes and one output dtype.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::{DType, DispatchError};

/// Input dtypes of one kernel call plus the dtype it writes.
///
/// Printed as `float64,int32 -> float64`; the compact form from
/// [`Signature::chars`] is `di_d`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub inputs: SmallVec<[DType; 4]>,
    pub output: DType,
}

impl Signature {
    pub fn new(inputs: &[DType], output: DType) -> Self {
        Self {
            inputs: SmallVec::from_slice(inputs),
            output,
        }
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    /// Dense table key of an input combination: the dtype ordinals read as
    /// digits of a base-[`DType::COUNT`] number, first input most significant.
    pub fn key(inputs: &[DType]) -> usize {
        inputs
            .iter()
            .fold(0, |acc, d| acc * DType::COUNT + d.ordinal())
    }

    /// Inverse of [`Signature::key`] for a given arity.
    pub fn inputs_from_key(mut key: usize, arity: usize) -> Option<SmallVec<[DType; 4]>> {
        let mut inputs: SmallVec<[DType; 4]> = SmallVec::from_elem(DType::Bool, arity);
        for slot in inputs.iter_mut().rev() {
            *slot = DType::from_ordinal(key % DType::COUNT)?;
            key /= DType::COUNT;
        }
        (key == 0).then_some(inputs)
    }

    /// Compact one-character-per-dtype form, e.g. `dd_d`.
    pub fn chars(&self) -> String {
        let mut s: String = self.inputs.iter().map(|d| d.char_code()).collect();
        s.push('_');
        s.push(self.output.char_code());
        s
    }

    /// Parse the compact form produced by [`Signature::chars`].
    pub fn from_chars(s: &str) -> Result<Self, DispatchError> {
        let invalid = || DispatchError::InvalidSignature(s.to_string());
        let (inputs, output) = s.split_once('_').ok_or_else(invalid)?;
        let mut out = output.chars();
        let output = match (out.next(), out.next()) {
            (Some(c), None) => DType::from_char(c).ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };
        let inputs = inputs
            .chars()
            .map(|c| DType::from_char(c).ok_or_else(invalid))
            .collect::<Result<SmallVec<_>, _>>()?;
        if inputs.is_empty() {
            return Err(invalid());
        }
        Ok(Self { inputs, output })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.inputs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(d.name())?;
        }
        write!(f, " -> {}", self.output)
    }
}

impl FromStr for Signature {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DispatchError::InvalidSignature(s.to_string());
        let (inputs, output) = s.split_once("->").ok_or_else(invalid)?;
        let inputs = inputs
            .split(',')
            .map(|name| match name.trim() {
                "" => Err(invalid()),
                name => name.parse(),
            })
            .collect::<Result<SmallVec<_>, _>>()?;
        if output.trim().is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            inputs,
            output: output.parse()?,
        })
    }
}
