//! Dense dispatch tables keyed by input dtype combinations.
//!
//! A [`DispatchTable`] holds one slot per combination of `arity` dtypes,
//! addressed by [`Signature::key`]. Building from per-position dtype lists
//! fills every slot in the Cartesian product with the kernel for the
//! promoted dtype, so lookup is total over what was declared and fails with
//! [`DispatchError::UnsupportedDtypes`] everywhere else.

use strided_kernel::{
    map_by_into, map_into, mask_map_into, mask_zip_map2_into, zip_map2_by_into, zip_map2_into,
    zip_map3_into, zip_map4_into,
};
use strided_view::{StridedError, StridedView, StridedViewMut};

use crate::buffer::{each_variant, with_element, TypedView, TypedViewMut};
use crate::element::{cast, Element};
use crate::promote::promote_all;
use crate::staging::for_each_block;
use crate::{DType, DispatchError, Op, Result, Signature, Value};

/// A type-erased kernel: reads `inputs`, writes `out`.
pub type KernelFn = fn(Op, &[TypedView<'_>], &mut TypedViewMut<'_>) -> Result<()>;

/// One resolved table slot.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub output: DType,
    pub kernel: KernelFn,
}

#[derive(Debug, Clone)]
pub struct DispatchTable {
    op: Op,
    arity: usize,
    slots: Vec<Option<Entry>>,
}

impl DispatchTable {
    /// An empty table for `op`.
    pub fn new(op: Op) -> Self {
        let arity = op.arity();
        Self {
            op,
            arity,
            slots: vec![None; DType::COUNT.pow(arity as u32)],
        }
    }

    /// Table covering `lists[0] x lists[1] x ...` with the portable kernels.
    pub fn build(op: Op, lists: &[&[DType]]) -> Result<Self> {
        Self::build_with(op, lists, kernel_for)
    }

    /// Like [`DispatchTable::build`], with the kernel for each promoted dtype
    /// supplied by `family`.
    pub fn build_with(
        op: Op,
        lists: &[&[DType]],
        family: impl Fn(DType) -> KernelFn,
    ) -> Result<Self> {
        let mut table = Self::new(op);
        if lists.len() != table.arity {
            return Err(DispatchError::ArityMismatch {
                op,
                expected: table.arity,
                found: lists.len(),
            });
        }
        let mut combo = Vec::with_capacity(lists.len());
        table.fill(lists, &mut combo, &family);
        Ok(table)
    }

    fn fill(
        &mut self,
        lists: &[&[DType]],
        combo: &mut Vec<DType>,
        family: &impl Fn(DType) -> KernelFn,
    ) {
        let Some((head, rest)) = lists.split_first() else {
            if let Some(output) = promote_all(combo) {
                self.slots[Signature::key(combo)] = Some(Entry {
                    output,
                    kernel: family(output),
                });
            }
            return;
        };
        for &d in head.iter() {
            combo.push(d);
            self.fill(rest, combo, family);
            combo.pop();
        }
    }

    /// Register (or replace) the kernel for one signature.
    pub fn insert(&mut self, signature: &Signature, kernel: KernelFn) -> Result<()> {
        if signature.arity() != self.arity {
            return Err(DispatchError::ArityMismatch {
                op: self.op,
                expected: self.arity,
                found: signature.arity(),
            });
        }
        self.slots[Signature::key(&signature.inputs)] = Some(Entry {
            output: signature.output,
            kernel,
        });
        Ok(())
    }

    /// Look up the entry for an input dtype combination.
    pub fn resolve(&self, inputs: &[DType]) -> Result<Entry> {
        if inputs.len() != self.arity {
            return Err(DispatchError::ArityMismatch {
                op: self.op,
                expected: self.arity,
                found: inputs.len(),
            });
        }
        self.slots[Signature::key(inputs)].ok_or_else(|| DispatchError::UnsupportedDtypes {
            op: self.op,
            dtypes: inputs.to_vec(),
        })
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of registered signatures.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered signatures in key order.
    pub fn signatures(&self) -> impl Iterator<Item = Signature> + '_ {
        self.slots.iter().enumerate().filter_map(move |(key, slot)| {
            let entry = slot.as_ref()?;
            let inputs = Signature::inputs_from_key(key, self.arity)?;
            Some(Signature {
                inputs,
                output: entry.output,
            })
        })
    }
}

/// The portable kernel computing in `dtype`.
pub fn kernel_for(dtype: DType) -> KernelFn {
    with_element!(dtype, T => portable_kernel::<T> as KernelFn)
}

/// The output view of a kernel call as concrete `T`.
fn output_as<'b, 'a, T: Element>(
    out: &'b mut TypedViewMut<'a>,
) -> Result<&'b mut StridedViewMut<'a, T>> {
    let found = out.dtype();
    out.downcast_mut::<T>()
        .ok_or(DispatchError::OutputDtypeMismatch {
            expected: T::DTYPE,
            found,
        })
}

fn check_arity(op: Op, inputs: &[TypedView<'_>]) -> Result<()> {
    if inputs.len() != op.arity() {
        return Err(DispatchError::ArityMismatch {
            op,
            expected: op.arity(),
            found: inputs.len(),
        });
    }
    Ok(())
}

fn unsupported<T: Element>(op: Op) -> DispatchError {
    DispatchError::UnsupportedDtypes {
        op,
        dtypes: vec![T::DTYPE; op.arity()],
    }
}

/// Generic strided kernel: reads every input as `T`, then applies the op's
/// element function through the apply loops.
pub fn portable_kernel<T: Element>(
    op: Op,
    inputs: &[TypedView<'_>],
    out: &mut TypedViewMut<'_>,
) -> Result<()> {
    let dest = output_as::<T>(out)?;
    check_arity(op, inputs)?;
    for_each_block(inputs, dest, |_, v, dest| {
        match v {
            [a] => {
                let f = op.unary::<T>().ok_or_else(|| unsupported::<T>(op))?;
                map_into(dest, a, f)?;
            }
            [a, b] => {
                let f = op.binary::<T>().ok_or_else(|| unsupported::<T>(op))?;
                zip_map2_into(dest, a, b, f)?;
            }
            [a, b, c] => {
                let f = op.ternary::<T>().ok_or_else(|| unsupported::<T>(op))?;
                zip_map3_into(dest, a, b, c, f)?;
            }
            [a, b, c, d] => {
                let f = op.quaternary::<T>().ok_or_else(|| unsupported::<T>(op))?;
                zip_map4_into(dest, a, b, c, d, f)?;
            }
            _ => return Err(unsupported::<T>(op)),
        }
        Ok(())
    })
}

/// Masked form of [`portable_kernel`] for unary and binary ops: positions
/// where `mask` is non-zero keep their previous output value.
pub fn masked_kernel<T: Element>(
    op: Op,
    inputs: &[TypedView<'_>],
    mask: &StridedView<'_, u8>,
    out: &mut TypedViewMut<'_>,
) -> Result<()> {
    let dest = output_as::<T>(out)?;
    check_arity(op, inputs)?;
    if mask.len() != dest.len() {
        return Err(StridedError::LengthMismatch(dest.len(), mask.len()).into());
    }
    for_each_block(inputs, dest, |start, v, dest| {
        let m = mask.subview(start, dest.len())?;
        match v {
            [a] => {
                let f = op.unary::<T>().ok_or_else(|| unsupported::<T>(op))?;
                mask_map_into(dest, a, &m, f)?;
            }
            [a, b] => {
                let f = op.binary::<T>().ok_or_else(|| unsupported::<T>(op))?;
                mask_zip_map2_into(dest, a, b, &m, f)?;
            }
            _ => return Err(DispatchError::UnsupportedVariant { op, variant: "masked" }),
        }
        Ok(())
    })
}

/// Position of one element handed to an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position<'p> {
    /// Logical iteration index.
    pub i: usize,
    /// Storage index read from each input buffer.
    pub inputs: &'p [usize],
    /// Storage index written in the output buffer.
    pub output: usize,
}

#[inline]
fn storage_index(view: &TypedView<'_>, i: usize) -> usize {
    (view.offset() as isize + i as isize * view.stride()) as usize
}

/// Accessor form of [`portable_kernel`] for unary and binary ops.
///
/// Before element `i` is computed, `accessor` receives the inputs as
/// [`Value`]s of the computation dtype and may replace them. Returning
/// `false` leaves that output element untouched.
pub fn by_kernel<T: Element>(
    op: Op,
    inputs: &[TypedView<'_>],
    out: &mut TypedViewMut<'_>,
    accessor: &mut impl FnMut(&mut [Value], Position<'_>) -> bool,
) -> Result<()> {
    let (out_offset, out_stride) = (out.offset() as isize, out.stride());
    let dest = output_as::<T>(out)?;
    check_arity(op, inputs)?;
    let output_index = |i: usize| (out_offset + i as isize * out_stride) as usize;

    for_each_block(inputs, dest, |start, v, dest| {
        match (v, inputs) {
            ([a], [xa]) => {
                let f = op.unary::<T>().ok_or_else(|| unsupported::<T>(op))?;
                map_by_into(dest, a, f, |x, at| {
                    let i = start + at.i;
                    let mut vals = [x.to_value()];
                    let at = Position {
                        i,
                        inputs: &[storage_index(xa, i)],
                        output: output_index(i),
                    };
                    accessor(&mut vals, at).then(|| T::from_value(vals[0]))
                })?;
            }
            ([a, b], [xa, xb]) => {
                let f = op.binary::<T>().ok_or_else(|| unsupported::<T>(op))?;
                zip_map2_by_into(dest, a, b, f, |x, y, at| {
                    let i = start + at.i;
                    let mut vals = [x.to_value(), y.to_value()];
                    let at = Position {
                        i,
                        inputs: &[storage_index(xa, i), storage_index(xb, i)],
                        output: output_index(i),
                    };
                    accessor(&mut vals, at)
                        .then(|| (T::from_value(vals[0]), T::from_value(vals[1])))
                })?;
            }
            _ => return Err(DispatchError::UnsupportedVariant { op, variant: "accessor" }),
        }
        Ok(())
    })
}

/// Copy with conversion: `out[i] = cast(src[i])`, any dtype to any dtype.
pub fn cast_into(src: &TypedView<'_>, out: &mut TypedViewMut<'_>) -> Result<()> {
    fn run<S: Element, T: Element>(
        src: &StridedView<'_, S>,
        dest: &mut StridedViewMut<'_, T>,
    ) -> Result<()> {
        map_into(dest, src, cast::<S, T>)?;
        Ok(())
    }
    let dtype = out.dtype();
    with_element!(dtype, T => {
        let dest = output_as::<T>(out)?;
        each_variant!(src, TypedView, v => run(v, dest))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TypedBuffer;
    use DType::*;

    #[test]
    fn test_build_is_total_over_product() {
        let lists: [&[DType]; 2] = [&[Float64, Int32], &[Int8, Uint16, Float32]];
        let table = DispatchTable::build(Op::Add, &lists).unwrap();
        assert_eq!(table.len(), 6);
        for &a in lists[0] {
            for &b in lists[1] {
                let entry = table.resolve(&[a, b]).unwrap();
                assert_eq!(entry.output, crate::promote(a, b));
            }
        }
        assert!(matches!(
            table.resolve(&[Int8, Int8]),
            Err(DispatchError::UnsupportedDtypes { .. })
        ));
    }

    #[test]
    fn test_build_rejects_wrong_list_count() {
        let lists: [&[DType]; 1] = [&[Float64]];
        assert!(matches!(
            DispatchTable::build(Op::Mul, &lists),
            Err(DispatchError::ArityMismatch { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn test_signatures_listing() {
        let lists: [&[DType]; 1] = [&[Int16, Float32]];
        let table = DispatchTable::build(Op::Neg, &lists).unwrap();
        let names: Vec<String> = table.signatures().map(|s| s.chars()).collect();
        assert_eq!(names, vec!["h_h", "f_f"]);
    }

    #[test]
    fn test_insert_custom_kernel() {
        fn zero(_: Op, _: &[TypedView<'_>], out: &mut TypedViewMut<'_>) -> Result<()> {
            if let Some(v) = out.downcast_mut::<f64>() {
                strided_kernel::nullary_into(v, || 0.0)?;
            }
            Ok(())
        }
        let mut table = DispatchTable::new(Op::Abs);
        assert!(table.is_empty());
        table
            .insert(&"float64 -> float64".parse().unwrap(), zero)
            .unwrap();
        let entry = table.resolve(&[Float64]).unwrap();

        let x = TypedBuffer::from_vec(vec![-1.0f64, 2.0]);
        let mut y = TypedBuffer::zeros(Float64, 2);
        (entry.kernel)(Op::Abs, &[x.as_view()], &mut y.as_view_mut()).unwrap();
        assert_eq!(y.as_slice::<f64>().unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn test_portable_kernel_converts_inputs() {
        let a = TypedBuffer::from_vec(vec![1i8, -2, 3]);
        let b = TypedBuffer::from_vec(vec![0.5f64, 0.25, 0.125]);
        let mut out = TypedBuffer::zeros(Float64, 3);
        portable_kernel::<f64>(Op::Mul, &[a.as_view(), b.as_view()], &mut out.as_view_mut())
            .unwrap();
        assert_eq!(out.as_slice::<f64>().unwrap(), &[0.5, -0.5, 0.375]);
    }

    #[test]
    fn test_portable_kernel_mixed_dtypes_across_blocks() {
        let n = 3 * crate::CAST_BLOCK + 17;
        let a = TypedBuffer::from_vec((0..n).map(|i| (i % 100) as u8).collect::<Vec<_>>());
        let b = TypedBuffer::from_vec(vec![-1i8; n]);
        let mut out = TypedBuffer::zeros(Int16, n);
        portable_kernel::<i16>(
            Op::Add,
            &[a.view(n, -1, n - 1).unwrap(), b.as_view()],
            &mut out.as_view_mut(),
        )
        .unwrap();
        let got = out.as_slice::<i16>().unwrap();
        for (i, &v) in got.iter().enumerate() {
            assert_eq!(v, ((n - 1 - i) % 100) as i16 - 1, "i={i}");
        }
    }

    #[test]
    fn test_portable_kernel_checks_output_dtype() {
        let a = TypedBuffer::from_vec(vec![1.0f32]);
        let mut out = TypedBuffer::zeros(Float64, 1);
        let err = portable_kernel::<f32>(Op::Neg, &[a.as_view()], &mut out.as_view_mut());
        assert!(matches!(
            err,
            Err(DispatchError::OutputDtypeMismatch { expected: Float32, found: Float64 })
        ));
    }

    #[test]
    fn test_cast_into_strided() {
        let src = TypedBuffer::from_vec(vec![1.5f32, 2.5, 3.5, 4.5]);
        let mut dst = TypedBuffer::zeros(Int16, 2);
        cast_into(&src.view(2, -2, 3).unwrap(), &mut dst.as_view_mut()).unwrap();
        assert_eq!(dst.as_slice::<i16>().unwrap(), &[4, 2]);
    }
}
