//! Validating front door over the built-in tables.

use std::sync::OnceLock;

use strided_view::{StridedError, StridedView};

use crate::backend::{KernelBackend, PortableBackend, PreferredBackend};
use crate::buffer::{with_element, TypedBuffer, TypedView, TypedViewMut};
use crate::table::{by_kernel, masked_kernel, DispatchTable, Entry, Position};
use crate::{DType, DispatchError, Op, Result, Value};

const MULADD_DTYPES: [DType; 4] = [DType::Float64, DType::Float32, DType::Int32, DType::Generic];

const ADD4_DTYPES: [DType; 6] = [
    DType::Float64,
    DType::Float32,
    DType::Int32,
    DType::Int16,
    DType::Uint8,
    DType::Generic,
];

fn builtin_lists(op: Op) -> Vec<&'static [DType]> {
    let list: &'static [DType] = match op {
        Op::Identity => &DType::ALL,
        Op::Abs => &DType::REAL,
        Op::Neg | Op::Add | Op::Sub | Op::Mul => &DType::NUMERIC,
        Op::MulAdd => &MULADD_DTYPES,
        Op::Add4 => &ADD4_DTYPES,
    };
    vec![list; op.arity()]
}

fn build_tables() -> Vec<DispatchTable> {
    Op::ALL
        .iter()
        .filter_map(|&op| match DispatchTable::build(op, &builtin_lists(op)) {
            Ok(table) => Some(table),
            Err(e) => {
                log::error!("failed to build dispatch table for {op}: {e}");
                None
            }
        })
        .collect()
}

/// The built-in table for `op`, built on first use.
pub fn table(op: Op) -> Result<&'static DispatchTable> {
    static TABLES: OnceLock<Vec<DispatchTable>> = OnceLock::new();
    TABLES
        .get_or_init(|| {
            log::debug!("building built-in dispatch tables");
            build_tables()
        })
        .iter()
        .find(|t| t.op() == op)
        .ok_or_else(|| DispatchError::UnsupportedDtypes {
            op,
            dtypes: Vec::new(),
        })
}

/// Output dtype of `op` for the given input dtypes.
pub fn output_dtype(op: Op, inputs: &[DType]) -> Result<DType> {
    Ok(table(op)?.resolve(inputs)?.output)
}

/// Validate a call and resolve its table entry. `None` means the call is
/// empty and there is nothing to run.
fn prepare(op: Op, inputs: &[TypedView<'_>], out: &TypedViewMut<'_>) -> Result<Option<Entry>> {
    if inputs.len() != op.arity() {
        return Err(DispatchError::ArityMismatch {
            op,
            expected: op.arity(),
            found: inputs.len(),
        });
    }
    if let Some(v) = inputs.iter().find(|v| v.len() != out.len()) {
        return Err(strided_view::StridedError::LengthMismatch(v.len(), out.len()).into());
    }
    let dtypes: Vec<DType> = inputs.iter().map(TypedView::dtype).collect();
    let entry = table(op)?.resolve(&dtypes)?;
    if out.dtype() != entry.output {
        return Err(DispatchError::OutputDtypeMismatch {
            expected: entry.output,
            found: out.dtype(),
        });
    }
    Ok((!out.is_empty()).then_some(entry))
}

/// Run `op` elementwise: `out[i] = op(inputs[0][i], ...)`.
///
/// Inputs of different dtypes are converted to the promoted dtype, which
/// `out` must have. The preferred backend runs when it accepts the operands;
/// any other case, or a native failure, runs the portable loop. Nothing is
/// written when validation fails.
pub fn apply(op: Op, inputs: &[TypedView<'_>], out: &mut TypedViewMut<'_>) -> Result<()> {
    let Some(entry) = prepare(op, inputs, out)? else {
        return Ok(());
    };
    if PreferredBackend::supports(op, inputs, out) {
        match PreferredBackend::execute(op, &entry, inputs, out) {
            Ok(()) => return Ok(()),
            Err(e) => log::debug!(
                "{} backend failed for {op} ({e}); using {}",
                PreferredBackend::NAME,
                PortableBackend::NAME
            ),
        }
    } else {
        log::trace!("{op}: operands not eligible for {}", PreferredBackend::NAME);
    }
    PortableBackend::execute(op, &entry, inputs, out)
}

/// Run `op` on backend `B` only, without fallback.
pub fn apply_with<B: KernelBackend>(
    op: Op,
    inputs: &[TypedView<'_>],
    out: &mut TypedViewMut<'_>,
) -> Result<()> {
    let Some(entry) = prepare(op, inputs, out)? else {
        return Ok(());
    };
    if !B::supports(op, inputs, out) {
        return Err(DispatchError::BackendUnsupported { backend: B::NAME, op });
    }
    B::execute(op, &entry, inputs, out)
}

/// Masked and accessor calls exist for unary and binary ops.
fn check_variant(op: Op, variant: &'static str) -> Result<()> {
    if op.arity() > 2 {
        return Err(DispatchError::UnsupportedVariant { op, variant });
    }
    Ok(())
}

/// Run `op` wherever `mask` is zero; other positions of `out` keep their
/// contents.
///
/// Resolution and promotion follow [`apply`]. The native routine takes no
/// mask, so the portable loop always runs.
pub fn apply_masked(
    op: Op,
    inputs: &[TypedView<'_>],
    mask: &StridedView<'_, u8>,
    out: &mut TypedViewMut<'_>,
) -> Result<()> {
    check_variant(op, "masked")?;
    if mask.len() != out.len() {
        return Err(StridedError::LengthMismatch(out.len(), mask.len()).into());
    }
    let Some(entry) = prepare(op, inputs, out)? else {
        return Ok(());
    };
    log::trace!("{op}: masked call on {}", PortableBackend::NAME);
    with_element!(entry.output, T => masked_kernel::<T>(op, inputs, mask, out))
}

/// Run `op` with a per-element accessor.
///
/// For every position `accessor` receives the inputs, converted to the
/// promoted dtype and boxed as [`Value`]s, together with their storage
/// indices. It may overwrite the values before the op runs. Returning
/// `false` skips the position and leaves `out` untouched there. Like
/// [`apply_masked`] this always runs the portable loop.
pub fn apply_by(
    op: Op,
    inputs: &[TypedView<'_>],
    out: &mut TypedViewMut<'_>,
    mut accessor: impl FnMut(&mut [Value], Position<'_>) -> bool,
) -> Result<()> {
    check_variant(op, "accessor")?;
    let Some(entry) = prepare(op, inputs, out)? else {
        return Ok(());
    };
    log::trace!("{op}: accessor call on {}", PortableBackend::NAME);
    with_element!(entry.output, T => by_kernel::<T>(op, inputs, out, &mut accessor))
}

/// Like [`apply`], allocating a contiguous output of the promoted dtype.
pub fn evaluate(op: Op, inputs: &[TypedView<'_>]) -> Result<TypedBuffer> {
    let len = inputs.first().map_or(0, TypedView::len);
    let dtypes: Vec<DType> = inputs.iter().map(TypedView::dtype).collect();
    let mut out = TypedBuffer::zeros(output_dtype(op, &dtypes)?, len);
    apply(op, inputs, &mut out.as_view_mut())?;
    Ok(out)
}
