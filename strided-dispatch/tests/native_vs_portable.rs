#![cfg(feature = "native")]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{StandardNormal, Uniform};
use strided_dispatch::backend::native_enabled;
use strided_dispatch::{
    apply, apply_with, DType, DispatchError, NativeBackend, Op, PortableBackend, TypedBuffer,
    TypedView, Value,
};

const LEN: usize = 517;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_buffer(dtype: DType, len: usize, rng: &mut StdRng) -> TypedBuffer {
    match dtype {
        DType::Float64 => TypedBuffer::from_vec(
            (0..len)
                .map(|_| rng.sample::<f64, _>(StandardNormal) * 1e3)
                .collect::<Vec<_>>(),
        ),
        DType::Float32 => TypedBuffer::from_vec(
            (0..len)
                .map(|_| rng.sample::<f32, _>(StandardNormal) * 1e3)
                .collect::<Vec<_>>(),
        ),
        DType::Int32 => TypedBuffer::from_vec((0..len).map(|_| rng.gen::<i32>()).collect::<Vec<_>>()),
        DType::Uint8 => TypedBuffer::from_vec((0..len).map(|_| rng.gen::<u8>()).collect::<Vec<_>>()),
        other => {
            let ints = Uniform::new_inclusive(-1000i64, 1000);
            TypedBuffer::from_vec((0..len).map(|_| Value::Int(rng.sample(ints))).collect::<Vec<_>>())
                .cast(other)
        }
    }
}

/// Element bit patterns, so `-0.0`/`0.0` and NaN payloads compare exactly.
fn bits(buf: &TypedBuffer) -> Vec<u64> {
    match buf.dtype() {
        DType::Float64 => buf.as_slice::<f64>().unwrap().iter().map(|x| x.to_bits()).collect(),
        DType::Float32 => buf
            .as_slice::<f32>()
            .unwrap()
            .iter()
            .map(|x| x.to_bits() as u64)
            .collect(),
        _ => buf
            .as_view()
            .to_values()
            .iter()
            .map(|v| v.as_i64() as u64)
            .collect(),
    }
}

fn run_both(op: Op, inputs: &[TypedView<'_>], dtype: DType) -> (TypedBuffer, TypedBuffer) {
    let mut native = TypedBuffer::zeros(dtype, LEN);
    let mut portable = TypedBuffer::zeros(dtype, LEN);
    apply_with::<NativeBackend>(op, inputs, &mut native.as_view_mut()).unwrap();
    apply_with::<PortableBackend>(op, inputs, &mut portable.as_view_mut()).unwrap();
    (native, portable)
}

#[test]
fn test_native_matches_portable_bitwise() {
    init();
    if !native_enabled() {
        return;
    }
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let cases: [(DType, &[Op]); 4] = [
        (DType::Float64, &[Op::Identity, Op::Abs, Op::Neg, Op::Add, Op::Sub, Op::Mul, Op::MulAdd, Op::Add4]),
        (DType::Float32, &[Op::Abs, Op::Neg, Op::Add, Op::Sub, Op::Mul, Op::MulAdd, Op::Add4]),
        (DType::Int32, &[Op::Abs, Op::Neg, Op::Add, Op::Sub, Op::Mul, Op::MulAdd, Op::Add4]),
        (DType::Uint8, &[Op::Identity, Op::Abs, Op::Neg, Op::Add, Op::Sub, Op::Mul, Op::Add4]),
    ];
    for (dtype, ops) in cases {
        let buffers: Vec<TypedBuffer> = (0..4).map(|_| random_buffer(dtype, LEN, &mut rng)).collect();
        let views: Vec<TypedView<'_>> = buffers.iter().map(TypedBuffer::as_view).collect();
        for &op in ops {
            let (native, portable) = run_both(op, &views[..op.arity()], dtype);
            assert_eq!(bits(&native), bits(&portable), "{dtype} {op}");
        }
    }
}

#[test]
fn test_native_with_offsets_matches_portable() {
    init();
    if !native_enabled() {
        return;
    }
    let mut rng = StdRng::seed_from_u64(7);
    let a = random_buffer(DType::Int16, LEN + 3, &mut rng);
    let b = random_buffer(DType::Int16, LEN + 1, &mut rng);
    let inputs = [a.view(LEN, 1, 3).unwrap(), b.view(LEN, 1, 1).unwrap()];
    let (native, portable) = run_both(Op::Mul, &inputs, DType::Int16);
    assert_eq!(bits(&native), bits(&portable));
}

#[test]
fn test_native_rejects_ineligible_operands() {
    init();
    let mut rng = StdRng::seed_from_u64(11);
    let a = random_buffer(DType::Float64, 2 * LEN, &mut rng);
    let mut out = TypedBuffer::zeros(DType::Float64, LEN);
    let err = apply_with::<NativeBackend>(Op::Neg, &[a.view(LEN, 2, 0).unwrap()], &mut out.as_view_mut());
    assert!(matches!(
        err,
        Err(DispatchError::BackendUnsupported { backend: "native", op: Op::Neg })
    ));

    let g = random_buffer(DType::Generic, LEN, &mut rng);
    let mut gout = TypedBuffer::zeros(DType::Generic, LEN);
    assert!(apply_with::<NativeBackend>(Op::Neg, &[g.as_view()], &mut gout.as_view_mut()).is_err());
}

#[test]
fn test_apply_falls_back_for_strided_and_mixed_operands() {
    init();
    let mut rng = StdRng::seed_from_u64(13);
    let a = random_buffer(DType::Float32, 2 * LEN, &mut rng);
    let b = random_buffer(DType::Int16, LEN, &mut rng);

    let mut out = TypedBuffer::zeros(DType::Float32, LEN);
    let strided = a.view(LEN, -2, 2 * LEN - 1).unwrap();
    apply(Op::Add, &[strided, b.as_view()], &mut out.as_view_mut()).unwrap();

    let xs = strided.cast_to::<f32>();
    let ys = b.as_view().cast_to::<f32>();
    let want: Vec<u64> = xs.iter().zip(&ys).map(|(x, y)| (x + y).to_bits() as u64).collect();
    assert_eq!(bits(&out), want);
}
