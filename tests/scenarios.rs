use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strided_base::convention;
use strided_base::dispatch::meta::{decode_all, encode_operands, NdarrayMeta};
use strided_base::{
    apply, copy_into, stride_to_offset, zip_map4_into, DType, Op, StridedIndices, StridedView,
    StridedViewMut, TypedBuffer,
};

#[test]
fn test_zero_length_leaves_output_unchanged() {
    let x: [f64; 0] = [];
    let mut out = [9.0; 3];
    convention::unary(0, &x, 1, &mut out, 1, |v: f64| v * 2.0).unwrap();
    assert_eq!(out, [9.0; 3]);

    let empty = TypedBuffer::zeros(DType::Float32, 0);
    let mut typed = TypedBuffer::from_vec(vec![9.0f32; 3]);
    apply(
        Op::Neg,
        &[empty.as_view()],
        &mut typed.view_mut(0, 1, 0).unwrap(),
    )
    .unwrap();
    assert_eq!(typed.as_slice::<f32>().unwrap(), &[9.0; 3]);
}

#[test]
fn test_negative_stride_mirrors_positive_stride() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let n = rng.gen_range(0..20usize);
        let s = rng.gen_range(1..5isize);
        let forward: Vec<isize> = StridedIndices::new(n, s, 0).collect();
        let mirrored = stride_to_offset(n, -s);
        let mut backward: Vec<isize> = StridedIndices::new(n, -s, mirrored as isize).collect();
        backward.reverse();
        assert_eq!(forward, backward, "n={n} s={s}");
    }
}

#[test]
fn test_quaternary_sum() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    let v = StridedView::from_slice(&x);
    let mut out = [0.0; 5];
    zip_map4_into(
        &mut StridedViewMut::from_slice(&mut out),
        &v,
        &v,
        &v,
        &v,
        |a, b, c, d| a + b + c + d,
    )
    .unwrap();
    assert_eq!(out, [4.0, 8.0, 12.0, 16.0, 20.0]);

    let typed = TypedBuffer::from_vec(x.to_vec());
    let tv = typed.as_view();
    let mut dispatched = TypedBuffer::zeros(DType::Float64, 5);
    apply(Op::Add4, &[tv, tv, tv, tv], &mut dispatched.as_view_mut()).unwrap();
    assert_eq!(dispatched.as_slice::<f64>().unwrap(), &out);
}

#[test]
fn test_reverse_copy() {
    let x = [1, 2, 3, 4, 5, 6];
    let mut y = [0; 6];
    copy_into(
        &mut StridedViewMut::from_slice(&mut y),
        &StridedView::new(&x, 6, -1, 5).unwrap(),
    )
    .unwrap();
    assert_eq!(y, [6, 5, 4, 3, 2, 1]);

    let mut z = [0; 6];
    convention::copy(6, &x, -1, &mut z, 1).unwrap();
    assert_eq!(z, y);
}

#[test]
fn test_zero_stride_broadcast() {
    let c = [2.5];
    let x = [1.0, 2.0, 3.0];
    let mut out = [0.0; 3];
    convention::binary_ndarray(3, &c, 0, 0, &x, 1, 0, &mut out, 1, 0, |a: f64, b: f64| a * b)
        .unwrap();
    for (o, xi) in out.iter().zip(x) {
        assert_relative_eq!(*o, 2.5 * xi);
    }
}

#[test]
fn test_metadata_round_trip() {
    let a = TypedBuffer::from_vec(vec![0u16; 10]);
    let mut b = TypedBuffer::zeros(DType::Complex128, 4);
    let metas = vec![
        NdarrayMeta::of_view(&a.view(5, -2, 9).unwrap()),
        NdarrayMeta::of_view_mut(&b.view_mut(4, 1, 0).unwrap()),
    ];
    assert_eq!(decode_all(&encode_operands(&metas)).unwrap(), metas);
    assert_eq!(metas[0].strides, vec![-2]);
    assert_eq!(metas[1].dtype, DType::Complex128);
}
