//! BLAS level-1 routines on one-dimensional strided views.

use crate::kernel::{ensure_same_len, Dst, Src};
use crate::map_view::{map_inplace, map_into, zip_map2_inplace};
use crate::simd::{self, MaybeSimdOps};
use num_traits::Float;
use std::ops::Mul;
use strided_traits::ScalarBase;
use strided_view::{Conj, ElementOp, ElementOpApply, Identity, Result, StridedView, StridedViewMut};

/// Copy `src` into `dest`.
pub fn copy_into<T: Copy>(dest: &mut StridedViewMut<T>, src: &StridedView<T>) -> Result<()> {
    ensure_same_len(dest.len(), src.len())?;
    if let (Some(out), Some(xs)) = (dest.as_contiguous_slice_mut(), src.as_contiguous_slice()) {
        out.copy_from_slice(xs);
        return Ok(());
    }
    map_into(dest, src, |v| v)
}

/// Exchange the elements of `x` and `y`.
pub fn swap<T: Copy>(x: &mut StridedViewMut<T>, y: &mut StridedViewMut<T>) -> Result<()> {
    ensure_same_len(x.len(), y.len())?;
    let len = x.len();
    let (mut px, mut py) = (Dst::of(x), Dst::of(y));
    for _ in 0..len {
        unsafe {
            let (a, b) = (px.current(), py.current());
            px.put(b);
            py.put(a);
        }
    }
    Ok(())
}

/// Scale in place: `x[i] = alpha * x[i]`.
pub fn scal<T: Copy + Mul<Output = T>>(x: &mut StridedViewMut<T>, alpha: T) -> Result<()> {
    map_inplace(x, |v| alpha * v)
}

/// `y[i] = y[i] + alpha * x[i]`.
///
/// With `alpha == 0` the output is left untouched, even where `x` holds NaN.
pub fn axpy<T: ScalarBase>(y: &mut StridedViewMut<T>, x: &StridedView<T>, alpha: T) -> Result<()> {
    ensure_same_len(y.len(), x.len())?;
    if alpha == T::zero() {
        return Ok(());
    }
    zip_map2_inplace(y, x, |yv, xv| yv + alpha * xv)
}

#[inline(always)]
fn dot_with<T: ScalarBase, OpX: ElementOp<T>>(x: &StridedView<T>, y: &StridedView<T>) -> T {
    if let (Some(xs), Some(ys)) = (x.as_contiguous_slice(), y.as_contiguous_slice()) {
        return xs
            .iter()
            .zip(ys)
            .fold(T::zero(), |acc, (&a, &b)| acc + OpX::apply(a) * b);
    }
    let (mut px, mut py) = (Src::of(x), Src::of(y));
    let mut acc = T::zero();
    for _ in 0..x.len() {
        acc = acc + unsafe { OpX::apply(px.next()) * py.next() };
    }
    acc
}

/// Dot product `sum(x[i] * y[i])`.
pub fn dot<T: ScalarBase + MaybeSimdOps>(x: &StridedView<T>, y: &StridedView<T>) -> Result<T> {
    ensure_same_len(x.len(), y.len())?;
    if let (Some(xs), Some(ys)) = (x.as_contiguous_slice(), y.as_contiguous_slice()) {
        if xs.len() >= simd::SIMD_MIN_LEN {
            if let Some(v) = T::try_simd_dot(xs, ys) {
                return Ok(v);
            }
        }
    }
    Ok(dot_with::<T, Identity>(x, y))
}

/// Conjugated dot product `sum(conj(x[i]) * y[i])`.
///
/// Same as [`dot`] for real element types.
pub fn dotc<T: ScalarBase + ElementOpApply>(x: &StridedView<T>, y: &StridedView<T>) -> Result<T> {
    ensure_same_len(x.len(), y.len())?;
    Ok(dot_with::<T, Conj>(x, y))
}

/// Sum of all elements. Zero for an empty view.
pub fn sum<T: ScalarBase + MaybeSimdOps>(x: &StridedView<T>) -> T {
    if let Some(xs) = x.as_contiguous_slice() {
        if xs.len() >= simd::SIMD_MIN_LEN {
            if let Some(v) = T::try_simd_sum(xs) {
                return v;
            }
        }
        return xs.iter().fold(T::zero(), |acc, &v| acc + v);
    }
    x.iter().fold(T::zero(), |acc, &v| acc + v)
}

/// Sum of absolute values.
pub fn asum<T: Float>(x: &StridedView<T>) -> T {
    x.iter().fold(T::zero(), |acc, &v| acc + v.abs())
}

/// Euclidean norm, computed with a running scale so that neither
/// intermediate squares overflow nor tiny values underflow.
pub fn nrm2<T: Float>(x: &StridedView<T>) -> T {
    let mut scale = T::zero();
    let mut ssq = T::one();
    for &v in x.iter() {
        if v == T::zero() {
            continue;
        }
        let a = v.abs();
        if scale < a {
            let r = scale / a;
            ssq = T::one() + ssq * r * r;
            scale = a;
        } else {
            let r = a / scale;
            ssq = ssq + r * r;
        }
    }
    scale * ssq.sqrt()
}

/// Logical index of the first element with the largest absolute value.
///
/// `None` for an empty view.
pub fn iamax<T: Float>(x: &StridedView<T>) -> Option<usize> {
    let mut it = x.iter().enumerate();
    let (_, first) = it.next()?;
    let mut best = (0, first.abs());
    for (i, v) in it {
        let a = v.abs();
        if a > best.1 {
            best = (i, a);
        }
    }
    Some(best.0)
}

/// Plane rotation: `x' = c*x + s*y`, `y' = c*y - s*x`.
pub fn rot<T: Float>(x: &mut StridedViewMut<T>, y: &mut StridedViewMut<T>, c: T, s: T) -> Result<()> {
    ensure_same_len(x.len(), y.len())?;
    let len = x.len();
    let (mut px, mut py) = (Dst::of(x), Dst::of(y));
    for _ in 0..len {
        unsafe {
            let (a, b) = (px.current(), py.current());
            px.put(c * a + s * b);
            py.put(c * b - s * a);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    #[test]
    fn test_copy_reversed() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut buf = [0.0; 5];
        copy_into(
            &mut StridedViewMut::from_slice(&mut buf),
            &StridedView::with_stride(&x, 5, -1).unwrap(),
        )
        .unwrap();
        assert_eq!(buf, [5.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_swap_strided() {
        let mut a = [1, 2, 3, 4];
        let mut b = [9, 8];
        swap(
            &mut StridedViewMut::new(&mut a, 2, 2, 0).unwrap(),
            &mut StridedViewMut::from_slice(&mut b),
        )
        .unwrap();
        assert_eq!(a, [9, 2, 8, 4]);
        assert_eq!(b, [1, 3]);
    }

    #[test]
    fn test_scal_and_axpy() {
        let mut y = [1.0, 1.0, 1.0];
        scal(&mut StridedViewMut::from_slice(&mut y), 3.0).unwrap();
        assert_eq!(y, [3.0, 3.0, 3.0]);

        let x = [1.0, 2.0, 3.0];
        axpy(
            &mut StridedViewMut::from_slice(&mut y),
            &StridedView::from_slice(&x),
            2.0,
        )
        .unwrap();
        assert_eq!(y, [5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_axpy_zero_alpha_ignores_nan() {
        let mut y = [1.0, 2.0];
        let x = [f64::NAN, f64::NAN];
        axpy(
            &mut StridedViewMut::from_slice(&mut y),
            &StridedView::from_slice(&x),
            0.0,
        )
        .unwrap();
        assert_eq!(y, [1.0, 2.0]);
    }

    #[test]
    fn test_dot_strided_and_long() {
        let x = [1.0, 0.0, 2.0, 0.0, 3.0];
        let y = [4.0, 5.0, 6.0];
        let d = dot(
            &StridedView::new(&x, 3, 2, 0).unwrap(),
            &StridedView::from_slice(&y),
        )
        .unwrap();
        assert_eq!(d, 32.0);

        let a: Vec<f64> = (0..300).map(|i| i as f64).collect();
        let expected: f64 = a.iter().map(|v| v * v).sum();
        let v = StridedView::from_slice(&a);
        assert_relative_eq!(dot(&v, &v).unwrap(), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_dotc_conjugates_first_operand() {
        let x = [Complex64::new(1.0, 2.0), Complex64::new(0.0, -1.0)];
        let y = [Complex64::new(3.0, 0.0), Complex64::new(0.0, 1.0)];
        let xv = StridedView::from_slice(&x);
        let yv = StridedView::from_slice(&y);
        // conj(1+2i)*3 + conj(-i)*i = (3-6i) + (i*i) = 2-6i
        assert_eq!(dotc(&xv, &yv).unwrap(), Complex64::new(2.0, -6.0));
        // (1+2i)*3 + (-i)*i = 3+6i + 1
        assert_eq!(dot(&xv, &yv).unwrap(), Complex64::new(4.0, 6.0));
    }

    #[test]
    fn test_sum_and_asum() {
        let x = [1.0f32, -2.0, 3.0, -4.0];
        let v = StridedView::from_slice(&x);
        assert_eq!(sum(&v), -2.0);
        assert_eq!(asum(&v), 10.0);
        assert_eq!(sum(&StridedView::new(&x, 2, 2, 1).unwrap()), -6.0);
        let empty: [i32; 0] = [];
        assert_eq!(sum(&StridedView::from_slice(&empty)), 0);
    }

    #[test]
    fn test_nrm2_scaled() {
        let x = [3.0, 4.0];
        assert_relative_eq!(nrm2(&StridedView::from_slice(&x)), 5.0);
        let big = [1e200, 1e200];
        assert_relative_eq!(
            nrm2(&StridedView::from_slice(&big)),
            1e200 * 2.0f64.sqrt(),
            max_relative = 1e-14
        );
        let empty: [f64; 0] = [];
        assert_eq!(nrm2(&StridedView::from_slice(&empty)), 0.0);
        assert!(nrm2(&StridedView::from_slice(&[1.0, f64::NAN])).is_nan());
    }

    #[test]
    fn test_iamax_first_maximum() {
        let x = [1.0, -5.0, 5.0, 2.0];
        assert_eq!(iamax(&StridedView::from_slice(&x)), Some(1));
        assert_eq!(iamax(&StridedView::from_slice(&x).reversed()), Some(1));
        let empty: [f32; 0] = [];
        assert_eq!(iamax(&StridedView::from_slice(&empty)), None);
    }

    #[test]
    fn test_rot_quarter_turn() {
        let mut x = [1.0, 0.0];
        let mut y = [0.0, 1.0];
        rot(
            &mut StridedViewMut::from_slice(&mut x),
            &mut StridedViewMut::from_slice(&mut y),
            0.0,
            1.0,
        )
        .unwrap();
        assert_eq!(x, [0.0, 1.0]);
        assert_eq!(y, [-1.0, 0.0]);
    }
}
