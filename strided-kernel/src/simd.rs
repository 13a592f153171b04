//! Runtime SIMD dispatch.
//!
//! With the `simd` feature, loops are run inside `pulp::Arch::dispatch` so
//! the compiler can vectorize them for the best instruction set detected at
//! runtime. Without it every helper calls the closure directly.

/// Below this many elements the dispatch overhead outweighs any speedup.
pub const SIMD_MIN_LEN: usize = 64;

/// Run `f` under the best available target features.
#[inline(always)]
pub fn dispatch<R>(f: impl FnOnce() -> R) -> R {
    #[cfg(feature = "simd")]
    {
        pulp::Arch::new().dispatch(f)
    }
    #[cfg(not(feature = "simd"))]
    {
        f()
    }
}

/// [`dispatch`], but only for loops of at least [`SIMD_MIN_LEN`] elements.
#[inline(always)]
pub fn dispatch_if_large<R>(len: usize, f: impl FnOnce() -> R) -> R {
    if len >= SIMD_MIN_LEN {
        dispatch(f)
    } else {
        f()
    }
}

/// Element types with an explicitly vectorized sum/dot over contiguous slices.
///
/// The defaults return `None` and the caller falls back to a scalar loop.
/// `f32` and `f64` provide real kernels when the `simd` feature is on.
pub trait MaybeSimdOps: Copy + Sized {
    fn try_simd_sum(_src: &[Self]) -> Option<Self> {
        None
    }
    fn try_simd_dot(_a: &[Self], _b: &[Self]) -> Option<Self> {
        None
    }
}

macro_rules! impl_scalar_only {
    ($($t:ty),*) => {
        $(impl MaybeSimdOps for $t {})*
    };
}

impl_scalar_only!(i8, i16, i32, i64, u8, u16, u32, u64);

impl<T: num_traits::Num + Copy> MaybeSimdOps for num_complex::Complex<T> {}

#[cfg(not(feature = "simd"))]
impl_scalar_only!(f32, f64);

#[cfg(feature = "simd")]
mod simd_impls {
    use super::MaybeSimdOps;
    use pulp::{Simd, WithSimd};

    // Four independent accumulators hide the add latency; the scalar tail
    // is folded in after the horizontal reduction.
    macro_rules! impl_simd_float {
        ($t:ty, $as_simd:ident, $splat:ident, $add:ident, $mul_add:ident, $reduce:ident) => {
            impl MaybeSimdOps for $t {
                fn try_simd_sum(src: &[$t]) -> Option<$t> {
                    struct Sum<'a>(&'a [$t]);

                    impl WithSimd for Sum<'_> {
                        type Output = $t;

                        #[inline(always)]
                        fn with_simd<S: Simd>(self, simd: S) -> $t {
                            let (head, tail) = S::$as_simd(self.0);
                            let mut acc = [simd.$splat(0.0); 4];
                            let mut chunks = head.chunks_exact(4);
                            for c in &mut chunks {
                                for k in 0..4 {
                                    acc[k] = simd.$add(acc[k], c[k]);
                                }
                            }
                            for &v in chunks.remainder() {
                                acc[0] = simd.$add(acc[0], v);
                            }
                            let acc = simd.$add(simd.$add(acc[0], acc[1]), simd.$add(acc[2], acc[3]));
                            tail.iter().fold(simd.$reduce(acc), |s, &x| s + x)
                        }
                    }

                    Some(pulp::Arch::new().dispatch(Sum(src)))
                }

                fn try_simd_dot(a: &[$t], b: &[$t]) -> Option<$t> {
                    if a.len() != b.len() {
                        return None;
                    }
                    struct Dot<'a>(&'a [$t], &'a [$t]);

                    impl WithSimd for Dot<'_> {
                        type Output = $t;

                        #[inline(always)]
                        fn with_simd<S: Simd>(self, simd: S) -> $t {
                            let (a_head, a_tail) = S::$as_simd(self.0);
                            let (b_head, b_tail) = S::$as_simd(self.1);
                            let mut acc = [simd.$splat(0.0); 4];
                            let mut a_chunks = a_head.chunks_exact(4);
                            let mut b_chunks = b_head.chunks_exact(4);
                            for (ca, cb) in (&mut a_chunks).zip(&mut b_chunks) {
                                for k in 0..4 {
                                    acc[k] = simd.$mul_add(ca[k], cb[k], acc[k]);
                                }
                            }
                            for (&x, &y) in a_chunks.remainder().iter().zip(b_chunks.remainder()) {
                                acc[0] = simd.$mul_add(x, y, acc[0]);
                            }
                            let acc = simd.$add(simd.$add(acc[0], acc[1]), simd.$add(acc[2], acc[3]));
                            a_tail
                                .iter()
                                .zip(b_tail)
                                .fold(simd.$reduce(acc), |s, (&x, &y)| s + x * y)
                        }
                    }

                    Some(pulp::Arch::new().dispatch(Dot(a, b)))
                }
            }
        };
    }

    impl_simd_float!(f32, as_simd_f32s, splat_f32s, add_f32s, mul_add_f32s, reduce_sum_f32s);
    impl_simd_float!(f64, as_simd_f64s, splat_f64s, add_f64s, mul_add_f64s, reduce_sum_f64s);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dispatch_returns_closure_value() {
        assert_eq!(dispatch(|| 7), 7);
        assert_eq!(dispatch_if_large(3, || 1 + 1), 2);
        assert_eq!(dispatch_if_large(SIMD_MIN_LEN, || 5), 5);
    }

    #[test]
    fn test_integer_types_have_no_simd_path() {
        assert_eq!(i32::try_simd_sum(&[1, 2, 3]), None);
        assert_eq!(u8::try_simd_dot(&[1], &[2]), None);
    }

    #[cfg(feature = "simd")]
    #[test]
    fn test_simd_sum_and_dot_match_scalar() {
        let a: Vec<f64> = (0..1031).map(|i| (i as f64) * 0.25 - 7.0).collect();
        let b: Vec<f64> = (0..1031).map(|i| 1.0 / (i as f64 + 1.0)).collect();
        let sum: f64 = a.iter().sum();
        let dot: f64 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        assert_relative_eq!(f64::try_simd_sum(&a).unwrap(), sum, max_relative = 1e-12);
        assert_relative_eq!(f64::try_simd_dot(&a, &b).unwrap(), dot, max_relative = 1e-12);

        let af: Vec<f32> = a.iter().map(|&x| x as f32).collect();
        let sumf: f32 = af.iter().sum();
        assert_relative_eq!(f32::try_simd_sum(&af).unwrap(), sumf, max_relative = 1e-4);
    }
}
