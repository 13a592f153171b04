//! Scalar type bounds for BLAS-style strided kernels.

/// Shared trait bounds for element types usable with the level-1 kernels
/// (`axpy`, `dot`, `sum`, ...).
///
/// `ScalarBase` does not require [`ElementOpApply`](crate::ElementOpApply),
/// so custom semiring types can be used with identity-only kernels.
pub trait ScalarBase:
    Copy
    + Send
    + Sync
    + std::ops::Mul<Output = Self>
    + std::ops::Add<Output = Self>
    + num_traits::Zero
    + num_traits::One
    + PartialEq
{
}

impl<T> ScalarBase for T where
    T: Copy
        + Send
        + Sync
        + std::ops::Mul<Output = T>
        + std::ops::Add<Output = T>
        + num_traits::Zero
        + num_traits::One
        + PartialEq
{
}
