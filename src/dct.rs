//! Discrete Cosine Transform, Type II (forward) and Type III (inverse).
//!
//! Both directions run in `O(N log N)` by reducing the cosine sums to a
//! length-`N` real FFT (itself a half-length complex FFT for even `N`):
//!
//! 1. reorder the samples, even indices ascending into the front and odd
//!    indices descending into the back;
//! 2. take the real FFT `V` of the reordered sequence;
//! 3. rotate each bin, `X[k] = 2·Re(exp(-πi k / 2N) · V[k])`.
//!
//! The inverse walks the same steps backwards. Plans are cached per length,
//! either explicitly through [`DctPlanner`] or implicitly by the free
//! functions [`forward`] and [`inverse`] (process-wide cache, `std` only).

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;

use crate::fft::{ratio, Complex, FftError};
use crate::num::{first_non_finite, Float};
use crate::rfft::RealFftPlan;

/// Largest supported transform length.
pub const MAX_DCT_LEN: usize = 1 << 22;

/// Output scaling convention, matching SciPy's `norm` argument for DCTs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Normalization {
    /// Unscaled forward; the inverse carries the full `1/N`.
    #[default]
    None,
    /// Orthonormal basis: `1/√(4N)` on bin 0 and `1/√(2N)` elsewhere.
    Ortho,
    /// Forward carries `1/(2N)`; the inverse is unscaled.
    Forward,
}

/// Why an input sequence was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFault {
    /// Zero-length sequence.
    Empty,
    /// NaN or infinity at `index`.
    NonFinite { index: usize },
    /// Longer than [`MAX_DCT_LEN`].
    TooLong { len: usize },
    /// Slice length differs from the plan length.
    LengthMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DctError {
    /// The sequence was rejected before transforming.
    InvalidInput(InputFault),
    /// Finite input whose coefficients exceed the range of the scalar type.
    Overflow { index: usize },
    /// Failure reported by the FFT layer.
    Transform(FftError),
}

impl DctError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, DctError::InvalidInput(_))
    }
}

impl From<FftError> for DctError {
    fn from(err: FftError) -> Self {
        DctError::Transform(err)
    }
}

impl fmt::Display for DctError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DctError::InvalidInput(InputFault::Empty) => {
                write!(f, "invalid input: sequence is empty")
            }
            DctError::InvalidInput(InputFault::NonFinite { index }) => {
                write!(f, "invalid input: non-finite value at index {index}")
            }
            DctError::InvalidInput(InputFault::TooLong { len }) => {
                write!(
                    f,
                    "invalid input: length {len} exceeds the maximum of {MAX_DCT_LEN}"
                )
            }
            DctError::InvalidInput(InputFault::LengthMismatch { expected, actual }) => {
                write!(
                    f,
                    "invalid input: expected length {expected}, got {actual}"
                )
            }
            DctError::Overflow { index } => {
                write!(f, "result overflowed at output index {index}")
            }
            DctError::Transform(err) => write!(f, "transform failed: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DctError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DctError::Transform(err) => Some(err),
            DctError::InvalidInput(_) | DctError::Overflow { .. } => None,
        }
    }
}

fn check_len(len: usize) -> Result<(), DctError> {
    match len {
        0 => Err(DctError::InvalidInput(InputFault::Empty)),
        len if len > MAX_DCT_LEN => Err(DctError::InvalidInput(InputFault::TooLong { len })),
        _ => Ok(()),
    }
}

/// Precomputed DCT-II/DCT-III of one fixed length.
///
/// Immutable after construction; share it across threads behind an [`Arc`].
pub struct DctPlan<T: Float> {
    n: usize,
    rfft: RealFftPlan<T>,
    /// `exp(-πi k / 2N)` for `k = 0..N`.
    twiddles: Arc<[Complex<T>]>,
}

impl<T: Float> fmt::Debug for DctPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DctPlan").field("len", &self.n).finish()
    }
}

impl<T: Float> DctPlan<T> {
    pub fn new(n: usize) -> Result<Self, DctError> {
        check_len(n)?;
        let mut twiddles = Vec::with_capacity(n);
        for k in 0..n {
            twiddles.push(Complex::expi(-T::pi() * ratio::<T>(k, 2 * n)?));
        }
        Ok(Self {
            n,
            rfft: RealFftPlan::new(n)?,
            twiddles: Arc::from(twiddles),
        })
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.n
    }

    fn validate(&self, input: &[T]) -> Result<(), DctError> {
        if input.len() != self.n {
            return Err(DctError::InvalidInput(InputFault::LengthMismatch {
                expected: self.n,
                actual: input.len(),
            }));
        }
        if let Some(index) = first_non_finite(input) {
            return Err(DctError::InvalidInput(InputFault::NonFinite { index }));
        }
        Ok(())
    }

    fn check_output(&self, output: &[T]) -> Result<(), DctError> {
        if output.len() != self.n {
            return Err(DctError::InvalidInput(InputFault::LengthMismatch {
                expected: self.n,
                actual: output.len(),
            }));
        }
        Ok(())
    }

    fn check_finite(output: &[T]) -> Result<(), DctError> {
        match first_non_finite(output) {
            Some(index) => Err(DctError::Overflow { index }),
            None => Ok(()),
        }
    }

    fn n_as_t(&self) -> Result<T, DctError> {
        Ok(T::from_usize(self.n).ok_or(FftError::LengthOverflow)?)
    }

    /// Unnormalized DCT-II of validated `input`.
    fn raw_dct2(&self, input: &[T], output: &mut [T]) -> Result<(), DctError> {
        let n = self.n;
        let mut reordered = vec![T::zero(); n];
        for (i, &x) in input.iter().enumerate() {
            if i % 2 == 0 {
                reordered[i / 2] = x;
            } else {
                reordered[n - 1 - i / 2] = x;
            }
        }
        let spectrum = self.rfft.rfft_vec(&reordered)?;
        let two = T::from_f32(2.0);
        for (k, out) in output.iter_mut().enumerate() {
            let bin = if k < spectrum.len() {
                spectrum[k]
            } else {
                spectrum[n - k].conj()
            };
            *out = two * self.twiddles[k].mul(bin).re;
        }
        Ok(())
    }

    /// Exact inverse of [`raw_dct2`](Self::raw_dct2): `raw_dct2(output) == coeffs`.
    fn raw_inverse(&self, coeffs: &[T], output: &mut [T]) -> Result<(), DctError> {
        let n = self.n;
        let half = T::from_f32(crate::rfft::HALF);
        let mut spectrum = Vec::with_capacity(self.rfft.spectrum_len());
        for k in 0..self.rfft.spectrum_len() {
            let mirror = if k == 0 { T::zero() } else { coeffs[n - k] };
            let rotated = self.twiddles[k]
                .conj()
                .mul(Complex::new(coeffs[k], -mirror));
            spectrum.push(rotated.scale(half));
        }
        let reordered = self.rfft.irfft_vec(&spectrum)?;
        for (i, out) in output.iter_mut().enumerate() {
            *out = if i % 2 == 0 {
                reordered[i / 2]
            } else {
                reordered[n - 1 - i / 2]
            };
        }
        Ok(())
    }

    /// DCT-II of `input` into `output` under `norm`.
    pub fn forward_into(
        &self,
        input: &[T],
        output: &mut [T],
        norm: Normalization,
    ) -> Result<(), DctError> {
        self.validate(input)?;
        self.check_output(output)?;
        self.raw_dct2(input, output)?;
        let n = self.n_as_t()?;
        match norm {
            Normalization::None => {}
            Normalization::Ortho => {
                let two_n = T::from_f32(2.0) * n;
                output[0] = output[0] / (two_n + two_n).sqrt();
                let scale = T::one() / two_n.sqrt();
                for v in output[1..].iter_mut() {
                    *v = *v * scale;
                }
            }
            Normalization::Forward => {
                let scale = T::one() / (T::from_f32(2.0) * n);
                for v in output.iter_mut() {
                    *v = *v * scale;
                }
            }
        }
        Self::check_finite(output)
    }

    /// DCT-III of `input` into `output`, undoing the scaling that
    /// [`forward_into`](Self::forward_into) applies under the same `norm`.
    pub fn inverse_into(
        &self,
        input: &[T],
        output: &mut [T],
        norm: Normalization,
    ) -> Result<(), DctError> {
        self.validate(input)?;
        self.check_output(output)?;
        let n = self.n_as_t()?;
        let two_n = T::from_f32(2.0) * n;
        let coeffs: Vec<T> = match norm {
            Normalization::None => input.to_vec(),
            Normalization::Ortho => {
                let dc = (two_n + two_n).sqrt();
                let rest = two_n.sqrt();
                input
                    .iter()
                    .enumerate()
                    .map(|(k, &v)| if k == 0 { v * dc } else { v * rest })
                    .collect()
            }
            Normalization::Forward => input.iter().map(|&v| v * two_n).collect(),
        };
        self.raw_inverse(&coeffs, output)?;
        Self::check_finite(output)
    }

    pub fn forward(&self, input: &[T], norm: Normalization) -> Result<Vec<T>, DctError> {
        let mut output = vec![T::zero(); self.n];
        self.forward_into(input, &mut output, norm)?;
        Ok(output)
    }

    pub fn inverse(&self, input: &[T], norm: Normalization) -> Result<Vec<T>, DctError> {
        let mut output = vec![T::zero(); self.n];
        self.inverse_into(input, &mut output, norm)?;
        Ok(output)
    }

    /// Unnormalized DCT-II: `X[k] = 2 Σ x[n] cos(πk(2n+1)/2N)`.
    pub fn dct2(&self, input: &[T]) -> Result<Vec<T>, DctError> {
        self.forward(input, Normalization::None)
    }

    /// Unnormalized DCT-III: `x[n] = X[0]/2 + Σ_{k≥1} X[k] cos(πk(2n+1)/2N)`.
    pub fn dct3(&self, input: &[T]) -> Result<Vec<T>, DctError> {
        let mut output = self.inverse(input, Normalization::None)?;
        let n = self.n_as_t()?;
        for v in output.iter_mut() {
            *v = *v * n;
        }
        Self::check_finite(&output)?;
        Ok(output)
    }
}

/// Caches [`DctPlan`]s by length.
pub struct DctPlanner<T: Float> {
    cache: HashMap<usize, Arc<DctPlan<T>>>,
}

impl<T: Float> Default for DctPlanner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> DctPlanner<T> {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Fetch the plan for `n`, building it on first use.
    pub fn plan(&mut self, n: usize) -> Result<Arc<DctPlan<T>>, DctError> {
        if let Some(plan) = self.cache.get(&n) {
            return Ok(Arc::clone(plan));
        }
        let plan = Arc::new(DctPlan::new(n)?);
        debug_log!("dct plan built: n={}", n);
        self.cache.insert(n, Arc::clone(&plan));
        Ok(plan)
    }

    pub fn forward(&mut self, input: &[T], norm: Normalization) -> Result<Vec<T>, DctError> {
        self.plan(input.len())?.forward(input, norm)
    }

    pub fn inverse(&mut self, input: &[T], norm: Normalization) -> Result<Vec<T>, DctError> {
        self.plan(input.len())?.inverse(input, norm)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(feature = "std")]
fn plan_for<T: Float>(n: usize) -> Result<Arc<DctPlan<T>>, DctError> {
    crate::cache::shared_plan(n)
}

#[cfg(not(feature = "std"))]
fn plan_for<T: Float>(n: usize) -> Result<Arc<DctPlan<T>>, DctError> {
    Ok(Arc::new(DctPlan::new(n)?))
}

/// DCT-II of `sequence` under `norm`.
///
/// Fails with [`DctError::InvalidInput`] for an empty sequence, a sequence
/// longer than [`MAX_DCT_LEN`], or any NaN/infinite element.
/// Returns [`DctError::Overflow`] when a coefficient leaves the range of `T`.
pub fn forward<T: Float>(sequence: &[T], norm: Normalization) -> Result<Vec<T>, DctError> {
    plan_for::<T>(sequence.len())?.forward(sequence, norm)
}

/// DCT-III of `sequence`, the inverse of [`forward`] under the same `norm`.
pub fn inverse<T: Float>(sequence: &[T], norm: Normalization) -> Result<Vec<T>, DctError> {
    plan_for::<T>(sequence.len())?.inverse(sequence, norm)
}

/// Unnormalized DCT-II.
pub fn dct2<T: Float>(sequence: &[T]) -> Result<Vec<T>, DctError> {
    plan_for::<T>(sequence.len())?.dct2(sequence)
}

/// Unnormalized DCT-III (no `1/N`; `dct3(dct2(x)) == N·x`).
pub fn dct3<T: Float>(sequence: &[T]) -> Result<Vec<T>, DctError> {
    plan_for::<T>(sequence.len())?.dct3(sequence)
}

#[cfg(any(feature = "slow", test))]
/// Naive `O(N²)` cosine sums retained for tests and benchmarking.
pub mod slow {
    use super::*;

    /// `cos(π m / 2N)` with `m` reduced modulo `4N` first.
    fn basis<T: Float>(m: usize, n: usize) -> T {
        let m = m % (4 * n);
        let num = T::from_usize(m).unwrap_or_else(T::zero);
        let den = T::from_usize(2 * n).unwrap_or_else(T::one);
        (T::pi() * num / den).cos()
    }

    pub fn dct2<T: Float>(input: &[T]) -> Vec<T> {
        let n = input.len();
        let two = T::from_f32(2.0);
        (0..n)
            .map(|k| {
                let sum = input.iter().enumerate().fold(T::zero(), |acc, (i, &x)| {
                    acc + x * basis::<T>(k * (2 * i + 1), n)
                });
                two * sum
            })
            .collect()
    }

    pub fn dct3<T: Float>(input: &[T]) -> Vec<T> {
        let n = input.len();
        let two = T::from_f32(2.0);
        (0..n)
            .map(|i| {
                input
                    .iter()
                    .enumerate()
                    .skip(1)
                    .fold(input[0] / two, |acc, (k, &x)| {
                        acc + x * basis::<T>(k * (2 * i + 1), n)
                    })
            })
            .collect()
    }
}


#[cfg(all(feature = "internal-tests", test))]
mod property_tests {
    use super::*;
    use alloc::format;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn seeded_linearity() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in [3usize, 16, 45] {
            let x: Vec<f64> = (0..n).map(|_| rng.gen_range(-100.0..100.0)).collect();
            let y: Vec<f64> = (0..n).map(|_| rng.gen_range(-100.0..100.0)).collect();
            let (a, b): (f64, f64) = (rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));
            let mixed: Vec<f64> = x.iter().zip(y.iter()).map(|(p, q)| a * p + b * q).collect();
            let fx = forward(&x, Normalization::None).unwrap();
            let fy = forward(&y, Normalization::None).unwrap();
            let fm = forward(&mixed, Normalization::None).unwrap();
            for k in 0..n {
                let expected = a * fx[k] + b * fy[k];
                assert!((fm[k] - expected).abs() < 1e-9 * (1.0 + expected.abs()));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_roundtrip(
            signal in proptest::collection::vec(-1.0e6f64..1.0e6, 1..200),
            ortho in any::<bool>(),
        ) {
            let norm = if ortho { Normalization::Ortho } else { Normalization::None };
            let back = inverse(&forward(&signal, norm).unwrap(), norm).unwrap();
            let scale = signal.iter().fold(1.0f64, |m, v| m.max(v.abs()));
            for (a, b) in back.iter().zip(signal.iter()) {
                prop_assert!((a - b).abs() <= 1e-9 * scale, "{} vs {}", a, b);
            }
        }

        #[test]
        fn prop_matches_slow(signal in proptest::collection::vec(-1.0e3f64..1.0e3, 1..64)) {
            let fast = dct2(&signal).unwrap();
            let naive = slow::dct2(&signal);
            let scale = naive.iter().fold(1.0f64, |m, v| m.max(v.abs()));
            for (a, b) in fast.iter().zip(naive.iter()) {
                prop_assert!((a - b).abs() <= 1e-10 * scale);
            }
        }
    }
}
