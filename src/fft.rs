//! Complex Fast Fourier Transform used underneath the cosine transforms.
//!
//! Power-of-two lengths run an iterative radix-2
//! [Cooley–Tukey](https://en.wikipedia.org/wiki/Cooley%E2%80%93Tukey_FFT_algorithm)
//! kernel; every other length goes through
//! [Bluestein's algorithm](https://en.wikipedia.org/wiki/Chirp_Z-transform#Bluestein's_algorithm),
//! which re-expresses the DFT as a power-of-two circular convolution.
//!
//! An [`FftPlan`] owns all length-specific tables and is immutable once
//! built, so a single plan can be shared between threads behind an [`Arc`].
//! [`FftPlanner`] caches plans by length.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;

pub use crate::num::{Complex, Complex32, Complex64, Float};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    /// Zero-length transform requested.
    EmptyInput,
    /// Buffer length differs from the planned length.
    MismatchedLengths,
    /// Length cannot be represented exactly by the scalar type.
    LengthOverflow,
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftError::EmptyInput => write!(f, "transform length must be greater than zero"),
            FftError::MismatchedLengths => write!(f, "buffer length does not match the plan"),
            FftError::LengthOverflow => {
                write!(f, "transform length is not exactly representable")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

/// `num / den` evaluated in `T`, failing when either side is not exact.
pub(crate) fn ratio<T: Float>(num: usize, den: usize) -> Result<T, FftError> {
    let num = T::from_usize(num).ok_or(FftError::LengthOverflow)?;
    let den = T::from_usize(den).ok_or(FftError::LengthOverflow)?;
    Ok(num / den)
}

enum Algorithm<T: Float> {
    Identity,
    Radix2 {
        /// `exp(-2πi k / n)` for `k = 0..n/2`.
        twiddles: Arc<[Complex<T>]>,
    },
    Bluestein {
        /// `exp(-πi k² / n)` for `k = 0..n`.
        chirp: Arc<[Complex<T>]>,
        /// FFT of the conjugate chirp, wrapped to length `inner.len()`.
        kernel: Arc<[Complex<T>]>,
        inner: Arc<FftPlan<T>>,
    },
}

/// Precomputed complex FFT of one fixed length.
pub struct FftPlan<T: Float> {
    n: usize,
    algorithm: Algorithm<T>,
}

impl<T: Float> fmt::Debug for FftPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftPlan")
            .field("len", &self.n)
            .field("bluestein", &self.is_bluestein())
            .finish()
    }
}

impl<T: Float> FftPlan<T> {
    /// Build a plan for length `n`.
    pub fn new(n: usize) -> Result<Self, FftError> {
        let algorithm = match n {
            0 => return Err(FftError::EmptyInput),
            1 => Algorithm::Identity,
            n if n.is_power_of_two() => Algorithm::Radix2 {
                twiddles: radix2_twiddles(n)?,
            },
            n => bluestein(n)?,
        };
        Ok(Self { n, algorithm })
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether this plan falls back to Bluestein's algorithm.
    pub fn is_bluestein(&self) -> bool {
        matches!(self.algorithm, Algorithm::Bluestein { .. })
    }

    /// In-place forward transform (`exp(-2πi kn/N)` kernel, unnormalized).
    pub fn fft(&self, buf: &mut [Complex<T>]) -> Result<(), FftError> {
        if buf.len() != self.n {
            return Err(FftError::MismatchedLengths);
        }
        match &self.algorithm {
            Algorithm::Identity => Ok(()),
            Algorithm::Radix2 { twiddles } => {
                radix2(buf, twiddles);
                Ok(())
            }
            Algorithm::Bluestein {
                chirp,
                kernel,
                inner,
            } => {
                let mut work = vec![Complex::zero(); inner.len()];
                for ((w, &x), &c) in work.iter_mut().zip(buf.iter()).zip(chirp.iter()) {
                    *w = x.mul(c);
                }
                inner.fft(&mut work)?;
                for (w, &k) in work.iter_mut().zip(kernel.iter()) {
                    *w = w.mul(k);
                }
                inner.ifft(&mut work)?;
                for ((out, &w), &c) in buf.iter_mut().zip(work.iter()).zip(chirp.iter()) {
                    *out = w.mul(c);
                }
                Ok(())
            }
        }
    }

    /// In-place inverse transform, scaled by `1/N`.
    pub fn ifft(&self, buf: &mut [Complex<T>]) -> Result<(), FftError> {
        if buf.len() != self.n {
            return Err(FftError::MismatchedLengths);
        }
        for c in buf.iter_mut() {
            *c = c.conj();
        }
        self.fft(buf)?;
        let scale = T::one() / T::from_usize(self.n).ok_or(FftError::LengthOverflow)?;
        for c in buf.iter_mut() {
            *c = c.conj().scale(scale);
        }
        Ok(())
    }

    /// Out-of-place forward transform into a fresh vector.
    pub fn fft_vec(&self, input: &[Complex<T>]) -> Result<Vec<Complex<T>>, FftError> {
        let mut out = input.to_vec();
        self.fft(&mut out)?;
        Ok(out)
    }

    /// Out-of-place inverse transform into a fresh vector.
    pub fn ifft_vec(&self, input: &[Complex<T>]) -> Result<Vec<Complex<T>>, FftError> {
        let mut out = input.to_vec();
        self.ifft(&mut out)?;
        Ok(out)
    }
}

fn radix2_twiddles<T: Float>(n: usize) -> Result<Arc<[Complex<T>]>, FftError> {
    let two_pi = T::from_f32(2.0) * T::pi();
    let mut table = Vec::with_capacity(n / 2);
    for k in 0..n / 2 {
        table.push(Complex::expi(-two_pi * ratio::<T>(k, n)?));
    }
    Ok(Arc::from(table))
}

fn bluestein<T: Float>(n: usize) -> Result<Algorithm<T>, FftError> {
    let m = (2 * n - 1).next_power_of_two();
    let inner = Arc::new(FftPlan::new(m)?);
    let modulus = 2 * n as u128;
    let mut chirp = Vec::with_capacity(n);
    let mut kernel = vec![Complex::zero(); m];
    for k in 0..n {
        // exp(-πi k²/n) has period 2n in k².
        let k2 = ((k as u128 * k as u128) % modulus) as usize;
        let w = Complex::expi(-T::pi() * ratio::<T>(k2, n)?);
        chirp.push(w);
        kernel[k] = w.conj();
        if k != 0 {
            kernel[m - k] = w.conj();
        }
    }
    inner.fft(&mut kernel)?;
    Ok(Algorithm::Bluestein {
        chirp: Arc::from(chirp),
        kernel: Arc::from(kernel),
        inner,
    })
}

fn radix2<T: Float>(buf: &mut [Complex<T>], twiddles: &[Complex<T>]) {
    let n = buf.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            buf.swap(i, j);
        }
    }
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let stride = n / len;
        for block in buf.chunks_exact_mut(len) {
            let (lo, hi) = block.split_at_mut(half);
            for (k, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
                let t = b.mul(twiddles[k * stride]);
                let u = *a;
                *a = u.add(t);
                *b = u.sub(t);
            }
        }
        len <<= 1;
    }
}

/// Cache of [`FftPlan`]s keyed by length.
pub struct FftPlanner<T: Float> {
    cache: HashMap<usize, Arc<FftPlan<T>>>,
}

impl<T: Float> Default for FftPlanner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> FftPlanner<T> {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Fetch the plan for `n`, building it on first use.
    pub fn plan_fft(&mut self, n: usize) -> Result<Arc<FftPlan<T>>, FftError> {
        if let Some(plan) = self.cache.get(&n) {
            return Ok(Arc::clone(plan));
        }
        let plan = Arc::new(FftPlan::new(n)?);
        debug_log!("fft plan built: n={} bluestein={}", n, plan.is_bluestein());
        self.cache.insert(n, Arc::clone(&plan));
        Ok(plan)
    }

    pub fn cached_lengths(&self) -> usize {
        self.cache.len()
    }
}

/// One-shot forward FFT that builds a throwaway plan.
pub fn fft<T: Float>(buf: &mut [Complex<T>]) -> Result<(), FftError> {
    FftPlan::new(buf.len())?.fft(buf)
}

/// One-shot inverse FFT that builds a throwaway plan.
pub fn ifft<T: Float>(buf: &mut [Complex<T>]) -> Result<(), FftError> {
    FftPlan::new(buf.len())?.ifft(buf)
}
