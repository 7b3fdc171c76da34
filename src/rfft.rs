//! Real FFT (RFFT) built on top of the complex FFT in [`crate::fft`].
//!
//! For even lengths the `N` real samples are packed into `N/2` complex
//! samples, transformed with a half-length complex FFT, and split back
//! into the `N/2 + 1` non-redundant bins with the pack twiddles
//! `exp(-2πi k / N)`. Odd lengths run a full-length complex FFT.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use crate::fft::{ratio, Complex, FftError, FftPlan};
use crate::num::Float;

/// Scalar used for halving values during the split step.
pub const HALF: f32 = 0.5;

enum Layout<T: Float> {
    Packed {
        half: Arc<FftPlan<T>>,
        /// `exp(-2πi k / N)` for `k = 0..N/2`.
        pack_twiddles: Arc<[Complex<T>]>,
    },
    Full(Arc<FftPlan<T>>),
}

/// Precomputed real-input FFT of one fixed length.
pub struct RealFftPlan<T: Float> {
    n: usize,
    layout: Layout<T>,
}

impl<T: Float> RealFftPlan<T> {
    pub fn new(n: usize) -> Result<Self, FftError> {
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        let layout = if n % 2 == 0 {
            let h = n / 2;
            let two_pi = T::from_f32(2.0) * T::pi();
            let mut table = Vec::with_capacity(h);
            for k in 0..h {
                table.push(Complex::expi(-two_pi * ratio::<T>(k, n)?));
            }
            Layout::Packed {
                half: Arc::new(FftPlan::new(h)?),
                pack_twiddles: Arc::from(table),
            }
        } else {
            Layout::Full(Arc::new(FftPlan::new(n)?))
        };
        Ok(Self { n, layout })
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Number of bins produced by [`rfft`](Self::rfft).
    pub fn spectrum_len(&self) -> usize {
        self.n / 2 + 1
    }

    /// Forward transform of `input` (length `N`) into `output` (length `N/2 + 1`).
    pub fn rfft(&self, input: &[T], output: &mut [Complex<T>]) -> Result<(), FftError> {
        if input.len() != self.n || output.len() != self.spectrum_len() {
            return Err(FftError::MismatchedLengths);
        }
        match &self.layout {
            Layout::Full(plan) => {
                let mut buf: Vec<Complex<T>> =
                    input.iter().map(|&x| Complex::new(x, T::zero())).collect();
                plan.fft(&mut buf)?;
                output.copy_from_slice(&buf[..output.len()]);
            }
            Layout::Packed {
                half,
                pack_twiddles,
            } => {
                let h = half.len();
                let mut z: Vec<Complex<T>> = input
                    .chunks_exact(2)
                    .map(|pair| Complex::new(pair[0], pair[1]))
                    .collect();
                half.fft(&mut z)?;
                let half_scale = T::from_f32(HALF);
                for (k, out) in output.iter_mut().enumerate() {
                    let zk = z[k % h];
                    let zr = z[(h - k % h) % h].conj();
                    let even = zk.add(zr).scale(half_scale);
                    let odd = zk.sub(zr).mul_neg_i().scale(half_scale);
                    let w = if k == h {
                        Complex::new(-T::one(), T::zero())
                    } else {
                        pack_twiddles[k]
                    };
                    *out = even.add(w.mul(odd));
                }
            }
        }
        Ok(())
    }

    /// Inverse of [`rfft`](Self::rfft), scaled by `1/N`.
    ///
    /// Imaginary parts that a real signal cannot produce (bin 0, and bin
    /// `N/2` for even `N`) are ignored.
    pub fn irfft(&self, input: &[Complex<T>], output: &mut [T]) -> Result<(), FftError> {
        if input.len() != self.spectrum_len() || output.len() != self.n {
            return Err(FftError::MismatchedLengths);
        }
        match &self.layout {
            Layout::Full(plan) => {
                let n = self.n;
                let mut buf = vec![Complex::zero(); n];
                buf[..input.len()].copy_from_slice(input);
                buf[0].im = T::zero();
                for k in input.len()..n {
                    buf[k] = input[n - k].conj();
                }
                plan.ifft(&mut buf)?;
                for (out, c) in output.iter_mut().zip(buf.iter()) {
                    *out = c.re;
                }
            }
            Layout::Packed {
                half,
                pack_twiddles,
            } => {
                let h = half.len();
                let half_scale = T::from_f32(HALF);
                let mut z = Vec::with_capacity(h);
                for k in 0..h {
                    let mut xk = input[k];
                    let mut xr = input[h - k];
                    if k == 0 {
                        xk.im = T::zero();
                        xr.im = T::zero();
                    }
                    let xr = xr.conj();
                    let even = xk.add(xr).scale(half_scale);
                    let odd = xk.sub(xr).mul(pack_twiddles[k].conj()).scale(half_scale);
                    z.push(even.add(odd.mul_i()));
                }
                half.ifft(&mut z)?;
                for (pair, c) in output.chunks_exact_mut(2).zip(z.iter()) {
                    pair[0] = c.re;
                    pair[1] = c.im;
                }
            }
        }
        Ok(())
    }

    /// Forward transform into a fresh vector.
    pub fn rfft_vec(&self, input: &[T]) -> Result<Vec<Complex<T>>, FftError> {
        let mut out = vec![Complex::zero(); self.spectrum_len()];
        self.rfft(input, &mut out)?;
        Ok(out)
    }

    /// Inverse transform into a fresh vector.
    pub fn irfft_vec(&self, input: &[Complex<T>]) -> Result<Vec<T>, FftError> {
        let mut out = vec![T::zero(); self.n];
        self.irfft(input, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::Complex64;

    fn signal(n: usize) -> Vec<f64> {
        (0..n).map(|i| (i as f64 * 0.71).sin() * 3.0 + i as f64 * 0.1).collect()
    }

    #[test]
    fn matches_complex_fft_even_and_odd() {
        for &n in &[1usize, 2, 3, 4, 6, 9, 10, 16, 21] {
            let input = signal(n);
            let plan = RealFftPlan::<f64>::new(n).unwrap();
            let got = plan.rfft_vec(&input).unwrap();
            let full: Vec<Complex64> = input.iter().map(|&x| Complex64::new(x, 0.0)).collect();
            let expected = FftPlan::<f64>::new(n).unwrap().fft_vec(&full).unwrap();
            assert_eq!(got.len(), n / 2 + 1);
            for (a, b) in got.iter().zip(expected.iter()) {
                assert!((a.re - b.re).abs() < 1e-9, "n={} re {} vs {}", n, a.re, b.re);
                assert!((a.im - b.im).abs() < 1e-9, "n={} im {} vs {}", n, a.im, b.im);
            }
        }
    }

    #[test]
    fn irfft_recovers_signal() {
        for &n in &[1usize, 2, 5, 8, 14, 15] {
            let input = signal(n);
            let plan = RealFftPlan::<f64>::new(n).unwrap();
            let back = plan.irfft_vec(&plan.rfft_vec(&input).unwrap()).unwrap();
            for (a, b) in back.iter().zip(input.iter()) {
                assert!((a - b).abs() < 1e-12, "n={} {} vs {}", n, a, b);
            }
        }
    }

    #[test]
    fn rejects_bad_buffers() {
        assert!(matches!(RealFftPlan::<f32>::new(0), Err(FftError::EmptyInput)));
        let plan = RealFftPlan::<f32>::new(8).unwrap();
        let mut freq = vec![Complex::zero(); 4];
        assert_eq!(
            plan.rfft(&[0.0; 8], &mut freq),
            Err(FftError::MismatchedLengths)
        );
        let mut out = vec![0.0f32; 7];
        assert_eq!(
            plan.irfft(&[Complex::zero(); 5], &mut out),
            Err(FftError::MismatchedLengths)
        );
    }
}
