//! # kodct - Discrete Cosine Transform engine for Rust
//!
//! Type-II DCT (forward) and its Type-III inverse over real sequences, in
//! `O(N log N)` through an in-crate real FFT. Works on `f32` and `f64`,
//! with or without `std`.
//!
//! ```
//! use kodct::{forward, inverse, Normalization};
//!
//! let x = [1.0f64, 1.0, 1.0, 1.0];
//! let y = forward(&x, Normalization::None).unwrap();
//! assert!((y[0] - 8.0).abs() < 1e-12);
//! let back = inverse(&y, Normalization::None).unwrap();
//! assert!((back[3] - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Cargo Features
//!
//! - `std` (default): process-wide plan cache behind [`forward`] / [`inverse`],
//!   and `std::error::Error` impls
//! - `slow`: naive `O(N²)` reference sums in [`dct::slow`]
//! - `verbose-logging`: plan construction and cache events through `log`
//! - `internal-tests`: in-crate property tests (`proptest`, `rand`)
//!
//! ## Normalization
//!
//! | Mode | forward | inverse |
//! |------|---------|---------|
//! | [`Normalization::None`] | unscaled | `1/N` |
//! | [`Normalization::Ortho`] | `1/√(4N)` on bin 0, `1/√(2N)` elsewhere | orthonormal DCT-III |
//! | [`Normalization::Forward`] | `1/(2N)` | `×2` |
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

#[cfg(feature = "verbose-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "verbose-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(feature = "verbose-logging")]
macro_rules! trace_log {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[cfg(not(feature = "verbose-logging"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

/// Scalar trait and complex numbers
pub mod num;

/// Complex Fast Fourier Transform
///
/// Radix-2 for power-of-two lengths, Bluestein for the rest.
pub mod fft;

/// Real-input FFT helpers built on top of the complex FFT
pub mod rfft;

/// Discrete Cosine Transform (DCT)
///
/// DCT-II forward and DCT-III inverse with selectable normalization.
pub mod dct;

/// Process-wide plan cache
#[cfg(feature = "std")]
pub mod cache;

pub use dct::{
    dct2, dct3, forward, inverse, DctError, DctPlan, DctPlanner, InputFault, Normalization,
    MAX_DCT_LEN,
};
pub use num::{Complex, Complex32, Complex64, Float};
