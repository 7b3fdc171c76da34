//! Times a single forward DCT-II of the ramp `0, 1, ..., N-1`.
//!
//! ```text
//! cargo run --release --example dct_timing -- 8192
//! ```
//!
//! Set `RUST_LOG=debug` together with the `verbose-logging` feature to see
//! plan construction.
use std::error::Error;
use std::time::Instant;

use kodct::{forward, Normalization};

const DEFAULT_LEN: usize = 8192;

/// Short form used for long outputs: first and last three coefficients.
fn summarize(values: &[f64]) -> String {
    if values.len() <= 6 {
        return format!("{:?}", values);
    }
    let head: Vec<String> = values[..3].iter().map(|v| format!("{:e}", v)).collect();
    let tail: Vec<String> = values[values.len() - 3..]
        .iter()
        .map(|v| format!("{:e}", v))
        .collect();
    format!("[{} ... {}]", head.join(" "), tail.join(" "))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let n = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<usize>()?,
        None => DEFAULT_LEN,
    };
    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();

    let start = Instant::now();
    let y = forward(&x, Normalization::None)?;
    let elapsed = start.elapsed();

    log::info!("forward dct-ii of {} samples", n);
    println!("{}", summarize(&y));
    println!("{}s", elapsed.as_secs_f64());
    Ok(())
}
