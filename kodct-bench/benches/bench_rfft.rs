use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kodct::rfft::RealFftPlan;
use kodct::Complex64;
use realfft::RealFftPlanner as RustRealFftPlanner;

fn bench_rfft(c: &mut Criterion) {
    let mut group = c.benchmark_group("rfft_parity");
    for &size in &[1000usize, 1024, 4096, 8192] {
        let input: Vec<f64> = (0..size).map(|i| i as f64).collect();
        let plan = RealFftPlan::<f64>::new(size).unwrap();
        let mut output = vec![Complex64::zero(); plan.spectrum_len()];
        group.bench_function(BenchmarkId::new("kodct", size), |b| {
            b.iter(|| {
                plan.rfft(&input, &mut output).unwrap();
            })
        });

        let mut planner = RustRealFftPlanner::<f64>::new();
        let rfft = planner.plan_fft_forward(size);
        let mut in_data = input.clone();
        let mut out_data = rfft.make_output_vec();
        group.bench_function(BenchmarkId::new("realfft", size), |b| {
            b.iter(|| {
                in_data.copy_from_slice(&input);
                rfft.process(&mut in_data, &mut out_data).unwrap();
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rfft);
criterion_main!(benches);
