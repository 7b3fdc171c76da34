use std::sync::Arc;
use std::thread;

use kodct::{forward, inverse, DctPlan, Normalization};

/// Free functions can run concurrently on disjoint inputs through the shared cache
#[test]
fn parallel_free_functions() {
    let handles: Vec<_> = (0..8usize)
        .map(|t| {
            thread::spawn(move || {
                let n = 64 + (t % 3) * 17;
                let x: Vec<f64> = (0..n).map(|i| (i * (t + 1)) as f64 * 0.01).collect();
                for _ in 0..20 {
                    let y = forward(&x, Normalization::Ortho).unwrap();
                    let back = inverse(&y, Normalization::Ortho).unwrap();
                    for (a, b) in back.iter().zip(x.iter()) {
                        assert!((a - b).abs() < 1e-9);
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

/// A single plan is shareable across threads
#[test]
fn shared_plan_across_threads() {
    let plan = Arc::new(DctPlan::<f32>::new(30).unwrap());
    let expected = plan.forward(&[1.0; 30], Normalization::None).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let plan = Arc::clone(&plan);
            let expected = expected.clone();
            thread::spawn(move || {
                let got = plan.forward(&[1.0; 30], Normalization::None).unwrap();
                assert_eq!(got, expected);
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}
