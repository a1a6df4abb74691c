use criterion::{Criterion, black_box, criterion_group, criterion_main};

use turngate_core::config::ReleaseCfg;
use turngate_core::model::PredictionModel;
use turngate_core::predictor::ReleasePredictor;

pub fn bench_time_to_release(c: &mut Criterion) {
    let mut g = c.benchmark_group("time_to_release");
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p turngate_core --bench predictor
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(1));
        }
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }

    let predictor = ReleasePredictor::new(PredictionModel::reference(), ReleaseCfg::default());

    // Fast spin iterates many projections per call; slow spin returns after
    // one. Both paths matter: the prediction runs inside a tick budget.
    for &(label, turn_us) in &[
        ("fast_100ms", 100_000u64),
        ("medium_600ms", 600_000),
        ("slow_3s", 3_000_000),
    ] {
        g.bench_function(label, |b| {
            b.iter(|| {
                let w = predictor.time_to_release(black_box(turn_us), black_box(25_000));
                let _ = black_box(w);
            })
        });
    }

    g.bench_function("projection_only", |b| {
        let model = PredictionModel::reference();
        b.iter(|| black_box(model.project(black_box(600_000))))
    });

    g.finish();
}

criterion_group!(predictor, bench_time_to_release);
criterion_main!(predictor);
