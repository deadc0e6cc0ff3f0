use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mimic::{Algorithm, BezierCurve, MovementOptions, Point, TrajectoryGenerator};

fn control_points(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let f = i as f64;
            Point::new(f * 40.0, (f * 0.7).sin() * 300.0 + 540.0)
        })
        .collect()
}

fn bench_bezier_evaluate(c: &mut Criterion) {
    for n in [4, 20, 50] {
        let curve = BezierCurve::new(control_points(n)).expect("curve");
        c.bench_function(&format!("bezier_sequential_{}", n), |b| {
            b.iter(|| black_box(curve.evaluate_sequential(black_box(0.37))))
        });
        c.bench_function(&format!("bezier_parallel_{}", n), |b| {
            b.iter(|| black_box(curve.evaluate_parallel(black_box(0.37))))
        });
    }
}

fn bench_generate_movement(c: &mut Criterion) {
    let opts = MovementOptions::new(Point::new(0.0, 0.0), Point::new(1920.0, 1080.0))
        .with_noise_level(1.0)
        .with_control_points(20);

    for algorithm in [Algorithm::Bezier, Algorithm::Perlin] {
        let mut generator = TrajectoryGenerator::with_seed(algorithm, 1);
        c.bench_function(&format!("generate_movement_{}", algorithm), |b| {
            b.iter(|| {
                let movement = generator.generate_movement(black_box(&opts)).expect("movement");
                black_box(movement.len());
            })
        });
    }
}

criterion_group!(benches, bench_bezier_evaluate, bench_generate_movement);
criterion_main!(benches);
