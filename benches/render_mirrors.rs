use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use miniray::{
    RenderSettings,
    geometry::ScreenSize,
    render,
    scene::presets::{mirrored_spheres, mirrored_spheres_camera},
};

fn criterion_benchmark(c: &mut Criterion) {
    let scene = mirrored_spheres().unwrap();
    let camera = mirrored_spheres_camera(ScreenSize::new(500, 500)).unwrap();
    let settings = RenderSettings::default();

    c.bench_function("render_mirrors", |b| {
        b.iter_batched(
            || scene.clone(),
            |scene| {
                let mut render_progress =
                    render(scene, camera, settings, |_| {}, |_, _| {}).unwrap();
                render_progress.wait().unwrap();
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(30));
    targets = criterion_benchmark
}
criterion_main!(benches);
