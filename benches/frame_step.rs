use camp_view::core::Command;
use camp_view::renderer::{trace, Viewport};
use camp_view::scenes::{SceneBuilder, SceneConfig};
use camp_view::{Direction, InputState, LocomotionIntegrator, Session, SlotId};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{EulerRot, Quat, Vec3};

fn camp_session() -> Session {
    let setup = SceneBuilder::build(&SceneConfig::military_camp()).expect("camp scene builds");
    Session::from_setup(setup, 0.002)
}

/// Benchmark: one locomotion step with a diagonal key combination
fn bench_locomotion_step(c: &mut Criterion) {
    let integrator = LocomotionIntegrator::default();
    let mut input = InputState::default();
    input.set(Direction::Forward, true);
    input.set(Direction::Right, true);
    let orientation = Quat::from_euler(EulerRot::YXZ, 0.4, -0.2, 0.0);

    c.bench_function("locomotion_step", |b| {
        let mut position = Vec3::new(0.0, 2.0, 0.0);
        b.iter(|| {
            black_box(integrator.step(black_box(&input), black_box(orientation), &mut position))
        })
    });
}

/// Benchmark: full session frame (locomotion plus orbit update) per slot
fn bench_session_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_frame");

    for slot in SlotId::ALL {
        let mut session = camp_session();
        if let Err(e) = session.select(slot) {
            panic!("{}", e);
        }
        let _ = session.apply(Command::Move(Direction::Forward, true));

        group.bench_with_input(BenchmarkId::new("slot", slot), &slot, |b, _| {
            b.iter(|| {
                session.frame();
                black_box(session.active_camera().position)
            })
        });
    }

    group.finish();
}

/// Benchmark: a single primary ray through the camp
fn bench_trace(c: &mut Criterion) {
    let session = camp_session();
    let camera = *session.active_camera();

    c.bench_function("trace_center_ray", |b| {
        b.iter(|| black_box(trace(session.scene(), black_box(camera.position), black_box(camera.forward()))))
    });
}

/// Benchmark: software viewport at a few resolutions
fn bench_viewport(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport_render");
    group.sample_size(10);

    let session = camp_session();
    for (width, height) in [(160, 120), (320, 240), (400, 300)] {
        let mut viewport = Viewport::new(width, height);
        group.bench_with_input(
            BenchmarkId::new("camp", format!("{}x{}", width, height)),
            &(width, height),
            |b, _| b.iter(|| black_box(viewport.render(session.scene(), session.active_camera()).len())),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_locomotion_step,
    bench_session_frame,
    bench_trace,
    bench_viewport,
);

criterion_main!(benches);
