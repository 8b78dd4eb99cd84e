use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use orchard_core::config::Tuning;
use orchard_core::entity::{EntityId, EntityTag};
use orchard_core::event::{CollisionEvent, Contact, ContactPhase, FrameInput, TapEvent};
use orchard_core::level::{LevelLayout, NinjaPlacement, Placement};
use orchard_core::resolver::PlayerStateResolver;
use orchard_core::session::Session;

fn bench_handle_collision(c: &mut Criterion) {
    // Mix of ground churn and harmless enemy contacts keeps the resolver playing
    let events: Vec<CollisionEvent> = (0..64)
        .map(|i| {
            let id = EntityId::new(i % 4);
            match i % 3 {
                0 => CollisionEvent::enter(id, EntityTag::Ground, 1.0, Vec2::ZERO),
                1 => CollisionEvent::exit(id, EntityTag::Ground, Vec2::ZERO),
                _ => CollisionEvent::enter(id, EntityTag::PassiveEnemy, -0.9, Vec2::X),
            }
        })
        .collect();

    c.bench_function("handle_collision", |b| {
        let mut resolver = PlayerStateResolver::new(Tuning::default());
        b.iter(|| {
            for event in &events {
                black_box(resolver.handle_collision(black_box(event)));
            }
        })
    });
}

fn bench_handle_input(c: &mut Criterion) {
    c.bench_function("handle_input", |b| {
        let mut resolver = PlayerStateResolver::new(Tuning::default());
        let mut t = 0.0f32;
        b.iter(|| {
            t += 0.1;
            black_box(resolver.handle_input(TapEvent::began(t, 200.0)));
            black_box(resolver.handle_input(TapEvent::stationary(t, 900.0)));
        })
    });
}

fn bench_session_tick(c: &mut Criterion) {
    // A wide level with many patrolling ninjas
    let layout = LevelLayout {
        player_spawn: Vec2::new(0.0, 1.0),
        entities: vec![Placement::named("ground", EntityTag::Ground, Vec2::ZERO)],
        ninjas: (0..32)
            .map(|i| {
                let x = i as f32 * 10.0;
                NinjaPlacement {
                    name: None,
                    tag: EntityTag::ActiveEnemy,
                    waypoints: vec![Vec2::new(x, 0.0), Vec2::new(x + 5.0, 0.0)],
                    effect: false,
                }
            })
            .collect(),
    };
    let mut session = Session::new(Tuning::default(), layout);
    let ground = session.entity_named("ground").unwrap();
    let frame = FrameInput {
        taps: vec![TapEvent::stationary(0.0, 900.0)],
        contacts: vec![Contact {
            other: ground,
            normal_y: 1.0,
            phase: ContactPhase::Enter,
        }],
        ..FrameInput::default()
    };

    c.bench_function("session_tick_32_ninjas", |b| {
        b.iter(|| {
            session.tick(black_box(1.0 / 60.0), &frame);
        })
    });
}

criterion_group!(benches, bench_handle_collision, bench_handle_input, bench_session_tick);
criterion_main!(benches);
