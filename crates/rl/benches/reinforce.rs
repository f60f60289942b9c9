use criterion::{criterion_group, criterion_main, Criterion};
use ml::{Graph, TensorStore};
use rl::{CartPole, Policy, TrainConfig, Trainer};

fn bench_policy_act(c: &mut Criterion) {
    let policy = Policy::new(4, 16, 2, &mut fastrand::Rng::with_seed(0));
    let mut rng = fastrand::Rng::with_seed(1);
    let obs: [f32; 4] = [0.01, -0.02, 0.03, 0.04];
    c.bench_function("policy_act", |b| {
        b.iter(|| {
            policy
                .act(&obs, &mut rng, &mut Graph::new(), &mut TensorStore::new())
                .unwrap()
        });
    });
}

fn bench_train_episode(c: &mut Criterion) {
    let config = TrainConfig {
        num_episodes: usize::MAX,
        progress_report_interval: 0,
        solved_threshold: f32::MAX,
        ..TrainConfig::default()
    };
    let mut trainer = Trainer::new(CartPole::new(0), config).unwrap();
    c.bench_function("reinforce_cart_pole_episode", |b| {
        b.iter(|| trainer.run_episode().unwrap());
    });
}

criterion_group!(benches, bench_policy_act, bench_train_episode);
criterion_main!(benches);
