//! Damage and creativity hot paths
//!
//! ```bash
//! cargo bench --bench damage
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use llm_rpg::combat::{CreativityTracker, DamageCalculator, DamageInputs};
use llm_rpg::core::config::GameConfig;
use llm_rpg::entity::item::all_items;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn inputs() -> DamageInputs {
    DamageInputs {
        attack: 25,
        defense: 14,
        feasibility: 0.7,
        potential_damage: 0.6,
        n_new_words_in_action: 4,
        n_overused_words_in_action: 1,
        answer_speed_s: 6.5,
    }
}

fn bench_damage(c: &mut Criterion) {
    let config = GameConfig::default();
    let calculator = DamageCalculator::new(config.damage_calculator);
    let inputs = inputs();
    let items = all_items();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("calculate_damage_no_items", |b| {
        b.iter(|| calculator.calculate_damage(black_box(&inputs), &[], &mut rng))
    });

    c.bench_function("calculate_damage_full_catalog", |b| {
        b.iter(|| calculator.calculate_damage(black_box(&inputs), black_box(&items), &mut rng))
    });
}

fn bench_creativity(c: &mut Criterion) {
    let mut tracker = CreativityTracker::new(3);
    for action in [
        "I throw a rock at the tree",
        "I kick the tree with my left foot",
        "I set the branches on fire",
        "I throw another rock, harder this time",
    ] {
        tracker.add_action(action);
    }
    let action = "I throw a burning branch at the tree and kick its roots";

    c.bench_function("count_new_words", |b| {
        b.iter(|| tracker.count_new_words_in_action(black_box(action)))
    });

    c.bench_function("count_overused_words", |b| {
        b.iter(|| tracker.count_overused_words_in_action(black_box(action)))
    });
}

criterion_group!(benches, bench_damage, bench_creativity);
criterion_main!(benches);
