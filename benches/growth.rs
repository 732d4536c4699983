use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lsystem_rs::{parse_rules, CompiledGrammar, LSystem, RuleSet, RunConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Branching plant grammar with a counter countdown and rare branch events
fn plant_rules() -> RuleSet {
    parse_rules([
        ("Seed", "1 L u S2"),
        (
            "L",
            "0.1 L u L w F e; 0.1 L_ u L e F w; 0.04 L_ [ w L_ w u seed ]; \
             0.04 L_ [ e L_ e u seed ]; 0.05 L_ u L; 1 L",
        ),
        ("S2", "1 [ n F ] [ w F ] u n S1; 1 [ s F ] [ e F ] u w S1"),
        ("S1", "1 [ n F ] [ s F ] u n S0; 1 [ w F ] [ e F ] u e S0"),
        ("S0", "1 [ n F ] n S0; 1 [ w F ] w S0; 1 [ s F ] s S0; 1 [ e F ] e S0"),
        ("F", "0.005 F [ d D ]; 0.001 F [ u F_ ]; 0.2 *F F; 1 F"),
    ])
    .unwrap()
}

fn bench_iterate_until(c: &mut Criterion) {
    let rules = plant_rules();
    let mut group = c.benchmark_group("iterate_until");

    for steps in [10usize, 50, 100] {
        for lanes in [1usize, 4] {
            let config = RunConfig::new().with_lanes(lanes).with_seed(17);
            let mut ls = LSystem::new("Seed", &rules, config).unwrap();

            group.bench_with_input(
                BenchmarkId::new(format!("lanes_{lanes}"), steps),
                &steps,
                |b, &steps| {
                    b.iter(|| black_box(ls.iterate_until(black_box(steps)).len()));
                },
            );
        }
    }

    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let rules = plant_rules();
    let mut group = c.benchmark_group("choose");

    for presample in [false, true] {
        let grammar = Arc::new(CompiledGrammar::compile("Seed", &rules, presample).unwrap());
        let l = grammar.alphabet().id("L").unwrap();
        let sentinel = grammar.alphabet().sentinel();
        let rule = grammar.rule(l).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let label = if presample { "presampled" } else { "cumulative" };
        group.bench_function(label, |b| {
            b.iter(|| black_box(rule.choose(black_box(sentinel), &mut rng).map(<[_]>::len)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_iterate_until, bench_sampling);
criterion_main!(benches);
