use lsystem_rs::{parse_rules, LSystem, RunConfig};
use std::collections::BTreeMap;
use std::env;

/// Grows a branching plant and prints symbol statistics.
///
/// Usage: cargo run --example grow [steps] [seed]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let steps: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(40);
    let seed: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1);

    let rules = match parse_rules([
        ("Seed", "1 L u S2"),
        (
            "L",
            "0.1 L u L w F e; 0.1 L_ u L e F w; 0.1 L_ u L n F s; 0.1 L_ u L s F n; \
             0.04 L_ [ w L_ w u seed ]; 0.04 L_ [ e L_ e u seed ]; 0.05 L_ u L; 1 L",
        ),
        ("S2", "1 [ n F ] [ w F ] [ s F ] [ e F ] u n S1"),
        ("S1", "1 [ n F ] [ w F ] [ s F ] [ e F ] u e S0"),
        ("S0", "1 [ n F ] n S0; 1 [ w F ] w S0; 1 [ s F ] s S0; 1 [ e F ] e S0"),
        ("F", "0.005 F [ d D ]; 0.001 F [ u F_ ]; 0.0O8 F [ n F_ ]; 1 F"),
    ]) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("invalid grammar: {e}");
            std::process::exit(1);
        }
    };

    let config = RunConfig::new().with_seed(seed);
    let mut ls = match LSystem::new("Seed", &rules, config) {
        Ok(ls) => ls,
        Err(e) => {
            eprintln!("cannot compile grammar: {e}");
            std::process::exit(1);
        }
    };

    println!("=== Grammar ===");
    print!("{}", ls.grammar());

    ls.iterate_until(steps);

    println!("\n=== Generation {} ===", ls.steps());
    println!("Lanes: {}", ls.lane_count());
    println!("Seed: {}", ls.seed());
    println!("Symbols: {}", ls.len());

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for name in ls.iter_names() {
        *counts.entry(name.as_str()).or_default() += 1;
    }
    println!("\n=== Symbol counts ===");
    for (name, count) in &counts {
        println!("{name:>6}: {count}");
    }

    let preview: Vec<&str> = ls.iter_names().take(60).map(|t| t.as_str()).collect();
    println!("\nFirst symbols: {}", preview.join(" "));
}
