//! # lsystem-rs - Stochastic, Context-Sensitive L-System Engine
//!
//! Grows symbol sequences by repeatedly rewriting every symbol of a
//! generation with a weighted-random successor sequence, starting from a
//! single axiom symbol.
//!
//! Rules support:
//! 1. **Weighted alternatives**: each successor is drawn proportionally to its
//!    weight among the eligible alternatives
//! 2. **Catalysts**: an alternative can require a specific symbol to precede
//!    the rewritten one; a matching catalyst adds its alternatives to the
//!    unconditional ones
//! 3. **Counter variables**: `S3` steps down to `S2`, `S1` across generations,
//!    so one rule written for `S1` ends a whole countdown
//!
//! ## Example
//!
//! ```
//! use lsystem_rs::{parse_rules, LSystem, RunConfig};
//!
//! let rules = parse_rules([
//!     ("Seed", "1 L u S3"),
//!     ("S1", "1 X"),
//! ]).unwrap();
//!
//! let config = RunConfig::new().with_lanes(1).with_seed(7);
//! let mut ls = LSystem::new("Seed", &rules, config).unwrap();
//! ls.iterate_until(3);
//!
//! let names: Vec<&str> = ls.iter_names().map(|t| t.as_str()).collect();
//! assert_eq!(names, ["L", "u", "X"]);
//! ```
//!
//! ## Performance
//!
//! - O(1) rule dispatch through a flat table indexed by symbol slot
//! - Double-buffered lanes reuse their storage across generations
//! - Long runs are primed on one lane, then split across lanes stepped in
//!   parallel with rayon, each lane drawing from its own seeded generator

mod alphabet;
mod buffer;
mod config;
mod error;
mod grammar;
mod iter;
mod lsystem;
mod parse;
mod rule;
mod sampler;
mod symbol;
mod token;


pub use alphabet::Alphabet;
pub use buffer::{Buffer, Lane, LanePool};
pub use config::{
    RunConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_PRIMING_STEPS,
};
pub use error::{LSystemError, Result};
pub use grammar::{CompiledAlternative, CompiledGrammar, CompiledRule};
pub use iter::GenerationIter;
pub use lsystem::{lane_seed, LSystem};
pub use parse::{parse_alternatives, parse_rules, parse_state};
pub use rule::{ProductionRule, RuleSet, WeightedAlternative};
pub use sampler::{WeightedSampler, PRESAMPLE_RESOLUTION};
pub use symbol::SymbolId;
pub use token::{Token, MAX_COUNTER_LEVEL};
