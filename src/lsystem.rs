use crate::buffer::{Lane, LanePool};
use crate::config::RunConfig;
use crate::error::Result;
use crate::grammar::CompiledGrammar;
use crate::rule::RuleSet;
use crate::symbol::SymbolId;
use crate::token::Token;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::Arc;

/// Mutable run state growing generations from a shared compiled grammar.
///
/// The grammar sits behind an [`Arc`] and is only ever read; every lane owns
/// its buffers and its own seeded generator, so lanes never share mutable
/// state while stepping in parallel.
pub struct LSystem {
    grammar: Arc<CompiledGrammar>,
    config: RunConfig,
    pool: LanePool,
    rngs: Vec<StdRng>,
    seed: u64,
    steps: usize,
}

/// Seed for one lane's generator.
#[inline]
pub fn lane_seed(run_seed: u64, lane: usize) -> u64 {
    run_seed.wrapping_add(lane as u64)
}

impl LSystem {
    /// Compiles `rules` and prepares a run growing from `axiom`.
    pub fn new(axiom: &str, rules: &RuleSet, config: RunConfig) -> Result<Self> {
        config.validate()?;
        let grammar = CompiledGrammar::compile(axiom, rules, config.presample)?;
        Self::with_grammar(Arc::new(grammar), config)
    }

    /// Prepares a run over an already compiled grammar.
    ///
    /// `config.presample` has no effect here; sampling tables were fixed when
    /// the grammar was compiled.
    pub fn with_grammar(grammar: Arc<CompiledGrammar>, config: RunConfig) -> Result<Self> {
        config.validate()?;
        let pool = LanePool::new(config.lanes, config.initial_capacity);
        let mut lsystem = Self {
            grammar,
            config,
            pool,
            rngs: Vec::new(),
            seed: 0,
            steps: 0,
        };
        lsystem.reset();
        Ok(lsystem)
    }

    /// A fresh run state sharing this run's compiled grammar and config.
    pub fn fork(&self) -> Self {
        let mut forked = Self {
            grammar: Arc::clone(&self.grammar),
            config: self.config.clone(),
            pool: LanePool::new(self.config.lanes, self.config.initial_capacity),
            rngs: Vec::new(),
            seed: 0,
            steps: 0,
        };
        forked.reset();
        forked
    }

    /// Returns to the single-token axiom and reseeds every lane generator.
    pub fn reset(&mut self) {
        self.seed = self.config.seed.unwrap_or_else(rand::random);
        let seed = self.seed;
        self.rngs = (0..self.pool.lane_count())
            .map(|lane| StdRng::seed_from_u64(lane_seed(seed, lane)))
            .collect();
        self.pool.reset(self.grammar.axiom());
        self.steps = 0;
    }

    /// Rewrites every lane once, one lane after another.
    pub fn step_once(&mut self) {
        let grammar = &*self.grammar;
        for (lane, rng) in self.pool.lanes_mut().iter_mut().zip(&mut self.rngs) {
            step_lane(grammar, lane, rng, 1);
        }
        self.steps += 1;
        tracing::trace!(step = self.steps, len = self.pool.len(), "applied rules once");
    }

    /// Rewrites every lane `n` times in parallel from the current state.
    pub fn iterate(&mut self, n: usize) -> Vec<SymbolId> {
        self.run_parallel(n);
        self.generation()
    }

    /// Resets and grows `n` generations from the axiom.
    ///
    /// Below the configured threshold all steps run on lane 0. At or above
    /// it, lane 0 is primed sequentially, its generation is split across the
    /// lanes, and the remaining steps run in parallel.
    pub fn iterate_until(&mut self, n: usize) -> Vec<SymbolId> {
        self.reset();

        if n >= self.config.parallel_threshold {
            let priming = self.config.priming_steps.min(n);
            for _ in 0..priming {
                self.step_once();
            }
            self.pool.distribute();
            tracing::debug!(
                steps = n,
                priming,
                lanes = self.pool.lane_count(),
                primed_len = self.pool.len(),
                "growing in parallel"
            );
            self.run_parallel(n - priming);
        } else {
            for _ in 0..n {
                self.step_once();
            }
        }

        self.generation()
    }

    fn run_parallel(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let grammar = &*self.grammar;
        self.pool
            .lanes_mut()
            .par_iter_mut()
            .zip(self.rngs.par_iter_mut())
            .for_each(|(lane, rng)| step_lane(grammar, lane, rng, n));
        self.steps += n;
    }

    /// The current generation, lanes concatenated in order.
    pub fn generation(&self) -> Vec<SymbolId> {
        self.pool.read_all()
    }

    /// The current generation as symbol names.
    pub fn names(&self) -> Vec<&Token> {
        self.grammar.alphabet().decode(&self.pool.read_all())
    }

    /// One lane's part of the current generation.
    pub fn lane_generation(&self, lane: usize) -> &[SymbolId] {
        self.pool.lane(lane).read()
    }

    pub(crate) fn lanes(&self) -> &[Lane] {
        self.pool.lanes()
    }

    pub fn lane_count(&self) -> usize {
        self.pool.lane_count()
    }

    /// Number of symbols in the current generation.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Steps applied since the last reset.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Seed the lane generators were derived from at the last reset.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grammar(&self) -> &Arc<CompiledGrammar> {
        &self.grammar
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }
}

fn step_lane(grammar: &CompiledGrammar, lane: &mut Lane, rng: &mut StdRng, steps: usize) {
    for _ in 0..steps {
        let (input, output) = lane.split();
        grammar.rewrite(input, output, rng);
        lane.swap();
    }
}
