use crate::error::{LSystemError, Result};

/// Default initial capacity of every lane buffer.
pub const DEFAULT_INITIAL_CAPACITY: usize = 32;
/// Step count at which `iterate_until` switches to primed-parallel growth.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 15;
/// Sequential steps run on lane 0 before the generation is distributed.
pub const DEFAULT_PRIMING_STEPS: usize = 10;

/// Options for one [`LSystem`](crate::LSystem) run state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of worker lanes used by parallel stepping.
    pub lanes: usize,
    /// Initial capacity of each lane buffer.
    pub initial_capacity: usize,
    /// Requested step counts at or above this use primed-parallel growth.
    pub parallel_threshold: usize,
    /// Sequential steps taken before distributing across lanes.
    pub priming_steps: usize,
    /// Compile rules with presampled tables instead of cumulative weights.
    pub presample: bool,
    /// Run seed; lane `i` draws from a generator seeded with `seed + i`.
    /// `None` picks a fresh seed on every reset.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            lanes: rayon::current_num_threads(),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            priming_steps: DEFAULT_PRIMING_STEPS,
            presample: false,
            seed: None,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lanes(mut self, lanes: usize) -> Self {
        self.lanes = lanes;
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_priming_steps(mut self, steps: usize) -> Self {
        self.priming_steps = steps;
        self
    }

    pub fn with_presample(mut self, presample: bool) -> Self {
        self.presample = presample;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.lanes == 0 {
            return Err(LSystemError::InvalidConfig("lane count must be at least 1".into()));
        }
        if self.initial_capacity == 0 {
            return Err(LSystemError::InvalidConfig(
                "initial buffer capacity must be at least 1".into(),
            ));
        }
        if self.priming_steps > self.parallel_threshold {
            return Err(LSystemError::InvalidConfig(format!(
                "priming steps ({}) exceed the parallel threshold ({})",
                self.priming_steps, self.parallel_threshold
            )));
        }
        Ok(())
    }
}
