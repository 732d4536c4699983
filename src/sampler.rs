use rand::Rng;

/// Number of entries in a presampled table.
pub const PRESAMPLE_RESOLUTION: usize = 1024;

/// Precomputed weight-proportional draw over a pool of alternatives.
///
/// Entries are indices into the owning rule's alternative list.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightedSampler {
    /// Nothing to draw: the pool is empty or carries no weight.
    Empty,

    /// Exactly one eligible entry; chosen without a draw.
    Single(u32),

    /// Running weight totals; a draw picks the first total above `u * total`.
    Cumulative {
        entries: Vec<u32>,
        cumulative: Vec<f64>,
    },

    /// Entries repeated proportionally to weight; a draw is a uniform index.
    Presampled(Vec<u32>),
}

impl WeightedSampler {
    /// Builds a sampler over `(entry, weight)` pairs.
    ///
    /// Only finite positive weights are kept. When their sum overflows `f64`
    /// they are rescaled by the largest weight, which keeps the proportions.
    pub fn new<I>(pool: I, presample: bool) -> Self
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut pool: Vec<(u32, f64)> = pool
            .into_iter()
            .filter(|&(_, w)| w.is_finite() && w > 0.0)
            .collect();

        if !pool.iter().map(|&(_, w)| w).sum::<f64>().is_finite() {
            let max = pool.iter().map(|&(_, w)| w).fold(0.0, f64::max);
            pool.iter_mut().for_each(|(_, w)| *w /= max);
        }

        match pool.as_slice() {
            [] => WeightedSampler::Empty,
            [(entry, _)] => WeightedSampler::Single(*entry),
            _ if presample => Self::presampled(&pool),
            _ => Self::cumulative(&pool),
        }
    }

    fn cumulative(pool: &[(u32, f64)]) -> Self {
        let mut total = 0.0;
        let mut entries = Vec::with_capacity(pool.len());
        let mut cumulative = Vec::with_capacity(pool.len());
        for &(entry, weight) in pool {
            total += weight;
            entries.push(entry);
            cumulative.push(total);
        }
        WeightedSampler::Cumulative {
            entries,
            cumulative,
        }
    }

    fn presampled(pool: &[(u32, f64)]) -> Self {
        let total: f64 = pool.iter().map(|&(_, w)| w).sum();
        let mut table = Vec::with_capacity(PRESAMPLE_RESOLUTION);
        for &(entry, weight) in pool {
            let copies = (weight / total * PRESAMPLE_RESOLUTION as f64).round() as usize;
            table.extend(std::iter::repeat(entry).take(copies));
        }

        if table.is_empty() {
            return Self::cumulative(pool);
        }
        WeightedSampler::Presampled(table)
    }

    /// Sum of all weights in the pool (table size for presampled pools).
    pub fn total(&self) -> f64 {
        match self {
            WeightedSampler::Empty => 0.0,
            WeightedSampler::Single(_) => 1.0,
            WeightedSampler::Cumulative { cumulative, .. } => {
                cumulative.last().copied().unwrap_or(0.0)
            }
            WeightedSampler::Presampled(table) => table.len() as f64,
        }
    }

    /// Draws one entry. `Empty` and `Single` consume no randomness.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u32> {
        match self {
            WeightedSampler::Empty => None,
            WeightedSampler::Single(entry) => Some(*entry),
            WeightedSampler::Cumulative {
                entries,
                cumulative,
            } => {
                let total = cumulative.last().copied()?;
                let draw = rng.gen::<f64>() * total;
                let index = cumulative.partition_point(|&c| c <= draw);
                entries.get(index.min(entries.len() - 1)).copied()
            }
            WeightedSampler::Presampled(table) => {
                let index = rng.gen_range(0..table.len());
                table.get(index).copied()
            }
        }
    }
}
