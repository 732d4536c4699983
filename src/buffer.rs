use crate::symbol::SymbolId;

/// Append-only arena of symbol ids.
///
/// Capacity is tracked explicitly and doubles whenever an append would
/// exceed it. Clearing keeps the backing storage.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    symbols: Vec<SymbolId>,
    capacity: usize,
}

impl Buffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            symbols: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn push(&mut self, symbol: SymbolId) {
        self.reserve(1);
        self.symbols.push(symbol);
    }

    #[inline]
    pub fn extend_from_slice(&mut self, symbols: &[SymbolId]) {
        self.reserve(symbols.len());
        self.symbols.extend_from_slice(symbols);
    }

    #[inline]
    fn reserve(&mut self, additional: usize) {
        let required = self.symbols.len() + additional;
        if required <= self.capacity {
            return;
        }
        let mut capacity = self.capacity.max(1);
        while capacity < required {
            capacity *= 2;
        }
        self.symbols.reserve_exact(capacity - self.symbols.len());
        self.capacity = capacity;
    }

    /// Resets the logical length to zero.
    #[inline]
    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    #[inline]
    pub fn as_slice(&self) -> &[SymbolId] {
        &self.symbols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// One worker's read/write buffer pair.
#[derive(Debug, Clone)]
pub struct Lane {
    read: Buffer,
    write: Buffer,
}

impl Lane {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            read: Buffer::with_capacity(capacity),
            write: Buffer::with_capacity(capacity),
        }
    }

    /// The generation this lane currently holds.
    #[inline]
    pub fn read(&self) -> &[SymbolId] {
        self.read.as_slice()
    }

    /// Buffer the next generation is appended to.
    #[inline]
    pub fn write_mut(&mut self) -> &mut Buffer {
        &mut self.write
    }

    /// Borrows the current generation and the write buffer together.
    #[inline]
    pub fn split(&mut self) -> (&[SymbolId], &mut Buffer) {
        (self.read.as_slice(), &mut self.write)
    }

    /// Promotes the written generation to the read side and empties the
    /// write side for reuse.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.read, &mut self.write);
        self.write.clear();
    }

    /// Restores the single-token axiom state.
    pub fn reset(&mut self, axiom: SymbolId) {
        self.read.clear();
        self.write.clear();
        self.read.push(axiom);
    }

    /// Empties both buffers.
    pub fn clear(&mut self) {
        self.read.clear();
        self.write.clear();
    }

    pub fn read_buffer(&self) -> &Buffer {
        &self.read
    }

    pub fn write_buffer(&self) -> &Buffer {
        &self.write
    }
}

/// A fixed set of lanes reused across generations and runs.
#[derive(Debug, Clone)]
pub struct LanePool {
    lanes: Vec<Lane>,
}

impl LanePool {
    pub fn new(lane_count: usize, capacity: usize) -> Self {
        Self {
            lanes: (0..lane_count.max(1))
                .map(|_| Lane::with_capacity(capacity))
                .collect(),
        }
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn lane(&self, index: usize) -> &Lane {
        &self.lanes[index]
    }

    pub fn lane_mut(&mut self, index: usize) -> &mut Lane {
        &mut self.lanes[index]
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lanes_mut(&mut self) -> &mut [Lane] {
        &mut self.lanes
    }

    /// Puts the axiom in lane 0 and empties every other lane.
    pub fn reset(&mut self, axiom: SymbolId) {
        if let Some((first, rest)) = self.lanes.split_first_mut() {
            first.reset(axiom);
            rest.iter_mut().for_each(Lane::clear);
        }
    }

    /// Splits lane 0's generation evenly by count across all lanes.
    ///
    /// The last lane takes the remainder. Chunks ignore bracket structure,
    /// so the first symbol of a lane loses its real predecessor.
    pub fn distribute(&mut self) {
        let lane_count = self.lanes.len();
        let source = std::mem::take(&mut self.lanes[0].read);
        let chunk = source.len() / lane_count;

        for (i, lane) in self.lanes.iter_mut().enumerate() {
            let from = i * chunk;
            let to = if i == lane_count - 1 {
                source.len()
            } else {
                from + chunk
            };
            lane.write.extend_from_slice(&source.as_slice()[from..to]);
        }

        self.lanes[0].read = source;
        for lane in &mut self.lanes {
            lane.swap();
        }

        tracing::debug!(lanes = lane_count, chunk, "distributed generation across lanes");
    }

    /// Total number of symbols across all lanes.
    pub fn len(&self) -> usize {
        self.lanes.iter().map(|lane| lane.read.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenates every lane's generation in lane order.
    pub fn read_all(&self) -> Vec<SymbolId> {
        let mut all = Vec::with_capacity(self.len());
        for lane in &self.lanes {
            all.extend_from_slice(lane.read());
        }
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYM: SymbolId = SymbolId::Plain(3);

    #[test]
    fn test_capacity_doubles() {
        let mut lane = Lane::with_capacity(2);
        for _ in 0..10 {
            lane.write_mut().push(SYM);
        }
        assert_eq!(lane.write_buffer().capacity(), 16);
        assert_eq!(lane.write_buffer().as_slice(), &[SYM; 10]);

        lane.swap();
        assert_eq!(lane.read(), &[SYM; 10]);
        assert!(lane.write_buffer().is_empty());

        // the old read buffer keeps its storage and grows the same way
        for _ in 0..10 {
            lane.write_mut().push(SYM);
        }
        assert_eq!(lane.write_buffer().capacity(), 16);
        assert_eq!(lane.write_buffer().as_slice(), &[SYM; 10]);
    }

    #[test]
    fn test_extend_grows_in_one_step() {
        let mut buffer = Buffer::with_capacity(4);
        buffer.extend_from_slice(&[SYM; 9]);
        assert_eq!(buffer.capacity(), 16);
        assert_eq!(buffer.len(), 9);
    }

    #[test]
    fn test_swap_retains_storage() {
        let mut lane = Lane::with_capacity(2);
        lane.write_mut().extend_from_slice(&[SYM; 5]);
        lane.swap();
        lane.write_mut().push(SymbolId::Plain(1));
        lane.swap();
        assert_eq!(lane.read(), &[SymbolId::Plain(1)]);
        assert_eq!(lane.write_buffer().capacity(), 8);
        assert!(lane.write_buffer().is_empty());
    }

    #[test]
    fn test_reset_to_axiom() {
        let mut pool = LanePool::new(3, 4);
        pool.lane_mut(1).write_mut().push(SYM);
        pool.lane_mut(1).swap();
        pool.reset(SymbolId::Plain(0));

        assert_eq!(pool.lane(0).read(), &[SymbolId::Plain(0)]);
        assert!(pool.lane(1).read().is_empty());
        assert_eq!(pool.read_all(), vec![SymbolId::Plain(0)]);
    }

    #[test]
    fn test_distribute_even_split_with_remainder() {
        let mut pool = LanePool::new(3, 4);
        let generation: Vec<SymbolId> = (0..8).map(SymbolId::Plain).collect();
        pool.lane_mut(0).write_mut().extend_from_slice(&generation);
        pool.lane_mut(0).swap();

        pool.distribute();

        assert_eq!(pool.lane(0).read().len(), 2);
        assert_eq!(pool.lane(1).read().len(), 2);
        assert_eq!(pool.lane(2).read().len(), 4);
        assert_eq!(pool.read_all(), generation);
        assert!(pool.lanes().iter().all(|lane| lane.write_buffer().is_empty()));
    }

    #[test]
    fn test_distribute_fewer_symbols_than_lanes() {
        let mut pool = LanePool::new(4, 2);
        pool.reset(SymbolId::Plain(9));
        pool.distribute();

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.lane(3).read(), &[SymbolId::Plain(9)]);
        assert_eq!(pool.read_all(), vec![SymbolId::Plain(9)]);
    }
}
