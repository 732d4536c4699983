use crate::buffer::Lane;
use crate::lsystem::LSystem;
use crate::symbol::SymbolId;
use crate::token::Token;

/// Iterator over the current generation, walking lanes in order without
/// concatenating them.
pub struct GenerationIter<'a> {
    lanes: &'a [Lane],
    lane: usize,
    position: usize,
}

impl<'a> GenerationIter<'a> {
    pub(crate) fn new(lanes: &'a [Lane]) -> Self {
        Self {
            lanes,
            lane: 0,
            position: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.lanes
            .iter()
            .skip(self.lane)
            .map(|lane| lane.read().len())
            .sum::<usize>()
            .saturating_sub(self.position)
    }
}

impl<'a> Iterator for GenerationIter<'a> {
    type Item = SymbolId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let lane = self.lanes.get(self.lane)?;
            if let Some(&symbol) = lane.read().get(self.position) {
                self.position += 1;
                return Some(symbol);
            }
            // End of this lane, continue with the next one
            self.lane += 1;
            self.position = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GenerationIter<'_> {}

impl LSystem {
    /// Returns an iterator over the ids of the current generation.
    pub fn iter(&self) -> GenerationIter<'_> {
        GenerationIter::new(self.lanes())
    }

    /// Returns an iterator over the names of the current generation.
    pub fn iter_names(&self) -> impl Iterator<Item = &Token> + '_ {
        let alphabet = self.grammar().alphabet();
        let sentinel = alphabet.sentinel();
        self.iter().filter_map(move |id| {
            alphabet.name(id).or_else(|| alphabet.name(sentinel))
        })
    }
}

impl<'a> IntoIterator for &'a LSystem {
    type Item = SymbolId;
    type IntoIter = GenerationIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RunConfig;
    use crate::lsystem::LSystem;
    use crate::parse::parse_rules;
    use crate::symbol::SymbolId;

    fn grown(lanes: usize) -> LSystem {
        let rules = parse_rules([("A", "1 A B; 1 B A"), ("B", "1 B; 1 A")]).unwrap();
        let config = RunConfig::new()
            .with_lanes(lanes)
            .with_parallel_threshold(3)
            .with_priming_steps(3)
            .with_seed(11);
        let mut ls = LSystem::new("A", &rules, config).unwrap();
        ls.iterate_until(7);
        ls
    }

    #[test]
    fn test_iter_axiom() {
        let rules = parse_rules([("A", "1 A B")]).unwrap();
        let ls = LSystem::new("A", &rules, RunConfig::new().with_seed(0)).unwrap();
        let collected: Vec<SymbolId> = ls.iter().collect();
        assert_eq!(collected, vec![ls.grammar().axiom()]);
    }

    #[test]
    fn test_iter_matches_concatenated_lanes() {
        let ls = grown(3);
        let collected: Vec<SymbolId> = ls.iter().collect();
        assert_eq!(collected, ls.generation());
        assert_eq!(ls.iter().len(), ls.len());
    }

    #[test]
    fn test_iter_skips_empty_lanes() {
        // more lanes than primed symbols leaves leading lanes empty
        let rules = parse_rules([("A", "1 A B")]).unwrap();
        let config = RunConfig::new()
            .with_lanes(8)
            .with_parallel_threshold(2)
            .with_priming_steps(1)
            .with_seed(0);
        let mut ls = LSystem::new("A", &rules, config).unwrap();
        let generation = ls.iterate_until(3);
        assert!(ls.lane_generation(0).is_empty());
        assert_eq!(ls.iter().collect::<Vec<_>>(), generation);
    }

    #[test]
    fn test_iter_names() {
        let ls = grown(2);
        let from_iter: Vec<&str> = ls.iter_names().map(|t| t.as_str()).collect();
        let decoded: Vec<&str> = ls.names().into_iter().map(|t| t.as_str()).collect();
        assert_eq!(from_iter, decoded);
    }

    #[test]
    fn test_into_iterator() {
        let ls = grown(2);
        let count = (&ls).into_iter().count();
        assert_eq!(count, ls.len());
    }
}
