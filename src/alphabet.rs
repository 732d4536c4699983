use crate::error::{LSystemError, Result};
use crate::rule::RuleSet;
use crate::symbol::SymbolId;
use crate::token::Token;
use ahash::AHashMap as HashMap;
use std::collections::BTreeMap;

const MAX_PLAIN_SYMBOLS: usize = u16::MAX as usize + 1;

/// Levels allocated for one stateful variable family.
#[derive(Debug, Clone, Copy)]
struct CounterFamily {
    first_slot: u32,
    max_level: u8,
}

/// Bidirectional mapping between symbol names and compact [`SymbolId`]s.
///
/// Plain ids are assigned to variables first, then constants, then the
/// empty sentinel. Every stateful family gets one counter id per level
/// `1..=max`, all sharing the plain index of the family base. Each id also
/// owns a dense slot used to index flat per-symbol tables.
#[derive(Debug, Clone)]
pub struct Alphabet {
    names: Vec<Token>,
    variable_count: usize,
    families: Vec<Option<CounterFamily>>,
    counters: Vec<(SymbolId, Token)>,
    ids: HashMap<Token, SymbolId>,
    sentinel: SymbolId,
}

impl Alphabet {
    /// Builds the alphabet for a rule set.
    ///
    /// Fails if any rule mentions a name that is neither a declared
    /// variable nor a declared constant.
    pub fn build(rule_set: &RuleSet) -> Result<Self> {
        let mut alphabet = Alphabet {
            names: Vec::new(),
            variable_count: 0,
            families: Vec::new(),
            counters: Vec::new(),
            ids: HashMap::new(),
            sentinel: SymbolId::Plain(0),
        };

        let mut max_levels: BTreeMap<&str, u8> = BTreeMap::new();
        for var in &rule_set.variables {
            if let Some((base, level)) = var.counter_parts() {
                let max = max_levels.entry(base).or_insert(level);
                *max = (*max).max(level);
            }
        }

        for var in &rule_set.variables {
            if var.counter_parts().is_none() {
                alphabet.push_plain(var)?;
            }
        }
        for base in max_levels.keys() {
            alphabet.push_plain(&Token::from(*base))?;
        }
        alphabet.variable_count = alphabet.names.len();

        for constant in &rule_set.constants {
            alphabet.push_plain(constant)?;
        }
        alphabet.sentinel = alphabet.push_plain(&Token::empty())?;

        alphabet.families = vec![None; alphabet.names.len()];
        for (base, max_level) in &max_levels {
            let base_index = alphabet.ids[*base].base();
            let first_slot = (alphabet.names.len() + alphabet.counters.len()) as u32;
            for level in 1..=*max_level {
                let id = SymbolId::Counter { base: base_index, level };
                let name = Token::new(format!("{base}{level}"));
                alphabet.ids.insert(name.clone(), id);
                alphabet.counters.push((id, name));
            }
            alphabet.families[base_index as usize] = Some(CounterFamily {
                first_slot,
                max_level: *max_level,
            });
        }

        // Non-canonical spellings such as `S03` resolve to their family level.
        for var in &rule_set.variables {
            if let Some((base, level)) = var.counter_parts() {
                let base_index = alphabet.ids[base].base();
                alphabet
                    .ids
                    .insert(var.clone(), SymbolId::Counter { base: base_index, level });
            }
        }

        for rule in rule_set.rules.values() {
            for token in rule.referenced_tokens() {
                if !alphabet.ids.contains_key(token) {
                    return Err(LSystemError::UndeclaredSymbol {
                        rule: rule.predecessor().clone(),
                        symbol: token.clone(),
                    });
                }
            }
        }

        tracing::debug!(
            plain = alphabet.names.len(),
            variables = alphabet.variable_count,
            families = max_levels.len(),
            counters = alphabet.counters.len(),
            "built alphabet"
        );

        Ok(alphabet)
    }

    fn push_plain(&mut self, name: &Token) -> Result<SymbolId> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        if self.names.len() >= MAX_PLAIN_SYMBOLS {
            return Err(LSystemError::AlphabetOverflow {
                max: MAX_PLAIN_SYMBOLS,
            });
        }
        let id = SymbolId::Plain(self.names.len() as u16);
        self.names.push(name.clone());
        self.ids.insert(name.clone(), id);
        Ok(id)
    }

    /// Id reserved for "no token", used as the predecessor at sequence start.
    #[inline]
    pub fn sentinel(&self) -> SymbolId {
        self.sentinel
    }

    pub fn id(&self, name: &str) -> Option<SymbolId> {
        self.ids.get(name).copied()
    }

    pub fn encode<I, T>(&self, names: I) -> Result<Vec<SymbolId>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                self.id(name)
                    .ok_or_else(|| LSystemError::UnknownSymbol(Token::from(name)))
            })
            .collect()
    }

    /// Name of an id. Counter levels without a literal name fall back to the
    /// family base name.
    pub fn name(&self, id: SymbolId) -> Option<&Token> {
        if let SymbolId::Counter { .. } = id {
            if let Some(slot) = self.slot(id) {
                return self
                    .counters
                    .get(slot - self.names.len())
                    .map(|(_, name)| name);
            }
        }
        self.names.get(id.base() as usize)
    }

    /// Decodes ids to names; ids foreign to this alphabet decode to the
    /// sentinel name.
    pub fn decode(&self, ids: &[SymbolId]) -> Vec<&Token> {
        let fallback = &self.names[self.sentinel.base() as usize];
        ids.iter()
            .map(|&id| self.name(id).unwrap_or(fallback))
            .collect()
    }

    /// Dense table index of an id, if the id belongs to this alphabet.
    #[inline]
    pub fn slot(&self, id: SymbolId) -> Option<usize> {
        match id {
            SymbolId::Plain(index) => {
                let index = index as usize;
                (index < self.names.len()).then_some(index)
            }
            SymbolId::Counter { base, level } => {
                let family = self.families.get(base as usize)?.as_ref()?;
                if level == 0 || level > family.max_level {
                    return None;
                }
                Some(family.first_slot as usize + level as usize - 1)
            }
        }
    }

    /// Number of dense slots (plain symbols plus counter levels).
    pub fn slot_count(&self) -> usize {
        self.names.len() + self.counters.len()
    }

    /// Every id with its name, in slot order.
    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Token)> + '_ {
        let plain = self
            .names
            .iter()
            .enumerate()
            .map(|(index, name)| (SymbolId::Plain(index as u16), name));
        plain.chain(self.counters.iter().map(|(id, name)| (*id, name)))
    }

    /// Highest allocated level of the family whose base has this plain index.
    pub fn max_level(&self, base: u16) -> Option<u8> {
        self.families
            .get(base as usize)
            .and_then(|family| family.as_ref())
            .map(|family| family.max_level)
    }

    pub fn is_variable(&self, name: &str) -> bool {
        match self.id(name) {
            Some(SymbolId::Plain(index)) => (index as usize) < self.variable_count,
            Some(SymbolId::Counter { .. }) => true,
            None => false,
        }
    }

    pub fn is_constant(&self, name: &str) -> bool {
        matches!(self.id(name), Some(SymbolId::Plain(index)) if index as usize >= self.variable_count)
    }

    /// Number of distinct names, including counter levels and the sentinel.
    pub fn len(&self) -> usize {
        self.slot_count()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_count() == 0
    }
}
