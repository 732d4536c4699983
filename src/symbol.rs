/// Compact identity of a symbol in a compiled alphabet.
///
/// Counter ids of one family share the plain index of their base name, so a
/// family can be walked down by rebuilding the value with a lower level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolId {
    /// An ordinary variable or constant.
    Plain(u16),

    /// One concrete level of a stateful variable family.
    Counter { base: u16, level: u8 },
}

impl SymbolId {
    /// Index of the plain symbol this id belongs to.
    #[inline]
    pub fn base(self) -> u16 {
        match self {
            SymbolId::Plain(index) => index,
            SymbolId::Counter { base, .. } => base,
        }
    }

    #[inline]
    pub fn is_counter(self) -> bool {
        matches!(self, SymbolId::Counter { .. })
    }

    /// Counter level, if this is a counter id.
    #[inline]
    pub fn level(self) -> Option<u8> {
        match self {
            SymbolId::Plain(_) => None,
            SymbolId::Counter { level, .. } => Some(level),
        }
    }

    /// The id rules are looked up under.
    ///
    /// Counters above level 1 step one level down; level 1 and plain ids are
    /// returned unchanged.
    #[inline]
    pub fn decremented(self) -> SymbolId {
        match self {
            SymbolId::Counter { base, level } if level > 1 => SymbolId::Counter {
                base,
                level: level - 1,
            },
            other => other,
        }
    }
}
