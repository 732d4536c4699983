use crate::alphabet::Alphabet;
use crate::buffer::Buffer;
use crate::error::{LSystemError, Result};
use crate::rule::{ProductionRule, RuleSet};
use crate::sampler::WeightedSampler;
use crate::symbol::SymbolId;
use crate::token::Token;
use rand::Rng;
use std::fmt;

/// An alternative re-expressed over symbol ids.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledAlternative {
    pub weight: f64,
    pub catalyst: Option<SymbolId>,
    pub successors: Box<[SymbolId]>,
}

/// A production rule over symbol ids with its selection pools prepared.
///
/// The unconditional pool holds every alternative without a catalyst. Each
/// distinct catalyst owns a pool made of its own alternatives plus the
/// unconditional ones, so a matching catalyst adds options rather than
/// replacing the base set.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    alternatives: Vec<CompiledAlternative>,
    unconditional: WeightedSampler,
    conditional: Vec<(SymbolId, WeightedSampler)>,
}

impl CompiledRule {
    fn compile(rule: &ProductionRule, alphabet: &Alphabet, presample: bool) -> Result<Self> {
        let resolve = |token: &Token| {
            alphabet.id(token.as_str()).ok_or_else(|| LSystemError::UndeclaredSymbol {
                rule: rule.predecessor().clone(),
                symbol: token.clone(),
            })
        };

        let alternatives = rule
            .alternatives()
            .iter()
            .map(|alt| {
                Ok(CompiledAlternative {
                    weight: alt.weight,
                    catalyst: alt.catalyst.as_ref().map(&resolve).transpose()?,
                    successors: alt.successors.iter().map(&resolve).collect::<Result<_>>()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        for alt in alternatives.iter().filter(|alt| !(alt.weight.is_finite() && alt.weight >= 0.0)) {
            tracing::warn!(
                rule = %rule.predecessor(),
                weight = alt.weight,
                "alternative with invalid weight is never chosen"
            );
        }

        let unconditional = WeightedSampler::new(pool(&alternatives, None), presample);

        let mut catalysts: Vec<SymbolId> = alternatives.iter().filter_map(|alt| alt.catalyst).collect();
        catalysts.sort_unstable();
        catalysts.dedup();
        let conditional = catalysts
            .into_iter()
            .map(|catalyst| {
                let sampler = WeightedSampler::new(pool(&alternatives, Some(catalyst)), presample);
                (catalyst, sampler)
            })
            .collect();

        Ok(Self {
            alternatives,
            unconditional,
            conditional,
        })
    }

    pub fn alternatives(&self) -> &[CompiledAlternative] {
        &self.alternatives
    }

    /// The selection pool eligible after `predecessor`.
    #[inline]
    pub fn pool(&self, predecessor: SymbolId) -> &WeightedSampler {
        self.conditional
            .iter()
            .find(|(catalyst, _)| *catalyst == predecessor)
            .map_or(&self.unconditional, |(_, sampler)| sampler)
    }

    /// Picks a successor sequence, or `None` when no alternative is eligible.
    #[inline]
    pub fn choose<R: Rng + ?Sized>(&self, predecessor: SymbolId, rng: &mut R) -> Option<&[SymbolId]> {
        let index = self.pool(predecessor).sample(rng)?;
        self.alternatives
            .get(index as usize)
            .map(|alt| &*alt.successors)
    }
}

/// Alternatives eligible when `catalyst` precedes the symbol, paired with
/// their weights. `None` selects the unconditional alternatives only.
fn pool(
    alternatives: &[CompiledAlternative],
    catalyst: Option<SymbolId>,
) -> impl Iterator<Item = (u32, f64)> + '_ {
    alternatives
        .iter()
        .enumerate()
        .filter(move |(_, alt)| alt.catalyst.is_none() || alt.catalyst == catalyst)
        .map(|(i, alt)| (i as u32, alt.weight))
}

/// An immutable grammar compiled over a symbol alphabet.
///
/// Rules live in a flat table indexed by alphabet slot. The value is never
/// mutated after compilation and is shared read-only between lanes.
#[derive(Debug, Clone)]
pub struct CompiledGrammar {
    alphabet: Alphabet,
    rules: Vec<Option<CompiledRule>>,
    axiom: SymbolId,
    presampled: bool,
}

impl CompiledGrammar {
    /// Compiles a rule set for growth from `axiom`.
    pub fn compile(axiom: &str, rule_set: &RuleSet, presample: bool) -> Result<Self> {
        let alphabet = Alphabet::build(rule_set)?;
        let axiom = alphabet
            .id(axiom)
            .ok_or_else(|| LSystemError::UnknownAxiom(Token::from(axiom)))?;

        let mut rules = vec![None; alphabet.slot_count()];
        for (predecessor, rule) in &rule_set.rules {
            let id = alphabet.id(predecessor.as_str()).ok_or_else(|| {
                LSystemError::UndeclaredSymbol {
                    rule: predecessor.clone(),
                    symbol: predecessor.clone(),
                }
            })?;
            if let Some(slot) = alphabet.slot(id) {
                rules[slot] = Some(CompiledRule::compile(rule, &alphabet, presample)?);
            }
        }

        tracing::debug!(
            symbols = alphabet.len(),
            rules = rule_set.len(),
            presample,
            "compiled grammar"
        );

        Ok(Self {
            alphabet,
            rules,
            axiom,
            presampled: presample,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn axiom(&self) -> SymbolId {
        self.axiom
    }

    pub fn is_presampled(&self) -> bool {
        self.presampled
    }

    /// Compiled rule for an id, if it has one.
    #[inline]
    pub fn rule(&self, id: SymbolId) -> Option<&CompiledRule> {
        self.alphabet
            .slot(id)
            .and_then(|slot| self.rules.get(slot))
            .and_then(Option::as_ref)
    }

    /// Rewrites one symbol given the symbol preceding it, appending the
    /// result to `output`.
    ///
    /// Counters above level 1 are looked up one level down. Symbols without
    /// a rule, or whose rule has nothing eligible, are copied as looked up.
    #[inline]
    pub fn rewrite_symbol<R: Rng + ?Sized>(
        &self,
        symbol: SymbolId,
        predecessor: SymbolId,
        output: &mut Buffer,
        rng: &mut R,
    ) {
        let symbol = symbol.decremented();
        match self.rule(symbol).and_then(|rule| rule.choose(predecessor, rng)) {
            Some(successors) => output.extend_from_slice(successors),
            None => output.push(symbol),
        }
    }

    /// Rewrites every symbol of `input` once into `output`.
    ///
    /// The first symbol sees the sentinel as its predecessor.
    pub fn rewrite<R: Rng + ?Sized>(&self, input: &[SymbolId], output: &mut Buffer, rng: &mut R) {
        let mut predecessor = self.alphabet.sentinel();
        for &symbol in input {
            self.rewrite_symbol(symbol, predecessor, output, rng);
            predecessor = symbol;
        }
    }
}

impl fmt::Display for CompiledGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |id: SymbolId| self.alphabet.name(id).map_or("", Token::as_str);
        for (predecessor, token) in self.alphabet.symbols() {
            let Some(rule) = self.rule(predecessor) else {
                continue;
            };
            write!(f, "\"{token}\": ")?;
            for (i, alt) in rule.alternatives.iter().enumerate() {
                if i > 0 {
                    f.write_str("; ")?;
                }
                write!(f, "{}", alt.weight)?;
                if let Some(catalyst) = alt.catalyst {
                    write!(f, " *{}", name(catalyst))?;
                }
                for &successor in alt.successors.iter() {
                    write!(f, " {}", name(successor))?;
                }
            }
            writeln!(f, ",")?;
        }
        Ok(())
    }
}
