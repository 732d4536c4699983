use crate::error::{LSystemError, Result};
use crate::token::Token;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One candidate successor sequence of a production rule.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedAlternative {
    /// Non-negative selection weight, relative to the other eligible alternatives.
    pub weight: f64,
    /// Symbol that must immediately precede the rewritten symbol.
    pub catalyst: Option<Token>,
    /// Output symbols; empty means the symbol is deleted.
    pub successors: Vec<Token>,
}

impl WeightedAlternative {
    pub fn new<I, T>(weight: f64, successors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        Self {
            weight,
            catalyst: None,
            successors: successors.into_iter().map(Into::into).collect(),
        }
    }

    /// Gates this alternative on `catalyst` preceding the symbol.
    pub fn with_catalyst(mut self, catalyst: impl Into<Token>) -> Self {
        self.catalyst = Some(catalyst.into());
        self
    }

    pub fn is_conditional(&self) -> bool {
        self.catalyst.is_some()
    }
}

impl fmt::Display for WeightedAlternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.weight)?;
        if let Some(catalyst) = &self.catalyst {
            write!(f, " *{catalyst}")?;
        }
        for successor in &self.successors {
            write!(f, " {successor}")?;
        }
        Ok(())
    }
}

/// All weighted alternatives for one predecessor symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionRule {
    predecessor: Token,
    alternatives: Vec<WeightedAlternative>,
}

impl ProductionRule {
    /// Creates a rule; a rule without alternatives is rejected.
    pub fn new(
        predecessor: impl Into<Token>,
        alternatives: Vec<WeightedAlternative>,
    ) -> Result<Self> {
        let predecessor = predecessor.into();
        if alternatives.is_empty() {
            return Err(LSystemError::EmptyRule(predecessor));
        }
        Ok(Self {
            predecessor,
            alternatives,
        })
    }

    pub fn predecessor(&self) -> &Token {
        &self.predecessor
    }

    pub fn alternatives(&self) -> &[WeightedAlternative] {
        &self.alternatives
    }

    /// Every token the rule mentions: predecessor, catalysts and successors.
    pub fn referenced_tokens(&self) -> impl Iterator<Item = &Token> {
        std::iter::once(&self.predecessor).chain(
            self.alternatives
                .iter()
                .flat_map(|alt| alt.catalyst.iter().chain(alt.successors.iter())),
        )
    }
}

impl fmt::Display for ProductionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, alt) in self.alternatives.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{alt}")?;
        }
        Ok(())
    }
}

/// A normalized grammar: declared variables and constants plus the rule table.
///
/// Ordered collections keep id assignment stable across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub variables: BTreeSet<Token>,
    pub constants: BTreeSet<Token>,
    pub rules: BTreeMap<Token, ProductionRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule set that declares every referenced token by its
    /// variable/constant classification.
    pub fn from_rules<I: IntoIterator<Item = ProductionRule>>(rules: I) -> Self {
        let mut set = Self::new();
        for rule in rules {
            set.insert(rule);
        }
        set
    }

    /// Adds a rule and declares all tokens it mentions.
    ///
    /// A second rule for the same predecessor replaces the first.
    pub fn insert(&mut self, rule: ProductionRule) {
        for token in rule.referenced_tokens() {
            self.declare(token.clone());
        }
        self.rules.insert(rule.predecessor.clone(), rule);
    }

    pub fn declare(&mut self, token: Token) {
        if token.is_variable() {
            self.variables.insert(token);
        } else {
            self.constants.insert(token);
        }
    }

    pub fn is_variable(&self, token: &str) -> bool {
        self.variables.contains(token)
    }

    pub fn is_constant(&self, token: &str) -> bool {
        self.constants.contains(token)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rule_rejected() {
        let err = ProductionRule::new("A", Vec::new()).unwrap_err();
        assert_eq!(err, LSystemError::EmptyRule(Token::from("A")));
    }

    #[test]
    fn test_from_rules_declares_tokens() {
        let rule = ProductionRule::new(
            "A",
            vec![
                WeightedAlternative::new(1.0, ["B", "[", "u", "]"]),
                WeightedAlternative::new(0.5, ["C"]).with_catalyst("x"),
            ],
        )
        .unwrap();
        let set = RuleSet::from_rules([rule]);

        assert!(set.is_variable("A"));
        assert!(set.is_variable("B"));
        assert!(set.is_variable("C"));
        assert!(set.is_constant("["));
        assert!(set.is_constant("u"));
        assert!(set.is_constant("x"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_display_uses_alternative_syntax() {
        let rule = ProductionRule::new(
            "A",
            vec![
                WeightedAlternative::new(1.0, ["B", "u"]),
                WeightedAlternative::new(0.25, ["C"]).with_catalyst("B"),
                WeightedAlternative::new(2.0, Vec::<Token>::new()),
            ],
        )
        .unwrap();
        assert_eq!(rule.to_string(), "1 B u; 0.25 *B C; 2");
    }
}
