use crate::token::Token;
use thiserror::Error;

/// Errors surfaced while building a grammar or configuring a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LSystemError {
    #[error("rule `{rule}` references undeclared symbol `{symbol}`")]
    UndeclaredSymbol { rule: Token, symbol: Token },

    #[error("axiom `{0}` is not part of the compiled alphabet")]
    UnknownAxiom(Token),

    #[error("symbol `{0}` is not part of the compiled alphabet")]
    UnknownSymbol(Token),

    #[error("rule `{0}` has no alternatives")]
    EmptyRule(Token),

    #[error("alphabet exceeds {max} plain symbols")]
    AlphabetOverflow { max: usize },

    #[error("invalid run configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, LSystemError>;
