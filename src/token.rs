use std::borrow::Borrow;
use std::fmt;

/// Highest level a counter family can reach; larger suffixes saturate here.
pub const MAX_COUNTER_LEVEL: u8 = u8::MAX;

/// An opaque symbol name as written in a grammar.
///
/// Names starting with an ASCII uppercase letter and not ending in `_` are
/// variables (rewritable); everything else is a constant. The empty name is
/// reserved as the "no token" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(String);

impl Token {
    pub fn new(name: impl Into<String>) -> Self {
        Token(name.into())
    }

    /// The reserved sentinel token.
    pub fn empty() -> Self {
        Token(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_variable(&self) -> bool {
        is_variable_name(&self.0)
    }

    pub fn is_constant(&self) -> bool {
        !self.is_variable()
    }

    /// Splits a stateful variable name into its family base and level.
    ///
    /// `S3` yields `("S", 3)`. Returns `None` for names without a trailing
    /// number, for level 0, and when the prefix is not a variable name.
    pub fn counter_parts(&self) -> Option<(&str, u8)> {
        let name = self.0.as_str();
        let prefix = name.trim_end_matches(|c: char| c.is_ascii_digit());
        if prefix.len() == name.len() || !is_variable_name(prefix) {
            return None;
        }

        let level = name[prefix.len()..].bytes().fold(0u32, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
        });
        if level == 0 {
            return None;
        }

        Some((prefix, level.min(u32::from(MAX_COUNTER_LEVEL)) as u8))
    }
}

fn is_variable_name(name: &str) -> bool {
    match name.as_bytes().first() {
        Some(first) => first.is_ascii_uppercase() && !name.ends_with('_'),
        None => false,
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(name: &str) -> Self {
        Token(name.to_owned())
    }
}

impl From<String> for Token {
    fn from(name: String) -> Self {
        Token(name)
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Token::from("Seed").is_variable());
        assert!(Token::from("S3").is_variable());
        assert!(Token::from("L_").is_constant());
        assert!(Token::from("u").is_constant());
        assert!(Token::from("[").is_constant());
        assert!(Token::empty().is_constant());
    }

    #[test]
    fn test_counter_parts() {
        assert_eq!(Token::from("S3").counter_parts(), Some(("S", 3)));
        assert_eq!(Token::from("Stem12").counter_parts(), Some(("Stem", 12)));
        assert_eq!(Token::from("S03").counter_parts(), Some(("S", 3)));
    }

    #[test]
    fn test_counter_parts_rejects_plain_names() {
        assert_eq!(Token::from("S").counter_parts(), None);
        assert_eq!(Token::from("S0").counter_parts(), None);
        assert_eq!(Token::from("x3").counter_parts(), None);
        assert_eq!(Token::from("L_3").counter_parts(), None);
        assert_eq!(Token::from("42").counter_parts(), None);
    }

    #[test]
    fn test_counter_level_saturates() {
        assert_eq!(Token::from("S300").counter_parts(), Some(("S", 255)));
        assert_eq!(
            Token::from("S99999999999999999999").counter_parts(),
            Some(("S", MAX_COUNTER_LEVEL))
        );
    }
}
