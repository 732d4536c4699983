//! Textual grammar syntax.
//!
//! A rule body is a `;`-separated list of alternatives, each written as
//! `<weight> [*<catalyst>] <successor> <successor> ...`:
//!
//! ```text
//! 0.1 L u L w F e; 0.05 *B L_ u L; 1 L
//! ```
//!
//! Malformed alternatives are skipped with a warning instead of failing the
//! whole grammar.

use crate::error::Result;
use crate::rule::{ProductionRule, RuleSet, WeightedAlternative};
use crate::token::Token;

/// Parses one rule body into its alternatives.
pub fn parse_alternatives(text: &str) -> Vec<WeightedAlternative> {
    let text = text.replace(&['\n', '\r'][..], "");
    text.split(';').filter_map(parse_alternative).collect()
}

fn parse_alternative(group: &str) -> Option<WeightedAlternative> {
    let mut fields = group.split_whitespace();
    let weight_field = fields.next()?;

    let weight = match weight_field.parse::<f64>() {
        Ok(weight) if weight.is_finite() && weight >= 0.0 => weight,
        _ => {
            tracing::warn!(alternative = group.trim(), "skipping alternative with invalid weight");
            return None;
        }
    };

    let mut fields = fields.peekable();
    let catalyst = match fields.peek().copied().and_then(|field| field.strip_prefix('*')) {
        Some("") => {
            tracing::warn!(alternative = group.trim(), "skipping alternative with empty catalyst");
            return None;
        }
        Some(name) => {
            let catalyst = Token::from(name);
            fields.next();
            Some(catalyst)
        }
        None => None,
    };

    Some(WeightedAlternative {
        weight,
        catalyst,
        successors: fields.map(Token::from).collect(),
    })
}

/// Parses a whole grammar given as `(predecessor, body)` pairs.
///
/// Every token encountered is declared as a variable or constant by its
/// spelling. A body in which no alternative survives is an error.
pub fn parse_rules<I, K, V>(rules: I) -> Result<RuleSet>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut set = RuleSet::new();
    for (predecessor, body) in rules {
        let rule = ProductionRule::new(predecessor.as_ref(), parse_alternatives(body.as_ref()))?;
        set.insert(rule);
    }
    Ok(set)
}

/// Splits a whitespace-separated symbol sequence.
pub fn parse_state(text: &str) -> Vec<Token> {
    text.split_whitespace().map(Token::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LSystemError;

    #[test]
    fn test_parse_alternatives() {
        let alts = parse_alternatives("0.1 L u L w F e; 0.05 L_ u L; 1 L");
        assert_eq!(alts.len(), 3);
        assert_eq!(alts[0].weight, 0.1);
        assert_eq!(alts[0].successors.len(), 6);
        assert_eq!(alts[2].successors, vec![Token::from("L")]);
        assert!(alts.iter().all(|alt| alt.catalyst.is_none()));
    }

    #[test]
    fn test_catalyst_is_consumed() {
        let alts = parse_alternatives("1 *B C; 1 D");
        assert_eq!(alts[0].catalyst, Some(Token::from("B")));
        assert_eq!(alts[0].successors, vec![Token::from("C")]);
        assert_eq!(alts[1].catalyst, None);
    }

    #[test]
    fn test_catalyst_only_in_first_position() {
        let alts = parse_alternatives("1 C *B");
        assert_eq!(alts[0].catalyst, None);
        assert_eq!(alts[0].successors, vec![Token::from("C"), Token::from("*B")]);
    }

    #[test]
    fn test_malformed_weights_are_skipped() {
        // `0.0O8` contains a letter O, not a zero
        let alts = parse_alternatives("0.0O8 F [ n F_ ]; -1 F; nan F; 1 F");
        assert_eq!(alts.len(), 1);
        assert_eq!(alts[0].weight, 1.0);
    }

    #[test]
    fn test_blank_groups_and_newlines() {
        let alts = parse_alternatives("1 A\n B;\n ;; 2 C;");
        assert_eq!(alts.len(), 2);
        assert_eq!(alts[0].successors, vec![Token::from("A"), Token::from("B")]);
    }

    #[test]
    fn test_empty_successors_mean_deletion() {
        let alts = parse_alternatives("1; 0.5 *x");
        assert_eq!(alts.len(), 2);
        assert!(alts[0].successors.is_empty());
        assert!(alts[1].successors.is_empty());
        assert_eq!(alts[1].catalyst, Some(Token::from("x")));
    }

    #[test]
    fn test_parse_rules_declares_tokens() {
        let set = parse_rules([("Seed", "1 L u S3"), ("S1", "1 X")]).unwrap();
        assert_eq!(set.len(), 2);
        for var in ["Seed", "L", "S3", "S1", "X"] {
            assert!(set.is_variable(var), "{var} should be a variable");
        }
        assert!(set.is_constant("u"));
    }

    #[test]
    fn test_parse_rules_rejects_empty_body() {
        let err = parse_rules([("A", "oops B")]).unwrap_err();
        assert_eq!(err, LSystemError::EmptyRule(Token::from("A")));
    }

    #[test]
    fn test_display_round_trip() {
        let text = "0.5 *B C u; 1 D";
        let rule = ProductionRule::new("A", parse_alternatives(text)).unwrap();
        assert_eq!(rule.to_string(), text);
    }

    #[test]
    fn test_parse_state() {
        assert_eq!(
            parse_state(" L  u\tS3 "),
            vec![Token::from("L"), Token::from("u"), Token::from("S3")]
        );
    }
}
