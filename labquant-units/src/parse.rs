//! Quantity string parsing
//!
//! Two entry points:
//! - `split_value_and_unit` / `parse_quantity`: strict "<number><unit>" text
//!   such as `"10ul"` or `"10 ul"`
//! - `parse_concentration`: pulls an embedded concentration out of a
//!   free-text liquid label such as `"5g/L Glucose"`

use labquant_core::float::parse_number;
use labquant_core::{MeasurementType, QuantError, Result};
use tracing::trace;

use crate::{normalize_symbol, Concentration, TypedQuantity, UnitRegistry};

const NUMBER_CHARS: &str = "0123456789+-.eE";

/// Split text into its leading (longest valid) float literal and the unit text after it
pub fn split_value_and_unit(text: &str) -> Result<(f64, &str)> {
    let text = text.trim();
    let candidate_end = text
        .char_indices()
        .find(|(_, c)| !NUMBER_CHARS.contains(*c))
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    // back off until the prefix is a valid literal ("5e" -> "5")
    let (value, end) = (1..=candidate_end)
        .rev()
        .filter(|end| text.is_char_boundary(*end))
        .find_map(|end| parse_number(&text[..end]).map(|v| (v, end)))
        .ok_or_else(|| QuantError::Parse(format!("no number found in: {}", text)))?;

    let unit = text[end..].trim();
    if unit.is_empty() {
        return Err(QuantError::Parse(format!("no unit found in: {}", text)));
    }
    Ok((value, unit))
}

/// Parse `"10ul"` / `"10 ul"` into a typed quantity
pub fn parse_quantity<Q: TypedQuantity>(registry: &UnitRegistry, text: &str) -> Result<Q> {
    let (value, symbol) = split_value_and_unit(text)?;
    Q::new(registry, value, symbol)
}

/// Result of scanning a free-text label for a concentration
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLabel {
    /// The embedded concentration, if one was found
    pub concentration: Option<Concentration>,
    /// The label with the concentration tokens removed
    pub name: String,
}

impl ParsedLabel {
    pub fn found(&self) -> bool {
        self.concentration.is_some()
    }
}

#[derive(Debug)]
struct Candidate<'a> {
    symbol: &'a str,
    value: f64,
    tokens: Vec<usize>,
}

fn strip_parens(token: &str) -> &str {
    let token = token.strip_prefix('(').unwrap_or(token);
    token.strip_suffix(')').unwrap_or(token)
}

fn candidates_for<'a>(symbol: &'a str, tokens: &[String]) -> Vec<Candidate<'a>> {
    let mut found = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let bare = strip_parens(token);
        if bare == symbol {
            let preceding = i.checked_sub(1).and_then(|p| parse_number(&tokens[p]).map(|v| (p, v)));
            match preceding {
                Some((p, value)) => found.push(Candidate { symbol, value, tokens: vec![p, i] }),
                None => found.push(Candidate { symbol, value: 0.0, tokens: vec![i] }),
            }
        } else if let Some(number) = bare.strip_suffix(symbol) {
            if let Some(value) = parse_number(number) {
                found.push(Candidate { symbol, value, tokens: vec![i] });
            }
        }
    }
    found
}

/// Extract an embedded concentration and the residual name from a label.
///
/// Every concentration symbol (and alias) in the registry is tried against
/// the whitespace-separated tokens:
/// - `"5 g/L"`: the symbol as its own token after a number
/// - `"(g/L)"` or `"g/L"` alone: the symbol without a number, value 0
/// - `"5g/L"` or `"(5g/L)"`: the symbol as a token suffix after a number
///
/// Tokens are matched after micro-sign normalization, so `"10µM"` reads as
/// `"10uM"`. The longest matching symbol wins. Ties go to the symbol declared
/// first, then to the earliest token. When nothing matches, the label is returned
/// unchanged as the name.
pub fn parse_concentration(registry: &UnitRegistry, label: &str) -> Result<ParsedLabel> {
    let tokens: Vec<&str> = label.split_whitespace().collect();
    let normalized: Vec<String> = tokens.iter().map(|t| normalize_symbol(t)).collect();
    let symbols = registry.list_valid_units_for_type(MeasurementType::Concentration);

    let mut best: Option<Candidate> = None;
    for symbol in &symbols {
        for candidate in candidates_for(symbol, &normalized) {
            let longer = best
                .as_ref()
                .map(|b| candidate.symbol.chars().count() > b.symbol.chars().count())
                .unwrap_or(true);
            if longer {
                best = Some(candidate);
            }
        }
    }

    let Some(best) = best else {
        return Ok(ParsedLabel { concentration: None, name: label.to_string() });
    };

    trace!(label, symbol = best.symbol, value = best.value, "found embedded concentration");
    let concentration = Concentration::new(registry, best.value, best.symbol)?;
    let name = tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| !best.tokens.contains(i))
        .map(|(_, t)| *t)
        .collect::<Vec<_>>()
        .join(" ");

    Ok(ParsedLabel { concentration: Some(concentration), name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Volume;

    fn reg() -> UnitRegistry {
        UnitRegistry::standard().unwrap()
    }

    #[test]
    fn test_split_value_and_unit() {
        assert_eq!(split_value_and_unit("10ul").unwrap(), (10.0, "ul"));
        assert_eq!(split_value_and_unit("10 ul").unwrap(), (10.0, "ul"));
        assert_eq!(split_value_and_unit(" -2.5e-3 mM ").unwrap(), (-2.5e-3, "mM"));
        assert_eq!(split_value_and_unit("1e3ul").unwrap(), (1000.0, "ul"));
        assert_eq!(split_value_and_unit("5 /min").unwrap(), (5.0, "/min"));
    }

    #[test]
    fn test_split_errors() {
        assert!(matches!(split_value_and_unit("ul").unwrap_err(), QuantError::Parse(_)));
        assert!(matches!(split_value_and_unit("12").unwrap_err(), QuantError::Parse(_)));
        assert!(matches!(split_value_and_unit("").unwrap_err(), QuantError::Parse(_)));
    }

    #[test]
    fn test_parse_quantity() {
        let reg = reg();
        let v: Volume = parse_quantity(&reg, "10ul").unwrap();
        assert_eq!(v, Volume::must(&reg, 10.0, "ul"));
        let v: Volume = parse_quantity(&reg, "10 uL").unwrap();
        assert_eq!(v.symbol(), Some("ul"));
        assert!(parse_quantity::<Volume>(&reg, "10 mM").is_err());
    }

    #[test]
    fn test_parse_concentration_glued() {
        let reg = reg();
        let parsed = parse_concentration(&reg, "5g/L Glucose").unwrap();
        assert!(parsed.found());
        assert_eq!(parsed.concentration.unwrap(), Concentration::must(&reg, 5.0, "g/L"));
        assert_eq!(parsed.name, "Glucose");
    }

    #[test]
    fn test_parse_concentration_separate_token() {
        let reg = reg();
        let parsed = parse_concentration(&reg, "Tris  50 mM   pH 8").unwrap();
        assert_eq!(parsed.concentration.unwrap(), Concentration::must(&reg, 50.0, "mM"));
        assert_eq!(parsed.name, "Tris pH 8");
    }

    #[test]
    fn test_parse_concentration_longest_symbol_wins() {
        let reg = reg();
        // "mM" beats "M"; "mg/ml" beats "g/ml"
        let parsed = parse_concentration(&reg, "10mM NaCl").unwrap();
        assert_eq!(parsed.concentration.unwrap().symbol(), Some("mM"));

        let parsed = parse_concentration(&reg, "BSA 2mg/ml").unwrap();
        let c = parsed.concentration.unwrap();
        assert_eq!(c.symbol(), Some("mg/ml"));
        assert_eq!(c.value(), 2.0);
        assert_eq!(parsed.name, "BSA");
    }

    #[test]
    fn test_parse_concentration_parenthesized() {
        let reg = reg();
        let parsed = parse_concentration(&reg, "Buffer (10X)").unwrap();
        assert_eq!(parsed.concentration.unwrap(), Concentration::must(&reg, 10.0, "X"));
        assert_eq!(parsed.name, "Buffer");

        let parsed = parse_concentration(&reg, "Glucose (g/L)").unwrap();
        let c = parsed.concentration.unwrap();
        assert_eq!(c.value(), 0.0);
        assert_eq!(c.symbol(), Some("g/l"));
        assert_eq!(parsed.name, "Glucose");
    }

    #[test]
    fn test_parse_concentration_micro_sign() {
        let reg = reg();
        for label in ["10\u{00B5}M ATP", "ATP 10 \u{00B5}M", "10\u{03BC}M ATP", "(10\u{00B5}M) ATP"] {
            let parsed = parse_concentration(&reg, label).unwrap();
            assert!(parsed.found(), "{} not recognised", label);
            assert_eq!(parsed.concentration.unwrap(), Concentration::must(&reg, 10.0, "uM"));
            assert_eq!(parsed.name, "ATP");
        }
    }

    #[test]
    fn test_parse_concentration_not_found() {
        let reg = reg();
        let parsed = parse_concentration(&reg, "Magnesium Acetate").unwrap();
        assert!(!parsed.found());
        assert_eq!(parsed.name, "Magnesium Acetate");

        let parsed = parse_concentration(&reg, "  spaced   water ").unwrap();
        assert_eq!(parsed.name, "  spaced   water ");
    }

    #[test]
    fn test_word_suffix_is_not_a_unit() {
        let reg = reg();
        // "Triton-X" ends in "X" but has no number in front of it
        let parsed = parse_concentration(&reg, "Triton-X 100").unwrap();
        assert!(!parsed.found());
    }
}
