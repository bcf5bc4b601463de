//! Ingredient amount grammar.
//!
//! An amount is a sequence of terms separated by whitespace or hyphens whose
//! values are summed: `"1-1/2"` and `"1 1/2"` are both `1.5`. A term is either
//! a fraction `<digits>/<digits>` with a non-zero denominator, or a plain
//! decimal (`"2"`, `"0.5"`, `"1,5"`). Anything else is rejected; a blank
//! amount is zero.

use crate::error::AmountError;
use crate::tokenizer::split_words;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FRACTION: Regex = Regex::new(r"^(\d+)/(\d+)$").expect("valid regex");
    static ref DECIMAL: Regex = Regex::new(r"^(?:\d+(?:[.,]\d*)?|[.,]\d+)$").expect("valid regex");
}

pub fn parse_amount(amount: &str) -> Result<f64, AmountError> {
    split_words(amount).map(parse_term).sum()
}

fn parse_term(term: &str) -> Result<f64, AmountError> {
    if let Some(caps) = FRACTION.captures(term) {
        let numerator: f64 = caps[1].parse().map_err(|_| AmountError::Malformed(term.to_string()))?;
        let denominator: f64 = caps[2].parse().map_err(|_| AmountError::Malformed(term.to_string()))?;
        if denominator == 0.0 {
            return Err(AmountError::ZeroDenominator(term.to_string()));
        }
        return Ok(numerator / denominator);
    }
    if DECIMAL.is_match(term) {
        return term.replace(',', ".").parse().map_err(|_| AmountError::Malformed(term.to_string()));
    }
    Err(AmountError::Malformed(term.to_string()))
}

/// Two decimals at most, without trailing zeros: `4.0` -> `"4"`, `1.50` -> `"1.5"`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}
