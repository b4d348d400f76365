//! # Amount Parser
//!
//! Turns the amount text a model writes for an ingredient into a number.
//! Handles plain numbers ("2", "0.5"), fractions ("1/2"), mixed numbers
//! ("1 1/2", "1½") and ranges ("2-3", "1 to 2", which resolve to the midpoint).

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Regex patterns for parsing different amount formats
static AMOUNT_PATTERNS: LazyLock<AmountPatterns> = LazyLock::new(AmountPatterns::new);

/// Unicode vulgar fractions and their ASCII spelling
const VULGAR_FRACTIONS: &[(char, &str)] = &[
    ('½', "1/2"),
    ('⅓', "1/3"),
    ('⅔', "2/3"),
    ('¼', "1/4"),
    ('¾', "3/4"),
    ('⅛', "1/8"),
];

struct AmountPatterns {
    /// "2", "1.5", ".25"
    exact: Regex,
    /// "1/2", "2 1/4", "1⁄2"
    fraction: Regex,
    /// "2-3", "1 to 2", "2 or 3"
    range: Regex,
}

impl AmountPatterns {
    fn new() -> Self {
        Self {
            exact: Regex::new(r"^\d*\.?\d+$").expect("exact amount pattern should be valid"),
            fraction: Regex::new(r"^(?:(\d+)\s+)?(\d+)\s*[⁄/]\s*(\d+)$")
                .expect("fraction pattern should be valid"),
            range: Regex::new(r"^(\d*\.?\d+)\s*(?:-|–|—|to|or)\s*(\d*\.?\d+)$")
                .expect("range pattern should be valid"),
        }
    }
}

/// Errors that can occur while parsing an amount
#[derive(Debug, Clone, PartialEq)]
pub enum AmountError {
    Empty,
    Negative,
    DivisionByZero,
    Unrecognised(String),
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "empty amount"),
            AmountError::Negative => write!(f, "amount must not be negative"),
            AmountError::DivisionByZero => write!(f, "division by zero in fraction"),
            AmountError::Unrecognised(text) => write!(f, "unrecognised amount: {text}"),
        }
    }
}

impl std::error::Error for AmountError {}

/// Parse amount text into a non-negative number
///
/// ```rust
/// use menu_costing::amount_parser::parse_amount;
///
/// assert_eq!(parse_amount("1 1/2"), Ok(1.5));
/// assert_eq!(parse_amount("2-3"), Ok(2.5));
/// assert!(parse_amount("a handful").is_err());
/// ```
pub fn parse_amount(text: &str) -> Result<f64, AmountError> {
    let mut normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(AmountError::Empty);
    }
    if normalized.starts_with('-') {
        return Err(AmountError::Negative);
    }
    for (glyph, ascii) in VULGAR_FRACTIONS {
        normalized = normalized.replace(*glyph, &format!(" {ascii}"));
    }
    let normalized = normalized.trim();

    if let Some(captures) = AMOUNT_PATTERNS.range.captures(normalized) {
        let min = parse_number(&captures[1])?;
        let max = parse_number(&captures[2])?;
        return Ok((min + max) / 2.0);
    }

    if let Some(captures) = AMOUNT_PATTERNS.fraction.captures(normalized) {
        let whole = match captures.get(1) {
            Some(m) => parse_number(m.as_str())?,
            None => 0.0,
        };
        let numerator = parse_number(&captures[2])?;
        let denominator = parse_number(&captures[3])?;
        if denominator == 0.0 {
            return Err(AmountError::DivisionByZero);
        }
        return Ok(whole + numerator / denominator);
    }

    if AMOUNT_PATTERNS.exact.is_match(normalized) {
        return parse_number(normalized);
    }

    Err(AmountError::Unrecognised(text.trim().to_string()))
}

fn parse_number(text: &str) -> Result<f64, AmountError> {
    text.parse::<f64>()
        .map_err(|_| AmountError::Unrecognised(text.to_string()))
}
