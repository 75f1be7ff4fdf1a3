// src/core/sanitizer.rs

//! Turns the free-text list fields of the form (channel names, subject filters)
//! into MATLAB literals.
//!
//! Users type things like `L_MASTOID, R_MASTOID` or `{'VEOG1','VEOG2'}`. Quotes,
//! braces and other punctuation are stripped, the text is split on commas and
//! every token is classified as a number, a boolean or a string.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    /// Everything that can never be part of a token. Commas survive as separators.
    static ref NON_TOKEN_CHARS: Regex =
        Regex::new(r"[^A-Za-z0-9_.+\-\s,]").expect("token filter regex is valid");
}

/// A single classified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenLiteral {
    /// Anything that parses as a finite number. Stored lower-cased.
    Number(String),
    /// `true` or `false`, any case on input.
    Bool(bool),
    /// Everything else. Rendered single-quoted.
    Text(String),
}

impl TokenLiteral {
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

impl fmt::Display for TokenLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(n),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// Classifies one trimmed token.
pub fn classify_token(token: &str) -> TokenLiteral {
    let lowered = token.to_ascii_lowercase();
    match lowered.as_str() {
        "true" => return TokenLiteral::Bool(true),
        "false" => return TokenLiteral::Bool(false),
        _ => {}
    }
    // `f64::from_str` also accepts "inf" and "NaN"; those are names, not numbers.
    let spelled_out = lowered.contains("inf") || lowered.contains("nan");
    if !spelled_out && lowered.parse::<f64>().is_ok() {
        return TokenLiteral::Number(lowered);
    }
    TokenLiteral::Text(token.to_string())
}

/// Splits a free-text list into classified tokens. Line breaks separate tokens
/// like commas do. Empty tokens are dropped.
pub fn tokenize(input: &str) -> Vec<TokenLiteral> {
    let cleaned = NON_TOKEN_CHARS.replace_all(input, "");
    cleaned
        .split([',', '\n', '\r'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(classify_token)
        .collect()
}

/// Renders a comma-separated free-text field as a comma-joined list of literals.
///
/// `"L_MASTOID, true, 42"` becomes `'L_MASTOID', true, 42`. Empty input gives
/// an empty string.
pub fn input_correction(input: &str) -> String {
    tokenize(input)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a channel list as a MATLAB cell array, e.g. `{'VEOG1', 'VEOG2'}`.
pub fn cell_literal(input: &str) -> String {
    format!("{{{}}}", input_correction(input))
}

/// Renders the `sbj_filt` value.
///
/// A single token is emitted bare (`1`, `'all'`); several numbers become a
/// numeric array and anything else a cell array.
pub fn filter_literal(input: &str) -> String {
    let tokens = tokenize(input);
    let joined = tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    match tokens.as_slice() {
        [single] => single.to_string(),
        [] => "[]".to_string(),
        many if many.iter().all(TokenLiteral::is_number) => format!("[{}]", joined),
        _ => format!("{{{}}}", joined),
    }
}
