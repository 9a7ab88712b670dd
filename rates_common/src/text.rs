//! Text helpers for scanning rendered markup.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Collapse sequences of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Rule deciding which value-holder texts count as numeric tokens.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TokenPolicy {
    /// Keep the trimmed text as-is when it starts with an ASCII digit.
    #[default]
    Lenient,
    /// Drop everything but digits and `.`, then keep the rest when it starts with a digit.
    Strict,
}

impl TokenPolicy {
    /// Turn the raw text of a value holder into a token, or `None` when it is not numeric.
    pub fn token(self, raw: &str) -> Option<String> {
        let candidate = match self {
            TokenPolicy::Lenient => raw.trim().to_string(),
            TokenPolicy::Strict => raw
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect(),
        };
        candidate
            .starts_with(|c: char| c.is_ascii_digit())
            .then_some(candidate)
    }
}
