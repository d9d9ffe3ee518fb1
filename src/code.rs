use anyhow::{bail, Result};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const SUFFIX_MIN: u16 = 1000;
pub const SUFFIX_MAX: u16 = 9999;
const SUFFIX_WIDTH: usize = 4;

/// Produces the numeric part of a staff code, always in `SUFFIX_MIN..=SUFFIX_MAX`.
pub trait SuffixSource {
    fn draw(&mut self) -> u16;
}

/// Uniform draw from any `rand` generator.
pub struct RandomSuffix<R>(pub R);

impl<R: Rng> SuffixSource for RandomSuffix<R> {
    fn draw(&mut self) -> u16 {
        self.0.gen_range(SUFFIX_MIN..=SUFFIX_MAX)
    }
}

impl<F: FnMut() -> u16> SuffixSource for F {
    fn draw(&mut self) -> u16 {
        self()
    }
}

pub fn format_code(prefix: &str, suffix: u16) -> String {
    format!("{prefix}{suffix:04}")
}

/// A parsed staff code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffCode {
    pub prefix: String,
    pub number: u16,
}

impl fmt::Display for StaffCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_code(&self.prefix, self.number))
    }
}

impl FromStr for StaffCode {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if !s.is_ascii() || s.len() <= SUFFIX_WIDTH {
            bail!("invalid staff code '{s}': expected a prefix followed by {SUFFIX_WIDTH} digits");
        }
        let (prefix, digits) = s.split_at(s.len() - SUFFIX_WIDTH);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            bail!("invalid staff code '{s}': suffix '{digits}' is not numeric");
        }
        if !is_valid_prefix(prefix) {
            bail!("invalid staff code '{s}': prefix '{prefix}' must be lowercase letters");
        }
        let number: u16 = digits.parse()?;
        if !(SUFFIX_MIN..=SUFFIX_MAX).contains(&number) {
            bail!("invalid staff code '{s}': number {number} out of range");
        }
        Ok(StaffCode {
            prefix: prefix.to_string(),
            number,
        })
    }
}

/// Prefixes are non-empty runs of ASCII lowercase letters, so the digit
/// boundary in a code is always unambiguous.
pub fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_lowercase())
}
