// Percentage, ratio and number formatting.
//
// Everything here turns numbers into display text. Rounding happens only in
// this module; aggregation and top-N reduction carry exact values.
use clap::ValueEnum;
use num_format::{Locale as NumLocale, ToFormattedString};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ProfileError;

/// Display locale for labels and numerals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ne,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Ne => write!(f, "ne"),
        }
    }
}

impl FromStr for Locale {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ne" => Ok(Self::Ne),
            other => Err(ProfileError::InvalidSelection {
                value: other.to_string(),
                message: "expected 'en' or 'ne'".to_string(),
            }),
        }
    }
}

/// Label of the synthesized bucket holding everything past the top N.
pub fn other_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Other",
        Locale::Ne => "अन्य",
    }
}

/// Shown in place of a ratio whose denominator is zero.
pub fn not_available(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "N/A",
        Locale::Ne => "लागू हुँदैन",
    }
}

/// Raw share of `value` in `denominator`, as a percentage. A zero
/// denominator is a normal occurrence (a ward with no data) and yields 0.
pub fn percentage(value: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let pct = value / denominator * 100.0;
    if pct.is_finite() { pct } else { 0.0 }
}

/// Percentage text with a fixed number of decimals, e.g. `"76.47"`.
pub fn to_percentage(value: f64, denominator: f64, precision: usize) -> String {
    format!("{:.*}", precision, percentage(value, denominator))
}

/// How many of `a` there are for every one of `b`, to two decimals.
pub fn ratio(a: f64, b: f64, locale: Locale) -> String {
    if b > 0.0 {
        format!("{:.2}", a / b)
    } else {
        not_available(locale).to_string()
    }
}

/// Swap ASCII digits for the locale's numeral glyphs. Only the text
/// changes; separators and signs are left untouched.
pub fn localize_digits(text: &str, locale: Locale) -> String {
    match locale {
        Locale::En => text.to_string(),
        Locale::Ne => text
            .chars()
            .map(|c| match c {
                // U+0966 DEVANAGARI DIGIT ZERO
                '0'..='9' => char::from_u32(0x0966 + (c as u32 - '0' as u32)).unwrap_or(c),
                _ => c,
            })
            .collect(),
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `num-format` grouping on the integer part,
    // e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&NumLocale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&NumLocale::en)
}
