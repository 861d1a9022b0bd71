//! Forgiving readers for stored placement metadata.
//!
//! Layouts written by hand or by older tools may carry nulls, strings or
//! negative numbers where a count is expected. Each helper maps such values
//! to the field's fallback instead of failing the whole layout.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::layout::fit::Placement;

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Number carried by the value, if any; numeric strings are accepted.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match LooseNumber::deserialize(deserializer)? {
        LooseNumber::Number(number) => Some(number),
        LooseNumber::Text(text) => text.trim().parse::<f64>().ok(),
        LooseNumber::Other(_) => None,
    };
    Ok(value.filter(|number| number.is_finite()))
}

fn whole(number: f64) -> Option<u32> {
    let number = number.trunc();
    (number >= 0.0 && number <= u32::MAX as f64).then_some(number as u32)
}

/// Grid offset; anything unreadable or negative is `0`.
pub(crate) fn offset<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.and_then(whole).unwrap_or(0))
}

/// Span length; anything unreadable or below one cell is `1`.
pub(crate) fn span<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.and_then(whole).filter(|&span| span > 0).unwrap_or(1))
}

/// Font size in px; anything unreadable or zero is absent.
pub(crate) fn font_size<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.and_then(whole).filter(|&size| size > 0))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LoosePlacement {
    Valid(Placement),
    Other(IgnoredAny),
}

/// Whole placement record; anything that is not an object is the default.
pub(crate) fn placement<'de, D>(deserializer: D) -> Result<Placement, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LoosePlacement::deserialize(deserializer)? {
        LoosePlacement::Valid(placement) => placement,
        LoosePlacement::Other(_) => Placement::default(),
    })
}
