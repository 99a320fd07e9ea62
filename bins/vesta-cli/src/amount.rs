//! Decimal amount parsing and formatting.
//!
//! Users type whole-token amounts (`"12.5"`); the ledger stores base units.

use anyhow::{bail, Context, Result};

/// Parse a decimal amount into base units with `decimals` fractional digits.
///
/// A trailing `u` (e.g. `"1500u"`) means the number is already in base units.
pub fn parse_amount(input: &str, decimals: u8) -> Result<u64> {
    let input = input.trim();
    if let Some(raw) = input.strip_suffix('u') {
        return raw.parse().with_context(|| format!("invalid base-unit amount: {input}"));
    }

    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        bail!("empty amount");
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        bail!("invalid amount: {input}");
    }
    if frac.len() > usize::from(decimals) {
        bail!("amount {input} has more than {decimals} decimal places");
    }

    let scale = 10u64
        .checked_pow(u32::from(decimals))
        .context("decimals too large")?;
    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().context("amount too large")? };
    let frac_units: u64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<width$}", width = usize::from(decimals));
        padded.parse().context("invalid fractional part")?
    };

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_units))
        .context("amount too large")
}

/// Render base units as a decimal string, trimming trailing zeros.
pub fn format_amount(units: u64, decimals: u8) -> String {
    if decimals == 0 {
        return units.to_string();
    }
    let scale = 10u128.pow(u32::from(decimals));
    let whole = u128::from(units) / scale;
    let frac = u128::from(units) % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0>width$}", width = usize::from(decimals));
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
