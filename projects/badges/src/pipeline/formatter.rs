use serde::{Deserialize, Serialize};

use crate::models::badge::Status;

/// Magnitude groups as (minimum digit count, suffix), largest first.
const GROUPS: [(usize, &str); 4] = [(13, "T"), (10, "B"), (7, "M"), (4, "k")];

// Longer numbers switch to exponent notation.
const MAX_GROUPED_DIGITS: usize = 16;

const MAX_DECIMALS: usize = 6;

pub const COMPACT_DECIMALS: usize = 1;

/// How the status of a badge renders its total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Style {
    /// The raw number, serialized as a JSON number.
    Count,
    /// `1,234,567`
    Grouped,
    /// `12.3k` followed by an optional unit such as `/month`.
    Compact {
        #[serde(default)]
        unit: Option<String>,
    },
}

/// Compact representation with `decimals` mantissa digits: 12345 -> "12.3k".
///
/// Numbers below 1000 are printed unchanged. The last kept digit is rounded half up,
/// and a carry into the next magnitude promotes the suffix (999950 -> "1.0M").
pub fn compact(number: u64, decimals: usize) -> String {
    let digits = number.to_string();
    if number < 1000 {
        return digits;
    }

    let decimals = decimals.min(MAX_DECIMALS);
    if digits.len() > MAX_GROUPED_DIGITS {
        return exponential(digits.as_bytes(), decimals);
    }

    let Some(mut group) = GROUPS.iter().position(|(length, _)| digits.len() >= *length) else {
        return digits;
    };

    let whole_len = digits.len() - GROUPS[group].0 + 1;
    let scale = 10u128.pow(decimals as u32);
    let rounded = round_prefix(digits.as_bytes(), whole_len + decimals);
    let (mut whole, mut fraction) = (rounded / scale, rounded % scale);

    if whole >= 1000 && group > 0 {
        group -= 1;
        whole = 1;
        fraction = 0;
    }

    format!("{}{}", mantissa(whole, fraction, decimals), GROUPS[group].1)
}

/// en-US thousands separators: 1234567 -> "1,234,567".
pub fn grouped(number: u64) -> String {
    let digits = number.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Builds the status of a badge from its total and optional daily rate.
pub fn compose_status(style: &Style, total: u64, rate: Option<u64>) -> Status {
    let total_text = match (style, rate) {
        (Style::Count, None) => return Status::Count(total),
        (Style::Count, Some(_)) => total.to_string(),
        (Style::Grouped, _) => grouped(total),
        (Style::Compact { unit }, _) => {
            format!("{}{}", compact(total, COMPACT_DECIMALS), unit.as_deref().unwrap_or(""))
        }
    };

    match rate {
        Some(rate) => Status::Text(format!("{total_text} ({}/day)", compact(rate, COMPACT_DECIMALS))),
        None => Status::Text(total_text),
    }
}

// Value of the first `keep` digits, rounded half up on the digit after them.
// Missing digits count as zeros.
fn round_prefix(digits: &[u8], keep: usize) -> u128 {
    let mut value = (0..keep).fold(0u128, |acc, index| {
        acc * 10 + digits.get(index).map_or(0, |digit| u128::from(digit - b'0'))
    });
    if digits.get(keep).is_some_and(|digit| *digit >= b'5') {
        value += 1;
    }
    value
}

fn mantissa(whole: u128, fraction: u128, decimals: usize) -> String {
    if decimals == 0 {
        whole.to_string()
    } else {
        format!("{whole}.{fraction:0decimals$}")
    }
}

fn exponential(digits: &[u8], decimals: usize) -> String {
    let scale = 10u128.pow(decimals as u32);
    let mut exponent = digits.len() - 1;
    let rounded = round_prefix(digits, 1 + decimals);
    let (mut whole, mut fraction) = (rounded / scale, rounded % scale);
    if whole >= 10 {
        exponent += 1;
        whole = 1;
        fraction = 0;
    }
    format!("{}x10^{exponent}", mantissa(whole, fraction, decimals))
}
