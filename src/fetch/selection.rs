//! Menu selection parsing.

use crate::error::{HardenError, Result};

/// One number from the operator's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick {
    /// 1-based registry index within `[1, N]`.
    Script(usize),
    /// Number outside `[1, N]`, in canonical decimal form. Kept as text so
    /// values too large for any integer type are still reported.
    OutOfRange(String),
}

/// Parsed menu input, in input order.
///
/// A registry index appears at most once; later repeats are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub picks: Vec<Pick>,
}

impl Selection {
    /// Usable registry indices.
    pub fn valid(&self) -> Vec<usize> {
        self.picks
            .iter()
            .filter_map(|pick| match pick {
                Pick::Script(index) => Some(*index),
                Pick::OutOfRange(_) => None,
            })
            .collect()
    }

    /// Rejected numbers.
    pub fn invalid(&self) -> Vec<&str> {
        self.picks
            .iter()
            .filter_map(|pick| match pick {
                Pick::Script(_) => None,
                Pick::OutOfRange(number) => Some(number.as_str()),
            })
            .collect()
    }
}

/// Parse comma-separated numbers against a registry of `len` entries.
///
/// Any token that is not an integer (including an empty token) rejects the
/// whole input so nothing is fetched. Integers of any magnitude are numeric.
pub fn parse_selection(input: &str, len: usize) -> Result<Selection> {
    let numbers = input
        .split(',')
        .map(|token| {
            let token = token.trim();
            canonical_integer(token)
                .ok_or_else(|| HardenError::selection(format!("'{}' is not a number", token)))
        })
        .collect::<Result<Vec<String>>>()?;

    let mut selection = Selection::default();
    for number in numbers {
        match number.parse::<usize>() {
            Ok(index) if (1..=len).contains(&index) => {
                let pick = Pick::Script(index);
                if !selection.picks.contains(&pick) {
                    selection.picks.push(pick);
                }
            }
            _ => selection.picks.push(Pick::OutOfRange(number)),
        }
    }
    Ok(selection)
}

/// `[+-]digits` → decimal without sign noise or leading zeros.
fn canonical_integer(token: &str) -> Option<String> {
    let (negative, digits) = match token.as_bytes().first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    Some(match (digits.is_empty(), negative) {
        (true, _) => "0".to_string(),
        (false, true) => format!("-{}", digits),
        (false, false) => digits.to_string(),
    })
}
