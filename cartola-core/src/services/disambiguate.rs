//! Charge/credit placement for single-amount text lines
//!
//! When a page has no detected table, a statement line such as
//!
//! ```text
//! 03/ENE  PAGO TARJETA  1234  10.000,00  90.000,00
//! ```
//!
//! splits into four parts and the lone amount could sit in either the
//! charge or the credit column. The statement prints charge, then credit,
//! then balance, left to right; an amount followed directly by the balance
//! is read as a charge, anything else as a credit. This is a positional
//! guess and may misplace amounts on statements with a different layout.

use std::sync::OnceLock;

use regex::Regex;

/// Numbers as the statement prints them: `1.234.567,89`, `1234`, `12,5`
fn number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\d{1,3}(?:\.\d{3})+(?:,\d+)?|\d+(?:,\d+)?").expect("valid number pattern")
    })
}

/// Column an amount belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumn {
    Charge,
    Credit,
}

/// Outcome of placing a lone amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Resolved(AmountColumn),
    /// Not enough numbers before the balance to trust the layout
    Insufficient { found: usize },
}

/// A column cut out of a statement line, with its byte offset in the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column<'a> {
    pub offset: usize,
    pub text: &'a str,
}

impl<'a> Column<'a> {
    fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// All numeric tokens in `text`, in order
pub fn numeric_tokens(text: &str) -> Vec<&str> {
    number_pattern().find_iter(text).map(|m| m.as_str()).collect()
}

/// Decide which column `amount` belongs to
///
/// `remainder` is the line after its date; `amount` and `balance` are
/// columns split out of it, so their offsets index into `remainder`.
pub fn place_amount(remainder: &str, amount: Column<'_>, balance: Column<'_>) -> Placement {
    // Document id plus the amount must precede the balance.
    let before_balance = remainder.get(..balance.offset).unwrap_or(remainder);
    let found = numeric_tokens(before_balance).len();
    if found < 2 {
        return Placement::Insufficient { found };
    }

    let trailing = remainder.get(amount.end()..).unwrap_or("");
    let following = numeric_tokens(trailing);
    let balance_number = numeric_tokens(balance.text).last().copied();

    match (following.as_slice(), balance_number) {
        ([only], Some(number)) if *only == number => Placement::Resolved(AmountColumn::Charge),
        _ => Placement::Resolved(AmountColumn::Credit),
    }
}
