use std::sync::LazyLock;

use regex::Regex;

use crate::config::{CONVERSION_RATE, CURRENCY_SYMBOL};

/// First run of digits and commas in a price string.
static AMOUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,]+").expect("valid amount pattern"));

/// Converts a free-text price into a display string in the target currency
/// using a fixed rate. Unparsable input is passed through unchanged.
#[derive(Debug, Clone)]
pub struct CurrencyNormalizer {
    rate: f64,
    symbol: String,
}

impl Default for CurrencyNormalizer {
    fn default() -> Self {
        Self::new(CONVERSION_RATE, CURRENCY_SYMBOL)
    }
}

impl CurrencyNormalizer {
    pub fn new(rate: f64, symbol: impl Into<String>) -> Self {
        Self {
            rate,
            symbol: symbol.into(),
        }
    }

    pub fn normalize(&self, price: Option<&str>) -> String {
        let price = match price {
            Some(p) if !p.is_empty() => p,
            _ => return format!("{}0", self.symbol),
        };

        let Some(run) = leading_amount(price) else {
            return price.to_string();
        };

        match decimal_text(run).parse::<f64>() {
            Ok(amount) => format!("{}{:.0}", self.symbol, amount * self.rate),
            Err(_) => price.to_string(),
        }
    }
}

fn leading_amount(s: &str) -> Option<&str> {
    AMOUNT_REGEX.find(s).map(|m| m.as_str())
}

/// The first comma is the decimal point; any later commas are dropped.
fn decimal_text(run: &str) -> String {
    let mut out = String::with_capacity(run.len());
    let mut seen_point = false;
    for c in run.chars() {
        if c != ',' {
            out.push(c);
        } else if !seen_point {
            out.push('.');
            seen_point = true;
        }
    }
    out
}
