use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid amount: {0:?}")]
pub struct ParseMoneyError(pub String);

/// An amount in minor units (cents) of a currency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    pub minor_units: u64,
    pub currency: String,
}

impl Money {
    pub fn new(minor_units: u64, currency: impl Into<String>) -> Self {
        Self {
            minor_units,
            currency: currency.into(),
        }
    }

    /// Parse a decimal amount such as `"12.34"`. Digits past the second
    /// decimal place must be zero.
    pub fn parse(amount: &str, currency: &str) -> Result<Self, ParseMoneyError> {
        Ok(Self::new(parse_minor_units(amount)?, currency.trim().to_ascii_uppercase()))
    }

    /// Amount as a plain decimal string, e.g. `"12.34"`
    pub fn to_decimal_string(&self) -> String {
        format!("{}.{:02}", self.minor_units / 100, self.minor_units % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_decimal_string(), self.currency)
    }
}

fn parse_minor_units(amount: &str) -> Result<u64, ParseMoneyError> {
    let invalid = || ParseMoneyError(amount.to_string());
    let trimmed = amount.trim();

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if fraction.len() > 2 && fraction[2..].bytes().any(|b| b != b'0') {
        return Err(invalid());
    }

    let cents = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
        _ => fraction[..2].parse::<u64>().map_err(|_| invalid())?,
    };

    whole
        .parse::<u64>()
        .ok()
        .and_then(|w| w.checked_mul(100))
        .and_then(|w| w.checked_add(cents))
        .ok_or_else(invalid)
}

/// Highest price the operator is willing to pay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLimit {
    pub max_minor_units: u64,
    /// When set, quotes in any other currency are refused
    pub currency: Option<String>,
}

impl PriceLimit {
    /// Parse `"40.00"` or `"40.00 USD"`
    pub fn parse(value: &str) -> Result<Self, ParseMoneyError> {
        let mut parts = value.split_whitespace();
        let amount = parts.next().ok_or_else(|| ParseMoneyError(value.to_string()))?;
        let currency = parts.next().map(|c| c.to_ascii_uppercase());
        if parts.next().is_some() {
            return Err(ParseMoneyError(value.to_string()));
        }
        Ok(Self {
            max_minor_units: parse_minor_units(amount)?,
            currency,
        })
    }

    pub fn allows(&self, price: &Money) -> bool {
        let currency_ok = self
            .currency
            .as_ref()
            .is_none_or(|currency| *currency == price.currency);
        currency_ok && price.minor_units <= self.max_minor_units
    }
}

impl fmt::Display for PriceLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = Money::new(self.max_minor_units, "");
        match &self.currency {
            Some(currency) => write!(f, "{} {}", amount.to_decimal_string(), currency),
            None => f.write_str(&amount.to_decimal_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amounts() {
        assert_eq!(Money::parse("12.34", "usd").unwrap(), Money::new(1234, "USD"));
        assert_eq!(Money::parse("7", "USD").unwrap().minor_units, 700);
        assert_eq!(Money::parse("7.5", "USD").unwrap().minor_units, 750);
        assert_eq!(Money::parse("19.9900", "USD").unwrap().minor_units, 1999);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("", "USD").is_err());
        assert!(Money::parse("-3.00", "USD").is_err());
        assert!(Money::parse("1.999", "USD").is_err());
        assert!(Money::parse("12,50", "USD").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(1205, "EUR").to_string(), "12.05 EUR");
    }

    #[test]
    fn test_price_limit() {
        let limit = PriceLimit::parse("40.00 usd").unwrap();
        assert!(limit.allows(&Money::new(4000, "USD")));
        assert!(!limit.allows(&Money::new(4001, "USD")));
        assert!(!limit.allows(&Money::new(1000, "EUR")));

        let any_currency = PriceLimit::parse("25").unwrap();
        assert!(any_currency.allows(&Money::new(2500, "GBP")));
        assert!(PriceLimit::parse("25 USD extra").is_err());
    }
}
