use bigdecimal::{BigDecimal, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

pub const DEFAULT_CURRENCY: &str = "KES";
pub const DEFAULT_TAX_RATE_PERCENT: f64 = 16.0;
pub const MAX_TAX_RATE_PERCENT: f64 = 30.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MoneyError {
    #[error("tax rate {0}% outside allowed range 0-30%")]
    TaxRateOutOfRange(f64),
    #[error("invalid monetary amount: {0}")]
    InvalidAmount(String),
}

/// Normalize a monetary value to 2 decimal places, rounding half away from zero.
/// `with_scale` alone truncates, so the half-cent is added first.
pub fn normalize_scale(value: &BigDecimal) -> BigDecimal {
    let half_cent = BigDecimal::from(5) / BigDecimal::from(1000);
    if value.is_negative() {
        (value - half_cent).with_scale(2)
    } else {
        (value + half_cent).with_scale(2)
    }
}

/// Two-decimal monetary amount. Totally ordered so it can key a sort directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "BigDecimal")]
pub struct Money(BigDecimal);

impl Money {
    pub fn new(raw: BigDecimal) -> Self {
        Self(normalize_scale(&raw))
    }

    pub fn zero() -> Self {
        Self::from_cents(0)
    }

    pub fn from_cents(cents: i64) -> Self {
        Self::new(BigDecimal::from(cents) / BigDecimal::from(100))
    }

    pub fn inner(&self) -> &BigDecimal {
        &self.0
    }

    pub fn as_cents(&self) -> i64 {
        (&self.0 * BigDecimal::from(100)).with_scale(0).to_i64().unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn times(&self, quantity: i64) -> Money {
        Money::new(&self.0 * BigDecimal::from(quantity))
    }

    /// Mean over `count` items; zero when there are none.
    pub fn average_over(&self, count: usize) -> Money {
        if count == 0 {
            return Money::zero();
        }
        Money::new(&self.0 / BigDecimal::from(count as u64))
    }
}

impl From<BigDecimal> for Money {
    fn from(value: BigDecimal) -> Self {
        Self::new(value)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(s.trim())
            .map(Money::new)
            .map_err(|_| MoneyError::InvalidAmount(s.to_string()))
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money::new(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Money> for Money {
    type Output = Money;
    fn add(self, rhs: &'a Money) -> Money {
        Money::new(self.0 + &rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.with_scale(2))
    }
}

/// Render as `"KES 1,234.50"`.
pub fn format_amount(amount: &Money, currency: &str) -> String {
    let plain = amount.to_string();
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{currency} {sign}{grouped}.{frac}")
}

/// Sales tax percentage, 0 to 30 inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct TaxRate {
    percent: BigDecimal,
}

impl TaxRate {
    pub fn from_percent(percent: f64) -> Result<Self, MoneyError> {
        if !percent.is_finite() || !(0.0..=MAX_TAX_RATE_PERCENT).contains(&percent) {
            return Err(MoneyError::TaxRateOutOfRange(percent));
        }
        // Go through the shortest decimal text so 16.1 stays 16.1 rather than its binary neighbour.
        let percent = BigDecimal::from_str(&percent.to_string())
            .map_err(|_| MoneyError::TaxRateOutOfRange(percent))?;
        Ok(Self { percent })
    }

    pub fn percent(&self) -> f64 {
        self.percent.to_string().parse().unwrap_or(0.0)
    }

    pub fn tax_on(&self, subtotal: &Money) -> Money {
        Money::new(subtotal.inner() * &self.percent / BigDecimal::from(100))
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        let percent = BigDecimal::from_str(&DEFAULT_TAX_RATE_PERCENT.to_string()).unwrap_or_else(|_| BigDecimal::zero());
        Self { percent }
    }
}

impl From<TaxRate> for f64 {
    fn from(rate: TaxRate) -> f64 {
        rate.percent()
    }
}

impl TryFrom<f64> for TaxRate {
    type Error = MoneyError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        TaxRate::from_percent(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub tax_rate: TaxRate,
    pub tax_amount: Money,
    pub total: Money,
}

impl CartTotals {
    pub fn compute<'a, I>(line_totals: I, tax_rate: &TaxRate) -> Self
    where
        I: IntoIterator<Item = &'a Money>,
    {
        let subtotal: Money = line_totals.into_iter().sum();
        let tax_amount = tax_rate.tax_on(&subtotal);
        let total = subtotal.clone() + &tax_amount;
        tracing::debug!(subtotal = %subtotal, tax = %tax_amount, total = %total, "cart totals computed");
        Self { subtotal, tax_rate: tax_rate.clone(), tax_amount, total }
    }
}
