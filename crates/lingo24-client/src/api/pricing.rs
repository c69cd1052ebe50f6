//! Monetary amounts and prices.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::http::HttpClient;

/// An amount with two decimal places, held as integer minor units.
///
/// Values arriving as JSON numbers are rounded to two places using
/// round-half-to-even on their shortest decimal representation, so `2.675`
/// becomes `2.68` and `0.125` becomes `0.12`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// From minor units (pence, cents).
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Whole major units.
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidArgument(format!("invalid amount: {s:?}"));

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac = fraction.as_bytes();
        let digit = |i: usize| frac.get(i).map_or(0, |b| i64::from(b - b'0'));
        let mut minor = whole
            .checked_mul(100)
            .and_then(|m| m.checked_add(digit(0) * 10 + digit(1)))
            .ok_or_else(invalid)?;

        let rest = frac.get(2..).unwrap_or_default();
        let round_up = match rest.first() {
            Some(b'6'..=b'9') => true,
            Some(b'5') => rest[1..].iter().any(|&b| b != b'0') || minor % 2 == 1,
            _ => false,
        };
        if round_up {
            minor = minor.checked_add(1).ok_or_else(invalid)?;
        }

        Ok(Self(if negative { -minor } else { minor }))
    }
}

impl TryFrom<f64> for Money {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidArgument(format!("invalid amount: {value}")));
        }
        format!("{value}").parse()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Money::try_from(value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

/// Net and gross amounts in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Price {
    pub currency_code: String,
    pub net: Money,
    pub gross: Money,
}

impl Price {
    pub fn new(currency_code: impl Into<String>, net: Money, gross: Money) -> Self {
        Self {
            currency_code: currency_code.into(),
            net,
            gross,
        }
    }

    /// Gross minus net.
    pub fn tax(&self) -> Money {
        self.gross - self.net
    }

    pub fn formatted_net(&self) -> String {
        self.format_amount(self.net)
    }

    pub fn formatted_gross(&self) -> String {
        self.format_amount(self.gross)
    }

    pub fn formatted_tax(&self) -> String {
        self.format_amount(self.tax())
    }

    /// Amount with the currency symbol, or `"<CODE> <amount>"` for
    /// currencies without one.
    pub fn format_amount(&self, amount: Money) -> String {
        match self.currency_code.as_str() {
            "GBP" => format!("£{amount}"),
            "USD" => format!("${amount}"),
            "EUR" => format!("€{amount}"),
            code => format!("{code} {amount}"),
        }
    }

    /// Sum of two prices in the same currency.
    pub fn checked_add(&self, other: &Price) -> Result<Price> {
        if self.currency_code != other.currency_code {
            return Err(Error::CurrencyMismatch {
                left: self.currency_code.clone(),
                right: other.currency_code.clone(),
            });
        }
        Ok(Price {
            currency_code: self.currency_code.clone(),
            net: self.net + other.net,
            gross: self.gross + other.gross,
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} net / {} gross",
            self.currency_code, self.net, self.gross
        )
    }
}

/// Price of a project or job, with and without discounts applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TotalPrice {
    pub total_with_discount: Price,
    pub total_without_discount: Price,
}

impl TotalPrice {
    pub fn checked_add(&self, other: &TotalPrice) -> Result<TotalPrice> {
        Ok(TotalPrice {
            total_with_discount: self
                .total_with_discount
                .checked_add(&other.total_with_discount)?,
            total_without_discount: self
                .total_without_discount
                .checked_add(&other.total_without_discount)?,
        })
    }
}

impl fmt::Display for TotalPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "without discount {} | with discount {}",
            self.total_without_discount, self.total_with_discount
        )
    }
}

/// `.../price` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceRecord {
    currency_code: String,
    total_wo_vat_w_discount: Money,
    total_w_vat_w_discount: Money,
    total_wo_vat_wo_discount: Money,
    total_w_vat_wo_discount: Money,
}

impl From<PriceRecord> for TotalPrice {
    fn from(record: PriceRecord) -> Self {
        TotalPrice {
            total_with_discount: Price::new(
                record.currency_code.clone(),
                record.total_wo_vat_w_discount,
                record.total_w_vat_w_discount,
            ),
            total_without_discount: Price::new(
                record.currency_code,
                record.total_wo_vat_wo_discount,
                record.total_w_vat_wo_discount,
            ),
        }
    }
}

/// GET `<item_path>/price`. `None` when the server has no price yet.
pub(crate) fn fetch_price(http: &HttpClient, item_path: &str) -> Result<Option<TotalPrice>> {
    match http.get_json::<PriceRecord>(&format!("{item_path}/price")) {
        Ok(record) => Ok(Some(record.into())),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
