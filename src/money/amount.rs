//! Decimal amounts of money tied to a currency.

use std::{fmt::Display, ops::Neg, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{Error, money::Commodity};

/// An amount of money in a specific currency.
///
/// Amounts are always rounded to the number of decimal places of the currency
/// using banker's rounding, so `Money::new("0.125", "USD")` is 0.12 USD.
///
/// Arithmetic between amounts in different currencies is an error rather
/// than a silent conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    commodity: Commodity,
}

impl Money {
    /// Parse `amount` as a decimal number of `currency_code` units.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::InvalidAmount] if `amount` is not a decimal number,
    /// - or [Error::InvalidCurrencyCode] if `currency_code` is not valid.
    pub fn new(amount: &str, currency_code: &str) -> Result<Self, Error> {
        let commodity = Commodity::new(currency_code)?;
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| Error::InvalidAmount(amount.to_owned()))?;

        Ok(Self::from_decimal(amount, commodity))
    }

    /// Create an amount from a decimal, rounding it to the currency's precision.
    pub fn from_decimal(amount: Decimal, commodity: Commodity) -> Self {
        let amount = amount.round_dp_with_strategy(
            commodity.fraction_digits(),
            RoundingStrategy::MidpointNearestEven,
        );

        Self { amount, commodity }
    }

    /// Create an amount from the fraction `numerator / denominator`.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidAmount] if `denominator` is zero.
    pub fn from_fraction(
        numerator: i64,
        denominator: i64,
        commodity: Commodity,
    ) -> Result<Self, Error> {
        let amount = Decimal::from(numerator)
            .checked_div(Decimal::from(denominator))
            .ok_or_else(|| Error::InvalidAmount(format!("{numerator}/{denominator}")))?;

        Ok(Self::from_decimal(amount, commodity))
    }

    /// Zero in the currency `commodity`.
    pub fn zero(commodity: Commodity) -> Self {
        Self {
            amount: Decimal::ZERO,
            commodity,
        }
    }

    /// The decimal amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency of the amount.
    pub fn commodity(&self) -> &Commodity {
        &self.commodity
    }

    /// The amount expressed as a whole number of the currency's smallest unit,
    /// e.g. cents for USD.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::AmountOverflow] if the result does
    /// not fit in an `i64`.
    pub fn numerator(&self) -> Result<i64, Error> {
        self.amount
            .checked_mul(Decimal::from(self.denominator()))
            .and_then(|scaled| scaled.trunc().to_i64())
            .ok_or_else(|| Error::AmountOverflow(self.to_string()))
    }

    /// The denominator for [Money::numerator], i.e. the currency's smallest fraction.
    pub fn denominator(&self) -> i64 {
        self.commodity.smallest_fraction()
    }

    /// Add `other` to this amount.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::CurrencyMismatch] if the amounts are in different currencies,
    /// - or [Error::AmountOverflow] if the sum is too large to represent.
    pub fn checked_add(&self, other: &Money) -> Result<Money, Error> {
        self.ensure_same_commodity(other)?;

        let sum = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| Error::AmountOverflow(format!("{self} + {other}")))?;

        Ok(Self::from_decimal(sum, self.commodity.clone()))
    }

    /// Subtract `other` from this amount.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::CurrencyMismatch] if the amounts are in different currencies,
    /// - or [Error::AmountOverflow] if the difference is too large to represent.
    pub fn checked_sub(&self, other: &Money) -> Result<Money, Error> {
        self.ensure_same_commodity(other)?;

        let difference = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| Error::AmountOverflow(format!("{self} - {other}")))?;

        Ok(Self::from_decimal(difference, self.commodity.clone()))
    }

    /// Multiply the amount by `factor`, e.g. an exchange rate or a share count.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::AmountOverflow] if the product is
    /// too large to represent.
    pub fn multiply(&self, factor: Decimal) -> Result<Money, Error> {
        let product = self
            .amount
            .checked_mul(factor)
            .ok_or_else(|| Error::AmountOverflow(format!("{self} * {factor}")))?;

        Ok(Self::from_decimal(product, self.commodity.clone()))
    }

    /// The absolute value of the amount.
    pub fn abs(&self) -> Money {
        Self {
            amount: self.amount.abs(),
            commodity: self.commodity.clone(),
        }
    }

    /// Whether the amount is less than zero.
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    fn ensure_same_commodity(&self, other: &Money) -> Result<(), Error> {
        if self.commodity == other.commodity {
            Ok(())
        } else {
            Err(Error::CurrencyMismatch {
                expected: self.commodity.mnemonic().to_owned(),
                found: other.commodity.mnemonic().to_owned(),
            })
        }
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Self {
            amount: -self.amount,
            commodity: self.commodity,
        }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut amount = self.amount;
        amount.rescale(self.commodity.fraction_digits());

        write!(f, "{} {}", amount, self.commodity)
    }
}
