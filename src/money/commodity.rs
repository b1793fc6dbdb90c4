//! Currencies, and how finely amounts in them can be divided.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

const ZERO_DECIMAL_CURRENCIES: [&str; 9] = [
    "CLP", "ISK", "JPY", "KRW", "PYG", "UGX", "VND", "XAF", "XOF",
];
const THREE_DECIMAL_CURRENCIES: [&str; 7] = ["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];
const MAX_MNEMONIC_LENGTH: usize = 10;

/// A currency that accounts and transactions are denominated in, e.g. "USD".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commodity {
    mnemonic: String,
    smallest_fraction: i64,
}

impl Commodity {
    /// Look up the commodity for a currency code such as "USD" or "jpy".
    ///
    /// The code is upper-cased. Most currencies have two decimal places, the
    /// exceptions follow ISO 4217.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidCurrencyCode] if `code` is
    /// empty, too long, or contains anything other than ASCII letters and digits.
    pub fn new(code: &str) -> Result<Self, Error> {
        let mnemonic = code.trim().to_ascii_uppercase();

        if mnemonic.is_empty()
            || mnemonic.len() > MAX_MNEMONIC_LENGTH
            || !mnemonic.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(Error::InvalidCurrencyCode(code.to_owned()));
        }

        let digits = if ZERO_DECIMAL_CURRENCIES.contains(&mnemonic.as_str()) {
            0
        } else if THREE_DECIMAL_CURRENCIES.contains(&mnemonic.as_str()) {
            3
        } else {
            2
        };

        Ok(Self {
            mnemonic,
            smallest_fraction: 10_i64.pow(digits),
        })
    }

    /// The US dollar.
    pub fn usd() -> Self {
        Self {
            mnemonic: "USD".to_owned(),
            smallest_fraction: 100,
        }
    }

    /// The currency code, e.g. "USD".
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// The number of smallest units in one whole unit, e.g. 100 cents in a dollar.
    pub fn smallest_fraction(&self) -> i64 {
        self.smallest_fraction
    }

    /// The number of decimal places amounts in this currency are rounded to.
    pub fn fraction_digits(&self) -> u32 {
        self.smallest_fraction.ilog10()
    }
}

impl Default for Commodity {
    fn default() -> Self {
        Self::usd()
    }
}

impl FromStr for Commodity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Commodity::new(s)
    }
}

impl Display for Commodity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic)
    }
}

impl ToSql for Commodity {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.mnemonic.as_str()))
    }
}

impl FromSql for Commodity {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Commodity::new(value.as_str()?).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod commodity_tests {
    use crate::{Commodity, Error};

    #[test]
    fn new_upper_cases_the_code() {
        let commodity = Commodity::new("usd").unwrap();

        assert_eq!(commodity.mnemonic(), "USD");
        assert_eq!(commodity, Commodity::usd());
    }

    #[test]
    fn most_currencies_have_two_decimal_places() {
        let commodity = Commodity::new("EUR").unwrap();

        assert_eq!(commodity.smallest_fraction(), 100);
        assert_eq!(commodity.fraction_digits(), 2);
    }

    #[test]
    fn yen_has_no_decimal_places() {
        let commodity = Commodity::new("JPY").unwrap();

        assert_eq!(commodity.smallest_fraction(), 1);
        assert_eq!(commodity.fraction_digits(), 0);
    }

    #[test]
    fn dinar_has_three_decimal_places() {
        let commodity = Commodity::new("KWD").unwrap();

        assert_eq!(commodity.smallest_fraction(), 1000);
    }

    #[test]
    fn new_fails_on_empty_code() {
        assert_eq!(
            Commodity::new(" "),
            Err(Error::InvalidCurrencyCode(" ".to_owned()))
        );
    }

    #[test]
    fn new_fails_on_punctuation() {
        assert_eq!(
            Commodity::new("US$"),
            Err(Error::InvalidCurrencyCode("US$".to_owned()))
        );
    }
}
