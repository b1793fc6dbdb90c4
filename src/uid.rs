//! Unique identifiers for accounts, transactions and splits.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// A non-empty identifier that is unique across all records of a kind.
///
/// Generated identifiers are 32 lowercase hex characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Uid(String);

impl Uid {
    /// Create a UID from an existing identifier.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyUid] if `uid` is empty or only whitespace.
    pub fn new(uid: &str) -> Result<Self, Error> {
        let uid = uid.trim();

        if uid.is_empty() {
            Err(Error::EmptyUid)
        } else {
            Ok(Self(uid.to_owned()))
        }
    }

    /// Create a new, random UID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Create a UID without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(uid: &str) -> Self {
        Self(uid.to_owned())
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Uid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uid::new(s)
    }
}

impl Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for Uid {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for Uid {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        if text.is_empty() {
            Err(FromSqlError::Other(Box::new(Error::EmptyUid)))
        } else {
            Ok(Self(text.to_owned()))
        }
    }
}

#[cfg(test)]
mod uid_tests {
    use crate::{Error, Uid};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(Uid::new(""), Err(Error::EmptyUid));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(Uid::new(" \t\n"), Err(Error::EmptyUid));
    }

    #[test]
    fn new_accepts_short_identifiers() {
        let uid = Uid::new("123").unwrap();

        assert_eq!(uid.as_ref(), "123");
    }

    #[test]
    fn generated_uids_are_32_hex_characters() {
        let uid = Uid::generate();

        assert_eq!(uid.as_ref().len(), 32);
        assert!(uid.as_ref().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_uids_are_unique() {
        assert_ne!(Uid::generate(), Uid::generate());
    }
}
