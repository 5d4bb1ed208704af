//! Semester identifiers (`"YYYY-N"`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// Academic term within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// Regular term 1.
    First,
    /// Regular term 2.
    Second,
    /// Summer term 3 (relaxed credit bounds, no lab minimum).
    Summer,
}

impl Term {
    pub fn number(self) -> u8 {
        match self {
            Term::First => 1,
            Term::Second => 2,
            Term::Summer => 3,
        }
    }

    pub fn is_summer(self) -> bool {
        self == Term::Summer
    }
}

/// A semester such as `2024-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Semester {
    pub year: u16,
    pub term: Term,
}

impl Semester {
    pub fn new(year: u16, term: Term) -> Self {
        Self { year, term }
    }

    pub fn is_summer(&self) -> bool {
        self.term.is_summer()
    }
}

impl FromStr for Semester {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InputError::Semester {
            value: s.to_string(),
        };
        let (year, term) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 {
            return Err(err());
        }
        let year: u16 = year.parse().map_err(|_| err())?;
        let term = match term {
            "1" => Term::First,
            "2" => Term::Second,
            "3" => Term::Summer,
            _ => return Err(err()),
        };
        Ok(Self { year, term })
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{}", self.year, self.term.number())
    }
}

impl Serialize for Semester {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Semester {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
