//! Revision addressing
//!
//! A revision names a journal prefix: revision `n` is the first `n + 1`
//! actions. Anything that is not a usable index means "the whole journal".

use serde::{Deserialize, Deserializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Revision {
    /// Replay every action
    #[default]
    Head,

    /// Replay actions `0..=n`
    Index(usize),
}

impl Revision {
    /// Number of journal actions this revision covers.
    pub fn prefix_len(self, journal_len: usize) -> usize {
        match self {
            Revision::Head => journal_len,
            Revision::Index(index) => index.saturating_add(1).min(journal_len),
        }
    }

    /// Lenient parse: surrounding whitespace is ignored, negative or
    /// non-numeric input falls back to [`Revision::Head`].
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map(Revision::from)
            .unwrap_or(Revision::Head)
    }
}

impl From<usize> for Revision {
    fn from(index: usize) -> Self {
        Revision::Index(index)
    }
}

impl From<i64> for Revision {
    fn from(index: i64) -> Self {
        usize::try_from(index)
            .map(Revision::Index)
            .unwrap_or(Revision::Head)
    }
}

impl FromStr for Revision {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Revision::parse(s))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Head => f.write_str("head"),
            Revision::Index(index) => write!(f, "{index}"),
        }
    }
}

impl<'de> Deserialize<'de> for Revision {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
            Null(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(index) => Revision::from(index),
            Raw::Float(index) if index.fract() == 0.0 && index >= 0.0 => {
                Revision::Index(index as usize)
            }
            Raw::Text(text) => Revision::parse(&text),
            Raw::Float(_) | Raw::Null(()) => Revision::Head,
        })
    }
}
