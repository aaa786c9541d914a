//! Single-letter facet on the first character of a sheet title.

use std::fmt;
use std::str::FromStr;

use crate::error::NyimboError;

/// An uppercase ASCII letter `A`-`Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Letter(char);

impl Letter {
    /// Build a letter, upper-casing ASCII lowercase input.
    pub fn new(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        upper.is_ascii_uppercase().then_some(Letter(upper))
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    /// The facet bar, `A` through `Z`.
    pub fn alphabet() -> impl Iterator<Item = Letter> {
        ('A'..='Z').map(Letter)
    }

    /// Whether `title` starts with this letter once its first character is
    /// upper-cased. An empty title starts with no letter, and a first
    /// character whose uppercase form is more than one character (`ß`)
    /// never equals a single letter.
    pub fn starts(&self, title: &str) -> bool {
        let Some(first) = title.chars().next() else {
            return false;
        };
        let mut upper = first.to_uppercase();
        upper.next() == Some(self.0) && upper.next().is_none()
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<char> for Letter {
    type Error = NyimboError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Letter::new(c).ok_or_else(|| NyimboError::InvalidLetter(c.to_string()))
    }
}

impl FromStr for Letter {
    type Err = NyimboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Letter::try_from(c).map_err(|_| NyimboError::InvalidLetter(s.into())),
            _ => Err(NyimboError::InvalidLetter(s.to_string())),
        }
    }
}
