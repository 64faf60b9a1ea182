//! Validated property identifiers.

use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// A property identifier such as `P227`.
///
/// Only `P` followed by a decimal number without leading zero is accepted, so
/// the value can be spliced into SPARQL text as a prefixed name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(String);

impl PropertyId {
    /// The identifier as text, e.g. `"P227"`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(value: &str) -> bool {
        let Some(digits) = value.strip_prefix('P') else {
            return false;
        };
        !digits.is_empty()
            && !digits.starts_with('0')
            && digits.bytes().all(|b| b.is_ascii_digit())
    }
}

impl FromStr for PropertyId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if Self::is_valid(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ConfigError::InvalidProperty {
                value: s.to_string(),
            })
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PropertyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_property_ids() {
        assert_eq!("P227".parse::<PropertyId>().unwrap().as_str(), "P227");
        assert_eq!(" P31 ".parse::<PropertyId>().unwrap().as_str(), "P31");
    }

    #[test]
    fn rejects_items_and_garbage() {
        for bad in ["Q42", "P", "P0", "P012", "p31", "P31 }", "P1a", ""] {
            assert!(bad.parse::<PropertyId>().is_err(), "{bad:?} should be rejected");
        }
    }
}
