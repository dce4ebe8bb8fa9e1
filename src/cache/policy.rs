//! Expiry Policy Module
//!
//! Decides whether reads observe entries the reaper has not removed yet.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

/// How `get` treats an entry that is older than the TTL but still stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryPolicy {
    /// Entries stay readable until the reaper removes them.
    #[default]
    Relaxed,
    /// Entries older than the TTL read as a miss. Removal is still left to
    /// the reaper.
    Strict,
}

impl FromStr for ExpiryPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relaxed" => Ok(ExpiryPolicy::Relaxed),
            "strict" => Ok(ExpiryPolicy::Strict),
            _ => Err(ConfigError::InvalidValue {
                name: "EXPIRY_POLICY".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExpiryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryPolicy::Relaxed => f.write_str("relaxed"),
            ExpiryPolicy::Strict => f.write_str("strict"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!("relaxed".parse::<ExpiryPolicy>().unwrap(), ExpiryPolicy::Relaxed);
        assert_eq!(" Strict ".parse::<ExpiryPolicy>().unwrap(), ExpiryPolicy::Strict);
        assert!("lazy".parse::<ExpiryPolicy>().is_err());
    }

    #[test]
    fn test_policy_default_is_relaxed() {
        assert_eq!(ExpiryPolicy::default(), ExpiryPolicy::Relaxed);
    }
}
