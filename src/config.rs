//! Configuration Module
//!
//! Parses the cache time-to-live from user-facing unit/magnitude pairs and
//! loads the proxy settings from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::ExpiryPolicy;
use crate::error::ConfigError;

// == TTL Unit ==
/// Unit a cache time-to-live is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlUnit {
    Second,
    Minute,
    Hour,
}

impl TtlUnit {
    /// Length of one unit.
    pub fn as_duration(self) -> Duration {
        match self {
            TtlUnit::Second => Duration::from_secs(1),
            TtlUnit::Minute => Duration::from_secs(60),
            TtlUnit::Hour => Duration::from_secs(60 * 60),
        }
    }
}

impl FromStr for TtlUnit {
    type Err = ConfigError;

    /// Accepts the singular, plural or first letter of each unit, ignoring
    /// case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "" => Err(ConfigError::EmptyUnit),
            "second" | "seconds" | "s" => Ok(TtlUnit::Second),
            "minute" | "minutes" | "m" => Ok(TtlUnit::Minute),
            "hour" | "hours" | "h" => Ok(TtlUnit::Hour),
            _ => Err(ConfigError::UnknownUnit(s.trim().to_string())),
        }
    }
}

impl fmt::Display for TtlUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TtlUnit::Second => "second",
            TtlUnit::Minute => "minute",
            TtlUnit::Hour => "hour",
        };
        f.write_str(name)
    }
}

// == TTL Settings ==
/// A validated `(unit, magnitude)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlSettings {
    pub unit: TtlUnit,
    pub magnitude: u32,
}

impl TtlSettings {
    /// Validates a raw unit string and magnitude.
    ///
    /// # Errors
    /// - `EmptyUnit` / `UnknownUnit` for a bad unit
    /// - `NonPositiveMagnitude` when `magnitude <= 0`
    /// - `Overflow` when the product does not fit
    pub fn parse(unit: &str, magnitude: i64) -> Result<Self, ConfigError> {
        let unit: TtlUnit = unit.parse()?;
        if magnitude <= 0 {
            return Err(ConfigError::NonPositiveMagnitude(magnitude));
        }
        let magnitude = u32::try_from(magnitude).map_err(|_| ConfigError::Overflow {
            unit: unit.to_string(),
            magnitude,
        })?;
        Ok(Self { unit, magnitude })
    }

    /// Total time-to-live.
    pub fn ttl(&self) -> Duration {
        self.unit.as_duration() * self.magnitude
    }
}

impl fmt::Display for TtlSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.magnitude == 1 { "" } else { "s" };
        write!(f, "{} {}{}", self.magnitude, self.unit, plural)
    }
}

// == Config ==
/// Proxy configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache time-to-live, also the reclamation period
    pub ttl: TtlSettings,
    /// Whether `get` hides entries that outlived the TTL
    pub expiry_policy: ExpiryPolicy,
    /// HTTP server port
    pub server_port: u16,
    /// Base URL requests are forwarded to
    pub upstream_base_url: String,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_UNIT` - second, minute or hour (default: second)
    /// - `CACHE_TTL` - positive number of units (default: 30)
    /// - `EXPIRY_POLICY` - relaxed or strict (default: relaxed)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_BASE_URL` - default: https://pokeapi.co/api/v2
    /// - `UPSTREAM_TIMEOUT` - seconds (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`] but reads values through `lookup`.
    ///
    /// Cache settings that are present but invalid are rejected; server
    /// settings fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let unit = lookup("CACHE_TTL_UNIT").unwrap_or_else(|| defaults.ttl.unit.to_string());
        let magnitude = match lookup("CACHE_TTL") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "CACHE_TTL".to_string(),
                    value: raw.clone(),
                })?,
            None => i64::from(defaults.ttl.magnitude),
        };
        let ttl = TtlSettings::parse(&unit, magnitude)?;

        let expiry_policy = match lookup("EXPIRY_POLICY") {
            Some(raw) => raw.parse()?,
            None => defaults.expiry_policy,
        };

        Ok(Self {
            ttl,
            expiry_policy,
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            upstream_base_url: lookup("UPSTREAM_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout: lookup("UPSTREAM_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.upstream_timeout),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl: TtlSettings {
                unit: TtlUnit::Second,
                magnitude: 30,
            },
            expiry_policy: ExpiryPolicy::Relaxed,
            server_port: 3000,
            upstream_base_url: "https://pokeapi.co/api/v2".to_string(),
            upstream_timeout: 10,
        }
    }
}
