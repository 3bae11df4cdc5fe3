//! Server version parsing and capability detection.
//!
//! The processor to use for a filter depends on which REST API generation the
//! connected server speaks. That is derived here from the version string the
//! server reports, e.g. `21.0.1-SNAPSHOT` (Horizon) or `2018.1.4` (Meridian).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// OpenNMS product line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerType {
    #[default]
    Horizon,
    Meridian,
}

impl ServerType {
    /// Guess the product line from a version: Meridian releases are numbered by year.
    pub fn detect(version: &ServerVersion) -> ServerType {
        if version.major() >= 2000 {
            ServerType::Meridian
        } else {
            ServerType::Horizon
        }
    }
}

impl FromStr for ServerType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizon" => Ok(ServerType::Horizon),
            "meridian" => Ok(ServerType::Meridian),
            other => Err(Error::Config(format!("Unknown server type: {}", other))),
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerType::Horizon => write!(f, "horizon"),
            ServerType::Meridian => write!(f, "meridian"),
        }
    }
}

/// A server version. Missing minor/patch components are treated as zero and
/// any `-qualifier` is kept but ignored when comparing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerVersion {
    raw: String,
    version: semver::Version,
}

/// Characters semver rejects in a qualifier become `-`. A qualifier that
/// still does not parse is dropped.
fn prerelease(qualifier: &str) -> semver::Prerelease {
    let normalized: String = qualifier
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '-' })
        .collect();
    semver::Prerelease::new(&normalized).unwrap_or_else(|_| {
        tracing::debug!(qualifier, "dropping unrepresentable version qualifier");
        semver::Prerelease::EMPTY
    })
}

impl ServerVersion {
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim();
        let (numbers, qualifier) = match raw.split_once('-') {
            Some((numbers, qualifier)) => (numbers, Some(qualifier)),
            None => (raw, None),
        };

        let parts: Vec<&str> = numbers.split('.').collect();
        if numbers.is_empty() || parts.len() > 3 {
            return Err(Error::InvalidVersion(input.to_string()));
        }
        let mut triple = [0u64; 3];
        for (slot, part) in triple.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::InvalidVersion(input.to_string()));
            }
            *slot = part
                .parse()
                .map_err(|e| Error::InvalidVersion(format!("{}: {}", input, e)))?;
        }

        let mut version = semver::Version::new(triple[0], triple[1], triple[2]);
        if let Some(qualifier) = qualifier.filter(|q| !q.is_empty()) {
            version.pre = prerelease(qualifier);
        }

        Ok(Self {
            raw: raw.to_string(),
            version,
        })
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    pub fn patch(&self) -> u64 {
        self.version.patch
    }

    pub fn qualifier(&self) -> Option<&str> {
        if self.version.pre.is_empty() {
            None
        } else {
            Some(self.version.pre.as_str())
        }
    }

    /// `major.minor.patch` without the qualifier.
    pub fn triple(&self) -> (u64, u64, u64) {
        (self.version.major, self.version.minor, self.version.patch)
    }

    /// True if this version is at least `major.minor.patch`.
    pub fn ge(&self, major: u64, minor: u64, patch: u64) -> bool {
        self.triple() >= (major, minor, patch)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for ServerVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ServerVersion::parse(s)
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// REST API generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// `/opennms/rest`, flat query parameters.
    V1,
    /// `/opennms/api/v2`, FIQL search expressions.
    V2,
}

impl ApiVersion {
    pub fn number(&self) -> u8 {
        match self {
            ApiVersion::V1 => 1,
            ApiVersion::V2 => 2,
        }
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches(['v', 'V']) {
            "1" => Ok(ApiVersion::V1),
            "2" => Ok(ApiVersion::V2),
            other => Err(Error::Config(format!("Unknown API version: {}", other))),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// What the client knows about a connected server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerMetadata {
    pub version: ServerVersion,
    pub server_type: ServerType,
}

impl ServerMetadata {
    pub fn new(version: ServerVersion, server_type: ServerType) -> Self {
        Self {
            version,
            server_type,
        }
    }

    /// Parse a version string, detecting the product line from its numbering.
    pub fn from_version(version: &str) -> Result<Self> {
        let version = ServerVersion::parse(version)?;
        let server_type = ServerType::detect(&version);
        Ok(Self::new(version, server_type))
    }

    /// The Horizon release whose REST API this server matches.
    fn horizon_equivalent(&self) -> (u64, u64, u64) {
        match self.server_type {
            ServerType::Horizon => self.version.triple(),
            ServerType::Meridian => match self.version.major() {
                0..=2014 => (16, 0, 0),
                2015 | 2016 => (17, 0, 0),
                2017 => (19, 0, 0),
                _ => (21, 0, 0),
            },
        }
    }

    fn at_least(&self, major: u64) -> bool {
        self.horizon_equivalent() >= (major, 0, 0)
    }

    pub fn api_version(&self) -> ApiVersion {
        if self.at_least(21) {
            ApiVersion::V2
        } else {
            ApiVersion::V1
        }
    }

    /// Alarm acknowledgement through the v2 ack endpoints.
    pub fn ack_flow_api(&self) -> bool {
        self.at_least(21)
    }

    pub fn graphs(&self) -> bool {
        self.at_least(15)
    }

    pub fn outage_summaries(&self) -> bool {
        self.at_least(14)
    }

    pub fn set_node_location(&self) -> bool {
        self.at_least(20)
    }

    pub fn tickets(&self) -> bool {
        self.at_least(17)
    }

    /// JSON rather than XML responses.
    pub fn use_json(&self) -> bool {
        self.at_least(19)
    }

    pub fn identity(&self, url: &str) -> ServerIdentity {
        ServerIdentity {
            url: url.trim_end_matches('/').to_string(),
            version: self.version.as_str().to_string(),
            server_type: self.server_type,
        }
    }
}

/// Identifies one connected server. Metadata that differs between server
/// versions is cached under this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerIdentity {
    pub url: String,
    pub version: String,
    pub server_type: ServerType,
}

impl fmt::Display for ServerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.url, self.server_type, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_version() {
        let v = ServerVersion::parse("21.0.1").unwrap();
        assert_eq!(v.triple(), (21, 0, 1));
        assert_eq!(v.qualifier(), None);
        assert_eq!(v.to_string(), "21.0.1");
    }

    #[test]
    fn test_parse_pads_missing_components() {
        assert_eq!(ServerVersion::parse("19").unwrap().triple(), (19, 0, 0));
        assert_eq!(ServerVersion::parse("19.1").unwrap().triple(), (19, 1, 0));
    }

    #[test]
    fn test_snapshot_compares_as_release() {
        let v = ServerVersion::parse("21.0.0-SNAPSHOT").unwrap();
        assert_eq!(v.qualifier(), Some("SNAPSHOT"));
        assert!(v.ge(21, 0, 0));
        assert!(!v.ge(21, 0, 1));
    }

    #[test]
    fn test_parse_accepts_leading_zeros() {
        let v = ServerVersion::parse("2019.01.0").unwrap();
        assert_eq!(v.triple(), (2019, 1, 0));
        assert_eq!(v.to_string(), "2019.01.0");
        assert_eq!(ServerMetadata::from_version("2019.01.0").unwrap().server_type, ServerType::Meridian);
    }

    #[test]
    fn test_parse_tolerates_odd_qualifiers() {
        let v = ServerVersion::parse("26.0.0-rc_1").unwrap();
        assert_eq!(v.triple(), (26, 0, 0));
        assert_eq!(v.qualifier(), Some("rc-1"));

        let v = ServerVersion::parse("26.0.0-rc..1").unwrap();
        assert_eq!(v.qualifier(), None);
        assert!(v.ge(26, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ServerVersion::parse("").is_err());
        assert!(ServerVersion::parse("abc").is_err());
        assert!(ServerVersion::parse("1.2.3.4").is_err());
        assert!(ServerVersion::parse("1..2").is_err());
        assert!(ServerVersion::parse("+1.0").is_err());
    }

    #[test]
    fn test_horizon_capabilities() {
        let old = ServerMetadata::from_version("18.0.4").unwrap();
        assert_eq!(old.server_type, ServerType::Horizon);
        assert_eq!(old.api_version(), ApiVersion::V1);
        assert!(!old.use_json());
        assert!(old.tickets());
        assert!(old.graphs());
        assert!(!old.set_node_location());

        let v20 = ServerMetadata::from_version("20.1.0").unwrap();
        assert_eq!(v20.api_version(), ApiVersion::V1);
        assert!(v20.set_node_location());
        assert!(!v20.ack_flow_api());

        let v21 = ServerMetadata::from_version("21.0.0").unwrap();
        assert_eq!(v21.api_version(), ApiVersion::V2);
        assert!(v21.ack_flow_api());
    }

    #[test]
    fn test_meridian_capabilities() {
        let m2017 = ServerMetadata::from_version("2017.1.3").unwrap();
        assert_eq!(m2017.server_type, ServerType::Meridian);
        assert_eq!(m2017.api_version(), ApiVersion::V1);
        assert!(m2017.use_json());

        let m2018 = ServerMetadata::from_version("2018.1.0").unwrap();
        assert_eq!(m2018.api_version(), ApiVersion::V2);
    }

    #[test]
    fn test_api_version_from_str() {
        assert_eq!("1".parse::<ApiVersion>().unwrap(), ApiVersion::V1);
        assert_eq!("v2".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
        assert!("3".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_identity_normalizes_url() {
        let meta = ServerMetadata::from_version("21.0.0").unwrap();
        let a = meta.identity("http://localhost:8980/opennms/");
        let b = meta.identity("http://localhost:8980/opennms");
        assert_eq!(a, b);
    }
}
