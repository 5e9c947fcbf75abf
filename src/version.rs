// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Protocol version gates.
//!
//! Every option carries a [`Compatibility`]: either unconstrained or a
//! semver range. Commands evaluate the gate against the version they
//! target, never the version an option happened to be declared for.
//!
//! ```
//! use redisearch_protocol::version::{since, Compatibility};
//! use semver::Version;
//!
//! let dialect = since(2, 4, 3);
//! assert!(dialect.is_compatible(Some(&Version::new(2, 4, 3))));
//! assert!(!dialect.is_compatible(Some(&Version::new(2, 2, 0))));
//! // No version known yet: nothing is filtered
//! assert!(dialect.is_compatible(None));
//! ```

use semver::{BuildMetadata, Comparator, Op, Prerelease, Version, VersionReq};

use crate::error::{Error, Result};

/// Version range an option is valid for. `None` means any version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compatibility(Option<VersionReq>);

impl Compatibility {
    /// Unconstrained.
    pub const fn any() -> Self {
        Self(None)
    }

    /// Constrained by an arbitrary semver requirement (e.g. `">=2.0.0, <2.4.0"`).
    pub fn parse(requirement: &str) -> Result<Self> {
        VersionReq::parse(requirement)
            .map(|req| Self(Some(req)))
            .map_err(|e| Error::InvalidVersion {
                version: requirement.to_string(),
                reason: e.to_string(),
            })
    }

    /// Adds an upper bound (exclusive) to this gate.
    #[must_use]
    pub fn until(self, major: u64, minor: u64, patch: u64) -> Self {
        let mut comparators = self.0.map(|req| req.comparators).unwrap_or_default();
        comparators.push(comparator(Op::Less, major, minor, patch));
        Self(Some(VersionReq { comparators }))
    }

    /// `true` when `version` is absent or satisfies the range.
    pub fn is_compatible(&self, version: Option<&Version>) -> bool {
        match (&self.0, version) {
            (None, _) | (_, None) => true,
            (Some(req), Some(version)) => req.matches(&strip_pre(version)),
        }
    }

    pub fn requirement(&self) -> Option<&VersionReq> {
        self.0.as_ref()
    }
}

/// `>= major.minor.patch`
pub fn since(major: u64, minor: u64, patch: u64) -> Compatibility {
    Compatibility(Some(VersionReq {
        comparators: vec![comparator(Op::GreaterEq, major, minor, patch)],
    }))
}

fn comparator(op: Op, major: u64, minor: u64, patch: u64) -> Comparator {
    Comparator {
        op,
        major,
        minor: Some(minor),
        patch: Some(patch),
        pre: Prerelease::EMPTY,
    }
}

// Pre-release tags on server builds should not hide them from every range.
fn strip_pre(version: &Version) -> Version {
    if version.pre.is_empty() {
        version.clone()
    } else {
        Version {
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
            ..version.clone()
        }
    }
}

/// Parse a protocol version, accepting the short `2.4` form.
pub fn parse_version(text: &str) -> Result<Version> {
    let trimmed = text.trim();
    let padded = match trimmed.split('.').count() {
        1 => format!("{}.0.0", trimmed),
        2 => format!("{}.0", trimmed),
        _ => trimmed.to_string(),
    };
    Version::parse(&padded).map_err(|e| Error::InvalidVersion {
        version: text.to_string(),
        reason: e.to_string(),
    })
}

/// Decode the integer module version reported by `MODULE LIST` (`20403` → `2.4.3`).
pub fn from_module_version(encoded: i64) -> Result<Version> {
    if encoded < 0 {
        return Err(Error::InvalidVersion {
            version: encoded.to_string(),
            reason: "negative module version".to_string(),
        });
    }
    let encoded = encoded as u64;
    Ok(Version::new(encoded / 10_000, (encoded / 100) % 100, encoded % 100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_accepts_everything() {
        let gate = Compatibility::any();
        assert!(gate.is_compatible(Some(&Version::new(0, 1, 0))));
        assert!(gate.is_compatible(None));
    }

    #[test]
    fn test_since_and_until() {
        let gate = since(2, 0, 0).until(2, 4, 0);
        assert!(gate.is_compatible(Some(&Version::new(2, 2, 5))));
        assert!(!gate.is_compatible(Some(&Version::new(2, 4, 0))));
        assert!(!gate.is_compatible(Some(&Version::new(1, 6, 0))));
    }

    #[test]
    fn test_parse_requirement() {
        let gate = Compatibility::parse(">=2.2.0").unwrap();
        assert!(gate.is_compatible(Some(&Version::new(2, 2, 0))));
        assert!(Compatibility::parse("not a range").is_err());
    }

    #[test]
    fn test_prerelease_server_matches() {
        let gate = since(2, 4, 0);
        let version = Version::parse("2.4.0-rc1").unwrap();
        assert!(gate.is_compatible(Some(&version)));
    }

    #[test]
    fn test_parse_short_versions() {
        assert_eq!(parse_version("2.4").unwrap(), Version::new(2, 4, 0));
        assert_eq!(parse_version("2").unwrap(), Version::new(2, 0, 0));
        assert_eq!(parse_version(" 2.6.12 ").unwrap(), Version::new(2, 6, 12));
        assert!(parse_version("x.y").is_err());
    }

    #[test]
    fn test_module_version() {
        assert_eq!(from_module_version(20403).unwrap(), Version::new(2, 4, 3));
        assert_eq!(from_module_version(20813).unwrap(), Version::new(2, 8, 13));
        assert!(from_module_version(-1).is_err());
    }
}
