//! Package identity and the cache file naming scheme
//!
//! A cached artifact's file name is the only metadata the cache keeps:
//! `<package_id>-<major>.<minor>.<patch>`, lower-cased on write.

use crate::error::{StashError, StashResult};
use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dot-separated id, a dash, then three dot-separated integers
static FILE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<id>[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)*)-(?P<major>[0-9]+)\.(?P<minor>[0-9]+)\.(?P<patch>[0-9]+)$",
    )
    .expect("file name pattern is valid")
});

static PACKAGE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)*$").expect("package id pattern is valid")
});

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<major>[0-9]+)\.(?P<minor>[0-9]+)\.(?P<patch>[0-9]+)$")
        .expect("version pattern is valid")
});

/// A (package id, version) pair naming one cached artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Package id, may contain dots (e.g. `publisher.tool`)
    pub package_id: String,
    /// Strict MAJOR.MINOR.PATCH version
    pub version: Version,
}

impl Identity {
    /// Create an identity from a package id and version components
    pub fn new(
        package_id: impl Into<String>,
        major: u64,
        minor: u64,
        patch: u64,
    ) -> StashResult<Self> {
        let package_id = package_id.into();
        if !PACKAGE_ID_RE.is_match(&package_id) {
            return Err(StashError::invalid_identity(
                package_id,
                "package id must be dot-separated segments of letters, digits, '_' or '-'",
            ));
        }

        Ok(Self {
            package_id,
            version: Version::new(major, minor, patch),
        })
    }

    /// Create an identity from a package id and a `MAJOR.MINOR.PATCH` string
    pub fn parse(package_id: impl Into<String>, version: &str) -> StashResult<Self> {
        let (major, minor, patch) = parse_version(version).ok_or_else(|| {
            StashError::invalid_identity(version, "version must be MAJOR.MINOR.PATCH")
        })?;
        Self::new(package_id, major, minor, patch)
    }

    /// Canonical on-disk name, always lower-cased
    pub fn file_name(&self) -> String {
        self.to_string().to_lowercase()
    }

    /// Parse a cache file name back into an identity
    ///
    /// Returns `None` for anything this cache did not write.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let caps = FILE_NAME_RE.captures(name)?;
        let major = caps["major"].parse().ok()?;
        let minor = caps["minor"].parse().ok()?;
        let patch = caps["patch"].parse().ok()?;

        Some(Self {
            package_id: caps["id"].to_string(),
            version: Version::new(major, minor, patch),
        })
    }
}

fn parse_version(s: &str) -> Option<(u64, u64, u64)> {
    let caps = VERSION_RE.captures(s)?;
    Some((
        caps["major"].parse().ok()?,
        caps["minor"].parse().ok()?,
        caps["patch"].parse().ok()?,
    ))
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}.{}.{}",
            self.package_id, self.version.major, self.version.minor, self.version.patch
        )
    }
}

impl FromStr for Identity {
    type Err = StashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_file_name(s).ok_or_else(|| {
            StashError::invalid_identity(s, "expected <package>-<MAJOR.MINOR.PATCH>")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_roundtrip() {
        for (id, v) in [
            ("serde", (1, 0, 219)),
            ("ms-python.python", (2023, 10, 1)),
            ("a.b.c", (0, 0, 1)),
        ] {
            let identity = Identity::new(id, v.0, v.1, v.2).unwrap();
            let parsed = Identity::from_file_name(&identity.file_name());
            assert_eq!(parsed, Some(identity));
        }
    }

    #[test]
    fn file_name_is_lowercased() {
        let identity = Identity::new("Publisher.Tool", 1, 2, 3).unwrap();
        assert_eq!(identity.file_name(), "publisher.tool-1.2.3");
        assert_eq!(identity.to_string(), "Publisher.Tool-1.2.3");
    }

    #[test]
    fn dash_in_id_splits_at_last_version() {
        let parsed = Identity::from_file_name("foo-bar-1.2.3").unwrap();
        assert_eq!(parsed.package_id, "foo-bar");
        assert_eq!(parsed.version, Version::new(1, 2, 3));
    }

    #[test]
    fn unrecognized_names_parse_to_none() {
        for name in [
            "foo",
            "foo-",
            "foo-1.2",
            "foo-1.2.x",
            "foo-v1.2.3",
            "-1.2.3",
            "1.2.3",
            "foo-1.2.3.partial",
            ".foo-1.2.3.5f1c.partial",
            "foo-1.2.3-beta",
            "foo..bar-1.2.3",
            "foo-99999999999999999999999.0.0",
        ] {
            assert_eq!(Identity::from_file_name(name), None, "{name}");
        }
    }

    #[test]
    fn parse_strict_version() {
        let identity = Identity::parse("tool", "3.14.15").unwrap();
        assert_eq!(identity.version, Version::new(3, 14, 15));

        assert!(Identity::parse("tool", "3.14").is_err());
        assert!(Identity::parse("tool", "3.14.15-rc.1").is_err());
        assert!(Identity::parse("tool", " 3.14.15").is_err());
    }

    #[test]
    fn rejects_unsafe_package_ids() {
        assert!(Identity::new("", 1, 0, 0).is_err());
        assert!(Identity::new("../escape", 1, 0, 0).is_err());
        assert!(Identity::new("a/b", 1, 0, 0).is_err());
        assert!(Identity::new("has space", 1, 0, 0).is_err());
    }

    #[test]
    fn from_str_matches_display() {
        let identity: Identity = "publisher.tool-0.9.1".parse().unwrap();
        assert_eq!(identity.package_id, "publisher.tool");
        assert_eq!(identity.to_string(), "publisher.tool-0.9.1");
        assert!("nope".parse::<Identity>().is_err());
    }
}
