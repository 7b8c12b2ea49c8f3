//! NuGet v2 version normalization
//!
//! Upstream version strings carry 1-4 numeric segments, optionally a fourth
//! "revision" segment (.NET assembly versions) or a `-` prerelease suffix.
//! [`normalize`] maps each of them onto exactly one [`semver::Version`] so
//! every record participates in one total order:
//!
//! - "2"        -> 2.0.0
//! - "1.2"      -> 1.2.0
//! - "6.2.1.0"  -> 6.2.1+0 (revision re-encoded as build metadata)
//! - "1.2-beta" -> 1.2.0-beta
//!
//! The mapping is deterministic; leading zeros per segment are dropped by
//! integer parsing.

use std::cmp::Ordering;

use semver::{BuildMetadata, Prerelease, Version};

use crate::registration::error::MalformedVersion;

/// Parse an upstream version string into a semver `Version`, normalizing the
/// segment count and re-encoding a 4th revision segment as build metadata.
pub fn normalize(raw: &str) -> Result<Version, MalformedVersion> {
    let malformed = |reason: &str| MalformedVersion {
        raw: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(malformed("empty version string"));
    }

    let (numeric, prerelease) = match trimmed.split_once('-') {
        Some((numeric, suffix)) => (numeric, Some(suffix)),
        None => (trimmed, None),
    };

    let segments = numeric
        .split('.')
        .map(|segment| {
            segment
                .parse::<u64>()
                .map_err(|_| malformed(&format!("segment '{segment}' is not a number")))
        })
        .collect::<Result<Vec<u64>, MalformedVersion>>()?;

    let (major, minor, patch, revision) = match segments[..] {
        [major] => (major, 0, 0, None),
        [major, minor] => (major, minor, 0, None),
        [major, minor, patch] => (major, minor, patch, None),
        [major, minor, patch, revision] => (major, minor, patch, Some(revision)),
        _ => {
            return Err(malformed(&format!(
                "expected 1 to 4 numeric segments, got {}",
                segments.len()
            )));
        }
    };

    let mut version = Version::new(major, minor, patch);
    if let Some(revision) = revision {
        version.build = BuildMetadata::new(&revision.to_string())
            .map_err(|e| malformed(&format!("bad revision segment: {e}")))?;
    }
    if let Some(prerelease) = prerelease {
        version.pre = Prerelease::new(prerelease)
            .map_err(|e| malformed(&format!("bad prerelease suffix '{prerelease}': {e}")))?;
    }

    Ok(version)
}

/// A normalized version paired with the raw string it was derived from.
///
/// Comparison always goes through the normalized form; serialization and
/// document bounds always report the raw form, so version text is never
/// reconstructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedVersion {
    pub raw: String,
    pub version: Version,
}

impl NormalizedVersion {
    pub fn parse(raw: &str) -> Result<Self, MalformedVersion> {
        Ok(Self {
            raw: raw.to_string(),
            version: normalize(raw)?,
        })
    }
}

impl Ord for NormalizedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for NormalizedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2", "2.0.0")]
    #[case("1.2", "1.2.0")]
    #[case("1.2.3", "1.2.3")]
    #[case("6.2.1.0", "6.2.1+0")]
    #[case("1.02.3", "1.2.3")] // leading zeros dropped
    #[case("1.2-beta", "1.2.0-beta")]
    #[case("2.8.5-preview5", "2.8.5-preview5")]
    #[case("1.2.3.4-rc1", "1.2.3-rc1+4")]
    fn normalize_maps_to_expected_semver(#[case] raw: &str, #[case] expected: &str) {
        let version = normalize(raw).unwrap();
        assert_eq!(version, Version::parse(expected).unwrap());
    }

    #[rstest]
    #[case("")]
    #[case("banana")]
    #[case("1.2.x")]
    #[case("1.2.3.4.5")]
    #[case("1..2")]
    fn normalize_rejects_malformed_input(#[case] raw: &str) {
        let result = normalize(raw);
        assert!(result.is_err(), "expected '{raw}' to be rejected");
        assert_eq!(result.unwrap_err().raw, raw);
    }

    #[test]
    fn normalize_is_deterministic() {
        assert_eq!(normalize("3.1.4.1").unwrap(), normalize("3.1.4.1").unwrap());
    }

    #[test]
    fn prerelease_sorts_below_same_numeric_version() {
        let pre = NormalizedVersion::parse("2.0.0-rc1").unwrap();
        let stable = NormalizedVersion::parse("2.0.0").unwrap();
        assert!(pre < stable);
    }

    #[test]
    fn comparison_uses_normalized_form_not_raw_text() {
        // Lexically "10.0.0" < "9.0.0", numerically the other way around
        let ten = NormalizedVersion::parse("10.0.0").unwrap();
        let nine = NormalizedVersion::parse("9.0.0").unwrap();
        assert!(nine < ten);
    }
}
