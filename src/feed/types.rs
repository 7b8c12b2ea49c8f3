//! Types shared across the upstream feed layer

use url::Url;

/// One version of a package as reported by the NuGet v2 feed.
///
/// Immutable once parsed; lives for the duration of a single synthesis
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    /// Package id (the feed entry's title)
    pub id: String,
    /// Raw version string exactly as the feed reported it
    pub version: String,
    /// Download URL for the package content (the entry's `content@src`)
    pub content_url: String,
    /// `IsLatestVersion` on the feed entry
    pub is_latest_stable: bool,
    /// `IsAbsoluteLatestVersion` on the feed entry
    pub is_latest_prerelease: bool,
    /// Delimited `id:range|id:range` dependency encoding, when present
    pub dependency_spec: Option<String>,
    /// Whitespace-delimited tag list, when present
    pub tags: Option<String>,
    /// Upstream item type, when present
    pub item_type: Option<String>,
}

/// Opaque cursor indicating more upstream records exist beyond the current
/// page. The encoded `$skip` offset doubles as the page stride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation {
    pub url: Url,
}

impl Continuation {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// The `$skip` delta between consecutive upstream pages, read from the
    /// continuation's own `$skip` parameter. `None` when the parameter is
    /// missing or unusable.
    pub fn stride(&self) -> Option<u64> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == "$skip")
            .and_then(|(_, value)| value.parse::<u64>().ok())
            .filter(|skip| *skip > 0)
    }
}

/// One page of upstream results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPage {
    pub records: Vec<VersionRecord>,
    /// Present when the feed reported a `next` link
    pub continuation: Option<Continuation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_reads_skip_parameter() {
        let url = Url::parse(
            "https://example.org/api/v2/FindPackagesById()?id='Az.Accounts'&$skip=100",
        )
        .unwrap();
        assert_eq!(Continuation::new(url).stride(), Some(100));
    }

    #[test]
    fn stride_is_none_without_skip() {
        let url = Url::parse("https://example.org/api/v2/FindPackagesById()?id='Az'").unwrap();
        assert_eq!(Continuation::new(url).stride(), None);
    }

    #[test]
    fn stride_rejects_zero_and_garbage() {
        let zero = Url::parse("https://example.org/feed?$skip=0").unwrap();
        assert_eq!(Continuation::new(zero).stride(), None);

        let garbage = Url::parse("https://example.org/feed?$skip=abc").unwrap();
        assert_eq!(Continuation::new(garbage).stride(), None);
    }
}
