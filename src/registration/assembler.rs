//! Registration index assembly
//!
//! Partitions a package's upstream version records into the small, stable set
//! of logical pages the bridge serves:
//!
//! 1. the `IsLatestVersion` record becomes the singleton "latest" page
//! 2. the `IsAbsoluteLatestVersion` record (when it is a different record)
//!    becomes the singleton "prerelease" page, ordered before "latest"
//! 3. everything else left on the first feed page becomes "recent"
//! 4. when the feed had more pages, a zero-leaf "older" stub is appended as a
//!    promise that background readahead will materialize it in the store
//!
//! Page bounds are computed over normalized versions (prerelease-inclusive)
//! but always reported as the original raw strings.

use url::Url;

use crate::feed::types::VersionRecord;
use crate::registration::dependency::parse_dependency_spec;
use crate::registration::error::SynthesisError;
use crate::registration::types::{
    CatalogEntry, RegistrationIndex, RegistrationLeaf, RegistrationPage, index_url, leaf_url,
    page_anchor_url, page_url, standalone_from_anchor,
};
use crate::registration::version::NormalizedVersion;

/// Fixed floor for the lazily-materialized "older" stub
const OLDER_PAGE_FLOOR: &str = "0.0.0";

/// Builds the registration index for `package_id` from the first feed page's
/// records. `has_more` marks that the feed reported a continuation, which adds
/// the "older" stub.
pub fn assemble(
    base: &Url,
    package_id: &str,
    records: Vec<VersionRecord>,
    has_more: bool,
) -> Result<RegistrationIndex, SynthesisError> {
    if records.is_empty() && !has_more {
        return Err(SynthesisError::NoVersionsFound(package_id.to_string()));
    }

    let index_id = index_url(base, package_id);
    let mut remaining = records;
    let mut pages: Vec<RegistrationPage> = Vec::new();

    if let Some(position) = remaining.iter().position(|r| r.is_latest_stable) {
        let latest = remaining.remove(position);
        pages.push(build_page(base, package_id, &index_id, "latest", &[latest])?);
    }

    // Checked after "latest" on purpose: a record flagged as both belongs on
    // the "latest" page, not "prerelease"
    if let Some(position) = remaining.iter().position(|r| r.is_latest_prerelease) {
        let prerelease = remaining.remove(position);
        pages.insert(
            0,
            build_page(base, package_id, &index_id, "prerelease", &[prerelease])?,
        );
    }

    if !remaining.is_empty() {
        pages.push(build_page(base, package_id, &index_id, "recent", &remaining)?);
    }

    if has_more {
        pages.push(older_stub(base, package_id, &pages)?);
    }

    Ok(RegistrationIndex {
        id: index_id,
        count: pages.len(),
        items: pages,
    })
}

/// Builds the full "older" page from background-aggregated records, already in
/// its standalone form with the parent link set.
pub fn assemble_older_page(
    base: &Url,
    package_id: &str,
    records: &[VersionRecord],
) -> Result<RegistrationPage, SynthesisError> {
    if records.is_empty() {
        return Err(SynthesisError::NoVersionsFound(package_id.to_string()));
    }

    let index_id = index_url(base, package_id);
    let mut page = build_page(base, package_id, &index_id, "older", records)?;

    let (parent, standalone) = standalone_from_anchor(&page.id)
        .expect("pages are built with anchor-form identifiers");
    page.parent = Some(parent);
    page.id = standalone;
    Ok(page)
}

fn build_page(
    base: &Url,
    package_id: &str,
    index_id: &Url,
    name: &str,
    records: &[VersionRecord],
) -> Result<RegistrationPage, SynthesisError> {
    let leaves: Vec<RegistrationLeaf> = records
        .iter()
        .map(|record| build_leaf(base, package_id, record))
        .collect();

    let (lower, upper) = bounds(records)?;

    Ok(RegistrationPage {
        id: page_anchor_url(index_id, name),
        lower,
        upper,
        count: leaves.len(),
        parent: None,
        items: Some(leaves),
    })
}

/// Prerelease-inclusive min and max over the records' normalized versions,
/// reported as the raw strings the extrema came from.
fn bounds(records: &[VersionRecord]) -> Result<(String, String), SynthesisError> {
    let mut lower: Option<NormalizedVersion> = None;
    let mut upper: Option<NormalizedVersion> = None;

    for record in records {
        let version = NormalizedVersion::parse(&record.version)?;
        if lower.as_ref().is_none_or(|low| version < *low) {
            lower = Some(version.clone());
        }
        if upper.as_ref().is_none_or(|high| version > *high) {
            upper = Some(version);
        }
    }

    match (lower, upper) {
        (Some(lower), Some(upper)) => Ok((lower.raw, upper.raw)),
        // build_page is never called with zero records
        _ => Err(SynthesisError::NoVersionsFound(String::new())),
    }
}

fn build_leaf(base: &Url, package_id: &str, record: &VersionRecord) -> RegistrationLeaf {
    let id = leaf_url(base, package_id, &record.version);

    let mut entry_id = id.clone();
    entry_id.set_fragment(Some("catalogEntry"));

    let tags = record
        .tags
        .as_deref()
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let dependency_groups = record
        .dependency_spec
        .as_deref()
        .map(|spec| vec![parse_dependency_spec(base, spec)])
        .unwrap_or_default();

    RegistrationLeaf {
        id,
        catalog_entry: CatalogEntry {
            id: entry_id,
            package_id: record.id.clone(),
            version: record.version.clone(),
            tags,
            dependency_groups,
        },
        package_content: record.content_url.clone(),
    }
}

/// The "older" stub: zero leaves by construction, bounded above by the lowest
/// version any emitted page reaches down to.
fn older_stub(
    base: &Url,
    package_id: &str,
    pages: &[RegistrationPage],
) -> Result<RegistrationPage, SynthesisError> {
    let mut lowest: Option<NormalizedVersion> = None;
    for page in pages {
        let lower = NormalizedVersion::parse(&page.lower)?;
        if lowest.as_ref().is_none_or(|low| lower < *low) {
            lowest = Some(lower);
        }
    }
    let upper = lowest
        .map(|v| v.raw)
        .ok_or_else(|| SynthesisError::NoVersionsFound(package_id.to_string()))?;

    Ok(RegistrationPage {
        id: page_url(base, package_id, "older"),
        lower: OLDER_PAGE_FLOOR.to_string(),
        upper,
        count: 0,
        parent: None,
        items: None,
    })
}
