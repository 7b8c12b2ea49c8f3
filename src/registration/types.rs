//! NuGet v3 registration document tree
//!
//! See <https://learn.microsoft.com/en-us/nuget/api/registration-base-url-resource>.
//! Every entity here is built fresh per synthesis request; only their
//! serialized forms outlive a request, inside the document store.

use serde::{Deserialize, Serialize};
use url::Url;

/// Root document for a package: an ordered set of version pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationIndex {
    #[serde(rename = "@id")]
    pub id: Url,
    /// Always equals `items.len()`
    pub count: usize,
    pub items: Vec<RegistrationPage>,
}

/// A contiguous version range of a package.
///
/// Inlined pages carry their leaves in `items`; a stub omits them and clients
/// follow `@id` to the standalone document instead. `parent` is set once the
/// page has been materialized as a standalone document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationPage {
    #[serde(rename = "@id")]
    pub id: Url,
    /// Raw version string of the page's minimal leaf (normalized ordering)
    pub lower: String,
    /// Raw version string of the page's maximal leaf (normalized ordering)
    pub upper: String,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<RegistrationLeaf>>,
}

impl RegistrationPage {
    /// The page's short name ("latest", "recent", ...), extracted from either
    /// the anchor form `.../index.json#page/<name>` or the standalone form
    /// `.../page/<name>.json`.
    pub fn name(&self) -> Option<&str> {
        let id = self.id.as_str();
        let last = id.rsplit('/').next()?;
        Some(last.strip_suffix(".json").unwrap_or(last))
    }
}

/// One version of the package, always inlined under a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationLeaf {
    #[serde(rename = "@id")]
    pub id: Url,
    #[serde(rename = "catalogEntry")]
    pub catalog_entry: CatalogEntry,
    /// Download URL for the package content
    #[serde(rename = "packageContent")]
    pub package_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "@id")]
    pub id: Url,
    /// Package id
    #[serde(rename = "id")]
    pub package_id: String,
    /// Raw version string, exactly as the upstream feed reported it
    pub version: String,
    pub tags: Vec<String>,
    #[serde(rename = "dependencyGroups")]
    pub dependency_groups: Vec<DependencyGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyGroup {
    #[serde(
        default,
        rename = "targetFramework",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_framework: Option<String>,
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: String,
    pub range: String,
    /// Registration index of the dependency on this same bridge
    pub registration: Url,
}

// ---------------------------------------------------------------------------
// Identifier construction
// ---------------------------------------------------------------------------

fn join(base: &Url, tail: &str) -> Url {
    let joined = format!("{}/{tail}", base.as_str().trim_end_matches('/'));
    Url::parse(&joined).expect("joining a relative path onto a valid URL cannot fail")
}

/// `{base}/{id}/index.json`
pub fn index_url(base: &Url, package_id: &str) -> Url {
    join(base, &format!("{package_id}/index.json"))
}

/// `{index}#page/{name}` - the anchor form used for pages inlined in the
/// index, so clients do not try to follow them as separate documents
pub fn page_anchor_url(index_id: &Url, name: &str) -> Url {
    let mut url = index_id.clone();
    url.set_fragment(Some(&format!("page/{name}")));
    url
}

/// `{base}/{id}/page/{name}.json` - the standalone document form
pub fn page_url(base: &Url, package_id: &str, name: &str) -> Url {
    join(base, &format!("{package_id}/page/{name}.json"))
}

/// `{base}/{id}/{version}.json`
pub fn leaf_url(base: &Url, package_id: &str, version: &str) -> Url {
    join(base, &format!("{package_id}/{version}.json"))
}

/// Rewrites an anchor-form page identifier into its standalone document form,
/// returning `(parent index id, standalone id)`. Returns `None` when the
/// identifier is not in anchor form.
pub fn standalone_from_anchor(anchor: &Url) -> Option<(Url, Url)> {
    let (prefix, fragment) = anchor.as_str().split_once("index.json#")?;
    if !fragment.starts_with("page/") {
        return None;
    }
    let parent = Url::parse(&format!("{prefix}index.json")).ok()?;
    let standalone = Url::parse(&format!("{prefix}{fragment}.json")).ok()?;
    Some((parent, standalone))
}
