//! NuGet v2 Atom/OData feed parsing
//!
//! The upstream feed answers `FindPackagesById()` queries with an Atom
//! document: one `entry` per package version, an OData `m:properties` block
//! carrying the interesting fields, and an optional `link rel="next"` when
//! more results exist beyond the page. Only the fields the bridge needs are
//! deserialized; everything else in the document is ignored.
//!
//! Element names are matched by their local part: quick-xml's serde
//! deserializer strips namespace prefixes before field lookup. The `link`
//! elements straddle the entries (`rel="self"` before, `rel="next"` after),
//! which serde's consecutive-sequence rule cannot express, so the next link
//! is pulled out with an event scan instead.

use quick_xml::events::Event;
use serde::Deserialize;
use url::Url;

use crate::feed::error::FeedError;
use crate::feed::types::{Continuation, FeedPage, VersionRecord};

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default, rename = "entry")]
    entries: Vec<FeedEntry>,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    title: TextElement,
    content: ContentElement,
    properties: EntryProperties,
}

#[derive(Debug, Deserialize)]
struct TextElement {
    #[serde(rename = "$text")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct ContentElement {
    #[serde(rename = "@src")]
    src: String,
}

#[derive(Debug, Deserialize)]
struct EntryProperties {
    #[serde(rename = "Version")]
    version: String,
    #[serde(default, rename = "Dependencies")]
    dependencies: Option<String>,
    #[serde(default, rename = "Tags")]
    tags: Option<String>,
    #[serde(default, rename = "ItemType")]
    item_type: Option<String>,
    #[serde(default, rename = "IsLatestVersion")]
    is_latest: Option<BoolProperty>,
    #[serde(default, rename = "IsAbsoluteLatestVersion")]
    is_absolute_latest: Option<BoolProperty>,
}

/// OData booleans are elements with text content, e.g.
/// `<d:IsLatestVersion m:type="Edm.Boolean">true</d:IsLatestVersion>`
#[derive(Debug, Deserialize)]
struct BoolProperty {
    #[serde(rename = "$text")]
    value: bool,
}

impl FeedEntry {
    fn into_record(self) -> VersionRecord {
        VersionRecord {
            id: self.title.value,
            version: self.properties.version,
            content_url: self.content.src,
            is_latest_stable: self.properties.is_latest.is_some_and(|b| b.value),
            is_latest_prerelease: self.properties.is_absolute_latest.is_some_and(|b| b.value),
            dependency_spec: self.properties.dependencies.filter(|s| !s.trim().is_empty()),
            tags: self.properties.tags.filter(|s| !s.trim().is_empty()),
            item_type: self.properties.item_type.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Scans the document for a top-level `<link rel="next" href="..."/>` and
/// returns its target.
fn next_link(body: &str) -> Result<Option<Url>, FeedError> {
    let invalid = |e: &dyn std::fmt::Display| FeedError::InvalidResponse(e.to_string());

    let mut reader = quick_xml::Reader::from_str(body);
    loop {
        let element = match reader.read_event().map_err(|e| invalid(&e))? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"link" => e,
            Event::Eof => return Ok(None),
            _ => continue,
        };

        let mut rel = None;
        let mut href = None;
        for attribute in element.attributes() {
            let attribute = attribute.map_err(|e| invalid(&e))?;
            let value = attribute.unescape_value().map_err(|e| invalid(&e))?;
            match attribute.key.as_ref() {
                b"rel" => rel = Some(value.into_owned()),
                b"href" => href = Some(value.into_owned()),
                _ => {}
            }
        }

        if rel.as_deref() == Some("next") {
            let href =
                href.ok_or_else(|| FeedError::InvalidResponse("next link without href".into()))?;
            let url = Url::parse(&href)
                .map_err(|e| FeedError::InvalidResponse(format!("bad next link: {e}")))?;
            return Ok(Some(url));
        }
    }
}

/// Parses an Atom feed document into version records plus the continuation
/// pointer from the `next` link, if one exists.
pub fn parse_feed(body: &str) -> Result<FeedPage, FeedError> {
    let feed: Feed =
        quick_xml::de::from_str(body).map_err(|e| FeedError::InvalidResponse(e.to_string()))?;

    let continuation = next_link(body)?.map(Continuation::new);

    let records = feed
        .entries
        .into_iter()
        .map(FeedEntry::into_record)
        .collect();

    Ok(FeedPage {
        records,
        continuation,
    })
}
