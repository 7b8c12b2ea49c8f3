//! NuGet v2 dependency string decoding
//!
//! The feed encodes dependencies as `id:range|id:range|...`, with an optional
//! third `:framework` component per entry. Entries starting with `::` carry a
//! target framework only and are skipped. A bare version in the range position
//! means a minimum version in v2 and is rewritten to the explicit `[v, )`
//! form.

use url::Url;

use crate::registration::types::{Dependency, DependencyGroup, index_url};

/// Decodes a delimited v2 dependency string into a single untargeted
/// dependency group. `registration_base` is the registration root used to
/// point each dependency at its own index on this bridge.
pub fn parse_dependency_spec(registration_base: &Url, spec: &str) -> DependencyGroup {
    let dependencies = spec
        .split('|')
        .filter(|entry| !entry.is_empty() && !entry.starts_with("::"))
        .filter_map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let id = parts.next()?.trim();
            if id.is_empty() {
                return None;
            }
            let range = parts.next().unwrap_or("").trim();
            Some(Dependency {
                id: id.to_string(),
                range: minimum_range(range),
                registration: index_url(registration_base, id),
            })
        })
        .collect();

    DependencyGroup {
        target_framework: None,
        dependencies,
    }
}

/// A bare v2 version means "at least this version"
fn minimum_range(range: &str) -> String {
    if range.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("[{range}, )")
    } else {
        range.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://pwsh.gallery").unwrap()
    }

    #[test]
    fn splits_entries_and_builds_registration_links() {
        let group = parse_dependency_spec(&base(), "Az.Accounts:[2.2.3, ):|Az.Profile:[0.7.0]:");

        assert_eq!(group.target_framework, None);
        assert_eq!(group.dependencies.len(), 2);
        assert_eq!(group.dependencies[0].id, "Az.Accounts");
        assert_eq!(group.dependencies[0].range, "[2.2.3, )");
        assert_eq!(
            group.dependencies[0].registration.as_str(),
            "http://pwsh.gallery/Az.Accounts/index.json"
        );
        assert_eq!(group.dependencies[1].range, "[0.7.0]");
    }

    #[test]
    fn bare_version_is_rewritten_to_minimum_range() {
        let group = parse_dependency_spec(&base(), "PSReadLine:2.0.0");
        assert_eq!(group.dependencies[0].range, "[2.0.0, )");
    }

    #[test]
    fn framework_only_entries_are_skipped() {
        let group = parse_dependency_spec(&base(), "Az.Accounts:1.6.2:|::net472|::netstandard2.0");
        assert_eq!(group.dependencies.len(), 1);
        assert_eq!(group.dependencies[0].id, "Az.Accounts");
    }

    #[test]
    fn entry_without_range_keeps_empty_range() {
        let group = parse_dependency_spec(&base(), "SomeModule");
        assert_eq!(group.dependencies.len(), 1);
        assert_eq!(group.dependencies[0].range, "");
    }
}
