//! Path-based grouping of discovered items.
//!
//! Keys come from the item's path relative to the project root:
//!
//! | relative path          | key        |
//! |------------------------|------------|
//! | `src/foo.rs`           | `foo`      |
//! | `src/net/tcp/client.rs`| `net/tcp`  |
//! | `other/thing.rs`       | `other`    |
//! | `main.rs`, no path     | `Unknown`  |
//!
//! Items are ordered by name and groups by key, both in byte order.

use std::collections::BTreeMap;
use std::path::{Component, Path};

use crate::model::{DiscoveredItem, Group};

pub const SOURCE_ROOT_DIR: &str = "src";
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Group and sort `items`. Without a project root there is nothing to be
/// relative to, so the result is empty.
pub fn group_items(items: &[DiscoveredItem], project_root: Option<&Path>) -> Vec<Group> {
    let Some(root) = project_root else {
        return Vec::new();
    };

    let mut buckets: BTreeMap<String, Vec<DiscoveredItem>> = BTreeMap::new();
    for item in items {
        let key = match &item.source_path {
            Some(path) => group_key(Path::new(path), root),
            None => UNKNOWN_GROUP.to_string(),
        };
        buckets.entry(key).or_default().push(item.clone());
    }

    buckets
        .into_iter()
        .map(|(group_name, mut items)| {
            items.sort_by(|a, b| a.name.cmp(&b.name));
            Group { group_name, items }
        })
        .collect()
}

/// Group key for one file path.
pub fn group_key(path: &Path, root: &Path) -> String {
    let Some(parts) = relative_segments(path, root) else {
        return UNKNOWN_GROUP.to_string();
    };
    match parts.as_slice() {
        [first, file] if first == SOURCE_ROOT_DIR => {
            file.strip_suffix(".rs").unwrap_or(file).to_string()
        }
        [first, middle @ .., _file] if first == SOURCE_ROOT_DIR && !middle.is_empty() => {
            middle.join("/")
        }
        [dirs @ .., _file] if !dirs.is_empty() => dirs.join("/"),
        _ => UNKNOWN_GROUP.to_string(),
    }
}

/// Segments of `path` relative to `root`. A path outside the root climbs out
/// with `..`. `None` when the two share no common root (different drives).
fn relative_segments(path: &Path, root: &Path) -> Option<Vec<String>> {
    if path.is_relative() {
        return Some(segments(path.components()));
    }

    let path_parts: Vec<Component> = path.components().filter(|c| *c != Component::CurDir).collect();
    let root_parts: Vec<Component> = root.components().filter(|c| *c != Component::CurDir).collect();

    let common = path_parts
        .iter()
        .zip(&root_parts)
        .take_while(|(a, b)| a == b)
        .count();
    let shares_root = path_parts
        .first()
        .zip(root_parts.first())
        .is_some_and(|(a, b)| a == b);
    if !shares_root {
        return None;
    }

    let mut out: Vec<String> = root_parts[common..].iter().map(|_| "..".to_string()).collect();
    out.extend(segments(path_parts[common..].iter().copied()));
    Some(out)
}

fn segments<'a>(components: impl Iterator<Item = Component<'a>>) -> Vec<String> {
    components
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKind;

    fn key(path: &str) -> String {
        group_key(Path::new(path), Path::new("/proj"))
    }

    fn item(name: &str, path: Option<&str>) -> DiscoveredItem {
        DiscoveredItem {
            name: name.to_string(),
            fields: vec![],
            kind: ItemKind::Component,
            source_path: path.map(str::to_string),
            line_number: None,
            text_offset: None,
        }
    }

    #[test]
    fn file_directly_under_src_uses_file_stem() {
        assert_eq!(key("/proj/src/foo.rs"), "foo");
        assert_eq!(key("/proj/src/lib.rs"), "lib");
    }

    #[test]
    fn nested_under_src_uses_directories() {
        assert_eq!(key("/proj/src/net/client.rs"), "net");
        assert_eq!(key("/proj/src/net/tcp/client.rs"), "net/tcp");
    }

    #[test]
    fn outside_src_uses_parent_directories() {
        assert_eq!(key("/proj/other/thing.rs"), "other");
        assert_eq!(key("/proj/crates/a/src/lib.rs"), "crates/a/src");
    }

    #[test]
    fn single_segment_is_unknown() {
        assert_eq!(key("/proj/main.rs"), UNKNOWN_GROUP);
    }

    #[test]
    fn path_outside_root_climbs_out() {
        assert_eq!(key("/elsewhere/x.rs"), "../elsewhere");
        assert_eq!(key("/x.rs"), "..");
    }

    #[test]
    fn relative_paths_are_taken_as_is() {
        assert_eq!(key("src/foo.rs"), "foo");
    }

    #[test]
    fn root_with_trailing_slash() {
        assert_eq!(
            group_key(Path::new("/proj/src/foo.rs"), Path::new("/proj/")),
            "foo"
        );
    }

    #[test]
    fn no_root_means_no_groups() {
        let items = vec![item("A", Some("/proj/src/a.rs")), item("B", None)];
        assert!(group_items(&items, None).is_empty());
    }

    #[test]
    fn absent_path_goes_to_unknown() {
        let groups = group_items(&[item("A", None)], Some(Path::new("/proj")));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group_name, UNKNOWN_GROUP);
    }

    #[test]
    fn groups_and_items_sorted_by_byte_order() {
        let items = vec![
            item("beta", Some("/proj/src/net/a.rs")),
            item("Alpha", Some("/proj/src/net/b.rs")),
            item("Zed", Some("/proj/src/audio.rs")),
            item("alpha", Some("/proj/src/net/c.rs")),
            item("Mid", Some("/proj/src/Zone.rs")),
        ];
        let groups = group_items(&items, Some(Path::new("/proj")));
        let keys: Vec<&str> = groups.iter().map(|g| g.group_name.as_str()).collect();
        assert_eq!(keys, vec!["Zone", "audio", "net"]);
        let net: Vec<&str> = groups[2].items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(net, vec!["Alpha", "alpha", "beta"]);
    }
}
