//! Plain-text outline of a scan result.

use std::path::Path;

use ecs_scope_rust::{DiscoveredItem, ItemKind, ScanDiagnostics, ScanResult};

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub kinds: Vec<ItemKind>,
    pub show_fields: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            kinds: ItemKind::ALL.to_vec(),
            show_fields: true,
        }
    }
}

/// Render the outline. Paths are shown relative to `root` when possible.
///
/// ```text
/// Messages (1)
///   net (1)
///     Chat  src/net/client.rs:3
///       id: u32
/// ```
pub fn render_outline(result: &ScanResult, root: Option<&Path>, options: &RenderOptions) -> String {
    let mut out = String::new();
    for kind in &options.kinds {
        out.push_str(&format!(
            "{} ({})\n",
            kind.plural_label(),
            result.item_count(*kind)
        ));
        for group in result.groups(*kind) {
            out.push_str(&format!("  {} ({})\n", group.group_name, group.items.len()));
            for item in &group.items {
                match location(item, root) {
                    Some(loc) => out.push_str(&format!("    {}  {}\n", item.name, loc)),
                    None => out.push_str(&format!("    {}\n", item.name)),
                }
                if options.show_fields {
                    for field in &item.fields {
                        out.push_str(&format!("      {}: {}\n", field.name, field.ty));
                    }
                }
            }
        }
    }
    out
}

pub fn render_diagnostics(diagnostics: &ScanDiagnostics) -> String {
    let mut out = String::new();
    out.push_str(&format!("files_total={}\n", diagnostics.files_total));
    out.push_str(&format!("files_scanned={}\n", diagnostics.files_scanned));
    out.push_str(&format!("skipped={}\n", diagnostics.skipped_count()));
    for skipped in &diagnostics.skipped {
        out.push_str(&format!(
            "skipped path={} reason={}\n",
            skipped.path, skipped.reason
        ));
    }
    out
}

/// `path:line`, `path`, or nothing, depending on what the item carries.
pub fn location(item: &DiscoveredItem, root: Option<&Path>) -> Option<String> {
    let path = item.source_path.as_deref()?;
    let shown = root
        .and_then(|r| Path::new(path).strip_prefix(r).ok())
        .map(ecs_scope_rust::file_walker::normalize_path)
        .unwrap_or_else(|| path.to_string());
    Some(match item.line_number {
        Some(line) => format!("{}:{}", shown, line),
        None => shown,
    })
}

/// Copy of `result` with only the listed kinds kept.
pub fn filter_kinds(result: &ScanResult, kinds: &[ItemKind]) -> ScanResult {
    let keep = |kind: ItemKind| {
        if kinds.contains(&kind) {
            result.groups(kind).to_vec()
        } else {
            Vec::new()
        }
    };
    ScanResult {
        message_groups: keep(ItemKind::Message),
        component_groups: keep(ItemKind::Component),
        system_groups: keep(ItemKind::System),
    }
}
