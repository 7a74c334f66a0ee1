//! Values produced by a scan. Everything here is created fresh per scan and
//! never mutated afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named field of a message or component struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageField {
    pub name: String,
    /// Declared type as written in source. Never resolved.
    #[serde(rename = "type")]
    pub ty: String,
}

impl MessageField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Message,
    Component,
    System,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Message, ItemKind::Component, ItemKind::System];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Message => "message",
            ItemKind::Component => "component",
            ItemKind::System => "system",
        }
    }

    /// Section heading used by outline renderers.
    pub fn plural_label(self) -> &'static str {
        match self {
            ItemKind::Message => "Messages",
            ItemKind::Component => "Components",
            ItemKind::System => "Systems",
        }
    }

    pub fn parse(raw: &str) -> Option<ItemKind> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "message" | "messages" => Some(ItemKind::Message),
            "component" | "components" => Some(ItemKind::Component),
            "system" | "systems" => Some(ItemKind::System),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredItem {
    pub name: String,
    /// Named fields in declaration order. Always empty for systems.
    pub fields: Vec<MessageField>,
    pub kind: ItemKind,
    /// Absolute path of the declaring file.
    pub source_path: Option<String>,
    /// 1-based line of the declaration's identifier. Editor APIs that number
    /// lines from 0 need `line_number - 1`.
    pub line_number: Option<u32>,
    /// Byte offset of the declaration's identifier.
    pub text_offset: Option<usize>,
}

impl fmt::Display for DiscoveredItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub group_name: String,
    /// Sorted by name, byte order.
    pub items: Vec<DiscoveredItem>,
}

/// Grouped items, one independently sorted sequence per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub message_groups: Vec<Group>,
    pub component_groups: Vec<Group>,
    pub system_groups: Vec<Group>,
}

impl ScanResult {
    pub fn groups(&self, kind: ItemKind) -> &[Group] {
        match kind {
            ItemKind::Message => &self.message_groups,
            ItemKind::Component => &self.component_groups,
            ItemKind::System => &self.system_groups,
        }
    }

    /// Total item count for one kind, summed over its groups.
    pub fn item_count(&self, kind: ItemKind) -> usize {
        self.groups(kind).iter().map(|g| g.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        ItemKind::ALL.iter().all(|kind| self.groups(*kind).is_empty())
    }

    /// Every item of every kind, in group order.
    pub fn items(&self) -> impl Iterator<Item = &DiscoveredItem> {
        ItemKind::ALL
            .into_iter()
            .flat_map(move |kind| self.groups(kind).iter())
            .flat_map(|group| group.items.iter())
    }
}

/// A file the scan could not use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// What a scan saw besides its result. A skipped file never fails a scan,
/// so this is the only place callers can learn about one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanDiagnostics {
    pub files_total: usize,
    pub files_scanned: usize,
    pub skipped: Vec<SkippedFile>,
    /// SHA-256 over the per-file hashes of the loaded corpus, when the corpus
    /// was loaded from disk.
    pub corpus_sha256: Option<String>,
}

impl ScanDiagnostics {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub result: ScanResult,
    pub diagnostics: ScanDiagnostics,
}
