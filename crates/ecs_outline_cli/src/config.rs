use serde::Deserialize;
use std::path::{Path, PathBuf};

use ecs_scope_rust::ItemKind;

pub const CONFIG_FILE_NAME: &str = "ecs-outline.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineConfig {
    /// Directory names skipped while walking, on top of the built-in list.
    pub exclude_dirs: Vec<String>,
    /// Sections shown, in display order.
    pub kinds: Vec<ItemKind>,
    pub show_fields: bool,
    /// The file these settings came from; `None` means defaults.
    pub source: Option<PathBuf>,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: Vec::new(),
            kinds: ItemKind::ALL.to_vec(),
            show_fields: true,
            source: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OutlineTomlConfig {
    scan: Option<OutlineTomlScanSection>,
    outline: Option<OutlineTomlOutlineSection>,
}

#[derive(Debug, Deserialize)]
struct OutlineTomlScanSection {
    exclude_dirs: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct OutlineTomlOutlineSection {
    kinds: Option<Vec<String>>,
    show_fields: Option<bool>,
}

/// Read `ecs-outline.toml` from the project root, falling back to defaults
/// when there is none.
pub fn load_outline_config(root: &Path) -> Result<OutlineConfig, String> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(OutlineConfig::default());
    }

    let raw = std::fs::read_to_string(&path)
        .map_err(|err| format!("read {}: {}", path.display(), err))?;
    let parsed: OutlineTomlConfig =
        toml::from_str(&raw).map_err(|err| format!("parse {}: {}", path.display(), err))?;

    let defaults = OutlineConfig::default();
    let exclude_dirs = parsed
        .scan
        .and_then(|scan| scan.exclude_dirs)
        .map(normalize_dir_entries)
        .unwrap_or(defaults.exclude_dirs);
    let (kinds, show_fields) = match parsed.outline {
        Some(outline) => (
            outline
                .kinds
                .map(|kinds| parse_kinds(&kinds))
                .filter(|kinds| !kinds.is_empty())
                .unwrap_or(defaults.kinds),
            outline.show_fields.unwrap_or(defaults.show_fields),
        ),
        None => (defaults.kinds, defaults.show_fields),
    };

    log::debug!("loaded outline config from {}", path.display());
    Ok(OutlineConfig {
        exclude_dirs,
        kinds,
        show_fields,
        source: Some(path),
    })
}

/// Known kinds in the given order, unknown names dropped, duplicates removed.
pub fn parse_kinds(raw: &[String]) -> Vec<ItemKind> {
    let mut out = Vec::new();
    for entry in raw {
        match ItemKind::parse(entry) {
            Some(kind) if !out.contains(&kind) => out.push(kind),
            Some(_) => {}
            None => log::warn!("ignoring unknown outline kind '{}'", entry),
        }
    }
    out
}

fn normalize_dir_entries(dirs: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for dir in dirs {
        let trimmed = dir.trim().trim_end_matches('/').to_string();
        if !trimmed.is_empty() && !out.contains(&trimmed) {
            out.push(trimmed);
        }
    }
    out
}
