//! Library side of the `ecs-outline` command: config resolution, the scan
//! call and rendering, kept out of `main` so they can be tested directly.

pub mod config;
pub mod render;

use std::path::PathBuf;

use ecs_scope_rust::{scan_directory, DiscoveredItem, ItemKind, ScanReport, ScanResult, WalkOptions};

pub use config::{load_outline_config, OutlineConfig, CONFIG_FILE_NAME};
pub use render::{render_diagnostics, render_outline, RenderOptions};

#[derive(Debug, Clone)]
pub struct OutlineInput {
    pub root: PathBuf,
    /// Overrides `[outline].kinds` when set.
    pub kinds: Option<Vec<ItemKind>>,
    /// Overrides `[outline].show_fields` when set.
    pub show_fields: Option<bool>,
    /// Added to `[scan].exclude_dirs`.
    pub exclude_dirs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OutlineOutput {
    /// Canonical project root the scan ran against.
    pub root: PathBuf,
    pub report: ScanReport,
    pub config: OutlineConfig,
    pub render: RenderOptions,
}

/// Resolve configuration for `input.root` and scan it.
pub fn run_outline(input: OutlineInput) -> Result<OutlineOutput, String> {
    let config = load_outline_config(&input.root)?;

    let mut exclude_dirs = config.exclude_dirs.clone();
    for dir in input.exclude_dirs {
        if !exclude_dirs.contains(&dir) {
            exclude_dirs.push(dir);
        }
    }
    let options = WalkOptions { exclude_dirs };

    let report = scan_directory(&input.root, &options).map_err(|err| err.to_string())?;
    let root = input
        .root
        .canonicalize()
        .map_err(|err| format!("canonicalize {}: {}", input.root.display(), err))?;

    let render = RenderOptions {
        kinds: input
            .kinds
            .filter(|kinds| !kinds.is_empty())
            .unwrap_or_else(|| config.kinds.clone()),
        show_fields: input.show_fields.unwrap_or(config.show_fields),
    };

    Ok(OutlineOutput {
        root,
        report,
        config,
        render,
    })
}

/// Every item named `name`, across all kinds, in outline order.
pub fn locate<'a>(result: &'a ScanResult, name: &str) -> Vec<&'a DiscoveredItem> {
    result.items().filter(|item| item.name == name).collect()
}
