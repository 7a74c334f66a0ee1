//! Scan entry points.
//!
//! A scan is a pure function of (corpus, project root): no state survives a
//! call, and scanning an unchanged corpus twice gives equal results.

use std::path::Path;
use std::sync::atomic::AtomicBool;

use crate::collector::{collect, collect_cancellable, Collected};
use crate::error::ScanError;
use crate::file_walker::{load_rust_sources_with, WalkOptions};
use crate::grouping::group_items;
use crate::model::{ScanDiagnostics, ScanReport, ScanResult};
use crate::source::SourceFile;

/// Classify and group every item in `files`. No root, no groups.
pub fn scan<F: SourceFile>(files: &[F], project_root: Option<&Path>) -> ScanResult {
    scan_with_report(files, project_root).result
}

/// [`scan`] plus what was skipped on the way.
pub fn scan_with_report<F: SourceFile>(files: &[F], project_root: Option<&Path>) -> ScanReport {
    build_report(collect(files), files.len(), project_root)
}

/// [`scan_with_report`] that gives up when `cancel` is raised between files.
pub fn scan_cancellable<F: SourceFile>(
    files: &[F],
    project_root: Option<&Path>,
    cancel: &AtomicBool,
) -> Result<ScanReport, ScanError> {
    let collected = collect_cancellable(files, cancel)?;
    Ok(build_report(collected, files.len(), project_root))
}

/// Load every Rust file under `root` and scan it with `root` as the project
/// root. Fails only when `root` itself cannot be enumerated.
pub fn scan_directory(root: &Path, options: &WalkOptions) -> Result<ScanReport, ScanError> {
    let sources = load_rust_sources_with(root, options)?;
    let mut report = scan_with_report(&sources.files, Some(&sources.root));
    // Directories that could not be listed come first: they were skipped
    // before any file was.
    let mut skipped = sources.skipped_dirs.clone();
    skipped.append(&mut report.diagnostics.skipped);
    report.diagnostics.skipped = skipped;
    report.diagnostics.corpus_sha256 = Some(sources.corpus_sha256());
    Ok(report)
}

fn build_report(collected: Collected, files_total: usize, project_root: Option<&Path>) -> ScanReport {
    if project_root.is_none() {
        log::debug!("no project root given; grouping yields nothing");
    }
    let result = ScanResult {
        message_groups: group_items(&collected.messages, project_root),
        component_groups: group_items(&collected.components, project_root),
        system_groups: group_items(&collected.systems, project_root),
    };
    log::debug!(
        "scan found {} message(s), {} component(s), {} system(s); {} file(s) skipped",
        collected.messages.len(),
        collected.components.len(),
        collected.systems.len(),
        collected.skipped.len()
    );
    ScanReport {
        result,
        diagnostics: ScanDiagnostics {
            files_total,
            files_scanned: collected.files_scanned,
            skipped: collected.skipped,
            corpus_sha256: None,
        },
    }
}
