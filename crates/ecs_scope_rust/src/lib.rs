//! ECS declaration discovery for Rust source.
//!
//! Finds structs deriving `Message` or `Component` and functions whose
//! parameters look like ECS system parameters, then groups them by source
//! path for an outline view.
//!
//! Classification is purely syntactic. Nothing is resolved or type-checked.

pub mod collector;
pub mod error;
pub mod file_walker;
pub mod grouping;
pub mod matcher;
pub mod model;
pub mod scan;
pub mod source;
pub mod syntax;

pub use collector::{collect, collect_cancellable, Collected};
pub use error::{ScanError, SourceError};
pub use file_walker::{
    load_rust_sources, load_rust_sources_with, RustSourceFile, SourceSet, WalkOptions,
};
pub use grouping::{group_items, group_key};
pub use matcher::{has_derived_trait, is_system};
pub use model::{
    DiscoveredItem, Group, ItemKind, MessageField, ScanDiagnostics, ScanReport, ScanResult,
    SkippedFile,
};
pub use scan::{scan, scan_cancellable, scan_directory, scan_with_report};
pub use source::{
    AttributeDecl, Declarations, FieldDecl, FnDecl, ParamDecl, SourceFile, StructDecl,
};
pub use syntax::parse_declarations;
