//! Walks a corpus and produces flat, classified item lists.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ScanError;
use crate::matcher::{has_derived_trait, is_system, COMPONENT_DERIVE, MESSAGE_DERIVE};
use crate::model::{DiscoveredItem, ItemKind, MessageField, SkippedFile};
use crate::source::{FnDecl, SourceFile, StructDecl};

pub const UNNAMED: &str = "<unnamed>";
pub const UNKNOWN_FIELD_NAME: &str = "<unknown>";
pub const UNKNOWN_FIELD_TYPE: &str = "unknown";

/// Items in corpus order, one list per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    pub messages: Vec<DiscoveredItem>,
    pub components: Vec<DiscoveredItem>,
    pub systems: Vec<DiscoveredItem>,
    pub files_scanned: usize,
    pub skipped: Vec<SkippedFile>,
}

impl Collected {
    fn push(&mut self, item: DiscoveredItem) {
        match item.kind {
            ItemKind::Message => self.messages.push(item),
            ItemKind::Component => self.components.push(item),
            ItemKind::System => self.systems.push(item),
        }
    }
}

pub fn collect<F: SourceFile>(files: &[F]) -> Collected {
    let mut out = Collected::default();
    for file in files {
        collect_file(file, &mut out);
    }
    out
}

/// Like [`collect`], but checks `cancel` before each file.
pub fn collect_cancellable<F: SourceFile>(
    files: &[F],
    cancel: &AtomicBool,
) -> Result<Collected, ScanError> {
    let mut out = Collected::default();
    for (done, file) in files.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            return Err(ScanError::Cancelled { files_done: done });
        }
        collect_file(file, &mut out);
    }
    Ok(out)
}

fn collect_file<F: SourceFile>(file: &F, out: &mut Collected) {
    let decls = match file.declarations() {
        Ok(decls) => decls,
        Err(err) => {
            log::warn!("skipping {}", err);
            out.skipped.push(SkippedFile {
                path: file.path().unwrap_or(UNNAMED).to_string(),
                reason: err.to_string(),
            });
            return;
        }
    };
    out.files_scanned += 1;

    for decl in &decls.structs {
        if let Some(kind) = classify_struct(decl) {
            out.push(struct_item(file, decl, kind));
        }
    }
    for decl in &decls.functions {
        if is_system(&decl.params) {
            out.push(system_item(file, decl));
        }
    }
    log::debug!(
        "scanned {}: {} struct(s), {} fn(s)",
        file.path().unwrap_or(UNNAMED),
        decls.structs.len(),
        decls.functions.len()
    );
}

/// Message wins over Component when a struct derives both.
fn classify_struct(decl: &StructDecl) -> Option<ItemKind> {
    if has_derived_trait(&decl.attributes, MESSAGE_DERIVE) {
        Some(ItemKind::Message)
    } else if has_derived_trait(&decl.attributes, COMPONENT_DERIVE) {
        Some(ItemKind::Component)
    } else {
        None
    }
}

fn struct_item<F: SourceFile>(file: &F, decl: &StructDecl, kind: ItemKind) -> DiscoveredItem {
    let fields = decl
        .fields
        .iter()
        .map(|f| MessageField {
            name: f.name.clone().unwrap_or_else(|| UNKNOWN_FIELD_NAME.to_string()),
            ty: f.ty.clone().unwrap_or_else(|| UNKNOWN_FIELD_TYPE.to_string()),
        })
        .collect();
    located_item(file, decl.name.as_deref(), fields, kind, decl.offset)
}

fn system_item<F: SourceFile>(file: &F, decl: &FnDecl) -> DiscoveredItem {
    located_item(file, decl.name.as_deref(), Vec::new(), ItemKind::System, decl.offset)
}

fn located_item<F: SourceFile>(
    file: &F,
    name: Option<&str>,
    fields: Vec<MessageField>,
    kind: ItemKind,
    offset: Option<usize>,
) -> DiscoveredItem {
    DiscoveredItem {
        name: name.unwrap_or(UNNAMED).to_string(),
        fields,
        kind,
        source_path: file.path().map(str::to_string),
        line_number: offset.and_then(|o| file.line_of_offset(o)),
        text_offset: offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::file_walker::RustSourceFile;
    use crate::source::{AttributeDecl, Declarations, FieldDecl, ParamDecl};

    fn file(path: &str, content: &str) -> RustSourceFile {
        RustSourceFile::from_text(path, content)
    }

    /// Adapter without location support, standing in for a host parser.
    struct Bare(Declarations);

    impl SourceFile for Bare {
        fn path(&self) -> Option<&str> {
            None
        }

        fn declarations(&self) -> Result<Declarations, SourceError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn message_with_fields_in_order() {
        let files = vec![file(
            "/proj/src/chat.rs",
            "#[derive(Message)]\nstruct Chat { id: u32, text: String }",
        )];
        let out = collect(&files);
        assert_eq!(out.messages.len(), 1);
        let item = &out.messages[0];
        assert_eq!(item.name, "Chat");
        assert_eq!(item.kind, ItemKind::Message);
        assert_eq!(
            item.fields,
            vec![MessageField::new("id", "u32"), MessageField::new("text", "String")]
        );
        assert_eq!(item.source_path.as_deref(), Some("/proj/src/chat.rs"));
        assert_eq!(item.line_number, Some(2));
        assert_eq!(item.text_offset, Some(26));
    }

    #[test]
    fn message_wins_over_component() {
        let files = vec![file(
            "/proj/src/a.rs",
            "#[derive(Component, Message)]\nstruct Both;",
        )];
        let out = collect(&files);
        assert_eq!(out.messages.len(), 1);
        assert!(out.components.is_empty());
    }

    #[test]
    fn systems_have_no_fields() {
        let files = vec![file(
            "/proj/src/sys.rs",
            "fn move_system(q: Query<&Transform>) {}\nfn helper(x: i32) {}\nfn tricky(r: MyResourceHandle) {}",
        )];
        let out = collect(&files);
        let names: Vec<&str> = out.systems.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["move_system", "tricky"]);
        assert!(out.systems.iter().all(|s| s.fields.is_empty()));
        assert_eq!(out.systems[1].line_number, Some(3));
    }

    #[test]
    fn unparsable_file_is_skipped() {
        let files = vec![
            file("/proj/src/a.rs", "#[derive(Component)]\nstruct A;"),
            file("/proj/src/broken.rs", "struct {{{"),
            file("/proj/src/b.rs", "#[derive(Component)]\nstruct B;"),
        ];
        let out = collect(&files);
        assert_eq!(out.components.len(), 2);
        assert_eq!(out.files_scanned, 2);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].path, "/proj/src/broken.rs");
    }

    #[test]
    fn placeholders_fill_missing_data() {
        let decls = Declarations {
            structs: vec![StructDecl {
                name: None,
                attributes: vec![AttributeDecl::Derive(vec!["Component".into()])],
                fields: vec![FieldDecl { name: None, ty: None }],
                offset: Some(4),
            }],
            functions: vec![FnDecl {
                name: None,
                params: vec![ParamDecl {
                    ty: Some("Commands".into()),
                }],
                offset: None,
            }],
        };
        let out = collect(&[Bare(decls)]);
        let component = &out.components[0];
        assert_eq!(component.name, UNNAMED);
        assert_eq!(component.fields, vec![MessageField::new("<unknown>", "unknown")]);
        assert_eq!(component.source_path, None);
        assert_eq!(component.line_number, None);
        assert_eq!(component.text_offset, Some(4));
        assert_eq!(out.systems[0].name, UNNAMED);
    }

    #[test]
    fn cancellation_stops_before_next_file() {
        let files = vec![file("/p/a.rs", "fn a(c: Commands) {}")];
        let cancel = AtomicBool::new(true);
        let err = collect_cancellable(&files, &cancel).unwrap_err();
        assert!(matches!(err, ScanError::Cancelled { files_done: 0 }));

        let cancel = AtomicBool::new(false);
        let out = collect_cancellable(&files, &cancel).unwrap();
        assert_eq!(out.systems.len(), 1);
    }

    #[test]
    fn trait_objects_are_accepted() {
        let a = file("/p/a.rs", "#[derive(Message)] struct M;");
        let b = Bare(Declarations::default());
        let files: Vec<&dyn SourceFile> = vec![&a, &b];
        let out = collect(&files);
        assert_eq!(out.messages.len(), 1);
        assert_eq!(out.files_scanned, 2);
    }
}
