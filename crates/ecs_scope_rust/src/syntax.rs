//! `syn`-backed declaration extraction.
//!
//! Walks the whole file with a [`syn::visit::Visit`] so structs and functions
//! nested in modules, impl blocks, traits and function bodies are all seen.
//! Type text is sliced from the original source between the first and last
//! token of the type, which keeps it exactly as written.

use proc_macro2::{LineColumn, Span, TokenStream};
use quote::ToTokens;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::visit::{self, Visit};
use syn::{Attribute, FnArg, Signature, Token};

use crate::error::SourceError;
use crate::file_walker::RustSourceFile;
use crate::source::{AttributeDecl, Declarations, FieldDecl, FnDecl, ParamDecl, SourceFile, StructDecl};

const BOM: &str = "\u{feff}";

/// Byte offsets of line starts, for offset/line conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> Option<u32> {
        if offset > self.len {
            return None;
        }
        let line = self.line_starts.partition_point(|start| *start <= offset);
        u32::try_from(line).ok()
    }

    /// Byte offset of a `proc_macro2` position (1-based line, column in chars)
    /// within `text`, which must be the text this index was built from.
    pub fn offset_of(&self, text: &str, pos: LineColumn) -> Option<usize> {
        let start = *self.line_starts.get(pos.line.checked_sub(1)?)?;
        let rest = text.get(start..)?;
        match rest.char_indices().nth(pos.column) {
            Some((i, _)) => Some(start + i),
            None if rest.chars().count() == pos.column => Some(text.len()),
            None => None,
        }
    }
}

/// Parse `content` and return every struct and function it declares.
///
/// Span locations recorded for the parse are released before returning, so
/// repeated calls on one thread do not grow memory. A returned error carries
/// its position in the message (`line:column: ...`) and a call-site span.
pub fn parse_declarations(content: &str) -> Result<Declarations, syn::Error> {
    let (text, base) = match content.strip_prefix(BOM) {
        Some(rest) => (rest, BOM.len()),
        None => (content, 0),
    };
    let parsed = match syn::parse_file(text) {
        Ok(file) => {
            let index = LineIndex::new(text);
            let mut visitor = DeclVisitor {
                text,
                index: &index,
                base,
                out: Declarations::default(),
            };
            visitor.visit_file(&file);
            Ok(visitor.out)
        }
        Err(err) => {
            let at = err.span().start();
            Err(syn::Error::new(
                Span::call_site(),
                format!("{}:{}: {}", at.line, at.column + 1, err),
            ))
        }
    };
    // Every span from this parse has been dropped by now.
    proc_macro2::extra::invalidate_current_thread_spans();
    parsed
}

struct DeclVisitor<'a> {
    text: &'a str,
    index: &'a LineIndex,
    base: usize,
    out: Declarations,
}

impl DeclVisitor<'_> {
    fn offset_of(&self, pos: LineColumn) -> Option<usize> {
        self.index.offset_of(self.text, pos).map(|o| o + self.base)
    }

    /// Source text of a syntax node, as written.
    fn source_text(&self, node: &impl ToTokens) -> String {
        let tokens = node.to_token_stream();
        token_extent(tokens.clone())
            .and_then(|(start, end)| {
                let lo = self.index.offset_of(self.text, start)?;
                let hi = self.index.offset_of(self.text, end)?;
                self.text.get(lo..hi).map(str::to_string)
            })
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| tidy_token_text(&tokens.to_string()))
    }

    fn push_fn(&mut self, sig: &Signature) {
        let params = sig
            .inputs
            .iter()
            .filter_map(|arg| match arg {
                FnArg::Typed(pat) => Some(ParamDecl {
                    ty: Some(self.source_text(&pat.ty)),
                }),
                FnArg::Receiver(_) => None,
            })
            .collect();
        self.out.functions.push(FnDecl {
            name: Some(sig.ident.unraw().to_string()),
            params,
            offset: self.offset_of(sig.ident.span().start()),
        });
    }
}

impl<'ast> Visit<'ast> for DeclVisitor<'_> {
    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        let fields = match &node.fields {
            syn::Fields::Named(named) => named
                .named
                .iter()
                .map(|f| FieldDecl {
                    name: f.ident.as_ref().map(|i| i.unraw().to_string()),
                    ty: Some(self.source_text(&f.ty)),
                })
                .collect(),
            syn::Fields::Unnamed(_) | syn::Fields::Unit => Vec::new(),
        };
        self.out.structs.push(StructDecl {
            name: Some(node.ident.unraw().to_string()),
            attributes: node.attrs.iter().map(attribute_decl).collect(),
            fields,
            offset: self.offset_of(node.ident.span().start()),
        });
        visit::visit_item_struct(self, node);
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        self.push_fn(&node.sig);
        visit::visit_item_fn(self, node);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        self.push_fn(&node.sig);
        visit::visit_impl_item_fn(self, node);
    }

    fn visit_trait_item_fn(&mut self, node: &'ast syn::TraitItemFn) {
        self.push_fn(&node.sig);
        visit::visit_trait_item_fn(self, node);
    }

    fn visit_foreign_item_fn(&mut self, node: &'ast syn::ForeignItemFn) {
        self.push_fn(&node.sig);
        visit::visit_foreign_item_fn(self, node);
    }
}

fn attribute_decl(attr: &Attribute) -> AttributeDecl {
    if !attr.path().is_ident("derive") {
        return AttributeDecl::Other(path_to_string(attr.path()));
    }
    match attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated) {
        Ok(paths) => AttributeDecl::Derive(paths.iter().map(path_to_string).collect()),
        // Malformed list: fall back to splitting the raw tokens.
        Err(_) => {
            let raw = match &attr.meta {
                syn::Meta::List(list) => list.tokens.to_string(),
                _ => String::new(),
            };
            AttributeDecl::Derive(
                raw.split(',')
                    .map(|t| t.replace(' ', ""))
                    .filter(|t| !t.is_empty())
                    .collect(),
            )
        }
    }
}

fn path_to_string(path: &syn::Path) -> String {
    let segments = path
        .segments
        .iter()
        .map(|s| s.ident.unraw().to_string())
        .collect::<Vec<_>>()
        .join("::");
    if path.leading_colon.is_some() {
        format!("::{}", segments)
    } else {
        segments
    }
}

/// Start of the first token and end of the last one.
fn token_extent(tokens: TokenStream) -> Option<(LineColumn, LineColumn)> {
    let mut iter = tokens.into_iter();
    let first = iter.next()?;
    let start = first.span().start();
    let end = iter.last().unwrap_or(first).span().end();
    if (end.line, end.column) < (start.line, start.column) {
        return None;
    }
    Some((start, end))
}

/// Collapse the spaced-out rendering of a token stream
/// (`Query < & Transform >`) into something close to written source.
fn tidy_token_text(raw: &str) -> String {
    const NO_SPACE_AFTER: &[char] = &['<', '(', '[', '&', ':', '*', '\''];
    const NO_SPACE_BEFORE: &[char] = &['<', '>', '(', ')', '[', ']', ',', ';', ':'];

    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    for (i, c) in chars.iter().enumerate() {
        if *c == ' ' {
            let prev = out.chars().last();
            let next = chars.get(i + 1);
            let drop = prev.is_some_and(|p| NO_SPACE_AFTER.contains(&p))
                || next.is_some_and(|n| NO_SPACE_BEFORE.contains(n));
            if drop {
                continue;
            }
        }
        out.push(*c);
    }
    out
}

impl SourceFile for RustSourceFile {
    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn declarations(&self) -> Result<Declarations, SourceError> {
        if let Some(reason) = &self.load_error {
            return Err(SourceError::Unreadable {
                path: self.path.clone(),
                reason: reason.clone(),
            });
        }
        parse_declarations(&self.content).map_err(|e| SourceError::Unparsable {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn line_of_offset(&self, offset: usize) -> Option<u32> {
        if self.load_error.is_some() {
            return None;
        }
        self.line_index.line_of(offset)
    }
}
