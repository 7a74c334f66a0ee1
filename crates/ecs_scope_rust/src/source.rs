//! Read-only view over one source file.
//!
//! The collector only talks to [`SourceFile`]. The `syn`-backed
//! implementation lives in [`crate::syntax`]; hosts with their own parser can
//! implement the trait directly.

use crate::error::SourceError;

/// An attribute as the matchers see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeDecl {
    /// `#[derive(A, b::B, ...)]`, trait paths in written order with spaces
    /// removed (`bevy::prelude::Component`).
    Derive(Vec<String>),
    /// Any other attribute, by its path.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: Option<String>,
    /// Type as written in source.
    pub ty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: Option<String>,
    pub attributes: Vec<AttributeDecl>,
    /// Named fields only; tuple and unit structs have none.
    pub fields: Vec<FieldDecl>,
    /// Byte offset of the identifier.
    pub offset: Option<usize>,
}

/// A value parameter. Receivers (`self`, `&mut self`) are not parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub ty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnDecl {
    pub name: Option<String>,
    pub params: Vec<ParamDecl>,
    pub offset: Option<usize>,
}

/// Every struct and function declared anywhere in a file, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    pub structs: Vec<StructDecl>,
    pub functions: Vec<FnDecl>,
}

pub trait SourceFile {
    /// Absolute path of the file, if it has one.
    fn path(&self) -> Option<&str>;

    /// Parse the file. Called once per file per scan.
    fn declarations(&self) -> Result<Declarations, SourceError>;

    /// 1-based line containing `offset`.
    fn line_of_offset(&self, _offset: usize) -> Option<u32> {
        None
    }
}

impl<T: SourceFile + ?Sized> SourceFile for &T {
    fn path(&self) -> Option<&str> {
        (**self).path()
    }

    fn declarations(&self) -> Result<Declarations, SourceError> {
        (**self).declarations()
    }

    fn line_of_offset(&self, offset: usize) -> Option<u32> {
        (**self).line_of_offset(offset)
    }
}

impl<T: SourceFile + ?Sized> SourceFile for Box<T> {
    fn path(&self) -> Option<&str> {
        (**self).path()
    }

    fn declarations(&self) -> Result<Declarations, SourceError> {
        (**self).declarations()
    }

    fn line_of_offset(&self, offset: usize) -> Option<u32> {
        (**self).line_of_offset(offset)
    }
}
