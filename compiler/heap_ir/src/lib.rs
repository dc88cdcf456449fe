//! Value graph IR for heap allocation analysis.
//!
//! This crate provides:
//!
//! - **Types** ([`TyIdx`], [`TypePool`]): interned LLVM-style types with
//!   typed pointers, so a pointer's pointee can be recovered.
//!
//! - **Values** ([`Module`], [`ValueId`], [`ValueKind`]): an arena of
//!   values with per-value use lists and a per-module function symbol table.
//!
//! - **Constants** ([`Constant`]): uniqued integer literals and constant
//!   expressions (`sizeof`, `trunc`, `zext`, `mul`).
//!
//! - **Layout** ([`DataLayout`]): target sizes and alignments, configured
//!   from LLVM-style layout strings.
//!
//! - **Folding** ([`ConstFold`], [`Folder`]): evaluation of constant
//!   expressions to literals given an optional layout.
//!
//! The graph is append-only: values are never removed or rewritten, so a
//! `&Module` is a stable snapshot for any number of readers.

pub mod constant;
pub mod fold;
pub mod layout;
pub mod module;
pub mod ty;
pub mod value;

pub use constant::Constant;
pub use fold::{ConstFold, Folder};
pub use layout::{DataLayout, Endian, LayoutError};
pub use module::{BuiltAlloc, Module, MALLOC};
pub use ty::{TyDisplay, TyIdx, TyKind, TypePool};
pub use value::{BinOp, CastOp, Use, ValueData, ValueId, ValueKind};
