//! Sieve IR - the resolved program model.
//!
//! This crate contains the data the translator works on:
//! - Spans for source locations
//! - Typed ids into flat arenas (`ClassId`, `MethodId`, `ExprId`, ...)
//! - The type table with pre-interned primitives
//! - Class, method, field and local symbols
//! - The closed-enum AST (expressions, statements, declarations)
//! - [`Program`], the container handed over by the front end
//!
//! # Design Philosophy
//!
//! - **Resolved up front**: every name is already bound to a symbol id; no
//!   phase downstream performs lookup by string except directive resolution.
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId`/`StmtId`.
//! - **Closed node sets**: rejected constructs are ordinary variants, so the
//!   lowering `match` stays exhaustive.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
pub mod builder;
mod ids;
mod program;
mod span;
mod symbols;
mod types;
pub mod visitor;

pub use ids::{ClassId, ExprId, FieldId, LocalId, MethodId, StmtId, UnitId};
pub use program::Program;
pub use span::Span;
pub use symbols::{
    ClassSymbol, Constant, FieldSymbol, LocalSymbol, MethodKind, MethodSymbol, Modifiers,
};
pub use types::{TypeId, TypeKind, TypeTable};
