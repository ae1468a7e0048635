//! Resolved symbols.
//!
//! The front end resolves every name before the program reaches this crate,
//! so symbols are plain records: identity is the id that indexes them.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::{ClassId, LocalId, TypeId};

bitflags! {
    /// Declaration modifiers relevant to translation.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Modifiers: u16 {
        const STATIC = 1 << 0;
        const FINAL = 1 << 1;
        const ABSTRACT = 1 << 2;
        const PRIVATE = 1 << 3;
        const NATIVE = 1 << 4;
        const INTERFACE = 1 << 5;
    }
}

/// A class or interface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassSymbol {
    /// Dot-separated qualified name; nested types use `$`.
    pub name: String,
    #[serde(default)]
    pub superclass: Option<ClassId>,
    #[serde(default)]
    pub interfaces: Vec<ClassId>,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl ClassSymbol {
    /// Unqualified name (text after the last `.`).
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn is_interface(&self) -> bool {
        self.modifiers.contains(Modifiers::INTERFACE)
    }
}

/// What kind of body a method symbol denotes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum MethodKind {
    #[default]
    Method,
    Constructor,
    StaticInit,
}

/// A declared method.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub owner: ClassId,
    pub name: String,
    /// Parameter locals in declaration order.
    #[serde(default)]
    pub params: Vec<LocalId>,
    pub return_type: TypeId,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub kind: MethodKind,
}

impl MethodSymbol {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT)
    }

    pub fn is_native(&self) -> bool {
        self.modifiers.contains(Modifiers::NATIVE)
    }

    pub fn returns_void(&self) -> bool {
        self.return_type == TypeId::VOID
    }
}

/// A compile-time constant value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(u16),
    Bool(bool),
    Str(String),
}

/// A declared field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldSymbol {
    pub owner: ClassId,
    pub name: String,
    pub ty: TypeId,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Present for `static final` fields with a constant initializer.
    #[serde(default)]
    pub constant: Option<Constant>,
}

impl FieldSymbol {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }
}

/// A parameter or block-local variable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocalSymbol {
    pub name: String,
    pub ty: TypeId,
}
