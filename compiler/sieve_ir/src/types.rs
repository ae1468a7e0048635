//! Type table.
//!
//! Primitive types are pre-interned at fixed indices so the lowering code can
//! compare against constants (`TypeId::INT`) without a table lookup.
//! Compound types (classes, arrays) are appended by the front end and
//! deduplicated on insertion.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::ClassId;

/// Index into the [`TypeTable`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const BYTE: TypeId = TypeId(0);
    pub const CHAR: TypeId = TypeId(1);
    pub const SHORT: TypeId = TypeId(2);
    pub const INT: TypeId = TypeId(3);
    pub const LONG: TypeId = TypeId(4);
    pub const BOOLEAN: TypeId = TypeId(5);
    pub const FLOAT: TypeId = TypeId(6);
    pub const DOUBLE: TypeId = TypeId(7);
    pub const VOID: TypeId = TypeId(8);
    /// Type of the `null` literal.
    pub const NULL: TypeId = TypeId(9);

    /// First index available for compound types.
    pub const FIRST_COMPOUND: u32 = 10;

    #[inline]
    pub const fn new(index: u32) -> Self {
        TypeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_COMPOUND
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TypeId::BYTE => write!(f, "byte"),
            TypeId::CHAR => write!(f, "char"),
            TypeId::SHORT => write!(f, "short"),
            TypeId::INT => write!(f, "int"),
            TypeId::LONG => write!(f, "long"),
            TypeId::BOOLEAN => write!(f, "boolean"),
            TypeId::FLOAT => write!(f, "float"),
            TypeId::DOUBLE => write!(f, "double"),
            TypeId::VOID => write!(f, "void"),
            TypeId::NULL => write!(f, "null"),
            TypeId(n) => write!(f, "TypeId({n})"),
        }
    }
}

/// Structural description of a type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum TypeKind {
    Byte,
    Char,
    Short,
    Int,
    Long,
    Boolean,
    Float,
    Double,
    Void,
    Null,
    Class(ClassId),
    Array(TypeId),
}

impl TypeKind {
    const PRIMITIVES: [TypeKind; TypeId::FIRST_COMPOUND as usize] = [
        TypeKind::Byte,
        TypeKind::Char,
        TypeKind::Short,
        TypeKind::Int,
        TypeKind::Long,
        TypeKind::Boolean,
        TypeKind::Float,
        TypeKind::Double,
        TypeKind::Void,
        TypeKind::Null,
    ];

    /// Class and array types are references; `null` is not counted here.
    pub fn is_reference(self) -> bool {
        matches!(self, TypeKind::Class(_) | TypeKind::Array(_))
    }

    pub fn is_floating(self) -> bool {
        matches!(self, TypeKind::Float | TypeKind::Double)
    }
}

/// Interned type table.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "Vec<TypeKind>", into = "Vec<TypeKind>")]
pub struct TypeTable {
    kinds: Vec<TypeKind>,
    lookup: FxHashMap<TypeKind, TypeId>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = TypeTable {
            kinds: Vec::new(),
            lookup: FxHashMap::default(),
        };
        for kind in TypeKind::PRIMITIVES {
            table.intern(kind);
        }
        table
    }

    /// Intern a type, returning the existing id when already present.
    pub fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.lookup.get(&kind) {
            return id;
        }
        let Ok(raw) = u32::try_from(self.kinds.len()) else {
            panic!("type table overflow");
        };
        let id = TypeId(raw);
        self.kinds.push(kind);
        self.lookup.insert(kind, id);
        id
    }

    /// Look up a type's structure. Unknown ids read as `void`.
    #[inline]
    pub fn kind(&self, id: TypeId) -> TypeKind {
        self.kinds.get(id.index()).copied().unwrap_or(TypeKind::Void)
    }

    pub fn class_of(&self, id: TypeId) -> Option<ClassId> {
        match self.kind(id) {
            TypeKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn element_of(&self, id: TypeId) -> Option<TypeId> {
        match self.kind(id) {
            TypeKind::Array(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl From<Vec<TypeKind>> for TypeTable {
    /// Rebuild the table from its serialized form. The primitive prefix is
    /// always re-seeded, so a serialized table may omit it.
    fn from(kinds: Vec<TypeKind>) -> Self {
        let mut table = TypeTable::new();
        let skip = if kinds.starts_with(&TypeKind::PRIMITIVES) {
            TypeKind::PRIMITIVES.len()
        } else {
            0
        };
        for kind in kinds.into_iter().skip(skip) {
            table.intern(kind);
        }
        table
    }
}

impl From<TypeTable> for Vec<TypeKind> {
    fn from(table: TypeTable) -> Self {
        table.kinds
    }
}
