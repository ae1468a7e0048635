//! Typed indices into the program arenas.
//!
//! Every table in [`Program`](crate::Program) is a flat `Vec`; nodes and
//! symbols refer to each other through these `u32` newtypes instead of
//! references, so the whole model is `Clone`, serializable, and cheap to
//! compare. Equality of two ids is symbol identity.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Invalid id (sentinel value).
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Get the index into the owning arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }

            /// Build an id from an arena length.
            ///
            /// # Panics
            /// Panics if the arena outgrows `u32`.
            #[inline]
            pub(crate) fn from_len(len: usize) -> Self {
                match u32::try_from(len) {
                    Ok(raw) => $name(raw),
                    Err(_) => panic!(concat!(stringify!($name), " arena overflow")),
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!(stringify!($name), "({})"), self.0)
                } else {
                    write!(f, concat!(stringify!($name), "::INVALID"))
                }
            }
        }
    };
}

define_id!(
    /// Index of a class or interface symbol.
    ClassId
);
define_id!(
    /// Index of a method symbol. Two method ids are equal iff they denote the
    /// same declared method.
    MethodId
);
define_id!(
    /// Index of a field symbol.
    FieldId
);
define_id!(
    /// Index of a local variable or parameter symbol.
    LocalId
);
define_id!(
    /// Index into the expression arena.
    ExprId
);
define_id!(
    /// Index into the statement arena.
    StmtId
);
define_id!(
    /// Index of a source unit.
    UnitId
);
