//! Type mapping: source types to C types.
//!
//! - Primitives map to fixed C spellings (`long` is `jlong`)
//! - Raw value types map through the profile's substitutions
//! - Every other reference or array type is an `Address`

use std::borrow::Cow;

use sieve_ir::{ClassId, Program, TypeId, TypeKind};

use crate::TargetProfile;

/// Maps types of one program under one profile.
#[derive(Copy, Clone)]
pub(crate) struct CTypeMapper<'a> {
    program: &'a Program,
    profile: &'a TargetProfile,
}

impl<'a> CTypeMapper<'a> {
    pub fn new(program: &'a Program, profile: &'a TargetProfile) -> Self {
        CTypeMapper { program, profile }
    }

    /// C spelling of a type.
    pub fn c_type(self, ty: TypeId) -> Cow<'a, str> {
        match self.program.type_kind(ty) {
            TypeKind::Byte => "signed char".into(),
            TypeKind::Char => "unsigned short".into(),
            TypeKind::Short => "short".into(),
            TypeKind::Int => "int".into(),
            TypeKind::Long => "jlong".into(),
            TypeKind::Boolean => "boolean".into(),
            TypeKind::Float => "float".into(),
            TypeKind::Double => "double".into(),
            TypeKind::Void => "void".into(),
            TypeKind::Class(class) => self.class_type(class),
            TypeKind::Null | TypeKind::Array(_) => "Address".into(),
        }
    }

    /// C spelling of a receiver of `class`.
    pub fn class_type(self, class: ClassId) -> Cow<'a, str> {
        match self.raw_name(class) {
            Some(name) => name.into(),
            None => "Address".into(),
        }
    }

    /// Substituted C name if `class` is a raw value type.
    pub fn raw_name(self, class: ClassId) -> Option<&'a str> {
        self.profile.substitute(&self.program.class(class).name)
    }

    /// Whether values of `ty` are object references that must be
    /// null-checked before use as a receiver.
    pub fn is_checked_reference(self, ty: TypeId) -> bool {
        match self.program.type_kind(ty) {
            TypeKind::Class(class) => self.raw_name(class).is_none(),
            TypeKind::Array(_) | TypeKind::Null => true,
            _ => false,
        }
    }

    /// One-letter code of a parameter type in overloaded function names.
    pub fn type_code(self, ty: TypeId) -> char {
        match self.program.type_kind(ty) {
            TypeKind::Byte => 'B',
            TypeKind::Char => 'C',
            TypeKind::Short => 'S',
            TypeKind::Int => 'I',
            TypeKind::Long => 'J',
            TypeKind::Boolean => 'Z',
            TypeKind::Float => 'F',
            TypeKind::Double => 'D',
            TypeKind::Void => 'V',
            TypeKind::Class(class) => self
                .raw_name(class)
                .and_then(|name| name.chars().next())
                .unwrap_or('L'),
            TypeKind::Null | TypeKind::Array(_) => 'L',
        }
    }

    /// Suffix of the `aload_`/`astore_` accessor for arrays of `element`.
    pub fn array_accessor(self, element: TypeId) -> char {
        match self.program.type_kind(element) {
            TypeKind::Byte | TypeKind::Boolean => 'b',
            TypeKind::Short => 's',
            TypeKind::Char => 'c',
            TypeKind::Int => 'i',
            TypeKind::Long => 'l',
            TypeKind::Float => 'f',
            TypeKind::Double => 'd',
            TypeKind::Class(class) if self.raw_name(class).is_some() => 'w',
            TypeKind::Void | TypeKind::Null | TypeKind::Class(_) | TypeKind::Array(_) => 'o',
        }
    }
}
