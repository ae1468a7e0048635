//! The whole resolved program handed over by the front end.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::ast::{Expr, SourceUnit, Stmt};
use crate::{
    ClassId, ClassSymbol, ExprId, FieldId, FieldSymbol, LocalId, LocalSymbol, MethodId,
    MethodKind, MethodSymbol, Modifiers, StmtId, TypeId, TypeKind, TypeTable, UnitId,
};

/// Symbol tables, AST arenas and source units of one translation run.
///
/// Immutable once loaded; every later phase borrows it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub types: TypeTable,
    #[serde(default)]
    pub classes: Vec<ClassSymbol>,
    #[serde(default)]
    pub methods: Vec<MethodSymbol>,
    #[serde(default)]
    pub fields: Vec<FieldSymbol>,
    #[serde(default)]
    pub locals: Vec<LocalSymbol>,
    #[serde(default)]
    pub exprs: Vec<Expr>,
    #[serde(default)]
    pub stmts: Vec<Stmt>,
    #[serde(default)]
    pub units: Vec<SourceUnit>,
}

impl Program {
    #[inline]
    pub fn class(&self, id: ClassId) -> &ClassSymbol {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &MethodSymbol {
        &self.methods[id.index()]
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &FieldSymbol {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn local(&self, id: LocalId) -> &LocalSymbol {
        &self.locals[id.index()]
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn unit(&self, id: UnitId) -> &SourceUnit {
        &self.units[id.index()]
    }

    #[inline]
    pub fn type_kind(&self, id: TypeId) -> TypeKind {
        self.types.kind(id)
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        (0..self.units.len()).map(UnitId::from_len)
    }

    pub fn method_ids(&self) -> impl Iterator<Item = MethodId> + '_ {
        (0..self.methods.len()).map(MethodId::from_len)
    }

    /// Check that every id the model refers to is in range.
    ///
    /// Returns a description of the first dangling reference found.
    pub fn validate(&self) -> Result<(), String> {
        let in_range = |index: usize, len: usize| index < len;
        for (i, method) in self.methods.iter().enumerate() {
            if !in_range(method.owner.index(), self.classes.len()) {
                return Err(format!("method #{i} `{}` has unknown owner", method.name));
            }
            if let Some(p) = method.params.iter().find(|p| !in_range(p.index(), self.locals.len())) {
                return Err(format!("method #{i} `{}` has unknown parameter {p:?}", method.name));
            }
        }
        for (i, field) in self.fields.iter().enumerate() {
            if !in_range(field.owner.index(), self.classes.len()) {
                return Err(format!("field #{i} `{}` has unknown owner", field.name));
            }
        }
        for (i, class) in self.classes.iter().enumerate() {
            let mut supers = class.superclass.iter().chain(&class.interfaces);
            if let Some(s) = supers.find(|s| !in_range(s.index(), self.classes.len())) {
                return Err(format!("class #{i} `{}` has unknown supertype {s:?}", class.name));
            }
        }
        Ok(())
    }

    /// Qualified type name for diagnostics (`int`, `a.b.C`, `byte[]`).
    pub fn type_name(&self, id: TypeId) -> String {
        match self.type_kind(id) {
            TypeKind::Byte => "byte".to_owned(),
            TypeKind::Char => "char".to_owned(),
            TypeKind::Short => "short".to_owned(),
            TypeKind::Int => "int".to_owned(),
            TypeKind::Long => "long".to_owned(),
            TypeKind::Boolean => "boolean".to_owned(),
            TypeKind::Float => "float".to_owned(),
            TypeKind::Double => "double".to_owned(),
            TypeKind::Void => "void".to_owned(),
            TypeKind::Null => "null".to_owned(),
            TypeKind::Class(class) => self.class(class).name.clone(),
            TypeKind::Array(elem) => format!("{}[]", self.type_name(elem)),
        }
    }

    /// `Type.method` as used in call-chain frames.
    pub fn method_display(&self, id: MethodId) -> String {
        let method = self.method(id);
        format!("{}.{}", self.class(method.owner).name, method.name)
    }

    /// Parameter types of a method, in order.
    pub fn param_types(&self, id: MethodId) -> impl Iterator<Item = TypeId> + '_ {
        self.method(id).params.iter().map(|&p| self.local(p).ty)
    }

    /// Same parameter types and return type. There are no generics in the
    /// accepted subset, so this is the erased signature.
    pub fn same_signature(&self, a: MethodId, b: MethodId) -> bool {
        self.method(a).return_type == self.method(b).return_type
            && self.param_types(a).eq(self.param_types(b))
    }

    /// Whether `sub` is `sup` or inherits from it through superclasses or
    /// interfaces.
    pub fn is_subclass(&self, sub: ClassId, sup: ClassId) -> bool {
        self.supertypes(sub).any(|c| c == sup)
    }

    /// `sub` itself followed by all its transitive supertypes, breadth first.
    pub fn supertypes(&self, sub: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        let mut queue = VecDeque::from([sub]);
        let mut seen = FxHashSet::default();
        std::iter::from_fn(move || {
            while let Some(next) = queue.pop_front() {
                if !seen.insert(next) {
                    continue;
                }
                let class = self.class(next);
                queue.extend(class.superclass);
                queue.extend(class.interfaces.iter().copied());
                return Some(next);
            }
            None
        })
    }

    /// Whether `candidate` overrides `base`: a different method with the same
    /// name and signature, declared in a subtype of `base`'s owner.
    pub fn overrides(&self, candidate: MethodId, base: MethodId) -> bool {
        let (c, b) = (self.method(candidate), self.method(base));
        candidate != base
            && c.name == b.name
            && self.same_signature(candidate, base)
            && self.is_subclass(c.owner, b.owner)
    }

    /// Whether the owner declares another ordinary method with the same name.
    pub fn is_overloaded(&self, id: MethodId) -> bool {
        let method = self.method(id);
        self.methods.iter().enumerate().any(|(i, other)| {
            i != id.index()
                && other.owner == method.owner
                && other.kind == MethodKind::Method
                && other.name == method.name
        })
    }

    /// Whether a call to `id` needs dynamic dispatch.
    pub fn is_virtual(&self, id: MethodId) -> bool {
        let method = self.method(id);
        let sealed = Modifiers::STATIC | Modifiers::PRIVATE | Modifiers::FINAL;
        !method.modifiers.intersects(sealed)
            && !self.class(method.owner).modifiers.contains(Modifiers::FINAL)
    }

    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .position(|c| c.name == name)
            .map(ClassId::from_len)
    }

    /// Whether `class` or any of its supertypes has the given qualified name.
    pub fn inherits_named(&self, class: ClassId, name: &str) -> bool {
        self.supertypes(class).any(|c| self.class(c).name == name)
    }
}
