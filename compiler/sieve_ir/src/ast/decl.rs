//! Source units and the declarations they contain.

use serde::{Deserialize, Serialize};

use crate::{ClassId, FieldId, MethodId, Span, StmtId};

/// One source file as handed over by the front end.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SourceUnit {
    pub path: String,
    /// Full source text. May be left empty by the front end, in which case
    /// the driver loads it from the class path.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassDecl {
    pub class: ClassId,
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Member {
    Method(MethodDecl),
    Field {
        field: FieldId,
        #[serde(default)]
        span: Span,
    },
    /// Nested member class.
    Class(ClassDecl),
    /// `static { ... }` or instance initializer block.
    Initializer { body: StmtId, is_static: bool },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodDecl {
    pub method: MethodId,
    /// Documentation comment text, without the comment delimiters.
    #[serde(default)]
    pub doc: Option<String>,
    /// Body block; `None` for abstract and native methods.
    #[serde(default)]
    pub body: Option<StmtId>,
    #[serde(default)]
    pub span: Span,
}
