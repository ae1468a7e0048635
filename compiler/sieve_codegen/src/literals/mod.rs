//! String literal pool.
//!
//! Translated code cannot create string objects, so every string literal is
//! looked up at run time among the constant objects of the type that owns
//! the method using it. Literals are pooled per owning type; a literal is
//! addressed by a packed `(type index, literal index)` key, and the emitted
//! tables resolve keys lazily on first use.

use std::fmt::Write;

use rustc_hash::FxHashMap;
use sieve_ir::{ClassId, Program};
use thiserror::Error;

use crate::buffer::RenderStack;
use crate::mangle::type_ident;
use crate::TargetProfile;

/// Exclusive upper bound of both key halves.
pub const MAX_INDEX: usize = 0x7FFF;

/// Position of a literal in the pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LiteralKey {
    pub class_index: u16,
    pub literal_index: u16,
}

impl LiteralKey {
    /// `class_index << 16 | literal_index`, as passed to
    /// `getObjectForCStringLiteral`.
    pub fn packed(self) -> u32 {
        (u32::from(self.class_index) << 16) | u32::from(self.literal_index)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
#[error("literal pool exhausted")]
pub struct PoolExhausted;

#[derive(Debug, Default)]
struct ClassLiterals {
    texts: Vec<String>,
    index: FxHashMap<String, usize>,
}

/// Per-type ordered, deduplicated literal lists.
#[derive(Debug, Default)]
pub struct LiteralPool {
    classes: Vec<ClassId>,
    class_index: FxHashMap<ClassId, usize>,
    literals: Vec<ClassLiterals>,
}

impl LiteralPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of `text` under `owner`, appending it on first request.
    pub fn pool(&mut self, owner: ClassId, text: &str) -> Result<LiteralKey, PoolExhausted> {
        let class_index = match self.class_index.get(&owner) {
            Some(&index) => index,
            None => {
                let index = self.classes.len();
                if index >= MAX_INDEX {
                    return Err(PoolExhausted);
                }
                self.classes.push(owner);
                self.literals.push(ClassLiterals::default());
                self.class_index.insert(owner, index);
                index
            }
        };
        let list = &mut self.literals[class_index];
        let literal_index = match list.index.get(text) {
            Some(&index) => index,
            None => {
                let index = list.texts.len();
                if index >= MAX_INDEX {
                    return Err(PoolExhausted);
                }
                list.texts.push(text.to_owned());
                list.index.insert(text.to_owned(), index);
                index
            }
        };
        Ok(LiteralKey {
            class_index: u16::try_from(class_index).map_err(|_| PoolExhausted)?,
            literal_index: u16::try_from(literal_index).map_err(|_| PoolExhausted)?,
        })
    }

    /// Owning types with their literals, in type-index order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &[String])> {
        self.classes
            .iter()
            .zip(&self.literals)
            .map(|(&class, list)| (class, list.texts.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.literals.iter().map(|list| list.texts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Contents of a C string literal (without the quotes).
pub fn escape_c(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_graphic() || c == ' ' => out.push(c),
            c => {
                let mut units = [0u8; 4];
                for byte in c.encode_utf8(&mut units).bytes() {
                    let _ = write!(out, "\\{byte:03o}");
                }
            }
        }
    }
    out
}

/// Rendered use of a pooled literal.
pub(crate) fn render_use(text: &str, key: LiteralKey) -> String {
    let comment = escape_c(text).replace("*/", "*\\/");
    format!("getObjectForCStringLiteral(/*\"{comment}\"*/{})", key.packed())
}

/// Emit the literal tables and their lookup functions.
pub(crate) fn emit_tables(
    out: &mut RenderStack,
    pool: &LiteralPool,
    program: &Program,
    profile: &TargetProfile,
) {
    let runtime = &profile.runtime;
    out.newline();
    out.writeln(&format!(
        "Address *ALL_LITERALS[{}];",
        pool.classes.len().max(1)
    ));
    for (class, literals) in pool.iter() {
        out.writeln(&format!(
            "Address LITERALS_FOR_{}[{}];",
            type_ident(&program.class(class).name),
            literals.len()
        ));
    }

    out.newline();
    out.writeln("Address findCStringInObjects(Address objects, int length, const char *s) {");
    out.indent();
    out.writeln("int i = 0;");
    out.writeln("int slen = strlen(s);");
    out.writeln("while (i != length) {");
    out.indent();
    out.writeln("Address object = aload_o(objects, i);");
    out.writeln("if (strncmp(s, (const char *)object, slen) == 0) {");
    out.indent();
    out.writeln("return object;");
    out.dedent();
    out.writeln("}");
    out.writeln("++i;");
    out.dedent();
    out.writeln("}");
    out.writeln("return null;");
    out.dedent();
    out.writeln("}");

    out.newline();
    out.writeln("Address getObjectForCStringLiteral(int key) {");
    out.indent();
    out.writeln("static boolean initialized = false;");
    out.writeln("int classKey = key >> 16 & 0xFFFF;");
    out.writeln("int literalKey = key & 0xFFFF;");
    out.writeln("Address *literals;");
    out.newline();
    out.writeln("if (!initialized) {");
    out.indent();
    out.writeln(&format!("Address bootstrapSuite = {};", runtime.bootstrap_suite));
    out.writeln(&format!(
        "Address classes = {}(bootstrapSuite);",
        runtime.suite_classes
    ));
    out.writeln("Address klass;");
    out.writeln("Address objects;");
    out.writeln("int length;");
    out.newline();
    out.writeln("initialized = true;");
    for (index, (class, literals)) in pool.iter().enumerate() {
        let ident = type_ident(&program.class(class).name);
        let table = format!("LITERALS_FOR_{ident}");
        out.newline();
        out.writeln(&format!("ALL_LITERALS[{index}] = {table};"));
        out.writeln(&format!("klass = aload_o(classes, {ident});"));
        out.writeln(&format!("objects = {}(klass);", runtime.class_objects));
        out.writeln("length = Array_length(objects);");
        for (slot, literal) in literals.iter().enumerate() {
            out.writeln(&format!(
                "{table}[{slot}] = findCStringInObjects(objects, length, \"{}\");",
                escape_c(literal)
            ));
        }
    }
    out.dedent();
    out.writeln("}");
    out.writeln("literals = ALL_LITERALS[classKey];");
    out.writeln("if (literals[literalKey] == null) {");
    out.indent();
    out.writeln("fatalVMError(\"accessing string literal in conditionally compiled out code\");");
    out.dedent();
    out.writeln("}");
    out.writeln("return literals[literalKey];");
    out.dedent();
    out.writeln("}");
}
