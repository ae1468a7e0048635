//! Builtin helper functions.
//!
//! A fixed catalogue emitted once per output, independent of the translated
//! methods: checked division and remainder, the array length accessor,
//! null and bounds checks, and typed array loads and stores built on them.

use crate::buffer::RenderStack;
use crate::TargetProfile;

/// Element accessors: (suffix, C value type, runtime getter, runtime setter).
/// A `None` setter means stores of that kind are not translated.
const ARRAY_ACCESSORS: [(char, &str, &str, Option<&str>); 9] = [
    ('b', "int", "getByte", Some("setByte")),
    ('s', "int", "getShort", Some("setShort")),
    ('c', "int", "getUShort", Some("setShort")),
    ('i', "int", "getInt", Some("setInt")),
    ('l', "jlong", "getLong", Some("setLong")),
    ('f', "float", "getFloat", Some("setFloat")),
    ('d', "double", "getDouble", Some("setDouble")),
    ('w', "UWord", "getUWord", Some("setUWord")),
    ('o', "Address", "getObject", None),
];

pub(crate) struct Builtins;

impl Builtins {
    /// Emit the whole catalogue.
    pub fn emit(out: &mut RenderStack, profile: &TargetProfile) {
        Self::emit_division(out, "div_i", "int", "(-2147483647 - 1)", "lhs", '/');
        Self::emit_division(out, "div_l", "jlong", "(-9223372036854775807L - 1)", "lhs", '/');
        Self::emit_division(out, "rem_i", "int", "(-2147483647 - 1)", "0", '%');
        Self::emit_division(out, "rem_l", "jlong", "(-9223372036854775807L - 1)", "0", '%');

        out.newline();
        out.writeln("int Array_length(Address oop) {");
        out.indent();
        out.writeln(&format!("return {};", profile.runtime.array_length));
        out.dedent();
        out.writeln("}");

        if profile.omit_runtime_checks {
            out.newline();
            out.writeln("#define nullPointerCheck(oop) (oop)");
            out.writeln("#define arrayBoundsCheck(oop, index)");
        } else {
            Self::emit_checks(out);
        }

        for (kind, value, getter, _) in ARRAY_ACCESSORS {
            out.newline();
            out.writeln(&format!("{value} aload_{kind}(Address oop, int index) {{"));
            out.indent();
            out.writeln("arrayBoundsCheck(oop, index);");
            out.writeln(&format!("return {getter}(oop, index);"));
            out.dedent();
            out.writeln("}");
        }
        for (kind, value, _, setter) in ARRAY_ACCESSORS {
            let Some(setter) = setter else { continue };
            out.newline();
            out.writeln(&format!(
                "void astore_{kind}(Address oop, int index, {value} value) {{"
            ));
            out.indent();
            out.writeln("arrayBoundsCheck(oop, index);");
            out.writeln(&format!("{setter}(oop, index, value);"));
            out.dedent();
            out.writeln("}");
        }
    }

    /// `MIN op -1` yields `overflow` instead of trapping; a zero divisor is
    /// a fatal error.
    fn emit_division(
        out: &mut RenderStack,
        name: &str,
        ty: &str,
        min: &str,
        overflow: &str,
        op: char,
    ) {
        out.newline();
        out.writeln(&format!("{ty} {name}({ty} lhs, {ty} rhs) {{"));
        out.indent();
        out.writeln("if (rhs == 0) {");
        out.indent();
        out.writeln("fatalVMError(\"divide by zero\");");
        out.dedent();
        out.writeln("}");
        out.writeln(&format!("if (lhs == {min} && rhs == -1) {{"));
        out.indent();
        out.writeln(&format!("return {overflow};"));
        out.dedent();
        out.writeln("}");
        out.writeln(&format!("return lhs {op} rhs;"));
        out.dedent();
        out.writeln("}");
    }

    fn emit_checks(out: &mut RenderStack) {
        out.newline();
        out.writeln("Address nullPointerCheck(Address oop) {");
        out.indent();
        out.writeln("if (oop == null) {");
        out.indent();
        out.writeln("fatalVMError(\"null pointer exception\");");
        out.dedent();
        out.writeln("}");
        out.writeln("return oop;");
        out.dedent();
        out.writeln("}");

        out.newline();
        out.writeln("void arrayBoundsCheck(Address oop, int index) {");
        out.indent();
        out.writeln("int length;");
        out.writeln("nullPointerCheck(oop);");
        out.writeln("length = Array_length(oop);");
        out.writeln("if (index < 0 || index >= length) {");
        out.indent();
        out.writeln("fatalVMError(\"array index out of bounds exception\");");
        out.dedent();
        out.writeln("}");
        out.dedent();
        out.writeln("}");
    }
}
