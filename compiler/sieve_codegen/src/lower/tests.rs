#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use sieve_diagnostic::ErrorCode;
use sieve_ir::ast::{BinaryOp, ExprKind, Literal, StmtKind, UnaryOp};
use sieve_ir::{Constant, Modifiers, TypeId};

use crate::test_helpers::{function, translate_err, translate_ok, Fixture};

const INT: TypeId = TypeId::INT;

#[test]
fn test_code_directive_replaces_body_verbatim() {
    let mut f = Fixture::new();
    let thing = f.b.class("vm.Thing");
    let thing_ty = f.b.class_type(thing);
    let now = f.static_method("now", &[], TypeId::LONG);
    // Never visited: allocation would be rejected.
    let alloc = f.b.expr(
        ExprKind::NewObject {
            class: thing,
            args: vec![],
        },
        thing_ty,
    );
    let stmt = f.b.expr_stmt(alloc);
    let body = f.b.block(vec![stmt]);
    f.declare(now, Some("@tag root @tag code(return sysTimeMillis();)"), Some(body));
    let text = translate_ok(&f.finish());

    assert_eq!(
        function(&text, "Heap_now"),
        "static jlong Heap_now(void) {\n    return sysTimeMillis();\n}\n"
    );
    assert!(text.contains(" * @tag root @tag code(return sysTimeMillis();)\n */\nstatic jlong Heap_now(void) {"));
}

#[test]
fn test_code_directive_without_return() {
    let mut f = Fixture::new();
    let m = f.static_method("count", &[], INT);
    f.declare(m, Some("@tag root @tag code(counter++;)"), None);
    let errors = translate_err(&f.finish());
    assert_eq!(
        errors,
        vec![(
            ErrorCode::E2002,
            "code directive of a non-void function does not include a return statement".to_owned()
        )]
    );
}

#[test]
fn test_macro_directive() {
    let mut f = Fixture::new();
    let words = f.static_method("words", &[("n", INT)], INT);
    f.declare(words, Some("@tag root @tag macro(n << 2)"), None);
    let text = translate_ok(&f.finish());

    assert!(text.contains("#define Heap_words(n) n << 2\n"), "{text}");
    assert!(!text.contains("static int Heap_words("));
    let define = text.find("#define Heap_words").unwrap();
    let builtins = text.find("int div_i(").unwrap();
    assert!(define < builtins);
}

#[test]
fn test_proxy_directive() {
    let mut f = Fixture::new();
    let size = f.b.method(f.class, "size", &[("n", INT)], INT, Modifiers::empty());
    let flush = f.static_method("flush", &[], TypeId::VOID);
    f.declare(size, Some("@tag root @tag proxy(heapSize)"), None);
    f.declare(flush, Some("@tag root @tag proxy"), None);
    let text = translate_ok(&f.finish());

    assert_eq!(
        function(&text, "Heap_size"),
        "static int Heap_size(Address this, int n) {\n    return heapSize(this, n);\n}\n"
    );
    assert_eq!(
        function(&text, "Heap_flush"),
        "static void Heap_flush(void) {\n    flush();\n}\n"
    );
}

#[test]
fn test_dispatch_over_implementers() {
    let mut f = Fixture::new();
    let shape = f.b.class_with("vm.Shape", None, &[], Modifiers::ABSTRACT);
    let area = f.b.method(shape, "area", &[], INT, Modifiers::ABSTRACT);
    f.declare(area, Some("@tag root @tag implementers(vm.Square vm.Circle vm.Tri)"), None);
    for name in ["vm.Square", "vm.Circle", "vm.Tri"] {
        let class = f.b.class_with(name, Some(shape), &[], Modifiers::FINAL);
        let method = f.b.method(class, "area", &[], INT, Modifiers::empty());
        let one = f.b.int(1);
        let ret = f.b.ret(Some(one));
        let body = f.b.block(vec![ret]);
        f.declare(method, None, Some(body));
    }
    let text = translate_ok(&f.finish());

    let expected = "\
static int Shape_area(Address this) {
    Address klass = getClass(this);
    int id = vm_Klass_id(klass);
    int suiteID = id >= 0 ? id : -(id + 1);
    switch (suiteID) {
        case vm_Circle: return Circle_area(this);
        case vm_Square: return Square_area(this);
        case vm_Tri: return Tri_area(this);
        default: fatalVMError(\"bad abstract method dispatch\");
    }
}
";
    assert_eq!(function(&text, "Shape_area"), expected);
    assert_eq!(
        function(&text, "Tri_area"),
        "static int Tri_area(Address this) {\n    return 1;\n}\n"
    );
}

#[test]
fn test_checked_arithmetic_helpers() {
    let mut f = Fixture::new();
    let m = f.static_method(
        "calc",
        &[("a", INT), ("b", INT), ("x", TypeId::LONG), ("s", INT)],
        TypeId::VOID,
    );
    let (a, b, x, s) = (f.b.param(m, 0), f.b.param(m, 1), f.b.param(m, 2), f.b.param(m, 3));
    let q = f.b.local("q", INT);
    let w = f.b.local("w", TypeId::LONG);
    let v = f.b.local("v", TypeId::LONG);

    let (ra, rb) = (f.b.read(a), f.b.read(b));
    let div = f.b.binary(BinaryOp::Div, ra, rb);
    let decl_q = f.b.declare_local(q, Some(div));
    let (rx, rs) = (f.b.read(x), f.b.read(s));
    let shift = f.b.binary(BinaryOp::Shl, rx, rs);
    let decl_w = f.b.declare_local(w, Some(shift));
    let (rx, rb) = (f.b.read(x), f.b.read(b));
    let rem = f.b.binary(BinaryOp::Rem, rx, rb);
    let decl_v = f.b.declare_local(v, Some(rem));
    let (rs, rx) = (f.b.read(s), f.b.read(x));
    let ushr = f.b.binary(BinaryOp::UShr, rs, rx);
    let stmt = f.b.expr_stmt(ushr);
    f.root(m, vec![decl_q, decl_w, decl_v, stmt]);
    let text = translate_ok(&f.finish());

    let body = function(&text, "Heap_calc");
    assert!(body.contains("    q = div_i(a, b);\n"), "{body}");
    assert!(body.contains("    w = slll(x, s);\n"), "{body}");
    assert!(body.contains("    v = rem_l(x, b);\n"), "{body}");
    // Shifts take the left operand's type.
    assert!(body.contains("    srl(s, x);\n"), "{body}");
}

#[test]
fn test_parentheses_follow_precedence() {
    let mut f = Fixture::new();
    let m = f.static_method("prec", &[("a", INT), ("b", INT), ("c", INT)], INT);
    let (a, b, c) = (f.b.param(m, 0), f.b.param(m, 1), f.b.param(m, 2));

    let mut stmts = Vec::new();
    // (a + b) * c
    let (ra, rb, rc) = (f.b.read(a), f.b.read(b), f.b.read(c));
    let sum = f.b.binary(BinaryOp::Add, ra, rb);
    let product = f.b.binary(BinaryOp::Mul, sum, rc);
    stmts.push(f.b.expr_stmt(product));
    // a - (b - c)
    let (ra, rb, rc) = (f.b.read(a), f.b.read(b), f.b.read(c));
    let inner = f.b.binary(BinaryOp::Sub, rb, rc);
    let outer = f.b.binary(BinaryOp::Sub, ra, inner);
    stmts.push(f.b.expr_stmt(outer));
    // a - b - c
    let (ra, rb, rc) = (f.b.read(a), f.b.read(b), f.b.read(c));
    let left = f.b.binary(BinaryOp::Sub, ra, rb);
    let chain = f.b.binary(BinaryOp::Sub, left, rc);
    stmts.push(f.b.expr_stmt(chain));
    // a + b * c
    let (ra, rb, rc) = (f.b.read(a), f.b.read(b), f.b.read(c));
    let mul = f.b.binary(BinaryOp::Mul, rb, rc);
    let add = f.b.binary(BinaryOp::Add, ra, mul);
    stmts.push(f.b.expr_stmt(add));
    // a < b == b < c
    let (ra, rb, rb2, rc) = (f.b.read(a), f.b.read(b), f.b.read(b), f.b.read(c));
    let lt1 = f.b.binary(BinaryOp::Lt, ra, rb);
    let lt2 = f.b.binary(BinaryOp::Lt, rb2, rc);
    let eq = f.b.binary(BinaryOp::Eq, lt1, lt2);
    stmts.push(f.b.expr_stmt(eq));
    // return - -a
    let ra = f.b.read(a);
    let neg = f.b.expr(ExprKind::Unary { op: UnaryOp::Neg, operand: ra }, INT);
    let negneg = f.b.expr(ExprKind::Unary { op: UnaryOp::Neg, operand: neg }, INT);
    stmts.push(f.b.ret(Some(negneg)));
    f.root(m, stmts);
    let text = translate_ok(&f.finish());

    let expected = "\
static int Heap_prec(int a, int b, int c) {
    (a + b) * c;
    a - (b - c);
    a - b - c;
    a + b * c;
    a < b == b < c;
    return - -a;
}
";
    assert_eq!(function(&text, "Heap_prec"), expected);
}

#[test]
fn test_literal_spellings() {
    let mut f = Fixture::new();
    let m = f.static_method("limits", &[], TypeId::VOID);
    let lo = f.b.local("lo", INT);
    let wide = f.b.local("wide", TypeId::LONG);
    let ch = f.b.local("ch", TypeId::CHAR);
    let min = f.b.int(i32::MIN);
    let decl_lo = f.b.declare_local(lo, Some(min));
    let big = f.b.long(1 << 40);
    let decl_wide = f.b.declare_local(wide, Some(big));
    let quote = f.b.expr(ExprKind::Literal(Literal::Char(u16::from(b'\''))), TypeId::CHAR);
    let decl_ch = f.b.declare_local(ch, Some(quote));
    f.root(m, vec![decl_lo, decl_wide, decl_ch]);
    let text = translate_ok(&f.finish());

    let body = function(&text, "Heap_limits");
    assert!(body.contains("lo = (-2147483647 - 1);"), "{body}");
    assert!(body.contains("wide = 1099511627776L;"), "{body}");
    assert!(body.contains("ch = '\\'';"), "{body}");
}

#[test]
fn test_field_access_and_null_checks() {
    let mut f = Fixture::new();
    let node = f.b.class_with("vm.Node", None, &[], Modifiers::FINAL);
    let node_ty = f.b.class_type(node);
    let next = f.b.field(node, "next", node_ty, Modifiers::empty());
    let value = f.b.field(node, "value", INT, Modifiers::empty());
    let m = f.static_method("walk", &[("n", node_ty)], INT);
    let n = f.b.param(m, 0);

    let rn = f.b.read(n);
    let target = f.b.field_ref(Some(rn), value);
    let three = f.b.int(3);
    let store = f.b.assign(target, three);
    let store = f.b.expr_stmt(store);

    let rn = f.b.read(n);
    let hop = f.b.field_ref(Some(rn), next);
    let read = f.b.field_ref(Some(hop), value);
    let ret = f.b.ret(Some(read));
    f.root(m, vec![store, ret]);
    let text = translate_ok(&f.finish());

    let body = function(&text, "Heap_walk");
    assert!(body.contains("    set_vm_Node_value(n, 3);\n"), "{body}");
    assert!(
        body.contains("    return vm_Node_value(vm_Node_next(nullPointerCheck(n)));\n"),
        "{body}"
    );
}

#[test]
fn test_field_store_used_as_value_rejected() {
    let mut f = Fixture::new();
    let node = f.b.class_with("vm.Node", None, &[], Modifiers::FINAL);
    let node_ty = f.b.class_type(node);
    let value = f.b.field(node, "value", INT, Modifiers::empty());
    let sink = f.static_method("sink", &[("v", INT)], TypeId::VOID);
    let sink_body = f.b.block(vec![]);
    f.declare(sink, None, Some(sink_body));

    // return n.value = 3;
    let returned = f.static_method("returned", &[("n", node_ty)], INT);
    let n = f.b.param(returned, 0);
    let rn = f.b.read(n);
    let target = f.b.field_ref(Some(rn), value);
    let three = f.b.int(3);
    let store = f.b.assign(target, three);
    let ret = f.b.ret(Some(store));
    f.root(returned, vec![ret]);

    // sink(n.value = 1);
    let passed = f.static_method("passed", &[("n", node_ty)], TypeId::VOID);
    let n = f.b.param(passed, 0);
    let rn = f.b.read(n);
    let target = f.b.field_ref(Some(rn), value);
    let one = f.b.int(1);
    let store = f.b.assign(target, one);
    let call = f.b.call(None, sink, vec![store]);
    let call = f.b.expr_stmt(call);
    f.root(passed, vec![call]);

    // if ((n.value = 2) != 0) ;
    let tested = f.static_method("tested", &[("n", node_ty)], TypeId::VOID);
    let n = f.b.param(tested, 0);
    let rn = f.b.read(n);
    let target = f.b.field_ref(Some(rn), value);
    let two = f.b.int(2);
    let store = f.b.assign(target, two);
    let store = f.b.expr(ExprKind::Paren(store), INT);
    let zero = f.b.int(0);
    let cond = f.b.binary(BinaryOp::NotEq, store, zero);
    let then_branch = f.b.stmt(StmtKind::Empty);
    let branch = f.b.stmt(StmtKind::If {
        cond,
        then_branch,
        else_branch: None,
    });
    f.root(tested, vec![branch]);

    let errors = translate_err(&f.finish());
    assert_eq!(errors.len(), 3, "{errors:?}");
    for (code, message) in &errors {
        assert_eq!(*code, ErrorCode::E2001);
        assert_eq!(
            message,
            "converter cannot handle assignment to non-local, non-global variable as an expression"
        );
    }
}

#[test]
fn test_constants_and_globals() {
    let mut f = Fixture::new();
    let hdr = f.b.class("vm.HDR");
    let length = f.b.constant(hdr, "length", INT, Constant::Int(4));
    let big = f.b.class("lib.Big");
    let wide = f.b.constant(big, "WIDE", TypeId::LONG, Constant::Long(5));
    let marker = f.b.class_with("vm.pragma.GlobalStaticFields", None, &[], Modifiers::INTERFACE);
    let globals = f.b.class_with("vm.Globals", None, &[marker], Modifiers::FINAL);
    let start = f.b.field(globals, "heapStart", INT, Modifiers::STATIC);
    let m = f.static_method("setup", &[], TypeId::LONG);

    let target = f.b.field_ref(None, start);
    let len = f.b.field_ref(None, length);
    let store = f.b.assign(target, len);
    let store = f.b.expr_stmt(store);
    let value = f.b.field_ref(None, wide);
    let ret = f.b.ret(Some(value));
    f.root(m, vec![store, ret]);
    let text = translate_ok(&f.finish());

    let body = function(&text, "Heap_setup");
    assert!(body.contains("    vm_Globals_heapStart = /*HDR_length*/4;\n"), "{body}");
    assert!(body.contains("    return JLONG_CONSTANT(5);\n"), "{body}");
}

#[test]
fn test_compound_assignment_on_locals() {
    let mut f = Fixture::new();
    let m = f.static_method("acc", &[("x", INT), ("y", INT)], INT);
    let (x, y) = (f.b.param(m, 0), f.b.param(m, 1));
    let mut stmts = Vec::new();
    for (op, value) in [(BinaryOp::Add, None), (BinaryOp::Div, Some(y)), (BinaryOp::Mul, None)] {
        let target = f.b.read(x);
        let value = match (op, value) {
            (BinaryOp::Mul, _) => {
                let ry = f.b.read(y);
                let one = f.b.int(1);
                f.b.binary(BinaryOp::Add, ry, one)
            }
            (_, Some(local)) => f.b.read(local),
            (_, None) => f.b.int(3),
        };
        let compound = f.b.expr(ExprKind::CompoundAssign { op, target, value }, INT);
        stmts.push(f.b.expr_stmt(compound));
    }
    let rx = f.b.read(x);
    let inc = f.b.expr(ExprKind::Unary { op: UnaryOp::PostInc, operand: rx }, INT);
    stmts.push(f.b.ret(Some(inc)));
    f.root(m, stmts);
    let text = translate_ok(&f.finish());

    let expected = "\
static int Heap_acc(int x, int y) {
    x = x + 3;
    x = div_i(x, y);
    x = x * (y + 1);
    return x++;
}
";
    assert_eq!(function(&text, "Heap_acc"), expected);
}

#[test]
fn test_non_local_mutation_rejected() {
    let mut f = Fixture::new();
    let count = f.b.field(f.class, "count", INT, Modifiers::empty());
    let m = f.b.method(f.class, "bump", &[], TypeId::VOID, Modifiers::empty());
    let target = f.b.field_ref(None, count);
    let inc = f.b.expr(ExprKind::Unary { op: UnaryOp::PreInc, operand: target }, INT);
    let stmt = f.b.expr_stmt(inc);
    f.root(m, vec![stmt]);
    let errors = translate_err(&f.finish());
    assert_eq!(
        errors,
        vec![(
            ErrorCode::E2001,
            "converter cannot handle non-local increment/decrement".to_owned()
        )]
    );
}

#[test]
fn test_rejected_constructs() {
    let mut f = Fixture::new();
    let list_ty = f.b.array_type(INT);
    let mut cases: Vec<(&str, sieve_ir::StmtId)> = Vec::new();

    let body = f.b.block(vec![]);
    let try_stmt = f.b.stmt(StmtKind::Try {
        body,
        catches: vec![],
        finally: None,
    });
    cases.push(("try statement", try_stmt));

    let five = f.b.int(5);
    let alloc = f.b.expr(
        ExprKind::NewArray {
            element: INT,
            dims: vec![five],
        },
        list_ty,
    );
    cases.push(("array allocation", f.b.expr_stmt(alloc)));

    let body = f.b.block(vec![]);
    let labeled = f.b.stmt(StmtKind::Labeled {
        label: "outer".to_owned(),
        body,
    });
    cases.push(("label", labeled));

    let hello = f.b.str_lit("a");
    let world = f.b.str_lit("b");
    let concat = f.b.binary(BinaryOp::Add, hello, world);
    cases.push(("string concatenation", f.b.expr_stmt(concat)));

    let unset = f.b.field(f.class, "unset", INT, Modifiers::STATIC);
    let read = f.b.field_ref(None, unset);
    cases.push(("access to non-constant static field", f.b.expr_stmt(read)));

    let half = f.b.expr(ExprKind::Literal(Literal::Double(0.5)), TypeId::DOUBLE);
    let two = f.b.expr(ExprKind::Literal(Literal::Double(2.0)), TypeId::DOUBLE);
    let product = f.b.binary(BinaryOp::Mul, half, two);
    cases.push(("float or double operation", f.b.expr_stmt(product)));

    for (index, &(_, stmt)) in cases.iter().enumerate() {
        let m = f.static_method(&format!("bad{index}"), &[], TypeId::VOID);
        f.root(m, vec![stmt]);
    }
    let errors = translate_err(&f.finish());
    assert!(errors.iter().all(|(code, _)| *code == ErrorCode::E2001));
    let mut messages: Vec<String> = errors.into_iter().map(|(_, message)| message).collect();
    messages.sort();

    let mut expected: Vec<String> = cases
        .iter()
        .map(|(desc, _)| format!("converter cannot handle {desc}"))
        .collect();
    expected.sort();
    assert_eq!(messages, expected);
}

#[test]
fn test_virtual_invocation_rejected() {
    let mut f = Fixture::new();
    let open = f.b.class("vm.Open");
    let open_ty = f.b.class_type(open);
    let poke = f.b.method(open, "poke", &[], TypeId::VOID, Modifiers::empty());
    let empty = f.b.block(vec![]);
    f.declare(poke, None, Some(empty));
    let m = f.static_method("run", &[("o", open_ty)], TypeId::VOID);
    let o = f.b.param(m, 0);
    let recv = f.b.read(o);
    let call = f.b.call(Some(recv), poke, vec![]);
    let stmt = f.b.expr_stmt(call);
    f.root(m, vec![stmt]);

    let errors = translate_err(&f.finish());
    let messages: Vec<&str> = errors.iter().map(|(_, m)| m.as_str()).collect();
    assert_eq!(
        messages,
        [
            "converter cannot handle virtual method invocation",
            "converter cannot handle virtual method"
        ]
    );
}

#[test]
fn test_constant_condition_drops_dead_branch() {
    let mut f = Fixture::new();
    let m = f.static_method("pick", &[], INT);
    let body = f.b.block(vec![]);
    // Would be rejected if it were translated.
    let dead = f.b.stmt(StmtKind::Try {
        body,
        catches: vec![],
        finally: None,
    });
    let two = f.b.int(2);
    let live = f.b.ret(Some(two));
    let cond = f.b.bool_lit(false);
    let cond = f.b.expr(ExprKind::Paren(cond), TypeId::BOOLEAN);
    let branch = f.b.stmt(StmtKind::If {
        cond,
        then_branch: dead,
        else_branch: Some(live),
    });
    f.root(m, vec![branch]);
    let text = translate_ok(&f.finish());

    assert_eq!(
        function(&text, "Heap_pick"),
        "static int Heap_pick(void) {\n    return 2;\n}\n"
    );
}

#[test]
fn test_control_flow_is_braced() {
    let mut f = Fixture::new();
    let m = f.static_method("spin", &[("n", INT)], TypeId::VOID);
    let n = f.b.param(m, 0);
    let i = f.b.local("i", INT);

    let zero = f.b.int(0);
    let init = f.b.declare_local(i, Some(zero));
    let (ri, rn) = (f.b.read(i), f.b.read(n));
    let cond = f.b.binary(BinaryOp::Lt, ri, rn);
    let ri = f.b.read(i);
    let step = f.b.expr(ExprKind::Unary { op: UnaryOp::PreInc, operand: ri }, INT);
    let brk = f.b.stmt(StmtKind::Break(None));
    let ri = f.b.read(i);
    let five = f.b.int(5);
    let is_five = f.b.binary(BinaryOp::Eq, ri, five);
    let body = f.b.stmt(StmtKind::If {
        cond: is_five,
        then_branch: brk,
        else_branch: None,
    });
    let for_loop = f.b.stmt(StmtKind::For {
        init: vec![init],
        cond: Some(cond),
        update: vec![step],
        body,
    });
    f.root(m, vec![for_loop]);
    let text = translate_ok(&f.finish());

    let expected = "\
static void Heap_spin(int n) {
    {
        int i;
        for (i = 0; i < n; ++i) {
            if (i == 5) {
                break;
            }
        }
    }
}
";
    assert_eq!(function(&text, "Heap_spin"), expected);
}

#[test]
fn test_sibling_loops_reuse_variable_names() {
    let mut f = Fixture::new();
    let m = f.static_method("loops", &[], TypeId::VOID);
    let mut stmts = Vec::new();
    for ty in [INT, TypeId::LONG] {
        let i = f.b.local("i", ty);
        let zero = f.b.int(0);
        let init = f.b.declare_local(i, Some(zero));
        let body = f.b.block(vec![]);
        stmts.push(f.b.stmt(StmtKind::For {
            init: vec![init],
            cond: None,
            update: vec![],
            body,
        }));
    }
    f.root(m, stmts);
    let text = translate_ok(&f.finish());

    let expected = "\
static void Heap_loops(void) {
    {
        int i;
        for (i = 0; ; ) {
        }
    }
    {
        jlong i;
        for (i = 0; ; ) {
        }
    }
}
";
    assert_eq!(function(&text, "Heap_loops"), expected);
}

#[test]
fn test_throw_becomes_fatal_error() {
    let mut f = Fixture::new();
    let oom = f.b.class("vm.OutOfMemoryError");
    let oom_ty = f.b.class_type(oom);
    let m = f.static_method("fail", &[], TypeId::VOID);
    let alloc = f.b.expr(
        ExprKind::NewObject {
            class: oom,
            args: vec![],
        },
        oom_ty,
    );
    let throw = f.b.stmt(StmtKind::Throw(alloc));
    f.root(m, vec![throw]);
    let text = translate_ok(&f.finish());
    assert!(text.contains("    fatalVMError(\"vm.OutOfMemoryError\");\n"));
}

#[test]
fn test_hoisted_and_renamed_locals() {
    let mut f = Fixture::new();
    let m = f.static_method("scan", &[("sp", INT)], INT);
    let sp = f.b.param(m, 0);
    let t = f.b.local("t", INT);
    let ip = f.b.local("ip", TypeId::SHORT);

    let rsp = f.b.read(sp);
    let decl_t = f.b.declare_local(t, Some(rsp));
    let decl_ip = f.b.declare_local(ip, None);
    let target = f.b.read(ip);
    let one = f.b.expr(ExprKind::Literal(Literal::Int(1)), TypeId::SHORT);
    let store = f.b.assign(target, one);
    let store = f.b.expr_stmt(store);
    let inner = f.b.block(vec![decl_ip, store]);
    let rt = f.b.read(t);
    let ret = f.b.ret(Some(rt));
    f.root(m, vec![decl_t, inner, ret]);
    let text = translate_ok(&f.finish());

    let expected = "\
static int Heap_scan(int _sp) {
    int t;
    t = _sp;
    {
        short _ip;
        _ip = 1;
    }
    return t;
}
";
    assert_eq!(function(&text, "Heap_scan"), expected);
}

#[test]
fn test_string_literals_are_pooled() {
    let mut f = Fixture::new();
    let string_ty = f.b.string_type();
    let m = f.static_method("greet", &[], string_ty);
    let s = f.b.local("s", string_ty);
    let first = f.b.str_lit("hi */");
    let decl = f.b.declare_local(s, Some(first));
    let second = f.b.str_lit("hi */");
    let ret = f.b.ret(Some(second));
    f.root(m, vec![decl, ret]);
    let text = translate_ok(&f.finish());

    let body = function(&text, "Heap_greet");
    assert_eq!(
        body.matches("getObjectForCStringLiteral(/*\"hi *\\/\"*/0)").count(),
        2,
        "{body}"
    );
    assert!(text.contains("Address LITERALS_FOR_vm_Heap[1];"));
}
