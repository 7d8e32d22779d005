//! End-to-end scenarios: hand-built `Program`s run through `codegen`,
//! asserting on substrings of the emitted listing. These mirror the
//! concrete scenarios used to validate the back end's invariants.

use cc_ast::function::{Function, Global, Program, Relocation};
use cc_ast::node::{CaseArm, Node, NodeKind, VarRef};
use cc_ast::ty::Type;

fn num(val: i64, ty: Type, line: u32) -> Node {
    Node::new(NodeKind::Num(val), Some(ty), line)
}

fn var_local(local: cc_ast::local::Local, ty: Type, line: u32) -> Node {
    Node::new(NodeKind::Var(VarRef::Local(local)), Some(ty), line)
}

fn ret(expr: Node, line: u32) -> Node {
    Node::new(NodeKind::Return(Some(Box::new(expr))), None, line)
}

fn assign_stmt(lhs: Node, rhs: Node, line: u32) -> Node {
    let ty = lhs.ty.clone();
    Node::new(
        NodeKind::ExprStmt(Box::new(Node::new(
            NodeKind::Assign {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
            line,
        ))),
        None,
        line,
    )
}

fn compile(mut program: Program) -> String {
    let mut out = Vec::new();
    cc_codegen::codegen(&mut program, &mut out).expect("codegen should succeed");
    String::from_utf8(out).unwrap()
}

#[test]
fn returns_a_constant_with_a_sixteen_byte_frame() {
    let body = Node::new(
        NodeKind::Block(vec![ret(num(42, Type::int(false), 1), 1)]),
        None,
        1,
    );
    let main = Function::new("main", true, false, body);
    let program = Program {
        globals: Vec::new(),
        functions: vec![main],
    };
    let asm = compile(program);

    assert!(asm.contains("li.d $a0, 42"));
    assert!(asm.contains("b .L.return.main"));
    assert!(asm.contains("-16"));
}

#[test]
fn two_locals_are_homed_and_summed() {
    let placeholder = Node::new(NodeKind::Block(Vec::new()), None, 1);
    let mut main = Function::new("main", true, false, placeholder);
    let a = main.add_local("a", Type::int(false));
    let b = main.add_local("b", Type::int(false));

    let init_a = assign_stmt(var_local(a, Type::int(false), 1), num(3, Type::int(false), 1), 1);
    let init_b = assign_stmt(var_local(b, Type::int(false), 1), num(4, Type::int(false), 1), 1);
    let sum = Node::new(
        NodeKind::Add(
            Box::new(var_local(a, Type::int(false), 1)),
            Box::new(var_local(b, Type::int(false), 1)),
        ),
        Some(Type::int(false)),
        1,
    );
    main.body = Node::new(NodeKind::Block(vec![init_a, init_b, ret(sum, 1)]), None, 1);

    let program = Program {
        globals: Vec::new(),
        functions: vec![main],
    };
    let asm = compile(program);

    assert!(asm.matches("st.d").count() >= 2);
    assert!(asm.contains("add.w $a0, $a0, $a1"));
    assert!(asm.contains("b .L.return.main"));

    // `a` is the first local (address -4) and `b` the second (address -8):
    // each slot's data starts `size` bytes below the stored offset, so the
    // two must land at distinct, non-overlapping addresses.
    assert!(asm.contains("addi.d $a0, $fp, -4"));
    assert!(asm.contains("addi.d $a0, $fp, -8"));
}

#[test]
fn function_call_passes_args_in_reverse_pop_order() {
    let placeholder = Node::new(NodeKind::Block(Vec::new()), None, 1);
    let mut f = Function::new("f", true, false, placeholder);
    let pa = f.add_param("a", Type::int(false));
    let pb = f.add_param("b", Type::int(false));
    let sub = Node::new(
        NodeKind::Sub(
            Box::new(var_local(pa, Type::int(false), 1)),
            Box::new(var_local(pb, Type::int(false), 1)),
        ),
        Some(Type::int(false)),
        1,
    );
    f.body = Node::new(NodeKind::Block(vec![ret(sub, 1)]), None, 1);

    let call = Node::new(
        NodeKind::FunCall {
            name: "f".to_string(),
            args: vec![num(10, Type::int(false), 2), num(3, Type::int(false), 2)],
            ret_ty: Type::int(false),
        },
        Some(Type::int(false)),
        2,
    );
    let main_body = Node::new(NodeKind::Block(vec![ret(call, 2)]), None, 2);
    let main = Function::new("main", true, false, main_body);

    let program = Program {
        globals: Vec::new(),
        functions: vec![f, main],
    };
    let asm = compile(program);

    assert!(asm.contains("bl f"));
    assert!(asm.contains("sub.w $a0, $a0, $a1"));
}

#[test]
fn string_literal_emits_bytes_and_relocated_pointer_global() {
    let literal = Global {
        name: ".LC0".to_string(),
        ty: Type::array_of(Type::char(false), 3),
        is_static: true,
        is_definition: true,
        init_data: Some(vec![b'h', b'i', 0]),
        relocations: Vec::new(),
    };
    let s = Global {
        name: "s".to_string(),
        ty: Type::pointer_to(Type::char(false)),
        is_static: false,
        is_definition: true,
        init_data: Some(vec![0; 8]),
        relocations: vec![Relocation {
            offset: 0,
            label: ".LC0".to_string(),
            addend: 0,
        }],
    };

    let s_ptr = Node::new(
        NodeKind::Var(VarRef::Global("s".to_string())),
        Some(Type::pointer_to(Type::char(false))),
        1,
    );
    let deref = Node::new(NodeKind::Deref(Box::new(s_ptr)), Some(Type::char(false)), 1);
    let main_body = Node::new(NodeKind::Block(vec![ret(deref, 1)]), None, 1);
    let main = Function::new("main", true, false, main_body);

    let program = Program {
        globals: vec![literal, s],
        functions: vec![main],
    };
    let asm = compile(program);

    assert!(asm.contains(".byte 104"));
    assert!(asm.contains(".byte 105"));
    assert!(asm.contains(".byte 0"));
    assert!(asm.contains(".quad .LC0"));
    assert!(asm.contains("la.local $a0, s"));
    assert!(asm.contains("ld.b $a0, $a0, 0"));
}

#[test]
fn for_loop_has_begin_end_and_increment_before_back_edge() {
    let placeholder = Node::new(NodeKind::Block(Vec::new()), None, 1);
    let mut main = Function::new("main", true, false, placeholder);
    let i = main.add_local("i", Type::int(false));
    let s = main.add_local("s", Type::int(false));

    let init_s = assign_stmt(var_local(s, Type::int(false), 1), num(0, Type::int(false), 1), 1);
    let for_init = assign_stmt(var_local(i, Type::int(false), 1), num(0, Type::int(false), 1), 1);
    let for_cond = Node::new(
        NodeKind::Lt(
            Box::new(var_local(i, Type::int(false), 1)),
            Box::new(num(10, Type::int(false), 1)),
        ),
        Some(Type::bool()),
        1,
    );
    let inc_value = Node::new(
        NodeKind::Add(
            Box::new(var_local(i, Type::int(false), 1)),
            Box::new(num(1, Type::int(false), 1)),
        ),
        Some(Type::int(false)),
        1,
    );
    let for_inc = Node::new(
        NodeKind::Assign {
            lhs: Box::new(var_local(i, Type::int(false), 1)),
            rhs: Box::new(inc_value),
        },
        Some(Type::int(false)),
        1,
    );
    let sum_value = Node::new(
        NodeKind::Add(
            Box::new(var_local(s, Type::int(false), 1)),
            Box::new(var_local(i, Type::int(false), 1)),
        ),
        Some(Type::int(false)),
        1,
    );
    let for_body = assign_stmt(var_local(s, Type::int(false), 1), sum_value, 1);

    let for_stmt = Node::new(
        NodeKind::For {
            init: Some(Box::new(for_init)),
            cond: Some(Box::new(for_cond)),
            inc: Some(Box::new(for_inc)),
            body: Box::new(for_body),
            brk_label: ".L.for.brk.0".to_string(),
            cont_label: ".L.for.cont.0".to_string(),
        },
        None,
        1,
    );

    main.body = Node::new(
        NodeKind::Block(vec![init_s, for_stmt, ret(var_local(s, Type::int(false), 1), 1)]),
        None,
        1,
    );

    let program = Program {
        globals: Vec::new(),
        functions: vec![main],
    };
    let asm = compile(program);

    assert!(asm.contains(".L.begin."));
    assert!(asm.contains(".L.for.brk.0:"));
    assert!(asm.contains("beqz $a0,"));

    // `i` is the first local (address -4) and `s` the second (address -8).
    assert!(asm.contains("addi.d $a0, $fp, -4"));
    assert!(asm.contains("addi.d $a0, $fp, -8"));

    let cont_idx = asm.find(".L.for.cont.0:").unwrap();
    let back_edge_idx = asm[cont_idx..].find("b .L.begin.").unwrap() + cont_idx;
    let inc_idx = asm[cont_idx..back_edge_idx].find("add.w").unwrap() + cont_idx;
    assert!(inc_idx < back_edge_idx);
}

#[test]
fn switch_compares_each_case_before_falling_to_default() {
    let case1 = CaseArm {
        value: 1,
        label: ".L.case.1".to_string(),
        body: Box::new(ret(num(10, Type::int(false), 1), 1)),
    };
    let case3 = CaseArm {
        value: 3,
        label: ".L.case.2".to_string(),
        body: Box::new(ret(num(30, Type::int(false), 1), 1)),
    };
    let default_arm = CaseArm {
        value: 0,
        label: ".L.case.default".to_string(),
        body: Box::new(ret(num(0, Type::int(false), 1), 1)),
    };

    let body = Node::new(
        NodeKind::Block(vec![
            Node::new(NodeKind::Case(case1.clone()), None, 1),
            Node::new(NodeKind::Case(case3.clone()), None, 1),
            Node::new(NodeKind::Case(default_arm.clone()), None, 1),
        ]),
        None,
        1,
    );

    let switch = Node::new(
        NodeKind::Switch {
            cond: Box::new(num(3, Type::int(false), 1)),
            cases: vec![case1, case3],
            default_case: Some(default_arm),
            body: Box::new(body),
            brk_label: ".L.switch.brk.0".to_string(),
        },
        None,
        1,
    );

    let main_body = Node::new(NodeKind::Block(vec![switch]), None, 1);
    let main = Function::new("main", true, false, main_body);
    let program = Program {
        globals: Vec::new(),
        functions: vec![main],
    };
    let asm = compile(program);

    assert_eq!(asm.matches("li.d $a1,").count(), 2);
    assert_eq!(asm.matches("beqz $a1,").count(), 2);
    assert!(asm.contains("b .L.case.default"));
    assert!(asm.contains(".L.switch.brk.0:"));

    let default_idx = asm.find(".L.case.default:").unwrap();
    let brk_idx = asm.find(".L.switch.brk.0:").unwrap();
    assert!(default_idx < brk_idx);
}
