//! Demo/integration driver for the code generator.
//!
//! There is no lexer, parser, or type checker in this workspace — that is
//! explicitly out of scope for the back end (see `cc_codegen`). This
//! binary stands in for them: it hand-builds a handful of typed
//! `Program`s and runs them through `codegen`, printing the resulting
//! assembly listing for each to stdout.
//!
//! CC_LOG=debug cargo run -p cc

use std::io::{self, Write};

use cc_ast::function::{Function, Global, Program, Relocation};
use cc_ast::node::{CaseArm, Node, NodeKind, VarRef};
use cc_ast::ty::Type;
use tracing::debug;

fn main() {
    init_cc_logger();

    let target = cc_abi::target::LoongArch64Target::new();
    debug!(triple = %target.triple.as_str(), "targeting");

    let scenarios: Vec<(&str, Program)> = vec![
        ("return a constant", scenario_return_constant()),
        ("two locals, addition", scenario_two_locals()),
        ("function call", scenario_function_call()),
        ("string literal indexing", scenario_string_literal()),
        ("for loop", scenario_for_loop()),
        ("switch statement", scenario_switch()),
    ];

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (name, mut program) in scenarios {
        debug!(scenario = name, "compiling");
        writeln!(out, "# --- {name} ---").unwrap();
        if let Err(e) = cc_codegen::codegen(&mut program, &mut out) {
            eprintln!("codegen error in `{name}`: {e}");
            std::process::exit(1);
        }
        writeln!(out).unwrap();
    }
}

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

/// `int main(){return 42;}`
fn scenario_return_constant() -> Program {
    let body = Node::new(
        NodeKind::Block(vec![ret(num(42, Type::int(false), 1), 1)]),
        None,
        1,
    );
    let main = Function::new("main", true, false, body);
    Program {
        globals: Vec::new(),
        functions: vec![main],
    }
}

/// `int main(){int a=3;int b=4;return a+b;}`
fn scenario_two_locals() -> Program {
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

    Program {
        globals: Vec::new(),
        functions: vec![main],
    }
}

/// `int f(int a,int b){return a-b;} int main(){return f(10,3);}`
fn scenario_function_call() -> Program {
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

    Program {
        globals: Vec::new(),
        functions: vec![f, main],
    }
}

/// `char *s="hi"; int main(){return s[0];}`
fn scenario_string_literal() -> Program {
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

    Program {
        globals: vec![literal, s],
        functions: vec![main],
    }
}

/// `int main(){int i;int s=0;for(i=0;i<10;i=i+1)s=s+i;return s;}`
fn scenario_for_loop() -> Program {
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

    Program {
        globals: Vec::new(),
        functions: vec![main],
    }
}

/// `int main(){switch(3){case 1: return 10; case 3: return 30; default: return 0;}}`
fn scenario_switch() -> Program {
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

    Program {
        globals: Vec::new(),
        functions: vec![main],
    }
}

fn init_cc_logger() {
    let cfg = match cc_log::LoggerConfig::from_env("CC") {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error reading CC logger env vars: {e}");
            std::process::exit(1);
        }
    };
    if let Err(err) = cc_log::Logger::init_logger(cfg) {
        eprintln!("error initializing logger: {err:?}");
        std::process::exit(1);
    }
}
