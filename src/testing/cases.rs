//! No front end builds BIR for us here, so every test graph is assembled by
//! hand in this module. Each case documents the source it stands for.

use crate::ir::{BinaryOp, ExprData, FuncID, Module, StmtID, StmtKind, TypeID, VarID};
use smallvec::smallvec;

/// ```C
/// int main() {
///     int x;
/// loop:
///     x = 1;          // s1
///     goto loop;      // s2
/// }
/// ```
pub struct GotoLoopCase {
    pub module: Module,
    pub func: FuncID,
    pub x: VarID,
    pub s1: StmtID,
    pub s2: StmtID,
}

pub fn goto_loop_case() -> GotoLoopCase {
    let mut module = Module::new("goto_loop");
    let i32ty = module.int_type(32, false);
    let x = module.new_var("x", i32ty);

    let lhs = module.var_expr(x);
    let one = module.const_int(1, 32);
    let s1 = module.new_stmt(StmtKind::Assign { lhs, rhs: one });
    module.set_label(s1, "loop");
    let s2 = module.new_stmt(StmtKind::Goto { target: s1 });
    module.chain_stmts(&[s1, s2]);

    let func = module.add_func("main", i32ty, &[], Some(s1));
    module.add_local(func, x);
    GotoLoopCase { module, func, x, s1, s2 }
}

/// ```C
/// int count() {
///     int i;
///     while (i < 10) {    // header
///         i = i + 1;      // body[0]
///         tick(i);        // body[1], falls back to the header
///     }
///     return i;           // exit
/// }
/// ```
pub struct LoopBackEdgeCase {
    pub module: Module,
    pub func: FuncID,
    pub i: VarID,
    pub header: StmtID,
    pub body: [StmtID; 2],
    pub exit: StmtID,
}

pub fn loop_back_edge_case() -> LoopBackEdgeCase {
    let mut module = Module::new("loop_back_edge");
    let i32ty = module.int_type(32, false);
    let void = module.void_type();
    let i = module.new_var("i", i32ty);

    let tick_ty = module.func_type(void, &[i32ty], false);
    let tick = module.new_var("tick", tick_ty);

    let i_use = module.var_expr(i);
    let ten = module.const_int(10, 32);
    let cond = module.binary_expr(BinaryOp::Lt, i_use, ten);

    let i_lhs = module.var_expr(i);
    let i_rhs = module.var_expr(i);
    let one = module.const_int(1, 32);
    let inc = module.binary_expr(BinaryOp::Add, i_rhs, one);
    let body0 = module.new_stmt(StmtKind::Assign { lhs: i_lhs, rhs: inc });

    let callee = module.var_expr(tick);
    let arg = module.var_expr(i);
    let call = module.new_expr(ExprData::Call { callee, args: smallvec![arg] });
    let body1 = module.new_stmt(StmtKind::Call(call));

    let header = module.new_stmt(StmtKind::While { cond, body: body0 });
    let ret_val = module.var_expr(i);
    let exit = module.new_stmt(StmtKind::Return(Some(ret_val)));

    module.chain_stmts(&[body0, body1, header]);
    module.set_succ(header, Some(exit));

    let func = module.add_func("count", i32ty, &[], Some(header));
    module.add_local(func, i);
    LoopBackEdgeCase { module, func, i, header, body: [body0, body1], exit }
}

/// ```C
/// struct node { int value; struct node *next; };
///
/// void link() {
///     struct node *p;
///     struct node *q;
/// }
/// ```
pub struct SelfRefStructCase {
    pub module: Module,
    pub func: FuncID,
    pub node_ty: TypeID,
    pub i32_ty: TypeID,
    pub node_ptr: TypeID,
    pub decls: Vec<StmtID>,
}

pub fn self_ref_struct_case() -> SelfRefStructCase {
    let mut module = Module::new("self_ref_struct");
    let node_ty = module.opaque_struct_type(Some("node"));
    let i32_ty = module.int_type(32, false);
    let node_ptr = module.ptr_type(node_ty);
    module
        .set_struct_elems(node_ty, vec![i32_ty, node_ptr])
        .expect("node is a struct");
    let void = module.void_type();

    let p = module.new_var("p", node_ptr);
    let q = module.new_var("q", node_ptr);
    let decls = vec![
        module.new_stmt(StmtKind::VarDef { var: p, init: None }),
        module.new_stmt(StmtKind::VarDef { var: q, init: None }),
    ];
    module.chain_stmts(&decls);

    let func = module.add_func("link", void, &[], Some(decls[0]));
    module.add_local(func, p);
    module.add_local(func, q);
    SelfRefStructCase { module, func, node_ty, i32_ty, node_ptr, decls }
}

/// ```C
/// int nested(int a) {
///     if (a > 0) {        // if_stmt
///         a = 1;          // then_body[0]
///         a = 2;          // then_body[1]
///     } else {
///         a = 3;          // else_body[0]
///     }
///     while (a != 0) {    // while_stmt
///         a = a - 1;      // while_body[0]
///     }
///     return a;           // tail
/// }
/// ```
pub struct NestedCase {
    pub module: Module,
    pub func: FuncID,
    pub a: VarID,
    pub if_stmt: StmtID,
    pub if_cond: crate::ir::ExprID,
    pub then_body: Vec<StmtID>,
    pub else_body: Vec<StmtID>,
    pub while_stmt: StmtID,
    pub while_cond: crate::ir::ExprID,
    pub while_body: Vec<StmtID>,
    pub tail: StmtID,
}

pub fn nested_case() -> NestedCase {
    let mut module = Module::new("nested");
    let i32ty = module.int_type(32, false);
    let a = module.new_var("a", i32ty);

    let assign_const = |module: &mut Module, value: i128| {
        let lhs = module.var_expr(a);
        let rhs = module.const_int(value, 32);
        module.new_stmt(StmtKind::Assign { lhs, rhs })
    };
    let then_body = vec![assign_const(&mut module, 1), assign_const(&mut module, 2)];
    let else_body = vec![assign_const(&mut module, 3)];
    module.chain_stmts(&then_body);

    let a_use = module.var_expr(a);
    let zero = module.const_int(0, 32);
    let if_cond = module.binary_expr(BinaryOp::Gt, a_use, zero);
    let if_stmt = module.new_stmt(StmtKind::If {
        clauses: smallvec![(if_cond, then_body[0])],
        else_clause: Some(else_body[0]),
    });

    let a_use = module.var_expr(a);
    let zero = module.const_int(0, 32);
    let while_cond = module.binary_expr(BinaryOp::Neq, a_use, zero);
    let lhs = module.var_expr(a);
    let a_use = module.var_expr(a);
    let one = module.const_int(1, 32);
    let dec = module.binary_expr(BinaryOp::Sub, a_use, one);
    let while_body = vec![module.new_stmt(StmtKind::Assign { lhs, rhs: dec })];
    let while_stmt = module.new_stmt(StmtKind::While { cond: while_cond, body: while_body[0] });

    let ret_val = module.var_expr(a);
    let tail = module.new_stmt(StmtKind::Return(Some(ret_val)));
    module.chain_stmts(&[if_stmt, while_stmt, tail]);

    let func = module.add_func("nested", i32ty, &[a], Some(if_stmt));
    NestedCase {
        module,
        func,
        a,
        if_stmt,
        if_cond,
        then_body,
        else_body,
        while_stmt,
        while_cond,
        while_body,
        tail,
    }
}

/// ```C
/// int chain() {
///     int x;
///     x = 1;          // a
///     x = x + 2;      // b
///     return x;       // c
/// }
/// ```
pub struct ChainCase {
    pub module: Module,
    pub func: FuncID,
    pub x: VarID,
    pub a: StmtID,
    pub b: StmtID,
    pub c: StmtID,
}

pub fn chain_case() -> ChainCase {
    let mut module = Module::new("chain");
    let i32ty = module.int_type(32, false);
    let x = module.new_var("x", i32ty);

    let lhs = module.var_expr(x);
    let one = module.const_int(1, 32);
    let a = module.new_stmt(StmtKind::Assign { lhs, rhs: one });

    let lhs = module.var_expr(x);
    let x_use = module.var_expr(x);
    let two = module.const_int(2, 32);
    let add = module.binary_expr(BinaryOp::Add, x_use, two);
    let b = module.new_stmt(StmtKind::Assign { lhs, rhs: add });

    let ret_val = module.var_expr(x);
    let c = module.new_stmt(StmtKind::Return(Some(ret_val)));
    module.chain_stmts(&[a, b, c]);

    let func = module.add_func("chain", i32ty, &[], Some(a));
    module.add_local(func, x);
    ChainCase { module, func, x, a, b, c }
}

/// ```C
/// int used = 5;
/// int unused = 6;
/// int debug_named = 7;    // carries a name from debug info
/// int shared;
///
/// extern int ext(int);
///
/// int f(void) {
///     shared = used + debug_named;
///     return shared;
/// }
/// int g(void) {
///     return shared;
/// }
/// ```
pub struct GlobalsCase {
    pub module: Module,
    pub used: VarID,
    pub unused: VarID,
    pub debug_named: VarID,
    pub shared: VarID,
    pub f: FuncID,
    pub g: FuncID,
    pub ext: FuncID,
}

pub fn globals_case() -> GlobalsCase {
    let mut module = Module::new("globals");
    let i32ty = module.int_type(32, false);

    let global = |module: &mut Module, name: &str, init: Option<i128>| {
        let var = module.new_var(name, i32ty);
        let init = init.map(|v| module.const_int(v, 32));
        module.add_global_var(var, init);
        var
    };
    let used = global(&mut module, "used", Some(5));
    let unused = global(&mut module, "unused", Some(6));
    let debug_named = global(&mut module, "debug_named", Some(7));
    let shared = global(&mut module, "shared", None);
    module.set_debug_name(debug_named, "debug_named");

    let lhs = module.var_expr(shared);
    let used_e = module.var_expr(used);
    let dbg_e = module.var_expr(debug_named);
    let sum = module.binary_expr(BinaryOp::Add, used_e, dbg_e);
    let f0 = module.new_stmt(StmtKind::Assign { lhs, rhs: sum });
    let ret_val = module.var_expr(shared);
    let f1 = module.new_stmt(StmtKind::Return(Some(ret_val)));
    module.chain_stmts(&[f0, f1]);
    let f = module.add_func("f", i32ty, &[], Some(f0));

    let ret_val = module.var_expr(shared);
    let g0 = module.new_stmt(StmtKind::Return(Some(ret_val)));
    let g = module.add_func("g", i32ty, &[], Some(g0));

    let ext_param = module.new_var("n", i32ty);
    let ext = module.add_func("ext", i32ty, &[ext_param], None);

    GlobalsCase { module, used, unused, debug_named, shared, f, g, ext }
}
