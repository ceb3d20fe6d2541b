//! Ordered, cycle-safe walk over the BIR graph.
//!
//! Every reachable statement and type is visited at most once per run:
//! statements reached again through a `goto` or a loop back edge, and types
//! shared by many declarations (or containing a pointer to themselves), are
//! cut off by the two identity sets. Expressions form trees and are always
//! visited in full.

use crate::ir::{
    ExprData, ExprID, FuncData, FuncID, GlobalVarDef, IIRVisitor, IRRes, Module, NodeID,
    StmtData, StmtID, StmtKind, TypeData, TypeID, VarData, VarID,
};
use bitflags::bitflags;
use std::collections::HashSet;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VisitPolicy: u8 {
        /// Continue to a statement's successor (and a `goto`'s target).
        const SUCCESSORS = 1 << 0;
        /// Descend into loop, `if` and `switch` bodies.
        const NESTED = 1 << 1;
    }
}

impl VisitPolicy {
    pub fn from_flags(visit_successors: bool, visit_nested: bool) -> Self {
        let mut policy = VisitPolicy::empty();
        policy.set(VisitPolicy::SUCCESSORS, visit_successors);
        policy.set(VisitPolicy::NESTED, visit_nested);
        policy
    }
}

impl Default for VisitPolicy {
    fn default() -> Self {
        VisitPolicy::all()
    }
}

/// Callbacks fired by [`OrderedAllVisitor`] in pre-order.
///
/// `owner` is the statement whose own substructure contains the expression or
/// variable, or `None` outside of any statement (function parameters, global
/// definitions, a root expression).
#[allow(unused_variables)]
pub trait IOrderedObserver {
    fn on_global_var(&mut self, module: &Module, def: &GlobalVarDef) {}
    fn on_func(&mut self, module: &Module, func: FuncID, data: &FuncData) {}
    fn on_stmt(&mut self, module: &Module, stmt: StmtID, data: &StmtData) {}
    fn on_expr(&mut self, module: &Module, owner: Option<StmtID>, expr: ExprID, data: &ExprData) {}
    fn on_var(&mut self, module: &Module, owner: Option<StmtID>, var: VarID, data: &VarData) {}
    fn on_type(&mut self, module: &Module, ty: TypeID, data: &TypeData) {}
}

impl IOrderedObserver for () {}

/// Records every visited node in order.
#[derive(Debug, Clone, Default)]
pub struct VisitLog {
    pub nodes: Vec<NodeID>,
}

impl VisitLog {
    pub fn stmts(&self) -> Vec<StmtID> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                NodeID::Stmt(s) => Some(*s),
                _ => None,
            })
            .collect()
    }
    pub fn types(&self) -> Vec<TypeID> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                NodeID::Type(t) => Some(*t),
                _ => None,
            })
            .collect()
    }
    pub fn count_of(&self, node: NodeID) -> usize {
        self.nodes.iter().filter(|&&n| n == node).count()
    }
}

impl IOrderedObserver for VisitLog {
    fn on_global_var(&mut self, _: &Module, def: &GlobalVarDef) {
        self.nodes.push(NodeID::GlobalVar(def.var));
    }
    fn on_func(&mut self, _: &Module, func: FuncID, _: &FuncData) {
        self.nodes.push(NodeID::Func(func));
    }
    fn on_stmt(&mut self, _: &Module, stmt: StmtID, _: &StmtData) {
        self.nodes.push(NodeID::Stmt(stmt));
    }
    fn on_expr(&mut self, _: &Module, _: Option<StmtID>, expr: ExprID, _: &ExprData) {
        self.nodes.push(NodeID::Expr(expr));
    }
    fn on_var(&mut self, _: &Module, _: Option<StmtID>, var: VarID, _: &VarData) {
        self.nodes.push(NodeID::Var(var));
    }
    fn on_type(&mut self, _: &Module, ty: TypeID, _: &TypeData) {
        self.nodes.push(NodeID::Type(ty));
    }
}

pub struct OrderedAllVisitor<O = ()> {
    pub observer: O,
    policy: VisitPolicy,
    last_stmt: Option<StmtID>,
    /// Statement whose own expressions are being visited.
    owner: Option<StmtID>,
    accessed_stmts: HashSet<StmtID>,
    accessed_types: HashSet<TypeID>,
}

impl OrderedAllVisitor<()> {
    pub fn new(visit_successors: bool, visit_nested: bool) -> Self {
        Self::with_observer((), visit_successors, visit_nested)
    }
}

impl<O: IOrderedObserver> OrderedAllVisitor<O> {
    pub fn with_observer(observer: O, visit_successors: bool, visit_nested: bool) -> Self {
        Self::with_policy(observer, VisitPolicy::from_flags(visit_successors, visit_nested))
    }
    pub fn with_policy(observer: O, policy: VisitPolicy) -> Self {
        Self {
            observer,
            policy,
            last_stmt: None,
            owner: None,
            accessed_stmts: HashSet::new(),
            accessed_types: HashSet::new(),
        }
    }

    /// Forgets every visited node and installs new policy flags, so the same
    /// visitor (and its allocations) can be reused for an independent run.
    pub fn restart(&mut self, visit_successors: bool, visit_nested: bool) {
        self.restart_with(VisitPolicy::from_flags(visit_successors, visit_nested));
    }
    pub fn restart_with(&mut self, policy: VisitPolicy) {
        log::trace!("ordered visitor restart: policy {policy:?}");
        self.accessed_stmts.clear();
        self.accessed_types.clear();
        self.last_stmt = None;
        self.owner = None;
        self.policy = policy;
    }

    /// Walks the graph from `root`.
    ///
    /// Nodes already visited earlier in this run are skipped; call
    /// [`Self::restart`] between independent runs.
    pub fn run(&mut self, module: &Module, root: NodeID) -> IRRes {
        module.check_alive(root)?;
        match root {
            NodeID::Stmt(stmt) => self.visit_stmt_once(module, stmt),
            _ => root.accept(module, self),
        }
        Ok(())
    }

    /// Visits `stmt` unless it was already visited in this run.
    pub fn visit_stmt_once(&mut self, module: &Module, stmt: StmtID) {
        if self.accessed_stmts.contains(&stmt) {
            return;
        }
        self.visit_stmt(module, stmt, stmt.deref_ir(&module.allocs));
    }

    pub fn policy(&self) -> VisitPolicy {
        self.policy
    }
    pub fn visits_successors(&self) -> bool {
        self.policy.contains(VisitPolicy::SUCCESSORS)
    }
    pub fn visits_nested(&self) -> bool {
        self.policy.contains(VisitPolicy::NESTED)
    }

    /// The most recently visited statement of this run.
    pub fn last_stmt(&self) -> Option<StmtID> {
        self.last_stmt
    }
    pub fn is_stmt_accessed(&self, stmt: StmtID) -> bool {
        self.accessed_stmts.contains(&stmt)
    }
    pub fn is_type_accessed(&self, ty: TypeID) -> bool {
        self.accessed_types.contains(&ty)
    }
    pub fn accessed_stmt_count(&self) -> usize {
        self.accessed_stmts.len()
    }
    pub fn accessed_type_count(&self) -> usize {
        self.accessed_types.len()
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    fn visit_expr_id(&mut self, module: &Module, expr: ExprID) {
        self.visit_expr(module, expr, expr.deref_ir(&module.allocs));
    }
    fn visit_var_id(&mut self, module: &Module, var: VarID) {
        self.visit_var(module, var, var.deref_ir(&module.allocs));
    }
    fn visit_type_id(&mut self, module: &Module, ty: TypeID) {
        self.visit_type(module, ty, ty.deref_ir(&module.allocs));
    }

    /// Visits a statement reached from inside another one (a nested body or a
    /// jump target), then restores the current owner.
    fn visit_inner_stmt(&mut self, module: &Module, stmt: StmtID) {
        let owner = self.owner;
        self.visit_stmt_once(module, stmt);
        self.owner = owner;
    }

    /// Visits one statement's own substructure and returns its successor if
    /// the walk should continue there. The successor is marked as accessed
    /// before it is returned.
    fn walk_stmt(&mut self, module: &Module, stmt: StmtID, data: &StmtData) -> Option<StmtID> {
        self.last_stmt = Some(stmt);
        self.owner = Some(stmt);
        self.observer.on_stmt(module, stmt, data);

        let nested = self.visits_nested();
        let successors = self.visits_successors();
        match &data.kind {
            StmtKind::Assign { lhs, rhs } => {
                self.visit_expr_id(module, *lhs);
                self.visit_expr_id(module, *rhs);
            }
            StmtKind::VarDef { var, init } => {
                self.visit_var_id(module, *var);
                self.visit_type_id(module, var.deref_ir(&module.allocs).ty);
                if let Some(init) = init {
                    self.visit_expr_id(module, *init);
                }
            }
            StmtKind::Call(call) => self.visit_expr_id(module, *call),
            StmtKind::Return(retval) => {
                if let Some(retval) = retval {
                    self.visit_expr_id(module, *retval);
                }
            }
            StmtKind::If { clauses, else_clause } => {
                for &(cond, body) in clauses {
                    self.visit_expr_id(module, cond);
                    if nested {
                        self.visit_inner_stmt(module, body);
                    }
                }
                match else_clause {
                    Some(else_clause) if nested => self.visit_inner_stmt(module, *else_clause),
                    _ => {}
                }
            }
            StmtKind::Switch { control, clauses } => {
                self.visit_expr_id(module, *control);
                for &(value, body) in clauses {
                    if let Some(value) = value {
                        self.visit_expr_id(module, value);
                    }
                    if nested {
                        self.visit_inner_stmt(module, body);
                    }
                }
            }
            StmtKind::While { cond, body } => {
                self.visit_expr_id(module, *cond);
                if nested {
                    self.visit_inner_stmt(module, *body);
                }
            }
            StmtKind::For { ind_var, start, end_cond, step, body } => {
                self.visit_var_id(module, *ind_var);
                self.visit_expr_id(module, *start);
                self.visit_expr_id(module, *end_cond);
                self.visit_expr_id(module, *step);
                if nested {
                    self.visit_inner_stmt(module, *body);
                }
            }
            StmtKind::UFor { init, cond, step, body } => {
                for expr in [init, cond, step].into_iter().flatten() {
                    self.visit_expr_id(module, *expr);
                }
                if nested {
                    self.visit_inner_stmt(module, *body);
                }
            }
            StmtKind::Goto { target } => {
                if successors {
                    self.visit_inner_stmt(module, *target);
                }
            }
            StmtKind::Empty | StmtKind::Break | StmtKind::Continue | StmtKind::Unreachable => {}
        }

        if !successors {
            return None;
        }
        let succ = data.succ?;
        self.accessed_stmts.insert(succ).then_some(succ)
    }
}

impl<O: IOrderedObserver> IIRVisitor for OrderedAllVisitor<O> {
    fn visit_global_var(&mut self, module: &Module, def: &GlobalVarDef) {
        self.owner = None;
        self.observer.on_global_var(module, def);
        self.visit_var_id(module, def.var);
        self.visit_type_id(module, def.var.deref_ir(&module.allocs).ty);
        if let Some(init) = def.init {
            self.visit_expr_id(module, init);
        }
    }

    fn visit_func(&mut self, module: &Module, func: FuncID, data: &FuncData) {
        self.owner = None;
        self.observer.on_func(module, func, data);
        for &param in &data.params {
            self.visit_var_id(module, param);
        }
        if let Some(body) = data.body {
            self.visit_stmt_once(module, body);
        }
    }

    fn visit_var(&mut self, module: &Module, var: VarID, data: &VarData) {
        self.observer.on_var(module, self.owner, var, data);
    }

    fn visit_stmt(&mut self, module: &Module, stmt: StmtID, data: &StmtData) {
        self.accessed_stmts.insert(stmt);
        // Successor chains are walked iteratively; only nested bodies and
        // jump targets recurse.
        let mut next = self.walk_stmt(module, stmt, data);
        while let Some(stmt) = next {
            next = self.walk_stmt(module, stmt, stmt.deref_ir(&module.allocs));
        }
    }

    fn visit_expr(&mut self, module: &Module, expr: ExprID, data: &ExprData) {
        self.observer.on_expr(module, self.owner, expr, data);
        match data {
            ExprData::Var(var) => self.visit_var_id(module, *var),
            _ => {
                for operand in data.operands() {
                    self.visit_expr_id(module, operand);
                }
            }
        }
    }

    fn visit_type(&mut self, module: &Module, ty: TypeID, data: &TypeData) {
        if !self.accessed_types.insert(ty) {
            return;
        }
        self.observer.on_type(module, ty, data);
        for child in data.children() {
            self.visit_type_id(module, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ir::{BinaryOp, IRError},
        testing::{chain_case, goto_loop_case, loop_back_edge_case, nested_case, self_ref_struct_case},
    };

    fn logged(succ: bool, nested: bool) -> OrderedAllVisitor<VisitLog> {
        OrderedAllVisitor::with_observer(VisitLog::default(), succ, nested)
    }

    #[test]
    fn test_goto_back_to_first_stmt() {
        let case = goto_loop_case();
        let mut visitor = logged(true, true);
        visitor.run(&case.module, NodeID::Stmt(case.s1)).unwrap();

        assert_eq!(visitor.observer.stmts(), vec![case.s1, case.s2]);
        assert_eq!(visitor.accessed_stmt_count(), 2);
        assert_eq!(visitor.last_stmt(), Some(case.s2));
    }

    #[test]
    fn test_loop_back_edge_terminates() {
        let case = loop_back_edge_case();
        let mut visitor = logged(true, true);
        visitor.run(&case.module, NodeID::Func(case.func)).unwrap();

        let stmts = visitor.observer.stmts();
        assert_eq!(stmts, vec![case.header, case.body[0], case.body[1], case.exit]);
        for s in &stmts {
            assert_eq!(visitor.observer.count_of(NodeID::Stmt(*s)), 1);
        }
    }

    #[test]
    fn test_self_referential_type_once() {
        let case = self_ref_struct_case();
        let mut visitor = logged(true, true);
        visitor.run(&case.module, NodeID::Type(case.node_ty)).unwrap();

        // struct, i32, ptr; the pointer's pointee is the struct again
        assert_eq!(visitor.observer.types(), vec![case.node_ty, case.i32_ty, case.node_ptr]);
        assert_eq!(visitor.observer.count_of(NodeID::Type(case.node_ty)), 1);
        assert_eq!(visitor.accessed_type_count(), 3);
    }

    #[test]
    fn test_shared_type_recursed_once() {
        let case = self_ref_struct_case();
        let mut visitor = logged(true, true);
        visitor.run(&case.module, NodeID::Func(case.func)).unwrap();

        // both declarations use `node*`; its children are walked on the first only
        let types = visitor.observer.types();
        assert_eq!(types, vec![case.node_ptr, case.node_ty, case.i32_ty]);
        assert_eq!(visitor.observer.stmts(), case.decls);
    }

    #[test]
    fn test_nested_disabled() {
        let case = nested_case();
        let mut visitor = logged(true, false);
        visitor.run(&case.module, NodeID::Stmt(case.if_stmt)).unwrap();

        let log = &visitor.observer;
        assert_eq!(log.count_of(NodeID::Expr(case.if_cond)), 1);
        assert_eq!(log.count_of(NodeID::Expr(case.while_cond)), 1);
        assert_eq!(log.stmts(), vec![case.if_stmt, case.while_stmt, case.tail]);
        for s in case.then_body.iter().chain(&case.else_body).chain(&case.while_body) {
            assert!(!visitor.is_stmt_accessed(*s));
        }
    }

    #[test]
    fn test_nested_enabled() {
        let case = nested_case();
        let mut visitor = logged(true, true);
        visitor.run(&case.module, NodeID::Stmt(case.if_stmt)).unwrap();

        let mut expected = vec![case.if_stmt];
        expected.extend(&case.then_body);
        expected.extend(&case.else_body);
        expected.push(case.while_stmt);
        expected.extend(&case.while_body);
        expected.push(case.tail);
        assert_eq!(visitor.observer.stmts(), expected);
        assert_eq!(visitor.last_stmt(), Some(case.tail));
    }

    #[test]
    fn test_successors_suppressed() {
        let case = chain_case();
        let mut visitor = logged(false, true);
        visitor.run(&case.module, NodeID::Stmt(case.a)).unwrap();

        assert_eq!(visitor.observer.stmts(), vec![case.a]);
        assert!(!visitor.is_stmt_accessed(case.b));
        assert!(!visitor.is_stmt_accessed(case.c));
        // A's own substructure is still visited
        assert_eq!(visitor.observer.count_of(NodeID::Var(case.x)), 1);
    }

    #[test]
    fn test_goto_without_successors_stops() {
        let case = goto_loop_case();
        let mut visitor = logged(false, true);
        visitor.run(&case.module, NodeID::Stmt(case.s2)).unwrap();
        assert_eq!(visitor.observer.stmts(), vec![case.s2]);
    }

    #[test]
    fn test_goto_target_before_successor() {
        let case = goto_loop_case();
        let mut module = case.module;
        let after = module.new_stmt(StmtKind::Empty);
        module.set_succ(case.s2, Some(after));
        let mut visitor = logged(true, true);
        visitor.run(&module, NodeID::Stmt(case.s2)).unwrap();
        // s2 -> target s1 (whose successor s2 is already done) -> after
        assert_eq!(visitor.observer.stmts(), vec![case.s2, case.s1, after]);
    }

    #[test]
    fn test_restart_reproduces_run() {
        let case = nested_case();
        let mut visitor = logged(true, true);
        visitor.run(&case.module, NodeID::Func(case.func)).unwrap();
        let first = std::mem::take(&mut visitor.observer.nodes);
        let first_count = visitor.accessed_stmt_count();

        // without restart, nothing is visited twice
        visitor.run(&case.module, NodeID::Stmt(case.if_stmt)).unwrap();
        assert!(visitor.observer.stmts().is_empty());

        visitor.restart(true, true);
        visitor.observer.nodes.clear();
        visitor.run(&case.module, NodeID::Func(case.func)).unwrap();
        assert_eq!(visitor.observer.nodes, first);
        assert_eq!(visitor.accessed_stmt_count(), first_count);
    }

    #[test]
    fn test_restart_changes_policy() {
        let case = chain_case();
        let mut visitor = logged(false, false);
        visitor.run(&case.module, NodeID::Stmt(case.a)).unwrap();
        assert_eq!(visitor.observer.stmts(), vec![case.a]);

        visitor.restart(true, false);
        assert_eq!(visitor.policy(), VisitPolicy::SUCCESSORS);
        visitor.observer.nodes.clear();
        visitor.run(&case.module, NodeID::Stmt(case.a)).unwrap();
        assert_eq!(visitor.observer.stmts(), vec![case.a, case.b, case.c]);
    }

    #[test]
    fn test_expression_operand_order() {
        let case = chain_case();
        let mut visitor = logged(false, false);
        visitor.run(&case.module, NodeID::Stmt(case.b)).unwrap();
        // b: x = x + 2
        let StmtKind::Assign { lhs, rhs } = case.b.deref_ir(&case.module.allocs).kind else {
            panic!("expected assignment");
        };
        let ExprData::Binary(_, add_l, add_r) = *rhs.deref_ir(&case.module.allocs) else {
            panic!("expected binary rhs");
        };
        assert_eq!(
            visitor.observer.nodes,
            vec![
                NodeID::Stmt(case.b),
                NodeID::Expr(lhs),
                NodeID::Var(case.x),
                NodeID::Expr(rhs),
                NodeID::Expr(add_l),
                NodeID::Var(case.x),
                NodeID::Expr(add_r),
            ]
        );
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let mut module = Module::new("long");
        let stmts: Vec<_> = (0..200_000).map(|_| module.new_stmt(StmtKind::Empty)).collect();
        module.chain_stmts(&stmts);
        let mut visitor = OrderedAllVisitor::new(true, true);
        visitor.run(&module, NodeID::Stmt(stmts[0])).unwrap();
        assert_eq!(visitor.accessed_stmt_count(), stmts.len());
        assert_eq!(visitor.last_stmt(), stmts.last().copied());
    }

    #[test]
    fn test_dead_root_rejected() {
        let case = chain_case();
        let mut visitor = OrderedAllVisitor::new(true, true);
        let res = visitor.run(&case.module, NodeID::GlobalVar(case.x));
        assert!(matches!(res, Err(IRError::DeadNode(NodeID::GlobalVar(_)))));
        assert_eq!(visitor.accessed_stmt_count(), 0);
    }

    /// `switch (i) { case 1: break; case 2: break; default: break; }`
    fn switch_module() -> (Module, StmtID, [ExprID; 3], VarID, [StmtID; 3]) {
        let mut module = Module::new("switch");
        let i32ty = module.int_type(32, false);
        let i = module.new_var("i", i32ty);
        let control = module.var_expr(i);
        let one = module.const_int(1, 32);
        let two = module.const_int(2, 32);
        let bodies = [
            module.new_stmt(StmtKind::Break),
            module.new_stmt(StmtKind::Break),
            module.new_stmt(StmtKind::Break),
        ];
        let switch = module.new_stmt(StmtKind::Switch {
            control,
            clauses: smallvec::smallvec![
                (Some(one), bodies[0]),
                (Some(two), bodies[1]),
                (None, bodies[2]),
            ],
        });
        (module, switch, [control, one, two], i, bodies)
    }

    #[test]
    fn test_switch_clause_order() {
        let (module, switch, [control, one, two], i, bodies) = switch_module();
        let mut visitor = logged(false, true);
        visitor.run(&module, NodeID::Stmt(switch)).unwrap();
        assert_eq!(
            visitor.observer.nodes,
            vec![
                NodeID::Stmt(switch),
                NodeID::Expr(control),
                NodeID::Var(i),
                NodeID::Expr(one),
                NodeID::Stmt(bodies[0]),
                NodeID::Expr(two),
                NodeID::Stmt(bodies[1]),
                NodeID::Stmt(bodies[2]),
            ]
        );
    }

    #[test]
    fn test_switch_nested_disabled() {
        let (module, switch, [control, one, two], i, bodies) = switch_module();
        let mut visitor = logged(true, false);
        visitor.run(&module, NodeID::Stmt(switch)).unwrap();
        assert_eq!(
            visitor.observer.nodes,
            vec![
                NodeID::Stmt(switch),
                NodeID::Expr(control),
                NodeID::Var(i),
                NodeID::Expr(one),
                NodeID::Expr(two),
            ]
        );
        assert!(bodies.iter().all(|b| !visitor.is_stmt_accessed(*b)));
    }

    #[test]
    fn test_for_loops_nested_flag() {
        // for i in range(0, n): break
        // for (i = 0; i < n; ): break
        let mut module = Module::new("loops");
        let i32ty = module.int_type(32, false);
        let i = module.new_var("i", i32ty);
        let n = module.new_var("n", i32ty);
        let (ie, ne) = (module.var_expr(i), module.var_expr(n));
        let end_cond = module.binary_expr(BinaryOp::Lt, ie, ne);
        let start = module.const_int(0, 32);
        let step = module.const_int(1, 32);
        let for_body = module.new_stmt(StmtKind::Break);
        let for_stmt = module.new_stmt(StmtKind::For {
            ind_var: i,
            start,
            end_cond,
            step,
            body: for_body,
        });

        let (init_l, init_r) = (module.var_expr(i), module.const_int(0, 32));
        let init = module.binary_expr(BinaryOp::Assign, init_l, init_r);
        let (cond_l, cond_r) = (module.var_expr(i), module.var_expr(n));
        let cond = module.binary_expr(BinaryOp::Lt, cond_l, cond_r);
        let ufor_body = module.new_stmt(StmtKind::Break);
        let ufor = module.new_stmt(StmtKind::UFor {
            init: Some(init),
            cond: Some(cond),
            step: None,
            body: ufor_body,
        });
        module.chain_stmts(&[for_stmt, ufor]);

        let mut visitor = logged(true, false);
        visitor.run(&module, NodeID::Stmt(for_stmt)).unwrap();
        let log = &visitor.observer;
        assert_eq!(log.stmts(), vec![for_stmt, ufor]);
        let header: Vec<NodeID> = log
            .nodes
            .iter()
            .copied()
            .filter(|n| matches!(n, NodeID::Expr(_)))
            .collect();
        assert_eq!(
            header,
            vec![
                NodeID::Expr(start),
                NodeID::Expr(end_cond),
                NodeID::Expr(ie),
                NodeID::Expr(ne),
                NodeID::Expr(step),
                NodeID::Expr(init),
                NodeID::Expr(init_l),
                NodeID::Expr(init_r),
                NodeID::Expr(cond),
                NodeID::Expr(cond_l),
                NodeID::Expr(cond_r),
            ]
        );
        // the induction variable comes before the start expression
        assert_eq!(log.nodes[1], NodeID::Var(i));
        assert!(!visitor.is_stmt_accessed(for_body));
        assert!(!visitor.is_stmt_accessed(ufor_body));

        visitor.restart(true, true);
        visitor.observer.nodes.clear();
        visitor.run(&module, NodeID::Stmt(for_stmt)).unwrap();
        assert_eq!(visitor.observer.stmts(), vec![for_stmt, for_body, ufor, ufor_body]);
    }

    #[test]
    fn test_global_var_def_order() {
        let mut module = Module::new("globals");
        let i32ty = module.int_type(32, false);
        let ptr = module.ptr_type(i32ty);
        let g = module.new_var("g", ptr);
        let init = module.new_expr(ExprData::ConstNullPtr);
        module.add_global_var(g, Some(init));

        let mut visitor = logged(true, true);
        visitor.run(&module, NodeID::GlobalVar(g)).unwrap();
        assert_eq!(
            visitor.observer.nodes,
            vec![
                NodeID::GlobalVar(g),
                NodeID::Var(g),
                NodeID::Type(ptr),
                NodeID::Type(i32ty),
                NodeID::Expr(init),
            ]
        );
    }

    #[test]
    fn test_var_def_order() {
        let mut module = Module::new("locals");
        let i32ty = module.int_type(32, false);
        let v = module.new_var("v", i32ty);
        let init = module.const_int(3, 32);
        let def = module.new_stmt(StmtKind::VarDef { var: v, init: Some(init) });

        let mut visitor = logged(true, true);
        visitor.run(&module, NodeID::Stmt(def)).unwrap();
        assert_eq!(
            visitor.observer.nodes,
            vec![NodeID::Stmt(def), NodeID::Var(v), NodeID::Type(i32ty), NodeID::Expr(init)]
        );
    }

    #[test]
    fn test_policy_flags() {
        assert_eq!(VisitPolicy::from_flags(true, true), VisitPolicy::all());
        assert_eq!(VisitPolicy::from_flags(false, false), VisitPolicy::empty());
        assert_eq!(VisitPolicy::from_flags(false, true), VisitPolicy::NESTED);
        let v = OrderedAllVisitor::new(true, false);
        assert!(v.visits_successors());
        assert!(!v.visits_nested());
    }
}
