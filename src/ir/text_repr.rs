//! Concise, Python-like rendering of a single BIR node for debugging.
//!
//! Only the node itself is rendered: a statement's successors and the bodies
//! of compound statements are left out, so the result may span several lines
//! for `if`/`switch` but never ends with a newline.

use crate::ir::{
    BinaryOp, ExprData, ExprID, FuncData, FuncID, GlobalVarDef, IIRVisitor, IRRes, Module,
    NodeID, StmtData, StmtID, StmtKind, TypeData, TypeID, UnaryOp, VarData, VarID,
};
use std::collections::HashSet;

/// Renders `node` as text. Walks synchronously on the calling thread.
pub fn text_repr(module: &Module, node: NodeID) -> IRRes<String> {
    module.check_alive(node)?;
    let mut repr = ValueTextRepr::default();
    node.accept(module, &mut repr);
    Ok(repr.finish())
}

#[derive(Debug, Default)]
pub struct ValueTextRepr {
    out: String,
}

impl ValueTextRepr {
    pub fn finish(self) -> String {
        self.out
    }

    fn expr(&mut self, module: &Module, expr: ExprID) {
        self.visit_expr(module, expr, expr.deref_ir(&module.allocs));
    }
    fn var(&mut self, module: &Module, var: VarID) {
        self.visit_var(module, var, var.deref_ir(&module.allocs));
    }
    fn ty(&mut self, module: &Module, ty: TypeID) {
        self.visit_type(module, ty, ty.deref_ir(&module.allocs));
    }

    fn list(&mut self, module: &Module, exprs: impl IntoIterator<Item = ExprID>) {
        for (i, expr) in exprs.into_iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(module, expr);
        }
    }

    fn write_escaped(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '\n' => self.out.push_str("\\n"),
                '\t' => self.out.push_str("\\t"),
                '\r' => self.out.push_str("\\r"),
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                c if c == ' ' || c.is_ascii_graphic() => self.out.push(c),
                c => {
                    let mut buf = [0u8; 4];
                    for b in c.encode_utf8(&mut buf).bytes() {
                        self.out.push_str(&format!("\\x{b:02x}"));
                    }
                }
            }
        }
    }

    fn write_for_loop(
        &mut self,
        module: &Module,
        ind_var: VarID,
        start: ExprID,
        end_cond: ExprID,
        step: ExprID,
    ) {
        let allocs = &module.allocs;
        self.out.push_str("for ");
        self.var(module, ind_var);
        self.out.push_str(" in range(");
        self.expr(module, start);
        self.out.push_str(", ");
        // `i < x` is shortened to `x`
        match end_cond.deref_ir(allocs) {
            ExprData::Binary(BinaryOp::Lt, lhs, rhs)
                if lhs.deref_ir(allocs).as_var() == Some(ind_var) =>
            {
                self.expr(module, *rhs)
            }
            _ => self.expr(module, end_cond),
        }
        if step.deref_ir(allocs).as_int() != Some(1) {
            self.out.push_str(", ");
            self.expr(module, step);
        }
        self.out.push_str("):");
    }
}

impl IIRVisitor for ValueTextRepr {
    fn visit_global_var(&mut self, module: &Module, def: &GlobalVarDef) {
        self.var(module, def.var);
        if let Some(init) = def.init {
            self.out.push_str(" = ");
            self.expr(module, init);
        }
    }

    fn visit_func(&mut self, module: &Module, _: FuncID, data: &FuncData) {
        let allocs = &module.allocs;
        self.out.push_str("def ");
        self.out.push_str(&data.name);
        self.out.push('(');
        for (i, &param) in data.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            // one star per distinct pointer type; a pointer to itself stops
            let mut ty = param.deref_ir(allocs).ty;
            let mut seen = HashSet::new();
            while let TypeData::Pointer(pointee) = ty.deref_ir(allocs) {
                if !seen.insert(ty) {
                    break;
                }
                self.out.push('*');
                ty = *pointee;
            }
            self.var(module, param);
        }
        if data.vararg {
            if !data.params.is_empty() {
                self.out.push_str(", ");
            }
            self.out.push_str("...");
        }
        self.out.push(')');
    }

    fn visit_var(&mut self, _: &Module, _: VarID, data: &VarData) {
        self.out.push_str(&data.name);
    }

    fn visit_stmt(&mut self, module: &Module, _: StmtID, data: &StmtData) {
        match &data.kind {
            StmtKind::Assign { lhs, rhs } => {
                self.expr(module, *lhs);
                self.out.push_str(" = ");
                self.expr(module, *rhs);
            }
            StmtKind::VarDef { var, init } => {
                self.var(module, *var);
                if let Some(init) = init {
                    self.out.push_str(" = ");
                    self.expr(module, *init);
                }
            }
            StmtKind::Call(call) => self.expr(module, *call),
            StmtKind::Return(retval) => {
                self.out.push_str("return");
                if let Some(retval) = retval {
                    self.out.push(' ');
                    self.expr(module, *retval);
                }
            }
            StmtKind::Empty => self.out.push_str("# empty statement"),
            StmtKind::If { clauses, else_clause } => {
                for (i, &(cond, _)) in clauses.iter().enumerate() {
                    self.out.push_str(if i == 0 { "if " } else { "\nelif " });
                    self.expr(module, cond);
                    self.out.push(':');
                }
                if else_clause.is_some() {
                    self.out.push_str("\nelse:");
                }
            }
            StmtKind::Switch { control, clauses } => {
                self.out.push_str("switch ");
                self.expr(module, *control);
                self.out.push(':');
                for &(value, _) in clauses {
                    match value {
                        Some(value) => {
                            self.out.push_str("\ncase ");
                            self.expr(module, value);
                            self.out.push(':');
                        }
                        None => self.out.push_str("\ndefault:"),
                    }
                }
            }
            StmtKind::While { cond, .. } => {
                self.out.push_str("while ");
                self.expr(module, *cond);
                self.out.push(':');
            }
            StmtKind::For { ind_var, start, end_cond, step, .. } => {
                self.write_for_loop(module, *ind_var, *start, *end_cond, *step);
            }
            StmtKind::UFor { init, cond, step, .. } => {
                // C syntax: there is no Python spelling of a general for loop
                self.out.push_str("for (");
                if let Some(init) = init {
                    self.expr(module, *init);
                }
                self.out.push_str("; ");
                if let Some(cond) = cond {
                    self.expr(module, *cond);
                }
                self.out.push_str("; ");
                if let Some(step) = step {
                    self.expr(module, *step);
                }
                self.out.push_str("):");
            }
            StmtKind::Break => self.out.push_str("break"),
            StmtKind::Continue => self.out.push_str("continue"),
            StmtKind::Goto { target } => {
                self.out.push_str("goto ");
                self.out.push_str(&module.stmt_label(*target));
            }
            StmtKind::Unreachable => self.out.push_str("# UNREACHABLE"),
        }
    }

    fn visit_expr(&mut self, module: &Module, _: ExprID, data: &ExprData) {
        match data {
            ExprData::Var(var) => self.var(module, *var),
            ExprData::ConstInt { value, .. } => self.out.push_str(&value.to_string()),
            ExprData::ConstFloat(value) => self.out.push_str(&format!("{value:?}")),
            ExprData::ConstBool(value) => self.out.push_str(if *value { "True" } else { "False" }),
            ExprData::ConstNullPtr => self.out.push_str("NULL"),
            ExprData::ConstString(s) => {
                self.out.push('"');
                self.write_escaped(s);
                self.out.push('"');
            }
            ExprData::ConstArray { elems: Some(elems), .. } => {
                self.out.push('[');
                self.list(module, elems.iter().copied());
                self.out.push(']');
            }
            ExprData::ConstArray { ty, elems: None } => match ty.deref_ir(&module.allocs) {
                // `int [10][5]` is written `array(10, 5)` instead of a full initializer
                TypeData::Array { dims, .. } if !dims.is_empty() => {
                    let dims: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                    self.out.push_str("array(");
                    self.out.push_str(&dims.join(", "));
                    self.out.push(')');
                }
                _ => self.out.push_str("[]"),
            },
            ExprData::ConstStruct(members) => {
                self.out.push('{');
                for (i, &(field, value)) in members.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push('\'');
                    self.expr(module, field);
                    self.out.push_str("': ");
                    self.expr(module, value);
                }
                self.out.push('}');
            }
            ExprData::ConstSymbol { name, value } => {
                self.out.push('(');
                self.out.push_str(name);
                self.out.push_str(" -> ");
                self.expr(module, *value);
                self.out.push(')');
            }
            ExprData::Unary(op, operand) => {
                self.out.push_str(match op {
                    UnaryOp::AddressOf => "&(",
                    UnaryOp::Deref => "*(",
                    UnaryOp::Not => "not (",
                    UnaryOp::Neg => "-(",
                });
                self.expr(module, *operand);
                self.out.push(')');
            }
            ExprData::Binary(BinaryOp::ArrayIndex, base, index) => {
                self.expr(module, *base);
                self.out.push('[');
                self.expr(module, *index);
                self.out.push(']');
            }
            ExprData::Binary(BinaryOp::StructIndex, base, field) => {
                self.expr(module, *base);
                self.out.push_str("['");
                self.expr(module, *field);
                self.out.push_str("']");
            }
            ExprData::Binary(BinaryOp::Comma, lhs, rhs) => {
                self.out.push('(');
                self.expr(module, *lhs);
                self.out.push_str(", ");
                self.expr(module, *rhs);
                self.out.push(')');
            }
            ExprData::Binary(op, lhs, rhs) => {
                let symbol = op.infix_symbol().unwrap_or("?");
                self.out.push('(');
                self.expr(module, *lhs);
                self.out.push(' ');
                self.out.push_str(symbol);
                self.out.push(' ');
                self.expr(module, *rhs);
                self.out.push(')');
            }
            ExprData::Ternary { cond, then, other } => {
                self.out.push('(');
                self.expr(module, *then);
                self.out.push_str(" if ");
                self.expr(module, *cond);
                self.out.push_str(" else ");
                self.expr(module, *other);
                self.out.push(')');
            }
            ExprData::Call { callee, args } => {
                self.expr(module, *callee);
                self.out.push('(');
                self.list(module, args.iter().copied());
                self.out.push(')');
            }
            ExprData::Cast { kind, ty, operand } => {
                self.out.push_str(kind.get_name());
                self.out.push('<');
                self.ty(module, *ty);
                self.out.push_str(">(");
                self.expr(module, *operand);
                self.out.push(')');
            }
        }
    }

    fn visit_type(&mut self, _: &Module, _: TypeID, data: &TypeData) {
        match data {
            TypeData::Void => self.out.push_str("void"),
            TypeData::Unknown => self.out.push_str("unknown"),
            TypeData::String => self.out.push_str("string"),
            TypeData::Int { bits, unsigned } => {
                if *unsigned {
                    self.out.push('u');
                }
                self.out.push_str("int");
                self.out.push_str(&bits.to_string());
            }
            TypeData::Float { .. } => self.out.push_str("double"),
            TypeData::Pointer(_) => self.out.push_str("ptr"),
            TypeData::Array { .. } => self.out.push_str("array"),
            TypeData::Struct { name, .. } => {
                self.out.push_str("struct (");
                self.out.push_str(name.as_deref().unwrap_or("anonymous"));
                self.out.push(')');
            }
            TypeData::Func { .. } => self.out.push_str("function"),
        }
    }
}
