use crate::ir::{
    FuncID, IOrderedObserver, IRError, IRRes, Module, NodeID, OrderedAllVisitor, StmtID, VarData,
    VarID,
};
use std::collections::{HashMap, HashSet};

/// Uses of every variable referenced by one function body.
///
/// A use is a statement whose own substructure (expressions, the defined
/// variable of a `VarDef`, the induction variable of a `for`) mentions the
/// variable. Mentions outside any statement, such as parameters in the
/// function signature, are not uses.
#[derive(Debug, Clone, Default)]
pub struct FuncVarUses {
    uses: HashMap<VarID, Vec<StmtID>>,
}

impl FuncVarUses {
    pub fn analyze(module: &Module, func: FuncID) -> IRRes<Self> {
        module.check_alive(NodeID::Func(func))?;
        if func.deref_ir(&module.allocs).is_declaration() {
            return Err(IRError::NotAFunctionDef(func));
        }
        let mut visitor = OrderedAllVisitor::with_observer(UseCollector::default(), true, true);
        visitor.run(module, NodeID::Func(func))?;
        Ok(Self { uses: visitor.into_observer().uses })
    }

    pub fn is_used(&self, var: VarID) -> bool {
        self.uses.contains_key(&var)
    }
    /// Statements using `var`, in visit order.
    pub fn uses_of(&self, var: VarID) -> &[StmtID] {
        self.uses.get(&var).map(Vec::as_slice).unwrap_or_default()
    }
    pub fn used_vars(&self) -> impl Iterator<Item = VarID> + '_ {
        self.uses.keys().copied()
    }
}

#[derive(Default)]
struct UseCollector {
    uses: HashMap<VarID, Vec<StmtID>>,
    seen: HashSet<(VarID, StmtID)>,
}

impl IOrderedObserver for UseCollector {
    fn on_var(&mut self, _: &Module, owner: Option<StmtID>, var: VarID, _: &VarData) {
        let Some(stmt) = owner else {
            return;
        };
        if self.seen.insert((var, stmt)) {
            self.uses.entry(var).or_default().push(stmt);
        }
    }
}

/// Per-function use analysis, computed on first query and cached.
///
/// The cache is keyed by function only; call [`VarUses::invalidate`] after
/// changing a function body.
#[derive(Debug, Default)]
pub struct VarUses {
    cache: HashMap<FuncID, FuncVarUses>,
}

impl VarUses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn func_uses(&mut self, module: &Module, func: FuncID) -> IRRes<&FuncVarUses> {
        if !self.cache.contains_key(&func) {
            let uses = FuncVarUses::analyze(module, func)?;
            self.cache.insert(func, uses);
        }
        Ok(&self.cache[&func])
    }

    pub fn is_used(&mut self, module: &Module, var: VarID, func: FuncID) -> IRRes<bool> {
        Ok(self.func_uses(module, func)?.is_used(var))
    }
    pub fn uses_of(&mut self, module: &Module, var: VarID, func: FuncID) -> IRRes<Vec<StmtID>> {
        Ok(self.func_uses(module, func)?.uses_of(var).to_vec())
    }

    pub fn invalidate(&mut self, func: FuncID) {
        self.cache.remove(&func);
    }
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{chain_case, globals_case, loop_back_edge_case, nested_case};

    #[test]
    fn test_uses_in_order_without_duplicates() {
        let case = chain_case();
        let uses = FuncVarUses::analyze(&case.module, case.func).unwrap();
        // `x = x + 2` mentions x twice but is one use
        assert_eq!(uses.uses_of(case.x), &[case.a, case.b, case.c]);
    }

    #[test]
    fn test_uses_through_loop_back_edge() {
        let case = loop_back_edge_case();
        let uses = FuncVarUses::analyze(&case.module, case.func).unwrap();
        assert_eq!(
            uses.uses_of(case.i),
            &[case.header, case.body[0], case.body[1], case.exit]
        );
    }

    #[test]
    fn test_params_are_not_uses() {
        let case = nested_case();
        let uses = FuncVarUses::analyze(&case.module, case.func).unwrap();
        let a_uses = uses.uses_of(case.a);
        // `a` is a parameter: the signature mention is not counted
        assert_eq!(a_uses[0], case.if_stmt);
        assert!(a_uses.contains(&case.while_stmt));
        assert!(a_uses.contains(&case.else_body[0]));
        assert_eq!(a_uses.last(), Some(&case.tail));
        assert_eq!(a_uses.len(), 7);
    }

    #[test]
    fn test_cached_queries() {
        let case = globals_case();
        let mut uses = VarUses::new();
        let m = &case.module;
        assert!(uses.is_used(m, case.used, case.f).unwrap());
        assert!(uses.is_used(m, case.shared, case.g).unwrap());
        assert!(!uses.is_used(m, case.used, case.g).unwrap());
        assert!(!uses.is_used(m, case.unused, case.f).unwrap());
        assert_eq!(uses.uses_of(m, case.shared, case.f).unwrap().len(), 2);
        assert!(matches!(
            uses.is_used(m, case.used, case.ext),
            Err(IRError::NotAFunctionDef(_))
        ));
    }
}
