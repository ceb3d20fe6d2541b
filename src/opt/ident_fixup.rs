use crate::{
    ir::{FuncID, Module, VarID},
    opt::{IModulePass, PassRes},
};
use smol_str::{SmolStr, SmolStrBuilder, format_smolstr};
use std::collections::HashSet;

/// Turns `name` into a C-like identifier: every character outside
/// `[A-Za-z0-9_]` becomes `_`, and a leading digit or an empty name gets a
/// `_` prefix.
pub fn make_ident_valid(name: &str) -> SmolStr {
    let needs_prefix = name.chars().next().is_none_or(|c| c.is_ascii_digit());
    let is_valid = |c: char| c.is_ascii_alphanumeric() || c == '_';
    if !needs_prefix && name.chars().all(is_valid) {
        return SmolStr::new(name);
    }
    let mut builder = SmolStrBuilder::new();
    if needs_prefix {
        builder.push('_');
    }
    for c in name.chars() {
        builder.push(if is_valid(c) { c } else { '_' });
    }
    builder.finish()
}

/// Hands out names, suffixing `_1`, `_2`, ... on collision.
#[derive(Default)]
struct NameScope {
    taken: HashSet<SmolStr>,
}

impl NameScope {
    fn claim(&mut self, base: SmolStr) -> SmolStr {
        if self.taken.insert(base.clone()) {
            return base;
        }
        let mut n = 1usize;
        loop {
            let candidate = format_smolstr!("{base}_{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Makes every identifier in the module valid and unique.
///
/// Global variables and functions share one scope. Parameters and locals of a
/// function share another, one per function. A variable local to several
/// functions is renamed once, by the first function that lists it; later
/// functions keep that name and rename their own variables around it.
#[derive(Debug, Default)]
pub struct IdentFixup {
    /// Number of identifiers changed by the last run.
    pub renamed: usize,
}

impl IdentFixup {
    pub fn new() -> Self {
        Self::default()
    }

    fn rename_var(&mut self, module: &mut Module, scope: &mut NameScope, var: VarID) {
        let data = var.deref_ir_mut(&mut module.allocs);
        let name = scope.claim(make_ident_valid(&data.name));
        if name != data.name {
            log::debug!("ident-fixup: variable `{}` renamed to `{name}`", data.name);
            data.name = name;
            self.renamed += 1;
        }
    }

    fn rename_func(&mut self, module: &mut Module, scope: &mut NameScope, func: FuncID) {
        let data = func.deref_ir_mut(&mut module.allocs);
        let name = scope.claim(make_ident_valid(&data.name));
        if name != data.name {
            log::debug!("ident-fixup: function `{}` renamed to `{name}`", data.name);
            data.name = name;
            self.renamed += 1;
        }
    }
}

impl IModulePass for IdentFixup {
    fn get_name(&self) -> &'static str {
        "IdentFixup"
    }

    fn run_on_module(&mut self, module: &mut Module) -> PassRes {
        self.renamed = 0;
        let globals: Vec<VarID> = module.global_vars().iter().map(|g| g.var).collect();
        let funcs = module.funcs().to_vec();

        let mut module_scope = NameScope::default();
        for &var in &globals {
            self.rename_var(module, &mut module_scope, var);
        }
        for &func in &funcs {
            self.rename_func(module, &mut module_scope, func);
        }

        let mut done: HashSet<VarID> = globals.into_iter().collect();
        for func in funcs {
            let fdata = func.deref_ir(&module.allocs);
            let vars: Vec<VarID> = fdata.params.iter().chain(&fdata.locals).copied().collect();
            // names fixed by an earlier function are reserved before any claim
            let mut scope = NameScope::default();
            let (fixed, fresh): (Vec<VarID>, Vec<VarID>) =
                vars.into_iter().partition(|v| done.contains(v));
            for var in fixed {
                scope.taken.insert(var.deref_ir(&module.allocs).name.clone());
            }
            for var in fresh {
                if done.insert(var) {
                    self.rename_var(module, &mut scope, var);
                }
            }
        }
        Ok(())
    }
}
