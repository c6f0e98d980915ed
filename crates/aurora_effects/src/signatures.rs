//! The signature table: opcode -> effect scheme.
//!
//! Built-in operators get fixed schemes built by hand; user-defined
//! operators' signatures are derived from their own body inference (see
//! [`crate::infer`]) and registered here in declaration order.

use crate::algebra::{Effect, FreshName, Vars};
use crate::subst::{apply, Substitution};
use std::collections::HashMap;
use std::sync::Arc;

/// An arity-indexed effect scheme. Every quantified name the scheme
/// mentions is freshened on each [`instantiate`] call, so that
/// independent call sites never share a metavariable.
#[derive(Clone)]
pub struct Signature {
    build: Arc<dyn Fn(usize) -> Effect + Send + Sync>,
}

impl Signature {
    /// Build a signature from a closure mapping call arity to a scheme
    /// template (with unsuffixed `FreshName::scheme(..)` placeholders).
    pub fn new(build: impl Fn(usize) -> Effect + Send + Sync + 'static) -> Self {
        Self {
            build: Arc::new(build),
        }
    }

    /// A signature that ignores arity and always yields the same effect.
    /// Used for user-defined operators, whose arrow shape (arity baked
    /// into its own `params`) was already fixed by their own inference.
    pub fn constant(effect: Effect) -> Self {
        Self::new(move |_arity| effect.clone())
    }
}

/// Instantiate a signature at a call arity, freshening every quantified
/// name it mentions (both effect- and variable-bag-quantified) with a
/// new suffix from the process-local monotonic counter.
pub fn instantiate(signature: &Signature, arity: usize, counter: &mut u64) -> Effect {
    let template = (signature.build)(arity);
    let names = crate::algebra::effect_names(&template);

    let mut rename = Substitution::empty();
    for old in names {
        let fresh = FreshName::fresh(old.base().to_string(), *counter);
        *counter += 1;
        rename = rename.concat(Substitution::effect_binding(
            old.clone(),
            Effect::Quantified(fresh.clone()),
        ));
        rename = rename.concat(Substitution::vars_binding(old, Vars::Quantified(fresh)));
    }

    apply(&rename, template).expect("renaming a scheme template never fails simplification")
}

fn passthrough(arity: usize) -> Effect {
    if arity == 0 {
        return Effect::Arrow {
            params: Vec::new(),
            result: Box::new(Effect::pure()),
        };
    }
    let mut params = Vec::with_capacity(arity);
    let mut reads = Vec::with_capacity(arity);
    let mut updates = Vec::with_capacity(arity);
    for i in 0..arity {
        let r = FreshName::scheme(format!("r{i}"));
        let u = FreshName::scheme(format!("u{i}"));
        params.push(Effect::Concrete {
            read: Vars::Quantified(r.clone()),
            update: Vars::Quantified(u.clone()),
        });
        reads.push(Vars::Quantified(r));
        updates.push(Vars::Quantified(u));
    }
    Effect::Arrow {
        params,
        result: Box::new(Effect::Concrete {
            read: Vars::Union(reads),
            update: Vars::Union(updates),
        }),
    }
}

/// The opcode -> signature table.
pub struct Signatures {
    table: HashMap<String, Signature>,
}

impl Signatures {
    /// The built-in operators: conjunction, disjunction, prime/next,
    /// arithmetic, comparisons, and collection operators, plus `:=` and
    /// `unchanged`. All of them reduce to the same "union of each
    /// operand's read/update" scheme (see [`passthrough`]); `:=`'s
    /// update-only restriction on its left operand comes from that
    /// operand already being a `VarUpdate` node, not from a distinct
    /// signature shape, and `unchanged`'s single operand is typically a
    /// plain state-variable read.
    pub fn with_builtins() -> Self {
        let mut table = HashMap::new();
        let builtin_names = [
            "/\\", "\\/", "~", "'", ":=", "unchanged", "+", "-", "*", "/", "%", "<", ">", "<=",
            ">=", "=", "!=", "union", "intersect", "in", "notin", "SUBSET", "DOMAIN",
        ];
        for name in builtin_names {
            table.insert(name.to_string(), Signature::new(passthrough));
        }
        Self { table }
    }

    /// Register (or overwrite) a signature for `name`.
    pub fn register(&mut self, name: impl Into<String>, signature: Signature) {
        self.table.insert(name.into(), signature);
    }

    /// Look up the signature for `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&Signature> {
        self.table.get(name)
    }
}

impl Default for Signatures {
    fn default() -> Self {
        Self::with_builtins()
    }
}
