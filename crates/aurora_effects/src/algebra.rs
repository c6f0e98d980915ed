//! The effect data language: effects, variable-bags, and canonicalization.
//!
//! This module owns the tagged `Effect`/`Vars` trees and the three pure
//! helpers (`flatten_unions`, `unique_vars`, `simplify`) that keep them in
//! canonical form. Nothing here ever unifies or substitutes — see
//! [`crate::unify`] and [`crate::subst`].

use crate::error::{ErrorKind, ErrorTree};
use crate::pretty;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A quantified name: a metavariable's base name plus an optional
/// freshening suffix assigned at signature-instantiation time.
///
/// Unsuffixed names (`suffix: None`) are scheme templates, as declared by a
/// signature builder (`e`, `r0`, ...). Suffixed names are what the
/// inferencer actually binds and unifies; the pretty-printer only ever
/// shows the base name, so two independently-freshened occurrences of the
/// same scheme variable still read identically to a user even though they
/// are distinct internally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FreshName {
    base: String,
    suffix: Option<u64>,
}

impl FreshName {
    /// A scheme-template name, as written by a signature builder.
    pub fn scheme(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            suffix: None,
        }
    }

    /// A name freshened with a globally monotonic suffix.
    pub fn fresh(base: impl Into<String>, suffix: u64) -> Self {
        Self {
            base: base.into(),
            suffix: Some(suffix),
        }
    }

    /// The bare base name, as shown by the pretty-printer.
    pub fn base(&self) -> &str {
        &self.base
    }
}

impl std::fmt::Display for FreshName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.suffix {
            Some(suffix) => write!(f, "{}${}", self.base, suffix),
            None => write!(f, "{}", self.base),
        }
    }
}

/// A symbolic description of which state variables an expression reads
/// and updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// A metavariable standing for an unknown effect.
    Quantified(FreshName),
    /// The effect of an operator taking `params.len()` arguments.
    Arrow {
        /// Parameter effects, in argument order.
        params: Vec<Effect>,
        /// The effect of the operator's result.
        result: Box<Effect>,
    },
    /// A ground effect: the variables read and the variables updated.
    Concrete {
        /// Variables read.
        read: Vars,
        /// Variables updated.
        update: Vars,
    },
}

impl Effect {
    /// The effect of a pure expression: reads and updates nothing.
    pub fn pure() -> Self {
        Effect::Concrete {
            read: Vars::Concrete(Vec::new()),
            update: Vars::Concrete(Vec::new()),
        }
    }
}

/// An unordered bag of state-variable names, possibly quantified or a
/// union of several bags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vars {
    /// A finite bag of state-variable names. Duplicates are meaningful
    /// only inside an `update` bag, where they signal an error; in a
    /// `read` bag they are deduplicated by [`unique_vars`].
    Concrete(Vec<String>),
    /// A metavariable standing for an unknown bag.
    Quantified(FreshName),
    /// An unresolved union, canonicalized by [`flatten_unions`].
    Union(Vec<Vars>),
}

/// Recursively flatten unions of variable-bags.
///
/// `Concrete` and `Quantified` bags are returned unchanged. A `Union` is
/// flattened by recursively flattening each child, then splitting the
/// flattened children into concrete names (merged into a single bag) and
/// non-concrete children (quantified bags, and the members of any nested
/// union, which can themselves only be concrete or quantified once
/// flattened). The flattening invariant — a `Union` never directly
/// contains another `Union` — holds by construction.
pub fn flatten_unions(v: Vars) -> Vars {
    match v {
        Vars::Concrete(_) | Vars::Quantified(_) => v,
        Vars::Union(children) => {
            fn absorb(
                child: Vars,
                concrete_collected: &mut Vec<String>,
                non_concrete: &mut Vec<Vars>,
                saw_concrete: &mut bool,
            ) {
                match child {
                    Vars::Concrete(names) => {
                        *saw_concrete = true;
                        concrete_collected.extend(names);
                    }
                    other => non_concrete.push(other),
                }
            }

            let mut concrete_collected: Vec<String> = Vec::new();
            let mut non_concrete: Vec<Vars> = Vec::new();
            let mut saw_concrete = false;

            for child in children {
                match flatten_unions(child) {
                    Vars::Union(members) => {
                        for member in members {
                            absorb(
                                member,
                                &mut concrete_collected,
                                &mut non_concrete,
                                &mut saw_concrete,
                            );
                        }
                    }
                    flat => absorb(
                        flat,
                        &mut concrete_collected,
                        &mut non_concrete,
                        &mut saw_concrete,
                    ),
                }
            }

            match (saw_concrete, non_concrete.len()) {
                (true, 0) => Vars::Concrete(concrete_collected),
                (false, 1) => non_concrete.into_iter().next().unwrap(),
                (false, _) => Vars::Union(non_concrete),
                (true, _) => {
                    non_concrete.push(Vars::Concrete(concrete_collected));
                    Vars::Union(non_concrete)
                }
            }
        }
    }
}

/// Deduplicate names inside each `Concrete` leaf. Does not merge unions.
pub fn unique_vars(v: Vars) -> Vars {
    match v {
        Vars::Concrete(names) => {
            let mut seen = HashSet::new();
            let mut out = Vec::with_capacity(names.len());
            for name in names {
                if seen.insert(name.clone()) {
                    out.push(name);
                }
            }
            Vars::Concrete(out)
        }
        Vars::Quantified(n) => Vars::Quantified(n),
        Vars::Union(children) => Vars::Union(children.into_iter().map(unique_vars).collect()),
    }
}

fn collect_concrete_names(v: &Vars, out: &mut Vec<String>) {
    match v {
        Vars::Concrete(names) => out.extend(names.iter().cloned()),
        Vars::Quantified(_) => {}
        Vars::Union(children) => {
            for child in children {
                collect_concrete_names(child, out);
            }
        }
    }
}

/// Put a `Concrete` effect's `read`/`update` bags into canonical form,
/// failing if `update` mentions the same variable twice.
fn simplify_concrete(read: Vars, update: Vars) -> Result<Effect, ErrorTree> {
    let original = Effect::Concrete {
        read: read.clone(),
        update: update.clone(),
    };

    let read = unique_vars(flatten_unions(read));
    let update = flatten_unions(update);

    let mut all_updates = Vec::new();
    collect_concrete_names(&update, &mut all_updates);

    let mut seen = HashSet::new();
    let mut dupes = Vec::new();
    for name in &all_updates {
        if !seen.insert(name.clone()) && !dupes.contains(name) {
            dupes.push(name.clone());
        }
    }

    if !dupes.is_empty() {
        return Err(ErrorTree::leaf(
            format!("Trying to simplify effect {}", pretty::print_effect(&original)),
            format!("Multiple updates of variable(s): {}", dupes.join(", ")),
            ErrorKind::DuplicateUpdate,
        ));
    }

    Ok(Effect::Concrete { read, update })
}

/// Canonicalize an effect: recursively simplifies every `Concrete` leaf,
/// failing if any of them has a duplicate update.
pub fn simplify(effect: Effect) -> Result<Effect, ErrorTree> {
    match effect {
        Effect::Quantified(n) => Ok(Effect::Quantified(n)),
        Effect::Arrow { params, result } => {
            let params = params
                .into_iter()
                .map(simplify)
                .collect::<Result<Vec<_>, _>>()?;
            let result = Box::new(simplify(*result)?);
            Ok(Effect::Arrow { params, result })
        }
        Effect::Concrete { read, update } => simplify_concrete(read, update),
    }
}

/// Every quantified name reachable from an effect, under either kind
/// (effect-quantified leaves, and variable-bag-quantified leaves nested
/// inside any `Concrete` effect).
pub fn effect_names(e: &Effect) -> HashSet<FreshName> {
    let mut set = HashSet::new();
    collect_effect_names(e, &mut set);
    set
}

fn collect_effect_names(e: &Effect, set: &mut HashSet<FreshName>) {
    match e {
        Effect::Quantified(n) => {
            set.insert(n.clone());
        }
        Effect::Arrow { params, result } => {
            for p in params {
                collect_effect_names(p, set);
            }
            collect_effect_names(result, set);
        }
        Effect::Concrete { read, update } => {
            collect_vars_names(read, set);
            collect_vars_names(update, set);
        }
    }
}

/// Every quantified name reachable from a variable-bag.
pub fn vars_names(v: &Vars) -> HashSet<FreshName> {
    let mut set = HashSet::new();
    collect_vars_names(v, &mut set);
    set
}

fn collect_vars_names(v: &Vars, set: &mut HashSet<FreshName>) {
    match v {
        Vars::Quantified(n) => {
            set.insert(n.clone());
        }
        Vars::Concrete(_) => {}
        Vars::Union(children) => {
            for child in children {
                collect_vars_names(child, set);
            }
        }
    }
}
