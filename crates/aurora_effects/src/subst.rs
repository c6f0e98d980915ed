//! Substitutions: finite ordered maps from quantified names to their
//! resolved effects or variable-bags, and the operations applying them.

use crate::algebra::{simplify, Effect, FreshName, Vars};
use crate::error::ErrorTree;
use crate::pretty;

/// A single binding in a substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Binds a quantified name to a resolved effect.
    Effect(FreshName, Effect),
    /// Binds a quantified variable-bag name to a resolved bag.
    Vars(FreshName, Vars),
}

/// A finite ordered list of bindings, applied left-to-right.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution(pub Vec<Binding>);

impl Substitution {
    /// The empty substitution.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// A substitution with a single effect binding.
    pub fn effect_binding(name: FreshName, effect: Effect) -> Self {
        Self(vec![Binding::Effect(name, effect)])
    }

    /// A substitution with a single variable-bag binding.
    pub fn vars_binding(name: FreshName, vars: Vars) -> Self {
        Self(vec![Binding::Vars(name, vars)])
    }

    /// Concatenate two substitutions' binding lists in order.
    pub fn concat(mut self, other: Substitution) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Whether this substitution has no bindings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most recent effect binding for `name`, scanning in reverse so
    /// a later binding shadows an earlier one.
    pub fn effect_for(&self, name: &FreshName) -> Option<&Effect> {
        self.0.iter().rev().find_map(|b| match b {
            Binding::Effect(n, e) if n == name => Some(e),
            _ => None,
        })
    }

    /// The most recent variable-bag binding for `name`.
    pub fn vars_for(&self, name: &FreshName) -> Option<&Vars> {
        self.0.iter().rev().find_map(|b| match b {
            Binding::Vars(n, v) if n == name => Some(v),
            _ => None,
        })
    }
}

/// Apply a substitution to an effect, re-canonicalizing any `Concrete`
/// leaf reached along the way, including one resolved through a bound
/// quantified name. This is where duplicate-update errors discovered
/// only after substitution surface.
pub fn apply(s: &Substitution, effect: Effect) -> Result<Effect, ErrorTree> {
    match effect {
        Effect::Quantified(n) => match s.effect_for(&n).cloned() {
            Some(bound) => simplify(bound).map_err(|err| {
                ErrorTree::wrap(
                    format!(
                        "Applying substitution to {}",
                        pretty::print_effect(&Effect::Quantified(n.clone()))
                    ),
                    err,
                )
            }),
            None => Ok(Effect::Quantified(n)),
        },
        Effect::Arrow { params, result } => {
            let params = params
                .into_iter()
                .map(|p| apply(s, p))
                .collect::<Result<Vec<_>, _>>()?;
            let result = Box::new(apply(s, *result)?);
            Ok(Effect::Arrow { params, result })
        }
        Effect::Concrete { read, update } => {
            let original = Effect::Concrete {
                read: read.clone(),
                update: update.clone(),
            };
            let read = apply_vars(s, read);
            let update = apply_vars(s, update);
            simplify(Effect::Concrete { read, update }).map_err(|err| {
                ErrorTree::wrap(
                    format!("Applying substitution to {}", pretty::print_effect(&original)),
                    err,
                )
            })
        }
    }
}

/// Apply a substitution to a variable-bag. Unlike [`apply`], this never
/// fails: flattening is deferred to whoever next calls `simplify`.
pub fn apply_vars(s: &Substitution, vars: Vars) -> Vars {
    match vars {
        Vars::Quantified(n) => s.vars_for(&n).cloned().unwrap_or(Vars::Quantified(n)),
        Vars::Concrete(names) => Vars::Concrete(names),
        Vars::Union(children) => Vars::Union(children.into_iter().map(|c| apply_vars(s, c)).collect()),
    }
}

/// Compose two substitutions so that `apply(compose(s1, s2), x)` equals
/// `apply(s2, apply(s1, x))`: every binding in `s1` has `s2` applied to
/// its value (chasing names `s1` sends further through `s2`), then `s2`'s
/// own bindings for names outside `s1`'s domain are appended unchanged.
pub fn compose(s1: Substitution, s2: Substitution) -> Result<Substitution, ErrorTree> {
    let mut s1_names = std::collections::HashSet::with_capacity(s1.0.len());
    let mut transformed = Vec::with_capacity(s1.0.len());
    for binding in s1.0 {
        let binding = match binding {
            Binding::Effect(n, e) => {
                s1_names.insert(n.clone());
                let e = apply(&s2, e)
                    .map_err(|err| ErrorTree::wrap("Composing substitutions", err))?;
                Binding::Effect(n, e)
            }
            Binding::Vars(n, v) => {
                s1_names.insert(n.clone());
                Binding::Vars(n, apply_vars(&s2, v))
            }
        };
        transformed.push(binding);
    }
    for binding in s2.0 {
        let name = match &binding {
            Binding::Effect(n, _) | Binding::Vars(n, _) => n,
        };
        if !s1_names.contains(name) {
            transformed.push(binding);
        }
    }
    Ok(Substitution(transformed))
}
