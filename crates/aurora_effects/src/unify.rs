//! The effect unifier: given two effects, a minimal substitution making
//! them equal, or an error tree.

use crate::algebra::{effect_names, flatten_unions, simplify, vars_names, Effect, FreshName, Vars};
use crate::error::{ErrorKind, ErrorTree};
use crate::pretty;
use crate::subst::{apply, apply_vars, compose, Substitution};

/// Unify two effects, producing a substitution that makes them equal.
///
/// Any `Concrete` operand is simplified first; any error from that step,
/// or from the dispatch below, is wrapped with this call's own
/// `"Trying to unify E1 and E2"` location (deduped away if the inner
/// error already carries that exact location).
pub fn unify(e1: Effect, e2: Effect) -> Result<Substitution, ErrorTree> {
    let location = format!(
        "Trying to unify {} and {}",
        pretty::print_effect(&e1),
        pretty::print_effect(&e2)
    );
    unify_inner(e1, e2).map_err(|err| ErrorTree::wrap(location, err))
}

fn unify_inner(e1: Effect, e2: Effect) -> Result<Substitution, ErrorTree> {
    let e1 = simplify_if_concrete(e1)?;
    let e2 = simplify_if_concrete(e2)?;

    if e1 == e2 {
        return Ok(Substitution::empty());
    }

    match (e1, e2) {
        (Effect::Arrow { params: p1, result: r1 }, Effect::Arrow { params: p2, result: r2 }) => {
            if p1.len() != p2.len() {
                return Err(ErrorTree::leaf(
                    "Unifying arrow arity",
                    format!("Expected {} arguments, got {}", p1.len(), p2.len()),
                    ErrorKind::ArityMismatch,
                ));
            }
            let mut s = Substitution::empty();
            for (a, b) in p1.into_iter().zip(p2) {
                let a = apply(&s, a)?;
                let b = apply(&s, b)?;
                let step = unify(a, b)?;
                s = compose(s, step)?;
            }
            let r1 = apply(&s, *r1)?;
            let r2 = apply(&s, *r2)?;
            let step = unify(r1, r2)?;
            compose(s, step)
        }

        (Effect::Concrete { read: r1, update: u1 }, Effect::Concrete { read: r2, update: u2 }) => {
            let s_read = unify_vars(r1, r2)?;
            let u1 = apply_vars(&s_read, u1);
            let u2 = apply_vars(&s_read, u2);
            let s_update = unify_vars(u1, u2)?;
            Ok(s_read.concat(s_update))
        }

        (Effect::Quantified(n), other) | (other, Effect::Quantified(n)) => bind_effect(n, other),

        _ => Err(ErrorTree::leaf(
            "Comparing effect shapes",
            "Can't unify different types of effects",
            ErrorKind::ShapeMismatch,
        )),
    }
}

fn simplify_if_concrete(e: Effect) -> Result<Effect, ErrorTree> {
    if matches!(e, Effect::Concrete { .. }) {
        simplify(e)
    } else {
        Ok(e)
    }
}

/// Unify two variable-bags.
pub fn unify_vars(v1: Vars, v2: Vars) -> Result<Substitution, ErrorTree> {
    let v1 = flatten_unions(v1);
    let v2 = flatten_unions(v2);

    match (&v1, &v2) {
        (Vars::Concrete(n1), Vars::Concrete(n2)) => {
            let mut sorted1 = n1.clone();
            sorted1.sort();
            let mut sorted2 = n2.clone();
            sorted2.sort();
            if sorted1 == sorted2 {
                Ok(Substitution::empty())
            } else {
                Err(ErrorTree::leaf(
                    "Unifying variable bags",
                    format!(
                        "Expected variables [{}] and [{}] to be the same",
                        n1.join(", "),
                        n2.join(", ")
                    ),
                    ErrorKind::BagInequality,
                ))
            }
        }
        (Vars::Quantified(a), Vars::Quantified(b)) if a == b => Ok(Substitution::empty()),
        (Vars::Quantified(n), _) => {
            let n = n.clone();
            bind_vars(n, v2)
        }
        (_, Vars::Quantified(n)) => {
            let n = n.clone();
            bind_vars(n, v1)
        }
        _ if v1 == v2 => Ok(Substitution::empty()),
        _ => Err(ErrorTree::leaf(
            "Unifying variable bags",
            "Unification for unions of variables is not implemented",
            ErrorKind::UnsupportedUnionUnification,
        )),
    }
}

/// Bind a quantified effect name to an effect, after an occurs-check.
///
/// Binding a name to itself is still rejected: `unify` only reaches this
/// function once its own `e1 == e2` fast path has ruled out the trivial
/// case, so any `e` this sees that still mentions `name` is cyclical.
pub fn bind_effect(name: FreshName, e: Effect) -> Result<Substitution, ErrorTree> {
    if effect_names(&e).contains(&name) {
        return Err(ErrorTree::leaf(
            "Binding effect variable",
            format!(
                "Can't bind {} to {}: cyclical binding",
                name.base(),
                pretty::print_effect(&e)
            ),
            ErrorKind::CyclicalBinding,
        ));
    }
    Ok(Substitution::effect_binding(name, e))
}

/// Bind a quantified variable-bag name to a bag, after an occurs-check.
///
/// Binding a name to itself is still rejected: `unify_vars` only reaches
/// this function once it has already ruled out the `a == b` quantified
/// case, so any `v` this sees that still mentions `name` is cyclical.
pub fn bind_vars(name: FreshName, v: Vars) -> Result<Substitution, ErrorTree> {
    if vars_names(&v).contains(&name) {
        return Err(ErrorTree::leaf(
            "Binding variable-bag variable",
            format!(
                "Can't bind {} to {}: cyclical binding",
                name.base(),
                pretty::print_vars(&v)
            ),
            ErrorKind::CyclicalBinding,
        ));
    }
    Ok(Substitution::vars_binding(name, v))
}
