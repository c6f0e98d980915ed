//! Property-based coverage of the universal properties that admit random
//! generation: idempotence, unifier soundness, the composition law, the
//! flattening invariant, and unifier symmetry. Properties 4 (occurs-check
//! completeness) and 7 (determinism) are existential/equality claims
//! exercised directly in `tests/effect_core.rs` instead.

use aurora_effects::algebra::{flatten_unions, simplify, Effect, FreshName, Vars};
use aurora_effects::subst::{apply, compose, Substitution};
use aurora_effects::unify::unify;
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof!["a", "b", "c"]
}

fn bag_strategy() -> impl Strategy<Value = Vars> {
    prop::collection::vec(name_strategy(), 0..3).prop_map(Vars::Concrete)
}

fn effect_leaf_strategy() -> impl Strategy<Value = Effect> {
    prop_oneof![
        (bag_strategy(), bag_strategy()).prop_map(|(read, update)| Effect::Concrete { read, update }),
        name_strategy().prop_map(|n| Effect::Quantified(FreshName::scheme(n))),
    ]
}

fn effect_strategy() -> impl Strategy<Value = Effect> {
    let leaf = effect_leaf_strategy().boxed();
    leaf.prop_recursive(3, 20, 3, |inner| {
        (prop::collection::vec(inner.clone(), 1..3), inner)
            .prop_map(|(params, result)| Effect::Arrow {
                params,
                result: Box::new(result),
            })
            .boxed()
    })
}

fn vars_strategy() -> impl Strategy<Value = Vars> {
    let leaf = bag_strategy().boxed();
    leaf.prop_recursive(3, 20, 3, |inner| {
        prop::collection::vec(inner, 1..3).prop_map(Vars::Union).boxed()
    })
}

fn small_substitution_strategy() -> impl Strategy<Value = Substitution> {
    prop::collection::vec((name_strategy(), effect_leaf_strategy()), 0..2).prop_map(|bindings| {
        let mut s = Substitution::empty();
        for (name, effect) in bindings {
            s = s.concat(Substitution::effect_binding(FreshName::scheme(name), effect));
        }
        s
    })
}

fn no_nested_union(v: &Vars) -> bool {
    match v {
        Vars::Union(children) => children.iter().all(|c| !matches!(c, Vars::Union(_)) && no_nested_union(c)),
        _ => true,
    }
}

proptest! {
    // Property 1: idempotence of simplification.
    #[test]
    fn simplify_is_idempotent(e in effect_strategy()) {
        if let Ok(once) = simplify(e) {
            let twice = simplify(once.clone());
            prop_assert_eq!(twice, Ok(once));
        }
    }

    // Property 2: unifier soundness.
    #[test]
    fn unify_soundness(a in effect_strategy(), b in effect_strategy()) {
        if let Ok(s) = unify(a.clone(), b.clone()) {
            let a2 = apply(&s, a).expect("a successful unifier must apply to its own inputs");
            let b2 = apply(&s, b).expect("a successful unifier must apply to its own inputs");
            prop_assert_eq!(a2, b2);
        }
    }

    // Property 3: composition law (sequential application semantics).
    #[test]
    fn composition_law(
        s1 in small_substitution_strategy(),
        s2 in small_substitution_strategy(),
        e in effect_strategy(),
    ) {
        if let Ok(composed) = compose(s1.clone(), s2.clone()) {
            let lhs = apply(&composed, e.clone());
            let rhs = apply(&s1, e).and_then(|mid| apply(&s2, mid));
            prop_assert_eq!(lhs.ok(), rhs.ok());
        }
    }

    // Property 5: flattening invariant.
    #[test]
    fn flatten_never_nests_unions(v in vars_strategy()) {
        let flat = flatten_unions(v);
        prop_assert!(no_nested_union(&flat));
    }

    // Property 6: symmetry (success/failure agree both directions).
    #[test]
    fn unify_is_symmetric(a in effect_strategy(), b in effect_strategy()) {
        let forward = unify(a.clone(), b.clone());
        let backward = unify(b, a);
        prop_assert_eq!(forward.is_ok(), backward.is_ok());
    }
}
