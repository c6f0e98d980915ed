//! The stable, literally-tested pretty-print grammar for effects and bags.
//!
//! ```text
//! pure concrete: Pure
//! read-only:     Read['x', 'y']
//! read+update:   Read['x'] & Update['y']
//! quantified:    e
//! arrow:         (E1, E2) => E3
//! bags:          names single-quoted, comma-separated
//! ```
//!
//! This printer is part of the error-message contract (unification and
//! simplification locations embed pretty-printed effects), not a
//! terminal/LSP diagnostic renderer.

use crate::algebra::{Effect, Vars};

/// Render an effect using the stable grammar.
pub fn print_effect(effect: &Effect) -> String {
    match effect {
        Effect::Quantified(name) => name.base().to_string(),
        Effect::Arrow { params, result } => {
            let params = params.iter().map(print_effect).collect::<Vec<_>>().join(", ");
            format!("({}) => {}", params, print_effect(result))
        }
        Effect::Concrete { read, update } => {
            let read_empty = is_empty_bag(read);
            let update_empty = is_empty_bag(update);
            match (read_empty, update_empty) {
                (true, true) => "Pure".to_string(),
                (false, true) => format!("Read[{}]", print_vars(read)),
                (true, false) => format!("Update[{}]", print_vars(update)),
                (false, false) => {
                    format!("Read[{}] & Update[{}]", print_vars(read), print_vars(update))
                }
            }
        }
    }
}

/// Render a variable-bag: quoted, comma-separated names; a bare name for
/// a quantified bag; members joined across all union branches.
pub fn print_vars(vars: &Vars) -> String {
    match vars {
        Vars::Concrete(names) => names
            .iter()
            .map(|n| format!("'{}'", n))
            .collect::<Vec<_>>()
            .join(", "),
        Vars::Quantified(name) => name.base().to_string(),
        Vars::Union(children) => children.iter().map(print_vars).collect::<Vec<_>>().join(", "),
    }
}

fn is_empty_bag(vars: &Vars) -> bool {
    matches!(vars, Vars::Concrete(names) if names.is_empty())
}
