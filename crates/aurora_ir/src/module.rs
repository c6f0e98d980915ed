//! Modules: an ordered list of definitions over a shared node arena.

use crate::arena::Arena;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single top-level definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Def {
    /// The operator's name, as callers reference it via `OpApply.opcode`.
    pub name: String,
    /// Formal parameter names; `params.len()` is this operator's arity.
    pub params: Vec<String>,
    /// Root node of the definition's body.
    pub body: NodeId,
}

impl Def {
    /// Create a new definition.
    pub fn new(name: impl Into<String>, params: Vec<String>, body: NodeId) -> Self {
        Self {
            name: name.into(),
            params,
            body,
        }
    }

    /// This definition's arity.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A module: a shared node arena plus an ordered list of definitions, and
/// the set of names that denote state variables (as opposed to bound
/// locals or nullary operators).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// The node arena backing every definition's body.
    pub arena: Arena,
    /// Definitions, in declaration order.
    pub defs: Vec<Def>,
    /// Names declared as state variables in this module.
    pub state_vars: BTreeSet<String>,
}

impl Module {
    /// An empty module.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `name` denotes a state variable.
    pub fn is_state_var(&self, name: &str) -> bool {
        self.state_vars.contains(name)
    }
}
