//! IR node shapes
//!
//! The effect inferencer (`aurora_effects`) switches on exactly these six
//! shapes; a real front end is expected to lower richer surface syntax
//! down into them before handing a `Module` to the effect core.

use serde::{Deserialize, Serialize};

/// Stable identifier for an IR node.
///
/// A newtype rather than a bare integer so it cannot be accidentally
/// confused with other u64-keyed identifiers elsewhere in a larger
/// toolchain (file ids, symbol ids, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A single IR node: its id plus its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// This node's own id (redundant with its arena position, kept so a
    /// `&Node` can be passed around without also threading its id).
    pub id: NodeId,
    /// The node's shape.
    pub kind: NodeKind,
}

/// The shape of an IR node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A literal or constant value. Always pure.
    Literal,

    /// A plain reference to a name. A lambda parameter or let-bound name
    /// in scope shadows a state variable of the same name and resolves to
    /// its own inferred effect; otherwise, if the name resolves to a state
    /// variable (per `Module::is_state_var`), this is a read of that
    /// variable; otherwise (a nullary user operator) it is pure and its
    /// effect is looked up like any other operator application of arity 0.
    VarRef(String),

    /// A primed reference to a state variable that is being assigned —
    /// the left-hand target of an assignment-like operator. Always an
    /// update of exactly that variable.
    VarUpdate(String),

    /// Application of an operator (built-in or user-defined) to
    /// arguments. `opcode` is looked up in the signature table.
    OpApply {
        /// The operator name, as it appears in the signature table.
        opcode: String,
        /// Argument node ids, in order.
        args: Vec<NodeId>,
    },

    /// A lambda abstraction. `params` are bound fresh (quantified) in the
    /// body; the node's own effect is the `Arrow` of those fresh
    /// parameter effects to the body's inferred effect.
    Lambda {
        /// Formal parameter names, in declaration order.
        params: Vec<String>,
        /// Root node of the lambda body.
        body: NodeId,
    },

    /// A let-binder: `bound` is defined by `value`, then is in scope
    /// (with `value`'s inferred effect) for `body`. The binder node's own
    /// effect is the effect of `body`.
    Let {
        /// The name being bound.
        bound: String,
        /// Root node of the bound definition.
        value: NodeId,
        /// Root node of the body, evaluated with `bound` in scope.
        body: NodeId,
    },
}
