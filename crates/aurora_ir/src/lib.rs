//! aurora_ir - minimal intermediate representation for the effect core
//!
//! This crate is deliberately small. It plays the role of "whatever the
//! real parser and name-resolution pipeline eventually lowers a module
//! into" — a node arena plus an ordered list of definitions — restricted
//! to exactly the shapes the read/update effect inferencer
//! (`aurora_effects`) needs to switch on: literals, plain and primed
//! variable references, operator application, lambdas, and let-binders.
//!
//! # Architecture
//!
//! - `node`: `NodeId`, `Node`, `NodeKind` — the six IR shapes.
//! - `arena`: a flat, append-only store of nodes.
//! - `module`: `Module`/`Def`, the ordered list of definitions and the
//!   set of state-variable names.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arena;
pub mod module;
pub mod node;

pub use arena::Arena;
pub use module::{Def, Module};
pub use node::{Node, NodeId, NodeKind};
