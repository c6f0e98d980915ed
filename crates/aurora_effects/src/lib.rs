//! Aurora's read/update effect system
//!
//! A Hindley-Milner-style inference and unification engine computing, for
//! every expression in a module, a symbolic description of which state
//! variables it *reads* and *updates* — and rejecting ill-formed effects,
//! such as an expression that updates the same variable twice.
//!
//! # Layout
//!
//! - [`algebra`]: the effect data language (`Effect`, `Vars`,
//!   `FreshName`) and the canonicalization helpers (`flatten_unions`,
//!   `unique_vars`, `simplify`).
//! - [`unify`]: the unifier (`unify`, `unify_vars`) and the occurs-checked
//!   binders it delegates to.
//! - [`subst`]: the substitution engine (`apply`, `apply_vars`, `compose`).
//! - [`signatures`]: the opcode -> effect-scheme table, built-ins included.
//! - [`infer`]: the inferencer that walks an `aurora_ir::Module` bottom-up
//!   and produces an [`infer::EffectMap`].
//! - [`error`]: `ErrorTree`, the structural error type every fallible
//!   operation above returns on failure.
//! - [`pretty`]: the stable pretty-print grammar, also used inside error
//!   message construction.
//!
//! The core is strictly single-threaded and free of I/O: a pure function
//! from an IR module and a signature table to an effect map plus a list
//! of per-node errors. There is no configuration surface.
//!
//! # Example
//!
//! ```rust
//! use aurora_effects::infer::infer_module;
//! use aurora_ir::{Def, Module, NodeKind};
//! use std::collections::BTreeSet;
//!
//! let mut module = Module::empty();
//! module.state_vars = BTreeSet::from(["x".to_string()]);
//! let read_x = module.arena.alloc(NodeKind::VarRef("x".to_string()));
//! module.defs.push(Def::new("ReadsX", vec![], read_x));
//!
//! let (map, errors) = infer_module(&module);
//! assert!(errors.is_empty());
//! assert!(map.get(read_x).is_some());
//! ```

pub mod algebra;
pub mod error;
pub mod infer;
pub mod pretty;
pub mod signatures;
pub mod subst;
pub mod unify;

pub use algebra::{Effect, FreshName, Vars};
pub use error::{ErrorKind, ErrorTree};
pub use infer::{infer_module, EffectInferencer, EffectMap};
pub use signatures::{Signature, Signatures};
pub use subst::Substitution;
