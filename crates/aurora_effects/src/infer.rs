//! The effect inferencer: walks an IR module bottom-up and builds an
//! [`EffectMap`], recording a fresh signature for every user-defined
//! operator as its body is inferred.

use crate::algebra::{Effect, FreshName, Vars};
use crate::error::{ErrorKind, ErrorTree};
use crate::signatures::{instantiate, Signature, Signatures};
use crate::unify::unify;
use aurora_ir::{Module, NodeId, NodeKind};
use std::collections::HashMap;

/// Mapping from IR node identifier to its inferred effect. Only holds
/// successful inferences; failed nodes are recorded separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectMap(pub HashMap<NodeId, Effect>);

impl EffectMap {
    /// The inferred effect for `id`, if inference succeeded for it.
    pub fn get(&self, id: NodeId) -> Option<&Effect> {
        self.0.get(&id)
    }

    /// Number of nodes with a recorded effect.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no node has a recorded effect.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Walks an IR module bottom-up, producing an [`EffectMap`] and a list of
/// per-node errors. Single-threaded, pure, and free of I/O; the only
/// mutable state is the signature table (grown as each definition's body
/// is inferred) and a monotonic fresh-name counter, both owned by this
/// struct and reset by constructing a new inferencer per run.
pub struct EffectInferencer {
    signatures: Signatures,
    counter: u64,
    map: HashMap<NodeId, Effect>,
    errors: Vec<(NodeId, ErrorTree)>,
}

impl EffectInferencer {
    /// A fresh inferencer with only the built-in signatures registered.
    pub fn new() -> Self {
        Self {
            signatures: Signatures::with_builtins(),
            counter: 0,
            map: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Run inference over every definition in `module`, in declaration
    /// order, so that each definition's derived signature is available to
    /// callers appearing after it.
    #[tracing::instrument(skip(self, module))]
    pub fn infer_module(mut self, module: &Module) -> (EffectMap, Vec<(NodeId, ErrorTree)>) {
        for def in &module.defs {
            let mut env: HashMap<String, Effect> = HashMap::new();
            let mut param_effects = Vec::with_capacity(def.params.len());
            for param in &def.params {
                let fresh = self.fresh_quantified(param);
                env.insert(param.clone(), Effect::Quantified(fresh.clone()));
                param_effects.push(Effect::Quantified(fresh));
            }
            let body_effect = self.infer_node(module, def.body, &mut env);
            let arrow = Effect::Arrow {
                params: param_effects,
                result: Box::new(body_effect),
            };
            self.signatures.register(def.name.clone(), Signature::constant(arrow));
        }
        (EffectMap(self.map), self.errors)
    }

    fn fresh_quantified(&mut self, base: &str) -> FreshName {
        let name = FreshName::fresh(base.to_string(), self.counter);
        self.counter += 1;
        name
    }

    #[tracing::instrument(skip(self, module, env))]
    fn infer_node(&mut self, module: &Module, id: NodeId, env: &mut HashMap<String, Effect>) -> Effect {
        let node = module
            .arena
            .get(id)
            .unwrap_or_else(|| panic!("node {id} does not resolve in its own module"));

        let result: Result<Effect, ErrorTree> = match &node.kind {
            NodeKind::Literal => Ok(Effect::pure()),

            NodeKind::VarRef(name) => {
                if let Some(effect) = env.get(name) {
                    Ok(effect.clone())
                } else if module.is_state_var(name) {
                    Ok(Effect::Concrete {
                        read: Vars::Concrete(vec![name.clone()]),
                        update: Vars::Concrete(vec![]),
                    })
                } else {
                    self.apply_operator(name, Vec::new())
                }
            }

            NodeKind::VarUpdate(name) => Ok(Effect::Concrete {
                read: Vars::Concrete(vec![]),
                update: Vars::Concrete(vec![name.clone()]),
            }),

            NodeKind::OpApply { opcode, args } => {
                let arg_effects: Vec<Effect> = args
                    .iter()
                    .map(|arg| self.infer_node(module, *arg, env))
                    .collect();
                self.apply_operator(opcode, arg_effects)
            }

            NodeKind::Lambda { params, body } => {
                let mut inner_env = env.clone();
                let mut param_effects = Vec::with_capacity(params.len());
                for param in params {
                    let fresh = self.fresh_quantified(param);
                    inner_env.insert(param.clone(), Effect::Quantified(fresh.clone()));
                    param_effects.push(Effect::Quantified(fresh));
                }
                let body_effect = self.infer_node(module, *body, &mut inner_env);
                Ok(Effect::Arrow {
                    params: param_effects,
                    result: Box::new(body_effect),
                })
            }

            NodeKind::Let { bound, value, body } => {
                let value_effect = self.infer_node(module, *value, env);
                let mut inner_env = env.clone();
                inner_env.insert(bound.clone(), value_effect);
                let body_effect = self.infer_node(module, *body, &mut inner_env);
                Ok(body_effect)
            }
        };

        match result {
            Ok(effect) => {
                self.map.insert(id, effect.clone());
                effect
            }
            Err(tree) => {
                tracing::debug!(node = %id, error = %tree, "effect inference failed for node");
                self.errors.push((id, tree));
                Effect::Quantified(self.fresh_quantified("e"))
            }
        }
    }

    fn apply_operator(&mut self, opcode: &str, arg_effects: Vec<Effect>) -> Result<Effect, ErrorTree> {
        let signature = self
            .signatures
            .lookup(opcode)
            .cloned()
            .ok_or_else(|| {
                ErrorTree::leaf(
                    format!("Looking up signature for '{opcode}'"),
                    format!("Unknown operator '{opcode}'"),
                    ErrorKind::ShapeMismatch,
                )
            })?;

        let arity = arg_effects.len();
        let instantiated = instantiate(&signature, arity, &mut self.counter);
        let (params, result) = match instantiated {
            Effect::Arrow { params, result } => (params, result),
            other => unreachable!("a signature must instantiate to an arrow, got {other:?}"),
        };

        let fresh_result = Effect::Quantified(self.fresh_quantified("call_result"));
        let lhs = Effect::Arrow {
            params: arg_effects,
            result: Box::new(fresh_result.clone()),
        };
        let rhs = Effect::Arrow { params, result };

        let subst = unify(lhs, rhs)?;
        crate::subst::apply(&subst, fresh_result)
    }
}

impl Default for EffectInferencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Run inference over a module with a fresh inferencer. Convenience entry
/// point for callers that do not need to reuse or inspect the signature
/// table afterward.
pub fn infer_module(module: &Module) -> (EffectMap, Vec<(NodeId, ErrorTree)>) {
    EffectInferencer::new().infer_module(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_ir::{Def, NodeKind as Kind};
    use std::collections::BTreeSet;

    fn module_with(state_vars: &[&str], build: impl FnOnce(&mut Module) -> NodeId) -> Module {
        let mut module = Module::empty();
        module.state_vars = state_vars.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
        let body = build(&mut module);
        module.defs.push(Def::new("Main", vec![], body));
        module
    }

    #[test]
    fn literal_is_pure() {
        let module = module_with(&[], |m| m.arena.alloc(Kind::Literal));
        let (map, errors) = infer_module(&module);
        assert!(errors.is_empty());
        assert_eq!(map.get(NodeId(0)), Some(&Effect::pure()));
    }

    #[test]
    fn state_var_ref_reads() {
        let module = module_with(&["x"], |m| m.arena.alloc(Kind::VarRef("x".to_string())));
        let (map, errors) = infer_module(&module);
        assert!(errors.is_empty());
        assert_eq!(
            map.get(NodeId(0)),
            Some(&Effect::Concrete {
                read: Vars::Concrete(vec!["x".to_string()]),
                update: Vars::Concrete(vec![]),
            })
        );
    }

    #[test]
    fn var_update_updates() {
        let module = module_with(&["x"], |m| m.arena.alloc(Kind::VarUpdate("x".to_string())));
        let (map, errors) = infer_module(&module);
        assert!(errors.is_empty());
        assert_eq!(
            map.get(NodeId(0)),
            Some(&Effect::Concrete {
                read: Vars::Concrete(vec![]),
                update: Vars::Concrete(vec!["x".to_string()]),
            })
        );
    }

    #[test]
    fn assignment_combines_read_and_update() {
        let module = module_with(&["x", "y"], |m| {
            let lhs = m.arena.alloc(Kind::VarUpdate("x".to_string()));
            let rhs = m.arena.alloc(Kind::VarRef("y".to_string()));
            m.arena.alloc(Kind::OpApply {
                opcode: ":=".to_string(),
                args: vec![lhs, rhs],
            })
        });
        let (map, errors) = infer_module(&module);
        assert!(errors.is_empty());
        let root = NodeId(2);
        assert_eq!(
            map.get(root),
            Some(&Effect::Concrete {
                read: Vars::Concrete(vec!["y".to_string()]),
                update: Vars::Concrete(vec!["x".to_string()]),
            })
        );
    }

    #[test]
    fn lambda_produces_arrow_over_fresh_params() {
        let module = module_with(&[], |m| {
            let body = m.arena.alloc(Kind::VarRef("p".to_string()));
            m.arena.alloc(Kind::Lambda {
                params: vec!["p".to_string()],
                body,
            })
        });
        let (map, errors) = infer_module(&module);
        assert!(errors.is_empty());
        let root = NodeId(1);
        match map.get(root).unwrap() {
            Effect::Arrow { params, result } => {
                assert_eq!(params.len(), 1);
                assert_eq!(&**result, &params[0]);
            }
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn let_binder_reports_body_effect() {
        let module = module_with(&["x"], |m| {
            let value = m.arena.alloc(Kind::VarRef("x".to_string()));
            let body = m.arena.alloc(Kind::VarRef("bound".to_string()));
            m.arena.alloc(Kind::Let {
                bound: "bound".to_string(),
                value,
                body,
            })
        });
        let (map, errors) = infer_module(&module);
        assert!(errors.is_empty());
        let root = NodeId(2);
        assert_eq!(
            map.get(root),
            Some(&Effect::Concrete {
                read: Vars::Concrete(vec!["x".to_string()]),
                update: Vars::Concrete(vec![]),
            })
        );
    }

    #[test]
    fn lambda_param_shadows_same_named_state_var() {
        let module = module_with(&["x"], |m| {
            let body = m.arena.alloc(Kind::VarRef("x".to_string()));
            m.arena.alloc(Kind::Lambda {
                params: vec!["x".to_string()],
                body,
            })
        });
        let (map, errors) = infer_module(&module);
        assert!(errors.is_empty());
        let root = NodeId(1);
        match map.get(root).unwrap() {
            Effect::Arrow { params, result } => {
                assert_eq!(&**result, &params[0]);
            }
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn let_bound_name_shadows_same_named_state_var() {
        let module = module_with(&["x"], |m| {
            let value = m.arena.alloc(Kind::Literal);
            let body = m.arena.alloc(Kind::VarRef("x".to_string()));
            m.arena.alloc(Kind::Let {
                bound: "x".to_string(),
                value,
                body,
            })
        });
        let (map, errors) = infer_module(&module);
        assert!(errors.is_empty());
        let root = NodeId(2);
        assert_eq!(map.get(root), Some(&Effect::pure()));
    }

    #[test]
    fn nullary_builtin_reference_does_not_panic() {
        let module = module_with(&[], |m| m.arena.alloc(Kind::VarRef("union".to_string())));
        let (map, errors) = infer_module(&module);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(map.get(NodeId(0)), Some(&Effect::pure()));
    }

    #[test]
    fn unknown_operator_fails_without_aborting_siblings() {
        let mut module = Module::empty();
        let a = module.arena.alloc(Kind::Literal);
        let bad = module.arena.alloc(Kind::OpApply {
            opcode: "???".to_string(),
            args: vec![a],
        });
        let good = module.arena.alloc(Kind::Literal);
        module.defs.push(Def::new("Bad", vec![], bad));
        module.defs.push(Def::new("Good", vec![], good));

        let (map, errors) = infer_module(&module);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, bad);
        assert_eq!(map.get(good), Some(&Effect::pure()));
        assert!(matches!(map.get(bad), None));
    }

    #[test]
    fn user_defined_operator_signature_available_to_later_definitions() {
        let mut module = Module::empty();
        module.state_vars = BTreeSet::from(["x".to_string()]);
        let reads_x = module.arena.alloc(Kind::VarRef("x".to_string()));
        module.defs.push(Def::new("ReadsX", vec![], reads_x));

        let call = module.arena.alloc(Kind::OpApply {
            opcode: "ReadsX".to_string(),
            args: vec![],
        });
        module.defs.push(Def::new("CallsIt", vec![], call));

        let (map, errors) = infer_module(&module);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            map.get(call),
            Some(&Effect::Concrete {
                read: Vars::Concrete(vec!["x".to_string()]),
                update: Vars::Concrete(vec![]),
            })
        );
    }

    #[test]
    fn fresh_counter_is_deterministic_across_runs() {
        let module = module_with(&["x"], |m| {
            let lhs = m.arena.alloc(Kind::VarUpdate("x".to_string()));
            let rhs = m.arena.alloc(Kind::Literal);
            m.arena.alloc(Kind::OpApply {
                opcode: ":=".to_string(),
                args: vec![lhs, rhs],
            })
        });
        let (first, _) = infer_module(&module);
        let (second, _) = infer_module(&module);
        assert_eq!(first, second);
    }
}
