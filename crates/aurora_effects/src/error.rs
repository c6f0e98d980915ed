//! Structural error reporting for the effect core.
//!
//! `ErrorTree` is deliberately not a `thiserror` enum: its shape (an
//! optional message, a mandatory location, and child trees) is structural
//! rather than a closed set of variants. Its leaves do carry a
//! `thiserror`-derived [`ErrorKind`] so the taxonomy in the error handling
//! design is still exhaustively matchable by downstream consumers.

use thiserror::Error;

/// The closed taxonomy of reasons a leaf `ErrorTree` can fail for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Two arrow effects disagree on parameter count.
    #[error("arity mismatch")]
    ArityMismatch,
    /// Two effects are different shapes (e.g. an arrow vs. a concrete effect).
    #[error("shape mismatch")]
    ShapeMismatch,
    /// Two concrete variable bags disagree on membership.
    #[error("bag inequality")]
    BagInequality,
    /// Binding a quantified name would create a cyclical substitution.
    #[error("cyclical binding")]
    CyclicalBinding,
    /// Unification between two unresolved unions of variables, which this
    /// design declares unsupported rather than attempting set-unification.
    #[error("unsupported union unification")]
    UnsupportedUnionUnification,
    /// Simplification discovered the same state variable updated twice.
    #[error("duplicate update")]
    DuplicateUpdate,
}

/// A nested, human-readable record of where and why unification or
/// simplification failed.
///
/// `location` gives context ("Trying to unify E1 and E2", "Applying
/// substitution to ..."); `message` is set only at leaves, where the
/// concrete reason for failure lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTree {
    /// The human-readable reason, present only at leaves.
    pub message: Option<String>,
    /// Context for where in the computation this error arose.
    pub location: String,
    /// The taxonomy this failure belongs to, present only at leaves.
    pub kind: Option<ErrorKind>,
    /// Nested errors that contributed to this one.
    pub children: Vec<ErrorTree>,
}

impl ErrorTree {
    /// Construct a leaf error: a location, a message, and its taxonomy kind.
    pub fn leaf(location: impl Into<String>, message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: Some(message.into()),
            location: location.into(),
            kind: Some(kind),
            children: Vec::new(),
        }
    }

    /// Wrap a child error under a new location, unless the child already
    /// carries the same location string (dedupe, per the propagation
    /// policy), in which case the child is returned unchanged.
    pub fn wrap(location: impl Into<String>, child: ErrorTree) -> Self {
        let location = location.into();
        if child.location == location {
            return child;
        }
        Self {
            message: None,
            location,
            kind: None,
            children: vec![child],
        }
    }

    /// Wrap several sibling errors under one new location.
    pub fn wrap_many(location: impl Into<String>, children: Vec<ErrorTree>) -> Self {
        let location = location.into();
        if children.len() == 1 && children[0].location == location {
            return children.into_iter().next().unwrap();
        }
        Self {
            message: None,
            location,
            kind: None,
            children,
        }
    }

    /// The leaf message, depth-first, joined for quick assertions in tests.
    pub fn leaf_messages(&self) -> Vec<&str> {
        if let Some(message) = &self.message {
            vec![message.as_str()]
        } else {
            self.children.iter().flat_map(ErrorTree::leaf_messages).collect()
        }
    }
}

impl std::fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.location)?;
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        for child in &self.children {
            write!(f, "\n  {}", child)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorTree {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_dedupes_identical_location() {
        let leaf = ErrorTree::leaf("Trying to unify A and B", "mismatch", ErrorKind::ShapeMismatch);
        let wrapped = ErrorTree::wrap("Trying to unify A and B", leaf.clone());
        assert_eq!(wrapped, leaf);
    }

    #[test]
    fn wrap_nests_distinct_location() {
        let leaf = ErrorTree::leaf("inner", "mismatch", ErrorKind::ShapeMismatch);
        let wrapped = ErrorTree::wrap("outer", leaf.clone());
        assert_eq!(wrapped.location, "outer");
        assert_eq!(wrapped.children, vec![leaf]);
    }

    #[test]
    fn leaf_messages_collects_depth_first() {
        let a = ErrorTree::leaf("a", "first", ErrorKind::ArityMismatch);
        let b = ErrorTree::leaf("b", "second", ErrorKind::BagInequality);
        let tree = ErrorTree::wrap_many("outer", vec![a, b]);
        assert_eq!(tree.leaf_messages(), vec!["first", "second"]);
    }
}
