//! Lexical parameter scopes for body descriptors.
//!
//! A scope is an immutable overlay: lookups check the local table first and
//! fall back to the enclosing scope. Child scopes borrow their parent, so a
//! local override is visible to the subtree that declared it and to nothing
//! else.

use serde_json::Value;

use super::access::Object;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterScope<'a> {
    local: Option<&'a Object>,
    parent: Option<&'a ParameterScope<'a>>,
}

impl<'a> ParameterScope<'a> {
    /// The empty scope a top-level descriptor starts from.
    pub fn root() -> Self {
        Self::default()
    }

    /// Overlay `local` on top of this scope.
    pub fn overlay<'s>(&'s self, local: &'s Object) -> ParameterScope<'s> {
        ParameterScope {
            local: Some(local),
            parent: Some(self),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.local
            .and_then(|table| table.get(name))
            .or_else(|| self.parent.and_then(|parent| parent.lookup(name)))
    }
}
