//! Arena of parent-linked scopes.
//!
//! The parser creates one scope per block and the evaluator mutates them in
//! place. Scopes are addressed by [`ScopeId`] and live as long as the
//! [`Scopes`] arena that owns them.

use crate::ast::Primitive;
use crate::Location;
use std::collections::BTreeMap;

/// Index of a scope inside a [`Scopes`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(usize);

/// Outcome of a single `assert:`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertResult {
    pub location: Location,
    pub passed: bool,
}

/// Variable bindings and recorded assertions of one block.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub vars: BTreeMap<String, Primitive>,
    pub asserts: Vec<AssertResult>,
}

#[derive(Debug, Clone, Default)]
pub struct Scopes {
    scopes: Vec<Scope>,
}

impl Scopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new scope linked to `parent`.
    pub fn push(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.scopes.push(Scope {
            parent,
            ..Scope::default()
        });
        ScopeId(self.scopes.len() - 1)
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).parent
    }

    /// Bind `name` in `id`, replacing any previous binding there.
    pub fn define(&mut self, id: ScopeId, name: impl Into<String>, value: Primitive) {
        self.get_mut(id).vars.insert(name.into(), value);
    }

    /// Look `name` up in `id` only. Parent scopes are not consulted.
    pub fn lookup(&self, id: ScopeId, name: &str) -> Option<&Primitive> {
        self.get(id).vars.get(name)
    }

    pub fn record_assert(&mut self, id: ScopeId, location: Location, passed: bool) {
        self.get_mut(id)
            .asserts
            .push(AssertResult { location, passed });
    }

    /// Returns `true` if `ancestor` is on the parent chain of `id`.
    pub fn is_descendant(&self, id: ScopeId, ancestor: ScopeId) -> bool {
        let mut current = self.parent(id);
        while let Some(scope) = current {
            if scope == ancestor {
                return true;
            }
            current = self.parent(scope);
        }
        false
    }

    /// `id` followed by every scope nested beneath it, in creation order.
    pub fn subtree(&self, id: ScopeId) -> Vec<ScopeId> {
        std::iter::once(id)
            .chain(
                (0..self.scopes.len())
                    .map(ScopeId)
                    .filter(|&candidate| self.is_descendant(candidate, id)),
            )
            .collect()
    }
}
