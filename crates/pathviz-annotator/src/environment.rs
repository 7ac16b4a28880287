//! Chained variable scopes.
//!
//! Scopes live in an arena and link to their parent by `ScopeId`. A child
//! scope holds only the names written while it was current; everything else
//! resolves through the parent chain. Since a parent cannot change while a
//! child is open (except through writes the child propagates), reading
//! through the chain is the same as reading a snapshot taken at entry.
//!
//! Scopes are released in LIFO order: `exit_scope` pops the newest scope.

use crate::error::AnnotateError;
use indexmap::IndexMap;
use pathviz_common::limits::MAX_ARRAY_LENGTH;
use pathviz_expr::{Bindings, Value, array_position};
use rustc_hash::FxBuildHasher;
use tracing::trace;

/// Name to value map of one scope, in first-write order.
pub type RootBindings = IndexMap<String, Value, FxBuildHasher>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    bindings: RootBindings,
}

#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Environment {
        Environment {
            scopes: vec![Scope::default()],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// Number of open scopes, the root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn enter_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(parent),
            bindings: RootBindings::default(),
        });
        id
    }

    /// Discard `scope` and anything opened after it. The root is never
    /// discarded.
    pub fn exit_scope(&mut self, scope: ScopeId) {
        debug_assert_eq!(
            scope.0 as usize + 1,
            self.scopes.len(),
            "scopes must be exited in LIFO order"
        );
        self.scopes.truncate((scope.0 as usize).max(1));
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope.0 as usize).and_then(|s| s.parent)
    }

    /// Resolve `name` from `scope` outward.
    pub fn read(&self, scope: ScopeId, name: &str) -> Option<&Value> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scopes.get(id.0 as usize)?;
            if let Some(value) = scope.bindings.get(name) {
                return Some(value);
            }
            current = scope.parent;
        }
        None
    }

    /// Bindings written directly into `scope`.
    pub fn bindings(&self, scope: ScopeId) -> Option<&RootBindings> {
        self.scopes.get(scope.0 as usize).map(|s| &s.bindings)
    }

    pub fn view(&self, scope: ScopeId) -> ScopeView<'_> {
        ScopeView {
            environment: self,
            scope,
        }
    }

    /// Bind `name` in `scope` only.
    pub fn declare(&mut self, scope: ScopeId, name: &str, value: Value) {
        trace!(scope = scope.0, name, %value, "declare");
        self.bind(scope, name, value);
    }

    /// Bind `name` in `scope`, then in every enclosing scope that already
    /// sees a defined value for it.
    pub fn write(&mut self, scope: ScopeId, name: &str, value: Value) {
        let mut current = scope;
        loop {
            trace!(scope = current.0, name, %value, "write");
            self.bind(current, name, value.clone());
            match self.parent(current) {
                Some(parent)
                    if self
                        .read(parent, name)
                        .is_some_and(|bound| !bound.is_undefined()) =>
                {
                    current = parent;
                }
                _ => break,
            }
        }
    }

    /// Set `name[index]`, propagating outward like `write` through every
    /// enclosing scope that sees an array under `name`.
    ///
    /// Writing past the end extends the array with `undefined` holes.
    pub fn write_indexed(
        &mut self,
        scope: ScopeId,
        name: &str,
        index: &Value,
        value: Value,
    ) -> Result<(), AnnotateError> {
        let position = array_position(index)
            .filter(|&position| position < MAX_ARRAY_LENGTH)
            .ok_or_else(|| AnnotateError::InvalidIndex {
                name: name.to_string(),
                index: index.to_string(),
            })?;

        let mut current = scope;
        loop {
            let mut elements = match self.read(current, name) {
                Some(Value::Array(elements)) => elements.clone(),
                other => {
                    return Err(AnnotateError::InvalidIndexTarget {
                        name: name.to_string(),
                        found: other.map_or("undefined", Value::type_name),
                    });
                }
            };
            if position >= elements.len() {
                elements.resize(position + 1, Value::Undefined);
            }
            elements[position] = value.clone();
            trace!(scope = current.0, name, position, %value, "write element");
            self.bind(current, name, Value::Array(elements));

            match self.parent(current) {
                Some(parent) if self.read(parent, name).is_some_and(Value::is_array) => {
                    current = parent;
                }
                _ => return Ok(()),
            }
        }
    }

    fn bind(&mut self, scope: ScopeId, name: &str, value: Value) {
        if let Some(scope) = self.scopes.get_mut(scope.0 as usize) {
            scope.bindings.insert(name.to_string(), value);
        }
    }
}

/// A scope seen through its parent chain, for expression evaluation.
#[derive(Clone, Copy)]
pub struct ScopeView<'a> {
    environment: &'a Environment,
    scope: ScopeId,
}

impl Bindings for ScopeView<'_> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.environment.read(self.scope, name)
    }
}

#[cfg(test)]
#[path = "../tests/environment_tests.rs"]
mod tests;
