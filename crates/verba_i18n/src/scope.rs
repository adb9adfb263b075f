//! Locale contexts scoped to UI subtrees.
//!
//! A [`ScopeTree`] mirrors the shape of the mounted UI: every subtree gets a
//! [`ScopeId`], a scope may provide a [`LocaleContext`], and lookups walk up
//! the parent chain to the nearest provider. Scopes with no provider see the
//! tree's English default.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::builtin::english;
use crate::context::LocaleContext;
use crate::dictionary::LocaleDictionary;
use crate::translator::Translate;

new_key_type! {
    /// Identity of a mounted UI subtree
    pub struct ScopeId;
}

struct ScopeNode {
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
}

pub struct ScopeTree {
    scopes: SlotMap<ScopeId, ScopeNode>,
    provided: FxHashMap<ScopeId, Arc<LocaleContext>>,
    fallback: Arc<LocaleContext>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: SlotMap::with_key(),
            provided: FxHashMap::default(),
            fallback: Arc::new(LocaleContext::english()),
        }
    }

    /// Mount a scope with no parent.
    pub fn mount_root(&mut self) -> ScopeId {
        let id = self.scopes.insert(ScopeNode {
            parent: None,
            children: Vec::new(),
        });
        debug!(?id, "mounted root locale scope");
        id
    }

    /// Mount a child of `parent`. Returns `None` if `parent` is not mounted.
    pub fn mount(&mut self, parent: ScopeId) -> Option<ScopeId> {
        if !self.scopes.contains_key(parent) {
            return None;
        }
        let id = self.scopes.insert(ScopeNode {
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(node) = self.scopes.get_mut(parent) {
            node.children.push(id);
        }
        Some(id)
    }

    pub fn contains(&self, scope: ScopeId) -> bool {
        self.scopes.contains_key(scope)
    }

    /// Number of mounted scopes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Attach `context` to `scope` and its descendants.
    ///
    /// Returns `false` (and provides nothing) if `scope` is not mounted.
    pub fn provide(&mut self, scope: ScopeId, context: Arc<LocaleContext>) -> bool {
        if !self.scopes.contains_key(scope) {
            return false;
        }
        debug!(?scope, lang = %context.lang(), "providing locale context");
        self.provided.insert(scope, context);
        true
    }

    /// Build and provide a context from optional component inputs.
    ///
    /// A missing `locale` falls back to English; a present `i18n` translator
    /// is consulted first on every request.
    pub fn provide_locale(
        &mut self,
        scope: ScopeId,
        locale: Option<Arc<LocaleDictionary>>,
        i18n: Option<Arc<dyn Translate>>,
    ) -> Option<Arc<LocaleContext>> {
        let mut context = LocaleContext::new(locale.unwrap_or_else(english));
        if let Some(t) = i18n {
            context = context.with_shared_translator(t);
        }
        let context = Arc::new(context);
        self.provide(scope, context.clone()).then_some(context)
    }

    /// The nearest context provided at or above `scope`.
    ///
    /// Falls back to the tree's English default when nothing is provided or
    /// `scope` is not mounted.
    pub fn inject(&self, scope: ScopeId) -> Arc<LocaleContext> {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            let Some(node) = self.scopes.get(id) else {
                break;
            };
            if let Some(ctx) = self.provided.get(&id) {
                return ctx.clone();
            }
            cur = node.parent;
        }
        self.fallback.clone()
    }

    /// Remove `scope`, its descendants, and every context they provided.
    pub fn unmount(&mut self, scope: ScopeId) {
        let Some(parent) = self.scopes.get(scope).map(|node| node.parent) else {
            return;
        };
        if let Some(parent) = parent.and_then(|p| self.scopes.get_mut(p)) {
            parent.children.retain(|c| *c != scope);
        }

        let mut stack = vec![scope];
        let mut removed = 0usize;
        while let Some(id) = stack.pop() {
            if let Some(node) = self.scopes.remove(id) {
                stack.extend(node.children);
                self.provided.remove(&id);
                removed += 1;
            }
        }
        debug!(?scope, removed, "unmounted locale scope");
    }
}
