//! Descriptor graph implementation
//!
//! A forest of trees keyed by [`Descriptor`]. Every vertex has at most one
//! parent and no vertex may become its own ancestor. All state sits behind a
//! single reader/writer lock: queries share it, structural mutations hold it
//! exclusively, and every mutation validates its inputs before touching any
//! state so a failed call leaves the graph unchanged.

use super::vertex::Vertex;
use super::{Descriptor, GraphError, GraphResult, Node};
use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::collections::HashMap;

/// Upper bound on live vertices: the positive 32-bit descriptor range
pub const DESCRIPTOR_LIMIT: usize = i32::MAX as usize;

/// Directed acyclic graph of payloads addressed by descriptors
pub struct Graph<N: Node> {
    inner: RwLock<Inner<N>>,
}

struct Inner<N: Node> {
    vertices: HashMap<Descriptor, Vertex<N>>,
    identities: HashMap<N::Id, Descriptor>,
    next: i32,
    limit: usize,
}

impl<N: Node> Inner<N> {
    fn validate(&self, d: Descriptor) -> GraphResult<()> {
        if !d.is_valid() {
            return Err(GraphError::InvalidDescriptor(d));
        }
        if !self.vertices.contains_key(&d) {
            return Err(GraphError::DescriptorNotFound(d));
        }
        Ok(())
    }

    fn vertex(&self, d: Descriptor) -> GraphResult<&Vertex<N>> {
        self.validate(d)?;
        self.vertices
            .get(&d)
            .ok_or(GraphError::DescriptorNotFound(d))
    }

    fn vertex_mut(&mut self, d: Descriptor) -> GraphResult<&mut Vertex<N>> {
        self.validate(d)?;
        self.vertices
            .get_mut(&d)
            .ok_or(GraphError::DescriptorNotFound(d))
    }

    /// Next free descriptor. The counter wraps to zero past `i32::MAX` and
    /// skips descriptors that are still live.
    fn next_descriptor(&mut self) -> GraphResult<Descriptor> {
        if self.vertices.len() >= self.limit {
            return Err(GraphError::DescriptorLimitReached);
        }

        loop {
            let candidate = Descriptor::new(self.next);
            self.next = if self.next == i32::MAX { 0 } else { self.next + 1 };
            if !self.vertices.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
    }

    /// True if `ancestor` sits strictly above `d`
    fn is_ancestor(&self, ancestor: Descriptor, d: Descriptor) -> bool {
        let mut current = self.vertices.get(&d).and_then(|v| v.parent());
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.vertices.get(&p).and_then(|v| v.parent());
        }
        false
    }

    fn vertex_active(&self, d: Descriptor) -> bool {
        if self.validate(d).is_err() {
            return false;
        }

        let mut current = Some(d);
        while let Some(c) = current {
            let Some(vertex) = self.vertices.get(&c) else {
                return false;
            };
            if !vertex.payload().active() {
                return false;
            }
            current = vertex.parent();
        }
        true
    }

    fn walk<F>(&self, start: Descriptor, include_disabled: bool, mut visit: F) -> usize
    where
        F: FnMut(Descriptor, &N),
    {
        if self.validate(start).is_err() {
            return 0;
        }
        if !include_disabled && !self.vertex_active(start) {
            return 0;
        }

        let mut visited = 0;
        let mut stack = vec![start];
        while let Some(d) = stack.pop() {
            let Some(vertex) = self.vertices.get(&d) else {
                log::warn!("Vertex {} vanished during traversal, skipping", d);
                continue;
            };
            visit(d, vertex.payload());
            visited += 1;

            // Reverse so the first edge is popped first (pre-order).
            for &child in vertex.edges().iter().rev() {
                let keep = include_disabled
                    || self
                        .vertices
                        .get(&child)
                        .map_or(true, |c| c.payload().active());
                if keep {
                    stack.push(child);
                }
            }
        }
        visited
    }

    fn dfs(&self, start: Descriptor, include_disabled: bool) -> Vec<Descriptor> {
        let mut out = Vec::new();
        self.walk(start, include_disabled, |d, _| out.push(d));
        out
    }

    fn add_vertex(&mut self, node: N) -> GraphResult<Descriptor> {
        let id = node.id();
        if let Some(&existing) = self.identities.get(&id) {
            return Err(GraphError::DescriptorExists(existing));
        }

        let d = self.next_descriptor()?;
        self.identities.insert(id, d);
        self.vertices.insert(d, Vertex::new(d, node));
        Ok(d)
    }

    fn add_edge(&mut self, parent: Descriptor, child: Descriptor) -> GraphResult<()> {
        self.validate(parent)?;
        self.validate(child)?;

        if parent == child || self.is_ancestor(child, parent) {
            return Err(GraphError::Descendant {
                descriptor: child,
                parent,
            });
        }
        if self.vertex(parent)?.has_edge(child) {
            return Err(GraphError::EdgeExists { parent, child });
        }
        if let Some(existing) = self.vertex(child)?.parent() {
            return Err(GraphError::HasParent {
                descriptor: child,
                parent: existing,
            });
        }

        self.vertex_mut(parent)?.add_edge(child)?;
        self.vertex_mut(child)?.set_parent(Some(parent));
        Ok(())
    }

    fn move_vertex(&mut self, d: Descriptor, new_parent: Descriptor) -> GraphResult<()> {
        self.validate(d)?;
        self.validate(new_parent)?;

        if d == new_parent || self.is_ancestor(d, new_parent) {
            return Err(GraphError::Descendant {
                descriptor: d,
                parent: new_parent,
            });
        }

        let old_parent = self.vertex(d)?.parent();
        if old_parent == Some(new_parent) {
            return Ok(());
        }
        if self.vertex(new_parent)?.has_edge(d) {
            return Err(GraphError::EdgeExists {
                parent: new_parent,
                child: d,
            });
        }

        if let Some(old) = old_parent {
            self.vertex_mut(old)?.remove_edge(d)?;
        }
        self.vertex_mut(new_parent)?.add_edge(d)?;
        self.vertex_mut(d)?.set_parent(Some(new_parent));
        Ok(())
    }

    fn delete_vertex(&mut self, d: Descriptor) -> GraphResult<Vec<N>> {
        self.validate(d)?;

        // Unpruned: inactive descendants must go too.
        let subtree = self.dfs(d, true);

        if let Some(parent) = self.vertex(d)?.parent() {
            self.vertex_mut(parent)?.remove_edge(d)?;
        }

        let mut removed = Vec::with_capacity(subtree.len());
        for descriptor in subtree {
            if let Some(vertex) = self.vertices.remove(&descriptor) {
                self.identities.remove(&vertex.payload().id());
                removed.push(vertex.into_payload());
            }
        }
        Ok(removed)
    }
}

impl<N: Node> Graph<N> {
    /// Create an empty graph using the full descriptor range
    pub fn new() -> Self {
        Self::with_limit(DESCRIPTOR_LIMIT)
    }

    /// Create an empty graph holding at most `limit` live vertices
    pub fn with_limit(limit: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                vertices: HashMap::new(),
                identities: HashMap::new(),
                next: 0,
                limit: limit.min(DESCRIPTOR_LIMIT),
            }),
        }
    }

    /// Maximum number of live vertices
    pub fn limit(&self) -> usize {
        self.inner.read().limit
    }

    /// Number of live vertices
    pub fn len(&self) -> usize {
        self.inner.read().vertices.len()
    }

    /// Whether the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.inner.read().vertices.is_empty()
    }

    /// Add a parentless, edgeless vertex holding `node`
    pub fn add_vertex(&self, node: N) -> GraphResult<Descriptor> {
        let d = self.inner.write().add_vertex(node)?;
        log::trace!("Added vertex {}", d);
        Ok(d)
    }

    /// Add the edge `parent -> child`
    pub fn add_edge(&self, parent: Descriptor, child: Descriptor) -> GraphResult<()> {
        self.inner.write().add_edge(parent, child)?;
        log::trace!("Added edge {}->{}", parent, child);
        Ok(())
    }

    /// Reparent `d` (with its whole subtree) under `new_parent`
    pub fn move_vertex(&self, d: Descriptor, new_parent: Descriptor) -> GraphResult<()> {
        self.inner.write().move_vertex(d, new_parent)?;
        log::debug!("Moved vertex {} under {}", d, new_parent);
        Ok(())
    }

    /// Delete `d` and every descendant, active or not.
    ///
    /// Returns the removed payloads in pre-order.
    pub fn delete_vertex(&self, d: Descriptor) -> GraphResult<Vec<N>> {
        let removed = self.inner.write().delete_vertex(d)?;
        log::debug!("Deleted vertex {} ({} vertices removed)", d, removed.len());
        Ok(removed)
    }

    /// Check that `d` is well formed and live
    pub fn validate_descriptor(&self, d: Descriptor) -> GraphResult<()> {
        self.inner.read().validate(d)
    }

    /// Whether the edge `parent -> child` exists
    pub fn edge_exists(&self, parent: Descriptor, child: Descriptor) -> bool {
        let inner = self.inner.read();
        inner
            .vertex(child)
            .and_then(|_| inner.vertex(parent))
            .map_or(false, |p| p.has_edge(child))
    }

    /// Whether `parent` is the direct parent of `child`
    pub fn parent_of(&self, parent: Descriptor, child: Descriptor) -> bool {
        let inner = self.inner.read();
        if inner.validate(parent).is_err() {
            return false;
        }
        inner
            .vertex(child)
            .map_or(false, |c| c.parent() == Some(parent))
    }

    /// Whether `d` lies strictly below `ancestor`
    pub fn descendant_of(&self, d: Descriptor, ancestor: Descriptor) -> bool {
        let inner = self.inner.read();
        if inner.validate(d).is_err() || inner.validate(ancestor).is_err() {
            return false;
        }
        inner.is_ancestor(ancestor, d)
    }

    /// Parent descriptor of `d`
    pub fn parent(&self, d: Descriptor) -> GraphResult<Descriptor> {
        self.inner
            .read()
            .vertex(d)?
            .parent()
            .ok_or(GraphError::NoParent(d))
    }

    /// Children of `d` in edge order
    pub fn children(&self, d: Descriptor) -> GraphResult<Vec<Descriptor>> {
        Ok(self.inner.read().vertex(d)?.edges().to_vec())
    }

    /// Read guard on the payload at `d`
    pub fn node_at_vertex(&self, d: Descriptor) -> GraphResult<MappedRwLockReadGuard<'_, N>> {
        let guard = self.inner.read();
        guard.validate(d)?;
        RwLockReadGuard::try_map(guard, |inner| inner.vertices.get(&d).map(Vertex::payload))
            .map_err(|_| GraphError::DescriptorNotFound(d))
    }

    /// Write guard on the payload at `d`.
    ///
    /// The payload's identity must not change through this guard.
    pub fn node_at_vertex_mut(&self, d: Descriptor) -> GraphResult<MappedRwLockWriteGuard<'_, N>> {
        let guard = self.inner.write();
        guard.validate(d)?;
        RwLockWriteGuard::try_map(guard, |inner| {
            inner.vertices.get_mut(&d).map(Vertex::payload_mut)
        })
        .map_err(|_| GraphError::DescriptorNotFound(d))
    }

    /// Run `f` against the payload at `d`
    pub fn with_node<R>(&self, d: Descriptor, f: impl FnOnce(&N) -> R) -> GraphResult<R> {
        let inner = self.inner.read();
        Ok(f(inner.vertex(d)?.payload()))
    }

    /// Run `f` against the payload at `d` mutably
    pub fn with_node_mut<R>(&self, d: Descriptor, f: impl FnOnce(&mut N) -> R) -> GraphResult<R> {
        let mut inner = self.inner.write();
        Ok(f(inner.vertex_mut(d)?.payload_mut()))
    }

    /// Whether a vertex with descriptor `d` is live
    pub fn has_vertex_with_descriptor(&self, d: Descriptor) -> bool {
        self.inner.read().validate(d).is_ok()
    }

    /// Whether a vertex whose payload has identity `id` is live
    pub fn has_vertex_with_identity(&self, id: N::Id) -> bool {
        self.inner.read().identities.contains_key(&id)
    }

    /// Descriptor of the vertex holding `node`
    pub fn descriptor_by_node(&self, node: &N) -> Option<Descriptor> {
        self.descriptor_by_identity(node.id())
    }

    /// Descriptor of the vertex whose payload has identity `id`
    pub fn descriptor_by_identity(&self, id: N::Id) -> Option<Descriptor> {
        self.inner.read().identities.get(&id).copied()
    }

    /// True if `d` and every ancestor up to its root are active
    pub fn vertex_active(&self, d: Descriptor) -> bool {
        self.inner.read().vertex_active(d)
    }

    /// Pre-order depth-first search from `start`.
    ///
    /// Without `include_disabled` the search prunes: an inactive vertex hides
    /// its whole subtree, and an inactive start yields nothing.
    pub fn dfs(&self, start: Descriptor, include_disabled: bool) -> Vec<Descriptor> {
        self.inner.read().dfs(start, include_disabled)
    }

    /// Same traversal as [`Graph::dfs`], visiting each payload under a single
    /// read lock. Returns the number of visited vertices.
    pub fn walk<F>(&self, start: Descriptor, include_disabled: bool, visit: F) -> usize
    where
        F: FnMut(Descriptor, &N),
    {
        self.inner.read().walk(start, include_disabled, visit)
    }
}

impl<N: Node> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}
