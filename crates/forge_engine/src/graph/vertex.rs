//! Vertex record owned by the graph

use super::{Descriptor, GraphError, GraphResult};

/// A vertex: payload, ordered out-edges (children) and parent back-link.
///
/// Edge lists never hold duplicates or a self reference. The parent link is
/// a plain descriptor, never an owning reference.
#[derive(Debug)]
pub(crate) struct Vertex<N> {
    descriptor: Descriptor,
    payload: N,
    edges: Vec<Descriptor>,
    parent: Option<Descriptor>,
}

impl<N> Vertex<N> {
    pub(crate) fn new(descriptor: Descriptor, payload: N) -> Self {
        Self {
            descriptor,
            payload,
            edges: Vec::new(),
            parent: None,
        }
    }

    pub(crate) fn payload(&self) -> &N {
        &self.payload
    }

    pub(crate) fn payload_mut(&mut self) -> &mut N {
        &mut self.payload
    }

    pub(crate) fn into_payload(self) -> N {
        self.payload
    }

    pub(crate) fn edges(&self) -> &[Descriptor] {
        &self.edges
    }

    pub(crate) fn parent(&self) -> Option<Descriptor> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Descriptor>) {
        self.parent = parent;
    }

    /// Append an out-edge to `d`
    pub(crate) fn add_edge(&mut self, d: Descriptor) -> GraphResult<()> {
        if !d.is_valid() || d == self.descriptor {
            return Err(GraphError::InvalidDescriptor(d));
        }
        if self.has_edge(d) {
            return Err(GraphError::EdgeExists {
                parent: self.descriptor,
                child: d,
            });
        }

        self.edges.push(d);
        Ok(())
    }

    /// Remove the out-edge to `d`, keeping sibling order
    pub(crate) fn remove_edge(&mut self, d: Descriptor) -> GraphResult<()> {
        if !d.is_valid() {
            return Err(GraphError::InvalidDescriptor(d));
        }

        match self.edges.iter().position(|&e| e == d) {
            Some(index) => {
                self.edges.remove(index);
                Ok(())
            }
            None => Err(GraphError::DescriptorNotFound(d)),
        }
    }

    pub(crate) fn has_edge(&self, d: Descriptor) -> bool {
        self.edges.contains(&d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_with_edges() -> Vertex<()> {
        let mut vertex = Vertex::new(Descriptor::new(0), ());
        for d in 1..=3 {
            vertex.add_edge(Descriptor::new(d)).unwrap();
        }
        vertex
    }

    #[test]
    fn test_has_edge() {
        let vertex = vertex_with_edges();

        assert!(!vertex.has_edge(Descriptor::new(0)));
        assert!(vertex.has_edge(Descriptor::new(1)));
        assert!(vertex.has_edge(Descriptor::new(3)));
        assert!(!vertex.has_edge(Descriptor::new(-1)));
        assert!(!vertex.has_edge(Descriptor::new(4)));
    }

    #[test]
    fn test_add_edge_rejects_self_duplicates_and_negatives() {
        let mut vertex = vertex_with_edges();

        assert_eq!(
            vertex.add_edge(Descriptor::new(0)),
            Err(GraphError::InvalidDescriptor(Descriptor::new(0)))
        );
        assert_eq!(
            vertex.add_edge(Descriptor::new(2)),
            Err(GraphError::EdgeExists {
                parent: Descriptor::new(0),
                child: Descriptor::new(2),
            })
        );
        assert_eq!(
            vertex.add_edge(Descriptor::new(-1)),
            Err(GraphError::InvalidDescriptor(Descriptor::new(-1)))
        );
        assert_eq!(vertex.add_edge(Descriptor::new(4)), Ok(()));
        assert_eq!(vertex.edges().len(), 4);
    }

    #[test]
    fn test_remove_edge_keeps_sibling_order() {
        let mut vertex = vertex_with_edges();

        assert_eq!(vertex.remove_edge(Descriptor::new(1)), Ok(()));
        assert_eq!(vertex.edges(), &[Descriptor::new(2), Descriptor::new(3)]);
        assert_eq!(
            vertex.remove_edge(Descriptor::new(1)),
            Err(GraphError::DescriptorNotFound(Descriptor::new(1)))
        );
        assert_eq!(
            vertex.remove_edge(Descriptor::new(-4)),
            Err(GraphError::InvalidDescriptor(Descriptor::new(-4)))
        );
    }
}
