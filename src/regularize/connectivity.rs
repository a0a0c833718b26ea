//! The connectivity index: per-vertex incidence lists over a face's split
//! wires. Scratch state, rebuilt for every regularization call and never
//! persisted in the DS.

use std::collections::HashMap;

use crate::error::TopologyError;
use crate::topology::{EdgeId, Orientation, OrientedEdge, TopologyStore, VertexId};

/// Whether a wire traversal arrives at or leaves the vertex through the
/// incidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Incoming,
    Outgoing,
}

/// One occurrence of an edge at a vertex.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Incidence {
    /// Index of the wire in the regularizer's wire list.
    pub wire: usize,
    /// Position of the edge within the wire.
    pub position: usize,
    /// The incident edge.
    pub edge: EdgeId,
    /// Orientation of the occurrence (the operand key of the edge).
    pub orientation: Orientation,
    /// Arriving or leaving.
    pub role: Role,
}

/// Vertex-to-incidence map over all wires of a face.
///
/// Vertices are listed in first-seen traversal order so every consumer
/// iterates deterministically.
#[derive(Debug, Default)]
pub(crate) struct ConnectivityIndex {
    order: Vec<VertexId>,
    incidences: HashMap<VertexId, Vec<Incidence>>,
}

impl ConnectivityIndex {
    /// Builds the index over the given wires.
    pub fn build(
        store: &TopologyStore,
        wires: &[Vec<OrientedEdge>],
    ) -> Result<Self, TopologyError> {
        let mut index = Self::default();
        for (wire, edges) in wires.iter().enumerate() {
            for (position, oriented) in edges.iter().enumerate() {
                let (tail, head) = store.oriented_vertices(oriented)?;
                index.record(
                    tail,
                    Incidence {
                        wire,
                        position,
                        edge: oriented.edge,
                        orientation: oriented.orientation,
                        role: Role::Outgoing,
                    },
                );
                index.record(
                    head,
                    Incidence {
                        wire,
                        position,
                        edge: oriented.edge,
                        orientation: oriented.orientation,
                        role: Role::Incoming,
                    },
                );
            }
        }
        Ok(index)
    }

    fn record(&mut self, vertex: VertexId, incidence: Incidence) {
        let entry = self.incidences.entry(vertex).or_default();
        if entry.is_empty() {
            self.order.push(vertex);
        }
        entry.push(incidence);
    }

    /// Vertices in first-seen order.
    pub fn vertices(&self) -> &[VertexId] {
        &self.order
    }

    /// Incidences of a vertex, in traversal order.
    pub fn incidences(&self, vertex: VertexId) -> &[Incidence] {
        self.incidences.get(&vertex).map_or(&[], Vec::as_slice)
    }

    /// Number of incidences at a vertex.
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.incidences(vertex).len()
    }

    /// Vertices visited by more than two wire edges, in first-seen order.
    pub fn multiple_vertices(&self) -> Vec<VertexId> {
        self.order
            .iter()
            .copied()
            .filter(|&v| self.degree(v) > 2)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::Line;
    use crate::math::{Point3, CONFUSION};
    use crate::topology::{EdgeCurve, EdgeData, VertexData};

    fn segment(
        store: &mut TopologyStore,
        va: VertexId,
        vb: VertexId,
    ) -> OrientedEdge {
        let a = store.vertex(va).unwrap().point;
        let b = store.vertex(vb).unwrap().point;
        let line = Line::new(a, b - a).unwrap();
        let len = (b - a).norm();
        OrientedEdge::forward(store.add_edge(EdgeData::new(
            va,
            vb,
            EdgeCurve::Line(line),
            0.0,
            len,
            CONFUSION,
        )))
    }

    fn vertex(store: &mut TopologyStore, x: f64, y: f64) -> VertexId {
        store.add_vertex(VertexData::new(Point3::new(x, y, 0.0), CONFUSION))
    }

    #[test]
    fn simple_loop_has_degree_two_everywhere() {
        let mut store = TopologyStore::new();
        let a = vertex(&mut store, 0.0, 0.0);
        let b = vertex(&mut store, 1.0, 0.0);
        let c = vertex(&mut store, 1.0, 1.0);
        let wire = vec![
            segment(&mut store, a, b),
            segment(&mut store, b, c),
            segment(&mut store, c, a),
        ];

        let index = ConnectivityIndex::build(&store, &[wire]).unwrap();
        assert_eq!(index.vertices().len(), 3);
        for &v in index.vertices() {
            assert_eq!(index.degree(v), 2);
        }
        assert!(index.multiple_vertices().is_empty());
    }

    #[test]
    fn pinch_vertex_has_degree_four() {
        let mut store = TopologyStore::new();
        let a = vertex(&mut store, -1.0, -1.0);
        let v = vertex(&mut store, 0.0, 0.0);
        let d = vertex(&mut store, 1.0, 1.0);
        let c = vertex(&mut store, 1.0, -1.0);
        let b = vertex(&mut store, -1.0, 1.0);
        // Bowtie: a -> v -> d -> c -> v -> b -> a
        let wire = vec![
            segment(&mut store, a, v),
            segment(&mut store, v, d),
            segment(&mut store, d, c),
            segment(&mut store, c, v),
            segment(&mut store, v, b),
            segment(&mut store, b, a),
        ];

        let index = ConnectivityIndex::build(&store, &[wire]).unwrap();
        assert_eq!(index.multiple_vertices(), vec![v]);
        assert_eq!(index.degree(v), 4);

        let roles: Vec<Role> = index.incidences(v).iter().map(|i| i.role).collect();
        assert_eq!(
            roles,
            vec![Role::Incoming, Role::Outgoing, Role::Incoming, Role::Outgoing]
        );
    }
}
