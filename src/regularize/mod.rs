//! The face regularizer.
//!
//! Post-processes a face's wires built from split edges so that downstream
//! face-classification algorithms receive a well-formed boundary: multiple
//! (non-manifold) vertices are split, and on periodic surfaces every wire
//! is translated into a single periodic tile. An irreducible face is
//! reported as failed, never silently emitted.

mod connectivity;
mod periodic;
mod split;

use crate::error::{RegularizeError, TopologyError};
use crate::geometry::surface::Surface;
use crate::math::Point2;
use crate::topology::{
    EdgeId, FaceData, FaceId, FaceSurface, Orientation, OrientedEdge, Pcurve, TopologyStore,
    WireData, WireId,
};

use connectivity::ConnectivityIndex;

/// A face whose wires are each a simple, UV-closed loop.
#[derive(Debug, Clone)]
pub struct RegularizedFace {
    /// The rebuilt face.
    pub face: FaceId,
    /// The rebuilt wires, outer wire first.
    pub wires: Vec<WireId>,
}

/// The states of the regularization state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegularizeState {
    Init,
    MappedConnectivity,
    Splitting,
    PeriodicCorrection,
    Done,
    Failed,
}

/// State machine regularizing one face.
///
/// Runs `Init -> MappedConnectivity -> Splitting -> PeriodicCorrection ->
/// Done`; any hard failure parks the machine in `Failed` and surfaces the
/// offending entity to the caller.
#[derive(Debug)]
pub struct FaceRegularizer {
    face: FaceId,
    state: RegularizeState,
}

impl FaceRegularizer {
    /// Creates a regularizer for `face`.
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self {
            face,
            state: RegularizeState::Init,
        }
    }

    /// The current state of the machine.
    #[must_use]
    pub fn state(&self) -> RegularizeState {
        self.state
    }

    /// Runs the machine to completion.
    ///
    /// # Errors
    ///
    /// [`RegularizeError::NonManifoldVertex`] when a multiple vertex
    /// cannot be resolved, [`RegularizeError::PeriodicOverflow`] when a
    /// wire cannot be confined to one periodic tile.
    pub fn execute(
        &mut self,
        store: &mut TopologyStore,
    ) -> Result<RegularizedFace, RegularizeError> {
        match self.run(store) {
            Ok(face) => {
                self.state = RegularizeState::Done;
                Ok(face)
            }
            Err(error) => {
                self.state = RegularizeState::Failed;
                Err(error)
            }
        }
    }

    fn run(&mut self, store: &mut TopologyStore) -> Result<RegularizedFace, RegularizeError> {
        let face_data = store.face(self.face)?.clone();
        let mut wires = Vec::new();
        for wire_id in face_data.wires() {
            wires.push(store.wire(wire_id)?.edges.clone());
        }
        if wires.iter().all(Vec::is_empty) {
            return Err(TopologyError::InvalidTopology("face has no edges".into()).into());
        }

        self.state = RegularizeState::MappedConnectivity;
        let connectivity = ConnectivityIndex::build(store, &wires)?;

        self.state = RegularizeState::Splitting;
        let chains = split::split_multiple_vertices(
            store,
            self.face,
            &face_data.surface,
            face_data.same_sense,
            &wires,
            &connectivity,
        )?;

        self.state = RegularizeState::PeriodicCorrection;
        periodic::correct_periodic(store, self.face, &face_data.surface, &chains)?;

        self.rebuild(store, &face_data, &chains)
    }

    /// Rebuilds the face from the regularized chains; the chain with the
    /// largest UV box becomes the outer wire.
    fn rebuild(
        &self,
        store: &mut TopologyStore,
        face_data: &FaceData,
        chains: &[Vec<OrientedEdge>],
    ) -> Result<RegularizedFace, RegularizeError> {
        let mut outer = 0;
        let mut outer_area = f64::NEG_INFINITY;
        for (index, chain) in chains.iter().enumerate() {
            let (min, max) = wire_bounds(store, self.face, &face_data.surface, chain)?;
            let area = (max.x - min.x) * (max.y - min.y);
            if area > outer_area {
                outer_area = area;
                outer = index;
            }
        }

        let wire_ids: Vec<WireId> = chains
            .iter()
            .map(|chain| {
                store.add_wire(WireData {
                    edges: chain.clone(),
                    is_closed: true,
                })
            })
            .collect();

        let outer_wire = wire_ids[outer];
        let inner_wires: Vec<WireId> = wire_ids
            .iter()
            .enumerate()
            .filter(|&(index, _)| index != outer)
            .map(|(_, &id)| id)
            .collect();

        let face = store.add_face(FaceData {
            surface: face_data.surface.clone(),
            outer_wire,
            inner_wires: inner_wires.clone(),
            same_sense: face_data.same_sense,
        });

        let mut ordered = Vec::with_capacity(wire_ids.len());
        ordered.push(outer_wire);
        ordered.extend(inner_wires);
        Ok(RegularizedFace {
            face,
            wires: ordered,
        })
    }
}

/// Regularizes a face in place.
///
/// # Errors
///
/// See [`FaceRegularizer::execute`].
pub fn regularize_face(
    store: &mut TopologyStore,
    face: FaceId,
) -> Result<RegularizedFace, RegularizeError> {
    FaceRegularizer::new(face).execute(store)
}

/// The UV image of an edge on a face: the stored pcurve, or a segment
/// derived from the surface inverse of the edge's endpoints.
pub(crate) fn uv_segment(
    store: &TopologyStore,
    face: FaceId,
    surface: &FaceSurface,
    edge_id: EdgeId,
) -> Result<Pcurve, RegularizeError> {
    let edge = store.edge(edge_id)?;
    if let Some(pcurve) = edge.pcurve_on(face) {
        return Ok(*pcurve);
    }
    let geometry = surface.as_surface();
    let start = store.vertex(edge.start)?.point;
    let end = store.vertex(edge.end)?.point;
    let (u1, v1) = geometry.inverse(&start);
    let (u2, v2) = geometry.inverse(&end);
    Ok(Pcurve::new(Point2::new(u1, v1), Point2::new(u2, v2)))
}

/// UV endpoints of a pcurve in traversal order (tail, head).
pub(crate) fn oriented_uv(segment: &Pcurve, orientation: Orientation) -> (Point2, Point2) {
    if orientation.is_reversed() {
        (segment.end, segment.start)
    } else {
        (segment.start, segment.end)
    }
}

/// UV bounding box of a chain of oriented edges.
pub(crate) fn wire_bounds(
    store: &TopologyStore,
    face: FaceId,
    surface: &FaceSurface,
    wire: &[OrientedEdge],
) -> Result<(Point2, Point2), RegularizeError> {
    let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for oriented in wire {
        let segment = uv_segment(store, face, surface, oriented.edge)?;
        for point in [segment.start, segment.end] {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }
    }
    Ok((min, max))
}
