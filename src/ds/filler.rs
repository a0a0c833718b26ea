//! The edges filler: consumes raw pairwise edge/edge intersection samples
//! and inserts interference records into the DS, folding duplicate
//! discoveries of the same physical point.

use log::{debug, warn};

use crate::classify::{is_significant_crossing, material_direction_on};
use crate::error::{Result, TopologyError};
use crate::geometry::surface::Surface;
use crate::math::{Point3, Vector3, ANGULAR_TOLERANCE, TOLERANCE};
use crate::topology::{EdgeData, EdgeId, FaceData, FaceId, Orientation, TopologyStore, VertexId};

use super::{
    DataStructure, Geometry, Interference, MaterialState, PointRecord, ShapeRef, Transition,
};

/// Walk-derived samples carry the accumulated error of the marching
/// intersector; their coincidence tolerance is widened by this factor.
const WALK_TOLERANCE_FACTOR: f64 = 10.0;

/// A pair of edges to intersect, each with its supporting face.
#[derive(Debug, Clone, Copy)]
pub struct EdgePair {
    /// Edge of the first operand.
    pub edge_a: EdgeId,
    /// Face of the first operand supporting `edge_a`.
    pub face_a: FaceId,
    /// Edge of the second operand.
    pub edge_b: EdgeId,
    /// Face of the second operand supporting `edge_b`.
    pub face_b: FaceId,
}

/// A raw intersection sample produced by the external intersector.
#[derive(Debug, Clone, Copy)]
pub struct EdgeIntersection {
    /// Parameter of the sample on the first edge.
    pub t_a: f64,
    /// Parameter of the sample on the second edge.
    pub t_b: f64,
    /// The 3D intersection point.
    pub point: Point3,
    /// `false` when the sample comes from numeric marching rather than an
    /// exact analytic solve.
    pub exact: bool,
}

/// Builds a fresh DS from the raw samples of a shape pair.
///
/// Convenience driver over [`fill`]: every batch is one edge pair with its
/// intersection samples.
///
/// # Errors
///
/// Returns an error if referenced topology cannot be read. Geometric
/// ambiguities never fail the pass; they degrade to Unknown transitions or
/// suppressed samples.
pub fn fill_interferences(
    store: &TopologyStore,
    batches: &[(EdgePair, Vec<EdgeIntersection>)],
) -> Result<DataStructure> {
    let mut ds = DataStructure::new();
    for (pair, samples) in batches {
        fill(store, &mut ds, pair, samples)?;
    }
    Ok(ds)
}

/// Inserts the interference records for one edge pair into the DS.
///
/// For each sample: classify its geometry (reuse a coincident vertex of
/// either edge, or register a new point record), compute the material
/// transition along each edge, fold duplicate discoveries of the same
/// physical point, and store the interference once per supporting edge.
///
/// # Errors
///
/// Returns an error if referenced topology cannot be read.
pub fn fill(
    store: &TopologyStore,
    ds: &mut DataStructure,
    pair: &EdgePair,
    samples: &[EdgeIntersection],
) -> Result<()> {
    let edge_a = store.edge(pair.edge_a)?;
    let edge_b = store.edge(pair.edge_b)?;
    let face_a = store.face(pair.face_a)?;
    let face_b = store.face(pair.face_b)?;
    let orient_a = store.orientation_in_face(pair.edge_a, pair.face_a)?;
    let orient_b = store.orientation_in_face(pair.edge_b, pair.face_b)?;

    let support_a = ShapeRef::Edge(pair.edge_a);
    let support_b = ShapeRef::Edge(pair.edge_b);

    for sample in samples {
        let Some((transition_a, transition_b)) =
            sample_transitions(edge_a, orient_a, face_a, edge_b, orient_b, face_b, sample)
        else {
            debug!("suppressing tangential intersection sample at {:?}", sample.point);
            continue;
        };

        let mut tolerance = edge_a.tolerance.max(edge_b.tolerance);
        if !sample.exact {
            tolerance *= WALK_TOLERANCE_FACTOR;
        }

        let geometry = match coincident_vertex(store, edge_a, edge_b, &sample.point, tolerance)? {
            Some(vertex) => Geometry::Vertex(vertex),
            None => Geometry::Point(ds.add_point(PointRecord::new(
                sample.point,
                tolerance,
                support_a,
                support_b,
            ))),
        };

        // A sample landing on an endpoint is recorded at the endpoint's
        // own parameter, not the raw sample parameter.
        let (t_a, t_b) = match geometry {
            Geometry::Vertex(vertex) => (
                edge_a.vertex_parameter(vertex).unwrap_or(sample.t_a),
                edge_b.vertex_parameter(vertex).unwrap_or(sample.t_b),
            ),
            _ => (sample.t_a, sample.t_b),
        };

        let ptol_a = edge_a.curve.parametric_tolerance(tolerance);
        let ptol_b = edge_b.curve.parametric_tolerance(tolerance);

        let geometry = insert_keyed(
            ds, support_a, support_b, t_a, ptol_a, transition_a, geometry,
        );
        insert_keyed(
            ds, support_b, support_a, t_b, ptol_b, transition_b, geometry,
        );
    }

    Ok(())
}

/// Computes the transitions of a sample along both edges, or `None` when
/// the sample is tangential on both sides and must be suppressed.
#[allow(clippy::too_many_arguments)]
fn sample_transitions(
    edge_a: &EdgeData,
    orient_a: Orientation,
    face_a: &FaceData,
    edge_b: &EdgeData,
    orient_b: Orientation,
    face_b: &FaceData,
    sample: &EdgeIntersection,
) -> Option<(Transition, Transition)> {
    let tangent_a = edge_a.curve.tangent(sample.t_a).ok();
    let tangent_b = edge_b.curve.tangent(sample.t_b).ok();

    let (Some(tangent_a), Some(tangent_b)) = (tangent_a, tangent_b) else {
        // Degenerate tangent: keep the sample, give up on its transitions.
        warn!(
            "indeterminate tangent at intersection sample {:?}",
            sample.point
        );
        return Some((Transition::unknown(), Transition::unknown()));
    };

    let normal_a = face_normal_at(face_a, &sample.point);
    let normal_b = face_normal_at(face_b, &sample.point);

    let significant_a = normal_b.is_some_and(|n| {
        is_significant_crossing(&tangent_a, &tangent_b, &n, ANGULAR_TOLERANCE)
    });
    let significant_b = normal_a.is_some_and(|n| {
        is_significant_crossing(&tangent_b, &tangent_a, &n, ANGULAR_TOLERANCE)
    });

    if !significant_a && !significant_b {
        return None;
    }

    let transition_a = if significant_a {
        edge_transition(&tangent_a, face_b, edge_b, orient_b, sample.t_b)
    } else {
        Transition::unknown()
    };
    let transition_b = if significant_b {
        edge_transition(&tangent_b, face_a, edge_a, orient_a, sample.t_a)
    } else {
        Transition::unknown()
    };

    Some((transition_a, transition_b))
}

/// Transition along a walked edge crossing the other operand's edge.
///
/// The state just before/after the crossing is In when stepping along the
/// walk tangent moves with/against the other operand's material direction.
fn edge_transition(
    walk_tangent: &Vector3,
    other_face: &FaceData,
    other_edge: &EdgeData,
    other_orientation: Orientation,
    t_other: f64,
) -> Transition {
    let Ok(material) = material_direction_on(other_face, other_edge, other_orientation, t_other)
    else {
        warn!("indeterminate material direction at crossing");
        return Transition::unknown();
    };

    let dot = walk_tangent.dot(&material);
    if dot > TOLERANCE {
        Transition::new(MaterialState::Out, MaterialState::In)
    } else if dot < -TOLERANCE {
        Transition::new(MaterialState::In, MaterialState::Out)
    } else {
        debug!("ambiguous transition: walk tangent orthogonal to material direction");
        Transition::unknown()
    }
}

/// Local face normal at a point assumed on the face's surface, adjusted
/// for `same_sense`.
fn face_normal_at(face: &FaceData, point: &Point3) -> Option<Vector3> {
    let surface = face.surface.as_surface();
    let (u, v) = surface.inverse(point);
    let normal = surface.normal(u, v).ok()?;
    Some(if face.same_sense { normal } else { -normal })
}

/// Looks for a vertex of either edge coincident with the sample point.
fn coincident_vertex(
    store: &TopologyStore,
    edge_a: &EdgeData,
    edge_b: &EdgeData,
    point: &Point3,
    tolerance: f64,
) -> std::result::Result<Option<VertexId>, TopologyError> {
    for vid in [edge_a.start, edge_a.end, edge_b.start, edge_b.end] {
        let vertex = store.vertex(vid)?;
        if (vertex.point - *point).norm() <= tolerance.max(vertex.tolerance) {
            return Ok(Some(vid));
        }
    }
    Ok(None)
}

/// Folds the candidate geometry against the interferences already recorded
/// at the same (support, parameter), then inserts the interference unless
/// an identical one exists. Returns the authoritative geometry.
fn insert_keyed(
    ds: &mut DataStructure,
    support: ShapeRef,
    other: ShapeRef,
    parameter: f64,
    parametric_tolerance: f64,
    transition: Transition,
    geometry: Geometry,
) -> Geometry {
    let mut authoritative = geometry;
    let mut already_recorded = false;

    let on_support = ds.interferences_on(support).to_vec();
    for index in on_support {
        if (ds.interference(index).parameter() - parameter).abs() > parametric_tolerance {
            continue;
        }

        let recorded = ds.interference(index).geometry();
        if recorded != authoritative {
            match (recorded, authoritative) {
                (Geometry::Point(old), Geometry::Point(new)) => {
                    // Two independent discoveries of one physical point:
                    // the new index wins, the superseded record is chained
                    // to it through the mother link.
                    debug!(
                        "folding duplicate point discovery {} -> {}",
                        old.index(),
                        new.index()
                    );
                    ds.rewrite_geometry(recorded, authoritative);
                    ds.point_mut(old).retire(Some(new));
                }
                (Geometry::Vertex(vertex), Geometry::Point(new)) => {
                    // Pre-existing topology always wins over a raw point.
                    ds.point_mut(new).retire(None);
                    authoritative = Geometry::Vertex(vertex);
                }
                (Geometry::Point(old), Geometry::Vertex(_)) => {
                    ds.rewrite_geometry(recorded, authoritative);
                    ds.point_mut(old).retire(None);
                }
                (Geometry::Vertex(v1), Geometry::Vertex(v2)) => {
                    // One physical point matching two distinct vertices:
                    // keep the recorded identity, note the coincidence.
                    ds.add_same_domain(v1, v2);
                    authoritative = Geometry::Vertex(v1);
                }
                _ => {
                    warn!(
                        "conflicting geometry kinds at {support:?} parameter {parameter}: \
                         {recorded:?} vs {authoritative:?}"
                    );
                }
            }
        }

        if ds.interference(index).other() == other
            && ds.interference(index).geometry() == authoritative
        {
            already_recorded = true;
        }
    }

    if !already_recorded {
        ds.attach(Interference::new(
            authoritative,
            support,
            other,
            parameter,
            transition,
        ));
    }
    authoritative
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::Line;
    use crate::geometry::surface::Plane;
    use crate::math::CONFUSION;
    use crate::topology::{
        EdgeCurve, FaceSurface, OrientedEdge, VertexData, WireData,
    };

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// A line edge from `a` to `b`, parametrized by arc length from `a`.
    fn segment(store: &mut TopologyStore, a: Point3, b: Point3) -> EdgeId {
        let va = store.add_vertex(VertexData::new(a, CONFUSION));
        let vb = store.add_vertex(VertexData::new(b, CONFUSION));
        let line = Line::new(a, b - a).unwrap();
        let len = (b - a).norm();
        store.add_edge(EdgeData::new(
            va,
            vb,
            EdgeCurve::Line(line),
            0.0,
            len,
            CONFUSION,
        ))
    }

    /// A face on the z=0 plane whose (open) wire holds the given edge.
    fn z_plane_face(store: &mut TopologyStore, edge: EdgeId) -> FaceId {
        let wire = store.add_wire(WireData {
            edges: vec![OrientedEdge::forward(edge)],
            is_closed: false,
        });
        let plane = Plane::new(Point3::origin(), Vector3::x(), Vector3::y()).unwrap();
        store.add_face(FaceData {
            surface: FaceSurface::Plane(plane),
            outer_wire: wire,
            inner_wires: vec![],
            same_sense: true,
        })
    }

    fn crossing_pair(store: &mut TopologyStore) -> EdgePair {
        let edge_a = segment(store, p(-1.0, 0.0, 0.0), p(1.0, 0.0, 0.0));
        let edge_b = segment(store, p(0.0, -1.0, 0.0), p(0.0, 1.0, 0.0));
        let face_a = z_plane_face(store, edge_a);
        let face_b = z_plane_face(store, edge_b);
        EdgePair {
            edge_a,
            face_a,
            edge_b,
            face_b,
        }
    }

    #[test]
    fn no_samples_yield_empty_ds() {
        // Scenario: two coplanar edges that do not intersect.
        let mut store = TopologyStore::new();
        let pair = crossing_pair(&mut store);
        let ds = fill_interferences(&store, &[(pair, vec![])]).unwrap();
        assert_eq!(ds.interference_count(), 0);
        assert_eq!(ds.point_count(), 0);
    }

    #[test]
    fn transversal_crossing_yields_opposite_transitions() {
        // Scenario: edges crossing at a point not coincident with any vertex.
        let mut store = TopologyStore::new();
        let pair = crossing_pair(&mut store);
        let sample = EdgeIntersection {
            t_a: 1.0,
            t_b: 1.0,
            point: p(0.0, 0.0, 0.0),
            exact: true,
        };
        let ds = fill_interferences(&store, &[(pair, vec![sample])]).unwrap();

        assert_eq!(ds.point_count(), 1);
        assert_eq!(ds.kept_points().count(), 1);
        assert_eq!(ds.interference_count(), 2);

        let on_a = ds.interferences_on(ShapeRef::Edge(pair.edge_a));
        let on_b = ds.interferences_on(ShapeRef::Edge(pair.edge_b));
        assert_eq!(on_a.len(), 1);
        assert_eq!(on_b.len(), 1);

        let ia = ds.interference(on_a[0]);
        let ib = ds.interference(on_b[0]);
        assert_eq!(ia.geometry(), ib.geometry());
        assert!(matches!(ia.geometry(), Geometry::Point(_)));
        assert_eq!(
            ia.transition(),
            Transition::new(MaterialState::In, MaterialState::Out)
        );
        assert_eq!(ib.transition(), ia.transition().reversed());
    }

    #[test]
    fn sample_on_existing_vertex_reuses_its_identity() {
        let mut store = TopologyStore::new();
        let edge_a = segment(&mut store, p(-1.0, 0.0, 0.0), p(0.0, 0.0, 0.0));
        let edge_b = segment(&mut store, p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0));
        let face_a = z_plane_face(&mut store, edge_a);
        let face_b = z_plane_face(&mut store, edge_b);
        let shared = store.edge(edge_a).unwrap().end;

        let pair = EdgePair {
            edge_a,
            face_a,
            edge_b,
            face_b,
        };
        let sample = EdgeIntersection {
            t_a: 1.0,
            t_b: 0.0,
            point: p(0.0, 0.0, 0.0),
            exact: true,
        };
        let ds = fill_interferences(&store, &[(pair, vec![sample])]).unwrap();

        assert_eq!(ds.point_count(), 0, "no raw point should be registered");
        for &index in ds.interferences_on(ShapeRef::Edge(edge_a)) {
            assert_eq!(ds.interference(index).geometry(), Geometry::Vertex(shared));
        }
    }

    #[test]
    fn tangential_samples_are_suppressed() {
        let mut store = TopologyStore::new();
        let edge_a = segment(&mut store, p(-1.0, 0.0, 0.0), p(1.0, 0.0, 0.0));
        let edge_b = segment(&mut store, p(-1.0, 0.5, 0.0), p(1.0, 0.5, 0.0));
        let face_a = z_plane_face(&mut store, edge_a);
        let face_b = z_plane_face(&mut store, edge_b);

        let pair = EdgePair {
            edge_a,
            face_a,
            edge_b,
            face_b,
        };
        // A bogus "crossing" between parallel edges.
        let sample = EdgeIntersection {
            t_a: 1.0,
            t_b: 1.0,
            point: p(0.0, 0.25, 0.0),
            exact: false,
        };
        let ds = fill_interferences(&store, &[(pair, vec![sample])]).unwrap();
        assert_eq!(ds.interference_count(), 0);
        assert_eq!(ds.point_count(), 0);
    }

    #[test]
    fn duplicate_discovery_is_folded_to_one_geometry() {
        // Two independent edge pairs discover the same physical point on
        // the shared edge.
        let mut store = TopologyStore::new();
        let edge_a = segment(&mut store, p(-1.0, 0.0, 0.0), p(1.0, 0.0, 0.0));
        let edge_b = segment(&mut store, p(0.0, -1.0, 0.0), p(0.0, 1.0, 0.0));
        let edge_c = segment(&mut store, p(-1.0, -1.0, 0.0), p(1.0, 1.0, 0.0));
        let face_a = z_plane_face(&mut store, edge_a);
        let face_b = z_plane_face(&mut store, edge_b);
        let face_c = z_plane_face(&mut store, edge_c);

        let pair_ab = EdgePair {
            edge_a,
            face_a,
            edge_b,
            face_b,
        };
        let pair_ac = EdgePair {
            edge_a,
            face_a,
            edge_b: edge_c,
            face_b: face_c,
        };
        let origin = p(0.0, 0.0, 0.0);
        let batches = vec![
            (
                pair_ab,
                vec![EdgeIntersection {
                    t_a: 1.0,
                    t_b: 1.0,
                    point: origin,
                    exact: true,
                }],
            ),
            (
                pair_ac,
                vec![EdgeIntersection {
                    t_a: 1.0,
                    t_b: 2.0_f64.sqrt(),
                    point: origin,
                    exact: true,
                }],
            ),
        ];
        let ds = fill_interferences(&store, &batches).unwrap();

        // One authoritative point survives; the superseded record is
        // chained to it.
        assert_eq!(ds.point_count(), 2);
        let kept: Vec<_> = ds.kept_points().map(|(i, _)| i).collect();
        assert_eq!(kept.len(), 1);
        let retired = (0..ds.point_count())
            .map(crate::ds::PointIndex)
            .find(|i| !ds.point(*i).keep())
            .unwrap();
        assert_eq!(ds.point(retired).mother(), Some(kept[0]));

        // Every kept interference at the same support/parameter agrees.
        let on_a = ds.interferences_on(ShapeRef::Edge(edge_a));
        assert_eq!(on_a.len(), 2);
        for &index in on_a {
            assert_eq!(ds.interference(index).geometry(), Geometry::Point(kept[0]));
        }
    }

    #[test]
    fn refilling_the_same_pair_adds_nothing() {
        let mut store = TopologyStore::new();
        let pair = crossing_pair(&mut store);
        let sample = EdgeIntersection {
            t_a: 1.0,
            t_b: 1.0,
            point: p(0.0, 0.0, 0.0),
            exact: true,
        };
        let mut ds = DataStructure::new();
        fill(&store, &mut ds, &pair, &[sample]).unwrap();
        fill(&store, &mut ds, &pair, &[sample]).unwrap();

        assert_eq!(ds.interference_count(), 2);
        assert_eq!(ds.kept_points().count(), 1);
    }
}
