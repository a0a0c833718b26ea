//! Point/curve merge: welds DS points coincident with pre-existing
//! topological vertices and records cross-shape same-domain identities.

use log::debug;

use crate::error::{Result, TopologyError};
use crate::math::Point3;
use crate::topology::{FaceId, TopologyStore, VertexId};

use super::{CurveIndex, DataStructure, Geometry};

/// Index mapping every vertex of a face to its 3D point.
///
/// Built once per face per merge call and scanned linearly: the O(V) cost
/// is intentional, correctness over speed at this stage.
struct VertexIndex {
    entries: Vec<(VertexId, Point3, f64)>,
}

impl VertexIndex {
    fn build(store: &TopologyStore, face: FaceId) -> std::result::Result<Self, TopologyError> {
        let face_data = store.face(face)?;
        let mut entries: Vec<(VertexId, Point3, f64)> = Vec::new();
        for wire_id in face_data.wires() {
            let wire = store.wire(wire_id)?;
            for oriented in &wire.edges {
                let edge = store.edge(oriented.edge)?;
                for vid in [edge.start, edge.end] {
                    if entries.iter().any(|&(v, _, _)| v == vid) {
                        continue;
                    }
                    let vertex = store.vertex(vid)?;
                    entries.push((vid, vertex.point, vertex.tolerance));
                }
            }
        }
        Ok(Self { entries })
    }

    fn find(&self, point: &Point3, tolerance: f64) -> Option<VertexId> {
        for &(vid, p, vtol) in &self.entries {
            if (p - *point).norm() <= tolerance.max(vtol) {
                return Some(vid);
            }
        }
        None
    }
}

/// Identifies DS points coincident with vertices of the two faces and
/// welds them.
///
/// For every kept curve record bridging `face_a`/`face_b`, each point
/// interference on the curve is checked against both faces' vertex
/// indices. A match rewrites the interference's geometry to the vertex and
/// retires the point record; a match on both faces additionally declares
/// the two vertices same-domain. Idempotent: interferences whose geometry
/// is already a vertex are skipped.
///
/// # Errors
///
/// Returns an error if referenced topology cannot be read.
pub fn merge_topology(
    store: &TopologyStore,
    ds: &mut DataStructure,
    face_a: FaceId,
    face_b: FaceId,
) -> Result<()> {
    let index_a = VertexIndex::build(store, face_a)?;
    let index_b = VertexIndex::build(store, face_b)?;

    let bridging: Vec<CurveIndex> = ds
        .curve_indices()
        .filter(|&ci| {
            let record = ds.curve(ci);
            record.keep() && record.bridges(face_a, face_b)
        })
        .collect();

    for curve_index in bridging {
        let attached = ds.curve(curve_index).interferences().to_vec();
        let curve_tolerance = ds.curve(curve_index).tolerance();

        for interference_index in attached {
            let Geometry::Point(point_index) = ds.interference(interference_index).geometry()
            else {
                continue;
            };
            let record = ds.point(point_index);
            if !record.keep() {
                continue;
            }
            let point = *record.point();
            let tolerance = curve_tolerance.max(record.tolerance());

            let found_a = index_a.find(&point, tolerance);
            let found_b = index_b.find(&point, tolerance);
            let Some(vertex) = found_a.or(found_b) else {
                continue;
            };

            debug!(
                "welding point {} to vertex {vertex:?}",
                point_index.index()
            );
            ds.weld_geometry(Geometry::Point(point_index), Geometry::Vertex(vertex));
            ds.point_mut(point_index).retire(None);

            if let (Some(va), Some(vb)) = (found_a, found_b) {
                ds.add_same_domain(va, vb);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ds::{CurveRecord, Interference, PointRecord, ShapeRef, Transition};
    use crate::geometry::curve::Line;
    use crate::geometry::surface::Plane;
    use crate::math::{Vector3, CONFUSION};
    use crate::topology::{
        EdgeCurve, EdgeData, FaceData, FaceSurface, OrientedEdge, VertexData, WireData,
    };

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// A face on the z=0 plane bounded by the closed polyline through `pts`.
    fn polygon_face(store: &mut TopologyStore, pts: &[Point3]) -> FaceId {
        let vids: Vec<_> = pts
            .iter()
            .map(|&pt| store.add_vertex(VertexData::new(pt, CONFUSION)))
            .collect();
        let mut edges = Vec::with_capacity(pts.len());
        for i in 0..pts.len() {
            let j = (i + 1) % pts.len();
            let line = Line::new(pts[i], pts[j] - pts[i]).unwrap();
            let len = (pts[j] - pts[i]).norm();
            let edge = store.add_edge(EdgeData::new(
                vids[i],
                vids[j],
                EdgeCurve::Line(line),
                0.0,
                len,
                CONFUSION,
            ));
            edges.push(OrientedEdge::forward(edge));
        }
        let wire = store.add_wire(WireData {
            edges,
            is_closed: true,
        });
        let plane = Plane::new(Point3::origin(), Vector3::x(), Vector3::y()).unwrap();
        store.add_face(FaceData {
            surface: FaceSurface::Plane(plane),
            outer_wire: wire,
            inner_wires: vec![],
            same_sense: true,
        })
    }

    /// Registers a section curve between the two faces with one point
    /// interference at `point`.
    fn section_with_point(
        ds: &mut DataStructure,
        face_a: FaceId,
        face_b: FaceId,
        point: Point3,
    ) -> crate::ds::PointIndex {
        let line = Line::new(point, Vector3::z()).unwrap();
        let curve = ds.add_curve(CurveRecord::new(
            EdgeCurve::Line(line),
            CONFUSION,
            face_a,
            face_b,
        ));
        let pi = ds.add_point(PointRecord::new(
            point,
            CONFUSION,
            ShapeRef::Face(face_a),
            ShapeRef::Face(face_b),
        ));
        let ii = ds.attach(Interference::new(
            Geometry::Point(pi),
            ShapeRef::Face(face_a),
            ShapeRef::Face(face_b),
            0.0,
            Transition::unknown(),
        ));
        ds.attach_on_curve(curve, ii);
        pi
    }

    #[test]
    fn point_near_face_vertex_becomes_that_vertex() {
        // Scenario: an intersection point within tolerance of an existing
        // vertex of face A is rewritten to that vertex.
        let mut store = TopologyStore::new();
        let face_a = polygon_face(
            &mut store,
            &[p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 2.0, 0.0)],
        );
        let face_b = polygon_face(
            &mut store,
            &[p(5.0, 0.0, 0.0), p(7.0, 0.0, 0.0), p(7.0, 2.0, 0.0)],
        );

        let mut ds = DataStructure::new();
        // Slightly off the (2, 0, 0) corner, inside the 1e-7 tolerance.
        let pi = section_with_point(&mut ds, face_a, face_b, p(2.0 + 5e-8, 0.0, 0.0));

        merge_topology(&store, &mut ds, face_a, face_b).unwrap();

        let interference = ds.interference(ds.interferences_on(ShapeRef::Face(face_a))[0]);
        let Geometry::Vertex(v) = interference.geometry() else {
            panic!("geometry should have been welded to a vertex");
        };
        assert!((store.vertex(v).unwrap().point - p(2.0, 0.0, 0.0)).norm() < 1e-9);
        assert!(interference.is_from_merge());
        assert!(!ds.point(pi).keep());
        assert!(ds.same_domain().is_empty());
    }

    #[test]
    fn match_on_both_faces_declares_same_domain() {
        let mut store = TopologyStore::new();
        // The two faces carry topologically distinct vertices at the same
        // location (2, 0, 0).
        let face_a = polygon_face(
            &mut store,
            &[p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 2.0, 0.0)],
        );
        let face_b = polygon_face(
            &mut store,
            &[p(2.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, -2.0, 0.0)],
        );

        let mut ds = DataStructure::new();
        section_with_point(&mut ds, face_a, face_b, p(2.0, 0.0, 0.0));

        merge_topology(&store, &mut ds, face_a, face_b).unwrap();
        assert_eq!(ds.same_domain().len(), 1);
        let (va, vb) = ds.same_domain()[0];
        assert_ne!(va, vb);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut store = TopologyStore::new();
        let face_a = polygon_face(
            &mut store,
            &[p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 2.0, 0.0)],
        );
        let face_b = polygon_face(
            &mut store,
            &[p(2.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, -2.0, 0.0)],
        );

        let mut ds = DataStructure::new();
        section_with_point(&mut ds, face_a, face_b, p(2.0, 0.0, 0.0));

        merge_topology(&store, &mut ds, face_a, face_b).unwrap();
        let geometry_after_first =
            ds.interference(ds.interferences_on(ShapeRef::Face(face_a))[0]).geometry();
        let pairs_after_first = ds.same_domain().to_vec();

        merge_topology(&store, &mut ds, face_a, face_b).unwrap();
        let geometry_after_second =
            ds.interference(ds.interferences_on(ShapeRef::Face(face_a))[0]).geometry();

        assert_eq!(geometry_after_first, geometry_after_second);
        assert_eq!(ds.same_domain(), pairs_after_first.as_slice());
    }

    #[test]
    fn far_points_are_left_untouched() {
        let mut store = TopologyStore::new();
        let face_a = polygon_face(
            &mut store,
            &[p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 2.0, 0.0)],
        );
        let face_b = polygon_face(
            &mut store,
            &[p(5.0, 0.0, 0.0), p(7.0, 0.0, 0.0), p(7.0, 2.0, 0.0)],
        );

        let mut ds = DataStructure::new();
        let pi = section_with_point(&mut ds, face_a, face_b, p(1.0, 0.7, 0.0));

        merge_topology(&store, &mut ds, face_a, face_b).unwrap();
        let interference = ds.interference(ds.interferences_on(ShapeRef::Face(face_a))[0]);
        assert_eq!(interference.geometry(), Geometry::Point(pi));
        assert!(ds.point(pi).keep());
    }
}
