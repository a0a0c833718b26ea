//! The interference data structure (DS): the shared table set holding all
//! interference, curve and point records for one Boolean pass.
//!
//! Geometry records live in arenas indexed by plain integers; interferences
//! and records hold indices, never references, so merges and same-domain
//! welding are index rewrites. Tables grow monotonically during a pass —
//! nothing is physically deleted, records are retired (`keep = false`) —
//! and the whole structure is discarded when the operation completes.

mod filler;
mod interference;
mod merge;
mod record;
mod transition;

pub use filler::{fill, fill_interferences, EdgeIntersection, EdgePair};
pub use interference::{Geometry, Interference, ShapeRef};
pub use merge::merge_topology;
pub use record::{CurveRecord, PointRecord};
pub use transition::{MaterialState, Transition};

use std::collections::HashMap;

use crate::topology::VertexId;

/// Index of a point record in the DS point table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointIndex(pub(crate) usize);

impl PointIndex {
    /// The raw table index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a curve record in the DS curve table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurveIndex(pub(crate) usize);

impl CurveIndex {
    /// The raw table index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of an interference in the DS interference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterferenceIndex(pub(crate) usize);

impl InterferenceIndex {
    /// The raw table index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// The shared interference data structure for one Boolean operation.
#[derive(Debug, Default)]
pub struct DataStructure {
    points: Vec<PointRecord>,
    curves: Vec<CurveRecord>,
    interferences: Vec<Interference>,
    attached: HashMap<ShapeRef, Vec<InterferenceIndex>>,
    same_domain: Vec<(VertexId, VertexId)>,
}

impl DataStructure {
    /// Creates a new, empty data structure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Point table ---

    /// Registers a point record and returns its index.
    pub fn add_point(&mut self, record: PointRecord) -> PointIndex {
        self.points.push(record);
        PointIndex(self.points.len() - 1)
    }

    /// Returns the point record at `index`.
    #[must_use]
    pub fn point(&self, index: PointIndex) -> &PointRecord {
        &self.points[index.0]
    }

    pub(crate) fn point_mut(&mut self, index: PointIndex) -> &mut PointRecord {
        &mut self.points[index.0]
    }

    /// Iterates over all kept point records.
    pub fn kept_points(&self) -> impl Iterator<Item = (PointIndex, &PointRecord)> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, r)| r.keep())
            .map(|(i, r)| (PointIndex(i), r))
    }

    /// Number of point records, kept or retired.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    // --- Curve table ---

    /// Registers a curve record and returns its index.
    pub fn add_curve(&mut self, record: CurveRecord) -> CurveIndex {
        self.curves.push(record);
        CurveIndex(self.curves.len() - 1)
    }

    /// Returns the curve record at `index`.
    #[must_use]
    pub fn curve(&self, index: CurveIndex) -> &CurveRecord {
        &self.curves[index.0]
    }

    pub(crate) fn curve_mut(&mut self, index: CurveIndex) -> &mut CurveRecord {
        &mut self.curves[index.0]
    }

    /// Iterates over all curve indices in registration order.
    pub fn curve_indices(&self) -> impl Iterator<Item = CurveIndex> {
        (0..self.curves.len()).map(CurveIndex)
    }

    /// Iterates over all kept curve records.
    pub fn kept_curves(&self) -> impl Iterator<Item = (CurveIndex, &CurveRecord)> {
        self.curves
            .iter()
            .enumerate()
            .filter(|(_, r)| r.keep())
            .map(|(i, r)| (CurveIndex(i), r))
    }

    // --- Interferences ---

    /// Appends an interference and registers it under its support shape.
    pub fn attach(&mut self, interference: Interference) -> InterferenceIndex {
        let index = InterferenceIndex(self.interferences.len());
        self.attached
            .entry(interference.support())
            .or_default()
            .push(index);
        self.interferences.push(interference);
        index
    }

    /// Additionally registers an interference as lying on a section curve.
    pub fn attach_on_curve(&mut self, curve: CurveIndex, interference: InterferenceIndex) {
        self.curves[curve.0].push_interference(interference);
    }

    /// Returns the interference at `index`.
    #[must_use]
    pub fn interference(&self, index: InterferenceIndex) -> &Interference {
        &self.interferences[index.0]
    }

    pub(crate) fn interference_mut(&mut self, index: InterferenceIndex) -> &mut Interference {
        &mut self.interferences[index.0]
    }

    /// Returns the interferences recorded on a shape, in insertion order.
    #[must_use]
    pub fn interferences_on(&self, shape: ShapeRef) -> &[InterferenceIndex] {
        self.attached.get(&shape).map_or(&[], Vec::as_slice)
    }

    /// Total number of interferences in the table.
    #[must_use]
    pub fn interference_count(&self) -> usize {
        self.interferences.len()
    }

    /// Rewrites every interference referring to `from` so that it refers
    /// to `to`. Returns the number of rewritten records.
    pub(crate) fn rewrite_geometry(&mut self, from: Geometry, to: Geometry) -> usize {
        let mut rewritten = 0;
        for interference in &mut self.interferences {
            if interference.geometry() == from {
                interference.set_geometry(to);
                rewritten += 1;
            }
        }
        rewritten
    }

    /// Like [`Self::rewrite_geometry`], additionally marking the rewritten
    /// interferences as merge-derived.
    pub(crate) fn weld_geometry(&mut self, from: Geometry, to: Geometry) -> usize {
        let mut rewritten = 0;
        for interference in &mut self.interferences {
            if interference.geometry() == from {
                interference.set_geometry(to);
                interference.mark_from_merge();
                rewritten += 1;
            }
        }
        rewritten
    }

    // --- Same-domain pairs ---

    /// Declares two topologically distinct vertices geometrically
    /// coincident. Duplicate declarations (in either order) are ignored.
    pub fn add_same_domain(&mut self, a: VertexId, b: VertexId) {
        if a == b {
            return;
        }
        let seen = self
            .same_domain
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a));
        if !seen {
            self.same_domain.push((a, b));
        }
    }

    /// The same-domain vertex pairs discovered so far.
    #[must_use]
    pub fn same_domain(&self) -> &[(VertexId, VertexId)] {
        &self.same_domain
    }
}
