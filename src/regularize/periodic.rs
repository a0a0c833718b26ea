//! Periodic correction: translates wire pcurves by whole periods so every
//! wire's UV image is connected and confined to one periodic tile.

use log::debug;

use crate::error::RegularizeError;
use crate::geometry::surface::Surface;
use crate::math::{Point2, Vector2, CONFUSION};
use crate::topology::{FaceId, FaceSurface, OrientedEdge, TopologyStore};

use super::{oriented_uv, uv_segment, wire_bounds};

/// Correction passes before a face is reported as failed.
const MAX_PASSES: usize = 4;

/// Corrects all wires of a face on a periodic surface, then validates the
/// one-tile invariant.
pub(crate) fn correct_periodic(
    store: &mut TopologyStore,
    face: FaceId,
    surface: &FaceSurface,
    wires: &[Vec<OrientedEdge>],
) -> Result<(), RegularizeError> {
    let geometry = surface.as_surface();
    let u_period = geometry.u_period();
    let v_period = geometry.v_period();
    if u_period.is_none() && v_period.is_none() {
        return Ok(());
    }
    let domain = geometry.domain();
    let anchor = Point2::new(domain.u_min, domain.v_min);

    for wire in wires {
        correct_wire(store, face, surface, wire, u_period, v_period, &anchor)?;
        validate_wire(store, face, surface, wire, u_period, v_period)?;
    }
    Ok(())
}

/// Repairs seam discontinuities and anchors the wire's UV box in the
/// face's parametric tile. A wire already inside one tile is untouched.
#[allow(clippy::too_many_arguments)]
fn correct_wire(
    store: &mut TopologyStore,
    face: FaceId,
    surface: &FaceSurface,
    wire: &[OrientedEdge],
    u_period: Option<f64>,
    v_period: Option<f64>,
    anchor: &Point2,
) -> Result<(), RegularizeError> {
    if wire.is_empty() {
        return Ok(());
    }

    for _ in 0..MAX_PASSES {
        let mut changed = false;

        // Seam crossings show up as jumps of about one period between
        // consecutive pcurves; translating the downstream edge restores
        // continuity and cascades along the wire.
        let mut previous_head: Option<Point2> = None;
        for oriented in wire {
            let mut segment = uv_segment(store, face, surface, oriented.edge)?;
            let (tail, _) = oriented_uv(&segment, oriented.orientation);
            if let Some(previous) = previous_head {
                let du = seam_shift(tail.x - previous.x, u_period);
                let dv = seam_shift(tail.y - previous.y, v_period);
                if du != 0.0 || dv != 0.0 {
                    debug!(
                        "translating edge {:?} by ({du}, {dv}) across the seam",
                        oriented.edge
                    );
                    segment.translate(&Vector2::new(du, dv));
                    store.edge_mut(oriented.edge)?.set_pcurve(face, segment);
                    changed = true;
                }
            }
            let (_, head) = oriented_uv(&segment, oriented.orientation);
            previous_head = Some(head);
        }

        // Bring the whole wire back to the tile anchored at the face
        // domain minimum.
        let (min, max) = wire_bounds(store, face, surface, wire)?;
        let center = Point2::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
        let du = tile_shift(center.x, anchor.x, u_period);
        let dv = tile_shift(center.y, anchor.y, v_period);
        if du != 0.0 || dv != 0.0 {
            let by = Vector2::new(du, dv);
            for oriented in wire {
                let mut segment = uv_segment(store, face, surface, oriented.edge)?;
                segment.translate(&by);
                store.edge_mut(oriented.edge)?.set_pcurve(face, segment);
            }
            changed = true;
        }

        if !changed {
            break;
        }
    }
    Ok(())
}

/// Checks that the corrected wire is UV-connected and spans at most one
/// period per periodic direction, naming the offending edge otherwise.
fn validate_wire(
    store: &TopologyStore,
    face: FaceId,
    surface: &FaceSurface,
    wire: &[OrientedEdge],
    u_period: Option<f64>,
    v_period: Option<f64>,
) -> Result<(), RegularizeError> {
    let Some(first) = wire.first() else {
        return Ok(());
    };
    let first_segment = uv_segment(store, face, surface, first.edge)?;
    let (wire_start, _) = oriented_uv(&first_segment, first.orientation);

    let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut u_extreme = first.edge;
    let mut v_extreme = first.edge;
    let mut previous_head: Option<Point2> = None;

    for oriented in wire {
        let segment = uv_segment(store, face, surface, oriented.edge)?;
        let (tail, head) = oriented_uv(&segment, oriented.orientation);

        // An edge whose own image exceeds the period can never fit a tile.
        if exceeds(u_period, (segment.end.x - segment.start.x).abs())
            || exceeds(v_period, (segment.end.y - segment.start.y).abs())
        {
            return Err(RegularizeError::PeriodicOverflow {
                face,
                edge: oriented.edge,
            });
        }
        // An unrepaired seam jump marks the edge out of bounds.
        if let Some(previous) = previous_head {
            if jumps(u_period, tail.x - previous.x) || jumps(v_period, tail.y - previous.y) {
                return Err(RegularizeError::PeriodicOverflow {
                    face,
                    edge: oriented.edge,
                });
            }
        }

        for point in [tail, head] {
            if point.x > max.x {
                max.x = point.x;
                u_extreme = oriented.edge;
            }
            min.x = min.x.min(point.x);
            if point.y > max.y {
                max.y = point.y;
                v_extreme = oriented.edge;
            }
            min.y = min.y.min(point.y);
        }
        previous_head = Some(head);
    }

    // A closed wire must come back to its start in UV as well.
    if let Some(last_head) = previous_head {
        if jumps(u_period, wire_start.x - last_head.x)
            || jumps(v_period, wire_start.y - last_head.y)
        {
            return Err(RegularizeError::PeriodicOverflow {
                face,
                edge: first.edge,
            });
        }
    }

    if exceeds(u_period, max.x - min.x) {
        return Err(RegularizeError::PeriodicOverflow {
            face,
            edge: u_extreme,
        });
    }
    if exceeds(v_period, max.y - min.y) {
        return Err(RegularizeError::PeriodicOverflow {
            face,
            edge: v_extreme,
        });
    }
    Ok(())
}

/// Whole-period translation cancelling a seam jump, or zero.
fn seam_shift(gap: f64, period: Option<f64>) -> f64 {
    match period {
        Some(p) if gap.abs() > p / 2.0 => -(gap / p).round() * p,
        _ => 0.0,
    }
}

/// Whole-period translation bringing `center` into `[anchor, anchor + p)`,
/// or zero.
fn tile_shift(center: f64, anchor: f64, period: Option<f64>) -> f64 {
    match period {
        Some(p) => -((center - anchor) / p).floor() * p,
        None => 0.0,
    }
}

fn exceeds(period: Option<f64>, span: f64) -> bool {
    period.is_some_and(|p| span > p + CONFUSION)
}

fn jumps(period: Option<f64>, gap: f64) -> bool {
    period.is_some_and(|p| gap.abs() > p / 2.0 + CONFUSION)
}
