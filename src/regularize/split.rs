//! Splitting of multiple (non-manifold) vertices.
//!
//! A vertex visited by more than two wire edges is a pinch point created
//! when independently-computed intersection curves cross at one point.
//! Each (incoming, outgoing) incidence pair receives its own vertex copy,
//! restoring manifoldness, and the wires are re-chained from the repaired
//! incidences.

use log::debug;

use crate::classify::matter_angle;
use crate::error::RegularizeError;
use crate::geometry::surface::Surface;
use crate::math::Vector3;
use crate::topology::{FaceId, FaceSurface, OrientedEdge, TopologyStore, VertexData, VertexId};

use super::connectivity::{ConnectivityIndex, Incidence, Role};

/// Splits every multiple vertex of the wires and re-chains them into
/// simple loops.
pub(crate) fn split_multiple_vertices(
    store: &mut TopologyStore,
    face: FaceId,
    surface: &FaceSurface,
    same_sense: bool,
    wires: &[Vec<OrientedEdge>],
    connectivity: &ConnectivityIndex,
) -> Result<Vec<Vec<OrientedEdge>>, RegularizeError> {
    for vertex in connectivity.multiple_vertices() {
        split_vertex(
            store,
            face,
            surface,
            same_sense,
            vertex,
            connectivity.incidences(vertex),
        )?;
    }
    rechain(store, face, wires)
}

/// Splits one multiple vertex: pairs each incoming incidence with the
/// outgoing incidence of smallest matter angle (the locally tightest
/// loop), assigning every pair a fresh vertex copy.
fn split_vertex(
    store: &mut TopologyStore,
    face: FaceId,
    surface: &FaceSurface,
    same_sense: bool,
    vertex: VertexId,
    incidences: &[Incidence],
) -> Result<(), RegularizeError> {
    let nonmanifold = || RegularizeError::NonManifoldVertex { face, vertex };

    let (point, tolerance) = {
        let data = store.vertex(vertex)?;
        (data.point, data.tolerance)
    };
    let geometry = surface.as_surface();
    let (u, v) = geometry.inverse(&point);
    let mut normal = match geometry.normal(u, v) {
        Ok(n) => n,
        Err(_) => return Err(nonmanifold()),
    };
    if !same_sense {
        normal = -normal;
    }

    let incoming: Vec<Incidence> = incidences
        .iter()
        .copied()
        .filter(|i| i.role == Role::Incoming)
        .collect();
    let outgoing: Vec<Incidence> = incidences
        .iter()
        .copied()
        .filter(|i| i.role == Role::Outgoing)
        .collect();
    if incoming.len() != outgoing.len() {
        return Err(nonmanifold());
    }

    let mut in_dirs = Vec::with_capacity(incoming.len());
    for incidence in &incoming {
        in_dirs.push(traversal_tangent(store, incidence, face, vertex)?);
    }
    let mut out_dirs = Vec::with_capacity(outgoing.len());
    for incidence in &outgoing {
        out_dirs.push(traversal_tangent(store, incidence, face, vertex)?);
    }

    let mut taken = vec![false; outgoing.len()];
    for (incidence, walk) in incoming.iter().zip(&in_dirs) {
        let mut best: Option<(usize, f64)> = None;
        for (candidate, leave) in out_dirs.iter().enumerate() {
            if taken[candidate] {
                continue;
            }
            // Smallest angle from the leaving direction back to the
            // reversed walking direction: the tightest wedge.
            let angle = matter_angle(leave, walk, &normal);
            if best.is_none_or(|(_, a)| angle < a) {
                best = Some((candidate, angle));
            }
        }
        let Some((candidate, _)) = best else {
            return Err(nonmanifold());
        };
        taken[candidate] = true;

        let copy = store.add_vertex(VertexData::new(point, tolerance));
        debug!("splitting multiple vertex {vertex:?}, new copy {copy:?}");
        reattach_head(store, incidence, copy)?;
        reattach_tail(store, &outgoing[candidate], copy)?;
    }

    Ok(())
}

/// Unit tangent of the incidence's edge at the vertex, in walking
/// direction.
fn traversal_tangent(
    store: &TopologyStore,
    incidence: &Incidence,
    face: FaceId,
    vertex: VertexId,
) -> Result<Vector3, RegularizeError> {
    let edge = store.edge(incidence.edge)?;
    let t = match (incidence.role, incidence.orientation.is_reversed()) {
        (Role::Incoming, false) | (Role::Outgoing, true) => edge.t_end,
        (Role::Incoming, true) | (Role::Outgoing, false) => edge.t_start,
    };
    let mut tangent = edge
        .curve
        .tangent(t)
        .map_err(|_| RegularizeError::NonManifoldVertex { face, vertex })?;
    if incidence.orientation.is_reversed() {
        tangent = -tangent;
    }
    Ok(tangent)
}

/// Rewrites the traversal head of an incoming incidence to `copy`.
fn reattach_head(
    store: &mut TopologyStore,
    incidence: &Incidence,
    copy: VertexId,
) -> Result<(), RegularizeError> {
    let edge = store.edge_mut(incidence.edge)?;
    if incidence.orientation.is_reversed() {
        edge.start = copy;
    } else {
        edge.end = copy;
    }
    Ok(())
}

/// Rewrites the traversal tail of an outgoing incidence to `copy`.
fn reattach_tail(
    store: &mut TopologyStore,
    incidence: &Incidence,
    copy: VertexId,
) -> Result<(), RegularizeError> {
    let edge = store.edge_mut(incidence.edge)?;
    if incidence.orientation.is_reversed() {
        edge.end = copy;
    } else {
        edge.start = copy;
    }
    Ok(())
}

/// Re-chains the (possibly repaired) edge occurrences into closed loops,
/// seeded in stable traversal order.
fn rechain(
    store: &TopologyStore,
    face: FaceId,
    wires: &[Vec<OrientedEdge>],
) -> Result<Vec<Vec<OrientedEdge>>, RegularizeError> {
    struct Occurrence {
        oriented: OrientedEdge,
        tail: VertexId,
        head: VertexId,
    }

    let mut occurrences = Vec::new();
    for wire in wires {
        for oriented in wire {
            let (tail, head) = store.oriented_vertices(oriented)?;
            occurrences.push(Occurrence {
                oriented: *oriented,
                tail,
                head,
            });
        }
    }

    let mut used = vec![false; occurrences.len()];
    let mut chains = Vec::new();
    for seed in 0..occurrences.len() {
        if used[seed] {
            continue;
        }
        used[seed] = true;
        let start = occurrences[seed].tail;
        let mut chain = vec![occurrences[seed].oriented];
        let mut head = occurrences[seed].head;
        while head != start {
            let next = (0..occurrences.len())
                .find(|&k| !used[k] && occurrences[k].tail == head)
                .ok_or(RegularizeError::NonManifoldVertex { face, vertex: head })?;
            used[next] = true;
            chain.push(occurrences[next].oriented);
            head = occurrences[next].head;
        }
        chains.push(chain);
    }
    Ok(chains)
}
