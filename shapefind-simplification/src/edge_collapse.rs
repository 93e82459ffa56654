//! Edge collapse simplification
//!
//! Reduces a mesh to a face budget by repeatedly collapsing its shortest
//! edge. Collapsing `(a, b)` moves `a` to the edge midpoint, rewrites every
//! face of `b` to use `a`, and drops the faces that end up with a repeated
//! corner. The surviving vertices are compacted and reindexed at the end.

use crate::MeshSimplifier;
use priority_queue::PriorityQueue;
use std::cmp::Ordering;
use std::collections::HashMap;
use shapefind_core::{Error, Face, Mesh, Point3d, Result};
use tracing::{debug, info};

type EdgeKey = (usize, usize);

#[inline]
fn edge_key(a: usize, b: usize) -> EdgeKey {
    (a.min(b), a.max(b))
}

// ============================================================
// Collapse cost for priority queue
// ============================================================

#[derive(Debug, Clone, Copy)]
struct CollapseCost(f64);

impl PartialEq for CollapseCost {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}
impl Eq for CollapseCost {}

impl PartialOrd for CollapseCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CollapseCost {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: shortest edge first
        other.0.total_cmp(&self.0)
    }
}

// ============================================================
// Working mesh
// ============================================================

/// Triangle soup with vertex→face incidence, mutated in place by collapses.
struct CollapseMesh {
    positions: Vec<Point3d>,
    /// `None` once a face has been removed
    faces: Vec<Option<[usize; 3]>>,
    /// Faces that referenced each vertex at some point; filtered on use
    vertex_faces: Vec<Vec<usize>>,
    vertex_removed: Vec<bool>,
    active_face_count: usize,
}

impl CollapseMesh {
    fn from_mesh(mesh: &Mesh) -> Self {
        let nv = mesh.vertices.len();
        let triangles: Vec<[usize; 3]> = mesh.faces.iter().flat_map(Face::fan_triangles).collect();

        let mut vertex_faces = vec![Vec::new(); nv];
        for (fi, tri) in triangles.iter().enumerate() {
            for &v in tri {
                vertex_faces[v].push(fi);
            }
        }

        let mut faces: Vec<Option<[usize; 3]>> = triangles.into_iter().map(Some).collect();
        let mut active_face_count = faces.len();
        // Faces that are already degenerate by index never take part
        for face in faces.iter_mut() {
            if let Some([a, b, c]) = *face {
                if a == b || b == c || a == c {
                    *face = None;
                    active_face_count -= 1;
                }
            }
        }

        Self {
            positions: mesh.vertices.clone(),
            faces,
            vertex_faces,
            vertex_removed: vec![false; nv],
            active_face_count,
        }
    }

    fn live_faces_of(&self, v: usize) -> impl Iterator<Item = (usize, [usize; 3])> + '_ {
        self.vertex_faces[v].iter().filter_map(move |&fi| match self.faces[fi] {
            Some(tri) if tri.contains(&v) => Some((fi, tri)),
            _ => None,
        })
    }

    /// Neighbours of `v` with the number of live faces each shared edge belongs to
    fn edge_valences(&self, v: usize) -> HashMap<usize, usize> {
        let mut valence = HashMap::new();
        for (_, tri) in self.live_faces_of(v) {
            for &n in tri.iter().filter(|&&n| n != v) {
                *valence.entry(n).or_insert(0) += 1;
            }
        }
        valence
    }

    fn neighbors(&self, v: usize) -> Vec<usize> {
        self.edge_valences(v).into_keys().collect()
    }

    fn is_boundary_vertex(&self, v: usize) -> bool {
        self.edge_valences(v).values().any(|&count| count == 1)
    }

    fn edge_cost(&self, a: usize, b: usize) -> CollapseCost {
        CollapseCost((self.positions[a] - self.positions[b]).norm_squared())
    }

    /// Merge `b` into `a` at the edge midpoint. Returns the number of faces removed.
    fn collapse_edge(&mut self, a: usize, b: usize) -> usize {
        let midpoint = Point3d::from((self.positions[a].coords + self.positions[b].coords) * 0.5);
        self.positions[a] = midpoint;

        let mut removed = 0;
        for fi in std::mem::take(&mut self.vertex_faces[b]) {
            let Some(mut tri) = self.faces[fi] else {
                continue;
            };
            if !tri.contains(&b) {
                continue;
            }
            if tri.contains(&a) {
                self.faces[fi] = None;
                self.active_face_count -= 1;
                removed += 1;
            } else {
                for corner in tri.iter_mut() {
                    if *corner == b {
                        *corner = a;
                    }
                }
                self.faces[fi] = Some(tri);
                self.vertex_faces[a].push(fi);
            }
        }

        self.vertex_removed[b] = true;
        removed
    }

    /// Rebuild a compact mesh from the surviving faces, dropping unused vertices.
    fn to_mesh(&self) -> Mesh {
        let mut old_to_new = vec![usize::MAX; self.positions.len()];
        let mut vertices = Vec::new();
        let live: Vec<[usize; 3]> = self.faces.iter().flatten().copied().collect();

        let mut referenced = vec![false; self.positions.len()];
        for tri in &live {
            for &v in tri {
                referenced[v] = true;
            }
        }
        for (v, &used) in referenced.iter().enumerate() {
            if used {
                old_to_new[v] = vertices.len();
                vertices.push(self.positions[v]);
            }
        }

        let faces = live
            .iter()
            .map(|tri| Face::from([old_to_new[tri[0]], old_to_new[tri[1]], old_to_new[tri[2]]]))
            .collect();
        Mesh::from_vertices_and_faces(vertices, faces)
    }
}

// ============================================================
// Edge Collapse Simplifier
// ============================================================

/// Shortest-edge-first collapse simplifier with vertex remapping.
///
/// Polygons are fan-triangulated before simplification, so the output is
/// always a triangle mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeCollapseSimplifier {
    /// Never move or merge vertices that lie on an open boundary
    pub preserve_boundary: bool,
}

impl Default for EdgeCollapseSimplifier {
    fn default() -> Self {
        Self {
            preserve_boundary: true,
        }
    }
}

impl EdgeCollapseSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(preserve_boundary: bool) -> Self {
        Self { preserve_boundary }
    }

    fn build_queue(&self, cm: &CollapseMesh) -> PriorityQueue<EdgeKey, CollapseCost> {
        let mut queue = PriorityQueue::new();
        for tri in cm.faces.iter().flatten() {
            for j in 0..3 {
                let (a, b) = (tri[j], tri[(j + 1) % 3]);
                queue.push(edge_key(a, b), cm.edge_cost(a, b));
            }
        }
        queue
    }

    /// Reduce `mesh` until it has at most `target_faces` triangles, or no
    /// collapsible edge is left.
    pub fn simplify_to(&self, mesh: &Mesh, target_faces: usize) -> Result<Mesh> {
        mesh.validate()?;

        let mut cm = CollapseMesh::from_mesh(mesh);
        let initial_faces = cm.active_face_count;
        let mut queue = self.build_queue(&cm);
        let mut collapse_count = 0usize;

        while cm.active_face_count > target_faces {
            let Some(((a, b), _)) = queue.pop() else {
                break;
            };
            if cm.vertex_removed[a] || cm.vertex_removed[b] {
                continue;
            }
            if self.preserve_boundary && (cm.is_boundary_vertex(a) || cm.is_boundary_vertex(b)) {
                continue;
            }

            let mut touched = cm.neighbors(a);
            touched.extend(cm.neighbors(b));

            cm.collapse_edge(a, b);
            collapse_count += 1;

            // Drop every edge that ended at a or b, then requeue the edges
            // that still carry a live face around the merged vertex.
            for &n in &touched {
                queue.remove(&edge_key(a, n));
                queue.remove(&edge_key(b, n));
            }
            for n in cm.neighbors(a) {
                queue.push(edge_key(a, n), cm.edge_cost(a, n));
            }
        }

        let result = cm.to_mesh();
        info!(
            initial_faces,
            final_faces = result.face_count(),
            target_faces,
            collapses = collapse_count,
            "edge collapse simplification finished"
        );
        if result.face_count() > target_faces {
            debug!(
                remaining = result.face_count(),
                target_faces,
                "face budget not reached, no collapsible edges left"
            );
        }
        Ok(result)
    }
}

impl MeshSimplifier for EdgeCollapseSimplifier {
    fn simplify(&self, mesh: &Mesh, reduction_ratio: f64) -> Result<Mesh> {
        if !(0.0..=1.0).contains(&reduction_ratio) {
            return Err(Error::InvalidData(
                "Reduction ratio must be between 0.0 and 1.0".to_string(),
            ));
        }
        mesh.validate()?;
        let triangles: usize = mesh.faces.iter().map(|f| f.fan_triangles().count()).sum();
        let target_faces = ((1.0 - reduction_ratio) * triangles as f64) as usize;
        self.simplify_to(mesh, target_faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn make_single_triangle() -> Mesh {
        Mesh::from_triangles(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.5, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    fn make_tetrahedron() -> Mesh {
        Mesh::from_triangles(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.5, 1.0, 0.0),
                Point3d::new(0.5, 0.5, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
    }

    fn make_plane_grid(size: usize) -> Mesh {
        let mut vertices = Vec::new();
        for y in 0..size {
            for x in 0..size {
                vertices.push(Point3d::new(x as f64, y as f64, 0.0));
            }
        }
        let mut faces = Vec::new();
        for y in 0..(size - 1) {
            for x in 0..(size - 1) {
                let tl = y * size + x;
                let tr = tl + 1;
                let bl = (y + 1) * size + x;
                let br = bl + 1;
                faces.push([tl, bl, tr]);
                faces.push([tr, bl, br]);
            }
        }
        Mesh::from_triangles(vertices, faces)
    }

    fn assert_compact(mesh: &Mesh) {
        let mut used = HashSet::new();
        for face in &mesh.faces {
            assert_eq!(face.len(), 3);
            for &v in face.indices() {
                assert!(v < mesh.vertex_count(), "index {} out of range", v);
                used.insert(v);
            }
            let idx = face.indices();
            assert!(idx[0] != idx[1] && idx[1] != idx[2] && idx[0] != idx[2]);
        }
        assert_eq!(used.len(), mesh.vertex_count(), "mesh has unreferenced vertices");
    }

    // ---- Working mesh tests ----

    #[test]
    fn test_collapse_mesh_boundary() {
        let cm = CollapseMesh::from_mesh(&make_single_triangle());
        assert!(cm.is_boundary_vertex(0));
        assert!(cm.is_boundary_vertex(1));
        assert!(cm.is_boundary_vertex(2));

        let closed = CollapseMesh::from_mesh(&make_tetrahedron());
        for v in 0..4 {
            assert!(!closed.is_boundary_vertex(v));
            assert_eq!(closed.neighbors(v).len(), 3);
        }
    }

    #[test]
    fn test_collapse_edge_removes_shared_faces() {
        let mut cm = CollapseMesh::from_mesh(&make_tetrahedron());
        let removed = cm.collapse_edge(0, 1);
        assert_eq!(removed, 2);
        assert_eq!(cm.active_face_count, 2);
        assert!(cm.vertex_removed[1]);
        assert!(cm.faces.iter().flatten().all(|tri| !tri.contains(&1)));
        assert_eq!(cm.positions[0], Point3d::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_index_degenerate_faces_dropped() {
        let mut mesh = make_single_triangle();
        mesh.add_face([0, 0, 1]);
        let cm = CollapseMesh::from_mesh(&mesh);
        assert_eq!(cm.active_face_count, 1);
    }

    // ---- Simplification tests ----

    #[test]
    fn test_creation() {
        assert!(EdgeCollapseSimplifier::new().preserve_boundary);
        assert!(!EdgeCollapseSimplifier::with_params(false).preserve_boundary);
    }

    #[test]
    fn test_empty_mesh() {
        let s = EdgeCollapseSimplifier::new();
        assert!(matches!(s.simplify(&Mesh::new(), 0.5), Err(Error::MalformedMesh(_))));
    }

    #[test]
    fn test_invalid_reduction_ratio() {
        let s = EdgeCollapseSimplifier::new();
        let mesh = make_single_triangle();
        assert!(s.simplify(&mesh, -0.1).is_err());
        assert!(s.simplify(&mesh, 1.1).is_err());
    }

    #[test]
    fn test_zero_reduction() {
        let s = EdgeCollapseSimplifier::new();
        let result = s.simplify(&make_single_triangle(), 0.0).unwrap();
        assert_eq!(result.vertex_count(), 3);
        assert_eq!(result.face_count(), 1);
    }

    #[test]
    fn test_boundary_only_mesh_is_left_alone() {
        let s = EdgeCollapseSimplifier::new();
        let result = s.simplify_to(&make_single_triangle(), 0).unwrap();
        assert_eq!(result.face_count(), 1);
    }

    #[test]
    fn test_tetrahedron_to_zero() {
        let s = EdgeCollapseSimplifier::with_params(false);
        let result = s.simplify_to(&make_tetrahedron(), 0).unwrap();
        assert_eq!(result.face_count(), 0);
        assert_eq!(result.vertex_count(), 0);
    }

    #[test]
    fn test_grid_reaches_target() {
        let s = EdgeCollapseSimplifier::with_params(false);
        let mesh = make_plane_grid(6);
        assert_eq!(mesh.face_count(), 50);

        let result = s.simplify_to(&mesh, 20).unwrap();
        assert!(result.face_count() <= 20);
        assert!(result.face_count() > 0);
        assert!(result.vertex_count() < mesh.vertex_count());
        assert_compact(&result);
    }

    #[test]
    fn test_boundary_preservation() {
        let s = EdgeCollapseSimplifier::new();
        let size = 6;
        let mesh = make_plane_grid(size);
        let result = s.simplify(&mesh, 0.5).unwrap();
        assert!(result.face_count() < mesh.face_count());
        assert_compact(&result);

        let positions: Vec<Point3d> = result.vertices.clone();
        for y in 0..size {
            for x in 0..size {
                if x == 0 || y == 0 || x == size - 1 || y == size - 1 {
                    let p = mesh.vertices[y * size + x];
                    assert!(positions.contains(&p), "boundary vertex {:?} was moved", p);
                }
            }
        }
    }

    #[test]
    fn test_polygons_are_triangulated() {
        let mesh = Mesh::from_vertices_and_faces(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(1.0, 1.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
            ],
            vec![Face::new(vec![0, 1, 2, 3])],
        );
        let result = EdgeCollapseSimplifier::new().simplify_to(&mesh, 10).unwrap();
        assert_eq!(result.face_count(), 2);
        assert_compact(&result);
    }

    #[test]
    fn test_unused_vertices_are_dropped() {
        let mut mesh = make_tetrahedron();
        mesh.add_vertex(Point3d::new(9.0, 9.0, 9.0));
        let result = EdgeCollapseSimplifier::new().simplify_to(&mesh, 10).unwrap();
        assert_eq!(result.vertex_count(), 4);
        assert_compact(&result);
    }

    #[test]
    fn test_malformed_face_rejected() {
        let mut mesh = make_tetrahedron();
        mesh.add_face([0, 1, 17]);
        let result = EdgeCollapseSimplifier::new().simplify_to(&mesh, 1);
        assert!(matches!(result, Err(Error::MalformedMesh(_))));
    }
}
