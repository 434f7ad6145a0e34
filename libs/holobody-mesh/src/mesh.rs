//! # Mesh Data Structure
//!
//! Indexed triangle mesh with optional per-vertex normals.

use std::collections::HashMap;

use config::constants::DEGENERATE_AREA_EPSILON;
use glam::DVec3;

/// Indexed triangle surface produced by the extraction pipeline.
///
/// Geometry stays in f64 end to end. The exchange record rounds positions
/// and normals to fixed decimals instead of narrowing them to f32.
///
/// # Example
///
/// ```rust
/// use holobody_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert!(mesh.validate());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    vertices: Vec<DVec3>,
    /// Triangle indices, counter-clockwise seen from outside
    triangles: Vec<[u32; 3]>,
    /// Optional vertex normals, one per vertex
    normals: Option<Vec<DVec3>>,
}

impl Mesh {
    /// An empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty mesh with room for the given counts.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            normals: None,
        }
    }

    /// Creates a mesh from vertex and triangle buffers.
    pub fn from_parts(vertices: Vec<DVec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
            normals: None,
        }
    }

    /// Vertex count.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Triangle count.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Appends a vertex; returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Appends a triangle.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Mutable access to vertex positions. Topology cannot change through it.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [DVec3] {
        &mut self.vertices
    }

    /// Triangle index triples.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Position of vertex `index`.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Indices of triangle `index`.
    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Reverses the winding of the given triangles.
    pub fn flip_triangles(&mut self, indices: &[usize]) {
        for &i in indices {
            self.triangles[i].swap(1, 2);
        }
    }

    /// Sets vertex normals.
    pub fn set_normals(&mut self, normals: Vec<DVec3>) {
        self.normals = Some(normals);
    }

    /// Drops vertex normals, e.g. after positions changed.
    pub fn clear_normals(&mut self) {
        self.normals = None;
    }

    /// Per-vertex normals, if estimated.
    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// Unnormalised face normal: the cross product of two triangle edges.
    ///
    /// Its length is twice the triangle area.
    #[inline]
    pub fn face_cross(&self, index: usize) -> DVec3 {
        let [a, b, c] = self.triangles[index];
        let v0 = self.vertices[a as usize];
        (self.vertices[b as usize] - v0).cross(self.vertices[c as usize] - v0)
    }

    /// Returns true if the triangle has (numerically) zero area.
    #[inline]
    pub fn is_degenerate(&self, index: usize) -> bool {
        self.face_cross(index).length_squared() <= DEGENERATE_AREA_EPSILON
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        (0..self.triangles.len())
            .map(|i| self.face_cross(i).length() * 0.5)
            .sum()
    }

    /// Axis-aligned bounds `(min, max)` of all vertices; zero for an empty
    /// mesh.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some((&first, rest)) = self.vertices.split_first() else {
            return (DVec3::ZERO, DVec3::ZERO);
        };
        rest.iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Structural check: indices in range, no repeated corner, no zero-area
    /// face, and normals (when present) finite and one per vertex.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        for (i, tri) in self.triangles.iter().enumerate() {
            if tri.iter().any(|&v| v >= vertex_count) {
                return false;
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }
            if self.is_degenerate(i) {
                return false;
            }
        }

        match &self.normals {
            Some(normals) => {
                normals.len() == self.vertices.len() && normals.iter().all(|n| n.is_finite())
            }
            None => true,
        }
    }

    /// Counts incident triangles per undirected edge.
    pub fn edge_face_counts(&self) -> HashMap<(u32, u32), u32> {
        let mut counts = HashMap::with_capacity(self.triangles.len() * 3 / 2);
        for tri in &self.triangles {
            for i in 0..3 {
                let (a, b) = (tri[i], tri[(i + 1) % 3]);
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_face_counts().len()
    }

    /// Number of edges with exactly one incident triangle.
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_face_counts().values().filter(|&&n| n == 1).count()
    }

    /// Returns true if every edge is shared by exactly two triangles.
    pub fn is_closed(&self) -> bool {
        !self.triangles.is_empty() && self.edge_face_counts().values().all(|&n| n == 2)
    }

    /// Euler characteristic `V - E + F` over referenced vertices.
    ///
    /// A closed genus-0 surface has characteristic 2.
    pub fn euler_characteristic(&self) -> i64 {
        let mut used = vec![false; self.vertices.len()];
        for tri in &self.triangles {
            for &v in tri {
                used[v as usize] = true;
            }
        }
        let v = used.iter().filter(|&&u| u).count() as i64;
        v - self.edge_count() as i64 + self.triangles.len() as i64
    }

    /// Groups triangles into vertex-connected components.
    ///
    /// Components are ordered by their lowest triangle index, and triangle
    /// indices inside a component are ascending.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let mut parent: Vec<u32> = (0..self.vertices.len() as u32).collect();

        fn find(parent: &mut [u32], mut v: u32) -> u32 {
            while parent[v as usize] != v {
                let grand = parent[parent[v as usize] as usize];
                parent[v as usize] = grand;
                v = grand;
            }
            v
        }

        for tri in &self.triangles {
            let root = find(&mut parent, tri[0]);
            for &v in &tri[1..] {
                let other = find(&mut parent, v);
                if other != root {
                    parent[other as usize] = root;
                }
            }
        }

        let mut slot_of_root: HashMap<u32, usize> = HashMap::new();
        let mut components: Vec<Vec<usize>> = Vec::new();
        for (i, tri) in self.triangles.iter().enumerate() {
            let root = find(&mut parent, tri[0]);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(i);
        }
        components
    }

    /// Number of vertex-connected triangle components.
    pub fn component_count(&self) -> usize {
        self.connected_components().len()
    }

    /// Sorted, deduplicated neighbour lists for every vertex.
    pub fn vertex_neighbors(&self) -> Vec<Vec<u32>> {
        let mut neighbors = vec![Vec::new(); self.vertices.len()];
        for tri in &self.triangles {
            for i in 0..3 {
                let (a, b) = (tri[i], tri[(i + 1) % 3]);
                neighbors[a as usize].push(b);
                neighbors[b as usize].push(a);
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        neighbors
    }

    /// Removes vertices that no triangle references, keeping vertex order.
    ///
    /// Normals are dropped if present.
    pub fn remove_unreferenced_vertices(&mut self) {
        let mut remap = vec![u32::MAX; self.vertices.len()];
        for tri in &self.triangles {
            for &v in tri {
                remap[v as usize] = 0;
            }
        }
        let mut kept = Vec::with_capacity(self.vertices.len());
        for (i, slot) in remap.iter_mut().enumerate() {
            if *slot == 0 {
                *slot = kept.len() as u32;
                kept.push(self.vertices[i]);
            }
        }
        for tri in &mut self.triangles {
            for v in tri.iter_mut() {
                *v = remap[*v as usize];
            }
        }
        self.vertices = kept;
        self.normals = None;
    }

    /// Triangle indices flattened to `[a, b, c, ...]`.
    pub fn indices_u32(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }
}
