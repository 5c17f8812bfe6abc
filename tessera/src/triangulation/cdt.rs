use std::collections::VecDeque;

use robust::Coord;
use tessera_types::{Coordinate, Point, Triangle, TriangulatedSurface};

use super::plane::Plane;
use crate::error::TesseraError;

/// Index of the vertex at infinity. Every face that has it is an infinite face.
const INFINITE: usize = 0;

/// Marker for vertices that are not part of any face yet.
const NO_FACE: usize = usize::MAX;

/// Nesting level of faces that were not reached by [`ConstraintDelaunayTriangulation::mark_domains`].
const UNMARKED: i32 = -1;

fn ccw(i: usize) -> usize {
    (i + 1) % 3
}

fn cw(i: usize) -> usize {
    (i + 2) % 3
}

fn strictly_opposite(a: f64, b: f64) -> bool {
    (a > 0.0 && b < 0.0) || (a < 0.0 && b > 0.0)
}

/// Identifier of a vertex in a [`ConstraintDelaunayTriangulation`].
///
/// Handles stay valid until [`ConstraintDelaunayTriangulation::clear`] is called.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexHandle(usize);

impl VertexHandle {
    /// Sequential number of the vertex, starting from 0 in insertion order.
    pub fn index(&self) -> usize {
        self.0 - 1
    }
}

#[derive(Debug, Clone)]
struct Vertex {
    position: [f64; 2],
    original: Coordinate,
    face: usize,
}

#[derive(Debug, Clone)]
struct Face {
    /// Vertices in counter-clockwise order.
    vertices: [usize; 3],
    /// `neighbors[i]` is the face across the edge opposite to `vertices[i]`.
    neighbors: [usize; 3],
    /// `constrained[i]` is set if the edge opposite to `vertices[i]` is a constraint.
    constrained: [bool; 3],
    nesting_level: i32,
}

impl Face {
    fn new(vertices: [usize; 3], neighbors: [usize; 3], constrained: [bool; 3]) -> Self {
        Self {
            vertices,
            neighbors,
            constrained,
            nesting_level: UNMARKED,
        }
    }

    fn is_infinite(&self) -> bool {
        self.vertices.contains(&INFINITE)
    }

    fn index_of(&self, vertex: usize) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// Index of the vertex that is not on the edge `(x, y)`.
    fn opposite_to_edge(&self, x: usize, y: usize) -> Option<usize> {
        let index = self.vertices.iter().position(|&v| v != x && v != y)?;
        let others = [self.vertices[ccw(index)], self.vertices[cw(index)]];
        (others.contains(&x) && others.contains(&y)).then_some(index)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Location {
    InFace(usize),
    /// Point lies on the edge opposite to the given vertex index of a finite face.
    OnEdge(usize, usize),
    OnVertex(usize),
    /// Point is outside of the convex hull and visible from the finite edge of the given infinite face.
    OutsideHull(usize),
}

/// Read-only view of a finite face of the triangulation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FaceView {
    vertices: [VertexHandle; 3],
    nesting_level: i32,
}

impl FaceView {
    /// Face vertices in counter-clockwise order.
    pub fn vertices(&self) -> [VertexHandle; 3] {
        self.vertices
    }

    /// Nesting level assigned by the last [`ConstraintDelaunayTriangulation::mark_domains`] call, `-1` if the
    /// face was created after it.
    pub fn nesting_level(&self) -> i32 {
        self.nesting_level
    }

    /// Whether the face is inside the region bounded by constraints: its nesting level is odd.
    pub fn is_in_domain(&self) -> bool {
        self.nesting_level % 2 == 1
    }
}

/// Constrained Delaunay triangulation in 2d.
///
/// Vertices are inserted one by one with [`add_vertex`](Self::add_vertex), constraint edges between them with
/// [`add_constraint`](Self::add_constraint). All orientation and in-circle decisions use exact predicates.
///
/// If a [`Plane`] is set with [`with_projection_plane`](Self::with_projection_plane), coordinates are projected
/// into it before insertion. The input coordinate of every vertex is kept and returned by
/// [`get_triangles`](Self::get_triangles), so extraction never maps plane coordinates back into 3d.
///
/// ```
/// use tessera::triangulation::ConstraintDelaunayTriangulation;
/// use tessera_types::{Coordinate, TriangulatedSurface};
///
/// let mut cdt = ConstraintDelaunayTriangulation::new();
/// let ring = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
///     .map(|(x, y)| cdt.add_vertex(&Coordinate::xy(x, y)));
/// for i in 0..4 {
///     cdt.add_constraint(ring[i], ring[(i + 1) % 4]);
/// }
///
/// cdt.mark_domains();
/// let mut surface = TriangulatedSurface::default();
/// cdt.get_triangles(&mut surface, true).unwrap();
/// assert_eq!(surface.num_triangles(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ConstraintDelaunayTriangulation {
    plane: Option<Plane>,
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    /// Constraints added while all vertices were collinear.
    pending_constraints: Vec<(usize, usize)>,
    last_face: usize,
    seed: u64,
}

impl Default for ConstraintDelaunayTriangulation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintDelaunayTriangulation {
    /// Creates an empty triangulation without projection.
    pub fn new() -> Self {
        Self {
            plane: None,
            vertices: vec![Self::infinite_vertex()],
            faces: vec![],
            pending_constraints: vec![],
            last_face: 0,
            seed: 0x2545_f491_4f6c_dd1d,
        }
    }

    fn infinite_vertex() -> Vertex {
        Vertex {
            position: [f64::NAN, f64::NAN],
            original: Coordinate::empty(),
            face: NO_FACE,
        }
    }

    /// Sets the plane all inserted coordinates are projected into.
    ///
    /// # Panics
    ///
    /// Panics if vertices were already inserted.
    pub fn with_projection_plane(mut self, plane: Plane) -> Self {
        self.set_projection_plane(plane);
        self
    }

    /// Sets the plane all inserted coordinates are projected into.
    ///
    /// # Panics
    ///
    /// Panics if vertices were already inserted.
    pub fn set_projection_plane(&mut self, plane: Plane) {
        assert_eq!(
            self.num_vertices(),
            0,
            "projection plane must be set before inserting vertices"
        );
        self.plane = Some(plane);
    }

    /// Projection plane, if set.
    pub fn projection_plane(&self) -> Option<&Plane> {
        self.plane.as_ref()
    }

    /// Removes all vertices, faces and constraints. Projection plane is kept.
    pub fn clear(&mut self) {
        self.vertices.truncate(1);
        self.faces.clear();
        self.pending_constraints.clear();
        self.last_face = 0;
    }

    /// Number of vertices, not counting the vertex at infinity.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Number of finite faces.
    pub fn num_triangles(&self) -> usize {
        self.faces.iter().filter(|f| !f.is_infinite()).count()
    }

    /// Input coordinate of a vertex. Empty for vertices created at intersections of constraints.
    pub fn vertex_original(&self, vertex: VertexHandle) -> &Coordinate {
        &self.vertices[vertex.0].original
    }

    /// Position of a vertex in the triangulation plane.
    pub fn vertex_position(&self, vertex: VertexHandle) -> [f64; 2] {
        self.vertices[vertex.0].position
    }

    /// Iterates over finite faces.
    pub fn faces(&self) -> impl Iterator<Item = FaceView> + '_ {
        self.faces
            .iter()
            .filter(|f| !f.is_infinite())
            .map(|f| FaceView {
                vertices: f.vertices.map(VertexHandle),
                nesting_level: f.nesting_level,
            })
    }

    /// Nesting level of the infinite face, `None` while the triangulation has no faces.
    pub fn infinite_face_nesting_level(&self) -> Option<i32> {
        self.faces
            .iter()
            .find(|f| f.is_infinite())
            .map(|f| f.nesting_level)
    }

    /// Returns true if the constraint edge between the two vertices exists.
    pub fn is_constrained(&self, a: VertexHandle, b: VertexHandle) -> bool {
        self.find_edge(a.0, b.0)
            .is_some_and(|(f, i)| self.faces[f].constrained[i])
    }

    /// Inserts a vertex and returns its handle.
    ///
    /// A coordinate that lands on the position of an existing vertex returns the handle of that vertex; the first
    /// inserted coordinate stays its original.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is empty.
    pub fn add_vertex(&mut self, coordinate: &Coordinate) -> VertexHandle {
        assert!(!coordinate.is_empty(), "cannot triangulate empty coordinate");

        let position = match &self.plane {
            Some(plane) => plane.project(coordinate),
            None => [coordinate.x(), coordinate.y()],
        };

        if self.faces.is_empty() {
            return self.add_vertex_degenerate(position, *coordinate);
        }

        let location = self.locate(position);
        if let Location::OnVertex(v) = location {
            return VertexHandle(v);
        }

        let v = self.push_vertex(position, *coordinate);
        self.link_vertex(v, location);
        VertexHandle(v)
    }

    /// Inserts a constraint edge between two vertices.
    ///
    /// Constraint with the same start and end vertex is ignored. If the constraint passes through other vertices,
    /// it is split at them. If it crosses an existing constraint, a new vertex without original coordinate is
    /// inserted at the intersection and both constraints are split there.
    pub fn add_constraint(&mut self, a: VertexHandle, b: VertexHandle) {
        if a == b {
            return;
        }

        if self.faces.is_empty() {
            self.pending_constraints.push((a.0, b.0));
            return;
        }

        self.insert_constraint(a.0, b.0);
    }

    /// Assigns nesting levels to all faces.
    ///
    /// Infinite faces get level 0. The level grows by one every time a constraint is crossed on the way from the
    /// infinite face, so faces inside a ring have odd levels and faces inside a hole of that ring have even levels.
    pub fn mark_domains(&mut self) {
        for face in &mut self.faces {
            face.nesting_level = UNMARKED;
        }

        let Some(start) = self.faces.iter().position(Face::is_infinite) else {
            return;
        };

        let mut border = VecDeque::new();
        self.mark_domain(start, 0, &mut border);
        while let Some((face, edge)) = border.pop_front() {
            let neighbor = self.faces[face].neighbors[edge];
            if self.faces[neighbor].nesting_level == UNMARKED {
                let level = self.faces[face].nesting_level + 1;
                self.mark_domain(neighbor, level, &mut border);
            }
        }

        log::debug!(
            "Marked domains of {} faces, {} inside",
            self.num_triangles(),
            self.faces().filter(FaceView::is_in_domain).count()
        );
    }

    fn mark_domain(&mut self, start: usize, level: i32, border: &mut VecDeque<(usize, usize)>) {
        let mut queue = VecDeque::from([start]);
        while let Some(face) = queue.pop_front() {
            if self.faces[face].nesting_level != UNMARKED {
                continue;
            }

            self.faces[face].nesting_level = level;
            for i in 0..3 {
                let neighbor = self.faces[face].neighbors[i];
                if self.faces[neighbor].nesting_level != UNMARKED {
                    continue;
                }

                if self.faces[face].constrained[i] {
                    border.push_back((face, i));
                } else {
                    queue.push_back(neighbor);
                }
            }
        }
    }

    /// Appends finite faces to `surface` as triangles made of the original vertex coordinates.
    ///
    /// With `filter_exterior_parts` only faces with odd nesting level are added, so [`Self::mark_domains`] must be
    /// called first.
    ///
    /// Fails with [`TesseraError::ConstraintIntersection`] if a face to be added has a vertex created at an
    /// intersection of constraints. Nothing is added to the surface in this case.
    pub fn get_triangles(
        &self,
        surface: &mut TriangulatedSurface,
        filter_exterior_parts: bool,
    ) -> Result<(), TesseraError> {
        let mut triangles = vec![];
        for face in self.faces() {
            if filter_exterior_parts && !face.is_in_domain() {
                continue;
            }

            let mut points = [Point::empty(); 3];
            for (point, vertex) in points.iter_mut().zip(face.vertices) {
                let original = self.vertex_original(vertex);
                if original.is_empty() {
                    return Err(TesseraError::ConstraintIntersection);
                }
                *point = Point::from(*original);
            }

            let [p, q, r] = points;
            triangles.push(Triangle::new(p, q, r));
        }

        log::debug!("Extracted {} triangles", triangles.len());
        surface.add_triangles(triangles.into());
        Ok(())
    }

    fn position(&self, vertex: usize) -> Coord<f64> {
        let [x, y] = self.vertices[vertex].position;
        Coord { x, y }
    }

    fn orient(&self, a: usize, b: usize, c: usize) -> f64 {
        robust::orient2d(self.position(a), self.position(b), self.position(c))
    }

    fn orient_point(&self, a: usize, b: usize, p: [f64; 2]) -> f64 {
        robust::orient2d(self.position(a), self.position(b), Coord { x: p[0], y: p[1] })
    }

    fn push_vertex(&mut self, position: [f64; 2], original: Coordinate) -> usize {
        self.vertices.push(Vertex {
            position,
            original,
            face: NO_FACE,
        });
        self.vertices.len() - 1
    }

    /// Vertex insertion while there are less than three non-collinear vertices.
    fn add_vertex_degenerate(&mut self, position: [f64; 2], original: Coordinate) -> VertexHandle {
        if let Some(existing) = self.vertices[1..]
            .iter()
            .position(|v| v.position == position)
        {
            return VertexHandle(existing + 1);
        }

        let v = self.push_vertex(position, original);
        if self.vertices.len() < 4 {
            return VertexHandle(v);
        }

        let orientation = self.orient(1, 2, v);
        if orientation == 0.0 {
            return VertexHandle(v);
        }

        if orientation > 0.0 {
            self.create_first_face(1, 2, v);
        } else {
            self.create_first_face(2, 1, v);
        }

        log::debug!("Triangulation initialized with {} vertices", v);

        for pending in 3..v {
            let location = self.locate(self.vertices[pending].position);
            self.link_vertex(pending, location);
        }

        for (a, b) in std::mem::take(&mut self.pending_constraints) {
            self.insert_constraint(a, b);
        }

        VertexHandle(v)
    }

    /// Creates the finite face `(a, b, c)` and three infinite faces around it. `(a, b, c)` must be counter-clockwise.
    fn create_first_face(&mut self, a: usize, b: usize, c: usize) {
        self.faces = vec![
            Face::new([a, b, c], [1, 2, 3], [false; 3]),
            Face::new([INFINITE, c, b], [0, 3, 2], [false; 3]),
            Face::new([INFINITE, a, c], [0, 1, 3], [false; 3]),
            Face::new([INFINITE, b, a], [0, 2, 1], [false; 3]),
        ];
        for face in 0..4 {
            self.update_hints(face);
        }
        self.last_face = 0;
    }

    fn update_hints(&mut self, face: usize) {
        for v in self.faces[face].vertices {
            self.vertices[v].face = face;
        }
    }

    /// Index of the vertex of `faces[face].neighbors[i]` that is opposite to their common edge.
    fn mirror_index(&self, face: usize, i: usize) -> usize {
        let f = &self.faces[face];
        let neighbor = &self.faces[f.neighbors[i]];
        let (b, c) = (f.vertices[ccw(i)], f.vertices[cw(i)]);
        neighbor
            .vertices
            .iter()
            .position(|&v| v != b && v != c)
            .unwrap_or_else(|| unreachable!("faces {face} and {} are not adjacent", f.neighbors[i]))
    }

    fn set_neighbor_across(&mut self, face: usize, x: usize, y: usize, neighbor: usize) {
        if let Some(index) = self.faces[face].opposite_to_edge(x, y) {
            self.faces[face].neighbors[index] = neighbor;
        }
    }

    fn set_constrained(&mut self, face: usize, i: usize) {
        let j = self.mirror_index(face, i);
        let neighbor = self.faces[face].neighbors[i];
        self.faces[face].constrained[i] = true;
        self.faces[neighbor].constrained[j] = true;
    }

    /// Faces around a vertex in counter-clockwise order.
    fn faces_around(&self, vertex: usize) -> Vec<usize> {
        let start = self.vertices[vertex].face;
        let mut result = vec![];
        let mut face = start;
        loop {
            result.push(face);
            let Some(index) = self.faces[face].index_of(vertex) else {
                unreachable!("vertex {vertex} is not in its face {face}");
            };
            face = self.faces[face].neighbors[ccw(index)];
            if face == start || result.len() > self.faces.len() {
                break;
            }
        }

        result
    }

    /// Finds a face with edge `(x, y)` and the index of the vertex opposite to that edge.
    fn find_edge(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        if self.vertices[x].face == NO_FACE {
            return None;
        }

        self.faces_around(x).into_iter().find_map(|face| {
            self.faces[face]
                .opposite_to_edge(x, y)
                .map(|index| (face, index))
        })
    }

    fn next_random(&mut self) -> u64 {
        self.seed ^= self.seed << 13;
        self.seed ^= self.seed >> 7;
        self.seed ^= self.seed << 17;
        self.seed
    }

    fn locate(&mut self, p: [f64; 2]) -> Location {
        let mut face = if self.last_face < self.faces.len() {
            self.last_face
        } else {
            0
        };
        if let Some(i) = self.faces[face].index_of(INFINITE) {
            face = self.faces[face].neighbors[i];
        }

        let max_steps = 4 * self.faces.len() + 16;
        'walk: for _ in 0..max_steps {
            if self.faces[face].is_infinite() {
                return Location::OutsideHull(face);
            }

            let offset = (self.next_random() % 3) as usize;
            let f = &self.faces[face];
            let mut on_edges = [false; 3];
            for k in 0..3 {
                let i = (k + offset) % 3;
                let orientation = self.orient_point(f.vertices[ccw(i)], f.vertices[cw(i)], p);
                if orientation < 0.0 {
                    face = f.neighbors[i];
                    continue 'walk;
                }
                on_edges[i] = orientation == 0.0;
            }

            self.last_face = face;
            return Self::classify(face, &self.faces[face], on_edges);
        }

        log::debug!("Visibility walk did not converge, locating point by scanning all faces");
        self.locate_by_scan(p)
    }

    fn classify(face: usize, f: &Face, on_edges: [bool; 3]) -> Location {
        match on_edges.iter().filter(|&&on| on).count() {
            0 => Location::InFace(face),
            1 => {
                let i = on_edges.iter().position(|&on| on).unwrap_or_default();
                Location::OnEdge(face, i)
            }
            _ => {
                let i = on_edges.iter().position(|&on| !on).unwrap_or_default();
                Location::OnVertex(f.vertices[i])
            }
        }
    }

    fn locate_by_scan(&self, p: [f64; 2]) -> Location {
        for (index, f) in self.faces.iter().enumerate() {
            if f.is_infinite() {
                continue;
            }

            let orientations = [0, 1, 2]
                .map(|i| self.orient_point(f.vertices[ccw(i)], f.vertices[cw(i)], p));
            if orientations.iter().all(|&o| o >= 0.0) {
                return Self::classify(index, f, orientations.map(|o| o == 0.0));
            }
        }

        let outside = self.faces.iter().enumerate().find(|(_, f)| {
            f.index_of(INFINITE).is_some_and(|i| {
                self.orient_point(f.vertices[ccw(i)], f.vertices[cw(i)], p) > 0.0
            })
        });

        match outside {
            Some((index, _)) => Location::OutsideHull(index),
            None => unreachable!("point is neither inside nor outside of the convex hull"),
        }
    }

    fn link_vertex(&mut self, v: usize, location: Location) {
        match location {
            Location::InFace(face) => {
                let faces = self.split_face(face, v);
                self.legalize(faces.map(|f| (f, v)).to_vec());
            }
            Location::OnEdge(face, i) => {
                let faces = self.split_edge(face, i, v);
                self.legalize(faces.map(|f| (f, v)).to_vec());
            }
            Location::OutsideHull(face) => self.insert_outside_hull(face, v),
            Location::OnVertex(_) => {
                unreachable!("vertex {v} duplicates an existing vertex")
            }
        }
    }

    /// Splits `face` into three faces sharing vertex `p`.
    ///
    /// Returned faces are ordered by the vertex of the original face `p` replaced.
    fn split_face(&mut self, face: usize, p: usize) -> [usize; 3] {
        let Face {
            vertices: [a, b, c],
            neighbors: [n0, n1, n2],
            constrained: [k0, k1, k2],
            ..
        } = self.faces[face].clone();

        let f1 = self.faces.len();
        let f2 = f1 + 1;

        self.faces[face] = Face::new([p, b, c], [n0, f1, f2], [k0, false, false]);
        self.faces
            .push(Face::new([a, p, c], [face, n1, f2], [false, k1, false]));
        self.faces
            .push(Face::new([a, b, p], [face, f1, n2], [false, false, k2]));

        self.set_neighbor_across(n1, c, a, f1);
        self.set_neighbor_across(n2, a, b, f2);

        for f in [face, f1, f2] {
            self.update_hints(f);
        }

        [face, f1, f2]
    }

    /// Splits the edge opposite to vertex `i` of `face` at vertex `p`, replacing two faces with four.
    fn split_edge(&mut self, face: usize, i: usize, p: usize) -> [usize; 4] {
        let g = self.faces[face].neighbors[i];
        let j = self.mirror_index(face, i);

        let f = self.faces[face].clone();
        let (a, b, c) = (f.vertices[i], f.vertices[ccw(i)], f.vertices[cw(i)]);
        let constrained = f.constrained[i];
        let (n_ca, k_ca) = (f.neighbors[ccw(i)], f.constrained[ccw(i)]);
        let (n_ab, k_ab) = (f.neighbors[cw(i)], f.constrained[cw(i)]);

        let gf = self.faces[g].clone();
        let d = gf.vertices[j];
        let (n_bd, k_bd) = (gf.neighbors[ccw(j)], gf.constrained[ccw(j)]);
        let (n_dc, k_dc) = (gf.neighbors[cw(j)], gf.constrained[cw(j)]);

        let f2 = self.faces.len();
        let g2 = f2 + 1;

        self.faces[face] = Face::new([a, b, p], [g2, f2, n_ab], [constrained, false, k_ab]);
        self.faces
            .push(Face::new([a, p, c], [g, n_ca, face], [constrained, k_ca, false]));
        self.faces[g] = Face::new([d, c, p], [f2, g2, n_dc], [constrained, false, k_dc]);
        self.faces
            .push(Face::new([d, p, b], [face, n_bd, g], [constrained, k_bd, false]));

        self.set_neighbor_across(n_ca, c, a, f2);
        self.set_neighbor_across(n_bd, b, d, g2);

        for f in [face, f2, g, g2] {
            self.update_hints(f);
        }

        [face, f2, g, g2]
    }

    /// Flips the edge opposite to vertex `i` of `face`. Returns the other face of the flipped pair.
    ///
    /// For `face = (a, b, c)` with `a` at `i` and neighbor `(d, c, b)` the result is `face = (a, b, d)` and
    /// `neighbor = (a, d, c)`.
    fn flip(&mut self, face: usize, i: usize) -> usize {
        let g = self.faces[face].neighbors[i];
        let j = self.mirror_index(face, i);

        let f = self.faces[face].clone();
        let (a, b, c) = (f.vertices[i], f.vertices[ccw(i)], f.vertices[cw(i)]);
        let (n_ca, k_ca) = (f.neighbors[ccw(i)], f.constrained[ccw(i)]);
        let (n_ab, k_ab) = (f.neighbors[cw(i)], f.constrained[cw(i)]);

        let gf = self.faces[g].clone();
        let d = gf.vertices[j];
        let (n_bd, k_bd) = (gf.neighbors[ccw(j)], gf.constrained[ccw(j)]);
        let (n_dc, k_dc) = (gf.neighbors[cw(j)], gf.constrained[cw(j)]);

        self.faces[face] = Face::new([a, b, d], [n_bd, g, n_ab], [k_bd, false, k_ab]);
        self.faces[g] = Face::new([a, d, c], [n_dc, n_ca, face], [k_dc, k_ca, false]);

        self.set_neighbor_across(n_bd, b, d, face);
        self.set_neighbor_across(n_ca, c, a, g);

        self.update_hints(face);
        self.update_hints(g);

        g
    }

    /// Edge opposite to vertex `i` of `face` violates the Delaunay condition and can be flipped.
    fn is_illegal(&self, face: usize, i: usize) -> bool {
        let f = &self.faces[face];
        let neighbor = f.neighbors[i];
        if f.constrained[i] || f.is_infinite() || self.faces[neighbor].is_infinite() {
            return false;
        }

        let d = self.faces[neighbor].vertices[self.mirror_index(face, i)];
        let [a, b, c] = f.vertices;
        robust::incircle(
            self.position(a),
            self.position(b),
            self.position(c),
            self.position(d),
        ) > 0.0
    }

    /// Restores the Delaunay property around newly inserted vertices. Each item is a face and the vertex whose
    /// opposite edge must be checked.
    fn legalize(&mut self, mut stack: Vec<(usize, usize)>) {
        while let Some((face, vertex)) = stack.pop() {
            let Some(i) = self.faces[face].index_of(vertex) else {
                continue;
            };

            if self.is_illegal(face, i) {
                let other = self.flip(face, i);
                stack.push((face, vertex));
                stack.push((other, vertex));
            }
        }
    }

    fn insert_outside_hull(&mut self, face: usize, p: usize) {
        let Some(i) = self.faces[face].index_of(INFINITE) else {
            unreachable!("face {face} is not infinite");
        };

        let split = self.split_face(face, p);

        // Faces (inf, p, w) and (inf, u, p) where (u, w) is the hull edge visible from p.
        let mut face_w = split[ccw(i)];
        loop {
            let Some(k) = self.faces[face_w].index_of(p) else {
                break;
            };
            let w = self.faces[face_w].vertices[ccw(k)];
            let neighbor = self.faces[face_w].neighbors[k];
            let x = self.faces[neighbor].vertices[self.mirror_index(face_w, k)];
            if self.orient(w, x, p) <= 0.0 {
                break;
            }
            face_w = self.flip(face_w, k);
        }

        let face_u = split[cw(i)];
        loop {
            let Some(k) = self.faces[face_u].index_of(p) else {
                break;
            };
            let u = self.faces[face_u].vertices[cw(k)];
            let neighbor = self.faces[face_u].neighbors[k];
            let y = self.faces[neighbor].vertices[self.mirror_index(face_u, k)];
            if self.orient(y, u, p) <= 0.0 {
                break;
            }
            self.flip(face_u, k);
        }

        let stack = self
            .faces_around(p)
            .into_iter()
            .filter(|&f| !self.faces[f].is_infinite())
            .map(|f| (f, p))
            .collect();
        self.legalize(stack);
    }

    fn insert_constraint(&mut self, a: usize, b: usize) {
        let mut worklist = vec![(a, b)];
        while let Some((a, b)) = worklist.pop() {
            if a == b {
                continue;
            }

            if let Some((face, i)) = self.find_edge(a, b) {
                self.set_constrained(face, i);
                continue;
            }

            match self.trace_constraint(a, b) {
                Trace::ThroughVertex(v) => {
                    worklist.push((v, b));
                    worklist.push((a, v));
                }
                Trace::Crossing { target, crossed } => {
                    self.insert_crossing_constraint(a, target, crossed);
                    worklist.push((target, b));
                }
                Trace::Intersection { face, edge } => {
                    let v = self.insert_intersection(a, b, face, edge);
                    worklist.push((v, b));
                    worklist.push((a, v));
                }
            }
        }
    }

    /// Walks along the segment `(a, b)` from `a`, collecting crossed edges until `b`, a vertex on the segment or a
    /// crossed constraint is reached.
    fn trace_constraint(&self, a: usize, b: usize) -> Trace {
        let mut start = None;
        for face in self.faces_around(a) {
            let f = &self.faces[face];
            if f.is_infinite() {
                continue;
            }

            let Some(k) = f.index_of(a) else {
                continue;
            };
            let (u, w) = (f.vertices[ccw(k)], f.vertices[cw(k)]);
            let (o_u, o_w) = (self.orient(a, u, b), self.orient(a, w, b));
            if o_u < 0.0 || o_w > 0.0 {
                continue;
            }

            if o_u == 0.0 {
                return Trace::ThroughVertex(u);
            }
            if o_w == 0.0 {
                return Trace::ThroughVertex(w);
            }

            start = Some((face, k, u, w));
            break;
        }

        let Some((mut face, mut edge, mut right, mut left)) = start else {
            unreachable!("no face around vertex {a} in the direction of vertex {b}");
        };

        let mut crossed = vec![];
        loop {
            if self.faces[face].constrained[edge] {
                return Trace::Intersection { face, edge };
            }

            crossed.push((right, left));
            let neighbor = self.faces[face].neighbors[edge];
            let j = self.mirror_index(face, edge);
            let d = self.faces[neighbor].vertices[j];
            if d == b {
                return Trace::Crossing { target: b, crossed };
            }

            let orientation = self.orient(a, b, d);
            if orientation == 0.0 {
                return Trace::Crossing { target: d, crossed };
            }

            // Neighbor is (d, left, right), the segment leaves it through (right, d) or (d, left).
            if orientation > 0.0 {
                edge = ccw(j);
                left = d;
            } else {
                edge = cw(j);
                right = d;
            }
            face = neighbor;
        }
    }

    /// Removes edges crossing the segment `(a, b)` by flipping them, then makes `(a, b)` a constraint.
    ///
    /// All crossed edges are unconstrained, so with exact predicates the flipping always recovers the edge. Failing
    /// to do so means the face tables are corrupt, and this panics.
    fn insert_crossing_constraint(&mut self, a: usize, b: usize, crossed: Vec<(usize, usize)>) {
        let mut queue = VecDeque::from(crossed);
        let mut created = vec![];
        let mut stalled = 0;

        while let Some((x, y)) = queue.pop_front() {
            let Some((face, i)) = self.find_edge(x, y) else {
                continue;
            };

            let c = self.faces[face].vertices[i];
            let neighbor = self.faces[face].neighbors[i];
            let d = self.faces[neighbor].vertices[self.mirror_index(face, i)];

            if !strictly_opposite(self.orient(c, d, x), self.orient(c, d, y)) {
                // Among unconstrained edges crossing a segment there is always one with a convex quadrilateral.
                assert!(
                    stalled <= queue.len(),
                    "no flippable edge crosses constraint between vertices {a} and {b}"
                );
                stalled += 1;
                queue.push_back((x, y));
                continue;
            }
            stalled = 0;

            self.flip(face, i);
            if strictly_opposite(self.orient(a, b, c), self.orient(a, b, d)) {
                queue.push_back((c, d));
            } else {
                created.push((c, d));
            }
        }

        let Some((face, i)) = self.find_edge(a, b) else {
            unreachable!("constraint edge between vertices {a} and {b} was not recovered");
        };
        self.set_constrained(face, i);

        let mut swapped = true;
        while swapped {
            swapped = false;
            for edge in &mut created {
                let Some((face, i)) = self.find_edge(edge.0, edge.1) else {
                    continue;
                };

                if self.is_illegal(face, i) {
                    let c = self.faces[face].vertices[i];
                    let neighbor = self.faces[face].neighbors[i];
                    let d = self.faces[neighbor].vertices[self.mirror_index(face, i)];
                    self.flip(face, i);
                    *edge = (c, d);
                    swapped = true;
                }
            }
        }
    }

    /// Inserts a vertex where the segment `(a, b)` crosses the constrained edge opposite to vertex `edge` of `face`.
    fn insert_intersection(&mut self, a: usize, b: usize, face: usize, edge: usize) -> usize {
        let f = &self.faces[face];
        let (r, l) = (f.vertices[ccw(edge)], f.vertices[cw(edge)]);
        let [ax, ay] = self.vertices[a].position;
        let [bx, by] = self.vertices[b].position;
        let [rx, ry] = self.vertices[r].position;
        let [lx, ly] = self.vertices[l].position;

        let (dx, dy) = (bx - ax, by - ay);
        let (ex, ey) = (lx - rx, ly - ry);
        let denominator = dx * ey - dy * ex;
        let s = (dx * (ay - ry) - dy * (ax - rx)) / denominator;

        if s.is_nan() || s <= 0.0 {
            return r;
        }
        if s >= 1.0 {
            return l;
        }

        let position = [rx + s * ex, ry + s * ey];
        if position == [rx, ry] {
            return r;
        }
        if position == [lx, ly] {
            return l;
        }

        log::warn!(
            "Constraint between vertices {a} and {b} crosses constraint between {r} and {l}, inserting \
             intersection vertex at ({}, {})",
            position[0],
            position[1]
        );

        let v = self.push_vertex(position, Coordinate::empty());
        let faces = self.split_edge(face, edge, v);
        self.legalize(faces.map(|f| (f, v)).to_vec());
        v
    }
}

#[derive(Debug)]
enum Trace {
    ThroughVertex(usize),
    Crossing {
        target: usize,
        crossed: Vec<(usize, usize)>,
    },
    Intersection {
        face: usize,
        edge: usize,
    },
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn add(cdt: &mut ConstraintDelaunayTriangulation, x: f64, y: f64) -> VertexHandle {
        cdt.add_vertex(&Coordinate::xy(x, y))
    }

    fn add_ring(cdt: &mut ConstraintDelaunayTriangulation, points: &[(f64, f64)]) {
        let handles: Vec<_> = points.iter().map(|&(x, y)| add(cdt, x, y)).collect();
        for i in 0..handles.len() {
            cdt.add_constraint(handles[i], handles[(i + 1) % handles.len()]);
        }
    }

    /// Checks adjacency symmetry and orientation of every face.
    fn check_consistency(cdt: &ConstraintDelaunayTriangulation) {
        for (index, face) in cdt.faces.iter().enumerate() {
            for i in 0..3 {
                let neighbor = face.neighbors[i];
                let j = cdt.mirror_index(index, i);
                assert_eq!(cdt.faces[neighbor].neighbors[j], index);
                assert_eq!(cdt.faces[neighbor].constrained[j], face.constrained[i]);
            }

            if !face.is_infinite() {
                let [a, b, c] = face.vertices;
                assert!(cdt.orient(a, b, c) > 0.0, "face {index} is not counter-clockwise");
            }
        }

        for (v, vertex) in cdt.vertices.iter().enumerate().skip(1) {
            assert!(cdt.faces[vertex.face].index_of(v).is_some());
        }
    }

    fn check_delaunay(cdt: &ConstraintDelaunayTriangulation) {
        for face in 0..cdt.faces.len() {
            for i in 0..3 {
                assert!(!cdt.is_illegal(face, i), "edge {i} of face {face} is not Delaunay");
            }
        }
    }

    fn area(cdt: &ConstraintDelaunayTriangulation, in_domain_only: bool) -> f64 {
        cdt.faces()
            .filter(|f| !in_domain_only || f.is_in_domain())
            .map(|f| {
                let [a, b, c] = f.vertices().map(|v| cdt.vertex_position(v));
                ((b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])) / 2.0
            })
            .sum()
    }

    #[test]
    fn empty_triangulation() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        cdt.mark_domains();
        assert_eq!(cdt.num_vertices(), 0);
        assert_eq!(cdt.num_triangles(), 0);
        assert_eq!(cdt.infinite_face_nesting_level(), None);

        let mut surface = TriangulatedSurface::default();
        cdt.get_triangles(&mut surface, true).unwrap();
        assert!(surface.triangles().is_empty());
    }

    #[test]
    fn collinear_points_have_no_faces() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        let a = add(&mut cdt, 0.0, 0.0);
        let b = add(&mut cdt, 1.0, 1.0);
        add(&mut cdt, 2.0, 2.0);
        cdt.add_constraint(a, b);

        assert_eq!(cdt.num_vertices(), 3);
        assert_eq!(cdt.num_triangles(), 0);
    }

    #[test]
    fn collinear_points_are_linked_after_initialization() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        let a = add(&mut cdt, 0.0, 0.0);
        add(&mut cdt, 2.0, 0.0);
        let c = add(&mut cdt, 1.0, 0.0);
        cdt.add_constraint(a, c);
        add(&mut cdt, 1.0, 1.0);

        assert_eq!(cdt.num_vertices(), 4);
        assert_eq!(cdt.num_triangles(), 2);
        assert!(cdt.is_constrained(a, c));
        check_consistency(&cdt);
    }

    #[test]
    fn duplicate_position_returns_existing_vertex() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        let a = add(&mut cdt, 0.0, 0.0);
        assert_eq!(add(&mut cdt, 0.0, 0.0), a);

        add(&mut cdt, 1.0, 0.0);
        let c = add(&mut cdt, 0.0, 1.0);
        assert_eq!(add(&mut cdt, 0.0, 1.0), c);
        assert_eq!(cdt.num_vertices(), 3);
        assert_eq!(cdt.vertex_original(c), &Coordinate::xy(0.0, 1.0));
    }

    #[test]
    fn self_loop_constraint_is_ignored() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        let a = add(&mut cdt, 0.0, 0.0);
        add(&mut cdt, 1.0, 0.0);
        add(&mut cdt, 0.0, 1.0);

        cdt.add_constraint(a, a);
        assert_eq!(cdt.num_vertices(), 3);
        assert_eq!(cdt.num_triangles(), 1);
        assert!(cdt.faces.iter().all(|f| f.constrained == [false; 3]));
    }

    #[test]
    fn random_points_are_delaunay() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        let mut seed = 17u64;
        let mut next = || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 11) as f64 / (1u64 << 53) as f64
        };

        for _ in 0..200 {
            let (x, y) = (next() * 100.0, next() * 100.0);
            add(&mut cdt, x, y);
        }

        assert_eq!(cdt.num_vertices(), 200);
        check_consistency(&cdt);
        check_delaunay(&cdt);

        // Euler formula for a triangulation: 2n - 2 - h triangles, where h is the number of hull vertices.
        let hull = cdt.faces.iter().filter(|f| f.is_infinite()).count();
        assert_eq!(cdt.num_triangles(), 2 * 200 - 2 - hull);
    }

    #[test]
    fn star_polygon_edges_are_recovered() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        let mut seed = 29u64;
        let mut next = || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 11) as f64 / (1u64 << 53) as f64
        };

        for _ in 0..300 {
            let (x, y) = (next() * 100.0, next() * 100.0);
            add(&mut cdt, x, y);
        }

        let n = 64;
        let ring: Vec<(f64, f64)> = (0..n)
            .map(|k| {
                let angle = 2.0 * std::f64::consts::PI * k as f64 / n as f64;
                let radius = 20.0 + 20.0 * next();
                (50.0 + radius * angle.cos(), 50.0 + radius * angle.sin())
            })
            .collect();
        let handles: Vec<_> = ring.iter().map(|&(x, y)| add(&mut cdt, x, y)).collect();
        for i in 0..n {
            cdt.add_constraint(handles[i], handles[(i + 1) % n]);
        }

        check_consistency(&cdt);
        for i in 0..n {
            assert!(cdt.is_constrained(handles[i], handles[(i + 1) % n]));
        }

        let expected: f64 = (0..n)
            .map(|i| {
                let ((x0, y0), (x1, y1)) = (ring[i], ring[(i + 1) % n]);
                (x0 * y1 - x1 * y0) / 2.0
            })
            .sum();
        cdt.mark_domains();
        assert_abs_diff_eq!(area(&cdt, true), expected, epsilon = 1e-9);
    }

    #[test]
    fn grid_points() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        for i in 0..10 {
            for j in 0..10 {
                add(&mut cdt, i as f64, j as f64);
            }
        }

        check_consistency(&cdt);
        check_delaunay(&cdt);
        assert_eq!(cdt.num_triangles(), 2 * 9 * 9);
        assert_abs_diff_eq!(area(&cdt, false), 81.0);
    }

    #[test]
    fn constraint_is_forced() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        let a = add(&mut cdt, 0.0, 0.0);
        add(&mut cdt, 5.0, -1.0);
        add(&mut cdt, 5.0, 1.0);
        add(&mut cdt, 4.0, 0.5);
        add(&mut cdt, 6.0, -0.5);
        let b = add(&mut cdt, 10.0, 0.0);

        assert!(!cdt.is_constrained(a, b));
        cdt.add_constraint(a, b);

        assert!(cdt.is_constrained(a, b));
        check_consistency(&cdt);
        assert_eq!(cdt.num_vertices(), 6);
    }

    #[test]
    fn constraint_through_vertex_is_split() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        let a = add(&mut cdt, 0.0, 0.0);
        let m = add(&mut cdt, 1.0, 0.0);
        let b = add(&mut cdt, 2.0, 0.0);
        add(&mut cdt, 1.0, 1.0);
        add(&mut cdt, 1.0, -1.0);

        cdt.add_constraint(a, b);
        assert!(cdt.is_constrained(a, m));
        assert!(cdt.is_constrained(m, b));
        check_consistency(&cdt);
    }

    #[test]
    fn nested_rings() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        add_ring(&mut cdt, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        add_ring(&mut cdt, &[(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)]);
        add_ring(&mut cdt, &[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]);
        cdt.mark_domains();

        check_consistency(&cdt);
        assert_eq!(cdt.infinite_face_nesting_level(), Some(0));
        assert!(cdt.faces().all(|f| (1..=3).contains(&f.nesting_level())));
        assert_abs_diff_eq!(area(&cdt, true), 100.0 - 36.0 + 4.0, epsilon = 1e-9);

        let levels: Vec<i32> = cdt
            .faces()
            .filter(|f| {
                let [a, b, c] = f.vertices().map(|v| cdt.vertex_position(v));
                let center = [(a[0] + b[0] + c[0]) / 3.0, (a[1] + b[1] + c[1]) / 3.0];
                (4.0..=6.0).contains(&center[0]) && (4.0..=6.0).contains(&center[1])
            })
            .map(|f| f.nesting_level())
            .collect();
        assert!(!levels.is_empty());
        assert!(levels.iter().all(|&l| l == 3));
    }

    #[test]
    fn crossing_constraints_fail_extraction() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        let a = add(&mut cdt, 0.0, 0.0);
        let b = add(&mut cdt, 2.0, 2.0);
        let c = add(&mut cdt, 0.0, 2.0);
        let d = add(&mut cdt, 2.0, 0.0);
        cdt.add_constraint(a, b);
        cdt.add_constraint(c, d);

        assert_eq!(cdt.num_vertices(), 5);
        check_consistency(&cdt);
        cdt.mark_domains();

        let mut surface = TriangulatedSurface::default();
        assert_eq!(
            cdt.get_triangles(&mut surface, false),
            Err(TesseraError::ConstraintIntersection)
        );
        assert_eq!(surface.num_triangles(), 0);
    }

    #[test]
    fn projection_plane_is_used() {
        let plane = Plane::from_points(
            nalgebra::Vector3::new(0.0, 0.0, 0.0),
            nalgebra::Vector3::new(0.0, 0.0, 1.0),
            nalgebra::Vector3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        let mut cdt = ConstraintDelaunayTriangulation::new().with_projection_plane(plane);

        // Points in the plane x = 0, all with the same x and y would be collinear without projection.
        let points = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]
            .map(|(y, z)| cdt.add_vertex(&Coordinate::xyz(0.0, y, z)));
        for i in 0..4 {
            cdt.add_constraint(points[i], points[(i + 1) % 4]);
        }
        cdt.mark_domains();

        let mut surface = TriangulatedSurface::default();
        cdt.get_triangles(&mut surface, true).unwrap();
        assert_eq!(surface.num_triangles(), 2);
        assert!(surface
            .triangles()
            .iter()
            .flat_map(|t| t.vertices())
            .all(|p| p.coordinate().is_3d() && p.x() == 0.0));
    }

    #[test]
    #[should_panic]
    fn plane_after_vertices_panics() {
        let mut cdt = ConstraintDelaunayTriangulation::new();
        add(&mut cdt, 0.0, 0.0);
        cdt.set_projection_plane(Plane::xy());
    }

    #[test]
    fn clear_keeps_plane() {
        let mut cdt = ConstraintDelaunayTriangulation::new().with_projection_plane(Plane::xy());
        add(&mut cdt, 0.0, 0.0);
        add(&mut cdt, 1.0, 0.0);
        add(&mut cdt, 0.0, 1.0);

        cdt.clear();
        assert_eq!(cdt.num_vertices(), 0);
        assert_eq!(cdt.num_triangles(), 0);
        assert!(cdt.projection_plane().is_some());
    }
}
