//! Polygon blueprints and their instantiated vertex/edge rings.
//!
//! A `ShapeTemplate` is the immutable blueprint: parallel lists of edge
//! names, vertex names and initial vertex positions. A `Shape` is one
//! instantiation: vertices and edges stored in two index-addressable
//! arenas, with the cyclic ring expressed as `VertexId`/`EdgeId` links
//! built in a single pass. No partially-linked ring is representable.
//!
//! Layout convention: edge `i` runs from vertex `i` to vertex `i + 1`
//! (cyclic), so vertex `i` joins edge `i - 1` and edge `i`.

use crate::curve::Curve;
use crate::geometry::{Point, signed_area};
use std::collections::HashSet;
use std::f64::consts::TAU;

/// Errors from blueprint validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Fewer than three vertices/edges.
    TooFewSides(usize),
    /// Edge, vertex and position lists must have equal lengths.
    CountMismatch { edges: usize, vertices: usize, positions: usize },
    /// Edge and vertex names must all be distinct within the template.
    DuplicateName(String),
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::TooFewSides(n) => {
                write!(f, "a shape needs at least 3 sides, got {}", n)
            }
            ShapeError::CountMismatch { edges, vertices, positions } => write!(
                f,
                "mismatched counts: {} edges, {} vertices, {} positions",
                edges, vertices, positions
            ),
            ShapeError::DuplicateName(name) => {
                write!(f, "duplicate edge/vertex name `{}`", name)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// Index of a vertex within its shape's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId(pub usize);

/// Index of an edge within its shape's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub usize);

/// Immutable polygon blueprint.
#[derive(Debug, Clone)]
pub struct ShapeTemplate {
    name: String,
    edge_names: Vec<String>,
    vertex_names: Vec<String>,
    positions: Vec<Point>,
}

impl ShapeTemplate {
    /// Validate and build a blueprint.
    ///
    /// All three lists must have the same length (≥ 3), and the edge
    /// and vertex names together must be distinct.
    pub fn new(
        name: impl Into<String>,
        edge_names: Vec<String>,
        vertex_names: Vec<String>,
        positions: Vec<Point>,
    ) -> Result<Self, ShapeError> {
        if edge_names.len() != vertex_names.len() || edge_names.len() != positions.len() {
            return Err(ShapeError::CountMismatch {
                edges: edge_names.len(),
                vertices: vertex_names.len(),
                positions: positions.len(),
            });
        }
        if edge_names.len() < 3 {
            return Err(ShapeError::TooFewSides(edge_names.len()));
        }
        let mut seen = HashSet::new();
        for n in edge_names.iter().chain(vertex_names.iter()) {
            if !seen.insert(n.as_str()) {
                return Err(ShapeError::DuplicateName(n.clone()));
            }
        }
        Ok(Self { name: name.into(), edge_names, vertex_names, positions })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn edge_names(&self) -> &[String] {
        &self.edge_names
    }

    pub fn vertex_names(&self) -> &[String] {
        &self.vertex_names
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Number of sides (edges == vertices).
    pub fn sides(&self) -> usize {
        self.edge_names.len()
    }
}

/// Ring member: a named corner of a shape.
#[derive(Debug, Clone)]
pub struct Vertex {
    name: String,
    position: Point,
    /// Edge arriving at this vertex.
    incoming: EdgeId,
    /// Edge leaving this vertex.
    outgoing: EdgeId,
}

impl Vertex {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn incoming(&self) -> EdgeId {
        self.incoming
    }

    pub fn outgoing(&self) -> EdgeId {
        self.outgoing
    }
}

/// Ring member: a named side of a shape carrying its geometry.
#[derive(Debug, Clone)]
pub struct Edge {
    name: String,
    start: VertexId,
    end: VertexId,
    curve: Curve,
}

impl Edge {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> VertexId {
        self.start
    }

    pub fn end(&self) -> VertexId {
        self.end
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// Length of the edge geometry.
    pub fn length(&self) -> f64 {
        self.curve.approx_length()
    }

    /// Point on the edge at `amount ∈ [0, 1]` from its start.
    pub fn point_at(&self, amount: f64) -> Point {
        self.curve.sample(amount)
    }
}

/// One instantiated polygon: vertex and edge arenas forming a ring.
#[derive(Debug, Clone)]
pub struct Shape {
    template_name: String,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    clockwise: bool,
}

impl Shape {
    /// Build the ring from a blueprint in one pass.
    pub fn new(template: &ShapeTemplate) -> Self {
        let n = template.sides();
        let positions = template.positions();
        let mut vertices = Vec::with_capacity(n);
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            let next = (i + 1) % n;
            let prev = (i + n - 1) % n;
            vertices.push(Vertex {
                name: template.vertex_names()[i].clone(),
                position: positions[i],
                incoming: EdgeId(prev),
                outgoing: EdgeId(i),
            });
            edges.push(Edge {
                name: template.edge_names()[i].clone(),
                start: VertexId(i),
                end: VertexId(next),
                curve: Curve::line(positions[i], positions[next]),
            });
        }
        let clockwise = signed_area(positions) < 0.0;
        Self { template_name: template.name().to_string(), vertices, edges, clockwise }
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    /// Whether the vertex ring winds clockwise.
    pub fn is_clockwise(&self) -> bool {
        self.clockwise
    }

    /// Find an edge by name.
    pub fn edge_by_name(&self, name: &str) -> Option<(EdgeId, &Edge)> {
        self.edges
            .iter()
            .position(|e| e.name == name)
            .map(|i| (EdgeId(i), &self.edges[i]))
    }

    /// Find a vertex by name.
    pub fn vertex_by_name(&self, name: &str) -> Option<(VertexId, &Vertex)> {
        self.vertices
            .iter()
            .position(|v| v.name == name)
            .map(|i| (VertexId(i), &self.vertices[i]))
    }

    /// Interior angle at a vertex, in radians.
    ///
    /// Measured between the two incident edge directions pointing away
    /// from the vertex, on the side enclosed by the ring's winding.
    pub fn interior_angle(&self, id: VertexId) -> f64 {
        use crate::geometry::Transform;
        let v = self.vertex(id);
        let identity = Transform::identity();
        let back = -self.edge(v.incoming).curve.tangent(1.0, &identity);
        let ahead = self.edge(v.outgoing).curve.tangent(0.0, &identity);
        let raw = (back.angle_from_x_axis() - ahead.angle_from_x_axis())
            .positive()
            .radians;
        if self.clockwise { TAU - raw } else { raw }
    }
}

/// All shapes of a template, instantiated together.
///
/// Owns its shapes; constraint predicates and definition-applicability
/// conditions are evaluated against this.
#[derive(Debug, Clone)]
pub struct ShapeSet {
    shapes: Vec<Shape>,
}

impl ShapeSet {
    pub fn new(templates: &[ShapeTemplate]) -> Self {
        Self { shapes: templates.iter().map(Shape::new).collect() }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape_by_name(&self, name: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.template_name() == name)
    }

    /// The shape owning the named edge.
    pub fn shape_for_edge(&self, edge_name: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.edge_by_name(edge_name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;

    fn unit_square() -> ShapeTemplate {
        ShapeTemplate::new(
            "square",
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec!["v0".into(), "v1".into(), "v2".into(), "v3".into()],
            vec![
                point(0.0, 0.0),
                point(1.0, 0.0),
                point(1.0, 1.0),
                point(0.0, 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn template_rejects_count_mismatch() {
        let err = ShapeTemplate::new(
            "bad",
            vec!["a".into(), "b".into(), "c".into()],
            vec!["v0".into(), "v1".into()],
            vec![point(0.0, 0.0), point(1.0, 0.0)],
        );
        assert!(matches!(err, Err(ShapeError::CountMismatch { .. })));
    }

    #[test]
    fn template_rejects_too_few_sides() {
        let err = ShapeTemplate::new(
            "bad",
            vec!["a".into(), "b".into()],
            vec!["v0".into(), "v1".into()],
            vec![point(0.0, 0.0), point(1.0, 0.0)],
        );
        assert!(matches!(err, Err(ShapeError::TooFewSides(2))));
    }

    #[test]
    fn template_rejects_duplicate_names() {
        let err = ShapeTemplate::new(
            "bad",
            vec!["a".into(), "b".into(), "c".into()],
            vec!["a".into(), "v1".into(), "v2".into()],
            vec![point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0)],
        );
        assert_eq!(err.unwrap_err(), ShapeError::DuplicateName("a".into()));
    }

    #[test]
    fn ring_links_close() {
        let shape = Shape::new(&unit_square());
        assert_eq!(shape.edges().len(), 4);
        for i in 0..4 {
            let edge = shape.edge(EdgeId(i));
            assert_eq!(edge.start(), VertexId(i));
            assert_eq!(edge.end(), VertexId((i + 1) % 4));
            let v = shape.vertex(VertexId(i));
            assert_eq!(v.outgoing(), EdgeId(i));
            assert_eq!(v.incoming(), EdgeId((i + 3) % 4));
        }
        // Last vertex links back to the first edge.
        assert_eq!(shape.edge(EdgeId(3)).end(), VertexId(0));
    }

    #[test]
    fn square_interior_angles() {
        let shape = Shape::new(&unit_square());
        assert!(!shape.is_clockwise());
        for i in 0..4 {
            let angle = shape.interior_angle(VertexId(i));
            assert!(
                (angle - std::f64::consts::FRAC_PI_2).abs() < 1e-9,
                "vertex {}: {}",
                i,
                angle
            );
        }
    }

    #[test]
    fn clockwise_square_interior_angles() {
        let template = ShapeTemplate::new(
            "square-cw",
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec!["v0".into(), "v1".into(), "v2".into(), "v3".into()],
            vec![
                point(0.0, 0.0),
                point(0.0, 1.0),
                point(1.0, 1.0),
                point(1.0, 0.0),
            ],
        )
        .unwrap();
        let shape = Shape::new(&template);
        assert!(shape.is_clockwise());
        for i in 0..4 {
            let angle = shape.interior_angle(VertexId(i));
            assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        }
    }

    #[test]
    fn edge_interpolation() {
        let shape = Shape::new(&unit_square());
        let (_, edge) = shape.edge_by_name("a").unwrap();
        assert!((edge.length() - 1.0).abs() < 1e-12);
        let mid = edge.point_at(0.5);
        assert!((mid.x - 0.5).abs() < 1e-12 && mid.y.abs() < 1e-12);
    }

    #[test]
    fn shape_set_lookup() {
        let set = ShapeSet::new(&[unit_square()]);
        assert!(set.shape_by_name("square").is_some());
        assert!(set.shape_for_edge("c").is_some());
        assert!(set.shape_for_edge("nope").is_none());
    }
}
