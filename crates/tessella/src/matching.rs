//! Edge-fragment matching model.
//!
//! Edges are decomposed into fragments (`EdgePart`); fragments sharing
//! an ID must be geometrically identical in the finished tiling. An
//! `EdgePattern` covers one edge with an ordered fragment list, and
//! `EdgePartAdjacencies` wires labeled fragments into a perfect
//! matching: which fragment glues to which. `EdgePartPosition` realizes
//! a fragment's endpoints in world space and produces the rigid
//! transform gluing one fragment onto another, including the mirror
//! correction for same-winding pairs.

use crate::curve::{Curve, GeometryError};
use crate::geometry::{Point, Transform, reflection_across, similarity_between};
use crate::graph::{AdjacencyGraph, GraphError};
use crate::shape::Shape;
use std::hash::{Hash, Hasher};

/// Amount-sum slack allowed when validating a pattern's coverage.
pub const COVERAGE_TOLERANCE: f64 = 0.001;

/// Errors from pattern and adjacency construction.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchingError {
    /// A pattern needs at least one fragment.
    EmptyPattern,
    /// All fragments of a pattern must sit on the same edge.
    MixedEdges { expected: String, found: String },
    /// Fragment amounts must lie in (0, 1].
    BadAmount { edge: String, amount: f64 },
    /// Fragment starts must line up with the running amount sum.
    BadStart { edge: String, start: f64, expected: f64 },
    /// Fragment amounts must sum to 1 within `COVERAGE_TOLERANCE`.
    BadCoverage { edge: String, sum: f64 },
    /// A labeled fragment cannot be matched with itself.
    SelfAdjacency,
    /// Each labeled fragment may appear in at most one adjacency.
    AlreadyMatched { label: String, edge: String },
}

impl std::fmt::Display for MatchingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchingError::EmptyPattern => write!(f, "edge pattern has no fragments"),
            MatchingError::MixedEdges { expected, found } => write!(
                f,
                "pattern mixes fragments of edge `{}` and edge `{}`",
                expected, found
            ),
            MatchingError::BadAmount { edge, amount } => {
                write!(f, "fragment amount {} on edge `{}` is outside (0, 1]", amount, edge)
            }
            MatchingError::BadStart { edge, start, expected } => write!(
                f,
                "fragment on edge `{}` starts at {} but the previous fragments end at {}",
                edge, start, expected
            ),
            MatchingError::BadCoverage { edge, sum } => {
                write!(f, "fragments on edge `{}` sum to {}, expected 1", edge, sum)
            }
            MatchingError::SelfAdjacency => {
                write!(f, "a labeled fragment cannot be matched with itself")
            }
            MatchingError::AlreadyMatched { label, edge } => write!(
                f,
                "fragment on edge `{}` under label `{}` is already matched",
                edge, label
            ),
        }
    }
}

impl std::error::Error for MatchingError {}

impl From<GraphError> for MatchingError {
    fn from(_: GraphError) -> Self {
        MatchingError::SelfAdjacency
    }
}

/// Traversal orientation of a fragment along its edge.
///
/// Only the clockwise flag participates in the gluing transform; the
/// in/out axis is carried through from the template definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgePartDirection {
    ClockwiseIn,
    ClockwiseOut,
    CounterClockwiseIn,
    CounterClockwiseOut,
}

impl EdgePartDirection {
    pub fn is_clockwise(self) -> bool {
        matches!(self, EdgePartDirection::ClockwiseIn | EdgePartDirection::ClockwiseOut)
    }

    pub fn is_inward(self) -> bool {
        matches!(self, EdgePartDirection::ClockwiseIn | EdgePartDirection::CounterClockwiseIn)
    }
}

/// A fragment of a named edge.
///
/// `id` groups fragments, possibly on different edges or shapes, that
/// must be geometrically identical in the final tiling. `start` and
/// `amount` are fractions of the owning edge.
#[derive(Debug, Clone)]
pub struct EdgePart {
    pub id: String,
    pub edge: String,
    pub direction: EdgePartDirection,
    pub start: f64,
    pub amount: f64,
}

impl EdgePart {
    pub fn new(
        id: impl Into<String>,
        edge: impl Into<String>,
        direction: EdgePartDirection,
        start: f64,
        amount: f64,
    ) -> Self {
        Self { id: id.into(), edge: edge.into(), direction, start, amount }
    }

    /// A fragment spanning its whole edge.
    pub fn full(id: impl Into<String>, edge: impl Into<String>, direction: EdgePartDirection) -> Self {
        Self::new(id, edge, direction, 0.0, 1.0)
    }
}

// Structural equality with bit-compared floats: fragments are built once
// in a definition and cloned around, so identical fragments are
// bit-identical.
impl PartialEq for EdgePart {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.edge == other.edge
            && self.direction == other.direction
            && self.start.to_bits() == other.start.to_bits()
            && self.amount.to_bits() == other.amount.to_bits()
    }
}

impl Eq for EdgePart {}

impl Hash for EdgePart {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.edge.hash(state);
        self.direction.hash(state);
        self.start.to_bits().hash(state);
        self.amount.to_bits().hash(state);
    }
}

/// Ordered fragment decomposition of one edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgePattern {
    parts: Vec<EdgePart>,
}

impl EdgePattern {
    /// Validate a fragment list: non-empty, one edge, contiguous starts,
    /// amounts in (0, 1] summing to 1 within `COVERAGE_TOLERANCE`.
    pub fn new(parts: Vec<EdgePart>) -> Result<Self, MatchingError> {
        let first_edge = match parts.first() {
            Some(p) => p.edge.clone(),
            None => return Err(MatchingError::EmptyPattern),
        };
        let mut sum = 0.0;
        for part in &parts {
            if part.edge != first_edge {
                return Err(MatchingError::MixedEdges {
                    expected: first_edge,
                    found: part.edge.clone(),
                });
            }
            if !(part.amount > 0.0 && part.amount <= 1.0) {
                return Err(MatchingError::BadAmount {
                    edge: first_edge,
                    amount: part.amount,
                });
            }
            if (part.start - sum).abs() > COVERAGE_TOLERANCE {
                return Err(MatchingError::BadStart {
                    edge: first_edge,
                    start: part.start,
                    expected: sum,
                });
            }
            sum += part.amount;
        }
        if (sum - 1.0).abs() > COVERAGE_TOLERANCE {
            return Err(MatchingError::BadCoverage { edge: first_edge, sum });
        }
        Ok(Self { parts })
    }

    /// A single full-length fragment covering the edge.
    pub fn single(part: EdgePart) -> Result<Self, MatchingError> {
        Self::new(vec![part])
    }

    pub fn edge(&self) -> &str {
        &self.parts[0].edge
    }

    pub fn parts(&self) -> &[EdgePart] {
        &self.parts
    }
}

/// A value under a logical slot label.
///
/// The same fragment can appear under different labels within one
/// tiling definition; the label tells the slots apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Labeled<T> {
    pub label: String,
    pub value: T,
}

impl<T> Labeled<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self { label: label.into(), value }
    }
}

/// Strict one-to-one matching between labeled fragments.
///
/// Backed by an `AdjacencyGraph` with every node held to degree one.
/// Pair order is preserved for deterministic master-tile derivation.
#[derive(Debug, Clone, Default)]
pub struct EdgePartAdjacencies {
    graph: AdjacencyGraph<Labeled<EdgePart>>,
    order: Vec<(Labeled<EdgePart>, Labeled<EdgePart>)>,
}

impl EdgePartAdjacencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `a ↔ b`. Errors if `a == b` or either side is already
    /// part of another adjacency.
    pub fn add(
        &mut self,
        a: Labeled<EdgePart>,
        b: Labeled<EdgePart>,
    ) -> Result<(), MatchingError> {
        if a == b {
            return Err(MatchingError::SelfAdjacency);
        }
        for side in [&a, &b] {
            if self.graph.degree(side) > 0 {
                return Err(MatchingError::AlreadyMatched {
                    label: side.label.clone(),
                    edge: side.value.edge.clone(),
                });
            }
        }
        self.graph.add(a.clone(), b.clone())?;
        self.order.push((a, b));
        Ok(())
    }

    /// Remove the adjacency containing `a`. Returns the former partner.
    pub fn remove(&mut self, a: &Labeled<EdgePart>) -> Option<Labeled<EdgePart>> {
        let partner = self.partner(a)?.clone();
        self.graph.remove(a, &partner);
        self.order.retain(|(x, y)| x != a && y != a);
        Some(partner)
    }

    pub fn contains(&self, a: &Labeled<EdgePart>) -> bool {
        self.graph.degree(a) > 0
    }

    /// The fragment matched with `a`, if any.
    pub fn partner(&self, a: &Labeled<EdgePart>) -> Option<&Labeled<EdgePart>> {
        self.graph.adjacent(a).next()
    }

    /// Number of registered adjacencies.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Pairs in registration order.
    pub fn pairs(&self) -> impl Iterator<Item = &(Labeled<EdgePart>, Labeled<EdgePart>)> {
        self.order.iter()
    }
}

/// Realized world-space endpoints of a fragment under a placement.
#[derive(Debug, Clone, Copy)]
pub struct EdgePartPosition {
    pub start: Point,
    pub end: Point,
    pub clockwise: bool,
}

impl EdgePartPosition {
    /// Sample the fragment's endpoints on its owning edge within
    /// `shape`, under `transform`. Endpoints are ordered by the
    /// fragment's declared traversal direction; the winding flag is the
    /// realized one, flipped from the declared direction when the
    /// placement reflects.
    ///
    /// Panics if the shape has no edge of the fragment's name; patterns
    /// are validated against their template at construction, so a miss
    /// here is a wiring bug, not bad input.
    pub fn from_part(part: &EdgePart, shape: &Shape, transform: &Transform) -> Self {
        let (_, edge) = shape.edge_by_name(&part.edge).unwrap_or_else(|| {
            panic!(
                "fragment references edge `{}` which shape `{}` does not have",
                part.edge,
                shape.template_name()
            )
        });
        let p0 = transform.transform_point(edge.point_at(part.start));
        let p1 = transform.transform_point(edge.point_at(part.start + part.amount));
        let reflected = transform.determinant() < 0.0;
        let clockwise = part.direction.is_clockwise() != reflected;
        if part.direction.is_clockwise() {
            Self { start: p0, end: p1, clockwise }
        } else {
            Self { start: p1, end: p0, clockwise }
        }
    }

    /// The rigid map gluing this fragment onto `other`.
    ///
    /// Maps the directed endpoints start→start, end→end. When both
    /// fragments realize the same winding they cannot be glued without
    /// a mirror flip, so the map is composed with a reflection across
    /// the target segment. Fragments of opposite realized winding glue
    /// directly.
    pub fn transform_to(&self, other: &EdgePartPosition) -> Transform {
        let direct = similarity_between(self.start, self.end, other.start, other.end);
        if self.clockwise == other.clockwise {
            direct.then(&reflection_across(other.start, other.end))
        } else {
            direct
        }
    }
}

/// A fragment together with its sub-curve of the owning edge, in
/// master-local space. Used for drawing and hit-testing placed tiles.
#[derive(Debug, Clone)]
pub struct EdgePartShape {
    pub part: EdgePart,
    pub curve: Curve,
}

impl EdgePartShape {
    /// Decompose an edge's curve along a pattern by successive splits.
    pub fn decompose(
        edge_curve: &Curve,
        pattern: &EdgePattern,
    ) -> Result<Vec<EdgePartShape>, GeometryError> {
        let parts = pattern.parts();
        let mut out = Vec::with_capacity(parts.len());
        let mut rest = edge_curve.clone();
        let mut consumed = 0.0;
        for (i, part) in parts.iter().enumerate() {
            if i + 1 == parts.len() {
                out.push(EdgePartShape { part: part.clone(), curve: rest });
                break;
            }
            let t = part.amount / (1.0 - consumed);
            let (head, tail) = rest.split(t)?;
            out.push(EdgePartShape { part: part.clone(), curve: head });
            rest = tail;
            consumed += part.amount;
        }
        Ok(out)
    }
}
