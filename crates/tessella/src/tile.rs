//! Master tiles and their placed occurrences.
//!
//! A `Tile` is the master geometric payload for one labeled shape
//! occurrence in a tiling definition: its own `Shape` instance, a base
//! transform, and the decomposition of every edge into per-fragment
//! sub-curves. A `PlacedTile` is one occurrence in the growing tiling:
//! a world transform, a paint style, and up to one neighbour link per
//! fragment. `TileRef` gives consumers a single tagged view over both.

use crate::curve::{CurveHit, GeometryError};
use crate::geometry::{Point, Rect, Transform};
use crate::matching::{EdgePart, EdgePartPosition, EdgePartShape};
use crate::shape::Shape;
use crate::template::{Template, TemplateError, TilingDefinition};

/// Index of a master tile within its `Tiling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub usize);

/// Index of a placed tile within a `TileSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacedId(pub usize);

/// Master geometric payload for one labeled shape occurrence.
#[derive(Debug, Clone)]
pub struct Tile {
    label: String,
    shape: Shape,
    transform: Transform,
    parts: Vec<EdgePartShape>,
}

impl Tile {
    /// Instantiate the labeled shape and decompose each of its edges
    /// along the definition's pattern, in template edge order.
    pub fn build(
        label: impl Into<String>,
        template: &Template,
        shape_name: &str,
        definition: &TilingDefinition,
    ) -> Result<Self, TemplateError> {
        let shape_template = template
            .shape(shape_name)
            .unwrap_or_else(|| panic!("no shape template named `{}`", shape_name));
        let shape = Shape::new(shape_template);
        let mut parts = Vec::new();
        for edge in shape.edges() {
            let pattern = definition.pattern(edge.name()).unwrap_or_else(|| {
                panic!(
                    "definition `{}` has no pattern for edge `{}`",
                    definition.id(),
                    edge.name()
                )
            });
            parts.extend(EdgePartShape::decompose(edge.curve(), pattern)?);
        }
        Ok(Self { label: label.into(), shape, transform: Transform::identity(), parts })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Base placement of the master itself.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// All edge fragments with their sub-curves, flattened in edge
    /// order then pattern order. Fragment indices used for neighbour
    /// slots refer to this list.
    pub fn parts(&self) -> &[EdgePartShape] {
        &self.parts
    }

    /// Position of the fragment at `index` under a world transform.
    pub fn part_position(&self, index: usize, world: &Transform) -> EdgePartPosition {
        EdgePartPosition::from_part(&self.parts[index].part, &self.shape, world)
    }

    /// Position of an arbitrary fragment of this tile's shape.
    pub fn position_of(&self, part: &EdgePart, world: &Transform) -> EdgePartPosition {
        EdgePartPosition::from_part(part, &self.shape, world)
    }

    /// Approximate bounds of the whole tile under a world transform.
    ///
    /// Every edge's hull points go into one box; a union of per-edge
    /// boxes would drop axis-aligned edges, whose zero-area boxes
    /// `Box2D::union` treats as empty.
    pub fn bounds(&self, world: &Transform) -> Rect {
        let mut points = Vec::new();
        for edge in self.shape.edges() {
            edge.curve().hull_points(world, &mut points);
        }
        if points.is_empty() {
            panic!("shape `{}` has no edges", self.shape.template_name());
        }
        Rect::from_points(points)
    }
}

/// A placed occurrence of a master tile in the growing tiling.
///
/// Created during growth; mutated only to set or clear neighbour links
/// and the paint style; detached when it leaves the retained viewport.
#[derive(Debug, Clone)]
pub struct PlacedTile<S> {
    label: String,
    master: TileId,
    transform: Transform,
    style: S,
    neighbors: Vec<Option<PlacedId>>,
}

impl<S> PlacedTile<S> {
    pub fn new(
        label: impl Into<String>,
        master: TileId,
        transform: Transform,
        style: S,
        part_count: usize,
    ) -> Self {
        Self {
            label: label.into(),
            master,
            transform,
            style,
            neighbors: vec![None; part_count],
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn master(&self) -> TileId {
        self.master
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn style(&self) -> &S {
        &self.style
    }

    pub fn set_style(&mut self, style: S) {
        self.style = style;
    }

    /// Neighbour per fragment, indexed like the master's `parts()`.
    pub fn neighbors(&self) -> &[Option<PlacedId>] {
        &self.neighbors
    }

    /// An open tile still has at least one unmatched fragment.
    pub fn is_open(&self) -> bool {
        self.neighbors.iter().any(Option::is_none)
    }

    pub(crate) fn set_neighbor(&mut self, index: usize, id: PlacedId) {
        self.neighbors[index] = Some(id);
    }

    pub(crate) fn clear_neighbor_to(&mut self, id: PlacedId) {
        for slot in &mut self.neighbors {
            if *slot == Some(id) {
                *slot = None;
            }
        }
    }
}

/// A tile hit: which fragment was struck, where, and how far away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileHit {
    pub part: usize,
    pub hit: CurveHit,
}

/// Tagged view over a master tile or a placed occurrence.
///
/// Consumers branch on the tag once; geometry always resolves through
/// the underlying master.
#[derive(Debug, Clone, Copy)]
pub enum TileRef<'a, S> {
    Master(&'a Tile),
    Placed { placed: &'a PlacedTile<S>, master: &'a Tile },
}

impl<'a, S> TileRef<'a, S> {
    /// The underlying master, whichever variant this is.
    pub fn master(&self) -> &'a Tile {
        match self {
            TileRef::Master(tile) => tile,
            TileRef::Placed { master, .. } => master,
        }
    }

    /// World transform of this occurrence.
    pub fn world_transform(&self) -> Transform {
        match self {
            TileRef::Master(tile) => tile.transform(),
            TileRef::Placed { placed, .. } => placed.transform(),
        }
    }

    pub fn label(&self) -> &'a str {
        match self {
            TileRef::Master(tile) => tile.label(),
            TileRef::Placed { placed, .. } => placed.label(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.master().bounds(&self.world_transform())
    }

    /// Outline of the tile as world-space fragment curves, in fragment
    /// order. This is the drawing surface; rendering itself lives
    /// outside the engine.
    pub fn outline_points(&self, samples_per_part: usize) -> Vec<Point> {
        let world = self.world_transform();
        let mut points = Vec::new();
        for part in self.master().parts() {
            for i in 0..samples_per_part.max(1) {
                let t = i as f64 / samples_per_part.max(1) as f64;
                points.push(world.transform_point(part.curve.sample(t)));
            }
        }
        points
    }

    /// Nearest fragment within `tolerance` of `point`.
    pub fn hit_test(
        &self,
        point: Point,
        tolerance: f64,
    ) -> Result<Option<TileHit>, GeometryError> {
        let world = self.world_transform();
        let mut best: Option<TileHit> = None;
        for (index, part) in self.master().parts().iter().enumerate() {
            if let Some(hit) = part.curve.hit_test(point, tolerance, &world)? {
                if best.as_ref().map_or(true, |b| hit.distance < b.hit.distance) {
                    best = Some(TileHit { part: index, hit });
                }
            }
        }
        Ok(best)
    }
}
