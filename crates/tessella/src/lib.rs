//! # tessella
//!
//! Incremental generation of an unbounded 2-D tiling from a finite
//! template of polygon shapes and edge-matching rules.
//!
//! A [`Template`] bundles shape blueprints with one or more
//! [`TilingDefinition`]s: per-edge fragment patterns plus the adjacency
//! wiring saying which fragment glues to which. A [`Tiling`] binds one
//! definition and grows a [`TileSet`] of placed tiles to cover a
//! requested viewport, reusing the previous working set across calls.
//!
//! ```
//! use tessella::{
//!     EdgePart, EdgePartAdjacencies, EdgePartDirection::*, EdgePattern, Labeled,
//!     Rect, ShapeTemplate, Template, TileSet, Tiling, TilingDefinition, point,
//! };
//!
//! // A unit square whose opposite edges glue together.
//! let square = ShapeTemplate::new(
//!     "square",
//!     vec!["a".into(), "b".into(), "c".into(), "d".into()],
//!     vec!["v0".into(), "v1".into(), "v2".into(), "v3".into()],
//!     vec![point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)],
//! )?;
//! let patterns = vec![
//!     EdgePattern::single(EdgePart::full("h", "a", ClockwiseOut))?,
//!     EdgePattern::single(EdgePart::full("v", "b", ClockwiseOut))?,
//!     EdgePattern::single(EdgePart::full("h", "c", CounterClockwiseOut))?,
//!     EdgePattern::single(EdgePart::full("v", "d", CounterClockwiseOut))?,
//! ];
//! let mut adjacencies = EdgePartAdjacencies::new();
//! adjacencies.add(
//!     Labeled::new("A", EdgePart::full("h", "a", ClockwiseOut)),
//!     Labeled::new("A", EdgePart::full("h", "c", CounterClockwiseOut)),
//! )?;
//! adjacencies.add(
//!     Labeled::new("A", EdgePart::full("v", "b", ClockwiseOut)),
//!     Labeled::new("A", EdgePart::full("v", "d", CounterClockwiseOut)),
//! )?;
//!
//! let template = Template::new(
//!     vec![square],
//!     vec![],
//!     vec![TilingDefinition::new("grid", patterns, adjacencies)?],
//! )?;
//! let tiling = Tiling::new(&template, "grid")?;
//!
//! let mut tiles = TileSet::new();
//! let viewport = Rect::new(point(-2.0, -2.0), point(3.0, 3.0));
//! let ids = tiling.tiles(&viewport, &mut |_, _| "plain", &mut tiles);
//! assert!(ids.len() >= 25);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod curve;
pub mod geometry;
pub mod graph;
pub mod matching;
pub mod shape;
pub mod template;
pub mod tile;
pub mod tileset;
pub mod tiling;

// Re-export the main surface at the crate root.
pub use curve::{Curve, CurveHit, GeometryError};
pub use geometry::{Angle, Point, Rect, Transform, Vector, point, vector};
pub use graph::{AdjacencyGraph, GraphError};
pub use matching::{
    EdgePart, EdgePartAdjacencies, EdgePartDirection, EdgePartPosition, EdgePartShape,
    EdgePattern, Labeled, MatchingError,
};
pub use shape::{Edge, EdgeId, Shape, ShapeError, ShapeSet, ShapeTemplate, Vertex, VertexId};
pub use template::{ShapeConstraint, Template, TemplateError, TilingDefinition};
pub use tile::{PlacedId, PlacedTile, Tile, TileHit, TileId, TileRef};
pub use tileset::{SegmentKey, TileSet};
pub use tiling::Tiling;
