//! Validated tiling templates.
//!
//! A `Template` bundles shape blueprints, opaque shape constraints and
//! one or more `TilingDefinition`s. All validation happens once, in the
//! constructor; afterwards the template is immutable and side-effect
//! free to query.

use crate::curve::GeometryError;
use crate::matching::{EdgePartAdjacencies, EdgePattern};
use crate::shape::{ShapeSet, ShapeTemplate};
use std::collections::{HashMap, HashSet};

/// Opaque predicate over a template's instantiated shapes.
///
/// Consulted once at `Template` construction: a constraint returning
/// false means the template's initial geometry is invalid.
pub type ShapeConstraint = Box<dyn Fn(&ShapeSet) -> bool>;

/// Errors from template validation.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateError {
    NoShapes,
    NoDefinitions,
    DuplicateShapeName(String),
    /// Edge/vertex names must be distinct across all shape templates.
    DuplicateEdgeOrVertexName(String),
    DuplicateDefinitionId(String),
    /// Two patterns in one definition cover the same edge.
    DuplicatePattern { definition: String, edge: String },
    /// A definition lacks a pattern for one of the template's edges.
    MissingPattern { definition: String, edge: String },
    /// A definition has a pattern for an edge the template doesn't have.
    UnknownPatternEdge { definition: String, edge: String },
    /// An adjacency references a fragment absent from the patterns.
    UnknownAdjacencyPart { definition: String, label: String, edge: String },
    /// A definition has no adjacencies; such a tiling cannot grow.
    NoAdjacencies { definition: String },
    /// Shape constraint at the given index rejected the geometry.
    ConstraintFailed { index: usize },
    UnknownDefinition(String),
    Geometry(GeometryError),
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::NoShapes => write!(f, "template needs at least one shape"),
            TemplateError::NoDefinitions => {
                write!(f, "template needs at least one tiling definition")
            }
            TemplateError::DuplicateShapeName(name) => {
                write!(f, "duplicate shape name `{}`", name)
            }
            TemplateError::DuplicateEdgeOrVertexName(name) => {
                write!(f, "edge/vertex name `{}` is used by more than one shape", name)
            }
            TemplateError::DuplicateDefinitionId(id) => {
                write!(f, "duplicate tiling definition id `{}`", id)
            }
            TemplateError::DuplicatePattern { definition, edge } => {
                write!(f, "definition `{}` has two patterns for edge `{}`", definition, edge)
            }
            TemplateError::MissingPattern { definition, edge } => {
                write!(f, "definition `{}` has no pattern for edge `{}`", definition, edge)
            }
            TemplateError::UnknownPatternEdge { definition, edge } => {
                write!(f, "definition `{}` covers unknown edge `{}`", definition, edge)
            }
            TemplateError::UnknownAdjacencyPart { definition, label, edge } => write!(
                f,
                "definition `{}` wires label `{}` to a fragment not present in the pattern of edge `{}`",
                definition, label, edge
            ),
            TemplateError::NoAdjacencies { definition } => {
                write!(f, "definition `{}` has no adjacencies", definition)
            }
            TemplateError::ConstraintFailed { index } => {
                write!(f, "shape constraint #{} rejected the template geometry", index)
            }
            TemplateError::UnknownDefinition(id) => {
                write!(f, "no tiling definition with id `{}`", id)
            }
            TemplateError::Geometry(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TemplateError {}

impl From<GeometryError> for TemplateError {
    fn from(e: GeometryError) -> Self {
        TemplateError::Geometry(e)
    }
}

/// One complete edge-matching configuration for a template.
pub struct TilingDefinition {
    id: String,
    patterns: HashMap<String, EdgePattern>,
    adjacencies: EdgePartAdjacencies,
    condition: Option<Box<dyn Fn(&ShapeSet) -> bool>>,
}

impl TilingDefinition {
    /// Bundle patterns (one per edge) and the adjacency wiring.
    ///
    /// Two patterns for the same edge are rejected here; coverage of
    /// the template's full edge set is checked by `Template::new`,
    /// which knows the edge set.
    pub fn new(
        id: impl Into<String>,
        patterns: Vec<EdgePattern>,
        adjacencies: EdgePartAdjacencies,
    ) -> Result<Self, TemplateError> {
        let id = id.into();
        let mut map = HashMap::new();
        for pattern in patterns {
            let edge = pattern.edge().to_string();
            if map.insert(edge.clone(), pattern).is_some() {
                return Err(TemplateError::DuplicatePattern { definition: id, edge });
            }
        }
        Ok(Self { id, patterns: map, adjacencies, condition: None })
    }

    /// Attach an applicability condition, used to pick among
    /// alternative definitions of one template.
    pub fn with_condition(mut self, condition: impl Fn(&ShapeSet) -> bool + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pattern(&self, edge: &str) -> Option<&EdgePattern> {
        self.patterns.get(edge)
    }

    pub fn adjacencies(&self) -> &EdgePartAdjacencies {
        &self.adjacencies
    }

    /// Whether this definition applies to the given geometry.
    /// Definitions without a condition always apply.
    pub fn applies_to(&self, shapes: &ShapeSet) -> bool {
        self.condition.as_ref().map_or(true, |c| c(shapes))
    }
}

impl std::fmt::Debug for TilingDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TilingDefinition")
            .field("id", &self.id)
            .field("patterns", &self.patterns)
            .field("adjacencies", &self.adjacencies)
            .field("condition", &self.condition.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Validated, immutable container of shape templates, constraints and
/// tiling definitions.
pub struct Template {
    shapes: Vec<ShapeTemplate>,
    definitions: Vec<TilingDefinition>,
    /// Edge name → owning shape name, across all shape templates.
    edge_owner: HashMap<String, String>,
    /// The shapes instantiated at their template positions.
    base_shapes: ShapeSet,
}

impl Template {
    /// Validate and build. See the module docs for the rule set; every
    /// violated precondition maps to a distinct `TemplateError`.
    pub fn new(
        shapes: Vec<ShapeTemplate>,
        constraints: Vec<ShapeConstraint>,
        definitions: Vec<TilingDefinition>,
    ) -> Result<Self, TemplateError> {
        if shapes.is_empty() {
            return Err(TemplateError::NoShapes);
        }
        if definitions.is_empty() {
            return Err(TemplateError::NoDefinitions);
        }

        let mut shape_names = HashSet::new();
        let mut member_names = HashSet::new();
        let mut edge_owner = HashMap::new();
        for shape in &shapes {
            if !shape_names.insert(shape.name().to_string()) {
                return Err(TemplateError::DuplicateShapeName(shape.name().to_string()));
            }
            for name in shape.edge_names().iter().chain(shape.vertex_names()) {
                if !member_names.insert(name.clone()) {
                    return Err(TemplateError::DuplicateEdgeOrVertexName(name.clone()));
                }
            }
            for edge in shape.edge_names() {
                edge_owner.insert(edge.clone(), shape.name().to_string());
            }
        }

        let mut definition_ids = HashSet::new();
        for definition in &definitions {
            if !definition_ids.insert(definition.id().to_string()) {
                return Err(TemplateError::DuplicateDefinitionId(definition.id().to_string()));
            }
            Self::check_definition(definition, &edge_owner)?;
        }

        let base_shapes = ShapeSet::new(&shapes);
        for (index, constraint) in constraints.iter().enumerate() {
            if !constraint(&base_shapes) {
                return Err(TemplateError::ConstraintFailed { index });
            }
        }

        Ok(Self { shapes, definitions, edge_owner, base_shapes })
    }

    /// Patterns must cover exactly the template's edge set, and every
    /// wired fragment must exist in the pattern of its edge.
    fn check_definition(
        definition: &TilingDefinition,
        edge_owner: &HashMap<String, String>,
    ) -> Result<(), TemplateError> {
        for edge in edge_owner.keys() {
            if definition.pattern(edge).is_none() {
                return Err(TemplateError::MissingPattern {
                    definition: definition.id().to_string(),
                    edge: edge.clone(),
                });
            }
        }
        for edge in definition.patterns.keys() {
            if !edge_owner.contains_key(edge) {
                return Err(TemplateError::UnknownPatternEdge {
                    definition: definition.id().to_string(),
                    edge: edge.clone(),
                });
            }
        }
        if definition.adjacencies().is_empty() {
            return Err(TemplateError::NoAdjacencies {
                definition: definition.id().to_string(),
            });
        }
        for (a, b) in definition.adjacencies().pairs() {
            for side in [a, b] {
                let known = definition
                    .pattern(&side.value.edge)
                    .is_some_and(|p| p.parts().contains(&side.value));
                if !known {
                    return Err(TemplateError::UnknownAdjacencyPart {
                        definition: definition.id().to_string(),
                        label: side.label.clone(),
                        edge: side.value.edge.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn shapes(&self) -> &[ShapeTemplate] {
        &self.shapes
    }

    pub fn shape(&self, name: &str) -> Option<&ShapeTemplate> {
        self.shapes.iter().find(|s| s.name() == name)
    }

    pub fn definitions(&self) -> &[TilingDefinition] {
        &self.definitions
    }

    pub fn definition(&self, id: &str) -> Option<&TilingDefinition> {
        self.definitions.iter().find(|d| d.id() == id)
    }

    /// First definition whose applicability condition accepts the
    /// template's base geometry.
    pub fn applicable_definition(&self) -> Option<&TilingDefinition> {
        self.definitions.iter().find(|d| d.applies_to(&self.base_shapes))
    }

    /// Shapes instantiated at their template positions.
    pub fn base_shapes(&self) -> &ShapeSet {
        &self.base_shapes
    }

    /// The shape owning the named edge.
    pub fn edge_owner(&self, edge: &str) -> Option<&str> {
        self.edge_owner.get(edge).map(String::as_str)
    }
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("shapes", &self.shapes)
            .field("definitions", &self.definitions)
            .finish()
    }
}
