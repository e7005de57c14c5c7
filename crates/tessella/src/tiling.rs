//! Incremental tiling growth.
//!
//! A `Tiling` binds one template to one of its tiling definitions and
//! grows a working set of placed tiles to cover a requested viewport:
//! stale tiles are pruned, a seed is planted if nothing survives, and a
//! breadth-first expansion fills every open fragment by gluing the
//! matching master tile into place.
//!
//! The engine is synchronous and single-threaded: one call runs its
//! whole expansion to completion, and the caller round-trips the
//! returned `TileSet` into the next call. Callers invoking it from a
//! render loop must serialize calls per `Tiling`.

use crate::curve::GeometryError;
use crate::geometry::{Point, Rect, Transform};
use crate::matching::{EdgePartAdjacencies, Labeled};
use crate::template::{Template, TemplateError};
use crate::tile::{PlacedId, PlacedTile, Tile, TileHit, TileId, TileRef};
use crate::tileset::TileSet;
use log::{debug, trace};
use std::collections::HashMap;
use std::collections::VecDeque;

/// Growth engine for one (template, definition) pair.
pub struct Tiling {
    definition_id: String,
    masters: Vec<Tile>,
    /// (label, shape name) → master.
    master_index: HashMap<(String, String), TileId>,
    adjacencies: EdgePartAdjacencies,
    /// Edge name → owning shape name.
    edge_owner: HashMap<String, String>,
}

impl Tiling {
    /// Resolve the definition and derive its master tiles: one per
    /// distinct (label, owning shape) pair appearing in the adjacency
    /// wiring, in registration order. The first derived master seeds
    /// empty tilings.
    pub fn new(template: &Template, definition_id: &str) -> Result<Self, TemplateError> {
        let definition = template
            .definition(definition_id)
            .ok_or_else(|| TemplateError::UnknownDefinition(definition_id.to_string()))?;

        let mut edge_owner = HashMap::new();
        for shape in template.shapes() {
            for edge in shape.edge_names() {
                edge_owner.insert(edge.clone(), shape.name().to_string());
            }
        }

        let mut masters = Vec::new();
        let mut master_index = HashMap::new();
        for (a, b) in definition.adjacencies().pairs() {
            for side in [a, b] {
                let shape_name = edge_owner
                    .get(&side.value.edge)
                    .unwrap_or_else(|| {
                        panic!("edge `{}` has no owning shape", side.value.edge)
                    })
                    .clone();
                let key = (side.label.clone(), shape_name.clone());
                if master_index.contains_key(&key) {
                    continue;
                }
                let tile = Tile::build(side.label.clone(), template, &shape_name, definition)?;
                master_index.insert(key, TileId(masters.len()));
                masters.push(tile);
            }
        }
        debug!(
            "tiling `{}`: {} master tile(s) derived",
            definition_id,
            masters.len()
        );

        Ok(Self {
            definition_id: definition_id.to_string(),
            masters,
            master_index,
            adjacencies: definition.adjacencies().clone(),
            edge_owner,
        })
    }

    pub fn definition_id(&self) -> &str {
        &self.definition_id
    }

    /// Master tiles in derivation order.
    pub fn masters(&self) -> &[Tile] {
        &self.masters
    }

    /// Tagged view of a placed tile together with its master.
    pub fn tile_ref<'a, S>(&'a self, set: &'a TileSet<S>, id: PlacedId) -> Option<TileRef<'a, S>> {
        let placed = set.get(id)?;
        Some(TileRef::Placed { placed, master: &self.masters[placed.master().0] })
    }

    /// Grow (and shrink) the working set to cover `bounds`.
    ///
    /// `style` is called once per newly created tile, with the new
    /// tile's master and world transform, and must return its paint
    /// style. Returns the ids of all live tiles.
    ///
    /// Panics if the definition's wiring is incomplete: an open
    /// fragment with no adjacency entry, or an adjacency resolving to a
    /// fragment no master tile owns, is a malformed template, not a
    /// recoverable condition.
    pub fn tiles<S>(
        &self,
        bounds: &Rect,
        style: &mut dyn FnMut(&Tile, &Transform) -> S,
        set: &mut TileSet<S>,
    ) -> Vec<PlacedId> {
        let mut queue: VecDeque<PlacedId> = VecDeque::new();

        // Prune: evict tiles no longer touching the viewport, severing
        // their links to retained neighbours.
        let before = set.len();
        for id in set.ids() {
            let tile = set.get(id).unwrap_or_else(|| panic!("live id {:?} missing", id));
            let master = &self.masters[tile.master().0];
            if !master.bounds(&tile.transform()).intersects(bounds) {
                set.detach(id);
            }
        }
        debug!(
            "tiling `{}`: retained {} of {} tile(s)",
            self.definition_id,
            set.len(),
            before
        );

        for (id, tile) in set.iter() {
            if tile.is_open() {
                queue.push_back(id);
            }
        }

        // Seed if nothing survived. The growth window is widened to
        // include the seed so expansion can walk from the seed to a
        // viewport far from the origin.
        let mut window = *bounds;
        if set.is_empty() {
            let seed = &self.masters[0];
            let transform = seed.transform();
            window = window.union(&seed.bounds(&transform));
            let s = style(seed, &transform);
            let placed =
                PlacedTile::new(seed.label(), TileId(0), transform, s, seed.parts().len());
            let id = set.insert(placed, seed);
            queue.push_back(id);
            debug!("tiling `{}`: seeded with master `{}`", self.definition_id, seed.label());
        }

        // Breadth-first expansion: every open fragment of a dequeued
        // tile gets its matching tile glued on; only tiles touching the
        // window keep expanding.
        let mut created = 0usize;
        while let Some(id) = queue.pop_front() {
            let part_count = {
                let Some(tile) = set.get(id) else { continue };
                self.masters[tile.master().0].parts().len()
            };
            for index in 0..part_count {
                // Re-read: earlier insertions may have wired this slot.
                let (label, transform, master_id) = {
                    let tile = set.get(id).unwrap_or_else(|| panic!("live id {:?} missing", id));
                    if tile.neighbors()[index].is_some() {
                        continue;
                    }
                    (tile.label().to_string(), tile.transform(), tile.master())
                };
                let master = &self.masters[master_id.0];
                let part = &master.parts()[index].part;

                let slot = Labeled::new(label.clone(), part.clone());
                let partner = self.adjacencies.partner(&slot).unwrap_or_else(|| {
                    panic!(
                        "definition `{}` has no adjacency for fragment `{}` of edge `{}` \
                         under label `{}`",
                        self.definition_id, part.id, part.edge, label
                    )
                });
                let adjacent_id = self.master_for(partner);
                let adjacent = &self.masters[adjacent_id.0];

                let from = adjacent.position_of(&partner.value, &adjacent.transform());
                let onto = master.position_of(part, &transform);
                let placement = adjacent.transform().then(&from.transform_to(&onto));

                let s = style(adjacent, &placement);
                let placed = PlacedTile::new(
                    partner.label.clone(),
                    adjacent_id,
                    placement,
                    s,
                    adjacent.parts().len(),
                );
                let tile_bounds = adjacent.bounds(&placement);
                let new_id = set.insert(placed, adjacent);
                created += 1;
                trace!(
                    "tiling `{}`: placed `{}` at ({:.3}, {:.3})",
                    self.definition_id,
                    partner.label,
                    placement.m31,
                    placement.m32
                );
                if tile_bounds.intersects(&window) {
                    queue.push_back(new_id);
                }
            }
        }
        debug!(
            "tiling `{}`: created {} tile(s), working set now {}",
            self.definition_id,
            created,
            set.len()
        );

        set.ids()
    }

    /// Nearest placed tile fragment within `tolerance` of `point`.
    pub fn hit_test<S>(
        &self,
        point: Point,
        tolerance: f64,
        set: &TileSet<S>,
    ) -> Result<Option<(PlacedId, TileHit)>, GeometryError> {
        if tolerance <= 0.0 {
            return Err(GeometryError::ToleranceNotPositive(tolerance));
        }
        let mut best: Option<(PlacedId, TileHit)> = None;
        for (id, placed) in set.iter() {
            let view = TileRef::Placed { placed, master: &self.masters[placed.master().0] };
            let padded = view.bounds().inflate(tolerance, tolerance);
            if !padded.contains(point) {
                continue;
            }
            if let Some(hit) = view.hit_test(point, tolerance)? {
                if best.as_ref().map_or(true, |(_, b)| hit.hit.distance < b.hit.distance) {
                    best = Some((id, hit));
                }
            }
        }
        Ok(best)
    }

    /// The master owning a labeled fragment.
    ///
    /// Panics if no master owns it; masters are derived from the same
    /// adjacency wiring, so a miss means the definition wires a label
    /// to a shape it never instantiates.
    fn master_for(&self, slot: &Labeled<crate::matching::EdgePart>) -> TileId {
        let shape = self.edge_owner.get(&slot.value.edge).unwrap_or_else(|| {
            panic!("edge `{}` has no owning shape", slot.value.edge)
        });
        *self
            .master_index
            .get(&(slot.label.clone(), shape.clone()))
            .unwrap_or_else(|| {
                panic!(
                    "definition `{}` resolves to label `{}` on shape `{}`, \
                     but no master tile owns that fragment",
                    self.definition_id, slot.label, shape
                )
            })
    }
}

impl std::fmt::Debug for Tiling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tiling")
            .field("definition_id", &self.definition_id)
            .field("masters", &self.masters.len())
            .finish()
    }
}
