//! Spatial index over placed tiles.
//!
//! Placed tiles live in a slot arena with stable ids. Every fragment of
//! every placed tile registers under a canonical segment key: its world
//! endpoints rounded to 3 decimals and order-normalized, so the two
//! tiles approaching one physical boundary from either side produce the
//! same key despite different transform chains. As soon as a key has
//! been seen from both sides the two fragments are wired as neighbours,
//! in both directions. A boundary segment can never be shared by three
//! tiles; a third registration is a fatal invariant violation.

use crate::geometry::Point;
use crate::tile::{PlacedId, PlacedTile, Tile};
use std::collections::HashMap;

/// Rounding unit for segment keys: 3 decimal places.
const KEY_SCALE: f64 = 1000.0;

/// Canonical key for one boundary segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentKey {
    a: (i64, i64),
    b: (i64, i64),
}

impl SegmentKey {
    /// Round both endpoints to milli-units and order them
    /// lexicographically by x, then y.
    pub fn new(p: Point, q: Point) -> Self {
        let a = ((p.x * KEY_SCALE).round() as i64, (p.y * KEY_SCALE).round() as i64);
        let b = ((q.x * KEY_SCALE).round() as i64, (q.y * KEY_SCALE).round() as i64);
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }
}

/// One side of a boundary segment: which placed tile, which fragment.
type Side = (PlacedId, usize);

struct Slot<S> {
    tile: PlacedTile<S>,
    keys: Vec<SegmentKey>,
}

/// The working set of placed tiles, round-tripped between growth calls.
pub struct TileSet<S> {
    slots: Vec<Option<Slot<S>>>,
    free: Vec<usize>,
    segments: HashMap<SegmentKey, Vec<Side>>,
    len: usize,
}

impl<S> TileSet<S> {
    pub fn new() -> Self {
        Self { slots: Vec::new(), free: Vec::new(), segments: HashMap::new(), len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, id: PlacedId) -> Option<&PlacedTile<S>> {
        self.slots.get(id.0).and_then(|s| s.as_ref()).map(|s| &s.tile)
    }

    pub(crate) fn get_mut(&mut self, id: PlacedId) -> Option<&mut PlacedTile<S>> {
        self.slots.get_mut(id.0).and_then(|s| s.as_mut()).map(|s| &mut s.tile)
    }

    /// Live ids in slot order.
    pub fn ids(&self) -> Vec<PlacedId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| PlacedId(i))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlacedId, &PlacedTile<S>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (PlacedId(i), &s.tile)))
    }

    /// Insert a placed tile, registering every fragment's boundary
    /// segment and wiring neighbour links for segments now seen from
    /// both sides.
    ///
    /// `master` must be the tile's master: fragment endpoints are
    /// realized from its geometry under the placed transform.
    ///
    /// Panics if some segment already has two tiles.
    pub fn insert(&mut self, tile: PlacedTile<S>, master: &Tile) -> PlacedId {
        let world = tile.transform();
        let keys: Vec<SegmentKey> = (0..master.parts().len())
            .map(|i| {
                let pos = master.part_position(i, &world);
                SegmentKey::new(pos.start, pos.end)
            })
            .collect();

        let index = match self.free.pop() {
            Some(i) => i,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };
        let id = PlacedId(index);

        let mut wired: Vec<(usize, Side)> = Vec::new();
        for (part, key) in keys.iter().enumerate() {
            let sides = self.segments.entry(*key).or_default();
            if sides.len() >= 2 {
                panic!(
                    "boundary segment {:?} is already shared by two tiles; \
                     a third tile cannot join it",
                    key
                );
            }
            if let Some(&other) = sides.first() {
                wired.push((part, other));
            }
            sides.push((id, part));
        }

        let mut tile = tile;
        for &(part, (other_id, other_part)) in &wired {
            tile.set_neighbor(part, other_id);
            let other = self
                .slots[other_id.0]
                .as_mut()
                .unwrap_or_else(|| panic!("segment index references dead tile {:?}", other_id));
            other.tile.set_neighbor(other_part, id);
        }

        self.slots[index] = Some(Slot { tile, keys });
        self.len += 1;
        id
    }

    /// Remove a placed tile, severing its neighbour links in both
    /// directions and unregistering its boundary segments.
    pub fn detach(&mut self, id: PlacedId) -> Option<PlacedTile<S>> {
        let slot = self.slots.get_mut(id.0)?.take()?;
        for key in &slot.keys {
            if let Some(sides) = self.segments.get_mut(key) {
                sides.retain(|(tile, _)| *tile != id);
                if sides.is_empty() {
                    self.segments.remove(key);
                }
            }
        }
        for neighbor in slot.tile.neighbors().to_vec().into_iter().flatten() {
            if let Some(other) = self.get_mut(neighbor) {
                other.clear_neighbor_to(id);
            }
        }
        self.free.push(id.0);
        self.len -= 1;
        Some(slot.tile)
    }
}

impl<S> Default for TileSet<S> {
    fn default() -> Self {
        Self::new()
    }
}
