//! End-to-end growth scenarios: the unit-square grid, working-set
//! stability across calls, and the mirrored right-triangle tiling.

use tessella::{
    EdgePart, EdgePartAdjacencies,
    EdgePartDirection::{ClockwiseOut, CounterClockwiseOut},
    EdgePattern, Labeled, PlacedId, Rect, ShapeTemplate, Template, TileSet, Tiling,
    TilingDefinition, point,
};

/// Unit square with edges a (bottom), b (right), c (top), d (left),
/// wired so that opposite edges glue: a↔c and b↔d, under two
/// alternating slot labels A and B.
fn square_template() -> Template {
    let square = ShapeTemplate::new(
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
    .unwrap();
    let patterns = vec![
        EdgePattern::single(EdgePart::full("h", "a", ClockwiseOut)).unwrap(),
        EdgePattern::single(EdgePart::full("v", "b", ClockwiseOut)).unwrap(),
        EdgePattern::single(EdgePart::full("h", "c", CounterClockwiseOut)).unwrap(),
        EdgePattern::single(EdgePart::full("v", "d", CounterClockwiseOut)).unwrap(),
    ];
    let mut adj = EdgePartAdjacencies::new();
    adj.add(
        Labeled::new("A", EdgePart::full("h", "a", ClockwiseOut)),
        Labeled::new("B", EdgePart::full("h", "c", CounterClockwiseOut)),
    )
    .unwrap();
    adj.add(
        Labeled::new("A", EdgePart::full("v", "b", ClockwiseOut)),
        Labeled::new("B", EdgePart::full("v", "d", CounterClockwiseOut)),
    )
    .unwrap();
    adj.add(
        Labeled::new("B", EdgePart::full("h", "a", ClockwiseOut)),
        Labeled::new("A", EdgePart::full("h", "c", CounterClockwiseOut)),
    )
    .unwrap();
    adj.add(
        Labeled::new("B", EdgePart::full("v", "b", ClockwiseOut)),
        Labeled::new("A", EdgePart::full("v", "d", CounterClockwiseOut)),
    )
    .unwrap();
    let definition = TilingDefinition::new("grid", patterns, adj).unwrap();
    Template::new(vec![square], vec![], vec![definition]).unwrap()
}

/// Lattice coordinates of a placed grid square, from its translation.
fn cell(set: &TileSet<&'static str>, id: PlacedId) -> (i64, i64) {
    let t = set.get(id).unwrap().transform();
    // Linear part must be the identity: axis-aligned, unscaled,
    // unmirrored.
    assert!((t.m11 - 1.0).abs() < 1e-9 && t.m12.abs() < 1e-9);
    assert!(t.m21.abs() < 1e-9 && (t.m22 - 1.0).abs() < 1e-9);
    (t.m31.round() as i64, t.m32.round() as i64)
}

fn snapshot(set: &TileSet<&'static str>) -> Vec<(String, i64, i64)> {
    let mut all: Vec<_> = set
        .iter()
        .map(|(id, tile)| {
            let (x, y) = cell(set, id);
            (tile.label().to_string(), x, y)
        })
        .collect();
    all.sort();
    all
}

#[test]
fn square_grid_covers_viewport() {
    let template = square_template();
    let tiling = Tiling::new(&template, "grid").unwrap();
    let mut set: TileSet<&'static str> = TileSet::new();

    // Bounds roughly 5x the square size, centered at the origin.
    let bounds = Rect::new(point(-2.5, -2.5), point(2.5, 2.5));
    let ids = tiling.tiles(&bounds, &mut |_, _| "paint", &mut set);
    assert!(!ids.is_empty());

    let cells: Vec<(i64, i64)> = ids.iter().map(|&id| cell(&set, id)).collect();

    // No two tiles overlap: every lattice cell appears once.
    let mut unique = cells.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), cells.len(), "overlapping tiles placed");

    // The grid covers the viewport: every cell with any area inside
    // the bounds is present.
    for x in -3..=2 {
        for y in -3..=2 {
            assert!(
                unique.binary_search(&(x, y)).is_ok(),
                "missing grid cell ({}, {})",
                x,
                y
            );
        }
    }

    // Labels alternate like a checkerboard: neighbours never share one.
    for &id in &ids {
        let tile = set.get(id).unwrap();
        for neighbor in tile.neighbors().iter().flatten() {
            assert_ne!(tile.label(), set.get(*neighbor).unwrap().label());
        }
    }
}

#[test]
fn interior_tiles_have_four_opposite_neighbors() {
    let template = square_template();
    let tiling = Tiling::new(&template, "grid").unwrap();
    let mut set: TileSet<&'static str> = TileSet::new();
    let bounds = Rect::new(point(-2.5, -2.5), point(2.5, 2.5));
    let ids = tiling.tiles(&bounds, &mut |_, _| "paint", &mut set);

    let mut by_cell = std::collections::HashMap::new();
    for &id in &ids {
        by_cell.insert(cell(&set, id), id);
    }

    // Fragment order is a, b, c, d; the neighbour behind each fragment
    // sits one cell away, and links back through the opposite edge.
    let offsets = [(0i64, -1i64), (1, 0), (0, 1), (-1, 0)];
    let mut interior_checked = 0;
    for (&(x, y), &id) in &by_cell {
        if x.abs() > 1 || y.abs() > 1 {
            continue;
        }
        let tile = set.get(id).unwrap();
        let neighbors = tile.neighbors();
        assert_eq!(neighbors.iter().flatten().count(), 4, "interior tile not closed");
        for (part, &(dx, dy)) in offsets.iter().enumerate() {
            let neighbor = neighbors[part].expect("interior fragment wired");
            assert_eq!(cell(&set, neighbor), (x + dx, y + dy));
            // The neighbour points back through its opposite edge.
            let opposite = (part + 2) % 4;
            assert_eq!(set.get(neighbor).unwrap().neighbors()[opposite], Some(id));
        }
        interior_checked += 1;
    }
    assert_eq!(interior_checked, 9);
}

#[test]
fn repeated_calls_are_stable() {
    let template = square_template();
    let tiling = Tiling::new(&template, "grid").unwrap();
    let mut set: TileSet<&'static str> = TileSet::new();
    let bounds = Rect::new(point(-2.5, -2.5), point(2.5, 2.5));

    tiling.tiles(&bounds, &mut |_, _| "paint", &mut set);
    let first = snapshot(&set);

    let mut second_styles = 0usize;
    tiling.tiles(
        &bounds,
        &mut |_, _| {
            second_styles += 1;
            "paint"
        },
        &mut set,
    );
    let second = snapshot(&set);

    assert_eq!(first, second, "identical viewport must not churn the working set");
    // No dangling adjacency after the round trip.
    for (id, tile) in set.iter() {
        for neighbor in tile.neighbors().iter().flatten() {
            let back = set.get(*neighbor).expect("neighbour is live");
            assert!(
                back.neighbors().contains(&Some(id)),
                "asymmetric neighbour link"
            );
        }
    }
}

#[test]
fn shifting_viewport_prunes_and_extends() {
    let template = square_template();
    let tiling = Tiling::new(&template, "grid").unwrap();
    let mut set: TileSet<&'static str> = TileSet::new();

    let here = Rect::new(point(-2.5, -2.5), point(2.5, 2.5));
    tiling.tiles(&here, &mut |_, _| "paint", &mut set);

    // Slide the viewport right by two cells: the left columns fall
    // away, new right columns appear.
    let there = Rect::new(point(-0.5, -2.5), point(4.5, 2.5));
    let ids = tiling.tiles(&there, &mut |_, _| "paint", &mut set);
    let cells: Vec<(i64, i64)> = ids.iter().map(|&id| cell(&set, id)).collect();
    assert!(cells.iter().all(|&(x, _)| x >= -2), "stale column retained");
    for x in -1..=4 {
        for y in -3..=2 {
            assert!(cells.contains(&(x, y)), "missing cell ({}, {})", x, y);
        }
    }
}

#[test]
fn union_of_tile_bounds_contains_viewport() {
    let template = square_template();
    let tiling = Tiling::new(&template, "grid").unwrap();
    let mut set: TileSet<&'static str> = TileSet::new();
    // A viewport away from the origin: growth must walk out from the
    // seed to reach it.
    let bounds = Rect::new(point(5.25, 3.25), point(8.75, 6.75));
    let ids = tiling.tiles(&bounds, &mut |_, _| "paint", &mut set);

    let mut union: Option<Rect> = None;
    for &id in &ids {
        let b = tiling.tile_ref(&set, id).unwrap().bounds();
        union = Some(match union {
            Some(u) => u.union(&b),
            None => b,
        });
    }
    let union = union.expect("tiles were produced");
    assert!(union.min.x <= bounds.min.x && union.min.y <= bounds.min.y);
    assert!(union.max.x >= bounds.max.x && union.max.y >= bounds.max.y);
}

/// Right triangle glued to itself across every edge: each pairing has
/// equal winding, so every neighbour is a mirror image. This is the
/// kaleidoscope tiling generated by reflecting the fundamental triangle.
fn mirrored_triangle_template() -> Template {
    let triangle = ShapeTemplate::new(
        "tri",
        vec!["a".into(), "b".into(), "c".into()],
        vec!["v0".into(), "v1".into(), "v2".into()],
        vec![point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0)],
    )
    .unwrap();
    let patterns = vec![
        EdgePattern::single(EdgePart::full("pa", "a", ClockwiseOut)).unwrap(),
        EdgePattern::single(EdgePart::full("pb", "b", ClockwiseOut)).unwrap(),
        EdgePattern::single(EdgePart::full("pc", "c", ClockwiseOut)).unwrap(),
    ];
    let mut adj = EdgePartAdjacencies::new();
    for (id, edge) in [("pa", "a"), ("pb", "b"), ("pc", "c")] {
        adj.add(
            Labeled::new("A", EdgePart::full(id, edge, ClockwiseOut)),
            Labeled::new("B", EdgePart::full(id, edge, ClockwiseOut)),
        )
        .unwrap();
    }
    let definition = TilingDefinition::new("kaleido", patterns, adj).unwrap();
    Template::new(vec![triangle], vec![], vec![definition]).unwrap()
}

#[test]
fn same_winding_neighbors_are_mirrored() {
    let template = mirrored_triangle_template();
    let tiling = Tiling::new(&template, "kaleido").unwrap();
    let mut set: TileSet<()> = TileSet::new();
    let bounds = Rect::new(point(-1.25, -1.25), point(1.25, 1.25));
    let ids = tiling.tiles(&bounds, &mut |_, _| (), &mut set);
    assert!(ids.len() > 4);

    // Orientation alternates with the slot label: A tiles keep the
    // master's handedness, B tiles are flipped.
    for &id in &ids {
        let tile = set.get(id).unwrap();
        let det = tile.transform().determinant();
        match tile.label() {
            "A" => assert!(det > 0.0, "A tile mirrored: det = {}", det),
            "B" => assert!(det < 0.0, "B tile not mirrored: det = {}", det),
            other => panic!("unexpected label `{}`", other),
        }
        // Every wired pair flips handedness.
        for neighbor in tile.neighbors().iter().flatten() {
            let other = set.get(*neighbor).unwrap().transform().determinant();
            assert!(det * other < 0.0, "neighbour shares handedness");
        }
    }

    // The seed's mirror across its bottom edge is the triangle below.
    let seed = set.get(ids[0]).unwrap();
    assert_eq!(seed.label(), "A");
    let below_id = seed.neighbors()[0].expect("bottom edge wired");
    let below = set.get(below_id).unwrap().transform();
    let p = below.transform_point(point(0.25, 0.25));
    assert!((p.x - 0.25).abs() < 1e-9 && (p.y + 0.25).abs() < 1e-9);
}

#[test]
fn glued_fragments_coincide_within_tolerance() {
    let template = square_template();
    let tiling = Tiling::new(&template, "grid").unwrap();
    let mut set: TileSet<&'static str> = TileSet::new();
    let bounds = Rect::new(point(-1.5, -1.5), point(1.5, 1.5));
    let ids = tiling.tiles(&bounds, &mut |_, _| "paint", &mut set);

    for &id in &ids {
        let tile = set.get(id).unwrap();
        let master = &tiling.masters()[tile.master().0];
        for (part, neighbor) in tile.neighbors().iter().enumerate() {
            let Some(neighbor) = neighbor else { continue };
            let my_pos = master.part_position(part, &tile.transform());
            let other = set.get(*neighbor).unwrap();
            let other_master = &tiling.masters()[other.master().0];
            let other_part = other
                .neighbors()
                .iter()
                .position(|n| *n == Some(id))
                .expect("reciprocal link");
            let their_pos = other_master.part_position(other_part, &other.transform());
            // Same physical segment, seen from both sides.
            let direct = (my_pos.start - their_pos.start).length()
                + (my_pos.end - their_pos.end).length();
            let crossed = (my_pos.start - their_pos.end).length()
                + (my_pos.end - their_pos.start).length();
            assert!(direct.min(crossed) < 1e-3, "glued fragments drifted apart");
        }
    }
}
