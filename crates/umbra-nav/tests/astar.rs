use std::collections::BinaryHeap;

use proptest::prelude::*;
use umbra_geom::Cell;
use umbra_nav::{Pathfinder, path_cost};
use umbra_tiles::{MaterialCatalog, MaterialId, Tile};
use umbra_world::{BoundedMap, TileMap};

/// Width x height grid with walls outside.
#[derive(Debug)]
struct Grid {
    w: i32,
    h: i32,
    walls: Vec<bool>,
}

impl Grid {
    fn wall(&self, x: i32, y: i32) -> bool {
        x < 0 || y < 0 || x >= self.w || y >= self.h || self.walls[(y * self.w + x) as usize]
    }
}

/// Plain Dijkstra with the same movement rules.
fn dijkstra(g: &Grid, start: Cell, goal: Cell) -> Option<f64> {
    #[derive(PartialEq)]
    struct E(f64, i32, i32);
    impl Eq for E {}
    impl PartialOrd for E {
        fn partial_cmp(&self, o: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(o))
        }
    }
    impl Ord for E {
        fn cmp(&self, o: &Self) -> std::cmp::Ordering {
            o.0.total_cmp(&self.0)
        }
    }
    if g.wall(start.x, start.y) || g.wall(goal.x, goal.y) {
        return None;
    }
    let mut dist = vec![f64::INFINITY; (g.w * g.h) as usize];
    let mut heap = BinaryHeap::new();
    dist[(start.y * g.w + start.x) as usize] = 0.0;
    heap.push(E(0.0, start.x, start.y));
    while let Some(E(d, x, y)) = heap.pop() {
        if d > dist[(y * g.w + x) as usize] {
            continue;
        }
        if (x, y) == (goal.x, goal.y) {
            return Some(d);
        }
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (x + dx, y + dy);
                if g.wall(nx, ny) {
                    continue;
                }
                if dx != 0 && dy != 0 && (g.wall(x + dx, y) || g.wall(x, y + dy)) {
                    continue;
                }
                let nd = d + if dx != 0 && dy != 0 { std::f64::consts::SQRT_2 } else { 1.0 };
                let i = (ny * g.w + nx) as usize;
                if nd < dist[i] {
                    dist[i] = nd;
                    heap.push(E(nd, nx, ny));
                }
            }
        }
    }
    None
}

fn check_route(g: &Grid, path: &[Cell], start: Cell, goal: Cell) {
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    for w in path.windows(2) {
        let (a, b) = (w[0], w[1]);
        assert!(a.is_adjacent(b), "{a:?} -> {b:?} not adjacent");
        assert!(!g.wall(b.x, b.y));
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        if dx != 0 && dy != 0 {
            assert!(!g.wall(a.x + dx, a.y) && !g.wall(a.x, a.y + dy), "corner cut at {a:?}");
        }
    }
}

fn grid_strategy() -> impl Strategy<Value = (Grid, Cell, Cell)> {
    (3i32..=9, 3i32..=9).prop_flat_map(|(w, h)| {
        (
            prop::collection::vec(prop::bool::weighted(0.3), (w * h) as usize),
            0..w,
            0..h,
            0..w,
            0..h,
        )
            .prop_map(move |(walls, sx, sy, gx, gy)| (Grid { w, h, walls }, Cell::new(sx, sy), Cell::new(gx, gy)))
    })
}

proptest! {
    #[test]
    fn astar_matches_dijkstra((grid, start, goal) in grid_strategy()) {
        let path = Pathfinder::default().find_path(start, goal, |x, y| grid.wall(x, y));
        match dijkstra(&grid, start, goal) {
            None => prop_assert!(path.is_empty()),
            Some(best) => {
                prop_assert!(!path.is_empty());
                check_route(&grid, &path, start, goal);
                prop_assert!((path_cost(&path) as f64 - best).abs() < 1e-3,
                    "astar {} vs dijkstra {}", path_cost(&path), best);
            }
        }
    }
}

#[test]
fn no_corner_cutting_past_a_single_block() {
    // . #
    // . .
    let grid = Grid { w: 2, h: 2, walls: vec![false, true, false, false] };
    let path = Pathfinder::default().find_path(Cell::new(0, 0), Cell::new(1, 1), |x, y| grid.wall(x, y));
    assert_eq!(path, vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)]);
}

#[test]
fn walls_and_unreachable_goals_give_empty_routes() {
    let grid = Grid { w: 5, h: 1, walls: vec![false, false, true, false, false] };
    let pf = Pathfinder::default();
    assert!(pf.find_path(Cell::new(0, 0), Cell::new(4, 0), |x, y| grid.wall(x, y)).is_empty());
    assert!(pf.find_path(Cell::new(2, 0), Cell::new(4, 0), |x, y| grid.wall(x, y)).is_empty());
    assert!(pf.find_path(Cell::new(0, 0), Cell::new(2, 0), |x, y| grid.wall(x, y)).is_empty());
    assert_eq!(pf.find_path(Cell::new(1, 0), Cell::new(1, 0), |x, y| grid.wall(x, y)), vec![Cell::new(1, 0)]);
}

#[test]
fn expansion_budget_bounds_unbounded_search() {
    // Goal sealed inside a ring on an infinite plane.
    let sealed = |x: i32, y: i32| (x - 50).abs().max((y - 50).abs()) == 2;
    let pf = Pathfinder::new(500);
    assert!(pf.find_path(Cell::new(0, 0), Cell::new(50, 50), sealed).is_empty());
}

#[test]
fn routes_around_u_shaped_wall() {
    let cat = MaterialCatalog::builtin();
    let wall = Tile::Wall(MaterialId(0));
    let mut map = BoundedMap::open(16, 16, cat.default_wall());
    // U opening upward: floor row y = 10, arms at x = 4 and x = 11
    for x in 4..=11 {
        map.set(x, 10, wall);
    }
    for y in 4..=10 {
        map.set(4, y, wall);
        map.set(11, y, wall);
    }
    let start = Cell::new(7, 7);
    let goal = Cell::new(7, 13);
    let path = Pathfinder::default().find_path_on(&map, start, goal);
    assert!(!path.is_empty());
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    for w in path.windows(2) {
        assert!(w[0].is_adjacent(w[1]));
        assert!(!map.is_wall_at(w[1].x, w[1].y));
    }
    // has to leave the U through its open top
    assert!(path.iter().any(|c| c.y < 4));
    assert!(path_cost(&path) > 6.0);
}

#[test]
fn exits_are_walkable() {
    let cat = MaterialCatalog::builtin();
    let mut map = BoundedMap::open(3, 1, cat.default_wall());
    map.set(1, 0, Tile::Exit);
    let path = Pathfinder::default().find_path_on(&map, Cell::new(0, 0), Cell::new(2, 0));
    assert_eq!(path.len(), 3);
}
