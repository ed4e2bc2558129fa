use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

use hashbrown::{HashMap, HashSet};
use umbra_geom::Cell;
use umbra_world::TileMap;

pub const DEFAULT_MAX_EXPANDED: usize = 16_384;

const NEIGHBOURS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

struct Node {
    cell: Cell,
    g: f32,
    parent: Option<usize>,
}

/// Heap entry; ordered so the max-heap pops the lowest f, then lowest h,
/// then the earliest pushed.
struct Open {
    f: f32,
    h: f32,
    seq: u64,
    node: usize,
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A* over an 8-connected grid with Euclidean costs.
#[derive(Clone, Copy, Debug)]
pub struct Pathfinder {
    /// Expansion budget; searches that exceed it give up with no route.
    pub max_expanded: usize,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self {
            max_expanded: DEFAULT_MAX_EXPANDED,
        }
    }
}

impl Pathfinder {
    pub fn new(max_expanded: usize) -> Self {
        Self { max_expanded }
    }

    /// Route from `start` to `goal`, both inclusive, or empty if none exists.
    ///
    /// Diagonal steps are rejected when either orthogonal neighbour they pass is
    /// a wall, so routes never clip corners.
    pub fn find_path<F>(&self, start: Cell, goal: Cell, mut is_wall: F) -> Vec<Cell>
    where
        F: FnMut(i32, i32) -> bool,
    {
        if is_wall(start.x, start.y) || is_wall(goal.x, goal.y) {
            return Vec::new();
        }
        if start == goal {
            return vec![start];
        }

        let mut arena: Vec<Node> = Vec::new();
        let mut best: HashMap<Cell, f32> = HashMap::new();
        let mut closed: HashSet<Cell> = HashSet::new();
        let mut open = BinaryHeap::new();
        let mut seq = 0u64;

        arena.push(Node {
            cell: start,
            g: 0.0,
            parent: None,
        });
        best.insert(start, 0.0);
        let h0 = start.euclidean(goal);
        open.push(Open {
            f: h0,
            h: h0,
            seq,
            node: 0,
        });

        let mut expanded = 0usize;
        while let Some(Open { node, .. }) = open.pop() {
            let (cell, g) = (arena[node].cell, arena[node].g);
            if cell == goal {
                return reconstruct(&arena, node);
            }
            if !closed.insert(cell) {
                continue;
            }
            expanded += 1;
            if expanded > self.max_expanded {
                log::debug!(
                    target: "nav",
                    "path search {:?} -> {:?} gave up after {} expansions",
                    start,
                    goal,
                    self.max_expanded
                );
                return Vec::new();
            }

            for (dx, dy) in NEIGHBOURS {
                let n = cell.offset(dx, dy);
                if closed.contains(&n) || is_wall(n.x, n.y) {
                    continue;
                }
                let diagonal = dx != 0 && dy != 0;
                if diagonal && (is_wall(cell.x + dx, cell.y) || is_wall(cell.x, cell.y + dy)) {
                    continue;
                }
                let ng = g + if diagonal { SQRT_2 } else { 1.0 };
                if best.get(&n).is_some_and(|&known| known <= ng) {
                    continue;
                }
                best.insert(n, ng);
                arena.push(Node {
                    cell: n,
                    g: ng,
                    parent: Some(node),
                });
                let h = n.euclidean(goal);
                seq += 1;
                open.push(Open {
                    f: ng + h,
                    h,
                    seq,
                    node: arena.len() - 1,
                });
            }
        }
        Vec::new()
    }

    /// `find_path` against a tile map. Exits are walkable.
    pub fn find_path_on<M: TileMap + ?Sized>(&self, map: &M, start: Cell, goal: Cell) -> Vec<Cell> {
        self.find_path(start, goal, |x, y| map.is_wall_at(x, y))
    }
}

fn reconstruct(arena: &[Node], mut i: usize) -> Vec<Cell> {
    let mut out = vec![arena[i].cell];
    while let Some(p) = arena[i].parent {
        out.push(arena[p].cell);
        i = p;
    }
    out.reverse();
    out
}

/// Sum of step lengths along a route.
pub fn path_cost(path: &[Cell]) -> f32 {
    path.windows(2).map(|w| w[0].euclidean(w[1])).sum()
}
