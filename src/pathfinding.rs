use crate::grid::{Direction, Position, Safety, MAX_GRID_SIZE};
use crate::world::GameState;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Square search space with a set of known obstacles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchGrid {
    pub size: i32,
    pub obstacles: HashSet<Position>,
}

impl SearchGrid {
    /// Empty grid. `size` is clamped to `0..=MAX_GRID_SIZE` like cave grids.
    pub fn new(size: i32) -> Self {
        SearchGrid {
            size: size.clamp(0, MAX_GRID_SIZE),
            obstacles: HashSet::new(),
        }
    }

    /// Create a grid with specific blocked cells. Out-of-bounds entries are ignored.
    pub fn with_obstacles(size: i32, blocked: &[Position]) -> Self {
        let mut grid = Self::new(size);
        for &pos in blocked {
            if grid.in_bounds(pos) {
                grid.obstacles.insert(pos);
            }
        }
        grid
    }

    /// Every true pit and Wumpus in the world, as a planner with the full map sees it
    pub fn from_hazards(state: &GameState) -> Self {
        let blocked: Vec<Position> = state
            .grid
            .positions()
            .filter(|&p| state.cell(p).map(|c| c.is_hazard()).unwrap_or(false))
            .collect();
        Self::with_obstacles(state.grid_size, &blocked)
    }

    /// Cells the agent currently believes may be dangerous
    pub fn from_beliefs(state: &GameState) -> Self {
        let blocked: Vec<Position> = state
            .grid
            .positions()
            .filter(|&p| {
                state
                    .cell(p)
                    .map(|c| {
                        !c.visited && (c.possible_wumpus || c.possible_pit || c.safe == Safety::Unsafe)
                    })
                    .unwrap_or(false)
            })
            .collect();
        Self::with_obstacles(state.grid_size, &blocked)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.size && pos.y >= 0 && pos.y < self.size
    }

    pub fn is_blocked(&self, pos: Position) -> bool {
        !self.in_bounds(pos) || self.obstacles.contains(&pos)
    }

    /// Flip a cell between free and blocked. Refuses out-of-bounds and protected cells.
    pub fn toggle_obstacle(&mut self, pos: Position, protected: &[Position]) -> bool {
        if !self.in_bounds(pos) || protected.contains(&pos) {
            return false;
        }
        if !self.obstacles.remove(&pos) {
            self.obstacles.insert(pos);
        }
        true
    }

    /// Unblocked in-bounds neighbors, in north/east/south/west order
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        Direction::ALL
            .into_iter()
            .map(|dir| pos.step(dir))
            .filter(|next| !self.is_blocked(*next))
            .collect()
    }
}

/// Which search to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    AStar,
    Dfs,
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "astar" | "a*" => Ok(Algorithm::AStar),
            "dfs" => Ok(Algorithm::Dfs),
            other => Err(format!("unknown algorithm '{}' (expected astar or dfs)", other)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::AStar => f.write_str("astar"),
            Algorithm::Dfs => f.write_str("dfs"),
        }
    }
}

/// Outcome of a search. An empty `path` means no path exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Start to goal inclusive
    pub path: Vec<Position>,
    /// Positions expanded, in expansion order. Includes the goal when a path is found.
    pub explored: Vec<Position>,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }
}

/// A node in one search run. Parents are arena indices into the same run.
#[derive(Debug, Clone)]
struct SearchNode {
    position: Position,
    parent: Option<usize>,
    g: i32,
    h: i32,
    f: i32,
}

/// Open-set entry. Stale entries are skipped when popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f: i32,
    seq: usize,
    node: usize,
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .f
            .cmp(&self.f)
            // Among equal f, the earliest inserted comes out first
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Walk parent links back to the root
fn reconstruct(arena: &[SearchNode], mut idx: usize) -> Vec<Position> {
    let mut path = vec![arena[idx].position];
    while let Some(parent) = arena[idx].parent {
        path.push(arena[parent].position);
        idx = parent;
    }
    path.reverse();
    path
}

fn endpoints_usable(grid: &SearchGrid, start: Position, goal: Position) -> bool {
    if grid.is_blocked(start) || grid.is_blocked(goal) {
        debug!(%start, %goal, "search endpoint blocked or out of bounds");
        return false;
    }
    true
}

pub fn search(algorithm: Algorithm, grid: &SearchGrid, start: Position, goal: Position) -> SearchResult {
    match algorithm {
        Algorithm::AStar => astar(grid, start, goal),
        Algorithm::Dfs => dfs(grid, start, goal),
    }
}

/// A* with the Manhattan heuristic and unit step cost. Returns a shortest path.
pub fn astar(grid: &SearchGrid, start: Position, goal: Position) -> SearchResult {
    if !endpoints_usable(grid, start, goal) {
        return SearchResult::default();
    }

    let mut arena: Vec<SearchNode> = Vec::new();
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut open_index: HashMap<Position, usize> = HashMap::new();
    let mut closed: HashSet<Position> = HashSet::new();
    let mut explored: Vec<Position> = Vec::new();
    let mut seq = 0;

    let h = start.manhattan(&goal);
    arena.push(SearchNode { position: start, parent: None, g: 0, h, f: h });
    open.push(OpenEntry { f: h, seq, node: 0 });
    open_index.insert(start, 0);

    while let Some(entry) = open.pop() {
        let current = entry.node;
        let node = &arena[current];
        if entry.f != node.f || closed.contains(&node.position) {
            continue;
        }

        let position = node.position;
        let g = node.g;

        if position == goal {
            explored.push(position);
            let path = reconstruct(&arena, current);
            debug!(explored = explored.len(), length = path.len(), "a* reached goal");
            return SearchResult { path, explored };
        }

        open_index.remove(&position);
        closed.insert(position);
        explored.push(position);

        for neighbor in grid.neighbors(position) {
            if closed.contains(&neighbor) {
                continue;
            }

            let tentative_g = g + 1;
            match open_index.get(&neighbor) {
                Some(&idx) => {
                    // Relax: strictly better route to a node still in the open set
                    if tentative_g < arena[idx].g {
                        let existing = &mut arena[idx];
                        existing.g = tentative_g;
                        existing.f = tentative_g + existing.h;
                        existing.parent = Some(current);
                        seq += 1;
                        open.push(OpenEntry { f: existing.f, seq, node: idx });
                    }
                }
                None => {
                    let h = neighbor.manhattan(&goal);
                    let idx = arena.len();
                    arena.push(SearchNode {
                        position: neighbor,
                        parent: Some(current),
                        g: tentative_g,
                        h,
                        f: tentative_g + h,
                    });
                    open_index.insert(neighbor, idx);
                    seq += 1;
                    open.push(OpenEntry { f: tentative_g + h, seq, node: idx });
                }
            }
        }
    }

    debug!(explored = explored.len(), "a* found no path");
    SearchResult { path: Vec::new(), explored }
}

/// Depth-first search preferring north, east, south, west. Complete but not optimal.
pub fn dfs(grid: &SearchGrid, start: Position, goal: Position) -> SearchResult {
    if !endpoints_usable(grid, start, goal) {
        return SearchResult::default();
    }

    let mut arena: Vec<SearchNode> = vec![SearchNode { position: start, parent: None, g: 0, h: 0, f: 0 }];
    let mut stack: Vec<usize> = vec![0];
    let mut visited: HashSet<Position> = HashSet::new();
    let mut explored: Vec<Position> = Vec::new();

    while let Some(current) = stack.pop() {
        let position = arena[current].position;
        if !visited.insert(position) {
            continue;
        }
        explored.push(position);

        if position == goal {
            let path = reconstruct(&arena, current);
            debug!(explored = explored.len(), length = path.len(), "dfs reached goal");
            return SearchResult { path, explored };
        }

        // Pushed in reverse so north is popped first
        for neighbor in grid.neighbors(position).into_iter().rev() {
            if visited.contains(&neighbor) {
                continue;
            }
            arena.push(SearchNode { position: neighbor, parent: Some(current), g: 0, h: 0, f: 0 });
            stack.push(arena.len() - 1);
        }
    }

    debug!(explored = explored.len(), "dfs found no path");
    SearchResult { path: Vec::new(), explored }
}

/// Format path for display
pub fn format_path(path: &[Position]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    path.iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// ASCII view of a search: S start, G goal, * path, o explored, # obstacle, . free
pub fn render_search(grid: &SearchGrid, start: Position, goal: Position, result: &SearchResult) -> String {
    let path: HashSet<Position> = result.path.iter().copied().collect();
    let explored: HashSet<Position> = result.explored.iter().copied().collect();
    let mut out = String::new();

    for y in 0..grid.size {
        for x in 0..grid.size {
            let pos = Position::new(x, y);
            let symbol = if pos == start {
                'S'
            } else if pos == goal {
                'G'
            } else if path.contains(&pos) {
                '*'
            } else if grid.obstacles.contains(&pos) {
                '#'
            } else if explored.contains(&pos) {
                'o'
            } else {
                '.'
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}
