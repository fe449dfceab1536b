#![allow(dead_code)]

use std::collections::HashSet;
use wumpus_world::pathfinding::{render_search, SearchGrid, SearchResult};
use wumpus_world::{GameState, Grid, Position};

/// Parse a cave layout. Row 0 is the top line.
/// Format:
/// - W: wumpus
/// - P: pit
/// - G: gold
/// - .: empty
///
/// Spaces are ignored so layouts can be written with gaps between cells.
pub fn parse_world(layout: &str) -> Result<GameState, Box<dyn std::error::Error>> {
    let rows: Vec<Vec<char>> = layout
        .lines()
        .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect();

    if rows.is_empty() {
        return Err("No rows found in layout".into());
    }

    let size = rows.len() as i32;
    let mut grid = Grid::new(size);

    for (y, row) in rows.iter().enumerate() {
        if row.len() as i32 != size {
            return Err(format!("Row {} has {} cells, expected {}", y, row.len(), size).into());
        }
        for (x, ch) in row.iter().enumerate() {
            let pos = Position::new(x as i32, y as i32);
            let cell = grid.cell_mut(pos).ok_or("cell out of bounds")?;
            match ch {
                'W' => cell.has_wumpus = true,
                'P' => cell.has_pit = true,
                'G' => cell.has_gold = true,
                '.' => {}
                other => return Err(format!("Unknown layout character '{}'", other).into()),
            }
        }
    }

    Ok(GameState::from_grid(grid))
}

/// Parse a search layout.
/// Format:
/// - S: start
/// - G: goal
/// - #: obstacle
/// - .: free
pub fn parse_search(layout: &str) -> Result<(SearchGrid, Position, Position), Box<dyn std::error::Error>> {
    let rows: Vec<Vec<char>> = layout
        .lines()
        .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect();

    let size = rows.len() as i32;
    let mut obstacles = Vec::new();
    let mut start = None;
    let mut goal = None;

    for (y, row) in rows.iter().enumerate() {
        if row.len() as i32 != size {
            return Err(format!("Row {} has {} cells, expected {}", y, row.len(), size).into());
        }
        for (x, ch) in row.iter().enumerate() {
            let pos = Position::new(x as i32, y as i32);
            match ch {
                'S' => start = Some(pos),
                'G' => goal = Some(pos),
                '#' => obstacles.push(pos),
                '.' => {}
                other => return Err(format!("Unknown layout character '{}'", other).into()),
            }
        }
    }

    let start = start.ok_or("Layout has no start")?;
    let goal = goal.ok_or("Layout has no goal")?;
    Ok((SearchGrid::with_obstacles(size, &obstacles), start, goal))
}

/// A path is valid if it runs start to goal through free cells in unit steps
pub fn assert_valid_path(grid: &SearchGrid, start: Position, goal: Position, path: &[Position]) {
    assert_eq!(path.first(), Some(&start), "path must begin at start");
    assert_eq!(path.last(), Some(&goal), "path must end at goal");

    let mut seen = HashSet::new();
    for pair in path.windows(2) {
        assert_eq!(pair[0].manhattan(&pair[1]), 1, "non-adjacent step {} -> {}", pair[0], pair[1]);
    }
    for pos in path {
        assert!(!grid.is_blocked(*pos), "path crosses blocked cell {}", pos);
        assert!(seen.insert(*pos), "path revisits {}", pos);
    }
}

/// Print a search for debugging failed tests
pub fn visualize_search(name: &str, grid: &SearchGrid, start: Position, goal: Position, result: &SearchResult) {
    println!("\n=== {} ===", name);
    print!("{}", render_search(grid, start, goal, result));
    println!("path length {}, explored {}", result.path.len(), result.explored.len());
}
