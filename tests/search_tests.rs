mod common;

use common::{assert_valid_path, parse_search, visualize_search};
use wumpus_world::pathfinding::{search, Algorithm};
use wumpus_world::{astar, dfs, Position, SearchGrid};

#[test]
fn test_astar_open_grid_is_manhattan_optimal() {
    for n in 1..=8 {
        let grid = SearchGrid::new(n);
        let goal = Position::new(n - 1, n - 1);
        let result = astar(&grid, Position::ORIGIN, goal);

        assert_eq!(result.path.len() as i32, 2 * (n - 1) + 1, "n = {}", n);
        assert_valid_path(&grid, Position::ORIGIN, goal, &result.path);
    }
}

#[test]
fn test_dfs_open_grid_finds_valid_path() {
    for n in 1..=8 {
        let grid = SearchGrid::new(n);
        let goal = Position::new(n - 1, n - 1);
        let result = dfs(&grid, Position::ORIGIN, goal);

        assert!(result.path.len() as i32 >= 2 * (n - 1) + 1);
        assert_valid_path(&grid, Position::ORIGIN, goal, &result.path);
    }
}

#[test]
fn test_enclosed_goal_has_no_path() {
    let (grid, start, goal) = parse_search(
        "
        S . . . .
        . . . . .
        . . . # .
        . . # G #
        . . . # .
        ",
    )
    .unwrap();

    for algorithm in [Algorithm::AStar, Algorithm::Dfs] {
        let result = search(algorithm, &grid, start, goal);
        visualize_search(&algorithm.to_string(), &grid, start, goal, &result);
        assert!(result.path.is_empty(), "{} found a path", algorithm);
        assert!(!result.explored.is_empty());
        assert!(!result.explored.contains(&goal));
    }
}

#[test]
fn test_maze_detour() {
    let (grid, start, goal) = parse_search(
        "
        S . # . .
        # . # . #
        . . # . .
        . # # # .
        . . . . G
        ",
    )
    .unwrap();

    let best = astar(&grid, start, goal);
    visualize_search("astar maze", &grid, start, goal, &best);
    assert_valid_path(&grid, start, goal, &best.path);
    // (0,0) (1,0) (1,1) (1,2) (0,2) (0,3) (0,4) (1,4) (2,4) (3,4) (4,4)
    assert_eq!(best.path.len(), 11);

    let deep = dfs(&grid, start, goal);
    visualize_search("dfs maze", &grid, start, goal, &deep);
    assert_valid_path(&grid, start, goal, &deep.path);
    assert!(deep.path.len() >= best.path.len());
}

#[test]
fn test_astar_explores_no_more_than_dfs_on_open_diagonal() {
    let grid = SearchGrid::new(6);
    let goal = Position::new(5, 5);
    let a = astar(&grid, Position::ORIGIN, goal);
    let d = dfs(&grid, Position::ORIGIN, goal);

    assert!(a.path.len() <= d.path.len());
    assert_eq!(a.explored.first(), Some(&Position::ORIGIN));
    assert_eq!(d.explored.first(), Some(&Position::ORIGIN));
}

#[test]
fn test_start_and_goal_out_of_bounds() {
    let grid = SearchGrid::new(4);
    assert!(!astar(&grid, Position::new(-1, 0), Position::new(3, 3)).found());
    assert!(!dfs(&grid, Position::ORIGIN, Position::new(4, 4)).found());
}

#[test]
fn test_toggle_protects_endpoints() {
    let (mut grid, start, goal) = parse_search(
        "
        S . .
        . . .
        . . G
        ",
    )
    .unwrap();

    assert!(!grid.toggle_obstacle(start, &[start, goal]));
    assert!(!grid.toggle_obstacle(goal, &[start, goal]));
    assert!(grid.toggle_obstacle(Position::new(1, 0), &[start, goal]));
    assert!(grid.toggle_obstacle(Position::new(0, 1), &[start, goal]));

    // start is now walled in
    assert!(!astar(&grid, start, goal).found());
    assert!(!dfs(&grid, start, goal).found());

    assert!(grid.toggle_obstacle(Position::new(1, 0), &[start, goal]));
    assert_eq!(astar(&grid, start, goal).path.len(), 5);
}
