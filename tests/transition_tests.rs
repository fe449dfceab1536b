mod common;

use common::parse_world;
use wumpus_world::world::{ARROW_PENALTY, GOLD_REWARD, MOVE_PENALTY};
use wumpus_world::{apply, classify, infer, Action, Direction, GameEvent, GameState, Position, Safety};

fn run(state: &GameState, actions: &[Action]) -> GameState {
    actions.iter().fold(state.clone(), |s, &a| apply(&s, a))
}

#[test]
fn test_percepts_pit_east_of_origin() {
    let state = parse_world(
        "
        . P .
        . . .
        . . .
        ",
    )
    .unwrap();

    assert_eq!(state.agent_position, Position::ORIGIN);
    assert!(state.percepts.breeze);
    assert!(!state.percepts.stench);
    assert!(!state.percepts.glitter);
}

#[test]
fn test_percepts_match_neighbors_everywhere() {
    let state = parse_world(
        "
        . . . .
        . W . .
        . . G P
        . . . .
        ",
    )
    .unwrap();

    for pos in state.grid.positions() {
        let mut moved = state.clone();
        moved.agent_position = pos;
        let percepts = moved.sense();

        let neighbors: Vec<Position> = state.grid.neighbors(pos).map(|(_, p)| p).collect();
        let stench = neighbors.iter().any(|p| state.cell(*p).unwrap().has_wumpus);
        let breeze = neighbors.iter().any(|p| state.cell(*p).unwrap().has_pit);

        assert_eq!(percepts.stench, stench, "stench at {}", pos);
        assert_eq!(percepts.breeze, breeze, "breeze at {}", pos);
        assert_eq!(percepts.glitter, state.cell(pos).unwrap().has_gold, "glitter at {}", pos);
        assert!(!percepts.bump && !percepts.scream);
    }
}

#[test]
fn test_walk_to_gold_and_win() {
    let start = parse_world(
        "
        . . G
        . . .
        W . P
        ",
    )
    .unwrap();

    let at_gold = run(&start, &[Action::MoveForward, Action::MoveForward]);
    assert_eq!(at_gold.agent_position, Position::new(2, 0));
    assert!(at_gold.percepts.glitter);
    assert_eq!(at_gold.moves, 2);
    assert_eq!(at_gold.score, 2 * MOVE_PENALTY);

    let won = apply(&at_gold, Action::Grab);
    assert!(won.game_won && won.has_gold && !won.game_over);
    assert!(!won.percepts.glitter);
    assert_eq!(won.score, 2 * MOVE_PENALTY + GOLD_REWARD);
    assert_eq!(classify(&at_gold, &won, Action::Grab), Some(GameEvent::Won));

    // every intermediate state is still intact
    assert!(!start.cell(Position::new(2, 0)).unwrap().visited);
    assert!(at_gold.cell(Position::new(2, 0)).unwrap().has_gold);
}

#[test]
fn test_bump_into_north_wall() {
    let state = parse_world(
        "
        . . .
        . . .
        . . .
        ",
    )
    .unwrap();

    let facing_north = apply(&state, Action::TurnLeft);
    assert_eq!(facing_north.agent_direction, Direction::North);

    let bumped = apply(&facing_north, Action::MoveForward);
    assert!(bumped.percepts.bump);
    assert_eq!(bumped.agent_position, facing_north.agent_position);
    assert_eq!(bumped.moves, facing_north.moves);
    assert_eq!(bumped.score, facing_north.score);
    assert_eq!(classify(&facing_north, &bumped, Action::MoveForward), Some(GameEvent::Bumped));
}

#[test]
fn test_shoot_twice() {
    let state = parse_world(
        "
        . . W
        . . .
        . . .
        ",
    )
    .unwrap();
    assert!(!state.percepts.stench);

    let shot = apply(&state, Action::Shoot);
    assert!(shot.percepts.scream);
    assert!(!shot.has_arrow);
    assert_eq!(shot.wumpus_position(), None);
    assert_eq!(shot.score, ARROW_PENALTY);

    let again = apply(&shot, Action::Shoot);
    assert!(!again.percepts.scream);
    assert!(!again.has_arrow);
    assert_eq!(again.score, shot.score);
    assert_eq!(classify(&shot, &again, Action::Shoot), None);
}

#[test]
fn test_shoot_wrong_direction_misses() {
    let state = parse_world(
        "
        . . .
        . . .
        W . .
        ",
    )
    .unwrap();

    let shot = apply(&state, Action::Shoot);
    assert!(!shot.percepts.scream);
    assert_eq!(shot.wumpus_position(), Some(Position::new(0, 2)));
}

#[test]
fn test_grab_on_empty_cell_is_noop() {
    let state = parse_world(
        "
        . G
        . .
        ",
    )
    .unwrap();

    let next = apply(&state, Action::Grab);
    assert!(!next.has_gold && !next.game_won);
    assert_eq!(next.score, state.score);
    assert_eq!(next.gold_position(), Some(Position::new(1, 0)));
}

#[test]
fn test_quiet_move_makes_neighbors_safe() {
    let state = parse_world(
        "
        . . . .
        . . . .
        . . . .
        . . . P
        ",
    )
    .unwrap();

    let moved = apply(&state, Action::MoveForward);
    assert!(!moved.percepts.stench && !moved.percepts.breeze);
    for (_, pos) in moved.grid.neighbors(moved.agent_position) {
        assert_eq!(moved.cell(pos).unwrap().safe, Safety::Safe, "{}", pos);
    }
}

#[test]
fn test_scream_clears_suspicion() {
    let state = parse_world(
        "
        . . .
        . . .
        W . .
        ",
    )
    .unwrap();

    // step south next to the wumpus and smell it
    let smelled = run(&state, &[Action::TurnRight, Action::MoveForward]);
    assert_eq!(smelled.agent_position, Position::new(0, 1));
    assert_eq!(smelled.agent_direction, Direction::South);
    assert!(smelled.percepts.stench);
    assert!(smelled.cell(Position::new(0, 2)).unwrap().possible_wumpus);
    assert!(smelled.cell(Position::new(1, 1)).unwrap().possible_wumpus);

    let shot = apply(&smelled, Action::Shoot);
    assert!(shot.percepts.scream);
    assert_eq!(shot.wumpus_position(), None);
    assert_eq!(shot.grid.count(|c| c.possible_wumpus), 0);
    assert_eq!(infer(&shot).grid.count(|c| c.possible_wumpus), 0);
}

#[test]
fn test_death_ends_game() {
    let state = parse_world(
        "
        . . .
        P . .
        . . .
        ",
    )
    .unwrap();

    let dead = run(&state, &[Action::TurnRight, Action::MoveForward]);
    assert!(dead.game_over);
    assert!(dead.is_finished());
    assert_eq!(classify(&state, &dead, Action::MoveForward), Some(GameEvent::Died));
}
