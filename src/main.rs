//! Wumpus World CLI: play interactively, watch the bot, or run a path search.
//!
//! Usage:
//!   wumpus play
//!   wumpus --seed 7 bot --fast
//!   wumpus path --algorithm dfs --grid 6 --goal 5,5 --obstacle 2,2 --obstacle 3,1

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wumpus_world::advisor::{AdvisedPlay, Advisor};
use wumpus_world::config::{Config, DEFAULT_CONFIG_PATH};
use wumpus_world::display::{render_map, status_line};
use wumpus_world::pathfinding::{format_path, render_search, search, Algorithm, SearchGrid};
use wumpus_world::save_state::SaveState;
use wumpus_world::{Action, GameRng, Position, Session};

#[derive(Parser)]
#[command(name = "wumpus")]
#[command(about = "Explore the Wumpus World cave, with hints, a bot and path search")]
struct Args {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Seed for cave generation (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Grid side length (overrides the config)
    #[arg(long)]
    size: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play interactively by typing action tokens
    Play {
        /// Start from a saved game instead of a fresh cave
        #[arg(long)]
        load: Option<PathBuf>,
    },
    /// Let the policy play one tick at a time until the game ends
    Bot {
        /// Do not wait between ticks
        #[arg(long)]
        fast: bool,
        /// Override the configured tick cap
        #[arg(long)]
        max_ticks: Option<u32>,
        /// Show hazards on the map
        #[arg(long)]
        reveal: bool,
    },
    /// Run A* or DFS on an obstacle grid
    Path {
        #[arg(long, default_value = "astar")]
        algorithm: Algorithm,
        /// Side length of the search grid
        #[arg(long = "grid", default_value_t = 4)]
        grid: i32,
        #[arg(long, default_value = "0,0")]
        start: Position,
        /// Defaults to the far corner
        #[arg(long)]
        goal: Option<Position>,
        /// Blocked cell as x,y (repeatable)
        #[arg(long = "obstacle")]
        obstacles: Vec<Position>,
        /// Use the hazards of a generated cave as obstacles instead
        #[arg(long)]
        from_cave: bool,
    },
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

#[cfg(feature = "gemini")]
fn build_advisor(config: &Config) -> Option<Box<dyn Advisor>> {
    if !config.advisor.enabled {
        return None;
    }
    match wumpus_world::advisor::GeminiAdvisor::from_config(&config.advisor) {
        Ok(advisor) => Some(Box::new(advisor)),
        Err(e) => {
            warn!(error = %e, "remote advisor unavailable, using local heuristics");
            None
        }
    }
}

#[cfg(not(feature = "gemini"))]
fn build_advisor(config: &Config) -> Option<Box<dyn Advisor>> {
    if config.advisor.enabled {
        warn!("advisor enabled in config but built without the `gemini` feature");
    }
    None
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mut config = Config::load_from(&args.config);
    init_logging(&config);

    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    if let Some(size) = args.size {
        config.world.grid_size = size;
    }
    info!(config = %args.config.display(), size = config.world.grid_size, seed = ?config.world.seed, "starting");

    let advisor = build_advisor(&config);
    let play = match advisor.as_deref() {
        Some(advisor) => AdvisedPlay::remote(advisor),
        None => AdvisedPlay::local(),
    };

    match args.command {
        Command::Play { load } => run_play(&config, &play, load),
        Command::Bot { fast, max_ticks, reveal } => {
            run_bot(&config, &play, fast, max_ticks.unwrap_or(config.bot.max_ticks), reveal)
        }
        Command::Path { algorithm, grid, start, goal, obstacles, from_cave } => {
            run_path(&config, algorithm, grid, start, goal, obstacles, from_cave);
            Ok(())
        }
    }
}

fn new_session(config: &Config) -> Session {
    Session::new(config.world.params(), GameRng::from_option(config.world.seed))
}

fn print_state(session: &Session, reveal: bool) {
    let state = session.state();
    println!("{}", render_map(state, reveal));
    println!("{}", status_line(state));
    if let Some(event) = session.last_event() {
        println!("{}", event);
    }
}

fn save_action_log(config: &Config, session: &Session) {
    if !config.logging.enable_action_log || session.log().is_empty() {
        return;
    }
    match session.log().save_to_file(&config.logging.action_log_path) {
        Ok(()) => info!(path = %config.logging.action_log_path, "action log saved"),
        Err(e) => warn!(error = %e, "failed to save action log"),
    }
}

fn run_play(config: &Config, play: &AdvisedPlay<'_>, load: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = match load {
        Some(path) => {
            let save = SaveState::load_from_file(&path)?;
            let rng = GameRng::from_option(save.seed.or(config.world.seed));
            Session::with_state(save.state, config.world.params(), rng)
        }
        None => new_session(config),
    };

    println!("Actions: moveForward turnLeft turnRight grab shoot restart");
    println!("Other:   hint undo map save <file> load <file> log quit\n");
    print_state(&session, false);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else { continue };

        match command {
            "quit" | "exit" => break,
            "hint" => println!("{}", play.hint(session.state())),
            "undo" => {
                if !session.undo() {
                    println!("Nothing to undo.");
                }
                print_state(&session, false);
            }
            "map" => println!("{}", render_map(session.state(), true)),
            "log" => {
                session.log().print();
                println!("{}", session.log().summary());
            }
            "save" => match words.next() {
                Some(path) => match SaveState::new(session.state(), Some(session.seed())).save_to_file(path) {
                    Ok(()) => println!("Saved to {}", path),
                    Err(e) => println!("Save failed: {}", e),
                },
                None => println!("Usage: save <file>"),
            },
            "load" => match words.next() {
                Some(path) => match SaveState::load_from_file(path) {
                    Ok(save) => {
                        let rng = GameRng::from_option(save.seed);
                        session = Session::with_state(save.state, config.world.params(), rng);
                        print_state(&session, false);
                    }
                    Err(e) => println!("Load failed: {}", e),
                },
                None => println!("Usage: load <file>"),
            },
            token => match token.parse::<Action>() {
                Ok(action) => {
                    if session.state().is_finished() && action != Action::Restart {
                        println!("The game is over. Type 'restart' to play again.");
                        continue;
                    }
                    session.act(action);
                    print_state(&session, session.state().is_finished());
                }
                Err(e) => println!("{}", e),
            },
        }
    }

    save_action_log(config, &session);
    Ok(())
}

fn run_bot(
    config: &Config,
    play: &AdvisedPlay<'_>,
    fast: bool,
    max_ticks: u32,
    reveal: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = new_session(config);
    println!("Bot mode ({}), seed {}", if play.is_remote() { "remote advisor" } else { "local policy" }, session.seed());
    print_state(&session, reveal);

    let mut ticks = 0;
    while ticks < max_ticks {
        let Some(action) = session.tick(play) else { break };
        ticks += 1;
        println!("\n#{} {}", ticks, action);
        print_state(&session, reveal);

        if !fast {
            thread::sleep(Duration::from_millis(config.bot.tick_ms));
        }
    }

    let state = session.state();
    let outcome = if state.game_won {
        "won"
    } else if state.game_over {
        "died"
    } else {
        "stopped"
    };
    println!("\nBot {} after {} ticks with score {}", outcome, ticks, state.score);
    println!("{}", session.log().summary());

    save_action_log(config, &session);
    Ok(())
}

fn run_path(
    config: &Config,
    algorithm: Algorithm,
    size: i32,
    start: Position,
    goal: Option<Position>,
    obstacles: Vec<Position>,
    from_cave: bool,
) {
    let grid = if from_cave {
        let session = new_session(config);
        SearchGrid::from_hazards(session.state())
    } else {
        SearchGrid::with_obstacles(size, &obstacles)
    };
    let goal = goal.unwrap_or(Position::new(grid.size - 1, grid.size - 1));

    let result = search(algorithm, &grid, start, goal);

    println!("Algorithm: {}", algorithm);
    println!("Path: {}", format_path(&result.path));
    if result.found() {
        println!("Length: {} positions ({} steps)", result.path.len(), result.path.len() - 1);
    }
    println!("Explored: {} cells\n", result.explored.len());
    println!("{}", render_search(&grid, start, goal, &result));
}
