use crate::action_log::ActionLog;
use crate::advisor::AdvisedPlay;
use crate::engine::{apply_with, classify, Action, GameEvent};
use crate::rng::GameRng;
use crate::world::{GameState, WorldParams};
use tracing::{debug, info};

/// A running game with undo history and a bot-mode driver.
///
/// Only one action is ever in flight: every method takes `&mut self`.
pub struct Session {
    state: GameState,
    history: Vec<GameState>,
    params: WorldParams,
    rng: GameRng,
    last_event: Option<GameEvent>,
    log: ActionLog,
}

impl Session {
    pub fn new(params: WorldParams, mut rng: GameRng) -> Self {
        let state = GameState::generate(params, &mut rng);
        info!(seed = rng.seed(), size = state.grid_size, "new session");
        Self::with_state(state, params, rng)
    }

    /// Resume from an existing state (a loaded save or a hand-built cave)
    pub fn with_state(state: GameState, params: WorldParams, rng: GameRng) -> Self {
        Session {
            state,
            history: Vec::new(),
            params,
            rng,
            last_event: None,
            log: ActionLog::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &[GameState] {
        &self.history
    }

    pub fn last_event(&self) -> Option<GameEvent> {
        self.last_event
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Apply an action, keeping the previous state for undo
    pub fn act(&mut self, action: Action) -> Option<GameEvent> {
        let next = apply_with(&self.state, action, self.params, &mut self.rng);
        let event = classify(&self.state, &next, action);

        if action == Action::Restart {
            self.history.clear();
        } else {
            self.history.push(self.state.clone());
        }

        self.state = next;
        self.last_event = event;
        self.log.log(action, &self.state, event);
        debug!(%action, position = %self.state.agent_position, score = self.state.score, ?event, "applied");
        event
    }

    /// Restore the state before the last action. Restarts cannot be undone.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                self.last_event = None;
                self.log.pop();
                true
            }
            None => false,
        }
    }

    /// One bot-mode step. Does nothing once the game is over or won.
    pub fn tick(&mut self, play: &AdvisedPlay<'_>) -> Option<Action> {
        if self.state.is_finished() {
            return None;
        }
        let action = play.action(&self.state, &mut self.rng);
        self.act(action);
        Some(action)
    }

    /// Tick until the game ends or `max_ticks` is reached. Returns the ticks taken.
    pub fn run_bot(&mut self, play: &AdvisedPlay<'_>, max_ticks: u32) -> u32 {
        let mut ticks = 0;
        while ticks < max_ticks && self.tick(play).is_some() {
            ticks += 1;
        }
        info!(
            ticks,
            score = self.state.score,
            won = self.state.game_won,
            dead = self.state.game_over,
            "bot run finished"
        );
        ticks
    }
}
