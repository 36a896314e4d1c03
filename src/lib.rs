use rand::Rng;

pub mod engine;
pub mod error;
pub mod logging;
pub mod state;
pub mod tui;

pub use engine::{Board, Cell, RevealResult};
pub use error::{GameError, Result};
pub use state::{Action, CellView, GameState, Status};

/// Board dimensions and mine count, fixed for the whole session and reused on every reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
}

impl GameConfig {
    /// Start a game on a freshly generated board.
    pub fn new_game<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GameState> {
        Board::generate_with_rng(self.width, self.height, self.mines, rng).map(GameState::new)
    }
}
