//! Game state machine.
//!
//! [`GameState::apply`] takes a state by value and returns the next one. Every
//! player input is expressed as an [`Action`], so front ends never touch the
//! board directly.

use std::collections::BTreeSet;
use std::fmt::{self, Write as _};

use rand::Rng;

use crate::engine::{Board, Cell, RevealResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// New board with the same width, height and mine count. Valid from any state.
    Reset,
    /// Move the cursor by the given amount, stopping at the board edges.
    Move { dx: isize, dy: isize },
    /// Toggle the flag under the cursor.
    Flag,
    /// Open the cell under the cursor.
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    Won,
    Lost,
}

/// What a renderer should draw for a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Flagged,
    Open(u8),
    Mine,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing {
        board: Board,
        cursor: (usize, usize),
        flagged: BTreeSet<usize>,
        revealed: BTreeSet<usize>,
    },
    Won { board: Board },
    Lost { board: Board },
}

impl GameState {
    pub fn new(board: Board) -> Self {
        log::info!("new {}x{} game with {} mines", board.width(), board.height(), board.mines());
        GameState::Playing { board, cursor: (0, 0), flagged: BTreeSet::new(), revealed: BTreeSet::new() }
    }

    pub fn apply(self, action: Action) -> Self {
        self.apply_with_rng(action, &mut rand::thread_rng())
    }

    /// Like [`GameState::apply`], drawing any new board from `rng`.
    ///
    /// Only `Reset` leaves `Won` or `Lost`; every other action is ignored there.
    pub fn apply_with_rng<R: Rng + ?Sized>(self, action: Action, rng: &mut R) -> Self {
        log::trace!("{:?} <- {:?}", self.status(), action);
        match (self, action) {
            (state, Action::Reset) => GameState::new(state.board().regenerate_with_rng(rng)),
            (GameState::Playing { board, cursor, flagged, revealed }, Action::Move { dx, dy }) => {
                let cursor = (
                    clamp_axis(cursor.0, dx, board.width()),
                    clamp_axis(cursor.1, dy, board.height()),
                );
                GameState::Playing { board, cursor, flagged, revealed }
            }
            (GameState::Playing { board, cursor, mut flagged, revealed }, Action::Flag) => {
                let i = board.index(cursor.0, cursor.1);
                if !flagged.remove(&i) { flagged.insert(i); }
                GameState::Playing { board, cursor, flagged, revealed }
            }
            (GameState::Playing { board, cursor, flagged, revealed }, Action::Open) => {
                open(board, cursor, flagged, revealed)
            }
            (terminal @ (GameState::Won { .. } | GameState::Lost { .. }), _) => terminal,
        }
    }
}

fn open(board: Board, cursor: (usize, usize), flagged: BTreeSet<usize>, mut revealed: BTreeSet<usize>) -> GameState {
    match board.reveal(cursor) {
        RevealResult::HitMine => {
            log::info!("mine at {:?}, game lost", cursor);
            GameState::Lost { board }
        }
        RevealResult::Opened(opened) => {
            log::debug!("opened {} cells at {:?}", opened.len(), cursor);
            revealed.extend(opened);
            if revealed.len() == board.safe_cells().len() {
                log::info!("all {} safe cells open, game won", revealed.len());
                GameState::Won { board }
            } else {
                GameState::Playing { board, cursor, flagged, revealed }
            }
        }
    }
}

fn clamp_axis(pos: usize, delta: isize, len: usize) -> usize {
    pos.saturating_add_signed(delta).min(len - 1)
}

// Read-only accessors for renderers
impl GameState {
    pub fn board(&self) -> &Board {
        match self {
            GameState::Playing { board, .. } | GameState::Won { board } | GameState::Lost { board } => board,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            GameState::Playing { .. } => Status::Playing,
            GameState::Won { .. } => Status::Won,
            GameState::Lost { .. } => Status::Lost,
        }
    }

    pub fn cursor(&self) -> Option<(usize, usize)> {
        match self {
            GameState::Playing { cursor, .. } => Some(*cursor),
            _ => None,
        }
    }

    pub fn flagged(&self) -> Option<&BTreeSet<usize>> {
        match self {
            GameState::Playing { flagged, .. } => Some(flagged),
            _ => None,
        }
    }

    pub fn revealed(&self) -> Option<&BTreeSet<usize>> {
        match self {
            GameState::Playing { revealed, .. } => Some(revealed),
            _ => None,
        }
    }

    pub fn is_flagged(&self, x: usize, y: usize) -> bool {
        self.flagged().is_some_and(|f| f.contains(&self.board().index(x, y)))
    }

    pub fn is_revealed(&self, x: usize, y: usize) -> bool {
        self.revealed().is_some_and(|r| r.contains(&self.board().index(x, y)))
    }

    /// Finished games show the whole board; running games only what the player uncovered.
    pub fn view(&self, x: usize, y: usize) -> Option<CellView> {
        let cell = self.board().cell(x, y)?;
        Some(match (self.status(), cell) {
            (Status::Playing, Cell::Empty(n)) if self.is_revealed(x, y) => CellView::Open(n),
            (Status::Playing, _) if self.is_flagged(x, y) => CellView::Flagged,
            (Status::Playing, _) => CellView::Hidden,
            (_, Cell::Mine) => CellView::Mine,
            (_, Cell::Empty(n)) => CellView::Open(n),
        })
    }

    pub fn render(&self) -> String {
        let board = self.board();
        let cursor = self.cursor();
        let mut s = String::new();
        s.push_str("    ");
        for x in 0..board.width() {
            let _ = write!(s, "{:>2} ", x);
        }
        s.push('\n');
        s.push_str("   ");
        s.push_str(&"-".repeat(board.width() * 3 + 1));
        s.push('\n');

        for y in 0..board.height() {
            let _ = write!(s, "{:>2} |", y);
            for x in 0..board.width() {
                let ch = match self.view(x, y) {
                    Some(CellView::Hidden) | None => '.',
                    Some(CellView::Flagged) => 'F',
                    Some(CellView::Mine) => '*',
                    Some(CellView::Open(0)) => ' ',
                    Some(CellView::Open(n)) => char::from_digit(n as u32, 10).unwrap_or('?'),
                };
                if cursor == Some((x, y)) {
                    let _ = write!(s, "[{}]", ch);
                } else {
                    let _ = write!(s, " {} ", ch);
                }
            }
            s.push('\n');
        }
        s
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
