use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use termsweeper::{Action, Board, CellView, GameConfig, GameState, Status};

fn playing(board: Board) -> GameState {
    GameState::new(board)
}

fn apply_all(mut state: GameState, actions: &[Action]) -> GameState {
    let mut rng = StdRng::seed_from_u64(1);
    for &action in actions {
        state = state.apply_with_rng(action, &mut rng);
    }
    state
}

fn mv(dx: isize, dy: isize) -> Action {
    Action::Move { dx, dy }
}

#[test]
fn new_game_starts_at_origin_with_empty_sets() {
    let state = GameConfig { width: 9, height: 9, mines: 10 }.new_game(&mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(state.status(), Status::Playing);
    assert_eq!(state.cursor(), Some((0, 0)));
    assert!(state.flagged().unwrap().is_empty());
    assert!(state.revealed().unwrap().is_empty());
}

#[test]
fn invalid_config_fails_to_start() {
    assert!(GameConfig { width: 2, height: 2, mines: 5 }.new_game(&mut StdRng::seed_from_u64(5)).is_err());
}

#[test]
fn move_clamps_to_edges() {
    let state = playing(Board::from_mines(4, 3, &[]).unwrap());
    let state = apply_all(state, &[mv(-1, -1)]);
    assert_eq!(state.cursor(), Some((0, 0)));
    let state = apply_all(state, &[mv(2, 1)]);
    assert_eq!(state.cursor(), Some((2, 1)));
    let state = apply_all(state, &[mv(10, 10)]);
    assert_eq!(state.cursor(), Some((3, 2)));
    let state = apply_all(state, &[mv(-100, 0)]);
    assert_eq!(state.cursor(), Some((0, 2)));
}

#[test]
fn move_never_leaves_board() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut state = playing(Board::from_mines(5, 4, &[(4, 3)]).unwrap());
    for dx in -3..=3 {
        for dy in -3..=3 {
            state = state.apply_with_rng(mv(dx, dy), &mut rng);
            let (x, y) = state.cursor().unwrap();
            assert!(x < 5 && y < 4);
        }
    }
}

#[test]
fn flag_toggles() {
    let state = playing(Board::from_mines(3, 3, &[(1, 1)]).unwrap());
    let state = apply_all(state, &[mv(1, 0), Action::Flag]);
    assert_eq!(state.flagged(), Some(&BTreeSet::from([1])));
    assert!(state.is_flagged(1, 0));
    assert_eq!(state.view(1, 0), Some(CellView::Flagged));
    let state = apply_all(state, &[Action::Flag]);
    assert!(state.flagged().unwrap().is_empty());
}

#[test]
fn flag_does_not_block_open() {
    let state = playing(Board::from_mines(2, 2, &[(0, 0)]).unwrap());
    let state = apply_all(state, &[mv(1, 1), Action::Flag, Action::Open]);
    assert!(state.is_revealed(1, 1));
    assert!(state.is_flagged(1, 1));
    assert_eq!(state.view(1, 1), Some(CellView::Open(1)));
}

#[test]
fn zero_mine_board_wins_in_one_open() {
    let state = playing(Board::from_mines(3, 3, &[]).unwrap());
    let state = apply_all(state, &[mv(1, 2), Action::Open]);
    assert_eq!(state.status(), Status::Won);
    assert_eq!(state.cursor(), None);
}

#[test]
fn numbered_open_stays_playing() {
    let state = playing(Board::from_mines(2, 2, &[(0, 0)]).unwrap());
    let state = apply_all(state, &[mv(1, 1), Action::Open]);
    assert_eq!(state.status(), Status::Playing);
    assert_eq!(state.revealed(), Some(&BTreeSet::from([3])));
    assert_eq!(state.cursor(), Some((1, 1)));
}

#[test]
fn opening_every_safe_cell_wins() {
    let state = playing(Board::from_mines(2, 2, &[(0, 0)]).unwrap());
    let state = apply_all(state, &[mv(1, 0), Action::Open, mv(0, 1), Action::Open]);
    assert_eq!(state.status(), Status::Playing);
    let state = apply_all(state, &[mv(-1, 0), Action::Open]);
    assert_eq!(state.status(), Status::Won);
    assert_eq!(state.view(0, 0), Some(CellView::Mine));
}

#[test]
fn opening_a_mine_loses() {
    let state = playing(Board::from_mines(2, 2, &[(0, 0)]).unwrap());
    let state = apply_all(state, &[Action::Flag, Action::Open]);
    assert_eq!(state.status(), Status::Lost);
    assert_eq!(state.flagged(), None);
    assert_eq!(state.revealed(), None);
    assert_eq!(state.view(0, 0), Some(CellView::Mine));
    assert_eq!(state.view(1, 1), Some(CellView::Open(1)));
}

#[test]
fn repeated_open_never_shrinks_revealed() {
    let state = playing(Board::from_mines(5, 5, &[(4, 4), (0, 4)]).unwrap());
    let state = apply_all(state, &[mv(2, 1), Action::Open]);
    let before = state.revealed().unwrap().clone();
    let state = apply_all(state, &[Action::Open, Action::Open]);
    let after = state.revealed().unwrap();
    assert!(before.is_subset(after));
    assert_eq!(&before, after);
}

#[test]
fn terminal_states_ignore_play_actions() {
    let lost = apply_all(playing(Board::from_mines(2, 2, &[(0, 0)]).unwrap()), &[Action::Open]);
    assert_eq!(lost.status(), Status::Lost);
    for action in [mv(1, 1), Action::Flag, Action::Open] {
        assert_eq!(apply_all(lost.clone(), &[action]), lost);
    }

    let won = apply_all(playing(Board::from_mines(2, 1, &[]).unwrap()), &[Action::Open]);
    assert_eq!(won.status(), Status::Won);
    assert_eq!(apply_all(won.clone(), &[mv(1, 0), Action::Open]), won);
}

#[test]
fn reset_after_loss_starts_fresh_game() {
    let state = playing(Board::from_mines(4, 3, &[(0, 0), (3, 2)]).unwrap());
    let lost = apply_all(state, &[Action::Open]);
    assert_eq!(lost.status(), Status::Lost);

    let fresh = lost.apply_with_rng(Action::Reset, &mut StdRng::seed_from_u64(9));
    assert_eq!(fresh.status(), Status::Playing);
    let board = fresh.board();
    assert_eq!((board.width(), board.height(), board.mines()), (4, 3, 2));
    assert_eq!(fresh.cursor(), Some((0, 0)));
    assert!(fresh.flagged().unwrap().is_empty());
    assert!(fresh.revealed().unwrap().is_empty());
}

#[test]
fn reset_mid_game_clears_progress() {
    let state = playing(Board::from_mines(3, 3, &[(2, 2)]).unwrap());
    let state = apply_all(state, &[mv(1, 0), Action::Flag, Action::Open, Action::Reset]);
    assert_eq!(state.status(), Status::Playing);
    assert_eq!(state.cursor(), Some((0, 0)));
    assert!(state.flagged().unwrap().is_empty());
    assert!(state.revealed().unwrap().is_empty());
    assert_eq!(state.board().mines(), 1);
}

#[test]
fn text_render_marks_cursor_and_cells() {
    let state = playing(Board::from_mines(2, 2, &[(0, 0)]).unwrap());
    let state = apply_all(state, &[mv(1, 1), Action::Open, mv(0, -1), Action::Flag]);
    let text = state.to_string();
    let rows: Vec<&str> = text.lines().skip(2).collect();
    assert_eq!(rows, [" 0 | . [F]", " 1 | .  1 "]);
    assert!(!text.contains('*'));
}
