use std::io;
use std::time::Duration;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::Rng;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;

use crate::state::{Action, CellView, GameState, Status};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Apply(Action),
    Quit,
}

/// Keyboard layout: arrows, WASD or HJKL move; space/Enter open; f flag; r/n reset; q/Esc quit.
pub fn command_for_key(code: KeyCode) -> Option<Command> {
    let action = match code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Command::Quit),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Action::Move { dx: -1, dy: 0 },
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Action::Move { dx: 1, dy: 0 },
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Action::Move { dx: 0, dy: -1 },
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Action::Move { dx: 0, dy: 1 },
        KeyCode::Char(' ') | KeyCode::Enter => Action::Open,
        KeyCode::Char('f') => Action::Flag,
        KeyCode::Char('r') | KeyCode::Char('n') => Action::Reset,
        _ => return None,
    };
    Some(Command::Apply(action))
}

/// Clicking a cell moves the cursor onto it, then opens (left) or flags (right) it.
pub fn click_actions(cursor: (usize, usize), target: (usize, usize), button: MouseButton) -> Option<[Action; 2]> {
    let second = match button {
        MouseButton::Left => Action::Open,
        MouseButton::Right => Action::Flag,
        MouseButton::Middle => return None,
    };
    let dx = target.0 as isize - cursor.0 as isize;
    let dy = target.1 as isize - cursor.1 as isize;
    Some([Action::Move { dx, dy }, second])
}

pub fn run_tui<R: Rng + ?Sized>(mut state: GameState, rng: &mut R) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let _guard = TermGuard;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(250);

    let mut last_inner_board = Rect::default();
    let res = loop {
        terminal.draw(|f| { last_inner_board = ui(f, &state); })?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    log::trace!("key {:?}", key.code);
                    match command_for_key(key.code) {
                        Some(Command::Quit) => break Ok(()),
                        Some(Command::Apply(action)) => { state = state.apply_with_rng(action, rng); }
                        None => {}
                    }
                }
                Event::Mouse(m) => {
                    if let MouseEventKind::Down(btn) = m.kind {
                        let board = state.board();
                        let target = pos_to_cell(m.column, m.row, last_inner_board, board.width() as u16, board.height() as u16);
                        if let (Some(cursor), Some((cx, cy))) = (state.cursor(), target) {
                            log::trace!("{:?} click at ({}, {})", btn, cx, cy);
                            if let Some(actions) = click_actions(cursor, (cx as usize, cy as usize), btn) {
                                for action in actions {
                                    state = state.apply_with_rng(action, rng);
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    };

    terminal.show_cursor()?;
    res
}

fn ui(f: &mut ratatui::Frame, state: &GameState) -> Rect {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.size());

    let (status, color) = match state.status() {
        Status::Playing => ("Mouse: left=open, right=flag • Arrows/WASD/HJKL move • Space open • f flag • r reset • q quit", Color::Cyan),
        Status::Won => ("You won! r to play again, q to quit", Color::Green),
        Status::Lost => ("You lost... r to play again, q to quit", Color::Red),
    };
    let header = Paragraph::new(status)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Minesweeper"));
    f.render_widget(header, root[0]);

    let board = state.board();
    let area = centered_grid_area(root[1], board.width() as u16, board.height() as u16);
    let inner = inner_area(area);
    draw_board(f, state, area);

    let flags = state.flagged().map_or(0, |f| f.len());
    let footer = Paragraph::new(format!("Size: {}x{}  Mines: {}  Flags: {}", board.width(), board.height(), board.mines(), flags))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, root[2]);
    inner
}

fn centered_grid_area(parent: Rect, cols: u16, rows: u16) -> Rect {
    // one char + one space per cell, plus the block border
    let grid_w = cols.saturating_mul(2).saturating_add(2);
    let grid_h = rows.saturating_add(2);
    let x = parent.x.saturating_add((parent.width.saturating_sub(grid_w)) / 2);
    let y = parent.y.saturating_add((parent.height.saturating_sub(grid_h)) / 2);
    Rect { x, y, width: grid_w.min(parent.width), height: grid_h.min(parent.height) }
}

fn draw_board(f: &mut ratatui::Frame, state: &GameState, area: Rect) {
    let board = state.board();
    let mine_style = match state.status() {
        Status::Won => Style::default().fg(Color::Green),
        _ => Style::default().fg(Color::Red),
    };
    let mut lines: Vec<Line> = Vec::with_capacity(board.height());
    for y in 0..board.height() {
        let mut spans: Vec<Span> = Vec::with_capacity(board.width());
        for x in 0..board.width() {
            let (mut ch, mut style) = match state.view(x, y) {
                Some(CellView::Mine) => ('*', mine_style),
                Some(CellView::Flagged) => ('F', Style::default().fg(Color::Yellow)),
                Some(CellView::Open(0)) => (' ', number_style(0)),
                Some(CellView::Open(n)) => (char::from_digit(n as u32, 10).unwrap_or('?'), number_style(n)),
                Some(CellView::Hidden) | None => ('·', Style::default().fg(Color::DarkGray)),
            };

            if state.cursor() == Some((x, y)) {
                style = style.add_modifier(Modifier::REVERSED);
                if ch == ' ' { ch = '·'; }
            }

            spans.push(Span::styled(format!("{} ", ch), style));
        }
        lines.push(Line::from(spans));
    }

    let para = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Board"));
    f.render_widget(para, area);
}

fn number_style(n: u8) -> Style {
    match n {
        0 => Style::default().fg(Color::Gray),
        1 => Style::default().fg(Color::Blue),
        2 => Style::default().fg(Color::Green),
        3 => Style::default().fg(Color::Red),
        4 => Style::default().fg(Color::Magenta),
        5 => Style::default().fg(Color::Yellow),
        6 => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::White),
    }
}

fn inner_area(area: Rect) -> Rect {
    // Match Block::inner() for Borders::ALL: shrink by 1 on each side
    Rect { x: area.x.saturating_add(1), y: area.y.saturating_add(1), width: area.width.saturating_sub(2), height: area.height.saturating_sub(2) }
}

fn pos_to_cell(mx: u16, my: u16, inner: Rect, cols: u16, rows: u16) -> Option<(u16, u16)> {
    if mx < inner.x || my < inner.y { return None; }
    let cx = (mx - inner.x) / 2; // must match the two-column cell width in draw_board
    let cy = my - inner.y;
    if cx < cols && cy < rows { Some((cx, cy)) } else { None }
}

struct TermGuard;
impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}
