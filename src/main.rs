use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use rand::rngs::StdRng;
use rand::SeedableRng;
use termsweeper::{logging, tui, Action, GameConfig, GameState, Status};

#[derive(Parser, Debug)]
#[command(name = "termsweeper", about = "Terminal Minesweeper", version)]
struct Args {
    /// Line-oriented text mode instead of the full-screen UI
    #[arg(long)]
    text: bool,
    /// Board width
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u16).range(1..))]
    width: u16,
    /// Board height
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..))]
    height: u16,
    /// Number of mines
    #[arg(long, visible_alias = "mines", default_value_t = 5)]
    difficulty: usize,
    /// Seed for mine placement, reused by every reset (0 = random)
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Append log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TextCommand {
    Apply(Action),
    Help,
    Quit,
}

fn text_command(c: char) -> Option<TextCommand> {
    let action = match c.to_ascii_lowercase() {
        'q' => return Some(TextCommand::Quit),
        'h' | '?' => return Some(TextCommand::Help),
        'w' => Action::Move { dx: 0, dy: -1 },
        'a' => Action::Move { dx: -1, dy: 0 },
        's' => Action::Move { dx: 0, dy: 1 },
        'd' => Action::Move { dx: 1, dy: 0 },
        'o' => Action::Open,
        'f' => Action::Flag,
        'r' => Action::Reset,
        _ => return None,
    };
    Some(TextCommand::Apply(action))
}

fn print_help() {
    println!("Commands (several may be typed on one line, e.g. 'ddso'):");
    println!("  w a s d - move the cursor up/left/down/right");
    println!("  o       - open the cell under the cursor");
    println!("  f       - toggle a flag under the cursor");
    println!("  r       - start a new game");
    println!("  q       - quit");
    println!("  h       - show this help");
}

fn run_text(mut state: GameState, rng: &mut StdRng) -> io::Result<()> {
    let board = state.board();
    println!("Minesweeper {}x{} with {} mines", board.width(), board.height(), board.mines());
    print_help();

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        println!("\n{}", state);
        match state.status() {
            Status::Won => println!("Congratulations! You cleared the board! 'r' to play again, 'q' to quit."),
            Status::Lost => println!("Boom! You hit a mine. 'r' to play again, 'q' to quit."),
            Status::Playing => {}
        }

        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 { return Ok(()); }

        for c in input.chars().filter(|c| !c.is_whitespace()) {
            match text_command(c) {
                Some(TextCommand::Quit) => return Ok(()),
                Some(TextCommand::Help) => print_help(),
                Some(TextCommand::Apply(action)) => { state = state.apply_with_rng(action, rng); }
                None => println!("Unknown command '{}'. Type 'h' for help.", c),
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        logging::init(path, args.verbose.log_level_filter())
            .with_context(|| format!("cannot open log file {}", path.display()))?;
    }

    let config = GameConfig { width: args.width.into(), height: args.height.into(), mines: args.difficulty };
    let mut rng = if args.seed != 0 { StdRng::seed_from_u64(args.seed) } else { StdRng::from_entropy() };
    let state = config.new_game(&mut rng).context("cannot start a game")?;

    if args.text {
        run_text(state, &mut rng)?;
    } else {
        tui::run_tui(state, &mut rng).context("terminal UI failed")?;
    }
    Ok(())
}
