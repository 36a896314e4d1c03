use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {mines} mines on a {width}x{height} board")]
    InvalidConfiguration { width: usize, height: usize, mines: usize },
}

pub type Result<T> = core::result::Result<T, GameError>;
