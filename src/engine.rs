use std::collections::BTreeSet;

use rand::Rng;

use crate::error::{GameError, Result};

const NEIGHBORS: [(isize, isize); 8] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];
const CARDINALS: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Mine,
    /// Safe cell with the number of mines among its eight neighbors.
    Empty(u8),
}

impl Cell {
    pub fn is_mine(&self) -> bool { matches!(self, Cell::Mine) }

    pub fn adjacent(&self) -> Option<u8> {
        match self {
            Cell::Mine => None,
            Cell::Empty(n) => Some(*n),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealResult {
    HitMine,
    /// Flattened indices of every cell opened by the guess, target included.
    Opened(BTreeSet<usize>),
}

/// Immutable minefield. Cells are stored row-major, `y * width + x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    mines: usize,
    cells: Vec<Cell>,
    safe: BTreeSet<usize>,
}

impl Board {
    /// Generate a board using the thread-local RNG.
    pub fn generate(width: usize, height: usize, mines: usize) -> Result<Self> {
        Self::generate_with_rng(width, height, mines, &mut rand::thread_rng())
    }

    /// Place `mines` mines uniformly at random, without replacement.
    ///
    /// Fails if either dimension is zero or the mines do not fit; the count is never clamped.
    pub fn generate_with_rng<R: Rng + ?Sized>(width: usize, height: usize, mines: usize, rng: &mut R) -> Result<Self> {
        check_config(width, height, mines)?;
        let board = Self::place_mines(width, height, mines, rng);
        log::debug!("generated {}x{} board with {} mines", width, height, mines);
        Ok(board)
    }

    /// Fresh random layout with this board's dimensions and mine count.
    pub fn regenerate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self::place_mines(self.width, self.height, self.mines, rng)
    }

    fn place_mines<R: Rng + ?Sized>(width: usize, height: usize, mines: usize, rng: &mut R) -> Self {
        let total = width * height;
        let mut cells = vec![Cell::Empty(0); total];

        let mut candidates: Vec<usize> = (0..total).collect();
        for _ in 0..mines {
            let pick = rng.gen_range(0..candidates.len());
            cells[candidates.swap_remove(pick)] = Cell::Mine;
        }
        // whatever was never drawn is safe
        let safe = candidates.into_iter().collect();

        let mut board = Self { width, height, mines, cells, safe };
        board.compute_adjacency();
        board
    }

    /// Build a board with mines at fixed coordinates. Duplicate coordinates count once.
    pub fn from_mines(width: usize, height: usize, mines: &[(usize, usize)]) -> Result<Self> {
        check_config(width, height, 0)?;
        let mut cells = vec![Cell::Empty(0); width * height];
        for &(x, y) in mines {
            if x >= width || y >= height {
                let distinct: BTreeSet<&(usize, usize)> = mines.iter().collect();
                return Err(GameError::InvalidConfiguration { width, height, mines: distinct.len() });
            }
            cells[idx(width, x, y)] = Cell::Mine;
        }
        let safe: BTreeSet<usize> = (0..cells.len()).filter(|&i| !cells[i].is_mine()).collect();
        let mines = cells.len() - safe.len();

        let mut board = Self { width, height, mines, cells, safe };
        board.compute_adjacency();
        Ok(board)
    }

    fn compute_adjacency(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let i0 = idx(self.width, x, y);
                if self.cells[i0].is_mine() { continue; }
                let mut c = 0u8;
                for (nx, ny) in offsets_in_bounds(self.width, self.height, x, y, &NEIGHBORS) {
                    if self.cells[idx(self.width, nx, ny)].is_mine() { c += 1; }
                }
                self.cells[i0] = Cell::Empty(c);
            }
        }
    }

    /// Guess the cell at `(x, y)`, which must be in bounds.
    ///
    /// A safe guess opens the target and floods outward through zero-count cells
    /// in the four cardinal directions. Numbered cells are opened but stop the flood.
    pub fn reveal(&self, (x, y): (usize, usize)) -> RevealResult {
        if self.cells[idx(self.width, x, y)].is_mine() { return RevealResult::HitMine; }

        let mut opened = BTreeSet::new();
        let mut stack = vec![(x, y)];
        while let Some((cx, cy)) = stack.pop() {
            let i = idx(self.width, cx, cy);
            if !opened.insert(i) { continue; }
            if self.cells[i] != Cell::Empty(0) { continue; }
            for (nx, ny) in offsets_in_bounds(self.width, self.height, cx, cy, &CARDINALS) {
                let ni = idx(self.width, nx, ny);
                if !self.cells[ni].is_mine() && !opened.contains(&ni) {
                    stack.push((nx, ny));
                }
            }
        }
        RevealResult::Opened(opened)
    }
}

fn check_config(width: usize, height: usize, mines: usize) -> Result<()> {
    let fits = width.checked_mul(height).is_some_and(|total| mines <= total);
    if width == 0 || height == 0 || !fits {
        return Err(GameError::InvalidConfiguration { width, height, mines });
    }
    Ok(())
}

fn idx(w: usize, x: usize, y: usize) -> usize { y * w + x }

fn offsets_in_bounds(w: usize, h: usize, x: usize, y: usize, offsets: &[(isize, isize)]) -> impl Iterator<Item = (usize, usize)> + '_ {
    offsets.iter().filter_map(move |&(dx, dy)| {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < w && ny < h).then_some((nx, ny))
    })
}

// Public getters for renderers
impl Board {
    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn mines(&self) -> usize { self.mines }
    pub fn safe_cells(&self) -> &BTreeSet<usize> { &self.safe }
    pub fn index(&self, x: usize, y: usize) -> usize { idx(self.width, x, y) }
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height { Some(self.cells[idx(self.width, x, y)]) } else { None }
    }
}
