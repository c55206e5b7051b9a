use std::{
    error,
    fmt::Display,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use clap::Parser;

pub mod sim;
pub mod space;

pub use sim::{run, CubeSpaceSimulator, SimConfig, SimState, TransitionEngine};
pub use space::{CubeGrid, NeighborOffsets, Position};

pub const DEFAULT_STEP_COUNT: usize = 6;

#[derive(Debug)]
pub enum Error {
    IOError(io::Error),
    InconsistentCubeRectRow(usize, usize), // (count of column in given row, count of column in earlier row(s)).
    InvalidCubeStateChar(char),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IOError(ioe) => write!(f, "I/O error: {}", ioe),
            Error::InconsistentCubeRectRow(this_col_n, expect_col_n) => write!(
                f,
                "Found inconsistent column count({}) in given row, expect {} columns as in earlier row(s).",
                this_col_n, expect_col_n
            ),
            Error::InvalidCubeStateChar(c) => write!(f, "Invalid character({}) for cube state.", c),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    pub input_path: PathBuf,
    /// Count of generations to simulate.
    #[arg(short, long, default_value_t = DEFAULT_STEP_COUNT)]
    pub steps: usize,
    /// Print progress of every generation and the final space to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeState {
    Inactive,
    Active,
}

impl TryFrom<char> for CubeState {
    type Error = Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '.' => Ok(CubeState::Inactive),
            '#' => Ok(CubeState::Active),
            other => Err(Error::InvalidCubeStateChar(other)),
        }
    }
}

impl From<CubeState> for char {
    fn from(value: CubeState) -> Self {
        match value {
            CubeState::Inactive => '.',
            CubeState::Active => '#',
        }
    }
}

/// Initial slice of cubes, rows run along the first axis and columns along the second one.
#[derive(Debug, Clone)]
pub struct CubeRect2D {
    states: Vec<CubeState>,
    row_n: usize,
    col_n: usize,
}

impl TryFrom<&str> for CubeRect2D {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut builder = CubeRect2DBuilder::new();
        for line in value.lines() {
            builder.push_row(line)?;
        }

        Ok(builder.build())
    }
}

impl CubeRect2D {
    pub fn row_n(&self) -> usize {
        self.row_n
    }

    pub fn col_n(&self) -> usize {
        self.col_n
    }

    pub fn state(&self, r_ind: usize, c_ind: usize) -> Option<CubeState> {
        if c_ind >= self.col_n {
            return None;
        }

        self.states.get(r_ind * self.col_n + c_ind).copied()
    }

    /// (row, column) of every active cube.
    pub fn active_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == CubeState::Active)
            .map(|(ind, _)| (ind / self.col_n, ind % self.col_n))
    }
}

struct CubeRect2DBuilder {
    states: Vec<CubeState>,
    row_n: usize,
    col_n: Option<usize>,
}

impl CubeRect2DBuilder {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            row_n: 0,
            col_n: None,
        }
    }

    pub fn push_row(&mut self, row_text: &str) -> Result<(), Error> {
        let row_text = row_text.trim_end_matches('\r');
        let this_col_n = row_text.chars().count();
        let expect_col_n = *self.col_n.get_or_insert(this_col_n);
        if expect_col_n != this_col_n {
            return Err(Error::InconsistentCubeRectRow(this_col_n, expect_col_n));
        }

        for c in row_text.chars() {
            self.states.push(CubeState::try_from(c)?);
        }

        self.row_n += 1;
        Ok(())
    }

    pub fn build(self) -> CubeRect2D {
        CubeRect2D {
            states: self.states,
            row_n: self.row_n,
            col_n: self.col_n.unwrap_or(0),
        }
    }
}

pub fn read_state<P: AsRef<Path>>(path: P) -> Result<CubeRect2D, Error> {
    let file = File::open(path).map_err(Error::IOError)?;
    let reader = BufReader::new(file);
    let mut builder = CubeRect2DBuilder::new();
    for line in reader.lines() {
        let s = line.map_err(Error::IOError)?;
        builder.push_row(&s)?;
    }

    Ok(builder.build())
}

/// Embed given slice in `D` dimensional space, and count active cubes after `step_n` generations.
pub fn simulate<const D: usize>(init_states: &CubeRect2D, step_n: usize) -> usize {
    let mut simulator =
        CubeSpaceSimulator::<D>::new(CubeGrid::from(init_states), SimConfig::new(step_n));
    simulator.run().active_n()
}
