use std::collections::HashSet;

#[cfg(feature = "multithread")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    space::{CubeGrid, NeighborOffsets, Position},
    CubeState, DEFAULT_STEP_COUNT,
};

/// Applies the B3/S23 rule to every cube which may change in one generation.
#[derive(Debug, Clone, Default)]
pub struct TransitionEngine<const D: usize> {
    offsets: NeighborOffsets<D>,
}

impl<const D: usize> TransitionEngine<D> {
    pub fn new() -> Self {
        Self {
            offsets: NeighborOffsets::new(),
        }
    }

    pub fn step(&self, grid: &CubeGrid<D>) -> CubeGrid<D> {
        // Only active cubes and their neighbors can be active in next generation.
        let candidates = grid
            .active_positions()
            .flat_map(|pos| self.offsets.neighbors_of(pos).chain(std::iter::once(*pos)))
            .collect::<HashSet<_>>();

        #[cfg(feature = "multithread")]
        let next_actives = candidates
            .into_par_iter()
            .filter(|pos| self.next_state(grid, pos) == CubeState::Active)
            .collect::<Vec<_>>();
        #[cfg(not(feature = "multithread"))]
        let next_actives = candidates
            .into_iter()
            .filter(|pos| self.next_state(grid, pos) == CubeState::Active);

        next_actives.into_iter().collect()
    }

    pub fn next_state(&self, grid: &CubeGrid<D>, pos: &Position<D>) -> CubeState {
        match (grid.state(pos), self.active_neighbors_n(grid, pos)) {
            (CubeState::Active, 2 | 3) => CubeState::Active,
            (CubeState::Inactive, 3) => CubeState::Active,
            _ => CubeState::Inactive,
        }
    }

    // Counting stops at 4, the rule doesn't tell 4 from more.
    fn active_neighbors_n(&self, grid: &CubeGrid<D>, pos: &Position<D>) -> usize {
        self.offsets
            .neighbors_of(pos)
            .filter(|n_pos| grid.is_active(n_pos))
            .take(4)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    pub generations: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_COUNT)
    }
}

impl SimConfig {
    pub fn new(generations: usize) -> Self {
        Self { generations }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Idle,
    Running,
    Done,
}

pub struct CubeSpaceSimulator<const D: usize> {
    engine: TransitionEngine<D>,
    grid: CubeGrid<D>,
    config: SimConfig,
    generation: usize,
}

impl<const D: usize> CubeSpaceSimulator<D> {
    pub fn new(init_grid: CubeGrid<D>, config: SimConfig) -> Self {
        Self {
            engine: TransitionEngine::new(),
            grid: init_grid,
            config,
            generation: 0,
        }
    }

    pub fn state(&self) -> SimState {
        if self.generation >= self.config.generations {
            SimState::Done
        } else if self.generation == 0 {
            SimState::Idle
        } else {
            SimState::Running
        }
    }

    /// Returns false if all configured generations have been simulated.
    pub fn step(&mut self) -> bool {
        if self.state() == SimState::Done {
            return false;
        }

        self.grid = self.engine.step(&self.grid);
        self.generation += 1;
        true
    }

    pub fn run(&mut self) -> &CubeGrid<D> {
        self.run_with(|_, _| {})
    }

    /// Run to the end, `observer` sees every new generation.
    pub fn run_with<F>(&mut self, mut observer: F) -> &CubeGrid<D>
    where
        F: FnMut(usize, &CubeGrid<D>),
    {
        while self.step() {
            observer(self.generation, &self.grid);
        }

        &self.grid
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &CubeGrid<D> {
        &self.grid
    }

    pub fn active_n(&self) -> usize {
        self.grid.active_n()
    }

    pub fn into_grid(self) -> CubeGrid<D> {
        self.grid
    }
}

pub fn run<const D: usize>(init_grid: CubeGrid<D>, generations: usize) -> CubeGrid<D> {
    let mut simulator = CubeSpaceSimulator::new(init_grid, SimConfig::new(generations));
    simulator.run();
    simulator.into_grid()
}
