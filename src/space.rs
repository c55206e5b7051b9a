use std::{
    array,
    collections::{BTreeSet, HashSet},
    fmt::Display,
    ops::RangeInclusive,
};

use crate::{CubeRect2D, CubeState};

const AXIS_NAMES: [&str; 4] = ["x", "y", "z", "w"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position<const D: usize>([isize; D]);

impl<const D: usize> Display for Position<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (ind, c) in self.0.iter().enumerate() {
            if ind != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}

impl<const D: usize> From<[isize; D]> for Position<D> {
    fn from(value: [isize; D]) -> Self {
        Self(value)
    }
}

impl<const D: usize> Position<D> {
    pub fn origin() -> Self {
        Self([0; D])
    }

    pub fn coord(&self, axis: usize) -> isize {
        self.0[axis]
    }

    pub fn coords(&self) -> &[isize; D] {
        &self.0
    }

    pub fn offset(&self, delta: &[isize; D]) -> Self {
        Self(array::from_fn(|axis| self.0[axis] + delta[axis]))
    }
}

/// Offsets to all 3^D - 1 neighbors, built once per dimension.
#[derive(Debug, Clone)]
pub struct NeighborOffsets<const D: usize> {
    offsets: Vec<[isize; D]>,
}

impl<const D: usize> Default for NeighborOffsets<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize> NeighborOffsets<D> {
    pub fn new() -> Self {
        let total_n = 3usize.pow(D as u32);
        let offsets = (0..total_n)
            .map(|mut code| {
                // Base 3 digits of code, the first axis is the most significant one.
                let mut delta = [0isize; D];
                for d in delta.iter_mut().rev() {
                    *d = (code % 3) as isize - 1;
                    code /= 3;
                }
                delta
            })
            .filter(|delta| delta.iter().any(|d| *d != 0))
            .collect();

        Self { offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn neighbors_of(&self, pos: &Position<D>) -> impl Iterator<Item = Position<D>> + '_ {
        let center = *pos;
        self.offsets.iter().map(move |delta| center.offset(delta))
    }
}

/// Sparse space of cubes, only active cubes are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CubeGrid<const D: usize> {
    cubes: HashSet<Position<D>>,
}

impl<const D: usize> FromIterator<Position<D>> for CubeGrid<D> {
    fn from_iter<T: IntoIterator<Item = Position<D>>>(iter: T) -> Self {
        Self {
            cubes: HashSet::from_iter(iter),
        }
    }
}

impl<const D: usize> From<&CubeRect2D> for CubeGrid<D> {
    fn from(value: &CubeRect2D) -> Self {
        assert!(
            D >= 2,
            "Space with lower dimension({}) can't be constructed from 2d rectangle area of cubes.",
            D
        );
        value
            .active_cells()
            .map(|(r_ind, c_ind)| {
                let mut pos = Position::<D>::origin();
                pos.0[0] = r_ind as isize;
                pos.0[1] = c_ind as isize;
                pos
            })
            .collect()
    }
}

impl<const D: usize> Display for CubeGrid<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(bounds) = self.bounds() else {
            return writeln!(f, "(empty)");
        };

        if D < 2 {
            let mut poss = self.cubes.iter().collect::<Vec<_>>();
            poss.sort();
            for pos in poss {
                writeln!(f, "{}", pos)?;
            }
            return Ok(());
        }

        // Higher axes (the last one first), so slices are printed in the order w, then z.
        let slices = self
            .cubes
            .iter()
            .map(|pos| pos.0[2..].iter().rev().copied().collect::<Vec<_>>())
            .collect::<BTreeSet<_>>();
        let mut slice_pos = Position::<D>::origin();
        for (s_ind, slice) in slices.iter().enumerate() {
            if s_ind != 0 {
                writeln!(f)?;
            }
            if D > 2 {
                for (ind, c) in slice.iter().rev().enumerate() {
                    let axis = ind + 2;
                    if ind != 0 {
                        write!(f, ", ")?;
                    }
                    match AXIS_NAMES.get(axis) {
                        Some(name) => write!(f, "{}={}", name, c)?,
                        None => write!(f, "d{}={}", axis, c)?,
                    }
                    slice_pos.0[axis] = *c;
                }
                writeln!(f)?;
            }

            for r in bounds[0].clone() {
                slice_pos.0[0] = r;
                for c in bounds[1].clone() {
                    slice_pos.0[1] = c;
                    write!(f, "{}", char::from(self.state(&slice_pos)))?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

impl<const D: usize> CubeGrid<D> {
    pub fn new() -> Self {
        Self {
            cubes: HashSet::new(),
        }
    }

    pub fn state(&self, pos: &Position<D>) -> CubeState {
        if self.cubes.contains(pos) {
            CubeState::Active
        } else {
            CubeState::Inactive
        }
    }

    pub fn is_active(&self, pos: &Position<D>) -> bool {
        self.cubes.contains(pos)
    }

    pub fn set(&mut self, pos: Position<D>, state: CubeState) {
        match state {
            CubeState::Active => {
                self.cubes.insert(pos);
            }
            CubeState::Inactive => {
                self.cubes.remove(&pos);
            }
        }
    }

    pub fn active_n(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn active_positions(&self) -> impl Iterator<Item = &Position<D>> + '_ {
        self.cubes.iter()
    }

    /// Smallest box containing all active cubes, `None` for an empty space.
    pub fn bounds(&self) -> Option<[RangeInclusive<isize>; D]> {
        let first = self.cubes.iter().next()?;
        let mut mins = first.0;
        let mut maxs = first.0;
        for pos in &self.cubes {
            for axis in 0..D {
                mins[axis] = mins[axis].min(pos.0[axis]);
                maxs[axis] = maxs[axis].max(pos.0[axis]);
            }
        }

        Some(array::from_fn(|axis| mins[axis]..=maxs[axis]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_position_is_inactive() {
        let mut grid = CubeGrid::<4>::new();
        grid.set(Position::from([1, 2, 3, 4]), CubeState::Active);
        assert_eq!(grid.state(&Position::from([1, 2, 3, 4])), CubeState::Active);
        assert_eq!(grid.state(&Position::origin()), CubeState::Inactive);
        assert_eq!(
            grid.state(&Position::from([isize::MAX, isize::MIN, 0, -7])),
            CubeState::Inactive
        );
    }

    #[test]
    fn set_inactive_removes_or_ignores() {
        let mut grid = CubeGrid::<3>::new();
        grid.set(Position::from([5, 5, 5]), CubeState::Inactive);
        assert!(grid.is_empty());

        grid.set(Position::from([0, 1, 0]), CubeState::Active);
        grid.set(Position::from([0, 1, 0]), CubeState::Active);
        assert_eq!(grid.active_n(), 1);
        grid.set(Position::from([0, 1, 0]), CubeState::Inactive);
        assert_eq!(grid.active_n(), 0);
    }

    #[test]
    fn neighbor_count_matches_dimension() {
        assert_eq!(NeighborOffsets::<1>::new().len(), 2);
        assert_eq!(NeighborOffsets::<2>::new().len(), 8);
        assert_eq!(NeighborOffsets::<3>::new().len(), 26);
        assert_eq!(NeighborOffsets::<4>::new().len(), 80);
        assert!(NeighborOffsets::<0>::new().is_empty());
    }

    #[test]
    fn neighbors_are_distinct_and_adjacent() {
        let offsets = NeighborOffsets::<4>::new();
        let center = Position::from([3, -2, 0, 7]);
        let neighbors = offsets.neighbors_of(&center).collect::<Vec<_>>();
        let distinct = neighbors.iter().copied().collect::<HashSet<_>>();
        assert_eq!(distinct.len(), 80);
        assert!(!distinct.contains(&center));
        assert!(neighbors.iter().all(|n| (0..4).all(|axis| (n.coord(axis) - center.coord(axis)).abs() <= 1)));
    }

    #[test]
    fn neighbor_order_is_deterministic() {
        let offsets = NeighborOffsets::<2>::new();
        let neighbors = offsets
            .neighbors_of(&Position::origin())
            .map(|p| *p.coords())
            .collect::<Vec<_>>();
        assert_eq!(
            neighbors,
            vec![[-1, -1], [-1, 0], [-1, 1], [0, -1], [0, 1], [1, -1], [1, 0], [1, 1]]
        );
        assert_eq!(
            neighbors,
            NeighborOffsets::<2>::new()
                .neighbors_of(&Position::origin())
                .map(|p| *p.coords())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn embed_rect_at_origin_of_higher_axes() {
        let rect = CubeRect2D::try_from(".#.\n..#\n###").unwrap();
        let grid = CubeGrid::<4>::from(&rect);
        assert_eq!(grid.active_n(), 5);
        assert!(grid.is_active(&Position::from([0, 1, 0, 0])));
        assert!(grid.is_active(&Position::from([1, 2, 0, 0])));
        assert!(!grid.is_active(&Position::from([1, 1, 0, 0])));
        assert!(grid.active_positions().all(|p| p.coord(2) == 0 && p.coord(3) == 0));
    }

    #[test]
    fn bounds_cover_active_cubes() {
        let grid = [[-1, 4, 0], [2, 0, -3]]
            .into_iter()
            .map(Position::from)
            .collect::<CubeGrid<3>>();
        assert_eq!(grid.bounds(), Some([-1..=2, 0..=4, -3..=0]));
        assert_eq!(CubeGrid::<3>::new().bounds(), None);
    }

    #[test]
    fn display_slices() {
        let rect = CubeRect2D::try_from(".#.\n..#\n###").unwrap();
        let mut grid = CubeGrid::<3>::from(&rect);
        assert_eq!(grid.to_string(), "z=0\n.#.\n..#\n###\n");

        grid.set(Position::from([0, 0, -1]), CubeState::Active);
        assert_eq!(grid.to_string(), "z=-1\n#..\n...\n...\n\nz=0\n.#.\n..#\n###\n");
        assert_eq!(CubeGrid::<4>::new().to_string(), "(empty)\n");
    }

    #[test]
    fn display_orders_by_highest_axis_first() {
        let grid = [[0, 0, 1, 0], [0, 0, 0, 1]]
            .into_iter()
            .map(Position::from)
            .collect::<CubeGrid<4>>();
        assert_eq!(grid.to_string(), "z=1, w=0\n#\n\nz=0, w=1\n#\n");
    }
}
