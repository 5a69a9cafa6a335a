//! Battlefield grid: fixed-size board of cells with 1-based coordinates.

use alloc::vec::Vec;
use core::fmt;

use crate::engine::common::{Coordinate, Direction, GridError};
use crate::engine::distance::DistanceField;

/// One board position and the derived fields that persist across turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    coord: Coordinate,
    index: usize,
    blocked: bool,
    /// Strength of whatever was detected here this turn; 0 when empty.
    pub occupant_size: u32,
    /// Hops from the current roaming destination; `None` when unset.
    pub path_dist: Option<u32>,
    /// Hops from the nearest live detection epicenter; 0 when none known.
    pub contact_dist: u32,
    /// Turns since `contact_dist` was refreshed here.
    pub contact_age: u32,
    /// Scratch marker reused by every detection pass.
    pub visited: bool,
}

impl Cell {
    fn new(coord: Coordinate, index: usize) -> Self {
        Self {
            coord,
            index,
            blocked: false,
            occupant_size: 0,
            path_dist: None,
            contact_dist: 0,
            contact_age: 0,
            visited: false,
        }
    }

    pub fn coord(&self) -> Coordinate {
        self.coord
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// `true` for permanent obstacles.
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }
}

/// Row-major board of `width x height` cells.
#[derive(Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate an empty grid. Both dimensions must be at least 1.
    pub fn new(width: usize, height: usize) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 1..=height {
            for x in 1..=width {
                let index = cells.len();
                cells.push(Cell::new(Coordinate::new(x as i32, y as i32), index));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `true` when `coord` lies on the board.
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.x >= 1
            && coord.y >= 1
            && (coord.x as usize) <= self.width
            && (coord.y as usize) <= self.height
    }

    /// Row-major index of `coord`.
    pub fn index_of(&self, coord: Coordinate) -> Result<usize, GridError> {
        if !self.contains(coord) {
            return Err(GridError::CoordOutOfBounds {
                x: coord.x,
                y: coord.y,
            });
        }
        Ok((coord.x as usize - 1) + (coord.y as usize - 1) * self.width)
    }

    /// Coordinate stored at `index`.
    pub fn coord_of(&self, index: usize) -> Result<Coordinate, GridError> {
        if index >= self.cells.len() {
            return Err(GridError::IndexOutOfBounds {
                index,
                len: self.cells.len(),
            });
        }
        let x = (index % self.width) + 1;
        let y = (index / self.width) + 1;
        Ok(Coordinate::new(x as i32, y as i32))
    }

    pub fn cell(&self, index: usize) -> Result<&Cell, GridError> {
        let len = self.cells.len();
        self.cells
            .get(index)
            .ok_or(GridError::IndexOutOfBounds { index, len })
    }

    pub fn cell_mut(&mut self, index: usize) -> Result<&mut Cell, GridError> {
        let len = self.cells.len();
        self.cells
            .get_mut(index)
            .ok_or(GridError::IndexOutOfBounds { index, len })
    }

    pub fn cell_at(&self, coord: Coordinate) -> Result<&Cell, GridError> {
        let idx = self.index_of(coord)?;
        Ok(&self.cells[idx])
    }

    pub fn cell_at_mut(&mut self, coord: Coordinate) -> Result<&mut Cell, GridError> {
        let idx = self.index_of(coord)?;
        Ok(&mut self.cells[idx])
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Mark `coord` as a permanent obstacle.
    pub fn block(&mut self, coord: Coordinate) -> Result<(), GridError> {
        let cell = self.cell_at_mut(coord)?;
        cell.blocked = true;
        cell.occupant_size = 0;
        cell.path_dist = None;
        cell.contact_dist = 0;
        cell.contact_age = 0;
        Ok(())
    }

    pub fn is_blocked(&self, coord: Coordinate) -> Result<bool, GridError> {
        Ok(self.cell_at(coord)?.blocked)
    }

    /// In-bounds neighbours of `coord` in canonical N, E, S, W order.
    pub fn neighbors(&self, coord: Coordinate) -> impl Iterator<Item = (Direction, Coordinate)> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |dir| (dir, coord.shifted(dir)))
            .filter(move |(_, c)| self.contains(*c))
    }

    /// Neighbour indices of the cell at `index`, canonical order.
    pub(crate) fn neighbor_indices(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let coord = self.cells[index].coord;
        self.neighbors(coord)
            .map(move |(_, c)| (c.x as usize - 1) + (c.y as usize - 1) * self.width)
    }

    /// Zero this turn's detected occupant sizes. Obstacles are untouched.
    pub fn clear_occupants(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.occupant_size = 0;
        }
    }

    pub fn reset_path_distances(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.path_dist = None;
        }
    }

    /// Copy a propagated field into every cell's `path_dist`.
    pub fn store_path_distances(&mut self, field: &DistanceField) {
        for cell in self.cells.iter_mut() {
            cell.path_dist = field.distance(cell.index);
        }
    }

    /// Unblocked cells in index order.
    pub fn open_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| !c.blocked)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{} {{", self.width, self.height)?;
        for row in self.cells.chunks(self.width.max(1)) {
            write!(f, "  ")?;
            for cell in row {
                let ch = if cell.blocked {
                    '#'
                } else if cell.occupant_size > 0 {
                    'O'
                } else if cell.contact_dist > 0 {
                    '~'
                } else {
                    '.'
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}
