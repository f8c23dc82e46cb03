use std::convert::TryFrom;
use std::fmt;

use ndarray::Array2;
use rand::{
    distributions::{Distribution, Poisson, Standard},
    Rng,
};
use tracing::debug;

use crate::config::LawnConfig;
use crate::error::{LawnError, Result};

// Action direction, shared by movement and raking
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Up,
    Left,
    Right,
}

impl Direction {
    pub fn into_vector(self) -> (isize, isize)
    {
        match self {
            Direction::Down  => ( 0,-1),
            Direction::Up    => ( 0, 1),
            Direction::Left  => (-1, 0),
            Direction::Right => ( 1, 0),
        }
    }

    /// Integer encoding: 0 down, 1 up, 2 left, 3 right.
    pub fn code(self) -> u8 {
        match self {
            Direction::Down => 0,
            Direction::Up => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn all() -> [Direction; 4] {
        [Direction::Down, Direction::Up, Direction::Left, Direction::Right]
    }
}

impl TryFrom<u8> for Direction {
    type Error = LawnError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Direction::Down),
            1 => Ok(Direction::Up),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            _ => Err(LawnError::InvalidDirection(code)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

impl Distribution<Direction> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        match rng.gen_range(0, 4) {
            0 => Direction::Down,
            1 => Direction::Up,
            2 => Direction::Left,
            _ => Direction::Right,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub fn new(x: usize, y: usize) -> Self {
        Pos { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The leaf field. `cells[[x, y]]` holds the leaves on column `x`, row `y`.
#[derive(Debug, Clone)]
pub struct Lawn {
    cells: Array2<f64>,
    cell_capacity: f64,
    non_negative: bool,
}

impl Lawn {
    /// Builds the lawn from its config. The random source is only drawn from
    /// when `random_seed` asks for a Poisson fill.
    pub fn new<R: Rng + ?Sized>(config: &LawnConfig, rng: &mut R) -> Result<Self>
    {
        config.validate()?;
        let shape = (config.m, config.n);
        let capacity = config.cell_capacity;

        let cells = if !config.random_seed {
            Array2::from_elem(shape, config.initial_seed)
        } else if config.initial_seed > 0.0 {
            let poisson = Poisson::new(config.initial_seed);
            Array2::from_shape_fn(shape, |_| {
                let draw: u64 = poisson.sample(&mut *rng);
                (draw as f64).min(capacity)
            })
        } else {
            // Poisson(0) is always zero
            Array2::zeros(shape)
        };

        let lawn = Self {
            cells,
            cell_capacity: capacity,
            non_negative: config.non_negative,
        };
        debug!(
            m = config.m,
            n = config.n,
            random = config.random_seed,
            leaves = lawn.total_leaves(),
            "lawn seeded"
        );
        Ok(lawn)
    }

    /// Builds a lawn from an explicit leaf field.
    pub fn from_cells(cells: Array2<f64>, cell_capacity: f64, non_negative: bool) -> Result<Self>
    {
        if cells.len() == 0 {
            return Err(LawnError::invalid("cells", "lawn must have at least one cell"));
        }
        if !cell_capacity.is_finite() || cell_capacity < 0.0 {
            return Err(LawnError::invalid(
                "cell_capacity",
                format!("{} must be a finite number >= 0", cell_capacity),
            ));
        }
        if let Some(bad) = cells.iter().find(|v| !(**v >= 0.0 && **v <= cell_capacity)) {
            return Err(LawnError::invalid(
                "cells",
                format!("{} is outside [0, {}]", bad, cell_capacity),
            ));
        }
        Ok(Self {
            cells,
            cell_capacity,
            non_negative,
        })
    }

    pub fn width(&self) -> usize {
        self.cells.dim().0
    }

    pub fn height(&self) -> usize {
        self.cells.dim().1
    }

    pub fn size(&self) -> Pos {
        Pos::new(self.width(), self.height())
    }

    pub fn cell_capacity(&self) -> f64 {
        self.cell_capacity
    }

    pub fn non_negative(&self) -> bool {
        self.non_negative
    }

    /// Read-only view of the whole field, e.g. for a heatmap.
    pub fn cells(&self) -> &Array2<f64> {
        &self.cells
    }

    pub fn cell(&self, pos: Pos) -> f64 {
        self.cells[[pos.x, pos.y]]
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width() && pos.y < self.height()
    }

    /// Fails with `PositionOutOfBounds` unless `pos` is on this lawn.
    pub fn check_contains(&self, pos: Pos) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(LawnError::PositionOutOfBounds {
                x: pos.x as i64,
                y: pos.y as i64,
                m: self.width(),
                n: self.height(),
            })
        }
    }

    /// Cell next to `pos` in `direction`, or `None` past the lawn edge.
    pub fn neighbour(&self, pos: Pos, direction: Direction) -> Option<Pos>
    {
        let (dx, dy) = direction.into_vector();
        let x = pos.x as isize + dx;
        let y = pos.y as isize + dy;
        if x < 0 || y < 0 {
            return None;
        }
        let target = Pos::new(x as usize, y as usize);
        if self.contains(target) {
            Some(target)
        } else {
            None
        }
    }

    pub fn total_leaves(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Moves up to `amount` leaves from `source` to `target` and returns what
    /// was actually moved. The target never goes above the cell capacity; a
    /// full target takes nothing. The source is only protected from going
    /// negative on a non-negative lawn.
    ///
    /// # Panics
    /// If either position is outside the lawn.
    pub fn apply_transfer(&mut self, amount: f64, source: Pos, target: Pos) -> f64
    {
        let headroom = (self.cell_capacity - self.cell(target)).max(0.0);
        let mut moved = amount.min(headroom);
        if self.non_negative {
            moved = moved.min(self.cell(source)).max(0.0);
        }

        self.cells[[source.x, source.y]] -= moved;
        self.cells[[target.x, target.y]] += moved;
        moved
    }

    /// Takes `amount` leaves off the cell at `pos` and returns what was taken.
    /// Unclamped unless the lawn is non-negative.
    ///
    /// # Panics
    /// If `pos` is outside the lawn.
    pub fn apply_removal(&mut self, amount: f64, pos: Pos) -> f64
    {
        let mut removed = amount;
        if self.non_negative {
            removed = removed.min(self.cell(pos)).max(0.0);
        }
        self.cells[[pos.x, pos.y]] -= removed;
        removed
    }

    /// Every cell position, column by column.
    pub fn iter_all_coordinates(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells.indexed_iter().map(|((x, y), _)| Pos::new(x, y))
    }
}
