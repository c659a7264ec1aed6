//! Blue-noise (Poisson-disk) point sampling over an axis-aligned rectangle.
//!
//! Samples are grown outward from one random seed point. Each accepted point
//! stays on an active list until `attempts` random candidates around it have
//! all been rejected. A uniform grid whose cells are `radius` wide makes the
//! spacing check constant time: a cell holds at most one accepted point, and
//! any point closer than `radius` to a candidate lies in the candidate's cell
//! or one of its eight neighbours.
//!
//! This component is independent of the curve engine.

use std::f64::consts::TAU;

use rand::Rng;
use tracing::debug;

use crate::{
    error::{Error, Result},
    point::Point2,
};

/// Default number of candidates tried around an active point.
pub const ATTEMPTS: usize = 30;

/// Largest grid the sampler will allocate.
const MAX_CELLS: usize = 1 << 24;

/// Parameters of a sampling run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoissonConfig {
    /// Width of the sampled region `[0, width)`.
    pub width: f64,
    /// Height of the sampled region `[0, height)`.
    pub height: f64,
    /// Minimum distance between any two samples.
    pub radius: f64,
    /// Candidates tried per active point before it is retired.
    pub attempts: usize,
    /// Optional cap on outer iterations. `None` runs until the active list is
    /// empty.
    pub max_iterations: Option<usize>,
}

impl Default for PoissonConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
            radius: 1.0,
            attempts: ATTEMPTS,
            max_iterations: None,
        }
    }
}

/// Result of a sampling run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sampling {
    /// Accepted points in acceptance order.
    pub points: Vec<Point2>,
    /// `(parent, child)` indices into `points`: which active point spawned
    /// each accepted point.
    pub edges: Vec<(usize, usize)>,
    /// Outer iterations performed.
    pub iterations: usize,
}

/// Occupancy grid with one slot per `radius`-sized cell.
#[derive(Debug)]
struct Grid {
    /// Cell edge length.
    cell: f64,
    /// Number of columns.
    cols: usize,
    /// Number of rows.
    rows: usize,
    /// Index of the point occupying each cell, row-major.
    slots: Vec<Option<usize>>,
}

impl Grid {
    /// An empty grid covering `width x height`.
    fn new(width: f64, height: f64, cell: f64) -> Self {
        let cols = ((width / cell).ceil() as usize).max(1);
        let rows = ((height / cell).ceil() as usize).max(1);
        Self {
            cell,
            cols,
            rows,
            slots: vec![None; cols * rows],
        }
    }

    /// Column and row of the cell containing `p`.
    fn cell_of(&self, p: Point2) -> (usize, usize) {
        let col = ((p.x / self.cell) as usize).min(self.cols - 1);
        let row = ((p.y / self.cell) as usize).min(self.rows - 1);
        (col, row)
    }

    /// The point index stored in a cell.
    fn get(&self, col: usize, row: usize) -> Option<usize> {
        self.slots[row * self.cols + col]
    }

    /// Record `index` as the occupant of the cell containing `p`.
    fn insert(&mut self, p: Point2, index: usize) {
        let (col, row) = self.cell_of(p);
        self.slots[row * self.cols + col] = Some(index);
    }

    /// Indices stored in the 3x3 block of cells around `(col, row)`.
    fn neighbours(&self, col: usize, row: usize) -> impl Iterator<Item = usize> + '_ {
        let cols = col.saturating_sub(1)..=(col + 1).min(self.cols - 1);
        let rows = row.saturating_sub(1)..=(row + 1).min(self.rows - 1);
        rows.flat_map(move |r| cols.clone().filter_map(move |c| self.get(c, r)))
    }
}

/// A validated sampler.
#[derive(Clone, Copy, Debug)]
pub struct PoissonSampler {
    /// Validated parameters.
    config: PoissonConfig,
}

impl PoissonSampler {
    /// Validate `config`.
    ///
    /// Width, height and radius must be finite and positive, `attempts` at
    /// least one, and the grid must stay within a sane size.
    pub fn new(config: PoissonConfig) -> Result<Self> {
        let PoissonConfig {
            width,
            height,
            radius,
            attempts,
            ..
        } = config;
        for (name, value) in [("width", width), ("height", height), ("radius", radius)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidSampling(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        let reach = 2.0 * radius;
        if !reach.is_finite() || !(width + reach).is_finite() || !(height + reach).is_finite() {
            return Err(Error::InvalidSampling(format!(
                "radius {radius} is too large for a {width}x{height} region"
            )));
        }
        if attempts == 0 {
            return Err(Error::InvalidSampling(
                "attempts must be at least 1".to_string(),
            ));
        }
        let cells = (width / radius).ceil() * (height / radius).ceil();
        if cells > MAX_CELLS as f64 {
            return Err(Error::InvalidSampling(format!(
                "radius {radius} is too small for a {width}x{height} region"
            )));
        }
        Ok(Self { config })
    }

    /// The validated parameters.
    pub const fn config(&self) -> &PoissonConfig {
        &self.config
    }

    /// Run the sampler with `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Sampling {
        let PoissonConfig {
            width,
            height,
            radius,
            attempts,
            max_iterations,
        } = self.config;
        let r2 = radius * radius;
        let mut grid = Grid::new(width, height, radius);
        let mut out = Sampling::default();

        let seed = Point2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
        grid.insert(seed, 0);
        out.points.push(seed);
        let mut active = vec![0usize];

        while !active.is_empty() {
            if max_iterations.is_some_and(|cap| out.iterations >= cap) {
                break;
            }
            out.iterations += 1;

            let slot = rng.gen_range(0..active.len());
            let parent = active[slot];
            let origin = out.points[parent];

            let mut spawned = None;
            for _ in 0..attempts {
                let theta = rng.gen_range(0.0..TAU);
                let dist = rng.gen_range(radius..2.0 * radius);
                let candidate = Point2::new(
                    origin.x + dist * theta.cos(),
                    origin.y + dist * theta.sin(),
                );
                if !(0.0..width).contains(&candidate.x) || !(0.0..height).contains(&candidate.y)
                {
                    continue;
                }
                let (col, row) = grid.cell_of(candidate);
                if grid.get(col, row).is_some() {
                    continue;
                }
                let crowded = grid
                    .neighbours(col, row)
                    .any(|i| out.points[i].distance_squared(candidate) < r2);
                if !crowded {
                    spawned = Some(candidate);
                    break;
                }
            }

            match spawned {
                Some(p) => {
                    let index = out.points.len();
                    grid.insert(p, index);
                    out.points.push(p);
                    out.edges.push((parent, index));
                    active.push(index);
                }
                None => {
                    active.swap_remove(slot);
                }
            }
        }

        debug!(
            points = out.points.len(),
            iterations = out.iterations,
            "poisson sampling finished"
        );
        out
    }
}
