use clap::ValueEnum;
use indicatif::ProgressBar;
use log::debug;
use rand::Rng;

use crate::voxel_grid::colour::{ColourMode, ColourPolicy, GrowthRng};
use crate::voxel_grid::coord::Coord;
use crate::voxel_grid::error::GrowthError;
use crate::voxel_grid::growth::ColourCube;
use crate::voxel_grid::shuffle::AxisOrder;

/// Decides which active voxel grows next
pub trait GrowthStrategy {
	fn name(&self) -> &'static str;

	/// Grow a seeded cube until every voxel is occupied and finished
	fn grow(
		&mut self,
		cube: &mut ColourCube,
		policy: &dyn ColourPolicy,
		rng: &mut GrowthRng,
		progress: &ProgressBar,
	) -> Result<(), GrowthError>;
}

/// Strategy selector used by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
	FairScan,
	ActiveWalker,
	RandomFront,
}

impl StrategyKind {
	pub fn build(self) -> Box<dyn GrowthStrategy> {
		match self {
			Self::FairScan => Box::new(FairScan),
			Self::ActiveWalker => Box::new(ActiveWalker::default()),
			Self::RandomFront => Box::new(RandomFront),
		}
	}

	/// Colour policy used when the configuration does not pick one
	pub fn default_colour_mode(self) -> ColourMode {
		match self {
			Self::FairScan => ColourMode::Averaged { jitter: 2 },
			Self::ActiveWalker => ColourMode::Averaged { jitter: 6 },
			Self::RandomFront => ColourMode::Averaged { jitter: 10 },
		}
	}
}

/// Sweep the whole grid in shuffled-axis order, growing every active voxel by
/// one step per sweep, until every voxel is finished
#[derive(Debug, Clone, Copy, Default)]
pub struct FairScan;

impl GrowthStrategy for FairScan {
	fn name(&self) -> &'static str {
		"fair-scan"
	}

	fn grow(
		&mut self,
		cube: &mut ColourCube,
		policy: &dyn ColourPolicy,
		rng: &mut GrowthRng,
		progress: &ProgressBar,
	) -> Result<(), GrowthError> {
		let order = AxisOrder::new(cube.dims(), rng);
		let total = order.len();
		let mut completed = cube.finished_count();
		let mut sweeps = 0usize;

		while completed < total {
			let mut touched = false;
			for pos in order.iter() {
				if !cube.is_active(pos) {
					continue;
				}
				touched = true;
				match cube.open_neighbor(pos, rng) {
					Some(next) => {
						cube.grow_into(policy, pos, next, rng)?;
					}
					None => {
						cube.finish(pos);
						completed += 1;
						progress.set_position(completed as u64);
					}
				}
			}
			if !touched {
				return Err(GrowthError::Stalled { remaining: total - completed });
			}
			sweeps += 1;
		}
		debug!("fair scan finished after {} sweeps", sweeps);
		Ok(())
	}
}

/// Grow a single snake-like path from one cursor voxel, jumping to another
/// active voxel whenever the cursor is boxed in
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveWalker {
	/// Sweep position of the first voxel not yet known to be finished
	search_start: usize,
}

impl ActiveWalker {
	pub fn search_start(&self) -> usize {
		self.search_start
	}

	/// First active voxel in sweep order, skipping the finished prefix for good
	fn next_active(&mut self, cube: &ColourCube, order: &AxisOrder) -> Option<Coord> {
		while self.search_start < order.len() && cube.is_finished(order.coord_at(self.search_start)) {
			self.search_start += 1;
		}
		(self.search_start..order.len())
			.map(|t| order.coord_at(t))
			.find(|&pos| cube.is_active(pos))
	}
}

impl GrowthStrategy for ActiveWalker {
	fn name(&self) -> &'static str {
		"active-walker"
	}

	fn grow(
		&mut self,
		cube: &mut ColourCube,
		policy: &dyn ColourPolicy,
		rng: &mut GrowthRng,
		progress: &ProgressBar,
	) -> Result<(), GrowthError> {
		let order = AxisOrder::new(cube.dims(), rng);
		let total = order.len();
		self.search_start = 0;
		let mut occupied = cube.occupied_count();
		let stalled = |occupied: usize| GrowthError::Stalled { remaining: total - occupied };

		let mut cursor = self.next_active(cube, &order).ok_or_else(|| stalled(occupied))?;
		let mut jumps = 0usize;
		while occupied < total {
			match cube.open_neighbor(cursor, rng) {
				Some(next) => {
					cube.grow_into(policy, cursor, next, rng)?;
					occupied += 1;
					progress.set_position(occupied as u64);
					cursor = next;
				}
				None => {
					cube.finish(cursor);
					cursor = self.next_active(cube, &order).ok_or_else(|| stalled(occupied))?;
					jumps += 1;
				}
			}
		}
		debug!("active walker jumped {} times", jumps);

		// A full grid has no empty neighbours left.
		cube.finish_remaining();
		Ok(())
	}
}

/// Pick a random active voxel each step (the frontier list grows as voxels fill)
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFront;

impl GrowthStrategy for RandomFront {
	fn name(&self) -> &'static str {
		"random-front"
	}

	fn grow(
		&mut self,
		cube: &mut ColourCube,
		policy: &dyn ColourPolicy,
		rng: &mut GrowthRng,
		progress: &ProgressBar,
	) -> Result<(), GrowthError> {
		let mut front = cube.active_voxels();
		while !front.is_empty() {
			let i = rng.gen_range(0..front.len());
			let pos = front[i];
			match cube.open_neighbor(pos, rng) {
				Some(next) => {
					cube.grow_into(policy, pos, next, rng)?;
					front.push(next);
				}
				None => {
					front.swap_remove(i);
					cube.finish(pos);
					progress.set_position(cube.finished_count() as u64);
				}
			}
		}

		let total = cube.dims().total_voxels();
		if cube.finished_count() < total {
			return Err(GrowthError::Stalled { remaining: total - cube.finished_count() });
		}
		Ok(())
	}
}
