use std::mem::size_of;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rand::SeedableRng;

use crate::voxel_grid::colour::{random_colour, ColourMode, ColourPolicy, ColourUsage, GrowthRng, PolicyContext};
use crate::voxel_grid::coord::Coord;
use crate::voxel_grid::error::GrowthError;
use crate::voxel_grid::grid::{Dims, OccupancyGrid, VoxelGrid};
use crate::voxel_grid::neighbors::NeighborSearch;
use crate::voxel_grid::seed::SeedPolicy;
use crate::voxel_grid::strategy::StrategyKind;
use crate::voxel_grid::utils::report_memory;

/// Spatial radius within which a voxel looks for an empty neighbour to grow into
pub const GROWTH_RADIUS: u32 = 1;

/// One state change of a run, in commit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthEvent {
	Seeded { pos: Coord, colour: Coord },
	Filled { from: Coord, pos: Coord, colour: Coord },
	Finished { pos: Coord },
	/// Colour usage was cleared before the next `Filled`
	UsageReset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrowthStats {
	pub seeds: usize,
	pub filled: usize,
	pub finished: usize,
	pub usage_resets: u64,
	pub elapsed: Duration,
}

/// Run configuration
#[derive(Debug, Clone)]
pub struct GrowthConfig {
	pub strategy: StrategyKind,
	/// Overrides the strategy's default colour policy
	pub colour: Option<ColourMode>,
	pub seeds: SeedPolicy,
	pub rng_seed: u64,
	pub record_trace: bool,
	pub show_progress: bool,
}

impl Default for GrowthConfig {
	fn default() -> Self {
		Self {
			strategy: StrategyKind::FairScan,
			colour: None,
			seeds: SeedPolicy::default(),
			rng_seed: 0,
			record_trace: false,
			show_progress: true,
		}
	}
}

impl GrowthConfig {
	pub fn colour_mode(&self) -> ColourMode {
		self.colour.unwrap_or_else(|| self.strategy.default_colour_mode())
	}
}

/// Allocated grids for one run. Exclusively owned and mutated by the engine.
pub struct ColourCube {
	dims: Dims,
	colours: VoxelGrid,
	occupancy: OccupancyGrid,
	finished: OccupancyGrid,
	usage: ColourUsage,
	search: NeighborSearch,
	stats: GrowthStats,
	trace: Option<Vec<GrowthEvent>>,
}

/// Validate the extents and allocate every grid of a run
pub fn create_grid(len_x: usize, len_y: usize, len_z: usize) -> Result<ColourCube, GrowthError> {
	let dims = Dims::new(len_x, len_y, len_z)?;
	Ok(ColourCube::new(dims))
}

impl ColourCube {
	pub fn new(dims: Dims) -> Self {
		Self {
			dims,
			colours: VoxelGrid::new(dims),
			occupancy: OccupancyGrid::new(dims),
			finished: OccupancyGrid::new(dims),
			usage: ColourUsage::new(),
			search: NeighborSearch::new(),
			stats: GrowthStats::default(),
			trace: None,
		}
	}

	pub fn dims(&self) -> Dims {
		self.dims
	}

	pub fn report_memory(&self) {
		let colour_bytes = self.colours.data.capacity() * size_of::<Coord>();
		report_memory(self.dims, colour_bytes, &[&self.occupancy, &self.finished, self.usage.grid()]);
	}

	#[inline]
	pub fn is_occupied(&self, pos: Coord) -> bool {
		self.occupancy.get(pos)
	}

	#[inline]
	pub fn is_finished(&self, pos: Coord) -> bool {
		self.finished.get(pos)
	}

	/// Occupied but not yet finished
	#[inline]
	pub fn is_active(&self, pos: Coord) -> bool {
		self.occupancy.get(pos) && !self.finished.get(pos)
	}

	pub fn occupied_count(&self) -> usize {
		self.stats.seeds + self.stats.filled
	}

	pub fn finished_count(&self) -> usize {
		self.stats.finished
	}

	/// Active voxels in linear index order
	pub fn active_voxels(&self) -> Vec<Coord> {
		(0..self.dims.total_voxels())
			.filter(|&i| self.occupancy.get_index(i) && !self.finished.get_index(i))
			.map(|i| self.dims.coord_of(i))
			.collect()
	}

	/// Start recording events from this point on
	pub(crate) fn start_trace(&mut self) {
		self.trace = Some(Vec::new());
	}

	/// Events recorded so far
	pub(crate) fn events(&self) -> &[GrowthEvent] {
		self.trace.as_deref().unwrap_or(&[])
	}

	fn record(&mut self, event: GrowthEvent) {
		if let Some(trace) = self.trace.as_mut() {
			trace.push(event);
		}
	}

	pub(crate) fn seed(&mut self, pos: Coord, colour: Coord) {
		self.colours.set(pos, colour);
		self.occupancy.fill(pos);
		self.usage.mark_used(colour);
		self.stats.seeds += 1;
		self.record(GrowthEvent::Seeded { pos, colour });
	}

	/// A random empty voxel next to `pos`, if any
	pub(crate) fn open_neighbor(&mut self, pos: Coord, rng: &mut GrowthRng) -> Option<Coord> {
		self.search
			.find_one_open_neighbor(&self.occupancy, pos, false, GROWTH_RADIUS, rng)
	}

	/// Colour the empty voxel `to` from its occupied neighbour `from` and commit it
	pub(crate) fn grow_into(
		&mut self,
		policy: &dyn ColourPolicy,
		from: Coord,
		to: Coord,
		rng: &mut GrowthRng,
	) -> Result<Coord, GrowthError> {
		let resets_before = self.usage.resets();
		let mut ctx = PolicyContext {
			colours: &self.colours,
			occupancy: &self.occupancy,
			usage: &mut self.usage,
			search: &mut self.search,
			rng,
		};
		let pick = policy.next_colour(&mut ctx, from, to)?;
		if self.usage.resets() > resets_before {
			self.record(GrowthEvent::UsageReset);
		}

		self.colours.set(to, pick.colour);
		self.occupancy.fill(to);
		if pick.track_usage {
			self.usage.mark_used(pick.colour);
		}
		self.stats.filled += 1;
		self.record(GrowthEvent::Filled { from, pos: to, colour: pick.colour });
		Ok(pick.colour)
	}

	/// Mark `pos` finished. Finished never reverts.
	pub(crate) fn finish(&mut self, pos: Coord) {
		debug_assert!(self.is_active(pos));
		self.finished.fill(pos);
		self.stats.finished += 1;
		self.record(GrowthEvent::Finished { pos });
	}

	/// Finish every active voxel of a completely occupied grid
	pub(crate) fn finish_remaining(&mut self) {
		debug_assert_eq!(self.occupied_count(), self.dims.total_voxels());
		for pos in self.active_voxels() {
			self.finish(pos);
		}
	}

	fn into_filled(self) -> FilledGrid {
		FilledGrid {
			colours: self.colours,
			occupancy: self.occupancy,
			finished: self.finished,
			stats: self.stats,
			trace: self.trace.unwrap_or_default(),
		}
	}
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
	if !visible {
		return ProgressBar::hidden();
	}
	let pb = ProgressBar::new(len as u64);
	if let Ok(style) = ProgressStyle::default_bar().template("Growing Voxels: [{bar:40.cyan/blue}] {pos}/{len} ({eta})") {
		pb.set_style(style.progress_chars("#>-"));
	}
	pb
}

/// Seed the cube and grow it to completion with the configured strategy
pub fn run_growth(mut cube: ColourCube, config: &GrowthConfig) -> Result<FilledGrid, GrowthError> {
	let start_time = Instant::now();
	let mut rng = GrowthRng::seed_from_u64(config.rng_seed);
	if config.record_trace {
		cube.start_trace();
	}

	let mode = config.colour_mode();
	let policy = mode.build();
	let mut strategy = config.strategy.build();
	info!(
		"Growing {} x {} x {} cube: strategy={}, colour={:?}, rng seed={}",
		cube.dims.len_x, cube.dims.len_y, cube.dims.len_z, strategy.name(), mode, config.rng_seed
	);

	for pos in config.seeds.place(cube.dims, &mut rng)? {
		let colour = random_colour(&mut rng);
		debug!("seed at {} with colour {}", pos, colour);
		cube.seed(pos, colour);
	}

	let progress = progress_bar(cube.dims.total_voxels(), config.show_progress);
	strategy.grow(&mut cube, &*policy, &mut rng, &progress)?;
	progress.finish_with_message("Growth complete!");

	cube.stats.usage_resets = cube.usage.resets();
	cube.stats.elapsed = start_time.elapsed();
	info!(
		"Filled {} voxels from {} seeds in {:.3} seconds ({} colour usage resets)",
		cube.stats.filled,
		cube.stats.seeds,
		cube.stats.elapsed.as_secs_f64(),
		cube.stats.usage_resets
	);
	Ok(cube.into_filled())
}

/// The finished colour field
pub struct FilledGrid {
	colours: VoxelGrid,
	occupancy: OccupancyGrid,
	finished: OccupancyGrid,
	stats: GrowthStats,
	trace: Vec<GrowthEvent>,
}

impl FilledGrid {
	pub fn dims(&self) -> Dims {
		self.colours.dims
	}

	/// Final colour of a voxel (panics if out of bounds)
	pub fn colour_at(&self, x: usize, y: usize, z: usize) -> [u8; 3] {
		self.colours.get(Coord::new(x as i32, y as i32, z as i32)).to_rgb()
	}

	pub fn is_occupied(&self, pos: Coord) -> bool {
		self.occupancy.get(pos)
	}

	pub fn is_finished(&self, pos: Coord) -> bool {
		self.finished.get(pos)
	}

	pub fn stats(&self) -> &GrowthStats {
		&self.stats
	}

	/// Events of the run; empty unless `record_trace` was set
	pub fn trace(&self) -> &[GrowthEvent] {
		&self.trace
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::voxel_grid::colour::ExactNearestUnused;
	use crate::voxel_grid::strategy::{FairScan, GrowthStrategy};
	use std::collections::HashSet;

	/// Panics if a colour is handed out twice without a usage reset in between
	fn assert_unique_between_resets(events: &[GrowthEvent]) {
		let mut seen: HashSet<Coord> = HashSet::new();
		for event in events {
			match *event {
				GrowthEvent::Seeded { colour, .. } | GrowthEvent::Filled { colour, .. } => {
					assert!(seen.insert(colour), "colour {colour} repeated without a reset");
				}
				GrowthEvent::UsageReset => seen.clear(),
				GrowthEvent::Finished { .. } => {}
			}
		}
	}

	fn count_resets(events: &[GrowthEvent]) -> usize {
		events.iter().filter(|e| **e == GrowthEvent::UsageReset).count()
	}

	#[test]
	fn crowded_parent_colour_triggers_a_recorded_reset() {
		// (0,0,0) has only 7 neighbours in colour space, so the 8th child forces a reset.
		let mut cube = create_grid(3, 3, 3).unwrap();
		let mut rng = GrowthRng::seed_from_u64(12);
		let policy = ExactNearestUnused { search_radius: 1 };
		let center = Coord::new(1, 1, 1);
		cube.start_trace();
		cube.seed(center, Coord::new(0, 0, 0));

		let neighbours: Vec<Coord> = (0..27).map(|i| cube.dims().coord_of(i)).filter(|&p| p != center).collect();
		for (n, &pos) in neighbours.iter().enumerate() {
			let colour = cube.grow_into(&policy, center, pos, &mut rng).unwrap();
			assert_eq!(colour.chebyshev(Coord::new(0, 0, 0)), 1);
			if n < 7 {
				assert_eq!(cube.usage.resets(), 0);
			}
		}

		assert!(cube.usage.resets() >= 1);
		assert_eq!(count_resets(cube.events()) as u64, cube.usage.resets());
		let first_reset = cube.events().iter().position(|e| *e == GrowthEvent::UsageReset);
		// Seeded + seven fills come before the first reset.
		assert_eq!(first_reset, Some(8));
		assert_unique_between_resets(cube.events());
	}

	#[test]
	fn fair_scan_with_tight_colour_radius_resets_without_repeats() {
		let mut cube = create_grid(6, 6, 6).unwrap();
		let mut rng = GrowthRng::seed_from_u64(31);
		let policy = ExactNearestUnused { search_radius: 1 };
		let seed_colour = Coord::new(0, 0, 0);
		cube.start_trace();
		cube.seed(cube.dims().center(), seed_colour);
		// Crowd the seed's colour neighbourhood so its first child needs a reset.
		for dz in 0..=1 {
			for dy in 0..=1 {
				for dx in 0..=1 {
					cube.usage.mark_used(seed_colour.offset(dx, dy, dz));
				}
			}
		}

		FairScan
			.grow(&mut cube, &policy, &mut rng, &ProgressBar::hidden())
			.unwrap();

		assert_eq!(cube.finished_count(), 216);
		assert!(count_resets(cube.events()) >= 1);
		assert_eq!(count_resets(cube.events()) as u64, cube.usage.resets());
		assert_unique_between_resets(cube.events());
	}
}
