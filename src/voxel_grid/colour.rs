use clap::ValueEnum;
use log::{debug, warn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::voxel_grid::coord::Coord;
use crate::voxel_grid::error::GrowthError;
use crate::voxel_grid::grid::{OccupancyGrid, VoxelGrid};
use crate::voxel_grid::neighbors::NeighborSearch;

/// Generator threaded through every random decision of a run
pub type GrowthRng = ChaCha8Rng;

/// Search cap over colour space, large enough to reach any colour from any other
pub const COLOUR_SEARCH_RADIUS: u32 = 255;

/// Which exact RGB triples have been handed out
#[derive(Clone)]
pub struct ColourUsage {
	grid: OccupancyGrid,
	resets: u64,
}

impl Default for ColourUsage {
	fn default() -> Self {
		Self::new()
	}
}

impl ColourUsage {
	pub fn new() -> Self {
		Self {
			grid: OccupancyGrid::colour_space(),
			resets: 0,
		}
	}

	pub fn grid(&self) -> &OccupancyGrid {
		&self.grid
	}

	#[inline]
	pub fn is_used(&self, colour: Coord) -> bool {
		self.grid.get(colour)
	}

	#[inline]
	pub fn mark_used(&mut self, colour: Coord) {
		self.grid.fill(colour);
	}

	/// Forget every used colour. The only transition that un-sets a flag.
	pub fn reset(&mut self) {
		self.grid.clear();
		self.resets += 1;
	}

	/// Number of resets so far
	pub fn resets(&self) -> u64 {
		self.resets
	}
}

/// A colour chosen by a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColourPick {
	pub colour: Coord,
	/// Whether the caller should record the colour in [`ColourUsage`]
	pub track_usage: bool,
}

/// Everything a policy may read, plus the usage grid it may reset
pub struct PolicyContext<'a> {
	pub colours: &'a VoxelGrid,
	pub occupancy: &'a OccupancyGrid,
	pub usage: &'a mut ColourUsage,
	pub search: &'a mut NeighborSearch,
	pub rng: &'a mut GrowthRng,
}

/// Picks the colour of a newly grown voxel. Never commits; the engine writes
/// the returned colour.
pub trait ColourPolicy {
	fn name(&self) -> &'static str;

	/// Colour for `to`, which is being grown from the occupied voxel `from`
	fn next_colour(&self, ctx: &mut PolicyContext<'_>, from: Coord, to: Coord) -> Result<ColourPick, GrowthError>;
}

pub(crate) fn random_colour<R: Rng + ?Sized>(rng: &mut R) -> Coord {
	Coord::new(rng.gen_range(0..=255), rng.gen_range(0..=255), rng.gen_range(0..=255))
}

/// Nearest unused colour to the parent voxel's colour
#[derive(Debug, Clone, Copy)]
pub struct ExactNearestUnused {
	pub search_radius: u32,
}

impl Default for ExactNearestUnused {
	fn default() -> Self {
		Self { search_radius: COLOUR_SEARCH_RADIUS }
	}
}

impl ColourPolicy for ExactNearestUnused {
	fn name(&self) -> &'static str {
		"exact"
	}

	fn next_colour(&self, ctx: &mut PolicyContext<'_>, from: Coord, _to: Coord) -> Result<ColourPick, GrowthError> {
		let base = ctx.colours.get(from);
		let mut found = ctx
			.search
			.find_one_open_neighbor(ctx.usage.grid(), base, false, self.search_radius, ctx.rng);
		if found.is_none() {
			debug!("no unused colour near {}, resetting colour usage", base);
			ctx.usage.reset();
			found = ctx
				.search
				.find_one_open_neighbor(ctx.usage.grid(), base, false, self.search_radius, ctx.rng);
		}
		let colour = found.ok_or(GrowthError::ColourSpaceExhausted)?;
		Ok(ColourPick { colour, track_usage: true })
	}
}

/// Mean of the occupied neighbours plus bounded jitter
#[derive(Debug, Clone, Copy)]
pub struct AveragedJitter {
	/// Spatial radius for gathering coloured neighbours
	pub radius: u32,
	/// Colour-space radius for the unused-colour search and the random offset
	pub jitter: u32,
}

impl AveragedJitter {
	pub fn new(jitter: u32) -> Self {
		Self { radius: 1, jitter }
	}
}

impl ColourPolicy for AveragedJitter {
	fn name(&self) -> &'static str {
		"averaged"
	}

	fn next_colour(&self, ctx: &mut PolicyContext<'_>, _from: Coord, to: Coord) -> Result<ColourPick, GrowthError> {
		let neighbours = ctx.search.find_open_neighbors(ctx.occupancy, to, true, self.radius);
		if neighbours.is_empty() {
			warn!("voxel {} has no coloured neighbour, using a random colour", to);
			return Ok(ColourPick { colour: random_colour(ctx.rng), track_usage: false });
		}

		let n = neighbours.len() as i64;
		let (mut r, mut g, mut b) = (0i64, 0i64, 0i64);
		for &pos in neighbours {
			let c = ctx.colours.get(pos);
			r += c.x as i64;
			g += c.y as i64;
			b += c.z as i64;
		}
		let mean = Coord::new((r / n) as i32, (g / n) as i32, (b / n) as i32);

		if let Some(colour) = ctx
			.search
			.find_one_open_neighbor(ctx.usage.grid(), mean, false, self.jitter, ctx.rng)
		{
			return Ok(ColourPick { colour, track_usage: true });
		}

		let j = self.jitter as i32;
		let mut channel = |v: i32| (v + ctx.rng.gen_range(-j..=j)).clamp(0, 255);
		let colour = Coord::new(channel(mean.x), channel(mean.y), channel(mean.z));
		Ok(ColourPick { colour, track_usage: false })
	}
}

/// Policy selector used by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColourKind {
	Exact,
	Averaged,
}

/// A configured colour policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColourMode {
	Exact,
	Averaged { jitter: u32 },
}

impl ColourMode {
	pub fn from_kind(kind: ColourKind, jitter: u32) -> Self {
		match kind {
			ColourKind::Exact => Self::Exact,
			ColourKind::Averaged => Self::Averaged { jitter },
		}
	}

	pub fn build(self) -> Box<dyn ColourPolicy> {
		match self {
			Self::Exact => Box::new(ExactNearestUnused::default()),
			Self::Averaged { jitter } => Box::new(AveragedJitter::new(jitter)),
		}
	}
}
