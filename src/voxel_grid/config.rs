use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::warn;
use regex::Regex;

use crate::voxel_grid::colour::{ColourKind, ColourMode};
use crate::voxel_grid::frames::FrameFormat;
use crate::voxel_grid::growth::GrowthConfig;
use crate::voxel_grid::seed::{SeedLayout, SeedPolicy};
use crate::voxel_grid::strategy::StrategyKind;

pub const DEFAULT_DIMS: (usize, usize, usize) = (50, 50, 30);
pub const DEFAULT_PREFIX: &str = "default";

static DIMS_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn dims_pattern() -> Option<&'static Regex> {
	DIMS_PATTERN
		.get_or_init(|| Regex::new(r"^\s*(\d+)\s*[xX]\s*(\d+)\s*[xX]\s*(\d+)\s*$").ok())
		.as_ref()
}

/// Parse `WxHxD`. Zero is accepted here and rejected when the grid is created.
pub fn parse_dimensions(text: &str) -> Option<(usize, usize, usize)> {
	let caps = dims_pattern()?.captures(text)?;
	let axis = |i: usize| caps.get(i)?.as_str().parse::<usize>().ok();
	Some((axis(1)?, axis(2)?, axis(3)?))
}

/// Parsed dimensions, or [`DEFAULT_DIMS`] when missing or malformed
pub fn dimensions_or_default(text: Option<&str>) -> (usize, usize, usize) {
	match text {
		None => DEFAULT_DIMS,
		Some(text) => parse_dimensions(text).unwrap_or_else(|| {
			warn!(
				"could not parse dimensions '{}', using {}x{}x{}",
				text, DEFAULT_DIMS.0, DEFAULT_DIMS.1, DEFAULT_DIMS.2
			);
			DEFAULT_DIMS
		}),
	}
}

/// Seed derived from the wall clock, for runs that do not pass `--rng-seed`
pub fn clock_seed() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_nanos() as u64)
		.unwrap_or_default()
}

/// Grow a random colour field through a voxel cube and save it as z-slice frames
#[derive(Debug, Parser)]
#[command(name = "colour_cube", version)]
pub struct Cli {
	/// Cube size as WIDTHxHEIGHTxDEPTH (default 50x50x30)
	pub dims: Option<String>,

	/// Prefix of the frame file names
	#[arg(default_value = DEFAULT_PREFIX)]
	pub prefix: String,

	#[arg(long, value_enum, default_value_t = StrategyKind::FairScan)]
	pub strategy: StrategyKind,

	/// Colour policy (defaults to averaged with a per-strategy jitter)
	#[arg(long, value_enum)]
	pub colour: Option<ColourKind>,

	/// Colour jitter radius for the averaged policy
	#[arg(long)]
	pub jitter: Option<u32>,

	#[arg(long, value_enum, default_value_t = SeedLayout::Scatter)]
	pub layout: SeedLayout,

	/// Number of seed voxels for scatter and cluster layouts
	#[arg(long, default_value_t = 10)]
	pub seeds: usize,

	/// Half-width of the cluster layout around the center
	#[arg(long, default_value_t = 2)]
	pub spread: usize,

	/// Random generator seed; the same seed reproduces the same cube
	#[arg(long)]
	pub rng_seed: Option<u64>,

	#[arg(long, value_enum, default_value_t = FrameFormat::Png)]
	pub format: FrameFormat,

	/// Hide the progress bar
	#[arg(long)]
	pub no_progress: bool,
}

impl Cli {
	/// Reject option combinations clap cannot express on its own
	pub fn validate(&self) -> Result<(), clap::Error> {
		if self.colour == Some(ColourKind::Exact) && self.jitter.is_some() {
			return Err(Self::command().error(
				ErrorKind::ArgumentConflict,
				"--jitter only applies to the averaged colour policy, not --colour exact",
			));
		}
		Ok(())
	}

	pub fn colour_mode(&self) -> Option<ColourMode> {
		let default_jitter = match self.strategy.default_colour_mode() {
			ColourMode::Averaged { jitter } => jitter,
			ColourMode::Exact => 0,
		};
		match (self.colour, self.jitter) {
			(Some(kind), jitter) => Some(ColourMode::from_kind(kind, jitter.unwrap_or(default_jitter))),
			(None, Some(jitter)) => Some(ColourMode::Averaged { jitter }),
			(None, None) => None,
		}
	}

	pub fn growth_config(&self, rng_seed: u64) -> GrowthConfig {
		GrowthConfig {
			strategy: self.strategy,
			colour: self.colour_mode(),
			seeds: SeedPolicy::from_layout(self.layout, self.seeds, self.spread),
			rng_seed,
			record_trace: false,
			show_progress: !self.no_progress,
		}
	}
}
