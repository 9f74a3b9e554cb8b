use thiserror::Error;

use crate::voxel_grid::coord::Coord;

/// Failures that abort a growth run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrowthError {
	#[error("invalid grid dimension {axis}={value}: every axis must be at least 1 and fit in i32")]
	InvalidDimension { axis: char, value: usize },

	/// Every one of the 256^3 colours is in use even after a usage reset.
	#[error("colour space exhausted: no unused colour left after resetting usage")]
	ColourSpaceExhausted,

	#[error("seed policy produced no seed voxels")]
	NoSeeds,

	#[error("seed {0} lies outside the grid")]
	SeedOutOfBounds(Coord),

	/// No active voxel is left but part of the grid is still empty.
	#[error("growth stalled with {remaining} voxels unreachable")]
	Stalled { remaining: usize },
}
