use std::collections::HashSet;

use clap::ValueEnum;
use rand::Rng;

use crate::voxel_grid::coord::Coord;
use crate::voxel_grid::error::GrowthError;
use crate::voxel_grid::grid::{Dims, OccupancyGrid};
use crate::voxel_grid::shuffle::shuffled_indices;

/// Where growth starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedPolicy {
	/// One voxel at the grid center
	Center,
	/// `count` distinct voxels anywhere in the grid
	Scatter { count: usize },
	/// `count` distinct voxels within `spread` of the center on every axis
	Cluster { count: usize, spread: usize },
	/// Explicit positions; duplicates are ignored
	Fixed(Vec<Coord>),
}

impl Default for SeedPolicy {
	fn default() -> Self {
		Self::Scatter { count: 10 }
	}
}

/// Seed layout selector used by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeedLayout {
	Center,
	Scatter,
	Cluster,
}

impl SeedPolicy {
	pub fn from_layout(layout: SeedLayout, count: usize, spread: usize) -> Self {
		match layout {
			SeedLayout::Center => Self::Center,
			SeedLayout::Scatter => Self::Scatter { count },
			SeedLayout::Cluster => Self::Cluster { count, spread },
		}
	}

	/// Distinct in-bounds seed positions, in placement order
	pub fn place<R: Rng + ?Sized>(&self, dims: Dims, rng: &mut R) -> Result<Vec<Coord>, GrowthError> {
		let seeds = match self {
			Self::Center => vec![dims.center()],
			Self::Scatter { count } => {
				let lo = Coord::new(0, 0, 0);
				let hi = Coord::new(dims.len_x as i32 - 1, dims.len_y as i32 - 1, dims.len_z as i32 - 1);
				sample_box(lo, hi, *count, rng)
			}
			Self::Cluster { count, spread } => {
				let c = dims.center();
				// No box needs to reach further than the longest axis.
				let s = (*spread).min(dims.len_x.max(dims.len_y).max(dims.len_z)) as i32;
				let lo = Coord::new(
					c.x.saturating_sub(s).max(0),
					c.y.saturating_sub(s).max(0),
					c.z.saturating_sub(s).max(0),
				);
				let hi = Coord::new(
					c.x.saturating_add(s).min(dims.len_x as i32 - 1),
					c.y.saturating_add(s).min(dims.len_y as i32 - 1),
					c.z.saturating_add(s).min(dims.len_z as i32 - 1),
				);
				sample_box(lo, hi, *count, rng)
			}
			Self::Fixed(list) => {
				let mut seen: HashSet<Coord> = HashSet::with_capacity(list.len());
				let mut seeds: Vec<Coord> = Vec::with_capacity(list.len());
				for &pos in list {
					if !dims.contains(pos) {
						return Err(GrowthError::SeedOutOfBounds(pos));
					}
					if seen.insert(pos) {
						seeds.push(pos);
					}
				}
				seeds
			}
		};
		if seeds.is_empty() {
			return Err(GrowthError::NoSeeds);
		}
		Ok(seeds)
	}
}

/// Draw `count` distinct voxels from the inclusive box `lo..=hi`, at least one
/// and at most as many as the box holds
fn sample_box<R: Rng + ?Sized>(lo: Coord, hi: Coord, count: usize, rng: &mut R) -> Vec<Coord> {
	let span = Dims {
		len_x: (hi.x - lo.x + 1) as usize,
		len_y: (hi.y - lo.y + 1) as usize,
		len_z: (hi.z - lo.z + 1) as usize,
	};
	let volume = span.total_voxels();
	let count = count.clamp(1, volume);
	let at = |index: usize| {
		let p = span.coord_of(index);
		lo.offset(p.x, p.y, p.z)
	};

	// Dense requests take a shuffled prefix, sparse ones redraw on collision.
	if count * 2 >= volume {
		let mut order = shuffled_indices(volume, rng);
		order.truncate(count);
		return order.into_iter().map(at).collect();
	}

	let mut taken = OccupancyGrid::new(span);
	let mut seeds: Vec<Coord> = Vec::with_capacity(count);
	while seeds.len() < count {
		let index = rng.gen_range(0..volume);
		if !taken.get_index(index) {
			taken.data.set(index, true);
			seeds.push(at(index));
		}
	}
	seeds
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	fn dims(x: usize, y: usize, z: usize) -> Dims {
		Dims::new(x, y, z).unwrap()
	}

	#[test]
	fn center_is_single_middle_voxel() {
		let mut rng = ChaCha8Rng::seed_from_u64(0);
		assert_eq!(SeedPolicy::Center.place(dims(3, 3, 3), &mut rng).unwrap(), vec![Coord::new(1, 1, 1)]);
	}

	#[test]
	fn scatter_is_distinct_and_clamped() {
		let mut rng = ChaCha8Rng::seed_from_u64(0);
		let seeds = SeedPolicy::Scatter { count: 100 }.place(dims(2, 2, 2), &mut rng).unwrap();
		assert_eq!(seeds.len(), 8);
		let seeds = SeedPolicy::Scatter { count: 0 }.place(dims(4, 4, 4), &mut rng).unwrap();
		assert_eq!(seeds.len(), 1);
	}

	#[test]
	fn cluster_stays_near_center() {
		let mut rng = ChaCha8Rng::seed_from_u64(5);
		let d = dims(20, 20, 20);
		let seeds = SeedPolicy::Cluster { count: 12, spread: 2 }.place(d, &mut rng).unwrap();
		assert_eq!(seeds.len(), 12);
		assert!(seeds.iter().all(|s| s.chebyshev(d.center()) <= 2));
	}

	#[test]
	fn oversized_cluster_spread_covers_the_grid() {
		let mut rng = ChaCha8Rng::seed_from_u64(8);
		let d = dims(50, 50, 30);
		let seeds = SeedPolicy::Cluster { count: 3, spread: usize::MAX }.place(d, &mut rng).unwrap();
		assert_eq!(seeds.len(), 3);
		assert!(seeds.iter().all(|s| d.contains(*s)));
	}

	#[test]
	fn scatter_can_seed_every_voxel() {
		let mut rng = ChaCha8Rng::seed_from_u64(2);
		let d = dims(50, 50, 30);
		let seeds = SeedPolicy::Scatter { count: 1_000_000 }.place(d, &mut rng).unwrap();
		assert_eq!(seeds.len(), d.total_voxels());
		let distinct: HashSet<Coord> = seeds.iter().copied().collect();
		assert_eq!(distinct.len(), d.total_voxels());
		assert!(seeds.iter().all(|s| d.contains(*s)));
	}

	#[test]
	fn sparse_scatter_is_distinct() {
		let mut rng = ChaCha8Rng::seed_from_u64(6);
		let d = dims(10, 10, 10);
		let seeds = SeedPolicy::Scatter { count: 300 }.place(d, &mut rng).unwrap();
		let distinct: HashSet<Coord> = seeds.iter().copied().collect();
		assert_eq!(distinct.len(), 300);
	}

	#[test]
	fn cluster_box_offsets_from_its_corner() {
		let mut rng = ChaCha8Rng::seed_from_u64(1);
		let d = dims(9, 9, 9);
		let seeds = SeedPolicy::Cluster { count: 27, spread: 1 }.place(d, &mut rng).unwrap();
		let distinct: HashSet<Coord> = seeds.iter().copied().collect();
		assert_eq!(distinct.len(), 27);
		assert!(seeds.iter().all(|s| s.chebyshev(d.center()) <= 1));
	}

	#[test]
	fn fixed_rejects_bad_lists() {
		let mut rng = ChaCha8Rng::seed_from_u64(0);
		let d = dims(3, 3, 3);
		assert_eq!(SeedPolicy::Fixed(vec![]).place(d, &mut rng), Err(GrowthError::NoSeeds));
		let outside = Coord::new(3, 0, 0);
		assert_eq!(
			SeedPolicy::Fixed(vec![outside]).place(d, &mut rng),
			Err(GrowthError::SeedOutOfBounds(outside))
		);
		let dup = Coord::new(1, 2, 0);
		assert_eq!(SeedPolicy::Fixed(vec![dup, dup]).place(d, &mut rng).unwrap(), vec![dup]);
	}
}
