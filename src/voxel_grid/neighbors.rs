use rand::Rng;

use crate::voxel_grid::coord::Coord;
use crate::voxel_grid::grid::OccupancyGrid;

/// Shell search with a reusable scratch buffer, grown on demand.
///
/// Radius `r` scans the whole `(2r+1)^3` cube again, not just the new shell,
/// clipped at the grid faces (no wrap-around).
#[derive(Debug, Default)]
pub struct NeighborSearch {
	scratch: Vec<Coord>,
}

impl NeighborSearch {
	pub fn new() -> Self {
		Self::default()
	}

	/// Cells around `center` whose flag equals `want_occupied`, taken from the
	/// smallest radius in `1..=max_radius` that yields any. Empty if none does.
	pub fn find_open_neighbors(
		&mut self,
		grid: &OccupancyGrid,
		center: Coord,
		want_occupied: bool,
		max_radius: u32,
	) -> &[Coord] {
		self.scratch.clear();
		if !grid.contains(center) {
			return &self.scratch;
		}
		let dims = grid.dims;
		// Offsets that stay inside the grid along one axis, for radius `r`
		let span = |c: i32, len: usize, r: i32| (-r).max(-c)..=r.min(len as i32 - 1 - c);

		for r in 1..=max_radius as i32 {
			for dz in span(center.z, dims.len_z, r) {
				for dy in span(center.y, dims.len_y, r) {
					for dx in span(center.x, dims.len_x, r) {
						if dx == 0 && dy == 0 && dz == 0 {
							continue;
						}
						let pos = center.offset(dx, dy, dz);
						if grid.get(pos) == want_occupied {
							self.scratch.push(pos);
						}
					}
				}
			}
			if !self.scratch.is_empty() {
				break;
			}
		}
		&self.scratch
	}

	/// Pick one candidate uniformly from the first non-empty radius
	pub fn find_one_open_neighbor<R: Rng + ?Sized>(
		&mut self,
		grid: &OccupancyGrid,
		center: Coord,
		want_occupied: bool,
		max_radius: u32,
		rng: &mut R,
	) -> Option<Coord> {
		let found = self.find_open_neighbors(grid, center, want_occupied, max_radius);
		if found.is_empty() {
			return None;
		}
		Some(found[rng.gen_range(0..found.len())])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::voxel_grid::grid::Dims;
	use proptest::prelude::*;
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	fn grid(x: usize, y: usize, z: usize) -> OccupancyGrid {
		OccupancyGrid::new(Dims::new(x, y, z).unwrap())
	}

	#[test]
	fn zero_radius_never_searches() {
		let g = grid(3, 3, 3);
		let mut search = NeighborSearch::new();
		assert!(search.find_open_neighbors(&g, Coord::new(1, 1, 1), false, 0).is_empty());
	}

	#[test]
	fn radius_one_in_open_interior_yields_26() {
		let g = grid(3, 3, 3);
		let mut search = NeighborSearch::new();
		let found = search.find_open_neighbors(&g, Coord::new(1, 1, 1), false, 1);
		assert_eq!(found.len(), 26);
		assert!(!found.contains(&Coord::new(1, 1, 1)));
	}

	#[test]
	fn corner_is_clipped_not_wrapped() {
		let g = grid(3, 3, 3);
		let mut search = NeighborSearch::new();
		let found = search.find_open_neighbors(&g, Coord::new(0, 0, 0), false, 1);
		assert_eq!(found.len(), 7);
		assert!(found.iter().all(|p| g.contains(*p)));
	}

	#[test]
	fn stops_at_first_radius_with_a_match() {
		let mut g = grid(7, 7, 7);
		g.fill_all();
		let center = Coord::new(3, 3, 3);
		let target = Coord::new(5, 3, 3);
		let far = Coord::new(0, 0, 0);
		g.data.set(g.dims.index_of(target), false);
		g.data.set(g.dims.index_of(far), false);

		let mut search = NeighborSearch::new();
		assert!(search.find_open_neighbors(&g, center, false, 1).is_empty());
		assert_eq!(search.find_open_neighbors(&g, center, false, 3), &[target]);
	}

	#[test]
	fn larger_radius_rescans_the_full_cube() {
		// Only cells at radius 2 are free; the result must contain every one of them.
		let mut g = grid(5, 5, 5);
		let center = Coord::new(2, 2, 2);
		for index in 0..g.dims.total_voxels() {
			if g.dims.coord_of(index).chebyshev(center) <= 1 {
				g.data.set(index, true);
			}
		}
		let mut search = NeighborSearch::new();
		let found = search.find_open_neighbors(&g, center, false, 2);
		assert_eq!(found.len(), 125 - 27);
	}

	#[test]
	fn finds_occupied_cells_when_asked() {
		let mut g = grid(3, 3, 3);
		g.fill(Coord::new(0, 1, 1));
		let mut search = NeighborSearch::new();
		assert_eq!(search.find_open_neighbors(&g, Coord::new(1, 1, 1), true, 1), &[Coord::new(0, 1, 1)]);
	}

	#[test]
	fn single_pick_is_a_candidate() {
		let g = grid(4, 4, 4);
		let mut search = NeighborSearch::new();
		let mut rng = ChaCha8Rng::seed_from_u64(7);
		for _ in 0..50 {
			let pick = search
				.find_one_open_neighbor(&g, Coord::new(0, 0, 0), false, 1, &mut rng)
				.unwrap();
			assert_eq!(pick.chebyshev(Coord::new(0, 0, 0)), 1);
			assert!(g.contains(pick));
		}
	}

	proptest! {
		#[test]
		fn results_are_in_bounds(
			sx in 1usize..6, sy in 1usize..6, sz in 1usize..6,
			cx in 0i32..6, cy in 0i32..6, cz in 0i32..6,
			radius in 0u32..4,
		) {
			let g = grid(sx, sy, sz);
			let center = Coord::new(cx % sx as i32, cy % sy as i32, cz % sz as i32);
			let mut search = NeighborSearch::new();
			let found = search.find_open_neighbors(&g, center, false, radius).to_vec();
			if radius == 0 {
				prop_assert!(found.is_empty());
			}
			for pos in found {
				prop_assert!(g.contains(pos));
				prop_assert_ne!(pos, center);
				prop_assert!(pos.chebyshev(center) <= radius as i32);
			}
		}
	}
}
