use rand::Rng;

use crate::voxel_grid::coord::Coord;
use crate::voxel_grid::grid::Dims;

/// In-place Fisher-Yates: for each `i` in `0..n-1` swap `i` with a uniform `j` in `i..n`
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
	let n = items.len();
	if n < 2 {
		return;
	}
	for i in 0..n - 1 {
		let j = rng.gen_range(i..n);
		items.swap(i, j);
	}
}

/// A uniformly random permutation of `0..n`
pub fn shuffled_indices<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
	let mut order: Vec<usize> = (0..n).collect();
	fisher_yates(&mut order, rng);
	order
}

/// One independent permutation per axis. Sweeping `(x[i], y[j], z[k])` over
/// nested `i, j, k` visits every voxel once without raster-order bias.
#[derive(Debug, Clone)]
pub struct AxisOrder {
	x: Vec<usize>,
	y: Vec<usize>,
	z: Vec<usize>,
}

impl AxisOrder {
	pub fn new<R: Rng + ?Sized>(dims: Dims, rng: &mut R) -> Self {
		Self {
			x: shuffled_indices(dims.len_x, rng),
			y: shuffled_indices(dims.len_y, rng),
			z: shuffled_indices(dims.len_z, rng),
		}
	}

	pub fn len(&self) -> usize {
		self.x.len() * self.y.len() * self.z.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Voxel visited at step `t` of a sweep; the x permutation varies fastest
	#[inline]
	pub fn coord_at(&self, t: usize) -> Coord {
		let i = t % self.x.len();
		let j = (t / self.x.len()) % self.y.len();
		let k = t / (self.x.len() * self.y.len());
		Coord::new(self.x[i] as i32, self.y[j] as i32, self.z[k] as i32)
	}

	/// Full sweep in shuffled order
	pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
		(0..self.len()).map(|t| self.coord_at(t))
	}
}
