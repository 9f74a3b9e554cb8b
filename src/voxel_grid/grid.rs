use bitvec::vec::BitVec;

use crate::voxel_grid::coord::Coord;
use crate::voxel_grid::error::GrowthError;

/// Validated grid extents. Linear layout is x fastest, then y, then z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
	pub len_x: usize,
	pub len_y: usize,
	pub len_z: usize,
}

impl Dims {
	/// Reject zero-sized axes (and axes too large for `i32` coordinates) before anything is allocated
	pub fn new(len_x: usize, len_y: usize, len_z: usize) -> Result<Self, GrowthError> {
		for (axis, value) in [('x', len_x), ('y', len_y), ('z', len_z)] {
			if value == 0 || value > i32::MAX as usize {
				return Err(GrowthError::InvalidDimension { axis, value });
			}
		}
		let dims = Self { len_x, len_y, len_z };
		if len_x.checked_mul(len_y).and_then(|n| n.checked_mul(len_z)).is_none() {
			return Err(GrowthError::InvalidDimension { axis: 'z', value: len_z });
		}
		Ok(dims)
	}

	#[inline]
	pub fn total_voxels(&self) -> usize {
		self.len_x * self.len_y * self.len_z
	}

	#[inline]
	pub fn contains(&self, pos: Coord) -> bool {
		pos.x >= 0
			&& pos.y >= 0
			&& pos.z >= 0
			&& (pos.x as usize) < self.len_x
			&& (pos.y as usize) < self.len_y
			&& (pos.z as usize) < self.len_z
	}

	/// Convert an in-range coordinate to a linear index
	#[inline]
	pub fn index_of(&self, pos: Coord) -> usize {
		pos.x as usize + pos.y as usize * self.len_x + pos.z as usize * self.len_x * self.len_y
	}

	/// Convert a linear index back to its coordinate
	#[inline]
	pub fn coord_of(&self, index: usize) -> Coord {
		let plane = self.len_x * self.len_y;
		let z = index / plane;
		let y = (index % plane) / self.len_x;
		let x = index % self.len_x;
		Coord::new(x as i32, y as i32, z as i32)
	}

	pub fn center(&self) -> Coord {
		Coord::new((self.len_x / 2) as i32, (self.len_y / 2) as i32, (self.len_z / 2) as i32)
	}
}

/// Dense colour storage, one `Coord` (r, g, b) per voxel
#[derive(Clone)]
pub struct VoxelGrid {
	pub dims: Dims,
	pub data: Vec<Coord>,  // zero-initialised, (0,0,0) is not a sentinel
}

impl VoxelGrid {
	pub fn new(dims: Dims) -> Self {
		Self {
			dims,
			data: vec![Coord::default(); dims.total_voxels()],
		}
	}

	/// Colour stored at `pos` (panics if out of bounds)
	#[inline]
	pub fn get(&self, pos: Coord) -> Coord {
		self.data[self.dims.index_of(pos)]
	}

	#[inline]
	pub fn set(&mut self, pos: Coord, colour: Coord) {
		let index = self.dims.index_of(pos);
		self.data[index] = colour;
	}
}

/// Bit-packed boolean grid. Used for spatial occupancy, the finished set, and
/// (with 256^3 extents) colour usage.
#[derive(Clone)]
pub struct OccupancyGrid {
	pub dims: Dims,
	pub data: BitVec,  // 1-bit per cell
}

impl OccupancyGrid {
	/// Create a grid with every cell set to `false`
	pub fn new(dims: Dims) -> Self {
		Self {
			dims,
			data: BitVec::repeat(false, dims.total_voxels()),
		}
	}

	/// A 256 x 256 x 256 grid addressed by (r, g, b)
	pub fn colour_space() -> Self {
		Self::new(Dims { len_x: 256, len_y: 256, len_z: 256 })
	}
}
