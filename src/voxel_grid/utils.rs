use log::info;

use crate::voxel_grid::coord::Coord;
use crate::voxel_grid::grid::{Dims, OccupancyGrid};

/// Format large numbers with KB, MB, GB, TB suffixes
pub fn format_bytes(bytes: usize) -> String {
	const KB: usize = 1024;
	const MB: usize = KB * 1024;
	const GB: usize = MB * 1024;
	const TB: usize = GB * 1024;

	if bytes >= TB {
		format!("{:.2} TB", bytes as f64 / TB as f64)
	} else if bytes >= GB {
		format!("{:.2} GB", bytes as f64 / GB as f64)
	} else if bytes >= MB {
		format!("{:.2} MB", bytes as f64 / MB as f64)
	} else if bytes >= KB {
		format!("{:.2} KB", bytes as f64 / KB as f64)
	} else {
		format!("{} bytes", bytes)
	}
}

/// Report the memory held by the dense grids of a run
pub fn report_memory(dims: Dims, colour_bytes: usize, bit_grids: &[&OccupancyGrid]) {
	let bit_bytes: usize = bit_grids.iter().map(|g| g.data.capacity() / 8).sum();

	info!("Colour cube memory report:");
	info!("  Dimensions: {} x {} x {}", dims.len_x, dims.len_y, dims.len_z);
	info!("  Total Voxels: {:e}", dims.total_voxels() as f64);
	info!("  Colour Storage: {}", format_bytes(colour_bytes));
	info!("  Bit Grids ({}): {}", bit_grids.len(), format_bytes(bit_bytes));
	info!("  Total Memory Used: {}", format_bytes(colour_bytes + bit_bytes));
}

impl OccupancyGrid {
	#[inline]
	pub fn contains(&self, pos: Coord) -> bool {
		self.dims.contains(pos)
	}

	/// Read a cell (panics if out of bounds)
	#[inline]
	pub fn get(&self, pos: Coord) -> bool {
		self.data[self.dims.index_of(pos)]
	}

	#[inline]
	pub fn get_index(&self, index: usize) -> bool {
		self.data[index]
	}

	/// Set a cell to `true`
	#[inline]
	pub fn fill(&mut self, pos: Coord) {
		let index = self.dims.index_of(pos);
		self.data.set(index, true);
	}

	/// Zero out the entire grid
	pub fn clear(&mut self) {
		self.data.fill(false);
	}

	pub fn fill_all(&mut self) {
		self.data.fill(true);
	}

	/// Count the number of set cells
	pub fn count_filled(&self) -> usize {
		self.data.count_ones()
	}
}
