pub mod voxel_grid {
	pub mod info;
	pub mod error;
	pub mod coord;
	pub mod grid;
	pub mod utils;
	pub mod neighbors;
	pub mod colour;
	pub mod shuffle;
	pub mod seed;
	pub mod growth;
	pub mod strategy;
	pub mod frames;
	pub mod config;
}
