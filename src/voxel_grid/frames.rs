use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::ValueEnum;
use image::{ImageFormat, Rgb, RgbImage};
use log::{debug, info};

use crate::voxel_grid::growth::FilledGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrameFormat {
	Png,
	Jpeg,
}

impl FrameFormat {
	pub fn extension(self) -> &'static str {
		match self {
			Self::Png => "png",
			Self::Jpeg => "jpg",
		}
	}

	fn image_format(self) -> ImageFormat {
		match self {
			Self::Png => ImageFormat::Png,
			Self::Jpeg => ImageFormat::Jpeg,
		}
	}
}

/// `{prefix}{z:05}.{ext}`, so frames sort by slice index
pub fn frame_path(prefix: &str, z: usize, format: FrameFormat) -> PathBuf {
	PathBuf::from(format!("{}{:05}.{}", prefix, z, format.extension()))
}

/// Image of layer `z`, pixel (x, y) taken from voxel (x, y, z)
pub fn render_slice(grid: &FilledGrid, z: usize) -> RgbImage {
	let dims = grid.dims();
	RgbImage::from_fn(dims.len_x as u32, dims.len_y as u32, |x, y| {
		Rgb(grid.colour_at(x as usize, y as usize, z))
	})
}

/// Save every z-slice and report the save time
pub fn write_frames(grid: &FilledGrid, prefix: &str, format: FrameFormat) -> Result<Vec<PathBuf>> {
	let start_time = Instant::now();
	let len_z = grid.dims().len_z;
	let mut paths = Vec::with_capacity(len_z);

	for z in 0..len_z {
		let path = frame_path(prefix, z, format);
		render_slice(grid, z)
			.save_with_format(&path, format.image_format())
			.with_context(|| format!("failed to write frame {}", path.display()))?;
		debug!("frame saved: {}", path.display());
		paths.push(path);
	}

	info!(
		"Saved {} frames with prefix '{}' in {:.3} seconds",
		paths.len(),
		prefix,
		start_time.elapsed().as_secs_f64()
	);
	Ok(paths)
}
