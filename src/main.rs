use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use colour_cube::voxel_grid::config::{self, Cli};
use colour_cube::voxel_grid::frames;
use colour_cube::voxel_grid::growth;
use colour_cube::voxel_grid::info as banner;

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let cli = Cli::parse();
	if let Err(err) = cli.validate() {
		err.exit();
	}

	banner::print_banner();
	banner::print_compile_info();

	let (len_x, len_y, len_z) = config::dimensions_or_default(cli.dims.as_deref());
	let rng_seed = cli.rng_seed.unwrap_or_else(config::clock_seed);
	let growth_config = cli.growth_config(rng_seed);

	let cube = growth::create_grid(len_x, len_y, len_z).context("cannot create colour cube")?;
	cube.report_memory();

	let filled = growth::run_growth(cube, &growth_config).context("colour growth failed")?;
	let paths = frames::write_frames(&filled, &cli.prefix, cli.format)?;
	if let (Some(first), Some(last)) = (paths.first(), paths.last()) {
		info!("Frames: {} .. {}", first.display(), last.display());
	}
	info!("Reproduce with --rng-seed {}", rng_seed);
	Ok(())
}
