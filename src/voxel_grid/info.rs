use std::env;
use std::fmt;
use std::sync::Once;

/// Build stamp injected by `build.rs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
	pub program: String,
	pub version: &'static str,
	pub compiled_on: &'static str,
	pub compiled_at: &'static str,
}

impl BuildInfo {
	pub fn current() -> Self {
		let program = env::current_exe()
			.ok()
			.and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
			.unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
		Self {
			program,
			version: env!("CARGO_PKG_VERSION"),
			compiled_on: env!("COMPILE_DATE"),
			compiled_at: env!("COMPILE_TIME"),
		}
	}
}

impl fmt::Display for BuildInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} v{} (built {} {}, ChaCha8 colour generator)",
			self.program, self.version, self.compiled_on, self.compiled_at
		)
	}
}

/// Print what the program does (only prints once)
pub fn print_banner() {
	static PRINT_BANNER_ONCE: Once = Once::new();
	PRINT_BANNER_ONCE.call_once(|| {
		eprintln!("Colour cube: grows a random colour field through a voxel grid by neighbour expansion.");
		eprintln!("Each z-slice of the finished cube is written as one RGB frame.\n");
	});
}

/// Print the build stamp (only prints once)
pub fn print_compile_info() {
	static PRINT_COMPILE_ONCE: Once = Once::new();
	PRINT_COMPILE_ONCE.call_once(|| eprintln!("{}", BuildInfo::current()));
}
