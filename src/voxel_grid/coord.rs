use std::fmt;

/// Integer triple used both for voxel positions (x, y, z) and colours (r, g, b).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
	pub x: i32,
	pub y: i32,
	pub z: i32,
}

impl Coord {
	#[inline]
	pub const fn new(x: i32, y: i32, z: i32) -> Self {
		Self { x, y, z }
	}

	/// Shift by a relative (dx, dy, dz)
	#[inline]
	pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
		Self::new(self.x + dx, self.y + dy, self.z + dz)
	}

	/// Chebyshev distance, the radius of the smallest cube shell containing `other`
	pub fn chebyshev(self, other: Coord) -> i32 {
		(self.x - other.x)
		.abs()
		.max((self.y - other.y).abs())
		.max((self.z - other.z).abs())
	}

	/// Interpret as a colour, clamping each channel into 0..=255
	pub fn to_rgb(self) -> [u8; 3] {
		[
			self.x.clamp(0, 255) as u8,
			self.y.clamp(0, 255) as u8,
			self.z.clamp(0, 255) as u8,
		]
	}
}

impl From<[u8; 3]> for Coord {
	fn from(rgb: [u8; 3]) -> Self {
		Self::new(rgb[0] as i32, rgb[1] as i32, rgb[2] as i32)
	}
}

impl fmt::Display for Coord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {}, {})", self.x, self.y, self.z)
	}
}
