//! 64-bit hash algorithm implementations.

mod average;
mod difference;
mod perceptual;

pub use average::AverageHasher;
pub use difference::DifferenceHasher;
pub use perceptual::PerceptualHasher;

/// Side length of the hash grid; 8 x 8 gives 64 bits
pub(crate) const GRID: u32 = 8;
