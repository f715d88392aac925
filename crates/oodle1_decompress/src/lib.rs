use oodle1_foundation::const_assert;

mod compression;
mod decompressor;
mod dictionary;
mod errors;
mod output;
mod params;
mod prelude;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use compression::Compression;
pub use decompressor::{decompress, decompress_section};
pub use errors::Error;
pub use params::Parameters;

/// Number of decoding passes, each with its own [`Parameters`].
pub const PASS_COUNT: usize = 3;

/// Size of one serialised [`Parameters`] block.
pub const PARAMETERS_SIZE: usize = 12;

/// The parameter blocks precede the range coded stream.
pub const HEADER_SIZE: usize = PASS_COUNT * PARAMETERS_SIZE;

/// Size classes: 0 is a literal, everything else a back-reference.
pub const SIZE_CLASSES: u32 = 65;

/// Copy lengths of the four largest size classes.
pub const LONG_MATCH_LENGTHS: [usize; 4] = [128, 192, 256, 512];
const_assert!(LONG_MATCH_LENGTHS.len() as u32 == SIZE_CLASSES - SHORT_MATCH_CLASSES - 1);

/// Size classes `1..=SHORT_MATCH_CLASSES` copy `class + 1` bytes.
pub const SHORT_MATCH_CLASSES: u32 = 60;

/// Longest single back-reference.
pub const MAX_MATCH_LENGTH: usize = 512;
