mod errors;
mod range_decoder;
mod window;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use errors::Error;
pub use range_decoder::RangeDecoder;
pub use window::{AdaptiveWindow, DecodeOutcome};

/// Scale of the cumulative intervals every [`AdaptiveWindow`] codes against.
pub const TOTAL_RANGE: u32 = 0x4000;

/// The decoder refills while its interval width is at or below this value.
pub const RANGE_BOTTOM: u32 = 1 << 23;

oodle1_foundation::const_assert!(TOTAL_RANGE < RANGE_BOTTOM);
