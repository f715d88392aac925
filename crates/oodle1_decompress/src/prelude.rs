pub use oodle1_entropy::{AdaptiveWindow, RangeDecoder};

pub use crate::errors::*;
