use crate::{Compression, HEADER_SIZE};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("Unknown compression tag {0}")]
    #[diagnostic(code(oodle1::unknown_compression))]
    UnknownCompression(u32),

    #[error("Unsupported compression {0}")]
    #[diagnostic(
        code(oodle1::unsupported_compression),
        help("Only uncompressed and Oodle1 sections can be decoded.")
    )]
    UnsupportedCompression(Compression),

    #[error("Header needs {HEADER_SIZE} bytes, got {0}")]
    #[diagnostic(code(oodle1::truncated_header))]
    TruncatedHeader(usize),

    #[error("Pass boundaries {step1}, {step2} do not fit an output of {size} bytes")]
    #[diagnostic(
        code(oodle1::invalid_stops),
        help("The stop values must be ordered and no larger than the decompressed size.")
    )]
    InvalidStops { step1: u32, step2: u32, size: u32 },

    #[error("Uncompressed section holds {actual} bytes, expected {expected}")]
    #[diagnostic(code(oodle1::raw_size_mismatch))]
    RawSizeMismatch { expected: usize, actual: usize },

    #[error("Size class {0} is out of range")]
    #[diagnostic(code(oodle1::invalid_size_class))]
    InvalidSizeClass(u16),

    #[error("Literal {0} does not fit in a byte")]
    #[diagnostic(code(oodle1::literal_out_of_range))]
    LiteralOutOfRange(u16),

    #[error("Distance selector {selector} is outside a bank of {len} windows")]
    #[diagnostic(code(oodle1::invalid_selector))]
    InvalidSelector { selector: usize, len: usize },

    #[error("Back-reference distance {distance} reaches before the output start ({available} bytes)")]
    #[diagnostic(code(oodle1::distance_out_of_bounds))]
    DistanceOutOfBounds { distance: usize, available: usize },

    #[error("Writing {len} bytes at {index} overruns an output of {size} bytes")]
    #[diagnostic(code(oodle1::output_overrun))]
    OutputOverrun { index: usize, len: usize, size: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    IO(#[from] oodle1_io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Entropy(#[from] oodle1_entropy::Error),
}
