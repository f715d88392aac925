#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("Range decoder ran out of input at offset {offset}")]
    #[diagnostic(
        code(oodle1::entropy::stream_exhausted),
        help("The compressed payload is truncated or its declared size is wrong.")
    )]
    StreamExhausted { offset: usize },

    #[error("Empty symbol alphabet")]
    #[diagnostic(code(oodle1::entropy::zero_alphabet))]
    ZeroAlphabet,

    #[error("Range decoder interval is too narrow for an alphabet of {max}")]
    #[diagnostic(code(oodle1::entropy::interval_collapsed))]
    IntervalCollapsed { max: u32 },

    #[error("Symbol interval [{low}, {low} + {width}) does not contain the decoded value")]
    #[diagnostic(code(oodle1::entropy::invalid_commit))]
    InvalidCommit { low: u32, width: u32 },

    #[error("Adaptive window lost all of its weight")]
    #[diagnostic(code(oodle1::entropy::empty_window))]
    EmptyWindow,

    #[error("Slot {slot} is outside a window of {len} values")]
    #[diagnostic(code(oodle1::entropy::invalid_slot))]
    InvalidSlot { slot: usize, len: usize },
}
