mod bit_reader;

pub use bit_reader::BitReader;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("Stream is empty")]
    #[diagnostic(
        code(oodle1::io::empty_stream),
        help("The input stream ended unexpectedly. Verify the input data is complete.")
    )]
    EmptyStream,

    #[error(
        "Not enough bits in stream. Requested: {requested:?}, Remaining: {remaining:?}"
    )]
    #[diagnostic(
        code(oodle1::io::not_enough_bits),
        help("Attempted to read more bits than are available in the stream.")
    )]
    NotEnoughBits { requested: usize, remaining: usize },

    #[error("Byte read requested at bit offset {bit_offset}")]
    #[diagnostic(
        code(oodle1::io::unaligned),
        help("Whole bytes can only be read on a byte boundary.")
    )]
    Unaligned { bit_offset: usize },
}
