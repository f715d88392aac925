use oodle1_foundation::align_up;

use crate::{
    Compression, HEADER_SIZE, PASS_COUNT, Parameters, dictionary::Dictionary,
    output::Output, prelude::*,
};

/// Decompresses an Oodle1 payload.
///
/// `step1` and `step2` are the output offsets where the second and third pass
/// begin; the container stores them next to the compressed section. The
/// payload is only guaranteed to decode correctly if it was produced by a
/// matching encoder, anything else fails with an [`Error`].
///
/// ```
/// let out = oodle1_decompress::decompress(&[], 0, 0, 4).unwrap();
/// assert_eq!(out, [0; 4]);
/// ```
pub fn decompress(
    compressed: &[u8],
    step1: u32,
    step2: u32,
    decompressed_size: u32,
) -> Result<Vec<u8>, Error> {
    let size = decompressed_size as usize;
    if compressed.is_empty() {
        return Ok(vec![0; size]);
    }

    if step1 > step2 || step2 > decompressed_size {
        return Err(Error::InvalidStops {
            step1,
            step2,
            size: decompressed_size,
        });
    }

    // The range decoder reads one byte ahead of its cursor.
    let mut padded = Vec::with_capacity(align_up(compressed.len(), 4));
    padded.extend_from_slice(compressed);
    padded.resize(align_up(compressed.len(), 4), 0);

    let params = Parameters::read_all(compressed)?;
    let mut rd = RangeDecoder::new(&padded[HEADER_SIZE..])?;
    let mut out = Output::new(size);

    let stops = [step1 as usize, step2 as usize, size];
    for (pass, (params, end)) in params.iter().zip(stops).enumerate() {
        tracing::debug!(pass, start = out.index(), end, ?params, "decoding pass");

        // A unit of the previous pass may already have crossed this boundary.
        if out.index() >= end {
            continue;
        }

        let mut dict = Dictionary::new(params);
        while out.index() < end {
            dict.decompress_block(&mut rd, &mut out)?;
        }
    }

    tracing::debug!(
        consumed = HEADER_SIZE + rd.position(),
        compressed = compressed.len(),
        "decompressed {size} bytes in {PASS_COUNT} passes"
    );
    Ok(out.into_inner())
}

/// Decodes a container section according to its compression tag.
pub fn decompress_section(
    compression: Compression,
    data: &[u8],
    stop0: u32,
    stop1: u32,
    decompressed_size: u32,
) -> Result<Vec<u8>, Error> {
    match compression {
        Compression::None => {
            let expected = decompressed_size as usize;
            if data.len() != expected {
                return Err(Error::RawSizeMismatch {
                    expected,
                    actual: data.len(),
                });
            }
            Ok(data.to_vec())
        }
        Compression::Oodle1 => decompress(data, stop0, stop1, decompressed_size),
        unsupported => Err(Error::UnsupportedCompression(unsupported)),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::testkit::{self, Op};

    fn params(backref_value_max: u32) -> Parameters {
        Parameters {
            decoded_value_max: 256,
            backref_value_max,
            decoded_count: 300,
            highbit_count: 128,
            sizes_count: [255; 4],
        }
    }

    #[test]
    fn test_empty_payload() -> Result<(), Error> {
        assert_eq!(decompress(&[], 0, 0, 0)?, Vec::<u8>::new());
        assert_eq!(decompress(&[], 3, 5, 9)?, vec![0; 9]);

        Ok(())
    }

    #[test]
    fn test_invalid_stops() {
        let data = [0u8; 40];

        assert!(matches!(
            decompress(&data, 8, 4, 16),
            Err(Error::InvalidStops {
                step1: 8,
                step2: 4,
                size: 16
            })
        ));
        assert!(matches!(
            decompress(&data, 4, 17, 16),
            Err(Error::InvalidStops { .. })
        ));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            decompress(&[0u8; 20], 0, 0, 8),
            Err(Error::TruncatedHeader(20))
        ));
    }

    #[test]
    fn test_missing_stream() {
        assert!(matches!(
            decompress(&[0u8; HEADER_SIZE], 0, 0, 8),
            Err(Error::Entropy(oodle1_entropy::Error::StreamExhausted {
                offset: 0
            }))
        ));
    }

    #[test]
    fn test_truncated_stream() -> Result<(), Error> {
        let text = b"a truncated stream runs out of input long before the output is full";
        let ops: Vec<Op> = text.iter().copied().map(Op::Literal).collect();
        let payload = testkit::compress([params(1024); 3], [ops, vec![], vec![]]);

        let cut = &payload.data[..HEADER_SIZE + 8];
        assert!(matches!(
            decompress(cut, payload.step1, payload.step2, payload.size),
            Err(Error::Entropy(oodle1_entropy::Error::StreamExhausted { .. }))
        ));

        Ok(())
    }

    #[test]
    fn test_three_passes() -> Result<(), Error> {
        let first: Vec<Op> = b"header header header"
            .iter()
            .copied()
            .map(Op::Literal)
            .collect();
        let second = testkit::plan(&[0x10, 0x20, 0x30, 0x40].repeat(64), 256);
        let third = testkit::plan(b"abcabcabcabcabcabcXabcabc", 0x1000);

        let payload = testkit::compress(
            [params(16), params(256), params(0x1000)],
            [first, second, third],
        );

        let out = decompress(&payload.data, payload.step1, payload.step2, payload.size)?;
        assert_eq!(out, payload.expected);
        assert_eq!(payload.step1, 20);
        assert_eq!(payload.step2, 20 + 256);

        Ok(())
    }

    #[test]
    fn test_empty_passes_skip_parameters() -> Result<(), Error> {
        // Zeroed parameters are never used when their pass is empty.
        let ops = testkit::plan(b"only the middle pass carries data, data, data", 64);
        let payload = testkit::compress(
            [Parameters::default(), params(64), Parameters::default()],
            [vec![], ops, vec![]],
        );

        let out = decompress(&payload.data, payload.step1, payload.step2, payload.size)?;
        assert_eq!(out, payload.expected);
        assert_eq!(payload.step1, 0);

        Ok(())
    }

    #[test]
    fn test_output_overrun() -> Result<(), Error> {
        let ops = vec![
            Op::Literal(1),
            Op::Literal(2),
            Op::Match {
                length: 8,
                distance: 2,
            },
        ];
        let payload = testkit::compress([params(64); 3], [ops, vec![], vec![]]);

        assert!(matches!(
            decompress(&payload.data, 4, 4, 4),
            Err(Error::OutputOverrun {
                index: 2,
                len: 8,
                size: 4
            })
        ));

        Ok(())
    }

    fn overshooting_payload() -> testkit::Payload {
        let first = vec![
            Op::Literal(7),
            Op::Match {
                length: 4,
                distance: 1,
            },
        ];
        let second = vec![Op::Literal(8), Op::Literal(9)];
        testkit::compress([params(64); 3], [first, second, vec![]])
    }

    #[test]
    fn test_pass_boundary_already_crossed() -> Result<(), Error> {
        // The match ends the first pass at 5, past both stops, so the second
        // pass has nothing left to decode.
        let payload = overshooting_payload();

        let out = decompress(&payload.data, 3, 5, 5)?;
        assert_eq!(out, [7, 7, 7, 7, 7]);

        Ok(())
    }

    #[test]
    fn test_pass_continues_after_overshoot() -> Result<(), Error> {
        // The second pass picks up where the first one stopped, not at 3.
        let payload = overshooting_payload();

        let out = decompress(&payload.data, 3, 7, 7)?;
        assert_eq!(out, [7, 7, 7, 7, 7, 8, 9]);
        assert_eq!(out, payload.expected);

        Ok(())
    }

    #[test]
    fn test_sections() -> Result<(), Error> {
        assert_eq!(
            decompress_section(Compression::None, &[1, 2, 3], 0, 0, 3)?,
            [1, 2, 3]
        );
        assert!(matches!(
            decompress_section(Compression::None, &[1, 2, 3], 0, 0, 4),
            Err(Error::RawSizeMismatch {
                expected: 4,
                actual: 3
            })
        ));
        assert!(matches!(
            decompress_section(Compression::Oodle0, &[1, 2, 3], 0, 0, 3),
            Err(Error::UnsupportedCompression(Compression::Oodle0))
        ));
        assert!(matches!(
            decompress_section(Compression::BitKnit1, &[], 0, 0, 3),
            Err(Error::UnsupportedCompression(Compression::BitKnit1))
        ));

        let ops = testkit::plan(b"section section section", 32);
        let payload = testkit::compress([params(32); 3], [ops, vec![], vec![]]);
        let out = decompress_section(
            Compression::Oodle1,
            &payload.data,
            payload.step1,
            payload.step2,
            payload.size,
        )?;
        assert_eq!(out, payload.expected);

        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_round_trip(
            passes in proptest::array::uniform3(
                proptest::collection::vec(
                    prop_oneof![4 => 0u8..4, 1 => any::<u8>()],
                    0..2000
                )
            ),
            backref_value_max in proptest::array::uniform3(1u32..0x1_0000),
        ) {
            let ops = [
                testkit::plan(&passes[0], backref_value_max[0]),
                testkit::plan(&passes[1], backref_value_max[1]),
                testkit::plan(&passes[2], backref_value_max[2]),
            ];
            let payload = testkit::compress(backref_value_max.map(params), ops);

            let out = decompress(&payload.data, payload.step1, payload.step2, payload.size)?;
            prop_assert_eq!(&out, &payload.expected);

            let mut expected = passes[0].clone();
            expected.extend(&passes[1]);
            expected.extend(&passes[2]);
            prop_assert_eq!(out, expected);
        }
    }
}
