use oodle1_io::BitReader;

use crate::{HEADER_SIZE, PASS_COUNT, PARAMETERS_SIZE, prelude::*};

/// Tuning of one decoding pass.
///
/// Each block is 12 bytes: 64 bits of packed fields, read most significant
/// bit first, followed by four size-class counts.
///
/// | Bits  | Field               |
/// |-------|---------------------|
/// | 0-8   | `decoded_value_max` |
/// | 9-31  | `backref_value_max` |
/// | 32-40 | `decoded_count`     |
/// | 41-50 | (reserved)          |
/// | 51-63 | `highbit_count`     |
///
/// Bytes 8-11 hold `sizes_count[0..4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Parameters {
    pub(crate) decoded_value_max: u16,
    pub(crate) backref_value_max: u32,
    pub(crate) decoded_count: u16,
    pub(crate) highbit_count: u16,
    pub(crate) sizes_count: [u8; 4],
}

impl Parameters {
    pub const DECODED_VALUE_MAX_BITS: u8 = 9;
    pub const BACKREF_VALUE_MAX_BITS: u8 = 23;
    pub const DECODED_COUNT_BITS: u8 = 9;
    pub const RESERVED_BITS: u8 = 10;
    pub const HIGHBIT_COUNT_BITS: u8 = 13;

    pub fn read(src: &mut BitReader) -> Result<Self, Error> {
        let decoded_value_max = src.read(Self::DECODED_VALUE_MAX_BITS)? as u16;
        let backref_value_max = src.read(Self::BACKREF_VALUE_MAX_BITS)?;
        let decoded_count = src.read(Self::DECODED_COUNT_BITS)? as u16;
        src.skip(Self::RESERVED_BITS)?;
        let highbit_count = src.read(Self::HIGHBIT_COUNT_BITS)? as u16;
        let sizes_count = src.read_bytes::<4>()?;

        Ok(Self {
            decoded_value_max,
            backref_value_max,
            decoded_count,
            highbit_count,
            sizes_count,
        })
    }

    /// Reads the parameter blocks of all passes from the start of a payload.
    pub fn read_all(src: &[u8]) -> Result<[Self; PASS_COUNT], Error> {
        if src.len() < HEADER_SIZE {
            return Err(Error::TruncatedHeader(src.len()));
        }

        let mut br = BitReader::new(&src[..HEADER_SIZE])?;
        let mut params = [Self::default(); PASS_COUNT];
        for param in &mut params {
            *param = Self::read(&mut br)?;
        }

        debug_assert_eq!(br.bytes_consumed(), PASS_COUNT * PARAMETERS_SIZE);
        Ok(params)
    }

    /// Size of the literal alphabet.
    pub const fn decoded_value_max(&self) -> u16 {
        self.decoded_value_max
    }

    /// Largest back-reference distance the pass may use.
    pub const fn backref_value_max(&self) -> u32 {
        self.backref_value_max
    }

    /// Growth cap of the literal windows.
    pub const fn decoded_count(&self) -> u16 {
        self.decoded_count
    }

    /// Growth cap of the high distance bits window, minus one.
    pub const fn highbit_count(&self) -> u16 {
        self.highbit_count
    }

    /// Growth caps of the size-class window groups.
    pub const fn sizes_count(&self) -> [u8; 4] {
        self.sizes_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(
        decoded_value_max: u32,
        backref_value_max: u32,
        decoded_count: u32,
        reserved: u32,
        highbit_count: u32,
        sizes_count: [u8; 4],
    ) -> Vec<u8> {
        let fields = (u64::from(decoded_value_max) << 55)
            | (u64::from(backref_value_max) << 32)
            | (u64::from(decoded_count) << 23)
            | (u64::from(reserved) << 13)
            | u64::from(highbit_count);

        let mut out = Vec::with_capacity(PARAMETERS_SIZE);
        out.extend_from_slice(&fields.to_be_bytes());
        out.extend_from_slice(&sizes_count);
        out
    }

    #[test]
    fn test_read_all() -> Result<(), Error> {
        let mut header = block(256, 0x1_0000, 300, 0, 18, [1, 2, 3, 4]);
        header.extend(block(511, 0x7F_FFFF, 511, 0x3FF, 0x1FFF, [255; 4]));
        header.extend(block(0, 0, 0, 0, 0, [0; 4]));
        header.extend([0xAA; 8]);

        let [first, second, third] = Parameters::read_all(&header)?;

        assert_eq!(first.decoded_value_max(), 256);
        assert_eq!(first.backref_value_max(), 0x1_0000);
        assert_eq!(first.decoded_count(), 300);
        assert_eq!(first.highbit_count(), 18);
        assert_eq!(first.sizes_count(), [1, 2, 3, 4]);

        // Reserved bits are ignored, every field saturates independently.
        assert_eq!(second.decoded_value_max(), 511);
        assert_eq!(second.backref_value_max(), 0x7F_FFFF);
        assert_eq!(second.decoded_count(), 511);
        assert_eq!(second.highbit_count(), 0x1FFF);
        assert_eq!(second.sizes_count(), [255; 4]);

        assert_eq!(third, Parameters::default());

        Ok(())
    }

    #[test]
    fn test_fixed_header_bytes() -> Result<(), Error> {
        #[rustfmt::skip]
        let block = [
            0x80, 0x01, 0x00, 0x00,
            0x96, 0x00, 0x00, 0x12,
            0x05, 0x06, 0x07, 0x08,
        ];
        let header = block.repeat(PASS_COUNT);

        let params = Parameters::read_all(&header)?;

        for param in params {
            assert_eq!(param.decoded_value_max(), 256);
            assert_eq!(param.backref_value_max(), 0x1_0000);
            assert_eq!(param.decoded_count(), 300);
            assert_eq!(param.highbit_count(), 18);
            assert_eq!(param.sizes_count(), [5, 6, 7, 8]);
        }

        Ok(())
    }

    #[test]
    fn test_truncated_header() {
        let header = vec![0u8; HEADER_SIZE - 1];

        assert!(matches!(
            Parameters::read_all(&header),
            Err(Error::TruncatedHeader(35))
        ));
    }
}
