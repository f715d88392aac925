use crate::Error;

/// Reads bitfields packed most significant bit first. Each byte is appended
/// below the bits already buffered and fields are taken from the top.
#[derive(Debug)]
pub struct BitReader<'src> {
    src: &'src [u8],
    buf: u64,
    bit_count: u8,
    index: usize,
}

impl<'src> BitReader<'src> {
    pub fn new(src: &'src [u8]) -> Result<Self, Error> {
        if src.is_empty() {
            return Err(Error::EmptyStream);
        }

        Ok(Self {
            src,
            buf: 0,
            bit_count: 0,
            index: 0,
        })
    }

    /// Reads an `n_bits` wide field, `n_bits <= 32`.
    #[inline]
    pub fn read(&mut self, n_bits: u8) -> Result<u32, Error> {
        assert!(n_bits <= 32);

        if self.bit_count < n_bits {
            self.refill();

            if self.bit_count < n_bits {
                return Err(Error::NotEnoughBits {
                    requested: n_bits as usize,
                    remaining: self.bits_remaining(),
                });
            }
        }

        let mask = (1u64 << n_bits) - 1;
        self.bit_count -= n_bits;
        Ok(((self.buf >> self.bit_count) & mask) as u32)
    }

    /// Drops `n_bits` without interpreting them.
    pub fn skip(&mut self, n_bits: u8) -> Result<(), Error> {
        self.read(n_bits).map(|_| ())
    }

    /// Reads `N` whole bytes. The reader has to sit on a byte boundary.
    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        if self.bit_count % 8 != 0 {
            return Err(Error::Unaligned {
                bit_offset: self.bits_consumed(),
            });
        }

        let mut out = [0u8; N];
        for byte in &mut out {
            *byte = self.read(8)? as u8;
        }
        Ok(out)
    }

    #[inline]
    pub fn bytes_consumed(&self) -> usize {
        self.bits_consumed().div_ceil(8)
    }

    #[inline]
    pub fn bits_consumed(&self) -> usize {
        self.index * 8 - self.bit_count as usize
    }

    #[inline]
    pub fn bits_remaining(&self) -> usize {
        (self.src.len() - self.index) * 8 + self.bit_count as usize
    }

    fn refill(&mut self) {
        while self.bit_count <= 56 && self.index < self.src.len() {
            self.buf = (self.buf << 8) | u64::from(self.src[self.index]);
            self.bit_count += 8;
            self.index += 1;
        }
    }
}
