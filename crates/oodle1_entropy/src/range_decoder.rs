use crate::{Error, RANGE_BOTTOM};

/// Binary range decoder.
///
/// The code value is kept in `numer`, the width of the current interval in
/// `denom`. Input bytes are consumed one bit out of phase: every refill takes
/// the low bit of the current byte and the seven high bits of the next one,
/// so the decoder always peeks one byte ahead of its cursor.
///
/// A decoded symbol takes two steps. [`RangeDecoder::decode`] scales the code
/// value into `[0, max)` and [`RangeDecoder::commit`] narrows the interval to
/// the bucket the caller matched it against.
#[derive(Debug)]
pub struct RangeDecoder<'src> {
    src: &'src [u8],
    pos: usize,
    numer: u32,
    denom: u32,
    next_denom: u32,
}

impl<'src> RangeDecoder<'src> {
    pub fn new(src: &'src [u8]) -> Result<Self, Error> {
        let first = *src.first().ok_or(Error::StreamExhausted { offset: 0 })?;

        Ok(Self {
            src,
            pos: 0,
            numer: u32::from(first >> 1),
            denom: 0x80,
            next_denom: 0,
        })
    }

    /// Returns a value in `[0, max)` without consuming it.
    #[inline]
    pub fn decode(&mut self, max: u32) -> Result<u32, Error> {
        if max == 0 {
            return Err(Error::ZeroAlphabet);
        }

        while self.denom <= RANGE_BOTTOM {
            let hi = self.byte(self.pos)?;
            let lo = self.byte(self.pos + 1)?;

            self.numer = (self.numer << 8) | u32::from((hi << 7) | (lo >> 1));
            self.denom <<= 8;
            self.pos += 1;
        }

        self.next_denom = self.denom / max;
        if self.next_denom == 0 {
            return Err(Error::IntervalCollapsed { max });
        }

        Ok((self.numer / self.next_denom).min(max - 1))
    }

    /// Narrows the interval to `[val, val + err)` out of `max`.
    ///
    /// `max` has to match the preceding [`RangeDecoder::decode`] call, and
    /// the bucket has to contain the value it returned.
    #[inline]
    pub fn commit(&mut self, max: u32, val: u32, err: u32) -> Result<(), Error> {
        let offset = self.next_denom.checked_mul(val);
        self.numer = offset
            .and_then(|offset| self.numer.checked_sub(offset))
            .ok_or(Error::InvalidCommit {
                low: val,
                width: err,
            })?;

        if val + err < max {
            self.denom = self.next_denom * err;
        } else {
            // Checked above: next_denom * val fits and does not exceed numer.
            self.denom -= self.next_denom * val;
        }

        if self.numer >= self.denom {
            return Err(Error::InvalidCommit {
                low: val,
                width: err,
            });
        }
        Ok(())
    }

    /// Decodes a uniformly distributed value in `[0, max)`.
    #[inline]
    pub fn decode_and_commit(&mut self, max: u32) -> Result<u32, Error> {
        let val = self.decode(max)?;
        self.commit(max, val, 1)?;
        Ok(val)
    }

    /// Offset of the byte the next refill starts from.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn byte(&self, offset: usize) -> Result<u8, Error> {
        self.src
            .get(offset)
            .copied()
            .ok_or(Error::StreamExhausted { offset })
    }
}
