//! Reference encoder for building decoder test vectors.
//!
//! The encoder mirrors [`crate::RangeDecoder`] bit for bit: it keeps a 31-bit
//! `low` with a carry bit on top, emits bytes from bit 23 upwards and defers
//! runs of `0xFF` until a carry resolves them. The first byte it produces is
//! the pending byte that precedes any real output; the decoder never expects
//! it, so it is dropped.

use crate::{AdaptiveWindow, Error, RANGE_BOTTOM, TOTAL_RANGE};

const TOP: u32 = 1 << 31;
const SHIFT_BITS: u32 = 23;

#[derive(Debug)]
pub struct RangeEncoder {
    out: Vec<u8>,
    low: u32,
    range: u32,
    buffer: u8,
    help: usize,
    lead_dropped: bool,
}

impl Default for RangeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeEncoder {
    pub fn new() -> Self {
        Self {
            out: Vec::new(),
            low: 0,
            range: TOP,
            buffer: 0,
            help: 0,
            lead_dropped: false,
        }
    }

    /// Encodes the bucket `[low, low + width)` out of `max`.
    pub fn encode(&mut self, max: u32, low: u32, width: u32) {
        assert!(width > 0 && low + width <= max, "empty or oversized bucket");

        self.normalize();

        let r = self.range / max;
        let offset = r * low;
        self.low += offset;
        if low + width < max {
            self.range = r * width;
        } else {
            self.range -= offset;
        }
    }

    /// Flushes the encoder, picking the midpoint of the final interval.
    pub fn finish(mut self) -> Vec<u8> {
        self.low += self.range >> 1;
        for _ in 0..5 {
            self.shift_low();
        }
        self.out
    }

    fn normalize(&mut self) {
        while self.range <= RANGE_BOTTOM {
            self.shift_low();
            self.range <<= 8;
        }
    }

    fn shift_low(&mut self) {
        if self.low < 0xFF << SHIFT_BITS {
            self.emit(self.buffer);
            for _ in 0..self.help {
                self.emit(0xFF);
            }
            self.help = 0;
            self.buffer = (self.low >> SHIFT_BITS) as u8;
        } else if self.low & TOP != 0 {
            self.emit(self.buffer.wrapping_add(1));
            for _ in 0..self.help {
                self.emit(0x00);
            }
            self.help = 0;
            self.buffer = (self.low >> SHIFT_BITS) as u8;
        } else {
            self.help += 1;
        }

        self.low = (self.low << 8) & (TOP - 1);
    }

    fn emit(&mut self, byte: u8) {
        if self.lead_dropped {
            self.out.push(byte);
        } else {
            self.lead_dropped = true;
        }
    }
}

/// Encodes `value` through `window`, leaving it in the state
/// [`AdaptiveWindow::decode`] would reach after decoding it. New symbols are
/// written as uniform values in `[0, alphabet)`.
///
/// # Panics
///
/// When the symbol has to be introduced while the escape slot is closed, or
/// does not fit the alphabet.
pub fn encode_symbol(
    window: &mut AdaptiveWindow,
    enc: &mut RangeEncoder,
    value: u16,
    alphabet: u32,
) -> Result<(), Error> {
    window.refresh()?;

    let buckets = window.bucket_count();
    let known = window.values()[1..buckets]
        .iter()
        .position(|&v| v == value)
        .map(|idx| idx + 1);

    if let Some(index) = known {
        let (low, width) = window.bucket(index);
        if width > 0 {
            enc.encode(TOTAL_RANGE, low, width);
            window.hit(index);
            return Ok(());
        }
    }

    let (low, width) = window.bucket(0);
    assert!(width > 0, "escape slot is closed, cannot introduce {value}");
    enc.encode(TOTAL_RANGE, low, width);
    window.hit(0);

    let uncommon = window.uncommon_count();
    if uncommon > 0 {
        let tail = window.values()[buckets..].iter().position(|&v| v == value);
        if let Some(k) = tail {
            enc.encode(2, 1, 1);
            enc.encode(uncommon as u32, k as u32, 1);
            window.promote(k)?;
            return Ok(());
        }
        enc.encode(2, 0, 1);
    }

    assert!(u32::from(value) < alphabet, "{value} is outside [0, {alphabet})");
    let slot = window.grow();
    window.fill(slot, value)?;
    enc.encode(alphabet, u32::from(value), 1);
    Ok(())
}
