use crate::prelude::*;

/// The decompressed buffer and the cursor passes write through.
#[derive(Debug)]
pub struct Output {
    buf: Vec<u8>,
    index: usize,
}

impl Output {
    pub fn new(size: usize) -> Self {
        Self {
            buf: vec![0; size],
            index: 0,
        }
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.index]
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    #[inline(always)]
    pub fn push(&mut self, byte: u8) -> Result<(), Error> {
        self.reserve(1)?;

        self.buf[self.index] = byte;
        self.index += 1;
        Ok(())
    }

    /// Replays `n_bytes` starting `distance` bytes behind the cursor.
    ///
    /// When the match overlaps the bytes it produces, the source repeats with
    /// a period of `distance`.
    #[inline(always)]
    pub fn copy_within(&mut self, distance: usize, n_bytes: usize) -> Result<(), Error> {
        if distance == 0 || distance > self.index {
            return Err(Error::DistanceOutOfBounds {
                distance,
                available: self.index,
            });
        }
        self.reserve(n_bytes)?;

        let mut src = self.index - distance;
        let mut dst = self.index;
        if distance >= n_bytes {
            self.buf.copy_within(src..src + n_bytes, dst);
        } else {
            for _ in 0..n_bytes / distance {
                self.buf.copy_within(src..src + distance, dst);
                src += distance;
                dst += distance;
            }

            let rest = n_bytes % distance;
            self.buf.copy_within(src..src + rest, dst);
        }

        self.index += n_bytes;
        Ok(())
    }

    #[inline(always)]
    fn reserve(&self, n_bytes: usize) -> Result<(), Error> {
        if self.index + n_bytes > self.buf.len() {
            return Err(Error::OutputOverrun {
                index: self.index,
                len: n_bytes,
                size: self.buf.len(),
            });
        }
        Ok(())
    }
}
