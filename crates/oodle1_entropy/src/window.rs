use crate::{Error, RangeDecoder, TOTAL_RANGE};

/// Result of [`AdaptiveWindow::try_decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A symbol the window has seen before.
    Known(u16),
    /// The escape path allocated a new slot. The caller decodes the symbol
    /// itself and stores it with [`AdaptiveWindow::fill`].
    NewSlot(usize),
}

/// Frequency-adaptive model over a small alphabet.
///
/// Symbols own buckets of the `[0, TOTAL_RANGE)` interval proportional to how
/// often they were seen. Slot 0 is the escape slot: hitting it introduces a
/// symbol the window has not bucketed yet. Buckets are only recomputed when
/// the accumulated weight crosses a threshold, so symbols added in between
/// live past the bucketed region until the next rebuild.
///
/// Every step of the model is public so an encoder can drive the exact same
/// state transitions as [`AdaptiveWindow::try_decode`].
#[derive(Debug, Clone)]
pub struct AdaptiveWindow {
    ranges: Vec<u32>,
    values: Vec<u16>,
    weights: Vec<u32>,
    weight_total: u32,
    count_cap: usize,

    thresh_increase: u32,
    thresh_increase_cap: u32,
    thresh_range_rebuild: u32,
    thresh_weight_rebuild: u32,
}

impl AdaptiveWindow {
    /// `max_value` is the largest symbol the window is expected to see and
    /// tunes the rebuild thresholds. `count` bounds how many symbols it can
    /// hold before the escape slot closes.
    pub fn new(max_value: u32, count: u32) -> Self {
        let thresh_weight_rebuild = max_value.saturating_mul(32).clamp(256, 15160);
        let thresh_increase_cap = if max_value > 64 {
            max_value
                .saturating_mul(2)
                .min(thresh_weight_rebuild / 2 - 32)
        } else {
            128
        };

        Self {
            ranges: vec![0, TOTAL_RANGE],
            values: vec![0],
            weights: vec![4],
            weight_total: 4,
            count_cap: count as usize + 1,
            thresh_increase: 4,
            thresh_increase_cap,
            thresh_range_rebuild: 8,
            thresh_weight_rebuild,
        }
    }

    /// Decodes one symbol, or allocates a slot for one it has not seen yet.
    pub fn try_decode(&mut self, rd: &mut RangeDecoder) -> Result<DecodeOutcome, Error> {
        self.refresh()?;

        let target = rd.decode(TOTAL_RANGE)?;
        let index = self.locate(target);
        let (low, width) = self.bucket(index);
        rd.commit(TOTAL_RANGE, low, width)?;
        self.hit(index);

        if index > 0 {
            return Ok(DecodeOutcome::Known(self.values[index]));
        }

        let uncommon = self.uncommon_count();
        if uncommon > 0 && rd.decode_and_commit(2)? == 1 {
            let k = rd.decode_and_commit(uncommon as u32)?;
            return self.promote(k as usize).map(DecodeOutcome::Known);
        }

        Ok(DecodeOutcome::NewSlot(self.grow()))
    }

    /// Decodes one symbol, reading escaped symbols as uniform values in
    /// `[0, alphabet)`.
    pub fn decode(&mut self, rd: &mut RangeDecoder, alphabet: u32) -> Result<u16, Error> {
        match self.try_decode(rd)? {
            DecodeOutcome::Known(symbol) => Ok(symbol),
            DecodeOutcome::NewSlot(slot) => {
                let symbol = rd.decode_and_commit(alphabet)? as u16;
                self.fill(slot, symbol)?;
                Ok(symbol)
            }
        }
    }

    /// Stores the symbol for a slot handed out by [`DecodeOutcome::NewSlot`].
    pub fn fill(&mut self, slot: usize, symbol: u16) -> Result<(), Error> {
        let len = self.values.len();
        if slot == 0 || slot >= len {
            return Err(Error::InvalidSlot { slot, len });
        }

        self.values[slot] = symbol;
        Ok(())
    }

    /// Rebuilds buckets (and first decays weights) once enough weight has
    /// accumulated since the previous rebuild.
    pub fn refresh(&mut self) -> Result<(), Error> {
        if self.weight_total < self.thresh_range_rebuild {
            return Ok(());
        }

        if self.thresh_range_rebuild >= self.thresh_weight_rebuild {
            self.rebuild_weights()?;
        }
        self.rebuild_ranges()
    }

    /// Index of the bucket containing `target`, `target < TOTAL_RANGE`.
    #[inline]
    pub fn locate(&self, target: u32) -> usize {
        let upper = self.ranges.partition_point(|&start| start <= target);
        upper.saturating_sub(1).min(self.bucket_count() - 1)
    }

    /// `(start, width)` of a bucket.
    #[inline]
    pub fn bucket(&self, index: usize) -> (u32, u32) {
        let start = self.ranges[index];
        (start, self.ranges[index + 1] - start)
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.ranges.len() - 1
    }

    /// Symbols added since the last rebuild, reachable only through escape.
    #[inline]
    pub fn uncommon_count(&self) -> usize {
        self.weights.len() - self.bucket_count()
    }

    /// Records a hit on a bucketed slot.
    #[inline]
    pub fn hit(&mut self, index: usize) {
        self.weights[index] += 1;
        self.weight_total += 1;
    }

    /// Records a hit on the `k`-th uncommon symbol and returns it.
    pub fn promote(&mut self, k: usize) -> Result<u16, Error> {
        let slot = self.bucket_count() + k;
        let len = self.values.len();
        if slot >= len {
            return Err(Error::InvalidSlot { slot, len });
        }

        self.weights[slot] += 2;
        self.weight_total += 2;
        Ok(self.values[slot])
    }

    /// Appends an empty slot and returns its index. The escape slot closes
    /// once the window is full.
    pub fn grow(&mut self) -> usize {
        self.values.push(0);
        self.weights.push(2);
        self.weight_total += 2;

        if self.weights.len() == self.count_cap {
            self.weight_total -= self.weights[0];
            self.weights[0] = 0;
        }

        self.values.len() - 1
    }

    pub fn ranges(&self) -> &[u32] {
        &self.ranges
    }

    pub fn values(&self) -> &[u16] {
        &self.values
    }

    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    pub fn weight_total(&self) -> u32 {
        self.weight_total
    }

    pub fn count_cap(&self) -> usize {
        self.count_cap
    }

    fn rebuild_ranges(&mut self) -> Result<(), Error> {
        if self.weight_total == 0 {
            return Err(Error::EmptyWindow);
        }

        let range_weight = 8 * TOTAL_RANGE / self.weight_total;

        self.ranges.clear();
        let mut start = 0;
        for &weight in &self.weights {
            self.ranges.push(start);
            start += weight * range_weight / 8;
        }
        self.ranges.push(TOTAL_RANGE);

        if self.thresh_increase > self.thresh_increase_cap / 2 {
            self.thresh_range_rebuild = self.weight_total + self.thresh_increase_cap;
        } else {
            self.thresh_increase *= 2;
            self.thresh_range_rebuild = self.weight_total + self.thresh_increase;
        }

        tracing::trace!(
            buckets = self.bucket_count(),
            weight_total = self.weight_total,
            next_rebuild = self.thresh_range_rebuild,
            "rebuilt window ranges"
        );
        Ok(())
    }

    fn rebuild_weights(&mut self) -> Result<(), Error> {
        for weight in &mut self.weights {
            *weight /= 2;
        }

        let mut idx = 1;
        while idx < self.weights.len() {
            if self.weights[idx] == 0 {
                self.weights.swap_remove(idx);
                self.values.swap_remove(idx);
            } else {
                idx += 1;
            }
        }

        // The first heaviest symbol moves to the front of the table.
        let mut heaviest = 1;
        for idx in 2..self.weights.len() {
            if self.weights[idx] > self.weights[heaviest] {
                heaviest = idx;
            }
        }
        if heaviest < self.weights.len() {
            self.weights.swap(1, heaviest);
            self.values.swap(1, heaviest);
        }

        if self.weights.len() < self.count_cap && self.weights[0] == 0 {
            self.weights[0] = 1;
        }

        self.weight_total = self.weights.iter().sum();
        if self.weight_total == 0 {
            return Err(Error::EmptyWindow);
        }
        Ok(())
    }
}
