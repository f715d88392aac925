use crate::{
    LONG_MATCH_LENGTHS, Parameters, SHORT_MATCH_CLASSES, SIZE_CLASSES, output::Output,
    prelude::*,
};

/// Size windows come in groups of this many consecutive selectors.
const SIZE_WINDOW_GROUP: usize = 16;

/// Literal windows are picked by output alignment.
const LITERAL_WINDOWS: usize = 4;

/// Decoding state of one pass.
///
/// Every unit starts with a size class, modelled on the class of the unit
/// before it. Class 0 is a literal byte, modelled on the output alignment.
/// Any other class is a back-reference whose distance is split into three
/// components, each with its own window: the low 2 bits, the bits above
/// bit 10, and the 8 bits in between, modelled on the high component.
#[derive(Debug)]
pub struct Dictionary {
    decoded_size: usize,
    backref_size: usize,

    decoded_value_max: u32,
    backref_value_max: u32,
    lowbit_value_max: u32,

    lowbit_window: AdaptiveWindow,
    highbit_window: AdaptiveWindow,
    midbit_windows: Vec<AdaptiveWindow>,
    decoded_windows: [AdaptiveWindow; LITERAL_WINDOWS],
    size_windows: Vec<AdaptiveWindow>,
}

impl Dictionary {
    pub fn new(params: &Parameters) -> Self {
        let decoded_value_max = u32::from(params.decoded_value_max);
        let backref_value_max = params.backref_value_max;

        let lowbit_value_max = (backref_value_max + 1).min(4);
        let midbit_value_max = (backref_value_max / 4 + 1).min(256);
        let highbit_value_max = backref_value_max / 1024 + 1;

        let decoded_window = AdaptiveWindow::new(
            decoded_value_max.saturating_sub(1),
            u32::from(params.decoded_count),
        );

        let size_windows = (0..LITERAL_WINDOWS)
            .flat_map(|group| {
                let count = u32::from(params.sizes_count[3 - group]);
                std::iter::repeat_n(AdaptiveWindow::new(64, count), SIZE_WINDOW_GROUP)
            })
            .chain(std::iter::once(AdaptiveWindow::new(
                64,
                u32::from(params.sizes_count[0]),
            )))
            .collect::<Vec<_>>();
        debug_assert_eq!(size_windows.len(), SIZE_CLASSES as usize);

        Self {
            decoded_size: 0,
            backref_size: 0,
            decoded_value_max,
            backref_value_max,
            lowbit_value_max,
            lowbit_window: AdaptiveWindow::new(lowbit_value_max - 1, lowbit_value_max),
            highbit_window: AdaptiveWindow::new(
                highbit_value_max - 1,
                u32::from(params.highbit_count) + 1,
            ),
            midbit_windows: vec![
                AdaptiveWindow::new(midbit_value_max - 1, midbit_value_max);
                highbit_value_max as usize
            ],
            decoded_windows: std::array::from_fn(|_| decoded_window.clone()),
            size_windows,
        }
    }

    /// Decodes one literal or back-reference into `out` and returns the
    /// number of bytes it produced.
    pub fn decompress_block(
        &mut self,
        rd: &mut RangeDecoder,
        out: &mut Output,
    ) -> Result<usize, Error> {
        let class = self.size_windows[self.backref_size].decode(rd, SIZE_CLASSES)?;
        if u32::from(class) >= SIZE_CLASSES {
            return Err(Error::InvalidSizeClass(class));
        }
        self.backref_size = usize::from(class);

        let produced = if class == 0 {
            let window = &mut self.decoded_windows[out.index() % LITERAL_WINDOWS];
            let symbol = window.decode(rd, self.decoded_value_max)?;
            let byte = u8::try_from(symbol).map_err(|_| Error::LiteralOutOfRange(symbol))?;

            tracing::trace!(index = out.index(), byte, "literal");
            out.push(byte)?;
            1
        } else {
            let length = match_length(class)?;
            let distance = self.decode_distance(rd)?;

            tracing::trace!(index = out.index(), length, distance, "match");
            out.copy_within(distance, length)?;
            length
        };

        self.decoded_size += produced;
        Ok(produced)
    }

    fn backref_range(&self) -> u32 {
        u32::try_from(self.decoded_size)
            .unwrap_or(u32::MAX)
            .min(self.backref_value_max)
    }

    fn decode_distance(&mut self, rd: &mut RangeDecoder) -> Result<usize, Error> {
        let backref_range = self.backref_range();

        let low = self.lowbit_window.decode(rd, self.lowbit_value_max)?;
        let high = self.highbit_window.decode(rd, backref_range / 1024 + 1)?;

        let len = self.midbit_windows.len();
        let midbit_window = self
            .midbit_windows
            .get_mut(usize::from(high))
            .ok_or(Error::InvalidSelector {
                selector: usize::from(high),
                len,
            })?;
        let mid = midbit_window.decode(rd, (backref_range / 4 + 1).min(256))?;

        Ok((usize::from(high) << 10) + (usize::from(mid) << 2) + usize::from(low) + 1)
    }
}

/// Copy length of a back-reference size class.
pub fn match_length(class: u16) -> Result<usize, Error> {
    match u32::from(class) {
        class @ 1..=SHORT_MATCH_CLASSES => Ok(class as usize + 1),
        class @ 61..SIZE_CLASSES => {
            Ok(LONG_MATCH_LENGTHS[(class - SHORT_MATCH_CLASSES - 1) as usize])
        }
        _ => Err(Error::InvalidSizeClass(class)),
    }
}

/// Size class of a copy length, if one encodes it exactly.
#[cfg(any(test, feature = "testkit"))]
pub fn size_class(length: usize) -> Option<u16> {
    match length {
        2..=61 => Some(length as u16 - 1),
        _ => LONG_MATCH_LENGTHS
            .iter()
            .position(|&long| long == length)
            .map(|idx| (SHORT_MATCH_CLASSES as usize + 1 + idx) as u16),
    }
}

#[cfg(any(test, feature = "testkit"))]
mod encode {
    use oodle1_entropy::testkit::{RangeEncoder, encode_symbol};

    use super::*;
    use crate::testkit::Op;

    impl Dictionary {
        /// Encodes one unit at output offset `index`, moving the model exactly
        /// as [`Dictionary::decompress_block`] will when decoding it.
        ///
        /// # Panics
        ///
        /// When the unit cannot be represented with this pass' parameters.
        pub fn encode_op(
            &mut self,
            enc: &mut RangeEncoder,
            op: Op,
            index: usize,
        ) -> Result<usize, Error> {
            let produced = match op {
                Op::Literal(byte) => {
                    self.encode_class(enc, 0)?;

                    let window = &mut self.decoded_windows[index % LITERAL_WINDOWS];
                    encode_symbol(window, enc, u16::from(byte), self.decoded_value_max)?;
                    1
                }
                Op::Match { length, distance } => {
                    let class = size_class(length)
                        .unwrap_or_else(|| panic!("no size class copies {length} bytes"));
                    let backref_range = self.backref_range() as usize;
                    assert!(
                        (1..=backref_range).contains(&distance),
                        "distance {distance} is outside [1, {backref_range}]"
                    );
                    self.encode_class(enc, class)?;

                    let d = distance - 1;
                    let (low, mid, high) = (d & 3, (d >> 2) & 0xFF, d >> 10);
                    let backref_range = backref_range as u32;

                    encode_symbol(
                        &mut self.lowbit_window,
                        enc,
                        low as u16,
                        self.lowbit_value_max,
                    )?;
                    encode_symbol(
                        &mut self.highbit_window,
                        enc,
                        high as u16,
                        backref_range / 1024 + 1,
                    )?;
                    encode_symbol(
                        &mut self.midbit_windows[high],
                        enc,
                        mid as u16,
                        (backref_range / 4 + 1).min(256),
                    )?;
                    length
                }
            };

            self.decoded_size += produced;
            Ok(produced)
        }

        pub(crate) fn encode_class(&mut self, enc: &mut RangeEncoder, class: u16) -> Result<(), Error> {
            let window = &mut self.size_windows[self.backref_size];
            encode_symbol(window, enc, class, SIZE_CLASSES)?;
            self.backref_size = usize::from(class);
            Ok(())
        }
    }
}
