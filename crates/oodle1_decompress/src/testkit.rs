//! Reference compressor for tests and benchmarks.
//!
//! It produces payloads that [`crate::decompress`] accepts, built by driving
//! the same dictionary model through [`oodle1_entropy::testkit`]. Nothing here
//! aims for a good ratio; [`plan`] is a small greedy matcher.

use std::collections::HashMap;

use oodle1_entropy::testkit::RangeEncoder;

use crate::{
    LONG_MATCH_LENGTHS, MAX_MATCH_LENGTH, PARAMETERS_SIZE, PASS_COUNT, Parameters,
    dictionary::Dictionary,
};

/// Candidate positions examined per match search.
const SEARCH_DEPTH: usize = 32;

/// Longest copy a short size class encodes.
const SHORT_MATCH_MAX: usize = 61;

/// One decoded unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Literal(u8),
    Match { length: usize, distance: usize },
}

impl Op {
    /// Number of output bytes the unit produces.
    pub fn len(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Match { length, .. } => *length,
        }
    }

    fn expand(&self, out: &mut Vec<u8>) {
        match *self {
            Self::Literal(byte) => out.push(byte),
            Self::Match { length, distance } => {
                for _ in 0..length {
                    out.push(out[out.len() - distance]);
                }
            }
        }
    }
}

impl Parameters {
    pub fn new(
        decoded_value_max: u16,
        backref_value_max: u32,
        decoded_count: u16,
        highbit_count: u16,
        sizes_count: [u8; 4],
    ) -> Self {
        Self {
            decoded_value_max,
            backref_value_max,
            decoded_count,
            highbit_count,
            sizes_count,
        }
    }

    /// Serialises the block the way [`Parameters::read`] expects it.
    pub fn to_bytes(&self) -> [u8; PARAMETERS_SIZE] {
        let fields = (u64::from(self.decoded_value_max) << 55)
            | (u64::from(self.backref_value_max) << 32)
            | (u64::from(self.decoded_count) << 23)
            | u64::from(self.highbit_count);

        let mut out = [0; PARAMETERS_SIZE];
        out[..8].copy_from_slice(&fields.to_be_bytes());
        out[8..].copy_from_slice(&self.sizes_count);
        out
    }
}

/// A compressed payload along with the arguments needed to decode it.
#[derive(Debug, Clone)]
pub struct Payload {
    pub data: Vec<u8>,
    pub step1: u32,
    pub step2: u32,
    pub size: u32,
    pub expected: Vec<u8>,
}

/// Compresses one list of units per pass.
///
/// # Panics
///
/// When a unit cannot be represented with its pass' parameters, see
/// [`Dictionary::encode_op`].
pub fn compress(params: [Parameters; PASS_COUNT], passes: [Vec<Op>; PASS_COUNT]) -> Payload {
    let mut enc = RangeEncoder::new();
    let mut expected = Vec::new();
    let mut stops = [0u32; PASS_COUNT];

    for (pass, (params, ops)) in params.iter().zip(&passes).enumerate() {
        if !ops.is_empty() {
            let start = expected.len();
            let mut dict = Dictionary::new(params);
            for op in ops {
                dict.encode_op(&mut enc, *op, expected.len())
                    .unwrap_or_else(|err| panic!("pass {pass}: cannot encode {op:?}: {err}"));
                op.expand(&mut expected);
            }
            tracing::trace!(pass, start, end = expected.len(), "encoded pass");
        }
        stops[pass] = expected.len() as u32;
    }

    let mut data = Vec::with_capacity(PASS_COUNT * PARAMETERS_SIZE);
    for params in &params {
        data.extend_from_slice(&params.to_bytes());
    }
    data.extend(enc.finish());

    Payload {
        data,
        step1: stops[0],
        step2: stops[1],
        size: stops[2],
        expected,
    }
}

/// Splits `data` into units a single pass can encode, with distances no
/// larger than `backref_value_max`.
pub fn plan(data: &[u8], backref_value_max: u32) -> Vec<Op> {
    let mut ops = Vec::new();
    let mut seen: HashMap<[u8; 2], Vec<usize>> = HashMap::new();

    let mut pos = 0;
    while pos < data.len() {
        let reach = pos.min(backref_value_max as usize);
        let mut best = (0, 0);

        if let Some(candidates) = data.get(pos..pos + 2).and_then(|key| seen.get(key)) {
            for &cand in candidates.iter().rev().take(SEARCH_DEPTH) {
                let distance = pos - cand;
                if distance > reach {
                    break;
                }

                let length = data[pos..]
                    .iter()
                    .take(MAX_MATCH_LENGTH)
                    .enumerate()
                    .take_while(|&(k, &byte)| byte == data[pos + k - distance])
                    .count();
                if length > best.0 {
                    best = (length, distance);
                }
            }
        }

        let (length, distance) = (encodable(best.0), best.1);
        let op = if length == 0 {
            Op::Literal(data[pos])
        } else {
            Op::Match { length, distance }
        };

        for at in pos..pos + op.len() {
            if let Some(key) = data.get(at..at + 2) {
                seen.entry([key[0], key[1]]).or_default().push(at);
            }
        }
        pos += op.len();
        ops.push(op);
    }

    ops
}

/// Longest copy no longer than `length` that a size class can express.
fn encodable(length: usize) -> usize {
    if let Some(&long) = LONG_MATCH_LENGTHS.iter().rev().find(|&&long| long <= length) {
        long
    } else if length >= 2 {
        length.min(SHORT_MATCH_MAX)
    } else {
        0
    }
}
