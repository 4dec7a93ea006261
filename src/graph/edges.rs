// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::files::{read_u16, read_u32, Buffer};
use crate::{bits, q28_4, EdgeId, NodeId};

/// Size of a single edge record, in bytes.
pub(crate) const EDGE_BYTES: usize = 10;

const OFFSET_DIRECTION_AND_TARGET: usize = 0;
const OFFSET_LENGTH: usize = OFFSET_DIRECTION_AND_TARGET + 4;
const OFFSET_ELEVATION_GAIN: usize = OFFSET_LENGTH + 2;
const OFFSET_ATTRIBUTES: usize = OFFSET_ELEVATION_GAIN + 2;

/// Distance between two consecutive elevation samples of an edge, in meters.
const SAMPLE_SPACING: f64 = 2.0;

/// Storage scheme of an edge's elevation samples in the elevation pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileType {
    /// The edge has no elevation data.
    None,

    /// Every sample is stored as a full unsigned 12.4 value.
    Raw,

    /// The first sample is stored in full, followed by signed Q4.4 deltas, 2 per word.
    Compressed44,

    /// The first sample is stored in full, followed by signed Q0.4 deltas, 4 per word.
    Compressed04,
}

impl ProfileType {
    fn from_bits(b: u32) -> Self {
        match b {
            0 => ProfileType::None,
            1 => ProfileType::Raw,
            2 => ProfileType::Compressed44,
            _ => ProfileType::Compressed04,
        }
    }

    /// Width of a single delta, in bits.
    fn delta_bits(self) -> u32 {
        match self {
            ProfileType::None | ProfileType::Raw => 16,
            ProfileType::Compressed44 => 8,
            ProfileType::Compressed04 => 4,
        }
    }

    /// Number of 16-bit pool words used by a profile with `samples` samples.
    pub(crate) fn words_needed(self, samples: usize) -> usize {
        match self {
            ProfileType::None => 0,
            ProfileType::Raw => samples,
            ProfileType::Compressed44 | ProfileType::Compressed04 => {
                let per_word = (16 / self.delta_bits()) as usize;
                1 + (samples.saturating_sub(1)).div_ceil(per_word)
            }
        }
    }
}

/// Edge table, with the associated profile id table and elevation pool.
///
/// An edge record is 10 bytes: the target node id (one's-complemented when the
/// edge runs against its OSM way), length and elevation gain (both unsigned 12.4)
/// and the attribute set index. Each profile id packs the [ProfileType] in its 2 high bits
/// with the signed index of the first sample in the remaining 30 bits.
#[derive(Debug)]
pub(crate) struct GraphEdges {
    pub(crate) edges: Buffer,
    pub(crate) profile_ids: Buffer,
    pub(crate) elevations: Buffer,
}

impl GraphEdges {
    #[inline]
    fn offset(edge_id: EdgeId, field: usize) -> usize {
        edge_id as usize * EDGE_BYTES + field
    }

    pub fn count(&self) -> usize {
        self.edges.len() / EDGE_BYTES
    }

    fn direction_and_target(&self, edge_id: EdgeId) -> i32 {
        read_u32(
            &self.edges,
            Self::offset(edge_id, OFFSET_DIRECTION_AND_TARGET),
        ) as i32
    }

    pub fn is_inverted(&self, edge_id: EdgeId) -> bool {
        self.direction_and_target(edge_id) < 0
    }

    pub fn target_node_id(&self, edge_id: EdgeId) -> NodeId {
        let raw = self.direction_and_target(edge_id);
        (if raw < 0 { !raw } else { raw }) as NodeId
    }

    pub fn length(&self, edge_id: EdgeId) -> f64 {
        q28_4::to_f64(read_u16(&self.edges, Self::offset(edge_id, OFFSET_LENGTH)) as i32)
    }

    pub fn elevation_gain(&self, edge_id: EdgeId) -> f64 {
        q28_4::to_f64(read_u16(&self.edges, Self::offset(edge_id, OFFSET_ELEVATION_GAIN)) as i32)
    }

    pub fn attributes_index(&self, edge_id: EdgeId) -> u16 {
        read_u16(&self.edges, Self::offset(edge_id, OFFSET_ATTRIBUTES))
    }

    fn profile_id(&self, edge_id: EdgeId) -> u32 {
        read_u32(&self.profile_ids, edge_id as usize * 4)
    }

    pub fn profile_type(&self, edge_id: EdgeId) -> ProfileType {
        ProfileType::from_bits(bits::extract_unsigned(self.profile_id(edge_id), 30, 2))
    }

    /// Index of the first elevation sample of the edge in the elevation pool.
    /// Negative only in malformed graphs, which are rejected at load time.
    pub fn first_sample_index(&self, edge_id: EdgeId) -> i32 {
        bits::extract_signed(self.profile_id(edge_id), 0, 30)
    }

    pub fn has_profile(&self, edge_id: EdgeId) -> bool {
        self.profile_type(edge_id) != ProfileType::None
    }

    /// Number of elevation samples of an edge, spaced every 2 meters and covering both ends.
    pub fn sample_count(&self, edge_id: EdgeId) -> usize {
        (self.length(edge_id) / SAMPLE_SPACING).ceil() as usize + 1
    }

    #[inline]
    fn pool_word(&self, index: usize) -> u16 {
        read_u16(&self.elevations, index * 2)
    }

    /// Decodes the elevation samples of an edge, in the direction of the edge.
    ///
    /// Returns an empty vector for edges without a profile.
    pub fn profile_samples(&self, edge_id: EdgeId) -> Vec<f32> {
        let profile_type = self.profile_type(edge_id);
        if profile_type == ProfileType::None {
            return Vec::new();
        }

        let count = self.sample_count(edge_id);
        let first = self.first_sample_index(edge_id) as usize;
        let mut samples = Vec::with_capacity(count);

        match profile_type {
            ProfileType::None => unreachable!(),

            ProfileType::Raw => {
                samples.extend((0..count).map(|i| q28_4::to_f32(self.pool_word(first + i) as i32)));
            }

            ProfileType::Compressed44 | ProfileType::Compressed04 => {
                let delta_bits = profile_type.delta_bits();
                let per_word = 16 / delta_bits;

                // Deltas are accumulated in fixed-point, so that decoding is lossless
                let mut current = self.pool_word(first) as i32;
                samples.push(q28_4::to_f32(current));

                let mut word_index = first + 1;
                while samples.len() < count {
                    let word = self.pool_word(word_index) as u32;
                    for slot in (0..per_word).rev() {
                        if samples.len() == count {
                            break;
                        }
                        current += bits::extract_signed(word, slot * delta_bits, delta_bits);
                        samples.push(q28_4::to_f32(current));
                    }
                    word_index += 1;
                }
            }
        }

        if self.is_inverted(edge_id) {
            samples.reverse();
        }
        samples
    }
}
