// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::files::{read_u32, Buffer};
use crate::{bits, q28_4, EdgeId, NodeId};

const OFFSET_E: usize = 0;
const OFFSET_N: usize = OFFSET_E + 1;
const OFFSET_OUT_EDGES: usize = OFFSET_N + 1;
const NODE_INTS: usize = OFFSET_OUT_EDGES + 1;

/// Size of a single node record, in bytes.
pub(crate) const NODE_BYTES: usize = NODE_INTS * 4;

/// Node table: three big-endian words per node - E and N coordinates (28.4 fixed-point)
/// and the out-degree (4 high bits) packed with the id of the first outgoing edge (28 low bits).
#[derive(Debug)]
pub(crate) struct GraphNodes(pub(crate) Buffer);

impl GraphNodes {
    #[inline]
    fn word(&self, node_id: NodeId, offset: usize) -> u32 {
        read_u32(&self.0, (node_id as usize * NODE_INTS + offset) * 4)
    }

    pub fn count(&self) -> usize {
        self.0.len() / NODE_BYTES
    }

    pub fn node_e(&self, node_id: NodeId) -> f64 {
        q28_4::to_f64(self.word(node_id, OFFSET_E) as i32)
    }

    pub fn node_n(&self, node_id: NodeId) -> f64 {
        q28_4::to_f64(self.word(node_id, OFFSET_N) as i32)
    }

    pub fn out_degree(&self, node_id: NodeId) -> u32 {
        bits::extract_unsigned(self.word(node_id, OFFSET_OUT_EDGES), 28, 4)
    }

    pub fn first_edge_id(&self, node_id: NodeId) -> EdgeId {
        bits::extract_unsigned(self.word(node_id, OFFSET_OUT_EDGES), 0, 28)
    }

    /// Returns the id of the `edge_index`-th edge leaving the node.
    pub fn edge_id(&self, node_id: NodeId, edge_index: u32) -> EdgeId {
        debug_assert!(edge_index < self.out_degree(node_id));
        self.first_edge_id(node_id) + edge_index
    }
}
