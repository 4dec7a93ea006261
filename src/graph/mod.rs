// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Read-only road network graph, decoded on the fly from its compact binary representation.

mod edges;
mod error;
mod files;
mod nodes;

use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

pub use edges::ProfileType;
pub use error::LoadError;
pub use files::{Compression, LoadOptions};

use edges::{GraphEdges, EDGE_BYTES};
use files::{read_u64, Buffer};
use nodes::{GraphNodes, NODE_BYTES};

use crate::{EdgeId, ElevationFunction, KDTree, NodeId, PointCh};

/// Set of OSM attributes attached to an edge, as a 64-bit bitset.
///
/// Meaning of every bit is up to the [CostFunction](crate::CostFunction) which uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttributeSet(pub u64);

impl AttributeSet {
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Checks whether the attribute with the given index (`0..64`) is set.
    pub fn contains(self, index: u32) -> bool {
        assert!(index < 64, "attribute index out of range: {index}");
        self.0 & (1 << index) != 0
    }
}

/// Represents a road network as a set of nodes and directed edges between them.
///
/// Nodes and edges are identified by dense, zero-based ids. All data is loaded once
/// and never modified, so a Graph may be freely shared between threads.
#[derive(Debug)]
pub struct Graph {
    nodes: GraphNodes,
    edges: GraphEdges,
    attributes: Vec<AttributeSet>,
    kd_tree: OnceLock<Option<KDTree>>,
    heuristic_scale: f64,
}

impl Graph {
    /// Loads a graph from a directory with `nodes`, `edges`, `profile_ids`, `elevations`
    /// and (optionally) `attributes` files, guessing their compression.
    pub fn load_from<P: AsRef<Path>>(dir: P) -> Result<Self, LoadError> {
        Self::load_from_with(dir, &LoadOptions::default())
    }

    /// Loads a graph from a directory as per the provided [LoadOptions].
    pub fn load_from_with<P: AsRef<Path>>(dir: P, options: &LoadOptions) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let c = options.compression;

        let nodes = files::open(dir, "nodes", c)?;
        let edges = files::open(dir, "edges", c)?;
        let profile_ids = files::open(dir, "profile_ids", c)?;
        let elevations = files::open(dir, "elevations", c)?;
        let attributes = files::open_optional(dir, "attributes", c)?;
        if attributes.is_none() {
            log::debug!("{}: no attributes file, edges have no attribute sets", dir.display());
        }

        let g = Self::from_parts(
            nodes,
            edges,
            profile_ids,
            elevations,
            attributes.unwrap_or_else(|| Buffer::from(Vec::new())),
        )?;

        log::info!(
            "{}: loaded {} nodes, {} edges and {} attribute sets",
            dir.display(),
            g.node_count(),
            g.edge_count(),
            g.attributes.len(),
        );
        Ok(g)
    }

    /// Creates a graph from in-memory, big-endian encoded tables,
    /// laid out exactly like the files read by [Graph::load_from].
    pub fn from_buffers(
        nodes: Vec<u8>,
        edges: Vec<u8>,
        profile_ids: Vec<u8>,
        elevations: Vec<u8>,
        attributes: Vec<u8>,
    ) -> Result<Self, LoadError> {
        Self::from_parts(
            nodes.into(),
            edges.into(),
            profile_ids.into(),
            elevations.into(),
            attributes.into(),
        )
    }

    fn from_parts(
        nodes: Buffer,
        edges: Buffer,
        profile_ids: Buffer,
        elevations: Buffer,
        attributes: Buffer,
    ) -> Result<Self, LoadError> {
        check_stride("nodes", nodes.len(), NODE_BYTES)?;
        check_stride("edges", edges.len(), EDGE_BYTES)?;
        check_stride("elevations", elevations.len(), 2)?;
        check_stride("attributes", attributes.len(), 8)?;

        let edge_count = edges.len() / EDGE_BYTES;
        if profile_ids.len() != edge_count * 4 {
            return Err(LoadError::malformed(
                "profile_ids",
                format!(
                    "expected {} profile ids (one per edge), got {} bytes",
                    edge_count,
                    profile_ids.len()
                ),
            ));
        }

        let attributes = (0..attributes.len() / 8)
            .map(|i| AttributeSet(read_u64(&attributes, i * 8)))
            .collect();

        let mut g = Self {
            nodes: GraphNodes(nodes),
            edges: GraphEdges {
                edges,
                profile_ids,
                elevations,
            },
            attributes,
            kd_tree: OnceLock::new(),
            heuristic_scale: 1.0,
        };
        g.validate()?;
        g.heuristic_scale = g.min_length_to_distance_ratio();
        Ok(g)
    }

    /// Returns the smallest ratio of an edge's stored length to the straight-line distance
    /// between its endpoints, capped at 1.0.
    fn min_length_to_distance_ratio(&self) -> f64 {
        let mut ratio: f64 = 1.0;
        for node_id in 0..self.node_count() as NodeId {
            let from = self.node_point(node_id);
            for edge_id in self.node_out_edges(node_id) {
                let distance = from.distance_to(self.node_point(self.edge_target_node_id(edge_id)));
                if distance > 0.0 {
                    ratio = ratio.min(self.edge_length(edge_id) / distance);
                }
            }
        }
        ratio
    }

    /// Checks that every id and index stored in the tables points inside the graph,
    /// so that no accessor can ever read out of bounds.
    fn validate(&self) -> Result<(), LoadError> {
        let node_count = self.nodes.count();
        let edge_count = self.edges.count();
        let pool_len = self.edges.elevations.len() / 2;

        if node_count > i32::MAX as usize {
            return Err(LoadError::malformed("nodes", "too many nodes"));
        }

        for node_id in 0..node_count as NodeId {
            let end = self.nodes.first_edge_id(node_id) as usize
                + self.nodes.out_degree(node_id) as usize;
            if end > edge_count {
                return Err(LoadError::malformed(
                    "nodes",
                    format!("node {node_id} refers to edges past the end of the edge table ({end} > {edge_count})"),
                ));
            }
        }

        for edge_id in 0..edge_count as EdgeId {
            let target = self.edges.target_node_id(edge_id) as usize;
            if target >= node_count {
                return Err(LoadError::malformed(
                    "edges",
                    format!("edge {edge_id} targets non-existent node {target}"),
                ));
            }

            let index = self.edges.attributes_index(edge_id) as usize;
            if !self.attributes.is_empty() && index >= self.attributes.len() {
                return Err(LoadError::malformed(
                    "edges",
                    format!("edge {edge_id} refers to non-existent attribute set {index}"),
                ));
            }

            let profile_type = self.edges.profile_type(edge_id);
            if profile_type != ProfileType::None {
                let first = self.edges.first_sample_index(edge_id);
                let words = profile_type.words_needed(self.edges.sample_count(edge_id));
                if first < 0 || first as usize + words > pool_len {
                    return Err(LoadError::malformed(
                        "profile_ids",
                        format!(
                            "profile of edge {edge_id} ({first}..+{words}) is outside of the elevation pool ({pool_len} samples)"
                        ),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Returns the factor by which the straight-line distance between two nodes must be
    /// scaled to never exceed the total length of any path between them.
    ///
    /// Equals 1.0 unless some edge is stored shorter than the distance between its endpoints.
    pub fn heuristic_scale(&self) -> f64 {
        self.heuristic_scale
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.count()
    }

    /// Returns the position of a node.
    pub fn node_point(&self, node_id: NodeId) -> PointCh {
        PointCh::new(self.nodes.node_e(node_id), self.nodes.node_n(node_id))
    }

    /// Returns the number of edges leaving a node.
    pub fn node_out_degree(&self, node_id: NodeId) -> u32 {
        self.nodes.out_degree(node_id)
    }

    /// Returns the id of the `edge_index`-th edge leaving a node.
    pub fn node_out_edge_id(&self, node_id: NodeId, edge_index: u32) -> EdgeId {
        self.nodes.edge_id(node_id, edge_index)
    }

    /// Returns the ids of all edges leaving a node.
    pub fn node_out_edges(&self, node_id: NodeId) -> Range<EdgeId> {
        let first = self.nodes.first_edge_id(node_id);
        first..first + self.nodes.out_degree(node_id)
    }

    /// Finds the node closest to `point`, provided that it's no farther than `search_distance` meters.
    ///
    /// The first call builds a [KDTree] over all nodes.
    pub fn node_closest_to(&self, point: PointCh, search_distance: f64) -> Option<NodeId> {
        let tree = self.kd_tree.get_or_init(|| {
            log::debug!("building k-d tree over {} nodes", self.node_count());
            KDTree::from_iter((0..self.node_count() as NodeId).map(|id| (id, self.node_point(id))))
        });

        tree.as_ref()
            .map(|t| t.find_nearest_node(point))
            .filter(|&(_, squared_distance)| squared_distance <= search_distance * search_distance)
            .map(|(id, _)| id)
    }

    pub fn edge_target_node_id(&self, edge_id: EdgeId) -> NodeId {
        self.edges.target_node_id(edge_id)
    }

    /// Checks whether the edge runs against the OSM way it was derived from.
    pub fn edge_is_inverted(&self, edge_id: EdgeId) -> bool {
        self.edges.is_inverted(edge_id)
    }

    /// Returns the length of an edge, in meters.
    pub fn edge_length(&self, edge_id: EdgeId) -> f64 {
        self.edges.length(edge_id)
    }

    /// Returns the total ascent along an edge, in meters.
    pub fn edge_elevation_gain(&self, edge_id: EdgeId) -> f64 {
        self.edges.elevation_gain(edge_id)
    }

    pub fn edge_has_profile(&self, edge_id: EdgeId) -> bool {
        self.edges.has_profile(edge_id)
    }

    pub fn edge_profile_type(&self, edge_id: EdgeId) -> ProfileType {
        self.edges.profile_type(edge_id)
    }

    /// Returns the elevation samples of an edge, every 2 meters from its start.
    /// Empty if the edge has no elevation data.
    pub fn edge_profile_samples(&self, edge_id: EdgeId) -> Vec<f32> {
        self.edges.profile_samples(edge_id)
    }

    /// Returns the elevation along an edge as a function of the position on the edge.
    /// Edges without elevation data are [flat](ElevationFunction::FLAT).
    pub fn edge_profile(&self, edge_id: EdgeId) -> ElevationFunction {
        ElevationFunction::from_samples(self.edge_profile_samples(edge_id), self.edge_length(edge_id))
    }

    /// Returns the index of the attribute set of an edge.
    pub fn edge_attributes_index(&self, edge_id: EdgeId) -> u16 {
        self.edges.attributes_index(edge_id)
    }

    /// Returns the attribute set of an edge, or `None` if the graph was loaded without attributes.
    pub fn edge_attributes(&self, edge_id: EdgeId) -> Option<AttributeSet> {
        self.attributes
            .get(self.edge_attributes_index(edge_id) as usize)
            .copied()
    }
}

fn check_stride(file: &'static str, len: usize, stride: usize) -> Result<(), LoadError> {
    if len % stride == 0 {
        Ok(())
    } else {
        Err(LoadError::malformed(
            file,
            format!("size ({len} bytes) is not a multiple of the record size ({stride} bytes)"),
        ))
    }
}
