// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Helpers for building small synthetic graphs, encoded exactly like graph files on disk.

use std::fs;
use std::path::Path;

use crate::{q28_4, Graph, NodeId, PointCh};

/// Origin of synthetic graphs, close to the center of the LV95 system.
pub const ORIGIN_E: f64 = 2_600_000.0;
pub const ORIGIN_N: f64 = 1_200_000.0;

#[derive(Debug, Clone)]
struct TestEdge {
    to: NodeId,
    length: f64,
    inverted: bool,
    samples: Vec<f32>,
    attributes: u16,
}

/// Encoded graph tables, in the order expected by [Graph::from_buffers].
pub struct Tables {
    pub nodes: Vec<u8>,
    pub edges: Vec<u8>,
    pub profile_ids: Vec<u8>,
    pub elevations: Vec<u8>,
    pub attributes: Vec<u8>,
}

#[derive(Debug, Default, Clone)]
pub struct TestGraphBuilder {
    nodes: Vec<(PointCh, Vec<TestEdge>)>,
    attributes: Vec<u64>,
}

impl TestGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node at the given offset (in meters) from [ORIGIN_E], [ORIGIN_N].
    pub fn node(&mut self, de: f64, dn: f64) -> NodeId {
        self.nodes
            .push((PointCh::new(ORIGIN_E + de, ORIGIN_N + dn), Vec::new()));
        (self.nodes.len() - 1) as NodeId
    }

    /// Adds an edge without elevation data, as long as the distance between its nodes.
    pub fn edge(&mut self, from: NodeId, to: NodeId) -> &mut Self {
        let length = self.point(from).distance_to(self.point(to));
        self.edge_with(from, to, length, Vec::new())
    }

    /// Adds an edge with an explicit length and raw elevation samples (possibly empty).
    pub fn edge_with(&mut self, from: NodeId, to: NodeId, length: f64, samples: Vec<f32>) -> &mut Self {
        self.push_edge(
            from,
            TestEdge {
                to,
                length,
                inverted: false,
                samples,
                attributes: 0,
            },
        )
    }

    /// Adds an inverted edge; `samples` are given in the direction of the underlying way.
    pub fn inverted_edge_with(
        &mut self,
        from: NodeId,
        to: NodeId,
        length: f64,
        samples: Vec<f32>,
    ) -> &mut Self {
        self.push_edge(
            from,
            TestEdge {
                to,
                length,
                inverted: true,
                samples,
                attributes: 0,
            },
        )
    }

    /// Adds an edge (without elevation data) referring to a new attribute set.
    pub fn edge_with_attributes(&mut self, from: NodeId, to: NodeId, attributes: u64) -> &mut Self {
        let length = self.point(from).distance_to(self.point(to));
        self.attributes.push(attributes);
        let index = (self.attributes.len() - 1) as u16;
        self.push_edge(
            from,
            TestEdge {
                to,
                length,
                inverted: false,
                samples: Vec::new(),
                attributes: index,
            },
        )
    }

    /// Adds edges in both directions between two nodes.
    pub fn road(&mut self, a: NodeId, b: NodeId) -> &mut Self {
        self.edge(a, b).edge(b, a)
    }

    fn point(&self, id: NodeId) -> PointCh {
        self.nodes[id as usize].0
    }

    fn push_edge(&mut self, from: NodeId, edge: TestEdge) -> &mut Self {
        if !edge.samples.is_empty() {
            let expected = (q28_4::to_f64(q28_4::from_f64(edge.length)) / 2.0).ceil() as usize + 1;
            assert_eq!(edge.samples.len(), expected, "wrong number of samples for edge");
        }
        self.nodes[from as usize].1.push(edge);
        self
    }

    pub fn tables(&self) -> Tables {
        let mut t = Tables {
            nodes: Vec::new(),
            edges: Vec::new(),
            profile_ids: Vec::new(),
            elevations: Vec::new(),
            attributes: Vec::new(),
        };

        let mut first_edge: u32 = 0;
        let mut pool_len: u32 = 0;
        for (point, edges) in &self.nodes {
            t.nodes.extend(q28_4::from_f64(point.e).to_be_bytes());
            t.nodes.extend(q28_4::from_f64(point.n).to_be_bytes());
            t.nodes.extend(((edges.len() as u32) << 28 | first_edge).to_be_bytes());
            first_edge += edges.len() as u32;

            for edge in edges {
                let target = if edge.inverted {
                    !(edge.to as i32)
                } else {
                    edge.to as i32
                };
                t.edges.extend(target.to_be_bytes());
                t.edges.extend((q28_4::from_f64(edge.length) as u16).to_be_bytes());
                t.edges.extend((q28_4::from_f64(gain(&edge.samples)) as u16).to_be_bytes());
                t.edges.extend(edge.attributes.to_be_bytes());

                if edge.samples.is_empty() {
                    t.profile_ids.extend(0u32.to_be_bytes());
                } else {
                    t.profile_ids.extend((1u32 << 30 | pool_len).to_be_bytes());
                    for &s in &edge.samples {
                        t.elevations.extend((q28_4::from_f64(s as f64) as u16).to_be_bytes());
                    }
                    pool_len += edge.samples.len() as u32;
                }
            }
        }

        for &a in &self.attributes {
            t.attributes.extend(a.to_be_bytes());
        }

        t
    }

    pub fn build(&self) -> Graph {
        let t = self.tables();
        Graph::from_buffers(t.nodes, t.edges, t.profile_ids, t.elevations, t.attributes)
            .expect("synthetic graph must be valid")
    }

    /// Writes uncompressed graph files into `dir`.
    pub fn write_to(&self, dir: &Path) {
        let t = self.tables();
        fs::write(dir.join("nodes.bin"), t.nodes).unwrap();
        fs::write(dir.join("edges.bin"), t.edges).unwrap();
        fs::write(dir.join("profile_ids.bin"), t.profile_ids).unwrap();
        fs::write(dir.join("elevations.bin"), t.elevations).unwrap();
        if !self.attributes.is_empty() {
            fs::write(dir.join("attributes.bin"), t.attributes).unwrap();
        }
    }
}

fn gain(samples: &[f32]) -> f64 {
    samples
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0) as f64)
        .sum()
}

/// Straight road 0-1-2-3 running east, 100 m between nodes, two-way,
/// plus a one-way 350 m shortcut from 0 to 3.
pub fn line_with_shortcut() -> Graph {
    let mut b = TestGraphBuilder::new();
    let n0 = b.node(0.0, 0.0);
    let n1 = b.node(100.0, 0.0);
    let n2 = b.node(200.0, 0.0);
    let n3 = b.node(300.0, 0.0);
    b.edge_with(n0, n3, 350.0, Vec::new());
    b.road(n0, n1).road(n1, n2).road(n2, n3);
    b.build()
}
