//! Graph descriptions
//!
//! An ordered map from node key to node spec, validated as a DAG before it
//! reaches any engine. Ordered keys keep construction and iteration
//! deterministic for identical inputs.

use super::node::NodeSpec;
use crate::error::GraphError;
use std::collections::{BTreeMap, VecDeque};

/// A declarative audio-processing graph
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphDescription {
    nodes: BTreeMap<String, NodeSpec>,
}

impl GraphDescription {
    /// Create an empty description
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under a key, replacing any previous spec
    pub fn insert(&mut self, key: impl Into<String>, spec: NodeSpec) {
        self.nodes.insert(key.into(), spec);
    }

    /// Look up a node by key
    pub fn get(&self, key: &str) -> Option<&NodeSpec> {
        self.nodes.get(key)
    }

    /// Whether a node exists
    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &NodeSpec)> {
        self.nodes.iter()
    }

    /// Node keys in order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.nodes.keys()
    }

    /// Fail fast on structural defects: no nodes, dangling references,
    /// self-connections, or cycles
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.nodes.is_empty() {
            return Err(GraphError::Empty);
        }
        for (key, spec) in &self.nodes {
            for connection in &spec.outputs {
                if let Some(target) = connection.target_key() {
                    if target == key {
                        return Err(GraphError::SelfConnection { key: key.clone() });
                    }
                    if !self.nodes.contains_key(target) {
                        return Err(GraphError::UnknownNode {
                            from: key.clone(),
                            to: target.to_string(),
                        });
                    }
                }
            }
        }
        self.topological_order().map(|_| ())
    }

    /// Evaluation order: every node appears after all nodes that feed its
    /// input or parameters. Errors on cycles and dangling references.
    pub fn topological_order(&self) -> Result<Vec<String>, GraphError> {
        let keys: Vec<&String> = self.nodes.keys().collect();
        let index: BTreeMap<&str, usize> = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.as_str(), i))
            .collect();

        let mut in_degree = vec![0usize; keys.len()];
        let mut targets: Vec<Vec<usize>> = vec![Vec::new(); keys.len()];
        for (i, key) in keys.iter().enumerate() {
            for connection in &self.nodes[*key].outputs {
                if let Some(target) = connection.target_key() {
                    let j = *index.get(target).ok_or_else(|| GraphError::UnknownNode {
                        from: (*key).clone(),
                        to: target.to_string(),
                    })?;
                    targets[i].push(j);
                    in_degree[j] += 1;
                }
            }
        }

        let mut queue: VecDeque<usize> =
            (0..keys.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(keys.len());
        while let Some(i) = queue.pop_front() {
            order.push(i);
            for &j in &targets[i] {
                in_degree[j] -= 1;
                if in_degree[j] == 0 {
                    queue.push_back(j);
                }
            }
        }

        if order.len() != keys.len() {
            let stuck = (0..keys.len())
                .find(|&i| in_degree[i] > 0)
                .map(|i| keys[i].clone())
                .unwrap_or_default();
            return Err(GraphError::Cycle { key: stuck });
        }

        Ok(order.into_iter().map(|i| keys[i].clone()).collect())
    }
}
