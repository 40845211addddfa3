// Copyright 2025 The Selas Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A generic labeled-transition graph with a walking cursor.

use std::collections::HashMap;
use std::hash::Hash;

/// One node of a [`TransitionGraph`]: its payload plus the labeled edges
/// leaving it.
#[derive(Debug, Clone)]
struct Node<N, E> {
    data: N,
    edges: HashMap<E, usize>,
}

impl<N: Default, E> Node<N, E> {
    fn new() -> Self {
        Self {
            data: N::default(),
            edges: HashMap::new(),
        }
    }
}

/// A rooted graph whose edges carry labels, walked by an internal cursor.
///
/// Starting from a single root node, [`walk`](Self::walk) follows the edge
/// with the given label if one exists, or creates a fresh node and edge if it
/// does not. Walking the same label sequence from the start therefore always
/// reaches the same node, which makes the graph a natural memoization
/// structure for state reached through an ordered sequence of keys. The
/// typical use is caching compiled shader permutations keyed by their define
/// strings, where each node's payload holds the program version for the
/// defines walked so far.
///
/// # Type Parameters
///
/// * `N`: The node payload. Must implement `Default`, used when `walk`
///   creates a node.
/// * `E`: The edge label. Must be hashable and equatable.
///
/// # Examples
///
/// ```
/// use selas_core::graph::TransitionGraph;
///
/// let mut graph: TransitionGraph<Option<u32>, &str> = TransitionGraph::new();
/// assert!(!graph.walk("_FOO=1")); // First walk creates the node.
/// graph.set_current_node_data(Some(7));
///
/// graph.goto_start();
/// assert!(graph.walk("_FOO=1")); // Second walk finds it again.
/// assert_eq!(*graph.current_node(), Some(7));
/// ```
#[derive(Debug, Clone)]
pub struct TransitionGraph<N, E> {
    nodes: Vec<Node<N, E>>,
    cursor: usize,
}

impl<N: Default, E: Eq + Hash> TransitionGraph<N, E> {
    /// Creates a graph containing only the start node, with default data.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            cursor: 0,
        }
    }

    /// Moves the cursor back to the start node.
    pub fn goto_start(&mut self) {
        self.cursor = 0;
    }

    /// Returns `true` if the current node has an outgoing edge with `label`.
    pub fn has_edge(&self, label: &E) -> bool {
        self.nodes[self.cursor].edges.contains_key(label)
    }

    /// Follows the edge with `label` from the current node, creating it if
    /// needed.
    ///
    /// # Returns
    ///
    /// `true` if the edge already existed, `false` if a fresh node (with
    /// default data) was created and linked.
    pub fn walk(&mut self, label: E) -> bool {
        let existing = self.nodes[self.cursor].edges.get(&label).copied();
        match existing {
            Some(next) => {
                self.cursor = next;
                true
            }
            None => {
                let next = self.nodes.len();
                self.nodes.push(Node::new());
                self.nodes[self.cursor].edges.insert(label, next);
                self.cursor = next;
                false
            }
        }
    }

    /// Returns a reference to the current node's data.
    pub fn current_node(&self) -> &N {
        &self.nodes[self.cursor].data
    }

    /// Returns a mutable reference to the current node's data.
    pub fn current_node_mut(&mut self) -> &mut N {
        &mut self.nodes[self.cursor].data
    }

    /// Replaces the current node's data.
    pub fn set_current_node_data(&mut self, data: N) {
        self.nodes[self.cursor].data = data;
    }

    /// Returns the total number of nodes, including the start node.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<N: Default, E: Eq + Hash> Default for TransitionGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}
