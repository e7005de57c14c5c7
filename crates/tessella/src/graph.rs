//! Generic undirected graph keyed by value equality.
//!
//! Independent of any tiling semantics; the edge-part matching model
//! layers its one-to-one constraint on top of this.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Errors from graph mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// A node cannot be adjacent to itself.
    SelfAdjacency,
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::SelfAdjacency => write!(f, "a node cannot be adjacent to itself"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Undirected graph over values of `T`.
///
/// Edges are symmetric: `add(a, b)` makes `b` adjacent to `a` and vice
/// versa. Nodes exist only by virtue of their edges; removing a node's
/// last edge drops it from enumeration.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph<T> {
    edges: HashMap<T, HashSet<T>>,
    edge_count: usize,
}

impl<T: Eq + Hash + Clone> AdjacencyGraph<T> {
    pub fn new() -> Self {
        Self { edges: HashMap::new(), edge_count: 0 }
    }

    /// Add the undirected edge `(a, b)`. Adding an existing edge is a
    /// no-op; a self-loop is an error.
    pub fn add(&mut self, a: T, b: T) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfAdjacency);
        }
        let fresh = self.edges.entry(a.clone()).or_default().insert(b.clone());
        self.edges.entry(b).or_default().insert(a);
        if fresh {
            self.edge_count += 1;
        }
        Ok(())
    }

    /// Remove the undirected edge `(a, b)` in both directions.
    /// Returns whether the edge existed.
    pub fn remove(&mut self, a: &T, b: &T) -> bool {
        let mut removed = false;
        if let Some(set) = self.edges.get_mut(a) {
            removed = set.remove(b);
            if set.is_empty() {
                self.edges.remove(a);
            }
        }
        if let Some(set) = self.edges.get_mut(b) {
            set.remove(a);
            if set.is_empty() {
                self.edges.remove(b);
            }
        }
        if removed {
            self.edge_count -= 1;
        }
        removed
    }

    /// Whether `a` and `b` are adjacent.
    pub fn contains(&self, a: &T, b: &T) -> bool {
        self.edges.get(a).is_some_and(|set| set.contains(b))
    }

    /// Neighbours of `a` (empty if `a` has no edges).
    pub fn adjacent(&self, a: &T) -> impl Iterator<Item = &T> {
        self.edges.get(a).into_iter().flatten()
    }

    /// Number of edges incident to `a`.
    pub fn degree(&self, a: &T) -> usize {
        self.edges.get(a).map_or(0, HashSet::len)
    }

    /// Nodes with at least one edge.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.keys()
    }

    /// Number of undirected edges.
    pub fn len(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }
}

impl<T: Eq + Hash + Clone> Default for AdjacencyGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}
