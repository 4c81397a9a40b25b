//! Median-split bounding-volume hierarchy.

use geo_common::{Bounded, Bounds2d};
use tracing::trace;

#[derive(Debug, Clone, Copy)]
enum NodeKind {
    /// Index into `Bvh::elements`.
    Leaf(usize),
    Internal { left: usize, right: usize },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    bounds: Bounds2d,
    kind: NodeKind,
}

/// Build-time record for one element.
#[derive(Clone, Copy)]
struct Entry {
    index: usize,
    bounds: Bounds2d,
}

impl Entry {
    fn center(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => (self.bounds.min_x + self.bounds.max_x) * 0.5,
            Axis::Z => (self.bounds.min_z + self.bounds.max_z) * 0.5,
        }
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Z,
}

/// An immutable bounding-volume hierarchy.
///
/// Nodes are stored flat with the root at index 0. Each leaf holds exactly
/// one element and every internal node's bounds is the exact union of its
/// two children's bounds, so pruning on node bounds never drops a match.
#[derive(Debug, Clone)]
pub struct Bvh<T> {
    elements: Vec<T>,
    nodes: Vec<Node>,
}

impl<T: Bounded> Bvh<T> {
    /// Build the hierarchy, splitting each node at the median element
    /// centre along the axis of greatest extent.
    pub fn build(elements: Vec<T>) -> Self {
        let mut entries: Vec<Entry> = elements
            .iter()
            .enumerate()
            .map(|(index, e)| Entry {
                index,
                bounds: e.bounds(),
            })
            .collect();

        let mut nodes = Vec::with_capacity(entries.len().saturating_mul(2));
        if !entries.is_empty() {
            build_node(&mut nodes, &mut entries);
        }

        trace!(
            elements = elements.len(),
            nodes = nodes.len(),
            "Built BVH"
        );

        Self { elements, nodes }
    }

    /// Visit every element whose bounds intersect `query`, edges included.
    ///
    /// Elements are visited depth-first, each at most once. An empty index
    /// visits nothing.
    pub fn for_each_intersecting<F>(&self, query: &Bounds2d, mut visit: F)
    where
        F: FnMut(&T),
    {
        if self.nodes.is_empty() {
            return;
        }
        self.visit_node(0, query, &mut visit);
    }

    fn visit_node<F>(&self, index: usize, query: &Bounds2d, visit: &mut F)
    where
        F: FnMut(&T),
    {
        let node = &self.nodes[index];
        if !node.bounds.intersects(query) {
            return;
        }
        match node.kind {
            NodeKind::Leaf(element) => visit(&self.elements[element]),
            NodeKind::Internal { left, right } => {
                self.visit_node(left, query, visit);
                self.visit_node(right, query, visit);
            }
        }
    }

    /// Collect references to every element intersecting `query`.
    pub fn query(&self, query: &Bounds2d) -> Vec<&T> {
        let mut out = Vec::new();
        if let Some(root) = self.nodes.first() {
            if root.bounds.intersects(query) {
                self.collect_node(0, query, &mut out);
            }
        }
        out
    }

    fn collect_node<'a>(&'a self, index: usize, query: &Bounds2d, out: &mut Vec<&'a T>) {
        match self.nodes[index].kind {
            NodeKind::Leaf(element) => out.push(&self.elements[element]),
            NodeKind::Internal { left, right } => {
                for child in [left, right] {
                    if self.nodes[child].bounds.intersects(query) {
                        self.collect_node(child, query, out);
                    }
                }
            }
        }
    }
}

impl<T> Bvh<T> {
    /// Aggregate bounds of every element, or `None` when empty.
    pub fn bounds(&self) -> Option<Bounds2d> {
        self.nodes.first().map(|root| root.bounds)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<T: Bounded> FromIterator<T> for Bvh<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::build(iter.into_iter().collect())
    }
}

impl<T: Bounded> Default for Bvh<T> {
    fn default() -> Self {
        Self::build(Vec::new())
    }
}

impl<'a, T> IntoIterator for &'a Bvh<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Append the subtree for `entries` (non-empty) and return its node index.
fn build_node(nodes: &mut Vec<Node>, entries: &mut [Entry]) -> usize {
    if let [entry] = entries {
        nodes.push(Node {
            bounds: entry.bounds,
            kind: NodeKind::Leaf(entry.index),
        });
        return nodes.len() - 1;
    }

    let extent = entries[1..]
        .iter()
        .fold(entries[0].bounds, |acc, e| acc.union(&e.bounds));
    let axis = if extent.width() >= extent.height() {
        Axis::X
    } else {
        Axis::Z
    };

    let mid = entries.len() / 2;
    entries.select_nth_unstable_by(mid, |a, b| a.center(axis).total_cmp(&b.center(axis)));

    // Reserve the slot so the parent precedes its children.
    let index = nodes.len();
    nodes.push(Node {
        bounds: extent,
        kind: NodeKind::Leaf(usize::MAX),
    });

    let (lo, hi) = entries.split_at_mut(mid);
    let left = build_node(nodes, lo);
    let right = build_node(nodes, hi);

    nodes[index] = Node {
        bounds: nodes[left].bounds.union(&nodes[right].bounds),
        kind: NodeKind::Internal { left, right },
    };
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes(n: usize) -> Vec<Bounds2d> {
        (0..n)
            .map(|i| {
                let x = (i * 7 % 31) as f64;
                let z = (i * 13 % 17) as f64;
                Bounds2d::new(x, x + 1.5, z, z + (i % 3) as f64)
            })
            .collect()
    }

    fn check_tight(bvh: &Bvh<Bounds2d>, index: usize) -> Bounds2d {
        let node = bvh.nodes[index];
        match node.kind {
            NodeKind::Leaf(element) => {
                assert_eq!(node.bounds, bvh.elements[element]);
            }
            NodeKind::Internal { left, right } => {
                let union = check_tight(bvh, left).union(&check_tight(bvh, right));
                assert_eq!(node.bounds, union);
            }
        }
        node.bounds
    }

    #[test]
    fn test_node_bounds_are_exact_unions() {
        let bvh = Bvh::build(boxes(97));
        let root = check_tight(&bvh, 0);
        assert_eq!(Some(root), Bounds2d::enclosing(bvh.iter()));
    }

    #[test]
    fn test_node_count() {
        assert_eq!(Bvh::build(boxes(0)).node_count(), 0);
        assert_eq!(Bvh::build(boxes(1)).node_count(), 1);
        // A binary tree with one element per leaf
        assert_eq!(Bvh::build(boxes(10)).node_count(), 19);
    }

    #[test]
    fn test_every_element_reachable_once() {
        let bvh = Bvh::build(boxes(50));
        let mut leaves: Vec<usize> = bvh
            .nodes
            .iter()
            .filter_map(|n| match n.kind {
                NodeKind::Leaf(i) => Some(i),
                NodeKind::Internal { .. } => None,
            })
            .collect();
        leaves.sort_unstable();
        assert_eq!(leaves, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty() {
        let bvh: Bvh<Bounds2d> = Bvh::default();
        assert!(bvh.is_empty());
        assert!(bvh.bounds().is_none());
        let mut visited = 0;
        bvh.for_each_intersecting(&Bounds2d::new(-1e9, 1e9, -1e9, 1e9), |_| visited += 1);
        assert_eq!(visited, 0);
        assert!(bvh.query(&Bounds2d::point(0.0, 0.0)).is_empty());
    }
}
