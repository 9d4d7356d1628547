//! Bounding volume hierarchy over partition leaves
//!
//! Binary tree split on the longest axis at the median. Leaves carry an
//! index into the partition's leaf table.

use glam::Vec3;
use void_math::{Aabb, Frustum, FrustumTest, Rect};

#[derive(Clone, Debug)]
struct BvhNode {
    bounds: Aabb,
    /// Leaf index (only for leaf nodes)
    leaf: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
}

/// Bounding volume hierarchy for partition queries
#[derive(Clone, Debug, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    root: Option<usize>,
    version: u32,
}

impl Bvh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from leaf bounds; the leaf index is the position in `bounds`
    pub fn build(&mut self, bounds: &[Aabb]) {
        self.nodes.clear();
        self.version = self.version.wrapping_add(1);

        if bounds.is_empty() {
            self.root = None;
            return;
        }

        let mut items: Vec<_> = bounds
            .iter()
            .enumerate()
            .map(|(i, b)| (i, *b, b.center()))
            .collect();

        self.root = Some(self.build_recursive(&mut items));
    }

    fn build_recursive(&mut self, items: &mut [(usize, Aabb, Vec3)]) -> usize {
        let node_index = self.nodes.len();

        if items.len() == 1 {
            self.nodes.push(BvhNode {
                bounds: items[0].1,
                leaf: Some(items[0].0),
                left: None,
                right: None,
            });
            return node_index;
        }

        let bounds = items
            .iter()
            .fold(Aabb::EMPTY, |acc, (_, b, _)| acc.union(b));

        // longest extent
        let extent = bounds.size();
        let axis = if extent.x > extent.y && extent.x > extent.z {
            0
        } else if extent.y > extent.z {
            1
        } else {
            2
        };

        items.sort_by(|a, b| {
            a.2[axis]
                .partial_cmp(&b.2[axis])
                .unwrap_or(core::cmp::Ordering::Equal)
        });

        let mid = items.len() / 2;
        let (left_items, right_items) = items.split_at_mut(mid);

        // reserve the slot, children fill in behind it
        self.nodes.push(BvhNode {
            bounds,
            leaf: None,
            left: None,
            right: None,
        });

        let left = self.build_recursive(left_items);
        let right = self.build_recursive(right_items);

        self.nodes[node_index].left = Some(left);
        self.nodes[node_index].right = Some(right);

        node_index
    }

    /// Leaves whose XY footprint overlaps `rect`; Z is ignored
    pub fn query_rect(&self, rect: &Rect, results: &mut Vec<usize>) {
        self.walk(|bounds| bounds.rect_xy().overlaps(rect), results);
    }

    pub fn query_aabb(&self, query: &Aabb, results: &mut Vec<usize>) {
        self.walk(|bounds| bounds.intersects(query), results);
    }

    pub fn query_point(&self, point: Vec3, results: &mut Vec<usize>) {
        self.walk(|bounds| bounds.contains_point(point), results);
    }

    /// Leaves inside or crossing the frustum
    pub fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<usize>) {
        if let Some(root) = self.root {
            self.frustum_recursive(root, frustum, results);
        }
    }

    fn frustum_recursive(&self, node_idx: usize, frustum: &Frustum, results: &mut Vec<usize>) {
        let node = &self.nodes[node_idx];

        match frustum.test_aabb(&node.bounds) {
            FrustumTest::Outside => return,
            FrustumTest::Inside => {
                self.collect_all(node_idx, results);
                return;
            }
            FrustumTest::Intersecting => {}
        }

        if let Some(leaf) = node.leaf {
            results.push(leaf);
        }
        if let Some(left) = node.left {
            self.frustum_recursive(left, frustum, results);
        }
        if let Some(right) = node.right {
            self.frustum_recursive(right, frustum, results);
        }
    }

    fn collect_all(&self, node_idx: usize, results: &mut Vec<usize>) {
        let node = &self.nodes[node_idx];

        if let Some(leaf) = node.leaf {
            results.push(leaf);
        }
        if let Some(left) = node.left {
            self.collect_all(left, results);
        }
        if let Some(right) = node.right {
            self.collect_all(right, results);
        }
    }

    /// Leaves hit by the ray, nearest first
    pub fn query_ray(&self, origin: Vec3, direction: Vec3, results: &mut Vec<(usize, f32)>) {
        let start = results.len();
        let mut stack: Vec<usize> = self.root.into_iter().collect();

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            let Some(t) = node.bounds.ray_intersection(origin, direction) else {
                continue;
            };

            if let Some(leaf) = node.leaf {
                results.push((leaf, t));
            }
            stack.extend(node.left);
            stack.extend(node.right);
        }

        results[start..].sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(core::cmp::Ordering::Equal));
    }

    /// Depth-first walk pruned by `test`, pushing every accepted leaf
    fn walk(&self, test: impl Fn(&Aabb) -> bool, results: &mut Vec<usize>) {
        let mut stack: Vec<usize> = self.root.into_iter().collect();

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if !test(&node.bounds) {
                continue;
            }

            if let Some(leaf) = node.leaf {
                results.push(leaf);
            }
            // right first so the left subtree pops first
            stack.extend(node.right);
            stack.extend(node.left);
        }
    }

    /// Bounds of every internal node, for debug drawing
    pub fn node_bounds(&self) -> impl Iterator<Item = &Aabb> {
        self.nodes.iter().filter(|n| n.leaf.is_none()).map(|n| &n.bounds)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Incremented on each rebuild
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn root_bounds(&self) -> Option<Aabb> {
        self.root.map(|r| self.nodes[r].bounds)
    }
}
