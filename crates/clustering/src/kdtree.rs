//! A static k-d tree for fixed-radius neighbor queries in 3D.

use crate::catalog::Catalog;
use clustering_nostd_internal::{squared_diff_norm, squared_distance_to_box};

/// leaves hold at most this many points
const LEAF_SIZE: usize = 16;

#[derive(Clone, Debug)]
struct Node {
    lo: [f64; 3],
    hi: [f64; 3],
    /// the node's points are `entries[start..end]`
    start: usize,
    end: usize,
    /// indices of the child nodes (absent for leaves)
    children: Option<[usize; 2]>,
}

/// A k-d tree over the points of a [`Catalog`].
///
/// Each node splits its points at the median of the axis along which the
/// node's bounding box is widest. Queries report the points' indices within
/// the catalog that built the tree.
#[derive(Clone, Debug)]
pub struct KdTree {
    /// (index in the original catalog, position)
    entries: Vec<(usize, [f64; 3])>,
    nodes: Vec<Node>,
}

impl KdTree {
    pub fn build(catalog: &Catalog) -> Self {
        let entries: Vec<(usize, [f64; 3])> =
            (0..catalog.len()).map(|i| (i, catalog.point(i))).collect();
        let mut tree = KdTree {
            entries,
            nodes: Vec::new(),
        };
        if !tree.entries.is_empty() {
            tree.build_node(0, tree.entries.len());
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn build_node(&mut self, start: usize, end: usize) -> usize {
        let (lo, hi) = bounding_box(&self.entries[start..end]);
        let node_id = self.nodes.len();
        self.nodes.push(Node {
            lo,
            hi,
            start,
            end,
            children: None,
        });

        if end - start > LEAF_SIZE {
            let dim = (0..3)
                .max_by(|&a, &b| (hi[a] - lo[a]).total_cmp(&(hi[b] - lo[b])))
                .unwrap_or(0);
            let mid = (end - start) / 2;
            self.entries[start..end]
                .select_nth_unstable_by(mid, |a, b| a.1[dim].total_cmp(&b.1[dim]));
            let left = self.build_node(start, start + mid);
            let right = self.build_node(start + mid, end);
            self.nodes[node_id].children = Some([left, right]);
        }
        node_id
    }

    /// Call `f(index, squared_distance)` for every point whose squared
    /// distance from `center` doesn't exceed `radius_squared`. The order of
    /// the calls is unspecified.
    pub fn for_each_within<F>(&self, center: &[f64; 3], radius_squared: f64, mut f: F)
    where
        F: FnMut(usize, f64),
    {
        if self.nodes.is_empty() {
            return;
        }
        let mut stack = vec![0_usize];
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];
            if squared_distance_to_box(center, &node.lo, &node.hi) > radius_squared {
                continue;
            }
            match node.children {
                Some([left, right]) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => {
                    for (index, position) in &self.entries[node.start..node.end] {
                        let dist_squared = squared_diff_norm(center, position);
                        if dist_squared <= radius_squared {
                            f(*index, dist_squared);
                        }
                    }
                }
            }
        }
    }

    /// The indices of every point within `radius` of `center` (in ascending
    /// order)
    pub fn query_ball_point(&self, center: &[f64; 3], radius: f64) -> Vec<usize> {
        let mut out = Vec::new();
        self.for_each_within(center, radius * radius, |index, _| out.push(index));
        out.sort_unstable();
        out
    }
}

fn bounding_box(entries: &[(usize, [f64; 3])]) -> ([f64; 3], [f64; 3]) {
    let mut lo = [f64::INFINITY; 3];
    let mut hi = [f64::NEG_INFINITY; 3];
    for (_, position) in entries {
        for dim in 0..3 {
            lo[dim] = lo[dim].min(position[dim]);
            hi[dim] = hi[dim].max(position[dim]);
        }
    }
    (lo, hi)
}
