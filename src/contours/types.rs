use crate::draw::Point;
use serde::{Deserialize, Serialize};

/// How much of a traced border is kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainApprox {
    /// Every border pixel.
    None,
    /// Only the end points of horizontal, vertical and diagonal runs.
    #[default]
    Simple,
}

/// One traced border in image coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point>,
    /// `true` for the inner border of a hole.
    pub is_hole: bool,
    /// Index of the enclosing border, `None` for top-level outer borders.
    pub parent: Option<usize>,
}

/// Tree links of one contour. Indices point into [`ContourSet::contours`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub next: Option<usize>,
    pub prev: Option<usize>,
    pub first_child: Option<usize>,
    pub parent: Option<usize>,
}

/// All borders of a mask in discovery order plus their containment tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContourSet {
    pub contours: Vec<Contour>,
    pub hierarchy: Vec<HierarchyNode>,
}

impl ContourSet {
    /// Build sibling and child links from each contour's parent index.
    /// Siblings keep discovery order.
    pub fn from_contours(contours: Vec<Contour>) -> Self {
        let mut hierarchy = vec![HierarchyNode::default(); contours.len()];
        // last child seen per parent; slot `len` collects the roots
        let roots = contours.len();
        let mut last_child: Vec<Option<usize>> = vec![None; contours.len() + 1];
        for (i, c) in contours.iter().enumerate() {
            hierarchy[i].parent = c.parent;
            let slot = c.parent.unwrap_or(roots);
            match last_child[slot] {
                Some(prev) => {
                    hierarchy[prev].next = Some(i);
                    hierarchy[i].prev = Some(prev);
                }
                None => {
                    if let Some(p) = c.parent {
                        hierarchy[p].first_child = Some(i);
                    }
                }
            }
            last_child[slot] = Some(i);
        }
        Self {
            contours,
            hierarchy,
        }
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Contours with no enclosing border.
    pub fn roots(&self) -> impl Iterator<Item = &Contour> + '_ {
        self.contours.iter().filter(|c| c.parent.is_none())
    }

    /// Nesting depth of contour `idx` (0 for roots).
    pub fn depth(&self, idx: usize) -> usize {
        let mut depth = 0;
        let mut cur = self.hierarchy.get(idx).and_then(|n| n.parent);
        while let Some(p) = cur {
            depth += 1;
            cur = self.hierarchy[p].parent;
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour(parent: Option<usize>, is_hole: bool) -> Contour {
        Contour {
            points: vec![Point::new(0, 0)],
            is_hole,
            parent,
        }
    }

    #[test]
    fn links_children_in_discovery_order() {
        let set = ContourSet::from_contours(vec![
            contour(None, false),
            contour(Some(0), true),
            contour(Some(0), true),
            contour(None, false),
            contour(Some(2), false),
        ]);
        assert_eq!(set.hierarchy[0].first_child, Some(1));
        assert_eq!(set.hierarchy[1].next, Some(2));
        assert_eq!(set.hierarchy[2].prev, Some(1));
        assert_eq!(set.hierarchy[0].next, Some(3));
        assert_eq!(set.hierarchy[2].first_child, Some(4));
        assert_eq!(set.depth(4), 2);
        assert_eq!(set.roots().count(), 2);
    }
}
