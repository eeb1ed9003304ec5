//! Suzuki–Abe border following with full hierarchy.
//!
//! The mask is copied into an `i32` label plane padded by one background
//! pixel on every side, so foreground touching the image edge still gets a
//! closed border. Scanning proceeds row by row; every outer or hole border
//! found gets a fresh label (`nbd`, starting at 2, the frame being 1) and its
//! parent is derived from the last border crossed on the current row
//! (`lnbd`).
use super::types::{ChainApprox, Contour, ContourSet};
use crate::draw::Point;
use crate::image::{BinaryMask, ImageView};

/// Neighbour offsets in clockwise order on screen (y pointing down),
/// starting east.
const DIRS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const FRAME: i32 = 1;

#[derive(Clone, Copy)]
struct BorderInfo {
    is_hole: bool,
    parent: i32,
}

struct LabelPlane {
    w: usize,
    data: Vec<i32>,
}

impl LabelPlane {
    fn from_mask(mask: &BinaryMask) -> Self {
        let w = mask.width() + 2;
        let h = mask.height() + 2;
        let mut data = vec![0i32; w * h];
        for y in 0..mask.height() {
            for (x, &v) in mask.row(y).iter().enumerate() {
                if v != 0 {
                    data[(y + 1) * w + x + 1] = 1;
                }
            }
        }
        Self { w, data }
    }

    #[inline]
    fn idx(&self, p: (usize, usize)) -> usize {
        p.1 * self.w + p.0
    }

    #[inline]
    fn get(&self, p: (usize, usize)) -> i32 {
        self.data[self.idx(p)]
    }

    #[inline]
    fn set(&mut self, p: (usize, usize), v: i32) {
        let i = self.idx(p);
        self.data[i] = v;
    }
}

#[inline]
fn step(p: (usize, usize), dir: usize) -> (usize, usize) {
    let (dx, dy) = DIRS[dir & 7];
    ((p.0 as isize + dx) as usize, (p.1 as isize + dy) as usize)
}

#[inline]
fn dir_between(from: (usize, usize), to: (usize, usize)) -> usize {
    let d = (
        to.0 as isize - from.0 as isize,
        to.1 as isize - from.1 as isize,
    );
    DIRS.iter().position(|&o| o == d).unwrap_or(0)
}

/// Extract every border of `mask` (non-zero = foreground).
pub fn find_contours(mask: &BinaryMask, approx: ChainApprox) -> ContourSet {
    let mut plane = LabelPlane::from_mask(mask);
    let (pw, ph) = (mask.width() + 2, mask.height() + 2);
    // index 0 unused, index 1 is the frame
    let mut borders: Vec<BorderInfo> = vec![
        BorderInfo {
            is_hole: true,
            parent: 0,
        };
        2
    ];
    let mut contours = Vec::new();
    let mut nbd = FRAME;

    for y in 1..ph - 1 {
        let mut lnbd = FRAME;
        for x in 1..pw - 1 {
            let p = (x, y);
            let v = plane.get(p);
            if v == 0 {
                continue;
            }

            let start = if v == 1 && plane.get((x - 1, y)) == 0 {
                Some((false, (x - 1, y)))
            } else if v >= 1 && plane.get((x + 1, y)) == 0 {
                if v > 1 {
                    lnbd = v;
                }
                Some((true, (x + 1, y)))
            } else {
                None
            };

            if let Some((is_hole, from)) = start {
                nbd += 1;
                let last = borders[lnbd as usize];
                let parent = if is_hole == last.is_hole {
                    last.parent
                } else {
                    lnbd
                };
                borders.push(BorderInfo { is_hole, parent });

                let chain = follow_border(&mut plane, p, from, nbd);
                let points = match approx {
                    ChainApprox::None => chain,
                    ChainApprox::Simple => compress_runs(&chain),
                };
                contours.push(Contour {
                    points: points
                        .into_iter()
                        .map(|(px, py)| Point::new(px as i32 - 1, py as i32 - 1))
                        .collect(),
                    is_hole,
                    parent: (parent > FRAME).then(|| (parent - 2) as usize),
                });
            }

            let v = plane.get(p);
            if v != 1 {
                lnbd = v.abs();
            }
        }
    }

    ContourSet::from_contours(contours)
}

/// Trace one border starting at `start`, entering from the zero pixel
/// `from`. Returns the visited pixels in tracing order.
fn follow_border(
    plane: &mut LabelPlane,
    start: (usize, usize),
    from: (usize, usize),
    nbd: i32,
) -> Vec<(usize, usize)> {
    let from_dir = dir_between(start, from);
    let first = (0..8)
        .map(|k| (from_dir + k) & 7)
        .find(|&d| plane.get(step(start, d)) != 0);
    let Some(first_dir) = first else {
        plane.set(start, -nbd);
        return vec![start];
    };
    let p1 = step(start, first_dir);

    let mut chain = Vec::new();
    let mut prev = p1;
    let mut cur = start;
    loop {
        chain.push(cur);
        let back = dir_between(cur, prev);
        let mut east_zero = false;
        let mut next = prev;
        for k in 1..=8 {
            let d = (back + 8 - k) & 7;
            let q = step(cur, d);
            if plane.get(q) != 0 {
                next = q;
                break;
            }
            if d == 0 {
                east_zero = true;
            }
        }

        if east_zero {
            plane.set(cur, -nbd);
        } else if plane.get(cur) == 1 {
            plane.set(cur, nbd);
        }

        if next == start && cur == p1 {
            break;
        }
        prev = cur;
        cur = next;
    }
    chain
}

/// Keep only the points where the chain changes direction.
fn compress_runs(chain: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let n = chain.len();
    if n < 3 {
        return chain.to_vec();
    }
    let delta = |a: (usize, usize), b: (usize, usize)| {
        (b.0 as isize - a.0 as isize, b.1 as isize - a.1 as isize)
    };
    let kept: Vec<(usize, usize)> = (0..n)
        .filter(|&i| {
            let prev = chain[(i + n - 1) % n];
            let next = chain[(i + 1) % n];
            delta(prev, chain[i]) != delta(chain[i], next)
        })
        .map(|i| chain[i])
        .collect();
    if kept.is_empty() {
        chain[..1].to_vec()
    } else {
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImage;

    fn mask_from(rows: &[&str]) -> BinaryMask {
        let h = rows.len();
        let w = rows[0].len();
        GrayImage::from_fn(w, h, |x, y| {
            if rows[y].as_bytes()[x] == b'#' {
                255
            } else {
                0
            }
        })
    }

    #[test]
    fn filled_square_has_four_corners() {
        let mask = mask_from(&[
            "......", //
            ".####.",
            ".####.",
            ".####.",
            ".####.",
            "......",
        ]);
        let set = find_contours(&mask, ChainApprox::Simple);
        assert_eq!(set.len(), 1);
        let c = &set.contours[0];
        assert!(!c.is_hole);
        assert_eq!(c.parent, None);
        let mut pts = c.points.clone();
        pts.sort_by_key(|p| (p.y, p.x));
        assert_eq!(
            pts,
            vec![
                Point::new(1, 1),
                Point::new(4, 1),
                Point::new(1, 4),
                Point::new(4, 4)
            ]
        );
    }

    #[test]
    fn full_chain_lists_every_border_pixel() {
        let mask = mask_from(&["###", "###", "###"]);
        let set = find_contours(&mask, ChainApprox::None);
        assert_eq!(set.len(), 1);
        assert_eq!(set.contours[0].points.len(), 8);
        assert_eq!(set.contours[0].points[0], Point::new(0, 0));
    }

    #[test]
    fn ring_produces_outer_and_hole() {
        let mask = mask_from(&[
            ".......",
            ".#####.",
            ".#...#.",
            ".#...#.",
            ".#####.",
            ".......",
        ]);
        let set = find_contours(&mask, ChainApprox::Simple);
        assert_eq!(set.len(), 2);
        assert!(!set.contours[0].is_hole);
        assert!(set.contours[1].is_hole);
        assert_eq!(set.contours[1].parent, Some(0));
        assert_eq!(set.hierarchy[0].first_child, Some(1));
    }

    #[test]
    fn nested_island_inside_hole() {
        let mask = mask_from(&[
            "#########",
            "#.......#",
            "#.......#",
            "#...#...#",
            "#.......#",
            "#.......#",
            "#########",
        ]);
        let set = find_contours(&mask, ChainApprox::Simple);
        assert_eq!(set.len(), 3);
        let outer = &set.contours[0];
        let hole = &set.contours[1];
        let island = &set.contours[2];
        assert!(!outer.is_hole && hole.is_hole && !island.is_hole);
        assert_eq!(hole.parent, Some(0));
        assert_eq!(island.parent, Some(1));
        assert_eq!(island.points, vec![Point::new(4, 3)]);
    }

    #[test]
    fn siblings_are_linked() {
        let mask = mask_from(&["#.#.#"]);
        let set = find_contours(&mask, ChainApprox::Simple);
        assert_eq!(set.len(), 3);
        assert!(set.contours.iter().all(|c| c.parent.is_none()));
        assert_eq!(set.hierarchy[0].next, Some(1));
        assert_eq!(set.hierarchy[1].prev, Some(0));
        assert_eq!(set.hierarchy[2].next, None);
    }

    #[test]
    fn horizontal_line_collapses_to_endpoints() {
        let mask = mask_from(&[".....", ".###.", "....."]);
        let set = find_contours(&mask, ChainApprox::Simple);
        assert_eq!(set.len(), 1);
        let mut pts = set.contours[0].points.clone();
        pts.sort_by_key(|p| p.x);
        assert_eq!(pts, vec![Point::new(1, 1), Point::new(3, 1)]);
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let mask = GrayImage::new(5, 4);
        assert!(find_contours(&mask, ChainApprox::Simple).is_empty());
    }
}
