use serde::{Deserialize, Serialize};

/// How out-of-range sample indices are folded back into the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// `aaa|abcd|ddd`
    Replicate,
    /// `dcb|abcd|cba`
    #[default]
    Reflect101,
}

impl BorderMode {
    /// Map `idx` into `[0, len)`. `len` must be non-zero.
    #[inline]
    pub fn fold(self, idx: isize, len: usize) -> usize {
        let n = len as isize;
        if (0..n).contains(&idx) {
            return idx as usize;
        }
        match self {
            BorderMode::Replicate => idx.clamp(0, n - 1) as usize,
            BorderMode::Reflect101 => {
                if n == 1 {
                    return 0;
                }
                let period = 2 * (n - 1);
                let m = idx.rem_euclid(period);
                (if m < n { m } else { period - m }) as usize
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replicate_clamps() {
        assert_eq!(BorderMode::Replicate.fold(-3, 4), 0);
        assert_eq!(BorderMode::Replicate.fold(7, 4), 3);
        assert_eq!(BorderMode::Replicate.fold(2, 4), 2);
    }

    #[test]
    fn reflect101_mirrors_without_edge_repeat() {
        let m = BorderMode::Reflect101;
        assert_eq!(m.fold(-1, 4), 1);
        assert_eq!(m.fold(-3, 4), 3);
        assert_eq!(m.fold(4, 4), 2);
        assert_eq!(m.fold(5, 4), 1);
        assert_eq!(m.fold(-5, 1), 0);
    }
}
