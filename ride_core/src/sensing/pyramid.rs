// ride_core/src/sensing/pyramid.rs

/// A stack of 2x2 box-average reductions over a square sample grid.
///
/// Level `k` of an `n x n` source holds `(n-k-1) x (n-k-1)` cells, each the mean of
/// the 2x2 block at the same index one level below. The last level is a single cell.
/// Buffers are allocated once; `rebuild` only overwrites them.
#[derive(Debug, Clone)]
pub struct BoxPyramid {
    source_dim: usize,
    levels: Vec<Vec<f64>>,
}

impl BoxPyramid {
    /// `source_dim` must be at least 2; the grid config guarantees it.
    pub fn new(source_dim: usize) -> Self {
        let levels = (0..source_dim.saturating_sub(1))
            .map(|k| {
                let dim = source_dim - k - 1;
                vec![0.0; dim * dim]
            })
            .collect();
        Self { source_dim, levels }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Side length of level `k`.
    pub fn level_dim(&self, k: usize) -> usize {
        self.source_dim - k - 1
    }

    pub fn level(&self, k: usize) -> &[f64] {
        &self.levels[k]
    }

    pub fn levels(&self) -> &[Vec<f64>] {
        &self.levels
    }

    /// Re-reduces every level from `source` (row-major, `source_dim^2` values).
    pub fn rebuild(&mut self, source: &[f64]) {
        debug_assert_eq!(source.len(), self.source_dim * self.source_dim);
        for k in 0..self.levels.len() {
            let (below, rest) = self.levels.split_at_mut(k);
            let (src, src_dim) = match below.last() {
                Some(prev) => (prev.as_slice(), self.source_dim - k),
                None => (source, self.source_dim),
            };
            let dst = &mut rest[0];
            let dst_dim = src_dim - 1;
            for row in 0..dst_dim {
                for col in 0..dst_dim {
                    let i = row * src_dim + col;
                    dst[row * dst_dim + col] =
                        (src[i] + src[i + 1] + src[i + src_dim] + src[i + src_dim + 1]) / 4.0;
                }
            }
        }
    }

    /// The single cell of the top level.
    pub fn apex(&self) -> f64 {
        self.levels.last().map_or(0.0, |top| top[0])
    }

    /// The 2x2 block one level below the apex, `[a, b, c, d]` row-major.
    /// `None` when the pyramid has only one level.
    pub fn penultimate_block(&self) -> Option<[f64; 4]> {
        let n = self.levels.len();
        if n < 2 {
            return None;
        }
        let block = &self.levels[n - 2];
        Some([block[0], block[1], block[2], block[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn level_shapes_follow_source_dimension() {
        let pyramid = BoxPyramid::new(4);
        assert_eq!(pyramid.level_count(), 3);
        assert_eq!(pyramid.level(0).len(), 9);
        assert_eq!(pyramid.level(1).len(), 4);
        assert_eq!(pyramid.level(2).len(), 1);
        assert_eq!(pyramid.level_dim(1), 2);
    }

    #[test]
    fn two_by_two_apex_is_the_plain_mean() {
        let mut pyramid = BoxPyramid::new(2);
        pyramid.rebuild(&[0.1, 0.4, 0.7, 0.2]);
        assert_abs_diff_eq!(pyramid.apex(), 0.35, epsilon = 1e-12);
        assert!(pyramid.penultimate_block().is_none());
    }

    #[test]
    fn three_by_three_apex_is_binomially_weighted() {
        let source = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 19.0];
        let mut pyramid = BoxPyramid::new(3);
        pyramid.rebuild(&source);

        // Two overlapping 2x2 passes weight corners 1, edges 2, centre 4 (out of 16).
        let weights = [1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0];
        let expected: f64 = source.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / 16.0;
        assert_abs_diff_eq!(pyramid.apex(), expected, epsilon = 1e-12);

        let block = pyramid.penultimate_block().unwrap();
        assert_abs_diff_eq!(block[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(block[3], 9.5, epsilon = 1e-12);
    }

    #[test]
    fn uniform_field_stays_uniform() {
        let mut pyramid = BoxPyramid::new(5);
        pyramid.rebuild(&[0.42; 25]);
        for level in pyramid.levels() {
            for value in level {
                assert_abs_diff_eq!(*value, 0.42, epsilon = 1e-12);
            }
        }
    }
}
